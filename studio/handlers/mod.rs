pub mod batch;
pub mod models;
pub mod predict;

use std::path::Path;

use ferrite_lr::model::store;
use ferrite_lr::{LrError, ModelArtifact};

use crate::render::html_escape;

// ---------------------------------------------------------------------------
// Model listing and loading shared by the predict and batch tabs
// ---------------------------------------------------------------------------

/// Stems of every `*.json` file in `dir`, sorted.
pub fn list_models(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries.flatten()
                .filter_map(|e| {
                    let path = e.path();
                    if path.extension().and_then(|s| s.to_str()) == Some("json") {
                        path.file_stem().and_then(|s| s.to_str()).map(|s| s.to_owned())
                    } else {
                        None
                    }
                })
                .collect();
            names.sort();
            names
        }
        Err(_) => vec![],
    }
}

pub fn build_model_options(models: &[String], selected: &str, dir: &Path) -> String {
    if models.is_empty() {
        return format!(
            r#"<option disabled>No models found in {}/</option>"#,
            html_escape(&dir.display().to_string())
        );
    }
    models.iter().map(|name| {
        let sel = if name == selected { " selected" } else { "" };
        format!("<option value=\"{}\"{}>{}</option>", html_escape(name), sel, html_escape(name))
    }).collect::<Vec<_>>().join("\n")
}

/// Rejects empty names and anything that could escape the models directory.
pub fn is_safe_model_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

/// Reads `dir/<name>.json` from disk. Called on every request so a retrained
/// model is picked up without restarting the studio.
pub fn load_model(dir: &Path, name: &str) -> Result<ModelArtifact, String> {
    if name.is_empty() {
        return Err("Select a model first.".into());
    }
    if !is_safe_model_name(name) {
        return Err(format!("'{}' is not a valid model name.", name));
    }
    store::load(dir.join(format!("{}.json", name))).map_err(|e| match e {
        LrError::ArtifactNotFound(_) => format!(
            "Model '{}' was not found. Train one with `ferrite-lr train` first.",
            name
        ),
        other => other.to_string(),
    })
}

pub fn error_html(msg: &str) -> String {
    format!(
        r#"<div class="result-card"><h2>Error</h2><div class="error-box">{}</div></div>"#,
        html_escape(msg)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_names_are_rejected() {
        assert!(is_safe_model_name("manual_model"));
        assert!(!is_safe_model_name(""));
        assert!(!is_safe_model_name("../secret"));
        assert!(!is_safe_model_name("a/b"));
    }

    #[test]
    fn missing_model_reads_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(dir.path(), "nope").unwrap_err();
        assert!(err.contains("was not found"), "{err}");
    }

    #[test]
    fn lists_only_json_stems() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        assert_eq!(list_models(dir.path()), vec!["a".to_owned(), "b".to_owned()]);
    }
}
