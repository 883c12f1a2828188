use std::io::Cursor;
use tiny_http::{Request, Response};

use ferrite_lr::format::rupiah;
use ferrite_lr::{Education, FeatureVector};

use crate::handlers::{build_model_options, error_html, list_models, load_model};
use crate::render::{html_escape, render_page, Page};
use crate::state::SharedState;
use crate::util::form::{form_get, parse_form};

const DEFAULT_MODEL: &str = "manual_model";

/// Values echoed back into the form after a submit.
struct PredictForm {
    model:      String,
    experience: String,
    education:  String,
}

impl Default for PredictForm {
    fn default() -> Self {
        PredictForm {
            model:      DEFAULT_MODEL.to_owned(),
            experience: "3".to_owned(),
            education:  Education::Bachelor.code().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// GET /predict  and  GET /predict?model=NAME
// ---------------------------------------------------------------------------

pub fn handle_get(query: String, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let q_pairs = parse_form(&query);
    let mut form = PredictForm::default();
    if let Some(model) = form_get(&q_pairs, "model") {
        form.model = model.to_owned();
    }

    let page = build_predict_page(&state, &form, "");
    crate::routes::html_response(page)
}

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

pub fn handle_post(request: &mut Request, state: SharedState) -> Response<Cursor<Vec<u8>>> {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let pairs = parse_form(&body);

    let form = PredictForm {
        model:      form_get(&pairs, "model").unwrap_or("").trim().to_owned(),
        experience: form_get(&pairs, "experience").unwrap_or("").trim().to_owned(),
        education:  form_get(&pairs, "education").unwrap_or("").trim().to_owned(),
    };

    let dir = state.lock().unwrap().models_dir.clone();
    let result_html = match run_prediction(&dir, &form) {
        Ok(html) => html,
        Err(msg) => error_html(&msg),
    };

    let page = build_predict_page(&state, &form, &result_html);
    crate::routes::html_response(page)
}

fn run_prediction(dir: &std::path::Path, form: &PredictForm) -> Result<String, String> {
    let experience: f64 = form.experience.parse()
        .map_err(|_| "Experience must be a number of years.".to_owned())?;
    let education: f64 = form.education.parse()
        .map_err(|_| "Pick an education level.".to_owned())?;
    let features = FeatureVector::from_raw(experience, education).map_err(|e| e.to_string())?;

    let artifact = load_model(dir, &form.model)?;
    let salary = artifact.predict_one(features);
    log::info!(
        "predicted {:.2} for experience={} education={} with {}",
        salary, features.experience, features.education.code(), form.model
    );

    Ok(format!(
        r#"<div class="result-card">
  <h2>Estimated salary</h2>
  <div class="salary">{salary}</div>
  <p class="hint">{exp} years of experience, {edu}. Model: {model} ({kind}).</p>
</div>"#,
        salary = rupiah(salary),
        exp    = features.experience,
        edu    = html_escape(features.education.label()),
        model  = html_escape(&form.model),
        kind   = artifact.kind(),
    ))
}

// ---------------------------------------------------------------------------
// Page builder
// ---------------------------------------------------------------------------

fn build_predict_page(state: &SharedState, form: &PredictForm, result_html: &str) -> String {
    let mut st = state.lock().unwrap();
    let flash  = st.take_flash();
    let dir    = st.models_dir.clone();
    drop(st);

    let models        = list_models(&dir);
    let model_options = build_model_options(&models, &form.model, &dir);
    let edu_options   = build_education_options(&form.education);
    let download_link = if models.iter().any(|m| m == &form.model) {
        format!(
            r#"<a class="btn btn-secondary" href="/models/{0}/download">Download {0}.json</a>"#,
            html_escape(&form.model)
        )
    } else {
        String::new()
    };

    render_page(Page::Predict, flash.as_ref(), |tmpl| {
        tmpl
            .replace("{{MODEL_OPTIONS}}", &model_options)
            .replace("{{EXPERIENCE}}", &html_escape(&form.experience))
            .replace("{{EDUCATION_OPTIONS}}", &edu_options)
            .replace("{{MODEL_DOWNLOAD}}", &download_link)
            .replace("{{PREDICT_RESULT}}", result_html)
    })
}

fn build_education_options(selected: &str) -> String {
    Education::ALL.iter().map(|e| {
        let code = e.code().to_string();
        let sel  = if code == selected { " selected" } else { "" };
        format!("<option value=\"{}\"{}>{}</option>", code, sel, html_escape(&e.to_string()))
    }).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_experience_is_reported_before_loading() {
        let form = PredictForm {
            model:      "missing".into(),
            experience: "ten".into(),
            education:  "3".into(),
        };
        let err = run_prediction(std::path::Path::new("does-not-exist"), &form).unwrap_err();
        assert!(err.contains("Experience"), "{err}");
    }

    #[test]
    fn education_options_mark_selection() {
        let html = build_education_options("2");
        assert!(html.contains("<option value=\"2\" selected>"));
        assert_eq!(html.matches("<option").count(), 4);
    }
}
