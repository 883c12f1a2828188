use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::Path;

use crate::error::{LrError, Result};
use crate::model::artifact::ModelArtifact;

/// Serializes the artifact to a pretty-printed JSON file.
///
/// Parent directories are created as needed and an existing file is
/// overwritten. An artifact that `load` would reject (non-finite weights
/// from a diverged run, a malformed scaler) fails with `InvalidArtifact`
/// before anything is written.
pub fn save<P: AsRef<Path>>(artifact: &ModelArtifact, path: P) -> Result<()> {
    let path = path.as_ref();
    artifact.validate().map_err(LrError::InvalidArtifact)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &artifact.to_json()?)?;
    log::info!("saved {} to {}", artifact.kind(), path.display());
    Ok(())
}

/// Loads an artifact previously written by `save`.
///
/// A missing file is `ArtifactNotFound`; unparsable JSON or an unrecognized
/// bundle shape is `CorruptArtifact`. Nothing partial is ever returned.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ModelArtifact> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(LrError::ArtifactNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(LrError::Io(e)),
    };
    let reader = BufReader::new(file);

    let corrupt = |reason: String| LrError::CorruptArtifact {
        path: path.to_path_buf(),
        reason,
    };
    let value: serde_json::Value = serde_json::from_reader(reader).map_err(|e| corrupt(e.to_string()))?;
    let artifact = ModelArtifact::from_json(value).map_err(corrupt)?;

    log::debug!("loaded {} from {}", artifact.kind(), path.display());
    Ok(artifact)
}
