use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Flash messages
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        FlashMessage { kind: FlashKind::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Batch result
// ---------------------------------------------------------------------------

/// The most recent batch prediction, kept so it can be re-rendered and
/// downloaded without re-uploading the file.
#[derive(Clone, Debug)]
pub struct BatchResult {
    /// Stem of the model file that produced the predictions.
    pub model:       String,
    pub headers:     Vec<String>,
    pub rows:        Vec<Vec<String>>,
    /// `(experience, predicted salary)` pairs for the scatter plot.
    pub points:      Vec<(f64, f64)>,
    /// Rendered CSV with the `predicted_salary` column appended.
    pub csv:         String,
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

pub struct StudioState {
    /// Directory scanned for `*.json` model artifacts. Artifacts are read
    /// from disk on every request, never cached here.
    pub models_dir:  PathBuf,
    /// Last successful batch prediction.
    pub last_batch:  Option<BatchResult>,
    /// One-shot flash message for the next page render.
    pub flash:       Option<FlashMessage>,
}

impl StudioState {
    pub fn new(models_dir: PathBuf) -> Self {
        StudioState {
            models_dir,
            last_batch: None,
            flash:      None,
        }
    }

    /// Takes and returns the current flash message, clearing it.
    pub fn take_flash(&mut self) -> Option<FlashMessage> {
        self.flash.take()
    }
}

/// Shared state type: an `Arc<Mutex<StudioState>>` passed to every handler.
pub type SharedState = Arc<Mutex<StudioState>>;
