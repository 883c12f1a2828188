//! The persisted model bundle.
//!
//! On disk an artifact is a JSON object carrying exactly one of two key sets:
//!
//! - `{"w": [...], "scaler": {...}}`: weights from gradient descent
//! - `{"sklearn_model": {...}, "scaler": {...}}`: the closed-form baseline
//!
//! In memory the two shapes are the variants of `ModelArtifact`, so every
//! consumer dispatches with a `match` rather than probing for keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::data::features::{feature_matrix, FeatureVector};
use crate::model::ols::LinearRegression;
use crate::model::predictor::predict;
use crate::preprocessing::design::design_matrix;
use crate::preprocessing::scaler::StandardScaler;

const KEY_WEIGHTS: &str = "w";
const KEY_BASELINE: &str = "sklearn_model";
const KEY_SCALER: &str = "scaler";

/// A trained model together with the scaler it was trained with.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelArtifact {
    /// Bias-first weight vector fitted by gradient descent.
    Manual { weights: Vec<f64>, scaler: StandardScaler },
    /// Closed-form least-squares baseline.
    Library { regressor: LinearRegression, scaler: StandardScaler },
}

/// Which variant an artifact is, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Manual,
    Library,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Manual => write!(f, "manual gradient-descent model"),
            ModelKind::Library => write!(f, "baseline least-squares model"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManualRepr {
    w: Vec<f64>,
    scaler: StandardScaler,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct LibraryRepr {
    sklearn_model: LinearRegression,
    scaler: StandardScaler,
}

impl ModelArtifact {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelArtifact::Manual { .. } => ModelKind::Manual,
            ModelArtifact::Library { .. } => ModelKind::Library,
        }
    }

    pub fn scaler(&self) -> &StandardScaler {
        match self {
            ModelArtifact::Manual { scaler, .. } | ModelArtifact::Library { scaler, .. } => scaler,
        }
    }

    /// Bias-first weights regardless of variant.
    pub fn weights(&self) -> Vec<f64> {
        match self {
            ModelArtifact::Manual { weights, .. } => weights.clone(),
            ModelArtifact::Library { regressor, .. } => regressor.weights(),
        }
    }

    /// Scales `features` with the stored scaler and predicts one salary each.
    pub fn predict(&self, features: &[FeatureVector]) -> Vec<f64> {
        let scaled = self.scaler().transform(&feature_matrix(features));
        match self {
            ModelArtifact::Manual { weights, .. } => predict(&design_matrix(&scaled), weights),
            ModelArtifact::Library { regressor, .. } => regressor.predict(&scaled),
        }
    }

    pub fn predict_one(&self, features: FeatureVector) -> f64 {
        self.predict(&[features])[0]
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        match self {
            ModelArtifact::Manual { weights, scaler } => serde_json::to_value(ManualRepr {
                w: weights.clone(),
                scaler: scaler.clone(),
            }),
            ModelArtifact::Library { regressor, scaler } => serde_json::to_value(LibraryRepr {
                sklearn_model: regressor.clone(),
                scaler: scaler.clone(),
            }),
        }
    }

    /// Decodes a JSON object holding exactly one recognized key set.
    ///
    /// Also rejects bundles that would later break prediction: a scaler for
    /// the wrong number of features or a weight vector of the wrong length.
    pub fn from_json(value: Value) -> Result<ModelArtifact, String> {
        let keys: Vec<String> = match &value {
            Value::Object(map) => sorted_keys(map),
            other => return Err(format!("expected a JSON object, found {}", json_type(other))),
        };
        let has = |k: &str| keys.iter().any(|key| key == k);

        let artifact = match (has(KEY_WEIGHTS), has(KEY_BASELINE)) {
            (true, false) => {
                let repr: ManualRepr = serde_json::from_value(value).map_err(|e| e.to_string())?;
                ModelArtifact::Manual { weights: repr.w, scaler: repr.scaler }
            }
            (false, true) => {
                let repr: LibraryRepr = serde_json::from_value(value).map_err(|e| e.to_string())?;
                ModelArtifact::Library { regressor: repr.sklearn_model, scaler: repr.scaler }
            }
            _ => {
                return Err(format!(
                    "expected keys {{\"{KEY_WEIGHTS}\", \"{KEY_SCALER}\"}} or \
                     {{\"{KEY_BASELINE}\", \"{KEY_SCALER}\"}}, found {keys:?}"
                ))
            }
        };

        artifact.validate()?;
        Ok(artifact)
    }

    /// Checks the shape and values `from_json` requires, so `save` can refuse
    /// an artifact it could not load back.
    pub fn validate(&self) -> Result<(), String> {
        self.scaler().validate(FeatureVector::N_FEATURES)?;
        let weights = self.weights();
        let expected = FeatureVector::N_FEATURES + 1;
        if weights.len() != expected {
            return Err(format!(
                "expected {expected} weights (bias + features), found {}",
                weights.len()
            ));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(format!("weights must be finite, found {weights:?}"));
        }
        Ok(())
    }
}

fn sorted_keys(map: &Map<String, Value>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
