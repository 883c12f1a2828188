use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LrError, Result};
use crate::math::matrix::Matrix;

/// Formal education level. The discriminant is the numeric code fed to the
/// model as the `education` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Education {
    HighSchool = 1,
    Diploma = 2,
    Bachelor = 3,
    Postgraduate = 4,
}

impl Education {
    pub const ALL: [Education; 4] = [
        Education::HighSchool,
        Education::Diploma,
        Education::Bachelor,
        Education::Postgraduate,
    ];

    pub fn from_code(code: u8) -> Option<Education> {
        match code {
            1 => Some(Education::HighSchool),
            2 => Some(Education::Diploma),
            3 => Some(Education::Bachelor),
            4 => Some(Education::Postgraduate),
            _ => None,
        }
    }

    /// Accepts integral floats only (`3.0` is fine, `2.5` is not), since CSV
    /// cells are parsed as numbers first.
    pub fn from_value(value: f64) -> Option<Education> {
        if value.fract() != 0.0 || !(1.0..=4.0).contains(&value) {
            return None;
        }
        Education::from_code(value as u8)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Education::HighSchool => "High school (SMA/SMK)",
            Education::Diploma => "Diploma (D1-D3)",
            Education::Bachelor => "Bachelor (S1)",
            Education::Postgraduate => "Postgraduate (S2/S3)",
        }
    }
}

impl TryFrom<u8> for Education {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        Education::from_code(code).ok_or_else(|| format!("education level {code} is not in 1..=4"))
    }
}

impl From<Education> for u8 {
    fn from(e: Education) -> u8 {
        e.code()
    }
}

impl fmt::Display for Education {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.label())
    }
}

/// The two model inputs, always in the order `[experience, education]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Years of work experience, `>= 0`.
    pub experience: f64,
    pub education: Education,
}

impl FeatureVector {
    pub const N_FEATURES: usize = 2;

    pub fn new(experience: f64, education: Education) -> Result<FeatureVector> {
        if !experience.is_finite() || experience < 0.0 {
            return Err(LrError::InvalidFeature(format!(
                "experience must be a non-negative number, got {experience}"
            )));
        }
        Ok(FeatureVector { experience, education })
    }

    /// Builds a feature vector from raw numbers, validating both ranges.
    pub fn from_raw(experience: f64, education: f64) -> Result<FeatureVector> {
        let education = Education::from_value(education).ok_or_else(|| {
            LrError::InvalidFeature(format!("education must be an integer in 1..=4, got {education}"))
        })?;
        FeatureVector::new(experience, education)
    }

    pub fn to_row(&self) -> Vec<f64> {
        vec![self.experience, self.education.code() as f64]
    }
}

/// Stacks feature vectors into an (m × 2) raw feature matrix.
pub fn feature_matrix(features: &[FeatureVector]) -> Matrix {
    Matrix {
        rows: features.len(),
        cols: FeatureVector::N_FEATURES,
        data: features.iter().map(FeatureVector::to_row).collect(),
    }
}
