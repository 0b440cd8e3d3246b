//! Model-or-formula predictors.
//!
//! Each predictor owns a [`Backend`] chosen once at construction. A
//! model-backed predictor reports inference failures as `Err` and leaves the
//! decision to fall back to the caller; a formula-only predictor always
//! answers from its formula.

use crate::inference::{Regressor, load_regressor_from_path};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

pub mod air_quality;
pub mod charging;
pub mod range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelAvailability {
    /// No artifact was configured.
    Unloaded,
    Loaded,
    /// An artifact was configured but could not be loaded. Never retried.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub value: f64,
    pub confidence: f64,
    pub source: PredictionSource,
}

#[derive(Debug)]
pub enum Backend {
    ModelBacked(Box<dyn Regressor>),
    FormulaOnly(ModelAvailability),
}

impl Backend {
    /// Loads the artifact at `path`, or settles on formula-only mode.
    pub fn load(name: &str, path: Option<&Path>, expected_inputs: &[&str]) -> Self {
        let Some(path) = path else {
            info!(model = name, "No artifact configured, using formula");
            return Backend::FormulaOnly(ModelAvailability::Unloaded);
        };

        match load_regressor_from_path(path, expected_inputs) {
            Ok(regressor) => {
                info!(model = name, path = %path.display(), "Model artifact loaded");
                Backend::ModelBacked(regressor)
            }
            Err(err) => {
                warn!(
                    model = name,
                    path = %path.display(),
                    error = %err,
                    "Model artifact unavailable, using formula"
                );
                Backend::FormulaOnly(ModelAvailability::Unavailable)
            }
        }
    }

    pub fn availability(&self) -> ModelAvailability {
        match self {
            Backend::ModelBacked(_) => ModelAvailability::Loaded,
            Backend::FormulaOnly(availability) => *availability,
        }
    }
}
