use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub mod linear;
pub mod mock;
pub mod model;
pub mod tree_ensemble;

use linear::{LinearParams, LinearRegressor};
pub use model::{InferenceError, Regressor};
use tree_ensemble::{TreeEnsembleParams, TreeEnsembleRegressor};

#[derive(Debug, Deserialize)]
pub struct ModelArtifact {
    pub model: String,
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub params: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read model artifact: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

impl From<InferenceError> for ArtifactError {
    fn from(err: InferenceError) -> Self {
        ArtifactError::Invalid(err.to_string())
    }
}

// Model Factory
pub fn create_regressor(
    artifact: &ModelArtifact,
    expected_inputs: &[&str],
) -> Result<Box<dyn Regressor>, ArtifactError> {
    if !artifact.feature_names.is_empty() && artifact.feature_names != expected_inputs {
        return Err(ArtifactError::Invalid(format!(
            "feature order {:?} does not match {:?}",
            artifact.feature_names, expected_inputs
        )));
    }

    let regressor: Box<dyn Regressor> = match artifact.model.as_str() {
        "linear" => {
            let params: LinearParams = serde_json::from_value(artifact.params.clone())?;
            Box::new(LinearRegressor::new(params)?)
        }
        "tree_ensemble" => {
            let params: TreeEnsembleParams = serde_json::from_value(artifact.params.clone())?;
            Box::new(TreeEnsembleRegressor::new(params, expected_inputs.len())?)
        }
        other => return Err(ArtifactError::Invalid(format!("unknown model: {other}"))),
    };

    if regressor.input_dim() != expected_inputs.len() {
        return Err(ArtifactError::Invalid(format!(
            "model takes {} features, expected {}",
            regressor.input_dim(),
            expected_inputs.len()
        )));
    }

    Ok(regressor)
}

pub fn load_regressor_from_path(
    path: impl AsRef<Path>,
    expected_inputs: &[&str],
) -> Result<Box<dyn Regressor>, ArtifactError> {
    let contents = std::fs::read_to_string(path)?;
    let artifact: ModelArtifact = serde_json::from_str(&contents)?;
    create_regressor(&artifact, expected_inputs)
}
