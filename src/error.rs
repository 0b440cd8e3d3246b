use crate::inference::InferenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("missing required feature: {0}")]
    MissingFeature(&'static str),
    #[error("optimization weights must be finite, non-negative and sum to more than zero")]
    InvalidWeights,
    #[error("grid forecast must contain 24 hourly values, got {len}")]
    InvalidForecast { len: usize },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("charging cost model is not loaded")]
    CostModelUnavailable,
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}
