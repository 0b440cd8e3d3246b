//! Regressor trait shared by every trained model kind.
//!
//! A regressor maps one ordered feature vector to one scalar. Models are
//! selected by the `model` field of their artifact file and loaded once at
//! startup.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("feature length mismatch: got {got}, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("missing model input: {0}")]
    MissingInput(&'static str),
    #[error("model produced a non-finite output")]
    NonFinite,
    #[error("malformed model: {0}")]
    MalformedModel(String),
}

/// Trait for trained models that produce a single numeric estimate.
///
/// Implement this trait to add new model kinds. The kind is selected via the
/// `model` field in the artifact file.
pub trait Regressor: Send + Sync + std::fmt::Debug {
    /// Run one-step inference on an ordered feature vector.
    fn infer(&self, features: &[f64]) -> Result<f64, InferenceError>;

    /// Number of features the model was trained on.
    fn input_dim(&self) -> usize;
}

pub(crate) fn check_dim(expected: usize, features: &[f64]) -> Result<(), InferenceError> {
    if features.len() != expected {
        return Err(InferenceError::DimensionMismatch {
            expected,
            got: features.len(),
        });
    }
    Ok(())
}

pub(crate) fn finite(value: f64) -> Result<f64, InferenceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InferenceError::NonFinite)
    }
}

impl<R: Regressor + ?Sized> Regressor for std::sync::Arc<R> {
    fn infer(&self, features: &[f64]) -> Result<f64, InferenceError> {
        (**self).infer(features)
    }

    fn input_dim(&self) -> usize {
        (**self).input_dim()
    }
}
