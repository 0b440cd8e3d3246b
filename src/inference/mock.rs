use crate::inference::model::{InferenceError, Regressor, check_dim};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always return this value.
    Constant(f64),
    /// Return `features[index]` unchanged.
    Echo(usize),
    /// Always fail with this error.
    Fail(InferenceError),
}

/// Scripted regressor for exercising model-backed code paths without an
/// artifact on disk. Records every feature vector it receives.
#[derive(Debug)]
pub struct MockRegressor {
    behavior: MockBehavior,
    input_dim: usize,
    calls: Mutex<Vec<Vec<f64>>>,
}

impl MockRegressor {
    pub fn new(behavior: MockBehavior, input_dim: usize) -> Self {
        Self {
            behavior,
            input_dim,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn constant(value: f64, input_dim: usize) -> Self {
        Self::new(MockBehavior::Constant(value), input_dim)
    }

    pub fn failing(input_dim: usize) -> Self {
        Self::new(MockBehavior::Fail(InferenceError::NonFinite), input_dim)
    }

    pub fn calls(&self) -> Vec<Vec<f64>> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl Regressor for MockRegressor {
    fn infer(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(features.to_vec());
        }
        check_dim(self.input_dim, features)?;

        match &self.behavior {
            MockBehavior::Constant(value) => Ok(*value),
            MockBehavior::Echo(index) => features
                .get(*index)
                .copied()
                .ok_or(InferenceError::MissingInput("echo index")),
            MockBehavior::Fail(err) => Err(err.clone()),
        }
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }
}
