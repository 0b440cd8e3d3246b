//! Linear regression model with optional standardization.
//!
//! Formula: y = target_mean + target_scale * (bias + Σ w_i * (x_i - mean_i) / scale_i)

use crate::inference::model::{InferenceError, Regressor, check_dim, finite};
use serde::Deserialize;

/// Linear model parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearParams {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
    /// Per-feature means subtracted before weighting.
    pub feature_mean: Option<Vec<f64>>,
    /// Per-feature scales dividing the centred features.
    pub feature_scale: Option<Vec<f64>>,
    pub target_mean: Option<f64>,
    pub target_scale: Option<f64>,
}

#[derive(Debug)]
pub struct LinearRegressor {
    pub params: LinearParams,
}

impl LinearRegressor {
    pub fn new(params: LinearParams) -> Result<Self, InferenceError> {
        let dim = params.weights.len();
        if dim == 0 {
            return Err(InferenceError::MalformedModel(
                "linear model has no weights".to_string(),
            ));
        }
        for (name, values) in [
            ("feature_mean", &params.feature_mean),
            ("feature_scale", &params.feature_scale),
        ] {
            match values {
                Some(values) if values.len() != dim => {
                    return Err(InferenceError::MalformedModel(format!(
                        "{name} has {} entries, expected {dim}",
                        values.len()
                    )));
                }
                _ => {}
            }
        }
        if params
            .feature_scale
            .as_ref()
            .is_some_and(|scale| scale.iter().any(|s| *s == 0.0))
        {
            return Err(InferenceError::MalformedModel(
                "feature_scale contains zero".to_string(),
            ));
        }
        Ok(Self { params })
    }
}

impl Regressor for LinearRegressor {
    fn infer(&self, features: &[f64]) -> Result<f64, InferenceError> {
        check_dim(self.input_dim(), features)?;

        let mut sum = self.params.bias;
        for (i, (x, w)) in features.iter().zip(&self.params.weights).enumerate() {
            let mean = self.params.feature_mean.as_ref().map_or(0.0, |m| m[i]);
            let scale = self.params.feature_scale.as_ref().map_or(1.0, |s| s[i]);
            sum += w * (x - mean) / scale;
        }

        let value = self.params.target_mean.unwrap_or(0.0)
            + self.params.target_scale.unwrap_or(1.0) * sum;
        finite(value)
    }

    fn input_dim(&self) -> usize {
        self.params.weights.len()
    }
}
