//! Process-wide prediction entry point.
//!
//! A `PredictionService` is built once at startup, loading every model
//! artifact up front, and is then shared by reference. Predictions never touch
//! disk and never fail because a model is missing or broken: range and
//! air-quality requests fall back to their formulas.

use crate::config::ModelsSection;
use crate::error::EngineError;
use crate::features::{AirQualityFeatures, CostFeatures, RangeFeatures};
use crate::inference::InferenceError;
use crate::predictors::air_quality::{self, AirQualityPrediction, AirQualityPredictor};
use crate::predictors::charging::{ChargingCostModel, GridForecast};
use crate::predictors::range::{self, RangePredictor};
use crate::predictors::{ModelAvailability, PredictionResult};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceAvailability {
    pub range: ModelAvailability,
    pub air_quality: ModelAvailability,
    pub charging_cost: ModelAvailability,
}

#[derive(Debug)]
pub struct PredictionService {
    range: RangePredictor,
    air_quality: AirQualityPredictor,
    charging_cost: Result<ChargingCostModel, ModelAvailability>,
}

impl PredictionService {
    /// Loads every configured artifact. Failures are logged and leave the
    /// affected predictor on its formula for the life of the service.
    pub fn initialize(models: &ModelsSection) -> Self {
        let service = Self::new(
            RangePredictor::load(models.range_path()),
            AirQualityPredictor::load(models.air_quality_path()),
            ChargingCostModel::load(models.charging_cost_path()),
        );
        let availability = service.availability();
        info!(
            range = ?availability.range,
            air_quality = ?availability.air_quality,
            charging_cost = ?availability.charging_cost,
            "Prediction service initialized"
        );
        service
    }

    pub fn new(
        range: RangePredictor,
        air_quality: AirQualityPredictor,
        charging_cost: Result<ChargingCostModel, ModelAvailability>,
    ) -> Self {
        Self {
            range,
            air_quality,
            charging_cost,
        }
    }

    /// Formula-only service with no cost model.
    pub fn formula_only() -> Self {
        Self::new(
            RangePredictor::formula_only(),
            AirQualityPredictor::formula_only(),
            Err(ModelAvailability::Unloaded),
        )
    }

    pub fn availability(&self) -> ServiceAvailability {
        ServiceAvailability {
            range: self.range.availability(),
            air_quality: self.air_quality.availability(),
            charging_cost: match &self.charging_cost {
                Ok(_) => ModelAvailability::Loaded,
                Err(availability) => *availability,
            },
        }
    }

    pub fn predict_range(&self, features: &RangeFeatures) -> Result<PredictionResult, EngineError> {
        let inputs = features.resolve()?;
        Ok(or_fallback("range", self.range.predict(&inputs), || {
            range::predict_fallback(&inputs)
        }))
    }

    pub fn predict_air_quality(&self, features: &AirQualityFeatures) -> AirQualityPrediction {
        or_fallback("air_quality", self.air_quality.predict(features), || {
            air_quality::predict_fallback(features)
        })
    }

    pub fn charging_cost_model(&self) -> Result<&ChargingCostModel, EngineError> {
        self.charging_cost
            .as_ref()
            .map_err(|_| EngineError::CostModelUnavailable)
    }

    pub fn predict_cost(&self, features: &CostFeatures) -> Result<f64, EngineError> {
        self.charging_cost_model()?.predict_cost(features)
    }

    pub fn find_optimal_charging_time(
        &self,
        current_hour: u8,
        day_of_week: u8,
        distance_km: f64,
        forecast: &GridForecast,
    ) -> Result<u8, EngineError> {
        self.charging_cost_model()?.find_optimal_charging_time(
            current_hour,
            day_of_week,
            distance_km,
            forecast,
        )
    }
}

fn or_fallback<T>(
    model: &'static str,
    attempt: Result<T, InferenceError>,
    fallback: impl FnOnce() -> T,
) -> T {
    match attempt {
        Ok(value) => value,
        Err(err) => {
            warn!(model, error = %err, "Model prediction failed, using fallback");
            fallback()
        }
    }
}
