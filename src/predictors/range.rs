//! Battery percentage remaining after a trip leg.
//!
//! Fallback formula:
//! `battery - distance * efficiency / capacity * 100`, then a cold (x0.85) or
//! heat (x0.90) penalty on the result, clipped to [0, 100].

use crate::features::RangeInputs;
use crate::inference::{InferenceError, Regressor};
use crate::predictors::{Backend, ModelAvailability, PredictionResult, PredictionSource};
use serde::Serialize;
use std::path::Path;

pub const MODEL_INPUTS: [&str; 9] = [
    "current_battery",
    "temperature",
    "traffic",
    "distance_km",
    "vehicle_age",
    "humidity",
    "wind_speed",
    "hour",
    "day_of_week",
];

pub const MODEL_CONFIDENCE: f64 = 0.87;
pub const FALLBACK_CONFIDENCE: f64 = 0.70;
const LONG_TRIP_KM: f64 = 100.0;
const LONG_TRIP_FACTOR: f64 = 0.95;
const EXTREME_TEMPERATURE_FACTOR: f64 = 0.85;
const COLD_PENALTY: f64 = 0.85;
const HEAT_PENALTY: f64 = 0.90;
/// Arrival charge (percent) above which the trip needs no stop.
pub const SAFE_ARRIVAL_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeAdvice {
    SafeToProceed,
    ChargeRecommended,
}

impl RangeAdvice {
    pub fn for_arrival(battery_percent: f64) -> Self {
        if battery_percent > SAFE_ARRIVAL_PERCENT {
            RangeAdvice::SafeToProceed
        } else {
            RangeAdvice::ChargeRecommended
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RangeAdvice::SafeToProceed => "Safe to proceed",
            RangeAdvice::ChargeRecommended => "Charge recommended",
        }
    }
}

#[derive(Debug)]
pub struct RangePredictor {
    backend: Backend,
}

impl RangePredictor {
    pub fn load(path: Option<&Path>) -> Self {
        Self::new(Backend::load("range", path, &MODEL_INPUTS))
    }

    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn with_model(regressor: Box<dyn Regressor>) -> Self {
        Self::new(Backend::ModelBacked(regressor))
    }

    pub fn formula_only() -> Self {
        Self::new(Backend::FormulaOnly(ModelAvailability::Unloaded))
    }

    pub fn availability(&self) -> ModelAvailability {
        self.backend.availability()
    }

    /// Model estimate when model-backed, formula otherwise. Inference errors
    /// are returned, not replaced by the formula.
    pub fn predict(&self, inputs: &RangeInputs) -> Result<PredictionResult, InferenceError> {
        match &self.backend {
            Backend::ModelBacked(regressor) => predict_with_model(regressor.as_ref(), inputs),
            Backend::FormulaOnly(_) => Ok(predict_fallback(inputs)),
        }
    }
}

pub fn predict_with_model(
    regressor: &dyn Regressor,
    inputs: &RangeInputs,
) -> Result<PredictionResult, InferenceError> {
    let vector = [
        inputs.current_battery,
        inputs.temperature,
        f64::from(inputs.traffic.ordinal()),
        inputs.distance_km,
        inputs.vehicle_age,
        inputs.humidity,
        inputs.wind_speed,
        f64::from(inputs.hour.ok_or(InferenceError::MissingInput("hour"))?),
        f64::from(
            inputs
                .day_of_week
                .ok_or(InferenceError::MissingInput("day_of_week"))?,
        ),
    ];

    let battery = regressor.infer(&vector)?.clamp(0.0, 100.0);

    let mut confidence = MODEL_CONFIDENCE;
    if inputs.distance_km > LONG_TRIP_KM {
        confidence *= LONG_TRIP_FACTOR;
    }
    if inputs.temperature < 0.0 || inputs.temperature > 40.0 {
        confidence *= EXTREME_TEMPERATURE_FACTOR;
    }

    Ok(PredictionResult {
        value: battery,
        confidence,
        source: PredictionSource::Model,
    })
}

pub fn predict_fallback(inputs: &RangeInputs) -> PredictionResult {
    let energy_kwh = inputs.distance_km * inputs.efficiency;
    let consumption_percent = energy_kwh / inputs.battery_capacity * 100.0;
    let mut battery = inputs.current_battery - consumption_percent;

    if inputs.temperature < 0.0 {
        battery *= COLD_PENALTY;
    } else if inputs.temperature > 40.0 {
        battery *= HEAT_PENALTY;
    }

    PredictionResult {
        value: battery.clamp(0.0, 100.0),
        confidence: FALLBACK_CONFIDENCE,
        source: PredictionSource::Fallback,
    }
}
