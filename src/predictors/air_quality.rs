use crate::features::{AirQualityFeatures, DEFAULT_PM10, DEFAULT_WIND_SPEED};
use crate::inference::{InferenceError, Regressor};
use crate::predictors::{Backend, ModelAvailability, PredictionSource};
use serde::Serialize;
use std::path::Path;

pub const MODEL_INPUTS: [&str; 7] = [
    "pm10",
    "no2",
    "o3",
    "humidity",
    "wind_speed",
    "temperature",
    "cloud_cover",
];

pub const PM25_MAX: f64 = 500.0;
const PM10_TO_PM25: f64 = 0.4;
const WINDY_THRESHOLD: f64 = 10.0;
const WIND_DISPERSAL: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AirQualityLevel {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    Hazardous,
}

impl AirQualityLevel {
    /// PM2.5 bands in µg/m³, upper bounds inclusive.
    pub fn classify(pm25: f64) -> Self {
        if pm25 <= 12.0 {
            AirQualityLevel::Good
        } else if pm25 <= 35.0 {
            AirQualityLevel::Moderate
        } else if pm25 <= 55.0 {
            AirQualityLevel::UnhealthyForSensitive
        } else if pm25 <= 150.0 {
            AirQualityLevel::Unhealthy
        } else {
            AirQualityLevel::Hazardous
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AirQualityPrediction {
    pub pm25: f64,
    pub level: AirQualityLevel,
    pub source: PredictionSource,
}

impl AirQualityPrediction {
    fn new(pm25: f64, source: PredictionSource) -> Self {
        let pm25 = pm25.clamp(0.0, PM25_MAX);
        Self {
            pm25,
            level: AirQualityLevel::classify(pm25),
            source,
        }
    }
}

#[derive(Debug)]
pub struct AirQualityPredictor {
    backend: Backend,
}

impl AirQualityPredictor {
    pub fn load(path: Option<&Path>) -> Self {
        Self::new(Backend::load("air_quality", path, &MODEL_INPUTS))
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

    pub fn predict(
        &self,
        features: &AirQualityFeatures,
    ) -> Result<AirQualityPrediction, InferenceError> {
        match &self.backend {
            Backend::ModelBacked(regressor) => predict_with_model(regressor.as_ref(), features),
            Backend::FormulaOnly(_) => Ok(predict_fallback(features)),
        }
    }
}

pub fn predict_with_model(
    regressor: &dyn Regressor,
    features: &AirQualityFeatures,
) -> Result<AirQualityPrediction, InferenceError> {
    let input = |value: Option<f64>, name: &'static str| {
        value.ok_or(InferenceError::MissingInput(name))
    };
    let vector = [
        input(features.pm10, "pm10")?,
        input(features.no2, "no2")?,
        input(features.o3, "o3")?,
        input(features.humidity, "humidity")?,
        input(features.wind_speed, "wind_speed")?,
        input(features.temperature, "temperature")?,
        input(features.cloud_cover, "cloud_cover")?,
    ];

    let pm25 = regressor.infer(&vector)?;
    Ok(AirQualityPrediction::new(pm25, PredictionSource::Model))
}

pub fn predict_fallback(features: &AirQualityFeatures) -> AirQualityPrediction {
    let mut pm25 = features.pm10.unwrap_or(DEFAULT_PM10) * PM10_TO_PM25;
    if features.wind_speed.unwrap_or(DEFAULT_WIND_SPEED) > WINDY_THRESHOLD {
        pm25 *= WIND_DISPERSAL;
    }
    AirQualityPrediction::new(pm25, PredictionSource::Fallback)
}
