//! Charging cost regression and the 24-hour optimal charging slot search.

use crate::error::EngineError;
use crate::features::{CostFeatures, CostInputs, DEFAULT_TRAFFIC_LEVEL};
use crate::inference::{Regressor, load_regressor_from_path};
use crate::predictors::ModelAvailability;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

pub const MODEL_INPUTS: [&str; 7] = [
    "distance_km",
    "hour",
    "day_of_week",
    "is_peak_hour",
    "is_weekend",
    "traffic_level",
    "avg_speed_kmh",
];

pub const HOURS_PER_DAY: usize = 24;
pub const MAX_COST: f64 = 1000.0;
/// Grid intensity (g CO2/kWh) at which the carbon factor is 1.
pub const REFERENCE_GRID_INTENSITY: f64 = 700.0;
pub const PEAK_HOURS: [u8; 5] = [7, 8, 17, 18, 19];
const SEARCH_AVG_SPEED_KMH: f64 = 50.0;

/// Hourly grid carbon intensity for one day, indexed by hour of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct GridForecast([f64; HOURS_PER_DAY]);

impl GridForecast {
    pub fn new(values: [f64; HOURS_PER_DAY]) -> Self {
        Self(values)
    }

    pub fn constant(intensity: f64) -> Self {
        Self([intensity; HOURS_PER_DAY])
    }

    pub fn intensity_at(&self, hour: u8) -> f64 {
        self.0[usize::from(hour) % HOURS_PER_DAY]
    }
}

impl TryFrom<Vec<f64>> for GridForecast {
    type Error = EngineError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let len = values.len();
        let values: [f64; HOURS_PER_DAY] = values
            .try_into()
            .map_err(|_| EngineError::InvalidForecast { len })?;
        Ok(Self(values))
    }
}

impl From<GridForecast> for Vec<f64> {
    fn from(forecast: GridForecast) -> Self {
        forecast.0.to_vec()
    }
}

#[derive(Debug)]
pub struct ChargingCostModel {
    regressor: Box<dyn Regressor>,
}

impl ChargingCostModel {
    pub fn new(regressor: Box<dyn Regressor>) -> Self {
        Self { regressor }
    }

    /// Loads the cost artifact. There is no cost formula, so without a model
    /// the caller only learns why it is missing.
    pub fn load(path: Option<&Path>) -> Result<Self, ModelAvailability> {
        let Some(path) = path else {
            info!("No charging cost artifact configured");
            return Err(ModelAvailability::Unloaded);
        };
        match load_regressor_from_path(path, &MODEL_INPUTS) {
            Ok(regressor) => {
                info!(path = %path.display(), "Charging cost model loaded");
                Ok(Self::new(regressor))
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Charging cost model unavailable");
                Err(ModelAvailability::Unavailable)
            }
        }
    }

    pub fn predict_cost(&self, features: &CostFeatures) -> Result<f64, EngineError> {
        self.predict_cost_inputs(&features.resolve()?)
    }

    fn predict_cost_inputs(&self, inputs: &CostInputs) -> Result<f64, EngineError> {
        let cost = self.regressor.infer(&inputs.to_vector())?;
        Ok(cost.clamp(0.0, MAX_COST))
    }

    /// Scans the next 24 hourly slots and returns the hour with the lowest
    /// cost weighted by grid carbon intensity. Every slot after the first is
    /// priced as the following day. Ties go to the earliest slot.
    pub fn find_optimal_charging_time(
        &self,
        current_hour: u8,
        day_of_week: u8,
        distance_km: f64,
        forecast: &GridForecast,
    ) -> Result<u8, EngineError> {
        if usize::from(current_hour) >= HOURS_PER_DAY {
            return Err(EngineError::InvalidInput(format!(
                "hour {current_hour} is outside 0-23"
            )));
        }
        if day_of_week > 6 {
            return Err(EngineError::InvalidInput(format!(
                "day_of_week {day_of_week} is outside 0-6"
            )));
        }

        let mut best_cost = f64::INFINITY;
        let mut best_hour = current_hour;

        for hour_offset in 0..HOURS_PER_DAY as u8 {
            let check_hour = (current_hour + hour_offset) % HOURS_PER_DAY as u8;
            let check_day = if hour_offset == 0 {
                day_of_week
            } else {
                (day_of_week + 1) % 7
            };

            let inputs = CostInputs {
                distance_km,
                hour: check_hour,
                day_of_week: check_day,
                is_peak_hour: PEAK_HOURS.contains(&check_hour),
                is_weekend: check_day >= 5,
                traffic_level: DEFAULT_TRAFFIC_LEVEL,
                avg_speed_kmh: SEARCH_AVG_SPEED_KMH,
            };
            let carbon_factor = forecast.intensity_at(check_hour) / REFERENCE_GRID_INTENSITY;
            let cost = self.predict_cost_inputs(&inputs)? * carbon_factor;

            if cost < best_cost {
                best_cost = cost;
                best_hour = check_hour;
            }
        }

        debug!(best_hour, best_cost, "Optimal charging slot found");
        Ok(best_hour)
    }
}
