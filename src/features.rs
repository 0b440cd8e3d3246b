//! Feature sets supplied by callers for one inference call.
//!
//! Fields that have no documented default are `Option`s; `resolve` turns a
//! feature set into the inputs a predictor needs and reports the first
//! missing required field.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const DEFAULT_BATTERY_CAPACITY_KWH: f64 = 60.0;
pub const DEFAULT_EFFICIENCY_KWH_PER_KM: f64 = 0.14;
pub const DEFAULT_HUMIDITY: f64 = 50.0;
pub const DEFAULT_WIND_SPEED: f64 = 5.0;
pub const DEFAULT_PM10: f64 = 50.0;
pub const DEFAULT_TRAFFIC_LEVEL: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Traffic {
    Low,
    High,
    /// Also absorbs unrecognized levels.
    #[default]
    #[serde(other)]
    Medium,
}

impl Traffic {
    pub fn ordinal(self) -> u8 {
        match self {
            Traffic::Low => 0,
            Traffic::Medium => 1,
            Traffic::High => 2,
        }
    }
}

/// Hour of day and weekday (Monday = 0) at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripClock {
    pub hour: u8,
    pub day_of_week: u8,
}

impl TripClock {
    pub fn at(datetime: OffsetDateTime) -> Self {
        Self {
            hour: datetime.hour(),
            day_of_week: datetime.weekday().number_days_from_monday(),
        }
    }

    pub fn now_utc() -> Self {
        Self::at(OffsetDateTime::now_utc())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeFeatures {
    pub current_battery: Option<f64>,
    pub temperature: Option<f64>,
    #[serde(default)]
    pub traffic: Traffic,
    pub distance_km: Option<f64>,
    pub vehicle_age: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub hour: Option<u8>,
    pub day_of_week: Option<u8>,
    pub battery_capacity: Option<f64>,
    pub efficiency: Option<f64>,
}

/// Range inputs with required fields present and defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeInputs {
    pub current_battery: f64,
    pub temperature: f64,
    pub traffic: Traffic,
    pub distance_km: f64,
    pub vehicle_age: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub hour: Option<u8>,
    pub day_of_week: Option<u8>,
    pub battery_capacity: f64,
    pub efficiency: f64,
}

impl RangeFeatures {
    pub fn resolve(&self) -> Result<RangeInputs, EngineError> {
        Ok(RangeInputs {
            current_battery: require(self.current_battery, "current_battery")?,
            temperature: require(self.temperature, "temperature")?,
            traffic: self.traffic,
            distance_km: require(self.distance_km, "distance_km")?,
            vehicle_age: require(self.vehicle_age, "vehicle_age")?,
            humidity: self.humidity.unwrap_or(DEFAULT_HUMIDITY),
            wind_speed: self.wind_speed.unwrap_or(DEFAULT_WIND_SPEED),
            hour: self.hour,
            day_of_week: self.day_of_week,
            battery_capacity: self
                .battery_capacity
                .unwrap_or(DEFAULT_BATTERY_CAPACITY_KWH),
            efficiency: self.efficiency.unwrap_or(DEFAULT_EFFICIENCY_KWH_PER_KM),
        })
    }

    /// Fills `hour` and `day_of_week` from `clock` when the caller left them out.
    pub fn with_clock_defaults(mut self, clock: TripClock) -> Self {
        self.hour.get_or_insert(clock.hour);
        self.day_of_week.get_or_insert(clock.day_of_week);
        self
    }
}

/// Weather and pollutant readings; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQualityFeatures {
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub temperature: Option<f64>,
    pub cloud_cover: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostFeatures {
    pub distance_km: Option<f64>,
    pub hour: Option<u8>,
    pub day_of_week: Option<u8>,
    pub is_peak_hour: Option<bool>,
    pub is_weekend: Option<bool>,
    pub traffic_level: Option<u8>,
    pub avg_speed_kmh: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostInputs {
    pub distance_km: f64,
    pub hour: u8,
    pub day_of_week: u8,
    pub is_peak_hour: bool,
    pub is_weekend: bool,
    pub traffic_level: u8,
    pub avg_speed_kmh: f64,
}

impl CostFeatures {
    pub fn resolve(&self) -> Result<CostInputs, EngineError> {
        Ok(CostInputs {
            distance_km: require(self.distance_km, "distance_km")?,
            hour: require(self.hour, "hour")?,
            day_of_week: require(self.day_of_week, "day_of_week")?,
            is_peak_hour: self.is_peak_hour.unwrap_or(false),
            is_weekend: self.is_weekend.unwrap_or(false),
            traffic_level: self.traffic_level.unwrap_or(DEFAULT_TRAFFIC_LEVEL),
            avg_speed_kmh: require(self.avg_speed_kmh, "avg_speed_kmh")?,
        })
    }

    pub fn with_clock_defaults(mut self, clock: TripClock) -> Self {
        self.hour.get_or_insert(clock.hour);
        self.day_of_week.get_or_insert(clock.day_of_week);
        self
    }
}

impl CostInputs {
    pub fn to_vector(&self) -> [f64; 7] {
        [
            self.distance_km,
            f64::from(self.hour),
            f64::from(self.day_of_week),
            flag(self.is_peak_hour),
            flag(self.is_weekend),
            f64::from(self.traffic_level),
            self.avg_speed_kmh,
        ]
    }
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

fn require<T>(value: Option<T>, name: &'static str) -> Result<T, EngineError> {
    value.ok_or(EngineError::MissingFeature(name))
}
