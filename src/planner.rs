//! Greedy multi-stop charging plan.
//!
//! Distances here are Euclidean in degrees of (lat, lon). The planner only
//! orders coarse candidate stops; it does not produce road geometry.

use crate::error::EngineError;
use crate::validation::{validate_battery, validate_coordinates};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_NEAR_DESTINATION_DEG: f64 = 5.0;
pub const FULL_CHARGE_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn degrees_to(&self, other: &GeoPoint) -> f64 {
        ((self.lat - other.lat).powi(2) + (self.lon - other.lon).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    pub battery_percent: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RawPosition {
    lat: f64,
    lon: f64,
    battery_percent: f64,
}

impl TryFrom<RawPosition> for Position {
    type Error = EngineError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::new(raw.lat, raw.lon, raw.battery_percent)
    }
}

impl Position {
    pub fn new(lat: f64, lon: f64, battery_percent: f64) -> Result<Self, EngineError> {
        validate_coordinates(lat, lon)?;
        validate_battery(battery_percent)?;
        Ok(Self {
            lat,
            lon,
            battery_percent,
        })
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub cost_per_kwh: f64,
    #[serde(default)]
    pub available_chargers: u32,
    #[serde(default)]
    pub total_chargers: u32,
}

impl ChargingStation {
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteStop {
    Start(Position),
    Station(ChargingStation),
    Destination(GeoPoint),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiStopPlanner {
    near_destination_deg: f64,
}

impl Default for MultiStopPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_NEAR_DESTINATION_DEG)
    }
}

impl MultiStopPlanner {
    pub fn new(near_destination_deg: f64) -> Self {
        Self {
            near_destination_deg,
        }
    }

    fn near_destination(&self, current: &GeoPoint, destination: &GeoPoint) -> bool {
        current.degrees_to(destination) < self.near_destination_deg
    }

    /// Builds `[start, station..., destination]`. Each step takes the unused
    /// station nearest the destination and recharges to full there. When no
    /// station is left the destination is appended anyway.
    pub fn plan(
        &self,
        start: Position,
        destination: GeoPoint,
        stations: &[ChargingStation],
    ) -> Vec<RouteStop> {
        let mut remaining: Vec<&ChargingStation> = stations.iter().collect();
        remaining.sort_by(|a, b| {
            a.point()
                .degrees_to(&destination)
                .total_cmp(&b.point().degrees_to(&destination))
        });
        let mut remaining = remaining.into_iter();

        let mut route = vec![RouteStop::Start(start)];
        let mut current = start.point();
        let mut battery = start.battery_percent;

        while !self.near_destination(&current, &destination) {
            let Some(station) = remaining.next() else {
                debug!(battery, "No charging station left before destination");
                break;
            };
            route.push(RouteStop::Station(station.clone()));
            current = station.point();
            battery = FULL_CHARGE_PERCENT;
        }

        route.push(RouteStop::Destination(destination));
        route
    }
}
