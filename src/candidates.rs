//! Route candidate estimation.
//!
//! Each variant stretches the straight-line distance by a fixed factor and
//! drives it at a fixed average speed. Energy, cost and emissions then follow
//! from the vehicle efficiency.

use crate::eco::{self, DEFAULT_GRID_INTENSITY};
use crate::features::DEFAULT_EFFICIENCY_KWH_PER_KM;
use crate::planner::GeoPoint;
use crate::route::{RouteCandidate, RouteId, RoutePreference};
use serde::Serialize;

/// Grid tariff per kWh used to price a candidate.
pub const TARIFF_PER_KWH: f64 = 10.0;
/// Petrol car emissions the savings are measured against.
pub const PETROL_COMPARISON_KG_PER_KM: f64 = 0.120;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteVariant {
    pub id: RouteId,
    pub name: &'static str,
    pub distance_factor: f64,
    pub avg_speed_kmh: f64,
    pub avg_aqi: f64,
}

pub const ROUTE_VARIANTS: [RouteVariant; 3] = [
    RouteVariant {
        id: 1,
        name: "Fastest via highways",
        distance_factor: 1.1,
        avg_speed_kmh: 80.0,
        avg_aqi: 65.0,
    },
    RouteVariant {
        id: 2,
        name: "Eco friendly via city roads",
        distance_factor: 0.95,
        avg_speed_kmh: 50.0,
        avg_aqi: 85.0,
    },
    RouteVariant {
        id: 3,
        name: "Clean air via green belt",
        distance_factor: 1.2,
        avg_speed_kmh: 60.0,
        avg_aqi: 45.0,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AqiBand {
    Good,
    Moderate,
    Poor,
}

impl AqiBand {
    pub fn classify(aqi: f64) -> Self {
        if aqi < 50.0 {
            AqiBand::Good
        } else if aqi < 100.0 {
            AqiBand::Moderate
        } else {
            AqiBand::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimatedRoute {
    #[serde(flatten)]
    pub candidate: RouteCandidate,
    pub name: &'static str,
    pub distance_km: f64,
    pub energy_kwh: f64,
    pub co2_saved_kg: f64,
    pub aqi_level: AqiBand,
}

pub fn estimate_route(variant: &RouteVariant, direct_km: f64, efficiency: f64) -> EstimatedRoute {
    let distance_km = direct_km * variant.distance_factor;
    let energy_kwh = distance_km * efficiency;
    let ev_kg = energy_kwh * DEFAULT_GRID_INTENSITY / 1_000_000.0;

    EstimatedRoute {
        candidate: RouteCandidate {
            id: variant.id,
            time_minutes: distance_km / variant.avg_speed_kmh * 60.0,
            cost: energy_kwh * TARIFF_PER_KWH,
            co2_grams: eco::co2_generated(distance_km, DEFAULT_GRID_INTENSITY, efficiency),
            avg_aqi: variant.avg_aqi,
        },
        name: variant.name,
        distance_km,
        energy_kwh,
        co2_saved_kg: (distance_km * PETROL_COMPARISON_KG_PER_KM - ev_kg).max(0.0),
        aqi_level: AqiBand::classify(variant.avg_aqi),
    }
}

/// One estimate per [`ROUTE_VARIANTS`] entry, in variant order.
pub fn estimate_candidates(direct_km: f64, efficiency: Option<f64>) -> Vec<EstimatedRoute> {
    let efficiency = efficiency.unwrap_or(DEFAULT_EFFICIENCY_KWH_PER_KM);
    ROUTE_VARIANTS
        .iter()
        .map(|variant| estimate_route(variant, direct_km, efficiency))
        .collect()
}

pub fn estimate_between(
    from: &GeoPoint,
    to: &GeoPoint,
    efficiency: Option<f64>,
) -> Vec<EstimatedRoute> {
    estimate_candidates(eco::haversine_km(from, to), efficiency)
}

fn preference_key(route: &EstimatedRoute, preference: RoutePreference) -> f64 {
    let c = &route.candidate;
    match preference {
        RoutePreference::Fastest => c.time_minutes,
        RoutePreference::Cheapest => c.cost,
        RoutePreference::Cleanest => c.avg_aqi,
        RoutePreference::Balanced => (c.time_minutes + c.cost / 10.0 + c.avg_aqi) / 3.0,
    }
}

/// Sorts best first by the raw metric `preference` names. Balanced blends
/// minutes, a tenth of the cost and AQI. Ties keep variant order.
pub fn rank_estimates(estimates: &mut [EstimatedRoute], preference: RoutePreference) {
    estimates.sort_by(|a, b| preference_key(a, preference).total_cmp(&preference_key(b, preference)));
}
