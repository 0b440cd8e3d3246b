//! Trip emissions and eco-score formulas.

use crate::planner::{ChargingStation, GeoPoint};
use serde::{Deserialize, Serialize};

pub const PETROL_EMISSION_KG_PER_KM: f64 = 0.23;
pub const CO2_KG_PER_TREE_PER_YEAR: f64 = 25.0;
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_GRID_INTENSITY: f64 = 700.0;
/// Tariff (per kWh) that station savings are measured against.
pub const REFERENCE_TARIFF_PER_KWH: f64 = 14.0;
const REFERENCE_CHARGE_KWH: f64 = 50.0;

const BASE_SCORE: u32 = 50;
const MAX_SCORE: u32 = 100;

/// Grams of CO2 emitted generating the energy for a trip.
pub fn co2_generated(distance_km: f64, grid_intensity_g_per_kwh: f64, efficiency_kwh_per_km: f64) -> f64 {
    distance_km * efficiency_kwh_per_km * grid_intensity_g_per_kwh
}

/// Grams of CO2 a petrol car would have emitted over the same distance.
pub fn co2_saved(distance_km: f64, petrol_emission_kg_per_km: f64) -> f64 {
    distance_km * petrol_emission_kg_per_km * 1000.0
}

/// Trees needed for a year to absorb `co2_grams`.
pub fn trees_needed(co2_grams: f64) -> f64 {
    co2_grams / 1000.0 / CO2_KG_PER_TREE_PER_YEAR
}

pub fn haversine_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub distance_km: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub start_battery_percent: Option<f64>,
    pub end_battery_percent: Option<f64>,
    pub temperature_celsius: Option<f64>,
}

/// 0-100 rating: base 50 plus driving, battery and weather bonuses for the
/// inputs that are present.
///
/// A term counts whenever its fields are `Some`, so a 0 °C trip or one that
/// ends at 0% is still scored. Only a non-positive duration is skipped.
pub fn eco_score(trip: &TripSummary) -> u32 {
    let mut score = BASE_SCORE;

    if let (Some(distance), Some(duration)) = (trip.distance_km, trip.duration_minutes) {
        // A zero-length trip has no average speed.
        if duration > 0.0 {
            let avg_speed = distance / duration * 60.0;
            score += if (40.0..=80.0).contains(&avg_speed) {
                20
            } else if (30.0..=100.0).contains(&avg_speed) {
                15
            } else {
                5
            };
        }
    }

    if let (Some(start), Some(end)) = (trip.start_battery_percent, trip.end_battery_percent) {
        let used = start - end;
        score += if used < 50.0 {
            15
        } else if used < 70.0 {
            10
        } else {
            5
        };
    }

    if let Some(temperature) = trip.temperature_celsius {
        score += if (15.0..=30.0).contains(&temperature) {
            15
        } else {
            5
        };
    }

    score.min(MAX_SCORE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTier {
    PlanetGuardian,
    ClimateChampion,
    EcoLearner,
}

impl BadgeTier {
    /// Tier earned by an average eco score, if any.
    pub fn for_average(average: f64) -> Option<Self> {
        if average >= 90.0 {
            Some(BadgeTier::PlanetGuardian)
        } else if average >= 80.0 {
            Some(BadgeTier::ClimateChampion)
        } else if average >= 70.0 {
            Some(BadgeTier::EcoLearner)
        } else {
            None
        }
    }

    pub fn badges(self) -> [&'static str; 2] {
        match self {
            BadgeTier::PlanetGuardian => ["Planet Guardian", "Carbon Hero"],
            BadgeTier::ClimateChampion => ["Climate Champion", "Green Driver"],
            BadgeTier::EcoLearner => ["Eco Learner", "Tree Planter"],
        }
    }
}

/// Mean of the scored trips. Unscored trips (0) are left out; with none
/// scored the average is 0.
pub fn average_eco_score(scores: &[u32]) -> f64 {
    let scored: Vec<f64> = scores
        .iter()
        .filter(|s| **s > 0)
        .map(|s| f64::from(*s))
        .collect();
    if scored.is_empty() {
        0.0
    } else {
        scored.iter().sum::<f64>() / scored.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationScore {
    pub station_id: u32,
    pub station_name: String,
    pub eco_score: i64,
    pub cost_per_kwh: f64,
    pub availability: u32,
    pub cost_saving: f64,
}

/// Blends grid cleanliness (40%), price (30%) and free chargers (30%).
pub fn charging_station_score(station: &ChargingStation, carbon_intensity: Option<f64>) -> StationScore {
    let intensity = carbon_intensity.unwrap_or(DEFAULT_GRID_INTENSITY);
    let eco = 100.0 - (intensity - 300.0) / 5.0;
    let cost = 100.0 - station.cost_per_kwh * 5.0;
    let availability = if station.total_chargers == 0 {
        0.0
    } else {
        f64::from(station.available_chargers) / f64::from(station.total_chargers) * 100.0
    };
    let blended = eco * 0.4 + cost * 0.3 + availability * 0.3;

    StationScore {
        station_id: station.id,
        station_name: station.name.clone(),
        eco_score: blended.trunc() as i64,
        cost_per_kwh: station.cost_per_kwh,
        availability: station.available_chargers,
        cost_saving: (station.cost_per_kwh - REFERENCE_TARIFF_PER_KWH) * REFERENCE_CHARGE_KWH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn co2_generated_multiplies_energy_by_intensity() {
        assert!((co2_generated(100.0, 700.0, 0.14) - 9800.0).abs() < 1e-6);
    }

    #[test]
    fn co2_saved_converts_to_grams() {
        assert!((co2_saved(10.0, PETROL_EMISSION_KG_PER_KM) - 2300.0).abs() < 1e-6);
    }

    #[test]
    fn trees_needed_uses_yearly_absorption() {
        assert_eq!(trees_needed(50_000.0), 2.0);
    }

    #[test]
    fn haversine_mumbai_to_pune() {
        let mumbai = GeoPoint { lat: 19.0760, lon: 72.8777 };
        let pune = GeoPoint { lat: 18.5204, lon: 73.8567 };

        let km = haversine_km(&mumbai, &pune);

        assert!((km - 120.0).abs() < 5.0, "got {km}");
        assert_eq!(haversine_km(&mumbai, &mumbai), 0.0);
    }

    #[test]
    fn ideal_trip_is_capped_at_hundred() {
        let trip = TripSummary {
            distance_km: Some(30.0),
            duration_minutes: Some(40.0),
            start_battery_percent: Some(80.0),
            end_battery_percent: Some(70.0),
            temperature_celsius: Some(22.0),
        };

        assert_eq!(eco_score(&trip), 100);
    }

    #[test]
    fn empty_trip_scores_base() {
        assert_eq!(eco_score(&TripSummary::default()), 50);
    }

    #[test]
    fn missing_inputs_are_omitted_not_penalized() {
        let trip = TripSummary {
            temperature_celsius: Some(35.0),
            ..TripSummary::default()
        };

        assert_eq!(eco_score(&trip), 55);
    }

    #[test]
    fn speed_bands() {
        let at_speed = |kmh: f64| {
            eco_score(&TripSummary {
                distance_km: Some(kmh),
                duration_minutes: Some(60.0),
                ..TripSummary::default()
            })
        };

        assert_eq!(at_speed(40.0), 70);
        assert_eq!(at_speed(80.0), 70);
        assert_eq!(at_speed(30.0), 65);
        assert_eq!(at_speed(100.0), 65);
        assert_eq!(at_speed(120.0), 55);
        assert_eq!(at_speed(10.0), 55);
    }

    #[test]
    fn battery_bands() {
        let used = |start: f64, end: f64| {
            eco_score(&TripSummary {
                start_battery_percent: Some(start),
                end_battery_percent: Some(end),
                ..TripSummary::default()
            })
        };

        assert_eq!(used(100.0, 51.0), 65);
        assert_eq!(used(100.0, 40.0), 60);
        assert_eq!(used(100.0, 20.0), 55);
    }

    #[test]
    fn zero_duration_skips_speed_term() {
        let trip = TripSummary {
            distance_km: Some(10.0),
            duration_minutes: Some(0.0),
            ..TripSummary::default()
        };

        assert_eq!(eco_score(&trip), 50);
    }

    #[test]
    fn zero_readings_still_score() {
        let trip = TripSummary {
            start_battery_percent: Some(40.0),
            end_battery_percent: Some(0.0),
            temperature_celsius: Some(0.0),
            ..TripSummary::default()
        };

        // battery used 40 -> +15, temperature outside 15-30 -> +5
        assert_eq!(eco_score(&trip), 70);
    }

    #[test]
    fn badge_tiers_have_inclusive_floors() {
        assert_eq!(BadgeTier::for_average(90.0), Some(BadgeTier::PlanetGuardian));
        assert_eq!(BadgeTier::for_average(89.9), Some(BadgeTier::ClimateChampion));
        assert_eq!(BadgeTier::for_average(80.0), Some(BadgeTier::ClimateChampion));
        assert_eq!(BadgeTier::for_average(70.0), Some(BadgeTier::EcoLearner));
        assert_eq!(BadgeTier::for_average(69.9), None);
        assert_eq!(
            BadgeTier::EcoLearner.badges(),
            ["Eco Learner", "Tree Planter"]
        );
    }

    #[test]
    fn average_skips_unscored_trips() {
        assert_eq!(average_eco_score(&[90, 0, 70]), 80.0);
        assert_eq!(average_eco_score(&[0, 0]), 0.0);
        assert_eq!(average_eco_score(&[]), 0.0);
    }

    #[test]
    fn station_score_blends_components() {
        let station = ChargingStation {
            id: 4,
            name: "Bandra Hub".to_string(),
            lat: 19.05,
            lon: 72.84,
            cost_per_kwh: 12.0,
            available_chargers: 3,
            total_chargers: 4,
        };

        let score = charging_station_score(&station, Some(500.0));

        // eco 60, cost 40, availability 75 -> 24 + 12 + 22.5 = 58.5
        assert_eq!(score.eco_score, 58);
        assert_eq!(score.cost_saving, -100.0);
        assert_eq!(score.availability, 3);
    }

    #[test]
    fn station_without_chargers_has_no_availability() {
        let station = ChargingStation {
            id: 1,
            name: String::new(),
            lat: 0.0,
            lon: 0.0,
            cost_per_kwh: 0.0,
            available_chargers: 0,
            total_chargers: 0,
        };

        let score = charging_station_score(&station, None);

        // eco 20, cost 100 -> 8 + 30 = 38
        assert_eq!(score.eco_score, 38);
    }
}
