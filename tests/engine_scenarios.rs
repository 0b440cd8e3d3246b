use batterymate_core::config::{self, ModelsSection};
use batterymate_core::eco::{self, TripSummary};
use batterymate_core::features::{AirQualityFeatures, CostFeatures, RangeFeatures, Traffic};
use batterymate_core::planner::MultiStopPlanner;
use batterymate_core::predictors::air_quality::AirQualityLevel;
use batterymate_core::predictors::charging::GridForecast;
use batterymate_core::predictors::{ModelAvailability, PredictionSource};
use batterymate_core::request::responses::{EngineResponse, EngineResult};
use batterymate_core::request::{self, EngineContext};
use batterymate_core::route::{OptimizationWeights, RouteCandidate, optimize_route};
use batterymate_core::service::PredictionService;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_artifact(name: &str, contents: &str) -> Result<PathBuf, Box<dyn Error>> {
    let unique = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let path = std::env::temp_dir().join(format!("batterymate-{name}-{unique}.json"));
    fs::write(&path, contents)?;
    Ok(path)
}

fn configured_service() -> Result<PredictionService, Box<dyn Error>> {
    let config = config::load_default()?;
    Ok(PredictionService::initialize(&config.models))
}

#[test]
fn range_fallback_scenario() -> Result<(), Box<dyn Error>> {
    let service = PredictionService::formula_only();
    let features = RangeFeatures {
        current_battery: Some(80.0),
        temperature: Some(25.0),
        traffic: Traffic::Medium,
        distance_km: Some(50.0),
        vehicle_age: Some(2.0),
        battery_capacity: Some(60.0),
        efficiency: Some(0.14),
        ..RangeFeatures::default()
    };

    let prediction = service.predict_range(&features)?;

    assert!((prediction.value - 68.33).abs() < 0.01);
    assert_eq!(prediction.confidence, 0.70);
    assert_eq!(prediction.source, PredictionSource::Fallback);
    Ok(())
}

#[test]
fn air_quality_fallback_scenario() {
    let service = PredictionService::formula_only();
    let features = AirQualityFeatures {
        pm10: Some(50.0),
        wind_speed: Some(5.0),
        ..AirQualityFeatures::default()
    };

    let prediction = service.predict_air_quality(&features);

    assert_eq!(prediction.pm25, 20.0);
    assert_eq!(prediction.level, AirQualityLevel::Moderate);
}

#[test]
fn equal_weights_pick_route_b() {
    let routes = [
        RouteCandidate {
            id: 1,
            time_minutes: 30.0,
            cost: 100.0,
            co2_grams: 5000.0,
            avg_aqi: 80.0,
        },
        RouteCandidate {
            id: 2,
            time_minutes: 35.0,
            cost: 80.0,
            co2_grams: 4000.0,
            avg_aqi: 60.0,
        },
    ];

    assert_eq!(optimize_route(&routes, &OptimizationWeights::equal()), 2);
}

#[test]
fn ideal_trip_scores_hundred() {
    let trip = TripSummary {
        distance_km: Some(30.0),
        duration_minutes: Some(40.0),
        start_battery_percent: Some(80.0),
        end_battery_percent: Some(70.0),
        temperature_celsius: Some(22.0),
    };

    assert_eq!(eco::eco_score(&trip), 100);
}

#[test]
fn shipped_cost_model_loads_and_prices_trips() -> Result<(), Box<dyn Error>> {
    let service = configured_service()?;
    let features = CostFeatures {
        distance_km: Some(30.0),
        hour: Some(18),
        day_of_week: Some(2),
        is_peak_hour: Some(true),
        is_weekend: Some(false),
        traffic_level: Some(2),
        avg_speed_kmh: Some(35.0),
    };

    let cost = service.predict_cost(&features)?;

    assert_eq!(service.availability().charging_cost, ModelAvailability::Loaded);
    // base 8 + mid distance 45 + peak 18 + heavy traffic 6
    assert_eq!(cost, 77.0);
    Ok(())
}

#[test]
fn shipped_cost_model_skips_evening_peak() -> Result<(), Box<dyn Error>> {
    let service = configured_service()?;

    let best = service.find_optimal_charging_time(17, 4, 30.0, &GridForecast::constant(700.0))?;

    assert_eq!(best, 20);
    Ok(())
}

#[test]
fn clean_grid_hour_wins_charging_search() -> Result<(), Box<dyn Error>> {
    let service = configured_service()?;
    let mut hourly = [700.0; 24];
    hourly[3] = 200.0;

    let best = service.find_optimal_charging_time(17, 4, 30.0, &GridForecast::new(hourly))?;

    assert_eq!(best, 3);
    Ok(())
}

#[test]
fn wrong_width_artifact_leaves_range_unavailable() -> Result<(), Box<dyn Error>> {
    let path = temp_artifact(
        "range-narrow",
        r#"{ "model": "linear", "params": { "weights": [1.0, 2.0, 3.0] } }"#,
    )?;
    let models = ModelsSection {
        range_path: Some(path.clone()),
        ..ModelsSection::default()
    };

    let service = PredictionService::initialize(&models);
    let _ = fs::remove_file(&path);

    assert_eq!(service.availability().range, ModelAvailability::Unavailable);
    Ok(())
}

#[test]
fn unknown_artifact_kind_leaves_air_quality_unavailable() -> Result<(), Box<dyn Error>> {
    let path = temp_artifact(
        "air-quality-unknown",
        r#"{ "model": "neural_net", "params": {} }"#,
    )?;
    let models = ModelsSection {
        air_quality_path: Some(path.clone()),
        ..ModelsSection::default()
    };

    let service = PredictionService::initialize(&models);
    let _ = fs::remove_file(&path);

    assert_eq!(
        service.availability().air_quality,
        ModelAvailability::Unavailable
    );
    let prediction = service.predict_air_quality(&AirQualityFeatures::default());
    assert_eq!(prediction.source, PredictionSource::Fallback);
    Ok(())
}

#[test]
fn linear_range_artifact_drives_model_predictions() -> Result<(), Box<dyn Error>> {
    // Predicts remaining battery as current battery minus a fifth of distance.
    let path = temp_artifact(
        "range-linear",
        r#"{
            "model": "linear",
            "feature_names": [
                "current_battery", "temperature", "traffic", "distance_km",
                "vehicle_age", "humidity", "wind_speed", "hour", "day_of_week"
            ],
            "params": { "weights": [1.0, 0.0, 0.0, -0.2, 0.0, 0.0, 0.0, 0.0, 0.0] }
        }"#,
    )?;
    let models = ModelsSection {
        range_path: Some(path.clone()),
        ..ModelsSection::default()
    };
    let service = PredictionService::initialize(&models);
    let _ = fs::remove_file(&path);
    let features = RangeFeatures {
        current_battery: Some(80.0),
        temperature: Some(25.0),
        distance_km: Some(150.0),
        vehicle_age: Some(2.0),
        hour: Some(9),
        day_of_week: Some(1),
        ..RangeFeatures::default()
    };

    let prediction = service.predict_range(&features)?;

    assert_eq!(service.availability().range, ModelAvailability::Loaded);
    assert!((prediction.value - 50.0).abs() < 1e-9);
    assert!((prediction.confidence - 0.87 * 0.95).abs() < 1e-9);
    assert_eq!(prediction.source, PredictionSource::Model);
    Ok(())
}

#[test]
fn json_request_round_trip_through_engine() -> Result<(), Box<dyn Error>> {
    let ctx = EngineContext::new(configured_service()?, MultiStopPlanner::default());
    let body = r#"{
        "operation": "charging_station_score",
        "station": {
            "id": 12,
            "name": "Andheri East",
            "lat": 19.11,
            "lon": 72.87,
            "cost_per_kwh": 12.0,
            "available_chargers": 3,
            "total_chargers": 4
        },
        "carbon_intensity": 500.0
    }"#;

    let response = request::handle_json(&ctx, body);

    match &response {
        EngineResponse::Success(success) => match &success.result {
            EngineResult::ChargingStationScore(score) => {
                assert_eq!(score.station_id, 12);
                assert_eq!(score.eco_score, 58);
            }
            other => panic!("unexpected result: {other:?}"),
        },
        EngineResponse::Error(err) => panic!("unexpected error: {err:?}"),
    }
    let value = serde_json::to_value(&response)?;
    assert_eq!(value["result"]["operation"], "charging_station_score");
    Ok(())
}
