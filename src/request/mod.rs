pub mod responses;

use crate::candidates;
use crate::eco::{self, BadgeTier, PETROL_EMISSION_KG_PER_KM, TripSummary};
use crate::error::EngineError;
use crate::features::{AirQualityFeatures, CostFeatures, RangeFeatures, TripClock};
use crate::planner::{ChargingStation, GeoPoint, MultiStopPlanner, Position};
use crate::predictors::charging::GridForecast;
use crate::predictors::range::RangeAdvice;
use crate::route::{self, OptimizationWeights, RouteCandidate, RoutePreference};
use crate::service::PredictionService;
use crate::validation::{validate_battery, validate_coordinates, validate_distance};
use responses::{EngineResponse, EngineResult, ErrorCode, ErrorResponse, SuccessResponse};
use serde::Deserialize;
use std::fmt;
use std::time::SystemTime;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, error, warn};

const INTERNAL_ERROR_MESSAGE: &str = "Internal engine error";

#[derive(Debug)]
enum TimestampError {
    Format(time::error::Format),
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampError::Format(err) => write!(f, "timestamp format error: {err}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum EngineRequest {
    PredictRange {
        features: RangeFeatures,
    },
    PredictAirQuality {
        #[serde(default)]
        features: AirQualityFeatures,
    },
    PredictCost {
        features: CostFeatures,
    },
    OptimalChargingTime {
        current_hour: Option<u8>,
        day_of_week: Option<u8>,
        distance_km: f64,
        grid_forecast: GridForecast,
    },
    OptimizeRoute {
        routes: Vec<RouteCandidate>,
        weights: Option<WeightValues>,
        #[serde(default)]
        preference: RoutePreference,
    },
    RecommendRoutes {
        start: GeoPoint,
        destination: GeoPoint,
        efficiency: Option<f64>,
        #[serde(default)]
        preference: RoutePreference,
    },
    MultiStopRoute {
        start: StartPoint,
        destination: GeoPoint,
        #[serde(default)]
        stations: Vec<ChargingStation>,
    },
    EcoScore {
        trip: TripSummary,
    },
    EcoDashboard {
        #[serde(default)]
        recent_scores: Vec<u32>,
        #[serde(default)]
        total_co2_saved_kg: f64,
    },
    ChargingStationScore {
        station: ChargingStation,
        carbon_intensity: Option<f64>,
    },
}

/// Caller-supplied weights, validated when the request is handled.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeightValues {
    pub time: f64,
    pub cost: f64,
    pub carbon: f64,
    pub air_quality: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StartPoint {
    pub lat: f64,
    pub lon: f64,
    pub battery_percent: f64,
}

/// Everything a request needs, built once at startup.
#[derive(Debug)]
pub struct EngineContext {
    pub service: PredictionService,
    pub planner: MultiStopPlanner,
}

impl EngineContext {
    pub fn new(service: PredictionService, planner: MultiStopPlanner) -> Self {
        Self { service, planner }
    }
}

impl From<&EngineError> for ErrorCode {
    fn from(err: &EngineError) -> Self {
        match err {
            EngineError::MissingFeature(_) => ErrorCode::MissingFeature,
            EngineError::InvalidWeights => ErrorCode::InvalidWeights,
            EngineError::InvalidForecast { .. } | EngineError::InvalidInput(_) => {
                ErrorCode::InvalidInput
            }
            EngineError::CostModelUnavailable => ErrorCode::ModelUnavailable,
            EngineError::Inference(_) => ErrorCode::InternalError,
        }
    }
}

/// Parses a JSON request and handles it against the current UTC clock.
pub fn handle_json(ctx: &EngineContext, body: &str) -> EngineResponse {
    match serde_json::from_str::<EngineRequest>(body) {
        Ok(request) => handle_request(ctx, request),
        Err(err) => {
            warn!(error = %err, "Rejected malformed request");
            error_response(ErrorCode::InvalidInput, format!("malformed request: {err}"))
        }
    }
}

pub fn handle_request(ctx: &EngineContext, request: EngineRequest) -> EngineResponse {
    match dispatch(ctx, request, TripClock::now_utc()) {
        Ok(result) => success_response(result),
        Err(EngineError::Inference(err)) => {
            error!(error = %err, "Cost model inference failed");
            internal_error(INTERNAL_ERROR_MESSAGE)
        }
        Err(err) => {
            debug!(error = %err, "Request failed");
            error_response(ErrorCode::from(&err), err.to_string())
        }
    }
}

/// Runs one operation. `clock` fills any hour or day the request left out.
pub fn dispatch(
    ctx: &EngineContext,
    request: EngineRequest,
    clock: TripClock,
) -> Result<EngineResult, EngineError> {
    match request {
        EngineRequest::PredictRange { features } => {
            if let Some(battery) = features.current_battery {
                validate_battery(battery)?;
            }
            if let Some(distance) = features.distance_km {
                validate_distance(distance)?;
            }
            let features = features.with_clock_defaults(clock);
            let prediction = ctx.service.predict_range(&features)?;
            Ok(EngineResult::PredictRange {
                prediction,
                recommendation: RangeAdvice::for_arrival(prediction.value),
            })
        }
        EngineRequest::PredictAirQuality { features } => Ok(EngineResult::PredictAirQuality(
            ctx.service.predict_air_quality(&features),
        )),
        EngineRequest::PredictCost { features } => {
            let features = features.with_clock_defaults(clock);
            let cost = ctx.service.predict_cost(&features)?;
            Ok(EngineResult::PredictCost { cost })
        }
        EngineRequest::OptimalChargingTime {
            current_hour,
            day_of_week,
            distance_km,
            grid_forecast,
        } => {
            let best_hour = ctx.service.find_optimal_charging_time(
                current_hour.unwrap_or(clock.hour),
                day_of_week.unwrap_or(clock.day_of_week),
                distance_km,
                &grid_forecast,
            )?;
            Ok(EngineResult::OptimalChargingTime { best_hour })
        }
        EngineRequest::OptimizeRoute {
            routes,
            weights,
            preference,
        } => {
            let weights = match weights {
                Some(w) => OptimizationWeights::new(w.time, w.cost, w.carbon, w.air_quality)?,
                None => OptimizationWeights::for_preference(preference),
            };
            Ok(EngineResult::OptimizeRoute {
                best_route_id: route::optimize_route(&routes, &weights),
                ranking: route::score_routes(&routes, &weights),
            })
        }
        EngineRequest::RecommendRoutes {
            start,
            destination,
            efficiency,
            preference,
        } => {
            validate_coordinates(start.lat, start.lon)?;
            validate_coordinates(destination.lat, destination.lon)?;
            let mut routes = candidates::estimate_between(&start, &destination, efficiency);
            candidates::rank_estimates(&mut routes, preference);
            Ok(EngineResult::RecommendRoutes { routes })
        }
        EngineRequest::MultiStopRoute {
            start,
            destination,
            stations,
        } => {
            let start = Position::new(start.lat, start.lon, start.battery_percent)?;
            validate_coordinates(destination.lat, destination.lon)?;
            Ok(EngineResult::MultiStopRoute {
                stops: ctx.planner.plan(start, destination, &stations),
            })
        }
        EngineRequest::EcoScore { trip } => Ok(EngineResult::EcoScore {
            eco_score: eco::eco_score(&trip),
            co2_saved_grams: trip
                .distance_km
                .map(|distance| eco::co2_saved(distance, PETROL_EMISSION_KG_PER_KM)),
        }),
        EngineRequest::EcoDashboard {
            recent_scores,
            total_co2_saved_kg,
        } => {
            let average = eco::average_eco_score(&recent_scores);
            let tier = BadgeTier::for_average(average);
            Ok(EngineResult::EcoDashboard {
                average_eco_score: average,
                tier,
                badges: tier.map(|t| t.badges().to_vec()).unwrap_or_default(),
                total_trees_equivalent: eco::trees_needed(total_co2_saved_kg * 1000.0),
            })
        }
        EngineRequest::ChargingStationScore {
            station,
            carbon_intensity,
        } => Ok(EngineResult::ChargingStationScore(
            eco::charging_station_score(&station, carbon_intensity),
        )),
    }
}

fn success_response(result: EngineResult) -> EngineResponse {
    match format_timestamp(SystemTime::now()) {
        Ok(formatted) => EngineResponse::Success(SuccessResponse {
            result,
            timestamp: formatted,
        }),
        Err(_err) => internal_error("timestamp formatting failure"),
    }
}

fn error_response(error_code: ErrorCode, error_message: String) -> EngineResponse {
    match format_timestamp(SystemTime::now()) {
        Ok(formatted) => EngineResponse::Error(ErrorResponse {
            error_code,
            error_message,
            timestamp: formatted,
        }),
        Err(_err) => internal_error("timestamp formatting failure"),
    }
}

fn internal_error(message: &str) -> EngineResponse {
    error!(message = message, "Internal error while handling request");
    let formatted = format_timestamp(SystemTime::now()).unwrap_or_else(|err| {
        error!(error = %err, "Failed to format internal error timestamp");
        "1970-01-01T00:00:00Z".to_string()
    });
    EngineResponse::Error(ErrorResponse {
        error_code: ErrorCode::InternalError,
        error_message: INTERNAL_ERROR_MESSAGE.to_string(),
        timestamp: formatted,
    })
}

fn format_timestamp(timestamp: SystemTime) -> Result<String, TimestampError> {
    let datetime = OffsetDateTime::from(timestamp);
    datetime.format(&Rfc3339).map_err(TimestampError::Format)
}
