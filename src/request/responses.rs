use crate::candidates::EstimatedRoute;
use crate::eco::{BadgeTier, StationScore};
use crate::planner::RouteStop;
use crate::predictors::PredictionResult;
use crate::predictors::air_quality::AirQualityPrediction;
use crate::predictors::range::RangeAdvice;
use crate::route::{RouteId, ScoredRoute};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EngineResponse {
    Success(SuccessResponse),
    Error(ErrorResponse),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SuccessResponse {
    pub result: EngineResult,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ErrorResponse {
    pub error_code: ErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingFeature,
    InvalidInput,
    InvalidWeights,
    ModelUnavailable,
    InternalError,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum EngineResult {
    PredictRange {
        #[serde(flatten)]
        prediction: PredictionResult,
        recommendation: RangeAdvice,
    },
    PredictAirQuality(AirQualityPrediction),
    PredictCost { cost: f64 },
    OptimalChargingTime { best_hour: u8 },
    OptimizeRoute {
        best_route_id: RouteId,
        ranking: Vec<ScoredRoute>,
    },
    RecommendRoutes { routes: Vec<EstimatedRoute> },
    MultiStopRoute { stops: Vec<RouteStop> },
    EcoScore {
        eco_score: u32,
        co2_saved_grams: Option<f64>,
    },
    EcoDashboard {
        average_eco_score: f64,
        tier: Option<BadgeTier>,
        badges: Vec<&'static str>,
        total_trees_equivalent: f64,
    },
    ChargingStationScore(StationScore),
}
