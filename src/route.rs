//! Multi-objective route ranking.
//!
//! Every metric is a cost: each is min-max normalized across the candidates
//! as `(v - min) / (max - min + 1)` and the weighted sum with the lowest value
//! wins. The `+ 1` keeps the denominator positive when all candidates tie.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

pub type RouteId = u32;

/// Returned by [`optimize_route`] when there are no candidates.
pub const NO_ROUTE: RouteId = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub id: RouteId,
    pub time_minutes: f64,
    pub cost: f64,
    pub co2_grams: f64,
    pub avg_aqi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutePreference {
    #[default]
    Balanced,
    Fastest,
    Cheapest,
    Cleanest,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights")]
pub struct OptimizationWeights {
    time: f64,
    cost: f64,
    carbon: f64,
    air_quality: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RawWeights {
    time: f64,
    cost: f64,
    carbon: f64,
    air_quality: f64,
}

impl TryFrom<RawWeights> for OptimizationWeights {
    type Error = EngineError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        Self::new(raw.time, raw.cost, raw.carbon, raw.air_quality)
    }
}

impl Default for OptimizationWeights {
    fn default() -> Self {
        Self::equal()
    }
}

impl OptimizationWeights {
    /// Scales the four weights so they sum to 1.
    pub fn new(time: f64, cost: f64, carbon: f64, air_quality: f64) -> Result<Self, EngineError> {
        let parts = [time, cost, carbon, air_quality];
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(EngineError::InvalidWeights);
        }
        let total: f64 = parts.iter().sum();
        if total <= 0.0 {
            return Err(EngineError::InvalidWeights);
        }
        Ok(Self {
            time: time / total,
            cost: cost / total,
            carbon: carbon / total,
            air_quality: air_quality / total,
        })
    }

    pub fn equal() -> Self {
        Self {
            time: 0.25,
            cost: 0.25,
            carbon: 0.25,
            air_quality: 0.25,
        }
    }

    /// Weight presets for the normalized scorer. Balanced is the equal split;
    /// the other presets put all weight on one metric. The raw-metric ordering
    /// of estimated routes lives in `candidates::rank_estimates`.
    pub fn for_preference(preference: RoutePreference) -> Self {
        let only = |time, cost, air_quality| Self {
            time,
            cost,
            carbon: 0.0,
            air_quality,
        };
        match preference {
            RoutePreference::Balanced => Self::equal(),
            RoutePreference::Fastest => only(1.0, 0.0, 0.0),
            RoutePreference::Cheapest => only(0.0, 1.0, 0.0),
            RoutePreference::Cleanest => only(0.0, 0.0, 1.0),
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn carbon(&self) -> f64 {
        self.carbon
    }

    pub fn air_quality(&self) -> f64 {
        self.air_quality
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRoute {
    pub id: RouteId,
    pub score: f64,
}

struct MinMax {
    min: f64,
    max: f64,
}

impl MinMax {
    fn over(routes: &[RouteCandidate], metric: fn(&RouteCandidate) -> f64) -> Self {
        routes.iter().map(metric).fold(
            MinMax {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            |acc, v| MinMax {
                min: acc.min.min(v),
                max: acc.max.max(v),
            },
        )
    }

    fn normalize(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min + 1.0)
    }
}

/// Weighted scores for every candidate in input order.
pub fn weighted_scores(routes: &[RouteCandidate], weights: &OptimizationWeights) -> Vec<f64> {
    if routes.is_empty() {
        return Vec::new();
    }

    let time = MinMax::over(routes, |r| r.time_minutes);
    let cost = MinMax::over(routes, |r| r.cost);
    let carbon = MinMax::over(routes, |r| r.co2_grams);
    let aqi = MinMax::over(routes, |r| r.avg_aqi);

    routes
        .iter()
        .map(|r| {
            weights.time * time.normalize(r.time_minutes)
                + weights.cost * cost.normalize(r.cost)
                + weights.carbon * carbon.normalize(r.co2_grams)
                + weights.air_quality * aqi.normalize(r.avg_aqi)
        })
        .collect()
}

/// Candidates ordered best first. Equal scores keep input order.
pub fn score_routes(routes: &[RouteCandidate], weights: &OptimizationWeights) -> Vec<ScoredRoute> {
    let mut scored: Vec<ScoredRoute> = routes
        .iter()
        .zip(weighted_scores(routes, weights))
        .map(|(route, score)| ScoredRoute {
            id: route.id,
            score,
        })
        .collect();
    scored.sort_by(|a, b| a.score.total_cmp(&b.score));
    scored
}

/// Id of the lowest-scoring candidate, the first one on ties, or
/// [`NO_ROUTE`] when `routes` is empty.
pub fn optimize_route(routes: &[RouteCandidate], weights: &OptimizationWeights) -> RouteId {
    let scores = weighted_scores(routes, weights);
    let mut best: Option<(usize, f64)> = None;
    for (index, score) in scores.into_iter().enumerate() {
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((index, score)),
        }
    }
    best.map_or(NO_ROUTE, |(index, _)| routes[index].id)
}
