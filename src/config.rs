use crate::planner::DEFAULT_NEAR_DESTINATION_DEG;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
pub const DEFAULT_LOG_LEVEL: Level = Level::INFO;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub models: ModelsSection,
    #[serde(default)]
    pub planner: Option<PlannerSection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSection {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSection {
    pub level: String,
}

/// Paths to trained model artifacts. Unset or empty paths run the
/// corresponding predictor on its formula.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ModelsSection {
    pub range_path: Option<PathBuf>,
    pub air_quality_path: Option<PathBuf>,
    pub charging_cost_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlannerSection {
    /// Euclidean distance in degrees treated as "arrived" (default: 5.0)
    pub near_destination_threshold_deg: Option<f64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn load_default() -> Result<Config, ConfigError> {
    load_from_path(DEFAULT_CONFIG_PATH)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

fn non_empty(path: Option<&PathBuf>) -> Option<&Path> {
    let path = path?.as_path();
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

impl ModelsSection {
    pub fn range_path(&self) -> Option<&Path> {
        non_empty(self.range_path.as_ref())
    }

    pub fn air_quality_path(&self) -> Option<&Path> {
        non_empty(self.air_quality_path.as_ref())
    }

    pub fn charging_cost_path(&self) -> Option<&Path> {
        non_empty(self.charging_cost_path.as_ref())
    }
}

impl Config {
    /// Returns the configured log level, or INFO when unset or unparsable.
    pub fn log_level(&self) -> Level {
        self.logging.level.parse().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Returns the planner arrival threshold in degrees (default: 5.0)
    pub fn near_destination_threshold_deg(&self) -> f64 {
        self.planner
            .as_ref()
            .and_then(|p| p.near_destination_threshold_deg)
            .unwrap_or(DEFAULT_NEAR_DESTINATION_DEG)
    }
}
