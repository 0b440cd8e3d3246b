use crate::error::EngineError;

pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), EngineError> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!(
            "invalid coordinates ({lat}, {lon})"
        )))
    }
}

pub fn validate_battery(battery_percent: f64) -> Result<(), EngineError> {
    if (0.0..=100.0).contains(&battery_percent) {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!(
            "battery must be between 0-100%, got {battery_percent}"
        )))
    }
}

pub fn validate_distance(distance_km: f64) -> Result<(), EngineError> {
    if distance_km > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!(
            "distance must be positive, got {distance_km}"
        )))
    }
}
