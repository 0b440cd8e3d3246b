use batterymate_core::config;
use batterymate_core::planner::MultiStopPlanner;
use batterymate_core::request::{self, EngineContext};
use batterymate_core::service::PredictionService;
use std::io::Read;
use tracing::Level;

fn init_tracing(level: Level) {
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Reads one JSON request from the file named by the first argument, or from
/// stdin, and prints the JSON response on stdout.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_default()?;
    init_tracing(config.log_level());
    tracing::info!(
        config_path = config::DEFAULT_CONFIG_PATH,
        app = %config.app.name,
        "batterymate-core starting"
    );

    let service = PredictionService::initialize(&config.models);
    let planner = MultiStopPlanner::new(config.near_destination_threshold_deg());
    let ctx = EngineContext::new(service, planner);

    let body = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            body
        }
    };

    let response = request::handle_json(&ctx, &body);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
