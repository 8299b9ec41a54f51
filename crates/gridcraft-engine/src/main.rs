//! Headless driver for the Gridcraft simulation.
//!
//! An external planner writes one JSON command per line on stdin and reads
//! one JSON response per line from stdout. Logs go to stderr so they never
//! interleave with the protocol stream.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `gridcraft-config.yaml` (or `GRIDCRAFT_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Validate the rule table and place the first episode
//! 4. Serve commands until stdin closes

mod error;
mod protocol;

use std::path::PathBuf;

use gridcraft_core::{ActionExecutor, SharedWorld, SimulationConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Environment variable overriding the config file path.
const CONFIG_ENV: &str = "GRIDCRAFT_CONFIG";

/// Config file looked up in the working directory by default.
const DEFAULT_CONFIG: &str = "gridcraft-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the first reset, or stdio fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, source) = load_config()?;

    init_tracing(&config);

    match &source {
        Some(path) => info!(path = %path.display(), "Config file loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        width = config.world.width,
        height = config.world.height,
        seed = config.world.seed,
        agents = config.population.agents,
        "Configuration resolved"
    );

    let executor = ActionExecutor::from_config(&config).map_err(EngineError::from)?;
    let world = SharedWorld::new(executor);

    let served = serve(&world).await?;
    info!(lines = served, "stdin closed, shutting down");
    Ok(())
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(config: &SimulationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Read commands until EOF, answering each on stdout.
async fn serve(world: &SharedWorld) -> Result<u64, EngineError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut served: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = protocol::handle_line(world, &line).await;
        let mut encoded = serde_json::to_string(&response)?;
        encoded.push('\n');
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.flush().await?;
        served = served.saturating_add(1);
    }
    Ok(served)
}

/// Load simulation configuration.
///
/// Uses `GRIDCRAFT_CONFIG` when set, otherwise `gridcraft-config.yaml`.
/// Falls back to defaults if the file does not exist. The path actually
/// read is returned so it can be logged once the subscriber is up.
fn load_config() -> Result<(SimulationConfig, Option<PathBuf>), EngineError> {
    let config_path = std::env::var_os(CONFIG_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    if config_path.exists() {
        let config = SimulationConfig::from_file(&config_path)?;
        Ok((config, Some(config_path)))
    } else {
        Ok((SimulationConfig::default(), None))
    }
}
