//! Command-line runner for the Scholar research progression engine.
//!
//! Validates research content at startup and, when an event log is
//! configured, replays it and prints the resulting unlock events.
//!
//! # Startup Sequence
//!
//! 1. Resolve the config path (first argument, then `SCHOLAR_CONFIG`, then
//!    `scholar-config.yaml`) and load it
//! 2. Initialize structured logging (tracing)
//! 3. Load and validate papers and research sets; abort with a diagnostic
//!    naming the offending record on failure
//! 4. Build the progression engine (checks starting papers)
//! 5. Replay the event log, if any, printing unlock events as JSON lines
//! 6. Write per-context snapshots, if a snapshot directory is configured

mod error;
mod replay;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use scholar_catalog::load_content_from_files;
use scholar_engine::config::LoggingConfig;
use scholar_engine::{Campaign, ProgressionEngine, ScholarConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

const DEFAULT_CONFIG_PATH: &str = "scholar-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, content, replay or output fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = config_path();
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        config = %config_path.display(),
        papers = %config.content.papers_path.display(),
        sets = %config.content.sets_path.display(),
        strict_availability = config.engine.strict_availability,
        "scholar starting"
    );

    // 3. Load research content.
    let content = match load_content_from_files(
        &config.content.papers_path,
        &config.content.sets_path,
    ) {
        Ok(content) => content,
        Err(e) => {
            error!(error = %e, "Research content rejected");
            return Err(CliError::from(e).into());
        }
    };

    // 4. Build the engine.
    let engine = ProgressionEngine::new(Arc::new(content), config.engine.clone())
        .map_err(CliError::from)?;
    info!(
        technologies = engine.content().registry().technologies().count(),
        starting_papers = config.engine.starting_papers.len(),
        "Progression engine ready"
    );

    // 5. Replay the event log.
    let Some(events_path) = &config.replay.events_path else {
        info!("No event log configured, content check complete");
        return Ok(());
    };
    let events = replay::read_events(events_path)?;
    let mut campaign = Campaign::new(engine);
    let unlocks = campaign.replay(&events);
    replay::write_unlocks(&unlocks, std::io::stdout().lock())?;

    // 6. Write snapshots.
    if let Some(dir) = &config.replay.snapshot_dir {
        replay::write_snapshots(&campaign, dir)?;
    }

    info!(
        events = events.len(),
        contexts = campaign.len(),
        unlocks = unlocks.len(),
        "scholar finished"
    );
    Ok(())
}

/// The config path from the first argument, `SCHOLAR_CONFIG`, or the
/// default file name.
fn config_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("SCHOLAR_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration, falling back to defaults when the default file is
/// absent. An explicitly named file must exist.
fn load_config(path: &Path) -> Result<ScholarConfig, CliError> {
    if path.exists() || path != Path::new(DEFAULT_CONFIG_PATH) {
        Ok(ScholarConfig::from_file(path)?)
    } else {
        Ok(ScholarConfig::default())
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}
