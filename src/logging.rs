use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::LoadedConfig;
use crate::AppResult;

/// Routes tracing output to a file so the terminal stays with the UI.
/// `FOLIO_LOG` takes precedence over the configured filter.
pub fn init(config: &LoadedConfig) -> AppResult<()> {
    if let Some(parent) = config.log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|err| format!("Failed to open log file {}: {}", config.log_file.display(), err))?;

    let filter = EnvFilter::try_from_env("FOLIO_LOG")
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|err| format!("Invalid log filter {:?}: {}", config.log_filter, err))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init()
        .map_err(|err| format!("Failed to initialise logging: {}", err))?;
    Ok(())
}
