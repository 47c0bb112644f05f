//! Command handlers for the CLI

pub mod config;
pub mod remount;
pub mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use usbshare::config::{load_layered, LoadedConfig};
use usbshare::ResyncEvent;

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub config: Option<PathBuf>,
    pub json: bool,
    pub verbose: u8,
}

/// Resolve configuration and install logging.
///
/// Logging is initialised from the resolved verbosity, so config problems
/// found while loading are reported through it afterwards.
pub fn load(globals: &Globals) -> Result<LoadedConfig> {
    let loaded = load_layered(globals.config.as_deref());

    let verbosity = match &loaded {
        Ok(loaded) => loaded.config.output.verbosity,
        Err(_) => Default::default(),
    };
    usbshare::logging::init(verbosity.bumped(globals.verbose));

    let loaded = loaded.context("failed to load configuration")?;
    match &loaded.source {
        Some(path) => tracing::debug!(path = %path.display(), "Loaded config"),
        None => tracing::debug!("No config file found, using defaults"),
    }
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }
    Ok(loaded)
}

/// Print a controller event as NDJSON or a log line.
pub fn emit(json: bool, event: &ResyncEvent) {
    if json {
        println!("{}", event.to_json_line(Utc::now()));
        return;
    }

    match event {
        ResyncEvent::Started { path, settle_ms } => {
            tracing::info!(path = %path, settle_ms, "usbshare started");
        }
        ResyncEvent::Remounted { failed_steps: 0 } => tracing::info!("Device reset complete"),
        ResyncEvent::Remounted { failed_steps } => {
            tracing::warn!(failed_steps, "Device reset finished with failures");
        }
        ResyncEvent::ChangesPending { .. } => {
            tracing::info!("Changes detected, waiting for writes to settle");
        }
        ResyncEvent::ResyncStarted { quiet_ms } => tracing::debug!(quiet_ms, "Resync started"),
        // Already logged at error level by the controller.
        ResyncEvent::StepFailed { .. } => {}
        ResyncEvent::ResyncComplete {
            failed_steps,
            dirty_again,
        } => {
            if *failed_steps > 0 {
                tracing::warn!(failed_steps, "Share remounted with failures");
            } else {
                tracing::info!("Share remounted");
            }
            if *dirty_again {
                tracing::info!("More changes arrived during the remount, waiting again");
            }
        }
        ResyncEvent::Shutdown { .. } => tracing::info!("Shut down"),
    }
}
