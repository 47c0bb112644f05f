//! Resync event types and options

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::config::{Config, DEFAULT_WATCH_PATH};
use crate::domain::value_objects::{EventFilter, ResyncCommand};
use crate::error::UsbShareResult;

/// Resync options
#[derive(Debug, Clone)]
pub struct ResyncOptions {
    /// Root of the shared tree
    pub watch_path: PathBuf,
    /// Quiet period required after the last change
    pub settle: Duration,
    /// Dirty-state check interval
    pub poll: Duration,
    /// Pause between the steps of a resync
    pub pause: Duration,
    /// Which changes count
    pub filter: EventFilter,
    /// Unmount and mount once before watching
    pub initial_remount: bool,
}

impl ResyncOptions {
    pub fn from_config(config: &Config) -> UsbShareResult<Self> {
        config.validate()?;
        Ok(Self {
            watch_path: config.watch.path.clone(),
            settle: config.settle()?,
            poll: config.poll()?,
            pause: config.pause()?,
            filter: config.event_filter(),
            initial_remount: true,
        })
    }
}

impl Default for ResyncOptions {
    fn default() -> Self {
        Self {
            watch_path: PathBuf::from(DEFAULT_WATCH_PATH),
            settle: Duration::from_secs(5),
            poll: Duration::from_secs(1),
            pause: Duration::from_secs(1),
            filter: EventFilter::default(),
            initial_remount: true,
        }
    }
}

/// Controller lifecycle events, rendered as log lines or NDJSON
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ResyncEvent {
    Started {
        path: String,
        settle_ms: u64,
    },
    /// Startup unmount + mount finished
    Remounted {
        failed_steps: usize,
    },
    /// Share went from clean to dirty
    ChangesPending {
        elapsed_ms: u64,
    },
    ResyncStarted {
        quiet_ms: u64,
    },
    StepFailed {
        step: ResyncCommand,
        message: String,
    },
    ResyncComplete {
        failed_steps: usize,
        /// Another change landed while the steps ran
        dirty_again: bool,
    },
    Shutdown {
        dropped_pending: bool,
    },
}

impl ResyncEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// One NDJSON line with an RFC 3339 timestamp.
    pub fn to_json_line(&self, at: DateTime<Utc>) -> String {
        #[derive(Serialize)]
        struct Stamped<'a> {
            at: String,
            #[serde(flatten)]
            event: &'a ResyncEvent,
        }

        serde_json::to_string(&Stamped {
            at: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            event: self,
        })
        .unwrap_or_else(|_| "{}".to_string())
    }
}

/// Where the controller is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResyncState {
    /// Nothing changed since the last resync
    Idle,
    /// Dirty, still inside the settle window
    Waiting { elapsed: Duration },
    /// Settle window passed; the next tick runs the sequence
    Resyncing,
}

/// Outcome of one unmount/sync/mount cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResyncReport {
    /// Steps in the order they ran
    pub steps: Vec<ResyncCommand>,
    pub failed: Vec<ResyncCommand>,
    /// Tracker stayed dirty because of a change during the cycle
    pub dirty_again: bool,
}

impl ResyncReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of a single poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Waiting { elapsed: Duration },
    Resynced(ResyncReport),
}
