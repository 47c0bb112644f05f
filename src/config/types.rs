//! Configuration type definitions

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ChangeKind, EventFilter, ResyncCommand};
use crate::error::{UsbShareError, UsbShareResult};

/// Default directory shared over USB
pub const DEFAULT_WATCH_PATH: &str = "/mnt/usb_share";

/// Watch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_watch_path")]
    pub path: PathBuf,

    /// Change kinds that make the share dirty
    #[serde(default = "default_events")]
    pub events: Vec<ChangeKind>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            path: default_watch_path(),
            events: default_events(),
        }
    }
}

fn default_watch_path() -> PathBuf {
    PathBuf::from(DEFAULT_WATCH_PATH)
}

fn default_events() -> Vec<ChangeKind> {
    ChangeKind::DEFAULT_ACTIONABLE.to_vec()
}

/// Timing configuration, all in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Quiet period after the last change before a resync
    #[serde(default = "default_settle_secs")]
    pub settle_secs: f64,

    /// How often the dirty state is checked
    #[serde(default = "default_poll_secs")]
    pub poll_secs: f64,

    /// Pause between unmount, sync and mount
    #[serde(default = "default_pause_secs")]
    pub pause_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_secs: default_settle_secs(),
            poll_secs: default_poll_secs(),
            pause_secs: default_pause_secs(),
        }
    }
}

fn default_settle_secs() -> f64 {
    5.0
}

fn default_poll_secs() -> f64 {
    1.0
}

fn default_pause_secs() -> f64 {
    1.0
}

/// Shell command lines for the device operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandsConfig {
    #[serde(default = "default_mount")]
    pub mount: String,

    #[serde(default = "default_unmount")]
    pub unmount: String,

    #[serde(default = "default_sync")]
    pub sync: String,
}

impl CommandsConfig {
    pub fn line(&self, command: ResyncCommand) -> &str {
        match command {
            ResyncCommand::Mount => &self.mount,
            ResyncCommand::Unmount => &self.unmount,
            ResyncCommand::Sync => &self.sync,
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            mount: default_mount(),
            unmount: default_unmount(),
            sync: default_sync(),
        }
    }
}

fn default_mount() -> String {
    "sudo /sbin/modprobe g_multi file=/piusb.bin stall=0 removable=1".to_string()
}

fn default_unmount() -> String {
    "sudo /sbin/modprobe g_multi -r".to_string()
}

fn default_sync() -> String {
    "sync".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "debug" => Some(Verbosity::Debug),
            _ => None,
        }
    }

    /// Raise the level by `count` `-v` flags.
    pub fn bumped(self, count: u8) -> Self {
        match (self as u8).saturating_add(count) {
            0 => Verbosity::Quiet,
            1 => Verbosity::Normal,
            2 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub commands: CommandsConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> UsbShareResult<()> {
        self.settle()?;
        self.pause()?;
        if self.poll()?.is_zero() {
            return Err(invalid("timing.poll_secs", "must be greater than zero"));
        }
        if self.watch.events.is_empty() {
            return Err(invalid("watch.events", "must list at least one change kind"));
        }
        Ok(())
    }

    pub fn settle(&self) -> UsbShareResult<Duration> {
        seconds("timing.settle_secs", self.timing.settle_secs)
    }

    pub fn poll(&self) -> UsbShareResult<Duration> {
        seconds("timing.poll_secs", self.timing.poll_secs)
    }

    pub fn pause(&self) -> UsbShareResult<Duration> {
        seconds("timing.pause_secs", self.timing.pause_secs)
    }

    pub fn event_filter(&self) -> EventFilter {
        EventFilter::new(self.watch.events.iter().copied())
    }

    /// Render as TOML, as written to disk.
    pub fn to_toml(&self) -> UsbShareResult<String> {
        toml::to_string_pretty(self).map_err(|e| UsbShareError::InvalidConfig {
            key: "config".to_string(),
            message: e.to_string(),
        })
    }
}

fn seconds(key: &str, value: f64) -> UsbShareResult<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| invalid(key, &format!("{} is not a valid number of seconds", value)))
}

fn invalid(key: &str, message: &str) -> UsbShareError {
    UsbShareError::InvalidConfig {
        key: key.to_string(),
        message: message.to_string(),
    }
}
