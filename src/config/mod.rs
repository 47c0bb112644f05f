//! Configuration module for usbshare
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (USBSHARE_*)
//! 3. Config file (`--config`, /etc/usbshare/config.toml, ~/.config/usbshare/config.toml)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{
    apply_env_overrides, default_config_paths, load_layered, LoadedConfig, SYSTEM_CONFIG_PATH,
};
pub use types::{
    CommandsConfig, Config, OutputConfig, TimingConfig, Verbosity, WatchConfig,
    DEFAULT_WATCH_PATH,
};
