//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::{ConfigWarning, ResyncCommand};
use crate::error::{UsbShareError, UsbShareResult};

use super::types::{Config, Verbosity};

/// System-wide config file, checked before the per-user one
pub const SYSTEM_CONFIG_PATH: &str = "/etc/usbshare/config.toml";

/// Effective configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub warnings: Vec<ConfigWarning>,
    /// File the config was read from, `None` for built-in defaults
    pub source: Option<PathBuf>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> UsbShareResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| UsbShareError::ConfigFile {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Candidate config files, in lookup order.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("usbshare/config.toml"));
    }
    paths
}

/// Resolve the effective configuration.
///
/// An explicit path must exist. Otherwise the first existing default path
/// is used, falling back to built-in defaults. Environment overrides are
/// applied on top either way.
pub fn load_layered(explicit: Option<&Path>) -> UsbShareResult<LoadedConfig> {
    let source = match explicit {
        Some(path) if !path.exists() => {
            return Err(UsbShareError::ConfigNotFound {
                path: path.to_path_buf(),
            })
        }
        Some(path) => Some(path.to_path_buf()),
        None => default_config_paths().into_iter().find(|p| p.is_file()),
    };

    let (config, warnings) = match &source {
        Some(path) => load_with_warnings(path)?,
        None => (Config::default(), Vec::new()),
    };

    Ok(LoadedConfig {
        config: with_env_overrides(config),
        warnings,
        source,
    })
}

/// Apply environment variable overrides (USBSHARE_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup.
///
/// Values that do not parse are skipped with a warning.
pub fn apply_env_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    // USBSHARE_WATCH_PATH
    if let Some(path) = lookup("USBSHARE_WATCH_PATH").filter(|p| !p.trim().is_empty()) {
        config.watch.path = PathBuf::from(path);
    }

    // USBSHARE_SETTLE_SECS / POLL_SECS / PAUSE_SECS
    let timings = [
        ("USBSHARE_SETTLE_SECS", &mut config.timing.settle_secs),
        ("USBSHARE_POLL_SECS", &mut config.timing.poll_secs),
        ("USBSHARE_PAUSE_SECS", &mut config.timing.pause_secs),
    ];
    for (var, slot) in timings {
        if let Some(raw) = lookup(var) {
            match raw.trim().parse::<f64>() {
                Ok(secs) => *slot = secs,
                Err(_) => tracing::warn!(var, value = %raw, "Ignoring unparseable override"),
            }
        }
    }

    // USBSHARE_VERBOSITY
    if let Some(raw) = lookup("USBSHARE_VERBOSITY") {
        match Verbosity::parse(&raw) {
            Some(verbosity) => config.output.verbosity = verbosity,
            None => {
                tracing::warn!(var = "USBSHARE_VERBOSITY", value = %raw, "Ignoring unknown verbosity");
            }
        }
    }

    // USBSHARE_{MOUNT,UNMOUNT,SYNC}_COMMAND
    for command in ResyncCommand::SEQUENCE {
        let var = format!("USBSHARE_{}_COMMAND", command.as_str().to_uppercase());
        if let Some(line) = lookup(&var) {
            match command {
                ResyncCommand::Mount => config.commands.mount = line,
                ResyncCommand::Unmount => config.commands.unmount = line,
                ResyncCommand::Sync => config.commands.sync = line,
            }
        }
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "watch",
        "path",
        "events",
        "timing",
        "settle_secs",
        "poll_secs",
        "pause_secs",
        "commands",
        "mount",
        "unmount",
        "sync",
        "output",
        "verbosity",
    ];

    let mut best: Option<(&str, usize)> = None;
    for &candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
