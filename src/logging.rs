//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence; otherwise the level follows the configured
//! verbosity. Logs go to stderr so `--json` output on stdout stays clean.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::Verbosity;

/// Level used when `RUST_LOG` is unset.
pub fn level_for(verbosity: Verbosity) -> LevelFilter {
    match verbosity {
        Verbosity::Quiet => LevelFilter::WARN,
        Verbosity::Normal => LevelFilter::INFO,
        Verbosity::Verbose => LevelFilter::DEBUG,
        Verbosity::Debug => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(Verbosity::Quiet), LevelFilter::WARN);
        assert_eq!(level_for(Verbosity::Normal), LevelFilter::INFO);
        assert_eq!(level_for(Verbosity::Verbose), LevelFilter::DEBUG);
        assert_eq!(level_for(Verbosity::Debug), LevelFilter::TRACE);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(Verbosity::Normal);
        init(Verbosity::Debug);
    }
}
