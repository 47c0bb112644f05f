use anyhow::{bail, Context, Result};
use usbshare::{NotifyObserver, ResyncController, ResyncEvent, ResyncOptions, ShellCommandRunner};

use super::{emit, load, Globals};
use crate::cli::TimingArgs;

/// One-off unmount, sync, mount. Exits non-zero if any step failed.
pub fn cmd_remount(globals: &Globals, args: &TimingArgs) -> Result<()> {
    let mut loaded = load(globals)?;
    if let Some(pause) = args.pause {
        loaded.config.timing.pause_secs = pause;
    }

    let options = ResyncOptions::from_config(&loaded.config).context("invalid configuration")?;
    let runner = ShellCommandRunner::new(loaded.config.commands.clone());
    let controller = ResyncController::new(options, runner, NotifyObserver::new());

    let json = globals.json;
    let on_event = |event: ResyncEvent| emit(json, &event);
    on_event(ResyncEvent::ResyncStarted { quiet_ms: 0 });
    let report = controller.resync(&on_event);
    on_event(ResyncEvent::ResyncComplete {
        failed_steps: report.failed.len(),
        dirty_again: false,
    });

    if !report.is_success() {
        bail!(
            "remount finished with {} failed step(s): {}",
            report.failed.len(),
            report
                .failed
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}
