use anyhow::{Context, Result};
use usbshare::{
    CancelToken, Config, NotifyObserver, ResyncController, ResyncOptions, ShellCommandRunner,
};

use super::{emit, load, Globals};
use crate::cli::RunArgs;

pub fn cmd_run(globals: &Globals, args: &RunArgs) -> Result<()> {
    let mut loaded = load(globals)?;
    apply_run_args(&mut loaded.config, args);

    let mut options =
        ResyncOptions::from_config(&loaded.config).context("invalid configuration")?;
    options.initial_remount = !args.no_initial_remount;

    // Set up Ctrl+C / SIGTERM handler
    let cancel = CancelToken::new();
    let on_signal = cancel.clone();
    ctrlc::set_handler(move || on_signal.cancel()).context("failed to install signal handler")?;

    let runner = ShellCommandRunner::new(loaded.config.commands.clone());
    let mut controller = ResyncController::new(options, runner, NotifyObserver::new());

    let json = globals.json;
    controller
        .run(&cancel, |event| emit(json, &event))
        .context("failed to start watching")?;

    Ok(())
}

/// CLI flags beat every other config layer.
pub(crate) fn apply_run_args(config: &mut Config, args: &RunArgs) {
    if let Some(path) = &args.path {
        config.watch.path = path.clone();
    }
    if let Some(settle) = args.settle {
        config.timing.settle_secs = settle;
    }
    if let Some(poll) = args.poll {
        config.timing.poll_secs = poll;
    }
    if let Some(pause) = args.timing.pause {
        config.timing.pause_secs = pause;
    }
}
