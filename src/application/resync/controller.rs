//! Resync controller: debounce loop driving the device remount sequence

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::entities::DirtyTracker;
use crate::domain::ports::{ChangeObserver, CommandRunner, ObserverError};
use crate::domain::value_objects::ResyncCommand;
use crate::error::UsbShareResult;

use super::cancel::CancelToken;
use super::event::{ResyncEvent, ResyncOptions, ResyncReport, ResyncState, Tick};

/// Resync Controller
///
/// Owns the change observer and the command runner. The observer callback
/// marks the shared [`DirtyTracker`]; the poll loop reads it and, once the
/// tree has been quiet for the settle period, runs unmount, sync and mount
/// in that order.
pub struct ResyncController<R, O> {
    options: ResyncOptions,
    runner: R,
    observer: O,
    tracker: Arc<DirtyTracker>,
    /// Whether `ChangesPending` was already emitted for the current window
    pending_reported: bool,
}

impl<R, O> ResyncController<R, O>
where
    R: CommandRunner,
    O: ChangeObserver,
{
    pub fn new(options: ResyncOptions, runner: R, observer: O) -> Self {
        Self::with_tracker(options, runner, observer, Arc::new(DirtyTracker::new()))
    }

    /// Build around an existing tracker, e.g. one also marked by another source.
    pub fn with_tracker(
        options: ResyncOptions,
        runner: R,
        observer: O,
        tracker: Arc<DirtyTracker>,
    ) -> Self {
        Self {
            options,
            runner,
            observer,
            tracker,
            pending_reported: false,
        }
    }

    pub fn tracker(&self) -> Arc<DirtyTracker> {
        Arc::clone(&self.tracker)
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Run until `cancel` fires (blocking)
    ///
    /// Startup order: register the watch (fatal on failure), optionally
    /// unmount + mount once, then poll. On cancellation the observer is
    /// stopped and any pending change is dropped without touching the device.
    pub fn run<F>(&mut self, cancel: &CancelToken, on_event: F) -> UsbShareResult<()>
    where
        F: Fn(ResyncEvent),
    {
        on_event(ResyncEvent::Started {
            path: self.options.watch_path.display().to_string(),
            settle_ms: millis(self.options.settle),
        });

        self.start_observer()?;

        if self.options.initial_remount {
            let failed_steps = self.initial_remount(&on_event);
            on_event(ResyncEvent::Remounted { failed_steps });
        }

        while !cancel.is_cancelled() {
            self.tick(Instant::now(), &on_event);
            cancel.sleep(self.options.poll);
        }

        self.observer.stop();
        let dropped_pending = self.tracker.is_dirty();
        if dropped_pending {
            tracing::info!("Shutting down with unsynced changes; no resync performed");
        }
        on_event(ResyncEvent::Shutdown { dropped_pending });
        Ok(())
    }

    /// Register the filter-and-mark handler with the observer.
    pub fn start_observer(&mut self) -> Result<(), ObserverError> {
        let tracker = Arc::clone(&self.tracker);
        let filter = self.options.filter.clone();

        self.observer.start(
            &self.options.watch_path,
            Box::new(move |event| {
                if filter.is_actionable(&event) {
                    tracing::debug!(%event, "Change detected, marking dirty");
                    tracker.mark_dirty(Instant::now());
                } else {
                    tracing::trace!(%event, "Ignoring change");
                }
            }),
        )?;

        tracing::info!(path = %self.options.watch_path.display(), "Watching for changes");
        Ok(())
    }

    /// Where the cycle stands at `now`.
    pub fn state(&self, now: Instant) -> ResyncState {
        match self.tracker.elapsed(now) {
            None => ResyncState::Idle,
            Some(elapsed) if elapsed >= self.options.settle => ResyncState::Resyncing,
            Some(elapsed) => ResyncState::Waiting { elapsed },
        }
    }

    /// One poll: report, wait, or resync.
    pub fn tick(&mut self, now: Instant, on_event: &impl Fn(ResyncEvent)) -> Tick {
        let Some(since) = self.tracker.dirty_since() else {
            tracing::trace!("No changes detected");
            self.pending_reported = false;
            return Tick::Idle;
        };
        let elapsed = now.saturating_duration_since(since);

        if !self.pending_reported {
            self.pending_reported = true;
            on_event(ResyncEvent::ChangesPending {
                elapsed_ms: millis(elapsed),
            });
        }

        if elapsed < self.options.settle {
            tracing::debug!(elapsed_ms = millis(elapsed), "Waiting for changes to settle");
            return Tick::Waiting { elapsed };
        }

        on_event(ResyncEvent::ResyncStarted {
            quiet_ms: millis(elapsed),
        });
        let mut report = self.resync(on_event);

        // A change observed while the steps ran keeps the share dirty and
        // opens a fresh settle window.
        report.dirty_again = !self.tracker.reset_unless_newer(since);
        self.pending_reported = false;

        on_event(ResyncEvent::ResyncComplete {
            failed_steps: report.failed.len(),
            dirty_again: report.dirty_again,
        });
        Tick::Resynced(report)
    }

    /// Unmount, pause, sync, pause, mount. Failed steps are logged and the
    /// sequence carries on.
    pub fn resync(&self, on_event: &impl Fn(ResyncEvent)) -> ResyncReport {
        tracing::info!("Changes settled, remounting share");
        let mut report = ResyncReport {
            steps: Vec::with_capacity(ResyncCommand::SEQUENCE.len()),
            failed: Vec::new(),
            dirty_again: false,
        };

        for (i, command) in ResyncCommand::SEQUENCE.into_iter().enumerate() {
            if i > 0 && !self.options.pause.is_zero() {
                std::thread::sleep(self.options.pause);
            }
            if !self.run_step(command, on_event) {
                report.failed.push(command);
            }
            report.steps.push(command);
        }

        report
    }

    /// Force a known device state: unmount then mount, no sync, no pauses.
    ///
    /// Returns the number of failed steps.
    pub fn initial_remount(&self, on_event: &impl Fn(ResyncEvent)) -> usize {
        tracing::info!("Resetting device: unmount then mount");
        ResyncCommand::STARTUP
            .into_iter()
            .filter(|command| !self.run_step(*command, on_event))
            .count()
    }

    fn run_step(&self, command: ResyncCommand, on_event: &impl Fn(ResyncEvent)) -> bool {
        tracing::debug!(%command, "Running step");
        match self.runner.run(command) {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(%command, error = %err, "Step failed");
                on_event(ResyncEvent::StepFailed {
                    step: command,
                    message: err.to_string(),
                });
                false
            }
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
