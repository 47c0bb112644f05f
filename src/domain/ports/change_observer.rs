//! ChangeObserver port - recursive filesystem change notifications
//!
//! Implementations deliver every observed mutation under a root to a single
//! registered handler. Delivery is asynchronous, at-least-once and unordered;
//! duplicates are fine because the consumer debounces.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::value_objects::ChangeEvent;

/// Sink invoked once per observed change, from the observer's own thread.
pub type ChangeHandler = Box<dyn Fn(ChangeEvent) + Send + Sync + 'static>;

/// Watch setup failures. Fatal at startup: without a watch root there is
/// nothing to serve.
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("watch root not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("watch root is not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("observer is already running")]
    AlreadyRunning,

    #[error("failed to watch {}: {message}", .path.display())]
    Watch { path: PathBuf, message: String },
}

/// Recursive watcher with an explicit lifecycle.
pub trait ChangeObserver {
    /// Begin watching `root` recursively. Returns once the watch is
    /// registered; events then arrive on `handler` from another thread.
    fn start(&mut self, root: &Path, handler: ChangeHandler) -> Result<(), ObserverError>;

    /// Stop delivering events and release OS watch resources.
    ///
    /// Blocks until any in-flight handler call has returned. After this
    /// returns the handler is never invoked again. Calling it on a stopped
    /// observer is a no-op.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}
