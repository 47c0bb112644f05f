//! usbshare - share a locally editable directory as a USB mass-storage gadget
//!
//! The gadget and the local filesystem cannot use the backing image at the
//! same time. usbshare watches the shared tree, waits until local edits have
//! settled, then unmounts the gadget, syncs, and mounts it again so the host
//! sees consistent data.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

// Re-exports for convenience
pub use application::{CancelToken, ResyncController, ResyncEvent, ResyncOptions, Tick};
pub use config::{Config, Verbosity};
pub use domain::entities::DirtyTracker;
pub use domain::ports::{ChangeObserver, CommandError, CommandRunner, ObserverError};
pub use domain::value_objects::{ChangeEvent, ChangeKind, EventFilter, ResyncCommand};
pub use error::{UsbShareError, UsbShareResult};
pub use infrastructure::{NotifyObserver, ShellCommandRunner};
