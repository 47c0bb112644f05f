//! Resync use case
//!
//! Watches the shared tree and remounts the USB gadget once edits settle:
//! - Actionable changes mark the share dirty (last change wins)
//! - A fixed-interval poll waits for a quiet settle period
//! - Unmount, sync, mount run in order; failures are logged, never fatal
//! - Cancellation stops the observer and drops any pending resync

mod cancel;
mod controller;
mod event;

pub use cancel::CancelToken;
pub use controller::ResyncController;
pub use event::{ResyncEvent, ResyncOptions, ResyncReport, ResyncState, Tick};
