//! Application Layer
//!
//! Use cases that orchestrate the domain through its ports.
//!
//! ## Use Cases
//!
//! - `ResyncController` - debounce loop that remounts the gadget after edits settle

pub mod resync;

pub use resync::{
    CancelToken, ResyncController, ResyncEvent, ResyncOptions, ResyncReport, ResyncState, Tick,
};
