//! Domain Entities
//!
//! Stateful domain objects with identity over the process lifetime.

mod dirty_tracker;

pub use dirty_tracker::DirtyTracker;
