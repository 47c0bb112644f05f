//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod change_event;
mod config_warning;
mod event_filter;
mod resync_command;

pub use change_event::{ChangeEvent, ChangeKind};
pub use config_warning::ConfigWarning;
pub use event_filter::EventFilter;
pub use resync_command::ResyncCommand;
