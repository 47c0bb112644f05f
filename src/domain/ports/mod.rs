//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod change_observer;
pub mod command_runner;

pub use change_observer::{ChangeHandler, ChangeObserver, ObserverError};
pub use command_runner::{CommandError, CommandOutput, CommandRunner};
