//! Infrastructure Layer
//!
//! Concrete implementations of the domain ports.
//!
//! - `process/` - shell-backed `CommandRunner`
//! - `watcher/` - notify-backed `ChangeObserver`

pub mod process;
pub mod watcher;

pub use process::ShellCommandRunner;
pub use watcher::NotifyObserver;
