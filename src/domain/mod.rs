//! Domain Layer
//!
//! The debounce core of usbshare, free of process and filesystem I/O.
//!
//! ## Structure
//!
//! - `entities/` - Stateful objects (DirtyTracker)
//! - `value_objects/` - Immutable value types (ChangeEvent, EventFilter, ResyncCommand)
//! - `ports/` - Interface definitions for infrastructure (CommandRunner, ChangeObserver)

pub mod entities;
pub mod ports;
pub mod value_objects;
