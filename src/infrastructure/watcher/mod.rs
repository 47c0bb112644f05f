//! Filesystem change observation.

mod notify_observer;

pub use notify_observer::NotifyObserver;
