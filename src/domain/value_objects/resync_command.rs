//! The three device operations that make up a resync.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One external step of the remount sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResyncCommand {
    /// Detach the gadget from the host
    Unmount,
    /// Flush filesystem buffers to the backing image
    Sync,
    /// Attach the backing image as a removable gadget
    Mount,
}

impl ResyncCommand {
    /// Full resync order. Never reordered, even when a step fails.
    pub const SEQUENCE: [ResyncCommand; 3] =
        [ResyncCommand::Unmount, ResyncCommand::Sync, ResyncCommand::Mount];

    /// Startup order: force a clean device state without flushing.
    pub const STARTUP: [ResyncCommand; 2] = [ResyncCommand::Unmount, ResyncCommand::Mount];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResyncCommand::Unmount => "unmount",
            ResyncCommand::Sync => "sync",
            ResyncCommand::Mount => "mount",
        }
    }
}

impl fmt::Display for ResyncCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
