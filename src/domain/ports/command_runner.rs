//! CommandRunner port - runs the external device operations
//!
//! The core only needs "invoke this step and tell me whether it worked".
//! What a step actually executes is a deployment concern owned by the
//! implementation.

use std::io;

use thiserror::Error;

use crate::domain::value_objects::ResyncCommand;

/// Captured output of a successful step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A step that could not be run or finished unsuccessfully.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started at all
    #[error("{command} step could not start `{line}`: {source}")]
    Spawn {
        command: ResyncCommand,
        line: String,
        #[source]
        source: io::Error,
    },

    /// The process ran and exited unsuccessfully
    #[error("{command} step `{line}` failed with {}: {}", exit_label(.code), .stderr.trim())]
    Failed {
        command: ResyncCommand,
        line: String,
        /// `None` when terminated by a signal
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl CommandError {
    pub fn command(&self) -> ResyncCommand {
        match self {
            CommandError::Spawn { command, .. } | CommandError::Failed { command, .. } => *command,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

/// Runs one resync step to completion.
///
/// Implementations block until the step finishes; the next step of a
/// sequence must not start before the previous one is done.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: ResyncCommand) -> Result<CommandOutput, CommandError>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, command: ResyncCommand) -> Result<CommandOutput, CommandError> {
        (**self).run(command)
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<T> {
    fn run(&self, command: ResyncCommand) -> Result<CommandOutput, CommandError> {
        (**self).run(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_error_display_includes_code_and_stderr() {
        let err = CommandError::Failed {
            command: ResyncCommand::Mount,
            line: "modprobe g_multi".to_string(),
            code: Some(1),
            stdout: String::new(),
            stderr: "modprobe: FATAL: Module g_multi not found\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "mount step `modprobe g_multi` failed with exit code 1: modprobe: FATAL: Module g_multi not found"
        );
        assert_eq!(err.command(), ResyncCommand::Mount);
    }

    #[test]
    fn failed_by_signal_display() {
        let err = CommandError::Failed {
            command: ResyncCommand::Sync,
            line: "sync".to_string(),
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "sync step `sync` failed with a signal: ");
    }

    #[test]
    fn spawn_error_keeps_source() {
        use std::error::Error as _;

        let err = CommandError::Spawn {
            command: ResyncCommand::Unmount,
            line: "missing-binary".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().starts_with("unmount step could not start"));
        assert!(err.source().is_some());
    }
}
