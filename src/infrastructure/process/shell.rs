//! Shell Command Runner
//!
//! Runs each resync step as a `sh -c` command line so deployments can use
//! `sudo`, pipes and arguments without the core knowing about them.

use std::process::{Command, Stdio};

use crate::config::CommandsConfig;
use crate::domain::ports::{CommandError, CommandOutput, CommandRunner};
use crate::domain::value_objects::ResyncCommand;

/// Interpreter used for every command line.
const SHELL: &str = "sh";

/// Command runner backed by the system shell.
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    commands: CommandsConfig,
}

impl ShellCommandRunner {
    pub fn new(commands: CommandsConfig) -> Self {
        Self { commands }
    }

    /// The command line configured for `command`.
    pub fn line(&self, command: ResyncCommand) -> &str {
        self.commands.line(command)
    }
}

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: ResyncCommand) -> Result<CommandOutput, CommandError> {
        let line = self.line(command).trim();
        if line.is_empty() {
            tracing::debug!(%command, "No command configured, skipping step");
            return Ok(CommandOutput::default());
        }

        tracing::debug!(%command, line, "Running command");
        let output = Command::new(SHELL)
            .arg("-c")
            .arg(line)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| CommandError::Spawn {
                command,
                line: line.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(CommandError::Failed {
                command,
                line: line.to_string(),
                code: output.status.code(),
                stdout,
                stderr,
            });
        }

        tracing::debug!(%command, stdout = %stdout.trim_end(), "Command output");
        if !stderr.trim().is_empty() {
            tracing::debug!(%command, stderr = %stderr.trim_end(), "Command stderr");
        }

        Ok(CommandOutput { stdout, stderr })
    }
}
