//! Running approved commands.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Executes a literal command line on the user's behalf.
pub trait CommandRunner {
    fn run(&mut self, command: &str) -> Result<()>;
}

/// Runs commands through `<shell> -c <command>`, sharing this process's
/// stdin, stdout and stderr, and waits for completion.
#[derive(Clone, Debug)]
pub struct ShellRunner {
    shell: PathBuf,
}

impl ShellRunner {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, command: &str) -> Result<()> {
        debug!(shell = %self.shell.display(), command, "running command");
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|err| {
                Error::exec(command, format!("launching {}: {err}", self.shell.display()))
            })?;

        if status.success() {
            return Ok(());
        }
        match status.code() {
            Some(code) => Err(Error::exec(command, format!("exited with status {code}"))),
            None => Err(Error::exec(command, "terminated by signal")),
        }
    }
}
