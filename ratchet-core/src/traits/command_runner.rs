//! Synchronous shell command execution.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Captured result of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Process exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub duration_ms: u64,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout followed by stderr, newline-separated.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Runs a shell-interpreted command and blocks until it exits.
///
/// There is no timeout: a hung child hangs the caller.
pub trait CommandRunner: Send + Sync {
    /// Errors only when the process cannot be started at all; a non-zero
    /// exit is reported through `CommandOutput::exit_code`.
    fn run(&self, working_dir: &Path, command: &str) -> std::io::Result<CommandOutput>;
}

/// Default runner: `sh -c` on Unix, `cmd /C` on Windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, working_dir: &Path, command: &str) -> std::io::Result<CommandOutput> {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        };

        let start = Instant::now();
        let output = cmd.current_dir(working_dir).output()?;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(command, exit = ?output.status.code(), duration_ms, "command finished");

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            duration_ms,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
