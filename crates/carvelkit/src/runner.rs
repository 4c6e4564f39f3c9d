//! Process execution for the external tools.
//!
//! The [`Runner`] trait abstracts the underlying execution, enabling:
//! - Real CLI execution via [`CliRunner`]
//! - Scripted implementations for testing
//!
//! A runner never decides whether an exit status is a failure; it only
//! reports what happened. Interpreting status codes is the outcome
//! classifier's job.

use crate::args::CommandLine;
use crate::error::{Error, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Captured result of one completed process.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Full captured stdout
    pub stdout: String,
    /// Full captured stderr
    pub stderr: String,
    /// Exit status the process returned
    pub code: i32,
}

/// Runner trait for external tool invocations.
pub trait Runner: Send + Sync {
    /// Run `program` with the built command line, blocking until the
    /// process exits with stdout and stderr fully drained.
    fn run(&self, program: &str, cmd: &CommandLine) -> Result<RunOutput>;
}

/// Runner that spawns the real executable.
#[derive(Debug, Default)]
pub struct CliRunner;

impl Runner for CliRunner {
    fn run(&self, program: &str, cmd: &CommandLine) -> Result<RunOutput> {
        let stdin = if cmd.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let mut child = Command::new(program)
            .args(&cmd.args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Launch {
                program: program.to_string(),
                source,
            })?;

        if let Some(payload) = &cmd.stdin {
            // take() closes the pipe once the write is done, so the
            // child sees EOF instead of hanging on stdin
            let mut pipe = child.stdin.take().ok_or_else(|| Error::Io {
                program: program.to_string(),
                message: "stdin pipe was not opened".to_string(),
            })?;
            pipe.write_all(payload.as_bytes())
                .map_err(|e| Error::Io {
                    program: program.to_string(),
                    message: format!("writing stdin: {e}"),
                })?;
        }

        let output = child.wait_with_output().map_err(|e| Error::Io {
            program: program.to_string(),
            message: format!("collecting output: {e}"),
        })?;

        // A missing code means the process was killed by a signal; an
        // external supervisor tearing the tool down must never read as
        // success or as a recognized alternate outcome
        let code = output.status.code().ok_or_else(|| Error::Io {
            program: program.to_string(),
            message: "process terminated without an exit status".to_string(),
        })?;

        Ok(RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code,
        })
    }
}
