//! Exit-status classification.
//!
//! Maps a completed run onto a closed set of semantic outcomes. The
//! diff mapping is the most important contract in the crate: with
//! `--diff-exit-status`, kapp exits 2 when the cluster already matches
//! the declared state, 3 when changes are pending, and never 0. These
//! codes are fixed tool behavior and must not be renegotiated; any
//! undocumented code is treated as failure, never as success.

use crate::error::{Error, Result};
use crate::runner::RunOutput;

/// Operation kinds with distinct exit-code semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// `kapp deploy` - plain zero/non-zero semantics
    Apply,
    /// `kapp delete` - plain zero/non-zero semantics
    Delete,
    /// `kapp deploy --diff-run --diff-exit-status` - 2 clean, 3 pending
    Diff,
}

/// Semantic outcome of one external tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The tool applied (or deleted) successfully
    Applied {
        /// Captured stdout
        stdout: String,
    },
    /// Diff run found the cluster already matching declared state
    NoChange,
    /// Diff run found pending changes
    PendingChange {
        /// Captured diff text from stdout
        diff: String,
    },
    /// The tool ran and reported failure
    Failed {
        /// Exit status the tool returned
        code: i32,
        /// Captured stderr, verbatim
        stderr: String,
    },
}

/// Classify one completed run according to the operation's exit-code
/// contract.
///
/// Returns [`Error::Classifier`] only when a diff run exits zero, which
/// the `--diff-exit-status` contract rules out; that is an internal
/// consistency failure, not a resource failure.
pub fn classify(op: OpKind, output: &RunOutput) -> Result<Outcome> {
    match op {
        OpKind::Apply | OpKind::Delete => match output.code {
            0 => Ok(Outcome::Applied {
                stdout: output.stdout.clone(),
            }),
            code => Ok(Outcome::Failed {
                code,
                stderr: output.stderr.clone(),
            }),
        },
        OpKind::Diff => match output.code {
            2 => Ok(Outcome::NoChange),
            3 => Ok(Outcome::PendingChange {
                diff: output.stdout.clone(),
            }),
            0 => Err(Error::Classifier {
                message: format!(
                    "diff run exited 0, expected 2 (no changes) or 3 (pending changes) \
                     (stderr: {})",
                    output.stderr
                ),
            }),
            code => Ok(Outcome::Failed {
                code,
                stderr: output.stderr.clone(),
            }),
        },
    }
}
