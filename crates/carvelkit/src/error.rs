//! Error types for kapp/kbld operations.
//!
//! The taxonomy separates "the tool could not run at all" (`Launch`,
//! `Io`) from "the tool ran and reported failure" (`CommandFailed`),
//! because callers treat those differently: a failed launch is always a
//! hard error, while a non-zero exit is interpreted per operation by
//! the outcome classifier.

use std::io;
use thiserror::Error;

/// Errors that can occur while building arguments, running the external
/// tool, or interpreting its result.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed inline configuration (e.g. inconsistent indentation)
    #[error("formatting {field}: {message}")]
    Format {
        /// Name of the offending record field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// The executable could not be found or failed to start
    #[error("launching {program}: {source}")]
    Launch {
        /// Program that failed to start
        program: String,
        #[source]
        source: io::Error,
    },

    /// The process started but its streams could not be captured, or it
    /// was terminated before producing an exit status
    #[error("running {program}: {message}")]
    Io {
        /// Program that was running
        program: String,
        /// Details of the capture failure
        message: String,
    },

    /// The tool ran to completion and reported failure
    #[error("{program} exited with status {code} (stderr: {stderr})")]
    CommandFailed {
        /// Program that failed
        program: String,
        /// Exit status the process returned
        code: i32,
        /// Captured stderr, verbatim
        stderr: String,
    },

    /// The tool's exit code violated its documented contract.
    ///
    /// Only produced by diff-preview runs: `--diff-exit-status` is
    /// documented to never exit zero, so a zero exit indicates a bug in
    /// the tool or in our invocation, not a resource failure.
    #[error("diff run broke exit-code contract: {message}")]
    Classifier {
        /// Description of the contract violation
        message: String,
    },
}

impl Error {
    /// Whether this error may be swallowed on read-style events.
    ///
    /// Diffing against stale previously-applied configuration can fail
    /// for reasons the next apply will resolve on its own, so read and
    /// plan events log these instead of failing the resource. Argument
    /// and launch errors indicate a configuration defect the caller
    /// must fix, and always propagate.
    pub fn is_diff_tolerable(&self) -> bool {
        matches!(self, Self::CommandFailed { .. } | Self::Classifier { .. })
    }
}

/// Result type for kapp/kbld operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_keeps_stderr_verbatim() {
        let err = Error::CommandFailed {
            program: "kapp".to_string(),
            code: 1,
            stderr: "Error: ownership conflict".to_string(),
        };
        assert!(err.to_string().contains("Error: ownership conflict"));
        assert!(err.to_string().contains("status 1"));
    }

    #[test]
    fn only_tool_failures_are_diff_tolerable() {
        let failed = Error::CommandFailed {
            program: "kapp".to_string(),
            code: 5,
            stderr: String::new(),
        };
        let classifier = Error::Classifier {
            message: "exited 0".to_string(),
        };
        let launch = Error::Launch {
            program: "kapp".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(failed.is_diff_tolerable());
        assert!(classifier.is_diff_tolerable());
        assert!(!launch.is_diff_tolerable());
    }
}
