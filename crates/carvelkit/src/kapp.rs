//! kapp CLI client: build arguments, run, classify.
//!
//! One method per operation, each spawning exactly one process and
//! blocking until it is fully reaped. No state is touched here; the
//! reconciler owns derived state.

use crate::args;
use crate::config::DeployConfig;
use crate::error::{Error, Result};
use crate::outcome::{classify, OpKind, Outcome};
use crate::runner::Runner;

pub(crate) const KAPP: &str = "kapp";

/// Client for one app's kapp invocations.
pub struct Kapp<'a> {
    config: &'a DeployConfig,
    runner: &'a dyn Runner,
}

impl<'a> Kapp<'a> {
    pub fn new(config: &'a DeployConfig, runner: &'a dyn Runner) -> Self {
        Self { config, runner }
    }

    /// Run `kapp deploy`, returning captured stdout on success.
    pub fn deploy(&self) -> Result<String> {
        let cmd = args::deploy_args(self.config)?;
        let output = self.runner.run(KAPP, &cmd)?;
        match classify(OpKind::Apply, &output)? {
            Outcome::Applied { stdout } => Ok(stdout),
            outcome => Err(Self::failed(outcome)),
        }
    }

    /// Run a diff-only deploy, returning the classified outcome.
    ///
    /// `Failed` is returned as an outcome rather than an error so the
    /// caller can decide whether the event tolerates diff failures.
    pub fn diff(&self) -> Result<Outcome> {
        let cmd = args::diff_args(self.config)?;
        let output = self.runner.run(KAPP, &cmd)?;
        classify(OpKind::Diff, &output)
    }

    /// Run `kapp delete`, returning captured stdout on success.
    pub fn delete(&self) -> Result<String> {
        let cmd = args::delete_args(self.config);
        let output = self.runner.run(KAPP, &cmd)?;
        match classify(OpKind::Delete, &output)? {
            Outcome::Applied { stdout } => Ok(stdout),
            outcome => Err(Self::failed(outcome)),
        }
    }

    fn failed(outcome: Outcome) -> Error {
        match outcome {
            Outcome::Failed { code, stderr } => Error::CommandFailed {
                program: KAPP.to_string(),
                code,
                stderr,
            },
            // apply/delete classification only yields Applied or Failed
            other => Error::Classifier {
                message: format!("unexpected outcome for apply-style run: {other:?}"),
            },
        }
    }
}
