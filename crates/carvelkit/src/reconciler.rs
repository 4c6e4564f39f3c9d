//! Resource lifecycle state machine.
//!
//! Each lifecycle event is a one-shot transition over the record's
//! derived state: it builds arguments, runs the tool, classifies the
//! outcome, and writes the drift flag / diff text / identity. The
//! reconciler is the only component that touches derived state.
//!
//! Create and update fail hard on any error. Read and plan swallow
//! failures of the diff run itself: diffing may legitimately fail
//! against stale previously-applied configuration (for example an
//! ownership conflict), and failing the event would make the resource
//! permanently unreadable while the next apply re-validates everything
//! anyway. This asymmetry is deliberate; callers depend on
//! drift-tolerant reads.

use crate::config::DeployConfig;
use crate::error::Result;
use crate::kapp::Kapp;
use crate::outcome::Outcome;
use crate::runner::Runner;
use serde::{Deserialize, Serialize};

/// State derived from lifecycle events, persisted by the caller.
///
/// `cluster_drift_detected` and `change_diff` are only ever written
/// together when drift is found; clearing resets the flag and leaves
/// the last captured diff in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedState {
    /// Caller-visible identity, `None` once the resource is deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// True only immediately after a diff run reported pending changes
    #[serde(default)]
    pub cluster_drift_detected: bool,
    /// Last captured pending-change output (sensitive)
    #[serde(default)]
    pub change_diff: String,
}

impl DerivedState {
    fn clear_drift(&mut self) {
        self.cluster_drift_detected = false;
    }

    fn set_drift(&mut self, diff: String) {
        self.cluster_drift_detected = true;
        self.change_diff = diff;
    }
}

/// Per-event logger labeled `<identity>/<operation>`.
///
/// Debug output is gated on the record's `debug_logs` flag; errors are
/// always emitted.
struct EventLog {
    label: String,
    debug_enabled: bool,
}

impl EventLog {
    fn new(identity: &str, operation: &str, debug_enabled: bool) -> Self {
        Self {
            label: format!("{identity}/{operation}"),
            debug_enabled,
        }
    }

    fn debug(&self, message: &str) {
        if self.debug_enabled {
            log::debug!("{}: {}", self.label, message);
        }
    }

    fn error(&self, message: &str) {
        log::error!("{}: {}", self.label, message);
    }
}

/// Drives lifecycle events for one kapp-managed app.
pub struct Reconciler<'a> {
    config: &'a DeployConfig,
    runner: &'a dyn Runner,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: &'a DeployConfig, runner: &'a dyn Runner) -> Self {
        Self { config, runner }
    }

    /// Create the app: deploy and record identity.
    ///
    /// The drift flag is cleared both before and after the run, so it
    /// reads false after any create outcome.
    pub fn create(&self, state: &mut DerivedState) -> Result<()> {
        self.converge(state, "create")
    }

    /// Update the app with a changed record. Same shape as create.
    pub fn update(&self, state: &mut DerivedState) -> Result<()> {
        self.converge(state, "update")
    }

    fn converge(&self, state: &mut DerivedState, operation: &str) -> Result<()> {
        let log = self.event_log(operation);
        log.debug("started");

        state.id = Some(self.config.identity());
        state.clear_drift();

        let result = Kapp::new(self.config, self.runner).deploy();

        // bracket the run: drift must be false no matter how it went
        state.clear_drift();

        result?;
        log.debug("applied");
        Ok(())
    }

    /// Read the app: run a diff preview and record drift.
    ///
    /// Failures of the diff run itself are logged and swallowed;
    /// argument-building and launch errors still propagate, since they
    /// indicate a configuration defect the caller must fix.
    pub fn read(&self, state: &mut DerivedState) -> Result<()> {
        let log = self.event_log("read");
        log.debug("started");

        state.id = Some(self.config.identity());
        state.clear_drift();

        self.record_diff(state, &log, false)
    }

    /// Diff-preview over a provisional record (the planned state),
    /// pre-populating drift fields before the caller decides whether a
    /// real update is needed. All errors are logged, never propagated.
    pub fn plan(&self, state: &mut DerivedState) -> Result<()> {
        let log = self.event_log("plan");
        log.debug("started");

        state.clear_drift();

        self.record_diff(state, &log, true)
    }

    fn record_diff(&self, state: &mut DerivedState, log: &EventLog, swallow_all: bool) -> Result<()> {
        match Kapp::new(self.config, self.runner).diff() {
            Ok(Outcome::NoChange) => log.debug("no changes found"),
            Ok(Outcome::PendingChange { diff }) => {
                state.set_drift(diff);
                log.debug("pending changes found");
            }
            Ok(Outcome::Failed { code, stderr }) => {
                log.error(&format!("ignoring diff failure (exit {code}): {stderr}"));
            }
            // diff classification never yields Applied; treat it as a
            // contract break and surface loudly
            Ok(outcome @ Outcome::Applied { .. }) => {
                log.error(&format!("unexpected diff outcome: {outcome:?}"));
            }
            Err(err) if swallow_all || err.is_diff_tolerable() => {
                log.error(&format!("ignoring diffing error: {err}"));
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// Delete the app and clear its identity.
    pub fn delete(&self, state: &mut DerivedState) -> Result<()> {
        let log = self.event_log("delete");
        log.debug("started");

        state.clear_drift();

        Kapp::new(self.config, self.runner).delete()?;

        state.id = None;
        log.debug("deleted");
        Ok(())
    }

    fn event_log(&self, operation: &str) -> EventLog {
        EventLog::new(&self.config.identity(), operation, self.config.debug_logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::runner::testing::ScriptedRunner;

    fn config() -> DeployConfig {
        DeployConfig {
            app: "web".to_string(),
            namespace: "prod".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn create_sets_identity_and_clears_drift() {
        let runner = ScriptedRunner::exits(0);
        let config = config();
        let mut state = DerivedState {
            cluster_drift_detected: true,
            ..Default::default()
        };

        Reconciler::new(&config, &runner)
            .create(&mut state)
            .expect("create ok");

        assert_eq!(state.id.as_deref(), Some("prod/web"));
        assert!(!state.cluster_drift_detected);
    }

    #[test]
    fn create_failure_propagates_but_still_clears_drift() {
        let runner = ScriptedRunner::exits(1).with_stderr("denied");
        let config = config();
        let mut state = DerivedState {
            cluster_drift_detected: true,
            ..Default::default()
        };

        let err = Reconciler::new(&config, &runner)
            .create(&mut state)
            .expect_err("create fails");

        assert!(matches!(err, Error::CommandFailed { code: 1, .. }));
        assert!(!state.cluster_drift_detected);
    }

    #[test]
    fn read_no_change_leaves_state_untouched() {
        let runner = ScriptedRunner::exits(2);
        let config = config();
        let mut state = DerivedState {
            change_diff: "old diff".to_string(),
            ..Default::default()
        };

        Reconciler::new(&config, &runner)
            .read(&mut state)
            .expect("read ok");

        assert!(!state.cluster_drift_detected);
        assert_eq!(state.change_diff, "old diff");
    }

    #[test]
    fn read_pending_change_sets_drift_and_diff() {
        let runner = ScriptedRunner::exits(3).with_stdout("+ 1 resource created");
        let config = config();
        let mut state = DerivedState::default();

        Reconciler::new(&config, &runner)
            .read(&mut state)
            .expect("read ok");

        assert!(state.cluster_drift_detected);
        assert_eq!(state.change_diff, "+ 1 resource created");
    }

    #[test]
    fn read_swallows_diff_failures() {
        let runner = ScriptedRunner::exits(5).with_stderr("ownership conflict");
        let config = config();
        let mut state = DerivedState::default();

        Reconciler::new(&config, &runner)
            .read(&mut state)
            .expect("read still succeeds");

        assert!(!state.cluster_drift_detected);
        assert_eq!(state.change_diff, "");
    }

    #[test]
    fn read_swallows_contract_violations() {
        let runner = ScriptedRunner::exits(0);
        let config = config();
        let mut state = DerivedState::default();

        Reconciler::new(&config, &runner)
            .read(&mut state)
            .expect("read still succeeds");
    }

    #[test]
    fn read_propagates_format_errors() {
        let runner = ScriptedRunner::exits(2);
        let config = DeployConfig {
            config_yaml: "    a: 1\n  b: 2\n".to_string(),
            ..config()
        };
        let mut state = DerivedState::default();

        let err = Reconciler::new(&config, &runner)
            .read(&mut state)
            .expect_err("bad inline config must surface");
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn plan_swallows_everything() {
        let runner = ScriptedRunner::exits(0);
        let config = config();
        let mut state = DerivedState::default();

        Reconciler::new(&config, &runner)
            .plan(&mut state)
            .expect("plan never fails on diff errors");
    }

    #[test]
    fn create_then_clean_read_reports_no_drift() {
        let config = config();
        let mut state = DerivedState::default();

        let deploy = ScriptedRunner::exits(0);
        Reconciler::new(&config, &deploy)
            .create(&mut state)
            .expect("create ok");

        let diff = ScriptedRunner::exits(2);
        Reconciler::new(&config, &diff)
            .read(&mut state)
            .expect("read ok");

        assert!(!state.cluster_drift_detected);
        assert_eq!(state.id.as_deref(), Some("prod/web"));
    }

    #[test]
    fn delete_clears_identity() {
        let runner = ScriptedRunner::exits(0);
        let config = config();
        let mut state = DerivedState {
            id: Some("prod/web".to_string()),
            cluster_drift_detected: true,
            ..Default::default()
        };

        Reconciler::new(&config, &runner)
            .delete(&mut state)
            .expect("delete ok");

        assert_eq!(state.id, None);
        assert!(!state.cluster_drift_detected);
    }

    #[test]
    fn delete_failure_keeps_identity() {
        let runner = ScriptedRunner::exits(1).with_stderr("not found");
        let config = config();
        let mut state = DerivedState {
            id: Some("prod/web".to_string()),
            ..Default::default()
        };

        let err = Reconciler::new(&config, &runner)
            .delete(&mut state)
            .expect_err("delete fails");
        assert!(matches!(err, Error::CommandFailed { .. }));
        assert_eq!(state.id.as_deref(), Some("prod/web"));
    }
}
