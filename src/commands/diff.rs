//! `caravela diff` and `caravela plan` - drift detection.
//!
//! `diff` is the read lifecycle event: it records drift into persisted
//! state and, per the reconciler's contract, never fails because the
//! diff run itself failed. `plan` runs the same preview over a
//! provisional record and leaves persisted state alone.

use anyhow::{Context, Result};
use carvelkit::{CliRunner, DerivedState, Reconciler};
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use crate::config::Manifest;
use crate::state::CaravelaState;

pub fn run(manifest_path: Option<&Path>, name: Option<&str>) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let mut state = CaravelaState::load()?;
    let runner = CliRunner;

    for (app_name, entry) in manifest.select_apps(name)? {
        let config = entry.to_config(app_name);
        let identity = config.identity();
        let app_state = state.app_mut(app_name);

        Reconciler::new(&config, &runner)
            .read(&mut app_state.derived)
            .with_context(|| format!("Reading {identity}"))?;
        app_state.last_event = Some(Utc::now());

        print_drift(&identity, &app_state.derived);
    }

    state.save()?;
    Ok(())
}

pub fn plan(manifest_path: Option<&Path>, name: Option<&str>) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let runner = CliRunner;

    for (app_name, entry) in manifest.select_apps(name)? {
        let config = entry.to_config(app_name);
        let identity = config.identity();
        let mut provisional = DerivedState::default();

        Reconciler::new(&config, &runner)
            .plan(&mut provisional)
            .with_context(|| format!("Planning {identity}"))?;

        print_drift(&identity, &provisional);
    }

    Ok(())
}

fn print_drift(identity: &str, derived: &DerivedState) {
    if derived.cluster_drift_detected {
        println!("  {} {identity} has pending changes", "~".yellow());
        for line in derived.change_diff.lines() {
            println!("      {}", line.dimmed());
        }
    } else {
        println!("  {} {identity} in sync", "✓".green());
    }
}
