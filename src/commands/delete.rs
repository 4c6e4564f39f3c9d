//! `caravela delete` - remove a deployed app.

use anyhow::{Context, Result};
use carvelkit::{CliRunner, Reconciler};
use colored::Colorize;
use std::path::Path;

use crate::config::Manifest;
use crate::state::CaravelaState;

pub fn run(manifest_path: Option<&Path>, name: &str) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let mut state = CaravelaState::load()?;
    let runner = CliRunner;

    let (app_name, entry) = manifest
        .select_apps(Some(name))?
        .pop()
        .context("App lookup returned nothing")?;
    let config = entry.to_config(app_name);
    let identity = config.identity();
    let app_state = state.app_mut(app_name);

    Reconciler::new(&config, &runner)
        .delete(&mut app_state.derived)
        .with_context(|| format!("Deleting {identity}"))?;

    // Identity is cleared by the reconciler; drop the whole record
    state.apps.remove(app_name);
    state.save()?;

    println!("  {} deleted {identity}", "✓".green());
    Ok(())
}
