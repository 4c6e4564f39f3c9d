//! `caravela apply` - converge apps to the manifest.

use anyhow::{bail, Result};
use carvelkit::{CliRunner, Reconciler};
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use crate::config::Manifest;
use crate::state::CaravelaState;

pub fn run(manifest_path: Option<&Path>, name: Option<&str>) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let mut state = CaravelaState::load()?;
    let runner = CliRunner;

    let mut failed = 0usize;
    for (app_name, entry) in manifest.select_apps(name)? {
        let config = entry.to_config(app_name);
        let identity = config.identity();
        let app_state = state.app_mut(app_name);
        let reconciler = Reconciler::new(&config, &runner);

        // A persisted identity means the app was deployed before
        let existing = app_state.derived.id.is_some();
        let result = if existing {
            reconciler.update(&mut app_state.derived)
        } else {
            reconciler.create(&mut app_state.derived)
        };
        app_state.last_event = Some(Utc::now());

        match result {
            Ok(()) => {
                let verb = if existing { "updated" } else { "created" };
                println!("  {} {verb} {identity}", "✓".green());
            }
            Err(err) => {
                failed += 1;
                println!("  {} {identity}: {err}", "✗".red());
            }
        }
    }

    state.save()?;

    if failed > 0 {
        bail!("{failed} app(s) failed to apply");
    }
    Ok(())
}
