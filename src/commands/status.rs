//! `caravela status` - show persisted state.

use anyhow::Result;
use colored::Colorize;

use crate::state::CaravelaState;

pub fn run() -> Result<()> {
    let state = CaravelaState::load()?;

    if state.apps.is_empty() && state.templates.is_empty() {
        println!("  {} Nothing reconciled yet", "ℹ".blue());
        return Ok(());
    }

    if !state.apps.is_empty() {
        println!("{}", "Apps".bold());
        for (name, app) in &state.apps {
            let symbol = if app.derived.cluster_drift_detected {
                "~".yellow()
            } else {
                "✓".green()
            };
            let identity = app.derived.id.as_deref().unwrap_or("(not deployed)");
            let drift = if app.derived.cluster_drift_detected {
                "drift detected"
            } else {
                "in sync"
            };
            let last = app
                .last_event
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "never".to_string());
            println!("  {symbol} {name:<20} {identity:<30} {drift} (last event: {last})");
        }
    }

    if !state.templates.is_empty() {
        println!("{}", "Templates".bold());
        for (name, template) in &state.templates {
            let identity = template.render.id.as_deref().unwrap_or("(not rendered)");
            let last = template
                .last_event
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "never".to_string());
            println!("  {} {name:<20} {identity} (last event: {last})", "✓".green());
        }
    }

    Ok(())
}
