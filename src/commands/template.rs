//! `caravela template` - render kbld templates.

use anyhow::{bail, Result};
use carvelkit::{CliRunner, Templater};
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

use crate::config::Manifest;
use crate::state::CaravelaState;

pub fn run(manifest_path: Option<&Path>, name: Option<&str>, show: bool) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let mut state = CaravelaState::load()?;
    let runner = CliRunner;

    let mut failed = 0usize;
    for (template_name, entry) in manifest.select_templates(name)? {
        let config = entry.to_config();
        let template_state = state.template_mut(template_name);

        match Templater::new(&config, &runner).render(&mut template_state.render) {
            Ok(()) => {
                template_state.last_event = Some(Utc::now());
                println!(
                    "  {} {template_name} id={}",
                    "✓".green(),
                    template_state.render.id.as_deref().unwrap_or("")
                );
                if show {
                    for line in template_state.render.result.lines() {
                        println!("      {line}");
                    }
                }
            }
            Err(err) => {
                failed += 1;
                println!("  {} {template_name}: {err}", "✗".red());
            }
        }
    }

    state.save()?;

    if failed > 0 {
        bail!("{failed} template(s) failed to render");
    }
    Ok(())
}
