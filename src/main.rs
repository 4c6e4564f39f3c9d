mod cli;
mod commands;
mod config;
mod paths;
mod state;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let manifest = cli.manifest.as_deref();

    match cli.command {
        Command::Apply { name } => commands::apply::run(manifest, name.as_deref()),
        Command::Diff { name } => commands::diff::run(manifest, name.as_deref()),
        Command::Plan { name } => commands::diff::plan(manifest, name.as_deref()),
        Command::Delete { name } => commands::delete::run(manifest, &name),
        Command::Template { name, show } => {
            commands::template::run(manifest, name.as_deref(), show)
        }
        Command::Status => commands::status::run(),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "caravela", &mut io::stdout());
            Ok(())
        }
    }
}
