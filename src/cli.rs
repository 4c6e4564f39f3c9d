use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "caravela")]
#[command(version)]
#[command(about = "Declarative reconciler for the Carvel kapp and kbld CLIs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the manifest (defaults to caravela.toml in the config dir)
    #[arg(short, long, global = true, env = "CARAVELA_MANIFEST")]
    pub manifest: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy apps to match the manifest (create or update)
    Apply {
        /// Only this app (default: all apps)
        name: Option<String>,
    },

    /// Check deployed apps for drift and record the diff
    Diff {
        /// Only this app (default: all apps)
        name: Option<String>,
    },

    /// Preview what an apply would change, without touching state
    Plan {
        /// Only this app (default: all apps)
        name: Option<String>,
    },

    /// Delete a deployed app
    Delete {
        /// App to delete
        name: String,
    },

    /// Render kbld templates and record their content identity
    Template {
        /// Only this template (default: all templates)
        name: Option<String>,

        /// Print the rendered output (sensitive)
        #[arg(long)]
        show: bool,
    },

    /// Show persisted state for all resources
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
