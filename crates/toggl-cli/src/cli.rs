//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::end::EndArgs;
use crate::commands::projects::ProjectsAction;
use crate::commands::start::StartArgs;

/// Toggl command line assistant.
///
/// Starts and stops Toggl Track time entries, rounding them to quarter hours,
/// against projects picked by local alias or name.
#[derive(Debug, Parser)]
#[command(name = "toggl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize the project store from Toggl (replaces aliases and default).
    #[command(visible_alias = "i")]
    Init,

    /// List projects and manage aliases and the default project.
    #[command(visible_alias = "p")]
    Projects {
        #[command(subcommand)]
        action: Option<ProjectsAction>,
    },

    /// Start a new time entry.
    #[command(visible_alias = "s")]
    Start(StartArgs),

    /// End the running time entry.
    #[command(visible_alias = "e")]
    End(EndArgs),

    /// Show the running time entry.
    Status,
}
