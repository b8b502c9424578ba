//! Start command for opening a new running time entry.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args};
use toggl_api::{NewTimeEntry, TimeEntry};
use toggl_core::rounding;

use crate::commands::util;
use crate::{Config, store};

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Description of the task.
    pub description: String,

    /// Project alias or name (uses the default project if not specified).
    #[arg(short, long)]
    pub project: Option<String>,

    /// Mark the task as non-billable (default: billable).
    #[arg(long = "no-billable", action = ArgAction::SetFalse)]
    pub billable: bool,

    /// Start time instead of now (ISO 8601 or e.g. "10 minutes ago").
    #[arg(long)]
    pub at: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, args: &StartArgs, config: &Config) -> Result<()> {
    execute(writer, args, config, Utc::now())
}

fn execute<W: Write>(
    writer: &mut W,
    args: &StartArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    let project_store = store::require(&config.store_path)?;
    let project = project_store
        .resolve(args.project.as_deref(), config.default_client.as_deref())
        .context("Please specify a project or set a default using `toggl projects`")?;
    if args.project.as_deref().is_none_or(str::is_empty) {
        eprintln!("Using default project '{}'", project.name);
    }

    let requested = match args.at.as_deref() {
        Some(at) => util::parse_datetime(at, now)?,
        None => now,
    };
    let start = rounding::start_time(requested);

    let client = util::api_client(config)?;
    let runtime = util::runtime()?;

    if let Some(current) = runtime
        .block_on(client.current_time_entry())
        .context("failed to fetch the running time entry")?
        .filter(TimeEntry::is_running)
    {
        bail!(
            "A task (ID: {}) is already running. End it first using `toggl end`.",
            current.id
        );
    }

    let entry = NewTimeEntry::running(
        project,
        args.description.as_str(),
        start,
        args.billable,
        config.created_with.as_str(),
    );
    eprintln!(
        "Starting task '{}' for project '{}' at {}...",
        args.description,
        project.name,
        util::format_time(start)
    );
    tracing::debug!(?entry, "starting time entry");

    let started = runtime
        .block_on(client.start_time_entry(&entry))
        .context("failed to start task")?;

    writeln!(writer, "Task started successfully. ID: {}", started.id)?;
    Ok(())
}
