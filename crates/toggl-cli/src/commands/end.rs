//! End command for stopping the running time entry on a rounded boundary.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use toggl_api::TimeEntry;
use toggl_core::EndRounding;
use toggl_core::rounding;

use crate::Config;
use crate::commands::util;

#[derive(Debug, Args)]
pub struct EndArgs {
    /// End time instead of now (ISO 8601 or e.g. "5 minutes ago").
    #[arg(long)]
    pub at: Option<String>,
}

pub fn run<W: Write>(writer: &mut W, args: &EndArgs, config: &Config) -> Result<()> {
    execute(writer, args, config, Utc::now())
}

fn execute<W: Write>(
    writer: &mut W,
    args: &EndArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    let requested = match args.at.as_deref() {
        Some(at) => util::parse_datetime(at, now)?,
        None => now,
    };

    let client = util::api_client(config)?;
    let runtime = util::runtime()?;

    let Some(current) = runtime
        .block_on(client.current_time_entry())
        .context("failed to fetch the running time entry")?
        .filter(TimeEntry::is_running)
    else {
        bail!("No task seems to be running according to the Toggl API.");
    };

    if requested < current.start {
        bail!(
            "End time {} is before the task start {}",
            util::format_time(requested),
            util::format_time(current.start)
        );
    }

    eprintln!("Attempting to stop task ID: {}...", current.id);
    let (stop, direction) = rounding::end_time(current.start, requested);
    match direction {
        EndRounding::Up => eprintln!(
            "Note: Task started ({}) and ended ({}) within the same {}min block. Rounding end time UP.",
            rounding::round_down(current.start).format("%H:%M"),
            requested.format("%H:%M"),
            rounding::BLOCK_MINUTES
        ),
        EndRounding::Down => eprintln!(
            "Note: Rounding end time ({}) DOWN.",
            requested.format("%H:%M")
        ),
    }
    tracing::debug!(entry_id = current.id, %stop, "stopping time entry");

    let stopped = runtime
        .block_on(client.stop_time_entry(current.workspace_id, current.id, stop))
        .with_context(|| format!("failed to stop task ID {}", current.id))?;

    writeln!(writer, "Stopped at {}", util::format_time(stop))?;
    match stopped {
        Some(entry) => writeln!(
            writer,
            "Task '{}' stopped successfully.",
            entry.description.as_deref().unwrap_or("N/A")
        )?,
        None => writeln!(
            writer,
            "Task stop request sent. Assuming success (API response was empty)."
        )?,
    }
    Ok(())
}
