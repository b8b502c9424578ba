//! Status command for showing the running time entry.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use toggl_api::TimeEntry;

use crate::commands::util;
use crate::{Config, store};

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    execute(writer, config, Utc::now())
}

fn execute<W: Write>(writer: &mut W, config: &Config, now: DateTime<Utc>) -> Result<()> {
    let client = util::api_client(config)?;
    let runtime = util::runtime()?;

    let Some(entry) = runtime
        .block_on(client.current_time_entry())
        .context("failed to fetch the running time entry")?
        .filter(TimeEntry::is_running)
    else {
        writeln!(writer, "No task is running.")?;
        return Ok(());
    };

    // The store is optional here; without it projects show by id.
    let project_store = store::load(&config.store_path)?.unwrap_or_default();
    let project = match entry.project_id {
        Some(id) => project_store
            .projects
            .get(&id)
            .map_or_else(|| format!("project {id}"), ToString::to_string),
        None => "(no project)".to_string(),
    };

    writeln!(
        writer,
        "Running: '{}' on {project}",
        entry.description.as_deref().unwrap_or("N/A")
    )?;
    writeln!(
        writer,
        "Started: {} ({} ago)",
        util::format_time(entry.start),
        util::format_elapsed(now - entry.start)
    )?;
    writeln!(writer, "Entry ID: {}", entry.id)?;
    Ok(())
}
