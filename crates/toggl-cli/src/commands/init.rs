//! Init command for building the project store from Toggl.

use std::io::Write;

use anyhow::Result;
use toggl_core::ProjectStore;

use crate::commands::util;
use crate::{Config, store};

/// Runs the init command.
///
/// Replaces any existing store, so aliases and the default are reset.
pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let projects = util::fetch_projects(config)?;

    if store::load(&config.store_path)?.is_some() {
        tracing::info!(path = %config.store_path.display(), "replacing existing project store");
    }

    let project_store = ProjectStore::from_projects(projects);
    store::save(&config.store_path, &project_store)?;

    let count = project_store.projects.len();
    writeln!(
        writer,
        "Setup complete. Saved {count} {} to {}",
        if count == 1 { "project" } else { "projects" },
        config.store_path.display()
    )?;
    Ok(())
}
