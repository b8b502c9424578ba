//! Projects command for listing projects and managing aliases and the default.
//!
//! `toggl projects` refreshes the store from Toggl and opens the interactive
//! menu. The subcommands edit the stored projects without the network.

use std::io::{IsTerminal, Write};

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use toggl_core::ProjectStore;

use crate::commands::util;
use crate::menu::{MenuOutcome, ProjectMenu, Prompt, TerminalPrompt};
use crate::{Config, store};

/// Non-interactive project management.
#[derive(Debug, Subcommand)]
pub enum ProjectsAction {
    /// List stored projects in display order.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Set a project's alias.
    Alias {
        /// Project alias or name.
        project: String,
        /// New alias.
        alias: String,
    },
    /// Remove a project's alias.
    Unalias {
        /// Project alias or name.
        project: String,
    },
    /// Make a project the default for `toggl start`.
    Default {
        /// Project alias or name.
        project: String,
    },
}

pub fn run<W: Write>(writer: &mut W, action: Option<&ProjectsAction>, config: &Config) -> Result<()> {
    match action {
        None if std::io::stdin().is_terminal() => {
            manage(writer, &mut TerminalPrompt::default(), config)
        }
        None => {
            tracing::debug!("stdin is not a terminal; listing projects");
            list(writer, config, false)
        }
        Some(ProjectsAction::List { json }) => list(writer, config, *json),
        Some(ProjectsAction::Alias { project, alias }) => {
            let mut project_store = store::require(&config.store_path)?;
            let (id, name) = target(&project_store, project, config)?;
            if project_store.set_alias(id, alias)? {
                store::save(&config.store_path, &project_store)?;
                writeln!(writer, "Alias '{}' set for '{name}'.", alias.trim())?;
            } else {
                writeln!(writer, "Alias not changed.")?;
            }
            Ok(())
        }
        Some(ProjectsAction::Unalias { project }) => {
            let mut project_store = store::require(&config.store_path)?;
            let (id, name) = target(&project_store, project, config)?;
            project_store.remove_alias(id)?;
            store::save(&config.store_path, &project_store)?;
            writeln!(writer, "Alias removed for '{name}'.")?;
            Ok(())
        }
        Some(ProjectsAction::Default { project }) => {
            let mut project_store = store::require(&config.store_path)?;
            let (id, name) = target(&project_store, project, config)?;
            project_store.set_default(id)?;
            store::save(&config.store_path, &project_store)?;
            writeln!(writer, "'{name}' is now the default project.")?;
            Ok(())
        }
    }
}

/// Refreshes the store from Toggl and runs the menu; saves only on request.
fn manage<W: Write, P: Prompt>(writer: &mut W, prompt: &mut P, config: &Config) -> Result<()> {
    let old = store::require(&config.store_path)?;
    let refreshed = old.refreshed(util::fetch_projects(config)?);

    let mut menu = ProjectMenu::new(refreshed, config.default_client.as_deref());
    match menu.run(prompt, writer)? {
        MenuOutcome::Saved => {
            store::save(&config.store_path, menu.store())?;
            writeln!(writer, "Configuration saved.")?;
        }
        MenuOutcome::Discarded => writeln!(writer, "Quit without saving.")?,
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct JsonProject<'a> {
    id: u64,
    name: &'a str,
    workspace_id: u64,
    client: Option<&'a str>,
    alias: Option<&'a str>,
    billable: bool,
    default: bool,
}

fn list<W: Write>(writer: &mut W, config: &Config, json: bool) -> Result<()> {
    let project_store = store::require(&config.store_path)?;
    let projects = project_store.sorted(config.default_client.as_deref());

    if json {
        let rows: Vec<JsonProject<'_>> = projects
            .iter()
            .map(|p| JsonProject {
                id: p.id,
                name: &p.name,
                workspace_id: p.workspace_id,
                client: p.client.as_deref(),
                alias: p.alias.as_deref(),
                billable: p.billable,
                default: is_default(&project_store, p.id),
            })
            .collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }

    if projects.is_empty() {
        writeln!(writer, "No projects. Run `toggl init` to fetch them from Toggl.")?;
        return Ok(());
    }

    for project in projects {
        let marker = if is_default(&project_store, project.id) {
            "[DEFAULT] "
        } else {
            ""
        };
        writeln!(writer, "{marker}{project}")?;
    }
    Ok(())
}

/// Resolves a selector to the project's id and name.
fn target(project_store: &ProjectStore, selector: &str, config: &Config) -> Result<(u64, String)> {
    let project = project_store.resolve(Some(selector), config.default_client.as_deref())?;
    Ok((project.id, project.name.clone()))
}

fn is_default(project_store: &ProjectStore, id: u64) -> bool {
    project_store.default_project_id == Some(id)
}
