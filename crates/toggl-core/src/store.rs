//! Locally remembered projects, aliases and the default project.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::project::{Project, compare_projects};

/// Errors from project lookup and editing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No selector was given and no default project is set.
    #[error("no project specified and no default project set")]
    NoDefaultProject,
    /// No project matches the selector by alias or name.
    #[error("no project matches '{0}'")]
    UnknownProject(String),
    /// The project id is not in the store.
    #[error("unknown project id {0}")]
    UnknownProjectId(u64),
    /// Another project already uses the alias.
    #[error("alias '{alias}' is already in use by '{project}'")]
    AliasInUse { alias: String, project: String },
}

/// Projects indexed by id, plus the default project selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStore {
    #[serde(default)]
    pub projects: BTreeMap<u64, Project>,
    #[serde(default)]
    pub default_project_id: Option<u64>,
}

impl ProjectStore {
    /// Builds a store with no default project.
    pub fn from_projects(projects: impl IntoIterator<Item = Project>) -> Self {
        Self {
            projects: projects.into_iter().map(|p| (p.id, p)).collect(),
            default_project_id: None,
        }
    }

    /// Returns the default project, if one is set and still known.
    pub fn default_project(&self) -> Option<&Project> {
        self.default_project_id.and_then(|id| self.projects.get(&id))
    }

    /// Finds a project by alias (exact) or name (case-insensitive).
    ///
    /// Projects are tried in listing order, so when several match the one
    /// listed first wins. An empty or missing selector picks the default
    /// project.
    pub fn resolve(
        &self,
        selector: Option<&str>,
        default_client: Option<&str>,
    ) -> Result<&Project, StoreError> {
        let Some(selector) = selector.filter(|s| !s.is_empty()) else {
            return self.default_project().ok_or(StoreError::NoDefaultProject);
        };

        let lowered = selector.to_lowercase();
        self.sorted(default_client)
            .into_iter()
            .find(|p| p.alias.as_deref() == Some(selector) || p.name.to_lowercase() == lowered)
            .ok_or_else(|| StoreError::UnknownProject(selector.to_string()))
    }

    /// Builds a new store from freshly fetched projects.
    ///
    /// Aliases carry over by project id. The default survives only if its
    /// project was fetched again.
    pub fn refreshed(&self, fetched: impl IntoIterator<Item = Project>) -> Self {
        let mut next = Self::from_projects(fetched.into_iter().map(|mut p| {
            if let Some(old) = self.projects.get(&p.id) {
                p.alias.clone_from(&old.alias);
            }
            p
        }));

        next.default_project_id = self
            .default_project_id
            .filter(|id| next.projects.contains_key(id));
        if self.default_project_id.is_some() && next.default_project_id.is_none() {
            tracing::debug!(
                id = ?self.default_project_id,
                "default project no longer available"
            );
        }
        next
    }

    /// Projects in listing order.
    pub fn sorted(&self, default_client: Option<&str>) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self.projects.values().collect();
        projects.sort_by(|a, b| compare_projects(a, b, default_client));
        projects
    }

    /// Returns the project that currently holds `alias`.
    pub fn alias_owner(&self, alias: &str) -> Option<&Project> {
        self.projects
            .values()
            .find(|p| p.alias.as_deref() == Some(alias))
    }

    /// Sets a project's alias.
    ///
    /// Returns `Ok(false)` when nothing changed (blank or identical alias).
    pub fn set_alias(&mut self, id: u64, alias: &str) -> Result<bool, StoreError> {
        let alias = alias.trim();
        let current = self
            .projects
            .get(&id)
            .ok_or(StoreError::UnknownProjectId(id))?;
        if alias.is_empty() || current.alias.as_deref() == Some(alias) {
            return Ok(false);
        }

        if let Some(owner) = self.alias_owner(alias) {
            return Err(StoreError::AliasInUse {
                alias: alias.to_string(),
                project: owner.name.clone(),
            });
        }

        if let Some(project) = self.projects.get_mut(&id) {
            project.alias = Some(alias.to_string());
        }
        Ok(true)
    }

    /// Clears a project's alias.
    pub fn remove_alias(&mut self, id: u64) -> Result<(), StoreError> {
        let project = self
            .projects
            .get_mut(&id)
            .ok_or(StoreError::UnknownProjectId(id))?;
        project.alias = None;
        Ok(())
    }

    /// Marks a project as the default.
    pub fn set_default(&mut self, id: u64) -> Result<(), StoreError> {
        if !self.projects.contains_key(&id) {
            return Err(StoreError::UnknownProjectId(id));
        }
        self.default_project_id = Some(id);
        Ok(())
    }
}
