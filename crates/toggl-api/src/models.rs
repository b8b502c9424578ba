//! Request and response bodies for the Toggl v9 API.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use toggl_core::Project;
use toggl_core::rounding::format_api;

/// Response of `GET /me?with_related_data=true`.
///
/// Toggl sends `null` instead of an empty list when the user has no
/// clients or projects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Me {
    #[serde(default)]
    pub clients: Option<Vec<ApiClient>>,
    #[serde(default)]
    pub projects: Option<Vec<ApiProject>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiClient {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiProject {
    pub id: u64,
    pub name: String,
    pub workspace_id: u64,
    #[serde(default)]
    pub client_id: Option<u64>,
    #[serde(default)]
    pub billable: Option<bool>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub is_private: bool,
}

impl Me {
    pub fn clients(&self) -> &[ApiClient] {
        self.clients.as_deref().unwrap_or_default()
    }

    pub fn projects(&self) -> &[ApiProject] {
        self.projects.as_deref().unwrap_or_default()
    }

    /// Active, non-private projects with their client names resolved.
    ///
    /// The result keeps API order; callers sort it for display.
    pub fn active_projects(&self) -> Vec<Project> {
        let clients: HashMap<u64, &str> = self
            .clients()
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();

        self.projects()
            .iter()
            .filter(|p| p.active && !p.is_private)
            .map(|p| Project {
                id: p.id,
                name: p.name.clone(),
                workspace_id: p.workspace_id,
                client: p
                    .client_id
                    .and_then(|id| clients.get(&id))
                    .map(|name| (*name).to_string()),
                alias: None,
                billable: p.billable.unwrap_or(false),
            })
            .collect()
    }
}

/// A time entry as returned by the API.
///
/// A running entry has no `stop` and a negative `duration`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeEntry {
    pub id: u64,
    pub workspace_id: u64,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub billable: bool,
}

impl TimeEntry {
    pub fn is_running(&self) -> bool {
        self.stop.is_none() && self.duration < 0
    }
}

/// Body of `POST /workspaces/{workspace_id}/time_entries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTimeEntry {
    pub description: String,
    pub workspace_id: u64,
    pub project_id: u64,
    pub start: String,
    pub duration: i64,
    pub created_with: String,
    pub billable: bool,
}

impl NewTimeEntry {
    /// A running entry for `project` starting at `start`.
    ///
    /// The entry is billable only if both the caller and the project allow it.
    pub fn running(
        project: &Project,
        description: impl Into<String>,
        start: DateTime<Utc>,
        billable: bool,
        created_with: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            workspace_id: project.workspace_id,
            project_id: project.id,
            start: format_api(start),
            duration: -1,
            created_with: created_with.into(),
            billable: billable && project.billable,
        }
    }
}
