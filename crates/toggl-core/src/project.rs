//! Toggl project identity, display and ordering.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A Toggl project as remembered locally.
///
/// `alias` is never sent to Toggl; it is a local shorthand used to pick a
/// project from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub workspace_id: u64,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default = "default_billable")]
    pub billable: bool,
}

const fn default_billable() -> bool {
    true
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alias) = &self.alias {
            write!(f, "[{alias}] ")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(client) = self.client.as_deref().filter(|c| !self.name.contains(c)) {
            write!(f, " — {client}")?;
        }
        if self.billable {
            write!(f, " (€)")?;
        }
        Ok(())
    }
}

/// Rank of a project's client in the listing order.
///
/// Regular clients come first, the configured default client after them,
/// projects without a client last.
fn client_rank(client: Option<&str>, default_client: Option<&str>) -> u8 {
    match client {
        None => 2,
        Some(c) if Some(c) == default_client => 1,
        Some(_) => 0,
    }
}

/// Compares two projects by `(client rank, client, name)`.
pub fn compare_projects(a: &Project, b: &Project, default_client: Option<&str>) -> Ordering {
    let key = |p: &Project| {
        (
            client_rank(p.client.as_deref(), default_client),
            p.client.clone(),
            p.name.clone(),
        )
    };
    key(a).cmp(&key(b))
}

/// Sorts projects into listing order. The sort is stable.
pub fn sort_projects(projects: &mut [Project], default_client: Option<&str>) {
    projects.sort_by(|a, b| compare_projects(a, b, default_client));
}
