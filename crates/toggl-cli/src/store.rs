//! Project store persistence.
//!
//! The store is a pretty-printed JSON file (by default
//! `~/.local/share/toggl/projects.json`) written by `toggl init` and
//! `toggl projects`.

use std::path::Path;

use anyhow::{Context, Result};
use toggl_core::ProjectStore;

/// Loads the project store.
///
/// Returns `None` if the file doesn't exist.
/// Returns an error if the file exists but is unreadable/unparseable.
pub fn load(path: &Path) -> Result<Option<ProjectStore>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let store: ProjectStore = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            tracing::debug!(path = %path.display(), projects = store.projects.len(), "loaded project store");
            Ok(Some(store))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Loads the project store, failing with a helpful message if not found.
pub fn require(path: &Path) -> Result<ProjectStore> {
    load(path)?.context("Setup incomplete. Run `toggl init` first.")
}

/// Writes the project store, creating parent directories as needed.
pub fn save(path: &Path, store: &ProjectStore) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(store).context("failed to encode project store")?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "saved project store");
    Ok(())
}
