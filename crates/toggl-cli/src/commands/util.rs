//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use toggl_core::Project;

use crate::Config;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1 year in minutes).
const MAX_RELATIVE_MINUTES: i64 = 365 * 24 * 60;

/// Parse a datetime string as either ISO 8601 or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Relative: "20 minutes ago", "1 hour ago", "1 day ago"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if s == "now" {
        return Ok(now);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid time: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., '20 minutes ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

/// Formats a timestamp for terminal output.
pub fn format_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Formats an elapsed duration as "Xh Ym" (>= 1 hour) or "Xm".
/// Negative durations are treated as 0m.
pub fn format_elapsed(elapsed: Duration) -> String {
    let minutes = elapsed.num_minutes().max(0);
    let hours = minutes / 60;
    if hours > 0 {
        format!("{hours}h {}m", minutes % 60)
    } else {
        format!("{minutes}m")
    }
}

/// Builds an API client from the configured token and base URL.
pub fn api_client(config: &Config) -> anyhow::Result<toggl_api::Client> {
    let token = config.api_token()?;
    toggl_api::Client::new(token, config.api_url.as_str()).context("failed to create Toggl client")
}

/// Runtime for driving the async API client from a synchronous command.
pub fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")
}

/// Fetches the user's active projects with client names resolved.
pub fn fetch_projects(config: &Config) -> anyhow::Result<Vec<Project>> {
    let client = api_client(config)?;
    let runtime = runtime()?;

    eprintln!("Fetching user data (workspaces, projects, clients)...");
    let me = runtime
        .block_on(client.me_with_related_data())
        .context("failed to fetch user data from Toggl")?;

    if me.clients().is_empty() {
        eprintln!("No clients found.");
    } else {
        eprintln!("Processed {} clients.", me.clients().len());
    }

    let projects = me.active_projects();
    eprintln!("Fetched {} projects.", projects.len());
    Ok(projects)
}
