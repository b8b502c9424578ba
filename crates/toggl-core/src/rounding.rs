//! Quarter-hour rounding of time entry boundaries.
//!
//! Entries start on the block boundary at or before the real start. They end
//! on the block boundary at or before the real end, except when start and end
//! share a block. In that case the end is pushed up so the entry is never empty.

use chrono::{DateTime, Duration, SecondsFormat, Timelike, Utc};

/// Block size in minutes.
pub const BLOCK_MINUTES: u32 = 15;

/// How an end time was rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndRounding {
    /// Start and end fell in the same block; the end moved to the next boundary.
    Up,
    /// The end moved back to its block start.
    Down,
}

/// Truncates to the start of the enclosing block.
pub fn round_down(t: DateTime<Utc>) -> DateTime<Utc> {
    let minute = (t.minute() / BLOCK_MINUTES) * BLOCK_MINUTES;
    let offset = Duration::minutes(i64::from(t.minute() - minute))
        + Duration::seconds(i64::from(t.second()))
        + Duration::nanoseconds(i64::from(t.nanosecond()));
    t - offset
}

/// Rounds up to the next block boundary; boundaries are returned unchanged.
pub fn round_up(t: DateTime<Utc>) -> DateTime<Utc> {
    let down = round_down(t);
    if down == t {
        t
    } else {
        down + Duration::minutes(i64::from(BLOCK_MINUTES))
    }
}

/// Start time for a new entry.
pub fn start_time(now: DateTime<Utc>) -> DateTime<Utc> {
    round_down(now)
}

/// End time for an entry that started at `start` and is stopped at `now`.
pub fn end_time(start: DateTime<Utc>, now: DateTime<Utc>) -> (DateTime<Utc>, EndRounding) {
    let block = round_down(now);
    if round_down(start) == block {
        (block + Duration::minutes(i64::from(BLOCK_MINUTES)), EndRounding::Up)
    } else {
        (block, EndRounding::Down)
    }
}

/// Formats a timestamp the way the Toggl API expects it.
pub fn format_api(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}
