//! Timestamp parsing for `created_at`.
//!
//! Accepted inputs, tried in order:
//!
//! 1. RFC 3339 / ISO-8601 with an offset or `Z` (`2024-01-01T00:00:00Z`)
//! 2. ISO-8601 with a compact offset (`2024-01-01T00:00:00+0000`)
//! 3. The X legacy format (`Wed Jan 08 12:00:00 +0000 2025`)
//! 4. Zone-less ISO date-times, subject to [`NaiveTimestampPolicy`]
//!
//! Everything is converted to UTC. Date-only strings are never accepted since
//! they do not name a point in time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// X legacy timestamp format: "Fri Jan 09 15:12:21 +0000 2026"
const X_LEGACY_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

const ISO_COMPACT_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// What to do with a timestamp that carries no zone or offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NaiveTimestampPolicy {
    /// Interpret the wall-clock time as UTC.
    #[default]
    AssumeUtc,
    /// Refuse it as unparseable.
    Reject,
}

/// Why a timestamp string was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp is empty")]
    Empty,

    #[error("'{0}' is a date without a time of day")]
    DateOnly(String),

    #[error("'{0}' has no timezone offset")]
    MissingOffset(String),

    #[error("'{0}' is not a recognized timestamp format")]
    Unrecognized(String),
}

/// Parse a `created_at` value into a UTC instant.
///
/// # Errors
/// Returns a [`TimestampError`] describing why the input was refused.
pub fn parse_timestamp(
    input: &str,
    naive_policy: NaiveTimestampPolicy,
) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        trace!(input = trimmed, "Parsed RFC 3339 timestamp");
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(trimmed, ISO_COMPACT_OFFSET_FORMAT) {
        trace!(input = trimmed, "Parsed ISO timestamp with compact offset");
        return Ok(dt.with_timezone(&Utc));
    }

    if let Some(dt) = parse_x_legacy(trimmed) {
        trace!(input = trimmed, "Parsed X legacy timestamp");
        return Ok(dt);
    }

    if let Some(naive) = parse_naive(trimmed) {
        return match naive_policy {
            NaiveTimestampPolicy::AssumeUtc => {
                trace!(input = trimmed, "Parsed zone-less timestamp as UTC");
                Ok(Utc.from_utc_datetime(&naive))
            }
            NaiveTimestampPolicy::Reject => Err(TimestampError::MissingOffset(trimmed.to_string())),
        };
    }

    if NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok() {
        return Err(TimestampError::DateOnly(trimmed.to_string()));
    }

    Err(TimestampError::Unrecognized(trimmed.to_string()))
}

/// Parse X's date format: "Wed Jan 08 12:00:00 +0000 2025"
fn parse_x_legacy(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(input, X_LEGACY_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
}
