//! Compute Engine timestamp parsing.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::error::{DescriptorError, DescriptorResult};

/// Parse a timestamp as found in Compute Engine records.
///
/// Accepts RFC 3339 (`2025-01-15T00:00:00Z`, `2024-11-30T12:47:51.676-08:00`)
/// and the same without an offset, which is read as UTC. The offset of the
/// input is kept in the result.
pub fn parse_gcp_timestamp(s: &str) -> DescriptorResult<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(ts);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|_| DescriptorError::InvalidTimestamp(s.to_string()))
}
