//! Instance resource status and maintenance windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{DescriptorError, DescriptorResult};
use crate::timestamp::parse_gcp_timestamp;

/// A scheduled host maintenance event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingMaintenance {
    pub window_start_time: DateTime<Utc>,
}

impl UpcomingMaintenance {
    /// Parse an `upcomingMaintenance` record.
    ///
    /// The start comes from `windowStartTime`, or from
    /// `startTimeWindow.earliest` when the former is absent.
    pub fn from_json(value: Option<&Value>) -> DescriptorResult<Option<Self>> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Ok(None);
        };
        let record = value
            .as_object()
            .ok_or(DescriptorError::MissingField("windowStartTime"))?;

        let start = match record.get("windowStartTime") {
            Some(v) => v,
            None => record
                .get("startTimeWindow")
                .and_then(|w| w.get("earliest"))
                .ok_or(DescriptorError::MissingField("windowStartTime"))?,
        };
        let text = start
            .as_str()
            .ok_or_else(|| DescriptorError::InvalidTimestamp(start.to_string()))?;

        Ok(Some(Self {
            window_start_time: parse_gcp_timestamp(text)?.with_timezone(&Utc),
        }))
    }
}

/// `resourceStatus` of an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceResourceStatus {
    pub physical_host: Option<String>,
    pub upcoming_maintenance: Option<UpcomingMaintenance>,
}

impl InstanceResourceStatus {
    /// Parse a `resourceStatus` record. Never fails: a malformed
    /// `upcomingMaintenance` is dropped.
    pub fn from_json(value: Option<&Value>) -> Self {
        let Some(record) = value.and_then(Value::as_object) else {
            return Self::default();
        };

        let physical_host = match record.get("physicalHost") {
            None | Some(Value::Null) => None,
            Some(Value::String(host)) => Some(host.clone()),
            Some(other) => {
                debug!(physical_host = %other, "ignoring non-string physicalHost");
                None
            }
        };

        let upcoming_maintenance =
            match UpcomingMaintenance::from_json(record.get("upcomingMaintenance")) {
                Ok(m) => m,
                Err(err) => {
                    debug!(error = %err, "ignoring malformed upcomingMaintenance");
                    None
                }
            };

        Self {
            physical_host,
            upcoming_maintenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn jan15() -> UpcomingMaintenance {
        UpcomingMaintenance {
            window_start_time: Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn maintenance_none() {
        assert_eq!(UpcomingMaintenance::from_json(None).unwrap(), None);
    }

    #[test]
    fn maintenance_top_level_start() {
        let jo = json!({ "windowStartTime": "2025-01-15T00:00:00Z", "somethingToIgnore": "past failures" });
        assert_eq!(UpcomingMaintenance::from_json(Some(&jo)).unwrap(), Some(jan15()));
    }

    #[test]
    fn maintenance_nested_earliest() {
        let jo = json!({
            "startTimeWindow": { "earliest": "2025-01-15T00:00:00Z" },
            "somethingToIgnore": "past failures"
        });
        assert_eq!(UpcomingMaintenance::from_json(Some(&jo)).unwrap(), Some(jan15()));
    }

    #[test]
    fn maintenance_top_level_wins() {
        let jo = json!({
            "windowStartTime": "2025-01-15T00:00:00Z",
            "startTimeWindow": { "earliest": "2025-01-25T00:00:00Z" }
        });
        assert_eq!(UpcomingMaintenance::from_json(Some(&jo)).unwrap(), Some(jan15()));
    }

    #[test]
    fn maintenance_empty_record_fails() {
        let jo = json!({});
        assert!(matches!(
            UpcomingMaintenance::from_json(Some(&jo)),
            Err(DescriptorError::MissingField(_))
        ));
    }

    #[test]
    fn maintenance_nested_object_in_top_level_fails() {
        let jo = json!({ "windowStartTime": { "earliest": "2025-01-15T00:00:00Z" } });
        assert!(matches!(
            UpcomingMaintenance::from_json(Some(&jo)),
            Err(DescriptorError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn status_none_and_empty() {
        assert_eq!(InstanceResourceStatus::from_json(None), InstanceResourceStatus::default());
        let jo = json!({});
        assert_eq!(InstanceResourceStatus::from_json(Some(&jo)), InstanceResourceStatus::default());
    }

    #[test]
    fn status_physical_host_only() {
        let jo = json!({ "physicalHost": "/aaa/bbb/ccc" });
        let got = InstanceResourceStatus::from_json(Some(&jo));
        assert_eq!(got.physical_host.as_deref(), Some("/aaa/bbb/ccc"));
        assert_eq!(got.upcoming_maintenance, None);
    }

    #[test]
    fn status_malformed_maintenance_is_dropped() {
        let jo = json!({
            "physicalHost": "/aaa/bbb/ccc",
            "upcomingMaintenance": "maintenance is upon us"
        });
        let got = InstanceResourceStatus::from_json(Some(&jo));
        assert_eq!(got.physical_host.as_deref(), Some("/aaa/bbb/ccc"));
        assert_eq!(got.upcoming_maintenance, None);
    }

    #[test]
    fn status_non_string_physical_host_is_dropped() {
        let jo = json!({
            "physicalHost": { "rack": 7 },
            "upcomingMaintenance": { "windowStartTime": "2025-01-15T00:00:00Z" }
        });
        let got = InstanceResourceStatus::from_json(Some(&jo));
        assert_eq!(got.physical_host, None);
        assert_eq!(got.upcoming_maintenance, Some(jan15()));

        let jo = json!({ "physicalHost": null });
        assert_eq!(InstanceResourceStatus::from_json(Some(&jo)), InstanceResourceStatus::default());
    }

    #[test]
    fn status_with_maintenance() {
        let jo = json!({
            "physicalHost": "/aaa/bbb/ccc",
            "upcomingMaintenance": { "windowStartTime": "2025-01-15T00:00:00Z" }
        });
        let got = InstanceResourceStatus::from_json(Some(&jo));
        assert_eq!(got.upcoming_maintenance, Some(jan15()));
    }
}
