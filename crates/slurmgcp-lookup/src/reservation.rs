//! Reservation and future-reservation resolution.
//!
//! A nodeset may reference a specific reservation
//! (`projects/<p>/reservations/<r>`) and/or a future reservation
//! (`projects/<p>/zones/<z>/futureReservations/<f>`). Once a future
//! reservation is fulfilled, Compute Engine auto-creates a concrete
//! reservation for it; while its time window is open that reservation is
//! the one instances are inserted into.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use slurmgcp_core::NodesetConfig;
use slurmgcp_descriptors::parse_gcp_timestamp;

use crate::error::{LookupError, LookupResult};
use crate::lookup::Lookup;

static RESERVATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^projects/(?P<project>[^/]+)/reservations/(?P<name>[^/]+)(/.*)?$")
        .expect("reservation pattern is valid")
});

static FUTURE_RESERVATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^projects/(?P<project>[^/]+)/zones/(?P<zone>[^/]+)/futureReservations/(?P<name>[^/]+)(/.*)?$")
        .expect("future reservation pattern is valid")
});

// Matches the tail of a reservation self-link.
static RESERVATION_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"projects/(?P<project>[^/]+)/zones/(?P<zone>[^/]+)/reservations/(?P<name>[^/]+)/?$")
        .expect("reservation link pattern is valid")
});

const PROCUREMENT_FULFILLED: &str = "FULFILLED";

/// A concrete reservation backing a nodeset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationDetails {
    pub project: String,
    pub zone: String,
    pub name: String,
    /// Last path segment of each resource policy, in response order.
    pub policies: Vec<String>,
    pub deployment_type: Option<String>,
    pub reservation_mode: Option<String>,
    /// Name to pass to bulk insert.
    pub bulk_insert_name: String,
}

/// A future reservation and, while it is in effect, its auto-created
/// reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FutureReservation {
    pub project: String,
    pub zone: String,
    pub name: String,
    pub specific: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reservation_mode: Option<String>,
    pub active_reservation: Option<ReservationDetails>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservationRecord {
    #[serde(default)]
    resource_policies: Option<Map<String, Value>>,
    deployment_type: Option<String>,
    reservation_mode: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FutureReservationRecord {
    time_window: Option<TimeWindow>,
    #[serde(default)]
    status: FutureReservationStatus,
    reservation_mode: Option<String>,
    #[serde(default)]
    specific_reservation_required: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeWindow {
    start_time: Option<String>,
    end_time: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FutureReservationStatus {
    procurement_status: Option<String>,
    #[serde(default)]
    auto_created_reservations: Vec<String>,
}

fn invalid_reference(reference: &str, expected: &'static str) -> LookupError {
    LookupError::InvalidReference {
        reference: reference.to_string(),
        expected,
    }
}

fn invalid_record(kind: &'static str, reason: impl ToString) -> LookupError {
    LookupError::InvalidRecord {
        kind,
        reason: reason.to_string(),
    }
}

fn group<'a>(caps: &Captures<'a>, name: &str) -> &'a str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn parse_window_bound(value: Option<&str>, field: &'static str) -> LookupResult<DateTime<Utc>> {
    let text = value.ok_or_else(|| invalid_record("future reservation", format!("missing timeWindow.{field}")))?;
    Ok(parse_gcp_timestamp(text)?.with_timezone(&Utc))
}

impl Lookup {
    /// Resolve the specific reservation configured for a nodeset.
    ///
    /// Returns `Ok(None)` when the nodeset has no reservation. A nodeset
    /// with a reservation must allow exactly one zone; anything else is a
    /// `Precondition` fault, raised before any API call.
    pub fn nodeset_reservation(&self, nodeset: &NodesetConfig) -> LookupResult<Option<ReservationDetails>> {
        let Some(reference) = nodeset.reservation() else {
            return Ok(None);
        };

        let zone = match nodeset.zone_policy_allow.as_slice() {
            [zone] => zone.as_str(),
            zones => {
                return Err(LookupError::Precondition(format!(
                    "nodeset {:?} uses reservation {reference} and must allow exactly one zone, got {}",
                    nodeset.nodeset_name,
                    zones.len()
                )));
            }
        };

        let caps = RESERVATION_RE
            .captures(reference)
            .ok_or_else(|| invalid_reference(reference, "projects/<project>/reservations/<name>"))?;
        let (project, name) = (group(&caps, "project"), group(&caps, "name"));

        self.reservation_details(project, zone, name, reference.to_string())
            .map(Some)
    }

    /// Resolve the future reservation configured for a nodeset.
    ///
    /// `active_reservation` is filled only when procurement is fulfilled,
    /// the clock is inside `[start_time, end_time)`, and exactly one
    /// reservation was auto-created. Otherwise the reservation API is not
    /// called.
    pub fn future_reservation(&self, nodeset: &NodesetConfig) -> LookupResult<Option<FutureReservation>> {
        let Some(reference) = nodeset.future_reservation() else {
            return Ok(None);
        };

        let caps = FUTURE_RESERVATION_RE.captures(reference).ok_or_else(|| {
            invalid_reference(reference, "projects/<project>/zones/<zone>/futureReservations/<name>")
        })?;
        let (project, zone, name) = (group(&caps, "project"), group(&caps, "zone"), group(&caps, "name"));

        let raw = self
            .collaborators
            .future_reservations
            .get_future_reservation(project, zone, name)
            .map_err(LookupError::Accessor)?;
        let record = FutureReservationRecord::deserialize(&raw)
            .map_err(|e| invalid_record("future reservation", e))?;

        let window = record
            .time_window
            .ok_or_else(|| invalid_record("future reservation", "missing timeWindow"))?;
        let start_time = parse_window_bound(window.start_time.as_deref(), "startTime")?;
        let end_time = parse_window_bound(window.end_time.as_deref(), "endTime")?;

        let now = self.collaborators.clock.now();
        let fulfilled = record.status.procurement_status.as_deref() == Some(PROCUREMENT_FULFILLED);
        let in_window = start_time <= now && now < end_time;

        let active_reservation = match record.status.auto_created_reservations.as_slice() {
            [link] if fulfilled && in_window => Some(self.auto_created_reservation(link)?),
            links => {
                debug!(
                    future_reservation = name,
                    status = ?record.status.procurement_status,
                    in_window,
                    auto_created = links.len(),
                    "future reservation not in effect"
                );
                None
            }
        };

        Ok(Some(FutureReservation {
            project: project.to_string(),
            zone: zone.to_string(),
            name: name.to_string(),
            specific: record.specific_reservation_required,
            start_time,
            end_time,
            reservation_mode: record.reservation_mode,
            active_reservation,
        }))
    }

    fn auto_created_reservation(&self, link: &str) -> LookupResult<ReservationDetails> {
        let caps = RESERVATION_LINK_RE.captures(link).ok_or_else(|| {
            invalid_reference(link, ".../projects/<project>/zones/<zone>/reservations/<name>")
        })?;
        let (project, zone, name) = (group(&caps, "project"), group(&caps, "zone"), group(&caps, "name"));
        info!(project, zone, reservation = name, "future reservation in effect");

        let bulk_insert_name = format!("projects/{project}/reservations/{name}");
        self.reservation_details(project, zone, name, bulk_insert_name)
    }

    fn reservation_details(
        &self,
        project: &str,
        zone: &str,
        name: &str,
        bulk_insert_name: String,
    ) -> LookupResult<ReservationDetails> {
        let raw = self
            .collaborators
            .reservations
            .get_reservation(project, zone, name)
            .map_err(LookupError::Accessor)?;
        let record = ReservationRecord::deserialize(&raw).map_err(|e| invalid_record("reservation", e))?;

        // Distinct policies sharing a final segment collapse to the same name.
        let policies = record
            .resource_policies
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| match value.as_str() {
                Some(path) => Ok(path.rsplit('/').next().unwrap_or(path).to_string()),
                None => Err(invalid_record("reservation", format!("resourcePolicies.{key} is not a string"))),
            })
            .collect::<LookupResult<Vec<_>>>()?;

        Ok(ReservationDetails {
            project: project.to_string(),
            zone: zone.to_string(),
            name: name.to_string(),
            policies,
            deployment_type: record.deployment_type,
            reservation_mode: record.reservation_mode,
            bulk_insert_name,
        })
    }
}
