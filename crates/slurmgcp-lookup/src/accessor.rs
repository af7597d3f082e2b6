//! Collaborator capabilities injected into the lookup facade.
//!
//! The facade never performs I/O itself. Live scheduler state and the two
//! Compute Engine calls are supplied by the caller through these traits, so
//! transport, retries, and timeouts stay with the implementation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use slurmgcp_core::NodeState;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Snapshot of node states as reported by the scheduler.
///
/// Queried on every node state lookup; freshness is the implementation's
/// concern.
pub trait LiveNodeStates: Send + Sync {
    fn node_states(&self) -> anyhow::Result<HashMap<String, NodeState>>;
}

impl<F> LiveNodeStates for F
where
    F: Fn() -> anyhow::Result<HashMap<String, NodeState>> + Send + Sync,
{
    fn node_states(&self) -> anyhow::Result<HashMap<String, NodeState>> {
        self()
    }
}

/// `compute.reservations.get`
pub trait ReservationAccessor: Send + Sync {
    fn get_reservation(&self, project: &str, zone: &str, name: &str) -> anyhow::Result<Value>;
}

/// `compute.futureReservations.get`
pub trait FutureReservationAccessor: Send + Sync {
    fn get_future_reservation(&self, project: &str, zone: &str, name: &str) -> anyhow::Result<Value>;
}
