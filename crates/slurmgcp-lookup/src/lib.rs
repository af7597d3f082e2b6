//! slurmgcp-lookup: metadata resolution for a Slurm cluster on GCP.
//!
//! The [`Lookup`] facade answers the questions the resume, suspend, and sync
//! daemons ask about a cluster:
//!
//! - which nodeset a node belongs to, and whether it is within bounds
//! - the node's live scheduler state
//! - the reservation or future reservation a nodeset should provision into
//! - the fields of a scheduler job record
//!
//! It performs no I/O of its own. Live node state and Compute Engine reads
//! are supplied as [`Collaborators`].

pub mod accessor;
pub mod error;
pub mod job;
pub mod lookup;
pub mod reservation;
pub mod topology;

pub use accessor::{Clock, FixedClock, FutureReservationAccessor, LiveNodeStates, ReservationAccessor, SystemClock};
pub use error::{JobParseError, LookupError, LookupResult};
pub use job::{Job, parse_job_info};
pub use lookup::{Collaborators, Lookup};
pub use reservation::{FutureReservation, ReservationDetails};
pub use topology::{NodesetKind, NodesetTopology, Topology};
