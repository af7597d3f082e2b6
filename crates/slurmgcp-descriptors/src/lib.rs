//! slurmgcp-descriptors: typed views of raw Compute Engine records.
//!
//! Every descriptor is an immutable value built from one JSON record as
//! returned by the API. Required fields are validated; unknown fields are
//! ignored.

pub mod error;
pub mod instance_status;
pub mod machine_type;
pub mod timestamp;

pub use error::{DescriptorError, DescriptorResult};
pub use instance_status::{InstanceResourceStatus, UpcomingMaintenance};
pub use machine_type::{AcceleratorInfo, MachineType};
pub use timestamp::parse_gcp_timestamp;
