//! slurmgcp-core: shared types for the slurmgcp metadata engine.
//!
//! Holds the cluster configuration model (parsed from TOML), the scheduler
//! `NodeState` value type, and the Google API endpoint table.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod types;

pub use config::{ClusterConfig, NodesetConfig};
pub use endpoint::ApiEndpoint;
pub use error::{ConfigError, ConfigResult};
pub use types::*;
