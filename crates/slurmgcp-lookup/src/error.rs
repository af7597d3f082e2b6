//! Lookup error types.

use thiserror::Error;

use slurmgcp_core::ConfigError;
use slurmgcp_descriptors::DescriptorError;
use slurmgcp_hostlist::{HostlistError, NameError};

/// Result type alias for lookup operations.
pub type LookupResult<T> = Result<T, LookupError>;

/// Errors returned by the lookup facade.
///
/// `Precondition` and `Desync` are faults: the caller or the inventory is in
/// a state the controller must not act on. Everything else rejects one
/// malformed input and can be handled per item.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("node {node} is within the bounds of nodeset {nodeset} but has no live state")]
    Desync { node: String, nodeset: String },

    #[error("invalid reference {reference:?}, expected {expected}")]
    InvalidReference {
        reference: String,
        expected: &'static str,
    },

    #[error("invalid {kind} record: {reason}")]
    InvalidRecord { kind: &'static str, reason: String },

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Hostlist(#[from] HostlistError),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("accessor call failed: {0}")]
    Accessor(#[source] anyhow::Error),
}

impl LookupError {
    /// Whether this error signals a programming or inventory fault rather
    /// than one bad input.
    pub fn is_fault(&self) -> bool {
        matches!(self, LookupError::Precondition(_) | LookupError::Desync { .. })
    }
}

/// Errors raised while parsing a scheduler job record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobParseError {
    #[error("job record has no {0} field")]
    MissingField(&'static str),

    #[error("job record field {field} has invalid value {value:?}")]
    InvalidField { field: &'static str, value: String },
}
