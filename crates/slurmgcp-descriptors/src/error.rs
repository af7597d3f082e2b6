//! Descriptor parsing errors.

use thiserror::Error;

pub type DescriptorResult<T> = Result<T, DescriptorError>;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("malformed {kind} record: {source}")]
    InvalidRecord {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
