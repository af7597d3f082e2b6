//! Hostlist and node name error types.

use thiserror::Error;

pub type HostlistResult<T> = Result<T, HostlistError>;

pub type NameResult<T> = Result<T, NameError>;

/// Errors raised while expanding a hostlist expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostlistError {
    #[error("unbalanced brackets in hostlist term: {0}")]
    UnbalancedBracket(String),

    #[error("empty range in hostlist term: {0}")]
    EmptyRange(String),

    #[error("invalid range {range:?} in hostlist term: {term}")]
    InvalidRange { term: String, range: String },

    #[error("hostlist term {term} expands to more than {limit} names")]
    TooLarge { term: String, limit: usize },
}

/// Errors raised while decomposing a node name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    /// The name does not follow `<cluster>-<nodeset>-<node>`.
    #[error("node name {0} is not valid")]
    Malformed(String),

    /// The node part is a range or is not a number.
    #[error("node name {name} has no numeric index (node part {node:?})")]
    NotAnIndex { name: String, node: String },

    /// The node part is numeric but does not fit in `u64`.
    #[error("node name {name} has an index too large to represent (node part {node:?})")]
    IndexTooLarge { name: String, node: String },
}
