//! Scheduler-side value types shared across slurmgcp crates.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical scheduler state of a node: a base state plus auxiliary flags.
///
/// Slurm reports this as `BASE+FLAG+FLAG`, e.g. `IDLE+CLOUD+POWERED_DOWN`.
/// Two states are equal when base and flag set are equal; flag order in the
/// source text does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeState {
    pub base: String,
    pub flags: BTreeSet<String>,
}

impl NodeState {
    pub fn new<I, S>(base: impl Into<String>, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base: base.into(),
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }
}

/// Error returned when a state string has no base state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("empty node state: {0:?}")]
pub struct NodeStateParseError(pub String);

impl FromStr for NodeState {
    type Err = NodeStateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('+').map(str::trim);
        let base = match parts.next() {
            Some(b) if !b.is_empty() => b.to_uppercase(),
            _ => return Err(NodeStateParseError(s.to_string())),
        };
        let flags = parts
            .filter(|f| !f.is_empty())
            .map(str::to_uppercase)
            .collect();
        Ok(Self { base, flags })
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for flag in &self.flags {
            write!(f, "+{flag}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_base_and_flags() {
        let st: NodeState = "idle+CLOUD+powered_down".parse().unwrap();
        assert_eq!(st.base, "IDLE");
        assert!(st.has_flag("CLOUD"));
        assert!(st.has_flag("POWERED_DOWN"));
        assert_eq!(st.to_string(), "IDLE+CLOUD+POWERED_DOWN");
    }

    #[test]
    fn flag_order_does_not_matter() {
        let a: NodeState = "DOWN+DRAIN+CLOUD".parse().unwrap();
        let b = NodeState::new("DOWN", ["CLOUD", "DRAIN"]);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_base_rejected() {
        assert!("".parse::<NodeState>().is_err());
        assert!("+CLOUD".parse::<NodeState>().is_err());
    }
}
