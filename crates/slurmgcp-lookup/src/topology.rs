//! Nodeset topology derived from cluster configuration.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use slurmgcp_core::{ClusterConfig, ConfigResult, NodesetConfig};

/// Kind of a nodeset, as declared in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodesetKind {
    Static,
    Tpu,
    Dynamic,
}

impl fmt::Display for NodesetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodesetKind::Static => "static",
            NodesetKind::Tpu => "tpu",
            NodesetKind::Dynamic => "dynamic",
        })
    }
}

/// Sizing of one nodeset. Dynamic nodesets register nodes themselves and
/// carry no counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodesetTopology {
    Static { static_count: u32, dynamic_max: u32 },
    Tpu { static_count: u32, dynamic_max: u32 },
    Dynamic,
}

impl NodesetTopology {
    fn sized(kind: NodesetKind, ns: &NodesetConfig) -> Self {
        let (static_count, dynamic_max) = (ns.node_count_static, ns.node_count_dynamic_max);
        match kind {
            NodesetKind::Static => Self::Static { static_count, dynamic_max },
            NodesetKind::Tpu => Self::Tpu { static_count, dynamic_max },
            NodesetKind::Dynamic => Self::Dynamic,
        }
    }

    pub fn kind(&self) -> NodesetKind {
        match self {
            Self::Static { .. } => NodesetKind::Static,
            Self::Tpu { .. } => NodesetKind::Tpu,
            Self::Dynamic => NodesetKind::Dynamic,
        }
    }

    /// Upper bound (exclusive) of valid node indices, `None` for dynamic
    /// nodesets.
    pub fn capacity(&self) -> Option<u64> {
        match *self {
            Self::Static { static_count, dynamic_max } | Self::Tpu { static_count, dynamic_max } => {
                Some(u64::from(static_count) + u64::from(dynamic_max))
            }
            Self::Dynamic => None,
        }
    }

    /// Index ranges of (static, dynamic-max) nodes.
    pub fn index_ranges(&self) -> Option<(std::ops::Range<u64>, std::ops::Range<u64>)> {
        match *self {
            Self::Static { static_count, dynamic_max } | Self::Tpu { static_count, dynamic_max } => {
                let split = u64::from(static_count);
                Some((0..split, split..split + u64::from(dynamic_max)))
            }
            Self::Dynamic => None,
        }
    }
}

/// All nodesets of a cluster, keyed by nodeset name.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodesets: BTreeMap<String, NodesetTopology>,
}

impl Topology {
    pub fn from_config(config: &ClusterConfig) -> ConfigResult<Self> {
        config.validate()?;
        let tables = [
            (NodesetKind::Static, &config.nodeset),
            (NodesetKind::Tpu, &config.nodeset_tpu),
            (NodesetKind::Dynamic, &config.nodeset_dyn),
        ];
        let nodesets = tables
            .into_iter()
            .flat_map(|(kind, table)| {
                table
                    .iter()
                    .map(move |(name, ns)| (name.clone(), NodesetTopology::sized(kind, ns)))
            })
            .collect();
        Ok(Self { nodesets })
    }

    pub fn get(&self, nodeset: &str) -> Option<&NodesetTopology> {
        self.nodesets.get(nodeset)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodesetTopology)> {
        self.nodesets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.nodesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodesets.is_empty()
    }
}
