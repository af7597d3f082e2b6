//! The lookup facade.
//!
//! `Lookup` is built once from cluster configuration. It precomputes the
//! nodeset topology and holds the injected collaborators; every query is a
//! read-only function of those, so a `Lookup` can be shared across threads
//! behind an `Arc` without locking.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use tracing::{debug, error};

use slurmgcp_core::{ClusterConfig, NodeState, NodesetConfig};
use slurmgcp_hostlist::{HostlistError, MAX_EXPANSION, NameError, NodeDesc, node_desc, node_index, range_to_hostlist};

use crate::accessor::{Clock, FutureReservationAccessor, LiveNodeStates, ReservationAccessor, SystemClock};
use crate::error::{JobParseError, LookupError, LookupResult};
use crate::job::{Job, parse_job_info};
use crate::topology::{NodesetKind, NodesetTopology, Topology};

/// External capabilities the facade depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub live_nodes: Arc<dyn LiveNodeStates>,
    pub reservations: Arc<dyn ReservationAccessor>,
    pub future_reservations: Arc<dyn FutureReservationAccessor>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    /// Collaborators using the system clock.
    pub fn new(
        live_nodes: Arc<dyn LiveNodeStates>,
        reservations: Arc<dyn ReservationAccessor>,
        future_reservations: Arc<dyn FutureReservationAccessor>,
    ) -> Self {
        Self {
            live_nodes,
            reservations,
            future_reservations,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Resolves node, nodeset, reservation, and job facts for one cluster.
pub struct Lookup {
    cluster_name: String,
    topology: Topology,
    nodesets: BTreeMap<String, NodesetConfig>,
    pub(crate) collaborators: Collaborators,
}

impl Lookup {
    /// Build the facade. Fails if the configuration declares a nodeset
    /// under more than one kind.
    pub fn new(config: &ClusterConfig, collaborators: Collaborators) -> LookupResult<Self> {
        let topology = Topology::from_config(config)?;
        let nodesets = config
            .nodeset
            .iter()
            .chain(&config.nodeset_tpu)
            .chain(&config.nodeset_dyn)
            .map(|(name, ns)| (name.clone(), ns.clone()))
            .collect();
        debug!(
            cluster = %config.slurm_cluster_name,
            nodesets = topology.len(),
            "lookup initialized"
        );
        Ok(Self {
            cluster_name: config.slurm_cluster_name.clone(),
            topology,
            nodesets,
            collaborators,
        })
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn nodeset_config(&self, nodeset: &str) -> Option<&NodesetConfig> {
        self.nodesets.get(nodeset)
    }

    pub fn nodeset_kind(&self, nodeset: &str) -> Option<NodesetKind> {
        self.topology.get(nodeset).map(NodesetTopology::kind)
    }

    /// `<cluster>-<nodeset>`
    pub fn nodeset_prefix(&self, nodeset: &str) -> String {
        format!("{}-{}", self.cluster_name, nodeset)
    }

    // ── Node names ─────────────────────────────────────────────────

    pub fn node_desc(&self, node: &str) -> LookupResult<NodeDesc> {
        Ok(node_desc(node)?)
    }

    pub fn node_index(&self, node: &str) -> LookupResult<u64> {
        Ok(node_index(node)?)
    }

    pub fn node_nodeset_name(&self, node: &str) -> LookupResult<String> {
        Ok(node_desc(node)?.nodeset)
    }

    pub fn node_prefix(&self, node: &str) -> LookupResult<String> {
        Ok(node_desc(node)?.prefix)
    }

    /// Names of the (static, dynamic-max) nodes of a nodeset. Dynamic and
    /// unknown nodesets have no enumerable names.
    ///
    /// Fails with `HostlistError::TooLarge` rather than allocate more than
    /// `MAX_EXPANSION` names.
    pub fn node_names(&self, nodeset: &str) -> LookupResult<(Vec<String>, Vec<String>)> {
        let Some((statics, dynamics)) = self.topology.get(nodeset).and_then(NodesetTopology::index_ranges) else {
            return Ok((Vec::new(), Vec::new()));
        };
        let prefix = self.nodeset_prefix(nodeset);
        if dynamics.end > MAX_EXPANSION as u64 {
            return Err(HostlistError::TooLarge {
                term: format!("{prefix}-[0-{}]", dynamics.end - 1),
                limit: MAX_EXPANSION,
            }
            .into());
        }
        let names = |r: Range<u64>| r.map(|i| format!("{prefix}-{i}")).collect::<Vec<_>>();
        Ok((names(statics), names(dynamics)))
    }

    /// Hostlist of every enumerable node of a nodeset, built from the index
    /// bounds without enumerating names.
    pub fn nodeset_hostlist(&self, nodeset: &str) -> String {
        match self.topology.get(nodeset).and_then(NodesetTopology::capacity) {
            Some(capacity) => range_to_hostlist(&format!("{}-", self.nodeset_prefix(nodeset)), 0..capacity),
            None => String::new(),
        }
    }

    // ── Node state ─────────────────────────────────────────────────

    /// Canonical scheduler state of a node.
    ///
    /// `Ok(None)` means the node has no canonical state: its nodeset is
    /// unknown or dynamic, or its index is beyond the nodeset's current
    /// capacity. A node inside the bounds must be present in the live
    /// snapshot; if it is not, the inventory is out of sync and
    /// `LookupError::Desync` is returned.
    pub fn node_state(&self, node: &str) -> LookupResult<Option<NodeState>> {
        let desc = node_desc(node)?;

        let Some(topo) = self.topology.get(&desc.nodeset) else {
            debug!(node, nodeset = %desc.nodeset, "nodeset not configured");
            return Ok(None);
        };
        let Some(capacity) = topo.capacity() else {
            debug!(node, nodeset = %desc.nodeset, "dynamic nodeset, no canonical state");
            return Ok(None);
        };

        let index = match node_index(node) {
            Ok(index) => index,
            Err(NameError::IndexTooLarge { .. }) => {
                debug!(node, capacity, "node index beyond u64, outside nodeset capacity");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        if index >= capacity {
            debug!(node, index, capacity, "node index beyond nodeset capacity");
            return Ok(None);
        }

        let states = self
            .collaborators
            .live_nodes
            .node_states()
            .map_err(LookupError::Accessor)?;
        match states.get(node) {
            Some(state) => Ok(Some(state.clone())),
            None => {
                error!(
                    node,
                    nodeset = %desc.nodeset,
                    index,
                    capacity,
                    "in-bounds node missing from scheduler inventory"
                );
                Err(LookupError::Desync {
                    node: node.to_string(),
                    nodeset: desc.nodeset,
                })
            }
        }
    }

    // ── Jobs ───────────────────────────────────────────────────────

    pub fn parse_job_info(&self, record: &str) -> Result<Job, JobParseError> {
        parse_job_info(record)
    }
}
