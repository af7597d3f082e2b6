//! `slurmgcp nodeset list`: nodesets of a cluster config, without touching
//! the scheduler or Compute Engine.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use serde_json::{Value, json};
use slurmgcp_core::{ClusterConfig, NodeState};
use slurmgcp_lookup::{Collaborators, FutureReservationAccessor, LiveNodeStates, Lookup, ReservationAccessor};
use tracing::debug;

/// Collaborators for commands that only inspect configuration.
struct Offline;

impl LiveNodeStates for Offline {
    fn node_states(&self) -> Result<HashMap<String, NodeState>> {
        bail!("live node state is not available offline")
    }
}

impl ReservationAccessor for Offline {
    fn get_reservation(&self, project: &str, zone: &str, name: &str) -> Result<Value> {
        bail!("cannot fetch reservation {project}/{zone}/{name} offline")
    }
}

impl FutureReservationAccessor for Offline {
    fn get_future_reservation(&self, project: &str, zone: &str, name: &str) -> Result<Value> {
        bail!("cannot fetch future reservation {project}/{zone}/{name} offline")
    }
}

fn offline_lookup(config: &ClusterConfig) -> Result<Lookup> {
    let offline = Arc::new(Offline);
    let collaborators = Collaborators::new(offline.clone(), offline.clone(), offline);
    Ok(Lookup::new(config, collaborators)?)
}

fn rows(lookup: &Lookup) -> Vec<Value> {
    lookup
        .topology()
        .iter()
        .map(|(name, topo)| {
            let ns = lookup.nodeset_config(name);
            json!({
                "nodeset": name,
                "kind": topo.kind(),
                "prefix": lookup.nodeset_prefix(name),
                "capacity": topo.capacity(),
                "hostlist": lookup.nodeset_hostlist(name),
                "reservation": ns.and_then(|ns| ns.reservation()),
                "future_reservation": ns.and_then(|ns| ns.future_reservation()),
            })
        })
        .collect()
}

fn render_text(lookup: &Lookup) -> String {
    let mut out = String::new();
    for (name, topo) in lookup.topology().iter() {
        let hostlist = lookup.nodeset_hostlist(name);
        let hostlist = if hostlist.is_empty() { "-" } else { hostlist.as_str() };
        out.push_str(&format!("{name:<20} {:<8} {hostlist}\n", topo.kind().to_string()));
    }
    out
}

pub fn list(config: &str, format: &str) -> Result<()> {
    let config = ClusterConfig::from_file(Path::new(config))?;
    let lookup = offline_lookup(&config)?;
    debug!(cluster = lookup.cluster_name(), nodesets = lookup.topology().len(), "listing nodesets");

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&rows(&lookup))?),
        _ => print!("{}", render_text(&lookup)),
    }
    Ok(())
}
