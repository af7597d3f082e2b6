//! Cluster configuration parser (`cluster.toml`).
//!
//! Nodesets are declared in one of three tables, by kind:
//!
//! ```toml
//! slurm_cluster_name = "c"
//!
//! [nodeset.n]
//! node_count_static = 2
//! node_count_dynamic_max = 3
//! zone_policy_allow = ["us-central1-a"]
//! reservation_name = "projects/p/reservations/r"
//!
//! [nodeset_tpu.t]
//! node_count_static = 1
//!
//! [nodeset_dyn.d]
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClusterConfig {
    pub slurm_cluster_name: String,
    #[serde(default)]
    pub nodeset: BTreeMap<String, NodesetConfig>,
    #[serde(default)]
    pub nodeset_tpu: BTreeMap<String, NodesetConfig>,
    #[serde(default)]
    pub nodeset_dyn: BTreeMap<String, NodesetConfig>,
}

/// Settings of a single nodeset. Dynamic nodesets only use the name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodesetConfig {
    /// Filled from the table key when omitted.
    #[serde(default)]
    pub nodeset_name: String,
    #[serde(default)]
    pub node_count_static: u32,
    #[serde(default)]
    pub node_count_dynamic_max: u32,
    /// `projects/<project>/reservations/<name>[/...]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_name: Option<String>,
    #[serde(default)]
    pub zone_policy_allow: Vec<String>,
    /// `projects/<project>/zones/<zone>/futureReservations/<name>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_reservation: Option<String>,
}

impl NodesetConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            nodeset_name: name.into(),
            ..Self::default()
        }
    }

    /// The configured reservation reference, if set and non-blank.
    pub fn reservation(&self) -> Option<&str> {
        non_blank(self.reservation_name.as_deref())
    }

    /// The configured future-reservation reference, if set and non-blank.
    pub fn future_reservation(&self) -> Option<&str> {
        non_blank(self.future_reservation.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

impl ClusterConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let mut config: ClusterConfig = toml::from_str(content)?;
        config.fill_nodeset_names();
        config.validate()?;
        debug!(
            cluster = %config.slurm_cluster_name,
            nodesets = config.nodeset.len(),
            tpu = config.nodeset_tpu.len(),
            dynamic = config.nodeset_dyn.len(),
            "loaded cluster config"
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that the cluster is named and no nodeset id is declared under
    /// more than one kind.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.slurm_cluster_name.trim().is_empty() {
            return Err(ConfigError::MissingClusterName);
        }
        let mut seen = HashSet::new();
        for name in self
            .nodeset
            .keys()
            .chain(self.nodeset_tpu.keys())
            .chain(self.nodeset_dyn.keys())
        {
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateNodeset(name.clone()));
            }
        }
        Ok(())
    }

    fn fill_nodeset_names(&mut self) {
        for table in [&mut self.nodeset, &mut self.nodeset_tpu, &mut self.nodeset_dyn] {
            for (key, ns) in table.iter_mut() {
                if ns.nodeset_name.is_empty() {
                    ns.nodeset_name = key.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
slurm_cluster_name = "c"

[nodeset.n]
node_count_static = 2
node_count_dynamic_max = 3
zone_policy_allow = ["eine"]
reservation_name = "projects/bobin/reservations/robin"

[nodeset_tpu.t]
node_count_static = 2
node_count_dynamic_max = 3

[nodeset_dyn.d]
"#;

    #[test]
    fn test_parse_sample() {
        let config = ClusterConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.slurm_cluster_name, "c");
        let n = &config.nodeset["n"];
        assert_eq!(n.nodeset_name, "n");
        assert_eq!(n.node_count_static, 2);
        assert_eq!(n.node_count_dynamic_max, 3);
        assert_eq!(n.reservation(), Some("projects/bobin/reservations/robin"));
        assert_eq!(n.future_reservation(), None);
        assert_eq!(config.nodeset_tpu["t"].nodeset_name, "t");
        assert_eq!(config.nodeset_dyn["d"].node_count_static, 0);
    }

    #[test]
    fn test_blank_reservation_is_unset() {
        let mut ns = NodesetConfig::new("x");
        ns.reservation_name = Some("  ".to_string());
        ns.future_reservation = Some(String::new());
        assert_eq!(ns.reservation(), None);
        assert_eq!(ns.future_reservation(), None);
    }

    #[test]
    fn test_duplicate_nodeset_rejected() {
        let toml_str = r#"
slurm_cluster_name = "c"
[nodeset.n]
[nodeset_dyn.n]
"#;
        let err = ClusterConfig::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateNodeset(ref n) if n == "n"));
    }

    #[test]
    fn test_missing_cluster_name_rejected() {
        let err = ClusterConfig::from_toml_str("slurm_cluster_name = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::MissingClusterName));
    }

    #[test]
    fn test_toml_roundtrip_through_file() {
        let config = ClusterConfig::from_toml_str(SAMPLE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cluster.toml");
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        let reloaded = ClusterConfig::from_file(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = ClusterConfig::from_file(Path::new("/nonexistent/cluster.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
