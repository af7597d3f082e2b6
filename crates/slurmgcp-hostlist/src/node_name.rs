//! Node name decomposition.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{NameError, NameResult};

static NODE_DESC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<prefix>(?P<cluster>[^\s\-]+)-(?P<nodeset>\S+))-(?P<node>(?P<suffix>\w+)|(?P<range>\[[\d,-]+\]))$",
    )
    .expect("node name pattern is valid")
});

/// The node part of a name: either one literal token or a bracketed range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSuffix {
    /// `23` in `c-n-23`, `xyzf` in `c-n-xyzf`.
    Literal(String),
    /// `[2-3]` in `c-n-[2-3]`.
    Range(String),
}

/// Components of `<cluster>-<nodeset>-<node>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDesc {
    pub cluster: String,
    pub nodeset: String,
    pub node: String,
    /// `<cluster>-<nodeset>`
    pub prefix: String,
    pub part: NodeSuffix,
}

impl NodeDesc {
    pub fn suffix(&self) -> Option<&str> {
        match &self.part {
            NodeSuffix::Literal(s) => Some(s),
            NodeSuffix::Range(_) => None,
        }
    }

    pub fn range(&self) -> Option<&str> {
        match &self.part {
            NodeSuffix::Literal(_) => None,
            NodeSuffix::Range(r) => Some(r),
        }
    }
}

/// Decompose a node name.
///
/// The cluster name cannot contain hyphens; the nodeset name can. A
/// fully-qualified hostname is reduced to its first label first.
pub fn node_desc(name: &str) -> NameResult<NodeDesc> {
    let short = name.split('.').next().unwrap_or(name);
    let caps = NODE_DESC_RE
        .captures(short)
        .ok_or_else(|| NameError::Malformed(name.to_string()))?;
    let group = |g: &str| caps.name(g).map(|m| m.as_str().to_string());

    let part = match (group("suffix"), group("range")) {
        (Some(suffix), None) => NodeSuffix::Literal(suffix),
        (None, Some(range)) => NodeSuffix::Range(range),
        _ => return Err(NameError::Malformed(name.to_string())),
    };

    Ok(NodeDesc {
        cluster: group("cluster").unwrap_or_default(),
        nodeset: group("nodeset").unwrap_or_default(),
        node: group("node").unwrap_or_default(),
        prefix: group("prefix").unwrap_or_default(),
        part,
    })
}

/// Numeric index of a node, e.g. `23` for `c-n-23`.
///
/// A numeric suffix beyond `u64` is `IndexTooLarge`, not `NotAnIndex`: the
/// name is well formed, the index just exceeds any nodeset.
pub fn node_index(name: &str) -> NameResult<u64> {
    let desc = node_desc(name)?;
    match desc.suffix() {
        Some(s) if s.bytes().all(|b| b.is_ascii_digit()) => s.parse().map_err(|_| NameError::IndexTooLarge {
            name: name.to_string(),
            node: desc.node.clone(),
        }),
        _ => Err(NameError::NotAnIndex {
            name: name.to_string(),
            node: desc.node.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_desc_literal_index() {
        let desc = node_desc("az-buka-23").unwrap();
        assert_eq!(desc.cluster, "az");
        assert_eq!(desc.nodeset, "buka");
        assert_eq!(desc.node, "23");
        assert_eq!(desc.prefix, "az-buka");
        assert_eq!(desc.suffix(), Some("23"));
        assert_eq!(desc.range(), None);
    }

    #[test]
    fn test_node_desc_literal_token() {
        let desc = node_desc("az-buka-xyzf").unwrap();
        assert_eq!(desc.node, "xyzf");
        assert_eq!(desc.suffix(), Some("xyzf"));
        assert_eq!(desc.range(), None);
    }

    #[test]
    fn test_node_desc_range() {
        let desc = node_desc("az-buka-[2-3]").unwrap();
        assert_eq!(desc.nodeset, "buka");
        assert_eq!(desc.node, "[2-3]");
        assert_eq!(desc.prefix, "az-buka");
        assert_eq!(desc.suffix(), None);
        assert_eq!(desc.range(), Some("[2-3]"));
    }

    #[test]
    fn test_node_desc_hyphenated_nodeset_and_fqdn() {
        let desc = node_desc("c-gpu-a100-4.c.project.internal").unwrap();
        assert_eq!(desc.cluster, "c");
        assert_eq!(desc.nodeset, "gpu-a100");
        assert_eq!(desc.suffix(), Some("4"));
    }

    #[test]
    fn test_node_desc_fail() {
        assert!(matches!(node_desc("az-buka"), Err(NameError::Malformed(_))));
        assert!(matches!(node_desc(""), Err(NameError::Malformed(_))));
    }

    #[test]
    fn test_node_index() {
        assert_eq!(node_index("az-buka-23").unwrap(), 23);
        assert_eq!(node_index("az-buka-0").unwrap(), 0);
        assert!(matches!(node_index("az-buka"), Err(NameError::Malformed(_))));
        assert!(matches!(node_index("az-buka-xyzf"), Err(NameError::NotAnIndex { .. })));
        assert!(matches!(node_index("az-buka-[2-3]"), Err(NameError::NotAnIndex { .. })));
    }

    #[test]
    fn test_node_index_beyond_u32() {
        assert_eq!(node_index("c-n-5000000000").unwrap(), 5_000_000_000);
        assert_eq!(node_index("c-n-007").unwrap(), 7);
        assert!(matches!(
            node_index("c-n-99999999999999999999999"),
            Err(NameError::IndexTooLarge { .. })
        ));
    }
}
