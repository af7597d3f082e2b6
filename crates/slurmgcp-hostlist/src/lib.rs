//! slurmgcp-hostlist: node naming and hostlist algebra.
//!
//! Node names follow `<cluster>-<nodeset>-<node>`. Sets of names are passed
//! to the scheduler in its compact hostlist notation, where numeric suffixes
//! are folded into bracketed ranges:
//!
//! ```text
//! c-n-0,c-n-1,c-n-2,c-n-7   <->   c-n-[0-2,7]
//! ```
//!
//! Zero-padding is significant: `n-08` and `n-8` are different nodes, so
//! names are grouped by suffix width and each width keeps its own runs.

pub mod codec;
pub mod error;
pub mod node_name;

pub use codec::{MAX_EXPANSION, expand, range_to_hostlist, to_hostlist};
pub use error::{HostlistError, HostlistResult, NameError, NameResult};
pub use node_name::{NodeDesc, NodeSuffix, node_desc, node_index};
