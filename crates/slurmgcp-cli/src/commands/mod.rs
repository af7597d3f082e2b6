pub mod describe;
pub mod hostlist;
pub mod job;
pub mod node;
pub mod nodeset;
