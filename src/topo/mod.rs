//! 拓扑构建

mod builder;

pub use builder::{RouterNode, Topology, build_topology};
