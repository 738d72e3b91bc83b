//! Identifier types.
//!
//! Flit and packet ids are newtypes so they cannot be mixed up with node or VC
//! indices; both are allocated from monotonically increasing counters and are
//! never reused within a run. Node, subnet, class and VC indices are plain
//! `usize` aliases because they index directly into per-node tables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Simulation time in cycles.
pub type Cycle = u64;

/// Index of a network endpoint (compute or memory node).
pub type NodeId = usize;

/// Index of an independent subnetwork.
pub type SubnetId = usize;

/// Index of a traffic class.
pub type ClassId = usize;

/// Index of a virtual channel.
pub type VcId = usize;

/// Globally unique flit identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlitId(pub u64);

/// Identifier shared by every flit of one packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PacketId(pub u64);

impl fmt::Display for FlitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
