//! Flit and credit definitions.
//!
//! A `Flit` is the smallest unit that moves through the network. It is a
//! plain value: exactly one container owns it at any time (an input queue,
//! the network substrate, or the pending-heads table), and ownership moves
//! with it. A `Credit` returns buffer space for one or more VCs upstream.

use serde::{Deserialize, Serialize};

use crate::common::ids::{ClassId, Cycle, FlitId, NodeId, PacketId, SubnetId, VcId};

/// Payload kind carried by every flit of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlitType {
    /// Request for data held at the destination.
    ReadRequest,
    /// Data returned for a read request.
    ReadReply,
    /// Data (or control payload) pushed to the destination.
    #[default]
    WriteRequest,
    /// Acknowledgement of a write.
    WriteReply,
    /// Untyped traffic.
    AnyType,
}

/// A single flow-control unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flit {
    /// Globally unique, monotonically increasing id.
    pub id: FlitId,
    /// Packet this flit belongs to.
    pub pid: PacketId,
    /// Traffic class.
    pub cl: ClassId,
    /// Subnetwork the packet travels on.
    pub subnet: SubnetId,
    /// Injecting node.
    pub src: NodeId,
    /// Destination node; only present on the head flit.
    pub dest: Option<NodeId>,
    /// First flit of its packet.
    pub head: bool,
    /// Last flit of its packet.
    pub tail: bool,
    /// Payload kind.
    pub kind: FlitType,
    /// Cycle the packet was generated.
    pub ctime: Cycle,
    /// Cycle the flit was injected into the network.
    pub itime: Cycle,
    /// Cycle the flit was ejected at its destination.
    pub atime: Cycle,
    /// Arbitration priority; higher wins.
    pub pri: i32,
    /// Assigned virtual channel; fixed once set until the flit is forwarded.
    pub vc: Option<VcId>,
    /// Links traversed, maintained by the network substrate.
    pub hops: u32,
    /// Trace this flit's arbitration and injection at debug level.
    pub watch: bool,
}

impl Flit {
    /// Creates an unassigned body flit with all timestamps at `ctime`.
    ///
    /// Head/tail flags, destination, priority and watch state are filled in by
    /// the traffic manager during packet generation.
    pub fn new(id: FlitId, pid: PacketId, cl: ClassId, subnet: SubnetId, src: NodeId, ctime: Cycle) -> Self {
        Self {
            id,
            pid,
            cl,
            subnet,
            src,
            dest: None,
            head: false,
            tail: false,
            kind: FlitType::default(),
            ctime,
            itime: ctime,
            atime: ctime,
            pri: 0,
            vc: None,
            hops: 0,
            watch: false,
        }
    }
}

/// Buffer credit returned upstream for the listed VCs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credit {
    /// VCs for which one buffer slot each was freed.
    pub vcs: Vec<VcId>,
}

impl Credit {
    /// Creates a credit for a single VC.
    pub fn new(vc: VcId) -> Self {
        Self { vcs: vec![vc] }
    }

    /// Adds one more freed slot for `vc`.
    pub fn push(&mut self, vc: VcId) {
        self.vcs.push(vc);
    }

    /// Returns `true` if the credit frees nothing.
    pub fn is_empty(&self) -> bool {
        self.vcs.is_empty()
    }
}
