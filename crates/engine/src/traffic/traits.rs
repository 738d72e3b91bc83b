//! Traffic engine seams.
//!
//! `TrafficEngine` is the narrow surface an interface layer drives: create a
//! packet, retire a flit, advance one cycle. `ArrivalObserver` is the callback
//! surface the engine uses during a step to ask whether a node can accept
//! flits and to report completed packets.

use crate::common::error::SimError;
use crate::common::ids::{ClassId, Cycle, NodeId, PacketId, SubnetId};
use crate::flit::{Flit, FlitType};

/// Per-node arrival state consulted while stepping.
pub trait ArrivalObserver {
    /// Returns `true` if `node` must not accept flits this cycle.
    fn is_node_busy(&self, node: NodeId) -> bool;

    /// Called when the tail flit of `pid` is ejected at `node`.
    fn receive_packet(&mut self, node: NodeId, pid: PacketId);
}

/// Packet-level traffic engine.
pub trait TrafficEngine {
    /// Materializes a packet of `flit_count` flits into the input queue of
    /// (`subnet`, `source`, `class`).
    ///
    /// # Arguments
    ///
    /// * `source` - Injecting node.
    /// * `class` - Traffic class.
    /// * `time` - Creation time stamped on every flit.
    /// * `subnet` - Subnetwork to travel on.
    /// * `flit_count` - Number of flits, at least 1.
    /// * `kind` - Payload kind stamped on every flit.
    /// * `dest` - Destination node, recorded on the head flit.
    ///
    /// # Returns
    ///
    /// The id of the new packet.
    fn generate_packet(
        &mut self,
        source: NodeId,
        class: ClassId,
        time: Cycle,
        subnet: SubnetId,
        flit_count: usize,
        kind: FlitType,
        dest: NodeId,
    ) -> Result<PacketId, SimError>;

    /// Retires a flit ejected at `dest`, recording its statistics.
    fn retire_flit(&mut self, flit: Flit, dest: NodeId) -> Result<(), SimError>;

    /// Advances the engine by exactly one cycle.
    fn step(&mut self, observer: &mut dyn ArrivalObserver) -> Result<(), SimError>;
}
