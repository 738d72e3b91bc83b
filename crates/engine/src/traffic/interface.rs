//! Per-node view over the traffic manager.
//!
//! `TrafficManagerInterface` turns the flit-level manager into a packet-level
//! service. For each destination node it records the descriptors of packets
//! sent to it and not yet handled, and the id of the packet whose tail most
//! recently arrived there. A node with such a packet is busy: the manager does
//! not eject further flits at it until the packet is handled.

use std::collections::HashMap;

use crate::common::context::SimContext;
use crate::common::error::SimError;
use crate::common::ids::{NodeId, PacketId, SubnetId};
use crate::config::Config;
use crate::network::traits::Network;
use crate::packet::PacketDescriptor;
use crate::traffic::manager::TrafficManager;
use crate::traffic::traits::{ArrivalObserver, TrafficEngine};

/// Arrival bookkeeping per destination node.
#[derive(Debug, Clone, Default)]
pub struct NodeArrivals {
    unhandled: Vec<HashMap<PacketId, PacketDescriptor>>,
    ongoing: Vec<Option<PacketId>>,
}

impl NodeArrivals {
    /// Creates idle bookkeeping for `nodes` nodes.
    pub fn new(nodes: usize) -> Self {
        Self {
            unhandled: vec![HashMap::new(); nodes],
            ongoing: vec![None; nodes],
        }
    }

    /// Packet currently occupying `node`, if any.
    pub fn pid(&self, node: NodeId) -> Option<PacketId> {
        self.ongoing.get(node).copied().flatten()
    }

    /// Packets sent to `node` and not yet handled.
    pub fn unhandled(&self, node: NodeId) -> usize {
        self.unhandled.get(node).map_or(0, HashMap::len)
    }
}

impl ArrivalObserver for NodeArrivals {
    fn is_node_busy(&self, node: NodeId) -> bool {
        self.pid(node).is_some()
    }

    fn receive_packet(&mut self, node: NodeId, pid: PacketId) {
        if let Some(slot) = self.ongoing.get_mut(node) {
            *slot = Some(pid);
        }
    }
}

/// Packet-level interface over a `TrafficManager`.
#[derive(Debug)]
pub struct TrafficManagerInterface<N: Network> {
    traffic_manager: TrafficManager<N>,
    arrivals: NodeArrivals,
}

impl<N: Network> TrafficManagerInterface<N> {
    /// Builds the manager over `networks` and wraps it.
    pub fn new(config: &Config, ctx: SimContext, networks: Vec<N>) -> Result<Self, SimError> {
        Ok(Self::from_traffic_manager(TrafficManager::new(
            config, ctx, networks,
        )?))
    }

    /// Wraps an existing manager with all nodes idle.
    pub fn from_traffic_manager(traffic_manager: TrafficManager<N>) -> Self {
        let arrivals = NodeArrivals::new(traffic_manager.nodes());
        Self {
            traffic_manager,
            arrivals,
        }
    }

    /// Generates a class-0 packet at the current time and registers its
    /// descriptor at `dst`.
    ///
    /// # Arguments
    ///
    /// * `src` - Injecting node.
    /// * `dst` - Destination node.
    /// * `subnet` - Subnetwork to travel on.
    /// * `desc` - Size and payload kind of the packet.
    ///
    /// # Returns
    ///
    /// The id of the new packet.
    pub fn send_packet(
        &mut self,
        src: NodeId,
        dst: NodeId,
        subnet: SubnetId,
        desc: PacketDescriptor,
    ) -> Result<PacketId, SimError> {
        let time = self.traffic_manager.time();
        let pid = self.traffic_manager.generate_packet(
            src,
            0,
            time,
            subnet,
            desc.packet_size,
            desc.flit_type,
            dst,
        )?;
        if let Some(table) = self.arrivals.unhandled.get_mut(dst) {
            let _ = table.insert(pid, desc);
        }
        Ok(pid)
    }

    /// Marks `dst` busy with `pid`.
    pub fn receive_packet(&mut self, dst: NodeId, pid: PacketId) {
        self.arrivals.receive_packet(dst, pid);
    }

    /// Frees `node` and forgets its packet's descriptor. No-op when idle.
    pub fn handle_packet(&mut self, node: NodeId) {
        let Some(pid) = self.arrivals.pid(node) else {
            return;
        };
        let _ = self.arrivals.unhandled[node].remove(&pid);
        self.arrivals.ongoing[node] = None;
    }

    /// Packet currently occupying `node`, if any.
    pub fn pid(&self, node: NodeId) -> Option<PacketId> {
        self.arrivals.pid(node)
    }

    /// Descriptor of the packet currently occupying `node`, if any.
    pub fn packet_descriptor(&self, node: NodeId) -> Option<PacketDescriptor> {
        let pid = self.arrivals.pid(node)?;
        self.arrivals.unhandled.get(node)?.get(&pid).copied()
    }

    /// Returns `true` while `node` holds a received, unhandled packet.
    pub fn is_node_busy(&self, node: NodeId) -> bool {
        self.arrivals.is_node_busy(node)
    }

    /// Advances the manager by one cycle.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.traffic_manager.step(&mut self.arrivals)
    }

    /// Arrival bookkeeping.
    pub fn arrivals(&self) -> &NodeArrivals {
        &self.arrivals
    }

    /// Underlying traffic manager.
    pub fn traffic_manager(&self) -> &TrafficManager<N> {
        &self.traffic_manager
    }

    /// Mutable underlying traffic manager.
    pub fn traffic_manager_mut(&mut self) -> &mut TrafficManager<N> {
        &mut self.traffic_manager
    }
}
