//! Command-level interconnect wrapper.
//!
//! `InterconnectWrapper` accepts one command at a time and walks it through
//! Pending (dispatched, not yet sent), InFlight (flits in the network),
//! Received (tail arrived, node busy) and Handled (node freed). Under the
//! default immediate hand-off the last two transitions happen in the same
//! `cycle_step`; under deferred hand-off the driver triggers the last one
//! with `handle_received_command`.

use std::collections::HashMap;

use tracing::debug;

use crate::common::context::SimContext;
use crate::common::error::SimError;
use crate::common::ids::{Cycle, NodeId, PacketId};
use crate::config::{Config, HandoffMode};
use crate::icnt::command::InterconnectCommand;
use crate::network::crossbar::Crossbar;
use crate::network::traits::Network;
use crate::stats::TrafficStats;
use crate::traffic::interface::TrafficManagerInterface;

/// Drives a `TrafficManagerInterface` from driver commands.
#[derive(Debug)]
pub struct InterconnectWrapper<N: Network = Crossbar> {
    icnt: TrafficManagerInterface<N>,
    node_num: usize,
    handoff: HandoffMode,
    dispatched: Option<InterconnectCommand>,
    ongoing: HashMap<PacketId, InterconnectCommand>,
}

impl InterconnectWrapper<Crossbar> {
    /// Builds a wrapper over one reference crossbar per subnet.
    ///
    /// ```
    /// use flitsim_core::config::Config;
    /// use flitsim_core::icnt::{InterconnectCommand, InterconnectWrapper};
    ///
    /// let mut icnt = InterconnectWrapper::new(&Config::default()).unwrap();
    /// let cmd = InterconnectCommand::control_packet(0, 1, 0, 10, false);
    /// assert!(icnt.dispatch_command(&cmd));
    /// while !cmd.is_received() {
    ///     icnt.cycle_step().unwrap();
    /// }
    /// assert!(cmd.is_handled());
    /// ```
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        let ctx = SimContext::new(config);
        let networks = Crossbar::for_subnets(config, &ctx);
        Self::with_networks(config, ctx, networks)
    }
}

impl<N: Network> InterconnectWrapper<N> {
    /// Builds a wrapper over caller-supplied substrates, one per subnet.
    pub fn with_networks(config: &Config, ctx: SimContext, networks: Vec<N>) -> Result<Self, SimError> {
        let icnt = TrafficManagerInterface::new(config, ctx, networks)?;
        Ok(Self::from_interface(icnt, config.traffic.handoff))
    }

    /// Wraps an existing interface.
    pub fn from_interface(icnt: TrafficManagerInterface<N>, handoff: HandoffMode) -> Self {
        let node_num = icnt.traffic_manager().nodes();
        Self {
            icnt,
            node_num,
            handoff,
            dispatched: None,
            ongoing: HashMap::new(),
        }
    }

    /// Queues `cmd` for sending on the next `cycle_step`.
    ///
    /// # Returns
    ///
    /// `false`, leaving `cmd` untouched, while another command is pending or
    /// in flight.
    pub fn dispatch_command(&mut self, cmd: &InterconnectCommand) -> bool {
        if self.has_outstanding_command() {
            return false;
        }
        self.dispatched = Some(cmd.clone());
        true
    }

    /// Advances the network by one cycle, completes arrived commands and sends
    /// the pending one.
    pub fn cycle_step(&mut self) -> Result<(), SimError> {
        self.icnt.step()?;

        for node in 0..self.node_num {
            let Some(pid) = self.icnt.pid(node) else {
                continue;
            };
            let cmd = self
                .ongoing
                .get(&pid)
                .ok_or(SimError::UnknownPacket { node, pid })?;
            if !cmd.is_received() {
                let desc = self.icnt.packet_descriptor(node);
                debug!(
                    cycle = self.icnt.traffic_manager().time(),
                    node,
                    pid = %pid,
                    packet_type = ?desc.map(|d| d.packet_type),
                    "command received"
                );
                cmd.set_received();
            }
            if self.handoff == HandoffMode::Immediate
                && let Some(cmd) = self.ongoing.remove(&pid)
            {
                self.icnt.handle_packet(node);
                cmd.set_handled();
            }
        }

        if let Some(cmd) = self.dispatched.clone() {
            let spec = *cmd.spec();
            let pid = self
                .icnt
                .send_packet(spec.src, spec.dst, spec.subnet, cmd.descriptor())?;
            cmd.reset_status();
            debug!(
                cycle = self.icnt.traffic_manager().time(),
                src = spec.src,
                dst = spec.dst,
                pid = %pid,
                "command sent"
            );
            let _ = self.ongoing.insert(pid, cmd);
            self.dispatched = None;
        }
        Ok(())
    }

    /// Frees the destination of a received command under deferred hand-off.
    ///
    /// # Returns
    ///
    /// `true` if `cmd` was received, not yet handled, and still occupies its
    /// destination; the node is then freed and `cmd` marked handled.
    pub fn handle_received_command(&mut self, cmd: &InterconnectCommand) -> bool {
        if !cmd.is_received() || cmd.is_handled() {
            return false;
        }
        let node = cmd.spec().dst;
        let Some(pid) = self.icnt.pid(node) else {
            return false;
        };
        if !self.ongoing.get(&pid).is_some_and(|c| c.same_command(cmd)) {
            return false;
        }
        let _ = self.ongoing.remove(&pid);
        self.icnt.handle_packet(node);
        cmd.set_handled();
        true
    }

    /// Returns `true` while a command is pending or not yet handled.
    pub fn has_outstanding_command(&self) -> bool {
        self.dispatched.is_some() || !self.ongoing.is_empty()
    }

    /// Returns `true` while `node` holds a received, unhandled packet.
    pub fn is_node_busy(&self, node: NodeId) -> bool {
        self.icnt.is_node_busy(node)
    }

    /// Current simulation cycle.
    pub fn time(&self) -> Cycle {
        self.icnt.traffic_manager().time()
    }

    /// Statistics gathered so far.
    pub fn stats(&self) -> &TrafficStats {
        self.icnt.traffic_manager().stats()
    }

    /// Hand-off mode in effect.
    pub fn handoff(&self) -> HandoffMode {
        self.handoff
    }

    /// Underlying interface.
    pub fn interface(&self) -> &TrafficManagerInterface<N> {
        &self.icnt
    }
}
