//! Interconnect commands.
//!
//! An `InterconnectCommand` is the driver's handle on one transfer. Clones
//! share the same completion flags, so the driver can keep one copy and poll
//! it while the wrapper holds another.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::common::ids::{NodeId, SubnetId};
use crate::packet::PacketDescriptor;

/// Transfer parameters of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Source node.
    pub src: NodeId,
    /// Destination node.
    pub dst: NodeId,
    /// Subnetwork to travel on.
    pub subnet: SubnetId,
    /// Payload size in flits.
    pub size: usize,
    /// Data transfer (`true`) or control message (`false`).
    pub is_data: bool,
    /// Write (`true`) or read (`false`); ignored for control messages.
    pub is_write: bool,
    /// Response (`true`) or request (`false`).
    pub is_response: bool,
}

#[derive(Debug, Default)]
struct CommandStatus {
    received: AtomicBool,
    handled: AtomicBool,
}

/// Shared handle on one interconnect transfer.
#[derive(Debug, Clone)]
pub struct InterconnectCommand {
    spec: CommandSpec,
    status: Arc<CommandStatus>,
}

impl InterconnectCommand {
    /// Creates a command from its parameters with both flags clear.
    pub fn new(spec: CommandSpec) -> Self {
        Self {
            spec,
            status: Arc::default(),
        }
    }

    /// Creates a data read or write command.
    ///
    /// ```
    /// use flitsim_core::icnt::InterconnectCommand;
    ///
    /// let cmd = InterconnectCommand::data_packet(0, 3, 0, 8, true, false);
    /// assert_eq!(cmd.descriptor().packet_size, 9);
    /// assert_eq!(cmd.expected_cycles(), 8);
    /// assert!(!cmd.is_received());
    /// ```
    pub fn data_packet(
        src: NodeId,
        dst: NodeId,
        subnet: SubnetId,
        size: usize,
        is_write: bool,
        is_response: bool,
    ) -> Self {
        Self::new(CommandSpec {
            src,
            dst,
            subnet,
            size,
            is_data: true,
            is_write,
            is_response,
        })
    }

    /// Creates a control command carrying `size` payload flits.
    pub fn control_packet(
        src: NodeId,
        dst: NodeId,
        subnet: SubnetId,
        size: usize,
        is_response: bool,
    ) -> Self {
        Self::new(CommandSpec {
            src,
            dst,
            subnet,
            size,
            is_data: false,
            is_write: false,
            is_response,
        })
    }

    /// Transfer parameters.
    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    /// Packet descriptor this command is sent as.
    pub fn descriptor(&self) -> PacketDescriptor {
        let s = &self.spec;
        if s.is_data {
            PacketDescriptor::new_data_packet(s.size, s.is_write, s.is_response)
        } else {
            PacketDescriptor::new_control_packet(s.size, s.is_response)
        }
    }

    /// First-order service time estimate: the payload size for data
    /// commands, one cycle for control commands.
    pub fn expected_cycles(&self) -> usize {
        if self.spec.is_data { self.spec.size } else { 1 }
    }

    /// The packet's tail flit has reached the destination.
    pub fn is_received(&self) -> bool {
        self.status.received.load(Ordering::Acquire)
    }

    /// The destination node has been freed.
    pub fn is_handled(&self) -> bool {
        self.status.handled.load(Ordering::Acquire)
    }

    /// Returns `true` if `other` is a clone of this command.
    pub fn same_command(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.status, &other.status)
    }

    pub(crate) fn set_received(&self) {
        self.status.received.store(true, Ordering::Release);
    }

    pub(crate) fn set_handled(&self) {
        self.status.handled.store(true, Ordering::Release);
    }

    pub(crate) fn reset_status(&self) {
        self.status.received.store(false, Ordering::Release);
        self.status.handled.store(false, Ordering::Release);
    }
}
