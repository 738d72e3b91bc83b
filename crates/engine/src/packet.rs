//! Packet descriptors.
//!
//! A `PacketDescriptor` classifies a logical transfer (data read/write
//! request/response or control request/response) into a flit count and the
//! payload kind stamped on every flit. Every packet carries one extra
//! header/command flit on top of its payload, so even a zero-payload
//! acknowledgement occupies a flit and its arrival is observable.

use serde::{Deserialize, Serialize};

use crate::flit::FlitType;

/// Kind of logical transfer a packet represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketType {
    /// Request to read data; the data itself follows in a response.
    DataReadRequest,
    /// Data returned for a read.
    DataReadResponse,
    /// Data pushed to the destination.
    DataWriteRequest,
    /// Acknowledgement of a write.
    DataWriteResponse,
    /// Control message.
    ControlRequest,
    /// Reply to a control message.
    ControlResponse,
}

/// Flit count and payload kind for one packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketDescriptor {
    /// Transfer kind.
    pub packet_type: PacketType,
    /// Number of flits, header included.
    pub packet_size: usize,
    /// Payload kind for every flit.
    pub flit_type: FlitType,
}

impl PacketDescriptor {
    /// Creates a descriptor from its parts.
    pub fn new(packet_type: PacketType, packet_size: usize, flit_type: FlitType) -> Self {
        Self {
            packet_type,
            packet_size,
            flit_type,
        }
    }

    /// Describes a data packet of `size` payload flits.
    ///
    /// Write requests and read responses carry the payload; write responses
    /// and read requests carry none. One header flit is always added.
    ///
    /// ```
    /// use flitsim_core::packet::{PacketDescriptor, PacketType};
    ///
    /// let write = PacketDescriptor::new_data_packet(8, true, false);
    /// assert_eq!(write.packet_type, PacketType::DataWriteRequest);
    /// assert_eq!(write.packet_size, 9);
    ///
    /// let ack = PacketDescriptor::new_data_packet(8, true, true);
    /// assert_eq!(ack.packet_size, 1);
    /// ```
    pub fn new_data_packet(size: usize, is_write: bool, is_response: bool) -> Self {
        let (packet_type, flit_type, payload) = match (is_write, is_response) {
            (true, false) => (PacketType::DataWriteRequest, FlitType::WriteRequest, size),
            (true, true) => (PacketType::DataWriteResponse, FlitType::WriteReply, 0),
            (false, false) => (PacketType::DataReadRequest, FlitType::ReadRequest, 0),
            (false, true) => (PacketType::DataReadResponse, FlitType::ReadReply, size),
        };
        Self::new(packet_type, payload + 1, flit_type)
    }

    /// Describes a control packet carrying `payload_size` payload flits.
    pub fn new_control_packet(payload_size: usize, is_response: bool) -> Self {
        let packet_type = if is_response {
            PacketType::ControlResponse
        } else {
            PacketType::ControlRequest
        };
        Self::new(packet_type, payload_size + 1, FlitType::WriteRequest)
    }

    /// Returns `true` for data read/write packets.
    pub fn is_data_packet(&self) -> bool {
        matches!(
            self.packet_type,
            PacketType::DataReadRequest
                | PacketType::DataReadResponse
                | PacketType::DataWriteRequest
                | PacketType::DataWriteResponse
        )
    }

    /// Returns `true` for control packets.
    pub fn is_control_packet(&self) -> bool {
        !self.is_data_packet()
    }
}
