//! # Packet Descriptor Tests
//!
//! Flit counts, packet types and payload kinds produced by the descriptor
//! factory.

use flitsim_core::flit::FlitType;
use flitsim_core::packet::{PacketDescriptor, PacketType};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case(8, true, false, PacketType::DataWriteRequest, 9, FlitType::WriteRequest)]
#[case(8, true, true, PacketType::DataWriteResponse, 1, FlitType::WriteReply)]
#[case(8, false, false, PacketType::DataReadRequest, 1, FlitType::ReadRequest)]
#[case(8, false, true, PacketType::DataReadResponse, 9, FlitType::ReadReply)]
#[case(0, true, false, PacketType::DataWriteRequest, 1, FlitType::WriteRequest)]
fn test_data_packet(
    #[case] size: usize,
    #[case] is_write: bool,
    #[case] is_response: bool,
    #[case] packet_type: PacketType,
    #[case] packet_size: usize,
    #[case] flit_type: FlitType,
) {
    let desc = PacketDescriptor::new_data_packet(size, is_write, is_response);
    assert_eq!(desc.packet_type, packet_type);
    assert_eq!(desc.packet_size, packet_size);
    assert_eq!(desc.flit_type, flit_type);
    assert!(desc.is_data_packet());
    assert!(!desc.is_control_packet());
}

#[rstest]
#[case(0, false, PacketType::ControlRequest, 1)]
#[case(0, true, PacketType::ControlResponse, 1)]
#[case(10, false, PacketType::ControlRequest, 11)]
#[case(10, true, PacketType::ControlResponse, 11)]
fn test_control_packet(
    #[case] payload: usize,
    #[case] is_response: bool,
    #[case] packet_type: PacketType,
    #[case] packet_size: usize,
) {
    let desc = PacketDescriptor::new_control_packet(payload, is_response);
    assert_eq!(desc.packet_type, packet_type);
    assert_eq!(desc.packet_size, packet_size);
    assert_eq!(desc.flit_type, FlitType::WriteRequest);
    assert!(desc.is_control_packet());
}

proptest! {
    #[test]
    fn prop_data_packets_never_empty(size in 0usize..4096, is_write: bool, is_response: bool) {
        let desc = PacketDescriptor::new_data_packet(size, is_write, is_response);
        prop_assert!(desc.packet_size >= 1);
        let carries_payload = is_write != is_response;
        let expected = if carries_payload { size + 1 } else { 1 };
        prop_assert_eq!(desc.packet_size, expected);
    }

    #[test]
    fn prop_control_size_ignores_response_flag(payload in 0usize..4096) {
        let req = PacketDescriptor::new_control_packet(payload, false);
        let resp = PacketDescriptor::new_control_packet(payload, true);
        prop_assert_eq!(req.packet_size, payload + 1);
        prop_assert_eq!(req.packet_size, resp.packet_size);
    }
}
