//! # Error Tests
//!
//! Display output of fatal errors, and conversion of configuration errors.

use flitsim_core::common::{ConfigError, FlitId, PacketId, SimError};

#[test]
fn test_destination_message_names_node_count() {
    let e = SimError::DestinationOutOfRange { dest: 4, nodes: 4 };
    assert_eq!(
        e.to_string(),
        "incorrect packet destination 4 (network has 4 nodes)"
    );
}

#[test]
fn test_missing_head_message() {
    let e = SimError::MissingHeadFlit {
        flit: FlitId(7),
        pid: PacketId(2),
    };
    let msg = e.to_string();
    assert!(msg.contains("tail flit 7"));
    assert!(msg.contains("packet 2"));
}

#[test]
fn test_config_error_converts_transparently() {
    let inner = ConfigError::Invalid {
        field: "network.nodes",
        reason: "must be at least 1".to_string(),
    };
    let e: SimError = inner.into();
    assert!(matches!(e, SimError::Config(_)));
    assert_eq!(
        e.to_string(),
        "invalid value for `network.nodes`: must be at least 1"
    );
}
