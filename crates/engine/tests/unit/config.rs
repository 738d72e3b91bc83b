//! # Configuration Tests
//!
//! Tests for configuration defaults, JSON deserialization, file loading and
//! validation.

use std::io::Write;

use flitsim_core::common::ConfigError;
use flitsim_core::config::*;
use flitsim_core::flit::FlitType;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.network.nodes, 2);
    assert_eq!(config.network.subnets, 1);
    assert_eq!(config.network.num_vcs, 4);
    assert_eq!(config.network.vc_buf_size, 8);
    assert_eq!(config.network.latency, 1);
    assert_eq!(config.traffic.classes, 1);
    assert_eq!(config.traffic.priority, PriorityScheme::None);
    assert_eq!(config.traffic.handoff, HandoffMode::Immediate);
    assert_eq!(config.traffic.deadlock_warn_timeout, 256);
    assert!(!config.traffic.hold_switch_for_packet);
    assert!(config.general.watch_flits.is_empty());
    assert!(!config.general.pair_stats);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_json_gives_defaults() {
    let config = Config::from_json_str("{}").unwrap();
    assert_eq!(config.network.nodes, 2);
    assert_eq!(config.traffic.classes, 1);
    assert_eq!(config.routing.range_for(FlitType::ReadReply), None);
}

#[test]
fn test_partial_sections_keep_defaults() {
    let config = Config::from_json_str(r#"{ "network": { "nodes": 64 } }"#).unwrap();
    assert_eq!(config.network.nodes, 64);
    assert_eq!(config.network.num_vcs, 4);
    assert_eq!(config.network.vc_buf_size, 8);
}

#[rstest]
#[case("\"None\"", PriorityScheme::None)]
#[case("\"none\"", PriorityScheme::None)]
#[case("\"ClassBased\"", PriorityScheme::ClassBased)]
#[case("\"class\"", PriorityScheme::ClassBased)]
#[case("\"age\"", PriorityScheme::AgeBased)]
#[case("\"network_age\"", PriorityScheme::NetworkAgeBased)]
#[case("\"SequenceBased\"", PriorityScheme::SequenceBased)]
#[case("\"sequence\"", PriorityScheme::SequenceBased)]
fn test_priority_scheme_names(#[case] json: &str, #[case] expected: PriorityScheme) {
    let parsed: PriorityScheme = serde_json::from_str(json).unwrap();
    assert_eq!(parsed, expected);
}

#[test]
fn test_routing_ranges_by_flit_type() {
    let json = r#"{
        "network": { "num_vcs": 4 },
        "routing": {
            "read_request": { "begin": 0, "end": 1 },
            "read_reply": { "begin": 2, "end": 3 }
        }
    }"#;
    let config = Config::from_json_str(json).unwrap();
    assert_eq!(
        config.routing.range_for(FlitType::ReadRequest),
        Some(VcRange { begin: 0, end: 1 })
    );
    assert_eq!(
        config.routing.range_for(FlitType::ReadReply),
        Some(VcRange { begin: 2, end: 3 })
    );
    assert_eq!(config.routing.range_for(FlitType::WriteRequest), None);
}

#[test]
fn test_class_priority_lookup() {
    let config =
        Config::from_json_str(r#"{ "traffic": { "classes": 2, "class_priority": [1, 9] } }"#)
            .unwrap();
    assert_eq!(config.traffic.class_priority(0), 1);
    assert_eq!(config.traffic.class_priority(1), 9);
    assert_eq!(config.traffic.class_priority(5), 0);
}

#[rstest]
#[case(r#"{ "network": { "nodes": 0 } }"#, "network.nodes")]
#[case(r#"{ "network": { "subnets": 0 } }"#, "network.subnets")]
#[case(r#"{ "network": { "num_vcs": 0 } }"#, "network.num_vcs")]
#[case(r#"{ "network": { "vc_buf_size": 0 } }"#, "network.vc_buf_size")]
#[case(r#"{ "network": { "latency": 0 } }"#, "network.latency")]
#[case(r#"{ "traffic": { "classes": 0 } }"#, "traffic.classes")]
#[case(r#"{ "traffic": { "deadlock_warn_timeout": 0 } }"#, "traffic.deadlock_warn_timeout")]
#[case(r#"{ "traffic": { "classes": 2, "class_priority": [1] } }"#, "traffic.class_priority")]
#[case(r#"{ "traffic": { "class_priority": [-1] } }"#, "traffic.class_priority")]
#[case(r#"{ "routing": { "read_request": { "begin": 0, "end": 4 } } }"#, "routing.read_request")]
#[case(r#"{ "routing": { "any_type": { "begin": 2, "end": 1 } } }"#, "routing.any_type")]
fn test_validation_rejects(#[case] json: &str, #[case] expected_field: &str) {
    match Config::from_json_str(json) {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("expected invalid {expected_field}, got {other:?}"),
    }
}

#[test]
fn test_malformed_json_is_parse_error() {
    assert!(matches!(
        Config::from_json_str("{ network: }"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        Config::from_json_str(r#"{ "network": { "nodes": "many" } }"#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "network": {{ "nodes": 8, "latency": 3 }}, "traffic": {{ "handoff": "deferred" }} }}"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.network.nodes, 8);
    assert_eq!(config.network.latency, 3);
    assert_eq!(config.traffic.handoff, HandoffMode::Deferred);
}

#[test]
fn test_from_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    match Config::from_file(&path) {
        Err(ConfigError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected io error, got {other:?}"),
    }
}
