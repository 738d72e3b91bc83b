//! # Statistics Tests

use flitsim_core::config::Config;
use flitsim_core::icnt::{InterconnectCommand, InterconnectWrapper};
use flitsim_core::stats::{STATS_SECTIONS, SampleStats, TrafficStats};

#[test]
fn test_sample_stats() {
    let mut s = SampleStats::default();
    assert_eq!(s.average(), 0.0);
    assert_eq!(s.min(), None);

    s.add_sample(-3);
    s.add_sample(5);
    s.add_sample(1);
    assert_eq!(s.count(), 3);
    assert_eq!(s.sum(), 3);
    assert_eq!(s.min(), Some(-3));
    assert_eq!(s.max(), Some(5));
    assert!((s.average() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_new_stats_are_empty() {
    let stats = TrafficStats::new(3, 2, false);
    assert_eq!(stats.classes.len(), 2);
    assert_eq!(stats.classes[1].sent_flits, vec![0, 0, 0]);
    assert_eq!(stats.requests_outstanding, vec![0, 0, 0]);
    assert_eq!(stats.total_sent_flits(), 0);
    assert_eq!(stats.total_accepted_packets(), 0);
    assert!(stats.pairs.is_empty());
    assert!(stats.pair(0, 1).is_none());
}

#[test]
fn test_pair_table_shape() {
    let stats = TrafficStats::new(3, 1, true);
    assert_eq!(stats.pairs.len(), 9);
    assert!(stats.pair(2, 2).is_some());
    assert!(stats.pair(3, 0).is_none());
    assert!(stats.pair(0, 3).is_none());
}

#[test]
fn test_json_export() {
    let mut icnt = InterconnectWrapper::new(&Config::default()).unwrap();
    let cmd = InterconnectCommand::data_packet(0, 1, 0, 2, true, false);
    assert!(icnt.dispatch_command(&cmd));
    while !cmd.is_received() {
        icnt.cycle_step().unwrap();
    }

    let value = serde_json::to_value(icnt.stats()).unwrap();
    assert!(value.get("start_time").is_none());
    assert_eq!(value["cycles"], icnt.time());
    assert_eq!(value["classes"][0]["accepted_flits"][1], 3);
    assert_eq!(value["classes"][0]["packet_latency"]["count"], 1);
    assert_eq!(value["requests_outstanding"], serde_json::json!([0, 0]));
}

#[test]
fn test_print_sections_accepts_known_names() {
    let stats = TrafficStats::new(2, 1, true);
    let all: Vec<String> = STATS_SECTIONS.iter().map(ToString::to_string).collect();
    stats.print_sections(&all);
    stats.print_sections(&["latency".to_string()]);
    stats.print();
}
