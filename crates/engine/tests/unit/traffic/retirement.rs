//! # Retirement Tests
//!
//! Flits are taken from a sink substrate after injection and retired by hand
//! with chosen arrival times.

use flitsim_core::common::{FlitId, PacketId, SimError};
use flitsim_core::flit::{Flit, FlitType};
use flitsim_core::traffic::{TrafficEngine, TrafficManager};
use rstest::rstest;

use crate::common::harness::{Recorder, config, manager};
use crate::common::mocks::network::SinkNetwork;

/// Generates one packet from node 0 to node 1, injects all of it, and returns
/// the injected flits.
fn injected_packet(
    tm: &mut TrafficManager<SinkNetwork>,
    flits: usize,
    kind: FlitType,
) -> Vec<Flit> {
    let _ = tm.generate_packet(0, 0, 0, 0, flits, kind, 1).unwrap();
    let mut obs = Recorder::new(tm.nodes());
    for _ in 0..flits {
        tm.step(&mut obs).unwrap();
    }
    tm.network_mut(0).unwrap().take_written()
}

fn arrive(mut f: Flit, atime: u64) -> Flit {
    f.atime = atime;
    f
}

#[test]
fn test_packet_latencies() {
    let mut tm = manager(&config(2), vec![SinkNetwork::new(2)]);
    let mut flits = injected_packet(&mut tm, 2, FlitType::WriteRequest);
    let mut tail = flits.pop().unwrap();
    let head = flits.pop().unwrap();
    assert_eq!((head.itime, tail.itime), (0, 1));
    tail.hops = 3;

    tm.retire_flit(arrive(head, 5), 1).unwrap();
    assert_eq!(tm.pending_heads(), 1);
    tm.retire_flit(arrive(tail, 7), 1).unwrap();
    assert_eq!(tm.pending_heads(), 0);
    assert_eq!(tm.flits_in_flight(), 0);

    let c = &tm.stats().classes[0];
    assert_eq!(c.flit_latency.count(), 2);
    assert_eq!(c.flit_latency.min(), Some(5));
    assert_eq!(c.flit_latency.max(), Some(6));
    assert_eq!(c.slowest_flit, Some(FlitId(1)));
    assert_eq!(c.packet_latency.sum(), 7);
    assert_eq!(c.network_latency.sum(), 7);
    assert_eq!(c.fragmentation.sum(), 1);
    assert_eq!(c.hops.sum(), 3);
    assert_eq!(c.slowest_packet, Some(PacketId(0)));
}

#[test]
fn test_slowest_packet_tracks_packet_latency() {
    let mut tm = manager(&config(2), vec![SinkNetwork::new(2)]);
    let fast = injected_packet(&mut tm, 1, FlitType::WriteRequest).remove(0);
    let slow = injected_packet(&mut tm, 1, FlitType::WriteRequest).remove(0);
    tm.retire_flit(arrive(fast, 2), 1).unwrap();
    tm.retire_flit(arrive(slow, 20), 1).unwrap();
    assert_eq!(tm.stats().classes[0].slowest_packet, Some(PacketId(1)));
    assert_eq!(tm.stats().classes[0].packet_latency.average(), 11.0);
}

#[test]
fn test_pair_stats() {
    let mut cfg = config(2);
    cfg.general.pair_stats = true;
    let mut tm = manager(&cfg, vec![SinkNetwork::new(2)]);
    let f = injected_packet(&mut tm, 1, FlitType::WriteRequest).remove(0);
    tm.retire_flit(arrive(f, 4), 1).unwrap();

    let stats = tm.stats();
    let pair = stats.pair(0, 1).unwrap();
    assert_eq!(pair.packet_latency.count(), 1);
    assert_eq!(pair.flit_latency.sum(), 4);
    assert_eq!(stats.pair(1, 0).unwrap().packet_latency.count(), 0);
    assert!(stats.pair(2, 0).is_none());
}

#[test]
fn test_pair_stats_disabled_by_default() {
    let mut tm = manager(&config(2), vec![SinkNetwork::new(2)]);
    let f = injected_packet(&mut tm, 1, FlitType::WriteRequest).remove(0);
    tm.retire_flit(arrive(f, 4), 1).unwrap();
    assert!(tm.stats().pair(0, 1).is_none());
}

#[test]
fn test_retiring_twice_fails() {
    let mut tm = manager(&config(2), vec![SinkNetwork::new(2)]);
    let f = injected_packet(&mut tm, 1, FlitType::WriteRequest).remove(0);
    tm.retire_flit(f.clone(), 1).unwrap();
    let err = tm.retire_flit(f, 1).unwrap_err();
    assert!(matches!(err, SimError::FlitNotInFlight { flit: FlitId(0), class: 0 }));
}

#[test]
fn test_unknown_flit_fails() {
    let mut tm = manager(&config(2), vec![SinkNetwork::new(2)]);
    let stray = Flit::new(FlitId(99), PacketId(0), 0, 0, 0, 0);
    let err = tm.retire_flit(stray, 1).unwrap_err();
    assert!(matches!(err, SimError::FlitNotInFlight { .. }));
}

#[test]
fn test_misrouted_head_fails() {
    let mut tm = manager(&config(2), vec![SinkNetwork::new(2)]);
    let f = injected_packet(&mut tm, 1, FlitType::WriteRequest).remove(0);
    let err = tm.retire_flit(f, 0).unwrap_err();
    assert!(matches!(
        err,
        SimError::MisroutedFlit {
            node: 0,
            expected: Some(1),
            ..
        }
    ));
}

#[test]
fn test_tail_without_head_fails() {
    let mut tm = manager(&config(2), vec![SinkNetwork::new(2)]);
    let tail = injected_packet(&mut tm, 2, FlitType::WriteRequest).pop().unwrap();
    let err = tm.retire_flit(tail, 1).unwrap_err();
    assert!(matches!(
        err,
        SimError::MissingHeadFlit {
            flit: FlitId(1),
            pid: PacketId(0)
        }
    ));
}

#[rstest]
#[case(FlitType::ReadReply, [0, -1])]
#[case(FlitType::WriteReply, [0, -1])]
#[case(FlitType::AnyType, [-1, 0])]
#[case(FlitType::ReadRequest, [0, 0])]
#[case(FlitType::WriteRequest, [0, 0])]
fn test_outstanding_requests(#[case] kind: FlitType, #[case] expected: [i64; 2]) {
    let mut tm = manager(&config(2), vec![SinkNetwork::new(2)]);
    let f = injected_packet(&mut tm, 1, kind).remove(0);
    tm.retire_flit(arrive(f, 1), 1).unwrap();
    assert_eq!([tm.requests_outstanding(0), tm.requests_outstanding(1)], expected);
}
