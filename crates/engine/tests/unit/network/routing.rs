//! # Routing Tests

use flitsim_core::common::{FlitId, PacketId};
use flitsim_core::config::{Config, RoutingConfig, VcRange};
use flitsim_core::flit::{Flit, FlitType};
use flitsim_core::network::{OutputSet, RoutingFunction, TypeVcRouting};
use rstest::rstest;

fn of_kind(kind: FlitType) -> Flit {
    let mut f = Flit::new(FlitId(0), PacketId(0), 0, 0, 0, 0);
    f.kind = kind;
    f
}

#[rstest]
#[case(FlitType::ReadRequest, 0, 0)]
#[case(FlitType::ReadReply, 1, 2)]
#[case(FlitType::WriteRequest, 0, 3)]
#[case(FlitType::WriteReply, 3, 3)]
#[case(FlitType::AnyType, 0, 3)]
fn test_range_by_kind(#[case] kind: FlitType, #[case] start: usize, #[case] end: usize) {
    let ranges = RoutingConfig {
        read_request: Some(VcRange { begin: 0, end: 0 }),
        read_reply: Some(VcRange { begin: 1, end: 2 }),
        write_reply: Some(VcRange { begin: 3, end: 3 }),
        ..RoutingConfig::default()
    };
    let routing = TypeVcRouting::new(4, ranges);
    let out = routing.route(None, &of_kind(kind), None, true);
    assert_eq!(
        out,
        OutputSet {
            output_port: None,
            vc_start: start,
            vc_end: end,
        }
    );
}

#[test]
fn test_from_config_uses_num_vcs() {
    let mut config = Config::default();
    config.network.num_vcs = 2;
    let routing = TypeVcRouting::from_config(&config);
    let out = routing.route(None, &of_kind(FlitType::WriteRequest), None, true);
    assert!(out.contains(0));
    assert!(out.contains(1));
    assert!(!out.contains(2));
}
