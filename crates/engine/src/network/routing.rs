//! Payload-kind VC routing.
//!
//! Injection VCs are partitioned by `FlitType` so requests and replies can be
//! kept on disjoint VCs. Kinds without a configured range may use any VC.

use crate::config::{Config, RoutingConfig, VcRange};
use crate::flit::Flit;
use crate::network::traits::{OutputSet, RoutingFunction};

/// Routing function that selects the VC range from the flit's payload kind.
#[derive(Debug, Clone)]
pub struct TypeVcRouting {
    num_vcs: usize,
    ranges: RoutingConfig,
}

impl TypeVcRouting {
    /// Creates a routing function over `num_vcs` VCs with the given ranges.
    pub fn new(num_vcs: usize, ranges: RoutingConfig) -> Self {
        Self { num_vcs, ranges }
    }

    /// Builds the routing function from `config.network` and `config.routing`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.network.num_vcs, config.routing.clone())
    }

    fn full_range(&self) -> VcRange {
        VcRange {
            begin: 0,
            end: self.num_vcs.saturating_sub(1),
        }
    }
}

impl RoutingFunction for TypeVcRouting {
    fn route(
        &self,
        _router: Option<usize>,
        flit: &Flit,
        _in_channel: Option<usize>,
        _inject: bool,
    ) -> OutputSet {
        let range = self
            .ranges
            .range_for(flit.kind)
            .unwrap_or_else(|| self.full_range());
        OutputSet {
            output_port: None,
            vc_start: range.begin,
            vc_end: range.end,
        }
    }
}
