//! Single-hop reference network.
//!
//! `Crossbar` connects every node to every other node through one switch
//! traversal of fixed latency. It implements the full `Network` contract with
//! credit-based flow control at the ejection side:
//! 1. **Latch (`read_inputs`):** flits written last cycle enter per-VC
//!    injection queues; credits written last cycle restore ejection space.
//! 2. **Traverse (`evaluate`):** each source forwards at most one flit per
//!    cycle, round robin over VCs, if its destination has space on that VC.
//!    Body flits follow the destination recorded for their VC by the head.
//! 3. **Publish (`write_outputs`):** credits for forwarded flits become
//!    readable at their source on the next cycle.
//!
//! Forwarded flits become readable at the destination `latency` cycles after
//! traversal, in traversal order.

use std::collections::VecDeque;

use tracing::warn;

use crate::common::context::SimContext;
use crate::common::ids::{Cycle, NodeId, VcId};
use crate::config::{Config, NetworkConfig};
use crate::flit::{Credit, Flit};
use crate::network::traits::Network;

/// Single-hop, credit-flow-controlled network.
#[derive(Debug, Clone)]
pub struct Crossbar {
    ctx: SimContext,
    num_vcs: usize,
    latency: Cycle,
    /// Flits written this cycle, per source.
    staged_flits: Vec<Vec<Flit>>,
    /// Credits written this cycle, per destination.
    staged_credits: Vec<Vec<VcId>>,
    /// Latched flits waiting for traversal, `[source][vc]`.
    injection: Vec<Vec<VecDeque<Flit>>>,
    /// Destination of the packet holding each `[source][vc]`.
    routes: Vec<Vec<Option<NodeId>>>,
    /// Free ejection slots, `[destination][vc]`.
    eject_credits: Vec<Vec<usize>>,
    /// Flits in the switch with the cycle they become readable, per destination.
    in_transit: Vec<VecDeque<(Cycle, Flit)>>,
    /// Round-robin VC pointer per source.
    next_vc: Vec<VcId>,
    /// Credits generated by this cycle's traversals, per source.
    upstream: Vec<Credit>,
    /// Credits readable by the traffic manager, per source.
    credit_out: Vec<Option<Credit>>,
}

impl Crossbar {
    /// Creates a crossbar sharing the clock of `ctx`.
    pub fn new(ctx: SimContext, config: &NetworkConfig) -> Self {
        let nodes = config.nodes;
        let num_vcs = config.num_vcs;
        Self {
            ctx,
            num_vcs,
            latency: config.latency,
            staged_flits: vec![Vec::new(); nodes],
            staged_credits: vec![Vec::new(); nodes],
            injection: vec![vec![VecDeque::new(); num_vcs]; nodes],
            routes: vec![vec![None; num_vcs]; nodes],
            eject_credits: vec![vec![config.vc_buf_size; num_vcs]; nodes],
            in_transit: vec![VecDeque::new(); nodes],
            next_vc: vec![0; nodes],
            upstream: vec![Credit::default(); nodes],
            credit_out: vec![None; nodes],
        }
    }

    /// Builds one crossbar per configured subnet, all sharing `ctx`.
    pub fn for_subnets(config: &Config, ctx: &SimContext) -> Vec<Self> {
        (0..config.network.subnets)
            .map(|_| Self::new(ctx.clone(), &config.network))
            .collect()
    }

    /// Number of flits held anywhere inside the crossbar.
    pub fn flits_in_network(&self) -> usize {
        let staged: usize = self.staged_flits.iter().map(Vec::len).sum();
        let queued: usize = self.injection.iter().flatten().map(VecDeque::len).sum();
        let transit: usize = self.in_transit.iter().map(VecDeque::len).sum();
        staged + queued + transit
    }

    /// Free ejection slots at `node` on `vc`.
    pub fn ejection_credits(&self, node: NodeId, vc: VcId) -> usize {
        self.eject_credits
            .get(node)
            .and_then(|vcs| vcs.get(vc))
            .copied()
            .unwrap_or(0)
    }

    /// Forwards at most one flit from `src`, returning whether one moved.
    fn traverse(&mut self, src: NodeId, now: Cycle) -> bool {
        for i in 0..self.num_vcs {
            let vc = (self.next_vc[src] + i) % self.num_vcs;
            let Some(front) = self.injection[src][vc].front() else {
                continue;
            };
            let dest = if front.head {
                front.dest
            } else {
                self.routes[src][vc]
            };
            let Some(dest) = dest.filter(|d| *d < self.in_transit.len()) else {
                warn!(flit = %front.id, src, vc, "dropping flit with no valid destination");
                let _ = self.injection[src][vc].pop_front();
                continue;
            };
            if self.eject_credits[dest][vc] == 0 {
                continue;
            }
            let Some(mut flit) = self.injection[src][vc].pop_front() else {
                continue;
            };
            self.eject_credits[dest][vc] -= 1;
            self.routes[src][vc] = if flit.tail { None } else { Some(dest) };
            flit.hops += 1;
            self.upstream[src].push(vc);
            self.in_transit[dest].push_back((now + self.latency, flit));
            self.next_vc[src] = (vc + 1) % self.num_vcs;
            return true;
        }
        false
    }
}

impl Network for Crossbar {
    fn num_nodes(&self) -> usize {
        self.in_transit.len()
    }

    fn read_flit(&mut self, node: NodeId) -> Option<Flit> {
        let now = self.ctx.now();
        let queue = self.in_transit.get_mut(node)?;
        match queue.front() {
            Some((ready_at, _)) if *ready_at <= now => queue.pop_front().map(|(_, f)| f),
            _ => None,
        }
    }

    fn read_credit(&mut self, node: NodeId) -> Option<Credit> {
        self.credit_out.get_mut(node)?.take()
    }

    fn write_flit(&mut self, flit: Flit, node: NodeId) {
        match self.staged_flits.get_mut(node) {
            Some(staged) => staged.push(flit),
            None => warn!(flit = %flit.id, node, "flit written to unknown node"),
        }
    }

    fn write_credit(&mut self, credit: Credit, node: NodeId) {
        match self.staged_credits.get_mut(node) {
            Some(staged) => staged.extend(credit.vcs),
            None => warn!(node, "credit written to unknown node"),
        }
    }

    fn read_inputs(&mut self) {
        for node in 0..self.staged_flits.len() {
            for vc in std::mem::take(&mut self.staged_credits[node]) {
                if let Some(c) = self.eject_credits[node].get_mut(vc) {
                    *c += 1;
                }
            }
            for flit in std::mem::take(&mut self.staged_flits[node]) {
                let vc = flit.vc.unwrap_or_default();
                match self.injection[node].get_mut(vc) {
                    Some(queue) => queue.push_back(flit),
                    None => warn!(flit = %flit.id, vc, "flit injected on unknown VC"),
                }
            }
        }
    }

    fn evaluate(&mut self) {
        let now = self.ctx.now();
        for src in 0..self.injection.len() {
            let _ = self.traverse(src, now);
        }
    }

    fn write_outputs(&mut self) {
        for (src, credit) in self.upstream.iter_mut().enumerate() {
            if credit.is_empty() {
                continue;
            }
            let freed = std::mem::take(credit);
            self.credit_out[src]
                .get_or_insert_with(Credit::default)
                .vcs
                .extend(freed.vcs);
        }
    }
}
