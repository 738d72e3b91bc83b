//! Credit-counted injection buffer.
//!
//! `CreditBuffer` models the downstream buffer of one injection port: every VC
//! starts with `depth` credits, each sent flit consumes one, each returned
//! credit restores one. A VC is held by a single packet from the head flit
//! (`take_buffer`) until its tail leaves (`sending_flit`).

use tracing::warn;

use crate::common::ids::VcId;
use crate::flit::{Credit, Flit};
use crate::network::traits::BufferState;

/// Wormhole VC allocator with per-VC credit counters.
#[derive(Debug, Clone)]
pub struct CreditBuffer {
    depth: usize,
    credits: Vec<usize>,
    in_use: Vec<bool>,
}

impl CreditBuffer {
    /// Creates a buffer with `num_vcs` VCs of `depth` slots each, all free.
    pub fn new(num_vcs: usize, depth: usize) -> Self {
        Self {
            depth,
            credits: vec![depth; num_vcs],
            in_use: vec![false; num_vcs],
        }
    }

    /// Number of VCs.
    pub fn num_vcs(&self) -> usize {
        self.credits.len()
    }

    /// Credits currently available on `vc` (0 for an unknown VC).
    pub fn credits(&self, vc: VcId) -> usize {
        self.credits.get(vc).copied().unwrap_or(0)
    }

    /// Slots on `vc` occupied downstream.
    pub fn occupancy(&self, vc: VcId) -> usize {
        self.depth.saturating_sub(self.credits(vc))
    }
}

impl BufferState for CreditBuffer {
    fn process_credit(&mut self, credit: &Credit) {
        for &vc in &credit.vcs {
            match self.credits.get_mut(vc) {
                Some(c) if *c < self.depth => *c += 1,
                Some(_) => warn!(vc, depth = self.depth, "credit returned to a VC with no flits outstanding"),
                None => warn!(vc, "credit for unknown VC"),
            }
        }
    }

    fn is_available_for(&self, vc: VcId) -> bool {
        self.in_use.get(vc).is_some_and(|used| !used)
    }

    fn is_full_for(&self, vc: VcId) -> bool {
        self.credits.get(vc).is_none_or(|c| *c == 0)
    }

    fn take_buffer(&mut self, vc: VcId) {
        if let Some(used) = self.in_use.get_mut(vc) {
            *used = true;
        }
    }

    fn sending_flit(&mut self, flit: &Flit) {
        let Some(vc) = flit.vc else {
            warn!(flit = %flit.id, "flit sent without an assigned VC");
            return;
        };
        if let Some(c) = self.credits.get_mut(vc) {
            *c = c.saturating_sub(1);
        }
        if flit.tail
            && let Some(used) = self.in_use.get_mut(vc)
        {
            *used = false;
        }
    }
}
