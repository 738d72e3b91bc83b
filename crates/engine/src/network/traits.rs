//! Flow-control substrate boundary.
//!
//! The traffic manager never moves flits across the network itself; it talks
//! to three collaborators through the traits in this module:
//! 1. **`Network`:** one per subnet. Accepts injected flits and returned
//!    credits, and yields ejected flits and upstream credits per node.
//! 2. **`BufferState`:** one per (node, subnet). Tracks the injection-side VC
//!    allocation and downstream credit count.
//! 3. **`RoutingFunction`:** picks the eligible VC range for an injected flit.
//!
//! All implementors must be `Send + Sync` so a whole engine can be moved into
//! the Python bindings.

use crate::common::ids::{NodeId, VcId};
use crate::flit::{Credit, Flit};

/// One subnetwork's flow-control interface.
///
/// The traffic manager drives a network through three ordered phases per
/// cycle: reads (`read_flit`, `read_credit`) followed by `read_inputs`;
/// writes (`write_flit`, `write_credit`); then `evaluate` and
/// `write_outputs`.
pub trait Network: Send + Sync {
    /// Number of endpoints attached to this network.
    fn num_nodes(&self) -> usize;

    /// Removes and returns the flit ejected at `node` this cycle, if any.
    fn read_flit(&mut self, node: NodeId) -> Option<Flit>;

    /// Removes and returns the credit delivered to `node`'s injection port.
    fn read_credit(&mut self, node: NodeId) -> Option<Credit>;

    /// Injects `flit` at `node`. Ownership moves into the network.
    fn write_flit(&mut self, flit: Flit, node: NodeId);

    /// Returns ejection buffer space at `node` to the network.
    fn write_credit(&mut self, credit: Credit, node: NodeId);

    /// Latches everything written during the previous cycle.
    fn read_inputs(&mut self);

    /// Advances internal state by one cycle.
    fn evaluate(&mut self);

    /// Publishes this cycle's results for the next round of reads.
    fn write_outputs(&mut self);
}

/// Injection-side buffer and VC allocation state for one node on one subnet.
pub trait BufferState: Send + Sync {
    /// Returns downstream buffer space for every VC listed in `credit`.
    fn process_credit(&mut self, credit: &Credit);

    /// Returns `true` if `vc` is not allocated to a packet in progress.
    fn is_available_for(&self, vc: VcId) -> bool;

    /// Returns `true` if `vc` has no downstream buffer space left.
    fn is_full_for(&self, vc: VcId) -> bool;

    /// Allocates `vc` to the packet whose head flit is about to be sent.
    fn take_buffer(&mut self, vc: VcId);

    /// Accounts for `flit` leaving on its assigned VC. A tail flit releases
    /// the VC allocation.
    fn sending_flit(&mut self, flit: &Flit);
}

/// Eligible output port and inclusive VC range returned by routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSet {
    /// Output port at `router`, or `None` for injection.
    pub output_port: Option<usize>,
    /// First eligible VC.
    pub vc_start: VcId,
    /// Last eligible VC (inclusive).
    pub vc_end: VcId,
}

impl OutputSet {
    /// Returns `true` if `vc` lies within the eligible range.
    #[inline]
    pub fn contains(&self, vc: VcId) -> bool {
        (self.vc_start..=self.vc_end).contains(&vc)
    }
}

/// Routing decision for a flit.
pub trait RoutingFunction: Send + Sync {
    /// Computes the eligible outputs for `flit`.
    ///
    /// # Arguments
    ///
    /// * `router` - Router making the decision, or `None` at an injection port.
    /// * `flit` - Flit being routed.
    /// * `in_channel` - Input channel the flit arrived on, if any.
    /// * `inject` - `true` when choosing an injection VC.
    fn route(
        &self,
        router: Option<usize>,
        flit: &Flit,
        in_channel: Option<usize>,
        inject: bool,
    ) -> OutputSet;
}
