//! Simulation context.
//!
//! One `SimContext` exists per simulation run. It replaces process-wide state
//! with an explicit object handed to the traffic manager and to each network
//! substrate at construction:
//! 1. **Clock:** the current cycle, shared through an `Arc<AtomicU64>` so the
//!    substrate observes the same time the traffic manager advances.
//! 2. **Watch sets:** flit and packet ids whose activity is traced in detail.
//! 3. **Trace switch:** per-cycle time trace.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::ids::{Cycle, FlitId, PacketId};
use crate::config::Config;

/// Per-run shared state. Cloning yields another handle to the same clock.
#[derive(Clone, Debug, Default)]
pub struct SimContext {
    clock: Arc<AtomicU64>,
    watch: Arc<WatchSet>,
    trace: bool,
}

#[derive(Debug, Default)]
struct WatchSet {
    flits: HashSet<FlitId>,
    packets: HashSet<PacketId>,
}

impl SimContext {
    /// Creates a context at cycle 0 with the watch sets and trace switch from `config`.
    pub fn new(config: &Config) -> Self {
        let watch = WatchSet {
            flits: config.general.watch_flits.iter().copied().map(FlitId).collect(),
            packets: config
                .general
                .watch_packets
                .iter()
                .copied()
                .map(PacketId)
                .collect(),
        };
        Self {
            clock: Arc::new(AtomicU64::new(0)),
            watch: Arc::new(watch),
            trace: config.general.trace,
        }
    }

    /// Returns the current simulation cycle.
    #[inline]
    pub fn now(&self) -> Cycle {
        self.clock.load(Ordering::Relaxed)
    }

    /// Advances the clock by one cycle and returns the new time.
    ///
    /// The traffic manager calls this once per step; a substrate driven on
    /// its own needs its driver to call it instead.
    #[inline]
    pub fn advance(&self) -> Cycle {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns `true` if the flit or its packet was listed for watching.
    pub fn is_watched(&self, flit: FlitId, pid: PacketId) -> bool {
        self.watch.flits.contains(&flit) || self.watch.packets.contains(&pid)
    }

    /// Returns `true` if per-cycle time tracing is enabled.
    #[inline]
    pub fn trace(&self) -> bool {
        self.trace
    }
}
