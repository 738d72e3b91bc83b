//! Traffic management.
//!
//! 1. **Manager:** packet generation, per-cycle arbitration and injection, and
//!    flit retirement over a set of subnet substrates.
//! 2. **Interface:** per-node busy/idle view over the manager, keyed by packet id.
//! 3. **Traits:** the `TrafficEngine` and `ArrivalObserver` seams between them.

/// Per-node arrival bookkeeping on top of the manager.
pub mod interface;

/// Flit-level traffic manager.
pub mod manager;

/// Engine and observer traits.
pub mod traits;

pub use interface::{NodeArrivals, TrafficManagerInterface};
pub use manager::TrafficManager;
pub use traits::{ArrivalObserver, TrafficEngine};
