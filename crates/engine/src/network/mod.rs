//! Network substrate.
//!
//! This module provides the boundary the traffic manager drives and a small
//! reference implementation of it:
//! 1. **Traits:** `Network`, `BufferState`, `RoutingFunction` (see `traits`).
//! 2. **Crossbar:** a single-hop, credit-flow-controlled substrate with a fixed
//!    traversal latency.
//! 3. **Credit buffer:** wormhole VC allocation with per-VC credit counting.
//! 4. **Type-based VC routing:** injection VC ranges keyed on payload kind.

/// Per-VC credit counting and wormhole allocation.
pub mod buffer;

/// Single-hop reference network.
pub mod crossbar;

/// Payload-kind VC range selection.
pub mod routing;

/// Substrate boundary traits.
pub mod traits;

pub use buffer::CreditBuffer;
pub use crossbar::Crossbar;
pub use routing::TypeVcRouting;
pub use traits::{BufferState, Network, OutputSet, RoutingFunction};
