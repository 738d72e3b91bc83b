//! Common types shared by every part of the traffic engine.
//!
//! This module provides the fundamental building blocks used across the simulator:
//! 1. **Identifiers:** Strong types for flit and packet ids plus node/VC index aliases.
//! 2. **Simulation context:** The per-run clock and tracing switches.
//! 3. **Error handling:** Fatal invariant violations and configuration errors.

/// Flit, packet, node and VC identifiers.
pub mod ids;

/// Per-run simulation context (shared clock, watch sets, trace switch).
pub mod context;

/// Error types for fatal invariant violations and configuration failures.
pub mod error;

pub use context::SimContext;
pub use error::{ConfigError, SimError};
pub use ids::{ClassId, Cycle, FlitId, NodeId, PacketId, SubnetId, VcId};
