//! Flit-level network-on-chip traffic engine.
//!
//! This crate moves packets between the nodes of an interconnect, one flit per
//! cycle per injection port, with the following:
//! 1. **Packets and flits:** Descriptor factory and the flit/credit data model.
//! 2. **Network:** Substrate boundary traits plus a reference crossbar, credit
//!    buffer and type-based VC routing.
//! 3. **Traffic:** Packet generation, arbitration and injection, and retirement
//!    with latency accounting.
//! 4. **Interconnect:** Command-level wrapper a memory or compute simulator drives.
//! 5. **Simulation:** Configuration, shared context, errors and statistics.

#![forbid(unsafe_code)]

/// Shared ids, simulation context and error types.
pub mod common;
/// Engine configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Flit and credit data model.
pub mod flit;
/// Command-level interconnect wrapper.
pub mod icnt;
/// Substrate traits and the reference crossbar.
pub mod network;
/// Packet descriptors.
pub mod packet;
/// Traffic statistics collection and reporting.
pub mod stats;
/// Traffic manager and its per-node interface.
pub mod traffic;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Fatal engine error.
pub use crate::common::SimError;
/// Driver handle and wrapper; construct the wrapper with `InterconnectWrapper::new`.
pub use crate::icnt::{InterconnectCommand, InterconnectWrapper};
/// Statistics snapshot type.
pub use crate::stats::TrafficStats;
