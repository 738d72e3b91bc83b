//! # Traffic Manager Tests
//!
//! Generation, arbitration and injection, retirement, and the per-node
//! interface.



/// Flit retirement and latency accounting.
pub mod retirement;
