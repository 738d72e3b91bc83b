//! Python bindings for the flitsim traffic engine.
//!
//! This crate exposes the interconnect wrapper to Python via PyO3. It provides:
//! 1. **Interconnect:** `PyInterconnect` for dispatching commands and cycle stepping.
//! 2. **Commands:** `PyCommand` handles with completion flags the driver polls.
//! 3. **Statistics:** `PyStats` for latency/throughput metrics and selective section printing.
//! 4. **Utilities:** Version string and conversion helpers for Python↔Rust types.

use pyo3::prelude::*;

/// Command binding (`PyCommand`).
pub mod command;
/// Python dict to Rust `Config` conversion.
pub mod conversion;
/// Interconnect binding (`PyInterconnect`).
pub mod interconnect;
/// Statistics binding (`PyStats`).
pub mod stats;
/// Utility functions (version, logging setup).
pub mod utils;

/// Registers all engine classes and functions onto the given Python module.
///
/// Called from the `#[pymodule]` entry point to expose `PyInterconnect`,
/// `PyCommand`, `PyStats`, and `version`.
///
/// # Arguments
///
/// * `m` - The Python module to register types and functions on.
///
/// # Returns
///
/// `Ok(())` on success, or a `PyErr` if registration fails.
pub fn register_engine_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<interconnect::PyInterconnect>()?;
    m.add_class::<command::PyCommand>()?;
    m.add_class::<stats::PyStats>()?;

    m.add_function(wrap_pyfunction!(utils::version, m)?)?;

    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_engine_module(m)?;
    Ok(())
}
