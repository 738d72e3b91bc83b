//! Python↔Rust configuration conversion.
//!
//! Converts Python dicts into the core `Config` type via JSON serialization, so
//! the same schema is used from both Python and the CLI `--config` file.

use flitsim_core::config::Config;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Converts a Python dict to an engine `Config`.
///
/// The dict is serialized to JSON, deserialized into `Config` and validated.
/// Keys must match the Rust config structure (`general`, `network`, `traffic`,
/// `routing`); omitted keys take their defaults.
///
/// # Arguments
///
/// * `py` - Python interpreter handle.
/// * `dict` - A Python dict.
///
/// # Returns
///
/// The validated `Config`, or a `ValueError` if the dict is invalid.
pub fn py_dict_to_config(py: Python<'_>, dict: &Bound<'_, PyAny>) -> PyResult<Config> {
    let json = py.import("json")?;
    let dumps = json.getattr("dumps")?;
    let json_str: String = dumps.call1((dict,))?.extract()?;

    Config::from_json_str(&json_str).map_err(|e| PyValueError::new_err(e.to_string()))
}
