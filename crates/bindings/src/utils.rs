//! Utility functions exposed to Python.
//!
//! Provides the version string and the logging setup used by `PyInterconnect`.

use std::fs::File;
use std::sync::Mutex;

use pyo3::exceptions::PyIOError;
use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

/// Returns the engine version string (e.g., for scripting or diagnostics).
///
/// # Returns
///
/// A version string such as `"0.3.1"`.
#[pyfunction]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Installs a global `tracing` subscriber for engine activity.
///
/// `RUST_LOG` takes precedence when set. Otherwise activity (command and
/// watched-flit events) is logged at debug level and the per-cycle time trace
/// at trace level. A subscriber installed earlier in the process is kept.
///
/// # Arguments
///
/// * `print_activity` - Log command and watched-flit activity.
/// * `print_trace` - Log the per-cycle time trace.
/// * `output_file` - Write log lines to this file instead of stdout.
pub fn init_logging(
    print_activity: bool,
    print_trace: bool,
    output_file: Option<&str>,
) -> PyResult<()> {
    if !print_activity && !print_trace {
        return Ok(());
    }
    let level = if print_trace { "trace" } else { "debug" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,flitsim_core={level}")));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    // A subscriber installed earlier in the process stays in place.
    let _ = match output_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| PyIOError::new_err(format!("cannot open {path}: {e}")))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stdout).try_init(),
    };
    Ok(())
}
