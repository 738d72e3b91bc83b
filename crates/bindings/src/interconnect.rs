//! Interconnect Python binding.
//!
//! Exposes the interconnect wrapper to Python: create from an optional config
//! dict, dispatch commands, step cycles, hand off received commands, and
//! retrieve stats. Fatal engine errors surface as `RuntimeError`.

use flitsim_core::config::Config;
use flitsim_core::icnt::InterconnectWrapper;
use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use crate::command::PyCommand;
use crate::conversion::py_dict_to_config;
use crate::stats::PyStats;
use crate::utils::init_logging;

/// Python-exposed interconnect over the reference crossbar.
#[pyclass(name = "Interconnect")]
#[derive(Debug)]
pub struct PyInterconnect {
    /// Wrapped engine.
    pub inner: InterconnectWrapper,
}

#[pymethods]
impl PyInterconnect {
    /// Creates an interconnect.
    ///
    /// # Arguments
    ///
    /// * `config_dict` - Optional config dict; defaults are used when omitted.
    /// * `print_activity` - Log command and watched-flit activity.
    /// * `print_trace` - Log the per-cycle time trace.
    /// * `output_file` - Write activity to this file instead of stdout.
    #[new]
    #[pyo3(signature = (config_dict=None, print_activity=false, print_trace=false, output_file=None))]
    fn new(
        py: Python<'_>,
        config_dict: Option<&Bound<'_, PyAny>>,
        print_activity: bool,
        print_trace: bool,
        output_file: Option<String>,
    ) -> PyResult<Self> {
        let mut config = match config_dict {
            Some(dict) => py_dict_to_config(py, dict)?,
            None => Config::default(),
        };
        config.general.trace |= print_trace;
        init_logging(print_activity, config.general.trace, output_file.as_deref())?;

        let inner =
            InterconnectWrapper::new(&config).map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Queues `cmd`; returns `False` while another command is outstanding.
    fn dispatch(&mut self, cmd: &PyCommand) -> bool {
        self.inner.dispatch_command(&cmd.inner)
    }

    /// Advances the interconnect by one cycle.
    ///
    /// # Errors
    ///
    /// Returns a `RuntimeError` on a fatal engine error; the instance should
    /// not be stepped further.
    fn cycle_step(&mut self) -> PyResult<()> {
        self.inner
            .cycle_step()
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Frees the destination of a received command (deferred hand-off).
    fn handle(&mut self, cmd: &PyCommand) -> bool {
        self.inner.handle_received_command(&cmd.inner)
    }

    /// Returns `True` while `node` holds a received, unhandled packet.
    fn is_node_busy(&self, node: usize) -> bool {
        self.inner.is_node_busy(node)
    }

    /// Returns `True` while a command is pending or not yet handled.
    fn has_outstanding_command(&self) -> bool {
        self.inner.has_outstanding_command()
    }

    /// Current simulation cycle.
    #[getter]
    fn time(&self) -> u64 {
        self.inner.time()
    }

    /// Returns a snapshot of the current statistics.
    fn get_stats(&self) -> PyStats {
        PyStats::from(self.inner.stats().clone())
    }
}
