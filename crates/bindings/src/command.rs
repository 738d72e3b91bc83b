//! Command Python binding.
//!
//! Exposes `InterconnectCommand` to Python. The Python object and the wrapper
//! share completion flags, so `received` / `handled` reflect engine progress
//! without any copying back.

use flitsim_core::icnt::InterconnectCommand;
use pyo3::prelude::*;

/// Python-exposed command handle.
#[pyclass(name = "Command")]
#[derive(Clone, Debug)]
pub struct PyCommand {
    /// Shared command handle.
    pub inner: InterconnectCommand,
}

#[pymethods]
impl PyCommand {
    /// Creates a data read or write command.
    #[staticmethod]
    #[pyo3(signature = (src, dst, subnet, size, is_write, is_response=false))]
    fn data_packet(
        src: usize,
        dst: usize,
        subnet: usize,
        size: usize,
        is_write: bool,
        is_response: bool,
    ) -> Self {
        Self {
            inner: InterconnectCommand::data_packet(src, dst, subnet, size, is_write, is_response),
        }
    }

    /// Creates a control command with `size` payload flits.
    #[staticmethod]
    #[pyo3(signature = (src, dst, subnet, size, is_response=false))]
    fn control_packet(src: usize, dst: usize, subnet: usize, size: usize, is_response: bool) -> Self {
        Self {
            inner: InterconnectCommand::control_packet(src, dst, subnet, size, is_response),
        }
    }

    #[getter]
    fn received(&self) -> bool {
        self.inner.is_received()
    }

    #[getter]
    fn handled(&self) -> bool {
        self.inner.is_handled()
    }

    #[getter]
    fn src(&self) -> usize {
        self.inner.spec().src
    }

    #[getter]
    fn dst(&self) -> usize {
        self.inner.spec().dst
    }

    #[getter]
    fn subnet(&self) -> usize {
        self.inner.spec().subnet
    }

    #[getter]
    fn size(&self) -> usize {
        self.inner.spec().size
    }

    /// Number of flits the command is sent as, header included.
    #[getter]
    fn packet_size(&self) -> usize {
        self.inner.descriptor().packet_size
    }

    /// First-order service time estimate in cycles.
    fn expected_cycles(&self) -> usize {
        self.inner.expected_cycles()
    }

    fn __repr__(&self) -> String {
        let s = self.inner.spec();
        format!(
            "Command(src={}, dst={}, subnet={}, size={}, data={}, write={}, response={}, received={}, handled={})",
            s.src,
            s.dst,
            s.subnet,
            s.size,
            s.is_data,
            s.is_write,
            s.is_response,
            self.inner.is_received(),
            self.inner.is_handled()
        )
    }
}
