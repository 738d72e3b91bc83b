//! Statistics Python binding.
//!
//! Exposes traffic statistics to Python: getters for cycles, throughput totals
//! and class-0 latency averages; `print` / `print_sections` for human-readable
//! output; `to_dict` for JSON-serializable export.

use flitsim_core::stats::{ClassStats, SampleStats, TrafficStats};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Python-exposed statistics: wraps `TrafficStats` for read and print from Python.
#[pyclass(name = "Stats")]
#[derive(Clone, Debug)]
pub struct PyStats {
    /// Statistics snapshot.
    pub inner: TrafficStats,
}

impl PyStats {
    fn class_sample(&self, class: usize, pick: fn(&ClassStats) -> &SampleStats) -> f64 {
        self.inner.classes.get(class).map_or(0.0, |c| pick(c).average())
    }
}

#[pymethods]
impl PyStats {
    #[getter]
    fn cycles(&self) -> u64 {
        self.inner.cycles
    }

    #[getter]
    fn sent_packets(&self) -> u64 {
        self.inner.total_sent_packets()
    }

    #[getter]
    fn sent_flits(&self) -> u64 {
        self.inner.total_sent_flits()
    }

    #[getter]
    fn accepted_packets(&self) -> u64 {
        self.inner.total_accepted_packets()
    }

    #[getter]
    fn accepted_flits(&self) -> u64 {
        self.inner.total_accepted_flits()
    }

    /// Average packet latency of `class`.
    #[pyo3(signature = (class=0))]
    fn avg_packet_latency(&self, class: usize) -> f64 {
        self.class_sample(class, |c| &c.packet_latency)
    }

    /// Average network latency of `class`.
    #[pyo3(signature = (class=0))]
    fn avg_network_latency(&self, class: usize) -> f64 {
        self.class_sample(class, |c| &c.network_latency)
    }

    /// Average flit latency of `class`.
    #[pyo3(signature = (class=0))]
    fn avg_flit_latency(&self, class: usize) -> f64 {
        self.class_sample(class, |c| &c.flit_latency)
    }

    /// Print all stats (full dump).
    fn print(&self) {
        self.inner.print();
    }

    /// Print only the given sections. Options: "summary", "latency", "throughput", "pairs".
    /// Pass an empty list for full dump.
    fn print_sections(&self, sections: Vec<String>) {
        self.inner.print_sections(&sections);
    }

    /// Export all stats as a Python dict (JSON-serializable).
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
        let text = serde_json::to_string(&self.inner)
            .map_err(|e| PyValueError::new_err(format!("cannot export stats: {e}")))?;
        py.import("json")?.getattr("loads")?.call1((text,))
    }
}

impl From<TrafficStats> for PyStats {
    fn from(inner: TrafficStats) -> Self {
        Self { inner }
    }
}
