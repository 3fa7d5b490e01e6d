//! Error types for topology, routing and noise operations

use qsearch_core::CoreError;
use qsearch_state::StateError;
use thiserror::Error;

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur while routing or applying noise
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// A probability parameter lies outside [0, 1]
    #[error("Invalid {field}: {value} is outside [0, 1]")]
    InvalidProbability { field: &'static str, value: f64 },

    /// Two physical qubits are not connected in the topology
    #[error("No path between physical qubits {from} and {to}")]
    NoPath { from: usize, to: usize },

    /// Topology has fewer physical qubits than the circuit needs
    #[error("Topology provides {available} qubits, circuit requires {required}")]
    TopologyTooSmall { required: usize, available: usize },

    /// Error from the core crate
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Error from the state crate
    #[error(transparent)]
    State(#[from] StateError),
}

impl BackendError {
    /// Create an invalid probability error
    pub fn invalid_probability(field: &'static str, value: f64) -> Self {
        Self::InvalidProbability { field, value }
    }
}

/// Check that `value` is a probability
pub(crate) fn check_probability(field: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(BackendError::invalid_probability(field, value));
    }
    Ok(())
}
