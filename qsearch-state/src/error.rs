//! Error types for state vector operations

use qsearch_core::CoreError;
use thiserror::Error;

/// Errors that can occur during state vector operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Invalid state dimension
    #[error("Invalid state dimension {dimension}, expected power of 2")]
    InvalidDimension { dimension: usize },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Supplied amplitudes are not normalized
    #[error("State vector not normalized, norm² = {norm_sqr}")]
    NotNormalized { norm_sqr: f64 },

    /// Norm left the tolerance band after a unitary was applied
    #[error("Norm drifted to {norm_sqr} after applying {gate}")]
    NormDrift { norm_sqr: f64, gate: String },

    /// Probability vector is not a proper distribution
    #[error("Invalid probability distribution: {reason}")]
    InvalidDistribution { reason: String },

    /// Gate or register error from the core crate
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for state vector operations
pub type Result<T> = std::result::Result<T, StateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_drift_message() {
        let err = StateError::NormDrift {
            norm_sqr: 1.5,
            gate: "H(q0)".to_string(),
        };
        assert_eq!(err.to_string(), "Norm drifted to 1.5 after applying H(q0)");
    }

    #[test]
    fn test_core_conversion() {
        let err: StateError = CoreError::invalid_qubit(4, 2).into();
        assert!(matches!(err, StateError::Core(CoreError::InvalidQubit(4, 2))));
    }
}
