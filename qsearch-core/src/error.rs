//! Error types for qsearch core types

use thiserror::Error;

/// Errors raised while building gates, circuits and target patterns
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid qubit index used
    #[error("Invalid qubit index {0}: circuit has only {1} qubits")]
    InvalidQubit(usize, usize),

    /// The same qubit appears twice in one gate
    #[error("Duplicate qubit {0} in gate operation")]
    DuplicateQubit(usize),

    /// Register width is zero or too large to simulate
    #[error("Unsupported qubit count {num_qubits}: must be between 1 and {max}")]
    UnsupportedQubitCount { num_qubits: usize, max: usize },

    /// Target pattern length differs from the register width
    #[error("Target pattern has {actual} bits, expected {expected}")]
    TargetLengthMismatch { expected: usize, actual: usize },

    /// Target pattern contains something other than '0' or '1'
    #[error("Target pattern has invalid character {found:?} at position {position}")]
    InvalidTargetBit { position: usize, found: char },

    /// Two circuits of different widths were combined
    #[error("Circuit width mismatch: expected {expected} qubits, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },
}

impl CoreError {
    /// Create an invalid qubit error
    pub fn invalid_qubit(qubit: usize, num_qubits: usize) -> Self {
        Self::InvalidQubit(qubit, num_qubits)
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
