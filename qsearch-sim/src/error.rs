//! Error types for the benchmark engine
//!
//! Every error falls into one of three categories. Validation and
//! configuration errors are caused by bad input and are recorded per
//! configuration by the sweep driver; fatal internal errors mean the
//! simulator itself is wrong and abort the whole run.

use qsearch_backend::BackendError;
use qsearch_core::CoreError;
use qsearch_state::StateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Broad class of a [`SimulatorError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Caller-correctable input error
    Validation,

    /// Configuration that cannot be simulated
    Config,

    /// Internal consistency failure
    FatalInternal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::FatalInternal => write!(f, "fatal-internal"),
        }
    }
}

/// Errors that can occur while benchmarking
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatorError {
    /// An input field failed validation
    Validation {
        field: String,
        reason: String,
    },

    /// The configuration cannot be run (width, connectivity)
    Config(String),

    /// The simulator violated one of its own invariants
    FatalInternal(String),
}

impl SimulatorError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SimulatorError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            SimulatorError::Validation { .. } => ErrorCategory::Validation,
            SimulatorError::Config(_) => ErrorCategory::Config,
            SimulatorError::FatalInternal(_) => ErrorCategory::FatalInternal,
        }
    }

    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::FatalInternal
    }
}

impl fmt::Display for SimulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulatorError::Validation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            },
            SimulatorError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            },
            SimulatorError::FatalInternal(msg) => {
                write!(f, "Internal consistency failure: {}", msg)
            },
        }
    }
}

impl std::error::Error for SimulatorError {}

impl From<CoreError> for SimulatorError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::TargetLengthMismatch { .. } | CoreError::InvalidTargetBit { .. } => {
                SimulatorError::validation("target", err.to_string())
            },
            CoreError::UnsupportedQubitCount { .. } => SimulatorError::Config(err.to_string()),
            CoreError::InvalidQubit(..)
            | CoreError::DuplicateQubit(_)
            | CoreError::WidthMismatch { .. } => SimulatorError::FatalInternal(err.to_string()),
        }
    }
}

impl From<StateError> for SimulatorError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Core(core) => core.into(),
            other => SimulatorError::FatalInternal(other.to_string()),
        }
    }
}

impl From<BackendError> for SimulatorError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::InvalidProbability { field, .. } => {
                SimulatorError::validation(field, err.to_string())
            },
            BackendError::NoPath { .. } | BackendError::TopologyTooSmall { .. } => {
                SimulatorError::Config(err.to_string())
            },
            BackendError::Core(core) => core.into(),
            BackendError::State(state) => state.into(),
        }
    }
}
