//! Statevector engine and finite-shot sampler for qsearch
//!
//! This crate holds the numerical core of the benchmark:
//!
//! - [`StateVector`]: dense 2^n amplitude vector with in-place kernels for
//!   every [`GateOp`](qsearch_core::GateOp) and a norm check after each gate
//! - [`Distribution`]: the exact squared-magnitude distribution of a state
//! - [`sample`]: seeded, reproducible multi-shot sampling into a
//!   [`SamplingResult`]
//!
//! Both distributions and sampled counts implement [`OutcomeDistribution`],
//! which is what the metrics layer works against.
//!
//! # Example
//!
//! ```
//! use qsearch_core::GateOp;
//! use qsearch_state::{sample, StateVector};
//!
//! let mut state = StateVector::new(2).unwrap();
//! state.apply(&GateOp::Hadamard(0)).unwrap();
//!
//! let counts = sample(&state.probabilities(), 1024, 42).unwrap();
//! assert_eq!(counts.get_count(0) + counts.get_count(1), 1024);
//! assert_eq!(counts.get_count(2), 0);
//! ```

pub mod distribution;
pub mod error;
pub mod measurement;
pub mod state_vector;

pub use distribution::{Distribution, OutcomeDistribution, DISTRIBUTION_TOLERANCE};
pub use error::{Result, StateError};
pub use measurement::{sample, sample_with_rng, SamplingResult};
pub use state_vector::{StateSnapshot, StateVector, NORM_TOLERANCE};
