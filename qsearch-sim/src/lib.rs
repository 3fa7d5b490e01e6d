//! Amplitude-amplification benchmark engine
//!
//! This crate ties the lower qsearch crates into the benchmark pipeline:
//!
//! - **Operators**: phase oracle and diffusion circuits for a marked state
//! - **Scheduler**: optimal round count and per-round state snapshots
//! - **Metrics**: Hellinger fidelity, success probability and the error
//!   rate at which a noisy search stops beating random guessing
//! - **Sweeps**: width × topology × error-rate grids run in parallel with
//!   deterministic per-configuration seeds
//!
//! # Example
//!
//! ```
//! use qsearch_backend::Topology;
//! use qsearch_sim::{run_benchmark, BenchmarkConfig};
//!
//! let config = BenchmarkConfig::new("101")
//!     .with_depolarizing(0.001)
//!     .with_topology(Topology::Ring)
//!     .with_shots(8192)
//!     .with_seed(42);
//!
//! let report = run_benchmark(&config).unwrap();
//! assert_eq!(report.record.optimal_round_count, 2);
//! assert!(report.record.noisy_success_probability > 0.5);
//! ```

pub mod amplification;
pub mod benchmark;
pub mod config;
pub mod error;
pub mod metrics;
pub mod operators;
pub mod result;
pub mod sweep;

pub use amplification::{optimal_rounds, AmplificationRun, AmplificationScheduler, RoundSnapshot};
pub use benchmark::{run_benchmark, BenchmarkReport};
pub use config::{log_spaced_error_rates, BenchmarkConfig, SweepConfig, TargetChoice, ThresholdSearch};
pub use error::{ErrorCategory, Result, SimulatorError};
pub use metrics::{
    advantage_threshold, classical_baseline, hellinger_fidelity, quantum_advantage_threshold,
    success_probability, NoisySuccessCurve,
};
pub use operators::{build_diffusion, build_oracle, grover_operator};
pub use result::{
    BenchmarkRecord, ComparisonRow, FailedConfiguration, ReportSummary, ScalabilityRow, SweepPoint,
    SweepRow, SweepSummary,
};
pub use sweep::{derive_seed, CancellationToken, SweepContext, SweepDriver};
