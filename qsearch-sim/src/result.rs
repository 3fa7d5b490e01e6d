//! Structured records produced by benchmarks and sweeps
//!
//! Every type here is plain data with serde support; formatting and file
//! output are left to the consumer.

use crate::error::{ErrorCategory, SimulatorError};
use serde::{Deserialize, Serialize};

/// Immutable result of one benchmark configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Register width
    pub qubit_count: usize,

    /// Amplification rounds applied
    pub optimal_round_count: usize,

    /// Depth of the executed (routed) circuit
    pub circuit_depth: usize,

    /// CNOT-equivalent count of the executed circuit
    pub two_qubit_gate_count: usize,

    /// Success probability without noise
    pub ideal_success_probability: f64,

    /// Success probability after gate and readout noise
    pub noisy_success_probability: f64,

    /// Hellinger fidelity between the ideal and noisy outcomes
    pub hellinger_fidelity: f64,

    /// Marked bitstring
    pub target: String,

    /// `2ⁿ`
    pub search_space: u64,

    /// Per-gate depolarizing strength
    pub error_rate: f64,

    /// Per-qubit readout flip probability
    pub readout_flip: f64,

    /// Topology name, `unconstrained` when no routing was done
    pub topology: String,

    /// Depth before routing
    pub logical_depth: usize,

    /// Probability that no gate error occurred
    pub survival_probability: f64,

    /// SWAP gates inserted by routing
    pub swap_count: usize,

    /// Shots per distribution, 0 when metrics are exact
    pub shots: usize,
}

impl BenchmarkRecord {
    /// Whether the noisy run still beats random guessing
    pub fn beats_classical(&self) -> bool {
        self.noisy_success_probability > 1.0 / self.search_space as f64
    }

    /// Row for the width-scaling export
    pub fn scalability_row(&self) -> ScalabilityRow {
        ScalabilityRow {
            qubit_count: self.qubit_count,
            circuit_depth: self.circuit_depth,
            two_qubit_gate_count: self.two_qubit_gate_count,
            ideal_success_percent: 100.0 * self.ideal_success_probability,
            noisy_success_percent: 100.0 * self.noisy_success_probability,
            fidelity: self.hellinger_fidelity,
        }
    }

    /// Row for the topology / error-rate sweep export
    pub fn sweep_row(&self) -> SweepRow {
        SweepRow {
            qubit_count: self.qubit_count,
            topology: self.topology.clone(),
            error_rate: self.error_rate,
            fidelity: self.hellinger_fidelity,
            success_probability: self.noisy_success_probability,
        }
    }
}

/// One basis state in an ideal-versus-noisy comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub bitstring: String,

    /// `None` when the report was computed without sampling
    pub ideal_count: Option<usize>,
    pub ideal_probability: f64,

    /// `None` when the report was computed without sampling
    pub noisy_count: Option<usize>,
    pub noisy_probability: f64,
}

/// Summary fields accompanying a comparison table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_shots: usize,
    pub hellinger_fidelity: f64,
    pub ideal_success_percent: f64,
    pub noisy_success_percent: f64,
}

/// Width-scaling export row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalabilityRow {
    pub qubit_count: usize,
    pub circuit_depth: usize,
    pub two_qubit_gate_count: usize,
    pub ideal_success_percent: f64,
    pub noisy_success_percent: f64,
    pub fidelity: f64,
}

/// Topology / error-rate sweep export row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub qubit_count: usize,
    pub topology: String,
    pub error_rate: f64,
    pub fidelity: f64,
    pub success_probability: f64,
}

/// One configuration of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Position in enumeration order
    pub index: usize,
    pub qubit_count: usize,
    pub topology: String,
    pub error_rate: f64,
    pub target: String,
}

/// A configuration that could not be benchmarked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedConfiguration {
    pub point: SweepPoint,
    pub category: ErrorCategory,
    pub reason: String,
}

impl FailedConfiguration {
    pub(crate) fn new(point: SweepPoint, error: &SimulatorError) -> Self {
        Self {
            point,
            category: error.category(),
            reason: error.to_string(),
        }
    }
}

/// Counts of what happened to each configuration in one sweep run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BenchmarkRecord {
        BenchmarkRecord {
            qubit_count: 3,
            optimal_round_count: 2,
            circuit_depth: 40,
            two_qubit_gate_count: 24,
            ideal_success_probability: 0.945,
            noisy_success_probability: 0.5,
            hellinger_fidelity: 0.7,
            target: "101".to_string(),
            search_space: 8,
            error_rate: 0.01,
            readout_flip: 0.0,
            topology: "ring".to_string(),
            logical_depth: 40,
            survival_probability: 0.4,
            swap_count: 0,
            shots: 0,
        }
    }

    #[test]
    fn test_rows() {
        let record = record();
        let row = record.scalability_row();
        assert_eq!(row.qubit_count, 3);
        assert!((row.ideal_success_percent - 94.5).abs() < 1e-9);

        let sweep = record.sweep_row();
        assert_eq!(sweep.topology, "ring");
        assert_eq!(sweep.success_probability, 0.5);
        assert!(record.beats_classical());
    }

    #[test]
    fn test_failed_configuration_keeps_category() {
        let point = SweepPoint {
            index: 0,
            qubit_count: 3,
            topology: "ring".to_string(),
            error_rate: 2.0,
            target: "111".to_string(),
        };
        let failure = FailedConfiguration::new(
            point,
            &SimulatorError::validation("depolarizing", "out of range"),
        );
        assert_eq!(failure.category, ErrorCategory::Validation);
        assert_eq!(failure.reason, "Invalid depolarizing: out of range");
    }
}
