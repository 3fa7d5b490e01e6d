//! Amplification scheduler
//!
//! Prepares the uniform superposition and applies oracle then diffusion
//! a chosen number of times, recording the state after every round.

use crate::error::{Result, SimulatorError};
use crate::operators::{build_diffusion, build_oracle, uniform_superposition};
use qsearch_core::{check_qubit_count, Circuit, TargetPattern};
use qsearch_state::{StateSnapshot, StateVector};
use std::f64::consts::PI;
use tracing::debug;

/// Number of rounds that maximises the chance of measuring a marked state
///
/// With `θ = asin(√(m / 2ⁿ))` this is `round(π / 4θ − 1/2)`, never negative.
///
/// # Errors
/// Returns a validation error if `marked_count` is 0 or exceeds `2ⁿ`
///
/// # Example
/// ```
/// use qsearch_sim::optimal_rounds;
///
/// assert_eq!(optimal_rounds(3, 1).unwrap(), 2);
/// assert_eq!(optimal_rounds(6, 1).unwrap(), 6);
/// ```
pub fn optimal_rounds(num_qubits: usize, marked_count: u64) -> Result<usize> {
    check_qubit_count(num_qubits)?;
    let search_space = 1u64 << num_qubits;
    if marked_count == 0 || marked_count > search_space {
        return Err(SimulatorError::validation(
            "marked_count",
            format!("must be in 1..={}, got {}", search_space, marked_count),
        ));
    }

    let theta = (marked_count as f64 / search_space as f64).sqrt().asin();
    let rounds = (PI / (4.0 * theta) - 0.5).round();
    Ok(rounds.max(0.0) as usize)
}

/// State after a given number of rounds
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSnapshot {
    /// Rounds applied so far; 0 is the initial superposition
    pub round: usize,

    /// Frozen amplitudes
    pub state: StateSnapshot,

    /// Probability of measuring the marked state
    pub success_probability: f64,
}

/// Result of one amplification run
#[derive(Debug, Clone)]
pub struct AmplificationRun {
    /// Final ideal state
    pub state: StateVector,

    /// Logical circuit that produced `state`
    pub circuit: Circuit,

    /// One entry per round, starting with the initial superposition
    pub snapshots: Vec<RoundSnapshot>,
}

impl AmplificationRun {
    /// Probability of the marked state in the final state
    pub fn success_probability(&self) -> f64 {
        self.snapshots
            .last()
            .map_or(0.0, |snapshot| snapshot.success_probability)
    }

    /// Number of rounds applied
    pub fn rounds(&self) -> usize {
        self.snapshots.len().saturating_sub(1)
    }
}

/// Applies amplification rounds for one marked state
///
/// The oracle and diffusion circuits are built once and reused for every
/// round.
#[derive(Debug, Clone)]
pub struct AmplificationScheduler {
    target: TargetPattern,
    oracle: Circuit,
    diffusion: Circuit,
}

impl AmplificationScheduler {
    /// Build the operators for `target`
    pub fn new(target: TargetPattern) -> Result<Self> {
        let oracle = build_oracle(&target)?;
        let diffusion = build_diffusion(target.num_qubits())?;
        Ok(Self {
            target,
            oracle,
            diffusion,
        })
    }

    /// The marked state
    pub fn target(&self) -> &TargetPattern {
        &self.target
    }

    /// Run with the optimal number of rounds for a single marked state
    pub fn run_optimal(&self) -> Result<AmplificationRun> {
        self.run(optimal_rounds(self.target.num_qubits(), 1)?)
    }

    /// Prepare `|+⟩^n` and apply `rounds` amplification rounds
    pub fn run(&self, rounds: usize) -> Result<AmplificationRun> {
        let n = self.target.num_qubits();
        let mut circuit = uniform_superposition(n)?;
        let mut state = StateVector::new(n)?;
        state.apply_circuit(&circuit)?;

        let mut snapshots = Vec::with_capacity(rounds + 1);
        snapshots.push(self.snapshot(0, &state));

        for round in 1..=rounds {
            state.apply_circuit(&self.oracle)?;
            state.apply_circuit(&self.diffusion)?;
            circuit.extend(&self.oracle)?.extend(&self.diffusion)?;

            let snapshot = self.snapshot(round, &state);
            debug!(
                pattern = %self.target,
                round,
                success_probability = snapshot.success_probability,
                "amplification round"
            );
            snapshots.push(snapshot);
        }

        Ok(AmplificationRun {
            state,
            circuit,
            snapshots,
        })
    }

    fn snapshot(&self, round: usize, state: &StateVector) -> RoundSnapshot {
        let state = state.snapshot();
        let success_probability = state.probability(self.target.index());
        RoundSnapshot {
            round,
            state,
            success_probability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_optimal_rounds_table() {
        assert_eq!(optimal_rounds(2, 1).unwrap(), 1);
        assert_eq!(optimal_rounds(3, 1).unwrap(), 2);
        assert_eq!(optimal_rounds(4, 1).unwrap(), 3);
        assert_eq!(optimal_rounds(5, 1).unwrap(), 4);
        assert_eq!(optimal_rounds(6, 1).unwrap(), 6);
        assert_eq!(optimal_rounds(3, 8).unwrap(), 0);
    }

    #[test]
    fn test_optimal_rounds_rejects_bad_marked_count() {
        assert!(matches!(
            optimal_rounds(3, 0),
            Err(SimulatorError::Validation { .. })
        ));
        assert!(optimal_rounds(3, 9).is_err());
        assert!(matches!(optimal_rounds(0, 1), Err(SimulatorError::Config(_))));
    }

    #[test]
    fn test_run_matches_closed_form() {
        let scheduler = AmplificationScheduler::new(TargetPattern::parse("101").unwrap()).unwrap();
        let run = scheduler.run_optimal().unwrap();

        assert_eq!(run.rounds(), 2);
        let theta = (1.0f64 / 8.0).sqrt().asin();
        for snapshot in &run.snapshots {
            let expected = ((2 * snapshot.round + 1) as f64 * theta).sin().powi(2);
            assert_relative_eq!(snapshot.success_probability, expected, epsilon = 1e-10);
        }
        assert_relative_eq!(run.success_probability(), 0.9453125, epsilon = 1e-10);
    }

    #[test]
    fn test_circuit_reproduces_state() {
        let scheduler = AmplificationScheduler::new(TargetPattern::parse("0110").unwrap()).unwrap();
        let run = scheduler.run(2).unwrap();

        let mut replay = StateVector::new(4).unwrap();
        replay.apply_circuit(&run.circuit).unwrap();
        for (a, b) in replay.amplitudes().iter().zip(run.state.amplitudes()) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-12);
            assert_relative_eq!(a.im, b.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_rounds_is_uniform() {
        let scheduler = AmplificationScheduler::new(TargetPattern::all_ones(3).unwrap()).unwrap();
        let run = scheduler.run(0).unwrap();
        assert_eq!(run.circuit.len(), 3);
        assert_eq!(run.snapshots.len(), 1);
        assert_relative_eq!(run.success_probability(), 0.125, epsilon = 1e-12);
    }
}
