//! Fidelity, success probability and the quantum-advantage threshold

use crate::amplification::AmplificationScheduler;
use crate::config::ThresholdSearch;
use crate::error::Result;
use qsearch_backend::{apply_readout, depolarize, route_for_topology, survival_probability, NoiseConfig, Topology};
use qsearch_core::{check_qubit_count, TargetPattern};
use qsearch_state::{Distribution, OutcomeDistribution};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Hellinger fidelity `(Σ √(p·q))²` of two outcome distributions
///
/// Outcomes missing from one side count as probability 0. The result is
/// clamped to [0, 1] and is exactly 1 when both sides carry the same
/// probabilities.
///
/// # Example
/// ```
/// use qsearch_sim::hellinger_fidelity;
/// use qsearch_state::Distribution;
///
/// let p = Distribution::new(1, vec![1.0, 0.0]).unwrap();
/// let q = Distribution::new(1, vec![0.0, 1.0]).unwrap();
/// assert_eq!(hellinger_fidelity(&p, &p), 1.0);
/// assert_eq!(hellinger_fidelity(&p, &q), 0.0);
/// ```
pub fn hellinger_fidelity<P, Q>(p: &P, q: &Q) -> f64
where
    P: OutcomeDistribution + ?Sized,
    Q: OutcomeDistribution + ?Sized,
{
    let outcomes: BTreeSet<u64> = p.support().into_iter().chain(q.support()).collect();
    let pairs: Vec<(f64, f64)> = outcomes
        .into_iter()
        .map(|x| (p.probability(x), q.probability(x)))
        .collect();

    // Rounding in the square roots can leave identical inputs short of 1
    if !pairs.is_empty() && pairs.iter().all(|(a, b)| a == b) {
        return 1.0;
    }

    let overlap: f64 = pairs.iter().map(|(a, b)| (a * b).sqrt()).sum();
    (overlap * overlap).clamp(0.0, 1.0)
}

/// Probability (or observed frequency) of the marked state
pub fn success_probability<D>(distribution: &D, target: &TargetPattern) -> f64
where
    D: OutcomeDistribution + ?Sized,
{
    distribution.probability(target.index())
}

/// Success probability of guessing uniformly at random, `1 / 2ⁿ`
pub fn classical_baseline(num_qubits: usize) -> f64 {
    1.0 / (1u64 << num_qubits) as f64
}

/// Smallest error rate at which `search_fn` falls to the classical baseline
///
/// `search_fn` maps a depolarizing strength to a success probability and
/// must be non-increasing in it. The bracket [0, 1] is bisected until it
/// is narrower than `search.tolerance`.
///
/// Returns `Some(0.0)` if success is already at or below the baseline
/// without noise, and `None` if it stays above the baseline even at ε = 1.
pub fn quantum_advantage_threshold<F>(
    num_qubits: usize,
    topology: &Topology,
    mut search_fn: F,
    search: &ThresholdSearch,
) -> Result<Option<f64>>
where
    F: FnMut(f64) -> Result<f64>,
{
    check_qubit_count(num_qubits)?;
    search.validate()?;
    let baseline = classical_baseline(num_qubits);

    if search_fn(0.0)? <= baseline {
        return Ok(Some(0.0));
    }
    if search_fn(1.0)? > baseline {
        info!(topology = topology.name(), num_qubits, "no advantage threshold in [0, 1]");
        return Ok(None);
    }

    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    let mut iterations = 0;
    while hi - lo > search.tolerance && iterations < search.max_iterations {
        let mid = 0.5 * (lo + hi);
        if search_fn(mid)? <= baseline {
            hi = mid;
        } else {
            lo = mid;
        }
        iterations += 1;
    }

    debug!(iterations, lo, hi, "bisection finished");
    info!(topology = topology.name(), num_qubits, threshold = hi, "advantage threshold");
    Ok(Some(hi))
}

/// Exact noisy success probability of one target as a function of ε
///
/// The ideal run and the routing are computed once; evaluating a new
/// error rate only re-applies the statistical noise model.
#[derive(Debug, Clone)]
pub struct NoisySuccessCurve {
    target: TargetPattern,
    ideal: Distribution,
    error_exposure: usize,
    readout_flip: f64,
}

impl NoisySuccessCurve {
    /// Prepare the curve for `target` on `topology` at the optimal round count
    pub fn new(target: &TargetPattern, topology: &Topology, readout_flip: f64) -> Result<Self> {
        NoiseConfig::new(0.0, readout_flip).validate()?;
        let run = AmplificationScheduler::new(target.clone())?.run_optimal()?;
        let routed = route_for_topology(&run.circuit, topology)?;

        Ok(Self {
            target: target.clone(),
            ideal: run.state.probabilities(),
            error_exposure: routed.circuit.elementary_gate_count(),
            readout_flip,
        })
    }

    /// Elementary gates exposed to gate error
    pub fn error_exposure(&self) -> usize {
        self.error_exposure
    }

    /// Noiseless success probability
    pub fn ideal_success(&self) -> f64 {
        success_probability(&self.ideal, &self.target)
    }

    /// Noisy success probability at depolarizing strength `depolarizing`
    pub fn success_at(&self, depolarizing: f64) -> Result<f64> {
        NoiseConfig::new(depolarizing, self.readout_flip).validate()?;
        let survival = survival_probability(depolarizing, self.error_exposure);
        let mixed = depolarize(&self.ideal, survival)?;
        let noisy = apply_readout(&mixed, self.readout_flip)?;
        Ok(success_probability(&noisy, &self.target))
    }
}

/// Advantage threshold of the full noisy pipeline for one target
///
/// # Example
/// ```
/// use qsearch_backend::Topology;
/// use qsearch_core::TargetPattern;
/// use qsearch_sim::advantage_threshold;
///
/// let target = TargetPattern::parse("101").unwrap();
/// let threshold = advantage_threshold(&target, &Topology::AllToAll, 0.0).unwrap().unwrap();
/// assert!(threshold > 0.01 && threshold < 0.05);
/// ```
pub fn advantage_threshold(
    target: &TargetPattern,
    topology: &Topology,
    readout_flip: f64,
) -> Result<Option<f64>> {
    let curve = NoisySuccessCurve::new(target, topology, readout_flip)?;
    quantum_advantage_threshold(
        target.num_qubits(),
        topology,
        |eps| curve.success_at(eps),
        &ThresholdSearch::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qsearch_state::SamplingResult;

    #[test]
    fn test_hellinger_partial_overlap() {
        let p = Distribution::new(1, vec![0.5, 0.5]).unwrap();
        let q = Distribution::new(1, vec![1.0, 0.0]).unwrap();
        assert_relative_eq!(hellinger_fidelity(&p, &q), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_hellinger_identical_is_exactly_one() {
        let p = Distribution::new(2, vec![0.7, 0.1, 0.1, 0.1]).unwrap();
        assert_eq!(hellinger_fidelity(&p, &p), 1.0);
        assert_eq!(hellinger_fidelity(&p, &p.clone()), 1.0);
    }

    #[test]
    fn test_hellinger_counts_against_distribution() {
        let mut counts = SamplingResult::new(2, 4);
        for outcome in [0, 1, 2, 3] {
            counts.add_outcome(outcome);
        }
        let uniform = Distribution::uniform(2).unwrap();
        assert_relative_eq!(hellinger_fidelity(&counts, &uniform), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_success_and_baseline() {
        let target = TargetPattern::parse("11").unwrap();
        let dist = Distribution::new(2, vec![0.1, 0.1, 0.1, 0.7]).unwrap();
        assert_relative_eq!(success_probability(&dist, &target), 0.7);
        assert_relative_eq!(classical_baseline(3), 0.125);
    }

    #[test]
    fn test_threshold_on_linear_curve() {
        // 1 - ε crosses 1/4 at 0.75
        let threshold = quantum_advantage_threshold(
            2,
            &Topology::AllToAll,
            |eps| Ok(1.0 - eps),
            &ThresholdSearch::default(),
        )
        .unwrap()
        .unwrap();
        assert_relative_eq!(threshold, 0.75, epsilon = 1e-5);
    }

    #[test]
    fn test_threshold_edge_cases() {
        let search = ThresholdSearch::default();
        let below = quantum_advantage_threshold(2, &Topology::Ring, |_| Ok(0.1), &search).unwrap();
        assert_eq!(below, Some(0.0));

        let above = quantum_advantage_threshold(2, &Topology::Ring, |_| Ok(0.9), &search).unwrap();
        assert_eq!(above, None);
    }

    #[test]
    fn test_threshold_matches_closed_form() {
        // Success reaches 1/N exactly when (1 - ε)^E = 1/N
        let target = TargetPattern::parse("101").unwrap();
        let curve = NoisySuccessCurve::new(&target, &Topology::AllToAll, 0.0).unwrap();
        assert_eq!(curve.error_exposure(), 95);

        let threshold = advantage_threshold(&target, &Topology::AllToAll, 0.0).unwrap().unwrap();
        let expected = 1.0 - 8f64.powf(-1.0 / 95.0);
        assert_relative_eq!(threshold, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_curve_rejects_bad_rate() {
        let target = TargetPattern::parse("11").unwrap();
        let curve = NoisySuccessCurve::new(&target, &Topology::AllToAll, 0.0).unwrap();
        assert!(curve.success_at(1.5).is_err());
        assert!(NoisySuccessCurve::new(&target, &Topology::AllToAll, -0.1).is_err());
    }
}
