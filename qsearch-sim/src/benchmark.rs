//! Single-configuration benchmark pipeline

use crate::amplification::{optimal_rounds, AmplificationRun, AmplificationScheduler};
use crate::config::BenchmarkConfig;
use crate::error::Result;
use crate::metrics::{hellinger_fidelity, success_probability};
use crate::result::{BenchmarkRecord, ComparisonRow, ReportSummary};
use crate::sweep::derive_seed;
use qsearch_backend::{NoiseModel, NoisyCircuit};
use qsearch_core::{bitstring, TargetPattern};
use qsearch_state::{sample, Distribution, OutcomeDistribution, SamplingResult};
use std::collections::BTreeSet;
use tracing::info;

/// Everything produced by one benchmark run
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    /// Headline metrics
    pub record: BenchmarkRecord,

    /// Ideal amplification run with per-round snapshots
    pub run: AmplificationRun,

    /// Routed circuit and its error exposure
    pub noisy_circuit: NoisyCircuit,

    /// Exact ideal distribution
    pub ideal: Distribution,

    /// Exact distribution after gate and readout noise
    pub noisy: Distribution,

    /// Sampled ideal counts, `None` with 0 shots
    pub ideal_counts: Option<SamplingResult>,

    /// Sampled noisy counts, `None` with 0 shots
    pub noisy_counts: Option<SamplingResult>,
}

impl BenchmarkReport {
    /// Ideal versus noisy table, one row per observed state, by bitstring
    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        let n = self.record.qubit_count;
        match (&self.ideal_counts, &self.noisy_counts) {
            (Some(ideal), Some(noisy)) => {
                let outcomes: BTreeSet<u64> =
                    ideal.support().into_iter().chain(noisy.support()).collect();
                outcomes
                    .into_iter()
                    .map(|x| ComparisonRow {
                        bitstring: bitstring(x, n),
                        ideal_count: Some(ideal.get_count(x)),
                        ideal_probability: ideal.get_probability(x),
                        noisy_count: Some(noisy.get_count(x)),
                        noisy_probability: noisy.get_probability(x),
                    })
                    .collect()
            },
            _ => self
                .ideal
                .iter()
                .zip(self.noisy.iter())
                .filter(|((_, p), (_, q))| *p > 0.0 || *q > 0.0)
                .map(|((x, p), (_, q))| ComparisonRow {
                    bitstring: bitstring(x, n),
                    ideal_count: None,
                    ideal_probability: p,
                    noisy_count: None,
                    noisy_probability: q,
                })
                .collect(),
        }
    }

    /// Summary fields for the comparison table
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            total_shots: self.record.shots,
            hellinger_fidelity: self.record.hellinger_fidelity,
            ideal_success_percent: 100.0 * self.record.ideal_success_probability,
            noisy_success_percent: 100.0 * self.record.noisy_success_probability,
        }
    }
}

/// Run the full pipeline for one configuration
///
/// The configuration is validated before any simulation work. With
/// `shots > 0` success and fidelity come from sampled counts, otherwise
/// from the exact distributions.
///
/// # Example
/// ```
/// use qsearch_sim::{run_benchmark, BenchmarkConfig};
///
/// let report = run_benchmark(&BenchmarkConfig::new("101").with_shots(0)).unwrap();
/// assert_eq!(report.record.optimal_round_count, 2);
/// assert!((report.record.ideal_success_probability - 0.945).abs() < 0.01);
/// ```
pub fn run_benchmark(config: &BenchmarkConfig) -> Result<BenchmarkReport> {
    config.validate()?;
    let target = config.target_pattern()?;
    let n = target.num_qubits();

    let rounds = optimal_rounds(n, 1)?;
    let run = AmplificationScheduler::new(target.clone())?.run(rounds)?;

    let model = NoiseModel::new(config.noise.clone())?;
    let noisy_circuit = model.apply_noise(&run.circuit)?;
    let ideal = run.state.probabilities();
    let noisy = model.noisy_distribution(&noisy_circuit, &ideal)?;

    let (ideal_counts, noisy_counts) = if config.shots > 0 {
        (
            Some(sample(&ideal, config.shots, derive_seed(config.seed, 0))?),
            Some(sample(&noisy, config.shots, derive_seed(config.seed, 1))?),
        )
    } else {
        (None, None)
    };

    let (ideal_success, noisy_success, fidelity) = match (&ideal_counts, &noisy_counts) {
        (Some(i), Some(q)) => outcome_metrics(i, q, &target),
        _ => outcome_metrics(&ideal, &noisy, &target),
    };

    let record = BenchmarkRecord {
        qubit_count: n,
        optimal_round_count: rounds,
        circuit_depth: noisy_circuit.depth(),
        two_qubit_gate_count: noisy_circuit.two_qubit_gate_count(),
        ideal_success_probability: ideal_success,
        noisy_success_probability: noisy_success,
        hellinger_fidelity: fidelity,
        target: target.as_str().to_string(),
        search_space: 1u64 << n,
        error_rate: config.noise.depolarizing,
        readout_flip: config.noise.readout_flip,
        topology: config.noise.topology_name().to_string(),
        logical_depth: run.circuit.depth(),
        survival_probability: noisy_circuit.survival_probability,
        swap_count: noisy_circuit.routing.swap_count,
        shots: config.shots,
    };

    info!(
        pattern = %target,
        topology = %record.topology,
        error_rate = record.error_rate,
        depth = record.circuit_depth,
        ideal_success = record.ideal_success_probability,
        noisy_success = record.noisy_success_probability,
        fidelity = record.hellinger_fidelity,
        "benchmark complete"
    );

    Ok(BenchmarkReport {
        record,
        run,
        noisy_circuit,
        ideal,
        noisy,
        ideal_counts,
        noisy_counts,
    })
}

fn outcome_metrics<D: OutcomeDistribution>(ideal: &D, noisy: &D, target: &TargetPattern) -> (f64, f64, f64) {
    (
        success_probability(ideal, target),
        success_probability(noisy, target),
        hellinger_fidelity(ideal, noisy),
    )
}
