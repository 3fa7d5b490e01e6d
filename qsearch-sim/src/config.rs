//! Benchmark, sweep and threshold-search configuration

use crate::error::{Result, SimulatorError};
use qsearch_backend::{NoiseConfig, Topology};
use qsearch_core::TargetPattern;
use serde::{Deserialize, Serialize};

/// Configuration for a single benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Marked bitstring; its length fixes the register width
    ///
    /// Default: "101"
    pub target: String,

    /// Gate error, readout error and topology
    ///
    /// Default: noiseless, unconstrained
    pub noise: NoiseConfig,

    /// Measurement shots per distribution
    ///
    /// With 0 shots the metrics are computed from the exact distributions.
    ///
    /// Default: 8192
    pub shots: usize,

    /// Seed for the sampling streams
    ///
    /// Default: 42
    pub seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            target: "101".to_string(),
            noise: NoiseConfig::ideal(),
            shots: 8192,
            seed: 42,
        }
    }
}

impl BenchmarkConfig {
    /// Benchmark searching for `target` with default settings
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    /// Set the full noise configuration
    pub fn with_noise(mut self, noise: NoiseConfig) -> Self {
        self.noise = noise;
        self
    }

    /// Set the per-gate depolarizing strength
    pub fn with_depolarizing(mut self, depolarizing: f64) -> Self {
        self.noise.depolarizing = depolarizing;
        self
    }

    /// Set the readout flip probability
    pub fn with_readout_flip(mut self, readout_flip: f64) -> Self {
        self.noise.readout_flip = readout_flip;
        self
    }

    /// Route against a topology
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.noise.topology = Some(topology);
        self
    }

    /// Set the number of measurement shots
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Set the sampling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parsed target pattern
    pub fn target_pattern(&self) -> Result<TargetPattern> {
        Ok(TargetPattern::parse(&self.target)?)
    }

    /// Validate the configuration
    ///
    /// # Errors
    /// Returns a validation error naming the offending field
    pub fn validate(&self) -> Result<()> {
        self.target_pattern()?;
        self.noise.validate()?;
        Ok(())
    }
}

/// How the sweep picks the marked state for each width
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetChoice {
    /// `11…1` at every width
    AllOnes,

    /// The same fixed pattern at every width
    Pattern(String),
}

impl TargetChoice {
    /// Target bitstring for a register of `num_qubits` qubits
    pub fn resolve(&self, num_qubits: usize) -> String {
        match self {
            TargetChoice::AllOnes => "1".repeat(num_qubits),
            TargetChoice::Pattern(bits) => bits.clone(),
        }
    }
}

impl Default for TargetChoice {
    fn default() -> Self {
        TargetChoice::AllOnes
    }
}

/// Configuration for a sweep over widths, error rates and topologies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Register widths, outer loop
    ///
    /// Default: 3, 4, 5, 6
    pub qubit_counts: Vec<usize>,

    /// Topologies, middle loop
    ///
    /// Default: all-to-all
    pub topologies: Vec<Topology>,

    /// Per-gate depolarizing strengths, inner loop
    ///
    /// Default: 0.001
    pub error_rates: Vec<f64>,

    /// Readout flip probability for every configuration
    ///
    /// Default: 0.0
    pub readout_flip: f64,

    /// Marked state per width
    ///
    /// Default: all ones
    pub target: TargetChoice,

    /// Shots per distribution, 0 for exact metrics
    ///
    /// Default: 4096
    pub shots: usize,

    /// Base seed; every configuration derives its own stream from it
    ///
    /// Default: 42
    pub seed: u64,

    /// Run configurations on the rayon thread pool
    ///
    /// Default: true
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            qubit_counts: vec![3, 4, 5, 6],
            topologies: vec![Topology::AllToAll],
            error_rates: vec![0.001],
            readout_flip: 0.0,
            target: TargetChoice::AllOnes,
            shots: 4096,
            seed: 42,
            parallel: true,
        }
    }
}

impl SweepConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Width scaling study on a sparse two-row device
    pub fn scalability() -> Self {
        Self {
            topologies: vec![Topology::Ladder],
            ..Default::default()
        }
    }

    /// Error-rate sensitivity at one width: ten log-spaced rates in [1e-4, 1e-1]
    pub fn noise_sensitivity(num_qubits: usize) -> Self {
        Self {
            qubit_counts: vec![num_qubits],
            error_rates: log_spaced_error_rates(1e-4, 1e-1, 10),
            ..Default::default()
        }
    }

    /// Every built-in topology at one width and error rate
    pub fn topology_comparison(num_qubits: usize, error_rate: f64) -> Self {
        Self {
            qubit_counts: vec![num_qubits],
            topologies: Topology::standard(),
            error_rates: vec![error_rate],
            ..Default::default()
        }
    }

    /// Set the register widths
    pub fn with_qubit_counts(mut self, qubit_counts: Vec<usize>) -> Self {
        self.qubit_counts = qubit_counts;
        self
    }

    /// Set the topologies
    pub fn with_topologies(mut self, topologies: Vec<Topology>) -> Self {
        self.topologies = topologies;
        self
    }

    /// Set the error rates
    pub fn with_error_rates(mut self, error_rates: Vec<f64>) -> Self {
        self.error_rates = error_rates;
        self
    }

    /// Set the readout flip probability
    pub fn with_readout_flip(mut self, readout_flip: f64) -> Self {
        self.readout_flip = readout_flip;
        self
    }

    /// Set the target choice
    pub fn with_target(mut self, target: TargetChoice) -> Self {
        self.target = target;
        self
    }

    /// Set the number of shots
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Set the base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable parallel execution
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of configurations the sweep enumerates
    pub fn num_configurations(&self) -> usize {
        self.qubit_counts.len() * self.topologies.len() * self.error_rates.len()
    }

    /// Validate the sweep shape
    ///
    /// Individual configurations are validated when they run, so a bad
    /// error rate fails only its own configuration.
    pub fn validate(&self) -> Result<()> {
        if self.qubit_counts.is_empty() {
            return Err(SimulatorError::validation("qubit_counts", "must not be empty"));
        }
        if self.topologies.is_empty() {
            return Err(SimulatorError::validation("topologies", "must not be empty"));
        }
        if self.error_rates.is_empty() {
            return Err(SimulatorError::validation("error_rates", "must not be empty"));
        }
        Ok(())
    }
}

/// Bisection settings for the advantage-threshold search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSearch {
    /// Width of the final bracket
    ///
    /// Default: 1e-6
    pub tolerance: f64,

    /// Upper bound on bisection steps
    ///
    /// Default: 64
    pub max_iterations: usize,
}

impl Default for ThresholdSearch {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 64,
        }
    }
}

impl ThresholdSearch {
    /// Set the bracket tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Validate the search settings
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(SimulatorError::validation(
                "tolerance",
                format!("must be in (0, 1), got {}", self.tolerance),
            ));
        }
        if self.max_iterations == 0 {
            return Err(SimulatorError::validation("max_iterations", "must be > 0"));
        }
        Ok(())
    }
}

/// `points` error rates spaced evenly on a log scale from `min` to `max`
///
/// # Example
/// ```
/// use qsearch_sim::log_spaced_error_rates;
///
/// let rates = log_spaced_error_rates(1e-4, 1e-1, 4);
/// assert_eq!(rates.len(), 4);
/// assert!((rates[1] - 1e-3).abs() < 1e-12);
/// ```
pub fn log_spaced_error_rates(min: f64, max: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let (lo, hi) = (min.log10(), max.log10());
            let step = (hi - lo) / (points - 1) as f64;
            (0..points)
                .map(|i| 10f64.powf(lo + step * i as f64))
                .collect()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.target, "101");
        assert_eq!(config.shots, 8192);
        assert!(config.noise.is_noiseless());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = BenchmarkConfig::new("1101")
            .with_depolarizing(0.01)
            .with_readout_flip(0.02)
            .with_topology(Topology::Ring)
            .with_shots(0)
            .with_seed(7);

        assert_eq!(config.target_pattern().unwrap().num_qubits(), 4);
        assert_eq!(config.noise.depolarizing, 0.01);
        assert_eq!(config.noise.topology, Some(Topology::Ring));
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_validate_reports_field() {
        let err = BenchmarkConfig::new("10a").validate().unwrap_err();
        assert!(matches!(err, SimulatorError::Validation { ref field, .. } if field == "target"));

        let err = BenchmarkConfig::new("101")
            .with_readout_flip(1.2)
            .validate()
            .unwrap_err();
        assert!(matches!(err, SimulatorError::Validation { ref field, .. } if field == "readout_flip"));
    }

    #[test]
    fn test_target_choice() {
        assert_eq!(TargetChoice::AllOnes.resolve(4), "1111");
        assert_eq!(TargetChoice::Pattern("01".into()).resolve(4), "01");
    }

    #[test]
    fn test_sweep_presets() {
        assert_eq!(SweepConfig::default().num_configurations(), 4);
        assert_eq!(SweepConfig::noise_sensitivity(3).num_configurations(), 10);
        assert_eq!(
            SweepConfig::topology_comparison(4, 0.01).num_configurations(),
            Topology::standard().len()
        );
        assert!(SweepConfig::new().with_error_rates(vec![]).validate().is_err());
    }

    #[test]
    fn test_threshold_search_validate() {
        assert!(ThresholdSearch::default().validate().is_ok());
        assert!(ThresholdSearch::default().with_tolerance(0.0).validate().is_err());
        assert!(ThresholdSearch::default().with_max_iterations(0).validate().is_err());
    }

    #[test]
    fn test_log_spaced_error_rates() {
        let rates = log_spaced_error_rates(1e-4, 1e-1, 10);
        assert_eq!(rates.len(), 10);
        assert_relative_eq!(rates[0], 1e-4, max_relative = 1e-12);
        assert_relative_eq!(rates[9], 1e-1, max_relative = 1e-12);
        assert!(rates.windows(2).all(|w| w[0] < w[1]));
        assert!(log_spaced_error_rates(1e-3, 1e-1, 0).is_empty());
    }
}
