//! Statistical noise model
//!
//! Noise is applied to the final outcome distribution rather than tracked
//! gate by gate. With per-gate error ε and E elementary gates, the run
//! survives with probability `s = (1 - ε)^E`. A corrupted run reports the
//! ideal outcome XOR a uniformly random non-zero bit mask, which gives
//!
//! ```text
//! q(x) = s·p(x) + (1 - s)·(1 - p(x)) / (2^n - 1)
//! ```
//!
//! For a uniform `p` this is the uniform distribution again; for a peaked
//! `p` the corrupted branch avoids the peak, so success can fall below the
//! 1/2^n random-guess baseline. Readout error then flips every bit
//! independently with probability r.

use crate::error::check_probability;
use crate::routing::{Router, RoutedCircuit, RoutingStats};
use crate::{Result, Topology};
use qsearch_core::Circuit;
use qsearch_state::Distribution;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Noise parameters for one benchmark configuration
///
/// # Example
/// ```
/// use qsearch_backend::{NoiseConfig, Topology};
///
/// let config = NoiseConfig::new(0.01, 0.02).with_topology(Topology::Ring);
/// assert!(config.validate().is_ok());
/// assert!(NoiseConfig::new(1.5, 0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Per-gate depolarizing strength ε in [0, 1]
    pub depolarizing: f64,

    /// Per-qubit readout flip probability in [0, 1]
    pub readout_flip: f64,

    /// Connectivity constraint; `None` means no routing
    pub topology: Option<Topology>,
}

impl NoiseConfig {
    /// Noise with the given gate and readout error rates
    pub fn new(depolarizing: f64, readout_flip: f64) -> Self {
        Self {
            depolarizing,
            readout_flip,
            topology: None,
        }
    }

    /// Noiseless, unconstrained execution
    pub fn ideal() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Set the depolarizing strength
    pub fn with_depolarizing(mut self, depolarizing: f64) -> Self {
        self.depolarizing = depolarizing;
        self
    }

    /// Set the readout flip probability
    pub fn with_readout_flip(mut self, readout_flip: f64) -> Self {
        self.readout_flip = readout_flip;
        self
    }

    /// Route against a topology
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = Some(topology);
        self
    }

    /// Name of the active topology
    pub fn topology_name(&self) -> &str {
        self.topology.as_ref().map_or("unconstrained", Topology::name)
    }

    /// Whether this configuration adds no error at all
    pub fn is_noiseless(&self) -> bool {
        self.depolarizing == 0.0 && self.readout_flip == 0.0
    }

    /// Validate configuration
    ///
    /// # Errors
    /// Returns error naming the first probability outside [0, 1]
    pub fn validate(&self) -> Result<()> {
        check_probability("depolarizing", self.depolarizing)?;
        check_probability("readout_flip", self.readout_flip)?;
        Ok(())
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self::ideal()
    }
}

/// A circuit prepared for noisy execution
#[derive(Debug, Clone)]
pub struct NoisyCircuit {
    /// The routed circuit that actually runs
    pub circuit: Circuit,

    /// Overhead added by routing
    pub routing: RoutingStats,

    /// Elementary gates exposed to gate error
    pub error_exposure: usize,

    /// Probability that no gate error occurs
    pub survival_probability: f64,
}

impl NoisyCircuit {
    /// Depth of the routed circuit
    pub fn depth(&self) -> usize {
        self.circuit.depth()
    }

    /// CNOT-equivalent count of the routed circuit
    pub fn two_qubit_gate_count(&self) -> usize {
        self.circuit.two_qubit_gate_count()
    }
}

/// Noise model bound to one validated [`NoiseConfig`]
#[derive(Debug, Clone)]
pub struct NoiseModel {
    config: NoiseConfig,
}

impl NoiseModel {
    /// Create a noise model
    ///
    /// # Errors
    /// Returns error if the configuration is invalid
    pub fn new(config: NoiseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Route `circuit` for the configured topology and compute its error
    /// exposure and survival probability
    pub fn apply_noise(&self, circuit: &Circuit) -> Result<NoisyCircuit> {
        let routed = match &self.config.topology {
            Some(topology) => route_for_topology(circuit, topology)?,
            None => RoutedCircuit {
                circuit: circuit.clone(),
                stats: RoutingStats::default(),
            },
        };

        let error_exposure = routed.circuit.elementary_gate_count();
        let survival_probability = survival_probability(self.config.depolarizing, error_exposure);
        debug!(
            topology = self.config.topology_name(),
            swaps = routed.stats.swap_count,
            error_exposure,
            survival_probability,
            "prepared noisy circuit"
        );

        Ok(NoisyCircuit {
            circuit: routed.circuit,
            routing: routed.stats,
            error_exposure,
            survival_probability,
        })
    }

    /// Final outcome distribution of a noisy run
    ///
    /// `ideal` is the noiseless distribution of the circuit.
    pub fn noisy_distribution(&self, noisy: &NoisyCircuit, ideal: &Distribution) -> Result<Distribution> {
        let mixed = depolarize(ideal, noisy.survival_probability)?;
        apply_readout(&mixed, self.config.readout_flip)
    }
}

/// Route a circuit for a named topology
pub fn route_for_topology(circuit: &Circuit, topology: &Topology) -> Result<RoutedCircuit> {
    let graph = topology.graph(circuit.num_qubits())?;
    Router::new(graph).route(circuit)
}

/// `(1 - ε)^E`
pub fn survival_probability(depolarizing: f64, error_exposure: usize) -> f64 {
    let exponent = i32::try_from(error_exposure).unwrap_or(i32::MAX);
    (1.0 - depolarizing).powi(exponent)
}

/// Mix a distribution with its bit-mask-corrupted counterpart
///
/// # Errors
/// Returns error if `survival` is not a probability
pub fn depolarize(ideal: &Distribution, survival: f64) -> Result<Distribution> {
    check_probability("survival_probability", survival)?;
    let others = (ideal.len() - 1) as f64;
    Ok(ideal.try_map(|_, p| survival * p + (1.0 - survival) * (1.0 - p) / others)?)
}

/// Flip every bit independently with probability `flip`
///
/// # Errors
/// Returns error if `flip` is not a probability
pub fn apply_readout(distribution: &Distribution, flip: f64) -> Result<Distribution> {
    check_probability("readout_flip", flip)?;
    if flip == 0.0 {
        return Ok(distribution.clone());
    }

    let mut probs = distribution.probabilities().to_vec();
    let num_qubits = probs.len().trailing_zeros() as usize;
    for q in 0..num_qubits {
        let bit = 1usize << q;
        for i in 0..probs.len() {
            if i & bit == 0 {
                let (a, b) = (probs[i], probs[i | bit]);
                probs[i] = (1.0 - flip) * a + flip * b;
                probs[i | bit] = flip * a + (1.0 - flip) * b;
            }
        }
    }
    Ok(Distribution::new(num_qubits, probs)?)
}
