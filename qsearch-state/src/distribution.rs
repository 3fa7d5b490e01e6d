//! Outcome distributions over the computational basis

use crate::error::{Result, StateError};
use qsearch_core::{bitstring, check_qubit_count};

/// Allowed deviation of Σp from 1 for a caller-supplied distribution
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-9;

/// Anything that assigns a probability to basis-state outcomes
///
/// Implemented by exact [`Distribution`]s and by finite-shot
/// [`SamplingResult`](crate::SamplingResult)s, so metrics can compare either.
pub trait OutcomeDistribution {
    /// Width of the outcome register
    fn num_qubits(&self) -> usize;

    /// Probability (or relative frequency) of `outcome`, 0 if absent
    fn probability(&self, outcome: u64) -> f64;

    /// Outcomes with nonzero weight, in ascending order
    fn support(&self) -> Vec<u64>;
}

/// Exact probability vector over all 2^n basis states
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    num_qubits: usize,
    probabilities: Vec<f64>,
}

impl Distribution {
    /// Create a distribution from a full probability vector
    ///
    /// # Errors
    /// Returns error if the length is not 2^num_qubits, an entry is
    /// negative or not finite, or the entries do not sum to 1
    pub fn new(num_qubits: usize, probabilities: Vec<f64>) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let expected = 1usize << num_qubits;
        if probabilities.len() != expected {
            return Err(StateError::DimensionMismatch {
                expected,
                actual: probabilities.len(),
            });
        }
        if let Some((i, p)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < 0.0)
        {
            return Err(StateError::InvalidDistribution {
                reason: format!("entry {} has probability {}", i, p),
            });
        }
        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > DISTRIBUTION_TOLERANCE {
            return Err(StateError::InvalidDistribution {
                reason: format!("probabilities sum to {}", total),
            });
        }
        Ok(Self {
            num_qubits,
            probabilities,
        })
    }

    /// Trusted constructor for vectors derived from a normalized state
    pub(crate) fn from_parts(num_qubits: usize, probabilities: Vec<f64>) -> Self {
        Self {
            num_qubits,
            probabilities,
        }
    }

    /// Uniform distribution over 2^n outcomes
    pub fn uniform(num_qubits: usize) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let dimension = 1usize << num_qubits;
        Ok(Self::from_parts(
            num_qubits,
            vec![1.0 / dimension as f64; dimension],
        ))
    }

    /// Point mass on one outcome
    pub fn point(num_qubits: usize, outcome: u64) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let dimension = 1usize << num_qubits;
        let index = usize::try_from(outcome)
            .ok()
            .filter(|&i| i < dimension)
            .ok_or_else(|| StateError::InvalidDistribution {
                reason: format!("outcome {} outside {} basis states", outcome, dimension),
            })?;
        let mut probabilities = vec![0.0; dimension];
        probabilities[index] = 1.0;
        Ok(Self::from_parts(num_qubits, probabilities))
    }

    /// Number of outcomes (2^n)
    #[inline]
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Always false; a distribution covers at least two outcomes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// The full probability vector
    #[inline]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Iterate (outcome, probability) over every basis state
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.probabilities
            .iter()
            .enumerate()
            .map(|(i, &p)| (i as u64, p))
    }

    /// Probability of `outcome`
    pub fn probability(&self, outcome: u64) -> f64 {
        usize::try_from(outcome)
            .ok()
            .and_then(|i| self.probabilities.get(i).copied())
            .unwrap_or(0.0)
    }

    /// Most likely outcome (lowest index on ties)
    pub fn most_likely(&self) -> (u64, f64) {
        self.iter()
            .fold((0, f64::NEG_INFINITY), |best, (i, p)| if p > best.1 { (i, p) } else { best })
    }

    /// (bitstring, probability) for every outcome with nonzero probability
    pub fn bitstring_probabilities(&self) -> Vec<(String, f64)> {
        self.iter()
            .filter(|(_, p)| *p > 0.0)
            .map(|(i, p)| (bitstring(i, self.num_qubits), p))
            .collect()
    }

    /// Apply `f` to every (outcome, probability) pair, producing a new
    /// distribution of the same width
    ///
    /// # Errors
    /// Returns error if the result is not a proper distribution
    pub fn try_map<F>(&self, f: F) -> Result<Self>
    where
        F: Fn(u64, f64) -> f64,
    {
        let mapped = self.iter().map(|(i, p)| f(i, p)).collect();
        Self::new(self.num_qubits, mapped)
    }
}

impl OutcomeDistribution for Distribution {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn probability(&self, outcome: u64) -> f64 {
        Distribution::probability(self, outcome)
    }

    fn support(&self) -> Vec<u64> {
        self.iter().filter(|(_, p)| *p > 0.0).map(|(i, _)| i).collect()
    }
}
