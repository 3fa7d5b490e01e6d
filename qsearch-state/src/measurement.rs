//! Finite-shot sampling from a probability distribution
//!
//! Every shot is an independent categorical draw from the full probability
//! vector, the statistics of a repeated prepare-and-measure experiment. Draws
//! use the alias method: O(2^n) setup, O(1) per shot.

use crate::distribution::{Distribution, OutcomeDistribution};
use crate::error::{Result, StateError};
use qsearch_core::bitstring;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sampling result containing counts from multiple measurement shots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingResult {
    /// Width of the measured register
    pub num_qubits: usize,

    /// Total number of shots
    pub shots: usize,

    /// Map from basis state index to count (observed outcomes only)
    pub counts: BTreeMap<u64, usize>,
}

impl SamplingResult {
    /// Create an empty sampling result
    pub fn new(num_qubits: usize, shots: usize) -> Self {
        Self {
            num_qubits,
            shots,
            counts: BTreeMap::new(),
        }
    }

    /// Add a measurement outcome
    pub fn add_outcome(&mut self, outcome: u64) {
        *self.counts.entry(outcome).or_insert(0) += 1;
    }

    /// Get the count for a specific outcome
    pub fn get_count(&self, outcome: u64) -> usize {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Get the probability of an outcome (count / shots)
    pub fn get_probability(&self, outcome: u64) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.get_count(outcome) as f64 / self.shots as f64
    }

    /// Get all outcomes sorted by count (descending)
    pub fn sorted_outcomes(&self) -> Vec<(u64, usize)> {
        let mut outcomes: Vec<_> = self.counts.iter().map(|(&k, &v)| (k, v)).collect();
        outcomes.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        outcomes
    }

    /// Most frequent outcome, if any shot was taken
    pub fn most_frequent(&self) -> Option<(u64, usize)> {
        self.sorted_outcomes().into_iter().next()
    }

    /// Convert counts to bitstring format
    pub fn to_bitstring_counts(&self) -> BTreeMap<String, usize> {
        self.counts
            .iter()
            .map(|(&outcome, &count)| (bitstring(outcome, self.num_qubits), count))
            .collect()
    }
}

impl OutcomeDistribution for SamplingResult {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn probability(&self, outcome: u64) -> f64 {
        self.get_probability(outcome)
    }

    fn support(&self) -> Vec<u64> {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(&outcome, _)| outcome)
            .collect()
    }
}

/// Draw `shots` outcomes from `distribution` with a generator seeded by `seed`
///
/// Identical arguments always produce identical counts.
///
/// # Example
/// ```
/// use qsearch_state::{sample, Distribution};
///
/// let dist = Distribution::new(1, vec![0.25, 0.75]).unwrap();
/// let a = sample(&dist, 1000, 7).unwrap();
/// let b = sample(&dist, 1000, 7).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.get_count(0) + a.get_count(1), 1000);
/// ```
pub fn sample(distribution: &Distribution, shots: usize, seed: u64) -> Result<SamplingResult> {
    let mut rng = StdRng::seed_from_u64(seed);
    sample_with_rng(distribution, shots, &mut rng)
}

/// Draw `shots` outcomes using a caller-owned generator
pub fn sample_with_rng<R: Rng + ?Sized>(
    distribution: &Distribution,
    shots: usize,
    rng: &mut R,
) -> Result<SamplingResult> {
    let mut result = SamplingResult::new(distribution.num_qubits(), shots);
    if shots == 0 {
        return Ok(result);
    }

    let table = AliasTable::new(distribution.probabilities())?;
    for _ in 0..shots {
        result.add_outcome(table.sample(rng) as u64);
    }
    Ok(result)
}

/// Alias table for O(1) sampling from discrete probability distribution
///
/// Uses the alias method (Walker's algorithm) to sample from a discrete
/// distribution in O(1) time after O(n) setup.
///
/// Reference: Walker, A. J. (1977). "An Efficient Method for Generating
/// Discrete Random Variables with General Distributions"
struct AliasTable {
    /// Probability threshold for each index
    prob: Vec<f64>,

    /// Alias index for each index
    alias: Vec<usize>,
}

impl AliasTable {
    fn new(probabilities: &[f64]) -> Result<Self> {
        let n = probabilities.len();
        if n == 0 {
            return Err(StateError::InvalidDimension { dimension: 0 });
        }

        let mut scaled: Vec<f64> = probabilities.iter().map(|&p| p * n as f64).collect();
        let mut prob = vec![0.0; n];
        let mut alias: Vec<usize> = (0..n).collect();

        let (mut small, mut large): (Vec<usize>, Vec<usize>) =
            (0..n).partition(|&i| scaled[i] < 1.0);

        while let (Some(&s), Some(&l)) = (small.last(), large.last()) {
            small.pop();
            large.pop();
            prob[s] = scaled[s];
            alias[s] = l;

            scaled[l] = (scaled[l] + scaled[s]) - 1.0;
            if scaled[l] < 1.0 {
                small.push(l);
            } else {
                large.push(l);
            }
        }

        // Leftovers are within rounding of 1
        for i in large.into_iter().chain(small) {
            prob[i] = 1.0;
        }

        Ok(Self { prob, alias })
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let i = rng.gen_range(0..self.prob.len());
        if rng.gen::<f64>() < self.prob[i] {
            i
        } else {
            self.alias[i]
        }
    }
}
