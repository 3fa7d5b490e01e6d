//! Dense statevector with in-place gate kernels

use crate::distribution::Distribution;
use crate::error::{Result, StateError};
use num_complex::Complex64;
use qsearch_core::{check_qubit_count, Circuit, GateOp};
use std::f64::consts::FRAC_1_SQRT_2;

/// Allowed deviation of ‖ψ‖² from 1 after any gate
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Dense state vector of 2^n complex amplitudes
///
/// Amplitude `i` belongs to the basis state whose bit `q` is the value of
/// qubit `q`. Every [`apply`](Self::apply) re-checks the norm; drift beyond
/// [`NORM_TOLERANCE`] is reported as [`StateError::NormDrift`].
///
/// # Example
/// ```
/// use qsearch_core::GateOp;
/// use qsearch_state::StateVector;
///
/// let mut state = StateVector::new(2).unwrap();
/// state.apply(&GateOp::Hadamard(0)).unwrap();
/// state.apply(&GateOp::mcx(&[0], 1)).unwrap();
///
/// let probs = state.probabilities();
/// assert!((probs.probability(0b00) - 0.5).abs() < 1e-12);
/// assert!((probs.probability(0b11) - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// Create a new state vector initialized to |0...0⟩
    ///
    /// # Errors
    /// Returns error if `num_qubits` is 0 or above `MAX_QUBITS`
    pub fn new(num_qubits: usize) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    /// Create a state vector from existing amplitudes
    ///
    /// # Errors
    /// Returns error if the length is not 2^num_qubits or the amplitudes
    /// are not normalized within [`NORM_TOLERANCE`]
    pub fn from_amplitudes(num_qubits: usize, amplitudes: Vec<Complex64>) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let expected = 1 << num_qubits;
        if amplitudes.len() != expected {
            return Err(StateError::DimensionMismatch {
                expected,
                actual: amplitudes.len(),
            });
        }

        let state = Self {
            num_qubits,
            amplitudes,
        };
        let norm_sqr = state.norm_sqr();
        if (norm_sqr - 1.0).abs() > NORM_TOLERANCE {
            return Err(StateError::NotNormalized { norm_sqr });
        }
        Ok(state)
    }

    /// Uniform superposition over all 2^n basis states
    pub fn uniform(num_qubits: usize) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let dimension = 1usize << num_qubits;
        let amp = Complex64::new(1.0 / (dimension as f64).sqrt(), 0.0);
        Ok(Self {
            num_qubits,
            amplitudes: vec![amp; dimension],
        })
    }

    /// Get the number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the dimension (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Get a slice of the amplitudes
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Amplitude of one basis state, zero when out of range
    pub fn amplitude(&self, index: u64) -> Complex64 {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.amplitudes.get(i).copied())
            .unwrap_or_default()
    }

    /// Squared norm Σ|αᵢ|²
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Apply one gate in place
    ///
    /// # Errors
    /// Returns error if the gate addresses qubits outside the register, or if
    /// the norm leaves the tolerance band afterwards
    pub fn apply(&mut self, gate: &GateOp) -> Result<()> {
        gate.validate(self.num_qubits)?;

        match gate {
            GateOp::Hadamard(q) => self.apply_hadamard(*q),
            GateOp::PauliX(q) => self.apply_controlled_x(0, *q),
            GateOp::PauliZ(q) => self.apply_phase_flip(1 << *q),
            GateOp::MultiControlledX { controls, target } => {
                self.apply_controlled_x(mask_of(controls), *target)
            },
            GateOp::MultiControlledZ { controls, target } => {
                self.apply_phase_flip(mask_of(controls) | (1 << *target))
            },
            GateOp::Swap(a, b) => self.apply_swap(*a, *b),
        }

        self.check_norm(gate)
    }

    /// Apply every gate of a circuit in order
    ///
    /// # Errors
    /// Returns error on a width mismatch or the first failing gate
    pub fn apply_circuit(&mut self, circuit: &Circuit) -> Result<()> {
        if circuit.num_qubits() != self.num_qubits {
            return Err(StateError::DimensionMismatch {
                expected: self.num_qubits,
                actual: circuit.num_qubits(),
            });
        }
        for gate in circuit.operations() {
            self.apply(gate)?;
        }
        Ok(())
    }

    /// Squared-magnitude distribution over the basis (no collapse)
    pub fn probabilities(&self) -> Distribution {
        Distribution::from_parts(
            self.num_qubits,
            self.amplitudes.iter().map(|a| a.norm_sqr()).collect(),
        )
    }

    /// Immutable copy of the current amplitudes
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            num_qubits: self.num_qubits,
            amplitudes: self.amplitudes.clone(),
        }
    }

    fn apply_hadamard(&mut self, qubit: usize) {
        let bit = 1usize << qubit;
        for i in 0..self.amplitudes.len() {
            if i & bit == 0 {
                let j = i | bit;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = (a + b) * FRAC_1_SQRT_2;
                self.amplitudes[j] = (a - b) * FRAC_1_SQRT_2;
            }
        }
    }

    fn apply_controlled_x(&mut self, control_mask: usize, target: usize) {
        let bit = 1usize << target;
        for i in 0..self.amplitudes.len() {
            if i & bit == 0 && i & control_mask == control_mask {
                self.amplitudes.swap(i, i | bit);
            }
        }
    }

    fn apply_phase_flip(&mut self, mask: usize) {
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask == mask {
                *amp = -*amp;
            }
        }
    }

    fn apply_swap(&mut self, a: usize, b: usize) {
        let bit_a = 1usize << a;
        let bit_b = 1usize << b;
        for i in 0..self.amplitudes.len() {
            if i & bit_a != 0 && i & bit_b == 0 {
                self.amplitudes.swap(i, i ^ bit_a ^ bit_b);
            }
        }
    }

    fn check_norm(&self, gate: &GateOp) -> Result<()> {
        let norm_sqr = self.norm_sqr();
        if (norm_sqr - 1.0).abs() > NORM_TOLERANCE {
            return Err(StateError::NormDrift {
                norm_sqr,
                gate: gate.to_string(),
            });
        }
        Ok(())
    }
}

fn mask_of(qubits: &[usize]) -> usize {
    qubits.iter().fold(0, |mask, &q| mask | (1 << q))
}

/// Frozen amplitudes taken between amplification rounds
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl StateSnapshot {
    /// Number of qubits of the captured state
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Captured amplitudes
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Probability of one basis state
    pub fn probability(&self, index: u64) -> f64 {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.amplitudes.get(i))
            .map_or(0.0, |a| a.norm_sqr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_state() {
        let state = StateVector::new(3).unwrap();
        let amplitudes = state.amplitudes();

        // Should be |000⟩
        assert_eq!(amplitudes[0], Complex64::new(1.0, 0.0));
        for amp in &amplitudes[1..] {
            assert_eq!(*amp, Complex64::new(0.0, 0.0));
        }
        assert_eq!(state.dimension(), 8);
    }

    #[test]
    fn test_from_amplitudes() {
        let amplitudes = vec![Complex64::new(0.5, 0.0); 4];
        let state = StateVector::from_amplitudes(2, amplitudes).unwrap();
        assert_relative_eq!(state.norm_sqr(), 1.0, epsilon = 1e-12);

        let bad = vec![Complex64::new(1.0, 0.0); 4];
        assert!(matches!(
            StateVector::from_amplitudes(2, bad),
            Err(StateError::NotNormalized { .. })
        ));

        let short = vec![Complex64::new(1.0, 0.0); 3];
        assert!(matches!(
            StateVector::from_amplitudes(2, short),
            Err(StateError::DimensionMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_hadamard_creates_superposition() {
        let mut state = StateVector::new(1).unwrap();
        state.apply(&GateOp::Hadamard(0)).unwrap();
        assert_relative_eq!(state.amplitude(0).re, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(state.amplitude(1).re, FRAC_1_SQRT_2, epsilon = 1e-12);

        state.apply(&GateOp::Hadamard(0)).unwrap();
        assert_relative_eq!(state.amplitude(0).re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pauli_x_targets_one_qubit() {
        let mut state = StateVector::new(3).unwrap();
        state.apply(&GateOp::PauliX(1)).unwrap();
        assert_relative_eq!(state.amplitude(0b010).re, 1.0);
    }

    #[test]
    fn test_multi_controlled_x() {
        let mut state = StateVector::new(3).unwrap();
        state.apply(&GateOp::PauliX(0)).unwrap();
        state.apply(&GateOp::mcx(&[0, 1], 2)).unwrap();
        // Control 1 is |0⟩, nothing happens
        assert_relative_eq!(state.amplitude(0b001).re, 1.0);

        state.apply(&GateOp::PauliX(1)).unwrap();
        state.apply(&GateOp::mcx(&[0, 1], 2)).unwrap();
        assert_relative_eq!(state.amplitude(0b111).re, 1.0);
    }

    #[test]
    fn test_multi_controlled_z_flips_all_ones_only() {
        let mut state = StateVector::uniform(3).unwrap();
        state.apply(&GateOp::mcz(&[0, 1], 2)).unwrap();
        for i in 0..8u64 {
            let sign = if i == 0b111 { -1.0 } else { 1.0 };
            let expected = sign / 8f64.sqrt();
            assert_relative_eq!(state.amplitude(i).re, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_swap_exchanges_qubits() {
        let mut state = StateVector::new(3).unwrap();
        state.apply(&GateOp::PauliX(0)).unwrap();
        state.apply(&GateOp::Swap(0, 2)).unwrap();
        assert_relative_eq!(state.amplitude(0b100).re, 1.0);
    }

    #[test]
    fn test_invalid_gate_rejected() {
        let mut state = StateVector::new(2).unwrap();
        assert!(matches!(
            state.apply(&GateOp::Hadamard(2)),
            Err(StateError::Core(_))
        ));
    }

    #[test]
    fn test_apply_circuit_width_mismatch() {
        let mut state = StateVector::new(2).unwrap();
        let circuit = Circuit::new(3).unwrap();
        assert!(matches!(
            state.apply_circuit(&circuit),
            Err(StateError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut state = StateVector::new(1).unwrap();
        let snapshot = state.snapshot();
        state.apply(&GateOp::PauliX(0)).unwrap();
        assert_relative_eq!(snapshot.probability(0), 1.0);
        assert_relative_eq!(state.probabilities().probability(1), 1.0);
    }
}
