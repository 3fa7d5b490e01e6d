//! Oracle and diffusion circuits for amplitude amplification

use crate::error::Result;
use qsearch_core::{Circuit, GateOp, TargetPattern};

/// Phase oracle that negates the amplitude of `target` only
///
/// Qubits whose target bit is 0 are conjugated with X so the marked state
/// maps to `|1…1⟩`. The phase flip on `|1…1⟩` is a multi-controlled X on
/// the last qubit sandwiched between Hadamards.
///
/// # Example
/// ```
/// use qsearch_core::TargetPattern;
/// use qsearch_sim::build_oracle;
///
/// let target = TargetPattern::parse("101").unwrap();
/// let oracle = build_oracle(&target).unwrap();
/// assert_eq!(oracle.len(), 5);
/// ```
pub fn build_oracle(target: &TargetPattern) -> Result<Circuit> {
    let n = target.num_qubits();
    let flips: Vec<usize> = target.zero_qubits().collect();
    let mut oracle = Circuit::with_capacity(n, 2 * flips.len() + 3)?;

    for &q in &flips {
        oracle.add(GateOp::PauliX(q))?;
    }
    append_phase_flip_on_ones(&mut oracle)?;
    for &q in &flips {
        oracle.add(GateOp::PauliX(q))?;
    }

    Ok(oracle)
}

/// Inversion about the mean of an `n`-qubit register
///
/// Realised as `H^n · X^n · MCZ · X^n · H^n`, which is `2|ψ₀⟩⟨ψ₀| − I`
/// up to a global phase of −1.
pub fn build_diffusion(num_qubits: usize) -> Result<Circuit> {
    let n = num_qubits;
    let mut diffusion = Circuit::with_capacity(n, 4 * n + 1)?;

    for q in 0..n {
        diffusion.add(GateOp::Hadamard(q))?;
    }
    for q in 0..n {
        diffusion.add(GateOp::PauliX(q))?;
    }
    let controls: Vec<usize> = (0..n - 1).collect();
    diffusion.add(GateOp::mcz(&controls, n - 1))?;
    for q in 0..n {
        diffusion.add(GateOp::PauliX(q))?;
    }
    for q in 0..n {
        diffusion.add(GateOp::Hadamard(q))?;
    }

    Ok(diffusion)
}

/// One amplification round: oracle followed by diffusion
pub fn grover_operator(target: &TargetPattern) -> Result<Circuit> {
    let mut round = build_oracle(target)?;
    round.extend(&build_diffusion(target.num_qubits())?)?;
    Ok(round)
}

/// Hadamard on every qubit
pub(crate) fn uniform_superposition(num_qubits: usize) -> Result<Circuit> {
    let mut circuit = Circuit::with_capacity(num_qubits, num_qubits)?;
    for q in 0..num_qubits {
        circuit.add(GateOp::Hadamard(q))?;
    }
    Ok(circuit)
}

fn append_phase_flip_on_ones(circuit: &mut Circuit) -> Result<()> {
    let last = circuit.num_qubits() - 1;
    let controls: Vec<usize> = (0..last).collect();
    circuit
        .add(GateOp::Hadamard(last))?
        .add(GateOp::mcx(&controls, last))?
        .add(GateOp::Hadamard(last))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qsearch_state::StateVector;

    #[test]
    fn test_oracle_negates_only_target() {
        let target = TargetPattern::parse("101").unwrap();
        let mut state = StateVector::uniform(3).unwrap();
        state.apply_circuit(&build_oracle(&target).unwrap()).unwrap();

        let amp = 1.0 / 8f64.sqrt();
        for (index, a) in state.amplitudes().iter().enumerate() {
            let expected = if index == 0b101 { -amp } else { amp };
            assert_relative_eq!(a.re, expected, epsilon = 1e-12);
            assert_relative_eq!(a.im, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_oracle_single_qubit_is_z() {
        let one = TargetPattern::parse("1").unwrap();
        let oracle = build_oracle(&one).unwrap();
        let mut state = StateVector::uniform(1).unwrap();
        state.apply_circuit(&oracle).unwrap();
        assert!(state.amplitude(0).re > 0.0);
        assert!(state.amplitude(1).re < 0.0);
    }

    #[test]
    fn test_gate_costs() {
        let target = TargetPattern::parse("101").unwrap();
        let oracle = build_oracle(&target).unwrap();
        let diffusion = build_diffusion(3).unwrap();
        assert_eq!(oracle.elementary_gate_count(), 2 + 2 + 15);
        assert_eq!(diffusion.elementary_gate_count(), 12 + 15);
        assert_eq!(grover_operator(&target).unwrap().len(), oracle.len() + diffusion.len());
    }

    #[test]
    fn test_diffusion_reflects_about_mean() {
        // After one oracle call on 2 qubits the mean is 1/4 and the
        // reflection sends the marked amplitude to 1.
        let target = TargetPattern::parse("10").unwrap();
        let mut state = StateVector::uniform(2).unwrap();
        state.apply_circuit(&grover_operator(&target).unwrap()).unwrap();
        assert_relative_eq!(state.probabilities().probability(0b10), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_diffusion_rejects_zero_width() {
        assert!(build_diffusion(0).is_err());
    }
}
