//! Gate operations understood by the qsearch engine
//!
//! The engine only ever needs a handful of gates, so they are modelled as a
//! closed enum. Every consumer (statevector kernels, router, cost accounting)
//! dispatches with one exhaustive `match`.

use crate::{CoreError, Result};
use smallvec::SmallVec;
use std::fmt;

/// Control qubits of a multi-controlled gate
pub type ControlSet = SmallVec<[usize; 8]>;

/// A single gate applied to specific qubits
///
/// Every variant is self-inverse, which the circuit layer relies on when
/// undoing routing swaps or checking involutions.
///
/// # Example
/// ```
/// use qsearch_core::GateOp;
///
/// let toffoli = GateOp::mcx(&[0, 1], 2);
/// assert_eq!(toffoli.name(), "CCX");
/// assert_eq!(toffoli.two_qubit_cost(), 6);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum GateOp {
    /// Hadamard on one qubit
    Hadamard(usize),

    /// Pauli-X (NOT) on one qubit
    PauliX(usize),

    /// Pauli-Z (phase flip) on one qubit
    PauliZ(usize),

    /// X on `target` when every control is |1⟩
    MultiControlledX { controls: ControlSet, target: usize },

    /// Phase flip when every control and the target are |1⟩
    MultiControlledZ { controls: ControlSet, target: usize },

    /// Exchange of two qubits, inserted by routing
    Swap(usize, usize),
}

impl GateOp {
    /// Multi-controlled X with the given controls
    pub fn mcx(controls: &[usize], target: usize) -> Self {
        GateOp::MultiControlledX {
            controls: ControlSet::from_slice(controls),
            target,
        }
    }

    /// Multi-controlled Z with the given controls
    pub fn mcz(controls: &[usize], target: usize) -> Self {
        GateOp::MultiControlledZ {
            controls: ControlSet::from_slice(controls),
            target,
        }
    }

    /// Short gate name, as used in operation counts
    pub fn name(&self) -> &'static str {
        match self {
            GateOp::Hadamard(_) => "H",
            GateOp::PauliX(_) => "X",
            GateOp::PauliZ(_) => "Z",
            GateOp::MultiControlledX { controls, .. } => match controls.len() {
                0 => "X",
                1 => "CX",
                2 => "CCX",
                _ => "MCX",
            },
            GateOp::MultiControlledZ { controls, .. } => match controls.len() {
                0 => "Z",
                1 => "CZ",
                2 => "CCZ",
                _ => "MCZ",
            },
            GateOp::Swap(..) => "SWAP",
        }
    }

    /// All qubits touched by this gate, controls first
    pub fn qubits(&self) -> ControlSet {
        match self {
            GateOp::Hadamard(q) | GateOp::PauliX(q) | GateOp::PauliZ(q) => {
                ControlSet::from_slice(&[*q])
            },
            GateOp::MultiControlledX { controls, target }
            | GateOp::MultiControlledZ { controls, target } => {
                let mut qubits = controls.clone();
                qubits.push(*target);
                qubits
            },
            GateOp::Swap(a, b) => ControlSet::from_slice(&[*a, *b]),
        }
    }

    /// Number of qubits this gate acts on
    pub fn num_qubits(&self) -> usize {
        match self {
            GateOp::Hadamard(_) | GateOp::PauliX(_) | GateOp::PauliZ(_) => 1,
            GateOp::MultiControlledX { controls, .. }
            | GateOp::MultiControlledZ { controls, .. } => controls.len() + 1,
            GateOp::Swap(..) => 2,
        }
    }

    /// Whether this gate couples two or more qubits
    #[inline]
    pub fn is_multi_qubit(&self) -> bool {
        self.num_qubits() > 1
    }

    /// CNOT-equivalent count of the gate's standard decomposition
    pub fn two_qubit_cost(&self) -> usize {
        match self {
            GateOp::Hadamard(_) | GateOp::PauliX(_) | GateOp::PauliZ(_) => 0,
            GateOp::MultiControlledX { controls, .. }
            | GateOp::MultiControlledZ { controls, .. } => multi_controlled_cost(controls.len()).0,
            GateOp::Swap(..) => 3,
        }
    }

    /// Number of elementary gates in the decomposition
    ///
    /// This is the gate error exposure used by the noise model.
    pub fn elementary_cost(&self) -> usize {
        match self {
            GateOp::Hadamard(_) | GateOp::PauliX(_) | GateOp::PauliZ(_) => 1,
            GateOp::MultiControlledX { controls, .. }
            | GateOp::MultiControlledZ { controls, .. } => multi_controlled_cost(controls.len()).1,
            GateOp::Swap(..) => 3,
        }
    }

    /// Return the same gate with every qubit index passed through `map`
    pub fn remap<F>(&self, map: F) -> GateOp
    where
        F: Fn(usize) -> usize,
    {
        match self {
            GateOp::Hadamard(q) => GateOp::Hadamard(map(*q)),
            GateOp::PauliX(q) => GateOp::PauliX(map(*q)),
            GateOp::PauliZ(q) => GateOp::PauliZ(map(*q)),
            GateOp::MultiControlledX { controls, target } => GateOp::MultiControlledX {
                controls: controls.iter().map(|&c| map(c)).collect(),
                target: map(*target),
            },
            GateOp::MultiControlledZ { controls, target } => GateOp::MultiControlledZ {
                controls: controls.iter().map(|&c| map(c)).collect(),
                target: map(*target),
            },
            GateOp::Swap(a, b) => GateOp::Swap(map(*a), map(*b)),
        }
    }

    /// Check qubit indices against a register width
    ///
    /// # Errors
    /// Returns error if an index is out of range or repeated
    pub fn validate(&self, num_qubits: usize) -> Result<()> {
        let qubits = self.qubits();
        for (i, &qubit) in qubits.iter().enumerate() {
            if qubit >= num_qubits {
                return Err(CoreError::invalid_qubit(qubit, num_qubits));
            }
            if qubits[..i].contains(&qubit) {
                return Err(CoreError::DuplicateQubit(qubit));
            }
        }
        Ok(())
    }
}

/// (CNOT count, elementary gate count) for a gate with `num_controls` controls
///
/// Toffoli uses the exact 6-CNOT / 15-gate construction; wider gates use a
/// Toffoli ladder of `2k - 3` Toffolis for the CNOT count and the quadratic
/// linear-depth estimate for the elementary count.
fn multi_controlled_cost(num_controls: usize) -> (usize, usize) {
    match num_controls {
        0 => (0, 1),
        1 => (1, 1),
        2 => (6, 15),
        k => (6 * (2 * k - 3), 4 * k * k),
    }
}

impl fmt::Debug for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        for (i, q) in self.qubits().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "q{}", q)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
