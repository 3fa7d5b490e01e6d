//! Quantum circuit representation

use crate::{check_qubit_count, CoreError, GateOp, Result};
use std::collections::BTreeMap;

/// A quantum circuit
///
/// Contains an ordered sequence of gate operations over a fixed register.
///
/// # Example
/// ```
/// use qsearch_core::{Circuit, GateOp};
///
/// let mut circuit = Circuit::new(3).unwrap();
/// circuit
///     .add(GateOp::Hadamard(0))
///     .unwrap()
///     .add(GateOp::Hadamard(1))
///     .unwrap();
/// assert_eq!(circuit.len(), 2);
/// assert_eq!(circuit.depth(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    operations: Vec<GateOp>,
}

impl Circuit {
    /// Create a new quantum circuit with the specified number of qubits
    ///
    /// # Errors
    /// Returns error if `num_qubits` is 0 or above [`crate::MAX_QUBITS`]
    pub fn new(num_qubits: usize) -> Result<Self> {
        Self::with_capacity(num_qubits, 0)
    }

    /// Create a circuit with pre-allocated capacity
    pub fn with_capacity(num_qubits: usize, capacity: usize) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        Ok(Self {
            num_qubits,
            operations: Vec::with_capacity(capacity),
        })
    }

    /// Get the number of qubits in the circuit
    #[inline]
    pub const fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get the number of operations in the circuit
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the circuit is empty (no operations)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Append a gate operation
    ///
    /// # Errors
    /// Returns error if any qubit index is out of bounds or repeated
    pub fn add(&mut self, gate: GateOp) -> Result<&mut Self> {
        gate.validate(self.num_qubits)?;
        self.operations.push(gate);
        Ok(self)
    }

    /// Append every operation of `other`
    ///
    /// # Errors
    /// Returns error if the circuits have different widths
    pub fn extend(&mut self, other: &Circuit) -> Result<&mut Self> {
        if other.num_qubits != self.num_qubits {
            return Err(CoreError::WidthMismatch {
                expected: self.num_qubits,
                actual: other.num_qubits,
            });
        }
        self.operations.extend(other.operations.iter().cloned());
        Ok(self)
    }

    /// Get an iterator over the operations
    pub fn operations(&self) -> impl Iterator<Item = &GateOp> {
        self.operations.iter()
    }

    /// Get a specific operation by index
    pub fn get_operation(&self, index: usize) -> Option<&GateOp> {
        self.operations.get(index)
    }

    /// The inverse circuit
    ///
    /// Every [`GateOp`] is self-inverse, so this is the reversed sequence.
    pub fn inverse(&self) -> Circuit {
        Circuit {
            num_qubits: self.num_qubits,
            operations: self.operations.iter().rev().cloned().collect(),
        }
    }

    /// Depth of the circuit: length of the longest qubit-wise dependency chain
    ///
    /// Each gate sits one layer above the deepest layer of any qubit it
    /// touches; gates on disjoint qubits share a layer.
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.num_qubits];
        let mut depth = 0;
        for op in &self.operations {
            let qubits = op.qubits();
            let next = 1 + qubits.iter().map(|&q| layer[q]).max().unwrap_or(0);
            for &q in &qubits {
                layer[q] = next;
            }
            depth = depth.max(next);
        }
        depth
    }

    /// CNOT-equivalent count over all gates
    pub fn two_qubit_gate_count(&self) -> usize {
        self.operations.iter().map(GateOp::two_qubit_cost).sum()
    }

    /// Elementary gate count over all gates (gate error exposure)
    pub fn elementary_gate_count(&self) -> usize {
        self.operations.iter().map(GateOp::elementary_cost).sum()
    }

    /// Number of gates touching more than one qubit
    pub fn multi_qubit_gate_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_multi_qubit()).count()
    }

    /// Operation counts keyed by gate name
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for op in &self.operations {
            *counts.entry(op.name()).or_insert(0) += 1;
        }
        counts
    }
}

impl std::fmt::Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Circuit({} qubits, {} operations)", self.num_qubits, self.len())?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "  {}: {}", i, op)?;
        }
        Ok(())
    }
}
