//! Core types for the qsearch amplitude-amplification benchmark
//!
//! This crate provides the vocabulary shared by every other qsearch crate:
//!
//! - [`GateOp`]: the closed set of gates the engine understands
//! - [`Circuit`]: an ordered gate sequence with depth and gate-count statistics
//! - [`TargetPattern`]: a validated n-bit marked-state pattern
//!
//! # Bit ordering
//!
//! Basis index bit `q` belongs to qubit `q`, so qubit 0 is the least
//! significant bit. Bitstrings are written most significant first, which
//! puts qubit 0 in the rightmost character.
//!
//! # Example
//!
//! ```
//! use qsearch_core::{Circuit, GateOp, TargetPattern};
//!
//! let target = TargetPattern::parse("101").unwrap();
//! assert_eq!(target.index(), 5);
//!
//! let mut circuit = Circuit::new(3).unwrap();
//! circuit.add(GateOp::Hadamard(0)).unwrap();
//! circuit.add(GateOp::mcx(&[0, 1], 2)).unwrap();
//! assert_eq!(circuit.depth(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod target;

pub use circuit::Circuit;
pub use error::{CoreError, Result};
pub use gate::{ControlSet, GateOp};
pub use target::TargetPattern;

/// Largest register width accepted anywhere in the workspace.
///
/// A dense statevector at this width already needs 256 MiB.
pub const MAX_QUBITS: usize = 24;

/// Check that `num_qubits` is a usable register width
pub fn check_qubit_count(num_qubits: usize) -> Result<()> {
    if num_qubits == 0 || num_qubits > MAX_QUBITS {
        return Err(CoreError::UnsupportedQubitCount {
            num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(())
}

/// Render a basis index as a bitstring of `num_qubits` characters
#[inline]
pub fn bitstring(index: u64, num_qubits: usize) -> String {
    format!("{:0width$b}", index, width = num_qubits)
}
