//! Marked-state patterns

use crate::{bitstring, check_qubit_count, CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An n-bit pattern identifying the marked basis state
///
/// The pattern is written most significant qubit first: in `"110"` qubit 0
/// is `0` and qubits 1 and 2 are `1`.
///
/// # Example
/// ```
/// use qsearch_core::TargetPattern;
///
/// let target = TargetPattern::new("110", 3).unwrap();
/// assert_eq!(target.index(), 6);
/// assert!(!target.bit(0));
/// assert!(target.bit(2));
///
/// assert!(TargetPattern::new("110", 4).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetPattern {
    bits: String,
    index: u64,
}

impl TargetPattern {
    /// Create a pattern that must be exactly `num_qubits` bits long
    ///
    /// # Errors
    /// Returns error on a length mismatch, a character other than `0`/`1`,
    /// or an unsupported width
    pub fn new(bits: &str, num_qubits: usize) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        let actual = bits.chars().count();
        if actual != num_qubits {
            return Err(CoreError::TargetLengthMismatch {
                expected: num_qubits,
                actual,
            });
        }

        let mut index = 0u64;
        for (position, ch) in bits.chars().enumerate() {
            let bit = match ch {
                '0' => 0,
                '1' => 1,
                found => return Err(CoreError::InvalidTargetBit { position, found }),
            };
            index = (index << 1) | bit;
        }

        Ok(Self {
            bits: bits.to_string(),
            index,
        })
    }

    /// Create a pattern whose width is its own length
    pub fn parse(bits: &str) -> Result<Self> {
        Self::new(bits, bits.chars().count())
    }

    /// Pattern for basis state `index` on `num_qubits` qubits
    pub fn from_index(index: u64, num_qubits: usize) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        if index >> num_qubits != 0 {
            return Err(CoreError::TargetLengthMismatch {
                expected: num_qubits,
                actual: (u64::BITS - index.leading_zeros()) as usize,
            });
        }
        Ok(Self {
            bits: bitstring(index, num_qubits),
            index,
        })
    }

    /// The all-ones pattern on `num_qubits` qubits
    pub fn all_ones(num_qubits: usize) -> Result<Self> {
        check_qubit_count(num_qubits)?;
        Self::from_index((1u64 << num_qubits) - 1, num_qubits)
    }

    /// Number of qubits (pattern length)
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.bits.len()
    }

    /// Basis state index of the marked state
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// The pattern as a bitstring
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.bits
    }

    /// Value of qubit `qubit` in the marked state
    #[inline]
    pub fn bit(&self, qubit: usize) -> bool {
        (self.index >> qubit) & 1 == 1
    }

    /// Qubits whose marked value is 0
    pub fn zero_qubits(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_qubits()).filter(move |&q| !self.bit(q))
    }
}

impl fmt::Display for TargetPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|{}⟩", self.bits)
    }
}

impl TryFrom<String> for TargetPattern {
    type Error = CoreError;

    fn try_from(bits: String) -> Result<Self> {
        Self::parse(&bits)
    }
}

impl From<TargetPattern> for String {
    fn from(target: TargetPattern) -> Self {
        target.bits
    }
}
