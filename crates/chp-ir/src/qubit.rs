//! Qubit addressing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within one backend's active allocation set.
///
/// Indices are unique among the qubits currently allocated on a backend and
/// are recycled only after release. Logical numbering is shared across
/// backends driven from the same circuit: index `i` denotes the same logical
/// qubit everywhere, even though each backend's internal storage is private.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitIndex(pub u64);

impl fmt::Display for QubitIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

// Only the wire-width integer converts implicitly; anything narrower
// widens at the call site. A second integral From impl would make
// `hadamard(0)`-style literals ambiguous.
impl From<u64> for QubitIndex {
    fn from(index: u64) -> Self {
        QubitIndex(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitIndex(0)), "q0");
        assert_eq!(format!("{}", QubitIndex(17)), "q17");
    }

    #[test]
    fn test_qubit_ordering() {
        assert!(QubitIndex(1) < QubitIndex(2));
    }
}
