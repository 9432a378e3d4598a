//! Clifford operation model and its wire encoding.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitIndex;

/// Operation key names as they appear on the wire.
const VARIANTS: &[&str] = &["Cnot", "Hadamard", "Phase", "AdjointPhase"];

/// A single Clifford-group operation.
///
/// The set is closed: these four generators are everything the stabilizer
/// engine accepts, and every consumer (codec, tableau, dispatcher) matches
/// on them exhaustively, so adding a variant forces a compile-time check
/// across the whole stack. External extension is not possible.
///
/// Values are immutable; equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CliffordOperation {
    /// Controlled-NOT. `control` and `target` always differ.
    Cnot {
        /// Control qubit.
        control: QubitIndex,
        /// Target qubit.
        target: QubitIndex,
    },
    /// Hadamard gate.
    Hadamard {
        /// Target qubit.
        target: QubitIndex,
    },
    /// Phase gate (S, the square root of Z).
    Phase {
        /// Target qubit.
        target: QubitIndex,
    },
    /// Adjoint phase gate (S†).
    AdjointPhase {
        /// Target qubit.
        target: QubitIndex,
    },
}

impl CliffordOperation {
    /// Create a CNOT operation.
    ///
    /// Fails with [`IrError::DuplicateQubit`] when control and target
    /// coincide.
    pub fn cnot(
        control: impl Into<QubitIndex>,
        target: impl Into<QubitIndex>,
    ) -> IrResult<Self> {
        let control = control.into();
        let target = target.into();
        if control == target {
            return Err(IrError::DuplicateQubit {
                qubit: control,
                gate: "Cnot",
            });
        }
        Ok(CliffordOperation::Cnot { control, target })
    }

    /// Create a Hadamard operation.
    pub fn hadamard(target: impl Into<QubitIndex>) -> Self {
        CliffordOperation::Hadamard {
            target: target.into(),
        }
    }

    /// Create a phase (S) operation.
    pub fn phase(target: impl Into<QubitIndex>) -> Self {
        CliffordOperation::Phase {
            target: target.into(),
        }
    }

    /// Create an adjoint phase (S†) operation.
    pub fn adjoint_phase(target: impl Into<QubitIndex>) -> Self {
        CliffordOperation::AdjointPhase {
            target: target.into(),
        }
    }

    /// Wire name of this operation.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            CliffordOperation::Cnot { .. } => "Cnot",
            CliffordOperation::Hadamard { .. } => "Hadamard",
            CliffordOperation::Phase { .. } => "Phase",
            CliffordOperation::AdjointPhase { .. } => "AdjointPhase",
        }
    }

    /// The qubits this operation touches, control first.
    pub fn qubits(&self) -> Vec<QubitIndex> {
        match *self {
            CliffordOperation::Cnot { control, target } => vec![control, target],
            CliffordOperation::Hadamard { target }
            | CliffordOperation::Phase { target }
            | CliffordOperation::AdjointPhase { target } => vec![target],
        }
    }

    /// Highest qubit index referenced by this operation.
    pub fn max_qubit(&self) -> QubitIndex {
        match *self {
            CliffordOperation::Cnot { control, target } => control.max(target),
            CliffordOperation::Hadamard { target }
            | CliffordOperation::Phase { target }
            | CliffordOperation::AdjointPhase { target } => target,
        }
    }
}

impl fmt::Display for CliffordOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CliffordOperation::Cnot { control, target } => {
                write!(f, "Cnot({control}, {target})")
            }
            CliffordOperation::Hadamard { target } => write!(f, "Hadamard({target})"),
            CliffordOperation::Phase { target } => write!(f, "Phase({target})"),
            CliffordOperation::AdjointPhase { target } => write!(f, "AdjointPhase({target})"),
        }
    }
}

// The wire form is a hand-rolled serde mapping rather than the derived
// externally-tagged layout: `Cnot` carries an ordered `[control, target]`
// pair and the single-qubit variants a bare index, with strict rejection of
// anything else. This layout is an interop contract and must stay stable.

impl Serialize for CliffordOperation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        match *self {
            CliffordOperation::Cnot { control, target } => {
                map.serialize_entry("Cnot", &[control.0, target.0])?;
            }
            CliffordOperation::Hadamard { target } => {
                map.serialize_entry("Hadamard", &target.0)?;
            }
            CliffordOperation::Phase { target } => {
                map.serialize_entry("Phase", &target.0)?;
            }
            CliffordOperation::AdjointPhase { target } => {
                map.serialize_entry("AdjointPhase", &target.0)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CliffordOperation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(OperationVisitor)
    }
}

struct OperationVisitor;

impl<'de> Visitor<'de> for OperationVisitor {
    type Value = CliffordOperation;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a single-key map naming a Clifford operation")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let key: String = map
            .next_key::<String>()?
            .ok_or_else(|| de::Error::invalid_length(0, &"exactly one operation key"))?;

        let op = match key.as_str() {
            "Cnot" => {
                let operands: Vec<u64> = map.next_value()?;
                let [control, target] = operands[..] else {
                    return Err(de::Error::invalid_length(
                        operands.len(),
                        &"a [control, target] index pair",
                    ));
                };
                CliffordOperation::cnot(control, target).map_err(de::Error::custom)?
            }
            "Hadamard" => CliffordOperation::hadamard(map.next_value::<u64>()?),
            "Phase" => CliffordOperation::phase(map.next_value::<u64>()?),
            "AdjointPhase" => CliffordOperation::adjoint_phase(map.next_value::<u64>()?),
            other => return Err(de::Error::unknown_variant(other, VARIANTS)),
        };

        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::custom("trailing keys after operation entry"));
        }
        Ok(op)
    }
}
