//! Wire codec for Clifford operations.
//!
//! [`encode`] and [`decode`] are pure transformations between
//! [`CliffordOperation`] values and the stable single-key JSON wire form.
//! They obey the round-trip law `decode(encode(op)) == op` for every valid
//! operation, and [`decode`] rejects every malformed payload with
//! [`IrError::Format`] — unknown keys, wrong arity, wrong value types,
//! trailing content. Nothing is silently coerced.

use crate::error::IrResult;
use crate::operation::CliffordOperation;

/// Encode one operation into its wire form.
pub fn encode(op: &CliffordOperation) -> IrResult<String> {
    Ok(serde_json::to_string(op)?)
}

/// Decode one operation from its wire form.
pub fn decode(wire: &str) -> IrResult<CliffordOperation> {
    Ok(serde_json::from_str(wire)?)
}
