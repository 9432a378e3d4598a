//! Sparse-state backend adapter.
//!
//! Stores only the nonzero amplitudes of the register in a hash map keyed
//! by basis-state index. For states with few branches — which Clifford
//! circuits on mostly-|0⟩ registers tend to produce — this supports far
//! wider registers than the dense adapter at the same capability surface.

mod adapter;
mod sparse;

pub use adapter::SparseAdapter;
