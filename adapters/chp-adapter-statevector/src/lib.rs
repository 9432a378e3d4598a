//! Dense full-state backend adapter.
//!
//! Keeps the complete 2^n amplitude vector, so it is exact for any circuit
//! but memory-bound around twenty qubits. For the Clifford gate set the
//! updates are permutation/phase operations on amplitude pairs; no general
//! matrix multiplication is involved.

mod adapter;
mod statevector;

pub use adapter::StatevectorAdapter;
