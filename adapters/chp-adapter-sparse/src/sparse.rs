//! Sparse amplitude-map engine for the Clifford gate set.

use num_complex::Complex64;
use rand::Rng;
use rustc_hash::FxHashMap;

/// Probability mass below which a qubit counts as being in |0⟩.
const ZERO_TOLERANCE: f64 = 1e-9;

/// Amplitudes with squared norm below this are dropped after each rebuild.
const PRUNE_TOLERANCE: f64 = 1e-24;

/// A register of qubits as a map from basis-state index to amplitude.
///
/// Qubit `k` is bit `k` of the key. Only nonzero amplitudes are stored;
/// the empty register is the single entry `{0: 1}`. Indices are `u64`, so
/// the register is capped at 64 qubits.
pub struct SparseState {
    amplitudes: FxHashMap<u64, Complex64>,
    num_qubits: usize,
}

impl SparseState {
    /// Create an empty register.
    pub fn new() -> Self {
        let mut amplitudes = FxHashMap::default();
        amplitudes.insert(0, Complex64::new(1.0, 0.0));
        Self {
            amplitudes,
            num_qubits: 0,
        }
    }

    /// Number of qubits currently in the register.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of stored nonzero amplitudes.
    pub fn nonzero_terms(&self) -> usize {
        self.amplitudes.len()
    }

    /// Append one qubit in |0⟩ and return its bit position.
    ///
    /// No data movement at all: existing keys already have the new bit
    /// clear.
    pub fn push_qubit(&mut self) -> usize {
        let qubit = self.num_qubits;
        self.num_qubits += 1;
        qubit
    }

    pub fn apply_h(&mut self, qubit: usize) {
        let mask = 1_u64 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        let mut next =
            FxHashMap::with_capacity_and_hasher(self.amplitudes.len() * 2, Default::default());
        for (&idx, &amp) in &self.amplitudes {
            let half = sqrt2_inv * amp;
            if idx & mask == 0 {
                *next.entry(idx).or_insert(Complex64::new(0.0, 0.0)) += half;
                *next.entry(idx | mask).or_insert(Complex64::new(0.0, 0.0)) += half;
            } else {
                *next.entry(idx & !mask).or_insert(Complex64::new(0.0, 0.0)) += half;
                *next.entry(idx).or_insert(Complex64::new(0.0, 0.0)) -= half;
            }
        }
        next.retain(|_, amp| amp.norm_sqr() > PRUNE_TOLERANCE);
        self.amplitudes = next;
    }

    pub fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1_u64 << control;
        let tgt_mask = 1_u64 << target;
        // re-keying is a bijection, so entries never collide
        let mut next =
            FxHashMap::with_capacity_and_hasher(self.amplitudes.len(), Default::default());
        for (&idx, &amp) in &self.amplitudes {
            let key = if idx & ctrl_mask != 0 { idx ^ tgt_mask } else { idx };
            next.insert(key, amp);
        }
        self.amplitudes = next;
    }

    /// Multiply amplitudes with the qubit set by ±i (S / S†).
    pub fn apply_s(&mut self, qubit: usize, adjoint: bool) {
        let mask = 1_u64 << qubit;
        let phase = if adjoint {
            Complex64::new(0.0, -1.0)
        } else {
            Complex64::new(0.0, 1.0)
        };
        for (&idx, amp) in self.amplitudes.iter_mut() {
            if idx & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1_u64 << qubit;
        let mut next =
            FxHashMap::with_capacity_and_hasher(self.amplitudes.len(), Default::default());
        for (&idx, &amp) in &self.amplitudes {
            next.insert(idx ^ mask, amp);
        }
        self.amplitudes = next;
    }

    fn one_mass(&self, qubit: usize) -> f64 {
        let mask = 1_u64 << qubit;
        self.amplitudes
            .iter()
            .filter(|(idx, _)| *idx & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum()
    }

    /// Whether the qubit carries no amplitude outside |0⟩.
    pub fn is_zero_state(&self, qubit: usize) -> bool {
        self.one_mass(qubit) < ZERO_TOLERANCE
    }

    /// Measure one qubit in the Z basis, collapsing and renormalizing.
    pub fn measure<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let mask = 1_u64 << qubit;
        let p_one = self.one_mass(qubit);
        let outcome = rng.gen_range(0.0..1.0) < p_one;

        self.amplitudes
            .retain(|idx, _| (idx & mask != 0) == outcome);
        let norm: f64 = self
            .amplitudes
            .values()
            .map(Complex64::norm_sqr)
            .sum::<f64>()
            .sqrt();
        if norm > 0.0 {
            for amp in self.amplitudes.values_mut() {
                *amp /= norm;
            }
        }
        outcome
    }

    /// Force the qubit back to |0⟩: measure, then X-correct a |1⟩ outcome.
    pub fn reset<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) {
        if self.measure(qubit, rng) {
            self.apply_x(qubit);
        }
    }
}

impl Default for SparseState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn amp(state: &SparseState, idx: u64) -> Complex64 {
        state
            .amplitudes
            .get(&idx)
            .copied()
            .unwrap_or(Complex64::new(0.0, 0.0))
    }

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_bell_state_has_two_terms() {
        let mut state = SparseState::new();
        state.push_qubit();
        state.push_qubit();
        state.apply_h(0);
        state.apply_cx(0, 1);

        assert_eq!(state.nonzero_terms(), 2);
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(amp(&state, 0b00), Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(amp(&state, 0b11), Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_double_hadamard_prunes_cancelled_branch() {
        let mut state = SparseState::new();
        state.push_qubit();
        state.apply_h(0);
        state.apply_h(0);

        assert_eq!(state.nonzero_terms(), 1);
        assert!(approx_eq(amp(&state, 0), Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_s_pair_is_identity() {
        let mut state = SparseState::new();
        state.push_qubit();
        state.apply_h(0);
        state.apply_s(0, false);
        state.apply_s(0, true);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(amp(&state, 0), Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(amp(&state, 1), Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_wide_register_stays_sparse() {
        let mut state = SparseState::new();
        for _ in 0..48 {
            state.push_qubit();
        }
        // GHZ ladder over 48 qubits: still only two terms
        state.apply_h(0);
        for i in 0..47 {
            state.apply_cx(i, i + 1);
        }
        assert_eq!(state.nonzero_terms(), 2);
        assert!(!state.is_zero_state(47));
    }

    #[test]
    fn test_measure_and_reset() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = SparseState::new();
        state.push_qubit();
        state.push_qubit();
        state.apply_h(0);
        state.apply_cx(0, 1);

        let a = state.measure(0, &mut rng);
        let b = state.measure(1, &mut rng);
        assert_eq!(a, b);

        state.reset(0, &mut rng);
        state.reset(1, &mut rng);
        assert!(state.is_zero_state(0));
        assert!(state.is_zero_state(1));
    }
}
