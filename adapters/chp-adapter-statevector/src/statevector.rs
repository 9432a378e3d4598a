//! Dense amplitude-vector engine for the Clifford gate set.

use num_complex::Complex64;
use rand::Rng;

/// Probability mass below which a qubit counts as being in |0⟩.
const ZERO_TOLERANCE: f64 = 1e-9;

/// A register of qubits as a dense vector of 2^n amplitudes.
///
/// Qubit `k` is bit `k` of the basis-state index. Growing the register
/// appends a qubit as the new highest bit, which leaves every existing
/// amplitude at an index with that bit clear — the fresh qubit starts in
/// |0⟩ without any data movement beyond the resize.
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create an empty register (a single unit amplitude).
    pub fn new() -> Self {
        Self {
            amplitudes: vec![Complex64::new(1.0, 0.0)],
            num_qubits: 0,
        }
    }

    /// Number of qubits currently in the register.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Append one qubit in |0⟩ and return its bit position.
    pub fn push_qubit(&mut self) -> usize {
        let qubit = self.num_qubits;
        self.amplitudes
            .resize(1 << (self.num_qubits + 1), Complex64::new(0.0, 0.0));
        self.num_qubits += 1;
        qubit
    }

    pub fn apply_h(&mut self, qubit: usize) {
        let mask = 1_u64 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..self.amplitudes.len() as u64 {
            if i & mask == 0 {
                let j = (i | mask) as usize;
                let i = i as usize;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    pub fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1_u64 << control;
        let tgt_mask = 1_u64 << target;
        for i in 0..self.amplitudes.len() as u64 {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i as usize, j as usize);
            }
        }
    }

    /// Multiply amplitudes with the qubit set by ±i (S for `adjoint` false,
    /// S† for true). Exact — no trigonometry involved.
    pub fn apply_s(&mut self, qubit: usize, adjoint: bool) {
        let mask = 1_u64 << qubit;
        let phase = if adjoint {
            Complex64::new(0.0, -1.0)
        } else {
            Complex64::new(0.0, 1.0)
        };
        for i in 0..self.amplitudes.len() as u64 {
            if i & mask != 0 {
                self.amplitudes[i as usize] *= phase;
            }
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1_u64 << qubit;
        for i in 0..self.amplitudes.len() as u64 {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i as usize, j as usize);
            }
        }
    }

    /// Probability of measuring the qubit as 1.
    fn one_mass(&self, qubit: usize) -> f64 {
        let mask = 1_u64 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i as u64 & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum()
    }

    /// Whether the qubit carries no amplitude outside |0⟩.
    pub fn is_zero_state(&self, qubit: usize) -> bool {
        self.one_mass(qubit) < ZERO_TOLERANCE
    }

    /// Measure one qubit in the Z basis, collapsing and renormalizing.
    pub fn measure<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> bool {
        let p_one = self.one_mass(qubit);
        let outcome = rng.gen_range(0.0..1.0) < p_one;
        self.collapse(qubit, outcome);
        outcome
    }

    /// Force the qubit back to |0⟩: measure, then X-correct a |1⟩ outcome.
    pub fn reset<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) {
        if self.measure(qubit, rng) {
            self.apply_x(qubit);
        }
    }

    fn collapse(&mut self, qubit: usize, outcome: bool) {
        let mask = 1_u64 << qubit;
        let mut norm_sq = 0.0;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i as u64 & mask != 0) != outcome {
                *amp = Complex64::new(0.0, 0.0);
            } else {
                norm_sq += amp.norm_sqr();
            }
        }
        let norm = norm_sq.sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }
}

impl Default for Statevector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_push_qubit_starts_in_zero() {
        let mut sv = Statevector::new();
        sv.push_qubit();
        sv.push_qubit();
        assert_eq!(sv.num_qubits(), 2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(sv.is_zero_state(0));
        assert!(sv.is_zero_state(1));
    }

    #[test]
    fn test_bell_state_amplitudes() {
        let mut sv = Statevector::new();
        sv.push_qubit();
        sv.push_qubit();
        sv.apply_h(0);
        sv.apply_cx(0, 1);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_s_then_sdg_is_identity() {
        let mut sv = Statevector::new();
        sv.push_qubit();
        sv.apply_h(0);
        sv.apply_s(0, false);
        sv.apply_s(0, true);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_measure_collapses() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sv = Statevector::new();
        sv.push_qubit();
        sv.apply_h(0);

        let outcome = sv.measure(0, &mut rng);
        // pinned after collapse
        for _ in 0..5 {
            assert_eq!(sv.measure(0, &mut rng), outcome);
        }
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut sv = Statevector::new();
        sv.push_qubit();
        sv.push_qubit();
        sv.apply_h(0);
        sv.apply_cx(0, 1);

        sv.reset(0, &mut rng);
        assert!(sv.is_zero_state(0));
    }
}
