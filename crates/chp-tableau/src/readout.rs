//! Readout extension: Z-measurement, the zero-state predicate and reset.
//!
//! The gate core in [`tableau`](crate::tableau) deliberately stops at gate
//! application; everything here is layered on top of it. The procedures are
//! the standard Aaronson–Gottesman ones: when some stabilizer generator
//! anticommutes with `Z` on the measured qubit the outcome is random and the
//! tableau collapses, otherwise the outcome is determined and its sign is
//! recovered by accumulating generator rows into a scratch row with exact
//! phase tracking (`rowsum`).
//!
//! Qubit recycling is the main consumer: a released qubit is checked
//! against |0⟩ and reset before its index returns to the free pool.

use rand::Rng;

use chp_ir::QubitIndex;

use crate::error::TableauResult;
use crate::tableau::Tableau;

impl Tableau {
    /// Measure `target` in the Z basis, collapsing the state.
    ///
    /// Returns the outcome bit (false = |0⟩ branch). When the outcome is
    /// determined by the stabilizer group the tableau is left untouched;
    /// otherwise one generator collapses onto ±Z and the outcome is drawn
    /// from `rng`.
    pub fn measure<R: Rng + ?Sized>(
        &mut self,
        target: QubitIndex,
        rng: &mut R,
    ) -> TableauResult<bool> {
        self.locate(target)?;
        let col = target.0 as usize;
        let n = self.num_qubits();

        let pivot = (0..n).find(|&row| self.x_bit(row, col));
        let Some(p) = pivot else {
            return Ok(self.deterministic_z_sign(col));
        };

        // Random branch: every other generator that anticommutes with
        // Z_target absorbs the pivot row first.
        for row in 0..2 * n {
            if row != p && self.x_bit(row, col) {
                self.rowsum(row, p);
            }
        }

        // The old stabilizer becomes the destabilizer partner of the
        // collapsed generator.
        let px = self.x_words(p).to_vec();
        let pz = self.z_words(p).to_vec();
        let pr = self.sign(p);
        self.x_words_mut(n + p).copy_from_slice(&px);
        self.z_words_mut(n + p).copy_from_slice(&pz);
        self.set_sign(n + p, pr);

        // Collapse the pivot onto ±Z_target with a fresh random sign.
        self.x_words_mut(p).fill(0);
        self.z_words_mut(p).fill(0);
        self.assign_z(p, col, true);
        let outcome: bool = rng.r#gen();
        self.set_sign(p, outcome);
        Ok(outcome)
    }

    /// Whether the stabilizer group forces `target` into |0⟩.
    ///
    /// True exactly when a Z measurement of `target` would be deterministic
    /// with outcome 0. Non-destructive.
    pub fn is_zero_state(&self, target: QubitIndex) -> TableauResult<bool> {
        self.locate(target)?;
        let col = target.0 as usize;
        if (0..self.num_qubits()).any(|row| self.x_bit(row, col)) {
            return Ok(false);
        }
        Ok(!self.deterministic_z_sign(col))
    }

    /// Force `target` back to |0⟩: measure, then X-correct a |1⟩ outcome.
    ///
    /// The correction is composed from the generator set (X = H·S·S·H).
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        target: QubitIndex,
        rng: &mut R,
    ) -> TableauResult<()> {
        if self.measure(target, rng)? {
            self.apply_hadamard(target)?;
            self.apply_phase(target)?;
            self.apply_phase(target)?;
            self.apply_hadamard(target)?;
        }
        Ok(())
    }

    /// Sign of the determined Z outcome on column `col`: accumulate every
    /// stabilizer generator whose destabilizer partner anticommutes with
    /// Z_col into a zeroed scratch row.
    fn deterministic_z_sign(&self, col: usize) -> bool {
        let n = self.num_qubits();
        let words = self.word_count();
        let mut sx = vec![0u64; words];
        let mut sz = vec![0u64; words];
        let mut sr = false;
        for i in 0..n {
            if self.x_bit(n + i, col) {
                let mut acc: i64 = 2 * i64::from(sr) + 2 * i64::from(self.sign(i));
                let gx = self.x_words(i);
                let gz = self.z_words(i);
                for w in 0..words {
                    acc += g_word(gx[w], gz[w], sx[w], sz[w]);
                    sx[w] ^= gx[w];
                    sz[w] ^= gz[w];
                }
                sr = acc.rem_euclid(4) == 2;
            }
        }
        sr
    }

    /// Add generator row `src` into row `dst` with exact sign tracking.
    fn rowsum(&mut self, dst: usize, src: usize) {
        let sx = self.x_words(src).to_vec();
        let sz = self.z_words(src).to_vec();
        let mut acc: i64 = 2 * i64::from(self.sign(dst)) + 2 * i64::from(self.sign(src));
        {
            let dx = self.x_words(dst);
            let dz = self.z_words(dst);
            for w in 0..sx.len() {
                acc += g_word(sx[w], sz[w], dx[w], dz[w]);
            }
        }
        for (w, word) in self.x_words_mut(dst).iter_mut().enumerate() {
            *word ^= sx[w];
        }
        for (w, word) in self.z_words_mut(dst).iter_mut().enumerate() {
            *word ^= sz[w];
        }
        self.set_sign(dst, acc.rem_euclid(4) == 2);
    }
}

/// Sum over 64 columns of the i-exponent picked up when the Pauli pair
/// `(x1, z1)` multiplies onto `(x2, z2)`.
fn g_word(x1: u64, z1: u64, x2: u64, z2: u64) -> i64 {
    let y1 = x1 & z1;
    let xo = x1 & !z1;
    let zo = !x1 & z1;
    let plus = (y1 & z2 & !x2) | (xo & z2 & x2) | (zo & x2 & !z2);
    let minus = (y1 & x2 & !z2) | (xo & z2 & !x2) | (zo & x2 & z2);
    i64::from(plus.count_ones()) - i64::from(minus.count_ones())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn q(i: u64) -> QubitIndex {
        QubitIndex(i)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    fn apply_x(tab: &mut Tableau, target: QubitIndex) {
        tab.apply_hadamard(target).unwrap();
        tab.apply_phase(target).unwrap();
        tab.apply_phase(target).unwrap();
        tab.apply_hadamard(target).unwrap();
    }

    #[test]
    fn test_measure_fresh_qubit_is_deterministic_zero() {
        let mut tab = Tableau::new(3);
        let mut rng = rng();
        for _ in 0..10 {
            assert!(!tab.measure(q(1), &mut rng).unwrap());
        }
    }

    #[test]
    fn test_measure_flipped_qubit_is_one() {
        let mut tab = Tableau::new(2);
        apply_x(&mut tab, q(0));
        let mut rng = rng();
        assert!(tab.measure(q(0), &mut rng).unwrap());
        assert!(!tab.measure(q(1), &mut rng).unwrap());
    }

    #[test]
    fn test_measurement_collapses_superposition() {
        let mut rng = rng();
        for _ in 0..20 {
            let mut tab = Tableau::new(1);
            tab.apply_hadamard(q(0)).unwrap();
            let first = tab.measure(q(0), &mut rng).unwrap();
            // once collapsed, the outcome is pinned
            for _ in 0..5 {
                assert_eq!(tab.measure(q(0), &mut rng).unwrap(), first);
            }
        }
    }

    #[test]
    fn test_bell_pair_outcomes_correlate() {
        let mut rng = rng();
        let mut seen = [false; 2];
        for _ in 0..64 {
            let mut tab = Tableau::new(2);
            tab.apply_hadamard(q(0)).unwrap();
            tab.apply_cnot(q(0), q(1)).unwrap();
            let a = tab.measure(q(0), &mut rng).unwrap();
            let b = tab.measure(q(1), &mut rng).unwrap();
            assert_eq!(a, b);
            seen[usize::from(a)] = true;
        }
        // both branches occur over 64 trials
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn test_is_zero_state() {
        let mut tab = Tableau::new(2);
        assert!(tab.is_zero_state(q(0)).unwrap());

        tab.apply_hadamard(q(0)).unwrap();
        assert!(!tab.is_zero_state(q(0)).unwrap());
        assert!(tab.is_zero_state(q(1)).unwrap());

        let mut tab = Tableau::new(1);
        apply_x(&mut tab, q(0));
        assert!(!tab.is_zero_state(q(0)).unwrap());
    }

    #[test]
    fn test_is_zero_state_is_non_destructive() {
        let mut tab = Tableau::new(2);
        tab.apply_hadamard(q(0)).unwrap();
        tab.apply_cnot(q(0), q(1)).unwrap();
        let snapshot = tab.clone();
        let _ = tab.is_zero_state(q(0)).unwrap();
        let _ = tab.is_zero_state(q(1)).unwrap();
        assert_eq!(tab, snapshot);
    }

    #[test]
    fn test_reset_restores_zero() {
        let mut rng = rng();
        // flipped qubit
        let mut tab = Tableau::new(2);
        apply_x(&mut tab, q(1));
        tab.reset(q(1), &mut rng).unwrap();
        assert!(tab.is_zero_state(q(1)).unwrap());

        // entangled qubit, both collapse branches
        for _ in 0..16 {
            let mut tab = Tableau::new(2);
            tab.apply_hadamard(q(0)).unwrap();
            tab.apply_cnot(q(0), q(1)).unwrap();
            tab.reset(q(0), &mut rng).unwrap();
            assert!(tab.is_zero_state(q(0)).unwrap());
        }
    }

    #[test]
    fn test_measure_out_of_range() {
        let mut tab = Tableau::new(2);
        let mut rng = rng();
        assert!(tab.measure(q(2), &mut rng).is_err());
        assert!(tab.is_zero_state(q(9)).is_err());
    }

    #[test]
    fn test_random_measurement_preserves_commutation() {
        let mut rng = rng();
        let mut tab = Tableau::new(4);
        tab.apply_hadamard(q(0)).unwrap();
        tab.apply_cnot(q(0), q(1)).unwrap();
        tab.apply_cnot(q(1), q(2)).unwrap();
        tab.apply_phase(q(2)).unwrap();
        tab.measure(q(1), &mut rng).unwrap();

        let n = tab.num_qubits();
        for i in 0..n {
            for j in 0..n {
                assert!(tab.rows_commute(i, j), "stabilizers {i},{j}");
                assert_eq!(tab.rows_commute(n + i, j), i != j, "destab {i} vs stab {j}");
            }
        }
    }
}
