/// Mulberry32 step: returns (value_in_0_1, next_state).
pub fn prng_next(state: u32) -> (f64, u32) {
    let mut t = state.wrapping_add(0x6d2b79f5);
    let next_state = t;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    let value = (t ^ (t >> 14)) as f64 / 4294967296.0;
    (value, next_state)
}

/// Seeded generator owned by a CPU controller. Same seed, same choices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prng {
    state: u32,
}

impl Prng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed for one side in one round, so each CPU draws its own stream.
    pub fn derive_seed(seed: u32, side_index: usize, round: u32) -> u32 {
        let mut state = seed ^ (side_index as u32).wrapping_mul(0x9e37_79b9);
        state = state.wrapping_add(round.wrapping_mul(0x85eb_ca6b));
        prng_next(state).1 ^ round
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let (value, next) = prng_next(self.state);
        self.state = next;
        value
    }

    /// Uniform integer in `[0, n)`. `n` must be non-zero.
    pub fn below(&mut self, n: u32) -> u32 {
        let value = (self.next_f64() * n as f64).floor() as u32;
        value.min(n.saturating_sub(1))
    }

    /// Pick an index with probability proportional to its weight.
    pub fn weighted(&mut self, weights: &[u32]) -> usize {
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return 0;
        }
        let mut roll = self.below(total);
        for (i, &w) in weights.iter().enumerate() {
            if roll < w {
                return i;
            }
            roll -= w;
        }
        weights.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prng_deterministic() {
        let (v1, s1) = prng_next(12345);
        let (v2, s2) = prng_next(12345);
        assert_eq!(v1, v2);
        assert_eq!(s1, s2);
    }

    #[test]
    fn prng_range_0_to_1() {
        let mut rng = Prng::new(42);
        for _ in 0..1000 {
            let value = rng.next_f64();
            assert!((0.0..1.0).contains(&value), "value out of range: {}", value);
        }
    }

    #[test]
    fn prng_known_sequence() {
        let (v, s) = prng_next(0);
        assert_eq!(v, 0.26642920868471265);
        assert_eq!(s, 1831565813);
        let (v, s) = prng_next(s);
        assert_eq!(v, 0.0003297457005828619);
        assert_eq!(s, 3663131626);

        let (v, s) = prng_next(42);
        assert_eq!(v, 0.6011037519201636);
        assert_eq!(s, 1831565855);
        let (v, _) = prng_next(s);
        assert_eq!(v, 0.44829055899754167);

        let (v, s) = prng_next(0xDEADBEEF);
        assert_eq!(v, 0.9413696140982211);
        assert_eq!(s, 1272527076);
    }

    #[test]
    fn below_stays_in_range() {
        let mut rng = Prng::new(99);
        for _ in 0..1000 {
            assert!(rng.below(4) < 4);
        }
        // seed 42 draws 0.601.. then 0.448..
        let mut rng = Prng::new(42);
        assert_eq!(rng.below(4), 2);
        assert_eq!(rng.below(4), 1);
    }

    #[test]
    fn weighted_skips_zero_weights() {
        let mut rng = Prng::new(7);
        for _ in 0..500 {
            let i = rng.weighted(&[0, 3, 0, 1]);
            assert!(i == 1 || i == 3);
        }
        assert_eq!(rng.weighted(&[0, 0]), 0);
    }

    #[test]
    fn weighted_roughly_follows_weights() {
        let mut rng = Prng::new(1234);
        let mut counts = [0u32; 2];
        for _ in 0..10_000 {
            counts[rng.weighted(&[1, 3])] += 1;
        }
        assert!(counts[1] > counts[0] * 2);
    }

    #[test]
    fn derived_seeds_differ_per_side_and_round() {
        let a = Prng::derive_seed(5, 0, 1);
        let b = Prng::derive_seed(5, 1, 1);
        let c = Prng::derive_seed(5, 0, 2);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, Prng::derive_seed(5, 0, 1));
    }
}
