//! Deterministic random number generation for synthetic datasets.
//!
//! RULE: the synthetic generator never calls a platform RNG.
//! All randomness flows through DatasetRng instances derived from a
//! single seed, one stream per concern, seeded from
//! (seed XOR stream_index * golden-ratio constant). This means:
//!   - Adding a new stream never changes existing streams.
//!   - Each stream is fully reproducible in isolation.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Stable stream slots. Indices must never change once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Demographics = 0,
    Accounts     = 1,
    Outcome      = 2,
}

pub struct DatasetRng {
    pub stream: Stream,
    inner:      Pcg64Mcg,
}

impl DatasetRng {
    pub fn new(seed: u64, stream: Stream) -> Self {
        let derived_seed = seed ^ (stream as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            stream,
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n). Returns 0 when n is 0.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Normal sample via Box–Muller.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Pick an item with probability proportional to its weight.
    /// Falls back to the last item when weights sum to zero.
    pub fn weighted<'a, T>(&mut self, items: &'a [(T, f64)]) -> Option<&'a T> {
        let total: f64 = items.iter().map(|(_, w)| w.max(0.0)).sum();
        let mut roll = self.next_f64() * total;
        for (item, w) in items {
            let w = w.max(0.0);
            if roll < w {
                return Some(item);
            }
            roll -= w;
        }
        items.last().map(|(item, _)| item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream_is_deterministic() {
        let mut a = DatasetRng::new(42, Stream::Accounts);
        let mut b = DatasetRng::new(42, Stream::Accounts);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn streams_are_independent() {
        let mut a = DatasetRng::new(42, Stream::Demographics);
        let mut b = DatasetRng::new(42, Stream::Outcome);
        let xs: Vec<f64> = (0..10).map(|_| a.next_f64()).collect();
        let ys: Vec<f64> = (0..10).map(|_| b.next_f64()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn draws_stay_in_range() {
        let mut rng = DatasetRng::new(7, Stream::Demographics);
        for _ in 0..1000 {
            let f = rng.next_f64();
            assert!((0.0..1.0).contains(&f));
            let u = rng.uniform(10.0, 20.0);
            assert!((10.0..20.0).contains(&u));
            assert!(rng.next_u64_below(4) < 4);
        }
        assert_eq!(rng.next_u64_below(0), 0);
    }

    #[test]
    fn weighted_never_picks_zero_weight() {
        let mut rng = DatasetRng::new(1, Stream::Accounts);
        let items = [("a", 0.0), ("b", 1.0)];
        for _ in 0..200 {
            assert_eq!(rng.weighted(&items), Some(&"b"));
        }
        let empty: [(&str, f64); 0] = [];
        assert_eq!(rng.weighted(&empty), None);
    }
}
