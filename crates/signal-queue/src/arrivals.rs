//! Seeded Poisson arrival sampling.
//!
//! Each simulator owns one [`ArrivalSampler`] seeded from its configuration.
//! `ChaCha8Rng` is portable across platforms, so the same seed and rates
//! reproduce the same arrival sequence everywhere.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Means above this are sampled as a sum of smaller Poisson draws, which
/// keeps `exp(-lambda)` well away from underflow.
const CHUNK_MEAN: f64 = 30.0;

/// Poisson sampler over a seeded `ChaCha8Rng`.
#[derive(Debug, Clone)]
pub struct ArrivalSampler {
    seed: u64,
    rng: ChaCha8Rng,
}

impl ArrivalSampler {
    /// Create a sampler from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The seed the sampler was created with.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the sequence from the original seed.
    pub fn reseed(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    /// Draw a count from Poisson(`mean`).
    ///
    /// Total: a non-positive or non-finite mean yields 0.
    pub fn poisson(&mut self, mean: f64) -> u32 {
        if !mean.is_finite() || mean <= 0.0 {
            return 0;
        }
        let mut remaining = mean;
        let mut total: u32 = 0;
        while remaining > 0.0 {
            let part = remaining.min(CHUNK_MEAN);
            total = total.saturating_add(self.knuth(part));
            remaining -= part;
        }
        total
    }

    /// Knuth's multiplication method, for small means.
    fn knuth(&mut self, mean: f64) -> u32 {
        let limit = (-mean).exp();
        let mut product = 1.0;
        let mut count: u32 = 0;
        loop {
            product *= self.rng.random::<f64>();
            if product <= limit {
                return count;
            }
            count = count.saturating_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_invalid_means_yield_nothing() {
        let mut sampler = ArrivalSampler::new(42);
        assert_eq!(sampler.poisson(0.0), 0);
        assert_eq!(sampler.poisson(-3.0), 0);
        assert_eq!(sampler.poisson(f64::NAN), 0);
        assert_eq!(sampler.poisson(f64::INFINITY), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = ArrivalSampler::new(7);
        let mut b = ArrivalSampler::new(7);
        let xs: Vec<u32> = (0..200).map(|_| a.poisson(0.6)).collect();
        let ys: Vec<u32> = (0..200).map(|_| b.poisson(0.6)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn reseed_restarts_sequence() {
        let mut sampler = ArrivalSampler::new(99);
        let first: Vec<u32> = (0..50).map(|_| sampler.poisson(1.5)).collect();
        sampler.reseed();
        let again: Vec<u32> = (0..50).map(|_| sampler.poisson(1.5)).collect();
        assert_eq!(first, again);
        assert_eq!(sampler.seed(), 99);
    }

    #[test]
    fn sample_mean_tracks_lambda() {
        let mut sampler = ArrivalSampler::new(42);
        for lambda in [2.0, 45.0] {
            let draws: u32 = 20_000;
            let sum: u64 = (0..draws).map(|_| u64::from(sampler.poisson(lambda))).sum();
            #[allow(clippy::cast_precision_loss)]
            let mean = sum as f64 / f64::from(draws);
            assert!((mean - lambda).abs() < lambda * 0.05, "lambda {lambda}: mean {mean}");
        }
    }
}
