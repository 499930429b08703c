//! Deterministic random number generation.
//!
//! RULE: Nothing in the dashboard may call any platform RNG.
//! All randomness flows through DashRng instances derived
//! from the seed passed to a generator.
//!
//! Each generator gets its own RNG stream, seeded deterministically
//! from (seed XOR stream_index). This means:
//!   - Adding a new generator never changes existing streams.
//!   - Each stream is fully reproducible in isolation.
//!
//! Distributions are implemented here on top of the raw stream rather
//! than borrowed from a distribution crate, so a given seed produces the
//! same draws on every platform and crate version.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Largest mean handed to a single Knuth Poisson draw.
pub const POISSON_CHUNK: f64 = 500.0;

/// A named, deterministic RNG for a single generator stream.
pub struct DashRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl DashRng {
    /// Create a stream RNG from the seed and a stable stream index.
    /// The index must never change once assigned.
    pub fn new(seed: u64, stream_index: u64) -> Self {
        let derived_seed = seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick one element uniformly.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let index = self.next_u64_below(items.len() as u64) as usize;
        &items[index]
    }

    /// Pick an index from a categorical distribution.
    /// Weights need not sum to 1; the last index absorbs rounding slack.
    pub fn weighted_index(&mut self, weights: &[f64]) -> usize {
        assert!(!weights.is_empty(), "weights must not be empty");
        let total: f64 = weights.iter().sum();
        let roll = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (i, w) in weights.iter().enumerate() {
            cumulative += w;
            if roll < cumulative {
                return i;
            }
        }
        weights.len() - 1
    }

    /// Pick one element of a weighted table.
    pub fn pick_weighted<T: Copy>(&mut self, table: &[(T, f64)]) -> T {
        let weights: Vec<f64> = table.iter().map(|(_, w)| *w).collect();
        table[self.weighted_index(&weights)].0
    }

    /// Poisson draw (Knuth's multiplication method).
    /// Means above `POISSON_CHUNK` are split into a sum of smaller draws,
    /// since `exp(-mean)` underflows to zero near 745.
    pub fn poisson(&mut self, mean: f64) -> u64 {
        if !mean.is_finite() || mean <= 0.0 {
            return 0;
        }
        let mut remaining = mean;
        let mut total = 0u64;
        while remaining > POISSON_CHUNK {
            total += self.poisson_knuth(POISSON_CHUNK);
            remaining -= POISSON_CHUNK;
        }
        total + self.poisson_knuth(remaining)
    }

    fn poisson_knuth(&mut self, mean: f64) -> u64 {
        let limit = (-mean).exp();
        let mut k = 0u64;
        let mut product = 1.0;
        loop {
            product *= self.next_f64();
            if product <= limit {
                return k;
            }
            k += 1;
        }
    }

    /// Normal draw via the Box-Muller transform (one value per call).
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Binomial draw as a sum of Bernoulli trials.
    pub fn binomial(&mut self, trials: u64, p: f64) -> u64 {
        (0..trials).filter(|_| self.chance(p)).count() as u64
    }
}

/// Hands out one stream per generator for a given seed.
pub struct SeedBank {
    seed: u64,
}

impl SeedBank {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn for_stream(&self, slot: StreamSlot) -> DashRng {
        DashRng::new(self.seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries; only append.
/// Reordering changes every generator's output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Orders = 0,
    Traffic = 1,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Traffic => "traffic",
        }
    }
}
