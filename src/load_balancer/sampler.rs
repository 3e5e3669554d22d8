//! Random index sampling for randomized strategies.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::{OsRng, SmallRng};
use rand::{Rng, RngCore, SeedableRng};
use thiserror::Error;

/// Failure to construct a sampler.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("failed to read seed from the OS entropy source: {0}")]
    Entropy(#[from] rand::Error),
}

/// Source of uniformly distributed indices.
pub trait Sampler: Send + Sync + std::fmt::Debug {
    /// Draw an integer uniformly in `[0, n)`. `n` must be non-zero.
    fn int_n(&self, n: usize) -> usize;
}

thread_local! {
    /// One rng per thread, so concurrent selections never contend.
    static THREAD_RNG: RefCell<Option<SmallRng>> = const { RefCell::new(None) };
}

/// Distinguishes the streams of threads seeded from the same sampler seed.
static NEXT_STREAM: AtomicU64 = AtomicU64::new(0);

/// Fast per-thread PRNG derived from a seed read once from OS entropy.
///
/// Seeding makes selection patterns differ across restarts; the draws
/// themselves only need to spread load, not be unpredictable.
#[derive(Debug)]
pub struct SeededSampler {
    seed: u64,
}

impl SeededSampler {
    pub fn new() -> Result<Self, SamplerError> {
        let mut seed = [0u8; 8];
        OsRng.try_fill_bytes(&mut seed)?;
        Ok(Self {
            seed: u64::from_le_bytes(seed),
        })
    }

    fn thread_rng(&self) -> SmallRng {
        let stream = NEXT_STREAM.fetch_add(1, Ordering::Relaxed);
        SmallRng::seed_from_u64(self.seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

impl Sampler for SeededSampler {
    fn int_n(&self, n: usize) -> usize {
        debug_assert!(n > 0, "sample bound must be non-zero");
        if n <= 1 {
            return 0;
        }
        THREAD_RNG.with(|cell| {
            let mut slot = cell.borrow_mut();
            slot.get_or_insert_with(|| self.thread_rng()).gen_range(0..n)
        })
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
///
/// Each value is reduced modulo the requested bound.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct ScriptedSampler {
    draws: Vec<usize>,
    cursor: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl ScriptedSampler {
    pub(crate) fn new(draws: impl Into<Vec<usize>>) -> Self {
        Self {
            draws: draws.into(),
            cursor: Default::default(),
        }
    }
}

#[cfg(test)]
impl Sampler for ScriptedSampler {
    fn int_n(&self, n: usize) -> usize {
        if self.draws.is_empty() || n == 0 {
            return 0;
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.draws[i % self.draws.len()] % n
    }
}

/// Counts draws, returning successive integers modulo the bound.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct CountingSampler {
    draws: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

#[cfg(test)]
impl CountingSampler {
    pub(crate) fn draws(&self) -> usize {
        self.draws.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
impl Sampler for CountingSampler {
    fn int_n(&self, n: usize) -> usize {
        self.draws.fetch_add(1, Ordering::Relaxed) % n.max(1)
    }
}
