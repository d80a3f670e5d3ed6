//! "Think" delay sampling.
//!
//! Every choreography draws its human-like pauses from a [`DelaySampler`], so tests can pin or seed the
//! randomness instead of depending on a process-global generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

pub trait DelaySampler: Send + Sync {
    /// Returns a duration uniformly drawn from `[min, max)` at millisecond granularity.
    /// Returns `min` when the interval is empty.
    fn sample(&self, min: Duration, max: Duration) -> Duration;
}

fn millis_range(min: Duration, max: Duration) -> Option<(u64, u64)> {
    let min_ms = u64::try_from(min.as_millis()).unwrap_or(u64::MAX);
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    (max_ms > min_ms).then_some((min_ms, max_ms))
}

/// Samples from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDelay;

impl DelaySampler for RandomDelay {
    fn sample(&self, min: Duration, max: Duration) -> Duration {
        match millis_range(min, max) {
            Some((lo, hi)) => Duration::from_millis(rand::rng().random_range(lo..hi)),
            None => min,
        }
    }
}

/// Deterministic sampler: the same seed yields the same sequence of delays.
#[derive(Debug)]
pub struct SeededDelay {
    rng: Mutex<StdRng>,
}

impl SeededDelay {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DelaySampler for SeededDelay {
    fn sample(&self, min: Duration, max: Duration) -> Duration {
        match millis_range(min, max) {
            Some((lo, hi)) => {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                Duration::from_millis(rng.random_range(lo..hi))
            }
            None => min,
        }
    }
}

/// Always returns the same duration, whatever the interval.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl DelaySampler for FixedDelay {
    fn sample(&self, _min: Duration, _max: Duration) -> Duration {
        self.0
    }
}
