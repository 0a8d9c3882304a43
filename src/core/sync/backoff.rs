/*!
 * Adaptive Backoff with Exponential Sleep
 *
 * Replaces tight busy-wait loops in the lock-free strategies.
 *
 * 1. **Tight spin phase**: just `spin_loop()` hint
 * 2. **Yield phase**: `yield_now()` every iteration
 * 3. **Sleep phase**: exponentially increasing sleep, capped
 *
 * Correctness never depends on the phase a waiter is in, only latency and
 * CPU usage do.
 */

use super::config::SyncConfig;
use std::thread;
use std::time::{Duration, Instant};

/// Per-waiter backoff state
#[derive(Debug, Clone)]
pub struct Backoff {
    step: u32,
    sleep_ns: u64,
    spin_limit: u32,
    yield_limit: u32,
    max_sleep_ns: u64,
}

impl Backoff {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            step: 0,
            sleep_ns: 1,
            spin_limit: config.spin_limit,
            yield_limit: config.yield_limit,
            max_sleep_ns: u64::try_from(config.max_backoff.as_nanos()).unwrap_or(u64::MAX),
        }
    }

    /// Wait a little before the caller polls again
    #[inline]
    pub fn snooze(&mut self) {
        if self.step < self.spin_limit {
            std::hint::spin_loop();
        } else if self.step < self.yield_limit {
            thread::yield_now();
        } else {
            thread::sleep(Duration::from_nanos(self.sleep_ns));
            self.sleep_ns = self.sleep_ns.saturating_mul(2).min(self.max_sleep_ns.max(1));
        }
        self.step = self.step.saturating_add(1);
    }

    /// Start over from the spin phase (after progress was made)
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
        self.sleep_ns = 1;
    }

    /// Whether the waiter has reached the sleep phase
    #[inline]
    pub fn is_sleeping(&self) -> bool {
        self.step >= self.yield_limit
    }
}

/// Poll until `poll` yields a value or the deadline passes
///
/// `poll` is always tried at least once, so a zero timeout behaves like a
/// non-blocking attempt.
pub fn spin_until<T>(
    config: &SyncConfig,
    deadline: Option<Instant>,
    mut poll: impl FnMut() -> Option<T>,
) -> Option<T> {
    let mut backoff = Backoff::new(config);
    loop {
        if let Some(value) = poll() {
            return Some(value);
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return None;
            }
        }
        backoff.snooze();
    }
}
