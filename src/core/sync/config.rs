/*!
 * Synchronization Configuration
 *
 * Tuning knobs shared by every signal strategy
 */

use crate::core::errors::SignalError;
use crate::core::limits::{
    BACKOFF_MAX_SLEEP, BACKOFF_SPIN_LIMIT, BACKOFF_YIELD_LIMIT, DEFAULT_LINKED_WAIT_TIMEOUT,
    DEFAULT_MAX_WAIT_RETRIES, DEFAULT_RING_CAPACITY,
};
use crate::core::types::SignalResult;
use std::time::Duration;

/// Synchronization configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Backoff iterations spent in `spin_loop()`
    pub spin_limit: u32,
    /// Backoff iterations (counted from zero) before sleeping starts
    pub yield_limit: u32,
    /// Cap for a single backoff sleep
    pub max_backoff: Duration,
    /// Timed-wait slice of the linked strategy
    pub wait_timeout: Duration,
    /// Timed-wait expiries before a linked wait fails (`None` = retry forever, never `Some(0)`)
    pub max_wait_retries: Option<u32>,
    /// Capacity of each ring buffer
    pub ring_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            spin_limit: BACKOFF_SPIN_LIMIT,
            yield_limit: BACKOFF_YIELD_LIMIT,
            max_backoff: BACKOFF_MAX_SLEEP,
            wait_timeout: DEFAULT_LINKED_WAIT_TIMEOUT,
            max_wait_retries: Some(DEFAULT_MAX_WAIT_RETRIES),
            ring_capacity: DEFAULT_RING_CAPACITY,
        }
    }
}

impl SyncConfig {
    /// Configuration optimized for low-latency handoffs (more spinning, shorter sleeps)
    pub const fn low_latency() -> Self {
        Self {
            spin_limit: 100,
            yield_limit: 500,
            max_backoff: Duration::from_micros(50),
            wait_timeout: DEFAULT_LINKED_WAIT_TIMEOUT,
            max_wait_retries: Some(DEFAULT_MAX_WAIT_RETRIES),
            ring_capacity: DEFAULT_RING_CAPACITY,
        }
    }

    /// Same as default but never gives up on a stalled linked wait
    pub fn unbounded_retries() -> Self {
        Self {
            max_wait_retries: None,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SignalResult<()> {
        if self.ring_capacity == 0 {
            return Err(SignalError::InvalidConfig(
                "ring capacity must be positive".into(),
            ));
        }
        if self.yield_limit < self.spin_limit {
            return Err(SignalError::InvalidConfig(format!(
                "yield limit {} is below spin limit {}",
                self.yield_limit, self.spin_limit
            )));
        }
        if self.wait_timeout.is_zero() {
            return Err(SignalError::InvalidConfig(
                "linked wait timeout must be non-zero".into(),
            ));
        }
        if self.max_wait_retries == Some(0) {
            return Err(SignalError::InvalidConfig(
                "max wait retries must be at least one; use None to retry forever".into(),
            ));
        }
        Ok(())
    }
}
