/*!
 * Limits and Defaults
 *
 * Centralized location for capacities, timeouts and benchmark defaults.
 * Performance-sensitive values are marked with [PERF].
 */

use std::time::Duration;

// =============================================================================
// STRATEGY LIMITS
// =============================================================================

/// Capacity of each bounded ring (one ring per signal per source)
/// [PERF] Large enough that producers rarely spin on a full ring in the default workload
pub const DEFAULT_RING_CAPACITY: usize = 10_000;

/// Timed-wait slice for the linked strategy before a stall warning is logged
pub const DEFAULT_LINKED_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Stall warnings tolerated by the linked strategy before the wait fails
/// (12 x 5s = one minute without a single emission on the signal)
pub const DEFAULT_MAX_WAIT_RETRIES: u32 = 12;

// =============================================================================
// BACKOFF
// =============================================================================

/// Iterations of pure `spin_loop()` before yielding
/// [PERF] Covers handoffs that complete within a few hundred nanoseconds
pub const BACKOFF_SPIN_LIMIT: u32 = 10;

/// Iterations of `yield_now()` before sleeping
pub const BACKOFF_YIELD_LIMIT: u32 = 50;

/// Upper bound for a single backoff sleep
pub const BACKOFF_MAX_SLEEP: Duration = Duration::from_millis(1);

// =============================================================================
// BENCHMARK DEFAULTS
// =============================================================================

/// Prefix of generated signal names (`signal_1`, `signal_2`, ...)
pub const SIGNAL_NAME_PREFIX: &str = "signal_";

/// Signals registered on every source
pub const DEFAULT_SIGNALS: i64 = 10;

/// Independent sources (one producer thread each)
pub const DEFAULT_SOURCES: i64 = 10;

/// Emissions of every signal by every producer
pub const DEFAULT_EMITS: i64 = 1000;

/// Isolated benchmark runs
pub const DEFAULT_ITERATIONS: usize = 10;
