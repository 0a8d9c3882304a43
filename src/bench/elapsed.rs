/*!
 * Elapsed Time
 * (seconds, nanoseconds) pairs with normalized carry/borrow
 */

use crate::core::errors::BenchError;
use crate::core::types::BenchResult;
use nix::sys::time::TimeSpec;
use nix::time::{clock_gettime, ClockId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Read the monotonic clock
pub fn now() -> BenchResult<TimeSpec> {
    clock_gettime(ClockId::CLOCK_MONOTONIC).map_err(BenchError::Clock)
}

/// Non-negative duration with `nanos` always in `[0, 1e9)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(C)]
pub struct Elapsed {
    secs: i64,
    nanos: i64,
}

impl Elapsed {
    pub const ZERO: Elapsed = Elapsed { secs: 0, nanos: 0 };

    /// Normalize arbitrary parts, carrying or borrowing whole seconds
    ///
    /// Negative totals clamp to zero.
    pub fn from_parts(secs: i64, nanos: i64) -> Self {
        let carry = nanos.div_euclid(NANOS_PER_SEC);
        let nanos = nanos.rem_euclid(NANOS_PER_SEC);
        let secs = secs.saturating_add(carry);

        if secs < 0 {
            Self::ZERO
        } else {
            Self { secs, nanos }
        }
    }

    /// Time from `start` to `end`
    pub fn between(start: TimeSpec, end: TimeSpec) -> Self {
        #[allow(clippy::unnecessary_cast)] // time_t / c_long are not i64 everywhere
        let (secs, nanos) = (
            end.tv_sec() as i64 - start.tv_sec() as i64,
            end.tv_nsec() as i64 - start.tv_nsec() as i64,
        );
        Self::from_parts(secs, nanos)
    }

    pub fn from_nanos(total: i128) -> Self {
        let secs = total.div_euclid(NANOS_PER_SEC as i128);
        let nanos = total.rem_euclid(NANOS_PER_SEC as i128) as i64;
        Self::from_parts(i64::try_from(secs).unwrap_or(i64::MAX), nanos)
    }

    #[inline]
    pub fn secs(&self) -> i64 {
        self.secs
    }

    #[inline]
    pub fn subsec_nanos(&self) -> i64 {
        self.nanos
    }

    pub fn as_nanos(&self) -> i128 {
        self.secs as i128 * NANOS_PER_SEC as i128 + self.nanos as i128
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.secs as f64 + self.nanos as f64 / NANOS_PER_SEC as f64
    }

    pub fn as_millis_f64(&self) -> f64 {
        self.as_secs_f64() * 1_000.0
    }

    pub fn as_duration(&self) -> Duration {
        // Both parts are non-negative by construction
        Duration::new(self.secs as u64, self.nanos as u32)
    }
}

impl From<Duration> for Elapsed {
    fn from(duration: Duration) -> Self {
        Self::from_parts(
            i64::try_from(duration.as_secs()).unwrap_or(i64::MAX),
            i64::from(duration.subsec_nanos()),
        )
    }
}

impl fmt::Display for Elapsed {
    /// `<s> s <ms>.<µs> ms`, keeping sub-millisecond precision
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} s {:.3} ms",
            self.secs,
            self.nanos as f64 / 1_000_000.0
        )
    }
}
