/*!
 * Core Types
 * Common types shared by the signal library and the benchmark driver
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Signal name type
///
/// Names are immutable once registered and cloned into every watcher,
/// so a shared `str` keeps that cheap.
pub type SignalName = Arc<str>;

/// Common result type for signal operations
pub type SignalResult<T> = Result<T, super::errors::SignalError>;

/// Common result type for benchmark operations
pub type BenchResult<T> = Result<T, super::errors::BenchError>;

/// Opaque pointer-sized payload carried by a signal
///
/// The library never inspects the value, it only moves it from the
/// emitter to the watchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Payload(usize);

impl Payload {
    #[inline]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> usize {
        self.0
    }
}

impl From<usize> for Payload {
    fn from(raw: usize) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Handle returned when a callback is registered on a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CallbackId(u64);

impl CallbackId {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Function run by `emit` for every payload of a signal
///
/// Called on the emitting thread after the payload has been queued.
pub type SignalCallback = Arc<dyn Fn(&SignalName, Payload) + Send + Sync>;

/// How a queue hands emitted payloads to its watchers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Every watcher receives every payload emitted after it subscribed
    Multicast,
    /// Each payload is handed to exactly one of the competing watchers
    Consumable,
}

impl Delivery {
    #[inline]
    pub fn is_multicast(self) -> bool {
        matches!(self, Delivery::Multicast)
    }
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delivery::Multicast => f.write_str("multicast"),
            Delivery::Consumable => f.write_str("consumable"),
        }
    }
}
