/*!
 * Signal Broadcast
 *
 * Named-signal broadcast library with pluggable synchronization strategies,
 * plus the harness that benchmarks them against each other.
 */

pub mod bench;
pub mod core;
pub mod monitoring;
pub mod signals;
pub mod strategy;

// Re-exports
pub use crate::core::{fatal, BenchError, Delivery, Payload, SignalError, SignalName, SyncConfig};
pub use crate::core::{CallbackId, SignalCallback};
pub use crate::core::{BenchResult, SignalResult};
pub use bench::{BenchConfig, BenchDriver, BenchReport, CliArgs, Isolation, WorkloadConfig};
pub use monitoring::init_tracing;
pub use signals::{SignalSource, SignalWatcher};
pub use strategy::{Strategy, StrategyRegistry};
