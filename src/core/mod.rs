/*!
 * Core Module
 * Fundamental types, limits, error handling and sync helpers
 */

pub mod errors;
pub mod limits;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use errors::{fatal, BenchError, SignalError};
pub use sync::SyncConfig;
pub use types::*;
