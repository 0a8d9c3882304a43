/*!
 * Synchronization Primitives
 *
 * Shared tuning and backoff used by the signal strategies:
 * - `SyncConfig` for timeouts, retry bounds and ring capacity
 * - `Backoff` / `spin_until` for bounded busy-waiting
 */

mod backoff;
mod config;

pub use backoff::{spin_until, Backoff};
pub use config::SyncConfig;
