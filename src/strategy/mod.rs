/*!
 * Strategy Module
 * Runtime selection of a signal strategy by identifier
 */

mod registry;
mod traits;

pub use registry::StrategyRegistry;
pub use traits::{QueueStrategy, SourceHandle, Strategy, WatcherHandle};
