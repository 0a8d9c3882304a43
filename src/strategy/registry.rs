/*!
 * Strategy Registry
 *
 * Owned table of selectable strategies, built once at startup before any
 * worker thread exists and handed to the driver.
 */

use super::traits::{QueueStrategy, Strategy};
use crate::core::errors::BenchError;
use crate::core::sync::SyncConfig;
use crate::core::types::BenchResult;
use crate::signals::{FanoutQueue, LinkedQueue, LockFreeQueue, RingQueue};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Name-indexed strategy table
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl StrategyRegistry {
    /// Registry without any strategy
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Registry holding the four built-in strategies
    pub fn builtin(config: SyncConfig) -> Self {
        let strategies: Vec<Arc<dyn Strategy>> = vec![
            Arc::new(QueueStrategy::<FanoutQueue>::new(config.clone())),
            Arc::new(QueueStrategy::<LinkedQueue>::new(config.clone())),
            Arc::new(QueueStrategy::<LockFreeQueue>::new(config.clone())),
            Arc::new(QueueStrategy::<RingQueue>::new(config)),
        ];
        Self { strategies }
    }

    /// Add a strategy; identifiers must be unique
    pub fn register(&mut self, strategy: Arc<dyn Strategy>) -> BenchResult<()> {
        if self.find(strategy.name()).is_some() {
            return Err(BenchError::DuplicateStrategy(strategy.name().to_string()));
        }
        debug!(strategy = strategy.name(), "strategy registered");
        self.strategies.push(strategy);
        Ok(())
    }

    /// Registered identifiers in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve a strategy by identifier or by a library-style path
    ///
    /// `fanout`, `./build/fanout.so` and `/opt/libfanout.so` all resolve to
    /// the `fanout` strategy.
    pub fn resolve(&self, requested: &str) -> BenchResult<Arc<dyn Strategy>> {
        let id = strategy_id(requested);
        let strategy = self
            .find(requested)
            .or_else(|| self.find(id))
            .ok_or_else(|| BenchError::UnknownStrategy {
                requested: requested.to_string(),
                available: self.names().join(", "),
            })?;

        info!(requested, strategy = strategy.name(), delivery = %strategy.delivery(), "strategy loaded");
        Ok(strategy.clone())
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn Strategy>> {
        self.strategies.iter().find(|s| s.name() == name)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin(SyncConfig::default())
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

/// Strip directories, extension and a `lib` prefix from a library-style path
fn strategy_id(requested: &str) -> &str {
    let stem = Path::new(requested)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(requested);
    stem.strip_prefix("lib").unwrap_or(stem)
}
