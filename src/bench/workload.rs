/*!
 * Workload Generation
 *
 * One run is T sources, each registered for the same S signal names, and one
 * watcher per (source, signal) pair. Everything is constructed before any
 * thread starts so that no emission can precede its watcher.
 */

use crate::core::errors::BenchError;
use crate::core::limits::SIGNAL_NAME_PREFIX;
use crate::core::types::{BenchResult, SignalName};
use crate::strategy::{SourceHandle, Strategy, WatcherHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Shape of one benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Signal names per source (S)
    pub signals: usize,
    /// Sources, one producer thread each (T)
    pub sources: usize,
    /// Emissions per signal per source (E)
    pub emits: usize,
}

impl WorkloadConfig {
    pub const fn new(signals: usize, sources: usize, emits: usize) -> Self {
        Self {
            signals,
            sources,
            emits,
        }
    }

    pub fn validate(&self) -> BenchResult<()> {
        for (flag, value) in [("-s", self.signals), ("-t", self.sources), ("-e", self.emits)] {
            if value == 0 {
                return Err(BenchError::InvalidConfig(format!(
                    "{flag} must be greater than zero"
                )));
            }
        }
        Ok(())
    }

    /// Watchers (and consumer threads) in one run: T×S
    pub fn watcher_count(&self) -> usize {
        self.sources.saturating_mul(self.signals)
    }

    /// Producer plus consumer threads
    pub fn thread_count(&self) -> usize {
        self.sources.saturating_add(self.watcher_count())
    }

    /// Emissions across all sources: T×S×E
    pub fn total_emissions(&self) -> u64 {
        (self.watcher_count() as u64).saturating_mul(self.emits as u64)
    }
}

impl fmt::Display for WorkloadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "signals={} sources={} emits={}",
            self.signals, self.sources, self.emits
        )
    }
}

/// `signal_1` through `signal_<count>`
pub fn signal_names(count: usize) -> Vec<SignalName> {
    (1..=count)
        .map(|i| SignalName::from(format!("{SIGNAL_NAME_PREFIX}{i}")))
        .collect()
}

/// Watcher tagged with the index of the source it observes
pub struct BoundWatcher {
    pub source: usize,
    pub watcher: Box<dyn WatcherHandle>,
}

impl fmt::Debug for BoundWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundWatcher")
            .field("source", &self.source)
            .field("signal", self.watcher.signal())
            .finish()
    }
}

/// Fully constructed run, ready to hand to the runner
pub struct Workload {
    pub config: WorkloadConfig,
    pub sources: Vec<Arc<dyn SourceHandle>>,
    pub watchers: Vec<BoundWatcher>,
}

impl Workload {
    /// Build every source and watcher for `config` using `strategy`
    pub fn generate(strategy: &dyn Strategy, config: &WorkloadConfig) -> BenchResult<Self> {
        config.validate()?;

        let names = signal_names(config.signals);
        let sources = (0..config.sources)
            .map(|_| strategy.source(&names))
            .collect::<Result<Vec<_>, _>>()?;

        let mut watchers = Vec::with_capacity(config.watcher_count());
        for (index, source) in sources.iter().enumerate() {
            for name in &names {
                watchers.push(BoundWatcher {
                    source: index,
                    watcher: source.watch(name)?,
                });
            }
        }

        debug!(
            strategy = strategy.name(),
            sources = sources.len(),
            watchers = watchers.len(),
            "workload generated"
        );
        Ok(Self {
            config: *config,
            sources,
            watchers,
        })
    }
}

impl fmt::Debug for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workload")
            .field("config", &self.config)
            .field("watchers", &self.watchers)
            .finish_non_exhaustive()
    }
}
