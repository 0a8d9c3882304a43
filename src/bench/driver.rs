/*!
 * Benchmark Driver
 *
 * Resolves the strategy once, then repeats the workload for the configured
 * number of iterations. With `Isolation::Fork` every iteration runs in its own
 * child process; the parent only forks, reaps and reads results.
 *
 * `run_with` reports each iteration to a callback as soon as its result is
 * in, so the binary can print the table while later iterations still run.
 */

use super::config::BenchConfig;
use super::elapsed::Elapsed;
use super::isolation::{fork_run, reap, Forked, Isolation, ResultRegion};
use super::report::{table_header, BenchReport};
use super::runner::run_workload;
use super::workload::Workload;
use crate::core::errors::{fatal, BenchError};
use crate::core::types::BenchResult;
use crate::monitoring::span_run;
use crate::strategy::{Strategy, StrategyRegistry};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{info, warn};

pub struct BenchDriver {
    strategy: Arc<dyn Strategy>,
    config: BenchConfig,
}

impl BenchDriver {
    /// Validate `config` and resolve its strategy
    ///
    /// Fails before any source or thread is created.
    pub fn new(registry: &StrategyRegistry, config: BenchConfig) -> BenchResult<Self> {
        config.validate()?;
        let strategy = registry.resolve(&config.strategy)?;
        Ok(Self { strategy, config })
    }

    pub fn strategy(&self) -> &Arc<dyn Strategy> {
        &self.strategy
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Heading of the results table for this strategy and workload
    pub fn table_header(&self) -> String {
        table_header(
            self.strategy.name(),
            self.strategy.delivery(),
            self.config.isolation,
            &self.config.workload,
        )
    }

    pub fn run(&self) -> BenchResult<BenchReport> {
        self.run_with(|_, _| {})
    }

    /// Run every iteration, passing `(iteration, elapsed)` to `on_run` as each completes
    pub fn run_with<F>(&self, mut on_run: F) -> BenchResult<BenchReport>
    where
        F: FnMut(usize, Elapsed),
    {
        info!(
            strategy = self.strategy.name(),
            workload = %self.config.workload,
            iterations = self.config.iterations,
            isolation = %self.config.isolation,
            "benchmark starting"
        );

        let runs = match self.config.isolation {
            Isolation::Fork => self.run_forked(&mut on_run)?,
            Isolation::InProcess => self.run_in_process(&mut on_run)?,
        };

        Ok(BenchReport::new(
            self.strategy.name(),
            self.strategy.delivery(),
            self.config.isolation,
            self.config.workload,
            runs,
        ))
    }

    /// One complete workload in the current process
    pub fn run_once(&self) -> BenchResult<Elapsed> {
        let workload = Workload::generate(&*self.strategy, &self.config.workload)?;
        run_workload(workload)
    }

    fn run_in_process(&self, on_run: &mut dyn FnMut(usize, Elapsed)) -> BenchResult<Vec<Elapsed>> {
        (1..=self.config.iterations)
            .map(|iteration| -> BenchResult<Elapsed> {
                let span = span_run(self.strategy.name(), iteration);
                let elapsed = self.run_once()?;
                span.record_elapsed(elapsed);
                drop(span);
                on_run(iteration, elapsed);
                Ok(elapsed)
            })
            .collect()
    }

    fn run_forked(&self, on_run: &mut dyn FnMut(usize, Elapsed)) -> BenchResult<Vec<Elapsed>> {
        let region = ResultRegion::new(self.config.iterations)?;
        let mut runs = Vec::with_capacity(self.config.iterations);

        for iteration in 1..=self.config.iterations {
            let slot = iteration - 1;

            // Buffered output would otherwise be written by both processes
            if let Err(e) = io::stdout().flush() {
                warn!(error = %e, "stdout flush before fork failed");
            }

            match fork_run()? {
                Forked::Child => {
                    let span = span_run(self.strategy.name(), iteration);
                    match self.run_once() {
                        Ok(elapsed) => {
                            span.record_elapsed(elapsed);
                            drop(span);
                            region.record(slot, elapsed);
                            std::process::exit(0);
                        }
                        Err(err) => fatal(err),
                    }
                }
                Forked::Parent(child) => reap(child, iteration)?,
            }

            let elapsed = region
                .read(slot)
                .ok_or(BenchError::MissingResult { iteration })?;
            info!(iteration, elapsed = %elapsed, "run complete");
            on_run(iteration, elapsed);
            runs.push(elapsed);
        }

        Ok(runs)
    }
}

impl std::fmt::Debug for BenchDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchDriver")
            .field("strategy", &self.strategy.name())
            .field("config", &self.config)
            .finish()
    }
}
