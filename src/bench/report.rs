/*!
 * Benchmark Report
 * Per-iteration results and summary statistics
 *
 * The table is printable piece by piece: `table_header` before the first
 * iteration, `table_row` as each one completes, then the `Summary`.
 */

use super::elapsed::Elapsed;
use super::isolation::Isolation;
use super::workload::WorkloadConfig;
use crate::core::types::{BenchResult, Delivery};
use serde::Serialize;
use std::fmt;

/// Aggregate over all iterations
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub min: Elapsed,
    pub mean: Elapsed,
    pub median: Elapsed,
    pub max: Elapsed,
    /// Emissions per second at the mean elapsed time
    pub throughput: f64,
}

impl Summary {
    /// Summarize `runs`; `None` when there are no runs
    pub fn from_runs(runs: &[Elapsed], emissions_per_run: u64) -> Option<Self> {
        let mut sorted = runs.to_vec();
        sorted.sort_unstable();

        let min = *sorted.first()?;
        let max = *sorted.last()?;

        let count = sorted.len() as i128;
        let total: i128 = sorted.iter().map(Elapsed::as_nanos).sum();
        let mean = Elapsed::from_nanos(total / count);

        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            Elapsed::from_nanos((sorted[mid - 1].as_nanos() + sorted[mid].as_nanos()) / 2)
        } else {
            sorted[mid]
        };

        let secs = mean.as_secs_f64();
        let throughput = if secs > 0.0 {
            emissions_per_run as f64 / secs
        } else {
            0.0
        };

        Some(Self {
            min,
            mean,
            median,
            max,
            throughput,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>10}  {}", "min", self.min)?;
        writeln!(f, "{:>10}  {}", "mean", self.mean)?;
        writeln!(f, "{:>10}  {}", "median", self.median)?;
        writeln!(f, "{:>10}  {}", "max", self.max)?;
        writeln!(f, "{:>10}  {:.0} emissions/s", "throughput", self.throughput)
    }
}

/// Title line and column headings, without a trailing newline
pub fn table_header(
    strategy: &str,
    delivery: Delivery,
    isolation: Isolation,
    workload: &WorkloadConfig,
) -> String {
    format!(
        "strategy {strategy} ({delivery}, {isolation}) {workload}\n{:>9}  {}",
        "iteration", "elapsed"
    )
}

/// One iteration's line, without a trailing newline
pub fn table_row(iteration: usize, elapsed: Elapsed) -> String {
    format!("{iteration:>9}  {elapsed}")
}

/// Complete result of one benchmark invocation
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub strategy: String,
    pub delivery: Delivery,
    pub isolation: Isolation,
    pub workload: WorkloadConfig,
    pub runs: Vec<Elapsed>,
    pub summary: Option<Summary>,
}

impl BenchReport {
    pub fn new(
        strategy: impl Into<String>,
        delivery: Delivery,
        isolation: Isolation,
        workload: WorkloadConfig,
        runs: Vec<Elapsed>,
    ) -> Self {
        let summary = Summary::from_runs(&runs, workload.total_emissions());
        Self {
            strategy: strategy.into(),
            delivery,
            isolation,
            workload,
            runs,
            summary,
        }
    }

    pub fn to_json(&self) -> BenchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = table_header(&self.strategy, self.delivery, self.isolation, &self.workload);
        writeln!(f, "{header}")?;
        for (i, run) in self.runs.iter().enumerate() {
            writeln!(f, "{}", table_row(i + 1, *run))?;
        }

        if let Some(summary) = &self.summary {
            writeln!(f)?;
            write!(f, "{summary}")?;
        }
        Ok(())
    }
}
