/*!
 * Benchmark Configuration
 *
 * Command-line flags (`-i -s -t -e`) merged with environment settings.
 * All validation happens here, before any source, watcher or thread exists.
 */

use super::isolation::Isolation;
use super::workload::WorkloadConfig;
use crate::core::errors::BenchError;
use crate::core::limits::{DEFAULT_EMITS, DEFAULT_ITERATIONS, DEFAULT_SIGNALS, DEFAULT_SOURCES};
use crate::core::sync::SyncConfig;
use crate::core::types::BenchResult;
use clap::Parser;

/// Number of isolated runs
pub const ENV_ITERATIONS: &str = "SIGNAL_BENCH_ITERATIONS";
/// Print the JSON report after the table
pub const ENV_JSON_REPORT: &str = "SIGNAL_BENCH_JSON";
/// Emit log lines as JSON
pub const ENV_TRACE_JSON: &str = "SIGNAL_BENCH_TRACE_JSON";

/// Signal strategy benchmark
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "signal-bench", version, about)]
pub struct CliArgs {
    /// Strategy to load: an identifier (`fanout`) or a library path (`./libfanout.so`)
    #[arg(short = 'i', value_name = "STRATEGY")]
    pub strategy: Option<String>,

    /// Signals per source
    #[arg(short = 's', value_name = "N", default_value_t = DEFAULT_SIGNALS, allow_negative_numbers = true)]
    pub signals: i64,

    /// Sources (one producer thread each)
    #[arg(short = 't', value_name = "N", default_value_t = DEFAULT_SOURCES, allow_negative_numbers = true)]
    pub sources: i64,

    /// Emissions per signal per source
    #[arg(short = 'e', value_name = "N", default_value_t = DEFAULT_EMITS, allow_negative_numbers = true)]
    pub emits: i64,
}

/// Validated settings for one benchmark invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub strategy: String,
    pub workload: WorkloadConfig,
    pub iterations: usize,
    pub isolation: Isolation,
    pub json_report: bool,
    pub sync: SyncConfig,
}

impl BenchConfig {
    /// Settings for a single in-process run; used by tests and embedders
    pub fn in_process(strategy: impl Into<String>, workload: WorkloadConfig) -> Self {
        Self {
            strategy: strategy.into(),
            workload,
            iterations: 1,
            isolation: Isolation::InProcess,
            json_report: false,
            sync: SyncConfig::default(),
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Build from parsed flags and the process environment
    pub fn from_args(args: CliArgs) -> BenchResult<Self> {
        Self::from_args_and_env(args, |key| std::env::var(key).ok())
    }

    /// Build from parsed flags and an arbitrary environment lookup
    pub fn from_args_and_env<F>(args: CliArgs, env: F) -> BenchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let strategy = args
            .strategy
            .filter(|s| !s.trim().is_empty())
            .ok_or(BenchError::MissingStrategy)?;

        let workload = WorkloadConfig::new(
            positive("-s", args.signals)?,
            positive("-t", args.sources)?,
            positive("-e", args.emits)?,
        );

        let iterations = match env(ENV_ITERATIONS) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    BenchError::InvalidConfig(format!(
                        "{ENV_ITERATIONS} must be a positive integer, got \"{raw}\""
                    ))
                })?,
            None => DEFAULT_ITERATIONS,
        };

        let config = Self {
            strategy,
            workload,
            iterations,
            isolation: Isolation::Fork,
            json_report: env(ENV_JSON_REPORT).is_some_and(|v| is_enabled(&v)),
            sync: SyncConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.strategy.trim().is_empty() {
            return Err(BenchError::MissingStrategy);
        }
        if self.iterations == 0 {
            return Err(BenchError::InvalidConfig(
                "at least one iteration is required".into(),
            ));
        }
        self.workload.validate()?;
        self.sync
            .validate()
            .map_err(|e| BenchError::InvalidConfig(e.to_string()))
    }
}

/// `1` or `true` (any case) enables a boolean environment switch
pub fn is_enabled(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn positive(flag: &str, value: i64) -> BenchResult<usize> {
    usize::try_from(value)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            BenchError::InvalidArguments(format!("{flag} must be greater than zero, got {value}"))
        })
}
