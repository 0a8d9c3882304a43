/*!
 * Benchmark Harness
 *
 * Measures how long a strategy needs to deliver S×T×E emissions from T
 * producer threads to T×S consumer threads, repeated over isolated runs.
 */

mod config;
mod driver;
mod elapsed;
mod isolation;
mod report;
mod runner;
mod workload;

pub use config::{
    is_enabled, BenchConfig, CliArgs, ENV_ITERATIONS, ENV_JSON_REPORT, ENV_TRACE_JSON,
};
pub use driver::BenchDriver;
pub use elapsed::{now, Elapsed};
pub use isolation::{fork_run, reap, Forked, Isolation, ResultRegion};
pub use report::{table_header, table_row, BenchReport, Summary};
pub use runner::run_workload;
pub use workload::{signal_names, BoundWatcher, Workload, WorkloadConfig};
