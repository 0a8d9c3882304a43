/*!
 * Error Types
 * Centralized error handling with thiserror and miette diagnostics
 */

use super::types::Payload;
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised by signal sources, watchers and queues
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SignalError {
    #[error("Signal \"{0}\" is not registered on this source")]
    #[diagnostic(
        code(signal::unknown),
        help("Signal names are fixed when the source is constructed. Check the name for typos.")
    )]
    UnknownSignal(String),

    #[error("Signal \"{0}\" is registered more than once")]
    #[diagnostic(
        code(signal::duplicate),
        help("Signal names must be unique within one source.")
    )]
    DuplicateSignal(String),

    #[error("No signal \"{signal}\" arrived after {retries} timed waits")]
    #[diagnostic(
        code(signal::wait_timed_out),
        help("The producer looks stalled. Raise `max_wait_retries` if emissions are legitimately sparse.")
    )]
    WaitTimedOut { signal: String, retries: u32 },

    #[error("Invalid synchronization config: {0}")]
    #[diagnostic(code(signal::invalid_config))]
    InvalidConfig(String),
}

/// Errors raised by the benchmark driver
///
/// Every one of them is fatal to the process that observes it.
#[derive(Error, Debug, Diagnostic)]
pub enum BenchError {
    #[error("Library path required: the \"-i\" argument must name a signal strategy")]
    #[diagnostic(
        code(bench::missing_strategy),
        help("Pass one of the registered strategies, e.g. `-i fanout`.")
    )]
    MissingStrategy,

    #[error("Unable to load strategy \"{requested}\"")]
    #[diagnostic(code(bench::unknown_strategy), help("Known strategies: {available}"))]
    UnknownStrategy { requested: String, available: String },

    #[error("Strategy \"{0}\" is registered more than once")]
    #[diagnostic(code(bench::duplicate_strategy))]
    DuplicateStrategy(String),

    #[error("Invalid arguments: {0}")]
    #[diagnostic(code(bench::invalid_arguments), help("Usage: signal-bench -i <strategy> [-s N] [-t N] [-e N]"))]
    InvalidArguments(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(bench::invalid_config))]
    InvalidConfig(String),

    #[error("Signal error: {0}")]
    #[diagnostic(transparent)]
    Signal(#[from] SignalError),

    #[error("Watcher of \"{signal}\" expected payload {expected} but received {received}")]
    #[diagnostic(
        code(bench::out_of_order),
        help("The strategy lost, duplicated or reordered an emission.")
    )]
    OutOfOrder {
        signal: String,
        expected: Payload,
        received: Payload,
    },

    #[error("Unable to create thread \"{thread}\": {reason}")]
    #[diagnostic(code(bench::thread_spawn))]
    ThreadSpawn { thread: String, reason: String },

    #[error("Thread \"{thread}\" panicked")]
    #[diagnostic(code(bench::thread_panicked))]
    ThreadPanicked { thread: String },

    #[error("Clock read failed: {0}")]
    #[diagnostic(code(bench::clock))]
    Clock(#[source] nix::Error),

    #[error("Unable to allocate memory for results: {0}")]
    #[diagnostic(
        code(bench::shared_memory),
        help("The shared result region is an anonymous mapping. Check memory limits.")
    )]
    SharedMemory(#[source] nix::Error),

    #[error("Unable to fork a benchmark run: {0}")]
    #[diagnostic(code(bench::fork))]
    Fork(#[source] nix::Error),

    #[error("Unable to wait for benchmark run: {0}")]
    #[diagnostic(code(bench::wait))]
    Wait(#[source] nix::Error),

    #[error("Benchmark run {iteration} failed with status {status}")]
    #[diagnostic(
        code(bench::child_failed),
        help("The run's own error was printed by the child process above.")
    )]
    ChildFailed { iteration: usize, status: String },

    #[error("Benchmark run {iteration} exited without recording a result")]
    #[diagnostic(code(bench::missing_result))]
    MissingResult { iteration: usize },

    #[error("Report serialization failed: {0}")]
    #[diagnostic(code(bench::report))]
    Report(#[from] serde_json::Error),
}

/// Print a fatal diagnostic to stderr and abort the process
///
/// There is no recovery path: the benchmark relies on process isolation,
/// so the caller (or the parent of a forked run) observes the abnormal exit.
pub fn fatal<E>(err: E) -> !
where
    E: Diagnostic + Send + Sync + 'static,
{
    tracing::error!(error = %err, "fatal error, aborting");
    eprintln!("{:?}", miette::Report::new(err));
    std::process::abort()
}
