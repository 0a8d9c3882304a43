/*!
 * Tracing
 * Structured logging setup and per-run spans using the tracing crate
 */

use crate::bench::{is_enabled, Elapsed, ENV_TRACE_JSON};
use std::io;
use std::time::Instant;
use tracing::{debug, span, Level, Span};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing
///
/// Logs go to stderr so the report on stdout stays machine-readable.
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SIGNAL_BENCH_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| is_enabled(&v))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    // try_init: a second call (tests, embedders) keeps the first subscriber
    let result = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .try_init()
    };

    if result.is_ok() {
        debug!(json = use_json, "tracing initialized");
    }
}

/// Span covering one benchmark iteration
pub struct RunSpan {
    span: Span,
    start: Instant,
}

impl RunSpan {
    pub fn new(strategy: &str, iteration: usize) -> Self {
        let span = span!(
            Level::DEBUG,
            "bench_run",
            strategy = strategy,
            iteration = iteration,
            pid = std::process::id(),
            elapsed = tracing::field::Empty,
        );

        let _entered = span.enter();
        debug!("run started");
        drop(_entered);

        Self {
            span,
            start: Instant::now(),
        }
    }

    /// Record the measured workload time
    pub fn record_elapsed(&self, elapsed: Elapsed) {
        self.span.record("elapsed", tracing::field::display(elapsed));
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for RunSpan {
    fn drop(&mut self) {
        let _entered = self.span.enter();
        debug!(
            wall_ms = self.start.elapsed().as_millis() as u64,
            "run finished"
        );
    }
}

/// Helper to create a run span
#[inline]
pub fn span_run(strategy: &str, iteration: usize) -> RunSpan {
    RunSpan::new(strategy, iteration)
}
