/*!
 * Monitoring
 * Structured logging for the benchmark binary
 */

mod tracer;

pub use tracer::{init_tracing, span_run, RunSpan};
