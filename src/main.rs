/*!
 * signal-bench - Main Entry Point
 *
 * Times one signal strategy over repeated, process-isolated runs. Each
 * iteration's row is printed as soon as its child is reaped, followed by the
 * summary. Any error aborts the process.
 */

use clap::error::ErrorKind;
use clap::Parser;
use signal_broadcast::bench::table_row;
use signal_broadcast::{
    fatal, init_tracing, BenchConfig, BenchDriver, BenchError, BenchResult, CliArgs,
    StrategyRegistry,
};
use std::io::{self, Write};
use tracing::{info, warn};

fn main() {
    init_tracing();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => fatal(BenchError::InvalidArguments(e.to_string().trim().to_string())),
    };

    if let Err(err) = run(args) {
        fatal(err);
    }
}

fn run(args: CliArgs) -> BenchResult<()> {
    let config = BenchConfig::from_args(args)?;
    let registry = StrategyRegistry::builtin(config.sync.clone());
    let driver = BenchDriver::new(&registry, config)?;

    println!("{}", driver.table_header());
    let report = driver.run_with(|iteration, elapsed| {
        println!("{}", table_row(iteration, elapsed));
        if let Err(e) = io::stdout().flush() {
            warn!(error = %e, "stdout flush failed");
        }
    })?;
    if let Some(summary) = &report.summary {
        print!("\n{summary}");
    }
    if driver.config().json_report {
        println!("{}", report.to_json()?);
    }

    info!(strategy = %report.strategy, runs = report.runs.len(), "benchmark finished");
    Ok(())
}
