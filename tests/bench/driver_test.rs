/*!
 * Benchmark Driver Tests
 * Configuration failures and complete in-process runs
 */

use clap::Parser;
use signal_broadcast::bench::{BenchConfig, BenchDriver, CliArgs, Isolation, WorkloadConfig};
use signal_broadcast::{BenchError, Delivery, StrategyRegistry, SyncConfig};

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("signal-bench").chain(argv.iter().copied())).unwrap()
}

fn configure(argv: &[&str]) -> Result<BenchConfig, BenchError> {
    BenchConfig::from_args_and_env(args(argv), |_| None)
}

#[test]
fn test_misconfiguration_is_rejected_before_running() {
    assert!(matches!(configure(&[]), Err(BenchError::MissingStrategy)));
    assert!(matches!(
        configure(&["-i", "fanout", "-e", "0"]),
        Err(BenchError::InvalidArguments(_))
    ));

    let config = configure(&["-i", "./libboost.so"]).unwrap();
    let registry = StrategyRegistry::default();
    match BenchDriver::new(&registry, config) {
        Err(BenchError::UnknownStrategy { requested, .. }) => {
            assert_eq!(requested, "./libboost.so")
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_in_process_run_per_strategy() {
    let registry = StrategyRegistry::default();
    for name in registry.names() {
        let config = BenchConfig::in_process(name, WorkloadConfig::new(4, 3, 100)).with_iterations(2);
        let driver = BenchDriver::new(&registry, config).unwrap();

        let report = driver.run().unwrap();
        assert_eq!(report.strategy, name);
        assert_eq!(report.isolation, Isolation::InProcess);
        assert_eq!(report.runs.len(), 2);

        let summary = report.summary.unwrap();
        assert!(summary.min <= summary.median && summary.median <= summary.max);
        assert!(summary.throughput > 0.0, "{name}");
    }
}

#[test]
fn test_report_reflects_strategy_delivery() {
    let registry = StrategyRegistry::default();
    let config = BenchConfig::in_process("ring", WorkloadConfig::new(1, 1, 10));
    let report = BenchDriver::new(&registry, config).unwrap().run().unwrap();
    assert_eq!(report.delivery, Delivery::Consumable);
}

#[test]
fn test_custom_sync_config_flows_into_registry() {
    let sync = SyncConfig {
        ring_capacity: 4,
        ..SyncConfig::default()
    };
    let registry = StrategyRegistry::builtin(sync);

    // Producers block on the tiny ring until consumers drain it
    let config = BenchConfig::in_process("ring", WorkloadConfig::new(2, 2, 200));
    let report = BenchDriver::new(&registry, config).unwrap().run().unwrap();
    assert_eq!(report.runs.len(), 1);
}

#[test]
fn test_forked_run_reports_every_iteration() {
    let registry = StrategyRegistry::default();
    let mut config = BenchConfig::in_process("lockfree", WorkloadConfig::new(2, 2, 10)).with_iterations(2);
    config.isolation = Isolation::Fork;

    let report = BenchDriver::new(&registry, config).unwrap().run().unwrap();
    assert_eq!(report.isolation, Isolation::Fork);
    assert_eq!(report.runs.len(), 2);
}
