/*!
 * Scenario Tests
 * End-to-end exchanges through the strategy registry
 */

use pretty_assertions::assert_eq;
use signal_broadcast::signals::{RingQueue, SignalSource};
use signal_broadcast::{Delivery, Payload, SignalName, StrategyRegistry};
use std::thread;

fn names(list: &[&str]) -> Vec<SignalName> {
    list.iter().map(|s| SignalName::from(*s)).collect()
}

#[test]
fn test_single_signal_in_order() {
    let registry = StrategyRegistry::default();
    for name in registry.names() {
        let strategy = registry.resolve(name).unwrap();
        let source = strategy.source(&names(&["signal_1"])).unwrap();
        let mut watcher = source.watch("signal_1").unwrap();

        let consumer = thread::spawn(move || {
            (0..3)
                .map(|_| watcher.wait().unwrap())
                .collect::<Vec<_>>()
        });
        for raw in [10, 20, 30] {
            source.emit("signal_1", Payload::new(raw)).unwrap();
        }

        let seen = consumer.join().unwrap();
        assert_eq!(
            seen,
            vec![Payload::new(10), Payload::new(20), Payload::new(30)],
            "{name}"
        );
    }
}

#[test]
fn test_two_signals_never_swapped() {
    let registry = StrategyRegistry::default();
    for name in registry.names() {
        let strategy = registry.resolve(name).unwrap();
        let source = strategy.source(&names(&["signal_1", "signal_2"])).unwrap();
        let mut a = source.watch("signal_1").unwrap();
        let mut b = source.watch("signal_2").unwrap();

        source.emit("signal_1", Payload::new(0xA)).unwrap();
        source.emit("signal_2", Payload::new(0xB)).unwrap();

        assert_eq!(a.wait().unwrap(), Payload::new(0xA), "{name}");
        assert_eq!(b.wait().unwrap(), Payload::new(0xB), "{name}");
        assert_eq!(a.signal().as_ref(), "signal_1");
        assert_eq!(b.signal().as_ref(), "signal_2");
    }
}

#[test]
fn test_ring_distributes_items_between_watchers() {
    let source = SignalSource::<RingQueue>::new(&["signal_1"]).unwrap();
    assert_eq!(source.delivery(), Delivery::Consumable);

    let mut first = source.watch("signal_1").unwrap();
    let mut second = source.watch("signal_1").unwrap();

    source.emit("signal_1", Payload::new(1)).unwrap();
    source.emit("signal_1", Payload::new(2)).unwrap();

    let mut delivered = Vec::new();
    while let Some(payload) = first.try_wait().unwrap() {
        delivered.push(payload);
    }
    let first_count = delivered.len();
    while let Some(payload) = second.try_wait().unwrap() {
        delivered.push(payload);
    }

    assert_eq!(delivered, vec![Payload::new(1), Payload::new(2)]);
    assert!(first_count <= 2);
    assert_eq!(second.try_wait().unwrap(), None);
}

#[test]
fn test_ring_concurrent_consumers_share_the_stream() {
    const EMITS: usize = 1_000;

    let source = SignalSource::<RingQueue>::new(&["signal_1"]).unwrap();
    let consumers: Vec<_> = (0..2)
        .map(|_| {
            let mut watcher = source.watch("signal_1").unwrap();
            thread::spawn(move || {
                let mut seen = Vec::new();
                while let Some(payload) = watcher
                    .wait_timeout(std::time::Duration::from_secs(2))
                    .unwrap()
                {
                    seen.push(payload.raw());
                }
                seen
            })
        })
        .collect();

    for n in 1..=EMITS {
        source.emit("signal_1", Payload::new(n)).unwrap();
    }

    let mut all: Vec<usize> = Vec::new();
    for consumer in consumers {
        let seen = consumer.join().unwrap();
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        all.extend(seen);
    }
    all.sort_unstable();
    assert_eq!(all, (1..=EMITS).collect::<Vec<_>>());
}
