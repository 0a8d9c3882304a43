/*!
 * Callback Tests
 * Callbacks registered on a source, through both the typed and erased APIs
 */

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use signal_broadcast::signals::{
    BroadcastQueue, FanoutQueue, LinkedQueue, LockFreeQueue, RingQueue, SignalSource,
};
use signal_broadcast::{Payload, SignalCallback, SignalName, StrategyRegistry};
use std::sync::Arc;
use std::thread;

type Calls = Arc<Mutex<Vec<(String, Payload)>>>;

fn recorder(calls: &Calls) -> SignalCallback {
    let calls = calls.clone();
    Arc::new(move |name: &SignalName, payload: Payload| {
        calls.lock().push((name.to_string(), payload))
    })
}

fn callbacks_follow_emissions<Q: BroadcastQueue>() {
    let source = SignalSource::<Q>::new(&["signal_1", "signal_2"]).unwrap();
    let mut watcher = source.watch("signal_1").unwrap();
    let calls = Calls::default();

    let first = source.register_callback("signal_1", recorder(&calls)).unwrap();
    source.register_callback("signal_1", recorder(&calls)).unwrap();
    assert_eq!(source.callback_count("signal_1").unwrap(), 2, "{}", Q::NAME);

    source.emit("signal_1", Payload::new(1)).unwrap();
    source.emit("signal_2", Payload::new(2)).unwrap();
    assert!(source.remove_callback("signal_1", first).unwrap());
    source.emit("signal_1", Payload::new(3)).unwrap();

    let signal = |raw| ("signal_1".to_string(), Payload::new(raw));
    assert_eq!(*calls.lock(), [signal(1), signal(1), signal(3)], "{}", Q::NAME);

    // Callbacks do not take payloads away from watchers
    assert_eq!(watcher.wait().unwrap(), Payload::new(1), "{}", Q::NAME);
    assert_eq!(watcher.wait().unwrap(), Payload::new(3), "{}", Q::NAME);
}

fn callbacks_run_on_each_producer<Q: BroadcastQueue>() {
    const PRODUCERS: usize = 4;
    const EMITS: usize = 500;

    let source = Arc::new(SignalSource::<Q>::new(&["signal_1"]).unwrap());
    let calls = Calls::default();
    source.register_callback("signal_1", recorder(&calls)).unwrap();
    let mut watcher = source.watch("signal_1").unwrap();

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let source = source.clone();
            thread::spawn(move || {
                for seq in 0..EMITS {
                    source
                        .emit("signal_1", Payload::new(producer * EMITS + seq))
                        .unwrap();
                }
            })
        })
        .collect();
    for _ in 0..PRODUCERS * EMITS {
        watcher.wait().unwrap();
    }
    for producer in producers {
        producer.join().unwrap();
    }

    let mut seen: Vec<usize> = calls.lock().iter().map(|(_, p)| p.raw()).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..PRODUCERS * EMITS).collect::<Vec<_>>(), "{}", Q::NAME);
}

fn run_all<Q: BroadcastQueue>() {
    callbacks_follow_emissions::<Q>();
    callbacks_run_on_each_producer::<Q>();
}

#[test]
fn test_fanout_callbacks() {
    run_all::<FanoutQueue>();
}

#[test]
fn test_linked_callbacks() {
    run_all::<LinkedQueue>();
}

#[test]
fn test_lockfree_callbacks() {
    run_all::<LockFreeQueue>();
}

#[test]
fn test_ring_callbacks() {
    run_all::<RingQueue>();
}

#[test]
fn test_callbacks_through_registry_handles() {
    let registry = StrategyRegistry::default();
    let signals = [SignalName::from("signal_1")];

    for name in registry.names() {
        let strategy = registry.resolve(name).unwrap();
        let source = strategy.source(&signals).unwrap();
        let calls = Calls::default();

        let id = source.callback("signal_1", recorder(&calls)).unwrap();
        source.emit("signal_1", Payload::new(5)).unwrap();
        assert!(source.remove_callback("signal_1", id).unwrap());
        source.emit("signal_1", Payload::new(6)).unwrap();

        assert_eq!(*calls.lock(), [("signal_1".to_string(), Payload::new(5))], "{name}");

        let watcher = source.watch("signal_1").unwrap();
        watcher.unsubscribe();
    }
}
