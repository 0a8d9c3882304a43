/*!
 * Multicast Completeness Tests
 *
 * Every watcher of a multicast strategy receives every later emission,
 * in per-producer order.
 */

use pretty_assertions::assert_eq;
use signal_broadcast::signals::{BroadcastQueue, FanoutQueue, LinkedQueue, LockFreeQueue, SignalSource};
use signal_broadcast::{Delivery, Payload};
use std::sync::Arc;
use std::thread;

fn payloads(range: std::ops::RangeInclusive<usize>) -> Vec<Payload> {
    range.map(Payload::new).collect()
}

fn every_watcher_sees_every_emission<Q: BroadcastQueue>() {
    let source = SignalSource::<Q>::new(&["signal_1"]).unwrap();
    assert_eq!(source.delivery(), Delivery::Multicast);

    let mut watchers: Vec<_> = (0..4).map(|_| source.watch("signal_1").unwrap()).collect();
    for n in 1..=5 {
        source.emit("signal_1", Payload::new(n)).unwrap();
    }

    for watcher in &mut watchers {
        let seen: Vec<Payload> = (0..5).map(|_| watcher.wait().unwrap()).collect();
        assert_eq!(seen, payloads(1..=5), "{}", Q::NAME);
        assert_eq!(watcher.try_wait().unwrap(), None);
    }
}

fn concurrent_watchers_keep_producer_order<Q: BroadcastQueue>() {
    const EMITS: usize = 2_000;

    let source = Arc::new(SignalSource::<Q>::new(&["signal_1"]).unwrap());
    let consumers: Vec<_> = (0..3)
        .map(|_| {
            let mut watcher = source.watch("signal_1").unwrap();
            thread::spawn(move || {
                (0..EMITS)
                    .map(|_| watcher.wait().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let producer = {
        let source = source.clone();
        thread::spawn(move || {
            for n in 1..=EMITS {
                source.emit("signal_1", Payload::new(n)).unwrap();
            }
        })
    };

    producer.join().unwrap();
    for consumer in consumers {
        assert_eq!(consumer.join().unwrap(), payloads(1..=EMITS), "{}", Q::NAME);
    }
}

fn many_producers_each_keep_their_order<Q: BroadcastQueue>() {
    const PRODUCERS: usize = 4;
    const EMITS: usize = 500;

    let source = Arc::new(SignalSource::<Q>::new(&["signal_1"]).unwrap());
    let mut watcher = source.watch("signal_1").unwrap();

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let source = source.clone();
            thread::spawn(move || {
                for n in 0..EMITS {
                    source.emit("signal_1", Payload::new(p * EMITS + n)).unwrap();
                }
            })
        })
        .collect();

    let mut last = vec![None; PRODUCERS];
    for _ in 0..PRODUCERS * EMITS {
        let raw = watcher.wait().unwrap().raw();
        let producer = raw / EMITS;
        assert!(last[producer] < Some(raw), "{}: {raw} after {:?}", Q::NAME, last[producer]);
        last[producer] = Some(raw);
    }

    for producer in producers {
        producer.join().unwrap();
    }
    assert_eq!(watcher.try_wait().unwrap(), None);
}

#[test]
fn test_fanout_multicast() {
    every_watcher_sees_every_emission::<FanoutQueue>();
    concurrent_watchers_keep_producer_order::<FanoutQueue>();
    many_producers_each_keep_their_order::<FanoutQueue>();
}

#[test]
fn test_linked_multicast() {
    every_watcher_sees_every_emission::<LinkedQueue>();
    concurrent_watchers_keep_producer_order::<LinkedQueue>();
    many_producers_each_keep_their_order::<LinkedQueue>();
}

#[test]
fn test_lockfree_multicast() {
    every_watcher_sees_every_emission::<LockFreeQueue>();
    concurrent_watchers_keep_producer_order::<LockFreeQueue>();
    many_producers_each_keep_their_order::<LockFreeQueue>();
}
