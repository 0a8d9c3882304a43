/*!
 * Isolation Tests
 * Signals, sources and late subscribers never see foreign emissions
 */

use signal_broadcast::signals::{
    BroadcastQueue, FanoutQueue, LinkedQueue, LockFreeQueue, RingQueue, SignalSource,
};
use signal_broadcast::{Delivery, Payload, SignalError};

fn per_signal_isolation<Q: BroadcastQueue>() {
    let source = SignalSource::<Q>::new(&["signal_1", "signal_2"]).unwrap();
    let mut first = source.watch("signal_1").unwrap();
    let mut second = source.watch("signal_2").unwrap();

    source.emit("signal_2", Payload::new(2)).unwrap();
    assert_eq!(first.try_wait().unwrap(), None, "{}", Q::NAME);

    source.emit("signal_1", Payload::new(1)).unwrap();
    assert_eq!(first.wait().unwrap(), Payload::new(1), "{}", Q::NAME);
    assert_eq!(second.wait().unwrap(), Payload::new(2), "{}", Q::NAME);
}

fn cross_source_isolation<Q: BroadcastQueue>() {
    let left = SignalSource::<Q>::new(&["signal_1"]).unwrap();
    let right = SignalSource::<Q>::new(&["signal_1"]).unwrap();
    let mut on_left = left.watch("signal_1").unwrap();
    let mut on_right = right.watch("signal_1").unwrap();

    right.emit("signal_1", Payload::new(7)).unwrap();
    assert_eq!(on_left.try_wait().unwrap(), None, "{}", Q::NAME);
    assert_eq!(on_right.wait().unwrap(), Payload::new(7), "{}", Q::NAME);
}

fn late_watcher<Q: BroadcastQueue>() {
    let source = SignalSource::<Q>::new(&["signal_1"]).unwrap();
    let _early = source.watch("signal_1").unwrap();
    source.emit("signal_1", Payload::new(1)).unwrap();

    let mut late = source.watch("signal_1").unwrap();
    let backlog = late.try_wait().unwrap();
    match Q::DELIVERY {
        Delivery::Multicast => assert_eq!(backlog, None, "{}", Q::NAME),
        // Nothing popped the payload, so the shared ring still holds it
        Delivery::Consumable => assert_eq!(backlog, Some(Payload::new(1)), "{}", Q::NAME),
    }

    source.emit("signal_1", Payload::new(2)).unwrap();
    assert_eq!(late.wait().unwrap(), Payload::new(2), "{}", Q::NAME);
}

fn unknown_signal<Q: BroadcastQueue>() {
    let source = SignalSource::<Q>::new(&["signal_1"]).unwrap();
    assert_eq!(
        source.emit("signal_9", Payload::new(1)),
        Err(SignalError::UnknownSignal("signal_9".into()))
    );
    assert!(matches!(
        source.watch("signal_9"),
        Err(SignalError::UnknownSignal(_))
    ));
}

fn run_all<Q: BroadcastQueue>() {
    per_signal_isolation::<Q>();
    cross_source_isolation::<Q>();
    late_watcher::<Q>();
    unknown_signal::<Q>();
}

#[test]
fn test_fanout_isolation() {
    run_all::<FanoutQueue>();
}

#[test]
fn test_linked_isolation() {
    run_all::<LinkedQueue>();
}

#[test]
fn test_lockfree_isolation() {
    run_all::<LockFreeQueue>();
}

#[test]
fn test_ring_isolation() {
    run_all::<RingQueue>();
}

#[test]
fn test_linked_late_watcher_on_busy_log() {
    let source = SignalSource::<LinkedQueue>::new(&["signal_1", "signal_2"]).unwrap();
    for n in 0..100 {
        source.emit("signal_1", Payload::new(n)).unwrap();
        source.emit("signal_2", Payload::new(n)).unwrap();
    }

    let mut late = source.watch("signal_1").unwrap();
    assert_eq!(late.try_wait().unwrap(), None);

    source.emit("signal_1", Payload::new(500)).unwrap();
    assert_eq!(late.wait().unwrap(), Payload::new(500));
}

#[test]
fn test_ring_late_watcher_pops_earlier_emission() {
    let source = SignalSource::<RingQueue>::new(&["signal_1"]).unwrap();
    let mut early = source.watch("signal_1").unwrap();
    source.emit("signal_1", Payload::new(1)).unwrap();

    let mut late = source.watch("signal_1").unwrap();

    assert_eq!(late.try_wait(), Ok(Some(Payload::new(1))));
    assert_eq!(early.try_wait(), Ok(None));
}

#[test]
fn test_unsubscribed_watcher_stops_counting() {
    let source = SignalSource::<FanoutQueue>::new(&["signal_1"]).unwrap();
    let mut staying = source.watch("signal_1").unwrap();
    let leaving = source.watch("signal_1").unwrap();
    let queue = source.queue("signal_1").unwrap();
    assert_eq!(queue.watcher_count(), 2);

    leaving.unsubscribe();
    assert_eq!(queue.watcher_count(), 1);

    source.emit("signal_1", Payload::new(4)).unwrap();
    assert_eq!(staying.wait().unwrap(), Payload::new(4));
}
