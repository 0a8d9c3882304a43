/*!
 * Fan-out Strategy
 * Every watcher owns a private FIFO inbox guarded by its own mutex/condvar
 *
 * # Design
 *
 * `push` copies the payload into the inbox of every watcher currently
 * subscribed to the signal. Cost is O(watchers) per emission, but contention
 * is per watcher: a slow watcher never blocks unrelated ones.
 *
 * The watcher set is read under the signal's `RwLock`, so subscribing while
 * producers run is safe and the new watcher sees only later emissions.
 * Inboxes are held weakly; a dropped watcher is pruned on the next push, and
 * an unsubscribed one is pruned immediately.
 *
 * # Ordering
 *
 * Each producer delivers to the inboxes in its own loop, so two concurrent
 * producers of the same signal may interleave differently in different
 * inboxes. Emissions from one producer always arrive in emission order.
 */

use super::traits::{BroadcastQueue, QueueCursor, QueueSlot};
use crate::core::sync::SyncConfig;
use crate::core::types::{Delivery, Payload, SignalName, SignalResult};
use parking_lot::{Condvar, Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::trace;

/// A watcher's private unbounded FIFO
struct Inbox {
    items: Mutex<VecDeque<Payload>>,
    ready: Condvar,
}

impl Inbox {
    fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            ready: Condvar::new(),
        }
    }

    #[inline]
    fn deliver(&self, payload: Payload) {
        self.items.lock().push_back(payload);
        // Exactly one thread waits per inbox (the cursor owner)
        self.ready.notify_one();
    }
}

/// Fan-out queue for one signal
pub struct FanoutQueue {
    signal: SignalName,
    watchers: RwLock<Vec<Weak<Inbox>>>,
}

impl FanoutQueue {
    /// Number of live watchers
    pub fn watcher_count(&self) -> usize {
        self.watchers
            .read()
            .iter()
            .filter(|inbox| inbox.strong_count() > 0)
            .count()
    }

    fn prune(&self) {
        let mut watchers = self.watchers.write();
        let before = watchers.len();
        watchers.retain(|inbox| inbox.strong_count() > 0);
        trace!(
            signal = %self.signal,
            removed = before - watchers.len(),
            "pruned dropped watchers"
        );
    }
}

impl BroadcastQueue for FanoutQueue {
    type Shared = ();
    type Cursor = FanoutCursor;

    const NAME: &'static str = "fanout";
    const DELIVERY: Delivery = Delivery::Multicast;

    fn shared(_signal_count: usize, _config: &SyncConfig) -> Self::Shared {}

    fn new(_shared: &Arc<Self::Shared>, slot: QueueSlot, _config: &SyncConfig) -> Self {
        Self {
            signal: slot.signal,
            watchers: RwLock::new(Vec::new()),
        }
    }

    fn push(&self, payload: Payload) -> SignalResult<()> {
        let mut stale = false;
        {
            let watchers = self.watchers.read();
            for inbox in watchers.iter() {
                match inbox.upgrade() {
                    Some(inbox) => inbox.deliver(payload),
                    None => stale = true,
                }
            }
        }

        if stale {
            self.prune();
        }
        Ok(())
    }

    fn subscribe(self: &Arc<Self>) -> Self::Cursor {
        let inbox = Arc::new(Inbox::new());
        self.watchers.write().push(Arc::downgrade(&inbox));
        FanoutCursor {
            queue: self.clone(),
            inbox,
        }
    }
}

/// Watcher handle owning its inbox
pub struct FanoutCursor {
    queue: Arc<FanoutQueue>,
    inbox: Arc<Inbox>,
}

impl QueueCursor for FanoutCursor {
    fn wait(&mut self) -> SignalResult<Payload> {
        let mut items = self.inbox.items.lock();
        loop {
            if let Some(payload) = items.pop_front() {
                return Ok(payload);
            }
            self.inbox.ready.wait(&mut items);
        }
    }

    fn try_wait(&mut self) -> SignalResult<Option<Payload>> {
        Ok(self.inbox.items.lock().pop_front())
    }

    fn wait_timeout(&mut self, timeout: Duration) -> SignalResult<Option<Payload>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait().map(Some);
        };
        let mut items = self.inbox.items.lock();
        loop {
            if let Some(payload) = items.pop_front() {
                return Ok(Some(payload));
            }
            if self.inbox.ready.wait_until(&mut items, deadline).timed_out() {
                return Ok(items.pop_front());
            }
        }
    }

    fn unsubscribe(self) {
        let FanoutCursor { queue, inbox } = self;
        drop(inbox);
        queue.prune();
    }
}
