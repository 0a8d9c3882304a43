/*!
 * Bounded Ring Strategy
 * One fixed-capacity lock-free MPMC ring per signal
 *
 * # Delivery
 *
 * This strategy is **consumable**, not multicast: every payload is popped by
 * exactly one cursor. With one watcher per (source, signal) it satisfies the
 * broadcast contract; with several watchers on the same signal they compete
 * and each sees only part of the stream. `DELIVERY` reports this so callers
 * can restrict topologies instead of discovering the difference.
 *
 * The ring has no per-watcher position. Payloads nobody has popped yet stay
 * in it, so a watcher that subscribes late receives that backlog, including
 * payloads emitted before it existed. Multicast strategies never replay.
 *
 * A full ring makes `push` retry with backoff until a consumer frees a slot;
 * there is no back-pressure signal to the caller.
 */

use super::traits::{BroadcastQueue, QueueCursor, QueueSlot};
use crate::core::sync::{spin_until, Backoff, SyncConfig};
use crate::core::types::{Delivery, Payload, SignalName, SignalResult};
use crossbeam_queue::ArrayQueue;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Bounded ring for one signal
pub struct RingQueue {
    signal: SignalName,
    items: ArrayQueue<Payload>,
    config: SyncConfig,
}

impl RingQueue {
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Items pushed but not yet popped by any cursor
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl BroadcastQueue for RingQueue {
    type Shared = ();
    type Cursor = RingCursor;

    const NAME: &'static str = "ring";
    const DELIVERY: Delivery = Delivery::Consumable;

    fn shared(_signal_count: usize, _config: &SyncConfig) -> Self::Shared {}

    fn new(_shared: &Arc<Self::Shared>, slot: QueueSlot, config: &SyncConfig) -> Self {
        Self {
            signal: slot.signal,
            // Capacity is validated to be positive before any queue is built
            items: ArrayQueue::new(config.ring_capacity),
            config: config.clone(),
        }
    }

    fn push(&self, payload: Payload) -> SignalResult<()> {
        let mut item = payload;
        let mut backoff = Backoff::new(&self.config);
        let mut reported = false;

        while let Err(rejected) = self.items.push(item) {
            item = rejected;
            if !reported {
                debug!(
                    signal = %self.signal,
                    capacity = self.items.capacity(),
                    "ring full, producer retrying"
                );
                reported = true;
            }
            backoff.snooze();
        }
        Ok(())
    }

    fn subscribe(self: &Arc<Self>) -> Self::Cursor {
        RingCursor {
            queue: self.clone(),
        }
    }
}

/// Competing consumer handle
pub struct RingCursor {
    queue: Arc<RingQueue>,
}

impl QueueCursor for RingCursor {
    fn wait(&mut self) -> SignalResult<Payload> {
        let queue = &self.queue;
        let payload = spin_until(&queue.config, None, || queue.items.pop());
        // An unbounded spin only returns with a value
        Ok(payload.unwrap_or_default())
    }

    fn try_wait(&mut self) -> SignalResult<Option<Payload>> {
        Ok(self.queue.items.pop())
    }

    fn wait_timeout(&mut self, timeout: Duration) -> SignalResult<Option<Payload>> {
        let queue = &self.queue;
        Ok(spin_until(
            &queue.config,
            Instant::now().checked_add(timeout),
            || queue.items.pop(),
        ))
    }
}
