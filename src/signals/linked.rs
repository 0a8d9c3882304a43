/*!
 * Linked Log Strategy
 * One circular doubly linked log per signal behind a source-wide lock
 *
 * # Design
 *
 * All logs of a source share one mutex and one condition variable. `push`
 * links a new tail and broadcasts; watchers whose cursor sits on the tail
 * wait with a bounded timeout. Every expiry logs a stall warning and retries,
 * up to `SyncConfig::max_wait_retries`.
 *
 * Nodes live in an index arena and are never reclaimed while the source is
 * alive. Benchmark runs emit a bounded number of signals, so the log simply
 * grows; a long-lived service would need reclamation once no cursor can reach
 * a node.
 */

use super::traits::{BroadcastQueue, QueueCursor, QueueSlot};
use crate::core::errors::SignalError;
use crate::core::sync::SyncConfig;
use crate::core::types::{Delivery, Payload, SignalName, SignalResult};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Arena index of a node
type NodeId = usize;

/// Index of the first node ever appended; its `prev` is the tail
const HEAD: NodeId = 0;

struct LinkedNode {
    payload: Payload,
    next: NodeId,
    prev: NodeId,
}

/// Circular doubly linked log of one signal
#[derive(Default)]
struct LinkedLog {
    nodes: Vec<LinkedNode>,
}

impl LinkedLog {
    #[inline]
    fn tail(&self) -> Option<NodeId> {
        self.nodes.first().map(|head| head.prev)
    }

    fn append(&mut self, payload: Payload) {
        let id = self.nodes.len();
        match self.tail() {
            None => self.nodes.push(LinkedNode {
                payload,
                next: id,
                prev: id,
            }),
            Some(tail) => {
                self.nodes.push(LinkedNode {
                    payload,
                    next: HEAD,
                    prev: tail,
                });
                self.nodes[tail].next = id;
                self.nodes[HEAD].prev = id;
            }
        }
    }

    /// Node following the cursor, if one has been appended
    #[inline]
    fn after(&self, last_seen: Option<NodeId>) -> Option<NodeId> {
        match last_seen {
            None => self.tail().map(|_| HEAD),
            Some(id) if Some(id) == self.tail() => None,
            Some(id) => Some(self.nodes[id].next),
        }
    }
}

/// Source-wide lock and wakeup shared by every linked queue
pub struct LinkedShared {
    logs: Mutex<Vec<LinkedLog>>,
    event: Condvar,
}

/// Linked log queue for one signal
pub struct LinkedQueue {
    shared: Arc<LinkedShared>,
    slot: QueueSlot,
    wait_timeout: Duration,
    max_wait_retries: Option<u32>,
}

impl LinkedQueue {
    /// Number of nodes appended so far (never decreases)
    pub fn len(&self) -> usize {
        self.shared.logs.lock()[self.slot.index].nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn signal(&self) -> &SignalName {
        &self.slot.signal
    }
}

impl BroadcastQueue for LinkedQueue {
    type Shared = LinkedShared;
    type Cursor = LinkedCursor;

    const NAME: &'static str = "linked";
    const DELIVERY: Delivery = Delivery::Multicast;

    fn shared(signal_count: usize, _config: &SyncConfig) -> Self::Shared {
        LinkedShared {
            logs: Mutex::new((0..signal_count).map(|_| LinkedLog::default()).collect()),
            event: Condvar::new(),
        }
    }

    fn new(shared: &Arc<Self::Shared>, slot: QueueSlot, config: &SyncConfig) -> Self {
        Self {
            shared: shared.clone(),
            slot,
            wait_timeout: config.wait_timeout,
            max_wait_retries: config.max_wait_retries,
        }
    }

    fn push(&self, payload: Payload) -> SignalResult<()> {
        let mut logs = self.shared.logs.lock();
        logs[self.slot.index].append(payload);
        // Watchers of every signal share this condvar
        self.shared.event.notify_all();
        Ok(())
    }

    fn subscribe(self: &Arc<Self>) -> Self::Cursor {
        let last_seen = self.shared.logs.lock()[self.slot.index].tail();
        LinkedCursor {
            queue: self.clone(),
            last_seen,
        }
    }
}

/// Watcher position: the last node it consumed
pub struct LinkedCursor {
    queue: Arc<LinkedQueue>,
    last_seen: Option<NodeId>,
}

impl LinkedCursor {
    /// Advance past the next node under the held lock
    #[inline]
    fn advance(&mut self, log: &LinkedLog) -> Option<Payload> {
        let next = log.after(self.last_seen)?;
        self.last_seen = Some(next);
        Some(log.nodes[next].payload)
    }
}

impl QueueCursor for LinkedCursor {
    fn wait(&mut self) -> SignalResult<Payload> {
        let queue = self.queue.clone();
        let index = queue.slot.index;
        let mut logs = queue.shared.logs.lock();
        let mut retries = 0u32;

        loop {
            if let Some(payload) = self.advance(&logs[index]) {
                return Ok(payload);
            }

            if queue
                .shared
                .event
                .wait_for(&mut logs, queue.wait_timeout)
                .timed_out()
            {
                retries += 1;
                warn!(
                    signal = %queue.slot.signal,
                    retries,
                    timeout_ms = queue.wait_timeout.as_millis() as u64,
                    "waiting for the next signal is out of time"
                );
                if queue.max_wait_retries.is_some_and(|max| retries >= max) {
                    // A push may have landed between the expiry and relocking
                    if let Some(payload) = self.advance(&logs[index]) {
                        return Ok(payload);
                    }
                    return Err(SignalError::WaitTimedOut {
                        signal: queue.slot.signal.to_string(),
                        retries,
                    });
                }
            }
        }
    }

    fn try_wait(&mut self) -> SignalResult<Option<Payload>> {
        let queue = self.queue.clone();
        let logs = queue.shared.logs.lock();
        Ok(self.advance(&logs[queue.slot.index]))
    }

    fn wait_timeout(&mut self, timeout: Duration) -> SignalResult<Option<Payload>> {
        let deadline = Instant::now().checked_add(timeout);
        let queue = self.queue.clone();
        let index = queue.slot.index;
        let mut logs = queue.shared.logs.lock();

        loop {
            if let Some(payload) = self.advance(&logs[index]) {
                return Ok(Some(payload));
            }
            match deadline {
                Some(deadline) => {
                    if queue.shared.event.wait_until(&mut logs, deadline).timed_out() {
                        return Ok(self.advance(&logs[index]));
                    }
                }
                // No representable deadline: wait without the stall retries of `wait`
                None => queue.shared.event.wait(&mut logs),
            }
        }
    }
}
