/*!
 * Lock-Free Broadcast Log
 * Shared circular log updated with compare-and-swap, read through per-watcher cursors
 *
 * # Design
 *
 * A sentinel root anchors a circular doubly linked list:
 * - `root.prev` is the tail and the only CAS target
 * - a node's `next` is the root until its successor is linked
 *
 * `push` swings `root.prev` from the observed tail to the new node, then
 * stores `old_tail.next = node`. Between the two steps the node is reachable
 * backward but not forward, so readers wait on `next` instead of assuming the
 * link appears instantly.
 *
 * # Memory ordering
 *
 * Node fields are written before the node is published. Publication happens
 * through a release CAS on `root.prev` and a release store of `old_tail.next`;
 * readers load both with acquire, so a visible pointer implies visible data.
 *
 * # Reclamation
 *
 * Nodes are never freed while the queue is alive. Cursors hold an `Arc` of
 * the queue, so the queue (and every node) outlives all of them; `Drop` frees
 * the whole chain with exclusive access.
 */

use super::traits::{BroadcastQueue, QueueCursor, QueueSlot};
use crate::core::sync::{spin_until, SyncConfig};
use crate::core::types::{Delivery, Payload, SignalName, SignalResult};
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

struct LogNode {
    payload: Payload,
    next: AtomicPtr<LogNode>,
    prev: AtomicPtr<LogNode>,
}

impl LogNode {
    fn new(payload: Payload, root: *mut LogNode) -> Self {
        Self {
            payload,
            next: AtomicPtr::new(root),
            prev: AtomicPtr::new(root),
        }
    }
}

/// Lock-free log for one signal
pub struct LockFreeQueue {
    signal: SignalName,
    root: Box<LogNode>,
    /// Extra CAS attempts caused by concurrent producers (diagnostics only)
    contention: AtomicUsize,
    config: SyncConfig,
}

impl LockFreeQueue {
    #[inline]
    fn root_ptr(&self) -> *mut LogNode {
        ptr::addr_of!(*self.root).cast_mut()
    }

    /// CAS retries observed so far
    pub fn contention(&self) -> usize {
        self.contention.load(Ordering::Relaxed)
    }
}

impl BroadcastQueue for LockFreeQueue {
    type Shared = ();
    type Cursor = LockFreeCursor;

    const NAME: &'static str = "lockfree";
    const DELIVERY: Delivery = Delivery::Multicast;

    fn shared(_signal_count: usize, _config: &SyncConfig) -> Self::Shared {}

    fn new(_shared: &Arc<Self::Shared>, slot: QueueSlot, config: &SyncConfig) -> Self {
        let root = Box::new(LogNode::new(Payload::default(), ptr::null_mut()));
        let root_ptr = ptr::addr_of!(*root).cast_mut();
        root.next.store(root_ptr, Ordering::Relaxed);
        root.prev.store(root_ptr, Ordering::Relaxed);

        Self {
            signal: slot.signal,
            root,
            contention: AtomicUsize::new(0),
            config: config.clone(),
        }
    }

    fn push(&self, payload: Payload) -> SignalResult<()> {
        let root = self.root_ptr();
        let node = Box::into_raw(Box::new(LogNode::new(payload, root)));

        let mut tail = self.root.prev.load(Ordering::Acquire);
        loop {
            // SAFETY: `node` is not yet published; only this thread can see it.
            unsafe { (*node).prev.store(tail, Ordering::Relaxed) };

            match self
                .root
                .prev
                .compare_exchange_weak(tail, node, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => break,
                Err(current) => {
                    self.contention.fetch_add(1, Ordering::Relaxed);
                    tail = current;
                }
            }
        }

        // SAFETY: `tail` is the root or a node owned by this queue; nodes are
        // only freed in `Drop`, which cannot run while `&self` is borrowed.
        unsafe { (*tail).next.store(node, Ordering::Release) };
        Ok(())
    }

    fn subscribe(self: &Arc<Self>) -> Self::Cursor {
        let last = self.root.prev.load(Ordering::Acquire);
        trace!(signal = %self.signal, "lock-free cursor created");
        LockFreeCursor {
            queue: self.clone(),
            last,
        }
    }
}

impl Drop for LockFreeQueue {
    fn drop(&mut self) {
        let root = self.root_ptr();
        // Exclusive access: every push has completed, so all forward links are set
        let mut current = self.root.next.load(Ordering::Acquire);
        while current != root {
            // SAFETY: every non-root node came from `Box::into_raw` in `push`
            // and is reachable exactly once along the forward chain.
            let node = unsafe { Box::from_raw(current) };
            current = node.next.load(Ordering::Acquire);
        }
    }
}

/// Watcher position: the last node it consumed (or the root)
pub struct LockFreeCursor {
    queue: Arc<LockFreeQueue>,
    last: *mut LogNode,
}

// SAFETY: `last` points into the queue held by `queue`, which keeps it alive;
// the node is only read through atomics and its immutable payload.
unsafe impl Send for LockFreeCursor {}

impl LockFreeCursor {
    /// Step forward if the successor of `last` is linked
    #[inline]
    fn poll(&mut self) -> Option<Payload> {
        // SAFETY: `last` is the root or a published node of `self.queue`.
        let next = unsafe { (*self.last).next.load(Ordering::Acquire) };
        if next == self.queue.root_ptr() {
            return None;
        }
        self.last = next;
        // SAFETY: `next` was published with release ordering after its payload was written.
        Some(unsafe { (*next).payload })
    }
}

impl QueueCursor for LockFreeCursor {
    fn wait(&mut self) -> SignalResult<Payload> {
        let config = self.queue.config.clone();
        let payload = spin_until(&config, None, || self.poll());
        // An unbounded spin only returns with a value
        Ok(payload.unwrap_or_default())
    }

    fn try_wait(&mut self) -> SignalResult<Option<Payload>> {
        Ok(self.poll())
    }

    fn wait_timeout(&mut self, timeout: Duration) -> SignalResult<Option<Payload>> {
        let config = self.queue.config.clone();
        Ok(spin_until(&config, Instant::now().checked_add(timeout), || {
            self.poll()
        }))
    }
}
