/*!
 * Broadcast Queue Contract
 *
 * Every strategy implements the same two traits:
 * - `BroadcastQueue`: the per-signal shared object producers push into
 * - `QueueCursor`: a watcher's private position in that queue
 *
 * # Guarantees
 *
 * - A cursor only observes payloads pushed after it was created (no replay)
 * - A cursor never yields the same payload twice and never skips one
 * - Payloads pushed by one thread reach every cursor in that thread's order
 *
 * The interleaving of concurrent pushes from different threads is not
 * guaranteed to be the same for every cursor. The log-based strategies
 * (`linked`, `lockfree`) append to one shared sequence, so all their cursors
 * agree. `fanout` copies into each inbox separately and two watchers may see
 * two concurrent producers interleaved differently.
 *
 * `Delivery::Consumable` queues relax the "every cursor" part: competing
 * cursors share one stream and each payload reaches exactly one of them.
 * They also keep unconsumed payloads for whoever subscribes next, so a late
 * cursor can be handed items pushed before it existed.
 */

use crate::core::sync::SyncConfig;
use crate::core::types::{Delivery, Payload, SignalName, SignalResult};
use std::sync::Arc;
use std::time::Duration;

/// Position of a queue within its source
#[derive(Debug, Clone)]
pub struct QueueSlot {
    /// Registration index of the signal (0-based)
    pub index: usize,
    /// Signal the queue carries
    pub signal: SignalName,
}

/// Per-signal synchronization object
pub trait BroadcastQueue: Send + Sync + Sized + 'static {
    /// State shared by all queues of one source (e.g. a source-wide lock)
    type Shared: Send + Sync + 'static;

    /// Watcher-side handle created by `subscribe`
    type Cursor: QueueCursor;

    /// Identifier used by the strategy registry
    const NAME: &'static str;

    /// Delivery semantics across multiple cursors
    const DELIVERY: Delivery;

    /// Build the source-wide state for `signal_count` signals
    fn shared(signal_count: usize, config: &SyncConfig) -> Self::Shared;

    /// Build the queue occupying `slot` in its source
    fn new(shared: &Arc<Self::Shared>, slot: QueueSlot, config: &SyncConfig) -> Self;

    /// Append a payload as the newest item
    fn push(&self, payload: Payload) -> SignalResult<()>;

    /// Create a cursor positioned after the newest item
    fn subscribe(self: &Arc<Self>) -> Self::Cursor;
}

/// Watcher-private reading position
pub trait QueueCursor: Send + 'static {
    /// Block until the next payload is available, return it and advance
    fn wait(&mut self) -> SignalResult<Payload>;

    /// Return the next payload if it is already available
    fn try_wait(&mut self) -> SignalResult<Option<Payload>>;

    /// Like `wait`, but give up after `timeout` and leave the cursor in place
    ///
    /// A timeout too large to express as a deadline waits without one.
    fn wait_timeout(&mut self, timeout: Duration) -> SignalResult<Option<Payload>>;

    /// Stop watching; the queue forgets this cursor
    fn unsubscribe(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}
