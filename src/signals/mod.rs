/*!
 * Signal Broadcast Library
 *
 * Named signals emitted by a `SignalSource` and observed by `SignalWatcher`s.
 * The synchronization between them is pluggable:
 *
 * - `FanoutQueue`: per-watcher inbox, mutex + condvar (multicast)
 * - `LinkedQueue`: shared linked log, source-wide mutex + timed wait (multicast)
 * - `LockFreeQueue`: CAS-appended shared log, spinning cursors (multicast)
 * - `RingQueue`: bounded lock-free ring, competing consumers (consumable)
 *
 * # Example
 *
 * ```
 * use signal_broadcast::signals::{FanoutQueue, SignalSource};
 * use signal_broadcast::Payload;
 *
 * let source = SignalSource::<FanoutQueue>::new(&["signal_1"]).unwrap();
 * let mut watcher = source.watch("signal_1").unwrap();
 *
 * source.emit("signal_1", Payload::new(10)).unwrap();
 * assert_eq!(watcher.wait().unwrap(), Payload::new(10));
 * ```
 */

mod fanout;
mod linked;
mod lockfree;
mod ring;
mod source;
mod traits;

pub use fanout::{FanoutCursor, FanoutQueue};
pub use linked::{LinkedCursor, LinkedQueue, LinkedShared};
pub use lockfree::{LockFreeCursor, LockFreeQueue};
pub use ring::{RingCursor, RingQueue};
pub use source::{SignalSource, SignalWatcher};
pub use traits::{BroadcastQueue, QueueCursor, QueueSlot};
