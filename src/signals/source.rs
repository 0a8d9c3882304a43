/*!
 * Signal Source and Watcher
 *
 * A source owns one queue per registered signal name. The name-to-queue map
 * is built once in the constructor and never mutated afterward, so lookups
 * take no lock; all contention lives inside the queues.
 *
 * Each signal may also carry callbacks. `emit` runs them on the emitting
 * thread after the payload is queued, so a callback never observes a payload
 * its watchers cannot yet receive.
 */

use super::traits::{BroadcastQueue, QueueCursor, QueueSlot};
use crate::core::errors::SignalError;
use crate::core::sync::SyncConfig;
use crate::core::types::{CallbackId, Delivery, Payload, SignalCallback, SignalName, SignalResult};
use ahash::HashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Queue and callbacks registered under one signal name
struct SignalEntry<Q> {
    queue: Arc<Q>,
    callbacks: RwLock<Vec<(CallbackId, SignalCallback)>>,
}

/// Emitter of named signals backed by strategy `Q`
pub struct SignalSource<Q: BroadcastQueue> {
    signals: Vec<SignalName>,
    entries: HashMap<SignalName, SignalEntry<Q>>,
    next_callback: AtomicU64,
}

impl<Q: BroadcastQueue> SignalSource<Q> {
    /// Create a source with the default synchronization config
    pub fn new<S: AsRef<str>>(signals: &[S]) -> SignalResult<Self> {
        Self::with_config(signals, &SyncConfig::default())
    }

    /// Create a source registered for exactly `signals`
    pub fn with_config<S: AsRef<str>>(signals: &[S], config: &SyncConfig) -> SignalResult<Self> {
        config.validate()?;

        let shared = Arc::new(Q::shared(signals.len(), config));
        let mut names = Vec::with_capacity(signals.len());
        let mut entries = HashMap::default();

        for (index, signal) in signals.iter().enumerate() {
            let name: SignalName = Arc::from(signal.as_ref());
            if entries.contains_key(&name) {
                return Err(SignalError::DuplicateSignal(name.to_string()));
            }
            let slot = QueueSlot {
                index,
                signal: name.clone(),
            };
            let entry = SignalEntry {
                queue: Arc::new(Q::new(&shared, slot, config)),
                callbacks: RwLock::new(Vec::new()),
            };
            entries.insert(name.clone(), entry);
            names.push(name);
        }

        debug!(strategy = Q::NAME, signals = names.len(), "signal source created");
        Ok(Self {
            signals: names,
            entries,
            next_callback: AtomicU64::new(1),
        })
    }

    /// Registered signal names, in registration order
    pub fn signals(&self) -> &[SignalName] {
        &self.signals
    }

    pub fn delivery(&self) -> Delivery {
        Q::DELIVERY
    }

    /// Publish `payload` under `signal`, then run its callbacks
    #[inline]
    pub fn emit(&self, signal: &str, payload: Payload) -> SignalResult<()> {
        let (name, entry) = self.entry(signal)?;
        entry.queue.push(payload)?;

        // Snapshot so a callback may register or remove callbacks itself
        let callbacks: Vec<SignalCallback> = {
            let callbacks = entry.callbacks.read();
            if callbacks.is_empty() {
                return Ok(());
            }
            callbacks.iter().map(|(_, callback)| callback.clone()).collect()
        };
        for callback in callbacks {
            callback(name, payload);
        }
        Ok(())
    }

    /// Subscribe to `signal`; the watcher sees only later emissions
    pub fn watch(&self, signal: &str) -> SignalResult<SignalWatcher<Q>> {
        let (name, entry) = self.entry(signal)?;
        Ok(SignalWatcher {
            signal: name.clone(),
            cursor: entry.queue.subscribe(),
        })
    }

    /// Run `callback` for every later emission of `signal`
    pub fn callback<F>(&self, signal: &str, callback: F) -> SignalResult<CallbackId>
    where
        F: Fn(&SignalName, Payload) + Send + Sync + 'static,
    {
        self.register_callback(signal, Arc::new(callback))
    }

    /// Register an already shared callback
    pub fn register_callback(
        &self,
        signal: &str,
        callback: SignalCallback,
    ) -> SignalResult<CallbackId> {
        let (name, entry) = self.entry(signal)?;
        let id = CallbackId::new(self.next_callback.fetch_add(1, Ordering::Relaxed));
        entry.callbacks.write().push((id, callback));
        trace!(signal = %name, callback = id.raw(), "callback registered");
        Ok(id)
    }

    /// Forget a callback; `false` if `id` was not registered under `signal`
    pub fn remove_callback(&self, signal: &str, id: CallbackId) -> SignalResult<bool> {
        let (name, entry) = self.entry(signal)?;
        let mut callbacks = entry.callbacks.write();
        let before = callbacks.len();
        callbacks.retain(|(registered, _)| *registered != id);
        let removed = callbacks.len() != before;
        if removed {
            trace!(signal = %name, callback = id.raw(), "callback removed");
        }
        Ok(removed)
    }

    /// Number of callbacks registered under `signal`
    pub fn callback_count(&self, signal: &str) -> SignalResult<usize> {
        Ok(self.entry(signal)?.1.callbacks.read().len())
    }

    /// Queue carrying `signal`
    pub fn queue(&self, signal: &str) -> SignalResult<&Arc<Q>> {
        Ok(&self.entry(signal)?.1.queue)
    }

    #[inline]
    fn entry(&self, signal: &str) -> SignalResult<(&SignalName, &SignalEntry<Q>)> {
        self.entries
            .get_key_value(signal)
            .ok_or_else(|| SignalError::UnknownSignal(signal.to_string()))
    }
}

impl<Q: BroadcastQueue> fmt::Debug for SignalSource<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalSource")
            .field("strategy", &Q::NAME)
            .field("signals", &self.signals)
            .finish()
    }
}

/// Subscription to one (source, signal) pair
///
/// Holds the strategy's cursor, which keeps the underlying queue alive even
/// if the source itself is dropped.
pub struct SignalWatcher<Q: BroadcastQueue> {
    signal: SignalName,
    cursor: Q::Cursor,
}

impl<Q: BroadcastQueue> SignalWatcher<Q> {
    pub fn signal(&self) -> &SignalName {
        &self.signal
    }

    /// Block until the next emission and return its payload
    #[inline]
    pub fn wait(&mut self) -> SignalResult<Payload> {
        self.cursor.wait()
    }

    /// Return the next payload if one is already pending
    #[inline]
    pub fn try_wait(&mut self) -> SignalResult<Option<Payload>> {
        self.cursor.try_wait()
    }

    /// Wait at most `timeout` for the next payload
    pub fn wait_timeout(&mut self, timeout: Duration) -> SignalResult<Option<Payload>> {
        self.cursor.wait_timeout(timeout)
    }

    /// Stop watching and release this watcher's place in the queue
    pub fn unsubscribe(self) {
        trace!(strategy = Q::NAME, signal = %self.signal, "watcher unsubscribed");
        self.cursor.unsubscribe();
    }
}

impl<Q: BroadcastQueue> fmt::Debug for SignalWatcher<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalWatcher")
            .field("strategy", &Q::NAME)
            .field("signal", &self.signal)
            .finish()
    }
}
