/*!
 * Strategy Interface
 *
 * Object-safe view of a signal strategy: construct-source, construct-watcher,
 * emit and wait. The benchmark driver only ever talks to these traits, so
 * the strategy is picked at run start without recompiling the driver.
 */

use crate::core::sync::SyncConfig;
use crate::core::types::{CallbackId, Delivery, Payload, SignalCallback, SignalName, SignalResult};
use crate::signals::{BroadcastQueue, SignalSource, SignalWatcher};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A selectable synchronization strategy
pub trait Strategy: Send + Sync {
    /// Registry identifier
    fn name(&self) -> &'static str;

    fn delivery(&self) -> Delivery;

    /// Construct a source registered for `signals`
    fn source(&self, signals: &[SignalName]) -> SignalResult<Arc<dyn SourceHandle>>;
}

/// Type-erased signal source
pub trait SourceHandle: Send + Sync {
    fn signals(&self) -> &[SignalName];

    fn emit(&self, signal: &str, payload: Payload) -> SignalResult<()>;

    /// Construct a watcher bound to `signal` on this source
    fn watch(&self, signal: &str) -> SignalResult<Box<dyn WatcherHandle>>;

    fn callback(&self, signal: &str, callback: SignalCallback) -> SignalResult<CallbackId>;

    fn remove_callback(&self, signal: &str, id: CallbackId) -> SignalResult<bool>;
}

/// Type-erased signal watcher
pub trait WatcherHandle: Send {
    fn signal(&self) -> &SignalName;

    fn wait(&mut self) -> SignalResult<Payload>;

    fn try_wait(&mut self) -> SignalResult<Option<Payload>>;

    fn unsubscribe(self: Box<Self>);
}

impl<Q: BroadcastQueue> SourceHandle for SignalSource<Q> {
    fn signals(&self) -> &[SignalName] {
        SignalSource::signals(self)
    }

    #[inline]
    fn emit(&self, signal: &str, payload: Payload) -> SignalResult<()> {
        SignalSource::emit(self, signal, payload)
    }

    fn watch(&self, signal: &str) -> SignalResult<Box<dyn WatcherHandle>> {
        Ok(Box::new(SignalSource::watch(self, signal)?))
    }

    fn callback(&self, signal: &str, callback: SignalCallback) -> SignalResult<CallbackId> {
        SignalSource::register_callback(self, signal, callback)
    }

    fn remove_callback(&self, signal: &str, id: CallbackId) -> SignalResult<bool> {
        SignalSource::remove_callback(self, signal, id)
    }
}

impl<Q: BroadcastQueue> WatcherHandle for SignalWatcher<Q> {
    fn signal(&self) -> &SignalName {
        SignalWatcher::signal(self)
    }

    #[inline]
    fn wait(&mut self) -> SignalResult<Payload> {
        SignalWatcher::wait(self)
    }

    fn try_wait(&mut self) -> SignalResult<Option<Payload>> {
        SignalWatcher::try_wait(self)
    }

    fn unsubscribe(self: Box<Self>) {
        SignalWatcher::unsubscribe(*self)
    }
}

/// Strategy backed by queue type `Q`
pub struct QueueStrategy<Q> {
    config: SyncConfig,
    _queue: PhantomData<fn() -> Q>,
}

impl<Q: BroadcastQueue> QueueStrategy<Q> {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            _queue: PhantomData,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}

impl<Q: BroadcastQueue> Strategy for QueueStrategy<Q> {
    fn name(&self) -> &'static str {
        Q::NAME
    }

    fn delivery(&self) -> Delivery {
        Q::DELIVERY
    }

    fn source(&self, signals: &[SignalName]) -> SignalResult<Arc<dyn SourceHandle>> {
        Ok(Arc::new(SignalSource::<Q>::with_config(signals, &self.config)?))
    }
}

impl<Q: BroadcastQueue> fmt::Debug for QueueStrategy<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueStrategy")
            .field("name", &Q::NAME)
            .field("delivery", &Q::DELIVERY)
            .finish()
    }
}
