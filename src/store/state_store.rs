use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::trace;

use super::{Merge, StoreError, StoreEvent};

/// A subscriber callback. Receives the snapshot produced by the publish
/// that triggered it.
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Holds the current snapshot of `T` and the handlers registered per event.
///
/// `publish` merges a patch into a copy of the snapshot, swaps it in, and
/// then calls the event's handlers in registration order. No lock is held
/// while handlers run, so a handler may publish again; the nested publish
/// finishes its own fan-out before the outer one continues with the handler
/// list it captured at the start.
pub struct StateStore<T, E> {
    snapshot: RwLock<Arc<T>>,
    handlers: RwLock<HashMap<E, Vec<Handler<T>>>>,
}

impl<T, E> StateStore<T, E>
where
    T: Merge + Clone + Send + Sync + 'static,
    E: StoreEvent,
{
    /// Creates a store holding `initial` with no subscribers.
    pub fn new(initial: T) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(initial)),
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `handler` for `event`. Handlers for the same event run in
    /// the order they were registered.
    pub fn subscribe<F>(&self, event: E, handler: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        write(&self.handlers)
            .entry(event)
            .or_default()
            .push(Arc::new(handler));
    }

    /// Merges `patch` into the current snapshot and notifies the handlers
    /// registered for `event` with the new snapshot.
    pub fn publish(&self, event: E, patch: T::Patch) {
        let next = {
            let mut current = write(&self.snapshot);
            let mut next = T::clone(&current);
            next.merge(patch);
            let next = Arc::new(next);
            *current = Arc::clone(&next);
            next
        };

        let handlers = self.handlers_for(event);
        trace!(event = event.name(), handlers = handlers.len(), "Publishing update");

        for handler in handlers {
            handler(&next);
        }
    }

    /// Returns an independent copy of the snapshot as it is right now.
    pub fn current_state(&self) -> T {
        T::clone(&read(&self.snapshot))
    }

    /// Registers a handler for an event given by name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownEvent` if `name` is not one of `E`'s
    /// events; nothing is registered in that case.
    pub fn subscribe_named<F>(&self, name: &str, handler: F) -> Result<(), StoreError>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let event = E::from_name(name)?;
        self.subscribe(event, handler);
        Ok(())
    }

    /// Publishes to an event given by name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownEvent` if `name` is not one of `E`'s
    /// events; the snapshot is left unchanged in that case.
    pub fn publish_named(&self, name: &str, patch: T::Patch) -> Result<(), StoreError> {
        let event = E::from_name(name)?;
        self.publish(event, patch);
        Ok(())
    }

    fn handlers_for(&self, event: E) -> Vec<Handler<T>> {
        read(&self.handlers)
            .get(&event)
            .cloned()
            .unwrap_or_default()
    }
}

fn read<V>(lock: &RwLock<V>) -> RwLockReadGuard<'_, V> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write<V>(lock: &RwLock<V>) -> RwLockWriteGuard<'_, V> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
