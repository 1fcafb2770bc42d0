use std::{fmt::Debug, hash::Hash};

/// Errors raised by the state store.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// An event name outside the store's closed event set was used.
    #[error("event '{0}' is not in the event list")]
    UnknownEvent(String),
}

/// A closed set of named events a [`StateStore`](super::StateStore) dispatches on.
///
/// Implemented by fieldless enums. Typed code passes variants directly;
/// `from_name` is the only place an unknown event can appear.
pub trait StoreEvent: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every event in the set.
    const ALL: &'static [Self];

    /// Stable name of the event.
    fn name(self) -> &'static str;

    /// Resolves an event by name.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownEvent` if no event has that name.
    fn from_name(name: &str) -> Result<Self, StoreError> {
        Self::ALL
            .iter()
            .copied()
            .find(|event| event.name() == name)
            .ok_or_else(|| StoreError::UnknownEvent(name.to_string()))
    }
}
