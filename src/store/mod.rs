//! Event-driven state store with typed deep-merge updates.
//!
//! Holds one snapshot of a state shape, merges partial updates into it and
//! fans the new snapshot out to the handlers registered for the update's
//! event. Events are a closed enum; the string-keyed entry points exist for
//! boundaries that only have a name.

#[macro_use]
mod macros;
mod event;
mod merge;
mod state_store;


pub use event::{StoreError, StoreEvent};
pub use merge::Merge;
pub use state_store::{Handler, StateStore};
