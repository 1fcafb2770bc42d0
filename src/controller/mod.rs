//! Input handling and player synchronisation.
//!
//! [`InputRouter`] turns key actions into store updates and player commands.
//! [`PlayerBridge`] feeds player state into the store by polling and by
//! following the selected player's status pushes.

mod bridge;
mod keys;
mod router;

#[cfg(test)]
mod tests;

pub use bridge::{BridgeSettings, PlayerBridge, reconcile_selection};
pub use keys::{Action, SeekDirection};
pub use router::{Flow, InputRouter, SeekSettings};
