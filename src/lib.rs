//! tuneline - Terminal remote and status line for MPRIS media players.
//!
//! tuneline mirrors the selected player's track, position and status in a
//! few rows below the prompt and sends keypresses back to it through
//! `playerctl`:
//!
//! - Event-driven state store with typed partial updates
//! - Full and single-line layouts that adapt to the terminal size
//! - Debounced seeking and player switching from the keyboard
//! - Polling plus push subscription for the selected player
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tuneline::{
//!     model::{AppEvent, AppState, AppStatePatch, AppStore, WindowSize},
//!     view,
//! };
//!
//! let store = AppStore::new(AppState::initial(WindowSize { width: 80, height: 24 }));
//! store.subscribe(AppEvent::Update, |state| println!("{}", view::frame(state)));
//! store.publish(AppEvent::Update, AppStatePatch::time_skip(5));
//! ```

/// Application wiring and the terminal event loop.
pub mod app;

/// Configuration schema definitions and validation.
pub mod config;

/// Input routing and player synchronisation.
pub mod controller;

/// Core error types and result aliases.
pub mod core;

/// Application state shape and events.
pub mod model;

/// Player-control services.
pub mod services;

/// Generic event-driven state store.
pub mod store;

/// Raw mode and terminal size.
pub mod terminal;

/// Logging setup.
pub mod tracing_config;

/// Frame rendering and terminal output.
pub mod view;

/// Re-exported core types for convenience.
pub use crate::core::{Result, TunelineError};
