//! Player-control service.
//!
//! The UI core talks to media players only through [`PlayerControl`].
//! [`Playerctl`] implements it on top of the `playerctl` command-line tool;
//! status pushes arrive as one formatted line per change and are decoded by
//! [`parse_status_line`].

mod control;
mod error;
mod playerctl;
mod status;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use control::{MIN_SEEK_SECONDS, PlayerControl, StatusLines};
pub use error::{ParseError, ServiceError};
pub use playerctl::Playerctl;
pub use status::{STATUS_FORMAT, parse_status_line};
pub use types::{MediaState, PlaybackState, PlayerId, TransportCommand};
