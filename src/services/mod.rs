/// Media player control service
pub mod player;

pub use player::{
    MediaState, PlaybackState, PlayerControl, PlayerId, Playerctl, ServiceError,
    TransportCommand,
};
