use async_trait::async_trait;
use futures::stream::BoxStream;

use super::{MediaState, PlayerId, ServiceError, TransportCommand};

/// Smallest absolute position a seek is sent with. Seeking to exactly zero
/// is rejected by some players.
pub const MIN_SEEK_SECONDS: f64 = 0.01;

/// Raw status lines pushed by a subscription, one per change.
///
/// Dropping the stream cancels the subscription.
pub type StatusLines = BoxStream<'static, String>;

/// Everything the UI core needs from the player-control service.
#[async_trait]
pub trait PlayerControl: Send + Sync + 'static {
    /// Lists the players the service currently knows about, in service order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Launch` if the service cannot be started. A
    /// service that runs but reports no players yields an empty list.
    async fn list_players(&self) -> Result<Vec<PlayerId>, ServiceError>;

    /// Queries the current state of one player.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::PlayerUnavailable` or `ServiceError::Parse` if
    /// the player cannot be queried, and `ServiceError::Launch` if the service
    /// cannot be started.
    async fn status(&self, player: &PlayerId) -> Result<MediaState, ServiceError>;

    /// Starts a push subscription for one player.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Launch` if the subscription process cannot be
    /// started.
    async fn subscribe_status(&self, player: &PlayerId) -> Result<StatusLines, ServiceError>;

    /// Sends a transport command without waiting for it to finish.
    fn command(&self, player: &PlayerId, command: TransportCommand);

    /// Seeks to an absolute position in seconds and waits until the service
    /// reports completion. Positions below [`MIN_SEEK_SECONDS`] are raised
    /// to it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::CommandFailed` if the seek exits unsuccessfully.
    async fn seek(&self, player: &PlayerId, seconds: f64) -> Result<(), ServiceError>;
}
