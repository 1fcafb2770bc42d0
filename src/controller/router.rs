use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, instrument, warn};

use super::keys::{Action, SeekDirection};
use crate::{
    config::SeekConfig,
    model::{AppEvent, AppStatePatch, AppStore},
    services::player::{MIN_SEEK_SECONDS, PlayerControl, PlayerId},
};

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Seek step and quiet window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekSettings {
    /// Seconds added or removed per key press
    pub step_seconds: i64,
    /// Quiet time after the last seek key before the seek is sent
    pub debounce: Duration,
}

impl Default for SeekSettings {
    fn default() -> Self {
        Self::from(&SeekConfig::default())
    }
}

impl From<&SeekConfig> for SeekSettings {
    fn from(config: &SeekConfig) -> Self {
        Self {
            step_seconds: config.step_seconds,
            debounce: config.debounce(),
        }
    }
}

/// Whether the main loop should keep going after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading keys
    Continue,
    /// Tear down and leave
    Exit,
}

/// Turns actions into store updates and player commands.
///
/// Seek keys only move the pending offset; the seek itself is sent once no
/// seek key has arrived for the debounce window. The router owns that one
/// pending timer. Arming it aborts the previous one, but a timer that has
/// already fired hands the seek to its own task, so later keys never cancel
/// a seek that is in flight.
///
/// At most one seek is in flight. A commit that fires while another is
/// outstanding waits for it and then sends whatever offset is left.
pub struct InputRouter {
    store: Arc<AppStore>,
    control: Arc<dyn PlayerControl>,
    settings: SeekSettings,
    pending: Option<JoinHandle<()>>,
    in_flight: Arc<Mutex<()>>,
}

impl InputRouter {
    /// Creates a router with no pending seek.
    pub fn new(store: Arc<AppStore>, control: Arc<dyn PlayerControl>, settings: SeekSettings) -> Self {
        Self {
            store,
            control,
            settings,
            pending: None,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Applies one action.
    ///
    /// Without a selected player only `Exit` does anything.
    #[instrument(skip(self))]
    pub fn handle(&mut self, action: Action) -> Flow {
        let state = self.store.current_state();

        match (action, state.selected_player) {
            (Action::Exit, _) => {
                self.cancel_pending();
                return Flow::Exit;
            }
            (_, None) => debug!("No player selected, ignoring key"),
            (Action::PreviousPlayer, Some(current)) => {
                self.switch_player(&state.players, &current, false);
            }
            (Action::NextPlayer, Some(current)) => {
                self.switch_player(&state.players, &current, true);
            }
            (Action::Transport(command), Some(player)) => {
                self.control.command(&player, command);
            }
            (Action::Seek(direction), Some(_)) => {
                self.seek(state.time_skip_seconds, direction);
            }
        }

        Flow::Continue
    }

    /// Aborts the pending seek timer, if any. A seek already handed off is
    /// not affected.
    pub fn cancel_pending(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }

    /// Whether a seek timer is armed and has not fired yet.
    #[cfg(test)]
    pub(crate) fn has_pending_seek(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    fn switch_player(&self, players: &[PlayerId], current: &PlayerId, forward: bool) {
        let Some(index) = players.iter().position(|player| player == current) else {
            warn!(player = %current, "Selected player is not in the player list");
            return;
        };

        let count = players.len();
        let next = if forward {
            (index + 1) % count
        } else {
            (index + count - 1) % count
        };

        let Some(next) = players.get(next).cloned() else {
            return;
        };
        debug!(from = %current, to = %next, "Switching player");

        self.store.publish(
            AppEvent::Update,
            AppStatePatch {
                selected_player: Some(Some(next)),
                ..AppStatePatch::default()
            },
        );
    }

    fn seek(&mut self, current_skip: i64, direction: SeekDirection) {
        let step = match direction {
            SeekDirection::Forward => self.settings.step_seconds,
            SeekDirection::Backward => -self.settings.step_seconds,
        };

        self.store.publish(
            AppEvent::Update,
            AppStatePatch::time_skip(current_skip.saturating_add(step)),
        );
        self.arm_commit();
    }

    fn arm_commit(&mut self) {
        self.cancel_pending();

        let store = Arc::clone(&self.store);
        let control = Arc::clone(&self.control);
        let in_flight = Arc::clone(&self.in_flight);
        let debounce = self.settings.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            tokio::spawn(commit_seek(store, control, in_flight));
        }));
    }
}

impl Drop for InputRouter {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Sends the pending offset as one absolute seek, then takes the sent
/// amount off the offset once the player has answered.
///
/// Holds `in_flight` for the whole request, so the offset is read only
/// after any earlier seek has been accounted for.
#[instrument(skip_all)]
async fn commit_seek(
    store: Arc<AppStore>,
    control: Arc<dyn PlayerControl>,
    in_flight: Arc<Mutex<()>>,
) {
    let _in_flight = in_flight.lock().await;

    let state = store.current_state();
    let committed = state.time_skip_seconds;
    if committed == 0 {
        debug!("Offset already committed");
        return;
    }

    let (Some(player), Some(media)) = (state.selected_player.clone(), state.selected_media())
    else {
        debug!("Nothing to seek, dropping pending offset");
        store.publish(AppEvent::Update, AppStatePatch::time_skip(0));
        return;
    };

    let target = (media.position as f64 / MICROS_PER_SECOND + committed as f64).max(MIN_SEEK_SECONDS);
    debug!(player = %player, target, committed, "Committing seek");

    if let Err(e) = control.seek(&player, target).await {
        warn!(player = %player, error = %e, "Seek failed");
    }

    let remaining = store
        .current_state()
        .time_skip_seconds
        .saturating_sub(committed);
    store.publish(AppEvent::Update, AppStatePatch::time_skip(remaining));
}
