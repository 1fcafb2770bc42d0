use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use futures::{StreamExt, future::join_all};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    config::PlayerConfig,
    model::{AppEvent, AppStatePatch, AppStore},
    services::player::{
        MediaState, PlaybackState, PlayerControl, PlayerId, ServiceError, parse_status_line,
    },
};

/// Discovery settings for the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Players whose id contains any of these are left out
    pub ignored_players: Vec<String>,
    /// Time between full polls
    pub poll_interval: Duration,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self::from(&PlayerConfig::default())
    }
}

impl From<&PlayerConfig> for BridgeSettings {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            ignored_players: config.ignored_players.clone(),
            poll_interval: config.poll_interval(),
        }
    }
}

struct Subscription {
    player: PlayerId,
    task: JoinHandle<()>,
}

/// Keeps the store in step with the player service.
///
/// Polls the player list and every player's status on an interval, and
/// keeps one push subscription bound to the selected player. Each
/// subscription gets a generation number; its lines are only published
/// while that generation is still current, so a replaced subscription never
/// writes to the store.
pub struct PlayerBridge {
    store: Arc<AppStore>,
    control: Arc<dyn PlayerControl>,
    settings: BridgeSettings,
    fatal: mpsc::UnboundedSender<ServiceError>,
    generation: Arc<AtomicU64>,
    subscription: Mutex<Option<Subscription>>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

impl PlayerBridge {
    /// Creates a bridge. Fatal service errors are sent on `fatal`.
    pub fn new(
        store: Arc<AppStore>,
        control: Arc<dyn PlayerControl>,
        settings: BridgeSettings,
        fatal: mpsc::UnboundedSender<ServiceError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            control,
            settings,
            fatal,
            generation: Arc::new(AtomicU64::new(0)),
            subscription: Mutex::new(None),
            poller: Mutex::new(None),
        })
    }

    /// Hooks the bridge to the store, runs the first poll, binds the
    /// subscription and starts the poll timer.
    ///
    /// # Errors
    ///
    /// Returns the service error if the first poll cannot reach the service.
    #[instrument(skip_all)]
    pub async fn start(self: &Arc<Self>) -> Result<(), ServiceError> {
        let bridge = Arc::downgrade(self);
        self.store.subscribe(AppEvent::Update, move |_| {
            if let Some(bridge) = bridge.upgrade() {
                bridge.sync_subscription();
            }
        });

        let bridge = Arc::downgrade(self);
        self.store.subscribe(AppEvent::Exit, move |_| {
            if let Some(bridge) = bridge.upgrade() {
                bridge.shutdown();
            }
        });

        self.poll().await?;
        self.sync_subscription();

        let bridge = Arc::downgrade(self);
        let period = self.settings.poll_interval;
        let poller = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(bridge) = bridge.upgrade() else {
                    break;
                };
                if let Err(e) = bridge.poll().await {
                    bridge.report(e);
                }
            }
        });
        *lock(&self.poller) = Some(poller);

        info!(interval = ?period, "Player bridge started");
        Ok(())
    }

    /// Fetches the player list and every player's status and publishes them
    /// in one update.
    ///
    /// Players whose status query fails are left out of the update. The
    /// selection is kept if the player is still listed, otherwise it moves
    /// to the first player, or to none.
    ///
    /// # Errors
    ///
    /// Returns the service error if the player list cannot be fetched, or a
    /// fatal error from any status query.
    #[instrument(skip_all)]
    pub async fn poll(&self) -> Result<(), ServiceError> {
        let players: Vec<PlayerId> = self
            .control
            .list_players()
            .await?
            .into_iter()
            .filter(|player| !self.is_ignored(player))
            .collect();

        let statuses = join_all(players.iter().map(|player| async move {
            (player.clone(), self.control.status(player).await)
        }))
        .await;

        let mut playback_status = HashMap::new();
        for (player, status) in statuses {
            match status {
                Ok(media) => {
                    playback_status.insert(player, normalize(media));
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => debug!(player = %player, error = %e, "Leaving player out of poll"),
            }
        }

        let current = self.store.current_state();
        let selected = reconcile_selection(current.selected_player.as_ref(), &players);
        trace!(players = players.len(), selected = ?selected, "Poll complete");

        self.store.publish(
            AppEvent::Update,
            AppStatePatch {
                players: Some(players),
                selected_player: Some(selected),
                playback_status: Some(playback_status),
                ..AppStatePatch::default()
            },
        );
        Ok(())
    }

    /// Binds the push subscription to the selected player.
    ///
    /// Does nothing if it is already bound there; otherwise the old
    /// subscription is cancelled first. Safe to call any number of times.
    pub fn sync_subscription(&self) {
        let selected = self.store.current_state().selected_player;
        let mut slot = lock(&self.subscription);

        if slot.as_ref().map(|bound| &bound.player) == selected.as_ref() {
            return;
        }

        if let Some(old) = slot.take() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            old.task.abort();
            debug!(player = %old.player, "Status subscription cancelled");
        }

        let Some(player) = selected else {
            return;
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let task = tokio::spawn(forward_status(
            Arc::clone(&self.store),
            Arc::clone(&self.control),
            Arc::clone(&self.generation),
            generation,
            player.clone(),
            self.fatal.clone(),
        ));

        debug!(player = %player, generation, "Status subscription bound");
        *slot = Some(Subscription { player, task });
    }

    /// Player the push subscription is bound to.
    #[cfg(test)]
    pub(crate) fn bound_player(&self) -> Option<PlayerId> {
        lock(&self.subscription)
            .as_ref()
            .map(|bound| bound.player.clone())
    }

    /// Cancels the subscription and the poll timer.
    pub fn shutdown(&self) {
        if let Some(old) = lock(&self.subscription).take() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            old.task.abort();
        }
        if let Some(poller) = lock(&self.poller).take() {
            poller.abort();
        }
        debug!("Player bridge stopped");
    }

    fn is_ignored(&self, player: &PlayerId) -> bool {
        self.settings
            .ignored_players
            .iter()
            .any(|pattern| player.as_str().contains(pattern.as_str()))
    }

    fn report(&self, error: ServiceError) {
        report(&self.fatal, error);
    }
}

/// Selection after the player list changed: the current player if it is
/// still listed, else the first one.
pub fn reconcile_selection(current: Option<&PlayerId>, players: &[PlayerId]) -> Option<PlayerId> {
    match current {
        Some(current) if players.contains(current) => Some(current.clone()),
        _ => players.first().cloned(),
    }
}

fn normalize(media: MediaState) -> MediaState {
    if media.status == PlaybackState::Stopped {
        MediaState::stopped()
    } else {
        media
    }
}

#[instrument(skip(store, control, current, fatal))]
async fn forward_status(
    store: Arc<AppStore>,
    control: Arc<dyn PlayerControl>,
    current: Arc<AtomicU64>,
    generation: u64,
    player: PlayerId,
    fatal: mpsc::UnboundedSender<ServiceError>,
) {
    let mut lines = match control.subscribe_status(&player).await {
        Ok(lines) => lines,
        Err(e) => {
            report(&fatal, e);
            return;
        }
    };

    while let Some(line) = lines.next().await {
        if current.load(Ordering::SeqCst) != generation {
            break;
        }

        match parse_status_line(&line) {
            Ok(media) => {
                store.publish(
                    AppEvent::Update,
                    AppStatePatch::media(player.clone(), normalize(media)),
                );
            }
            Err(e) => trace!(error = %e, "Dropping status line"),
        }
    }
}

fn report(fatal: &mpsc::UnboundedSender<ServiceError>, error: ServiceError) {
    if error.is_fatal() {
        warn!(error = %error, "Player service failed");
        if fatal.send(error).is_err() {
            debug!("Fatal error receiver is gone");
        }
    } else {
        warn!(error = %error, "Player service error");
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
