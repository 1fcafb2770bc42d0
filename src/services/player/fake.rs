//! Scriptable [`PlayerControl`] for controller tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use tokio::sync::{Semaphore, mpsc};

use super::{
    MIN_SEEK_SECONDS, MediaState, PlayerControl, PlayerId, ServiceError, StatusLines,
    TransportCommand,
};

#[derive(Default)]
struct FakeState {
    players: Vec<PlayerId>,
    statuses: HashMap<PlayerId, MediaState>,
    unavailable: HashSet<PlayerId>,
    launch_broken: bool,
    hold_seeks: bool,
    fail_seeks: bool,
    commands: Vec<(PlayerId, TransportCommand)>,
    seeks: Vec<(PlayerId, f64)>,
    feeds: HashMap<PlayerId, Vec<mpsc::UnboundedSender<String>>>,
    active: HashMap<PlayerId, usize>,
}

/// In-memory player service. Clones share state.
#[derive(Clone)]
pub(crate) struct FakeControl {
    state: Arc<Mutex<FakeState>>,
    seek_gate: Arc<Semaphore>,
}

struct ActiveSubscription {
    state: Arc<Mutex<FakeState>>,
    player: PlayerId,
}

impl Drop for ActiveSubscription {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        if let Some(count) = state.active.get_mut(&self.player) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                state.active.remove(&self.player);
            }
        }
    }
}

fn lock(state: &Mutex<FakeState>) -> MutexGuard<'_, FakeState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl Default for FakeControl {
    fn default() -> Self {
        Self {
            state: Arc::default(),
            seek_gate: Arc::new(Semaphore::new(0)),
        }
    }
}

impl FakeControl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A service listing `names`, each reporting `media`.
    pub(crate) fn with_players(names: &[&str], media: &MediaState) -> Self {
        let fake = Self::new();
        fake.set_players(names);
        for name in names {
            fake.set_status(name, media.clone());
        }
        fake
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        lock(&self.state)
    }

    pub(crate) fn set_players(&self, names: &[&str]) {
        self.state().players = names.iter().copied().map(PlayerId::from).collect();
    }

    pub(crate) fn set_status(&self, name: &str, media: MediaState) {
        self.state().statuses.insert(PlayerId::from(name), media);
    }

    pub(crate) fn make_unavailable(&self, name: &str) {
        self.state().unavailable.insert(PlayerId::from(name));
    }

    pub(crate) fn break_launch(&self) {
        self.state().launch_broken = true;
    }

    /// Seeks block until [`release_seek`](Self::release_seek) is called.
    pub(crate) fn hold_seeks(&self) {
        self.state().hold_seeks = true;
    }

    pub(crate) fn release_seek(&self) {
        self.seek_gate.add_permits(1);
    }

    pub(crate) fn fail_seeks(&self) {
        self.state().fail_seeks = true;
    }

    /// Pushes a raw line to every open subscription for `name`.
    pub(crate) fn push_line(&self, name: &str, line: &str) {
        let mut state = self.state();
        if let Some(feeds) = state.feeds.get_mut(&PlayerId::from(name)) {
            feeds.retain(|feed| feed.send(line.to_string()).is_ok());
        }
    }

    /// Players with an open subscription, once per subscription.
    pub(crate) fn active_subscriptions(&self) -> Vec<PlayerId> {
        let state = self.state();
        let mut active: Vec<PlayerId> = state
            .active
            .iter()
            .flat_map(|(player, count)| std::iter::repeat_n(player.clone(), *count))
            .collect();
        active.sort();
        active
    }

    pub(crate) fn commands(&self) -> Vec<(PlayerId, TransportCommand)> {
        self.state().commands.clone()
    }

    pub(crate) fn seeks(&self) -> Vec<(PlayerId, f64)> {
        self.state().seeks.clone()
    }

    fn launch_error() -> ServiceError {
        ServiceError::Launch {
            binary: String::from("fake"),
            details: String::from("launch disabled"),
        }
    }
}

#[async_trait]
impl PlayerControl for FakeControl {
    async fn list_players(&self) -> Result<Vec<PlayerId>, ServiceError> {
        let state = self.state();
        if state.launch_broken {
            return Err(Self::launch_error());
        }
        Ok(state.players.clone())
    }

    async fn status(&self, player: &PlayerId) -> Result<MediaState, ServiceError> {
        let state = self.state();
        if state.launch_broken {
            return Err(Self::launch_error());
        }
        if state.unavailable.contains(player) {
            return Err(ServiceError::PlayerUnavailable(
                player.clone(),
                String::from("not responding"),
            ));
        }
        state.statuses.get(player).cloned().ok_or_else(|| {
            ServiceError::PlayerUnavailable(player.clone(), String::from("unknown player"))
        })
    }

    async fn subscribe_status(&self, player: &PlayerId) -> Result<StatusLines, ServiceError> {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        {
            let mut state = self.state();
            if state.launch_broken {
                return Err(Self::launch_error());
            }
            state.feeds.entry(player.clone()).or_default().push(sender);
            *state.active.entry(player.clone()).or_default() += 1;
        }

        let guard = ActiveSubscription {
            state: Arc::clone(&self.state),
            player: player.clone(),
        };

        Ok(Box::pin(async_stream::stream! {
            let _guard = guard;
            while let Some(line) = receiver.recv().await {
                yield line;
            }
        }))
    }

    fn command(&self, player: &PlayerId, command: TransportCommand) {
        self.state().commands.push((player.clone(), command));
    }

    async fn seek(&self, player: &PlayerId, seconds: f64) -> Result<(), ServiceError> {
        let held = {
            let mut state = self.state();
            state
                .seeks
                .push((player.clone(), seconds.max(MIN_SEEK_SECONDS)));
            state.hold_seeks
        };

        if held {
            if let Ok(permit) = self.seek_gate.acquire().await {
                permit.forget();
            }
        }

        if self.state().fail_seeks {
            return Err(ServiceError::CommandFailed {
                player: player.clone(),
                command: String::from("position"),
                details: String::from("exit status: 1"),
            });
        }
        Ok(())
    }
}
