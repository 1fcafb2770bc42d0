//! Router and bridge behaviour against the in-memory player service.

#![allow(clippy::unwrap_used)]

use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc, time};

use super::{
    Action, BridgeSettings, Flow, InputRouter, PlayerBridge, SeekDirection, SeekSettings,
    reconcile_selection,
};
use crate::{
    model::{AppEvent, AppState, AppStatePatch, AppStore, WindowSize},
    services::player::{
        MediaState, PlaybackState, PlayerId, ServiceError, TransportCommand, fake::FakeControl,
    },
};

fn media(title: &str, position_s: u64) -> MediaState {
    MediaState {
        status: PlaybackState::Playing,
        title: title.to_string(),
        artist: String::from("Band"),
        length: 200_000_000,
        position: position_s * 1_000_000,
    }
}

fn ids(names: &[&str]) -> Vec<PlayerId> {
    names.iter().copied().map(PlayerId::from).collect()
}

fn store_with(players: &[&str], selected: Option<&str>, media: &MediaState) -> Arc<AppStore> {
    let mut state = AppState::initial(WindowSize {
        width: 80,
        height: 24,
    });
    state.players = ids(players);
    state.selected_player = selected.map(PlayerId::from);
    for player in &state.players {
        state.playback_status.insert(player.clone(), media.clone());
    }
    Arc::new(AppStore::new(state))
}

fn empty_store() -> Arc<AppStore> {
    Arc::new(AppStore::new(AppState::initial(WindowSize {
        width: 80,
        height: 24,
    })))
}

fn router_for(store: &Arc<AppStore>, fake: &FakeControl) -> InputRouter {
    InputRouter::new(
        Arc::clone(store),
        Arc::new(fake.clone()),
        SeekSettings::default(),
    )
}

fn select(store: &AppStore, name: &str) {
    store.publish(
        AppEvent::Update,
        AppStatePatch {
            selected_player: Some(Some(PlayerId::from(name))),
            ..AppStatePatch::default()
        },
    );
}

fn status_line(status: &str, title: &str, length: u64, position: u64) -> String {
    format!(
        "<mediaState><status>{status}</status><title>{title}</title><artist>Band</artist><length>{length}</length><position>{position}</position></mediaState>"
    )
}

async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

const FORWARD: Action = Action::Seek(SeekDirection::Forward);

#[test]
fn previous_wraps_to_the_last_player() {
    let fake = FakeControl::new();
    let store = store_with(&["A", "B", "C"], Some("A"), &media("t", 0));
    let mut router = router_for(&store, &fake);

    assert_eq!(router.handle(Action::PreviousPlayer), Flow::Continue);
    assert_eq!(store.current_state().selected_player, Some(PlayerId::from("C")));
}

#[test]
fn next_wraps_to_the_first_player() {
    let fake = FakeControl::new();
    let store = store_with(&["A", "B", "C"], Some("C"), &media("t", 0));
    let mut router = router_for(&store, &fake);

    router.handle(Action::NextPlayer);
    assert_eq!(store.current_state().selected_player, Some(PlayerId::from("A")));

    router.handle(Action::NextPlayer);
    assert_eq!(store.current_state().selected_player, Some(PlayerId::from("B")));
}

#[test]
fn switching_changes_only_the_selection() {
    let fake = FakeControl::new();
    let store = store_with(&["A", "B"], Some("A"), &media("t", 0));
    let before = store.current_state();
    let mut router = router_for(&store, &fake);

    router.handle(Action::NextPlayer);

    let after = store.current_state();
    assert_eq!(after.selected_player, Some(PlayerId::from("B")));
    assert_eq!(after.players, before.players);
    assert_eq!(after.playback_status, before.playback_status);
    assert_eq!(after.time_skip_seconds, before.time_skip_seconds);
}

#[test]
fn transport_keys_go_straight_to_the_service() {
    let fake = FakeControl::new();
    let store = store_with(&["A", "B"], Some("B"), &media("t", 0));
    let before = store.current_state();
    let mut router = router_for(&store, &fake);

    router.handle(Action::Transport(TransportCommand::PlayPause));
    router.handle(Action::Transport(TransportCommand::Next));

    assert_eq!(
        fake.commands(),
        vec![
            (PlayerId::from("B"), TransportCommand::PlayPause),
            (PlayerId::from("B"), TransportCommand::Next),
        ]
    );
    assert_eq!(store.current_state(), before);
}

#[tokio::test]
async fn keys_without_a_selected_player_are_ignored() {
    let fake = FakeControl::new();
    let store = empty_store();
    let mut router = router_for(&store, &fake);

    router.handle(FORWARD);
    router.handle(Action::NextPlayer);
    router.handle(Action::Transport(TransportCommand::PlayPause));

    assert!(!router.has_pending_seek());
    assert!(fake.commands().is_empty());
    assert_eq!(store.current_state().time_skip_seconds, 0);
    assert_eq!(router.handle(Action::Exit), Flow::Exit);
}

#[tokio::test(start_paused = true)]
async fn seek_presses_coalesce_into_one_commit() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    fake.hold_seeks();
    let store = store_with(&["A"], Some("A"), &media("t", 10));
    let mut router = router_for(&store, &fake);

    router.handle(FORWARD);
    time::sleep(Duration::from_millis(50)).await;
    router.handle(FORWARD);
    time::sleep(Duration::from_millis(50)).await;
    router.handle(FORWARD);

    assert_eq!(store.current_state().time_skip_seconds, 15);
    assert!(fake.seeks().is_empty());

    time::sleep(Duration::from_millis(299)).await;
    settle().await;
    assert!(fake.seeks().is_empty());

    time::sleep(Duration::from_millis(2)).await;
    settle().await;
    assert_eq!(fake.seeks(), vec![(PlayerId::from("A"), 25.0)]);
    assert_eq!(store.current_state().time_skip_seconds, 15);

    fake.release_seek();
    settle().await;
    assert_eq!(store.current_state().time_skip_seconds, 0);
    assert_eq!(fake.seeks().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn later_keys_do_not_cancel_an_in_flight_seek() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    fake.hold_seeks();
    let store = store_with(&["A"], Some("A"), &media("t", 10));
    let mut router = router_for(&store, &fake);

    for _ in 0..3 {
        router.handle(FORWARD);
    }
    time::sleep(Duration::from_millis(301)).await;
    settle().await;
    assert_eq!(fake.seeks().len(), 1);

    router.handle(FORWARD);
    assert_eq!(store.current_state().time_skip_seconds, 20);

    fake.release_seek();
    settle().await;
    assert_eq!(store.current_state().time_skip_seconds, 5);

    time::sleep(Duration::from_millis(301)).await;
    settle().await;
    fake.release_seek();
    settle().await;

    assert_eq!(
        fake.seeks(),
        vec![(PlayerId::from("A"), 25.0), (PlayerId::from("A"), 15.0)]
    );
    assert_eq!(store.current_state().time_skip_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn second_commit_waits_for_the_seek_in_flight() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    fake.hold_seeks();
    let store = store_with(&["A"], Some("A"), &media("t", 10));
    let mut router = router_for(&store, &fake);

    for _ in 0..3 {
        router.handle(FORWARD);
    }
    time::sleep(Duration::from_millis(301)).await;
    settle().await;

    router.handle(FORWARD);
    time::sleep(Duration::from_millis(301)).await;
    settle().await;
    assert_eq!(fake.seeks(), vec![(PlayerId::from("A"), 25.0)]);
    assert_eq!(store.current_state().time_skip_seconds, 20);

    fake.release_seek();
    settle().await;
    assert_eq!(
        fake.seeks(),
        vec![(PlayerId::from("A"), 25.0), (PlayerId::from("A"), 15.0)]
    );
    assert_eq!(store.current_state().time_skip_seconds, 5);

    fake.release_seek();
    settle().await;
    assert_eq!(store.current_state().time_skip_seconds, 0);
    assert_eq!(fake.seeks().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn offset_that_returns_to_zero_sends_no_seek() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    let store = store_with(&["A"], Some("A"), &media("t", 10));
    let mut router = router_for(&store, &fake);

    router.handle(FORWARD);
    router.handle(Action::Seek(SeekDirection::Backward));
    time::sleep(Duration::from_millis(301)).await;
    settle().await;

    assert!(fake.seeks().is_empty());
    assert_eq!(store.current_state().time_skip_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn failed_seek_still_clears_the_offset() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    fake.fail_seeks();
    let store = store_with(&["A"], Some("A"), &media("t", 10));
    let mut router = router_for(&store, &fake);

    router.handle(FORWARD);
    time::sleep(Duration::from_millis(301)).await;
    settle().await;

    assert_eq!(fake.seeks(), vec![(PlayerId::from("A"), 15.0)]);
    assert_eq!(store.current_state().time_skip_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn seeking_before_the_start_is_clamped() {
    let fake = FakeControl::with_players(&["A"], &media("t", 2));
    let store = store_with(&["A"], Some("A"), &media("t", 2));
    let mut router = router_for(&store, &fake);

    router.handle(Action::Seek(SeekDirection::Backward));
    assert_eq!(store.current_state().time_skip_seconds, -5);

    time::sleep(Duration::from_millis(301)).await;
    settle().await;
    assert_eq!(fake.seeks(), vec![(PlayerId::from("A"), 0.01)]);
}

#[tokio::test(start_paused = true)]
async fn exit_cancels_the_pending_timer() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    let store = store_with(&["A"], Some("A"), &media("t", 10));
    let mut router = router_for(&store, &fake);

    router.handle(FORWARD);
    assert!(router.has_pending_seek());
    assert_eq!(router.handle(Action::Exit), Flow::Exit);

    time::sleep(Duration::from_millis(500)).await;
    settle().await;
    assert!(fake.seeks().is_empty());
}

fn quiet_settings() -> BridgeSettings {
    BridgeSettings {
        poll_interval: Duration::from_secs(600),
        ..BridgeSettings::default()
    }
}

fn bridge_for(
    store: &Arc<AppStore>,
    fake: &FakeControl,
    settings: BridgeSettings,
) -> (Arc<PlayerBridge>, mpsc::UnboundedReceiver<ServiceError>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let bridge = PlayerBridge::new(Arc::clone(store), Arc::new(fake.clone()), settings, sender);
    (bridge, receiver)
}

#[test]
fn reconciliation_keeps_or_replaces_the_selection() {
    let players = ids(&["A", "C"]);
    assert_eq!(
        reconcile_selection(Some(&PlayerId::from("C")), &players),
        Some(PlayerId::from("C"))
    );
    assert_eq!(
        reconcile_selection(Some(&PlayerId::from("B")), &players),
        Some(PlayerId::from("A"))
    );
    assert_eq!(reconcile_selection(None, &players), Some(PlayerId::from("A")));
    assert_eq!(reconcile_selection(Some(&PlayerId::from("B")), &[]), None);
}

#[tokio::test]
async fn start_publishes_the_first_poll_and_binds_the_first_player() {
    let fake = FakeControl::with_players(&["A", "B"], &media("t", 10));
    let store = empty_store();
    let (bridge, _fatal) = bridge_for(&store, &fake, quiet_settings());

    bridge.start().await.unwrap();
    settle().await;

    let state = store.current_state();
    assert_eq!(state.players, ids(&["A", "B"]));
    assert_eq!(state.selected_player, Some(PlayerId::from("A")));
    assert_eq!(state.playback_status.len(), 2);
    assert_eq!(bridge.bound_player(), Some(PlayerId::from("A")));
    assert_eq!(fake.active_subscriptions(), ids(&["A"]));
}

#[tokio::test]
async fn unavailable_players_are_left_out_of_the_poll() {
    let fake = FakeControl::with_players(&["A", "B"], &media("t", 10));
    fake.make_unavailable("B");
    let store = empty_store();
    let (bridge, _fatal) = bridge_for(&store, &fake, quiet_settings());

    bridge.start().await.unwrap();

    let state = store.current_state();
    assert_eq!(state.players, ids(&["A", "B"]));
    assert!(state.playback_status.contains_key(&PlayerId::from("A")));
    assert!(!state.playback_status.contains_key(&PlayerId::from("B")));
}

#[tokio::test]
async fn ignored_players_are_never_listed() {
    let fake = FakeControl::with_players(&["chromium.instance42", "spotify"], &media("t", 0));
    let store = empty_store();
    let settings = BridgeSettings {
        ignored_players: vec![String::from("chromium")],
        ..quiet_settings()
    };
    let (bridge, _fatal) = bridge_for(&store, &fake, settings);

    bridge.start().await.unwrap();

    let state = store.current_state();
    assert_eq!(state.players, ids(&["spotify"]));
    assert_eq!(state.selected_player, Some(PlayerId::from("spotify")));
}

#[tokio::test]
async fn pushed_lines_update_the_selected_player() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    let store = empty_store();
    let (bridge, _fatal) = bridge_for(&store, &fake, quiet_settings());
    bridge.start().await.unwrap();
    settle().await;

    fake.push_line("A", &status_line("Paused", "New &amp; Old", 300_000_000, 1_000_000));
    settle().await;

    let state = store.current_state();
    let media = state.selected_media().unwrap();
    assert_eq!(media.status, PlaybackState::Paused);
    assert_eq!(media.title, "New & Old");
    assert_eq!(media.length, 300_000_000);
}

#[tokio::test]
async fn stopped_lines_are_zeroed() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    let store = empty_store();
    let (bridge, _fatal) = bridge_for(&store, &fake, quiet_settings());
    bridge.start().await.unwrap();
    settle().await;

    fake.push_line("A", &status_line("Stopped", "Ghost", 5_000_000, 4_000_000));
    settle().await;

    assert_eq!(
        store.current_state().selected_media(),
        Some(&MediaState::stopped())
    );
}

#[tokio::test]
async fn malformed_lines_are_dropped() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    let store = empty_store();
    let (bridge, _fatal) = bridge_for(&store, &fake, quiet_settings());
    bridge.start().await.unwrap();
    settle().await;
    let before = store.current_state();

    fake.push_line("A", "No player could handle this command");
    fake.push_line("A", "<mediaState><status>Playing</status>");
    fake.push_line("A", &status_line("Playing", "t", 100, 12));
    settle().await;

    let after = store.current_state();
    assert_eq!(after.selected_media().map(|m| m.position), Some(12));
    assert_eq!(after.players, before.players);
}

#[tokio::test]
async fn stale_selection_moves_to_the_first_remaining_player() {
    let fake = FakeControl::with_players(&["A", "B", "C"], &media("t", 10));
    let store = empty_store();
    let (bridge, _fatal) = bridge_for(&store, &fake, quiet_settings());
    bridge.start().await.unwrap();

    select(&store, "B");
    settle().await;
    assert_eq!(fake.active_subscriptions(), ids(&["B"]));

    fake.set_players(&["A", "C"]);
    bridge.poll().await.unwrap();
    settle().await;

    assert_eq!(store.current_state().selected_player, Some(PlayerId::from("A")));
    assert_eq!(bridge.bound_player(), Some(PlayerId::from("A")));
    assert_eq!(fake.active_subscriptions(), ids(&["A"]));
}

#[tokio::test]
async fn replaced_subscription_stops_publishing() {
    let fake = FakeControl::with_players(&["A", "B"], &media("t", 10));
    let store = empty_store();
    let (bridge, _fatal) = bridge_for(&store, &fake, quiet_settings());
    bridge.start().await.unwrap();
    settle().await;

    select(&store, "B");
    settle().await;

    fake.push_line("A", &status_line("Paused", "late", 100, 1));
    settle().await;

    let state = store.current_state();
    assert_eq!(state.playback_status[&PlayerId::from("A")].title, "t");
    assert_eq!(fake.active_subscriptions(), ids(&["B"]));
}

#[tokio::test]
async fn sync_subscription_is_idempotent() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    let store = empty_store();
    let (bridge, _fatal) = bridge_for(&store, &fake, quiet_settings());
    bridge.start().await.unwrap();

    bridge.sync_subscription();
    bridge.sync_subscription();
    store.publish(AppEvent::Update, AppStatePatch::time_skip(0));
    settle().await;

    assert_eq!(fake.active_subscriptions(), ids(&["A"]));
}

#[tokio::test]
async fn no_players_means_no_selection_and_no_subscription() {
    let fake = FakeControl::new();
    let store = empty_store();
    let (bridge, _fatal) = bridge_for(&store, &fake, quiet_settings());
    bridge.start().await.unwrap();
    settle().await;

    let state = store.current_state();
    assert!(state.players.is_empty());
    assert_eq!(state.selected_player, None);
    assert_eq!(bridge.bound_player(), None);
    assert!(fake.active_subscriptions().is_empty());
}

#[tokio::test]
async fn launch_failure_stops_start() {
    let fake = FakeControl::new();
    fake.break_launch();
    let store = empty_store();
    let (bridge, _fatal) = bridge_for(&store, &fake, quiet_settings());

    let started = bridge.start().await;
    assert!(matches!(started, Err(ref e) if e.is_fatal()));
}

#[tokio::test]
async fn subscription_launch_failure_is_reported_as_fatal() {
    let fake = FakeControl::with_players(&["A", "B"], &media("t", 10));
    let store = empty_store();
    let (bridge, mut fatal) = bridge_for(&store, &fake, quiet_settings());
    bridge.start().await.unwrap();
    settle().await;

    fake.break_launch();
    select(&store, "B");
    settle().await;

    assert!(matches!(fatal.try_recv(), Ok(ServiceError::Launch { .. })));
}

#[tokio::test(start_paused = true)]
async fn poll_timer_picks_up_new_players() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    let store = empty_store();
    let settings = BridgeSettings {
        poll_interval: Duration::from_secs(1),
        ..BridgeSettings::default()
    };
    let (bridge, _fatal) = bridge_for(&store, &fake, settings);
    bridge.start().await.unwrap();

    fake.set_players(&["A", "B"]);
    fake.set_status("B", media("other", 0));
    time::sleep(Duration::from_millis(1001)).await;
    settle().await;

    let state = store.current_state();
    assert_eq!(state.players, ids(&["A", "B"]));
    assert_eq!(state.selected_player, Some(PlayerId::from("A")));
    assert_eq!(
        state.playback_status[&PlayerId::from("B")].title,
        "other"
    );
}

#[tokio::test(start_paused = true)]
async fn exit_tears_the_bridge_down() {
    let fake = FakeControl::with_players(&["A"], &media("t", 10));
    let store = empty_store();
    let settings = BridgeSettings {
        poll_interval: Duration::from_secs(1),
        ..BridgeSettings::default()
    };
    let (bridge, _fatal) = bridge_for(&store, &fake, settings);
    bridge.start().await.unwrap();
    settle().await;

    store.publish(
        AppEvent::Exit,
        AppStatePatch {
            exited: Some(true),
            ..AppStatePatch::default()
        },
    );
    settle().await;
    assert_eq!(bridge.bound_player(), None);
    assert!(fake.active_subscriptions().is_empty());

    fake.set_players(&["A", "B"]);
    time::sleep(Duration::from_secs(3)).await;
    settle().await;
    assert_eq!(store.current_state().players, ids(&["A"]));
}
