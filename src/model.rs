use std::collections::HashMap;

use crate::{
    services::player::{MediaState, PlayerId},
    store::{StateStore, StoreEvent},
};

crate::patchable! {
    /// Terminal size in character cells.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct WindowSize => WindowSizePatch {
        /// Columns
        pub width: u16,
        /// Rows
        pub height: u16,
    }
}

crate::patchable! {
    /// Everything the display is drawn from.
    ///
    /// `playback_status` may hold entries for players that have disappeared;
    /// lookups always go through `selected_player`.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct AppState => AppStatePatch {
        /// Current terminal size
        pub window_size: WindowSize,
        /// Players in service order, ignored players removed
        pub players: Vec<PlayerId>,
        /// The player keys act on, if any
        pub selected_player: Option<PlayerId>,
        /// Last known state per player
        pub playback_status: HashMap<PlayerId, MediaState>,
        /// Seek offset accumulated but not yet sent
        pub time_skip_seconds: i64,
        /// Set once on shutdown
        pub exited: bool,
    }
}

impl AppState {
    /// Startup state: no players, nothing selected, no pending seek.
    pub fn initial(window_size: WindowSize) -> Self {
        Self {
            window_size,
            ..Self::default()
        }
    }

    /// State of the selected player, if one is selected and has been seen.
    pub fn selected_media(&self) -> Option<&MediaState> {
        self.selected_player
            .as_ref()
            .and_then(|player| self.playback_status.get(player))
    }
}

impl AppStatePatch {
    /// Patch replacing one player's entry in `playback_status`.
    pub fn media(player: PlayerId, media: MediaState) -> Self {
        Self {
            playback_status: Some(HashMap::from([(player, media)])),
            ..Self::default()
        }
    }

    /// Patch setting the pending seek offset.
    pub fn time_skip(seconds: i64) -> Self {
        Self {
            time_skip_seconds: Some(seconds),
            ..Self::default()
        }
    }
}

/// Events the application store dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppEvent {
    /// Any state change the display should reflect
    Update,
    /// Process shutdown
    Exit,
}

impl StoreEvent for AppEvent {
    const ALL: &'static [Self] = &[AppEvent::Update, AppEvent::Exit];

    fn name(self) -> &'static str {
        match self {
            AppEvent::Update => "update",
            AppEvent::Exit => "exit",
        }
    }
}

/// The application's single store.
pub type AppStore = StateStore<AppState, AppEvent>;
