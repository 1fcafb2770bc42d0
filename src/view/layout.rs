use crossterm::style::Stylize;

use super::{
    progress::{markers, seek_bar},
    text::{display_width, fit_title_artist, slice_columns},
    time::{format_micros, format_skip, time_line},
};
use crate::{model::AppState, services::player::MediaState};

/// Shown instead of everything else when the terminal is this narrow or
/// narrower.
pub const MIN_WIDTH: u16 = 24;

/// Rows needed for the full layout.
pub const FULL_LAYOUT_HEIGHT: u16 = 6;

/// Message drawn when the terminal is too narrow.
pub const TOO_SMALL: &str = "Terminal window is too small.";

const CONTROLLER_WIDTH: usize = 24;

/// Row separator. Raw mode turns off `\n` to `\r\n` translation.
const ROW_SEPARATOR: &str = "\r\n";

/// Renders one frame for `state`.
pub fn frame(state: &AppState) -> String {
    let size = state.window_size;
    if size.width <= MIN_WIDTH {
        return TOO_SMALL.to_string();
    }

    if size.height >= FULL_LAYOUT_HEIGHT {
        full(state).join(ROW_SEPARATOR)
    } else {
        mini(state)
    }
}

fn full(state: &AppState) -> Vec<String> {
    let width = usize::from(state.window_size.width);
    let mut rows = vec![selector(state, width)];

    let Some(media) = state.selected_media() else {
        rows.extend(std::iter::repeat_n(String::new(), 4));
        return rows;
    };

    let (committed, pending) = markers(
        width,
        media.length,
        media.position,
        state.time_skip_seconds,
    );

    rows.push(fit_title_artist(&media.title, &media.artist, width));
    rows.push(seek_bar(width, committed, pending));
    rows.push(time_line(
        media.position,
        media.length,
        state.time_skip_seconds,
        width,
    ));
    rows.extend(controller(media, width));
    rows
}

/// Columns the selector row spends around the player name.
const SELECTOR_FRAME: usize = "h <  > ;".len();

fn selector(state: &AppState, width: usize) -> String {
    let player = state
        .selected_player
        .as_ref()
        .map_or("no player", |player| player.as_str());
    let player = slice_columns(player, 0, width.saturating_sub(SELECTOR_FRAME));
    format!("h < {player} > ;")
}

fn controller(media: &MediaState, width: usize) -> [String; 2] {
    let toggle = if media.is_playing() { "|>" } else { "||" };
    let margin = " ".repeat(width.saturating_sub(CONTROLLER_WIDTH) / 2);

    [
        format!("{margin}<<    <    {toggle}    >    >>"),
        format!("{margin} J    j    k     l    L "),
    ]
}

fn mini(state: &AppState) -> String {
    let Some(media) = state.selected_media() else {
        return String::new();
    };

    let width = usize::from(state.window_size.width);
    let (committed, _) = markers(width, media.length, media.position, 0);

    let glyph = if media.is_playing() { '▶' } else { '⏸' };
    let artist = if media.artist.is_empty() {
        String::new()
    } else {
        format!("@{}", media.artist)
    };
    let info = format!(
        "{glyph}{}{} {}{artist}",
        format_micros(media.position),
        format_skip(state.time_skip_seconds),
        media.title,
    );
    let padding = width.saturating_sub(display_width(&info));
    let text = format!("{info}{}", " ".repeat(padding));

    format!(
        "{}{}",
        slice_columns(&text, 0, committed).on_red(),
        slice_columns(&text, committed, width)
    )
}
