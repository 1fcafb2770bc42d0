use crossterm::style::Stylize;

const MICROS_PER_SECOND: i64 = 1_000_000;

/// Fraction of the track played, clamped to `0.0..=1.0`. A zero length
/// means no progress.
pub fn progress(length: u64, position: i64) -> f64 {
    if length == 0 {
        return 0.0;
    }
    (position as f64 / length as f64).clamp(0.0, 1.0)
}

/// Cell a marker at `progress` occupies on a bar `width` cells wide.
pub fn marker_index(width: usize, progress: f64) -> usize {
    let cell = (width as f64 * progress).floor() as usize;
    cell.min(width.saturating_sub(1))
}

/// Committed and pending marker cells for a track, given the pending seek
/// offset in seconds.
pub fn markers(width: usize, length: u64, position: u64, skip_seconds: i64) -> (usize, usize) {
    let position = i64::try_from(position).unwrap_or(i64::MAX);
    let pending = position.saturating_add(skip_seconds.saturating_mul(MICROS_PER_SECOND));

    (
        marker_index(width, progress(length, position)),
        marker_index(width, progress(length, pending)),
    )
}

/// Draws the seek bar: dark red up to and including the committed cell, dark
/// grey after it, and `o` on the pending cell.
pub fn seek_bar(width: usize, committed: usize, pending: usize) -> String {
    let cells: Vec<char> = (0..width)
        .map(|cell| if cell == pending { 'o' } else { '-' })
        .collect();

    let split = (committed + 1).min(cells.len());
    let played: String = cells[..split].iter().collect();
    let remaining: String = cells[split..].iter().collect();

    let mut bar = played.dark_red().to_string();
    if !remaining.is_empty() {
        bar.push_str(&remaining.dark_grey().to_string());
    }
    bar
}
