const MICROS_PER_SECOND: u64 = 1_000_000;

/// `H:MM:SS` when there are hours, `MM:SS` otherwise.
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Formats a microsecond position as a playback time.
pub fn format_micros(micros: u64) -> String {
    format_time(micros / MICROS_PER_SECOND)
}

/// Pending seek offset with an explicit sign; empty when there is none.
pub fn format_skip(seconds: i64) -> String {
    match seconds.signum() {
        0 => String::new(),
        1 => format!("+{}", format_time(seconds.unsigned_abs())),
        _ => format!("-{}", format_time(seconds.unsigned_abs())),
    }
}

/// Position, pending skip and length on one row, length right-aligned.
pub fn time_line(position: u64, length: u64, skip_seconds: i64, width: usize) -> String {
    let position = format_micros(position);
    let skip = format_skip(skip_seconds);
    let length = format_micros(length);

    let padding = width.saturating_sub(position.len() + skip.len() + length.len());
    format!("{position}{skip}{}{length}", " ".repeat(padding))
}
