use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Number of terminal columns `text` occupies.
pub fn display_width(text: &str) -> usize {
    text.width()
}

/// Returns the glyphs of `text` that lie within columns `start..end`.
///
/// A wide glyph whose right half lands on `start` belongs to this slice, and
/// one that would cross `end` does not, so `slice(0, n) + slice(n, m)` never
/// repeats or loses a glyph.
pub fn slice_columns(text: &str, start: usize, end: usize) -> String {
    let mut sliced = String::new();
    let mut column = 0;

    for glyph in text.chars() {
        let width = glyph.width().unwrap_or(0);
        let lead = usize::from(width == 2);

        if column + lead >= start {
            if column + width > end {
                break;
            }
            sliced.push(glyph);
        }
        column += width;
    }

    sliced
}

/// Fits `title@artist` into `width` columns.
///
/// The artist part is kept whole when it can be; the title is shortened
/// first, with a trailing `...` if there is room for it.
pub fn fit_title_artist(title: &str, artist: &str, width: usize) -> String {
    let artist_part = if artist.is_empty() {
        String::new()
    } else {
        format!("@{artist}")
    };

    let artist_width = display_width(&artist_part);
    if artist_width >= width {
        return slice_columns(&artist_part, 0, width);
    }

    let available = width - artist_width;
    if display_width(title) <= available {
        return format!("{title}{artist_part}");
    }

    if available <= ELLIPSIS.len() {
        return format!("{}{artist_part}", slice_columns(title, 0, available));
    }

    let shortened = slice_columns(title, 0, available - ELLIPSIS.len());
    format!("{shortened}{ELLIPSIS}{artist_part}")
}
