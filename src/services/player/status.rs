use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{MediaState, ParseError, PlaybackState};

/// `playerctl --format` template producing one status line per change.
///
/// Every field goes through `markup_escape`, so field values never contain
/// a raw `<`.
pub const STATUS_FORMAT: &str = concat!(
    "<mediaState>",
    "<status>{{markup_escape(status)}}</status>",
    "<title>{{markup_escape(title)}}</title>",
    "<artist>{{markup_escape(artist)}}</artist>",
    "<length>{{markup_escape(mpris:length)}}</length>",
    "<position>{{markup_escape(position)}}</position>",
    "</mediaState>"
);

#[allow(clippy::expect_used)]
static STATUS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*<mediaState>",
        r"\s*<status>(?P<status>[^<]*)</status>",
        r"\s*<title>(?P<title>[^<]*)</title>",
        r"\s*<artist>(?P<artist>[^<]*)</artist>",
        r"\s*<length>(?P<length>[^<]*)</length>",
        r"\s*<position>(?P<position>[^<]*)</position>",
        r"\s*</mediaState>\s*$"
    ))
    .expect("status pattern is valid")
});

#[allow(clippy::expect_used)]
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[xX](?P<hex>[0-9a-fA-F]+)|#(?P<dec>[0-9]+)|(?P<named>amp|lt|gt|quot|apos));")
        .expect("entity pattern is valid")
});

/// Decodes one line produced with [`STATUS_FORMAT`].
///
/// Empty `length`/`position` fields (players that do not report them) read
/// as zero.
///
/// # Errors
///
/// Returns `ParseError::Malformed` if the line does not have the status
/// layout, or `ParseError::InvalidNumber` if a numeric field is not a
/// non-negative integer.
pub fn parse_status_line(line: &str) -> Result<MediaState, ParseError> {
    let captures = STATUS_LINE.captures(line).ok_or(ParseError::Malformed)?;

    let field = |name: &str| captures.name(name).map_or("", |m| m.as_str());

    Ok(MediaState {
        status: PlaybackState::from(unescape_markup(field("status")).trim()),
        title: unescape_markup(field("title")),
        artist: unescape_markup(field("artist")),
        length: parse_micros("length", field("length"))?,
        position: parse_micros("position", field("position"))?,
    })
}

fn parse_micros(field: &'static str, raw: &str) -> Result<u64, ParseError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(0);
    }

    value.parse::<u64>().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Reverses `markup_escape`: the five named entities and numeric character
/// references. Unknown or invalid references are left as they are.
pub(crate) fn unescape_markup(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY
        .replace_all(text, |caps: &Captures<'_>| decode_entity(caps))
        .into_owned()
}

fn decode_entity(caps: &Captures<'_>) -> String {
    let original = caps.get(0).map_or("", |m| m.as_str());

    if let Some(named) = caps.name("named") {
        let decoded = match named.as_str() {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            _ => '\'',
        };
        return decoded.to_string();
    }

    let code = caps
        .name("hex")
        .and_then(|hex| u32::from_str_radix(hex.as_str(), 16).ok())
        .or_else(|| caps.name("dec").and_then(|dec| dec.as_str().parse().ok()));

    code.and_then(char::from_u32)
        .map_or_else(|| original.to_string(), |c| c.to_string())
}
