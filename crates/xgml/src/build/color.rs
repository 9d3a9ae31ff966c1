//! Edge `fill` color decoding.

use log::warn;

use crate::error::BuildError;
use crate::model::Color;

/// Length of a `#RRGGBB` color string.
const FILL_LEN: usize = 7;

/// Decodes a `fill` attribute.
///
/// Returns `Ok(None)` when the text is not shaped like `#RRGGBB` (wrong
/// length or missing `#`); such fills are ignored. A correctly shaped string
/// with a non-hex digit is an error.
pub fn parse_fill(raw: &str) -> Result<Option<Color>, BuildError> {
    let bytes = raw.as_bytes();
    if bytes.len() != FILL_LEN || bytes[0] != b'#' {
        warn!(fill = raw; "Ignoring fill color that is not #RRGGBB");
        return Ok(None);
    }
    let channel = |at: usize| {
        hex_pair(&bytes[at..at + 2]).ok_or_else(|| BuildError::MalformedColor {
            raw: raw.to_string(),
        })
    };
    Ok(Some(Color::new(channel(1)?, channel(3)?, channel(5)?)))
}

/// Decodes exactly two hex digits (either case) into a byte.
pub fn hex_pair(pair: &[u8]) -> Option<u8> {
    match pair {
        [hi, lo] => Some(hex_digit(*hi)? << 4 | hex_digit(*lo)?),
        _ => None,
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}
