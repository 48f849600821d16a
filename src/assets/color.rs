use std::str::FromStr;

use crate::foundation::{
    core::Rgb8,
    error::{CardError, CardResult},
};

/// Parse `#RGB` or `#RRGGBB` (case-insensitive, `#` optional) into an opaque color.
///
/// Three-digit shorthand is expanded by doubling each digit, so `#abc` reads as `#aabbcc`.
pub fn parse_hex(s: &str) -> CardResult<Rgb8> {
    let digits = s.strip_prefix('#').unwrap_or(s);

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CardError::invalid_color(format!(
            "\"{s}\" contains non-hex characters"
        )));
    }

    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_owned(),
        _ => {
            return Err(CardError::invalid_color(format!(
                "\"{s}\" must be #RGB or #RRGGBB"
            )));
        }
    };

    fn hex_byte(pair: &str) -> CardResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| CardError::invalid_color(format!("invalid hex byte \"{pair}\"")))
    }

    Ok(Rgb8::new(
        hex_byte(&expanded[0..2])?,
        hex_byte(&expanded[2..4])?,
        hex_byte(&expanded[4..6])?,
    ))
}

impl FromStr for Rgb8 {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)
    }
}
