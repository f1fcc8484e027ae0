use crate::error::{NotifierError, Result};

const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0xFF000000),
    ("darkgray", 0xFF444444),
    ("gray", 0xFF888888),
    ("lightgray", 0xFFCCCCCC),
    ("white", 0xFFFFFFFF),
    ("red", 0xFFFF0000),
    ("green", 0xFF00FF00),
    ("blue", 0xFF0000FF),
    ("yellow", 0xFFFFFF00),
    ("cyan", 0xFF00FFFF),
    ("magenta", 0xFFFF00FF),
    ("aqua", 0xFF00FFFF),
    ("fuchsia", 0xFFFF00FF),
    ("darkgrey", 0xFF444444),
    ("grey", 0xFF888888),
    ("lightgrey", 0xFFCCCCCC),
    ("lime", 0xFF00FF00),
    ("maroon", 0xFF800000),
    ("navy", 0xFF000080),
    ("olive", 0xFF808000),
    ("purple", 0xFF800080),
    ("silver", 0xFFC0C0C0),
    ("teal", 0xFF008080),
];

/// Parse an LED color preference into ARGB.
///
/// Accepts `#RRGGBB`, `#AARRGGBB` and the common color names
/// (case-insensitive).
pub fn parse_led_color(value: &str) -> Result<u32> {
    let invalid = || NotifierError::DecorationParse {
        field: "LED color",
        value: value.to_string(),
    };

    let trimmed = value.trim();
    if let Some(hex) = trimmed.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let parsed = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        return match hex.len() {
            6 => Ok(0xFF00_0000 | parsed),
            8 => Ok(parsed),
            _ => Err(invalid()),
        };
    }

    let lower = trimmed.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, argb)| *argb)
        .ok_or_else(invalid)
}
