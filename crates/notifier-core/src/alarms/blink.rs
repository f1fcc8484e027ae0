use serde::{Deserialize, Serialize};

use crate::constants::{LED_NONE, LED_PATTERN_CUSTOM};
use crate::error::{NotifierError, Result};

/// LED on/off durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkPattern {
    pub on_ms: u32,
    pub off_ms: u32,
}

/// Resolve the LED blink preference into durations.
///
/// `pattern` is a preset like `"500,2000"`, `"none"`, or `"custom"`, in which
/// case `custom` is used instead. `Ok(None)` means lights are off.
pub fn parse_blink_pattern(pattern: &str, custom: &str) -> Result<Option<BlinkPattern>> {
    let resolved = if pattern == LED_PATTERN_CUSTOM {
        custom
    } else {
        pattern
    };

    if resolved.trim() == LED_NONE {
        return Ok(None);
    }

    let invalid = || NotifierError::DecorationParse {
        field: "LED blink pattern",
        value: resolved.to_string(),
    };

    let mut parts = resolved.split(',');
    let mut next_ms = || -> Result<u32> {
        parts
            .next()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .ok_or_else(invalid)
    };

    let on_ms = next_ms()?;
    let off_ms = next_ms()?;
    Ok(Some(BlinkPattern { on_ms, off_ms }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_pattern() {
        assert_eq!(
            parse_blink_pattern("custom", "500,500").unwrap(),
            Some(BlinkPattern {
                on_ms: 500,
                off_ms: 500
            })
        );
    }

    #[test]
    fn test_preset_pattern_ignores_custom() {
        assert_eq!(
            parse_blink_pattern("500,2000", "garbage").unwrap(),
            Some(BlinkPattern {
                on_ms: 500,
                off_ms: 2000
            })
        );
    }

    #[test]
    fn test_none_disables_lights() {
        assert_eq!(parse_blink_pattern("none", "500,500").unwrap(), None);
        assert_eq!(parse_blink_pattern("custom", "none").unwrap(), None);
    }

    #[test]
    fn test_whitespace_around_fields() {
        assert_eq!(
            parse_blink_pattern("custom", " 250 , 1000 ").unwrap(),
            Some(BlinkPattern {
                on_ms: 250,
                off_ms: 1000
            })
        );
    }

    #[test]
    fn test_malformed_custom_pattern() {
        for custom in ["fast", "500", "500,", ",500", "500;500", "-1,500"] {
            match parse_blink_pattern("custom", custom) {
                Err(NotifierError::DecorationParse { value, .. }) => assert_eq!(value, custom),
                other => panic!("expected DecorationParse for {:?}, got {:?}", custom, other),
            }
        }
    }
}
