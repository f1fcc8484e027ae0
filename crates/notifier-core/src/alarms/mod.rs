//! Sound, vibration and LED decoration for a render.

pub mod blink;
pub mod color;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::LED_NONE;
use crate::error::Result;
use crate::preferences::NotificationPreferences;

pub use blink::{parse_blink_pattern, BlinkPattern};
pub use color::parse_led_color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lights {
    pub argb: u32,
    pub on_ms: u32,
    pub off_ms: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarms {
    /// Ringtone to play with the notification
    pub sound: Option<String>,
    pub vibrate: bool,
    pub lights: Option<Lights>,
}

/// Build the alarm settings for a render from the user's preferences.
///
/// Sound and vibration only apply when `signal` is set. Lights are shown
/// regardless, unless configured off or unparseable; a bad LED preference
/// only costs the lights, never the render.
pub fn decorate(prefs: &dyn NotificationPreferences, signal: bool) -> Alarms {
    let sound = if signal {
        prefs.ringtone().filter(|uri| !uri.trim().is_empty())
    } else {
        None
    };

    let lights = match resolve_lights(prefs) {
        Ok(lights) => lights,
        Err(e) => {
            warn!("Skipping LED decoration: {}", e);
            None
        }
    };

    Alarms {
        sound,
        vibrate: signal && prefs.is_vibrate_enabled(),
        lights,
    }
}

fn resolve_lights(prefs: &dyn NotificationPreferences) -> Result<Option<Lights>> {
    let color = prefs.led_color();
    if color.trim() == LED_NONE {
        return Ok(None);
    }

    let argb = parse_led_color(&color)?;
    let pattern = parse_blink_pattern(&prefs.led_pattern(), &prefs.led_pattern_custom())?;

    Ok(pattern.map(|p| Lights {
        argb,
        on_ms: p.on_ms,
        off_ms: p.off_ms,
    }))
}
