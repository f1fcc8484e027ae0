use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::alarms::{parse_blink_pattern, parse_led_color};
use crate::constants::LED_NONE;

const PREFERENCES_FILE: &str = "notification_preferences.json";

/// Read access to the user's notification settings.
pub trait NotificationPreferences: Send + Sync {
    fn is_notifications_enabled(&self) -> bool;

    fn is_in_thread_alerts_enabled(&self) -> bool;

    /// Ringtone URI, `None` for silent
    fn ringtone(&self) -> Option<String>;

    fn is_vibrate_enabled(&self) -> bool;

    /// `#RRGGBB`, a color name, or `"none"`
    fn led_color(&self) -> String;

    /// A preset like `"500,2000"`, `"none"`, or `"custom"`
    fn led_pattern(&self) -> String;

    /// Used when `led_pattern()` is `"custom"`
    fn led_pattern_custom(&self) -> String;
}

/// Notification settings (persisted to JSON file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub notifications_enabled: bool,
    pub in_thread_alerts: bool,
    pub ringtone: Option<String>,
    pub vibrate: bool,
    pub led_color: String,
    pub led_pattern: String,
    pub led_pattern_custom: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            in_thread_alerts: true,
            ringtone: None,
            vibrate: true,
            led_color: "green".to_string(),
            led_pattern: "500,2000".to_string(),
            led_pattern_custom: "500,2000".to_string(),
        }
    }
}

impl NotificationPreferences for Preferences {
    fn is_notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    fn is_in_thread_alerts_enabled(&self) -> bool {
        self.in_thread_alerts
    }

    fn ringtone(&self) -> Option<String> {
        self.ringtone.clone()
    }

    fn is_vibrate_enabled(&self) -> bool {
        self.vibrate
    }

    fn led_color(&self) -> String {
        self.led_color.clone()
    }

    fn led_pattern(&self) -> String {
        self.led_pattern.clone()
    }

    fn led_pattern_custom(&self) -> String {
        self.led_pattern_custom.clone()
    }
}

/// Preferences backed by `notification_preferences.json` in a data directory.
///
/// A missing or unreadable file yields defaults; it is only written on save.
pub struct PreferencesStorage {
    path: PathBuf,
    pub prefs: Preferences,
}

impl PreferencesStorage {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let path = data_dir.as_ref().join(PREFERENCES_FILE);
        let prefs = Self::load_from_file(&path).unwrap_or_default();
        Self { path, prefs }
    }

    fn load_from_file(path: &Path) -> Option<Preferences> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(prefs) => Some(prefs),
            Err(e) => {
                tracing::warn!("Ignoring corrupt {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let json =
            serde_json::to_string_pretty(&self.prefs).context("Failed to serialize preferences")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    pub fn set_notifications_enabled(&mut self, value: bool) -> Result<()> {
        self.prefs.notifications_enabled = value;
        self.save()
    }

    pub fn set_in_thread_alerts(&mut self, value: bool) -> Result<()> {
        self.prefs.in_thread_alerts = value;
        self.save()
    }

    /// An empty URI means silent.
    pub fn set_ringtone(&mut self, uri: Option<String>) -> Result<()> {
        self.prefs.ringtone = uri.filter(|uri| !uri.trim().is_empty());
        self.save()
    }

    pub fn set_vibrate(&mut self, value: bool) -> Result<()> {
        self.prefs.vibrate = value;
        self.save()
    }

    /// Rejects colors the decoration step could not show.
    pub fn set_led_color(&mut self, color: &str) -> Result<()> {
        if color != LED_NONE {
            parse_led_color(color)?;
        }
        self.prefs.led_color = color.to_string();
        self.save()
    }

    /// `custom` replaces the stored custom pattern when given.
    pub fn set_led_pattern(&mut self, pattern: &str, custom: Option<&str>) -> Result<()> {
        let custom = custom
            .unwrap_or(self.prefs.led_pattern_custom.as_str())
            .to_string();
        parse_blink_pattern(pattern, &custom)?;
        self.prefs.led_pattern = pattern.to_string();
        self.prefs.led_pattern_custom = custom;
        self.save()
    }
}

impl NotificationPreferences for PreferencesStorage {
    fn is_notifications_enabled(&self) -> bool {
        self.prefs.is_notifications_enabled()
    }

    fn is_in_thread_alerts_enabled(&self) -> bool {
        self.prefs.is_in_thread_alerts_enabled()
    }

    fn ringtone(&self) -> Option<String> {
        self.prefs.ringtone()
    }

    fn is_vibrate_enabled(&self) -> bool {
        self.prefs.is_vibrate_enabled()
    }

    fn led_color(&self) -> String {
        self.prefs.led_color()
    }

    fn led_pattern(&self) -> String {
        self.prefs.led_pattern()
    }

    fn led_pattern_custom(&self) -> String {
        self.prefs.led_pattern_custom()
    }
}
