use parking_lot::Mutex;
use std::collections::HashMap;

use crate::models::Recipient;

/// Current wall-clock time in Unix milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Per-recipient mute settings.
pub trait SilenceLookup: Send + Sync {
    /// True while the recipient's "silenced until" instant is after `now_ms`.
    fn is_silenced_now(&self, recipient: &Recipient, now_ms: i64) -> bool;
}

/// Mute expiries keyed by recipient address.
#[derive(Debug, Default)]
pub struct MuteTable {
    until: Mutex<HashMap<String, i64>>,
}

impl MuteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mute_until(&self, address: &str, until_ms: i64) {
        self.until.lock().insert(address.to_string(), until_ms);
    }

    pub fn unmute(&self, address: &str) {
        self.until.lock().remove(address);
    }

    pub fn muted_until(&self, address: &str) -> Option<i64> {
        self.until.lock().get(address).copied()
    }
}

impl From<HashMap<String, i64>> for MuteTable {
    fn from(until: HashMap<String, i64>) -> Self {
        Self {
            until: Mutex::new(until),
        }
    }
}

impl SilenceLookup for MuteTable {
    fn is_silenced_now(&self, recipient: &Recipient, now_ms: i64) -> bool {
        self.muted_until(&recipient.address)
            .map(|until| until > now_ms)
            .unwrap_or(false)
    }
}
