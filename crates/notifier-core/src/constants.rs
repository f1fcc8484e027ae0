//! Shared constants
//!
//! Display strings, identifiers and tuning values used by more than one module.

/// Notification slot shared by the single-thread and multi-thread renders.
pub const CANONICAL_NOTIFICATION_ID: i64 = 1338;

/// Thread id carried by records that have not been linked to a conversation yet.
pub const UNRESOLVED_THREAD: i64 = -1;

/// Body stored by the message store while decryption is still in flight.
pub const DECRYPTING_PLACEHOLDER: &str = "Decrypting, please wait...";

/// Shown (in italics) in place of any body we cannot display yet.
pub const ENCRYPTED_MESSAGE: &str = "Encrypted message";

pub const UNKNOWN_RECIPIENT_NAME: &str = "Unknown";

// Chime
pub const CHIME_VOLUME: f32 = 0.25;

// LED preference sentinels
pub const LED_NONE: &str = "none";
pub const LED_PATTERN_CUSTOM: &str = "custom";

pub mod strings {
    pub const MARK_AS_READ: &str = "Mark as read";
    pub const MARK_ALL_AS_READ: &str = "Mark all as read";
    pub const DELIVERY_FAILED_TITLE: &str = "Message delivery failed";
    pub const DELIVERY_FAILED_TEXT: &str = "Failed to deliver message.";
    pub const DELIVERY_FAILED_TICKER: &str = "Error delivering message.";

    pub fn new_messages(count: usize) -> String {
        format!("{} new messages", count)
    }

    pub fn most_recent_from(name: &str) -> String {
        format!("Most recent from {}", name)
    }
}

pub mod icons {
    pub const NOTIFICATION: &str = "icon_notification";
    pub const DELIVERY_WARNING: &str = "ic_action_warning_red";
    pub const CHECK: &str = "check";
}
