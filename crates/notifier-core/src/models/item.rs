use serde::{Deserialize, Serialize};

use super::recipient::{Recipient, Recipients};
use super::styled::{StyledText, TextStyle};
use crate::constants::{DECRYPTING_PLACEHOLDER, ENCRYPTED_MESSAGE, UNRESOLVED_THREAD};

/// Where the host should take the user when a notification is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationTarget {
    /// A specific conversation
    Thread {
        thread_id: i64,
        recipients: Recipients,
    },
    /// The app's default landing view (conversation list)
    Landing,
}

/// Italic "Encrypted message" text shown for bodies we cannot display.
pub fn encrypted_placeholder() -> StyledText {
    StyledText::italic(ENCRYPTED_MESSAGE)
}

/// Turn a stored body into display text.
///
/// The store briefly reports the "decrypting" placeholder for messages that
/// were received but not yet decrypted; those render as the italic
/// encrypted-message placeholder instead of the literal stored text.
pub fn normalize_body(raw: &str) -> StyledText {
    if raw == DECRYPTING_PLACEHOLDER {
        encrypted_placeholder()
    } else {
        StyledText::plain(raw)
    }
}

/// One pending message, normalized from either source.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationItem {
    pub individual_recipient: Recipient,
    pub recipients: Recipients,
    pub thread_recipients: Option<Recipients>,
    pub thread_id: i64,
    pub body: StyledText,
    pub image: Option<String>,
}

impl NotificationItem {
    pub fn new(
        individual_recipient: Recipient,
        recipients: Recipients,
        thread_recipients: Option<Recipients>,
        thread_id: i64,
        body: StyledText,
        image: Option<String>,
    ) -> Self {
        Self {
            individual_recipient,
            recipients,
            thread_recipients,
            thread_id,
            body,
            image,
        }
    }

    pub fn has_resolved_thread(&self) -> bool {
        self.thread_id != UNRESOLVED_THREAD
    }

    pub fn individual_recipient_name(&self) -> String {
        self.individual_recipient.to_short_string()
    }

    pub fn text(&self) -> &StyledText {
        &self.body
    }

    /// `"{sender}: {body}"` on one line, unstyled.
    pub fn ticker_text(&self) -> String {
        format!("{}: {}", self.individual_recipient_name(), self.body.to_plain())
    }

    /// Sender name in bold followed by the styled body.
    pub fn big_style_summary(&self) -> StyledText {
        StyledText::bold(self.individual_recipient_name())
            .append(": ", TextStyle::Plain)
            .concat(&self.body)
    }

    /// Target that opens this item's conversation. Uses the thread's own
    /// participants when known so group threads open correctly.
    pub fn navigation_target(&self) -> NavigationTarget {
        NavigationTarget::Thread {
            thread_id: self.thread_id,
            recipients: self
                .thread_recipients
                .clone()
                .unwrap_or_else(|| self.recipients.clone()),
        }
    }
}
