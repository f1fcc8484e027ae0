use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_RECIPIENT_NAME;
use crate::error::{NotifierError, Result};

/// A single conversation participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipient {
    /// Normalized address (phone number or email-style handle)
    pub address: String,
    /// Display name from the address book, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Reference to the contact photo used as the large notification icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_photo: Option<String>,
}

impl Recipient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
            contact_photo: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_contact_photo(mut self, photo: impl Into<String>) -> Self {
        self.contact_photo = Some(photo.into());
        self
    }

    /// Placeholder identity for senders whose address could not be parsed.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_RECIPIENT_NAME).with_name(UNKNOWN_RECIPIENT_NAME)
    }

    pub fn is_unknown(&self) -> bool {
        self.address == UNKNOWN_RECIPIENT_NAME
    }

    /// Parse a raw sender/destination string into a recipient.
    ///
    /// Accepts `local@domain` handles as-is and phone numbers with the usual
    /// separators (spaces, dashes, dots, parentheses), which are stripped.
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = || NotifierError::MalformedSender {
            address: raw.to_string(),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(malformed());
        }

        if let Some((local, domain)) = trimmed.split_once('@') {
            let valid = !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !trimmed.chars().any(char::is_whitespace);
            return if valid {
                Ok(Self::new(trimmed))
            } else {
                Err(malformed())
            };
        }

        let compact: String = trimmed
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .collect();
        let digits = compact.strip_prefix('+').unwrap_or(&compact);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }

        Ok(Self::new(compact))
    }

    /// Name if we have one, otherwise the raw address.
    pub fn to_short_string(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self.address.clone(),
        }
    }
}

/// The participants of a conversation. The first entry is the primary recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipients(Vec<Recipient>);

impl Recipients {
    pub fn new(recipients: Vec<Recipient>) -> Self {
        Self(recipients)
    }

    pub fn single(recipient: Recipient) -> Self {
        Self(vec![recipient])
    }

    pub fn primary_recipient(&self) -> Option<&Recipient> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipient> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds a participant unless one with the same address is already present.
    pub fn push(&mut self, recipient: Recipient) {
        if !self.0.iter().any(|r| r.address == recipient.address) {
            self.0.push(recipient);
        }
    }

    /// True when both sets contain exactly the same addresses, in any order.
    pub fn same_members(&self, other: &Recipients) -> bool {
        let mut mine: Vec<&str> = self.0.iter().map(|r| r.address.as_str()).collect();
        let mut theirs: Vec<&str> = other.0.iter().map(|r| r.address.as_str()).collect();
        mine.sort_unstable();
        theirs.sort_unstable();
        mine == theirs
    }

    pub fn to_short_string(&self) -> String {
        self.0
            .iter()
            .map(Recipient::to_short_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<Recipient> for Recipients {
    fn from(recipient: Recipient) -> Self {
        Self::single(recipient)
    }
}
