/// Errors raised while building or decorating a notification.
///
/// Only `SourceRead` ends an update cycle. The other variants are recovered
/// where they occur and only show up in logs.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Malformed sender address: {address:?}")]
    MalformedSender { address: String },

    #[error("Failed to read {source_name}: {message}")]
    SourceRead {
        source_name: &'static str,
        message: String,
    },

    #[error("Invalid {field}: {value:?}")]
    DecorationParse { field: &'static str, value: String },

    #[error("Failed to load cue {uri}: {message}")]
    CueLoad { uri: String, message: String },
}

impl NotifierError {
    pub fn source_read(source_name: &'static str, err: impl std::fmt::Display) -> Self {
        NotifierError::SourceRead {
            source_name,
            message: err.to_string(),
        }
    }

    pub fn is_cycle_fatal(&self) -> bool {
        matches!(self, NotifierError::SourceRead { .. })
    }
}

pub type Result<T, E = NotifierError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_source_errors_are_fatal() {
        assert!(NotifierError::source_read("unread messages", "disk gone").is_cycle_fatal());
        assert!(!NotifierError::MalformedSender {
            address: "??".to_string()
        }
        .is_cycle_fatal());
        assert!(!NotifierError::DecorationParse {
            field: "LED color",
            value: "mauve-ish".to_string()
        }
        .is_cycle_fatal());
    }

    #[test]
    fn test_error_messages() {
        let err = NotifierError::source_read("pending messages", "cursor closed");
        assert_eq!(err.to_string(), "Failed to read pending messages: cursor closed");

        let err = NotifierError::DecorationParse {
            field: "LED blink pattern",
            value: "fast".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid LED blink pattern: \"fast\"");
    }
}
