use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    Plain,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledSpan {
    pub text: String,
    pub style: TextStyle,
}

/// Display text made of styled runs. Immutable once built; the `append`
/// helpers consume `self` and return the extended value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyledText(Vec<StyledSpan>);

impl StyledText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::default().append(text, TextStyle::Plain)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::default().append(text, TextStyle::Bold)
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::default().append(text, TextStyle::Italic)
    }

    pub fn append(mut self, text: impl Into<String>, style: TextStyle) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        match self.0.last_mut() {
            Some(last) if last.style == style => last.text.push_str(&text),
            _ => self.0.push(StyledSpan { text, style }),
        }
        self
    }

    pub fn concat(mut self, other: &StyledText) -> Self {
        for span in &other.0 {
            self = self.append(span.text.clone(), span.style);
        }
        self
    }

    pub fn spans(&self) -> &[StyledSpan] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The text with all styling dropped.
    pub fn to_plain(&self) -> String {
        self.0.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_entirely(&self, style: TextStyle) -> bool {
        !self.0.is_empty() && self.0.iter().all(|s| s.style == style)
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.0 {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_merges_same_style() {
        let text = StyledText::bold("Alice")
            .append(": ", TextStyle::Plain)
            .append("hi", TextStyle::Plain);
        assert_eq!(text.spans().len(), 2);
        assert_eq!(text.to_plain(), "Alice: hi");
        assert_eq!(text.to_string(), "Alice: hi");
    }

    #[test]
    fn test_empty_runs_are_dropped() {
        let text = StyledText::plain("").append("", TextStyle::Italic);
        assert!(text.is_empty());
        assert!(!text.is_entirely(TextStyle::Italic));
    }

    #[test]
    fn test_concat_keeps_styles() {
        let text = StyledText::bold("Bob").concat(&StyledText::italic("secret"));
        assert_eq!(
            text.spans(),
            &[
                StyledSpan {
                    text: "Bob".to_string(),
                    style: TextStyle::Bold
                },
                StyledSpan {
                    text: "secret".to_string(),
                    style: TextStyle::Italic
                },
            ]
        );
    }
}
