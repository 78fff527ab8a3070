//! Inline elements for document content
//!
//! A [`Run`] is a span of text with local formatting overrides.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StructuralError};
use crate::style::{Color, RunProperties};

/// Check that every character of `text` is allowed in an XML 1.0 document
///
/// Tab, line feed and carriage return are the only control characters
/// accepted; U+FFFE and U+FFFF are rejected too.
pub fn check_xml_text(text: &str) -> Result<()> {
    match text.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(StructuralError::InvalidText {
            codepoint: u32::from(c),
        }),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// An inline span of text with local formatting overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RunInput")]
pub struct Run {
    /// The text content
    pub text: String,
    /// Overrides applied on top of the paragraph's resolved style
    #[serde(flatten)]
    pub props: RunProperties,
}

/// Accepted input shapes: a bare string or an object with overrides
#[derive(Deserialize)]
#[serde(untagged)]
enum RunInput {
    Text(String),
    Styled {
        text: String,
        #[serde(flatten)]
        props: RunProperties,
    },
}

impl From<RunInput> for Run {
    fn from(input: RunInput) -> Self {
        match input {
            RunInput::Text(text) => Run::new(text),
            RunInput::Styled { text, props } => Run { text, props },
        }
    }
}

impl Run {
    /// Create a run with no overrides
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            props: RunProperties::default(),
        }
    }

    pub fn bold(mut self) -> Self {
        self.props.bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.props.italic = Some(true);
        self
    }

    /// Font size in half-points
    pub fn size(mut self, half_points: u32) -> Self {
        self.props.size = Some(half_points);
        self
    }

    pub fn font(mut self, family: impl Into<String>) -> Self {
        self.props.font_family = Some(family.into());
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.props.color = Some(color);
        self
    }

    /// Check the text and font family for characters XML cannot carry
    pub fn check_text(&self) -> Result<()> {
        check_xml_text(&self.text)?;
        if let Some(ref family) = self.props.font_family {
            check_xml_text(family)?;
        }
        Ok(())
    }

    /// Replace all overrides at once
    pub fn with_props(mut self, props: RunProperties) -> Self {
        self.props = props;
        self
    }
}

impl From<&str> for Run {
    fn from(text: &str) -> Self {
        Run::new(text)
    }
}

impl From<String> for Run {
    fn from(text: String) -> Self {
        Run::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_builders() {
        let run = Run::new("Version 1.0").size(24).italic();
        assert_eq!(run.text, "Version 1.0");
        assert_eq!(run.props.size, Some(24));
        assert_eq!(run.props.italic, Some(true));
        assert_eq!(run.props.bold, None);
    }

    #[test]
    fn test_xml_text_check() {
        assert!(check_xml_text("tab\tline\nreturn\r \u{e9}\u{1F600}").is_ok());
        assert_eq!(
            check_xml_text("bell\u{7}nul\u{0}"),
            Err(StructuralError::InvalidText { codepoint: 7 })
        );
        assert_eq!(
            check_xml_text("\u{FFFE}"),
            Err(StructuralError::InvalidText { codepoint: 0xFFFE })
        );
        assert!(Run::new("ok").font("Bad\u{1}Font").check_text().is_err());
    }

    #[test]
    fn test_run_from_plain_string_json() {
        let run: Run = serde_json::from_str("\"Data Source\"").unwrap();
        assert_eq!(run, Run::new("Data Source"));
    }

    #[test]
    fn test_run_from_object_json() {
        let run: Run = serde_json::from_str(r#"{"text": "Component", "bold": true}"#).unwrap();
        assert_eq!(run, Run::new("Component").bold());
    }
}
