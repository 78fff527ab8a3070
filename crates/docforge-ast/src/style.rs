//! Style vocabulary shared by the tree and the style registry
//!
//! Every property is optional so that a definition, a paragraph or a run
//! only states what it overrides. Merging is done per property with
//! [`RunProperties::apply`] and [`ParagraphProperties::apply`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StructuralError};

/// Paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Value of the `w:jc` attribute
    pub fn as_ooxml(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

/// Structural heading depth (0 = top level), independent of font size
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OutlineLevel(u8);

impl OutlineLevel {
    /// Deepest level a word processor understands
    pub const MAX: u8 = 8;

    /// Create an outline level, rejecting anything beyond [`OutlineLevel::MAX`]
    pub fn new(level: u8) -> Result<Self> {
        if level > Self::MAX {
            return Err(StructuralError::InvalidOutlineLevel(level));
        }
        Ok(Self(level))
    }

    /// The raw 0-based level
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for OutlineLevel {
    type Error = StructuralError;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

impl From<OutlineLevel> for u8 {
    fn from(level: OutlineLevel) -> u8 {
        level.0
    }
}

/// A color: `auto` or six hex digits (normalized to upper case)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parse a hex color such as `D5E8F0` or `#d5e8f0`
    pub fn hex(value: &str) -> Result<Self> {
        let trimmed = value.trim_start_matches('#');
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::auto());
        }
        if trimmed.len() != 6 || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StructuralError::InvalidColor(value.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The application-chosen color
    pub fn auto() -> Self {
        Self("auto".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = StructuralError;

    fn try_from(value: String) -> Result<Self> {
        Self::hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.0
    }
}

/// Character-level formatting
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunProperties {
    /// Font family name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in half-points (24 = 12pt)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl RunProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Overwrite every property that `overrides` sets, keeping the rest
    pub fn apply(&mut self, overrides: &RunProperties) {
        if let Some(ref family) = overrides.font_family {
            self.font_family = Some(family.clone());
        }
        if overrides.size.is_some() {
            self.size = overrides.size;
        }
        if overrides.bold.is_some() {
            self.bold = overrides.bold;
        }
        if overrides.italic.is_some() {
            self.italic = overrides.italic;
        }
        if let Some(ref color) = overrides.color {
            self.color = Some(color.clone());
        }
    }

    /// True when no property is set
    pub fn is_empty(&self) -> bool {
        self.font_family.is_none()
            && self.size.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.color.is_none()
    }
}

/// Paragraph-level formatting
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphProperties {
    /// Space before the paragraph, in twips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_before: Option<u32>,
    /// Space after the paragraph, in twips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_after: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_level: Option<OutlineLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl ParagraphProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing_before = Some(before);
        self.spacing_after = Some(after);
        self
    }

    pub fn outline_level(mut self, level: OutlineLevel) -> Self {
        self.outline_level = Some(level);
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Overwrite every property that `overrides` sets, keeping the rest
    pub fn apply(&mut self, overrides: &ParagraphProperties) {
        if overrides.spacing_before.is_some() {
            self.spacing_before = overrides.spacing_before;
        }
        if overrides.spacing_after.is_some() {
            self.spacing_after = overrides.spacing_after;
        }
        if overrides.outline_level.is_some() {
            self.outline_level = overrides.outline_level;
        }
        if overrides.alignment.is_some() {
            self.alignment = overrides.alignment;
        }
    }

    /// True when no property is set
    pub fn is_empty(&self) -> bool {
        self.spacing_before.is_none()
            && self.spacing_after.is_none()
            && self.outline_level.is_none()
            && self.alignment.is_none()
    }
}

/// A named paragraph style
///
/// `based_on` is a plain id reference; the registry walks it iteratively
/// and rejects cycles when the style is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDefinition {
    /// Style ID (used in document references)
    pub id: String,
    /// Display name
    pub name: String,
    /// Parent style ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<String>,
    /// Style for the following paragraph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Show in the quick style gallery
    #[serde(default)]
    pub quick_format: bool,
    #[serde(default)]
    pub run: RunProperties,
    #[serde(default)]
    pub paragraph: ParagraphProperties,
}

impl StyleDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            based_on: None,
            next: None,
            quick_format: false,
            run: RunProperties::default(),
            paragraph: ParagraphProperties::default(),
        }
    }

    pub fn based_on(mut self, parent: impl Into<String>) -> Self {
        self.based_on = Some(parent.into());
        self
    }

    pub fn next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn quick_format(mut self) -> Self {
        self.quick_format = true;
        self
    }

    pub fn with_run(mut self, run: RunProperties) -> Self {
        self.run = run;
        self
    }

    pub fn with_paragraph(mut self, paragraph: ParagraphProperties) -> Self {
        self.paragraph = paragraph;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_normalization() {
        assert_eq!(Color::hex("d5e8f0").unwrap().as_str(), "D5E8F0");
        assert_eq!(Color::hex("#cccccc").unwrap().as_str(), "CCCCCC");
        assert_eq!(Color::hex("AUTO").unwrap(), Color::auto());
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert_eq!(
            Color::hex("12345"),
            Err(StructuralError::InvalidColor("12345".to_string()))
        );
        assert!(Color::hex("GGGGGG").is_err());
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }

    #[test]
    fn test_outline_level_bounds() {
        assert_eq!(OutlineLevel::new(0).unwrap().get(), 0);
        assert_eq!(OutlineLevel::new(8).unwrap().get(), 8);
        assert_eq!(
            OutlineLevel::new(9),
            Err(StructuralError::InvalidOutlineLevel(9))
        );
        assert!(serde_json::from_str::<OutlineLevel>("12").is_err());
    }

    #[test]
    fn test_run_properties_apply_is_per_property() {
        let mut base = RunProperties::new().font("Arial").size(24);
        base.apply(&RunProperties::new().bold(true));

        assert_eq!(base.font_family.as_deref(), Some("Arial"));
        assert_eq!(base.size, Some(24));
        assert_eq!(base.bold, Some(true));
        assert_eq!(base.italic, None);
    }

    #[test]
    fn test_paragraph_properties_apply() {
        let mut base = ParagraphProperties::new().spacing(240, 240);
        base.apply(&ParagraphProperties {
            spacing_after: Some(480),
            ..Default::default()
        });

        assert_eq!(base.spacing_before, Some(240));
        assert_eq!(base.spacing_after, Some(480));
        assert!(!base.is_empty());
        assert!(ParagraphProperties::new().is_empty());
    }

    #[test]
    fn test_style_definition_from_json() {
        let json = r#"{
            "id": "Heading1",
            "name": "Heading 1",
            "based_on": "Normal",
            "quick_format": true,
            "run": { "size": 32, "bold": true },
            "paragraph": { "spacing_before": 240, "outline_level": 0 }
        }"#;
        let style: StyleDefinition = serde_json::from_str(json).unwrap();

        assert_eq!(style.based_on.as_deref(), Some("Normal"));
        assert_eq!(style.run.size, Some(32));
        assert_eq!(style.paragraph.outline_level, Some(OutlineLevel::new(0).unwrap()));
        assert!(style.next.is_none());
    }
}
