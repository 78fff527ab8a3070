//! Engine configuration
//!
//! Every option is optional; an empty TOML file yields US Letter pages with
//! one-inch margins, 12pt Arial body text and the standard style catalog.
//!
//! ```toml
//! [page]
//! width = 11906
//! height = 16838
//!
//! [page.margins]
//! top = 1134
//! right = 1134
//! bottom = 1134
//! left = 1134
//!
//! [defaults]
//! font_family = "Calibri"
//! font_size = 22
//!
//! [[styles]]
//! id = "Quote"
//! name = "Quote"
//! based_on = "Normal"
//! run = { italic = true }
//! ```

use std::fs;
use std::path::Path;

use docforge_ast::{
    OutlineLevel, PageGeometry, ParagraphProperties, RunProperties, SectionBuilder,
    StyleDefinition,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Page geometry for sections that do not declare their own
    pub page: PageGeometry,
    /// Document-wide run defaults
    pub defaults: DefaultsConfig,
    /// Named style catalog registered at registry initialization
    pub styles: Vec<StyleDefinition>,
}

/// Document-wide defaults, the bottom of every style cascade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub font_family: String,
    /// Body font size in half-points
    pub font_size: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 24,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page: PageGeometry::letter(),
            defaults: DefaultsConfig::default(),
            styles: standard_styles(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// A section builder using the configured page geometry
    pub fn section(&self) -> SectionBuilder {
        SectionBuilder::new(self.page)
    }
}

/// Headings 1-3 and a monospace `Code` style, all based on `Normal`
pub fn standard_styles() -> Vec<StyleDefinition> {
    let heading = |level: u8, size: u32, spacing: u32| {
        let mut paragraph = ParagraphProperties::new().spacing(spacing, spacing);
        // levels 0-2 are always valid
        paragraph.outline_level = OutlineLevel::new(level - 1).ok();
        StyleDefinition::new(format!("Heading{}", level), format!("Heading {}", level))
            .based_on("Normal")
            .next("Normal")
            .quick_format()
            .with_run(RunProperties::new().size(size).bold(true))
            .with_paragraph(paragraph)
    };

    vec![
        heading(1, 32, 240),
        heading(2, 28, 180),
        heading(3, 26, 140),
        StyleDefinition::new("Code", "Code")
            .based_on("Normal")
            .with_run(RunProperties::new().font("Courier New").size(20))
            .with_paragraph(ParagraphProperties::new().spacing(120, 120)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.page.width, 12240);
        assert_eq!(config.page.margins.left, 1440);
        assert_eq!(config.defaults.font_family, "Arial");
        assert_eq!(config.styles.len(), 4);
    }

    #[test]
    fn test_partial_config() {
        let config = EngineConfig::from_toml_str(
            r#"
            [page]
            width = 11906
            height = 16838

            [defaults]
            font_size = 22
            "#,
        )
        .unwrap();

        assert_eq!(config.page.width, 11906);
        assert_eq!(config.page.margins.top, 1440);
        assert_eq!(config.defaults.font_family, "Arial");
        assert_eq!(config.defaults.font_size, 22);
    }

    #[test]
    fn test_style_catalog_replaces_standard() {
        let config = EngineConfig::from_toml_str(
            r#"
            [[styles]]
            id = "Quote"
            name = "Quote"
            based_on = "Normal"
            run = { italic = true, color = "555555" }
            "#,
        )
        .unwrap();

        assert_eq!(config.styles.len(), 1);
        assert_eq!(config.styles[0].run.italic, Some(true));
        assert_eq!(config.styles[0].run.color.as_ref().unwrap().as_str(), "555555");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(EngineConfig::from_toml_str("[page]\nwidth = \"wide\"").is_err());
        assert!(EngineConfig::from_toml_str(
            "[[styles]]\nid = \"H\"\nname = \"H\"\nparagraph = { outline_level = 12 }"
        )
        .is_err());
    }

    #[test]
    fn test_standard_headings() {
        let styles = standard_styles();
        let h2 = styles.iter().find(|s| s.id == "Heading2").unwrap();
        assert_eq!(h2.paragraph.outline_level.map(|l| l.get()), Some(1));
        assert_eq!(h2.run.size, Some(28));
        assert_eq!(h2.based_on.as_deref(), Some("Normal"));
    }
}
