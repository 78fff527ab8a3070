//! Style registry and cascade resolution (word/styles.xml)
//!
//! The registry holds named paragraph styles and computes the effective
//! formatting of any element. Precedence, lowest first:
//!
//! 1. document defaults ([`DefaultsConfig`])
//! 2. the named style's `basedOn` chain, root-most parent first
//! 3. the element's named style (or `Normal` when it names none)
//! 4. the element's inline overrides
//!
//! Every property merges independently, so an inline bold override keeps
//! the inherited font family.

use std::collections::{HashMap, HashSet};

use docforge_ast::{
    check_xml_text, Alignment, Block, Color, Document, OutlineLevel, ParagraphProperties,
    RunProperties, StructuralError, StyleDefinition,
};

use crate::config::{DefaultsConfig, EngineConfig};
use crate::writer::{escape_xml, paragraph_properties_xml, run_properties_xml, WORDML_NS};

/// ID of the built-in default paragraph style
pub const DEFAULT_STYLE_ID: &str = "Normal";

type StyleResult<T> = std::result::Result<T, StructuralError>;

/// Fully resolved formatting: every property has a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub font_family: String,
    /// Font size in half-points
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    /// Twips
    pub spacing_before: u32,
    /// Twips
    pub spacing_after: u32,
    pub outline_level: Option<OutlineLevel>,
    pub alignment: Alignment,
}

impl ResolvedStyle {
    /// The run half as explicit properties
    pub fn run_properties(&self) -> RunProperties {
        RunProperties {
            font_family: Some(self.font_family.clone()),
            size: Some(self.size),
            bold: Some(self.bold),
            italic: Some(self.italic),
            color: Some(self.color.clone()),
        }
    }

    /// The paragraph half as explicit properties
    pub fn paragraph_properties(&self) -> ParagraphProperties {
        ParagraphProperties {
            spacing_before: Some(self.spacing_before),
            spacing_after: Some(self.spacing_after),
            outline_level: self.outline_level,
            alignment: Some(self.alignment),
        }
    }

    /// True when this formatting marks a structural heading
    pub fn is_heading(&self) -> bool {
        self.outline_level.is_some()
    }
}

/// Named style definitions for one document build
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    defaults: DefaultsConfig,
    /// Definitions in registration order
    styles: Vec<StyleDefinition>,
    /// Style ID to position in `styles`
    index: HashMap<String, usize>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new(DefaultsConfig::default())
    }
}

impl StyleRegistry {
    /// Create a registry holding only the built-in `Normal` style
    pub fn new(defaults: DefaultsConfig) -> Self {
        let normal = StyleDefinition::new(DEFAULT_STYLE_ID, DEFAULT_STYLE_ID).quick_format();
        let mut index = HashMap::new();
        index.insert(normal.id.clone(), 0);
        Self {
            defaults,
            styles: vec![normal],
            index,
        }
    }

    /// Create a registry with the configured defaults and style catalog
    pub fn from_config(config: &EngineConfig) -> StyleResult<Self> {
        let mut registry = Self::new(config.defaults.clone());
        for style in &config.styles {
            registry.define(style.clone())?;
        }
        Ok(registry)
    }

    /// Register a style
    ///
    /// Parents may be registered later, but a chain that leads back to the
    /// new style is rejected.
    pub fn define(&mut self, style: StyleDefinition) -> StyleResult<()> {
        if self.index.contains_key(&style.id) {
            return Err(StructuralError::DuplicateStyle(style.id));
        }

        let mut path = vec![style.id.clone()];
        let mut seen = HashSet::new();
        let mut parent = style.based_on.as_deref();
        while let Some(id) = parent {
            path.push(id.to_string());
            if id == style.id || !seen.insert(id) {
                return Err(StructuralError::CyclicStyle(path));
            }
            parent = self.get(id).and_then(|s| s.based_on.as_deref());
        }

        log::debug!("Registered style {} ({})", style.id, style.name);
        self.index.insert(style.id.clone(), self.styles.len());
        self.styles.push(style);
        Ok(())
    }

    /// Get a style by ID
    pub fn get(&self, id: &str) -> Option<&StyleDefinition> {
        self.index.get(id).map(|&i| &self.styles[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All styles in registration order
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }

    /// The inheritance chain of a style, starting with the style itself
    ///
    /// Fails with `UnknownStyle` if the style or any ancestor is missing.
    pub fn chain(&self, id: &str) -> StyleResult<Vec<&StyleDefinition>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);

        while let Some(id) = current {
            let style = self
                .get(id)
                .ok_or_else(|| StructuralError::UnknownStyle(id.to_string()))?;
            if !seen.insert(style.id.as_str()) {
                let mut path: Vec<String> = chain
                    .iter()
                    .map(|s: &&StyleDefinition| s.id.clone())
                    .collect();
                path.push(style.id.clone());
                return Err(StructuralError::CyclicStyle(path));
            }
            chain.push(style);
            current = style.based_on.as_deref();
        }

        Ok(chain)
    }

    /// Compute the effective formatting for an element
    pub fn resolve(
        &self,
        style_ref: Option<&str>,
        run: &RunProperties,
        paragraph: &ParagraphProperties,
    ) -> StyleResult<ResolvedStyle> {
        let chain = self.chain(style_ref.unwrap_or(DEFAULT_STYLE_ID))?;

        let mut run_props = RunProperties::new()
            .font(self.defaults.font_family.clone())
            .size(self.defaults.font_size);
        let mut para_props = ParagraphProperties::new();

        for style in chain.iter().rev() {
            run_props.apply(&style.run);
            para_props.apply(&style.paragraph);
        }
        run_props.apply(run);
        para_props.apply(paragraph);

        Ok(ResolvedStyle {
            font_family: run_props
                .font_family
                .unwrap_or_else(|| self.defaults.font_family.clone()),
            size: run_props.size.unwrap_or(self.defaults.font_size),
            bold: run_props.bold.unwrap_or(false),
            italic: run_props.italic.unwrap_or(false),
            color: run_props.color.unwrap_or_else(Color::auto),
            spacing_before: para_props.spacing_before.unwrap_or(0),
            spacing_after: para_props.spacing_after.unwrap_or(0),
            outline_level: para_props.outline_level,
            alignment: para_props.alignment.unwrap_or_default(),
        })
    }

    /// Outline level a style confers, if any
    pub fn heading_level(&self, id: &str) -> StyleResult<Option<OutlineLevel>> {
        let resolved = self.resolve(
            Some(id),
            &RunProperties::default(),
            &ParagraphProperties::default(),
        )?;
        Ok(resolved.outline_level)
    }

    /// Check that every registered chain ends in defined styles and that
    /// every name the style part will carry is valid XML text
    pub fn validate(&self) -> StyleResult<()> {
        check_xml_text(&self.defaults.font_family)?;
        for style in &self.styles {
            self.chain(&style.id)?;
            let names = [
                Some(&style.id),
                Some(&style.name),
                style.based_on.as_ref(),
                style.next.as_ref(),
                style.run.font_family.as_ref(),
            ];
            for text in names.into_iter().flatten() {
                check_xml_text(text)?;
            }
        }
        log::debug!("Style registry validated ({} styles)", self.styles.len());
        Ok(())
    }

    /// Check that every style reference in the document exists
    pub fn validate_references(&self, document: &Document) -> StyleResult<()> {
        for section in document.sections() {
            self.validate_blocks(section.blocks())?;
        }
        Ok(())
    }

    fn validate_blocks(&self, blocks: &[Block]) -> StyleResult<()> {
        for block in blocks {
            match block {
                Block::Paragraph(paragraph) => {
                    if let Some(ref id) = paragraph.style {
                        self.chain(id)?;
                    }
                }
                Block::Table(table) => {
                    for row in table.rows() {
                        for cell in &row.cells {
                            self.validate_blocks(&cell.blocks)?;
                        }
                    }
                }
                Block::PageBreak => {}
            }
        }
        Ok(())
    }

    /// Render the style part, one resolved copy per registered style
    pub fn to_xml(&self) -> StyleResult<String> {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<w:styles xmlns:w="{}">"#, WORDML_NS));
        xml.push('\n');

        let defaults = RunProperties::new()
            .font(self.defaults.font_family.clone())
            .size(self.defaults.font_size);
        xml.push_str("<w:docDefaults>\n<w:rPrDefault>\n");
        xml.push_str(&run_properties_xml(&defaults));
        xml.push_str("</w:rPrDefault>\n<w:pPrDefault>\n");
        xml.push_str(&paragraph_properties_xml(
            None,
            &ParagraphProperties::new().spacing(0, 0),
        ));
        xml.push_str("</w:pPrDefault>\n</w:docDefaults>\n");

        for style in &self.styles {
            let resolved = self.resolve(
                Some(&style.id),
                &RunProperties::default(),
                &ParagraphProperties::default(),
            )?;

            xml.push_str("<w:style w:type=\"paragraph\"");
            if style.id == DEFAULT_STYLE_ID {
                xml.push_str(" w:default=\"1\"");
            }
            xml.push_str(&format!(" w:styleId=\"{}\">\n", escape_xml(&style.id)));
            xml.push_str(&format!("<w:name w:val=\"{}\"/>\n", escape_xml(&style.name)));
            if let Some(ref parent) = style.based_on {
                xml.push_str(&format!("<w:basedOn w:val=\"{}\"/>\n", escape_xml(parent)));
            }
            if let Some(ref next) = style.next {
                xml.push_str(&format!("<w:next w:val=\"{}\"/>\n", escape_xml(next)));
            }
            if style.quick_format {
                xml.push_str("<w:qFormat/>\n");
            }
            xml.push_str(&paragraph_properties_xml(
                None,
                &resolved.paragraph_properties(),
            ));
            xml.push_str(&run_properties_xml(&resolved.run_properties()));
            xml.push_str("</w:style>\n");
        }

        xml.push_str("</w:styles>");
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::standard_styles;
    use docforge_ast::{DocumentBuilder, PageGeometry, Paragraph, SectionBuilder};

    fn registry() -> StyleRegistry {
        StyleRegistry::from_config(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_normal_is_built_in() {
        let registry = StyleRegistry::default();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(DEFAULT_STYLE_ID));
    }

    #[test]
    fn test_duplicate_style_is_rejected() {
        let mut registry = registry();
        let err = registry
            .define(StyleDefinition::new("Heading1", "Another heading"))
            .unwrap_err();
        assert_eq!(err, StructuralError::DuplicateStyle("Heading1".to_string()));
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut registry = StyleRegistry::default();
        let err = registry
            .define(StyleDefinition::new("Loop", "Loop").based_on("Loop"))
            .unwrap_err();
        assert_eq!(
            err,
            StructuralError::CyclicStyle(vec!["Loop".to_string(), "Loop".to_string()])
        );
    }

    #[test]
    fn test_cycle_through_forward_reference_is_rejected() {
        let mut registry = StyleRegistry::default();
        registry
            .define(StyleDefinition::new("A", "A").based_on("B"))
            .unwrap();
        let err = registry
            .define(StyleDefinition::new("B", "B").based_on("A"))
            .unwrap_err();
        assert_eq!(
            err,
            StructuralError::CyclicStyle(vec!["B".into(), "A".into(), "B".into()])
        );
        assert!(!registry.contains("B"));
    }

    #[test]
    fn test_forward_reference_fails_until_defined() {
        let mut registry = StyleRegistry::default();
        registry
            .define(StyleDefinition::new("Child", "Child").based_on("Parent"))
            .unwrap();
        assert_eq!(
            registry.validate(),
            Err(StructuralError::UnknownStyle("Parent".to_string()))
        );

        registry
            .define(StyleDefinition::new("Parent", "Parent").based_on("Normal"))
            .unwrap();
        assert!(registry.validate().is_ok());
        let ids: Vec<&str> = registry
            .chain("Child")
            .unwrap()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["Child", "Parent", "Normal"]);
    }

    #[test]
    fn test_unknown_style_on_resolve() {
        let err = registry()
            .resolve(
                Some("Missing"),
                &RunProperties::default(),
                &ParagraphProperties::default(),
            )
            .unwrap_err();
        assert_eq!(err, StructuralError::UnknownStyle("Missing".to_string()));
    }

    #[test]
    fn test_unstyled_paragraph_gets_document_defaults() {
        let resolved = registry()
            .resolve(None, &RunProperties::default(), &ParagraphProperties::default())
            .unwrap();
        assert_eq!(resolved.font_family, "Arial");
        assert_eq!(resolved.size, 24);
        assert!(!resolved.bold);
        assert_eq!(resolved.color, Color::auto());
        assert!(!resolved.is_heading());
    }

    #[test]
    fn test_cascade_precedence() {
        let mut registry = StyleRegistry::new(DefaultsConfig {
            font_family: "Arial".to_string(),
            font_size: 24,
        });
        registry
            .define(
                StyleDefinition::new("Base", "Base")
                    .based_on("Normal")
                    .with_run(RunProperties::new().font("Georgia").size(20).italic(true)),
            )
            .unwrap();
        registry
            .define(
                StyleDefinition::new("Derived", "Derived")
                    .based_on("Base")
                    .with_run(RunProperties::new().size(28)),
            )
            .unwrap();

        let resolved = registry
            .resolve(
                Some("Derived"),
                &RunProperties::new().bold(true),
                &ParagraphProperties::default(),
            )
            .unwrap();

        // inherited from Base
        assert_eq!(resolved.font_family, "Georgia");
        assert!(resolved.italic);
        // named style beats parent
        assert_eq!(resolved.size, 28);
        // inline override on top
        assert!(resolved.bold);

        let overridden = registry
            .resolve(
                Some("Derived"),
                &RunProperties::new().size(40).italic(false),
                &ParagraphProperties::default(),
            )
            .unwrap();
        assert_eq!(overridden.size, 40);
        assert!(!overridden.italic);
        assert_eq!(overridden.font_family, "Georgia");
    }

    #[test]
    fn test_heading_level_from_catalog() {
        let registry = registry();
        assert_eq!(
            registry.heading_level("Heading1").unwrap().map(|l| l.get()),
            Some(0)
        );
        assert_eq!(
            registry.heading_level("Heading3").unwrap().map(|l| l.get()),
            Some(2)
        );
        assert_eq!(registry.heading_level("Code").unwrap(), None);
    }

    #[test]
    fn test_inline_outline_level_beats_style() {
        let level = OutlineLevel::new(4).unwrap();
        let resolved = registry()
            .resolve(
                Some("Heading1"),
                &RunProperties::default(),
                &ParagraphProperties::new().outline_level(level),
            )
            .unwrap();
        assert_eq!(resolved.outline_level, Some(level));
        assert_eq!(resolved.spacing_before, 240);
    }

    #[test]
    fn test_validate_references() {
        let registry = registry();
        let good = DocumentBuilder::new()
            .section(
                SectionBuilder::new(PageGeometry::letter())
                    .paragraph(Paragraph::heading(2).run("ok"))
                    .build(),
            )
            .build()
            .unwrap();
        assert!(registry.validate_references(&good).is_ok());

        let bad = DocumentBuilder::new()
            .section(
                SectionBuilder::new(PageGeometry::letter())
                    .paragraph(Paragraph::heading(7).run("no such style"))
                    .build(),
            )
            .build()
            .unwrap();
        assert_eq!(
            registry.validate_references(&bad),
            Err(StructuralError::UnknownStyle("Heading7".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_control_characters_in_names() {
        let mut registry = registry();
        registry
            .define(StyleDefinition::new("Callout", "Call\u{1B}out"))
            .unwrap();
        assert_eq!(
            registry.validate(),
            Err(StructuralError::InvalidText { codepoint: 0x1B })
        );
    }

    #[test]
    fn test_styles_xml_contains_every_style_once() {
        let registry = registry();
        let xml = registry.to_xml().unwrap();

        assert!(xml.contains("<w:docDefaults>"));
        assert!(xml.contains(r#"w:default="1" w:styleId="Normal""#));
        for style in standard_styles() {
            let needle = format!("w:styleId=\"{}\"", style.id);
            assert_eq!(xml.matches(&needle).count(), 1, "{}", style.id);
        }
        assert!(xml.contains(r#"<w:basedOn w:val="Normal"/>"#));
        assert!(xml.contains(r#"<w:outlineLvl w:val="0"/>"#));
        assert!(xml.contains(r#"w:ascii="Courier New""#));
    }
}
