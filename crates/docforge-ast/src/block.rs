//! Block-level elements for document structure
//!
//! A section is an ordered sequence of [`Block`]s. The set of variants is
//! closed: every stage (layout, pagination, serialization) matches on it
//! exhaustively.

use serde::{Deserialize, Serialize};

use crate::inline::Run;
use crate::style::{Alignment, OutlineLevel, ParagraphProperties};
use crate::table::Table;

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text (headings are paragraphs with an outline level)
    Paragraph(Paragraph),
    /// A table
    Table(Table),
    /// An explicit page break
    PageBreak,
}

/// A paragraph block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content within the paragraph
    #[serde(default)]
    pub runs: Vec<Run>,
    /// Named style reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Explicit overrides (alignment, spacing, outline level)
    #[serde(flatten)]
    pub props: ParagraphProperties,
}

impl Paragraph {
    /// Create an empty paragraph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph with a single plain run
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().run(Run::new(text))
    }

    /// Create a paragraph referencing a named style
    pub fn styled(style_id: impl Into<String>) -> Self {
        Self {
            style: Some(style_id.into()),
            ..Self::default()
        }
    }

    /// Create a heading paragraph using the `Heading{level}` style
    ///
    /// `level` is 1-based and clamped to 1-9 (`Heading1` carries outline
    /// level 0 in the standard catalog).
    pub fn heading(level: u8) -> Self {
        Self::styled(format!("Heading{}", level.clamp(1, 9)))
    }

    /// Append a run
    pub fn run(mut self, run: impl Into<Run>) -> Self {
        self.runs.push(run.into());
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.props.alignment = Some(alignment);
        self
    }

    /// Spacing before the paragraph, in twips
    pub fn spacing_before(mut self, twips: u32) -> Self {
        self.props.spacing_before = Some(twips);
        self
    }

    /// Spacing after the paragraph, in twips
    pub fn spacing_after(mut self, twips: u32) -> Self {
        self.props.spacing_after = Some(twips);
        self
    }

    /// Explicit outline level, overriding whatever the style says
    pub fn outline_level(mut self, level: OutlineLevel) -> Self {
        self.props.outline_level = Some(level);
        self
    }

    /// Concatenated text of all runs
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

impl From<Paragraph> for Block {
    fn from(paragraph: Paragraph) -> Self {
        Block::Paragraph(paragraph)
    }
}

impl From<Table> for Block {
    fn from(table: Table) -> Self {
        Block::Table(table)
    }
}
