//! Document root, sections and metadata
//!
//! [`DocumentBuilder::build`] is the sealing transition: a [`Document`]
//! exposes read-only accessors and nothing can be appended afterwards.

use serde::{Deserialize, Serialize};

use crate::block::{Block, Paragraph};
use crate::error::{Result, StructuralError};
use crate::inline::check_xml_text;
use crate::table::Table;

/// Page margins in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMargins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl PageMargins {
    /// The same margin on all four edges
    pub fn uniform(twips: u32) -> Self {
        Self {
            top: twips,
            right: twips,
            bottom: twips,
            left: twips,
        }
    }
}

impl Default for PageMargins {
    /// One inch on every edge
    fn default() -> Self {
        Self::uniform(1440)
    }
}

/// Physical page size and margins, in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
    pub margins: PageMargins,
}

impl PageGeometry {
    /// US Letter (8.5in x 11in)
    pub fn letter() -> Self {
        Self {
            width: 12240,
            height: 15840,
            margins: PageMargins::default(),
        }
    }

    /// ISO A4 (210mm x 297mm)
    pub fn a4() -> Self {
        Self {
            width: 11906,
            height: 16838,
            margins: PageMargins::default(),
        }
    }

    pub fn with_margins(mut self, margins: PageMargins) -> Self {
        self.margins = margins;
        self
    }

    /// Width between the left and right margins
    pub fn content_width(&self) -> u32 {
        self.width
            .saturating_sub(self.margins.left)
            .saturating_sub(self.margins.right)
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// Document properties written to the package's core properties part
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMeta {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    /// W3CDTF creation timestamp; never generated by the engine
    pub created: Option<String>,
}

impl DocumentMeta {
    /// Create metadata with just a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A run of pages sharing one page geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    geometry: PageGeometry,
    blocks: Vec<Block>,
}

impl Section {
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Blocks in read/print order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Ordered-append builder for [`Section`]
#[derive(Debug, Clone, Default)]
pub struct SectionBuilder {
    geometry: PageGeometry,
    blocks: Vec<Block>,
}

impl SectionBuilder {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            blocks: Vec::new(),
        }
    }

    pub fn block(mut self, block: impl Into<Block>) -> Self {
        self.blocks.push(block.into());
        self
    }

    pub fn blocks(mut self, blocks: impl IntoIterator<Item = Block>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    pub fn paragraph(self, paragraph: Paragraph) -> Self {
        self.block(Block::Paragraph(paragraph))
    }

    pub fn table(self, table: Table) -> Self {
        self.block(Block::Table(table))
    }

    pub fn page_break(self) -> Self {
        self.block(Block::PageBreak)
    }

    pub fn build(self) -> Section {
        Section {
            geometry: self.geometry,
            blocks: self.blocks,
        }
    }
}

/// A sealed document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    meta: DocumentMeta,
    sections: Vec<Section>,
}

impl Document {
    pub fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    /// Sections in document order (never empty)
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Total number of top-level blocks across all sections
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum()
    }

    /// Check every piece of caller text (metadata, style references, runs,
    /// cell content) for characters XML cannot carry
    pub fn check_text(&self) -> Result<()> {
        let meta = &self.meta;
        for value in [
            &meta.title,
            &meta.creator,
            &meta.subject,
            &meta.description,
            &meta.keywords,
            &meta.created,
        ]
        .into_iter()
        .flatten()
        {
            check_xml_text(value)?;
        }
        for section in &self.sections {
            check_blocks(&section.blocks)?;
        }
        Ok(())
    }
}

fn check_blocks(blocks: &[Block]) -> Result<()> {
    for block in blocks {
        match block {
            Block::Paragraph(paragraph) => {
                if let Some(ref style) = paragraph.style {
                    check_xml_text(style)?;
                }
                for run in &paragraph.runs {
                    run.check_text()?;
                }
            }
            Block::Table(table) => {
                for cell in table.rows().iter().flat_map(|row| &row.cells) {
                    check_blocks(&cell.blocks)?;
                }
            }
            Block::PageBreak => {}
        }
    }
    Ok(())
}

/// Ordered-append builder for [`Document`]
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    meta: DocumentMeta,
    sections: Vec<Section>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meta(mut self, meta: DocumentMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Seal the document
    pub fn build(self) -> Result<Document> {
        if self.sections.is_empty() {
            return Err(StructuralError::EmptyDocument);
        }
        Ok(Document {
            meta: self.meta,
            sections: self.sections,
        })
    }
}
