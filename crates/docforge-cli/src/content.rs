//! JSON content files
//!
//! A content file describes a document declaratively:
//!
//! ```json
//! {
//!   "meta": { "title": "Report" },
//!   "sections": [
//!     {
//!       "page": { "width": 12240, "height": 15840 },
//!       "blocks": [
//!         { "type": "paragraph", "style": "Heading1", "runs": ["Report"] },
//!         { "type": "page_break" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Sections without a `page` use the configured page geometry. Tables are
//! validated while the file is parsed.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use docforge_ast::{Block, Document, DocumentBuilder, DocumentMeta, PageGeometry, SectionBuilder};
use docforge_ooxml::EngineConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub meta: DocumentMeta,
    #[serde(default)]
    pub sections: Vec<ContentSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentSection {
    /// Overrides the configured page geometry
    #[serde(default)]
    pub page: Option<PageGeometry>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl ContentFile {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid content file")
    }

    /// Read and parse a content file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read content file: {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Failed to parse content file: {}", path.display()))
    }

    /// Assemble the document through the builders
    pub fn into_document(self, config: &EngineConfig) -> Result<Document> {
        let mut builder = DocumentBuilder::new().meta(self.meta);
        for section in self.sections {
            let geometry = section.page.unwrap_or(config.page);
            builder = builder.section(SectionBuilder::new(geometry).blocks(section.blocks).build());
        }
        Ok(builder.build()?)
    }
}
