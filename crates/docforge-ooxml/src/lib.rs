//! # docforge-ooxml
//!
//! Turns a sealed [`docforge_ast::Document`] into a DOCX package.
//!
//! The pipeline runs one way only:
//! - style resolution against a [`StyleRegistry`]
//! - table layout into fixed grids ([`layout`])
//! - pagination at explicit breaks ([`Paginator`])
//! - serialization into a deterministic ZIP ([`DocxWriter`])
//!
//! ## Example
//!
//! ```
//! use docforge_ast::{DocumentBuilder, Paragraph};
//! use docforge_ooxml::{Engine, EngineConfig, PackageSummary};
//!
//! let engine = Engine::new(EngineConfig::default())?;
//! let doc = DocumentBuilder::new()
//!     .section(
//!         engine
//!             .section()
//!             .paragraph(Paragraph::heading(1).run("Report"))
//!             .build(),
//!     )
//!     .build()?;
//!
//! let bytes = engine.serialize(&doc)?;
//! let summary = PackageSummary::from_bytes(&bytes)?;
//! assert_eq!(summary.headings(), vec![(0, "Report")]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod config;
pub mod engine;
pub mod error;
pub mod inspect;
pub mod layout;
pub mod pagination;
pub mod relationships;
pub mod styles;
pub mod writer;

#[cfg(test)]
mod test_utils;

pub use archive::OoxmlArchive;
pub use config::{standard_styles, DefaultsConfig, EngineConfig};
pub use engine::Engine;
pub use error::{OoxmlError, Result};
pub use inspect::{BlockSummary, PackageSummary, SectionSummary, StyleSummary};
pub use layout::{
    layout, layout_blocks, layout_section, BlockLayout, CellRect, GridCell, GridRow,
    LayoutError, ResolvedBorders, TableGrid,
};
pub use pagination::{paginate, HeadingEntry, Page, PageMap, Paginator};
pub use relationships::Relationships;
pub use styles::{ResolvedStyle, StyleRegistry, DEFAULT_STYLE_ID};
pub use writer::{BuildOutput, DocxWriter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
