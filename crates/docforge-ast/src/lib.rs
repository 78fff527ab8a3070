//! docforge-ast - Document tree definitions
//!
//! This crate provides the in-memory tree consumed by the docforge engine:
//! sections with page geometry, paragraphs made of styled runs, tables with
//! fixed column widths, and explicit page breaks.
//!
//! Trees are assembled with ordered-append builders. Structural invariants
//! (uniform table rows, at least one section) are enforced when a builder
//! is sealed, never later.
//!
//! ```
//! use docforge_ast::{DocumentBuilder, PageGeometry, Paragraph, SectionBuilder};
//!
//! let doc = DocumentBuilder::new()
//!     .section(
//!         SectionBuilder::new(PageGeometry::letter())
//!             .paragraph(Paragraph::heading(1).run("Report"))
//!             .build(),
//!     )
//!     .build()?;
//! assert_eq!(doc.sections().len(), 1);
//! # Ok::<(), docforge_ast::StructuralError>(())
//! ```

pub mod block;
pub mod document;
pub mod error;
pub mod inline;
pub mod style;
pub mod table;

pub use block::{Block, Paragraph};
pub use document::{
    Document, DocumentBuilder, DocumentMeta, PageGeometry, PageMargins, Section, SectionBuilder,
};
pub use error::{Result, StructuralError};
pub use inline::{check_xml_text, Run};
pub use style::{
    Alignment, Color, OutlineLevel, ParagraphProperties, RunProperties, StyleDefinition,
};
pub use table::{
    BorderSpec, BorderStyle, CellBorders, CellMargins, Shading, Table, TableBuilder, TableCell,
    TableRow,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
