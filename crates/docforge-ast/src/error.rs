//! Structural errors raised while assembling a document tree

use thiserror::Error;

/// Invariant violations detected before anything is serialized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// A style with this identifier is already registered
    #[error("Duplicate style: {0}")]
    DuplicateStyle(String),

    /// A style reference (or a parent in its chain) does not exist
    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    /// The basedOn chain loops back on itself
    #[error("Cyclic basedOn chain: {}", .0.join(" -> "))]
    CyclicStyle(Vec<String>),

    /// A row's cell count disagrees with the declared column widths
    #[error("Row {row} has {found} cells but the table declares {expected} columns")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A table was declared without any columns
    #[error("Table declares no columns")]
    EmptyTable,

    /// A document was sealed without any sections
    #[error("Document has no sections")]
    EmptyDocument,

    /// A color is neither `auto` nor a six-digit hex value
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Outline levels are limited to 0-8
    #[error("Outline level {0} is out of range (0-8)")]
    InvalidOutlineLevel(u8),

    /// Text holds a character XML 1.0 cannot represent
    #[error("Text contains U+{codepoint:04X}, which is not allowed in XML")]
    InvalidText { codepoint: u32 },
}

/// Result type for tree construction
pub type Result<T> = std::result::Result<T, StructuralError>;
