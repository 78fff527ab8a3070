//! Error types for document builds

use docforge_ast::StructuralError;
use thiserror::Error;

use crate::layout::LayoutError;

/// Errors that can occur while building a package
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// The tree or the style catalog violates an invariant
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// A table does not fit where it was placed
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Internal consistency check failed during the final walk
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error reading or writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Required part not found in a package
    #[error("Required file not found: {0}")]
    MissingFile(String),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
