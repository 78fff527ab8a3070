//! docforge CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docforge:
//! - Build: assemble a DOCX package from a JSON content file
//! - Inspect: summarize the structure of a DOCX package
//!
//! # Binary Usage
//!
//! ```bash
//! # Build with the default configuration
//! docforge build demos/report.json --output report.docx
//!
//! # Build with a custom page and style catalog
//! docforge build demos/report.json --config demos/docforge.toml
//!
//! # Summarize a package as JSON
//! docforge inspect report.docx --format json
//! ```

pub mod app;
pub mod content;

pub use app::{build_command, inspect_command, load_config, render_summary, run_cli, OutputFormat};
pub use content::{ContentFile, ContentSection};
