//! Configured entry point
//!
//! An [`Engine`] owns the configuration and the style registry built from
//! it. Styles can be added until the first build; building only borrows the
//! registry, so one engine can serialize any number of documents.

use docforge_ast::{Document, SectionBuilder, StyleDefinition};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::styles::StyleRegistry;
use crate::writer::{BuildOutput, DocxWriter};

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    registry: StyleRegistry,
}

impl Engine {
    /// Create an engine, registering the configured style catalog
    pub fn new(config: EngineConfig) -> Result<Self> {
        let registry = StyleRegistry::from_config(&config)?;
        log::debug!(
            "Engine ready: {} styles, {}x{} pages",
            registry.len(),
            config.page.width,
            config.page.height
        );
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Register an additional style
    pub fn define_style(&mut self, style: StyleDefinition) -> Result<()> {
        Ok(self.registry.define(style)?)
    }

    /// A section builder with the configured page geometry
    pub fn section(&self) -> SectionBuilder {
        self.config.section()
    }

    /// Serialize a document, keeping the page map
    pub fn build(&self, document: &Document) -> Result<BuildOutput> {
        DocxWriter::new(&self.registry).build(document)
    }

    /// Serialize a document to package bytes
    pub fn serialize(&self, document: &Document) -> Result<Vec<u8>> {
        DocxWriter::new(&self.registry).serialize(document)
    }
}
