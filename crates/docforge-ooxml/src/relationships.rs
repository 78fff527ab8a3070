//! Package relationship parts (`_rels/*.rels`)
//!
//! A relationship part maps IDs to targets. The package root points at the
//! main document and the property parts; the main document points at its
//! style part. Relationships keep insertion order so the serialized part is
//! stable.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::writer::escape_xml;

/// OOXML namespace for relationships
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// One relationship entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// An ordered relationship part
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Main document relationship type
    pub const TYPE_OFFICE_DOCUMENT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    /// Styles relationship type
    pub const TYPE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    /// Core properties relationship type
    pub const TYPE_CORE_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    /// Extended properties relationship type
    pub const TYPE_EXTENDED_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";

    pub fn new() -> Self {
        Self::default()
    }

    /// Relationships of a freshly built package root
    pub fn package() -> Self {
        let mut rels = Self::new();
        rels.add(Self::TYPE_OFFICE_DOCUMENT, "word/document.xml");
        rels.add(Self::TYPE_CORE_PROPERTIES, "docProps/core.xml");
        rels.add(Self::TYPE_EXTENDED_PROPERTIES, "docProps/app.xml");
        rels
    }

    /// Relationships of the main document part
    pub fn document() -> Self {
        let mut rels = Self::new();
        rels.add(Self::TYPE_STYLES, "styles.xml");
        rels
    }

    /// Parse a relationship part
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut entries = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut rel_type = None;
                    let mut target = None;

                    for attr in e.attributes().filter_map(|a| a.ok()) {
                        let value = attr.unescape_value().ok().map(|s| s.to_string());
                        match attr.key.as_ref() {
                            b"Id" => id = value,
                            b"Type" => rel_type = value,
                            b"Target" => target = value,
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target)) = (id, target) {
                        entries.push(Relationship {
                            id,
                            rel_type: rel_type.unwrap_or_default(),
                            target,
                        });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { entries })
    }

    /// Append a relationship and return its generated ID
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
        id
    }

    /// Target of the first relationship of a given type
    pub fn target_of(&self, rel_type: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|r| r.rel_type == rel_type)
            .map(|r| r.target.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to a `.rels` part
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));
        xml.push('\n');

        for rel in &self.entries {
            xml.push_str(&format!(
                "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>\n",
                escape_xml(&rel.id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target)
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }
}
