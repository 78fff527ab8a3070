//! Read-back summary of a built package
//!
//! Parses the main document, style and property parts of a DOCX package
//! and reports its structure: sections with their page size, top-level
//! blocks (paragraphs, tables with their grid size, page breaks), headings
//! and the declared page count.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::archive::OoxmlArchive;
use crate::error::{OoxmlError, Result};
use crate::relationships::Relationships;

/// A style declared in the style part
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleSummary {
    pub id: String,
    pub name: Option<String>,
    pub based_on: Option<String>,
    pub outline_level: Option<u8>,
}

/// A top-level block as found in the main document part
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockSummary {
    Paragraph {
        style: Option<String>,
        text: String,
        /// Effective outline level (own or inherited from the style)
        outline_level: Option<u8>,
    },
    Table {
        rows: usize,
        columns: usize,
    },
    PageBreak,
}

/// One section with its page size in twips
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub width: u32,
    pub height: u32,
    pub blocks: Vec<BlockSummary>,
}

/// Structure of a whole package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSummary {
    pub title: Option<String>,
    pub pages: Option<u32>,
    pub styles: Vec<StyleSummary>,
    pub sections: Vec<SectionSummary>,
}

impl PackageSummary {
    /// Summarize package bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(&OoxmlArchive::from_bytes(bytes)?)
    }

    /// Summarize an unpacked package
    pub fn from_archive(archive: &OoxmlArchive) -> Result<Self> {
        let styles_path = archive
            .get("word/_rels/document.xml.rels")
            .map(Relationships::parse)
            .transpose()?
            .and_then(|rels| {
                rels.target_of(Relationships::TYPE_STYLES)
                    .map(|t| format!("word/{}", t.trim_start_matches('/')))
            })
            .unwrap_or_else(|| "word/styles.xml".to_string());

        let styles = match archive.get(&styles_path) {
            Some(xml) => parse_styles(xml)?,
            None => Vec::new(),
        };
        let sections = parse_document(archive.document_xml()?, &styles)?;

        let title = match archive.get("docProps/core.xml") {
            Some(xml) => element_text(xml, b"title")?,
            None => None,
        };
        let pages = match archive.get("docProps/app.xml") {
            Some(xml) => element_text(xml, b"Pages")?.and_then(|p| p.trim().parse().ok()),
            None => None,
        };

        Ok(Self {
            title,
            pages,
            styles,
            sections,
        })
    }

    /// Headings in document order as (outline level, text)
    pub fn headings(&self) -> Vec<(u8, &str)> {
        self.blocks()
            .filter_map(|block| match block {
                BlockSummary::Paragraph {
                    text,
                    outline_level: Some(level),
                    ..
                } => Some((*level, text.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn table_count(&self) -> usize {
        self.blocks()
            .filter(|b| matches!(b, BlockSummary::Table { .. }))
            .count()
    }

    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum()
    }

    fn blocks(&self) -> impl Iterator<Item = &BlockSummary> {
        self.sections.iter().flat_map(|s| s.blocks.iter())
    }
}

/// Get an attribute value by qualified name
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn parse_styles(xml: &[u8]) -> Result<Vec<StyleSummary>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut styles = Vec::new();
    let mut current: Option<StyleSummary> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"style" => {
                current = get_attr(e, b"w:styleId").map(|id| StyleSummary {
                    id,
                    name: None,
                    based_on: None,
                    outline_level: None,
                });
            }
            Ok(Event::Empty(ref e)) => {
                if let Some(ref mut style) = current {
                    match e.local_name().as_ref() {
                        b"name" => style.name = get_attr(e, b"w:val"),
                        b"basedOn" => style.based_on = get_attr(e, b"w:val"),
                        b"outlineLvl" => {
                            style.outline_level =
                                get_attr(e, b"w:val").and_then(|v| v.parse().ok())
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"style" => {
                if let Some(style) = current.take() {
                    styles.push(style);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(styles)
}

/// Text content of the first element with the given local name
fn element_text(xml: &[u8], local_name: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut inside = false;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == local_name => inside = true,
            Ok(Event::Text(ref t)) if inside => text.push_str(&t.unescape()?),
            Ok(Event::End(ref e)) if inside && e.local_name().as_ref() == local_name => {
                return Ok(Some(text));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
}

#[derive(Default)]
struct ParagraphScan {
    style: Option<String>,
    outline_level: Option<u8>,
    text: String,
    page_break: bool,
    section_break: bool,
}

/// Walks the main document, tracking only top-level structure
struct DocumentScanner<'a> {
    styles: HashMap<&'a str, &'a StyleSummary>,
    sections: Vec<SectionSummary>,
    blocks: Vec<BlockSummary>,
    table_depth: usize,
    table: (usize, usize),
    paragraph: Option<ParagraphScan>,
    in_text: bool,
    in_sect_pr: bool,
    page: (u32, u32),
}

impl<'a> DocumentScanner<'a> {
    fn new(styles: &'a [StyleSummary]) -> Self {
        Self {
            styles: styles.iter().map(|s| (s.id.as_str(), s)).collect(),
            sections: Vec::new(),
            blocks: Vec::new(),
            table_depth: 0,
            table: (0, 0),
            paragraph: None,
            in_text: false,
            in_sect_pr: false,
            page: (0, 0),
        }
    }

    /// Outline level a style carries, following `basedOn`
    fn style_level(&self, id: &str) -> Option<u8> {
        let mut current = self.styles.get(id);
        let mut hops = 0;
        while let Some(style) = current {
            if style.outline_level.is_some() {
                return style.outline_level;
            }
            hops += 1;
            if hops > self.styles.len() {
                return None;
            }
            current = style
                .based_on
                .as_deref()
                .and_then(|p| self.styles.get(p));
        }
        None
    }

    fn open(&mut self, e: &BytesStart, is_empty: bool) {
        let top_level = self.table_depth == 0;
        match e.local_name().as_ref() {
            b"tbl" => {
                if top_level {
                    self.table = (0, 0);
                }
                self.table_depth += 1;
                if is_empty {
                    self.close(b"tbl");
                }
            }
            b"tr" if self.table_depth == 1 => self.table.0 += 1,
            b"gridCol" if self.table_depth == 1 => self.table.1 += 1,
            b"p" if top_level => {
                self.paragraph = Some(ParagraphScan::default());
                if is_empty {
                    self.close(b"p");
                }
            }
            b"sectPr" => {
                self.in_sect_pr = true;
                if top_level {
                    if let Some(ref mut paragraph) = self.paragraph {
                        paragraph.section_break = true;
                    }
                }
            }
            b"pgSz" if self.in_sect_pr => {
                let twips = |key: &[u8]| {
                    get_attr(e, key)
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0)
                };
                self.page = (twips(b"w:w"), twips(b"w:h"));
            }
            name if top_level && !self.in_sect_pr => {
                let Some(ref mut paragraph) = self.paragraph else {
                    return;
                };
                match name {
                    b"pStyle" => paragraph.style = get_attr(e, b"w:val"),
                    b"outlineLvl" => {
                        paragraph.outline_level =
                            get_attr(e, b"w:val").and_then(|v| v.parse().ok())
                    }
                    b"br" if get_attr(e, b"w:type").as_deref() == Some("page") => {
                        paragraph.page_break = true
                    }
                    b"t" if !is_empty => self.in_text = true,
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, local_name: &[u8]) {
        match local_name {
            b"t" => self.in_text = false,
            b"tbl" => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 {
                    let (rows, columns) = self.table;
                    self.blocks.push(BlockSummary::Table { rows, columns });
                }
            }
            b"sectPr" => {
                self.in_sect_pr = false;
                if self.table_depth == 0 && self.paragraph.is_none() {
                    self.finish_section();
                }
            }
            b"p" if self.table_depth == 0 => {
                let Some(paragraph) = self.paragraph.take() else {
                    return;
                };
                if paragraph.section_break {
                    self.finish_section();
                } else if paragraph.page_break && paragraph.text.is_empty() {
                    self.blocks.push(BlockSummary::PageBreak);
                } else {
                    let outline_level = paragraph.outline_level.or_else(|| {
                        paragraph
                            .style
                            .as_deref()
                            .and_then(|id| self.style_level(id))
                    });
                    self.blocks.push(BlockSummary::Paragraph {
                        style: paragraph.style,
                        text: paragraph.text,
                        outline_level,
                    });
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text && self.table_depth == 0 {
            if let Some(ref mut paragraph) = self.paragraph {
                paragraph.text.push_str(text);
            }
        }
    }

    fn finish_section(&mut self) {
        let (width, height) = self.page;
        self.sections.push(SectionSummary {
            width,
            height,
            blocks: std::mem::take(&mut self.blocks),
        });
        self.page = (0, 0);
    }
}

fn parse_document(xml: &[u8], styles: &[StyleSummary]) -> Result<Vec<SectionSummary>> {
    let mut reader = Reader::from_reader(xml);
    let mut scanner = DocumentScanner::new(styles);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => scanner.open(e, false),
            Ok(Event::Empty(ref e)) => scanner.open(e, true),
            Ok(Event::End(ref e)) => scanner.close(e.local_name().as_ref()),
            Ok(Event::Text(ref t)) => scanner.text(&t.unescape()?),
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    // Blocks after the last section properties still form a section
    if !scanner.blocks.is_empty() {
        scanner.finish_section();
    }
    Ok(scanner.sections)
}
