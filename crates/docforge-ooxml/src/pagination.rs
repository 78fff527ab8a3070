//! Explicit page boundaries
//!
//! The [`Paginator`] never measures text. It only records which top-level
//! blocks fall between explicit page breaks, starting a fresh page at
//! every section boundary, and notes the headings each page opens. The
//! resulting [`PageMap`] feeds the page count in the extended properties
//! part and any navigation consumer.

use std::ops::Range;

use docforge_ast::{
    Block, Document, OutlineLevel, PageGeometry, RunProperties, StructuralError,
};

use crate::styles::StyleRegistry;

/// A heading found while paginating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    pub level: OutlineLevel,
    pub text: String,
    pub section: usize,
    /// Index of the block within its section
    pub block: usize,
}

/// One physical page bounded by explicit breaks
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    pub section: usize,
    pub geometry: PageGeometry,
    /// Block indices within the section; a trailing page break belongs to
    /// the page it ends
    pub blocks: Range<usize>,
    pub headings: Vec<HeadingEntry>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// The finished page sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMap {
    pages: Vec<Page>,
}

impl PageMap {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every heading in document order
    pub fn headings(&self) -> impl Iterator<Item = &HeadingEntry> {
        self.pages.iter().flat_map(|p| p.headings.iter())
    }

    /// Pages belonging to one section
    pub fn section_pages(&self, section: usize) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(move |p| p.section == section)
    }
}

/// Push-driven page tracker
///
/// Call [`begin_section`](Self::begin_section) before the blocks of each
/// section, then [`push`](Self::push) every top-level block in order and
/// [`finish`](Self::finish) once.
#[derive(Debug)]
pub struct Paginator<'a> {
    registry: &'a StyleRegistry,
    pages: Vec<Page>,
    current: Option<Page>,
}

impl<'a> Paginator<'a> {
    pub fn new(registry: &'a StyleRegistry) -> Self {
        Self {
            registry,
            pages: Vec::new(),
            current: None,
        }
    }

    /// Close the current page and open the first page of a new section
    pub fn begin_section(&mut self, section: usize, geometry: PageGeometry) {
        self.close_page();
        self.open_page(section, geometry, 0);
    }

    /// Record the next block of the current section
    pub fn push(&mut self, index: usize, block: &Block) -> Result<(), StructuralError> {
        let Some(page) = self.current.as_mut() else {
            log::warn!("Block {} pushed before any section; ignored", index);
            return Ok(());
        };
        page.blocks.end = index + 1;

        match block {
            Block::Paragraph(paragraph) => {
                let resolved = self.registry.resolve(
                    paragraph.style.as_deref(),
                    &RunProperties::default(),
                    &paragraph.props,
                )?;
                if let Some(level) = resolved.outline_level {
                    page.headings.push(HeadingEntry {
                        level,
                        text: paragraph.plain_text(),
                        section: page.section,
                        block: index,
                    });
                }
            }
            Block::Table(_) => {}
            Block::PageBreak => {
                let (section, geometry) = (page.section, page.geometry);
                self.close_page();
                self.open_page(section, geometry, index + 1);
            }
        }
        Ok(())
    }

    /// Finalize the page sequence
    pub fn finish(mut self) -> PageMap {
        self.close_page();
        log::debug!("Paginated into {} pages", self.pages.len());
        PageMap { pages: self.pages }
    }

    fn open_page(&mut self, section: usize, geometry: PageGeometry, start: usize) {
        self.current = Some(Page {
            number: self.pages.len() + 1,
            section,
            geometry,
            blocks: start..start,
            headings: Vec::new(),
        });
    }

    fn close_page(&mut self) {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
    }
}

/// Paginate a whole document
pub fn paginate(document: &Document, registry: &StyleRegistry) -> Result<PageMap, StructuralError> {
    let mut paginator = Paginator::new(registry);
    for (section_index, section) in document.sections().iter().enumerate() {
        paginator.begin_section(section_index, *section.geometry());
        for (index, block) in section.blocks().iter().enumerate() {
            paginator.push(index, block)?;
        }
    }
    Ok(paginator.finish())
}
