//! DOCX package serializer
//!
//! [`DocxWriter`] runs the whole pipeline: registry and reference checks,
//! table layout per section, pagination, then a single ordered walk that
//! emits WordprocessingML. Each section is rendered into its own buffer and
//! the buffers are concatenated in document order, so section boundaries
//! never depend on emission state.

use docforge_ast::{
    Block, CellMargins, Document, DocumentMeta, PageGeometry, Paragraph, ParagraphProperties, Run,
    RunProperties, Section, Table,
};
use sha2::{Digest, Sha256};

use crate::archive::OoxmlArchive;
use crate::error::{OoxmlError, Result};
use crate::layout::{layout_section, BlockLayout, GridCell, ResolvedBorders, TableGrid};
use crate::pagination::{paginate, PageMap};
use crate::relationships::Relationships;
use crate::styles::StyleRegistry;

/// WordprocessingML main namespace
pub const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Header and footer distance written into every section, in twips
const HEADER_FOOTER_DISTANCE: u32 = 720;

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// The complete package
    pub bytes: Vec<u8>,
    /// Explicit page boundaries and headings
    pub pages: PageMap,
}

impl BuildOutput {
    pub fn page_count(&self) -> usize {
        self.pages.page_count()
    }

    /// Hex SHA-256 of the package bytes
    pub fn digest(&self) -> String {
        format!("{:x}", Sha256::digest(&self.bytes))
    }
}

/// Serializes documents against one style registry
pub struct DocxWriter<'a> {
    registry: &'a StyleRegistry,
    /// Buffer for the section being rendered
    output: String,
}

impl<'a> DocxWriter<'a> {
    pub fn new(registry: &'a StyleRegistry) -> Self {
        Self {
            registry,
            output: String::new(),
        }
    }

    /// Serialize a document to package bytes
    pub fn serialize(&mut self, document: &Document) -> Result<Vec<u8>> {
        Ok(self.build(document)?.bytes)
    }

    /// Serialize a document, keeping the page map
    pub fn build(&mut self, document: &Document) -> Result<BuildOutput> {
        self.registry.validate()?;
        self.registry.validate_references(document)?;
        document.check_text()?;

        let layouts = document
            .sections()
            .iter()
            .map(layout_section)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let pages = paginate(document, self.registry)?;

        let archive = self.package(document, &layouts, &pages)?;
        let bytes = archive.to_bytes()?;

        log::debug!(
            "Serialized {} sections ({} pages) into {} bytes",
            document.sections().len(),
            pages.page_count(),
            bytes.len()
        );
        Ok(BuildOutput { bytes, pages })
    }

    /// Assemble every part of the package
    fn package(
        &mut self,
        document: &Document,
        layouts: &[Vec<BlockLayout>],
        pages: &PageMap,
    ) -> Result<OoxmlArchive> {
        let mut archive = OoxmlArchive::new();
        archive.set_string("[Content_Types].xml", content_types_xml());
        archive.set_string("_rels/.rels", Relationships::package().to_xml());
        archive.set_string(
            "word/_rels/document.xml.rels",
            Relationships::document().to_xml(),
        );
        archive.set_string(
            "word/document.xml",
            self.generate_document_xml(document, layouts)?,
        );
        archive.set_string("word/styles.xml", self.registry.to_xml()?);
        archive.set_string("docProps/core.xml", core_properties_xml(document.meta()));
        archive.set_string("docProps/app.xml", app_properties_xml(pages.page_count()));
        Ok(archive)
    }

    /// Generate word/document.xml
    fn generate_document_xml(
        &mut self,
        document: &Document,
        layouts: &[Vec<BlockLayout>],
    ) -> Result<String> {
        let sections = document.sections();
        if layouts.len() != sections.len() {
            return Err(OoxmlError::Serialization(format!(
                "{} section layouts for {} sections",
                layouts.len(),
                sections.len()
            )));
        }

        let mut rendered = Vec::with_capacity(sections.len());
        for (index, (section, layout)) in sections.iter().zip(layouts).enumerate() {
            let is_last = index + 1 == sections.len();
            rendered.push(self.generate_section(section, layout, is_last)?);
        }

        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            WORDML_NS
        ));
        xml.push('\n');
        xml.push_str("<w:body>\n");
        for section in rendered {
            xml.push_str(&section);
        }
        xml.push_str("</w:body>\n");
        xml.push_str("</w:document>");
        Ok(xml)
    }

    /// Render one section; a non-final section ends in a carrier paragraph
    /// holding its properties, the final one in a body-level `w:sectPr`
    fn generate_section(
        &mut self,
        section: &Section,
        layout: &[BlockLayout],
        is_last: bool,
    ) -> Result<String> {
        self.output.clear();
        if section.is_empty() {
            log::warn!("Rendering an empty section");
        }

        self.generate_blocks(section.blocks(), layout)?;

        if is_last {
            self.generate_section_properties(section.geometry());
        } else {
            self.output.push_str("<w:p>\n<w:pPr>\n");
            self.generate_section_properties(section.geometry());
            self.output.push_str("</w:pPr>\n</w:p>\n");
        }

        Ok(std::mem::take(&mut self.output))
    }

    fn generate_section_properties(&mut self, geometry: &PageGeometry) {
        let margins = &geometry.margins;
        self.output.push_str("<w:sectPr>\n");
        self.output.push_str("<w:type w:val=\"nextPage\"/>\n");
        self.output.push_str(&format!(
            "<w:pgSz w:w=\"{}\" w:h=\"{}\"",
            geometry.width, geometry.height
        ));
        if geometry.is_landscape() {
            self.output.push_str(" w:orient=\"landscape\"");
        }
        self.output.push_str("/>\n");
        self.output.push_str(&format!(
            "<w:pgMar w:top=\"{}\" w:right=\"{}\" w:bottom=\"{}\" w:left=\"{}\" w:header=\"{d}\" w:footer=\"{d}\" w:gutter=\"0\"/>\n",
            margins.top,
            margins.right,
            margins.bottom,
            margins.left,
            d = HEADER_FOOTER_DISTANCE
        ));
        self.output.push_str("</w:sectPr>\n");
    }

    fn generate_blocks(&mut self, blocks: &[Block], layouts: &[BlockLayout]) -> Result<()> {
        if blocks.len() != layouts.len() {
            return Err(OoxmlError::Serialization(format!(
                "{} layouts for {} blocks",
                layouts.len(),
                blocks.len()
            )));
        }

        for (index, (block, layout)) in blocks.iter().zip(layouts).enumerate() {
            match (block, layout) {
                (Block::Paragraph(paragraph), BlockLayout::Paragraph) => {
                    self.generate_paragraph(paragraph)?
                }
                (Block::Table(table), BlockLayout::Table(grid)) => {
                    self.generate_table(table, grid)?
                }
                (Block::PageBreak, BlockLayout::PageBreak) => self.generate_page_break(),
                _ => {
                    return Err(OoxmlError::Serialization(format!(
                        "layout does not match block {}",
                        index
                    )))
                }
            }
        }
        Ok(())
    }

    /// Generate XML for a paragraph
    ///
    /// Only the style reference and the explicit overrides are written;
    /// everything inherited lives in the style part.
    fn generate_paragraph(&mut self, paragraph: &Paragraph) -> Result<()> {
        let style = paragraph.style.as_deref();
        self.registry
            .resolve(style, &RunProperties::default(), &paragraph.props)
            .map_err(|e| OoxmlError::Serialization(format!("paragraph style: {}", e)))?;

        self.output.push_str("<w:p>\n");
        self.output
            .push_str(&paragraph_properties_xml(style, &paragraph.props));
        for run in &paragraph.runs {
            self.generate_run(run);
        }
        self.output.push_str("</w:p>\n");
        Ok(())
    }

    fn generate_run(&mut self, run: &Run) {
        self.output.push_str("<w:r>\n");
        self.output.push_str(&run_properties_xml(&run.props));
        for (i, line) in run.text.split('\n').enumerate() {
            if i > 0 {
                self.output.push_str("<w:br/>\n");
            }
            if !line.is_empty() {
                self.output.push_str(&format!(
                    "<w:t xml:space=\"preserve\">{}</w:t>\n",
                    escape_xml(line)
                ));
            }
        }
        self.output.push_str("</w:r>\n");
    }

    fn generate_page_break(&mut self) {
        self.output
            .push_str("<w:p>\n<w:r>\n<w:br w:type=\"page\"/>\n</w:r>\n</w:p>\n");
    }

    /// Generate XML for a table from its laid-out grid
    fn generate_table(&mut self, table: &Table, grid: &TableGrid) -> Result<()> {
        self.output.push_str("<w:tbl>\n");

        self.output.push_str("<w:tblPr>\n");
        self.output
            .push_str(&format!("<w:tblW w:w=\"{}\" w:type=\"dxa\"/>\n", grid.width));
        self.output.push_str("<w:tblLayout w:type=\"fixed\"/>\n");
        self.output.push_str("</w:tblPr>\n");

        self.output.push_str("<w:tblGrid>\n");
        for width in &grid.column_widths {
            self.output
                .push_str(&format!("<w:gridCol w:w=\"{}\"/>\n", width));
        }
        self.output.push_str("</w:tblGrid>\n");

        for (row, grid_row) in table.rows().iter().zip(&grid.rows) {
            self.output.push_str("<w:tr>\n");
            if grid_row.is_header {
                self.output.push_str("<w:trPr>\n<w:tblHeader/>\n</w:trPr>\n");
            }

            for (cell, grid_cell) in row.cells.iter().zip(&grid_row.cells) {
                self.output.push_str("<w:tc>\n");
                self.generate_cell_properties(grid_cell);
                self.generate_blocks(&cell.blocks, &grid_cell.blocks)?;

                // A cell must end with a paragraph
                if !matches!(cell.blocks.last(), Some(Block::Paragraph(_))) {
                    self.output.push_str("<w:p/>\n");
                }
                self.output.push_str("</w:tc>\n");
            }

            self.output.push_str("</w:tr>\n");
        }

        self.output.push_str("</w:tbl>\n");
        Ok(())
    }

    fn generate_cell_properties(&mut self, cell: &GridCell) {
        self.output.push_str("<w:tcPr>\n");
        self.output.push_str(&format!(
            "<w:tcW w:w=\"{}\" w:type=\"dxa\"/>\n",
            cell.rect.width
        ));

        if cell.borders.any_visible() {
            self.generate_cell_borders(&cell.borders);
        }

        if let Some(ref shading) = cell.shading {
            self.output.push_str(&format!(
                "<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>\n",
                shading.fill
            ));
        }

        let m = cell.margins;
        if m != CellMargins::default() {
            self.output.push_str("<w:tcMar>\n");
            for (edge, width) in [
                ("top", m.top),
                ("left", m.left),
                ("bottom", m.bottom),
                ("right", m.right),
            ] {
                self.output.push_str(&format!(
                    "<w:{} w:w=\"{}\" w:type=\"dxa\"/>\n",
                    edge, width
                ));
            }
            self.output.push_str("</w:tcMar>\n");
        }

        self.output.push_str("</w:tcPr>\n");
    }

    fn generate_cell_borders(&mut self, borders: &ResolvedBorders) {
        self.output.push_str("<w:tcBorders>\n");
        for (edge, spec) in [
            ("top", &borders.top),
            ("left", &borders.left),
            ("bottom", &borders.bottom),
            ("right", &borders.right),
        ] {
            if spec.is_visible() {
                self.output.push_str(&format!(
                    "<w:{} w:val=\"{}\" w:sz=\"{}\" w:space=\"0\" w:color=\"{}\"/>\n",
                    edge,
                    spec.style.as_ooxml(),
                    spec.size,
                    spec.color
                ));
            } else {
                self.output.push_str(&format!("<w:{} w:val=\"nil\"/>\n", edge));
            }
        }
        self.output.push_str("</w:tcBorders>\n");
    }
}

/// `w:rPr` for the properties that are set, or nothing
pub(crate) fn run_properties_xml(props: &RunProperties) -> String {
    if props.is_empty() {
        return String::new();
    }

    let mut xml = String::from("<w:rPr>\n");
    if let Some(ref family) = props.font_family {
        let family = escape_xml(family);
        xml.push_str(&format!(
            "<w:rFonts w:ascii=\"{f}\" w:hAnsi=\"{f}\" w:eastAsia=\"{f}\" w:cs=\"{f}\"/>\n",
            f = family
        ));
    }
    match props.bold {
        Some(true) => xml.push_str("<w:b/>\n"),
        Some(false) => xml.push_str("<w:b w:val=\"0\"/>\n"),
        None => {}
    }
    match props.italic {
        Some(true) => xml.push_str("<w:i/>\n"),
        Some(false) => xml.push_str("<w:i w:val=\"0\"/>\n"),
        None => {}
    }
    if let Some(ref color) = props.color {
        xml.push_str(&format!("<w:color w:val=\"{}\"/>\n", color));
    }
    if let Some(size) = props.size {
        xml.push_str(&format!("<w:sz w:val=\"{}\"/>\n", size));
        xml.push_str(&format!("<w:szCs w:val=\"{}\"/>\n", size));
    }
    xml.push_str("</w:rPr>\n");
    xml
}

/// `w:pPr` for a style reference plus the properties that are set, or
/// nothing
pub(crate) fn paragraph_properties_xml(style: Option<&str>, props: &ParagraphProperties) -> String {
    if style.is_none() && props.is_empty() {
        return String::new();
    }

    let mut xml = String::from("<w:pPr>\n");
    if let Some(style) = style {
        xml.push_str(&format!("<w:pStyle w:val=\"{}\"/>\n", escape_xml(style)));
    }
    if props.spacing_before.is_some() || props.spacing_after.is_some() {
        xml.push_str("<w:spacing");
        if let Some(before) = props.spacing_before {
            xml.push_str(&format!(" w:before=\"{}\"", before));
        }
        if let Some(after) = props.spacing_after {
            xml.push_str(&format!(" w:after=\"{}\"", after));
        }
        xml.push_str("/>\n");
    }
    if let Some(alignment) = props.alignment {
        xml.push_str(&format!("<w:jc w:val=\"{}\"/>\n", alignment.as_ooxml()));
    }
    if let Some(level) = props.outline_level {
        xml.push_str(&format!("<w:outlineLvl w:val=\"{}\"/>\n", level.get()));
    }
    xml.push_str("</w:pPr>\n");
    xml
}

fn content_types_xml() -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push('\n');
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push('\n');
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push('\n');
    for (part, content_type) in [
        (
            "/word/document.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
        ),
        (
            "/word/styles.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
        ),
        (
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
        ),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml",
        ),
    ] {
        xml.push_str(&format!(
            "<Override PartName=\"{}\" ContentType=\"{}\"/>\n",
            part, content_type
        ));
    }
    xml.push_str("</Types>");
    xml
}

/// docProps/core.xml; only supplied values are written
fn core_properties_xml(meta: &DocumentMeta) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
        r#"xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
        r#"xmlns:dcterms="http://purl.org/dc/terms/" "#,
        r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" "#,
        r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    xml.push('\n');

    for (tag, value) in [
        ("dc:title", &meta.title),
        ("dc:subject", &meta.subject),
        ("dc:creator", &meta.creator),
        ("cp:keywords", &meta.keywords),
        ("dc:description", &meta.description),
    ] {
        if let Some(value) = value {
            xml.push_str(&format!("<{tag}>{}</{tag}>\n", escape_xml(value), tag = tag));
        }
    }
    if let Some(ref created) = meta.created {
        xml.push_str(&format!(
            "<dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>\n",
            escape_xml(created)
        ));
    }

    xml.push_str("</cp:coreProperties>");
    xml
}

/// docProps/app.xml with the explicit page count
fn app_properties_xml(pages: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
        r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#
    ));
    xml.push('\n');
    xml.push_str("<Application>docforge</Application>\n");
    xml.push_str(&format!("<Pages>{}</Pages>\n", pages));
    xml.push_str("</Properties>");
    xml
}

/// Escape special XML characters
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{build_parts, part, registry, report_document};
    use docforge_ast::{
        Alignment, CellBorders, Color, DocumentBuilder, PageMargins, SectionBuilder,
        StructuralError, TableBuilder, TableCell, TableRow,
    };

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_package_parts() {
        let archive = build_parts(&report_document());
        assert_eq!(
            archive.file_list(),
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "docProps/app.xml",
                "docProps/core.xml",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/styles.xml",
            ]
        );
    }

    #[test]
    fn test_report_document_xml() {
        let xml = part(&build_parts(&report_document()), "word/document.xml");

        assert!(xml.contains("<w:pStyle w:val=\"Heading1\"/>"));
        assert!(xml.contains(">Report</w:t>"));
        assert_eq!(xml.matches("<w:tbl>").count(), 1);
        assert_eq!(xml.matches("<w:tr>").count(), 2);
        assert!(xml.contains("<w:gridCol w:w=\"2000\"/>"));
        assert!(xml.contains("<w:gridCol w:w=\"4000\"/>"));
        assert!(xml.contains("<w:tblW w:w=\"6000\" w:type=\"dxa\"/>"));
        assert!(xml.contains("<w:tblLayout w:type=\"fixed\"/>"));
        assert!(xml.contains("<w:tblHeader/>"));
        // header shaded, data row not
        assert_eq!(xml.matches("<w:shd ").count(), 2);
        assert!(xml.contains("w:fill=\"D5E8F0\""));
        assert_eq!(xml.matches("<w:sectPr>").count(), 1);
    }

    #[test]
    fn test_cell_property_order() {
        let xml = part(&build_parts(&report_document()), "word/document.xml");
        let tc_w = xml.find("<w:tcW").unwrap();
        let borders = xml.find("<w:tcBorders>").unwrap();
        let shd = xml.find("<w:shd ").unwrap();
        let mar = xml.find("<w:tcMar>").unwrap();
        assert!(tc_w < borders && borders < shd && shd < mar);

        let top = xml.find("<w:top w:val=\"single\"").unwrap();
        let left = xml.find("<w:left w:val=\"single\"").unwrap();
        let bottom = xml.find("<w:bottom w:val=\"single\"").unwrap();
        let right = xml.find("<w:right w:val=\"single\"").unwrap();
        assert!(top < left && left < bottom && bottom < right);
    }

    #[test]
    fn test_sections_emit_one_sect_pr_each() {
        let landscape = PageGeometry {
            width: 15840,
            height: 12240,
            margins: PageMargins::uniform(720),
        };
        let doc = DocumentBuilder::new()
            .section(
                SectionBuilder::new(PageGeometry::letter())
                    .paragraph(Paragraph::text("one"))
                    .build(),
            )
            .section(
                SectionBuilder::new(landscape)
                    .paragraph(Paragraph::text("two"))
                    .build(),
            )
            .section(SectionBuilder::new(PageGeometry::a4()).build())
            .build()
            .unwrap();

        let xml = part(&build_parts(&doc), "word/document.xml");
        assert_eq!(xml.matches("<w:sectPr>").count(), 3);
        assert_eq!(xml.matches("w:orient=\"landscape\"").count(), 1);
        assert!(xml.contains("<w:pgSz w:w=\"11906\" w:h=\"16838\"/>\n<w:pgMar"));
        assert!(xml.contains("w:header=\"720\" w:footer=\"720\" w:gutter=\"0\""));

        // the final section's properties close the body
        let last = xml.rfind("<w:sectPr>").unwrap();
        assert!(xml[last..].contains("</w:sectPr>\n</w:body>"));
        // sections stay in order
        assert!(xml.find(">one<").unwrap() < xml.find(">two<").unwrap());
    }

    #[test]
    fn test_paragraph_overrides_only() {
        let doc = DocumentBuilder::new()
            .section(
                SectionBuilder::new(PageGeometry::letter())
                    .paragraph(
                        Paragraph::new()
                            .run(Run::new("plain"))
                            .run(Run::new("loud").bold().color(Color::hex("FF0000").unwrap()))
                            .align(Alignment::Justify)
                            .spacing_after(240),
                    )
                    .build(),
            )
            .build()
            .unwrap();

        let xml = part(&build_parts(&doc), "word/document.xml");
        assert!(xml.contains("<w:pPr>\n<w:spacing w:after=\"240\"/>\n<w:jc w:val=\"both\"/>\n</w:pPr>"));
        assert!(!xml.contains("<w:pStyle"));
        assert!(xml.contains("<w:r>\n<w:t xml:space=\"preserve\">plain</w:t>"));
        assert!(xml.contains("<w:rPr>\n<w:b/>\n<w:color w:val=\"FF0000\"/>\n</w:rPr>"));
    }

    #[test]
    fn test_page_break_and_line_break() {
        let doc = DocumentBuilder::new()
            .section(
                SectionBuilder::new(PageGeometry::letter())
                    .paragraph(Paragraph::text("first\nsecond"))
                    .page_break()
                    .build(),
            )
            .build()
            .unwrap();

        let xml = part(&build_parts(&doc), "word/document.xml");
        assert!(xml.contains("first</w:t>\n<w:br/>\n<w:t xml:space=\"preserve\">second"));
        assert!(xml.contains("<w:p>\n<w:r>\n<w:br w:type=\"page\"/>\n</w:r>\n</w:p>"));
    }

    #[test]
    fn test_empty_and_nested_cells_end_with_paragraph() {
        let inner = TableBuilder::new(vec![1000])
            .row(TableRow::new(vec![TableCell::text("inner")]))
            .build()
            .unwrap();
        let table = TableBuilder::new(vec![3000, 3000])
            .row(TableRow::new(vec![
                TableCell::new(),
                TableCell::new().block(Block::Table(inner)),
            ]))
            .build()
            .unwrap();
        let doc = DocumentBuilder::new()
            .section(SectionBuilder::new(PageGeometry::letter()).table(table).build())
            .build()
            .unwrap();

        let xml = part(&build_parts(&doc), "word/document.xml");
        assert_eq!(xml.matches("<w:tbl>").count(), 2);
        assert_eq!(xml.matches("<w:p/>").count(), 2);
        assert!(xml.contains("</w:tbl>\n<w:p/>\n</w:tc>"));
        // no borders declared anywhere
        assert!(!xml.contains("<w:tcBorders>"));
    }

    #[test]
    fn test_borders_without_visible_edges_are_omitted() {
        let table = TableBuilder::new(vec![2000])
            .row(TableRow::new(vec![TableCell::text("x")]))
            .default_borders(CellBorders::all(docforge_ast::BorderSpec::none()))
            .build()
            .unwrap();
        let doc = DocumentBuilder::new()
            .section(SectionBuilder::new(PageGeometry::letter()).table(table).build())
            .build()
            .unwrap();

        let xml = part(&build_parts(&doc), "word/document.xml");
        assert!(!xml.contains("<w:tcBorders>"));
        assert!(!xml.contains("<w:tcMar>"));
    }

    #[test]
    fn test_vertical_only_margins_near_u32_max() {
        let table = TableBuilder::new(vec![2000])
            .row(TableRow::new(vec![TableCell::text("tall").margins(
                CellMargins {
                    top: u32::MAX,
                    bottom: u32::MAX,
                    ..CellMargins::default()
                },
            )]))
            .build()
            .unwrap();
        let doc = DocumentBuilder::new()
            .section(SectionBuilder::new(PageGeometry::letter()).table(table).build())
            .build()
            .unwrap();

        let xml = part(&build_parts(&doc), "word/document.xml");
        assert!(xml.contains(&format!("<w:top w:w=\"{}\" w:type=\"dxa\"/>", u32::MAX)));
        assert!(xml.contains("<w:left w:w=\"0\" w:type=\"dxa\"/>"));
    }

    #[test]
    fn test_control_characters_fail_the_build() {
        let doc = DocumentBuilder::new()
            .section(
                SectionBuilder::new(PageGeometry::letter())
                    .paragraph(Paragraph::text("bell\u{7}nul\u{0}"))
                    .build(),
            )
            .build()
            .unwrap();

        let registry = registry();
        match DocxWriter::new(&registry).serialize(&doc) {
            Err(OoxmlError::Structural(StructuralError::InvalidText { codepoint })) => {
                assert_eq!(codepoint, 7)
            }
            other => panic!("Expected InvalidText, got {:?}", other),
        }
    }

    #[test]
    fn test_core_properties() {
        let xml = part(&build_parts(&report_document()), "docProps/core.xml");
        assert!(xml.contains("<dc:title>Quarterly Report</dc:title>"));
        assert!(xml.contains("<dc:creator>Docs &amp; Tools</dc:creator>"));
        assert!(!xml.contains("dcterms:created"));

        let bare = core_properties_xml(&DocumentMeta::default());
        assert!(!bare.contains("<dc:"));
    }

    #[test]
    fn test_app_properties_page_count() {
        let xml = part(&build_parts(&report_document()), "docProps/app.xml");
        assert!(xml.contains("<Pages>1</Pages>"));
    }

    #[test]
    fn test_build_output() {
        let registry = registry();
        let output = DocxWriter::new(&registry)
            .build(&report_document())
            .unwrap();
        assert!(output.bytes.starts_with(b"PK"));
        assert_eq!(output.page_count(), 1);
        assert_eq!(output.digest().len(), 64);
    }
}
