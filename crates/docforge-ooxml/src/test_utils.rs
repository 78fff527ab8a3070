//! Shared test fixtures for docforge-ooxml

use docforge_ast::{
    BorderSpec, CellBorders, CellMargins, Color, Document, DocumentBuilder, DocumentMeta,
    PageGeometry, Paragraph, SectionBuilder, Shading, Table, TableBuilder, TableCell, TableRow,
};

use crate::archive::OoxmlArchive;
use crate::config::EngineConfig;
use crate::styles::StyleRegistry;
use crate::writer::DocxWriter;

/// Registry with the standard catalog
pub fn registry() -> StyleRegistry {
    StyleRegistry::from_config(&EngineConfig::default()).unwrap()
}

/// Two-column status table: shaded header row, plain data row
pub fn status_table() -> Table {
    let shaded = |text: &str| {
        TableCell::text(text).shading(Shading::solid(Color::hex("D5E8F0").unwrap()))
    };

    TableBuilder::new(vec![2000, 4000])
        .row(TableRow::header(vec![shaded("Component"), shaded("Status")]))
        .row(TableRow::new(vec![
            TableCell::text("Database"),
            TableCell::text("Active"),
        ]))
        .default_borders(CellBorders::all(BorderSpec::single(
            1,
            Color::hex("CCCCCC").unwrap(),
        )))
        .default_margins(CellMargins::symmetric(80, 120))
        .build()
        .unwrap()
}

/// One letter section: a level-0 heading and the status table
pub fn report_document() -> Document {
    DocumentBuilder::new()
        .meta(DocumentMeta {
            title: Some("Quarterly Report".to_string()),
            creator: Some("Docs & Tools".to_string()),
            ..Default::default()
        })
        .section(
            SectionBuilder::new(PageGeometry::letter())
                .paragraph(Paragraph::heading(1).run("Report"))
                .table(status_table())
                .build(),
        )
        .build()
        .unwrap()
}

/// Serialize with the standard registry and unpack the result
pub fn build_parts(document: &Document) -> OoxmlArchive {
    let registry = registry();
    let bytes = DocxWriter::new(&registry).serialize(document).unwrap();
    OoxmlArchive::from_bytes(&bytes).unwrap()
}

/// A part as text, panicking if it is missing
pub fn part(archive: &OoxmlArchive, path: &str) -> String {
    archive
        .get_string(path)
        .unwrap_or_else(|| panic!("missing part {}", path))
}
