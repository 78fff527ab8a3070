//! Tables with fixed column widths
//!
//! A [`Table`] can only be obtained through [`TableBuilder::build`] (or
//! deserialization, which goes through the same checks), so every table in
//! a tree has uniform rows whose cell count equals the number of declared
//! columns.

use serde::{Deserialize, Serialize};

use crate::block::{Block, Paragraph};
use crate::error::{Result, StructuralError};
use crate::inline::Run;
use crate::style::Color;

/// Border line style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    None,
    Single,
    Double,
    Dotted,
    Dashed,
    Thick,
}

impl BorderStyle {
    /// Value of the `w:val` attribute on border elements
    pub fn as_ooxml(self) -> &'static str {
        match self {
            BorderStyle::None => "nil",
            BorderStyle::Single => "single",
            BorderStyle::Double => "double",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Thick => "thick",
        }
    }
}

/// One border edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderSpec {
    pub style: BorderStyle,
    /// Line width in eighths of a point
    #[serde(default)]
    pub size: u32,
    #[serde(default = "Color::auto")]
    pub color: Color,
}

impl BorderSpec {
    /// No visible border
    pub fn none() -> Self {
        Self {
            style: BorderStyle::None,
            size: 0,
            color: Color::auto(),
        }
    }

    /// A single solid line
    pub fn single(size: u32, color: Color) -> Self {
        Self {
            style: BorderStyle::Single,
            size,
            color,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.style != BorderStyle::None
    }
}

/// Per-edge border overrides; `None` defers to the table default
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellBorders {
    pub top: Option<BorderSpec>,
    pub bottom: Option<BorderSpec>,
    pub left: Option<BorderSpec>,
    pub right: Option<BorderSpec>,
}

impl CellBorders {
    /// The same border on all four edges
    pub fn all(spec: BorderSpec) -> Self {
        Self {
            top: Some(spec.clone()),
            bottom: Some(spec.clone()),
            left: Some(spec.clone()),
            right: Some(spec),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none() && self.left.is_none() && self.right.is_none()
    }
}

/// Flat background fill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shading {
    pub fill: Color,
}

impl Shading {
    pub fn solid(fill: Color) -> Self {
        Self { fill }
    }
}

/// Inner cell margins in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl CellMargins {
    /// Same margin above and below, same margin left and right
    pub fn symmetric(vertical: u32, horizontal: u32) -> Self {
        Self {
            top: vertical,
            bottom: vertical,
            left: horizontal,
            right: horizontal,
        }
    }

    /// Horizontal space taken by the margins, saturating at `u32::MAX`
    pub fn horizontal(&self) -> u32 {
        self.left.saturating_add(self.right)
    }
}

/// A table cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    /// Cell content (paragraphs, nested tables)
    pub blocks: Vec<Block>,
    pub borders: CellBorders,
    pub shading: Option<Shading>,
    /// `None` defers to the table's default margins
    pub margins: Option<CellMargins>,
}

impl TableCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cell holding one paragraph with one plain run
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().paragraph(Paragraph::new().run(Run::new(text)))
    }

    pub fn paragraph(self, paragraph: Paragraph) -> Self {
        self.block(Block::Paragraph(paragraph))
    }

    pub fn block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn borders(mut self, borders: CellBorders) -> Self {
        self.borders = borders;
        self
    }

    pub fn shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }

    pub fn margins(mut self, margins: CellMargins) -> Self {
        self.margins = Some(margins);
        self
    }
}

/// A table row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    /// Repeat this row at the top of every page the table spans
    #[serde(default)]
    pub is_header: bool,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }

    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }
}

/// A validated table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct Table {
    column_widths: Vec<u32>,
    rows: Vec<TableRow>,
    default_borders: CellBorders,
    default_margins: Option<CellMargins>,
}

impl Table {
    /// Declared column widths in twips
    pub fn column_widths(&self) -> &[u32] {
        &self.column_widths
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Borders applied to every cell edge the cell leaves unspecified
    pub fn default_borders(&self) -> &CellBorders {
        &self.default_borders
    }

    pub fn default_margins(&self) -> Option<CellMargins> {
        self.default_margins
    }

    /// Total width: the sum of the column widths
    ///
    /// Summed as `u64` so that no declared widths can wrap around.
    pub fn width(&self) -> u64 {
        self.column_widths.iter().map(|&w| u64::from(w)).sum()
    }
}

/// Ordered-append builder for [`Table`]
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    column_widths: Vec<u32>,
    rows: Vec<TableRow>,
    default_borders: CellBorders,
    default_margins: Option<CellMargins>,
}

impl TableBuilder {
    /// Start a table with the given column widths (twips)
    pub fn new(column_widths: impl Into<Vec<u32>>) -> Self {
        Self {
            column_widths: column_widths.into(),
            ..Self::default()
        }
    }

    pub fn row(mut self, row: TableRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = TableRow>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn default_borders(mut self, borders: CellBorders) -> Self {
        self.default_borders = borders;
        self
    }

    pub fn default_margins(mut self, margins: CellMargins) -> Self {
        self.default_margins = Some(margins);
        self
    }

    /// Validate the grid and seal the table
    pub fn build(self) -> Result<Table> {
        if self.column_widths.is_empty() {
            return Err(StructuralError::EmptyTable);
        }
        let expected = self.column_widths.len();
        for (index, row) in self.rows.iter().enumerate() {
            if row.cells.len() != expected {
                return Err(StructuralError::ColumnMismatch {
                    row: index,
                    expected,
                    found: row.cells.len(),
                });
            }
        }

        Ok(Table {
            column_widths: self.column_widths,
            rows: self.rows,
            default_borders: self.default_borders,
            default_margins: self.default_margins,
        })
    }
}

#[derive(Deserialize)]
struct RawTable {
    column_widths: Vec<u32>,
    #[serde(default)]
    rows: Vec<TableRow>,
    #[serde(default)]
    default_borders: CellBorders,
    #[serde(default)]
    default_margins: Option<CellMargins>,
}

impl TryFrom<RawTable> for Table {
    type Error = StructuralError;

    fn try_from(raw: RawTable) -> Result<Self> {
        let mut builder = TableBuilder::new(raw.column_widths)
            .rows(raw.rows)
            .default_borders(raw.default_borders);
        if let Some(margins) = raw.default_margins {
            builder = builder.default_margins(margins);
        }
        builder.build()
    }
}
