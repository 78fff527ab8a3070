//! Table layout
//!
//! Turns a [`Table`] into a [`TableGrid`]: absolute column offsets, the
//! border each cell edge actually draws, the margins it actually uses and
//! the width left over for its content. Nested tables are laid out against
//! the content width of the cell that holds them.
//!
//! Layout is a pure function of the table and the available width, so the
//! same input always yields the same grid.

use docforge_ast::{Block, BorderSpec, CellBorders, CellMargins, Section, Shading, Table};
use thiserror::Error;

/// Errors raised while fitting tables into the page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Declared column widths exceed the space the table is placed in
    #[error("Table needs {required} twips but only {available} are available")]
    TableOverflow { required: u64, available: u32 },

    /// Cell margins leave no room for content
    #[error(
        "Cell margins ({margins} twips) do not fit column {column} ({width} twips) in row {row}"
    )]
    MarginOverflow {
        row: usize,
        column: usize,
        width: u32,
        margins: u32,
    },
}

/// Position of a cell in the grid, in twips from the table's left edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub row: usize,
    pub column: usize,
    pub x: u32,
    pub width: u32,
}

/// Borders after applying the table defaults; every edge is decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBorders {
    pub top: BorderSpec,
    pub left: BorderSpec,
    pub bottom: BorderSpec,
    pub right: BorderSpec,
}

impl ResolvedBorders {
    fn resolve(cell: &CellBorders, table: &CellBorders) -> Self {
        let pick = |own: &Option<BorderSpec>, fallback: &Option<BorderSpec>| {
            own.as_ref()
                .or(fallback.as_ref())
                .cloned()
                .unwrap_or_else(BorderSpec::none)
        };
        Self {
            top: pick(&cell.top, &table.top),
            left: pick(&cell.left, &table.left),
            bottom: pick(&cell.bottom, &table.bottom),
            right: pick(&cell.right, &table.right),
        }
    }

    /// True when at least one edge draws a line
    pub fn any_visible(&self) -> bool {
        self.top.is_visible()
            || self.left.is_visible()
            || self.bottom.is_visible()
            || self.right.is_visible()
    }
}

/// A placed cell
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub rect: CellRect,
    pub borders: ResolvedBorders,
    pub shading: Option<Shading>,
    pub margins: CellMargins,
    /// Column width minus horizontal margins
    pub content_width: u32,
    /// Layout of the cell's blocks, parallel to `TableCell::blocks`
    pub blocks: Vec<BlockLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub cells: Vec<GridCell>,
    pub is_header: bool,
}

/// A fully laid-out table
#[derive(Debug, Clone, PartialEq)]
pub struct TableGrid {
    /// Total width, equal to the sum of `column_widths`
    pub width: u32,
    pub column_widths: Vec<u32>,
    pub rows: Vec<GridRow>,
}

impl TableGrid {
    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Left offset of every column plus the table's right edge
    pub fn column_offsets(&self) -> Vec<u32> {
        let mut offsets = Vec::with_capacity(self.column_widths.len() + 1);
        let mut x: u32 = 0;
        offsets.push(x);
        for &width in &self.column_widths {
            x = x.saturating_add(width);
            offsets.push(x);
        }
        offsets
    }

    /// Get a cell by row and column
    pub fn cell(&self, row: usize, column: usize) -> Option<&GridCell> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }
}

/// Layout result for one block, parallel to the block sequence it came from
#[derive(Debug, Clone, PartialEq)]
pub enum BlockLayout {
    Paragraph,
    Table(TableGrid),
    PageBreak,
}

/// Lay out a table within `available_width` twips
pub fn layout(table: &Table, available_width: u32) -> Result<TableGrid, LayoutError> {
    let required = table.width();
    let total = match u32::try_from(required) {
        Ok(total) if total <= available_width => total,
        _ => {
            return Err(LayoutError::TableOverflow {
                required,
                available: available_width,
            })
        }
    };

    let default_margins = table.default_margins().unwrap_or_default();
    let mut rows = Vec::with_capacity(table.rows().len());

    for (row_index, row) in table.rows().iter().enumerate() {
        let mut cells = Vec::with_capacity(row.cells.len());
        // Bounded by `total`, which fits in u32
        let mut x: u32 = 0;

        for (column, (cell, &width)) in row.cells.iter().zip(table.column_widths()).enumerate() {
            let margins = cell.margins.unwrap_or(default_margins);
            let horizontal = margins.horizontal();
            if horizontal > 0 && horizontal >= width {
                return Err(LayoutError::MarginOverflow {
                    row: row_index,
                    column,
                    width,
                    margins: horizontal,
                });
            }
            let content_width = width - horizontal;

            cells.push(GridCell {
                rect: CellRect {
                    row: row_index,
                    column,
                    x,
                    width,
                },
                borders: ResolvedBorders::resolve(&cell.borders, table.default_borders()),
                shading: cell.shading.clone(),
                margins,
                content_width,
                blocks: layout_blocks(&cell.blocks, content_width)?,
            });
            x = x.saturating_add(width);
        }

        rows.push(GridRow {
            cells,
            is_header: row.is_header,
        });
    }

    log::trace!(
        "Laid out {}x{} table ({} of {} twips)",
        rows.len(),
        table.column_count(),
        total,
        available_width
    );

    Ok(TableGrid {
        width: total,
        column_widths: table.column_widths().to_vec(),
        rows,
    })
}

/// Lay out a block sequence within `available_width` twips
pub fn layout_blocks(
    blocks: &[Block],
    available_width: u32,
) -> Result<Vec<BlockLayout>, LayoutError> {
    blocks
        .iter()
        .map(|block| match block {
            Block::Paragraph(_) => Ok(BlockLayout::Paragraph),
            Block::Table(table) => layout(table, available_width).map(BlockLayout::Table),
            Block::PageBreak => Ok(BlockLayout::PageBreak),
        })
        .collect()
}

/// Lay out a section against its page content width
pub fn layout_section(section: &Section) -> Result<Vec<BlockLayout>, LayoutError> {
    layout_blocks(section.blocks(), section.geometry().content_width())
}
