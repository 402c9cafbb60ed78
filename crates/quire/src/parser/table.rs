//! Table parsing module, processes the conversion of table elements.

use crate::attributes::{AttrsParser, CellAttr};
use crate::ir::{Block, Table, TableCell, TableRow};
use crate::tags::TagKind;

use super::core::MarkupParser;
use super::html::MarkupElement;

/// Table parser
pub struct TableParser;

impl TableParser {
    /// Convert a `table` element. Tables without rows produce nothing.
    pub fn convert_table(parser: &mut MarkupParser, element: &MarkupElement) -> Option<Block> {
        let mut rows = Vec::new();
        Self::extract_rows(parser, element, false, &mut rows);

        if rows.iter().all(|row: &TableRow| row.cells.is_empty()) {
            return None;
        }
        rows.retain(|row| !row.cells.is_empty());
        Some(Block::Table(Table { rows }))
    }

    /// Flattens row groups into one row list.
    fn extract_rows(
        parser: &mut MarkupParser,
        element: &MarkupElement,
        in_head: bool,
        rows: &mut Vec<TableRow>,
    ) {
        for child in element.elements() {
            match child.kind {
                TagKind::Thead => Self::extract_rows(parser, child, true, rows),
                TagKind::Tbody | TagKind::Tfoot => Self::extract_rows(parser, child, false, rows),
                TagKind::Tr => rows.push(Self::convert_row(parser, child, in_head)),
                TagKind::Caption => {
                    let caption = parser.blocks_of(child);
                    parser.blocks.extend(caption);
                }
                _ => {}
            }
        }
    }

    fn convert_row(parser: &mut MarkupParser, element: &MarkupElement, in_head: bool) -> TableRow {
        let cells = element
            .elements()
            .filter(|cell| matches!(cell.kind, TagKind::Th | TagKind::Td))
            .map(|cell| {
                let attrs = CellAttr::parse(&cell.attrs);
                TableCell {
                    header: in_head || cell.kind == TagKind::Th,
                    colspan: attrs.colspan,
                    rowspan: attrs.rowspan,
                    content: parser.blocks_of(cell),
                }
            })
            .collect();
        TableRow { cells }
    }
}
