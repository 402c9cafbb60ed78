use crate::ir::{Block, Table, TableCell};
use crate::writer::html;

use super::emit::{IrMarkdownEmitter, flatten_breaks};
use super::escape::escape_table_cell;

impl IrMarkdownEmitter<'_> {
    pub(super) fn render_table(&self, table: &Table) -> String {
        if should_render_table_as_html(table) {
            return html::render_table(table).trim_end_matches('\n').to_string();
        }

        let columns = table.columns();
        if columns == 0 {
            return String::new();
        }

        let mut lines = Vec::with_capacity(table.rows.len() + 1);
        for (idx, row) in table.rows.iter().enumerate() {
            let mut line = String::from("|");
            for col in 0..columns {
                line.push(' ');
                if let Some(cell) = row.cells.get(col) {
                    line.push_str(&self.render_table_cell(cell));
                }
                line.push_str(" |");
            }
            lines.push(line);

            // The separator always follows the first row.
            if idx == 0 {
                lines.push(format!("|{}", " --- |".repeat(columns)));
            }
        }
        lines.join("\n")
    }

    fn render_table_cell(&self, cell: &TableCell) -> String {
        let parts: Vec<String> = cell
            .content
            .iter()
            .map(|block| match block {
                Block::Paragraph(content) | Block::Heading { content, .. } => {
                    self.render_inlines(&flatten_breaks(content))
                }
                other => self.render_block(other, 0),
            })
            .filter(|part| !part.is_empty())
            .map(|part| escape_table_cell(&part))
            .collect();
        parts.join("<br>")
    }
}

/// Merged cells have no pipe-table form.
fn should_render_table_as_html(table: &Table) -> bool {
    table
        .rows
        .iter()
        .flat_map(|row| &row.cells)
        .any(|cell| cell.colspan > 1 || cell.rowspan > 1)
}
