//! Text writer implementation - produces human-readable plain text.

use ecow::EcoString;

use crate::Result;
use crate::common::FormatWriter;
use crate::ir::{self, Block, Inline, ListItem, Table};
use crate::options::{Labels, TextOptions};

/// Renders a document as plain text.
pub fn to_text(document: &ir::Document, options: &TextOptions) -> String {
    let writer = TextRenderer {
        options,
        labels: options.locale.labels(),
    };
    let raw = writer.render_blocks(&document.blocks, "\n\n");
    finalize(&raw)
}

struct TextRenderer<'a> {
    options: &'a TextOptions,
    labels: &'static Labels,
}

impl TextRenderer<'_> {
    fn render_blocks(&self, blocks: &[Block], separator: &str) -> String {
        blocks
            .iter()
            .map(|block| self.render_block(block))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn render_block(&self, block: &Block) -> String {
        match block {
            Block::Paragraph(content) => render_inlines(content),
            Block::Heading { level, content } => {
                let text = render_inlines(content).replace('\n', " ");
                let width = self.options.heading_rule_width;
                match level {
                    1 => {
                        let rule = "=".repeat(width);
                        format!("{rule}\n{text}\n{rule}")
                    }
                    2 => {
                        let rule = "-".repeat(width);
                        format!("{rule}\n{text}\n{rule}")
                    }
                    3 => format!("*** {text} ***"),
                    4 => format!("** {text} **"),
                    _ => format!("* {text} *"),
                }
            }
            Block::BulletList(items) => self.render_list(items, |_, _| "• ".into()),
            Block::OrderedList { start, items } => {
                let start = *start as usize;
                self.render_list(items, |idx, _| format!("{}. ", start + idx))
            }
            Block::TaskList(items) => self.render_list(items, |_, item| {
                if item.checked.unwrap_or(false) {
                    "☑ ".into()
                } else {
                    "☐ ".into()
                }
            }),
            Block::Blockquote(content) => self
                .render_blocks(content, "\n\n")
                .lines()
                .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") })
                .collect::<Vec<_>>()
                .join("\n"),
            Block::CodeBlock { code, .. } => code
                .trim_end_matches('\n')
                .lines()
                .map(|line| format!("    {line}"))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Table(table) => self.render_table(table),
            Block::HorizontalRule => "-".repeat(self.options.rule_width),
            Block::Image { src, alt, .. } => {
                let label = self.labels.image.to_uppercase();
                if alt.trim().is_empty() {
                    format!("[{label}: {src}]")
                } else {
                    format!("[{label}: {} - {src}]", alt.trim())
                }
            }
            Block::VideoEmbed(video) => {
                format!("[{}: {}]", self.labels.video.to_uppercase(), video.url())
            }
            Block::Canvas { strokes } => format!(
                "[{}: {} {}]",
                self.labels.drawing.to_uppercase(),
                strokes.len(),
                self.labels.strokes
            ),
            Block::Details(details) => {
                let summary = render_inlines(&details.summary).replace('\n', " ");
                let mut out = format!("[{}: {}]", self.labels.details.to_uppercase(), summary.trim());
                let content = self.render_blocks(&details.content, "\n\n");
                if !content.is_empty() {
                    out.push('\n');
                    out.push_str(&content);
                }
                out.push('\n');
                out.push_str(&format!("[{}]", self.labels.details_end.to_uppercase()));
                out
            }
            Block::MathBlock { latex } => latex.trim().to_string(),
        }
    }

    fn render_list(
        &self,
        items: &[ListItem],
        marker: impl Fn(usize, &ListItem) -> String,
    ) -> String {
        let mut lines = Vec::new();
        for (idx, item) in items.iter().enumerate() {
            let content = self.render_blocks(&item.content, "\n");
            let mut content_lines = content.lines();
            let first = content_lines.next().unwrap_or_default();
            lines.push(format!("{}{first}", marker(idx, item)));
            for line in content_lines {
                if line.is_empty() {
                    lines.push(String::new());
                } else {
                    lines.push(format!("  {line}"));
                }
            }
        }
        lines.join("\n")
    }

    fn render_table(&self, table: &Table) -> String {
        // Rows each column stays covered by a row span from above.
        let mut covered: Vec<usize> = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let blocked: Vec<bool> = covered.iter().map(|left| *left > 0).collect();
            for left in covered.iter_mut().filter(|left| **left > 0) {
                *left -= 1;
            }

            let mut cells = Vec::new();
            for cell in &row.cells {
                while blocked.get(cells.len()).copied().unwrap_or(false) {
                    cells.push(String::new());
                }
                let text = self
                    .render_blocks(&cell.content, " ")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                let col = cells.len();
                let end = col + cell.col_span();
                cells.push(text);
                cells.resize(end, String::new());
                if cell.row_span() > 1 {
                    if covered.len() < end {
                        covered.resize(end, 0);
                    }
                    covered[col..end].fill(cell.row_span() - 1);
                }
            }
            rows.push(cells);
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return String::new();
        }
        for cells in &mut rows {
            cells.resize(columns, String::new());
        }

        let mut widths = vec![0usize; columns];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        // The separator goes under the leading header rows, or the first row.
        let header_rows = table
            .rows
            .iter()
            .take_while(|row| !row.cells.is_empty() && row.cells.iter().all(|c| c.header))
            .count()
            .max(1);

        let mut out = vec![format!("[{}]", self.labels.table.to_uppercase())];
        for (idx, row) in rows.iter().enumerate() {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad(cell, *width))
                .collect::<Vec<_>>()
                .join(" | ");
            out.push(line);
            if idx + 1 == header_rows && rows.len() > 1 {
                let rule = widths
                    .iter()
                    .map(|width| "-".repeat((*width).max(1)))
                    .collect::<Vec<_>>()
                    .join("-+-");
                out.push(rule);
            }
        }
        out.push(format!("[{}]", self.labels.table_end.to_uppercase()));
        out.join("\n")
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut out = String::with_capacity(width);
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    out
}

/// Renders inline content, writing links as `text (href)`.
fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    let mut idx = 0;
    while idx < inlines.len() {
        let href = link_of(&inlines[idx]);
        let end = inlines[idx..]
            .iter()
            .position(|inline| link_of(inline) != href)
            .map_or(inlines.len(), |len| idx + len);
        let text: String = inlines[idx..end].iter().map(render_inline).collect();
        out.push_str(&text);
        if let Some(href) = href
            && text.trim() != href.as_str()
        {
            out.push_str(" (");
            out.push_str(href);
            out.push(')');
        }
        idx = end;
    }
    out
}

fn link_of(inline: &Inline) -> Option<&EcoString> {
    match inline {
        Inline::Text(text) => text.marks.link(),
        _ => None,
    }
}

fn render_inline(inline: &Inline) -> String {
    match inline {
        Inline::Text(text) => collapse_spaces(&text.value),
        Inline::Mention { kind, label, .. } => format!("{}{label}", kind.sigil()),
        Inline::Emoji { shortcode } => format!(":{shortcode}:"),
        Inline::MathInline { latex } => latex.to_string(),
        Inline::HardBreak => "\n".to_string(),
    }
}

/// Collapses runs of horizontal whitespace into one space.
fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch == ' ' || ch == '\t' {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

/// Trims trailing spaces, collapses blank-line runs to one blank line and
/// decodes entities.
///
/// Decoding runs over text the importers have already decoded, so a literal
/// `&amp;` in the document is written as `&`.
fn finalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0usize;
    for line in raw.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    html_escape::decode_html_entities(out.trim()).into_owned()
}

/// Plain-text writer implementation.
#[derive(Default)]
pub struct TextWriter {
    options: TextOptions,
}

impl TextWriter {
    pub fn new(options: TextOptions) -> Self {
        Self { options }
    }
}

impl FormatWriter for TextWriter {
    fn write_eco(&mut self, document: &ir::Document, output: &mut EcoString) -> Result<()> {
        output.push_str(&to_text(document, &self.options));
        Ok(())
    }

    fn write_vec(&mut self, document: &ir::Document) -> Result<Vec<u8>> {
        let mut output = EcoString::new();
        self.write_eco(document, &mut output)?;
        if !output.is_empty() {
            output.push('\n');
        }
        Ok(output.as_bytes().to_vec())
    }
}
