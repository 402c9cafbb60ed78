//! Builds a [`WordDoc`] from the document model.

use std::collections::BTreeMap;

use ecow::EcoString;
use log::debug;

use crate::ir::{self, Block, Inline, ListItem, Mark, Table};
use crate::options::{Labels, WordOptions};

use super::model::*;

/// Spacing before and after headings of level 1 to 6, in twips.
const HEADING_SPACING: [(u32, u32); 6] = [
    (480, 240),
    (360, 180),
    (280, 140),
    (240, 120),
    (200, 100),
    (200, 100),
];

/// Left indent of list items and quotes, in twips.
const BLOCK_INDENT: u32 = 720;

/// Color of hyperlink runs.
const LINK_COLOR: &str = "0563C1";

/// Converts a document into a structured Word document.
///
/// The first element is always the title paragraph. Lists are flattened to a
/// single indent level and media degrade to bracketed placeholders.
pub fn to_word_document(document: &ir::Document, title: &str, options: &WordOptions) -> WordDoc {
    let labels = options.locale.labels();
    let title = EcoString::from(title.trim());

    let mut builder = WordBuilder {
        labels,
        elements: Vec::new(),
    };
    for block in &document.blocks {
        builder.build_block(block);
    }

    let mut body = builder.elements;
    if body.is_empty() {
        debug!("no structured content, falling back to plain text lines");
        body = document
            .plain_text()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| WordElement::Paragraph(WordParagraph::plain(ParagraphStyle::Normal, line)))
            .collect();
    }

    let mut title_paragraph = WordParagraph::plain(ParagraphStyle::Title, title.clone());
    title_paragraph.spacing = Some(Spacing {
        before: 0,
        after: 240,
    });

    let mut elements = Vec::with_capacity(body.len() + 1);
    elements.push(WordElement::Paragraph(title_paragraph));
    elements.extend(body);

    WordDoc {
        header: title.clone(),
        footer: labels.page.into(),
        title,
        page: options.page,
        elements,
    }
}

struct WordBuilder {
    labels: &'static Labels,
    elements: Vec<WordElement>,
}

impl WordBuilder {
    fn push(&mut self, paragraph: WordParagraph) {
        self.elements.push(WordElement::Paragraph(paragraph));
    }

    fn placeholder(&mut self, text: String) {
        self.push(WordParagraph::plain(ParagraphStyle::Placeholder, text));
    }

    fn build_block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(content) => {
                let runs = inline_runs(content);
                if !runs.is_empty() {
                    self.push(WordParagraph::new(ParagraphStyle::Normal, runs));
                }
            }
            Block::Heading { level, content } => {
                let level = (*level).clamp(1, 6);
                let (before, after) = HEADING_SPACING[usize::from(level) - 1];
                let mut paragraph =
                    WordParagraph::new(ParagraphStyle::Heading(level), inline_runs(content));
                paragraph.spacing = Some(Spacing { before, after });
                self.push(paragraph);
            }
            Block::BulletList(items) => self.build_list(items, |_, _| "• ".into()),
            Block::OrderedList { start, items } => {
                let start = *start as usize;
                self.build_list(items, |idx, _| format!("{}. ", start + idx))
            }
            Block::TaskList(items) => self.build_list(items, |_, item| {
                if item.checked.unwrap_or(false) {
                    "☑ ".into()
                } else {
                    "☐ ".into()
                }
            }),
            Block::Blockquote(content) => {
                let start = self.elements.len();
                for block in content {
                    self.build_block(block);
                }
                for element in &mut self.elements[start..] {
                    if let WordElement::Paragraph(paragraph) = element
                        && paragraph.style == ParagraphStyle::Normal
                    {
                        paragraph.style = ParagraphStyle::Quote;
                        paragraph.indent = Some(BLOCK_INDENT);
                    }
                }
            }
            Block::CodeBlock { code, .. } => self.build_code(code),
            Block::Table(table) => {
                if let Some(table) = self.build_table(table) {
                    self.elements.push(WordElement::Table(table));
                }
            }
            Block::HorizontalRule => self.push(WordParagraph::plain(ParagraphStyle::Normal, "* * *")),
            Block::Image { src, alt, .. } => {
                let description = if alt.trim().is_empty() { src } else { alt };
                self.placeholder(format!("[{}: {}]", self.labels.image, description.trim()));
            }
            Block::VideoEmbed(video) => {
                self.placeholder(format!("[{}: {}]", self.labels.video, video.url()));
            }
            Block::Canvas { strokes } => self.placeholder(format!(
                "[{}: {} {}]",
                self.labels.drawing,
                strokes.len(),
                self.labels.strokes
            )),
            Block::Details(details) => {
                let mut runs = inline_runs(&details.summary);
                for run in &mut runs {
                    run.bold = true;
                }
                if !runs.is_empty() {
                    self.push(WordParagraph::new(ParagraphStyle::Normal, runs));
                }
                for block in &details.content {
                    self.build_block(block);
                }
            }
            Block::MathBlock { latex } => self.build_code(latex),
        }
    }

    fn build_code(&mut self, code: &str) {
        for line in code.trim_end_matches('\n').split('\n') {
            let run = WordRun {
                code: true,
                ..WordRun::text(line)
            };
            self.push(WordParagraph::new(ParagraphStyle::Code, vec![run]));
        }
    }

    /// Flattens a list, nested lists included, to one indent level.
    fn build_list(&mut self, items: &[ListItem], marker: impl Fn(usize, &ListItem) -> String) {
        for (idx, item) in items.iter().enumerate() {
            let mut marked = false;
            for block in &item.content {
                match block {
                    Block::Paragraph(content) | Block::Heading { content, .. } => {
                        let mut runs = Vec::new();
                        if !marked {
                            runs.push(WordRun::text(marker(idx, item)));
                            marked = true;
                        }
                        runs.extend(inline_runs(content));
                        let mut paragraph = WordParagraph::new(ParagraphStyle::ListItem, runs);
                        paragraph.indent = Some(BLOCK_INDENT);
                        self.push(paragraph);
                    }
                    other => self.build_block(other),
                }
            }
            if !marked {
                let mut paragraph = WordParagraph::plain(ParagraphStyle::ListItem, marker(idx, item));
                paragraph.indent = Some(BLOCK_INDENT);
                self.push(paragraph);
            }
        }
    }

    /// Lays the cells out on a grid, padding short rows and marking cells
    /// covered by a row span.
    fn build_table(&self, table: &Table) -> Option<WordTable> {
        // Column -> (rows still covered, grid span).
        let mut carried: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
        let mut rows = Vec::with_capacity(table.rows.len());
        let mut columns = 0;

        for row in &table.rows {
            let mut cells = Vec::new();
            let mut col = 0;
            for cell in &row.cells {
                fill_carried(&mut carried, &mut col, &mut cells, false);
                let span = cell.col_span();
                let rowspan = cell.row_span();
                let vertical_merge = (rowspan > 1).then_some(VerticalMerge::Restart);
                if rowspan > 1 {
                    carried.insert(col, (rowspan - 1, span));
                }
                cells.push(WordTableCell {
                    paragraphs: self.build_cell(&cell.content, cell.header),
                    header: cell.header,
                    grid_span: span,
                    vertical_merge,
                });
                col = col.saturating_add(span);
            }
            fill_carried(&mut carried, &mut col, &mut cells, true);

            columns = columns.max(col);
            rows.push((cells, col));
        }

        if columns == 0 {
            return None;
        }

        let rows = rows
            .into_iter()
            .map(|(mut cells, width)| {
                cells.extend((width..columns).map(|_| WordTableCell::empty()));
                WordTableRow { cells }
            })
            .collect();

        Some(WordTable {
            columns,
            width_pct: 100.0 / columns as f32,
            rows,
        })
    }

    fn build_cell(&self, content: &[Block], header: bool) -> Vec<WordParagraph> {
        let mut inner = WordBuilder {
            labels: self.labels,
            elements: Vec::new(),
        };
        for block in content {
            inner.build_block(block);
        }
        inner
            .elements
            .into_iter()
            .filter_map(|element| match element {
                WordElement::Paragraph(mut paragraph) => {
                    if header {
                        for run in &mut paragraph.runs {
                            run.bold = true;
                        }
                    }
                    Some(paragraph)
                }
                WordElement::Table(_) => {
                    debug!("nested table dropped from word table cell");
                    None
                }
            })
            .collect()
    }
}

/// Emits the cells covered by row spans from above, starting at `col`. Only
/// spans at the current column are taken unless `to_end` is set.
fn fill_carried(
    carried: &mut BTreeMap<usize, (usize, usize)>,
    col: &mut usize,
    cells: &mut Vec<WordTableCell>,
    to_end: bool,
) {
    while let Some((at, (remaining, span))) = carried.range(*col..).next().map(|(&at, &v)| (at, v)) {
        if at != *col && !to_end {
            break;
        }
        cells.extend((*col..at).map(|_| WordTableCell::empty()));
        cells.push(WordTableCell {
            grid_span: span,
            vertical_merge: Some(VerticalMerge::Continue),
            ..WordTableCell::empty()
        });
        if remaining > 1 {
            carried.insert(at, (remaining - 1, span));
        } else {
            carried.remove(&at);
        }
        *col = at.saturating_add(span);
    }
}

/// Maps inline content to runs, one flag per mark.
fn inline_runs(inlines: &[Inline]) -> Vec<WordRun> {
    let mut runs = Vec::with_capacity(inlines.len());
    for inline in inlines {
        match inline {
            Inline::Text(text) => {
                let mut run = WordRun::text(text.value.clone());
                for mark in &text.marks {
                    apply_mark(&mut run, mark);
                }
                runs.push(run);
            }
            Inline::Mention { kind, label, .. } => {
                runs.push(WordRun::text(ecow::eco_format!("{}{label}", kind.sigil())));
            }
            Inline::Emoji { shortcode } => {
                runs.push(WordRun::text(ecow::eco_format!(":{shortcode}:")));
            }
            Inline::MathInline { latex } => runs.push(WordRun {
                code: true,
                ..WordRun::text(latex.clone())
            }),
            Inline::HardBreak => runs.push(WordRun::line_break()),
        }
    }
    runs
}

fn apply_mark(run: &mut WordRun, mark: &Mark) {
    match mark {
        Mark::Bold => run.bold = true,
        Mark::Italic => run.italic = true,
        Mark::Underline => run.underline = true,
        Mark::Strike => run.strike = true,
        Mark::Code => run.code = true,
        Mark::Link { href, .. } => {
            run.link = Some(href.clone());
            run.color = Some(LINK_COLOR.into());
            run.underline = true;
        }
        Mark::Highlight { color } => run.highlight = Some(word_highlight(color.as_deref())),
        Mark::TextColor { hex } => {
            if run.link.is_none() {
                run.color = hex_digits(hex);
            }
        }
        Mark::FontFamily { name } => run.font = Some(name.clone()),
        Mark::Subscript => run.vert_align = Some(VertAlign::Subscript),
        Mark::Superscript => run.vert_align = Some(VertAlign::Superscript),
    }
}

/// `#rrggbb` to `RRGGBB`; other color forms have no run color.
fn hex_digits(color: &str) -> Option<EcoString> {
    let digits = color.strip_prefix('#')?;
    (digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| digits.to_ascii_uppercase().into())
}

/// Word's highlight palette.
const PALETTE: [(&str, (u8, u8, u8)); 15] = [
    ("yellow", (0xFF, 0xFF, 0x00)),
    ("green", (0x00, 0xFF, 0x00)),
    ("cyan", (0x00, 0xFF, 0xFF)),
    ("magenta", (0xFF, 0x00, 0xFF)),
    ("blue", (0x00, 0x00, 0xFF)),
    ("red", (0xFF, 0x00, 0x00)),
    ("darkBlue", (0x00, 0x00, 0x80)),
    ("darkCyan", (0x00, 0x80, 0x80)),
    ("darkGreen", (0x00, 0x80, 0x00)),
    ("darkMagenta", (0x80, 0x00, 0x80)),
    ("darkRed", (0x80, 0x00, 0x00)),
    ("darkYellow", (0x80, 0x80, 0x00)),
    ("darkGray", (0x80, 0x80, 0x80)),
    ("lightGray", (0xC0, 0xC0, 0xC0)),
    ("black", (0x00, 0x00, 0x00)),
];

/// Maps a highlight color to the nearest palette entry. The default
/// highlight and unreadable colors are yellow.
pub(crate) fn word_highlight(color: Option<&str>) -> &'static str {
    let Some(color) = color else {
        return "yellow";
    };
    match color {
        "red" => return "red",
        "green" => return "green",
        "blue" => return "cyan",
        _ => {}
    }
    let Some((r, g, b)) = hex_digits(color).and_then(|hex| {
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }) else {
        return "yellow";
    };
    let distance = |(pr, pg, pb): (u8, u8, u8)| {
        let d = |a: u8, b: u8| (i32::from(a) - i32::from(b)).pow(2);
        d(r, pr) + d(g, pg) + d(b, pb)
    };
    PALETTE
        .iter()
        .min_by_key(|(_, rgb)| distance(*rgb))
        .map_or("yellow", |(name, _)| name)
}
