//! Semantic intermediate representation for quire.
//!
//! Every importer produces a [`Document`] and every writer consumes one. The
//! tree is rebuilt on each conversion and writers only ever borrow it.

use std::fmt::Write as _;

use ecow::{EcoString, eco_format};
use serde::{Deserialize, Serialize};

/// A converted document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// Block-level elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    BulletList(Vec<ListItem>),
    OrderedList {
        start: u32,
        items: Vec<ListItem>,
    },
    TaskList(Vec<ListItem>),
    Blockquote(Vec<Block>),
    CodeBlock {
        language: Option<EcoString>,
        code: EcoString,
    },
    Table(Table),
    HorizontalRule,
    Image {
        src: EcoString,
        alt: EcoString,
        title: Option<EcoString>,
    },
    VideoEmbed(Video),
    Canvas {
        strokes: Vec<Stroke>,
    },
    Details(Details),
    MathBlock {
        latex: EcoString,
    },
}

/// Inline-level elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(Text),
    Mention {
        kind: MentionKind,
        id: EcoString,
        label: EcoString,
    },
    Emoji {
        shortcode: EcoString,
    },
    MathInline {
        latex: EcoString,
    },
    HardBreak,
}

/// A run of text sharing one mark set.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: EcoString,
    pub marks: MarkSet,
}

/// What a mention points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionKind {
    User,
    Tag,
}

impl MentionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MentionKind::User => "user",
            MentionKind::Tag => "tag",
        }
    }

    /// The character typed before the label.
    pub fn sigil(self) -> char {
        match self {
            MentionKind::User => '@',
            MentionKind::Tag => '#',
        }
    }
}

/// A list item. Items only ever live inside the three list blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    /// `Some` for task items.
    pub checked: Option<bool>,
    pub content: Vec<Block>,
}

impl ListItem {
    pub fn new(content: Vec<Block>) -> Self {
        Self {
            checked: None,
            content,
        }
    }

    pub fn task(checked: bool, content: Vec<Block>) -> Self {
        Self {
            checked: Some(checked),
            content,
        }
    }
}

/// Table block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// Represents a logical row inside a table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// Largest column span a cell may carry.
pub const MAX_COLSPAN: usize = 1000;
/// Largest row span a cell may carry.
pub const MAX_ROWSPAN: usize = 65534;

/// Represents a single table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub header: bool,
    pub colspan: usize,
    pub rowspan: usize,
    pub content: Vec<Block>,
}

impl TableCell {
    pub fn new(header: bool, content: Vec<Block>) -> Self {
        Self {
            header,
            colspan: 1,
            rowspan: 1,
            content,
        }
    }

    /// Column span, within `1..=MAX_COLSPAN`.
    pub fn col_span(&self) -> usize {
        self.colspan.clamp(1, MAX_COLSPAN)
    }

    /// Row span, within `1..=MAX_ROWSPAN`.
    pub fn row_span(&self) -> usize {
        self.rowspan.clamp(1, MAX_ROWSPAN)
    }
}

impl Table {
    /// The widest row, counting column spans.
    pub fn columns(&self) -> usize {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .fold(0usize, |width, cell| width.saturating_add(cell.col_span()))
            })
            .max()
            .unwrap_or(0)
    }

    /// Whether the first row consists of header cells only.
    pub fn has_header_row(&self) -> bool {
        self.rows
            .first()
            .is_some_and(|row| !row.cells.is_empty() && row.cells.iter().all(|c| c.header))
    }
}

/// Hosting service of an embedded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoProvider {
    Youtube,
    Vimeo,
    /// Any other source; the video id is the full URL.
    Other,
}

impl VideoProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoProvider::Youtube => "youtube",
            VideoProvider::Vimeo => "vimeo",
            VideoProvider::Other => "other",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "youtube" => VideoProvider::Youtube,
            "vimeo" => VideoProvider::Vimeo,
            _ => VideoProvider::Other,
        }
    }
}

/// An embedded video.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub provider: VideoProvider,
    pub id: EcoString,
}

impl Video {
    /// The public page of the video.
    pub fn url(&self) -> EcoString {
        match self.provider {
            VideoProvider::Youtube => eco_format!("https://www.youtube.com/watch?v={}", self.id),
            VideoProvider::Vimeo => eco_format!("https://vimeo.com/{}", self.id),
            VideoProvider::Other => self.id.clone(),
        }
    }

    /// The URL placed in an `<iframe>`.
    pub fn embed_url(&self) -> EcoString {
        match self.provider {
            VideoProvider::Youtube => {
                eco_format!("https://www.youtube-nocookie.com/embed/{}", self.id)
            }
            VideoProvider::Vimeo => eco_format!("https://player.vimeo.com/video/{}", self.id),
            VideoProvider::Other => self.id.clone(),
        }
    }

    /// A still image for the video, when one can be derived from the id.
    pub fn thumbnail_url(&self) -> Option<EcoString> {
        match self.provider {
            VideoProvider::Youtube => Some(eco_format!("https://img.youtube.com/vi/{}/0.jpg", self.id)),
            VideoProvider::Vimeo | VideoProvider::Other => None,
        }
    }
}

/// A freehand stroke of a drawing canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// SVG path data.
    pub path: String,
    #[serde(default = "default_stroke_color")]
    pub color: String,
    #[serde(default = "default_stroke_width")]
    pub width: f32,
}

fn default_stroke_color() -> String {
    "#000000".to_owned()
}

fn default_stroke_width() -> f32 {
    2.0
}

/// A collapsible section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Details {
    pub open: bool,
    /// The always visible summary line.
    pub summary: Vec<Inline>,
    /// The collapsible content.
    pub content: Vec<Block>,
}

/// Text styles, declared in canonical nesting order (outermost first).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Link {
        href: EcoString,
        target: Option<EcoString>,
    },
    Highlight {
        color: Option<EcoString>,
    },
    TextColor {
        hex: EcoString,
    },
    FontFamily {
        name: EcoString,
    },
    Subscript,
    Superscript,
}

impl Mark {
    /// Position in the canonical nesting order. A mark set holds at most one
    /// mark per rank.
    pub fn rank(&self) -> u8 {
        match self {
            Mark::Bold => 0,
            Mark::Italic => 1,
            Mark::Underline => 2,
            Mark::Strike => 3,
            Mark::Code => 4,
            Mark::Link { .. } => 5,
            Mark::Highlight { .. } => 6,
            Mark::TextColor { .. } => 7,
            Mark::FontFamily { .. } => 8,
            Mark::Subscript => 9,
            Mark::Superscript => 10,
        }
    }
}

/// An ordered set of marks, at most one per kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MarkSet(Vec<Mark>);

impl MarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mark, replacing a mark of the same kind. Subscript and
    /// superscript exclude each other.
    pub fn insert(&mut self, mark: Mark) {
        match mark {
            Mark::Subscript => self.0.retain(|m| *m != Mark::Superscript),
            Mark::Superscript => self.0.retain(|m| *m != Mark::Subscript),
            _ => {}
        }
        match self.0.binary_search_by_key(&mark.rank(), Mark::rank) {
            Ok(idx) => self.0[idx] = mark,
            Err(idx) => self.0.insert(idx, mark),
        }
    }

    pub fn with(mut self, mark: Mark) -> Self {
        self.insert(mark);
        self
    }

    pub fn contains(&self, mark: &Mark) -> bool {
        self.0.contains(mark)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mark> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The link mark, if any.
    pub fn link(&self) -> Option<&EcoString> {
        self.0.iter().find_map(|mark| match mark {
            Mark::Link { href, .. } => Some(href),
            _ => None,
        })
    }

    /// The highlight mark, if any. The inner option is the highlight color.
    pub fn highlight(&self) -> Option<Option<&EcoString>> {
        self.0.iter().find_map(|mark| match mark {
            Mark::Highlight { color } => Some(color.as_ref()),
            _ => None,
        })
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<T: IntoIterator<Item = Mark>>(iter: T) -> Self {
        let mut set = MarkSet::new();
        for mark in iter {
            set.insert(mark);
        }
        set
    }
}

impl<'a> IntoIterator for &'a MarkSet {
    type Item = &'a Mark;
    type IntoIter = std::slice::Iter<'a, Mark>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Inline {
    /// Unstyled text.
    pub fn text(value: impl Into<EcoString>) -> Self {
        Inline::Text(Text {
            value: value.into(),
            marks: MarkSet::new(),
        })
    }

    /// Text carrying the given marks.
    pub fn styled(value: impl Into<EcoString>, marks: impl IntoIterator<Item = Mark>) -> Self {
        Inline::Text(Text {
            value: value.into(),
            marks: marks.into_iter().collect(),
        })
    }
}

/// Clamps an imported heading level into `1..=6`.
pub fn clamp_heading_level(level: i64) -> u8 {
    level.clamp(1, 6) as u8
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Whether the document carries no visible content.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|block| match block {
            Block::Paragraph(content) => content.is_empty(),
            _ => false,
        })
    }

    /// Merges adjacent text runs with identical marks, drops empty runs,
    /// clamps heading levels and collapses consecutive empty paragraphs.
    pub fn normalize(self) -> Self {
        Self {
            blocks: normalize_blocks(self.blocks),
        }
    }

    /// The document flattened to text, one line per leaf block.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            write_block_text(block, &mut out);
        }
        out
    }
}

pub(crate) fn normalize_blocks(blocks: Vec<Block>) -> Vec<Block> {
    let mut out: Vec<Block> = Vec::with_capacity(blocks.len());
    for block in blocks {
        let block = normalize_block(block);
        if let Block::Paragraph(content) = &block
            && content.is_empty()
            && matches!(out.last(), Some(Block::Paragraph(prev)) if prev.is_empty())
        {
            continue;
        }
        out.push(block);
    }
    out
}

fn normalize_items(items: Vec<ListItem>) -> Vec<ListItem> {
    items
        .into_iter()
        .map(|item| ListItem {
            checked: item.checked,
            content: normalize_blocks(item.content),
        })
        .collect()
}

fn normalize_block(block: Block) -> Block {
    match block {
        Block::Paragraph(content) => Block::Paragraph(normalize_inlines(content)),
        Block::Heading { level, content } => Block::Heading {
            level: clamp_heading_level(level.into()),
            content: normalize_inlines(content),
        },
        Block::BulletList(items) => Block::BulletList(normalize_items(items)),
        Block::OrderedList { start, items } => Block::OrderedList {
            start,
            items: normalize_items(items),
        },
        Block::TaskList(items) => Block::TaskList(normalize_items(items)),
        Block::Blockquote(content) => Block::Blockquote(normalize_blocks(content)),
        Block::Table(table) => Block::Table(Table {
            rows: table
                .rows
                .into_iter()
                .map(|row| TableRow {
                    cells: row
                        .cells
                        .into_iter()
                        .map(|cell| TableCell {
                            content: normalize_blocks(cell.content),
                            ..cell
                        })
                        .collect(),
                })
                .collect(),
        }),
        Block::Details(details) => Block::Details(Details {
            open: details.open,
            summary: normalize_inlines(details.summary),
            content: normalize_blocks(details.content),
        }),
        other => other,
    }
}

/// Merges adjacent text runs bearing the same marks and drops empty ones.
pub fn normalize_inlines(inlines: Vec<Inline>) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::with_capacity(inlines.len());
    for inline in inlines {
        match inline {
            Inline::Text(text) if text.value.is_empty() => {}
            Inline::Text(text) => match out.last_mut() {
                Some(Inline::Text(prev)) if prev.marks == text.marks => {
                    prev.value.push_str(&text.value);
                }
                _ => out.push(Inline::Text(text)),
            },
            other => out.push(other),
        }
    }
    out
}

/// Flattens inline content into text, without any markup.
pub fn inline_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&text.value),
            Inline::Mention { kind, label, .. } => {
                out.push(kind.sigil());
                out.push_str(label);
            }
            Inline::Emoji { shortcode } => {
                let _ = write!(out, ":{shortcode}:");
            }
            Inline::MathInline { latex } => out.push_str(latex),
            Inline::HardBreak => out.push('\n'),
        }
    }
    out
}

fn write_block_text(block: &Block, out: &mut String) {
    match block {
        Block::Paragraph(content) | Block::Heading { content, .. } => {
            out.push_str(&inline_text(content));
            out.push('\n');
        }
        Block::BulletList(items) | Block::TaskList(items) | Block::OrderedList { items, .. } => {
            for item in items {
                for block in &item.content {
                    write_block_text(block, out);
                }
            }
        }
        Block::Blockquote(content) => {
            for block in content {
                write_block_text(block, out);
            }
        }
        Block::CodeBlock { code, .. } => {
            out.push_str(code);
            if !code.ends_with('\n') {
                out.push('\n');
            }
        }
        Block::Table(table) => {
            for row in &table.rows {
                let cells: Vec<String> = row
                    .cells
                    .iter()
                    .map(|cell| {
                        let mut text = String::new();
                        for block in &cell.content {
                            write_block_text(block, &mut text);
                        }
                        text.trim().replace('\n', " ")
                    })
                    .collect();
                out.push_str(&cells.join("\t"));
                out.push('\n');
            }
        }
        Block::Image { alt, .. } => {
            if !alt.is_empty() {
                out.push_str(alt);
                out.push('\n');
            }
        }
        Block::VideoEmbed(video) => {
            out.push_str(&video.url());
            out.push('\n');
        }
        Block::Details(details) => {
            out.push_str(&inline_text(&details.summary));
            out.push('\n');
            for block in &details.content {
                write_block_text(block, out);
            }
        }
        Block::MathBlock { latex } => {
            out.push_str(latex);
            out.push('\n');
        }
        Block::HorizontalRule | Block::Canvas { .. } => {}
    }
}
