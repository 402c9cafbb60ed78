//! Structured word-processing document, independent of any packaging.

use ecow::EcoString;
use serde::Deserialize;

/// Page size and margins, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub header: u32,
    pub footer: u32,
}

impl Default for PageGeometry {
    /// A4 with one inch margins.
    fn default() -> Self {
        Self {
            width: 11906,
            height: 16838,
            margin_top: 1440,
            margin_right: 1440,
            margin_bottom: 1440,
            margin_left: 1440,
            header: 708,
            footer: 708,
        }
    }
}

/// A document ready to be packaged.
#[derive(Debug, Clone, PartialEq)]
pub struct WordDoc {
    pub title: EcoString,
    /// Text of the running header.
    pub header: EcoString,
    /// Label written before the page number field of the footer.
    pub footer: EcoString,
    pub page: PageGeometry,
    pub elements: Vec<WordElement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WordElement {
    Paragraph(WordParagraph),
    Table(WordTable),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Title,
    Normal,
    Heading(u8),
    Quote,
    Code,
    ListItem,
    /// A descriptive stand-in for content that cannot be embedded.
    Placeholder,
}

impl ParagraphStyle {
    /// The style id in the packaged document.
    pub fn style_id(self) -> &'static str {
        match self {
            ParagraphStyle::Title => "Title",
            ParagraphStyle::Normal => "Normal",
            ParagraphStyle::Heading(1) => "Heading1",
            ParagraphStyle::Heading(2) => "Heading2",
            ParagraphStyle::Heading(3) => "Heading3",
            ParagraphStyle::Heading(4) => "Heading4",
            ParagraphStyle::Heading(5) => "Heading5",
            ParagraphStyle::Heading(_) => "Heading6",
            ParagraphStyle::Quote => "Blockquote",
            ParagraphStyle::Code => "CodeBlock",
            ParagraphStyle::ListItem => "ListParagraph",
            ParagraphStyle::Placeholder => "Caption",
        }
    }
}

/// Space before and after a paragraph, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacing {
    pub before: u32,
    pub after: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordParagraph {
    pub style: ParagraphStyle,
    pub runs: Vec<WordRun>,
    /// Left indent in twips.
    pub indent: Option<u32>,
    pub spacing: Option<Spacing>,
}

impl WordParagraph {
    pub fn new(style: ParagraphStyle, runs: Vec<WordRun>) -> Self {
        Self {
            style,
            runs,
            indent: None,
            spacing: None,
        }
    }

    /// A paragraph of one unstyled run.
    pub fn plain(style: ParagraphStyle, text: impl Into<EcoString>) -> Self {
        Self::new(style, vec![WordRun::text(text)])
    }

    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|run| if run.line_break { "\n" } else { run.text.as_str() })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertAlign {
    Subscript,
    Superscript,
}

/// A run of text with one flag per mark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordRun {
    pub text: EcoString,
    /// The run is a line break and carries no text.
    pub line_break: bool,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    /// Monospace code font.
    pub code: bool,
    pub font: Option<EcoString>,
    /// Text color as `RRGGBB`.
    pub color: Option<EcoString>,
    /// Name from Word's highlight palette.
    pub highlight: Option<&'static str>,
    pub link: Option<EcoString>,
    pub vert_align: Option<VertAlign>,
}

impl WordRun {
    pub fn text(text: impl Into<EcoString>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn line_break() -> Self {
        Self {
            line_break: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalMerge {
    /// First cell of a vertically merged range.
    Restart,
    /// Covered by the cell above.
    Continue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordTableCell {
    pub paragraphs: Vec<WordParagraph>,
    pub header: bool,
    pub grid_span: usize,
    pub vertical_merge: Option<VerticalMerge>,
}

impl WordTableCell {
    pub fn empty() -> Self {
        Self {
            paragraphs: Vec::new(),
            header: false,
            grid_span: 1,
            vertical_merge: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordTableRow {
    pub cells: Vec<WordTableCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordTable {
    /// Column count after spans are resolved; every row fills it exactly.
    pub columns: usize,
    /// Width of one grid column, in percent of the table.
    pub width_pct: f32,
    pub rows: Vec<WordTableRow>,
}
