//! Line classification of cleaned salvage text.

use std::sync::OnceLock;

use regex::Regex;

use crate::ir::{Block, Document, Inline, ListItem};

/// Uppercase lines at least this long are body text, not headings.
const MAX_HEADING_CHARS: usize = 60;

fn section_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:(?:cap[ií]tulo|chapter|secci[oó]n|section|parte|part|t[ií]tulo|anexo|appendix)\s+[0-9ivxlc]+\b|\d+(?:\.\d+)+\.?\s+\S)",
        )
        .expect("section pattern is valid")
    })
}

fn list_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[-•*·▪◦‣–]|\d{1,3}[.)]|[a-zA-Z][.)])\s+(.+)$")
            .expect("list marker pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    Heading2(&'a str),
    Heading3(&'a str),
    ListItem(&'a str),
    Paragraph(&'a str),
}

pub(crate) fn classify(line: &str) -> LineKind<'_> {
    if line.chars().count() < MAX_HEADING_CHARS
        && line.chars().any(char::is_alphabetic)
        && !line.chars().any(char::is_lowercase)
    {
        return LineKind::Heading2(line);
    }
    if section_re().is_match(line) {
        return LineKind::Heading3(line);
    }
    if let Some(body) = list_marker_re().captures(line).and_then(|caps| caps.get(1)) {
        return LineKind::ListItem(body.as_str().trim());
    }
    LineKind::Paragraph(line)
}

/// Builds a document from cleaned text, one block per non-empty line.
/// Consecutive list items form one bullet list.
pub(super) fn structure(text: &str) -> Document {
    let mut blocks: Vec<Block> = Vec::new();
    let mut items: Vec<ListItem> = Vec::new();

    let paragraph = |text: &str| Block::Paragraph(vec![Inline::text(text)]);

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let kind = classify(line);
        if let LineKind::ListItem(body) = kind {
            items.push(ListItem::new(vec![paragraph(body)]));
            continue;
        }
        if !items.is_empty() {
            blocks.push(Block::BulletList(std::mem::take(&mut items)));
        }
        blocks.push(match kind {
            LineKind::Heading2(text) => Block::Heading {
                level: 2,
                content: vec![Inline::text(text)],
            },
            LineKind::Heading3(text) => Block::Heading {
                level: 3,
                content: vec![Inline::text(text)],
            },
            LineKind::ListItem(text) | LineKind::Paragraph(text) => paragraph(text),
        });
    }
    if !items.is_empty() {
        blocks.push(Block::BulletList(items));
    }

    Document::new(blocks).normalize()
}
