//! Plain-text importer.

use crate::ir::{Block, Document, Inline};

/// Reads literal text: every non-blank line becomes one paragraph.
pub fn from_plain_text(text: &str) -> Document {
    let blocks = text
        .lines()
        .map(|line| line.trim_end())
        .filter(|line| !line.trim().is_empty())
        .map(|line| Block::Paragraph(vec![Inline::text(line)]))
        .collect();
    Document::new(blocks)
}
