//! Best-effort reconstruction of documents from extracted PDF text.
//!
//! Raw content-stream operators are first reduced to text by an ordered list
//! of independent [`Extractor`]s whose matches are unioned. The cleaned text
//! then passes a garbage guard and is structured line by line. Text that
//! fails the guard yields [`Salvage::NoExtractableContent`] rather than a
//! document of noise.

mod extract;
mod structure;

use ecow::EcoString;
use log::{debug, info};
use serde::Deserialize;

use crate::ir::{Block, Document, Inline};
use crate::options::SalvageOptions;

/// A text extraction strategy over content-stream operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extractor {
    /// `(string) Tj`, and the `'` and `"` forms.
    ShowText,
    /// `[(str) -250 (ing)] TJ`, with kerning read as word spaces.
    ShowTextArray,
    /// `x y Td (string) Tj`.
    PositionedText,
}

/// The outcome of a salvage import.
#[derive(Debug, Clone, PartialEq)]
pub enum Salvage {
    Recovered(Document),
    /// No usable text was found; the notice explains this to the reader.
    NoExtractableContent { notice: EcoString },
}

impl Salvage {
    pub fn is_recovered(&self) -> bool {
        matches!(self, Salvage::Recovered(_))
    }

    /// The recovered document, or a document holding the notice paragraph.
    pub fn into_document(self) -> Document {
        match self {
            Salvage::Recovered(document) => document,
            Salvage::NoExtractableContent { notice } => {
                Document::new(vec![Block::Paragraph(vec![Inline::text(notice)])])
            }
        }
    }
}

/// Reconstructs a document from raw or extracted PDF text. Never fails.
pub fn reconstruct(raw: &str, options: &SalvageOptions) -> Salvage {
    let raw = truncate(raw, options.max_input_bytes);

    let text = if extract::looks_like_operators(raw) {
        debug!("extracting text from content-stream operators");
        extract::extract_text(raw.as_bytes(), &options.extractors)
    } else {
        raw.to_string()
    };
    let cleaned = clean(&text);

    if let Some(reason) = reject_reason(&cleaned, options) {
        info!("salvage found no extractable content: {reason}");
        return Salvage::NoExtractableContent {
            notice: options.locale.labels().no_content.into(),
        };
    }

    Salvage::Recovered(structure::structure(&cleaned))
}

/// Cuts the input at the largest char boundary within `limit` bytes.
fn truncate(raw: &str, limit: usize) -> &str {
    if raw.len() <= limit {
        return raw;
    }
    let mut end = limit;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    debug!("salvage input truncated from {} to {end} bytes", raw.len());
    &raw[..end]
}

/// Normalizes line endings, collapses horizontal whitespace and drops
/// control characters.
fn clean(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = text
        .lines()
        .map(|line| {
            line.split(|c: char| c.is_whitespace() || c.is_control())
                .filter(|word| !word.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    lines.join("\n").trim().to_string()
}

fn reject_reason(cleaned: &str, options: &SalvageOptions) -> Option<String> {
    let total = cleaned.chars().count();
    if total < options.min_chars {
        return Some(format!("{total} characters"));
    }
    let garbage = cleaned.chars().filter(|c| !is_whitelisted(*c)).count();
    let ratio = garbage as f64 / total as f64;
    if ratio > options.max_garbage_ratio {
        return Some(format!("{:.0}% unreadable characters", ratio * 100.0));
    }
    None
}

/// Letters and digits of Latin scripts, whitespace and common punctuation.
fn is_whitelisted(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || c.is_ascii_punctuation()
        || matches!(c, 'À'..='ÿ' if c != '×' && c != '÷')
        || matches!(c, '\u{0100}'..='\u{017F}')
        || "¡¿«»“”‘’–—…•·°ºª€".contains(c)
}

#[cfg(test)]
pub(crate) use extract::decode_literal;
#[cfg(test)]
pub(crate) use structure::{LineKind, classify};
