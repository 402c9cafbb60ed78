//! Text extraction from raw content-stream operators.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::bytes::Regex;

use super::Extractor;

/// Structural keywords that never carry document text.
const KEYWORDS: &[&str] = &[
    "obj",
    "endobj",
    "stream",
    "endstream",
    "xref",
    "trailer",
    "startxref",
    "%%EOF",
];

/// A `TJ` kerning adjustment at or below this inserts a word space.
const KERNING_SPACE: f64 = -200.0;

fn show_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)\(((?:[^()\\]|\\.)*)\)\s*(?:Tj|'|")"#).expect("show-text pattern is valid")
    })
}

fn show_text_array_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\[((?:[^\[\]\\]|\\.)*)\]\s*TJ").expect("show-text-array pattern is valid")
    })
}

fn positioned_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)(?:-?[\d.]+\s+){2}T[dD]\s*\(((?:[^()\\]|\\.)*)\)\s*Tj")
            .expect("positioned-text pattern is valid")
    })
}

fn array_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\(((?:[^()\\]|\\.)*)\)|(-?\d+(?:\.\d+)?|-?\.\d+)")
            .expect("array item pattern is valid")
    })
}

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:Td|TD|Tm|ET)\b|T\*").expect("line break pattern is valid"))
}

fn operators_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\)\s*Tj|\]\s*TJ").expect("operator pattern is valid"))
}

/// Whether the input looks like raw content-stream operators rather than
/// already extracted text.
pub(super) fn looks_like_operators(raw: &str) -> bool {
    raw.trim_start().starts_with("%PDF") || operators_re().is_match(raw.as_bytes())
}

/// A decoded string found at a byte range of the source.
#[derive(Debug, Clone, PartialEq)]
struct Fragment {
    start: usize,
    end: usize,
    text: String,
}

/// Runs every extractor over the input and joins the surviving fragments in
/// source order. Fragments found by more than one extractor are kept once.
pub(super) fn extract_text(raw: &[u8], extractors: &[Extractor]) -> String {
    let mut fragments: BTreeMap<usize, Fragment> = BTreeMap::new();
    for extractor in extractors {
        for fragment in run_extractor(*extractor, raw) {
            fragments.entry(fragment.start).or_insert(fragment);
        }
    }

    let mut out = String::new();
    let mut prev_end: Option<usize> = None;
    for fragment in fragments.into_values() {
        if !is_meaningful(&fragment.text) {
            continue;
        }
        if let Some(prev_end) = prev_end {
            let between = raw.get(prev_end..fragment.start).unwrap_or_default();
            if line_break_re().is_match(between) {
                out.push('\n');
            } else {
                out.push(' ');
            }
        }
        out.push_str(fragment.text.trim());
        prev_end = Some(fragment.end);
    }
    out
}

fn run_extractor(extractor: Extractor, raw: &[u8]) -> Vec<Fragment> {
    match extractor {
        Extractor::ShowText => string_fragments(show_text_re(), raw),
        Extractor::PositionedText => string_fragments(positioned_text_re(), raw),
        Extractor::ShowTextArray => show_text_array_re()
            .captures_iter(raw)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let array = caps.get(1)?;
                Some(Fragment {
                    start: whole.start(),
                    end: whole.end(),
                    text: decode_array(array.as_bytes()),
                })
            })
            .collect(),
    }
}

/// Fragments keyed by the start of their string literal, so that the same
/// literal found by different patterns deduplicates.
fn string_fragments(re: &Regex, raw: &[u8]) -> Vec<Fragment> {
    re.captures_iter(raw)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let literal = caps.get(1)?;
            Some(Fragment {
                start: literal.start(),
                end: whole.end(),
                text: decode_literal(literal.as_bytes()),
            })
        })
        .collect()
}

/// Concatenates the strings of a `TJ` array, turning large negative
/// kerning into spaces.
fn decode_array(array: &[u8]) -> String {
    let mut out = String::new();
    for caps in array_item_re().captures_iter(array) {
        if let Some(literal) = caps.get(1) {
            out.push_str(&decode_literal(literal.as_bytes()));
        } else if let Some(number) = caps.get(2)
            && let Some(value) = std::str::from_utf8(number.as_bytes())
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
            && value <= KERNING_SPACE
            && !out.ends_with(' ')
        {
            out.push(' ');
        }
    }
    out
}

/// Decodes the escapes of a string literal body.
pub(crate) fn decode_literal(body: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(body.len());
    let mut iter = body.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        if byte != b'\\' {
            bytes.push(byte);
            continue;
        }
        let Some(escaped) = iter.next() else {
            break;
        };
        match escaped {
            b'n' => bytes.push(b'\n'),
            b'r' => bytes.push(b'\r'),
            b't' => bytes.push(b'\t'),
            b'b' => bytes.push(0x08),
            b'f' => bytes.push(0x0c),
            b'(' | b')' | b'\\' => bytes.push(escaped),
            // Line continuation.
            b'\r' => {
                if iter.peek() == Some(&b'\n') {
                    iter.next();
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut code = u32::from(escaped - b'0');
                for _ in 0..2 {
                    match iter.peek() {
                        Some(&digit @ b'0'..=b'7') => {
                            code = code * 8 + u32::from(digit - b'0');
                            iter.next();
                        }
                        _ => break,
                    }
                }
                bytes.push((code & 0xff) as u8);
            }
            other => bytes.push(other),
        }
    }

    match String::from_utf8(bytes) {
        Ok(text) => text,
        // Single-byte encodings are read as Latin-1.
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Drops fragments that are only punctuation or whitespace, and structural
/// keywords.
fn is_meaningful(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || KEYWORDS.contains(&text) {
        return false;
    }
    text.chars()
        .any(|c| !(c.is_whitespace() || c.is_ascii_punctuation() || c.is_control()))
}
