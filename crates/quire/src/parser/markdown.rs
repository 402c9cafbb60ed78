//! Restricted Markdown importer.
//!
//! A one-pass line parser recognizing ATX headings, fenced code, `*`/`-`
//! bullets, `1.` numbered items and blank-line paragraph breaks. Inline
//! content supports backtick code, `**`/`__` bold, `*`/`_` italic and
//! `[text](url)` links. Everything else is kept as literal text.

use std::sync::OnceLock;

use ecow::EcoString;
use regex::Regex;

use crate::ir::{self, Block, Inline, ListItem, Mark, MarkSet};

/// Parses restricted Markdown. Never fails.
pub fn from_markdown(text: &str) -> ir::Document {
    let mut parser = MarkdownParser::default();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Ordered,
}

struct OpenList {
    kind: ListKind,
    start: u32,
    /// Text lines of each item.
    items: Vec<Vec<String>>,
}

struct OpenFence {
    marker: String,
    language: Option<EcoString>,
    lines: Vec<String>,
}

#[derive(Default)]
struct MarkdownParser {
    blocks: Vec<Block>,
    paragraph: Vec<String>,
    list: Option<OpenList>,
    fence: Option<OpenFence>,
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?[ \t]*$").expect("heading pattern is valid"))
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[*-][ \t]+(.*)$").expect("bullet pattern is valid"))
}

fn numbered_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d{1,9})\.[ \t]+(.*)$").expect("numbered pattern is valid"))
}

impl MarkdownParser {
    fn feed(&mut self, line: &str) {
        if let Some(fence) = &mut self.fence {
            let trimmed = line.trim();
            if trimmed.starts_with(fence.marker.as_str())
                && trimmed.chars().all(|c| Some(c) == fence.marker.chars().next())
            {
                self.close_fence();
            } else {
                fence.lines.push(line.to_owned());
            }
            return;
        }

        let trimmed = line.trim_start();
        if let Some(marker) = fence_marker(trimmed) {
            self.flush();
            let language = trimmed[marker.len()..].trim();
            self.fence = Some(OpenFence {
                marker: marker.to_owned(),
                language: (!language.is_empty()).then(|| language.into()),
                lines: Vec::new(),
            });
            return;
        }

        if trimmed.is_empty() {
            self.flush();
            return;
        }

        if let Some(caps) = heading_re().captures(line) {
            self.flush();
            let level = caps[1].len() as u8;
            let text = caps.get(2).map_or("", |m| m.as_str());
            let text = strip_closing_hashes(text);
            self.blocks.push(Block::Heading {
                level,
                content: parse_inline(text),
            });
            return;
        }

        if let Some(caps) = bullet_re().captures(line) {
            self.push_item(ListKind::Bullet, 1, &caps[1]);
            return;
        }

        if let Some(caps) = numbered_re().captures(line) {
            let number = caps[1].parse().unwrap_or(1);
            self.push_item(ListKind::Ordered, number, &caps[2]);
            return;
        }

        // Indented lines continue the current list item.
        if line.starts_with([' ', '\t'])
            && let Some(item) = self.list.as_mut().and_then(|list| list.items.last_mut())
        {
            item.push(trimmed.trim_end().to_owned());
            return;
        }

        self.flush_list();
        self.paragraph.push(line.trim().to_owned());
    }

    fn push_item(&mut self, kind: ListKind, number: u32, text: &str) {
        self.flush_paragraph();
        if self.list.as_ref().is_some_and(|list| list.kind != kind) {
            self.flush_list();
        }
        let list = self.list.get_or_insert_with(|| OpenList {
            kind,
            start: number,
            items: Vec::new(),
        });
        list.items.push(vec![text.trim().to_owned()]);
    }

    fn close_fence(&mut self) {
        if let Some(fence) = self.fence.take() {
            self.blocks.push(Block::CodeBlock {
                language: fence.language,
                code: fence.lines.join("\n").into(),
            });
        }
    }

    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.paragraph).join(" ");
        self.blocks.push(Block::Paragraph(parse_inline(&text)));
    }

    fn flush_list(&mut self) {
        let Some(list) = self.list.take() else {
            return;
        };
        let items = list
            .items
            .into_iter()
            .map(|lines| {
                let text = lines.join(" ");
                let content = if text.is_empty() {
                    Vec::new()
                } else {
                    vec![Block::Paragraph(parse_inline(&text))]
                };
                ListItem::new(content)
            })
            .collect();
        self.blocks.push(match list.kind {
            ListKind::Bullet => Block::BulletList(items),
            ListKind::Ordered => Block::OrderedList {
                start: list.start,
                items,
            },
        });
    }

    fn flush(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }

    fn finish(mut self) -> ir::Document {
        // An unterminated fence runs to the end of the input.
        self.close_fence();
        self.flush();
        ir::Document::new(self.blocks).normalize()
    }
}

fn fence_marker(line: &str) -> Option<&str> {
    for ch in ['`', '~'] {
        let len = line.chars().take_while(|&c| c == ch).count();
        if len >= 3 {
            let marker = &line[..len];
            // A backtick fence's info string cannot contain backticks.
            if ch == '`' && line[len..].contains('`') {
                return None;
            }
            return Some(marker);
        }
    }
    None
}

fn strip_closing_hashes(text: &str) -> &str {
    let stripped = text.trim_end_matches('#');
    if stripped.len() != text.len() && (stripped.is_empty() || stripped.ends_with([' ', '\t'])) {
        stripped.trim_end()
    } else {
        text
    }
}

/// Parses inline Markdown into text runs.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    InlineScanner {
        text,
        out: &mut out,
    }
    .scan(0, text.len(), &MarkSet::new());
    ir::normalize_inlines(out)
}

struct InlineScanner<'a> {
    text: &'a str,
    out: &'a mut Vec<Inline>,
}

impl InlineScanner<'_> {
    fn scan(&mut self, start: usize, end: usize, marks: &MarkSet) {
        let text = self.text;
        let mut buf = String::new();
        let mut pos = start;

        while pos < end {
            let rest = &text[pos..end];
            let Some(ch) = rest.chars().next() else {
                break;
            };

            match ch {
                '\\' => {
                    if let Some(next) = rest[1..].chars().next()
                        && next.is_ascii_punctuation()
                    {
                        buf.push(next);
                        pos += 1 + next.len_utf8();
                        continue;
                    }
                }
                '`' => {
                    let ticks = rest.chars().take_while(|&c| c == '`').count();
                    if let Some(close) = find_code_close(&rest[ticks..], ticks) {
                        self.flush(&mut buf, marks);
                        let code = &rest[ticks..ticks + close];
                        let code = match code.strip_prefix(' ').and_then(|c| c.strip_suffix(' ')) {
                            Some(inner) if !inner.trim().is_empty() => inner,
                            _ => code,
                        };
                        self.push(code, &marks.clone().with(Mark::Code));
                        pos += ticks + close + ticks;
                        continue;
                    }
                    buf.push_str(&rest[..ticks]);
                    pos += ticks;
                    continue;
                }
                '!' if rest[1..].starts_with('[') => {
                    buf.push_str("![");
                    pos += 2;
                    continue;
                }
                '[' => {
                    if let Some((label_end, href_start, href_end)) = find_link(rest) {
                        self.flush(&mut buf, marks);
                        let href = rest[href_start..href_end].trim();
                        let link = marks.clone().with(Mark::Link {
                            href: href.into(),
                            target: None,
                        });
                        self.scan(pos + 1, pos + label_end, &link);
                        pos += href_end + 1;
                        continue;
                    }
                }
                '*' | '_' => {
                    if ch == '_' && text[..pos].chars().next_back().is_some_and(char::is_alphanumeric) {
                        let run = rest.chars().take_while(|&c| c == '_').count();
                        buf.push_str(&rest[..run]);
                        pos += run;
                        continue;
                    }

                    let double = rest[1..].starts_with(ch);
                    let width = if double { 2 } else { 1 };
                    if let Some(close) = find_emphasis_close(rest, ch, width) {
                        self.flush(&mut buf, marks);
                        let mark = if double { Mark::Bold } else { Mark::Italic };
                        self.scan(pos + width, pos + close, &marks.clone().with(mark));
                        pos += close + width;
                        continue;
                    }
                    let run = rest.chars().take_while(|&c| c == ch).count();
                    buf.push_str(&rest[..run]);
                    pos += run;
                    continue;
                }
                _ => {}
            }

            buf.push(ch);
            pos += ch.len_utf8();
        }

        self.flush(&mut buf, marks);
    }

    fn flush(&mut self, buf: &mut String, marks: &MarkSet) {
        if !buf.is_empty() {
            self.push(&std::mem::take(buf), marks);
        }
    }

    fn push(&mut self, value: &str, marks: &MarkSet) {
        self.out.push(Inline::Text(ir::Text {
            value: value.into(),
            marks: marks.clone(),
        }));
    }
}

/// Offset of a closing backtick run of exactly `ticks` backticks.
fn find_code_close(rest: &str, ticks: usize) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'`' {
            let run = bytes[idx..].iter().take_while(|&&b| b == b'`').count();
            if run == ticks && idx > 0 {
                return Some(idx);
            }
            idx += run;
        } else {
            idx += 1;
        }
    }
    None
}

/// Locates `[label](href)` at the start of `rest`, returning the offsets of
/// the closing bracket and of the href bounds.
fn find_link(rest: &str) -> Option<(usize, usize, usize)> {
    let mut depth = 0usize;
    let mut label_end = None;
    let mut chars = rest.char_indices().skip(1);
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '[' => depth += 1,
            ']' if depth == 0 => {
                label_end = Some(idx);
                break;
            }
            ']' => depth -= 1,
            _ => {}
        }
    }
    let label_end = label_end?;
    if label_end == 1 || !rest[label_end + 1..].starts_with('(') {
        return None;
    }
    let href_start = label_end + 2;
    let href_len = rest[href_start..].find([')', '\n'])?;
    let href_end = href_start + href_len;
    if !rest[href_end..].starts_with(')') || rest[href_start..href_end].trim().is_empty() {
        return None;
    }
    Some((label_end, href_start, href_end))
}

/// Offset of the delimiter closing an emphasis opened at the start of `rest`.
fn find_emphasis_close(rest: &str, ch: char, width: usize) -> Option<usize> {
    let body = &rest[width..];
    if body.starts_with(char::is_whitespace) {
        return None;
    }

    let bytes = rest.as_bytes();
    let delim = ch as u8;
    let mut idx = width;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\\' => idx += 2,
            b'`' => {
                let ticks = bytes[idx..].iter().take_while(|&&b| b == b'`').count();
                match find_code_close(&rest[idx + ticks..], ticks) {
                    Some(close) => idx += ticks + close + ticks,
                    None => idx += ticks,
                }
            }
            b if b == delim => {
                let run = bytes[idx..].iter().take_while(|&&b| b == delim).count();
                let after = rest[idx + run..].chars().next();
                let before = rest[..idx].chars().next_back();
                let closes = idx > width
                    && before.is_some_and(|c| !c.is_whitespace())
                    && (ch != '_' || !after.is_some_and(char::is_alphanumeric));
                if closes && run == width {
                    return Some(idx);
                }
                if closes && width == 1 && run == 3 {
                    return Some(idx + 2);
                }
                if closes && width == 2 && run >= 3 {
                    return Some(idx + run - 2);
                }
                idx += run;
            }
            _ => idx += 1,
        }
    }
    None
}
