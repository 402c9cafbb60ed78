use ecow::EcoString;

use crate::ir::{self, Block, Details, Inline, Mark, MarkSet, VideoProvider};
use crate::options::MarkdownOptions;
use crate::writer::html;

use super::escape::{
    code_fence_block, escape_line_starts, escape_markdown_text, indent_multiline,
    render_inline_code,
};

pub(super) struct IrMarkdownEmitter<'a> {
    pub(super) options: &'a MarkdownOptions,
}

/// Marks written as paired delimiters, in nesting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delim {
    Bold,
    Italic,
    Underline,
    Strike,
    Highlight,
    Subscript,
    Superscript,
}

impl Delim {
    fn of(mark: &Mark) -> Option<Self> {
        Some(match mark {
            Mark::Bold => Delim::Bold,
            Mark::Italic => Delim::Italic,
            Mark::Underline => Delim::Underline,
            Mark::Strike => Delim::Strike,
            Mark::Highlight { .. } => Delim::Highlight,
            Mark::Subscript => Delim::Subscript,
            Mark::Superscript => Delim::Superscript,
            Mark::Code
            | Mark::Link { .. }
            | Mark::TextColor { .. }
            | Mark::FontFamily { .. } => return None,
        })
    }

    fn open(self) -> &'static str {
        match self {
            Delim::Bold => "**",
            Delim::Italic => "*",
            Delim::Underline => "<u>",
            Delim::Strike => "~~",
            Delim::Highlight => "==",
            Delim::Subscript => "<sub>",
            Delim::Superscript => "<sup>",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Delim::Underline => "</u>",
            Delim::Subscript => "</sub>",
            Delim::Superscript => "</sup>",
            other => other.open(),
        }
    }
}

impl IrMarkdownEmitter<'_> {
    /// Renders the document without a trailing newline.
    pub(super) fn write_document(&self, document: &ir::Document) -> String {
        self.render_blocks(&document.blocks, "\n\n")
    }

    pub(super) fn render_blocks(&self, blocks: &[Block], separator: &str) -> String {
        blocks
            .iter()
            .map(|block| self.render_block(block, 0))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub(super) fn render_block(&self, block: &Block, indent: usize) -> String {
        let out = match block {
            Block::Paragraph(inlines) => {
                let mut inlines = inlines.as_slice();
                while let Some(Inline::HardBreak) = inlines.last() {
                    inlines = &inlines[..inlines.len() - 1];
                }
                escape_line_starts(
                    &self.render_inlines(inlines),
                    self.options.escape_special_chars,
                )
            }
            Block::Heading { level, content } => {
                let content = self.render_inlines(&flatten_breaks(content));
                format!("{} {}", "#".repeat((*level).clamp(1, 6) as usize), content)
            }
            Block::HorizontalRule => "---".to_string(),
            Block::Blockquote(content) => {
                let inner = self.render_blocks(content, "\n\n");
                inner
                    .lines()
                    .map(|line| {
                        if line.is_empty() {
                            ">".to_string()
                        } else {
                            format!("> {line}")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Block::BulletList(items) => self.render_bullet_list(items),
            Block::OrderedList { items, .. } => self.render_ordered_list(items),
            Block::TaskList(items) => self.render_task_list(items),
            Block::Table(table) => self.render_table(table),
            Block::CodeBlock { language, code } => code_fence_block(language.as_deref(), code),
            Block::Image { src, alt, title } => {
                let alt = escape_markdown_text(alt, self.options.escape_special_chars);
                match title {
                    Some(title) => format!("![{alt}]({src} \"{}\")", title.replace("\"", "\\\"")),
                    None => format!("![{alt}]({src})"),
                }
            }
            Block::VideoEmbed(video) => match (video.provider, video.thumbnail_url()) {
                (VideoProvider::Youtube, Some(thumbnail)) => {
                    format!("[![Video]({thumbnail})]({})", video.url())
                }
                _ => format!("[Video: {}]", video.url()),
            },
            Block::Canvas { strokes } => format!("[Drawing: {} strokes]", strokes.len()),
            Block::Details(details) => self.render_details(details),
            Block::MathBlock { latex } => format!("$$\n{}\n$$", latex.trim_matches('\n')),
        };
        indent_multiline(&out, indent)
    }

    /// Details have no Markdown form and pass through as raw tags.
    fn render_details(&self, details: &Details) -> String {
        let mut out = String::from(if details.open {
            "<details open>\n"
        } else {
            "<details>\n"
        });
        out.push_str("<summary>");
        out.push_str(&html::render_inlines(&details.summary));
        out.push_str("</summary>\n\n");
        let content = self.render_blocks(&details.content, "\n\n");
        if !content.is_empty() {
            out.push_str(&content);
            out.push_str("\n\n");
        }
        out.push_str("</details>");
        out
    }

    pub(super) fn render_inlines(&self, inlines: &[Inline]) -> String {
        let mut out = String::new();
        let mut idx = 0;
        while idx < inlines.len() {
            let href = link_of(&inlines[idx]);
            let end = inlines[idx..]
                .iter()
                .position(|inline| link_of(inline) != href)
                .map_or(inlines.len(), |len| idx + len);
            let group = &inlines[idx..end];
            match href {
                Some(href) => {
                    let label = self.render_styled(group.iter().map(strip_link));
                    out.push('[');
                    out.push_str(&label);
                    out.push_str("](");
                    out.push_str(href);
                    out.push(')');
                }
                None => out.push_str(&self.render_styled(group.iter().cloned())),
            }
            idx = end;
        }
        out
    }

    /// Renders inline content with a delimiter stack, so consecutive runs
    /// sharing a mark share one delimiter pair.
    fn render_styled(&self, inlines: impl Iterator<Item = Inline>) -> String {
        let mut out = String::new();
        let mut stack: Vec<Delim> = Vec::new();
        let mut pending_ws = String::new();

        for inline in inlines {
            let Inline::Text(text) = inline else {
                out.push_str(&pending_ws);
                pending_ws.clear();
                out.push_str(&self.render_atom(&inline));
                continue;
            };

            let value = text.value.as_str();
            let core = value.trim_matches(char::is_whitespace);
            if core.is_empty() {
                pending_ws.push_str(value);
                continue;
            }
            let leading = &value[..value.len() - value.trim_start().len()];
            let trailing = &value[value.trim_end().len()..];

            let wanted: Vec<Delim> = text.marks.iter().filter_map(Delim::of).collect();
            let common = stack
                .iter()
                .zip(&wanted)
                .take_while(|(open, want)| open == want)
                .count();
            while stack.len() > common {
                if let Some(delim) = stack.pop() {
                    out.push_str(delim.close());
                }
            }
            out.push_str(&pending_ws);
            pending_ws.clear();
            out.push_str(leading);
            for delim in &wanted[common..] {
                out.push_str(delim.open());
                stack.push(*delim);
            }
            out.push_str(&self.render_text_core(core, &text.marks));
            pending_ws.push_str(trailing);
        }

        while let Some(delim) = stack.pop() {
            out.push_str(delim.close());
        }
        out.push_str(&pending_ws);
        out
    }

    fn render_text_core(&self, text: &str, marks: &MarkSet) -> String {
        if marks.contains(&Mark::Code) {
            render_inline_code(text)
        } else {
            escape_markdown_text(text, self.options.escape_special_chars)
        }
    }

    fn render_atom(&self, inline: &Inline) -> String {
        match inline {
            Inline::Mention { kind, label, .. } => format!("{}{label}", kind.sigil()),
            Inline::Emoji { shortcode } => format!(":{shortcode}:"),
            Inline::MathInline { latex } => format!("${latex}$"),
            Inline::HardBreak => "\\\n".to_string(),
            Inline::Text(text) => escape_markdown_text(&text.value, self.options.escape_special_chars),
        }
    }
}

fn link_of(inline: &Inline) -> Option<&EcoString> {
    match inline {
        Inline::Text(text) => text.marks.link(),
        _ => None,
    }
}

fn strip_link(inline: &Inline) -> Inline {
    match inline {
        Inline::Text(text) => Inline::Text(ir::Text {
            value: text.value.clone(),
            marks: text
                .marks
                .iter()
                .filter(|mark| !matches!(mark, Mark::Link { .. }))
                .cloned()
                .collect(),
        }),
        other => other.clone(),
    }
}

/// Replaces hard breaks with spaces, for single-line constructs.
pub(super) fn flatten_breaks(inlines: &[Inline]) -> Vec<Inline> {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::HardBreak => Inline::text(" "),
            other => other.clone(),
        })
        .collect()
}
