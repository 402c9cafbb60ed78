//! Canonical markup renderer.

use ecow::EcoString;

use crate::Result;
use crate::common::FormatWriter;
use crate::ir::{self, Block, Details, Inline, ListItem, Mark, Table, Video};

/// Renders a document as canonical editor markup.
pub fn render(document: &ir::Document) -> String {
    let mut renderer = IrHtmlRenderer::new();
    renderer.write_blocks(&document.blocks);
    renderer.into_string()
}

/// Renders a document as a standalone styled page.
pub fn render_document(document: &ir::Document, title: &str) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    out.push_str("<title>");
    out.push_str(&html_escape::encode_text(title));
    out.push_str("</title>\n<style>\n");
    out.push_str(DOCUMENT_CSS);
    out.push_str("</style>\n</head>\n<body>\n<article class=\"document\">\n");
    out.push_str(&render(document));
    out.push_str("</article>\n</body>\n</html>\n");
    out
}

/// Renders inline content alone, used where markup is embedded in other
/// formats.
pub(crate) fn render_inlines(inlines: &[Inline]) -> String {
    let mut renderer = IrHtmlRenderer::new();
    renderer.write_inlines(inlines);
    renderer.into_string()
}

/// Renders a table alone.
pub(crate) fn render_table(table: &Table) -> String {
    let mut renderer = IrHtmlRenderer::new();
    renderer.write_table(table);
    renderer.into_string()
}

const DOCUMENT_CSS: &str = "\
body { margin: 0; background: #f5f5f5; color: #1f2328; }
.document { max-width: 800px; margin: 2rem auto; padding: 3rem; background: #fff;
  font-family: Georgia, 'Times New Roman', serif; font-size: 12pt; line-height: 1.6; }
h1, h2, h3, h4, h5, h6 { line-height: 1.25; margin: 1.4em 0 0.6em; }
blockquote { margin: 1em 0; padding-left: 1em; border-left: 4px solid #d0d7de; color: #57606a; }
pre { background: #f6f8fa; padding: 1em; overflow-x: auto; border-radius: 4px; }
code { font-family: 'Courier New', monospace; font-size: 0.9em; }
table { border-collapse: collapse; width: 100%; margin: 1em 0; }
th, td { border: 1px solid #d0d7de; padding: 0.4em 0.6em; text-align: left; vertical-align: top; }
th { background: #f6f8fa; }
img { max-width: 100%; }
mark { background: #fef08a; }
mark[data-color=\"red\"] { background: #fecaca; }
mark[data-color=\"blue\"] { background: #bfdbfe; }
mark[data-color=\"green\"] { background: #bbf7d0; }
ul[data-type=\"taskList\"] { list-style: none; padding-left: 0.5em; }
li[data-type=\"taskItem\"][data-checked=\"true\"]::before { content: '\\2611  '; }
li[data-type=\"taskItem\"][data-checked=\"false\"]::before { content: '\\2610  '; }
li[data-type=\"taskItem\"] > p { display: inline; }
div[data-type=\"video-embed\"] iframe { width: 100%; aspect-ratio: 16 / 9; border: 0; }
div[data-type=\"drawing-canvas\"] { border: 1px dashed #d0d7de; min-height: 2em; }
details { border: 1px solid #d0d7de; border-radius: 4px; padding: 0.5em 1em; margin: 1em 0; }
summary { font-weight: bold; cursor: pointer; }
";

/// HTML renderer over the semantic IR.
struct IrHtmlRenderer {
    buffer: String,
    tag_opened: bool,
}

impl IrHtmlRenderer {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            tag_opened: false,
        }
    }

    fn into_string(mut self) -> String {
        self.ensure_tag_closed();
        self.buffer
    }

    fn ensure_tag_closed(&mut self) {
        if self.tag_opened {
            self.buffer.push('>');
            self.tag_opened = false;
        }
    }

    fn start_tag(&mut self, tag_name: &str) {
        self.ensure_tag_closed();
        self.buffer.push('<');
        self.buffer.push_str(tag_name);
        self.tag_opened = true;
    }

    fn attribute(&mut self, key: &str, value: &str) {
        debug_assert!(self.tag_opened, "attribute written outside a start tag");
        self.buffer.push(' ');
        self.buffer.push_str(key);
        self.buffer.push_str("=\"");
        self.buffer
            .push_str(html_escape::encode_double_quoted_attribute(value).as_ref());
        self.buffer.push('"');
    }

    fn finish_tag(&mut self) {
        self.ensure_tag_closed();
    }

    fn finish_self_closing_tag(&mut self) {
        self.buffer.push_str(" />");
        self.tag_opened = false;
    }

    fn end_tag(&mut self, tag_name: &str) {
        self.ensure_tag_closed();
        self.buffer.push_str("</");
        self.buffer.push_str(tag_name);
        self.buffer.push('>');
    }

    fn open(&mut self, tag_name: &str) {
        self.start_tag(tag_name);
        self.finish_tag();
    }

    fn text(&mut self, text: &str) {
        self.ensure_tag_closed();
        self.buffer.push_str(html_escape::encode_text(text).as_ref());
    }

    fn newline(&mut self) {
        self.ensure_tag_closed();
        self.buffer.push('\n');
    }

    fn write_blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.write_block(block);
        }
    }

    fn write_block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(inlines) => {
                self.open("p");
                self.write_inlines(inlines);
                self.end_tag("p");
            }
            Block::Heading { level, content } => {
                let tag_name = format!("h{}", (*level).clamp(1, 6));
                self.open(&tag_name);
                self.write_inlines(content);
                self.end_tag(&tag_name);
            }
            Block::BulletList(items) => {
                self.open("ul");
                self.newline();
                self.write_list_items(items, false);
                self.end_tag("ul");
            }
            Block::OrderedList { start, items } => {
                self.start_tag("ol");
                if *start != 1 {
                    self.attribute("start", &start.to_string());
                }
                self.finish_tag();
                self.newline();
                self.write_list_items(items, false);
                self.end_tag("ol");
            }
            Block::TaskList(items) => {
                self.start_tag("ul");
                self.attribute("data-type", "taskList");
                self.finish_tag();
                self.newline();
                self.write_list_items(items, true);
                self.end_tag("ul");
            }
            Block::Blockquote(content) => {
                self.open("blockquote");
                self.newline();
                self.write_blocks(content);
                self.end_tag("blockquote");
            }
            Block::CodeBlock { language, code } => {
                self.open("pre");
                self.start_tag("code");
                if let Some(lang) = language
                    && !lang.trim().is_empty()
                {
                    self.attribute("class", &format!("language-{}", lang.trim()));
                }
                self.finish_tag();
                self.text(code);
                self.end_tag("code");
                self.end_tag("pre");
            }
            Block::Table(table) => {
                self.write_table(table);
                return;
            }
            Block::HorizontalRule => {
                self.start_tag("hr");
                self.finish_self_closing_tag();
            }
            Block::Image { src, alt, title } => {
                self.start_tag("img");
                self.attribute("src", src);
                self.attribute("alt", alt);
                if let Some(title) = title {
                    self.attribute("title", title);
                }
                self.finish_self_closing_tag();
            }
            Block::VideoEmbed(video) => self.write_video(video),
            Block::Canvas { strokes } => {
                let payload = serde_json::to_string(strokes).unwrap_or_else(|_| "[]".to_owned());
                self.start_tag("div");
                self.attribute("data-type", "drawing-canvas");
                self.attribute("data-strokes", &payload);
                self.finish_tag();
                self.end_tag("div");
            }
            Block::Details(details) => self.write_details(details),
            Block::MathBlock { latex } => {
                self.start_tag("div");
                self.attribute("data-type", "block-math");
                self.attribute("data-latex", latex);
                self.finish_tag();
                self.end_tag("div");
            }
        }
        self.newline();
    }

    fn write_list_items(&mut self, items: &[ListItem], task: bool) {
        for item in items {
            self.start_tag("li");
            if task {
                self.attribute("data-type", "taskItem");
                let checked = item.checked.unwrap_or(false);
                self.attribute("data-checked", if checked { "true" } else { "false" });
            }
            self.finish_tag();
            self.write_blocks(&item.content);
            self.end_tag("li");
            self.newline();
        }
    }

    fn write_table(&mut self, table: &Table) {
        self.open("table");
        self.newline();
        self.open("tbody");
        self.newline();
        for row in &table.rows {
            self.open("tr");
            self.newline();
            for cell in &row.cells {
                let tag = if cell.header { "th" } else { "td" };
                self.start_tag(tag);
                if cell.col_span() > 1 {
                    self.attribute("colspan", &cell.col_span().to_string());
                }
                if cell.row_span() > 1 {
                    self.attribute("rowspan", &cell.row_span().to_string());
                }
                self.finish_tag();
                self.write_blocks(&cell.content);
                self.end_tag(tag);
                self.newline();
            }
            self.end_tag("tr");
            self.newline();
        }
        self.end_tag("tbody");
        self.newline();
        self.end_tag("table");
        self.newline();
    }

    fn write_video(&mut self, video: &Video) {
        self.start_tag("div");
        self.attribute("data-type", "video-embed");
        self.attribute("data-provider", video.provider.as_str());
        self.attribute("data-id", &video.id);
        self.finish_tag();
        self.start_tag("iframe");
        self.attribute("src", &video.embed_url());
        self.attribute("frameborder", "0");
        self.attribute("allowfullscreen", "true");
        self.finish_tag();
        self.end_tag("iframe");
        self.end_tag("div");
    }

    fn write_details(&mut self, details: &Details) {
        self.start_tag("details");
        if details.open {
            self.attribute("open", "");
        }
        self.finish_tag();
        self.newline();
        self.open("summary");
        self.write_inlines(&details.summary);
        self.end_tag("summary");
        self.newline();
        self.start_tag("div");
        self.attribute("data-type", "detailsContent");
        self.finish_tag();
        self.newline();
        self.write_blocks(&details.content);
        self.end_tag("div");
        self.newline();
        self.end_tag("details");
    }

    fn write_inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.write_inline(inline);
        }
    }

    fn write_inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(text) => {
                for mark in &text.marks {
                    self.open_mark(mark);
                }
                self.text(&text.value);
                for mark in text.marks.iter().rev() {
                    self.close_mark(mark);
                }
            }
            Inline::Mention { kind, id, label } => {
                self.start_tag("span");
                self.attribute("data-type", "mention");
                self.attribute("data-kind", kind.as_str());
                self.attribute("data-id", id);
                self.attribute("data-label", label);
                self.finish_tag();
                let mut shown = EcoString::from(kind.sigil());
                shown.push_str(label);
                self.text(&shown);
                self.end_tag("span");
            }
            Inline::Emoji { shortcode } => {
                self.start_tag("span");
                self.attribute("data-type", "emoji");
                self.attribute("data-name", shortcode);
                self.finish_tag();
                self.text(&format!(":{shortcode}:"));
                self.end_tag("span");
            }
            Inline::MathInline { latex } => {
                self.start_tag("span");
                self.attribute("data-type", "inline-math");
                self.attribute("data-latex", latex);
                self.finish_tag();
                self.text(latex);
                self.end_tag("span");
            }
            Inline::HardBreak => {
                self.start_tag("br");
                self.finish_self_closing_tag();
            }
        }
    }

    fn open_mark(&mut self, mark: &Mark) {
        match mark {
            Mark::Bold => self.open("strong"),
            Mark::Italic => self.open("em"),
            Mark::Underline => self.open("u"),
            Mark::Strike => self.open("s"),
            Mark::Code => self.open("code"),
            Mark::Link { href, target } => {
                self.start_tag("a");
                self.attribute("href", href);
                if let Some(target) = target {
                    self.attribute("target", target);
                }
                self.finish_tag();
            }
            Mark::Highlight { color } => {
                self.start_tag("mark");
                if let Some(color) = color {
                    self.attribute("data-color", color);
                }
                self.finish_tag();
            }
            Mark::TextColor { hex } => {
                self.start_tag("span");
                self.attribute("style", &format!("color: {hex}"));
                self.finish_tag();
            }
            Mark::FontFamily { name } => {
                self.start_tag("span");
                self.attribute("style", &format!("font-family: {name}"));
                self.finish_tag();
            }
            Mark::Subscript => self.open("sub"),
            Mark::Superscript => self.open("sup"),
        }
    }

    fn close_mark(&mut self, mark: &Mark) {
        let tag = match mark {
            Mark::Bold => "strong",
            Mark::Italic => "em",
            Mark::Underline => "u",
            Mark::Strike => "s",
            Mark::Code => "code",
            Mark::Link { .. } => "a",
            Mark::Highlight { .. } => "mark",
            Mark::TextColor { .. } | Mark::FontFamily { .. } => "span",
            Mark::Subscript => "sub",
            Mark::Superscript => "sup",
        };
        self.end_tag(tag);
    }
}

/// Canonical markup writer.
#[derive(Default)]
pub struct HtmlWriter {
    /// Title of the page shell; `None` writes bare markup.
    pub title: Option<EcoString>,
}

impl HtmlWriter {
    pub fn new(title: Option<EcoString>) -> Self {
        Self { title }
    }
}

impl FormatWriter for HtmlWriter {
    fn write_eco(&mut self, document: &ir::Document, output: &mut EcoString) -> Result<()> {
        match &self.title {
            Some(title) => output.push_str(&render_document(document, title)),
            None => output.push_str(&render(document)),
        }
        Ok(())
    }

    fn write_vec(&mut self, document: &ir::Document) -> Result<Vec<u8>> {
        let mut output = EcoString::new();
        self.write_eco(document, &mut output)?;
        Ok(output.as_bytes().to_vec())
    }
}
