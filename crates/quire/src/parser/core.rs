//! Markup parser core, containing the main structure and the element
//! dispatch.

use ecow::EcoString;
use log::debug;

use crate::attributes::{AttrsParser, HeadingAttr, quire_attr};
use crate::ir::{self, Block, Inline, MarkSet, clamp_heading_level};
use crate::tags::TagKind;

use super::html::{MarkupElement, MarkupNode};
use super::list::ListParser;
use super::media::MediaParser;
use super::table::TableParser;

/// Markup to IR parser implementation.
#[derive(Default)]
pub struct MarkupParser {
    pub blocks: Vec<Block>,
    pub inline_buffer: Vec<Inline>,
    /// Marks applied to text met at the current position.
    pub marks: MarkSet,
    /// A collapsed line break is waiting to be emitted as a space.
    pending_space: bool,
}

impl MarkupParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses lowered markup into a normalized document.
    pub fn parse_ir(mut self, nodes: &[MarkupNode]) -> ir::Document {
        self.convert_nodes(nodes);
        self.flush_inline_buffer();
        ir::Document::new(self.blocks).normalize()
    }

    pub fn convert_element(&mut self, element: &MarkupElement) {
        match element.kind {
            TagKind::Html | TagKind::Body | TagKind::Label | TagKind::Button => {
                self.convert_children(element)
            }

            TagKind::Unknown => {
                debug!("markup: flattening unknown tag <{}>", element.tag);
                self.convert_children(element)
            }

            TagKind::P => {
                self.flush_inline_buffer();
                let (inline, blocks) = self.capture_children(element);
                if blocks.is_empty() {
                    self.blocks.push(Block::Paragraph(inline));
                } else {
                    self.blocks.extend(blocks);
                    self.push_implicit_paragraph(inline);
                }
            }

            TagKind::H1
            | TagKind::H2
            | TagKind::H3
            | TagKind::H4
            | TagKind::H5
            | TagKind::H6 => {
                self.flush_inline_buffer();
                let attrs = HeadingAttr::parse(&element.attrs);
                let level = match attrs.level {
                    Some(level) => clamp_heading_level(level),
                    None => element.kind.heading_level().unwrap_or(1),
                };
                let content = self.collect_inline(element);
                self.blocks.push(Block::Heading { level, content });
            }

            TagKind::Ul | TagKind::Ol => {
                self.flush_inline_buffer();
                let list = ListParser::convert_list(self, element);
                self.blocks.push(list);
            }

            TagKind::Li => {
                self.flush_inline_buffer();
                ListParser::convert_orphan_item(self, element);
            }

            TagKind::Blockquote => {
                self.flush_inline_buffer();
                let content = self.blocks_of(element);
                self.blocks.push(Block::Blockquote(content));
            }

            TagKind::Pre => {
                self.flush_inline_buffer();
                self.blocks.push(MediaParser::convert_pre(element));
            }

            TagKind::Table => {
                self.flush_inline_buffer();
                if let Some(table) = TableParser::convert_table(self, element) {
                    self.blocks.push(table);
                }
            }

            TagKind::Hr => {
                self.flush_inline_buffer();
                self.blocks.push(Block::HorizontalRule);
            }

            TagKind::Img => {
                self.flush_inline_buffer();
                self.blocks.push(MediaParser::convert_image(element));
            }

            TagKind::Iframe => {
                self.flush_inline_buffer();
                self.blocks.push(MediaParser::convert_iframe(element));
            }

            TagKind::Details => {
                self.flush_inline_buffer();
                let details = self.convert_details(element);
                self.blocks.push(details);
            }

            TagKind::Div => self.convert_div(element),

            TagKind::Section
            | TagKind::Article
            | TagKind::Header
            | TagKind::Footer
            | TagKind::Main
            | TagKind::Aside
            | TagKind::Nav
            | TagKind::Figure
            | TagKind::Figcaption
            | TagKind::Caption
            | TagKind::Summary
            | TagKind::Thead
            | TagKind::Tbody
            | TagKind::Tfoot
            | TagKind::Tr
            | TagKind::Th
            | TagKind::Td => self.convert_block_container(element),

            TagKind::Br => self.push_hard_break(),

            TagKind::Input => {}

            TagKind::Span
            | TagKind::Strong
            | TagKind::B
            | TagKind::Em
            | TagKind::I
            | TagKind::U
            | TagKind::Ins
            | TagKind::S
            | TagKind::Strike
            | TagKind::Del
            | TagKind::Code
            | TagKind::A
            | TagKind::Mark
            | TagKind::Sub
            | TagKind::Sup
            | TagKind::Font => self.convert_inline_element(element),

            TagKind::Head
            | TagKind::Title
            | TagKind::Meta
            | TagKind::Script
            | TagKind::Style
            | TagKind::Template => debug!("markup: skipping <{}>", element.kind.name()),
        }
    }

    fn convert_div(&mut self, element: &MarkupElement) {
        let attrs = &element.attrs;
        match attrs.data_type() {
            Some("video-embed") => {
                self.flush_inline_buffer();
                self.blocks.push(MediaParser::convert_video_embed(element));
            }
            Some("drawing-canvas") => {
                self.flush_inline_buffer();
                self.blocks.push(MediaParser::convert_canvas(element));
            }
            Some("block-math") => {
                self.flush_inline_buffer();
                self.blocks.push(MediaParser::convert_block_math(element));
            }
            Some("details") => {
                self.flush_inline_buffer();
                let details = self.convert_details(element);
                self.blocks.push(details);
            }
            _ if attrs.has(quire_attr::data_youtube_video) => {
                self.flush_inline_buffer();
                self.blocks.push(MediaParser::convert_video_embed(element));
            }
            _ => self.convert_block_container(element),
        }
    }

    /// Converts a generic block container in place, keeping its inline content
    /// apart from the surrounding paragraphs.
    fn convert_block_container(&mut self, element: &MarkupElement) {
        self.flush_inline_buffer();
        self.convert_children(element);
        self.flush_inline_buffer();
    }

    pub fn convert_children(&mut self, element: &MarkupElement) {
        self.convert_nodes(&element.children);
    }

    pub fn convert_nodes(&mut self, nodes: &[MarkupNode]) {
        for node in nodes {
            match node {
                MarkupNode::Text(text) => self.push_text(text),
                MarkupNode::Element(element) => self.convert_element(element),
            }
        }
    }

    /// Convert element children while capturing both inline and block outputs.
    pub fn capture_children(&mut self, element: &MarkupElement) -> (Vec<Inline>, Vec<Block>) {
        self.capture_nodes(&element.children)
    }

    pub fn capture_nodes(&mut self, nodes: &[MarkupNode]) -> (Vec<Inline>, Vec<Block>) {
        let prev_buffer = std::mem::take(&mut self.inline_buffer);
        let prev_blocks = std::mem::take(&mut self.blocks);
        let prev_space = std::mem::replace(&mut self.pending_space, false);

        self.convert_nodes(nodes);

        let inline = std::mem::take(&mut self.inline_buffer);
        let blocks = std::mem::take(&mut self.blocks);

        self.inline_buffer = prev_buffer;
        self.blocks = prev_blocks;
        self.pending_space = prev_space;

        (inline, blocks)
    }

    /// Converts the children of a block slot (list item, cell, quote) into
    /// blocks. Loose inline content is wrapped in a paragraph.
    pub fn blocks_of(&mut self, element: &MarkupElement) -> Vec<Block> {
        self.blocks_of_nodes(&element.children)
    }

    pub fn blocks_of_nodes(&mut self, nodes: &[MarkupNode]) -> Vec<Block> {
        let (inline, mut blocks) = self.capture_nodes(nodes);
        if !is_blank(&inline) {
            blocks.push(Block::Paragraph(inline));
        }
        blocks
    }

    /// Converts the children of an inline slot (heading, summary). Nested
    /// paragraphs are joined with hard breaks; other blocks are dropped.
    pub fn collect_inline(&mut self, element: &MarkupElement) -> Vec<Inline> {
        let (inline, blocks) = self.capture_children(element);
        let mut out = Vec::new();
        for block in blocks {
            match block {
                Block::Paragraph(content) | Block::Heading { content, .. } => {
                    if !out.is_empty() {
                        out.push(Inline::HardBreak);
                    }
                    out.extend(content);
                }
                other => debug!("markup: dropping block inside inline slot: {other:?}"),
            }
        }
        if !is_blank(&inline) {
            if !out.is_empty() {
                out.push(Inline::HardBreak);
            }
            out.extend(inline);
        }
        out
    }

    /// Pushes text, collapsing whitespace runs that contain line breaks or
    /// tabs into a single space emitted only between content.
    pub fn push_text(&mut self, text: &str) {
        let mut literal = EcoString::new();
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if !is_collapsible(ch) {
                literal.push(ch);
                continue;
            }

            let mut run = EcoString::from(ch);
            while let Some(&next) = chars.peek()
                && is_collapsible(next)
            {
                run.push(next);
                chars.next();
            }

            if run.contains(['\n', '\r', '\t']) {
                self.push_literal(std::mem::take(&mut literal));
                self.pending_space = true;
            } else {
                literal.push_str(&run);
            }
        }
        self.push_literal(literal);
    }

    fn push_literal(&mut self, literal: EcoString) {
        if literal.is_empty() {
            return;
        }
        if literal.starts_with(' ') {
            self.pending_space = false;
        }
        self.emit_pending_space();
        self.inline_buffer.push(Inline::Text(ir::Text {
            value: literal,
            marks: self.marks.clone(),
        }));
    }

    /// Pushes an inline atom, honoring a pending collapsed space.
    pub fn push_inline(&mut self, inline: Inline) {
        self.emit_pending_space();
        self.inline_buffer.push(inline);
    }

    pub fn push_hard_break(&mut self) {
        self.pending_space = false;
        self.inline_buffer.push(Inline::HardBreak);
    }

    fn emit_pending_space(&mut self) {
        if !std::mem::take(&mut self.pending_space) {
            return;
        }
        let trailing_space = match self.inline_buffer.last() {
            None | Some(Inline::HardBreak) => true,
            Some(Inline::Text(text)) => text.value.ends_with(' '),
            Some(_) => false,
        };
        if !trailing_space {
            self.inline_buffer.push(Inline::Text(ir::Text {
                value: " ".into(),
                marks: self.marks.clone(),
            }));
        }
    }

    /// Ends the current implicit paragraph.
    pub fn flush_inline_buffer(&mut self) {
        self.pending_space = false;
        let inline = std::mem::take(&mut self.inline_buffer);
        self.push_implicit_paragraph(inline);
    }

    fn push_implicit_paragraph(&mut self, inline: Vec<Inline>) {
        if !is_blank(&inline) {
            self.blocks.push(Block::Paragraph(inline));
        }
    }

    /// Converts children with extra marks in effect.
    pub fn convert_with_marks(
        &mut self,
        element: &MarkupElement,
        marks: impl IntoIterator<Item = ir::Mark>,
    ) {
        let prev = self.marks.clone();
        for mark in marks {
            self.marks.insert(mark);
        }
        self.convert_children(element);
        self.marks = prev;
    }
}

/// Whitespace the markup collapses. Non-breaking spaces are content.
fn is_collapsible(ch: char) -> bool {
    matches!(ch, ' ' | '\n' | '\r' | '\t' | '\u{c}')
}

/// Whether inline content is empty or whitespace-only text.
pub(crate) fn is_blank(inline: &[Inline]) -> bool {
    inline.iter().all(|inline| match inline {
        Inline::Text(text) => text.value.chars().all(is_collapsible),
        _ => false,
    })
}
