//! Inline element processing module, handles text styles and inline atoms.

use ecow::EcoString;

use crate::attributes::{
    AttrsParser, LinkAttr, MentionAttr, StyleAttr, highlight_class, normalize_color, quire_attr,
    semantic_highlight,
};
use crate::ir::{Inline, Mark, MentionKind};
use crate::tags::TagKind;

use super::core::MarkupParser;
use super::html::MarkupElement;

impl MarkupParser {
    /// Convert a styling element, or an inline atom carried by a `span`.
    pub fn convert_inline_element(&mut self, element: &MarkupElement) {
        if element.kind == TagKind::Span {
            match element.attrs.data_type() {
                Some("mention") => return self.convert_mention(element),
                Some("emoji") => return self.convert_emoji(element),
                Some("inline-math") => return self.convert_inline_math(element),
                _ => {}
            }
        }

        let marks = Self::element_marks(element);
        self.convert_with_marks(element, marks);
    }

    /// The marks an inline element applies to its content.
    fn element_marks(element: &MarkupElement) -> Vec<Mark> {
        let attrs = &element.attrs;
        let style = StyleAttr::parse(attrs);
        let mut marks = Vec::new();

        match element.kind {
            // Pasted documents wrap everything in `<b style="font-weight:normal">`.
            TagKind::Strong | TagKind::B if style.bold != Some(false) => marks.push(Mark::Bold),
            TagKind::Em | TagKind::I => marks.push(Mark::Italic),
            TagKind::U | TagKind::Ins => marks.push(Mark::Underline),
            TagKind::S | TagKind::Strike | TagKind::Del => marks.push(Mark::Strike),
            TagKind::Code => marks.push(Mark::Code),
            TagKind::Sub => marks.push(Mark::Subscript),
            TagKind::Sup => marks.push(Mark::Superscript),
            TagKind::A => {
                let link = LinkAttr::parse(attrs);
                if !link.href.is_empty() {
                    marks.push(Mark::Link {
                        href: link.href,
                        target: link.target,
                    });
                }
            }
            TagKind::Mark => {
                let color = match attrs.get(quire_attr::data_color) {
                    Some(color) if !color.trim().is_empty() => Some(color.trim().into()),
                    _ => style.background.as_deref().and_then(semantic_highlight),
                };
                marks.push(Mark::Highlight { color });
            }
            TagKind::Font => {
                if let Some(hex) = attrs.get(quire_attr::color).and_then(|c| normalize_color(c)) {
                    marks.push(Mark::TextColor { hex });
                }
                if let Some(face) = attrs.get(quire_attr::face) {
                    let name = face.split(',').next().unwrap_or_default().trim();
                    if !name.is_empty() {
                        marks.push(Mark::FontFamily { name: name.into() });
                    }
                }
            }
            _ => {}
        }

        if style.bold == Some(true) {
            marks.push(Mark::Bold);
        }
        if style.italic {
            marks.push(Mark::Italic);
        }
        if style.underline {
            marks.push(Mark::Underline);
        }
        if style.strike {
            marks.push(Mark::Strike);
        }
        if style.subscript {
            marks.push(Mark::Subscript);
        }
        if style.superscript {
            marks.push(Mark::Superscript);
        }
        if let Some(hex) = style.color {
            marks.push(Mark::TextColor { hex });
        }
        if let Some(name) = style.font_family {
            marks.push(Mark::FontFamily { name });
        }
        if element.kind != TagKind::Mark {
            if let Some(color) = highlight_class(attrs) {
                marks.push(Mark::Highlight { color });
            } else if let Some(background) = style.background {
                marks.push(Mark::Highlight {
                    color: semantic_highlight(&background),
                });
            }
        }

        marks
    }

    fn convert_mention(&mut self, element: &MarkupElement) {
        let attrs = MentionAttr::parse(&element.attrs);
        let kind = if attrs.user {
            MentionKind::User
        } else {
            MentionKind::Tag
        };
        let label = if attrs.label.is_empty() {
            let text = element.text_content();
            EcoString::from(text.trim().trim_start_matches(kind.sigil()))
        } else {
            attrs.label
        };
        self.push_inline(Inline::Mention {
            kind,
            id: attrs.id,
            label,
        });
    }

    fn convert_emoji(&mut self, element: &MarkupElement) {
        let attrs = &element.attrs;
        let shortcode = attrs
            .get(quire_attr::data_shortcode)
            .or_else(|| attrs.get(quire_attr::data_name))
            .cloned()
            .unwrap_or_else(|| element.text_content().trim().trim_matches(':').into());
        if shortcode.is_empty() {
            return;
        }
        self.push_inline(Inline::Emoji { shortcode });
    }

    fn convert_inline_math(&mut self, element: &MarkupElement) {
        let latex = match element.attrs.get(quire_attr::data_latex) {
            Some(latex) => latex.clone(),
            None => element.text_content().trim().into(),
        };
        self.push_inline(Inline::MathInline { latex });
    }
}
