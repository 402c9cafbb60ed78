//! Media processing module, handles images, embedded videos, drawings, math
//! blocks and collapsible sections.

use log::debug;

use crate::attributes::{
    AttrsParser, CodeAttr, ImageAttr, parse_strokes, parse_video_url, quire_attr,
};
use crate::ir::{Block, Details, Video, VideoProvider};
use crate::tags::TagKind;

use super::core::MarkupParser;
use super::html::{MarkupElement, MarkupNode};

/// Media content parser
pub struct MediaParser;

impl MediaParser {
    pub fn convert_image(element: &MarkupElement) -> Block {
        let attrs = ImageAttr::parse(&element.attrs);
        Block::Image {
            src: attrs.src,
            alt: attrs.alt,
            title: attrs.title,
        }
    }

    pub fn convert_iframe(element: &MarkupElement) -> Block {
        let src = element.attrs.get(quire_attr::src).cloned().unwrap_or_default();
        Block::VideoEmbed(parse_video_url(&src))
    }

    /// Convert a video container, preferring its explicit provider and id.
    pub fn convert_video_embed(element: &MarkupElement) -> Block {
        let attrs = &element.attrs;
        if let Some(id) = attrs.get(quire_attr::data_id).filter(|id| !id.is_empty()) {
            let provider = attrs
                .get(quire_attr::data_provider)
                .map(|provider| VideoProvider::from_name(provider))
                .unwrap_or(VideoProvider::Other);
            return Block::VideoEmbed(Video {
                provider,
                id: id.clone(),
            });
        }

        let src = attrs
            .get(quire_attr::src)
            .or_else(|| {
                element
                    .find(&|child| child.kind == TagKind::Iframe)
                    .and_then(|iframe| iframe.attrs.get(quire_attr::src))
            })
            .cloned()
            .unwrap_or_default();
        Block::VideoEmbed(parse_video_url(&src))
    }

    pub fn convert_canvas(element: &MarkupElement) -> Block {
        let payload = element.attrs.get(quire_attr::data_strokes);
        Block::Canvas {
            strokes: parse_strokes(payload.map(|p| p.as_str())),
        }
    }

    pub fn convert_block_math(element: &MarkupElement) -> Block {
        let latex = match element.attrs.get(quire_attr::data_latex) {
            Some(latex) => latex.clone(),
            None => element.text_content().trim().into(),
        };
        Block::MathBlock { latex }
    }

    /// Convert a `pre` element; the language comes from the `pre` or the inner
    /// `code` classes.
    pub fn convert_pre(element: &MarkupElement) -> Block {
        let code_elem = element.elements().find(|child| child.kind == TagKind::Code);
        let language = CodeAttr::parse(&element.attrs).language.or_else(|| {
            code_elem.and_then(|code| CodeAttr::parse(&code.attrs).language)
        });
        Block::CodeBlock {
            language,
            code: element.text_content().into(),
        }
    }
}

impl MarkupParser {
    /// Convert a `details` element or a details container.
    pub fn convert_details(&mut self, element: &MarkupElement) -> Block {
        let attrs = &element.attrs;
        let open = attrs.has(quire_attr::open) || attrs.has_class("is-open");

        let summary = element.find(&|child| child.kind == TagKind::Summary);
        let summary = match summary {
            Some(summary) => self.collect_inline(summary),
            None => Vec::new(),
        };

        let content = match element.find(&|child| child.attrs.data_type() == Some("detailsContent")) {
            Some(content) => self.blocks_of(content),
            None => {
                let rest: Vec<MarkupNode> = element
                    .children
                    .iter()
                    .filter(|child| {
                        !matches!(child, MarkupNode::Element(e) if e.kind == TagKind::Summary)
                    })
                    .cloned()
                    .collect();
                self.blocks_of_nodes(&rest)
            }
        };

        if summary.is_empty() {
            debug!("details: section without a summary");
        }
        Block::Details(Details {
            open,
            summary,
            content,
        })
    }
}
