//! Markup parsing: pre-cleaning and lowering of the html5ever DOM into an
//! owned element tree.

use std::borrow::Cow;
use std::sync::OnceLock;

use ecow::EcoString;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;

use crate::attributes::Attrs;
use crate::tags::TagKind;

/// A node of the lowered markup tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element(MarkupElement),
    Text(EcoString),
}

/// An element with its tag resolved against [`TagKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupElement {
    pub tag: EcoString,
    pub kind: TagKind,
    pub attrs: Attrs,
    pub children: Vec<MarkupNode>,
}

impl MarkupElement {
    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &MarkupElement> {
        self.children.iter().filter_map(|child| match child {
            MarkupNode::Element(element) => Some(element),
            MarkupNode::Text(_) => None,
        })
    }

    /// The first descendant satisfying `pred`, in document order.
    pub fn find(&self, pred: &impl Fn(&MarkupElement) -> bool) -> Option<&MarkupElement> {
        for child in self.elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated text of every descendant.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[MarkupNode], out: &mut String) {
    for node in nodes {
        match node {
            MarkupNode::Text(text) => out.push_str(text),
            MarkupNode::Element(element) if element.kind == TagKind::Br => out.push('\n'),
            MarkupNode::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// Rewrites self-closing table, row and cell tags into open/close pairs, which
/// the markup parser would otherwise treat as start tags only.
pub fn expand_self_closing(markup: &str) -> Cow<'_, str> {
    static SELF_CLOSING: OnceLock<Regex> = OnceLock::new();
    let re = SELF_CLOSING.get_or_init(|| {
        Regex::new(r"(?i)<(table|thead|tbody|tfoot|tr|td|th)(\s[^<>]*?)?\s*/>")
            .expect("self-closing pattern is valid")
    });
    re.replace_all(markup, "<${1}${2}></${1}>")
}

/// Parses markup into the lowered tree of the document root.
pub fn parse_markup(markup: &str) -> Vec<MarkupNode> {
    let markup = expand_self_closing(markup);
    let dom = parse_document(RcDom::default(), Default::default()).one(markup.as_ref());
    lower_children(&dom.document)
}

fn lower_children(handle: &Handle) -> Vec<MarkupNode> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(lower)
        .collect()
}

fn lower(handle: &Handle) -> Option<MarkupNode> {
    match &handle.data {
        NodeData::Text { contents } => {
            Some(MarkupNode::Text(EcoString::from(contents.borrow().as_ref())))
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = EcoString::from(name.local.as_ref());
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| {
                    (
                        EcoString::from(attr.name.local.as_ref()),
                        EcoString::from(attr.value.as_ref()),
                    )
                })
                .collect();
            Some(MarkupNode::Element(MarkupElement {
                kind: TagKind::from_name(&tag),
                tag,
                attrs: Attrs(attrs),
                children: lower_children(handle),
            }))
        }
        NodeData::Document => Some(MarkupNode::Element(MarkupElement {
            tag: EcoString::new(),
            kind: TagKind::Unknown,
            attrs: Attrs::default(),
            children: lower_children(handle),
        })),
        NodeData::Doctype { .. } | NodeData::Comment { .. } | NodeData::ProcessingInstruction { .. } => {
            None
        }
    }
}
