//! List processing module, handles ordered, unordered and task lists.

use log::debug;

use crate::attributes::{AttrsParser, ItemAttr, ItemKind, ListAttr, quire_attr};
use crate::ir::{Block, ListItem};
use crate::tags::TagKind;

use super::core::MarkupParser;
use super::html::{MarkupElement, MarkupNode};

/// List parser
pub struct ListParser;

impl ListParser {
    /// Convert a `ul` or `ol` element into a list block.
    pub fn convert_list(parser: &mut MarkupParser, element: &MarkupElement) -> Block {
        let attrs = ListAttr::parse(&element.attrs);
        let mut items: Vec<(ItemKind, ListItem)> = Vec::new();

        for child in &element.children {
            match child {
                MarkupNode::Element(li) if li.kind == TagKind::Li => {
                    items.push(Self::convert_item(parser, li));
                }
                // Lists nested directly in a list belong to the previous item.
                MarkupNode::Element(nested) if matches!(nested.kind, TagKind::Ul | TagKind::Ol) => {
                    let block = Self::convert_list(parser, nested);
                    match items.last_mut() {
                        Some((_, item)) => item.content.push(block),
                        None => items.push((ItemKind::Bullet, ListItem::new(vec![block]))),
                    }
                }
                MarkupNode::Text(text) if text.trim().is_empty() => {}
                other => {
                    debug!("list: wrapping stray list content into an item");
                    let content = parser.blocks_of_nodes(std::slice::from_ref(other));
                    if !content.is_empty() {
                        items.push((ItemKind::Bullet, ListItem::new(content)));
                    }
                }
            }
        }

        let task = attrs.task
            || (element.kind == TagKind::Ul
                && !items.is_empty()
                && items.iter().all(|(kind, _)| *kind == ItemKind::Task));

        if task {
            let items = items
                .into_iter()
                .map(|(_, item)| ListItem::task(item.checked.unwrap_or(false), item.content))
                .collect();
            return Block::TaskList(items);
        }

        let items = items
            .into_iter()
            .map(|(_, item)| ListItem::new(item.content))
            .collect();
        if element.kind == TagKind::Ol {
            let start = attrs.start.unwrap_or(1).clamp(0, i64::from(u32::MAX)) as u32;
            Block::OrderedList { start, items }
        } else {
            Block::BulletList(items)
        }
    }

    /// Convert a list item, reporting which kind of list it declares.
    pub fn convert_item(parser: &mut MarkupParser, element: &MarkupElement) -> (ItemKind, ListItem) {
        let mut attrs = ItemAttr::parse(&element.attrs);
        if let Some(checkbox) = Self::find_checkbox(element) {
            attrs.task = true;
            if attrs.checked.is_none() {
                attrs.checked = Some(checkbox.attrs.has(quire_attr::checked));
            }
        }

        let content = parser.blocks_of(element);
        let item = ListItem {
            checked: attrs.checked,
            content,
        };
        (attrs.kind(), item)
    }

    /// Groups an item met outside any list into the preceding list of the
    /// same kind, or opens a new list for it.
    pub fn convert_orphan_item(parser: &mut MarkupParser, element: &MarkupElement) {
        let (kind, item) = Self::convert_item(parser, element);
        match (kind, parser.blocks.last_mut()) {
            (ItemKind::Bullet, Some(Block::BulletList(items)))
            | (ItemKind::Ordered, Some(Block::OrderedList { items, .. })) => {
                items.push(ListItem::new(item.content))
            }
            (ItemKind::Task, Some(Block::TaskList(items))) => {
                items.push(ListItem::task(item.checked.unwrap_or(false), item.content))
            }
            (ItemKind::Bullet, _) => parser
                .blocks
                .push(Block::BulletList(vec![ListItem::new(item.content)])),
            (ItemKind::Ordered, _) => parser.blocks.push(Block::OrderedList {
                start: 1,
                items: vec![ListItem::new(item.content)],
            }),
            (ItemKind::Task, _) => parser.blocks.push(Block::TaskList(vec![ListItem::task(
                item.checked.unwrap_or(false),
                item.content,
            )])),
        }
    }

    /// The checkbox of a task item, outside any nested list.
    fn find_checkbox(element: &MarkupElement) -> Option<&MarkupElement> {
        for child in element.elements() {
            match child.kind {
                TagKind::Input
                    if child
                        .attrs
                        .get(quire_attr::type_)
                        .is_some_and(|ty| ty.eq_ignore_ascii_case("checkbox")) =>
                {
                    return Some(child);
                }
                TagKind::Ul | TagKind::Ol | TagKind::Li => {}
                _ => {
                    if let Some(found) = Self::find_checkbox(child) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }
}
