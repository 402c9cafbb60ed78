//! Importers producing the document model.

mod core;
mod html;
mod inline;
mod list;
mod markdown;
mod media;
mod plain;
mod table;

pub use self::core::MarkupParser;
pub use html::{MarkupElement, MarkupNode, expand_self_closing, parse_markup};
pub use markdown::{from_markdown, parse_inline as parse_markdown_inline};
pub use plain::from_plain_text;

use crate::ir::Document;

/// Parses editor markup. Never fails: unknown tags degrade to their text.
pub fn parse(markup: &str) -> Document {
    let nodes = parse_markup(markup);
    MarkupParser::new().parse_ir(&nodes)
}
