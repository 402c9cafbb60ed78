//! Tags recognized by the markup importer.

use strum::{EnumString, IntoStaticStr};

/// Closed set of element tags the importer dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TagKind {
    Html,
    Head,
    Body,
    Title,
    Meta,
    Script,
    Style,
    Template,

    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Ul,
    Ol,
    Li,
    Blockquote,
    Pre,
    Table,
    Thead,
    Tbody,
    Tfoot,
    Tr,
    Th,
    Td,
    Caption,
    Hr,
    Img,
    Iframe,
    Details,
    Summary,
    Figure,
    Figcaption,

    Div,
    Section,
    Article,
    Header,
    Footer,
    Main,
    Aside,
    Nav,

    Span,
    Strong,
    B,
    Em,
    I,
    U,
    Ins,
    S,
    Strike,
    Del,
    Code,
    A,
    Mark,
    Sub,
    Sup,
    Font,
    Br,
    Label,
    Input,
    Button,

    /// Every other tag. Its children are converted in place.
    #[strum(disabled)]
    Unknown,
}

impl TagKind {
    /// Resolves a tag name; unrecognized names map to [`TagKind::Unknown`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(TagKind::Unknown)
    }

    /// The lowercase tag name.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The level of a heading tag.
    pub fn heading_level(self) -> Option<u8> {
        Some(match self {
            TagKind::H1 => 1,
            TagKind::H2 => 2,
            TagKind::H3 => 3,
            TagKind::H4 => 4,
            TagKind::H5 => 5,
            TagKind::H6 => 6,
            _ => return None,
        })
    }
}
