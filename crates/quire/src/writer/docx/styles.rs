//! Paragraph and character styles of packaged documents.

use docx_rs::*;

use super::model::ParagraphStyle;

/// Heading sizes in half-points, level 1 first.
const HEADING_SIZES: [usize; 6] = [32, 28, 26, 24, 22, 20];

fn heading_style(level: u8, size: usize) -> Style {
    let style = ParagraphStyle::Heading(level);
    Style::new(style.style_id(), StyleType::Paragraph)
        .name(format!("Heading {level}"))
        .size(size)
        .bold()
}

pub(super) fn code_fonts() -> RunFonts {
    RunFonts::new()
        .ascii("Courier New")
        .hi_ansi("Courier New")
        .east_asia("Courier New")
        .cs("Courier New")
}

/// Registers every style a [`ParagraphStyle`] can refer to.
pub(super) fn register_styles(mut docx: Docx) -> Docx {
    for (idx, size) in HEADING_SIZES.iter().enumerate() {
        docx = docx.add_style(heading_style(idx as u8 + 1, *size));
    }

    let title = Style::new(ParagraphStyle::Title.style_id(), StyleType::Paragraph)
        .name("Title")
        .size(40)
        .bold()
        .align(AlignmentType::Center);

    let code_block = Style::new(ParagraphStyle::Code.style_id(), StyleType::Paragraph)
        .name("Code Block")
        .fonts(code_fonts())
        .size(18);

    let blockquote = Style::new(ParagraphStyle::Quote.style_id(), StyleType::Paragraph)
        .name("Block Quote")
        .italic();

    let list_paragraph = Style::new(ParagraphStyle::ListItem.style_id(), StyleType::Paragraph)
        .name("List Paragraph");

    let caption = Style::new(ParagraphStyle::Placeholder.style_id(), StyleType::Paragraph)
        .name("Caption")
        .italic()
        .size(18);

    let hyperlink = Style::new("Hyperlink", StyleType::Character)
        .name("Hyperlink")
        .color("0563C1")
        .underline("single");

    let table = Style::new("Table", StyleType::Table)
        .name("Table")
        .table_align(TableAlignmentType::Center);

    docx.add_style(title)
        .add_style(code_block)
        .add_style(blockquote)
        .add_style(list_paragraph)
        .add_style(caption)
        .add_style(hyperlink)
        .add_style(table)
}
