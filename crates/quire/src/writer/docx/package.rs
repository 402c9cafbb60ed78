//! Packs a [`WordDoc`] into `.docx` bytes with `docx-rs`.

use std::io::Cursor;

use docx_rs::*;
use log::debug;

use crate::{Error, Result};

use super::model::{
    VertAlign, VerticalMerge, WordDoc, WordElement, WordParagraph, WordRun, WordTable,
};
use super::styles::{code_fonts, register_styles};

/// Packages the document, failing only if the archive cannot be written.
pub fn package_docx(document: &WordDoc) -> Result<Vec<u8>> {
    let page = document.page;
    let margin = PageMargin::new()
        .top(page.margin_top as i32)
        .right(page.margin_right as i32)
        .bottom(page.margin_bottom as i32)
        .left(page.margin_left as i32)
        .header(page.header as i32)
        .footer(page.footer as i32);

    let mut docx = Docx::new()
        .page_size(page.width, page.height)
        .page_margin(margin);
    docx = register_styles(docx);

    let header = Header::new().add_paragraph(
        Paragraph::new()
            .align(AlignmentType::Right)
            .add_run(Run::new().add_text(document.header.as_str()).size(18)),
    );
    let footer = Footer::new().add_paragraph(
        Paragraph::new()
            .align(AlignmentType::Center)
            .add_run(Run::new().add_text(format!("{} ", document.footer)).size(18))
            .add_page_num(PageNum::new()),
    );
    docx = docx.header(header).footer(footer);

    for element in &document.elements {
        docx = match element {
            WordElement::Paragraph(paragraph) => docx.add_paragraph(build_paragraph(paragraph)),
            WordElement::Table(table) => docx.add_table(build_table(table)),
        };
    }

    debug!("packing docx with {} elements", document.elements.len());
    let mut buffer = Vec::new();
    docx.build()
        .pack(&mut Cursor::new(&mut buffer))
        .map_err(|err| Error::export("pack docx", err))?;

    Ok(buffer)
}

fn build_paragraph(paragraph: &WordParagraph) -> Paragraph {
    let mut para = Paragraph::new().style(paragraph.style.style_id());
    if let Some(indent) = paragraph.indent {
        para = para.indent(Some(indent as i32), None, None, None);
    }
    if let Some(spacing) = paragraph.spacing {
        para = para.line_spacing(LineSpacing::new().before(spacing.before).after(spacing.after));
    }

    for run in &paragraph.runs {
        match &run.link {
            Some(href) => {
                let hyperlink =
                    Hyperlink::new(href.as_str(), HyperlinkType::External).add_run(build_run(run));
                para = para.add_hyperlink(hyperlink);
            }
            None => para = para.add_run(build_run(run)),
        }
    }
    para
}

fn build_run(source: &WordRun) -> Run {
    if source.line_break {
        return Run::new().add_break(BreakType::TextWrapping);
    }

    let mut run = Run::new().add_text(source.text.as_str());
    if source.bold {
        run = run.bold();
    }
    if source.italic {
        run = run.italic();
    }
    if source.underline {
        run = run.underline("single");
    }
    if source.strike {
        run = run.strike();
    }
    if source.code {
        run = run.fonts(code_fonts());
    } else if let Some(font) = &source.font {
        run = run.fonts(
            RunFonts::new()
                .ascii(font.as_str())
                .hi_ansi(font.as_str())
                .cs(font.as_str()),
        );
    }
    if let Some(color) = &source.color {
        run = run.color(color.as_str());
    }
    if let Some(highlight) = source.highlight {
        run = run.highlight(highlight);
    }
    match source.vert_align {
        Some(VertAlign::Subscript) => run.run_property = run.run_property.vert_align(VertAlignType::SubScript),
        Some(VertAlign::Superscript) => run.run_property = run.run_property.vert_align(VertAlignType::SuperScript),
        None => {}
    }
    run
}

/// Percentages are written in fiftieths of a percent.
fn pct(percent: f32) -> usize {
    (percent * 50.0).round() as usize
}

fn build_table(source: &WordTable) -> Table {
    let rows = source
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .map(|cell| {
                    let mut table_cell = TableCell::new()
                        .width(pct(source.width_pct * cell.grid_span as f32), WidthType::Pct);
                    if cell.grid_span > 1 {
                        table_cell = table_cell.grid_span(cell.grid_span);
                    }
                    match cell.vertical_merge {
                        Some(VerticalMerge::Restart) => {
                            table_cell = table_cell.vertical_merge(VMergeType::Restart);
                        }
                        Some(VerticalMerge::Continue) => {
                            table_cell = table_cell.vertical_merge(VMergeType::Continue);
                        }
                        None => {}
                    }
                    if cell.paragraphs.is_empty() {
                        // A cell must hold at least one paragraph.
                        table_cell = table_cell.add_paragraph(Paragraph::new());
                    }
                    for paragraph in &cell.paragraphs {
                        table_cell = table_cell.add_paragraph(build_paragraph(paragraph));
                    }
                    table_cell
                })
                .collect();
            TableRow::new(cells)
        })
        .collect();

    Table::new(rows)
        .style("Table")
        .width(pct(100.0), WidthType::Pct)
        .set_grid(vec![pct(source.width_pct); source.columns])
}
