use super::*;
use crate::ir::{Details, Video, VideoProvider};
use crate::options::WordOptions;
use crate::writer::docx::{
    ParagraphStyle, Spacing, VerticalMerge, WordElement, WordParagraph, WordTable, word_highlight,
};

/// The body of the Word document, without the title paragraph.
fn word(blocks: Vec<Block>) -> Vec<WordElement> {
    let mut elements = to_word_document(&doc(blocks), "Informe", &WordOptions::default()).elements;
    elements.remove(0);
    elements
}

fn paragraphs(elements: &[WordElement]) -> Vec<&WordParagraph> {
    elements
        .iter()
        .filter_map(|element| match element {
            WordElement::Paragraph(paragraph) => Some(paragraph),
            WordElement::Table(_) => None,
        })
        .collect()
}

fn texts(elements: &[WordElement]) -> Vec<String> {
    paragraphs(elements).iter().map(|p| p.text()).collect()
}

fn only_table(elements: Vec<WordElement>) -> WordTable {
    match elements.into_iter().next() {
        Some(WordElement::Table(table)) => table,
        other => panic!("expected a table, got {other:?}"),
    }
}

#[test]
fn test_title_only() {
    let word_doc = to_word_document(&doc(vec![]), "  Informe anual ", &WordOptions::default());
    assert_eq!(word_doc.elements.len(), 1);
    let WordElement::Paragraph(title) = &word_doc.elements[0] else {
        panic!("title must be a paragraph");
    };
    assert_eq!(title.style, ParagraphStyle::Title);
    assert_eq!(title.text(), "Informe anual");
    assert_eq!(word_doc.header, "Informe anual");
    assert_eq!(word_doc.footer, "Página");

    let options = WordOptions {
        locale: Locale::En,
        ..WordOptions::default()
    };
    assert_eq!(to_word_document(&doc(vec![]), "x", &options).footer, "Page");
}

#[test]
fn test_headings() {
    let elements = word(vec![
        Block::Heading {
            level: 2,
            content: vec![Inline::text("Section")],
        },
        Block::Paragraph(vec![]),
        para("Body"),
    ]);
    let paragraphs = paragraphs(&elements);
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0].style, ParagraphStyle::Heading(2));
    assert_eq!(
        paragraphs[0].spacing,
        Some(Spacing {
            before: 360,
            after: 180,
        })
    );
    assert_eq!(paragraphs[0].style.style_id(), "Heading2");
    assert_eq!(paragraphs[1].style, ParagraphStyle::Normal);
}

#[test]
fn test_lists_flattened() {
    let elements = word(vec![
        Block::BulletList(vec![
            ListItem::new(vec![para("a"), Block::BulletList(vec![item("b")])]),
            ListItem::new(vec![]),
        ]),
        Block::OrderedList {
            start: 3,
            items: vec![item("x"), item("y")],
        },
        Block::TaskList(vec![ListItem::task(true, vec![para("done")])]),
    ]);
    assert_eq!(
        texts(&elements),
        vec!["• a", "• b", "• ", "3. x", "4. y", "☑ done"]
    );
    for paragraph in paragraphs(&elements) {
        assert_eq!(paragraph.style, ParagraphStyle::ListItem);
        assert_eq!(paragraph.indent, Some(720));
    }
}

#[test]
fn test_quote_and_code() {
    let elements = word(vec![
        Block::Blockquote(vec![para("quoted")]),
        Block::CodeBlock {
            language: None,
            code: "a\nb\n".into(),
        },
        Block::HorizontalRule,
    ]);
    let paragraphs = paragraphs(&elements);
    assert_eq!(paragraphs[0].style, ParagraphStyle::Quote);
    assert_eq!(paragraphs[0].indent, Some(720));
    assert_eq!(paragraphs[1].style, ParagraphStyle::Code);
    assert!(paragraphs[1].runs[0].code);
    assert_eq!(paragraphs[2].text(), "b");
    assert_eq!(paragraphs[3].text(), "* * *");
    assert_eq!(paragraphs.len(), 4);
}

#[test]
fn test_placeholders() {
    let elements = word(vec![
        Block::Image {
            src: "https://example.com/cat.png".into(),
            alt: "A cat".into(),
            title: None,
        },
        Block::Image {
            src: "https://example.com/dog.png".into(),
            alt: " ".into(),
            title: None,
        },
        Block::VideoEmbed(Video {
            provider: VideoProvider::Vimeo,
            id: "76979871".into(),
        }),
        Block::Canvas { strokes: vec![] },
    ]);
    assert_eq!(
        texts(&elements),
        vec![
            "[Imagen: A cat]",
            "[Imagen: https://example.com/dog.png]",
            "[Video: https://vimeo.com/76979871]",
            "[Dibujo: 0 trazos]",
        ]
    );
    assert!(
        paragraphs(&elements)
            .iter()
            .all(|p| p.style == ParagraphStyle::Placeholder)
    );
}

#[test]
fn test_details() {
    let elements = word(vec![Block::Details(Details {
        open: false,
        summary: vec![Inline::text("More")],
        content: vec![para("hidden")],
    })]);
    let paragraphs = paragraphs(&elements);
    assert_eq!(paragraphs[0].text(), "More");
    assert!(paragraphs[0].runs[0].bold);
    assert_eq!(paragraphs[1].text(), "hidden");
}

#[test]
fn test_runs() {
    let elements = word(vec![Block::Paragraph(vec![
        Inline::styled(
            "link",
            [
                Mark::Link {
                    href: "https://a.com".into(),
                    target: None,
                },
                Mark::TextColor {
                    hex: "#ff0000".into(),
                },
            ],
        ),
        Inline::HardBreak,
        Inline::styled(
            "red",
            [
                Mark::TextColor {
                    hex: "#ff0000".into(),
                },
                Mark::Superscript,
            ],
        ),
        Inline::styled("hl", [Mark::Highlight { color: None }, Mark::Strike]),
    ])]);
    let paragraph = paragraphs(&elements)[0];
    assert_eq!(paragraph.text(), "link\nredhl");

    let link = &paragraph.runs[0];
    assert_eq!(link.link.as_deref(), Some("https://a.com"));
    assert_eq!(link.color.as_deref(), Some("0563C1"));
    assert!(link.underline);

    assert!(paragraph.runs[1].line_break);

    let red = &paragraph.runs[2];
    assert_eq!(red.color.as_deref(), Some("FF0000"));
    assert!(red.vert_align.is_some());

    let highlighted = &paragraph.runs[3];
    assert_eq!(highlighted.highlight, Some("yellow"));
    assert!(highlighted.strike);
}

#[test]
fn test_table_grid() {
    let table = only_table(word(vec![table(&[&["A", "B", "C"], &["1"]])]));
    assert_eq!(table.columns, 3);
    assert!((table.width_pct - 100.0 / 3.0).abs() < 0.01);
    assert!(table.rows.iter().all(|row| row.cells.len() == 3));
    assert!(table.rows[0].cells[0].header);
    assert!(table.rows[0].cells[0].paragraphs[0].runs[0].bold);
    assert!(table.rows[1].cells[1].paragraphs.is_empty());
}

#[test]
fn test_table_spans() {
    let document = parse(
        r#"<table><tr><td rowspan="2">Tall</td><td>b</td></tr><tr><td>c</td></tr><tr><td colspan="2">Wide</td></tr></table>"#,
    );
    let word_doc = to_word_document(&document, "t", &WordOptions::default());
    let Some(WordElement::Table(table)) = word_doc.elements.get(1) else {
        panic!("expected a table");
    };
    assert_eq!(table.columns, 2);
    assert_eq!(
        table.rows[0].cells[0].vertical_merge,
        Some(VerticalMerge::Restart)
    );
    assert_eq!(
        table.rows[1].cells[0].vertical_merge,
        Some(VerticalMerge::Continue)
    );
    assert_eq!(table.rows[1].cells[1].paragraphs[0].text(), "c");
    assert_eq!(table.rows[2].cells.len(), 1);
    assert_eq!(table.rows[2].cells[0].grid_span, 2);
}

#[test]
fn test_highlight_palette() {
    assert_eq!(word_highlight(None), "yellow");
    assert_eq!(word_highlight(Some("red")), "red");
    assert_eq!(word_highlight(Some("green")), "green");
    assert_eq!(word_highlight(Some("blue")), "cyan");
    assert_eq!(word_highlight(Some("#7f0000")), "darkRed");
    assert_eq!(word_highlight(Some("#00fe01")), "green");
    assert_eq!(word_highlight(Some("orchid")), "yellow");
}

#[cfg(feature = "docx")]
#[test]
fn test_package() {
    let document = parse("<h1>Hola</h1><p>Texto con <a href=\"https://a.com\">enlace</a></p>");
    let word_doc = to_word_document(&document, "Informe", &WordOptions::default());
    let bytes = crate::writer::docx::package_docx(&word_doc).unwrap();
    assert!(bytes.starts_with(b"PK"));
}
