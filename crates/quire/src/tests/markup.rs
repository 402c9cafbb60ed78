use super::*;
use crate::ir::{Details, MAX_COLSPAN, MAX_ROWSPAN, MentionKind, Stroke, Video, VideoProvider};
use crate::options::WordOptions;
use crate::writer::docx::{VerticalMerge, WordElement};

/// A document built from every node kind the canonical markup represents.
fn representable() -> Document {
    let link = Mark::Link {
        href: "https://example.com/a?b=1&c=2".into(),
        target: Some("_blank".into()),
    };
    doc(vec![
        Block::Heading {
            level: 2,
            content: vec![Inline::text("Overview")],
        },
        Block::Paragraph(vec![
            Inline::text("Plain, "),
            bold("bold"),
            Inline::text(" and "),
            Inline::styled("linked", [link, Mark::Italic]),
            Inline::text(" "),
            Inline::styled("marked", [Mark::Highlight { color: Some("red".into()) }]),
            Inline::styled("x", [Mark::Subscript]),
            Inline::HardBreak,
            Inline::styled("tinted", [
                Mark::TextColor { hex: "#336699".into() },
                Mark::FontFamily { name: "Georgia".into() },
            ]),
            Inline::text(" 1 < 2 & 3 > 2"),
        ]),
        Block::Paragraph(vec![
            Inline::Mention {
                kind: MentionKind::User,
                id: "u-7".into(),
                label: "ana".into(),
            },
            Inline::text(" "),
            Inline::Emoji {
                shortcode: "tada".into(),
            },
            Inline::text(" "),
            Inline::MathInline {
                latex: "e^{i\\pi}".into(),
            },
        ]),
        Block::BulletList(vec![
            ListItem::new(vec![
                para("first"),
                Block::OrderedList {
                    start: 3,
                    items: vec![item("nested")],
                },
            ]),
            item("second"),
        ]),
        Block::TaskList(vec![
            ListItem::task(true, vec![para("Done")]),
            ListItem::task(false, vec![para("Todo")]),
        ]),
        Block::Blockquote(vec![para("quoted")]),
        Block::CodeBlock {
            language: Some("rust".into()),
            code: "fn main() {\n    println!(\"<hi>\");\n}".into(),
        },
        table(&[&["A", "B"], &["1", "2"]]),
        Block::HorizontalRule,
        Block::Image {
            src: "https://example.com/cat.png".into(),
            alt: "A cat".into(),
            title: Some("Cat".into()),
        },
        Block::VideoEmbed(Video {
            provider: VideoProvider::Youtube,
            id: "dQw4w9WgXcQ".into(),
        }),
        Block::Canvas {
            strokes: vec![Stroke {
                path: "M0 0 L10 10".into(),
                color: "#ff0000".into(),
                width: 3.0,
            }],
        },
        Block::Details(Details {
            open: true,
            summary: vec![Inline::text("More")],
            content: vec![para("hidden")],
        }),
        Block::MathBlock {
            latex: "\\int_0^1 x\\,dx".into(),
        },
    ])
}

#[test]
fn test_round_trip() {
    let document = representable().normalize();
    assert_eq!(parse(&render(&document)), document);
}

#[test]
fn test_idempotence() {
    let rendered = render(&representable());
    assert_eq!(render(&parse(&rendered)), rendered);

    let messy = r#"<div class="x"><b>Hi</b>
        there<ul><li>one<li>two</ul><h9>odd</h9><span style="color:red;background-color:#f4cccc">x</span></div>"#;
    let once = roundtrip(messy);
    assert_eq!(roundtrip(&once), once);
}

#[test]
fn test_render_blocks() {
    insta::assert_snapshot!(render(&doc(vec![
        Block::Heading { level: 1, content: vec![Inline::text("T")] },
        Block::TaskList(vec![ListItem::task(true, vec![para("Done")])]),
        Block::HorizontalRule,
    ])), @r#"
    <h1>T</h1>
    <ul data-type="taskList">
    <li data-type="taskItem" data-checked="true"><p>Done</p>
    </li>
    </ul>
    <hr />
    "#);
}

#[test]
fn test_render_escapes() {
    insta::assert_snapshot!(render(&doc(vec![Block::Paragraph(vec![Inline::styled(
        "a <b> & \"c\"",
        [Mark::Link { href: "https://e.com/?q=\"x\"".into(), target: None }],
    )])])), @r#"<p><a href="https://e.com/?q=&quot;x&quot;">a &lt;b&gt; &amp; "c"</a></p>"#);
}

#[test]
fn test_orphan_items_grouped() {
    let document = parse("<li>one</li><li>two</li><li>three</li>");
    assert_eq!(
        document,
        doc(vec![Block::BulletList(vec![
            item("one"),
            item("two"),
            item("three"),
        ])])
    );
}

#[test]
fn test_orphan_items_by_kind() {
    let document = parse(
        r#"<li data-checked="true">a</li><li data-checked="false">b</li><li data-list="ordered">c</li>"#,
    );
    assert_eq!(
        document,
        doc(vec![
            Block::TaskList(vec![
                ListItem::task(true, vec![para("a")]),
                ListItem::task(false, vec![para("b")]),
            ]),
            Block::OrderedList {
                start: 1,
                items: vec![item("c")],
            },
        ])
    );
}

#[test]
fn test_heading_clamp() {
    assert_eq!(
        parse(r#"<h2 data-level="0">Low</h2><h2 data-level="9">High</h2>"#),
        doc(vec![
            Block::Heading {
                level: 1,
                content: vec![Inline::text("Low")],
            },
            Block::Heading {
                level: 6,
                content: vec![Inline::text("High")],
            },
        ])
    );
}

#[test]
fn test_task_checkbox() {
    let document = parse(
        r#"<ul class="contains-task-list"><li><input type="checkbox" checked> Done</li><li><input type="checkbox"> Todo</li></ul>"#,
    );
    assert_eq!(
        document,
        doc(vec![Block::TaskList(vec![
            ListItem::task(true, vec![para(" Done")]),
            ListItem::task(false, vec![para(" Todo")]),
        ])])
    );
}

#[test]
fn test_whitespace() {
    let document = parse("<p>Hello\n   world</p>\n\n<p>  </p><pre>  keep\n   this</pre>");
    assert_eq!(
        document,
        doc(vec![
            Block::Paragraph(vec![Inline::text("Hello world")]),
            para("  "),
            Block::CodeBlock {
                language: None,
                code: "  keep\n   this".into(),
            },
        ])
    );
}

#[test]
fn test_empty_paragraph_kept() {
    assert_eq!(parse("<p></p>"), doc(vec![Block::Paragraph(vec![])]));
    assert_eq!(roundtrip("<p></p><p></p>"), "<p></p>\n");
}

#[test]
fn test_strip_foreign_attributes() {
    insta::assert_snapshot!(roundtrip(
        r#"<p class="MsoNormal" style="margin:0;color:#FF0000" id="x"><span lang="es" style="font-family:'Calibri',sans-serif">Hola</span></p>"#
    ), @r#"<p><span style="font-family: Calibri">Hola</span></p>"#);
}

#[test]
fn test_unknown_tags_flatten() {
    assert_eq!(
        parse("<custom-block>Some <blink>text</blink></custom-block>"),
        doc(vec![para("Some text")])
    );
    assert_eq!(parse("<script>alert(1)</script><p>ok</p>"), doc(vec![para("ok")]));
}

#[test]
fn test_highlight_import() {
    let highlighted = |color: Option<&str>| {
        Inline::styled(
            "x",
            [Mark::Highlight {
                color: color.map(Into::into),
            }],
        )
    };
    assert_eq!(
        parse(r#"<p><span style="background-color: #f4cccc">x</span></p>"#),
        doc(vec![Block::Paragraph(vec![highlighted(Some("red"))])])
    );
    assert_eq!(
        parse(r#"<p><span class="highlight-blue">x</span></p>"#),
        doc(vec![Block::Paragraph(vec![highlighted(Some("blue"))])])
    );
    assert_eq!(
        parse(r#"<p><span style="background: rgb(255, 255, 0)">x</span></p>"#),
        doc(vec![Block::Paragraph(vec![highlighted(None)])])
    );
    assert_eq!(
        parse(r#"<p><mark data-color="green">x</mark></p>"#),
        doc(vec![Block::Paragraph(vec![highlighted(Some("green"))])])
    );
}

#[test]
fn test_pasted_bold_wrapper() {
    assert_eq!(
        parse(r#"<b style="font-weight:normal;"><p>Not bold</p></b>"#),
        doc(vec![para("Not bold")])
    );
}

#[test]
fn test_self_closing_table_parts() {
    let document = parse("<table><tr><th>A</th><td/></tr><tr><td>1</td><td>2</td></tr></table>");
    let Some(Block::Table(table)) = document.blocks.first() else {
        panic!("expected a table, got {document:?}");
    };
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].cells.len(), 2);
    assert!(table.rows[0].cells[0].header);
    assert!(table.rows[0].cells[1].content.is_empty());
    assert_eq!(table.columns(), 2);
}

#[test]
fn test_table_spans() {
    let document = parse(
        r#"<table><thead><tr><th colspan="2">Wide</th></tr></thead><tbody><tr><td rowspan="2">Tall</td><td>b</td></tr><tr><td>c</td></tr></tbody></table>"#,
    );
    let Some(Block::Table(table)) = document.blocks.first() else {
        panic!("expected a table, got {document:?}");
    };
    assert_eq!(table.rows[0].cells[0].colspan, 2);
    assert!(table.rows[0].cells[0].header);
    assert_eq!(table.rows[1].cells[0].rowspan, 2);
    assert!(!table.rows[1].cells[0].header);
}

#[test]
fn test_oversized_spans() {
    let document = parse(concat!(
        r#"<table><tr><td colspan="99999999999999">a</td>"#,
        r#"<td colspan="99999999999999999999999999">b</td></tr>"#,
        r#"<tr><td rowspan="18446744073709551615">c</td><td colspan="0">d</td></tr></table>"#,
    ));
    let Some(Block::Table(table)) = document.blocks.first() else {
        panic!("expected a table, got {document:?}");
    };
    assert_eq!(table.rows[0].cells[0].colspan, MAX_COLSPAN);
    assert_eq!(table.rows[0].cells[1].colspan, MAX_COLSPAN);
    assert_eq!(table.rows[1].cells[0].rowspan, MAX_ROWSPAN);
    assert_eq!(table.rows[1].cells[1].colspan, 1);
    assert_eq!(table.columns(), 2 * MAX_COLSPAN);

    let text = to_text(&document, &TextOptions::default());
    assert!(text.starts_with("[TABLA]\na |"), "{text}");
    assert!(text.ends_with("[FIN TABLA]"), "{text}");

    let markdown = to_markdown(&document, &MarkdownOptions::default());
    assert!(markdown.contains(r#"colspan="1000""#), "{markdown}");
    assert!(markdown.contains(r#"rowspan="65534""#), "{markdown}");

    let word_doc = to_word_document(&document, "t", &WordOptions::default());
    let Some(WordElement::Table(word_table)) = word_doc.elements.get(1) else {
        panic!("expected a table");
    };
    assert_eq!(word_table.columns, 2 * MAX_COLSPAN);
    assert_eq!(word_table.rows[0].cells[0].grid_span, MAX_COLSPAN);
    assert_eq!(
        word_table.rows[1].cells[0].vertical_merge,
        Some(VerticalMerge::Restart)
    );
    assert_eq!(word_table.rows[1].cells.len(), 2 * MAX_COLSPAN);
}

#[test]
fn test_unclamped_model_spans() {
    let mut wide = TableCell::new(false, vec![para("x")]);
    wide.colspan = usize::MAX;
    wide.rowspan = usize::MAX;
    let document = doc(vec![Block::Table(Table {
        rows: vec![TableRow {
            cells: vec![wide, TableCell::new(false, vec![para("y")])],
        }],
    })]);

    let Some(Block::Table(table)) = document.blocks.first() else {
        unreachable!();
    };
    assert_eq!(table.columns(), MAX_COLSPAN + 1);
    assert_eq!(to_text(&document, &TextOptions::default()).lines().count(), 3);
    assert!(render(&document).contains(r#"colspan="1000" rowspan="65534""#));

    let word_doc = to_word_document(&document, "t", &WordOptions::default());
    let Some(WordElement::Table(word_table)) = word_doc.elements.get(1) else {
        panic!("expected a table");
    };
    assert_eq!(word_table.columns, MAX_COLSPAN + 1);
}

#[test]
fn test_canvas_invalid_json() {
    assert_eq!(
        parse(r#"<div data-type="drawing-canvas" data-strokes="{oops"></div>"#),
        doc(vec![Block::Canvas { strokes: vec![] }])
    );
}

#[test]
fn test_video_sources() {
    let youtube = Block::VideoEmbed(Video {
        provider: VideoProvider::Youtube,
        id: "dQw4w9WgXcQ".into(),
    });
    assert_eq!(
        parse(r#"<iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ"></iframe>"#),
        doc(vec![youtube.clone()])
    );
    assert_eq!(
        parse(r#"<div data-youtube-video=""><iframe src="https://youtu.be/dQw4w9WgXcQ"></iframe></div>"#),
        doc(vec![youtube])
    );
    assert_eq!(
        parse(r#"<iframe src="https://example.com/player"></iframe>"#),
        doc(vec![Block::VideoEmbed(Video {
            provider: VideoProvider::Other,
            id: "https://example.com/player".into(),
        })])
    );
}

#[test]
fn test_details_without_content_slot() {
    assert_eq!(
        parse("<details><summary>Title</summary><p>Body</p></details>"),
        doc(vec![Block::Details(Details {
            open: false,
            summary: vec![Inline::text("Title")],
            content: vec![para("Body")],
        })])
    );
}

#[test]
fn test_nested_list_in_list() {
    assert_eq!(
        parse("<ul><li>a</li><ul><li>b</li></ul></ul>"),
        doc(vec![Block::BulletList(vec![ListItem::new(vec![
            para("a"),
            Block::BulletList(vec![item("b")]),
        ])])])
    );
}
