use super::*;
use crate::ir::{Details, Stroke, Video, VideoProvider};
use crate::writer::TextWriter;

fn to_txt(blocks: Vec<Block>) -> String {
    to_text(&doc(blocks), &TextOptions::default())
}

#[test]
fn test_table() {
    insta::assert_snapshot!(txt("<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>"), @r"
    [TABLA]
    A | B
    --+--
    1 | 2
    [FIN TABLA]
    ");
}

#[test]
fn test_table_padding() {
    insta::assert_snapshot!(txt(
        r#"<table><tr><th colspan="2">Wide</th></tr><tr><td>1</td><td>2</td></tr></table>"#
    ), @r"
    [TABLA]
    Wide |
    -----+--
    1    | 2
    [FIN TABLA]
    ");
}

#[test]
fn test_table_row_spans() {
    let text = txt(concat!(
        "<table><tr><th>A</th><th>B</th><th>C</th></tr>",
        r#"<tr><td rowspan="2">r</td><td>1</td><td>2</td></tr>"#,
        "<tr><td>3</td><td>4</td></tr>",
        r#"<tr><td>x</td><td colspan="2" rowspan="2">wide</td></tr>"#,
        "<tr><td>y</td></tr></table>",
    ));
    assert_eq!(
        text,
        [
            "[TABLA]",
            "A | B    | C",
            "--+------+--",
            "r | 1    | 2",
            "  | 3    | 4",
            "x | wide |",
            "y |      |",
            "[FIN TABLA]",
        ]
        .join("\n")
    );
}

#[test]
fn test_headings() {
    let options = TextOptions {
        heading_rule_width: 5,
        ..TextOptions::default()
    };
    let heading = |level| Block::Heading {
        level,
        content: vec![Inline::text("Title")],
    };
    let document = doc(vec![heading(1), heading(2), heading(3), heading(4), heading(6)]);
    insta::assert_snapshot!(to_text(&document, &options), @r"
    =====
    Title
    =====

    -----
    Title
    -----

    *** Title ***

    ** Title **

    * Title *
    ");
}

#[test]
fn test_lists() {
    insta::assert_snapshot!(txt(
        r#"<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul><ol start="3"><li>x</li><li>y</li></ol>"#
    ), @r"
    • a
      • b
    • c

    3. x
    4. y
    ");
    assert_eq!(
        to_txt(vec![Block::TaskList(vec![
            ListItem::task(true, vec![para("Done")]),
            ListItem::task(false, vec![para("Todo")]),
        ])]),
        "☑ Done\n☐ Todo"
    );
}

#[test]
fn test_links() {
    assert_eq!(
        txt(r#"<p>Visit <a href="https://a.com">our <b>site</b></a> or <a href="https://b.com">https://b.com</a></p>"#),
        "Visit our site (https://a.com) or https://b.com"
    );
}

#[test]
fn test_quote_code_rule() {
    assert_eq!(
        to_txt(vec![
            Block::Blockquote(vec![para("a"), para("b")]),
            Block::CodeBlock {
                language: Some("rust".into()),
                code: "let x = 1;\nlet y = 2;\n".into(),
            },
            Block::HorizontalRule,
        ]),
        format!("> a\n>\n> b\n\n    let x = 1;\n    let y = 2;\n\n{}", "-".repeat(40))
    );
}

#[test]
fn test_placeholders() {
    insta::assert_snapshot!(to_txt(vec![
        Block::Image {
            src: "https://example.com/cat.png".into(),
            alt: "A cat".into(),
            title: None,
        },
        Block::Image {
            src: "https://example.com/dog.png".into(),
            alt: "".into(),
            title: None,
        },
        Block::VideoEmbed(Video {
            provider: VideoProvider::Youtube,
            id: "dQw4w9WgXcQ".into(),
        }),
        Block::Canvas {
            strokes: vec![
                Stroke { path: "M0 0".into(), color: "#000000".into(), width: 2.0 },
                Stroke { path: "M1 1".into(), color: "#000000".into(), width: 2.0 },
            ],
        },
        Block::Details(Details {
            open: false,
            summary: vec![Inline::text("More")],
            content: vec![para("hidden")],
        }),
        Block::MathBlock { latex: " x^2 ".into() },
    ]), @r"
    [IMAGEN: A cat - https://example.com/cat.png]

    [IMAGEN: https://example.com/dog.png]

    [VIDEO: https://www.youtube.com/watch?v=dQw4w9WgXcQ]

    [DIBUJO: 2 trazos]

    [DESPLEGABLE: More]
    hidden
    [FIN DESPLEGABLE]

    x^2
    ");
}

#[test]
fn test_english_labels() {
    let options = TextOptions {
        locale: Locale::En,
        ..TextOptions::default()
    };
    let document = doc(vec![
        table(&[&["A"]]),
        Block::Image {
            src: "cat.png".into(),
            alt: "".into(),
            title: None,
        },
        Block::Canvas { strokes: vec![] },
    ]);
    insta::assert_snapshot!(to_text(&document, &options), @r"
    [TABLE]
    A
    [END TABLE]

    [IMAGE: cat.png]

    [DRAWING: 0 strokes]
    ");
}

#[test]
fn test_whitespace_and_entities() {
    assert_eq!(
        to_txt(vec![Block::Paragraph(vec![
            Inline::text("a   b\tc &amp; d &lt;e&gt;"),
            Inline::HardBreak,
            Inline::HardBreak,
            Inline::HardBreak,
            Inline::text("after   "),
        ])]),
        "a b c & d <e>\n\nafter"
    );
    // Entities are decoded once more after import.
    assert_eq!(txt("<p>Tom &amp;amp; Jerry</p>"), "Tom & Jerry");
}

#[test]
fn test_atoms() {
    assert_eq!(
        txt(r#"<p><span data-type="mention" data-kind="tag" data-id="t1" data-label="rust">#rust</span> <span data-type="emoji" data-name="tada">:tada:</span> <span data-type="inline-math" data-latex="x_1">x_1</span></p>"#),
        "#rust :tada: x_1"
    );
}

#[test]
fn test_writer_newline() {
    let mut writer = TextWriter::default();
    assert_eq!(writer.write_vec(&doc(vec![para("Hola")])).unwrap(), b"Hola\n");
    assert_eq!(writer.write_vec(&doc(vec![])).unwrap(), b"");
}
