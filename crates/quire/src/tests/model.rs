use super::*;
use crate::attributes::{normalize_color, parse_strokes, parse_video_url, semantic_highlight};
use crate::ir::{MarkSet, MentionKind, VideoProvider, clamp_heading_level};

#[test]
fn test_mark_set_order() {
    let link = Mark::Link {
        href: "https://example.com".into(),
        target: None,
    };
    let a: MarkSet = [link.clone(), Mark::Italic, Mark::Bold].into_iter().collect();
    let b: MarkSet = [Mark::Bold, link, Mark::Italic, Mark::Bold].into_iter().collect();
    assert_eq!(a, b);
    assert_eq!(
        a.iter().map(Mark::rank).collect::<Vec<_>>(),
        vec![0, 1, 5]
    );
}

#[test]
fn test_mark_set_replaces_same_kind() {
    let marks = MarkSet::new()
        .with(Mark::TextColor { hex: "#ff0000".into() })
        .with(Mark::TextColor { hex: "#0000ff".into() })
        .with(Mark::Subscript)
        .with(Mark::Superscript);
    assert_eq!(
        marks.iter().cloned().collect::<Vec<_>>(),
        vec![Mark::TextColor { hex: "#0000ff".into() }, Mark::Superscript]
    );
}

#[test]
fn test_normalize_merges_text() {
    let document = doc(vec![
        Block::Paragraph(vec![
            Inline::text("Hello"),
            Inline::text(""),
            Inline::text(", "),
            bold("big"),
            bold(" world"),
        ]),
        Block::Paragraph(vec![]),
        Block::Paragraph(vec![]),
        Block::Heading {
            level: 9,
            content: vec![Inline::text("Deep")],
        },
    ]);
    assert_eq!(
        document.normalize(),
        doc(vec![
            Block::Paragraph(vec![Inline::text("Hello, "), bold("big world")]),
            Block::Paragraph(vec![]),
            Block::Heading {
                level: 6,
                content: vec![Inline::text("Deep")],
            },
        ])
    );
}

#[test]
fn test_heading_level_clamp() {
    assert_eq!(clamp_heading_level(0), 1);
    assert_eq!(clamp_heading_level(-3), 1);
    assert_eq!(clamp_heading_level(4), 4);
    assert_eq!(clamp_heading_level(9), 6);
}

#[test]
fn test_plain_text() {
    let document = doc(vec![
        Block::Heading {
            level: 1,
            content: vec![Inline::text("Title")],
        },
        Block::BulletList(vec![item("one"), item("two")]),
        table(&[&["A", "B"], &["1", "2"]]),
        Block::Paragraph(vec![
            Inline::Mention {
                kind: MentionKind::User,
                id: "u1".into(),
                label: "ana".into(),
            },
            Inline::text(" says hi"),
        ]),
    ]);
    assert_eq!(
        document.plain_text(),
        "Title\none\ntwo\nA\tB\n1\t2\n@ana says hi\n"
    );
}

#[test]
fn test_is_empty() {
    assert!(doc(vec![]).is_empty());
    assert!(doc(vec![Block::Paragraph(vec![])]).is_empty());
    assert!(!doc(vec![para("x")]).is_empty());
    assert!(!doc(vec![Block::HorizontalRule]).is_empty());
}

#[test]
fn test_video_urls() {
    let video = parse_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10");
    assert_eq!(video.provider, VideoProvider::Youtube);
    assert_eq!(video.id, "dQw4w9WgXcQ");
    assert_eq!(video.url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    assert_eq!(
        video.thumbnail_url().as_deref(),
        Some("https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg")
    );

    let video = parse_video_url("https://youtu.be/dQw4w9WgXcQ");
    assert_eq!(video.provider, VideoProvider::Youtube);

    let video = parse_video_url("https://player.vimeo.com/video/76979871");
    assert_eq!(video.provider, VideoProvider::Vimeo);
    assert_eq!(video.url(), "https://vimeo.com/76979871");
    assert_eq!(video.thumbnail_url(), None);

    let video = parse_video_url("https://example.com/clip.mp4");
    assert_eq!(video.provider, VideoProvider::Other);
    assert_eq!(video.id, "https://example.com/clip.mp4");
}

#[test]
fn test_colors() {
    assert_eq!(normalize_color("#F00").as_deref(), Some("#ff0000"));
    assert_eq!(normalize_color("rgb(255, 242, 204)").as_deref(), Some("#fff2cc"));
    assert_eq!(normalize_color("rgba(0, 0, 0, 0)"), None);
    assert_eq!(normalize_color("transparent"), None);
    assert_eq!(normalize_color("Yellow").as_deref(), Some("#ffff00"));

    assert_eq!(semantic_highlight("#ffff00"), None);
    assert_eq!(semantic_highlight("#f4cccc").as_deref(), Some("red"));
    assert_eq!(semantic_highlight("#cfe2f3").as_deref(), Some("blue"));
    assert_eq!(semantic_highlight("#d9ead3").as_deref(), Some("green"));
    assert_eq!(semantic_highlight("#123456").as_deref(), Some("#123456"));
}

#[test]
fn test_strokes() {
    let strokes = parse_strokes(Some(r##"[{"path":"M0 0 L10 10","color":"#ff0000"}]"##));
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].color, "#ff0000");
    assert_eq!(strokes[0].width, 2.0);

    assert!(parse_strokes(Some("{not json")).is_empty());
    assert!(parse_strokes(Some("")).is_empty());
    assert!(parse_strokes(None).is_empty());
}
