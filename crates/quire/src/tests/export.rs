use std::path::Path;

use super::*;
use crate::batch::{ExportJob, convert_all};
use crate::export::{default_output_path, sanitize_title};

fn options() -> ConvertOptions {
    ConvertOptions::default()
}

#[test]
fn test_empty_content() {
    assert!(is_empty_content(""));
    assert!(is_empty_content("  \n"));
    assert!(is_empty_content("<p></p>"));
    assert!(is_empty_content("<p></p><p></p>"));
    assert!(is_empty_content("<div><span></span></div>"));
    assert!(!is_empty_content("<p>Hola</p>"));
    assert!(!is_empty_content("<hr>"));
}

#[test]
fn test_export_markdown() {
    let file = export("<p>Hola</p>", "Mi/informe", Format::Md, &options()).unwrap();
    assert_eq!(file.file_name, "Mi_informe.md");
    assert_eq!(file.bytes, b"Hola\n");
}

#[test]
fn test_export_text_and_html() {
    let file = export("<h3>Hola</h3>", " Informe ", Format::Text, &options()).unwrap();
    assert_eq!(file.file_name, "Informe.txt");
    assert_eq!(file.bytes, "*** Hola ***\n".as_bytes());

    let file = export("<p>Hola</p>", "Mi informe", Format::Html, &options()).unwrap();
    assert_eq!(file.file_name, "Mi informe.html");
    let page = String::from_utf8(file.bytes).unwrap();
    assert!(page.starts_with("<!DOCTYPE html>"), "{page}");
    assert!(page.contains("<title>Mi informe</title>"), "{page}");
    assert!(page.contains("<p>Hola</p>"), "{page}");
}

#[cfg(feature = "docx")]
#[test]
fn test_export_docx() {
    let file = export("<p>Hola</p>", "Informe", Format::Docx, &options()).unwrap();
    assert_eq!(file.file_name, "Informe.docx");
    assert!(file.bytes.starts_with(b"PK"));

    let mut writer = crate::writer::create_writer(Format::Docx, &options(), None);
    let mut out = ecow::EcoString::new();
    assert!(writer.write_eco(&doc(vec![para("x")]), &mut out).is_err());
}

#[test]
fn test_no_content() {
    let err = export("<p></p>", "Informe", Format::Md, &options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoContent);
    assert_eq!(err.to_string(), "document has no content to export");

    let err = export_document(&doc(vec![]), "Informe", Format::Text, &options()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoContent);
}

#[test]
fn test_errors() {
    let err = Error::export("pack docx", "zip failure");
    assert_eq!(err.kind(), ErrorKind::Export);
    assert_eq!(err.operation(), Some("pack docx"));
    assert_eq!(err.to_string(), "pack docx failed: zip failure");

    let err = Error::from("plain message");
    assert_eq!(err.kind(), ErrorKind::Other);
    assert_eq!(err.operation(), None);
}

#[test]
fn test_sanitize_title() {
    assert_eq!(sanitize_title("Mi/informe"), "Mi_informe");
    assert_eq!(sanitize_title("  ..a:b?.. "), "a_b_");
    assert_eq!(sanitize_title("tab\there"), "tab_here");
    assert_eq!(sanitize_title(""), "document");
    assert_eq!(sanitize_title(" ... "), "document");
}

#[test]
fn test_default_output_path() {
    assert_eq!(
        default_output_path(Path::new("notes/informe.html"), Format::Md),
        Path::new("notes/informe.md")
    );
    assert_eq!(
        default_output_path(Path::new("notes/informe.md"), Format::Md),
        Path::new("notes/informe.converted.md")
    );
    assert_eq!(
        default_output_path(Path::new("README"), Format::Text),
        Path::new("README.txt")
    );
}

#[test]
fn test_formats() {
    assert_eq!(Format::from_extension("MD"), Some(Format::Md));
    assert_eq!(Format::from_extension("htm"), Some(Format::Html));
    assert_eq!(Format::from_extension("pdf"), None);
    assert_eq!(Format::Text.extension(), "txt");
    assert_eq!(
        InputFormat::from_path(Path::new("notes/scan.pdf")),
        Some(InputFormat::PdfText)
    );
    assert_eq!(InputFormat::from_path(Path::new("README")), None);
}

#[test]
fn test_import() {
    assert_eq!(
        import("# T", InputFormat::Markdown, &options()),
        doc(vec![Block::Heading {
            level: 1,
            content: vec![Inline::text("T")],
        }])
    );
    assert_eq!(
        import("a\n\nb", InputFormat::Text, &options()),
        doc(vec![para("a"), para("b")])
    );
    assert_eq!(
        import("<p>a</p>", InputFormat::Html, &options()),
        doc(vec![para("a")])
    );
    assert_eq!(
        import("12 34", InputFormat::PdfText, &options()),
        doc(vec![para(Locale::Es.labels().no_content)])
    );
}

#[test]
fn test_options() {
    let options: ConvertOptions =
        serde_json::from_str(r#"{"markdown": {"bullet": "*"}, "text": {"locale": "en"}}"#).unwrap();
    assert_eq!(options.markdown.bullet, '*');
    assert!(options.markdown.escape_special_chars);
    assert_eq!(options.text.locale, Locale::En);
    assert_eq!(options.text.heading_rule_width, 60);
    assert_eq!(options.word.locale, Locale::Es);

    let options = options.with_locale(Locale::En);
    assert_eq!(options.word.locale, Locale::En);
    assert_eq!(options.salvage.locale, Locale::En);
}

#[test]
fn test_batch_order() {
    let job = |markup: &str, title: &str, format| ExportJob {
        markup: markup.into(),
        title: title.into(),
        format,
    };
    let jobs = vec![
        job("<p>uno</p>", "a", Format::Md),
        job("<p></p>", "b", Format::Md),
        job("<p>tres</p>", "c", Format::Text),
    ];
    let results = convert_all(&jobs, &options());
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().file_name, "a.md");
    assert_eq!(
        results[1].as_ref().unwrap_err().kind(),
        ErrorKind::NoContent
    );
    assert_eq!(results[2].as_ref().unwrap().bytes, b"tres\n");
}
