use super::*;
use crate::options::SalvageOptions;
use crate::salvage::{Extractor, LineKind, classify, decode_literal};

fn salvage(raw: &str) -> Salvage {
    reconstruct(raw, &SalvageOptions::default())
}

fn heading(level: u8, text: &str) -> Block {
    Block::Heading {
        level,
        content: vec![Inline::text(text)],
    }
}

#[test]
fn test_too_short() {
    let outcome = salvage("12 34");
    assert!(!outcome.is_recovered());
    assert_eq!(
        outcome,
        Salvage::NoExtractableContent {
            notice: Locale::Es.labels().no_content.into(),
        }
    );

    let options = SalvageOptions {
        locale: Locale::En,
        ..SalvageOptions::default()
    };
    assert_eq!(
        reconstruct("", &options).into_document(),
        doc(vec![para(Locale::En.labels().no_content)])
    );
}

#[test]
fn test_garbage_guard() {
    let noise = format!("{} hola", "\u{fffd}".repeat(20));
    assert!(!salvage(&noise).is_recovered());

    let options = SalvageOptions {
        max_garbage_ratio: 1.0,
        ..SalvageOptions::default()
    };
    assert!(reconstruct(&noise, &options).is_recovered());
}

#[test]
fn test_structure() {
    let text = "INTRODUCCIÓN\r\n\r\nEste   es el primer\tpárrafo del informe.\n- uno\n• dos\n1.2 Alcance del trabajo\nFin.";
    assert_eq!(
        salvage(text).into_document(),
        doc(vec![
            heading(2, "INTRODUCCIÓN"),
            para("Este es el primer párrafo del informe."),
            Block::BulletList(vec![item("uno"), item("dos")]),
            heading(3, "1.2 Alcance del trabajo"),
            para("Fin."),
        ])
    );
}

#[test]
fn test_classify() {
    assert_eq!(
        classify("RESUMEN EJECUTIVO"),
        LineKind::Heading2("RESUMEN EJECUTIVO")
    );
    assert_eq!(
        classify("Capítulo 3 Resultados"),
        LineKind::Heading3("Capítulo 3 Resultados")
    );
    assert_eq!(classify("Section IV"), LineKind::Heading3("Section IV"));
    assert_eq!(classify("• punto"), LineKind::ListItem("punto"));
    assert_eq!(classify("a) opción"), LineKind::ListItem("opción"));
    assert_eq!(classify("12. paso"), LineKind::ListItem("paso"));
    assert_eq!(classify("Texto normal."), LineKind::Paragraph("Texto normal."));
    assert_eq!(classify("2024 - 2025"), LineKind::Paragraph("2024 - 2025"));

    let shouting = "ESTA LINEA EN MAYUSCULAS ES DEMASIADO LARGA PARA SER UN TITULO";
    assert_eq!(classify(shouting), LineKind::Paragraph(shouting));
}

#[test]
fn test_operators() {
    let raw = "BT /F1 12 Tf 72 712 Td (Hello) Tj ET\nBT 72 690 Td [(Wor) -50 (ld) -250 (again)] TJ ET";
    assert_eq!(
        salvage(raw).into_document(),
        doc(vec![para("Hello"), para("World again")])
    );
}

#[test]
fn test_operators_same_line() {
    let raw = "BT (Primera parte) Tj (segunda parte) Tj ET";
    assert_eq!(
        salvage(raw).into_document(),
        doc(vec![para("Primera parte segunda parte")])
    );
}

#[test]
fn test_keywords_dropped() {
    let raw = "%PDF-1.4\n1 0 obj\nstream\nBT (obj) Tj (---) Tj (Texto real del documento) Tj ET\nendstream";
    assert_eq!(
        salvage(raw).into_document(),
        doc(vec![para("Texto real del documento")])
    );
}

#[test]
fn test_extractor_selection() {
    let raw = "BT (Texto simple aqui) Tj [(Solo) -300 (arreglo)] TJ ET";
    let options = SalvageOptions {
        extractors: vec![Extractor::ShowText],
        ..SalvageOptions::default()
    };
    assert_eq!(
        reconstruct(raw, &options).into_document(),
        doc(vec![para("Texto simple aqui")])
    );
    assert_eq!(
        salvage(raw).into_document(),
        doc(vec![para("Texto simple aqui Solo arreglo")])
    );

    let extractor: Extractor = serde_json::from_str("\"show_text_array\"").unwrap();
    assert_eq!(extractor, Extractor::ShowTextArray);
}

#[test]
fn test_decode_literal() {
    assert_eq!(decode_literal(br"\(x\) \\ y\n\101"), "(x) \\ y\nA");
    assert_eq!(decode_literal(b"una \\\nlinea"), "una linea");
    assert_eq!(decode_literal(br"\q"), "q");
    // A lone byte above 0x7f is not UTF-8 and reads as Latin-1.
    assert_eq!(decode_literal(br"Caf\351"), "Café");
    assert_eq!(decode_literal("Café".as_bytes()), "Café");
}

#[test]
fn test_truncate() {
    let options = SalvageOptions {
        max_input_bytes: 12,
        ..SalvageOptions::default()
    };
    assert_eq!(
        reconstruct("Texto largoñandú", &options).into_document(),
        doc(vec![para("Texto largo")])
    );
}
