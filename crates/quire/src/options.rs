//! Configuration passed explicitly into the converters.
//!
//! Every struct is immutable once built, `Default`-constructed and loadable
//! from a TOML file with missing keys falling back to their defaults.

use serde::Deserialize;

use crate::salvage::Extractor;
use crate::writer::docx::PageGeometry;

/// Language of the labels written by the text, Word and salvage outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

/// Words used in placeholders and bracketed markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub table: &'static str,
    pub table_end: &'static str,
    pub image: &'static str,
    pub video: &'static str,
    pub drawing: &'static str,
    pub strokes: &'static str,
    pub details: &'static str,
    pub details_end: &'static str,
    pub page: &'static str,
    pub no_content: &'static str,
}

static ES: Labels = Labels {
    table: "Tabla",
    table_end: "Fin tabla",
    image: "Imagen",
    video: "Video",
    drawing: "Dibujo",
    strokes: "trazos",
    details: "Desplegable",
    details_end: "Fin desplegable",
    page: "Página",
    no_content: "No se pudo extraer texto legible de este documento. \
                 Es posible que sea un documento escaneado o que su texto esté dañado.",
};

static EN: Labels = Labels {
    table: "Table",
    table_end: "End table",
    image: "Image",
    video: "Video",
    drawing: "Drawing",
    strokes: "strokes",
    details: "Details",
    details_end: "End details",
    page: "Page",
    no_content: "No readable text could be extracted from this document. \
                 It may be a scanned document or its text may be damaged.",
};

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::Es => &ES,
            Locale::En => &EN,
        }
    }
}

/// Markdown export settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Marker of bullet and task items, `-` or `*`.
    pub bullet: char,
    /// Escape characters that would otherwise start Markdown syntax.
    pub escape_special_chars: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            bullet: '-',
            escape_special_chars: true,
        }
    }
}

/// Plain-text export settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    pub locale: Locale,
    /// Width of the rules framing level 1 and 2 headings.
    pub heading_rule_width: usize,
    /// Width of a horizontal rule.
    pub rule_width: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            heading_rule_width: 60,
            rule_width: 40,
        }
    }
}

/// Word document settings.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct WordOptions {
    pub locale: Locale,
    pub page: PageGeometry,
}

/// Salvage importer settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SalvageOptions {
    pub locale: Locale,
    /// Extraction strategies, applied in order and unioned.
    pub extractors: Vec<Extractor>,
    /// Cleaned text shorter than this is rejected.
    pub min_chars: usize,
    /// Share of characters outside the whitelist above which the text is
    /// rejected as garbage.
    pub max_garbage_ratio: f64,
    /// Input beyond this many bytes is ignored.
    pub max_input_bytes: usize,
}

impl Default for SalvageOptions {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            extractors: vec![
                Extractor::ShowText,
                Extractor::ShowTextArray,
                Extractor::PositionedText,
            ],
            min_chars: 10,
            max_garbage_ratio: 0.30,
            max_input_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Settings of every converter.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub markdown: MarkdownOptions,
    pub text: TextOptions,
    pub word: WordOptions,
    pub salvage: SalvageOptions,
}

impl ConvertOptions {
    /// Sets the locale of every localized output.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.text.locale = locale;
        self.word.locale = locale;
        self.salvage.locale = locale;
        self
    }
}
