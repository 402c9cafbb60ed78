//! Writer implementations for different output formats

pub mod docx;
pub mod html;
pub mod markdown;
pub mod text;

#[cfg(feature = "docx")]
pub use self::docx::DocxWriter;
pub use self::docx::{WordDoc, to_word_document};
pub use html::HtmlWriter;
pub use markdown::{MarkdownWriter, to_markdown};
pub use text::{TextWriter, to_text};

use ecow::EcoString;

use crate::common::{Format, FormatWriter};
use crate::options::ConvertOptions;

/// Create a writer instance based on the specified format
pub fn create_writer(
    format: Format,
    options: &ConvertOptions,
    title: Option<EcoString>,
) -> Box<dyn FormatWriter> {
    match format {
        Format::Html => Box::new(HtmlWriter::new(title)),
        Format::Md => Box::new(MarkdownWriter::new(options.markdown.clone())),
        Format::Text => Box::new(TextWriter::new(options.text.clone())),
        #[cfg(feature = "docx")]
        Format::Docx => Box::new(DocxWriter::new(
            title.unwrap_or_default(),
            options.word.clone(),
        )),
    }
}
