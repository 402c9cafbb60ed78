//! Common types for the conversion system.

use std::path::Path;

use ecow::EcoString;

use crate::Result;
use crate::ir::Document;

/// Valid output formats for the conversion.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Canonical markup wrapped in a standalone page.
    Html,
    #[default]
    Md,
    Text,
    #[cfg(feature = "docx")]
    Docx,
}

impl Format {
    /// The file extension of the format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Md => "md",
            Format::Text => "txt",
            #[cfg(feature = "docx")]
            Format::Docx => "docx",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(Format::Html),
            "md" | "markdown" => Some(Format::Md),
            "txt" | "text" => Some(Format::Text),
            #[cfg(feature = "docx")]
            "docx" => Some(Format::Docx),
            _ => None,
        }
    }
}

/// Valid input formats for the conversion.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Editor markup.
    #[default]
    Html,
    Markdown,
    Text,
    /// Raw or extracted PDF text, reconstructed by the salvage importer.
    PdfText,
}

impl InputFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(InputFormat::Html),
            "md" | "markdown" => Some(InputFormat::Markdown),
            "txt" | "text" => Some(InputFormat::Text),
            "pdf" | "pdftxt" => Some(InputFormat::PdfText),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// A writer that serializes a [`Document`] into one output format.
pub trait FormatWriter {
    /// Writes a textual rendering into `output`.
    fn write_eco(&mut self, document: &Document, output: &mut EcoString) -> Result<()>;

    /// Writes the file contents.
    fn write_vec(&mut self, document: &Document) -> Result<Vec<u8>>;
}
