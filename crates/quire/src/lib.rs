//! # Quire
//!
//! A rich-document content model with converters between editor markup,
//! Markdown, plain text and Word documents, plus a salvage importer for text
//! extracted from PDF files.

pub mod attributes;
pub mod batch;
pub mod common;
mod error;
pub mod export;
pub mod ir;
pub mod options;
pub mod parser;
pub mod salvage;
pub mod tags;
pub mod writer;

pub use error::*;

pub use crate::common::{Format, FormatWriter, InputFormat};
pub use crate::export::{ExportFile, export, export_document, import, is_empty_content};
pub use crate::ir::Document;
pub use crate::options::{ConvertOptions, Locale};
pub use crate::parser::{from_markdown, from_plain_text, parse};
pub use crate::salvage::{Salvage, reconstruct};
pub use crate::writer::html::render;
pub use crate::writer::{to_markdown, to_text, to_word_document};

/// The result type for quire.
pub type Result<T, Err = Error> = std::result::Result<T, Err>;
