//! Word document output.
//!
//! This module is organized into several main components:
//! - Model: the structured [`WordDoc`], independent of any packaging
//! - Builder: conversion of the document model into a [`WordDoc`]
//! - Package: rendering of a [`WordDoc`] to `.docx` bytes (feature `docx`)
//! - Styles: paragraph and character styles of packaged documents

mod builder;
mod model;
#[cfg(feature = "docx")]
mod package;
#[cfg(feature = "docx")]
mod styles;

pub use builder::to_word_document;
#[cfg(test)]
pub(crate) use builder::word_highlight;
pub use model::*;
#[cfg(feature = "docx")]
pub use package::package_docx;

#[cfg(feature = "docx")]
pub use writer::DocxWriter;

#[cfg(feature = "docx")]
mod writer {
    use ecow::EcoString;

    use crate::Result;
    use crate::common::FormatWriter;
    use crate::ir::Document;
    use crate::options::WordOptions;

    use super::{package_docx, to_word_document};

    /// DOCX writer, building a [`super::WordDoc`] and packing it.
    pub struct DocxWriter {
        title: EcoString,
        options: WordOptions,
    }

    impl DocxWriter {
        /// Creates a writer titling documents with `title`.
        pub fn new(title: EcoString, options: WordOptions) -> Self {
            Self { title, options }
        }
    }

    impl FormatWriter for DocxWriter {
        fn write_vec(&mut self, document: &Document) -> Result<Vec<u8>> {
            package_docx(&to_word_document(document, &self.title, &self.options))
        }

        fn write_eco(&mut self, _document: &Document, _output: &mut EcoString) -> Result<()> {
            Err("DOCX format does not support EcoString output".into())
        }
    }
}
