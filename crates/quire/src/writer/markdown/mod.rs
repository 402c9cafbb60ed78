//! Markdown writer implementation.

mod emit;
mod escape;

mod lists;
mod tables;

use ecow::EcoString;

use crate::Result;
use crate::common::FormatWriter;
use crate::ir;
use crate::options::MarkdownOptions;

/// Renders a document as Markdown, without a trailing newline.
pub fn to_markdown(document: &ir::Document, options: &MarkdownOptions) -> String {
    emit::IrMarkdownEmitter { options }.write_document(document)
}

/// Markdown writer implementation.
#[derive(Default)]
pub struct MarkdownWriter {
    options: MarkdownOptions,
}

impl MarkdownWriter {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }
}

impl FormatWriter for MarkdownWriter {
    fn write_eco(&mut self, document: &ir::Document, output: &mut EcoString) -> Result<()> {
        let markdown = to_markdown(document, &self.options);
        output.push_str(&markdown);
        if !markdown.is_empty() {
            output.push('\n');
        }
        Ok(())
    }

    fn write_vec(&mut self, document: &ir::Document) -> Result<Vec<u8>> {
        let mut output = EcoString::new();
        self.write_eco(document, &mut output)?;
        Ok(output.as_bytes().to_vec())
    }
}
