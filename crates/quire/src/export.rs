//! Export and import entry points used at the edges.

use std::path::{Path, PathBuf};

use ecow::EcoString;
use log::debug;

use crate::common::{Format, InputFormat};
use crate::ir::Document;
use crate::options::ConvertOptions;
use crate::writer::{create_writer, html};
use crate::{Error, Result, parser, salvage};

/// Name given to files exported without a usable title.
const FALLBACK_FILE_STEM: &str = "document";

/// An exported file, named `{title}.{ext}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Makes a title usable as a file stem. Path separators, reserved and
/// control characters become `_`.
pub fn sanitize_title(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if stem.is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// Output file next to `input` with the extension of `format`. An input that
/// already has that extension gets a `.converted` infix instead of being
/// replaced.
pub fn default_output_path(input: &Path, format: Format) -> PathBuf {
    let output = input.with_extension(format.extension());
    if output != input {
        return output;
    }
    let stem = input
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or(FALLBACK_FILE_STEM);
    input.with_file_name(format!("{stem}.converted.{}", format.extension()))
}

/// Whether markup has nothing worth exporting: it is empty, or renders to
/// nothing or a single empty paragraph.
pub fn is_empty_content(markup: &str) -> bool {
    let markup = markup.trim();
    if markup.is_empty() || markup == "<p></p>" {
        return true;
    }
    let rendered = html::render(&parser::parse(markup));
    let rendered = rendered.trim();
    rendered.is_empty() || rendered == "<p></p>"
}

/// Converts editor markup into a file of the given format.
///
/// Empty content short-circuits with [`Error::no_content`] before any
/// converter runs.
pub fn export(
    markup: &str,
    title: &str,
    format: Format,
    options: &ConvertOptions,
) -> Result<ExportFile> {
    if is_empty_content(markup) {
        return Err(Error::no_content());
    }
    export_document(&parser::parse(markup), title, format, options)
}

/// Converts a document into a file of the given format.
pub fn export_document(
    document: &Document,
    title: &str,
    format: Format,
    options: &ConvertOptions,
) -> Result<ExportFile> {
    if document.is_empty() {
        return Err(Error::no_content());
    }

    let title = EcoString::from(title.trim());
    let mut writer = create_writer(format, options, Some(title.clone()));
    let bytes = writer.write_vec(document)?;
    let file_name = format!("{}.{}", sanitize_title(&title), format.extension());
    debug!("exported {file_name} ({} bytes)", bytes.len());

    Ok(ExportFile { file_name, bytes })
}

/// Reads input of any supported format into a document. Salvage imports
/// that find no content yield the explanatory notice as the document.
pub fn import(input: &str, format: InputFormat, options: &ConvertOptions) -> Document {
    match format {
        InputFormat::Html => parser::parse(input),
        InputFormat::Markdown => parser::from_markdown(input),
        InputFormat::Text => parser::from_plain_text(input),
        InputFormat::PdfText => salvage::reconstruct(input, &options.salvage).into_document(),
    }
}
