//! Command line converter between editor markup, Markdown, plain text, PDF
//! text and Word documents.

use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::warn;
use quire::export::default_output_path;
use quire::{ConvertOptions, Format, InputFormat, Locale, Salvage, export_document, import};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LocaleArg {
    Es,
    En,
}

impl From<LocaleArg> for Locale {
    fn from(locale: LocaleArg) -> Self {
        match locale {
            LocaleArg::Es => Locale::Es,
            LocaleArg::En => Locale::En,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputArg {
    Html,
    Markdown,
    Text,
    Pdf,
}

impl From<InputArg> for InputFormat {
    fn from(format: InputArg) -> Self {
        match format {
            InputArg::Html => InputFormat::Html,
            InputArg::Markdown => InputFormat::Markdown,
            InputArg::Text => InputFormat::Text,
            InputArg::Pdf => InputFormat::PdfText,
        }
    }
}

/// Converts a document between formats.
#[derive(Debug, Clone, Parser)]
#[clap(name = "quire", version)]
pub struct ConvertArgs {
    /// Path to input file, `-` for stdin
    #[clap(value_name = "INPUT")]
    pub input: String,

    /// Path to output file, `-` for stdout. The extension selects the
    /// format (`html`, `md`, `txt`, `docx`)
    #[clap(value_name = "OUTPUT", default_value = None)]
    pub output: Option<String>,

    /// Input format, guessed from the input extension by default
    #[clap(long, value_enum, value_name = "FORMAT")]
    from: Option<InputArg>,

    /// Output format when writing to stdout
    #[clap(long, value_name = "EXT", default_value = "md")]
    to: String,

    /// Language of placeholders and labels
    #[clap(long, value_enum, env = "QUIRE_LOCALE")]
    locale: Option<LocaleArg>,

    /// Document title, used in headers and file names
    #[clap(long, value_name = "TITLE")]
    title: Option<String>,

    /// TOML file with converter options
    #[clap(long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse command line arguments
    let args = ConvertArgs::parse();
    run(args)
}

fn load_options(args: &ConvertArgs) -> Result<ConvertOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {path:?}"))?;
            toml::from_str(&content).with_context(|| format!("failed to parse config {path:?}"))?
        }
        None => ConvertOptions::default(),
    };
    if let Some(locale) = args.locale {
        options = options.with_locale(locale.into());
    }
    Ok(options)
}

fn run(args: ConvertArgs) -> Result<()> {
    let options = load_options(&args)?;

    let is_stdin = args.input == "-";
    let input_path = Path::new(&args.input);
    let input = if is_stdin {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read from stdin")?;
        input
    } else {
        let bytes = std::fs::read(input_path)
            .with_context(|| format!("failed to read file {input_path:?}"))?;
        String::from_utf8_lossy(&bytes).into_owned()
    };

    let input_format = match args.from {
        Some(format) => format.into(),
        None if is_stdin => InputFormat::default(),
        None => InputFormat::from_path(input_path).unwrap_or_default(),
    };

    let is_stdout = args.output.as_deref() == Some("-");
    let output_path = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(input_path, Format::Md));
    if !is_stdin && !is_stdout && is_same_file(input_path, &output_path) {
        bail!("refusing to overwrite input file {input_path:?}");
    }
    let output_ext = if is_stdout {
        args.to.as_str()
    } else {
        output_path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("md")
    };
    let Some(output_format) = Format::from_extension(output_ext) else {
        bail!("unsupported output format: {output_ext}");
    };

    let document = if input_format == InputFormat::PdfText {
        match quire::reconstruct(&input, &options.salvage) {
            Salvage::Recovered(document) => document,
            notice @ Salvage::NoExtractableContent { .. } => {
                warn!("no extractable content in {}", args.input);
                notice.into_document()
            }
        }
    } else {
        import(&input, input_format, &options)
    };

    let title = args.title.clone().unwrap_or_else(|| {
        input_path
            .file_stem()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or_default()
            .to_string()
    });

    let file = export_document(&document, &title, output_format, &options)
        .with_context(|| format!("failed to convert {}", args.input))?;

    if is_stdout {
        std::io::stdout()
            .write_all(&file.bytes)
            .context("failed to write to stdout")?;
    } else if let Err(err) = std::fs::write(&output_path, &file.bytes) {
        bail!("failed to write file {output_path:?}: {err}");
    }

    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
