//! Run configuration and formatting options.
//!
//! Everything here is resolved from command-line tokens before any ODBC work
//! starts, so bad input fails fast with a usage error.

use std::path::PathBuf;

use encoding_rs::Encoding;

use crate::error::{ExportError, Result};

/// Default output directory name.
pub const DEFAULT_OUT_DIR: &str = "export";

/// Default rows fetched per ODBC round-trip.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Where the rows come from: a database file or a pre-registered data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Direct path to an `.mdb`/`.accdb` file.
    File(PathBuf),
    /// Named ODBC data source with optional credentials.
    Dsn {
        name: String,
        user: Option<String>,
        password: Option<String>,
    },
}

impl SourceSpec {
    /// Label for logs and the dry-run plan. Never includes credentials.
    pub fn label(&self) -> String {
        match self {
            SourceSpec::File(path) => path.display().to_string(),
            SourceSpec::Dsn { name, .. } => format!("DSN={name}"),
        }
    }
}

/// Line terminator written between records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
    Cr,
    /// Anything else the user asked for, written verbatim.
    Other(String),
}

impl LineEnding {
    /// Map a CLI token onto a terminator.
    ///
    /// `None` means the host platform default; the tokens `\n`, `\r\n` and
    /// `\r` map to their characters; any other value passes through verbatim.
    pub fn resolve(token: Option<&str>) -> Self {
        match token {
            None => Self::native(),
            Some("\\n") => LineEnding::Lf,
            Some("\\r\\n") => LineEnding::CrLf,
            Some("\\r") => LineEnding::Cr,
            Some(other) => LineEnding::Other(other.to_string()),
        }
    }

    /// The host platform's native line ending.
    pub fn native() -> Self {
        if cfg!(windows) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    /// The characters this terminator writes.
    pub fn as_str(&self) -> &str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
            LineEnding::Other(s) => s,
        }
    }

    /// Terminator as the csv crate understands it, if it does.
    pub(crate) fn as_csv_terminator(&self) -> Option<csv::Terminator> {
        match self {
            LineEnding::Lf => Some(csv::Terminator::Any(b'\n')),
            LineEnding::CrLf => Some(csv::Terminator::CRLF),
            LineEnding::Cr => Some(csv::Terminator::Any(b'\r')),
            LineEnding::Other(_) => None,
        }
    }
}

/// Text serialization options shared by every output file of a run.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Output text encoding.
    pub encoding: &'static Encoding,
    /// Record terminator.
    pub line_ending: LineEnding,
}

impl FormatOptions {
    /// Resolve raw CLI tokens into concrete options.
    pub fn resolve(delimiter: &str, encoding: &str, lineterm: Option<&str>) -> Result<Self> {
        Ok(Self {
            delimiter: resolve_delimiter(delimiter)?,
            encoding: resolve_encoding(encoding)?,
            line_ending: LineEnding::resolve(lineterm),
        })
    }
}

/// Map the delimiter token onto a single byte. The literal token `\t` means tab.
fn resolve_delimiter(token: &str) -> Result<u8> {
    let mapped = if token == "\\t" { "\t" } else { token };
    match mapped.as_bytes() {
        [b] => Ok(*b),
        _ => Err(ExportError::Usage(format!(
            "delimiter must be a single character, got {token:?}"
        ))),
    }
}

/// Look up an encoding by its WHATWG label (`utf-8`, `windows-1252`, `latin1`, ...).
fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ExportError::Usage(format!("unknown encoding: {label:?}")))
}

/// Fully resolved inputs for one run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub source: SourceSpec,
    pub out_dir: PathBuf,
    /// Explicit object selection; `None` exports the whole catalog.
    pub tables: Option<Vec<String>>,
    pub include_views: bool,
    pub format: FormatOptions,
    /// Rows fetched per ODBC round-trip.
    pub batch_size: usize,
    /// Print the plan, write nothing.
    pub dry_run: bool,
}

impl ExportConfig {
    /// Check invariants the CLI layer cannot express in types.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ExportError::Usage("batch size must be at least 1".into()));
        }
        Ok(())
    }
}
