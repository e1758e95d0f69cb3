//! Error types for the export pipeline.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for export operations.
///
/// Every variant is fatal to the whole run; the CLI maps each failure class
/// onto a distinct process exit code via [`ExportError::exit_code`].
#[derive(Error, Debug)]
pub enum ExportError {
    /// The ODBC driver manager itself could not be initialized.
    #[error(
        "ODBC environment unavailable: {0}. \
         Make sure an ODBC driver manager is installed \
         (unixODBC on Linux/macOS; built in on Windows)."
    )]
    Environment(String),

    /// No Microsoft Access ODBC driver is installed.
    #[error(
        "no Microsoft Access ODBC driver found. \
         Install the Access Database Engine redistributable and retry."
    )]
    DriverNotFound,

    /// The database file does not exist.
    #[error("database not found: {0}")]
    SourceNotFound(PathBuf),

    /// Invalid command-line input.
    #[error("{0}")]
    Usage(String),

    /// The data source rejected the connection.
    #[error("ODBC connection failed: {0}")]
    Connect(String),

    /// Catalog enumeration or a query against an object failed.
    #[error("{context}: {message}")]
    Query { context: String, message: String },

    /// Nothing left to export after selection.
    #[error("no tables or views to export")]
    EmptySelection,

    /// Creating the output directory or writing an output file failed.
    #[error("write failed for {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl ExportError {
    /// Create a Query error with context about where it occurred.
    pub fn query(context: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ExportError::Query {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a Write error for a filesystem path.
    pub fn write(path: impl AsRef<Path>, message: impl std::fmt::Display) -> Self {
        ExportError::Write {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Process exit code for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExportError::Environment(_)
            | ExportError::DriverNotFound
            | ExportError::SourceNotFound(_)
            | ExportError::Usage(_) => 2,
            ExportError::Connect(_) | ExportError::Query { .. } => 3,
            ExportError::EmptySelection => 4,
            ExportError::Write { .. } => 5,
        }
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
