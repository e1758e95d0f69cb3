//! # access-export
//!
//! Stream Microsoft Access tables and views into delimited text files over
//! ODBC.
//!
//! The pipeline is deliberately straight-line:
//!
//! 1. **Connect** by file path (driver resolved from the installed set) or
//!    by DSN plus optional credentials.
//! 2. **Enumerate** tables, and views when asked, skipping system objects.
//! 3. **Select** what the caller requested against what actually exists.
//! 4. **Export** each object: probe the column order, then stream rows in
//!    fixed-size batches into one delimited file per object.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use access_export::{ExportConfig, FormatOptions, SourceSpec};
//!
//! fn main() -> access_export::Result<()> {
//!     let config = ExportConfig {
//!         source: SourceSpec::File(PathBuf::from("northwind.accdb")),
//!         out_dir: PathBuf::from("export"),
//!         tables: None,
//!         include_views: false,
//!         format: FormatOptions::resolve(",", "utf-8", None)?,
//!         batch_size: 10_000,
//!         dry_run: false,
//!     };
//!     let summary = access_export::run(&config)?;
//!     println!("exported {} rows", summary.total_rows);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod connect;
pub mod driver;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod select;
pub mod writer;

// Re-exports for convenient access
pub use catalog::Catalog;
pub use config::{
    ExportConfig, FormatOptions, LineEnding, SourceSpec, DEFAULT_BATCH_SIZE, DEFAULT_OUT_DIR,
};
pub use connect::Session;
pub use error::{ExportError, Result};
pub use export::{ExportJob, ExportResult};
pub use pipeline::{run, ExportSummary};
