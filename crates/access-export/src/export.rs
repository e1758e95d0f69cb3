//! Streaming export of one catalog object into a delimited text file.

use std::fs;
use std::path::{Path, PathBuf};

use odbc_api::buffers::TextRowSet;
use odbc_api::{Connection, Cursor, ResultSetMetadata};
use tracing::debug;

use crate::config::FormatOptions;
use crate::connect::Session;
use crate::error::{ExportError, Result};
use crate::writer::DelimitedWriter;

/// Extension appended to every output file.
pub const FILE_EXTENSION: &str = "csv";

/// Stem used when sanitizing leaves nothing of the object name.
pub const FALLBACK_FILE_STEM: &str = "untitled";

/// Upper bound on bytes fetched per cell.
const MAX_CELL_BYTES: usize = 65_536;

/// Characters Windows path rules reserve; replaced during sanitizing.
const RESERVED_CHARS: &[char] = &['\\', '/', ':', '"', '*', '?', '<', '>', '|'];

/// One table or view to export, fully determined before any row is read.
#[derive(Debug)]
pub struct ExportJob<'a> {
    pub object: &'a str,
    pub out_dir: &'a Path,
    pub format: &'a FormatOptions,
    pub batch_size: usize,
}

/// What one finished export produced.
#[derive(Debug)]
pub struct ExportResult {
    pub path: PathBuf,
    pub rows: u64,
}

/// Turn an arbitrary object name into a safe file stem.
///
/// Runs of reserved path characters collapse into one underscore; leading and
/// trailing whitespace goes, then trailing periods. A name with nothing left
/// becomes the fixed placeholder.
pub fn sanitize_object_name(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut in_run = false;
    for ch in name.chars() {
        if RESERVED_CHARS.contains(&ch) {
            if !in_run {
                stem.push('_');
            }
            in_run = true;
        } else {
            stem.push(ch);
            in_run = false;
        }
    }

    let stem = stem.trim().trim_end_matches('.');
    if stem.is_empty() {
        FALLBACK_FILE_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// Quote an object name for use in an Access SQL statement.
/// Doubles closing brackets: `Order]Details` -> `[Order]]Details]`.
fn quote_object(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// Export one object. Returns the output path and total row count.
pub fn export_table(session: &Session, job: &ExportJob<'_>) -> Result<ExportResult> {
    let file_name = format!("{}.{}", sanitize_object_name(job.object), FILE_EXTENSION);
    let out_path = job.out_dir.join(file_name);

    let conn = session.connect()?;
    let ident = quote_object(job.object);

    // Column order comes from a zero-row probe so the header matches what the
    // driver reports for this object. The full query's own metadata is the
    // fallback; the probe wins when both are available.
    let probed = probe_columns(&conn, &ident);

    let sql = format!("SELECT * FROM {ident}");
    let mut cursor = conn
        .execute(&sql, ())
        .map_err(|e| object_query_err(job.object, e))?
        .ok_or_else(|| object_query_err(job.object, "statement produced no result set"))?;

    let columns = match probed {
        Ok(columns) => columns,
        Err(e) => {
            debug!(
                "column probe for {} failed, using result metadata: {}",
                job.object, e
            );
            column_names(&mut cursor).map_err(|e| object_query_err(job.object, e))?
        }
    };

    fs::create_dir_all(job.out_dir).map_err(|e| ExportError::write(job.out_dir, e))?;
    let mut writer = DelimitedWriter::create(&out_path, job.format)
        .map_err(|e| ExportError::write(&out_path, e))?;
    writer
        .write_record(columns.iter().map(String::as_str))
        .map_err(|e| ExportError::write(&out_path, e))?;

    let num_cols = cursor
        .num_result_cols()
        .map_err(|e| object_query_err(job.object, e))? as usize;
    let mut buffers = TextRowSet::for_cursor(job.batch_size, &mut cursor, Some(MAX_CELL_BYTES))
        .map_err(|e| object_query_err(job.object, e))?;
    let mut row_set = cursor
        .bind_buffer(&mut buffers)
        .map_err(|e| object_query_err(job.object, e))?;

    let mut total = 0u64;
    while let Some(batch) = row_set
        .fetch()
        .map_err(|e| object_query_err(job.object, e))?
    {
        for row in 0..batch.num_rows() {
            let record = (0..num_cols).map(|col| {
                batch
                    .at(col, row)
                    .map_or(std::borrow::Cow::Borrowed(""), String::from_utf8_lossy)
            });
            writer
                .write_record(record)
                .map_err(|e| ExportError::write(&out_path, e))?;
        }
        total += batch.num_rows() as u64;
    }

    writer
        .finish()
        .map_err(|e| ExportError::write(&out_path, e))?;

    Ok(ExportResult {
        path: out_path,
        rows: total,
    })
}

/// Zero-row probe for the column list, in driver-reported order.
fn probe_columns(conn: &Connection<'_>, ident: &str) -> Result<Vec<String>> {
    let sql = format!("SELECT * FROM {ident} WHERE 1=0");
    let mut cursor = conn
        .execute(&sql, ())
        .map_err(|e| ExportError::query("column probe failed", e))?
        .ok_or_else(|| ExportError::query("column probe failed", "statement produced no result set"))?;
    column_names(&mut cursor).map_err(|e| ExportError::query("column probe failed", e))
}

/// Column names from a cursor's result-set metadata.
fn column_names(
    cursor: &mut impl ResultSetMetadata,
) -> std::result::Result<Vec<String>, odbc_api::Error> {
    cursor.column_names()?.collect()
}

fn object_query_err(object: &str, message: impl std::fmt::Display) -> ExportError {
    ExportError::query(format!("query against {object} failed"), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Filename sanitizing
    // =========================================================================

    #[test]
    fn test_sanitize_plain_name_unchanged() {
        assert_eq!(sanitize_object_name("Orders"), "Orders");
    }

    #[test]
    fn test_sanitize_replaces_each_reserved_char() {
        for ch in ['\\', '/', ':', '"', '*', '?', '<', '>', '|'] {
            let name = format!("a{ch}b");
            assert_eq!(sanitize_object_name(&name), "a_b", "char {ch:?}");
        }
    }

    #[test]
    fn test_sanitize_collapses_runs() {
        assert_eq!(sanitize_object_name("a\\/:b"), "a_b");
        assert_eq!(sanitize_object_name("a//b//c"), "a_b_c");
    }

    #[test]
    fn test_sanitize_trims_whitespace_and_trailing_periods() {
        assert_eq!(sanitize_object_name("  Orders  "), "Orders");
        assert_eq!(sanitize_object_name("Orders..."), "Orders");
    }

    #[test]
    fn test_sanitize_empty_result_gets_placeholder() {
        assert_eq!(sanitize_object_name(""), FALLBACK_FILE_STEM);
        assert_eq!(sanitize_object_name(" . "), FALLBACK_FILE_STEM);
    }

    #[test]
    fn test_sanitize_keeps_unicode() {
        assert_eq!(sanitize_object_name("受注履歴"), "受注履歴");
    }

    #[test]
    fn test_sanitize_mixed_name() {
        assert_eq!(
            sanitize_object_name("Sales/2024: Q1?"),
            "Sales_2024_ Q1_"
        );
    }

    #[test]
    fn test_sanitized_names_never_contain_reserved_chars() {
        let inputs = [
            "a\\b/c:d\"e*f?g<h>i|j",
            "::::",
            "report|final?.v2",
            "  <<>>  ",
        ];
        for input in inputs {
            let stem = sanitize_object_name(input);
            assert!(!stem.is_empty(), "input {input:?}");
            assert!(
                !stem.contains(RESERVED_CHARS),
                "input {input:?} produced {stem:?}"
            );
        }
    }

    // =========================================================================
    // Identifier quoting
    // =========================================================================

    #[test]
    fn test_quote_object_brackets_name() {
        assert_eq!(quote_object("Orders"), "[Orders]");
    }

    #[test]
    fn test_quote_object_escapes_closing_bracket() {
        assert_eq!(quote_object("Order]Details"), "[Order]]Details]");
    }
}
