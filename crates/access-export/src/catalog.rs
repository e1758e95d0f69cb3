//! Catalog enumeration.
//!
//! Lists the queryable objects the driver exposes, in whatever order the
//! driver reports them. System objects carry the reserved `MSys` prefix and
//! are dropped before anything downstream can see them.

use odbc_api::buffers::TextRowSet;
use odbc_api::{Connection, Cursor};
use tracing::info;

use crate::connect::Session;
use crate::error::{ExportError, Result};

/// Prefix reserved for Access system objects.
pub const SYSTEM_PREFIX: &str = "MSys";

/// TABLE_NAME column position in the ODBC tables result set (0-based).
const TABLE_NAME_COLUMN: usize = 2;

/// Rows fetched per round-trip while reading the catalog.
const CATALOG_BATCH: usize = 256;

/// Queryable objects exposed by the source, in driver order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub tables: Vec<String>,
    pub views: Vec<String>,
}

/// List tables, and views when requested, dropping system objects.
pub fn enumerate(session: &Session, include_views: bool) -> Result<Catalog> {
    let conn = session.connect()?;

    let tables = list_objects(&conn, "TABLE")?;
    let views = if include_views {
        list_objects(&conn, "VIEW")?
    } else {
        Vec::new()
    };

    info!("catalog: {} table(s), {} view(s)", tables.len(), views.len());
    Ok(Catalog { tables, views })
}

fn list_objects(conn: &Connection<'_>, table_type: &str) -> Result<Vec<String>> {
    let enum_err = |e: &dyn std::fmt::Display| {
        ExportError::query(format!("enumeration of {table_type} objects failed"), e)
    };

    let mut cursor = conn
        .tables("", "", "", table_type)
        .map_err(|e| enum_err(&e))?;

    let mut buffers = TextRowSet::for_cursor(CATALOG_BATCH, &mut cursor, Some(1024))
        .map_err(|e| enum_err(&e))?;
    let mut row_set = cursor.bind_buffer(&mut buffers).map_err(|e| enum_err(&e))?;

    let mut names = Vec::new();
    while let Some(batch) = row_set.fetch().map_err(|e| enum_err(&e))? {
        for row in 0..batch.num_rows() {
            let Some(bytes) = batch.at(TABLE_NAME_COLUMN, row) else {
                continue;
            };
            let name = String::from_utf8_lossy(bytes);
            if name.is_empty() || name.starts_with(SYSTEM_PREFIX) {
                continue;
            }
            names.push(name.into_owned());
        }
    }

    Ok(names)
}
