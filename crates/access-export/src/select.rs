//! Final object selection.

use std::collections::HashSet;

use tracing::warn;

use crate::catalog::Catalog;
use crate::error::{ExportError, Result};

/// Intersect the request with what the catalog actually has.
///
/// With no explicit request the whole catalog is selected, tables first. An
/// explicit request keeps its own order; names the catalog does not have are
/// warned about and skipped. Views only count as available when
/// `include_views` is set. An empty outcome is fatal either way.
pub fn select_objects(
    catalog: &Catalog,
    requested: Option<&[String]>,
    include_views: bool,
) -> Result<Vec<String>> {
    let selection: Vec<String> = match requested {
        None => {
            let mut all = catalog.tables.clone();
            if include_views {
                all.extend(catalog.views.iter().cloned());
            }
            all
        }
        Some(names) => {
            let mut available: HashSet<&str> =
                catalog.tables.iter().map(String::as_str).collect();
            if include_views {
                available.extend(catalog.views.iter().map(String::as_str));
            }

            let (found, missing): (Vec<&String>, Vec<&String>) = names
                .iter()
                .partition(|name| available.contains(name.as_str()));
            if !missing.is_empty() {
                warn!(
                    "requested objects not found, skipping: {}",
                    missing
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            found.into_iter().cloned().collect()
        }
    };

    if selection.is_empty() {
        return Err(ExportError::EmptySelection);
    }
    Ok(selection)
}
