//! Access ODBC driver discovery.
//!
//! Driver lookup is split in two: a [`DriverResolver`] that lists what is
//! installed, and a pure selection function over those names. The selection
//! logic stays testable without a real driver registry.

use odbc_api::Environment;
use tracing::debug;

use crate::error::{ExportError, Result};

/// Driver name preferred when both are installed (64-bit capable, reads `.accdb`).
pub const ACCESS_DRIVER_MODERN: &str = "Microsoft Access Driver (*.mdb, *.accdb)";

/// Legacy Jet driver name (`.mdb` only).
pub const ACCESS_DRIVER_LEGACY: &str = "Microsoft Access Driver (*.mdb)";

/// Source of installed ODBC driver names.
pub trait DriverResolver {
    /// Descriptions of every installed driver.
    fn installed_drivers(&self) -> Result<Vec<String>>;

    /// Pick a usable Access driver, modern name preferred.
    fn resolve_access_driver(&self) -> Result<String> {
        let installed = self.installed_drivers()?;
        debug!("installed ODBC drivers: {:?}", installed);
        pick_access_driver(&installed)
            .map(str::to_owned)
            .ok_or(ExportError::DriverNotFound)
    }
}

/// Resolver backed by the real ODBC environment.
pub struct OdbcDriverResolver<'env> {
    env: &'env Environment,
}

impl<'env> OdbcDriverResolver<'env> {
    pub fn new(env: &'env Environment) -> Self {
        Self { env }
    }
}

impl DriverResolver for OdbcDriverResolver<'_> {
    fn installed_drivers(&self) -> Result<Vec<String>> {
        let drivers = self
            .env
            .drivers()
            .map_err(|e| ExportError::Environment(e.to_string()))?;
        Ok(drivers.into_iter().map(|d| d.description).collect())
    }
}

/// Case-insensitive substring scan over installed driver names, preferring
/// the modern driver over the legacy one when both match.
pub fn pick_access_driver(installed: &[String]) -> Option<&str> {
    for needle in [ACCESS_DRIVER_MODERN, ACCESS_DRIVER_LEGACY] {
        let needle = needle.to_lowercase();
        for name in installed {
            if name.to_lowercase().contains(&needle) {
                return Some(name.as_str());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pick_prefers_modern_driver() {
        let installed = names(&[
            "SQLite3 ODBC Driver",
            ACCESS_DRIVER_LEGACY,
            ACCESS_DRIVER_MODERN,
        ]);
        assert_eq!(pick_access_driver(&installed), Some(ACCESS_DRIVER_MODERN));
    }

    #[test]
    fn test_pick_falls_back_to_legacy_driver() {
        let installed = names(&["PostgreSQL Unicode", ACCESS_DRIVER_LEGACY]);
        assert_eq!(pick_access_driver(&installed), Some(ACCESS_DRIVER_LEGACY));
    }

    #[test]
    fn test_pick_matches_case_insensitively() {
        let installed = names(&["MICROSOFT ACCESS DRIVER (*.MDB, *.ACCDB)"]);
        assert_eq!(
            pick_access_driver(&installed),
            Some("MICROSOFT ACCESS DRIVER (*.MDB, *.ACCDB)")
        );
    }

    #[test]
    fn test_pick_matches_substring() {
        let installed = names(&["Microsoft Access Driver (*.mdb, *.accdb) [v17]"]);
        assert_eq!(
            pick_access_driver(&installed),
            Some("Microsoft Access Driver (*.mdb, *.accdb) [v17]")
        );
    }

    #[test]
    fn test_pick_returns_none_without_access_driver() {
        let installed = names(&["SQLite3 ODBC Driver", "PostgreSQL Unicode"]);
        assert_eq!(pick_access_driver(&installed), None);
    }

    struct StubResolver(Vec<String>);

    impl DriverResolver for StubResolver {
        fn installed_drivers(&self) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_resolve_reports_driver_not_found() {
        let resolver = StubResolver(names(&["SQLite3 ODBC Driver"]));
        let err = resolver.resolve_access_driver().unwrap_err();
        assert!(matches!(err, ExportError::DriverNotFound));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_resolve_returns_owned_name() {
        let resolver = StubResolver(names(&[ACCESS_DRIVER_MODERN]));
        assert_eq!(
            resolver.resolve_access_driver().unwrap(),
            ACCESS_DRIVER_MODERN
        );
    }
}
