//! ODBC session establishment.
//!
//! The [`Session`] owns the ODBC environment plus the resolved connection
//! string and opens a fresh connection per catalog or table operation. All
//! use is strictly serial; there is one in-flight statement at a time.

use odbc_api::{Connection, ConnectionOptions, Environment};
use tracing::{debug, info};

use crate::config::SourceSpec;
use crate::driver::{DriverResolver, OdbcDriverResolver};
use crate::error::{ExportError, Result};

/// An open session against the source database.
pub struct Session {
    env: Environment,
    connection_string: String,
}

/// Build the ODBC connection string for a source.
///
/// File mode resolves a driver and checks the file exists; DSN mode only
/// assembles the registered name and optional credentials.
pub fn build_connection_string(
    spec: &SourceSpec,
    resolver: &dyn DriverResolver,
) -> Result<String> {
    match spec {
        SourceSpec::File(path) => {
            let driver = resolver.resolve_access_driver()?;
            if !path.exists() {
                return Err(ExportError::SourceNotFound(path.clone()));
            }
            Ok(format!("Driver={{{driver}}};Dbq={};", path.display()))
        }
        SourceSpec::Dsn {
            name,
            user,
            password,
        } => {
            let mut parts = vec![format!("DSN={name}")];
            if let Some(user) = user {
                parts.push(format!("UID={user}"));
            }
            if let Some(password) = password {
                parts.push(format!("PWD={password}"));
            }
            Ok(format!("{};", parts.join(";")))
        }
    }
}

impl Session {
    /// Open a session, probing the connection once so failures surface now.
    pub fn open(spec: &SourceSpec) -> Result<Self> {
        let env = Environment::new().map_err(|e| ExportError::Environment(e.to_string()))?;

        let connection_string = {
            let resolver = OdbcDriverResolver::new(&env);
            build_connection_string(spec, &resolver)?
        };
        debug!("connection string assembled for {}", spec.label());

        // Probe in a scope so the borrowed connection drops before env moves.
        {
            env.connect_with_connection_string(&connection_string, ConnectionOptions::default())
                .map_err(|e| ExportError::Connect(e.to_string()))?;
        }
        info!("connected to {}", spec.label());

        Ok(Self {
            env,
            connection_string,
        })
    }

    /// A fresh connection for one serial catalog or table operation.
    pub fn connect(&self) -> Result<Connection<'_>> {
        self.env
            .connect_with_connection_string(&self.connection_string, ConnectionOptions::default())
            .map_err(|e| ExportError::Connect(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ACCESS_DRIVER_MODERN;
    use std::path::PathBuf;

    struct StubResolver {
        driver: Option<&'static str>,
    }

    impl DriverResolver for StubResolver {
        fn installed_drivers(&self) -> Result<Vec<String>> {
            Ok(self.driver.iter().map(|s| s.to_string()).collect())
        }
    }

    #[test]
    fn test_file_mode_connection_string() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let spec = SourceSpec::File(file.path().to_path_buf());
        let resolver = StubResolver {
            driver: Some(ACCESS_DRIVER_MODERN),
        };

        let conn_str = build_connection_string(&spec, &resolver).unwrap();
        assert!(conn_str.starts_with("Driver={Microsoft Access Driver (*.mdb, *.accdb)};Dbq="));
        assert!(conn_str.ends_with(';'));
    }

    #[test]
    fn test_file_mode_requires_existing_file() {
        let spec = SourceSpec::File(PathBuf::from("definitely/not/here.accdb"));
        let resolver = StubResolver {
            driver: Some(ACCESS_DRIVER_MODERN),
        };

        let err = build_connection_string(&spec, &resolver).unwrap_err();
        assert!(matches!(err, ExportError::SourceNotFound(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_file_mode_requires_driver_before_file_check() {
        // Driver resolution happens first; the path is never touched.
        let spec = SourceSpec::File(PathBuf::from("definitely/not/here.accdb"));
        let resolver = StubResolver { driver: None };

        let err = build_connection_string(&spec, &resolver).unwrap_err();
        assert!(matches!(err, ExportError::DriverNotFound));
    }

    #[test]
    fn test_dsn_mode_with_credentials() {
        let spec = SourceSpec::Dsn {
            name: "northwind".into(),
            user: Some("admin".into()),
            password: Some("s3cret".into()),
        };
        let resolver = StubResolver { driver: None };

        assert_eq!(
            build_connection_string(&spec, &resolver).unwrap(),
            "DSN=northwind;UID=admin;PWD=s3cret;"
        );
    }

    #[test]
    fn test_dsn_mode_without_credentials() {
        let spec = SourceSpec::Dsn {
            name: "northwind".into(),
            user: None,
            password: None,
        };
        let resolver = StubResolver { driver: None };

        assert_eq!(
            build_connection_string(&spec, &resolver).unwrap(),
            "DSN=northwind;"
        );
    }
}
