use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

/// Connection parameters for the catalog database.
#[derive(Clone, Deserialize)]
pub struct DatabaseSettings {
    /// The database name (e.g., "science_test").
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// When set, the catalog tables live in this schema instead of `public`.
    #[serde(default)]
    pub schema: Option<String>,
}

// The password must never end up in a log line.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("schema", &self.schema)
            .finish()
    }
}

/// Contains parameters for the tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Fallback filter directive when `RUST_LOG` is not set (e.g., "info", "database=debug").
    pub level: String,
    /// When set, logs go to a daily-rolling file in this directory instead of stderr.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Config {
    /// Checks the values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()
    }
}

impl DatabaseSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("name", &self.name), ("user", &self.user), ("host", &self.host)] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "database.{field} must not be empty"
                )));
            }
        }
        if self.port == 0 {
            return Err(ConfigError::ValidationError("database.port must be non-zero".into()));
        }
        if let Some(schema) = &self.schema {
            if !is_identifier(schema) {
                return Err(ConfigError::ValidationError(format!(
                    "database.schema '{schema}' is not a plain SQL identifier"
                )));
            }
        }
        Ok(())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, at most 63 bytes (PostgreSQL's identifier limit).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    s.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DatabaseSettings {
        DatabaseSettings {
            name: "science_test".into(),
            user: "postgres".into(),
            password: "1111".into(),
            host: "localhost".into(),
            port: 5432,
            schema: None,
        }
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn test_empty_fields_and_zero_port_are_rejected() {
        let mut s = settings();
        s.host = "  ".into();
        assert!(matches!(s.validate(), Err(ConfigError::ValidationError(_))));

        let mut s = settings();
        s.port = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_schema_must_be_identifier() {
        let mut s = settings();
        s.schema = Some("catalog_test_01".into());
        assert!(s.validate().is_ok());
        s.schema = Some("public; DROP TABLE authors".into());
        assert!(s.validate().is_err());
        s.schema = Some("1abc".into());
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", settings());
        assert!(!rendered.contains("1111"));
        assert!(rendered.contains("science_test"));
    }
}
