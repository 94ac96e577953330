//! Database connection configuration.
//!
//! This module provides the `ConnectionConfig` struct describing which
//! PostgreSQL server, database and role a run talks to.

use serde::{Deserialize, Serialize};

/// Default PostgreSQL port
pub const DEFAULT_PORT: u16 = 5432;

/// Configuration for the database connection.
///
/// # Security
/// This struct intentionally does NOT store passwords. The password comes
/// from a `CredentialProvider` when the connection is opened and is never
/// serialized or displayed.
///
/// # Example
/// ```rust
/// use tbltemplate_core::ConnectionConfig;
///
/// let config = ConnectionConfig::new("localhost".to_string())
///     .with_port(5432)
///     .with_database("lab".to_string())
///     .with_username("analyst".to_string());
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.to_string(), "localhost:5432/lab");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database name; the server falls back to the username when absent
    pub database: Option<String>,
    /// Role to connect as (password handled separately)
    pub username: Option<String>,
    /// Whether sessions are switched to read-only transactions
    pub read_only: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            database: None,
            username: None,
            read_only: true,
        }
    }
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)?;
        if let Some(database) = &self.database {
            write!(f, "/{}", database)?;
        }
        // Intentionally omit username and never include credentials
        Ok(())
    }
}

impl ConnectionConfig {
    /// Creates a new connection config with defaults for everything but the host.
    pub fn new(host: String) -> Self {
        Self {
            host,
            ..Default::default()
        }
    }

    /// Builder method to set port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder method to set database.
    pub fn with_database(mut self, database: String) -> Self {
        self.database = Some(database);
        self
    }

    /// Builder method to set username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Builder method to toggle read-only sessions.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Label used when asking for the password, e.g.
    /// `Database(host=localhost, database=lab, user=analyst)`.
    pub fn prompt_label(&self) -> String {
        format!(
            "Database(host={}, database={}, user={})",
            self.host,
            self.database.as_deref().unwrap_or("<default>"),
            self.username.as_deref().unwrap_or("<default>")
        )
    }

    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if the host is empty, the port is zero, or a provided
    /// database/user name is blank.
    pub fn validate(&self) -> crate::Result<()> {
        if self.host.trim().is_empty() {
            return Err(crate::error::TemplateError::configuration(
                "host cannot be empty",
            ));
        }

        if self.port == 0 {
            return Err(crate::error::TemplateError::configuration(
                "port must be greater than 0",
            ));
        }

        if self.database.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(crate::error::TemplateError::configuration(
                "database name cannot be blank",
            ));
        }

        if self.username.as_deref().is_some_and(|u| u.trim().is_empty()) {
            return Err(crate::error::TemplateError::configuration(
                "username cannot be blank",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_config_default() {
        let config = ConnectionConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.database, None);
        assert!(config.read_only);
    }

    #[test]
    fn test_connection_config_validation() {
        let config = ConnectionConfig::new("localhost".to_string());
        assert!(config.validate().is_ok());

        let config = ConnectionConfig {
            host: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConnectionConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ConnectionConfig::default().with_database(String::new());
        assert!(config.validate().is_err());

        let config = ConnectionConfig::default().with_username(" ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_display_omits_username() {
        let config = ConnectionConfig::new("db.internal".to_string())
            .with_port(6432)
            .with_database("lab".to_string())
            .with_username("secret_role".to_string());

        let display = config.to_string();
        assert_eq!(display, "db.internal:6432/lab");
        assert!(!display.contains("secret_role"));
    }

    #[test]
    fn test_prompt_label() {
        let config = ConnectionConfig::new("env3".to_string())
            .with_database("lab".to_string())
            .with_username("cgrant".to_string());
        assert_eq!(
            config.prompt_label(),
            "Database(host=env3, database=lab, user=cgrant)"
        );

        let config = ConnectionConfig::default();
        assert_eq!(
            config.prompt_label(),
            "Database(host=localhost, database=<default>, user=<default>)"
        );
    }
}
