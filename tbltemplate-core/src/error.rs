//! Error types for catalog access, credential handling and document output.
//!
//! Every variant keeps the underlying driver or library error as its source
//! and renders that error's own message after a short context, so the user
//! sees exactly what the database or the writer reported.
//!
//! Passwords never reach these types: connection context is built from
//! `ConnectionConfig`'s `Display`, which omits credentials.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error source shared by the wrapping variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for tbltemplate operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Establishing the database session failed
    #[error("Database connection failed: {context}: {source}")]
    Connection {
        context: String,
        #[source]
        source: BoxError,
    },

    /// A catalog query failed to execute or its rows could not be decoded
    #[error("Query execution failed: {context}: {source}")]
    Query {
        context: String,
        #[source]
        source: BoxError,
    },

    /// Writing the output document failed
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Reading the password from the terminal failed
    #[error("Failed to read password: {source}")]
    Credential {
        #[source]
        source: std::io::Error,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results with TemplateError
pub type Result<T> = std::result::Result<T, TemplateError>;

impl TemplateError {
    /// Creates a connection error with context
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a query execution error with context
    pub fn query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a parsing error for a column of a catalog result row
    ///
    /// # Arguments
    /// * `field_name` - Name of the field being parsed
    /// * `table_context` - Optional table context for better error messages
    /// * `error` - The underlying decoding error
    pub fn parse_field<E>(field_name: &str, table_context: Option<&str>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let context = match table_context {
            Some(table) => format!(
                "Failed to parse field '{}' from result for table '{}'",
                field_name, table
            ),
            None => format!("Failed to parse field '{}' from catalog result", field_name),
        };
        Self::query_failed(context, error)
    }

    /// Creates a document write error for `path`
    pub fn write_failed<E>(path: impl Into<PathBuf>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Write {
            path: path.into(),
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = TemplateError::configuration("Schema name cannot be empty");
        assert!(error.to_string().contains("Schema name cannot be empty"));
    }

    #[test]
    fn test_underlying_message_is_verbatim() {
        let source = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused by peer");
        let error = TemplateError::connection_failed("Database(host=db, database=lab)", source);

        let message = error.to_string();
        assert!(message.starts_with("Database connection failed"));
        assert!(message.ends_with("refused by peer"));
    }

    #[test]
    fn test_parse_field_context() {
        let source = std::io::Error::other("bad utf-8");
        let error = TemplateError::parse_field("column_name", Some("orders"), source);
        let message = error.to_string();

        assert!(matches!(error, TemplateError::Query { .. }));
        assert!(message.contains("'column_name'"));
        assert!(message.contains("'orders'"));
    }

    #[test]
    fn test_write_error_names_path() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = TemplateError::write_failed("/tmp/out/templates.ods", source);

        assert!(error.to_string().contains("/tmp/out/templates.ods"));
        assert!(error.to_string().contains("denied"));
    }
}
