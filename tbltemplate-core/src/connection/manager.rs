//! Single-session PostgreSQL connection management.
//!
//! # Security Features
//! - Password requested once from the injected provider and kept zeroizing
//! - Sessions default to read-only transactions
//! - Every catalog query is parameterized
//! - Error context is built from `ConnectionConfig`'s credential-free `Display`

use super::ConnectionConfig;
use crate::{Result, error::TemplateError, security::CredentialProvider};
use sqlx::postgres::{PgConnectOptions, PgRow};
use sqlx::{Connection, Executor, PgConnection};
use zeroize::Zeroizing;

/// Owns at most one live PostgreSQL session.
///
/// The session is opened lazily by the first [`execute`](Self::execute)
/// call. Calling [`open`](Self::open) on a live manager closes the existing
/// session before connecting again. There is no pooling and no retry.
///
/// # Example
///
/// ```rust,no_run
/// use tbltemplate_core::connection::{ConnectionConfig, ConnectionManager};
/// use tbltemplate_core::security::PromptCredentials;
///
/// # async fn demo() -> tbltemplate_core::Result<()> {
/// let config = ConnectionConfig::new("localhost".to_string()).with_database("lab".to_string());
/// let mut manager = ConnectionManager::new(config, PromptCredentials);
/// let rows = manager.execute("SELECT current_schema()::text", &[]).await?;
/// assert_eq!(rows.len(), 1);
/// manager.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct ConnectionManager {
    config: ConnectionConfig,
    credentials: Box<dyn CredentialProvider>,
    password: Option<Zeroizing<String>>,
    conn: Option<PgConnection>,
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("config", &self.config)
            .field("has_password", &self.password.is_some())
            .field("open", &self.is_open())
            .finish()
    }
}

impl ConnectionManager {
    /// Creates a manager for `config`; nothing is opened yet.
    pub fn new(config: ConnectionConfig, credentials: impl CredentialProvider + 'static) -> Self {
        Self {
            config,
            credentials: Box::new(credentials),
            password: None,
            conn: None,
        }
    }

    /// Connection target of this manager.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Whether a session is currently live.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Opens a new session, closing any live one first.
    ///
    /// The password is requested from the provider on the first call only.
    ///
    /// # Errors
    /// Returns `TemplateError::Configuration` for an invalid target,
    /// `TemplateError::Credential` when the password cannot be read, and
    /// `TemplateError::Connection` when the server rejects the session.
    pub async fn open(&mut self) -> Result<()> {
        self.close().await?;
        self.config.validate()?;

        if self.password.is_none() {
            self.password = Some(self.credentials.password(&self.config)?);
        }

        let options = Self::connect_options(
            &self.config,
            self.password.as_deref().map(String::as_str),
        );

        tracing::debug!("Connecting to {}", self.config);
        let mut conn = PgConnection::connect_with(&options).await.map_err(|e| {
            TemplateError::connection_failed(format!("Failed to connect to {}", self.config), e)
        })?;

        Self::setup_session(&mut conn, self.config.read_only)
            .await
            .map_err(|e| {
                TemplateError::connection_failed(
                    format!("Failed to configure session on {}", self.config),
                    e,
                )
            })?;

        tracing::info!("Connected to {}", self.config);
        self.conn = Some(conn);
        Ok(())
    }

    /// Runs `sql` with positional text parameters and returns every row.
    ///
    /// Opens the session first when none is live.
    ///
    /// # Errors
    /// Connection errors from the lazy open, or `TemplateError::Query` when
    /// the statement fails.
    pub async fn execute<'q>(&mut self, sql: &'q str, params: &[&'q str]) -> Result<Vec<PgRow>> {
        if self.conn.is_none() {
            self.open().await?;
        }
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| TemplateError::configuration("database session is not open"))?;

        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(*param);
        }

        let rows = query.fetch_all(&mut *conn).await.map_err(|e| {
            tracing::error!("Catalog query failed: {}", e);
            TemplateError::query_failed("Failed to execute catalog query", e)
        })?;

        tracing::trace!("Query returned {} rows", rows.len());
        Ok(rows)
    }

    /// Closes the live session, if any.
    ///
    /// # Errors
    /// Returns `TemplateError::Connection` when the server-side termination
    /// fails; the session is dropped either way.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().await.map_err(|e| {
                TemplateError::connection_failed(format!("Failed to close {}", self.config), e)
            })?;
            tracing::debug!("Closed connection to {}", self.config);
        }
        Ok(())
    }

    /// Builds driver options for `config`.
    ///
    /// Unset database and username fall back to libpq's environment defaults.
    pub(crate) fn connect_options(
        config: &ConnectionConfig,
        password: Option<&str>,
    ) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .application_name(&format!("tbltemplate-{}", env!("CARGO_PKG_VERSION")));

        if let Some(database) = &config.database {
            options = options.database(database);
        }
        if let Some(username) = &config.username {
            options = options.username(username);
        }
        if let Some(password) = password {
            options = options.password(password);
        }

        options
    }

    async fn setup_session(conn: &mut PgConnection, read_only: bool) -> sqlx::Result<()> {
        conn.execute("SET lock_timeout = '30s'").await?;
        if read_only {
            conn.execute("SET default_transaction_read_only = on").await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::StaticCredentials;

    fn default_manager() -> ConnectionManager {
        ConnectionManager::new(ConnectionConfig::default(), StaticCredentials::new("pw"))
    }

    #[test]
    fn test_connect_options_from_config() {
        let config = ConnectionConfig::new("db.internal".to_string())
            .with_port(6432)
            .with_database("lab".to_string())
            .with_username("analyst".to_string());

        let options = ConnectionManager::connect_options(&config, Some("pw"));

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6432);
        assert_eq!(options.get_database(), Some("lab"));
        assert_eq!(options.get_username(), "analyst");
        assert!(
            options
                .get_application_name()
                .is_some_and(|name| name.starts_with("tbltemplate-"))
        );
    }

    #[test]
    fn test_new_manager_is_closed() {
        let manager = default_manager();
        assert!(!manager.is_open());
        assert_eq!(manager.config().host, "localhost");
    }

    #[test]
    fn test_debug_hides_password() {
        let mut manager = ConnectionManager::new(
            ConnectionConfig::default(),
            StaticCredentials::new("super_secret_password_123"),
        );
        manager.password = Some(Zeroizing::new("super_secret_password_123".to_string()));

        let debug = format!("{:?}", manager);
        assert!(!debug.contains("super_secret_password_123"));
        assert!(debug.contains("has_password: true"));
    }

    #[tokio::test]
    async fn test_close_without_session_is_noop() {
        let mut manager = default_manager();
        assert!(manager.close().await.is_ok());
        assert!(!manager.is_open());
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_prompting() {
        let prompted = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = prompted.clone();
        let provider = move |_: &ConnectionConfig| -> Result<Zeroizing<String>> {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(Zeroizing::new("pw".to_string()))
        };

        let config = ConnectionConfig::default().with_port(0);
        let mut manager = ConnectionManager::new(config, provider);

        let result = manager.open().await;
        assert!(matches!(result, Err(TemplateError::Configuration { .. })));
        assert!(!prompted.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        // Port 1 on loopback refuses connections
        let config = ConnectionConfig::new("127.0.0.1".to_string())
            .with_port(1)
            .with_database("invalid".to_string())
            .with_username("invalid".to_string());
        let mut manager = ConnectionManager::new(config, StaticCredentials::new("invalid"));

        let result = manager.execute("SELECT 1", &[]).await;
        assert!(matches!(result, Err(TemplateError::Connection { .. })));
        assert!(!manager.is_open());
    }

    #[tokio::test]
    async fn test_password_requested_once_across_reopens() {
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = calls.clone();
        let provider = move |_: &ConnectionConfig| -> Result<Zeroizing<String>> {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(Zeroizing::new("pw".to_string()))
        };

        // Port 1 on loopback refuses connections
        let config = ConnectionConfig::new("127.0.0.1".to_string()).with_port(1);
        let mut manager = ConnectionManager::new(config, provider);

        let first = manager.open().await;
        let second = manager.open().await;

        assert!(matches!(first, Err(TemplateError::Connection { .. })));
        assert!(matches!(second, Err(TemplateError::Connection { .. })));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(manager.password.is_some());
    }
}
