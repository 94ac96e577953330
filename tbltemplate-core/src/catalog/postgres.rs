//! PostgreSQL `information_schema` catalog.
//!
//! All lookups are parameterized and read-only. Identifier columns are cast
//! to `text` because `information_schema` exposes them as the
//! `sql_identifier` domain.

use super::Catalog;
use crate::connection::{ConnectionManager, RowExt};
use crate::{Result, models::ColumnInfo};
use async_trait::async_trait;

const LIST_TABLES_QUERY: &str = r#"
    SELECT table_name::text AS table_name
    FROM information_schema.tables
    WHERE table_schema = $1
    ORDER BY table_name
"#;

const FIND_TABLES_QUERY: &str = r#"
    SELECT table_name::text AS table_name
    FROM information_schema.tables
    WHERE table_schema = $1
    AND table_name ILIKE $2
    ORDER BY table_name
"#;

const TABLE_EXISTS_QUERY: &str = r#"
    SELECT EXISTS (
        SELECT 1
        FROM information_schema.tables
        WHERE table_schema = $1
        AND table_name = $2
    ) AS present
"#;

const LIST_COLUMNS_QUERY: &str = r#"
    SELECT
        column_name::text AS column_name,
        (COALESCE(column_default::text LIKE 'nextval(%', false)
            OR is_identity::text = 'YES') AS is_serial
    FROM information_schema.columns
    WHERE table_schema = $1
    AND table_name = $2
    ORDER BY ordinal_position
"#;

/// Catalog backed by a live PostgreSQL session.
#[derive(Debug)]
pub struct PgCatalog {
    manager: ConnectionManager,
}

impl PgCatalog {
    /// Wraps `manager`; the session opens on the first lookup.
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }

    /// Underlying connection manager.
    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    /// Releases the catalog and returns its connection manager.
    pub fn into_inner(self) -> ConnectionManager {
        self.manager
    }

    async fn table_names(&mut self, sql: &str, params: &[&str]) -> Result<Vec<String>> {
        let rows = self.manager.execute(sql, params).await?;
        rows.iter()
            .map(|row| row.get_field::<String>("table_name", None))
            .collect()
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn list_tables(&mut self, schema: &str) -> Result<Vec<String>> {
        tracing::debug!("Listing tables in schema '{}'", schema);
        self.table_names(LIST_TABLES_QUERY, &[schema]).await
    }

    async fn find_tables(&mut self, schema: &str, like_pattern: &str) -> Result<Vec<String>> {
        tracing::debug!(
            "Matching tables in schema '{}' against '{}'",
            schema,
            like_pattern
        );
        self.table_names(FIND_TABLES_QUERY, &[schema, like_pattern])
            .await
    }

    async fn table_exists(&mut self, schema: &str, table: &str) -> Result<bool> {
        let rows = self
            .manager
            .execute(TABLE_EXISTS_QUERY, &[schema, table])
            .await?;
        match rows.first() {
            Some(row) => row.get_field("present", Some(table)),
            None => Ok(false),
        }
    }

    async fn list_columns(&mut self, schema: &str, table: &str) -> Result<Vec<ColumnInfo>> {
        tracing::debug!("Listing columns of {}.{}", schema, table);
        let rows = self
            .manager
            .execute(LIST_COLUMNS_QUERY, &[schema, table])
            .await?;

        rows.iter()
            .map(|row| -> Result<ColumnInfo> {
                Ok(ColumnInfo {
                    name: row.get_field("column_name", Some(table))?,
                    is_serial: row.get_field("is_serial", Some(table))?,
                })
            })
            .collect()
    }

    async fn close(&mut self) -> Result<()> {
        self.manager.close().await
    }
}
