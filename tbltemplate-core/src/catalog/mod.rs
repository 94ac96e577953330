//! Catalog access for table and column metadata.
//!
//! The resolver only needs four lookups scoped by schema name. They are
//! expressed as the [`Catalog`] trait so the resolution rules can run
//! against PostgreSQL's `information_schema` or an in-memory fixture.
//!
//! # Module Structure
//! - `memory`: in-memory catalog with `ILIKE` semantics
//! - `postgres`: `information_schema` catalog over a `ConnectionManager` (feature `postgresql`)

mod memory;

#[cfg(feature = "postgresql")]
mod postgres;

use crate::{Result, models::ColumnInfo};
use async_trait::async_trait;

pub use memory::MemoryCatalog;

#[cfg(feature = "postgresql")]
pub use postgres::PgCatalog;

/// Metadata lookups against a database catalog.
///
/// Every method takes `&mut self` because a live catalog funnels all
/// queries through one database session.
#[async_trait]
pub trait Catalog: Send {
    /// All table names in `schema`.
    async fn list_tables(&mut self, schema: &str) -> Result<Vec<String>>;

    /// Table names in `schema` matching the `ILIKE` pattern `like_pattern`
    /// (`%` any run, `_` any character, `\` escapes).
    async fn find_tables(&mut self, schema: &str, like_pattern: &str) -> Result<Vec<String>>;

    /// Whether `table` names an existing table in `schema` exactly.
    async fn table_exists(&mut self, schema: &str, table: &str) -> Result<bool>;

    /// Columns of `schema.table` in ordinal order.
    async fn list_columns(&mut self, schema: &str, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Releases any underlying session.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
