//! Table and column resolution.
//!
//! Turns the user's table list (exact names and `*` patterns) and column
//! exclusion list into the ordered set of [`TableTemplate`]s to write.
//!
//! # Rules
//! - No table list: every table in the schema.
//! - `*` entries match case-insensitively through the catalog; other
//!   entries are kept only when they name an existing table, and are
//!   dropped silently otherwise.
//! - The table set is deduplicated and sorted by name.
//! - Columns keep catalog order minus exact-name exclusions.

mod request;


use crate::catalog::Catalog;
use crate::{Result, models::TableTemplate};
use std::collections::BTreeSet;

pub use request::{ColumnExclusions, TableEntry, WILDCARD, parse_table_list, to_like_pattern};

/// Resolves tables and columns of one schema through a [`Catalog`].
///
/// The resolved table list is computed once per request string and served
/// from memory afterwards.
///
/// # Example
///
/// ```rust
/// use tbltemplate_core::{catalog::MemoryCatalog, models::ColumnInfo, resolver::SchemaResolver};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let catalog = MemoryCatalog::new()
///     .with_table("public", "x_b", vec![ColumnInfo::new("b")])
///     .with_table("public", "x_a", vec![ColumnInfo::new("a")])
///     .with_table("public", "orders", vec![ColumnInfo::new("id"), ColumnInfo::new("total")]);
///
/// let mut resolver = SchemaResolver::new(catalog, "public");
/// let tables = resolver.resolve_tables(Some("x_*,orders,missing")).await.unwrap();
/// assert_eq!(tables, ["orders", "x_a", "x_b"]);
/// # });
/// ```
#[derive(Debug)]
pub struct SchemaResolver<C> {
    catalog: C,
    schema: String,
    exclude_serial: bool,
    resolved: Option<(Option<String>, Vec<String>)>,
}

impl<C: Catalog> SchemaResolver<C> {
    /// Creates a resolver for `schema` over `catalog`.
    pub fn new(catalog: C, schema: impl Into<String>) -> Self {
        Self {
            catalog,
            schema: schema.into(),
            exclude_serial: false,
            resolved: None,
        }
    }

    /// Also drop sequence-backed and identity columns from every table.
    pub fn with_exclude_serial(mut self, exclude_serial: bool) -> Self {
        self.exclude_serial = exclude_serial;
        self
    }

    /// Schema this resolver reads.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Borrow the underlying catalog.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Releases the resolver and returns its catalog.
    pub fn into_catalog(self) -> C {
        self.catalog
    }

    /// Resolves `requested` (comma-separated names and patterns) to a
    /// sorted, duplicate-free list of table names.
    ///
    /// # Errors
    /// Any catalog failure is returned unchanged.
    pub async fn resolve_tables(&mut self, requested: Option<&str>) -> Result<Vec<String>> {
        if let Some((key, tables)) = &self.resolved
            && key.as_deref() == requested
        {
            tracing::trace!("Reusing resolved table list for schema '{}'", self.schema);
            return Ok(tables.clone());
        }

        let tables: Vec<String> = match requested {
            None => {
                tracing::debug!("No table list given, using every table in '{}'", self.schema);
                self.catalog
                    .list_tables(&self.schema)
                    .await?
                    .into_iter()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            }
            Some(raw) => self.resolve_entries(&parse_table_list(raw)).await?,
        };

        tracing::info!(
            "Resolved {} tables in schema '{}'",
            tables.len(),
            self.schema
        );
        self.resolved = Some((requested.map(str::to_string), tables.clone()));
        Ok(tables)
    }

    async fn resolve_entries(&mut self, entries: &[TableEntry]) -> Result<Vec<String>> {
        let mut found = BTreeSet::new();

        for entry in entries {
            match entry {
                TableEntry::Pattern { raw, like } => {
                    let matches = self.catalog.find_tables(&self.schema, like).await?;
                    tracing::debug!("Pattern '{}' matched {} tables", raw, matches.len());
                    found.extend(matches);
                }
                TableEntry::Literal(name) => {
                    if self.catalog.table_exists(&self.schema, name).await? {
                        found.insert(name.clone());
                    } else {
                        tracing::debug!(
                            "Table '{}' not found in schema '{}', skipping",
                            name,
                            self.schema
                        );
                    }
                }
            }
        }

        Ok(found.into_iter().collect())
    }

    /// Column names of `table` in catalog order, minus every column named
    /// in `excluded` (comma-separated, exact match).
    ///
    /// # Errors
    /// Any catalog failure is returned unchanged.
    pub async fn resolve_columns(
        &mut self,
        table: &str,
        excluded: Option<&str>,
    ) -> Result<Vec<String>> {
        let exclusions = ColumnExclusions::from_option(excluded).with_serial(self.exclude_serial);
        let columns = self.catalog.list_columns(&self.schema, table).await?;
        let total = columns.len();
        let kept = exclusions.apply(columns);

        tracing::debug!(
            "Table '{}': {} of {} columns kept",
            table,
            kept.len(),
            total
        );
        Ok(kept)
    }

    /// Resolves tables, then the columns of each, in table order.
    ///
    /// # Errors
    /// Any catalog failure is returned unchanged.
    pub async fn build_templates(
        &mut self,
        requested: Option<&str>,
        excluded: Option<&str>,
    ) -> Result<Vec<TableTemplate>> {
        let tables = self.resolve_tables(requested).await?;
        if tables.is_empty() {
            tracing::warn!("No tables matched in schema '{}'", self.schema);
        }

        let mut templates = Vec::with_capacity(tables.len());
        for table in tables {
            let columns = self.resolve_columns(&table, excluded).await?;
            if columns.is_empty() {
                tracing::warn!("Table '{}' has no columns left after exclusions", table);
            }
            templates.push(TableTemplate::new(table, columns));
        }

        Ok(templates)
    }
}
