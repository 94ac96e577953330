//! In-memory catalog.
//!
//! Holds schemas, tables and columns in insertion order and answers
//! pattern lookups with PostgreSQL `ILIKE` semantics. Useful for exercising
//! resolution rules without a server.

use super::Catalog;
use crate::{Result, error::TemplateError, models::ColumnInfo};
use async_trait::async_trait;

#[derive(Debug, Clone)]
struct MemoryTable {
    name: String,
    columns: Vec<ColumnInfo>,
}

/// Catalog fixture backed by plain vectors.
///
/// # Example
///
/// ```rust
/// use tbltemplate_core::{catalog::{Catalog, MemoryCatalog}, models::ColumnInfo};
///
/// # tokio_test_block(async {
/// let mut catalog = MemoryCatalog::new()
///     .with_table("public", "orders", vec![ColumnInfo::serial("id"), ColumnInfo::new("total")]);
/// assert!(catalog.table_exists("public", "orders").await.unwrap());
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    schemas: Vec<(String, Vec<MemoryTable>)>,
    failure: Option<String>,
    queries: usize,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `schema.table` with `columns`, replacing an existing definition.
    pub fn with_table(
        mut self,
        schema: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<ColumnInfo>,
    ) -> Self {
        self.insert_table(schema, table, columns);
        self
    }

    /// Adds `schema.table` with `columns`, replacing an existing definition.
    pub fn insert_table(
        &mut self,
        schema: impl Into<String>,
        table: impl Into<String>,
        columns: Vec<ColumnInfo>,
    ) {
        let schema = schema.into();
        let table = MemoryTable {
            name: table.into(),
            columns,
        };

        let position = self.schemas.iter().position(|(name, _)| *name == schema);
        let tables = match position {
            Some(index) => &mut self.schemas[index].1,
            None => {
                self.schemas.push((schema, Vec::new()));
                match self.schemas.last_mut() {
                    Some((_, tables)) => tables,
                    None => return,
                }
            }
        };

        match tables.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => *existing = table,
            None => tables.push(table),
        }
    }

    /// Makes every subsequent lookup fail with `message`.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of lookups answered so far, failed ones included.
    pub fn query_count(&self) -> usize {
        self.queries
    }

    fn begin_query(&mut self) -> Result<()> {
        self.queries = self.queries.saturating_add(1);
        match &self.failure {
            Some(message) => Err(TemplateError::query_failed(
                "Failed to execute catalog query",
                std::io::Error::other(message.clone()),
            )),
            None => Ok(()),
        }
    }

    fn tables(&self, schema: &str) -> &[MemoryTable] {
        self.schemas
            .iter()
            .find(|(name, _)| name == schema)
            .map_or(&[], |(_, tables)| tables.as_slice())
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn list_tables(&mut self, schema: &str) -> Result<Vec<String>> {
        self.begin_query()?;
        Ok(self.tables(schema).iter().map(|t| t.name.clone()).collect())
    }

    async fn find_tables(&mut self, schema: &str, like_pattern: &str) -> Result<Vec<String>> {
        self.begin_query()?;
        Ok(self
            .tables(schema)
            .iter()
            .filter(|t| ilike(like_pattern, &t.name))
            .map(|t| t.name.clone())
            .collect())
    }

    async fn table_exists(&mut self, schema: &str, table: &str) -> Result<bool> {
        self.begin_query()?;
        Ok(self.tables(schema).iter().any(|t| t.name == table))
    }

    async fn list_columns(&mut self, schema: &str, table: &str) -> Result<Vec<ColumnInfo>> {
        self.begin_query()?;
        Ok(self
            .tables(schema)
            .iter()
            .find(|t| t.name == table)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikeToken {
    AnyRun,
    AnyChar,
    Literal(char),
}

fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => tokens.push(LikeToken::AnyRun),
            '_' => tokens.push(LikeToken::AnyChar),
            '\\' => {
                let escaped = chars.next().unwrap_or('\\');
                tokens.extend(escaped.to_lowercase().map(LikeToken::Literal));
            }
            other => tokens.extend(other.to_lowercase().map(LikeToken::Literal)),
        }
    }
    tokens
}

/// Case-insensitive `LIKE` match of `candidate` against `pattern`.
pub(crate) fn ilike(pattern: &str, candidate: &str) -> bool {
    let text: Vec<char> = candidate.chars().flat_map(char::to_lowercase).collect();

    // reachable[i]: the tokens seen so far can consume exactly text[..i]
    let mut reachable = vec![false; text.len() + 1];
    reachable[0] = true;

    for token in like_tokens(pattern) {
        let mut next = vec![false; text.len() + 1];
        match token {
            LikeToken::AnyRun => {
                let mut seen = false;
                for (slot, &was) in next.iter_mut().zip(&reachable) {
                    seen |= was;
                    *slot = seen;
                }
            }
            LikeToken::AnyChar => {
                for (i, _) in text.iter().enumerate() {
                    if reachable[i] {
                        next[i + 1] = true;
                    }
                }
            }
            LikeToken::Literal(expected) => {
                for (i, &actual) in text.iter().enumerate() {
                    if reachable[i] && actual == expected {
                        next[i + 1] = true;
                    }
                }
            }
        }
        reachable = next;
    }

    reachable[text.len()]
}
