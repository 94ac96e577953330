//! Core library for tbltemplate.
//!
//! Resolves which tables and columns of a PostgreSQL schema should become
//! spreadsheet templates, and writes one sheet per table with a single
//! header row of column names.
//!
//! # Security Guarantees
//! - Catalog access is read-only and parameterized
//! - Passwords come from an injected provider and are zeroed after use
//! - No credentials in logs, errors or `Debug` output
//!
//! # Architecture
//! - `catalog::Catalog` abstracts metadata lookups (PostgreSQL or in-memory)
//! - `resolver::SchemaResolver` owns a catalog and applies table patterns
//!   and column exclusions
//! - `document::TemplateDocument` buffers sheets and writes ODS or XLSX

pub mod catalog;
pub mod config;
pub mod connection;
pub mod document;
pub mod error;
pub mod logging;
pub mod models;
pub mod resolver;
pub mod security;

// Re-export commonly used types
pub use catalog::{Catalog, MemoryCatalog};
pub use config::TemplateConfig;
pub use connection::ConnectionConfig;
pub use document::{OutputFormat, SheetHandle, TemplateDocument};
pub use error::{Result, TemplateError};
pub use logging::init_logging;
pub use models::{ColumnInfo, TableTemplate};
pub use resolver::{ColumnExclusions, SchemaResolver};

#[cfg(feature = "postgresql")]
pub use catalog::PgCatalog;
#[cfg(feature = "postgresql")]
pub use connection::ConnectionManager;
