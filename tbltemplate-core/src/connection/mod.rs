//! Database connection configuration and session management.
//!
//! # Module Structure
//! - `config`: connection target description (no credentials)
//! - `manager`: single live PostgreSQL session with lazy open (feature `postgresql`)
//! - `rows`: typed field extraction from result rows (feature `postgresql`)

mod config;

#[cfg(feature = "postgresql")]
mod manager;
#[cfg(feature = "postgresql")]
mod rows;

pub use config::{ConnectionConfig, DEFAULT_PORT};

#[cfg(feature = "postgresql")]
pub use manager::ConnectionManager;
#[cfg(feature = "postgresql")]
pub use rows::RowExt;
