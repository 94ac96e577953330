//! Optional TOML configuration file.
//!
//! Every key is optional; values given on the command line or through the
//! environment take precedence over the file.
//!
//! ```toml
//! [connection]
//! host = "env3"
//! port = 5432
//! database = "lab"
//! username = "cgrant"
//!
//! [template]
//! schema = "public"
//! tables = "e_*,x_*"
//! exclude_columns = "rev_user,rev_time"
//! exclude_serial = true
//! format = "ods"
//! ```

use crate::{Result, document::OutputFormat, error::TemplateError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection settings from the `[connection]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub username: Option<String>,
}

/// Template settings from the `[template]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateSection {
    pub schema: Option<String>,
    pub tables: Option<String>,
    pub exclude_columns: Option<String>,
    pub exclude_serial: Option<bool>,
    pub format: Option<OutputFormat>,
}

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    #[serde(default)]
    pub connection: ConnectionSection,
    #[serde(default)]
    pub template: TemplateSection,
}

impl TemplateConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    /// Returns `TemplateError::Configuration` for malformed TOML, unknown
    /// keys or values of the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| {
            TemplateError::configuration(format!("Invalid configuration file: {}", e))
        })
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    /// Returns `TemplateError::Io` if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TemplateError::io(format!("Failed to read configuration file {}", path.display()), e)
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }
}
