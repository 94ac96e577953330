use crate::error::TemplateError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File format of the output document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// OpenDocument Spreadsheet (`.ods`)
    #[default]
    Ods,
    /// Office Open XML workbook (`.xlsx`)
    Xlsx,
}

impl OutputFormat {
    /// Picks the format from the file extension: `.xlsx` selects XLSX,
    /// anything else ODS.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Self::Xlsx,
            _ => Self::Ods,
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Ods => "ods",
            Self::Xlsx => "xlsx",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ods => write!(f, "ODS"),
            Self::Xlsx => write!(f, "XLSX"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ods" => Ok(Self::Ods),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(TemplateError::configuration(format!(
                "unknown output format '{}' (expected ods or xlsx)",
                other
            ))),
        }
    }
}
