//! Spreadsheet template documents.
//!
//! A [`TemplateDocument`] collects sheets and their header rows in memory
//! and writes them to disk only in [`TemplateDocument::save_and_close`].
//! Every cell is plain text; no styles, formulas or column widths.
//!
//! # Module Structure
//! - `format`: output format selection
//! - `ods`: OpenDocument Spreadsheet backend (`spreadsheet-ods`)
//! - `xlsx`: Office Open XML backend (`rust_xlsxwriter`)

mod format;
mod ods;
mod xlsx;

use crate::{Result, error::TemplateError, models::TableTemplate};
use std::path::{Path, PathBuf};

pub use format::OutputFormat;

/// Handle to a sheet added with [`TemplateDocument::add_sheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetHandle(usize);

/// Sheet content pending write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SheetData {
    pub(crate) name: String,
    pub(crate) rows: Vec<Vec<String>>,
}

/// Spreadsheet being assembled for one output file.
///
/// # Example
///
/// ```rust,no_run
/// use tbltemplate_core::document::{OutputFormat, TemplateDocument};
///
/// let mut document = TemplateDocument::create("templates.ods", OutputFormat::Ods);
/// let sheet = document.add_sheet("orders");
/// document
///     .append_header_row(sheet, &["name".to_string(), "total".to_string()])
///     .unwrap();
/// document.save_and_close().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    path: PathBuf,
    format: OutputFormat,
    sheets: Vec<SheetData>,
}

impl TemplateDocument {
    /// Starts a document that will be written to `path` as `format`.
    ///
    /// Nothing touches the filesystem until `save_and_close`.
    pub fn create(path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            path: path.into(),
            format,
            sheets: Vec::new(),
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Number of sheets added so far.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Sheet names in insertion order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Appends an empty sheet named `name`.
    ///
    /// Names are not checked for duplicates.
    pub fn add_sheet(&mut self, name: impl Into<String>) -> SheetHandle {
        let handle = SheetHandle(self.sheets.len());
        self.sheets.push(SheetData {
            name: name.into(),
            rows: Vec::new(),
        });
        handle
    }

    /// Appends one row of text cells to `sheet`, in the given order.
    ///
    /// # Errors
    /// Returns `TemplateError::Configuration` if `sheet` does not belong to
    /// this document.
    pub fn append_header_row(&mut self, sheet: SheetHandle, cells: &[String]) -> Result<()> {
        let data = self.sheets.get_mut(sheet.0).ok_or_else(|| {
            TemplateError::configuration(format!("unknown sheet handle {}", sheet.0))
        })?;
        data.rows.push(cells.to_vec());
        Ok(())
    }

    /// Adds one sheet per template, each with its header row.
    pub fn add_templates(&mut self, templates: &[TableTemplate]) -> Result<()> {
        for template in templates {
            let sheet = self.add_sheet(template.name.as_str());
            self.append_header_row(sheet, &template.columns)?;
        }
        Ok(())
    }

    /// Whether no sheet has been added.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Writes the document and consumes it.
    ///
    /// Missing parent directories are created first. The file is written in
    /// place; a failure part-way may leave a partial or missing file.
    ///
    /// A document without sheets is not written at all, in either format,
    /// and any existing file at the path is left untouched.
    ///
    /// # Errors
    /// `TemplateError::Io` if the parent directory cannot be created,
    /// `TemplateError::Write` if the backend fails.
    pub fn save_and_close(self) -> Result<()> {
        if self.is_empty() {
            tracing::warn!("No sheets to write, {} not created", self.path.display());
            return Ok(());
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                TemplateError::io(
                    format!("Failed to create directory {}", parent.display()),
                    e,
                )
            })?;
            tracing::debug!("Created output directory {}", parent.display());
        }

        tracing::debug!(
            "Writing {} sheets to {} as {}",
            self.sheets.len(),
            self.path.display(),
            self.format
        );

        match self.format {
            OutputFormat::Ods => ods::write(&self.path, &self.sheets),
            OutputFormat::Xlsx => xlsx::write(&self.path, &self.sheets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Reader, open_workbook_auto};

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn read_back(path: &Path) -> Vec<(String, Vec<Vec<String>>)> {
        let mut workbook = open_workbook_auto(path).unwrap();
        workbook
            .sheet_names()
            .into_iter()
            .map(|name| {
                let range = workbook.worksheet_range(&name).unwrap();
                let rows = range
                    .rows()
                    .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                    .collect();
                (name, rows)
            })
            .collect()
    }

    #[test]
    fn test_nothing_written_before_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.ods");

        let mut document = TemplateDocument::create(&path, OutputFormat::Ods);
        let sheet = document.add_sheet("orders");
        document.append_header_row(sheet, &header(&["id"])).unwrap();

        assert!(!path.exists());
        assert_eq!(document.sheet_names(), ["orders"]);
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let mut other = TemplateDocument::create("other.ods", OutputFormat::Ods);
        other.add_sheet("a");
        let foreign = other.add_sheet("b");

        let mut document = TemplateDocument::create("doc.ods", OutputFormat::Ods);
        let result = document.append_header_row(foreign, &header(&["x"]));

        assert!(matches!(result, Err(TemplateError::Configuration { .. })));
    }

    #[test]
    fn test_ods_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.ods");

        let mut document = TemplateDocument::create(&path, OutputFormat::Ods);
        document
            .add_templates(&[
                TableTemplate::new("a", header(&["col1", "col2"])),
                TableTemplate::new("b", header(&["col3"])),
            ])
            .unwrap();
        document.save_and_close().unwrap();

        let sheets = read_back(&path);
        assert_eq!(
            sheets,
            vec![
                ("a".to_string(), vec![header(&["col1", "col2"])]),
                ("b".to_string(), vec![header(&["col3"])]),
            ]
        );
    }

    #[test]
    fn test_xlsx_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.xlsx");

        let mut document = TemplateDocument::create(&path, OutputFormat::Xlsx);
        document
            .add_templates(&[
                TableTemplate::new("orders", header(&["name", "total"])),
                TableTemplate::new("x_a", header(&["a"])),
            ])
            .unwrap();
        document.save_and_close().unwrap();

        let sheets = read_back(&path);
        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].0, "orders");
        assert_eq!(sheets[0].1, vec![header(&["name", "total"])]);
        assert_eq!(sheets[1].0, "x_a");
        assert_eq!(sheets[1].1, vec![header(&["a"])]);
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("templates.ods");

        let mut document = TemplateDocument::create(&path, OutputFormat::Ods);
        let sheet = document.add_sheet("orders");
        document.append_header_row(sheet, &header(&["id"])).unwrap();
        document.save_and_close().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_empty_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();

        for name in ["nested/empty.ods", "nested/empty.xlsx"] {
            let path = dir.path().join(name);
            let document = TemplateDocument::create(&path, OutputFormat::from_path(&path));
            assert!(document.is_empty());

            document.save_and_close().unwrap();
            assert!(!path.exists(), "{} should not be created", name);
        }
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn test_empty_header_row_keeps_sheet() {
        let dir = tempfile::tempdir().unwrap();

        for name in ["bare.ods", "bare.xlsx"] {
            let path = dir.path().join(name);
            let mut document = TemplateDocument::create(&path, OutputFormat::from_path(&path));
            document
                .add_templates(&[
                    TableTemplate::new("audit", Vec::new()),
                    TableTemplate::new("orders", header(&["total"])),
                ])
                .unwrap();
            document.save_and_close().unwrap();

            let sheets = read_back(&path);
            assert_eq!(sheets.len(), 2, "{}", name);
            assert_eq!(sheets[0].0, "audit");
            assert!(sheets[0].1.iter().all(|row| row.iter().all(String::is_empty)));
            assert_eq!(sheets[1].1, vec![header(&["total"])]);
        }
    }

    #[test]
    fn test_xlsx_rejects_overlong_sheet_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.xlsx");

        let mut document = TemplateDocument::create(&path, OutputFormat::Xlsx);
        let sheet = document.add_sheet("a_table_name_well_beyond_thirty_one_characters");
        document.append_header_row(sheet, &header(&["id"])).unwrap();

        let result = document.save_and_close();
        assert!(matches!(result, Err(TemplateError::Write { .. })));
    }
}
