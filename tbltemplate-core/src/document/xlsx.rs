use super::SheetData;
use crate::{Result, error::TemplateError};
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Writes `sheets` as an XLSX workbook with string cells.
///
/// Sheet names must satisfy the format's rules (at most 31 characters, none
/// of `[]:*?/\`); violations come back as write errors.
pub(super) fn write(path: &Path, sheets: &[SheetData]) -> Result<()> {
    let mut workbook = Workbook::new();

    for data in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(data.name.as_str())
            .map_err(|e| TemplateError::write_failed(path, e))?;

        for (row, cells) in (0u32..).zip(&data.rows) {
            for (col, value) in (0u16..).zip(cells) {
                worksheet
                    .write_string(row, col, value.as_str())
                    .map_err(|e| TemplateError::write_failed(path, e))?;
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| TemplateError::write_failed(path, e))
}
