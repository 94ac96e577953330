use super::SheetData;
use crate::{Result, error::TemplateError};
use spreadsheet_ods::{Sheet, WorkBook};
use std::path::Path;

/// Writes `sheets` as an OpenDocument Spreadsheet with string-typed cells.
pub(super) fn write(path: &Path, sheets: &[SheetData]) -> Result<()> {
    let mut book = WorkBook::new_empty();

    for data in sheets {
        let mut sheet = Sheet::new(data.name.as_str());
        for (row, cells) in (0u32..).zip(&data.rows) {
            for (col, value) in (0u32..).zip(cells) {
                sheet.set_value(row, col, value.as_str());
            }
        }
        book.push_sheet(sheet);
    }

    spreadsheet_ods::write_ods(&mut book, path).map_err(|e| TemplateError::write_failed(path, e))
}
