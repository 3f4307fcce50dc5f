//! Workbook encoding via `rust_xlsxwriter`.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use sales_core::error::{Result, SalesError};
use sales_core::table::{Cell, Sheet, WorkbookWriter};

/// [`WorkbookWriter`] producing `.xlsx` files with a bold header row.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWriter;

impl WorkbookWriter for XlsxWriter {
    fn write_workbook(&self, path: &Path, sheets: &[Sheet]) -> Result<()> {
        build_workbook(path, sheets).map_err(|e| SalesError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

fn build_workbook(path: &Path, sheets: &[Sheet]) -> std::result::Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &bold)?;
        }

        for (idx, row) in sheet.rows.iter().enumerate() {
            let r = idx as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let c = col as u16;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s)?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, c, *n)?;
                    }
                    Cell::Bool(b) => {
                        worksheet.write_boolean(r, c, *b)?;
                    }
                    Cell::DateTime(dt) => {
                        worksheet.write_string(r, c, dt.to_string())?;
                    }
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
