//! Write assignment outcomes to an Excel workbook

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;

use crate::executor::AssignmentResult;

/// Output column headers, in order
mod headers {
    pub const NETWORK: &str = "network";
    pub const NEW_TEMPLATE: &str = "new template";
    pub const IP: &str = "ip";
    pub const SUBNET: &str = "subnet";
}

/// Write one row per result to a single-sheet workbook at `path`.
///
/// The file is always written, headers included, even for zero results; an
/// existing file at the same path is overwritten. A missing subnet renders
/// as an empty cell.
pub fn write_results(results: &[AssignmentResult], path: &str) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let columns = [
        headers::NETWORK,
        headers::NEW_TEMPLATE,
        headers::IP,
        headers::SUBNET,
    ];
    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name)?;
    }

    for (row_idx, result) in results.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        worksheet.write_string(row, 0, &result.network)?;
        worksheet.write_string(row, 1, &result.new_template)?;
        worksheet.write_string(row, 2, &result.ip)?;
        if let Some(ref subnet) = result.subnet {
            worksheet.write_string(row, 3, subnet)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path))?;

    Ok(())
}
