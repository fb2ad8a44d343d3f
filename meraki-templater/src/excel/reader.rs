//! Read network-to-template assignments from an Excel workbook

use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, Xlsx, open_workbook};

/// Expected header of the network-name column
pub const NETWORK_HEADER: &str = "Network name";
/// Expected header of the target-template column
pub const TEMPLATE_HEADER: &str = "New template to be moved";

/// One desired network → template move, as described by a spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAssignment {
    pub network_name: String,
    pub template_name: String,
}

/// Read assignments from every sheet of the workbook at `path`.
///
/// Each sheet must carry the [`NETWORK_HEADER`] and [`TEMPLATE_HEADER`]
/// columns in its first row; extra columns are ignored and column order is
/// free. Duplicate network names (within or across sheets): the last row
/// wins, keeping the first occurrence's position in the output order. Rows
/// with an empty network-name cell are skipped.
pub fn read_assignments(path: &str) -> Result<Vec<TemplateAssignment>> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).with_context(|| format!("Failed to open Excel file: {}", path))?;

    let sheet_names = workbook.sheet_names().to_owned();

    let mut order: Vec<String> = Vec::new();
    let mut templates: HashMap<String, String> = HashMap::new();

    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            continue; // sheet with no rows contributes nothing
        };

        let network_col = find_column(header, NETWORK_HEADER, &sheet_name)?;
        let template_col = find_column(header, TEMPLATE_HEADER, &sheet_name)?;

        for row in rows {
            let network_name = get_cell_string(row, network_col);
            if network_name.is_empty() {
                continue;
            }
            let template_name = get_cell_string(row, template_col);
            if !templates.contains_key(&network_name) {
                order.push(network_name.clone());
            }
            templates.insert(network_name, template_name);
        }
    }

    Ok(order
        .into_iter()
        .map(|network_name| {
            let template_name = templates.remove(&network_name).unwrap_or_default();
            TemplateAssignment {
                network_name,
                template_name,
            }
        })
        .collect())
}

fn find_column(header: &[Data], name: &str, sheet_name: &str) -> Result<usize> {
    match header
        .iter()
        .position(|cell| cell.to_string().trim() == name)
    {
        Some(col) => Ok(col),
        None => bail!("Sheet '{}' is missing expected column '{}'", sheet_name, name),
    }
}

fn get_cell_string(row: &[Data], col: usize) -> String {
    row.get(col)
        .map(|c| match c {
            Data::String(s) => s.trim().to_string(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => {
                if f.fract() == 0.0 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Data::Bool(b) => b.to_string(),
            _ => String::new(),
        })
        .unwrap_or_default()
}
