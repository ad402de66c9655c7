//! Spreadsheet reading.
//!
//! Opens any workbook format calamine understands and flattens every
//! worksheet into a [`Sheet`]: the first row becomes the headers, the rest
//! become data rows of plain strings.

use std::io::{Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use drillbook_core::builder::Sheet;

/// File extensions opened as workbooks.
pub const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read every worksheet of a workbook file.
pub fn read_workbook(path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook: {}", path.display()))?;
    read_sheets(&mut workbook)
}

fn read_sheets<RS>(workbook: &mut Sheets<RS>) -> Result<Vec<Sheet>>
where
    RS: Read + Seek,
{
    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for name in sheet_names {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                tracing::warn!("skipping sheet '{name}': {e}");
                continue;
            }
        };

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(data_to_string).collect::<Vec<_>>());
        let headers = rows.next().unwrap_or_default();
        let rows: Vec<Vec<String>> = rows.collect();
        tracing::debug!("sheet '{name}': {} columns, {} rows", headers.len(), rows.len());

        sheets.push(Sheet {
            name,
            headers,
            rows,
        });
    }

    Ok(sheets)
}

/// Render a cell the way it reads in the spreadsheet.
pub fn data_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole numbers are stored as floats.
            if f.fract() == 0.0 {
                format!("{f:.0}")
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{e:?}"),
    }
}
