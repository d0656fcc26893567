pub mod error;
pub mod export;
pub mod filter;
pub mod normalize;
pub mod session;
pub mod summary;
pub mod table;

use std::fs::File;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use csv::ReaderBuilder;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::LoadError;
use crate::table::{Cell, Table};

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["csv", "xlsx", "xls", "xlsb", "ods"];

/// Parses an uploaded spreadsheet into a table: one header row, every other
/// row a record. Cell typing is settled later by the normalizer. A file
/// that cannot be read at all fails the load as a whole; individual bad
/// records are skipped with a warning.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table, LoadError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let table = match ext.as_deref() {
        Some("csv") => load_csv(path)?,
        Some("xlsx" | "xls" | "xlsb" | "ods") => load_excel(path)?,
        _ => return Err(LoadError::UnsupportedFormat(path.display().to_string())),
    };

    info!(
        rows = table.len(),
        columns = table.columns().len(),
        path = %path.display(),
        "loaded table"
    );
    Ok(table)
}

fn load_csv(path: &Path) -> Result<Table, LoadError> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::EmptyTable(path.display().to_string()));
    }

    let mut table = Table::new(headers.iter().map(str::to_string).collect());
    for (i, record) in rdr.records().enumerate() {
        match record {
            Ok(record) => table.push_row(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            Cell::Missing
                        } else {
                            Cell::Text(field.to_string())
                        }
                    })
                    .collect(),
            ),
            Err(e) => warn!(line = i + 2, error = %e, "skipping unreadable CSV record"),
        }
    }
    Ok(table)
}

// The original report reads the workbook's default sheet; multi-sheet
// files use the first sheet here as well.
fn load_excel(path: &Path) -> Result<Table, LoadError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .ok_or_else(|| LoadError::EmptyTable(path.display().to_string()))?;
    let range = workbook.worksheet_range(first)?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| LoadError::EmptyTable(path.display().to_string()))?;

    let columns: Vec<String> = header_row.iter().map(|d| convert_cell(d).display()).collect();
    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(convert_cell).collect());
    }
    Ok(table)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Missing,
        Data::String(s) => {
            if s.is_empty() {
                Cell::Missing
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(n) => match Decimal::from_f64(*n) {
            Some(d) => Cell::Number(d),
            None => Cell::Missing,
        },
        Data::Int(n) => Cell::Number(Decimal::from(*n)),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => Cell::DateTime(dt),
            None => {
                warn!(serial = dt.as_f64(), "unconvertible Excel datetime treated as missing");
                Cell::Missing
            }
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => {
            warn!(error = ?e, "cell error value treated as missing");
            Cell::Missing
        }
    }
}
