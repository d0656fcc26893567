use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

// Column labels exactly as they appear in uploaded files.
pub const HN: &str = "HN";
pub const BILLED: &str = "เรียกเก็บ";
pub const PAID: &str = "ชำระแล้ว";
pub const OUTSTANDING: &str = "คงค้าง";
pub const SERVICE_DATE: &str = "วันรับบริการ";
pub const ICD9: &str = "ICD-9";
pub const TREATMENT_PAYER: &str = "สิทธิรักษา";
pub const DEBT_PAYER: &str = "สิทธิลูกหนี้";

pub const MONEY_COLUMNS: [&str; 3] = [BILLED, PAID, OUTSTANDING];

/// A single cell. Uploaded values start out as `Text` (CSV) or whatever the
/// workbook carried (Excel); the normalizer settles the typed columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(Decimal),
    DateTime(NaiveDateTime),
    Missing,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Date portion of a datetime cell; the time of day never participates
    /// in filtering or grouping.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Unformatted display string: numbers as-is, midnight datetimes as a
    /// bare date, missing as the empty string.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::DateTime(dt) if dt.time() == NaiveTime::MIN => dt.date().to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Cell::Missing => String::new(),
        }
    }
}

/// Row-and-column table with the schema inferred from the upload header.
/// Every row is exactly as wide as the header; filtering produces a new
/// table with the same columns and fewer rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding short rows with `Missing` and truncating long
    /// ones to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Missing);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with this label, if present. Duplicate
    /// labels keep their cells but only the first is semantically
    /// interpreted.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    pub fn cell(&self, row: usize, label: &str) -> Option<&Cell> {
        let idx = self.column_index(label)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Rewrites one column cell-by-cell; a no-op when the column is absent.
    pub fn map_column(&mut self, label: &str, f: impl Fn(&Cell) -> Cell) {
        if let Some(idx) = self.column_index(label) {
            for row in &mut self.rows {
                row[idx] = f(&row[idx]);
            }
        }
    }

    /// New table keeping only the rows the predicate accepts. Column schema
    /// and relative row order are preserved.
    pub fn retained(&self, pred: impl Fn(&[Cell]) -> bool) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| pred(row))
                .cloned()
                .collect(),
        }
    }
}
