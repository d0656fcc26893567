use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ExportError;
use crate::summary::DailySummary;
use crate::table::{Cell, Table};

/// UTF-8 byte-order marker; spreadsheet tools use it to pick the right
/// decoding for Thai text.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Label of the synthetic total row.
pub const TOTAL_LABEL: &str = "รวม";

// One serialized summary row; the field renames are the display headers.
#[derive(Debug, Serialize)]
struct SummaryCsvRow {
    #[serde(rename = "วันที่")]
    day: String,
    #[serde(rename = "ราย")]
    cases: u64,
    #[serde(rename = "ค่ารักษา")]
    billed: String,
    #[serde(rename = "ชำระจริง")]
    paid: String,
    #[serde(rename = "ค่ารักษาคงเหลือ")]
    outstanding: String,
}

/// Fixed display format for money: thousands separators and exactly two
/// decimal places. `1234567.8` renders as `1,234,567.80`.
pub fn format_money(amount: Decimal) -> String {
    let negative = amount.is_sign_negative() && !amount.is_zero();
    let rounded = amount.abs().round_dp(2);

    let plain = rounded.to_string();
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, f),
        None => (plain.as_str(), ""),
    };

    let mut frac = frac_part.to_string();
    frac.truncate(2);
    while frac.len() < 2 {
        frac.push('0');
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    if negative {
        grouped.push('-');
    }
    for (i, digit) in int_part.bytes().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit as char);
    }
    grouped.push('.');
    grouped.push_str(&frac);
    grouped
}

/// Money rendering for a cell: a missing value is an empty string, never
/// `0.00` and never `NaN`.
pub fn format_money_cell(cell: &Cell) -> String {
    match cell.as_number() {
        Some(n) => format_money(n),
        None => String::new(),
    }
}

fn bom_buffer() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(UTF8_BOM);
    buf
}

/// Serializes the (filtered) raw table: BOM, header row with the display
/// labels, then every row with unformatted values.
pub fn table_to_csv(table: &Table) -> Result<Vec<u8>, ExportError> {
    let mut buf = bom_buffer();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(table.columns())?;
        for row in table.rows() {
            wtr.write_record(row.iter().map(Cell::display))?;
        }
        wtr.flush()?;
    }
    Ok(buf)
}

/// Serializes the daily summary: BOM, display headers, the day rows with
/// formatted money strings, and the labeled total row last.
pub fn summary_to_csv(summary: &DailySummary) -> Result<Vec<u8>, ExportError> {
    let mut buf = bom_buffer();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        for row in &summary.days {
            wtr.serialize(SummaryCsvRow {
                day: row.day.to_string(),
                cases: row.cases,
                billed: format_money(row.billed),
                paid: format_money(row.paid),
                outstanding: format_money(row.outstanding),
            })?;
        }
        wtr.serialize(SummaryCsvRow {
            day: TOTAL_LABEL.to_string(),
            cases: summary.total.cases,
            billed: format_money(summary.total.billed),
            paid: format_money(summary.total.paid),
            outstanding: format_money(summary.total.outstanding),
        })?;
        wtr.flush()?;
    }
    Ok(buf)
}
