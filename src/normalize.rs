use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::table::{Cell, Table, ICD9, MONEY_COLUMNS, SERVICE_DATE};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Settles the typed columns of an uploaded table: monetary columns become
/// numbers, the diagnosis-code column becomes text, the service-date column
/// becomes datetimes. Cells that refuse to coerce become `Missing`; one bad
/// cell never fails the load. Absent columns are left alone. Idempotent.
pub fn normalize(mut table: Table) -> Table {
    for label in MONEY_COLUMNS {
        table.map_column(label, coerce_number);
    }
    table.map_column(ICD9, coerce_text);
    table.map_column(SERVICE_DATE, coerce_datetime);
    table
}

fn coerce_number(cell: &Cell) -> Cell {
    match cell {
        Cell::Number(n) => Cell::Number(*n),
        Cell::Text(s) => match parse_number(s) {
            Some(n) => Cell::Number(n),
            None => Cell::Missing,
        },
        Cell::DateTime(_) | Cell::Missing => Cell::Missing,
    }
}

fn coerce_text(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) => Cell::Text(s.clone()),
        // Codes like 4019 arrive as numbers; render without a trailing .0
        // so they read as codes, not quantities.
        Cell::Number(n) => Cell::Text(n.normalize().to_string()),
        Cell::DateTime(_) => Cell::Text(cell.display()),
        Cell::Missing => Cell::Missing,
    }
}

fn coerce_datetime(cell: &Cell) -> Cell {
    match cell {
        Cell::DateTime(dt) => Cell::DateTime(*dt),
        Cell::Text(s) => match parse_datetime(s.trim()) {
            Some(dt) => Cell::DateTime(dt),
            None => Cell::Missing,
        },
        // A bare number is not a calendar date.
        Cell::Number(_) | Cell::Missing => Cell::Missing,
    }
}

/// Numeric parse used for monetary cells: trims, strips thousands
/// separators, falls back to scientific notation. `None` means the cell
/// cannot be read as a number.
pub fn parse_number(raw: &str) -> Option<Decimal> {
    let s = raw.trim().replace(',', "");
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .ok()
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{BILLED, HN, PAID};

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn table_with(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    #[test]
    fn test_money_text_becomes_number() {
        let table = table_with(&[BILLED], vec![vec![text("1,234.50")], vec![text(" 60 ")]]);
        let table = normalize(table);

        assert_eq!(
            table.rows()[0][0],
            Cell::Number(Decimal::from_str("1234.50").unwrap())
        );
        assert_eq!(table.rows()[1][0], Cell::Number(Decimal::from(60)));
    }

    #[test]
    fn test_unparsable_money_becomes_missing() {
        let table = table_with(
            &[BILLED],
            vec![vec![text("ไม่ระบุ")], vec![text("12.3.4")], vec![Cell::Missing]],
        );
        let table = normalize(table);

        for row in table.rows() {
            assert_eq!(row[0], Cell::Missing);
        }
    }

    #[test]
    fn test_icd9_number_becomes_text_without_decimal_point() {
        let table = table_with(
            &[ICD9],
            vec![
                vec![Cell::Number(Decimal::from_str("4019.0").unwrap())],
                vec![text("V72.81")],
            ],
        );
        let table = normalize(table);

        assert_eq!(table.rows()[0][0], text("4019"));
        assert_eq!(table.rows()[1][0], text("V72.81"));
    }

    #[test]
    fn test_service_date_parses_common_formats() {
        let table = table_with(
            &[SERVICE_DATE],
            vec![
                vec![text("2024-01-01")],
                vec![text("2024-01-02 08:15:00")],
                vec![text("03/01/2024")],
                vec![text("not a date")],
                vec![Cell::Number(Decimal::from(45000))],
            ],
        );
        let table = normalize(table);

        let day = |y, m, d: u32| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(table.rows()[0][0].as_date(), Some(day(2024, 1, 1)));
        assert_eq!(table.rows()[1][0].as_date(), Some(day(2024, 1, 2)));
        assert_eq!(table.rows()[2][0].as_date(), Some(day(2024, 1, 3)));
        assert_eq!(table.rows()[3][0], Cell::Missing);
        assert_eq!(table.rows()[4][0], Cell::Missing);
    }

    #[test]
    fn test_other_columns_untouched() {
        let table = table_with(
            &[HN, "หมายเหตุ"],
            vec![vec![text("000123"), text("ผู้ป่วยใน")]],
        );
        let normalized = normalize(table.clone());
        assert_eq!(normalized, table);
    }

    #[test]
    fn test_absent_columns_are_not_synthesized() {
        let table = table_with(&[HN], vec![vec![text("1")]]);
        let normalized = normalize(table);
        assert_eq!(normalized.columns(), &[HN.to_string()]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let table = table_with(
            &[BILLED, PAID, SERVICE_DATE, ICD9],
            vec![
                vec![
                    text("1,000.25"),
                    text("bad"),
                    text("2024-02-29"),
                    Cell::Number(Decimal::from(250)),
                ],
                vec![text(""), Cell::Missing, text("oops"), text("E11.9")],
            ],
        );
        let once = normalize(table);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_number_accepts_grouped_and_scientific() {
        assert_eq!(
            parse_number("1,234,567.80"),
            Some(Decimal::from_str("1234567.80").unwrap())
        );
        assert_eq!(parse_number("1e3"), Some(Decimal::from(1000)));
        assert_eq!(parse_number("-40.5"), Some(Decimal::from_str("-40.5").unwrap()));
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("N/A"), None);
    }
}
