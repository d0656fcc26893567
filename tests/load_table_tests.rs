use receivables::error::LoadError;
use receivables::load_table;
use receivables::normalize::normalize;
use receivables::table::{Cell, BILLED, HN, SERVICE_DATE};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs;
use std::str::FromStr;
use tempfile::Builder;

fn csv_file(content: &str) -> tempfile::NamedTempFile {
    let file = Builder::new().suffix(".csv").tempfile().unwrap();
    fs::write(&file, content).unwrap();
    file
}

#[test]
fn test_load_table_valid_csv() {
    let file = csv_file(
        "HN,เรียกเก็บ,ชำระแล้ว,คงค้าง,วันรับบริการ,สิทธิรักษา\n\
         1,100.50,60,40.50,2024-01-01,A\n\
         2,200,200,0,2024-01-02,B",
    );

    let table = load_table(file.path()).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.columns().len(), 6);
    assert_eq!(table.columns()[1], BILLED);

    // Loading keeps everything textual; typing is the normalizer's job.
    assert_eq!(table.cell(0, HN), Some(&Cell::Text("1".to_string())));
    assert_eq!(table.cell(0, BILLED), Some(&Cell::Text("100.50".to_string())));
}

#[test]
fn test_load_table_header_only() {
    let file = csv_file("HN,เรียกเก็บ");
    let table = load_table(file.path()).unwrap();

    assert_eq!(table.len(), 0);
    assert_eq!(table.columns().len(), 2);
}

#[test]
fn test_load_table_empty_fields_become_missing() {
    let file = csv_file("HN,เรียกเก็บ\n1,\n,200");
    let table = load_table(file.path()).unwrap();

    assert_eq!(table.cell(0, BILLED), Some(&Cell::Missing));
    assert_eq!(table.cell(1, HN), Some(&Cell::Missing));
}

#[test]
fn test_load_table_ragged_rows() {
    let file = csv_file("HN,เรียกเก็บ,คงค้าง\n1\n2,200,0,extra");
    let table = load_table(file.path()).unwrap();

    assert_eq!(table.len(), 2);
    for row in table.rows() {
        assert_eq!(row.len(), 3);
    }
    assert_eq!(table.rows()[0][1], Cell::Missing);
    assert_eq!(table.rows()[1][1], Cell::Text("200".to_string()));
}

#[test]
fn test_load_table_unsupported_extension() {
    let file = Builder::new().suffix(".txt").tempfile().unwrap();
    fs::write(&file, "HN\n1").unwrap();

    let result = load_table(file.path());
    assert!(matches!(result, Err(LoadError::UnsupportedFormat(_))));
}

#[test]
fn test_load_table_nonexistent_file() {
    assert!(load_table("nonexistent_report.csv").is_err());
    assert!(load_table("nonexistent_report.xlsx").is_err());
}

#[test]
fn test_load_table_large_file() {
    let mut content = String::from("HN,เรียกเก็บ,วันรับบริการ\n");
    for i in 1..=100 {
        content.push_str(&format!("{},{},2024-01-{:02}\n", i, i * 10, (i % 28) + 1));
    }
    let file = csv_file(&content);

    let table = load_table(file.path()).unwrap();
    assert_eq!(table.len(), 100);
    assert_eq!(
        table.cell(49, HN),
        Some(&Cell::Text("50".to_string()))
    );
}

#[test]
fn test_load_then_normalize_settles_types() {
    let file = csv_file(
        "HN,เรียกเก็บ,วันรับบริการ\n\
         1,\"1,234.50\",2024-01-05\n\
         2,ยังไม่สรุป,ไม่ทราบ",
    );

    let table = normalize(load_table(file.path()).unwrap());

    assert_eq!(
        table.cell(0, BILLED).and_then(Cell::as_number),
        Some(Decimal::from_str("1234.50").unwrap())
    );
    assert_eq!(
        table.cell(0, SERVICE_DATE).and_then(Cell::as_date),
        Some(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
    );

    // Unparsable cells coerce to missing instead of failing the load.
    assert_eq!(table.cell(1, BILLED), Some(&Cell::Missing));
    assert_eq!(table.cell(1, SERVICE_DATE), Some(&Cell::Missing));
}
