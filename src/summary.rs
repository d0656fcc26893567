use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::table::{Cell, Table, BILLED, OUTSTANDING, PAID, SERVICE_DATE};

/// Aggregates for one calendar day of service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRow {
    pub day: NaiveDate,
    pub cases: u64,
    pub billed: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
}

/// The synthetic final row: column-wise sums over the day rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TotalRow {
    pub cases: u64,
    pub billed: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
}

/// Per-day aggregation of a filtered table, days ascending, with the total
/// row computed from the day rows rather than by re-scanning raw data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    pub days: Vec<DayRow>,
    pub total: TotalRow,
}

/// Grand totals over the raw (filtered, non-aggregated) rows. Feeds the
/// three metric widgets and must agree with the per-day path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    pub billed: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
}

/// One point of the daily line chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub day: NaiveDate,
    pub billed: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
}

// Missing cells contribute nothing to a sum; a group of all-missing cells
// sums to zero.
fn add_money(acc: &mut Decimal, row: &[Cell], idx: Option<usize>) {
    if let Some(n) = idx.and_then(|i| row[i].as_number()) {
        *acc += n;
    }
}

/// Groups the table by the date portion of the service-date column. Rows
/// without a valid date form no group; an absent date column yields an
/// empty summary.
pub fn daily_summary(table: &Table) -> DailySummary {
    let mut groups: BTreeMap<NaiveDate, DayRow> = BTreeMap::new();

    if let Some(date_idx) = table.column_index(SERVICE_DATE) {
        let billed_idx = table.column_index(BILLED);
        let paid_idx = table.column_index(PAID);
        let outstanding_idx = table.column_index(OUTSTANDING);

        for row in table.rows() {
            let Some(day) = row[date_idx].as_date() else {
                continue;
            };
            let entry = groups.entry(day).or_insert_with(|| DayRow {
                day,
                cases: 0,
                billed: Decimal::ZERO,
                paid: Decimal::ZERO,
                outstanding: Decimal::ZERO,
            });
            entry.cases += 1;
            add_money(&mut entry.billed, row, billed_idx);
            add_money(&mut entry.paid, row, paid_idx);
            add_money(&mut entry.outstanding, row, outstanding_idx);
        }
    }

    let days: Vec<DayRow> = groups.into_values().collect();
    let mut total = TotalRow::default();
    for row in &days {
        total.cases += row.cases;
        total.billed += row.billed;
        total.paid += row.paid;
        total.outstanding += row.outstanding;
    }

    DailySummary { days, total }
}

/// Direct null-skipping sums over the table, independent of the per-day
/// path.
pub fn grand_totals(table: &Table) -> Totals {
    let billed_idx = table.column_index(BILLED);
    let paid_idx = table.column_index(PAID);
    let outstanding_idx = table.column_index(OUTSTANDING);

    let mut totals = Totals::default();
    for row in table.rows() {
        add_money(&mut totals.billed, row, billed_idx);
        add_money(&mut totals.paid, row, paid_idx);
        add_money(&mut totals.outstanding, row, outstanding_idx);
    }
    totals
}

/// Line-chart input: the day rows minus the case count, ascending.
pub fn chart_series(summary: &DailySummary) -> Vec<ChartPoint> {
    summary
        .days
        .iter()
        .map(|row| ChartPoint {
            day: row.day,
            billed: row.billed,
            paid: row.paid,
            outstanding: row.outstanding,
        })
        .collect()
}
