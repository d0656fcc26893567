use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::table::{Table, DEBT_PAYER, SERVICE_DATE, TREATMENT_PAYER};

/// The two payer-category columns a report can be narrowed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    TreatmentPayer,
    DebtPayer,
}

impl CategoryField {
    pub const ALL: [CategoryField; 2] = [CategoryField::TreatmentPayer, CategoryField::DebtPayer];

    /// Column label, which doubles as the display name.
    pub fn label(self) -> &'static str {
        match self {
            CategoryField::TreatmentPayer => TREATMENT_PAYER,
            CategoryField::DebtPayer => DEBT_PAYER,
        }
    }
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Intersects with `bounds`. The result can be empty (start past end)
    /// when the two ranges are disjoint; an empty range matches no rows.
    pub fn clamp_to(self, bounds: DateRange) -> DateRange {
        DateRange {
            start: self.start.max(bounds.start),
            end: self.end.min(bounds.end),
        }
    }
}

/// Distinct, sorted, non-missing values of the category column. Empty when
/// the column is absent. The first entry is the UI's default selection.
pub fn category_options(table: &Table, field: CategoryField) -> Vec<String> {
    let Some(idx) = table.column_index(field.label()) else {
        return Vec::new();
    };
    let values: BTreeSet<String> = table
        .rows()
        .iter()
        .filter(|row| !row[idx].is_missing())
        .map(|row| row[idx].display())
        .collect();
    values.into_iter().collect()
}

/// Keeps rows whose category cell equals `value` exactly. No-op when the
/// column is absent; missing cells never match.
pub fn filter_category(table: &Table, field: CategoryField, value: &str) -> Table {
    match table.column_index(field.label()) {
        None => table.clone(),
        Some(idx) => {
            table.retained(|row| !row[idx].is_missing() && row[idx].display() == value)
        }
    }
}

/// Min/max service date present in the table. Falls back to `today` on both
/// ends when the column is absent or holds no valid date.
pub fn date_bounds(table: &Table, today: NaiveDate) -> DateRange {
    let dates = table.column_index(SERVICE_DATE).map(|idx| {
        table
            .rows()
            .iter()
            .filter_map(|row| row[idx].as_date())
            .collect::<Vec<_>>()
    });
    match dates {
        Some(dates) if !dates.is_empty() => DateRange {
            start: dates.iter().copied().min().unwrap_or(today),
            end: dates.iter().copied().max().unwrap_or(today),
        },
        _ => DateRange {
            start: today,
            end: today,
        },
    }
}

/// Keeps rows whose service date (date portion only) lies inside `range`,
/// both ends inclusive. Rows without a valid date are dropped. No-op when
/// the column is absent.
pub fn filter_date_range(table: &Table, range: DateRange) -> Table {
    match table.column_index(SERVICE_DATE) {
        None => table.clone(),
        Some(idx) => table.retained(|row| match row[idx].as_date() {
            Some(day) => range.contains(day),
            None => false,
        }),
    }
}
