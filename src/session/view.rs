use chrono::NaiveDate;

use crate::export::format_money;
use crate::filter::{
    category_options, date_bounds, filter_category, filter_date_range, CategoryField, DateRange,
};
use crate::session::FilterState;
use crate::summary::{chart_series, daily_summary, grand_totals, ChartPoint, DailySummary, Totals};
use crate::table::Table;

/// Everything a renderer needs for one report: the filtered rows, the
/// metric totals, the daily summary, the chart series, and the effective
/// filter selections. The filtered table is computed once and threaded
/// into every derived view.
#[derive(Debug, Clone)]
pub struct ReportView {
    pub filtered: Table,
    pub totals: Totals,
    pub summary: DailySummary,
    pub chart: Vec<ChartPoint>,
    pub category_field: CategoryField,
    pub category_value: Option<String>,
    pub category_options: Vec<String>,
    pub date_range: DateRange,
    pub date_bounds: DateRange,
}

impl ReportView {
    /// The three metric widgets, labeled and rendered with the currency
    /// suffix.
    pub fn metrics(&self) -> [(&'static str, String); 3] {
        [
            ("ยอดเรียกเก็บรวม", format!("{} บาท", format_money(self.totals.billed))),
            ("ยอดชำระแล้ว", format!("{} บาท", format_money(self.totals.paid))),
            ("ยอดคงค้าง", format!("{} บาท", format_money(self.totals.outstanding))),
        ]
    }

    /// Title of the daily-summary view, suffixed with the active category
    /// selection when there is one.
    pub fn summary_title(&self) -> String {
        let mut title = String::from("สรุปข้อมูลตามวันที่รับบริการ");
        if let Some(value) = &self.category_value {
            title.push_str(&format!(" ({}: {})", self.category_field.label(), value));
        }
        title
    }
}

/// Runs the whole pipeline for the given state. The category filter is
/// applied first and the date bounds derive from its result, so the date
/// pickers always span the rows the category selection left visible.
pub(crate) fn compute(table: &Table, filter: &FilterState, today: NaiveDate) -> ReportView {
    let options = category_options(table, filter.category_field);

    let narrowed = match &filter.category_value {
        Some(value) => filter_category(table, filter.category_field, value),
        None => table.clone(),
    };

    let bounds = date_bounds(&narrowed, today);
    let range = match filter.date_range {
        Some(requested) => requested.clamp_to(bounds),
        None => bounds,
    };
    let filtered = filter_date_range(&narrowed, range);

    let totals = grand_totals(&filtered);
    let summary = daily_summary(&filtered);
    let chart = chart_series(&summary);

    ReportView {
        filtered,
        totals,
        summary,
        chart,
        category_field: filter.category_field,
        category_value: filter.category_value.clone(),
        category_options: options,
        date_range: range,
        date_bounds: bounds,
    }
}
