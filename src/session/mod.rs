mod view;

pub use view::ReportView;

use chrono::NaiveDate;

use crate::filter::{category_options, CategoryField, DateRange};
use crate::normalize::normalize;
use crate::table::Table;

/// Filter selections for one session. A `None` date range means "the full
/// extent of the data".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub category_field: CategoryField,
    pub category_value: Option<String>,
    pub date_range: Option<DateRange>,
}

impl FilterState {
    fn initial() -> Self {
        Self {
            category_field: CategoryField::TreatmentPayer,
            category_value: None,
            date_range: None,
        }
    }
}

/// One user interaction. Each event mutates the session state; the views
/// are recomputed from scratch afterwards.
#[derive(Debug)]
pub enum SessionEvent {
    Upload(Table),
    SelectCategoryField(CategoryField),
    SelectCategoryValue(String),
    SetDateRange(DateRange),
}

/// State of one interactive session: the most recent upload plus the
/// filter selections. Sessions are independent values; nothing here is
/// process-global, so concurrent sessions cannot observe each other.
#[derive(Debug)]
pub struct Session {
    table: Option<Table>,
    filter: FilterState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            table: None,
            filter: FilterState::initial(),
        }
    }

    pub fn has_data(&self) -> bool {
        self.table.is_some()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn apply_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Upload(table) => {
                // A new upload replaces the previous table wholesale and
                // re-derives the default selections.
                let table = normalize(table);
                self.filter.category_value =
                    category_options(&table, self.filter.category_field)
                        .into_iter()
                        .next();
                self.filter.date_range = None;
                self.table = Some(table);
            }
            SessionEvent::SelectCategoryField(field) => {
                self.filter.category_field = field;
                self.filter.category_value = self
                    .table
                    .as_ref()
                    .and_then(|t| category_options(t, field).into_iter().next());
            }
            SessionEvent::SelectCategoryValue(value) => {
                self.filter.category_value = Some(value);
            }
            SessionEvent::SetDateRange(range) => {
                self.filter.date_range = Some(range);
            }
        }
    }

    /// Recomputes the full pipeline for the current state. `None` until a
    /// table has been uploaded, which is the report's sole empty state.
    /// `today` anchors the date bounds when the data has no valid dates.
    pub fn view(&self, today: NaiveDate) -> Option<ReportView> {
        let table = self.table.as_ref()?;
        Some(view::compute(table, &self.filter, today))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
