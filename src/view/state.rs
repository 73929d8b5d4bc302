//! Ephemeral view state: filter selections and the current page.
//!
//! Every filter setter resets the page to 1, so a narrowed result never
//! silently shows an out-of-range page.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::Assignment;

/// Fixed number of assignments per page
pub const PAGE_SIZE: usize = 20;

/// A filter dimension's value: everything, or one specific value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map(Selection::Only).unwrap_or(Selection::All)
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    /// `"all"` (any case) or empty selects everything
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        s.parse().map(Selection::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::Only(v) => write!(f, "{}", v),
        }
    }
}

/// The four filter dimensions, composed conjunctively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub date: Selection<NaiveDate>,
    pub location: Selection<String>,
    pub employee: Selection<String>,
    pub shift: Selection<String>,
}

impl Filters {
    pub fn matches(&self, a: &Assignment) -> bool {
        self.date.matches(&a.date)
            && self.location.matches(&a.location_id)
            && self.employee.matches(&a.employee_id)
            && self.shift.matches(&a.shift_id)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.date.is_all() && self.location.is_all() && self.employee.is_all() && self.shift.is_all()
    }
}

/// Filter selections, current page and page size for one schedule view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    filters: Filters,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            filters: Filters::default(),
            page: 1,
            page_size: PAGE_SIZE,
        }
    }

    pub fn with_filters(filters: Filters) -> Self {
        Self {
            filters,
            ..Self::new()
        }
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_date_filter(&mut self, date: Selection<NaiveDate>) {
        self.filters.date = date;
        self.page = 1;
    }

    pub fn set_location_filter(&mut self, location: Selection<String>) {
        self.filters.location = location;
        self.page = 1;
    }

    pub fn set_employee_filter(&mut self, employee: Selection<String>) {
        self.filters.employee = employee;
        self.page = 1;
    }

    pub fn set_shift_filter(&mut self, shift: Selection<String>) {
        self.filters.shift = shift;
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters = Filters::default();
        self.page = 1;
    }

    /// Move to `page`, clamped to `[1, max(total_pages, 1)]`
    pub fn set_page(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.set_page(self.page + 1, total_pages);
    }

    pub fn prev_page(&mut self, total_pages: usize) {
        self.set_page(self.page.saturating_sub(1), total_pages);
    }
}
