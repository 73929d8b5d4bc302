//! Filter, sort and paginate a snapshot's assignments.
//!
//! Everything here borrows the snapshot; nothing mutates it.

use crate::domain::{Assignment, ScheduleSnapshot};

use super::state::{Filters, ViewState};

/// Keep assignments matching every non-`All` filter, preserving input order
pub fn filter_assignments<'a>(assignments: &'a [Assignment], filters: &Filters) -> Vec<&'a Assignment> {
    assignments.iter().filter(|a| filters.matches(a)).collect()
}

/// Most recent date first. Stable: same-date assignments keep their order.
pub fn sort_by_date_desc(items: &mut [&Assignment]) {
    items.sort_by(|a, b| b.date.cmp(&a.date));
}

/// `ceil(count / page_size)`; zero items means zero pages
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// The window `[(page-1)*size, page*size)`, empty when out of range
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// What one page of the schedule view shows
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub items: Vec<&'a Assignment>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
}

impl PageView<'_> {
    pub fn is_empty(&self) -> bool {
        self.filtered_count == 0
    }

    /// 1-based index range of the shown items within the filtered set
    pub fn shown_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }
}

/// Filtered and sorted assignments, before pagination
pub fn sorted_filtered<'a>(snapshot: &'a ScheduleSnapshot, state: &ViewState) -> Vec<&'a Assignment> {
    let mut items = filter_assignments(&snapshot.assignments, state.filters());
    sort_by_date_desc(&mut items);
    items
}

/// Run the full pipeline for the current view state
pub fn build_page<'a>(snapshot: &'a ScheduleSnapshot, state: &ViewState) -> PageView<'a> {
    let items = sorted_filtered(snapshot, state);
    let filtered_count = items.len();
    let page_items = paginate(&items, state.page(), state.page_size()).to_vec();

    PageView {
        items: page_items,
        page: state.page(),
        page_size: state.page_size(),
        total_pages: total_pages(filtered_count, state.page_size()),
        filtered_count,
    }
}
