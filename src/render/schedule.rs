//! Schedule page, pager strip, empty state and fatal load error.

use colored::*;

use crate::domain::{Assignment, ScheduleSnapshot};
use crate::loader::LoadError;
use crate::view::{PageMarker, PageView, page_markers};

/// Shown in place of the table when no assignment matches the filters
pub const EMPTY_STATE: &str = "No assignments match the current filters.";

const DATE_WIDTH: usize = 12;
const NAME_WIDTH: usize = 22;
const TIME_WIDTH: usize = 13;

fn cell(value: &str, width: usize) -> String {
    let mut s: String = value.chars().take(width).collect();
    let pad = width.saturating_sub(s.chars().count());
    s.push_str(&" ".repeat(pad));
    s
}

fn or_id<'a>(name: &'a str, id: &'a str) -> &'a str {
    if name.is_empty() { id } else { name }
}

fn row<'a>(snapshot: &'a ScheduleSnapshot, a: &'a Assignment) -> String {
    let employee = snapshot.employee_name(&a.employee_id).unwrap_or_else(|| or_id(&a.employee_name, &a.employee_id));
    let location = snapshot.location_name(&a.location_id).unwrap_or_else(|| or_id(&a.location_name, &a.location_id));
    let shift = snapshot.shift_name(&a.shift_id).unwrap_or_else(|| or_id(&a.shift_name, &a.shift_id));
    let hours = if a.start_time.is_empty() {
        String::new()
    } else {
        format!("{}-{}", a.start_time, a.end_time)
    };
    format!(
        "{}{}{}{}{}",
        cell(&a.date.format("%Y-%m-%d").to_string(), DATE_WIDTH),
        cell(employee, NAME_WIDTH),
        cell(location, NAME_WIDTH),
        cell(shift, NAME_WIDTH),
        cell(&hours, TIME_WIDTH)
    )
}

/// Table for one page; the empty-state message when nothing matched
pub fn render_page(snapshot: &ScheduleSnapshot, page: &PageView<'_>) -> String {
    if page.is_empty() {
        return EMPTY_STATE.yellow().to_string();
    }

    let mut lines = Vec::with_capacity(page.items.len() + 4);
    let header = format!(
        "{}{}{}{}{}",
        cell("Date", DATE_WIDTH),
        cell("Employee", NAME_WIDTH),
        cell("Location", NAME_WIDTH),
        cell("Shift", NAME_WIDTH),
        cell("Hours", TIME_WIDTH)
    );
    lines.push(header.bold().to_string());
    lines.push("-".repeat(DATE_WIDTH + 3 * NAME_WIDTH + TIME_WIDTH));
    lines.extend(page.items.iter().map(|a| row(snapshot, a)));
    lines.push(String::new());
    if let Some((first, last)) = page.shown_range() {
        lines.push(format!("Showing {}-{} of {} assignments", first, last, page.filtered_count));
    }
    lines.push(render_pager(page.page, page.total_pages));
    lines.join("\n")
}

/// `1 ... 4 5 [6] 7 8 ... 20`
pub fn render_pager(current: usize, total: usize) -> String {
    page_markers(current, total)
        .into_iter()
        .map(|marker| match marker {
            PageMarker::Page(n) if n == current => format!("[{}]", n).cyan().bold().to_string(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Terminal message for a view whose data could not be loaded
pub fn render_load_error(error: &LoadError) -> String {
    format!(
        "{} {}\n{}",
        "Error:".red().bold(),
        error,
        "Generate a schedule first, or check that the schedule files are being served."
    )
}

/// Snapshot header line: status and covered dates
pub fn render_header(snapshot: &ScheduleSnapshot) -> String {
    let range = match snapshot.date_range() {
        Some((first, last)) => format!("{} to {}", first, last),
        None => "no dates".to_string(),
    };
    let status = if snapshot.status.is_empty() { "unknown" } else { snapshot.status.as_str() };
    let mut line = format!("{} {} ({})", "Schedule:".green().bold(), range, status);
    if let Some(at) = &snapshot.generated_at {
        line.push_str(&format!(", generated {}", at));
    }
    line
}
