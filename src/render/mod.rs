//! Terminal rendering for the schedule and management views.

pub mod progress;
pub mod reference;
pub mod schedule;
pub mod summary;

pub use progress::render_progress;
pub use reference::{render_collection, render_filter_options, render_reference};
pub use schedule::{EMPTY_STATE, render_header, render_load_error, render_page, render_pager};
pub use summary::{render_ai_analysis, render_optimization, render_statistics, render_summary};
