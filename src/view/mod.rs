//! View Filter/Sort/Paginate Engine
//!
//! Pure transformation of a snapshot's assignments into the page shown:
//! filter on up to four dimensions, sort by date descending, slice to a
//! fixed-size page. View state is an explicit value, never a global.

pub mod options;
pub mod pager;
pub mod pipeline;
pub mod state;

pub use options::{FilterOption, FilterOptions};
pub use pager::{PageMarker, page_markers};
pub use pipeline::{PageView, build_page, filter_assignments, paginate, sort_by_date_desc, sorted_filtered, total_pages};
pub use state::{Filters, PAGE_SIZE, Selection, ViewState};
