//! Page-number strip: first, last, current ±2, gaps collapsed to one ellipsis.

use std::fmt;

/// Pages on either side of the current page that are always shown
pub const PAGE_WINDOW: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageMarker::Page(n) => write!(f, "{}", n),
            PageMarker::Ellipsis => write!(f, "..."),
        }
    }
}

/// Markers for a pager with `total` pages while on page `current`
pub fn page_markers(current: usize, total: usize) -> Vec<PageMarker> {
    let mut markers = Vec::new();
    for page in 1..=total {
        let near_current = page.abs_diff(current) <= PAGE_WINDOW;
        if page == 1 || page == total || near_current {
            markers.push(PageMarker::Page(page));
        } else if markers.last() != Some(&PageMarker::Ellipsis) {
            markers.push(PageMarker::Ellipsis);
        }
    }
    markers
}
