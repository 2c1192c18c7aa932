//! Page-control windowing for the pagination bar.
//!
//! Up to [`MAX_UNWINDOWED_PAGES`] pages every page gets a control. Beyond
//! that the bar shows the first page, a window of up to five pages around
//! the current one, the last page, and ellipses for the gaps, so its width
//! stays bounded however many records there are.

use serde::Serialize;

/// Above this many pages the bar is windowed
pub const MAX_UNWINDOWED_PAGES: usize = 10;

/// Neighbours shown on each side of the current page
const WINDOW_RADIUS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageControl {
    Page { number: usize, active: bool },
    Ellipsis,
}

impl PageControl {
    fn page(number: usize, current: usize) -> Self {
        PageControl::Page {
            number,
            active: number == current,
        }
    }
}

/// Controls to render for `current` out of `total_pages`.
///
/// Returns nothing when there are no pages.
pub fn page_controls(current: usize, total_pages: usize) -> Vec<PageControl> {
    if total_pages == 0 {
        return Vec::new();
    }

    if total_pages <= MAX_UNWINDOWED_PAGES {
        return (1..=total_pages)
            .map(|n| PageControl::page(n, current))
            .collect();
    }

    let mut controls = vec![PageControl::page(1, current)];

    if current > 4 {
        controls.push(PageControl::Ellipsis);
    }

    let lo = current.saturating_sub(WINDOW_RADIUS);
    let hi = current + WINDOW_RADIUS;
    controls.extend(
        (lo..=hi)
            .filter(|&n| n > 1 && n < total_pages)
            .map(|n| PageControl::page(n, current)),
    );

    if current + 3 < total_pages {
        controls.push(PageControl::Ellipsis);
    }

    controls.push(PageControl::page(total_pages, current));
    controls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(controls: &[PageControl]) -> String {
        controls
            .iter()
            .map(|c| match c {
                PageControl::Page { number, active: true } => format!("[{}]", number),
                PageControl::Page { number, active: false } => number.to_string(),
                PageControl::Ellipsis => "...".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_no_pages() {
        assert!(page_controls(1, 0).is_empty());
    }

    #[test]
    fn test_small_page_count_lists_every_page() {
        assert_eq!(layout(&page_controls(2, 3)), "1 [2] 3");
        assert_eq!(page_controls(1, 10).len(), 10);
    }

    #[test]
    fn test_windowed_at_start() {
        assert_eq!(layout(&page_controls(1, 20)), "[1] 2 3 ... 20");
        assert_eq!(layout(&page_controls(4, 20)), "1 2 3 [4] 5 6 ... 20");
    }

    #[test]
    fn test_windowed_middle() {
        assert_eq!(layout(&page_controls(10, 20)), "1 ... 8 9 [10] 11 12 ... 20");
    }

    #[test]
    fn test_windowed_at_end() {
        assert_eq!(layout(&page_controls(17, 20)), "1 ... 15 16 [17] 18 19 20");
        assert_eq!(layout(&page_controls(20, 20)), "1 ... 18 19 [20]");
    }
}
