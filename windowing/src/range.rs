//! Visible-range search over a [`HeightIndex`].
//!
//! Stateless: every result is a pure function of the viewport, the item count and the current
//! contents of the height index.

use crate::heights::HeightIndex;
use crate::{Viewport, VisibleRange};

/// The range of items intersecting the viewport, without overscan.
///
/// - `start_index` is the first item whose end lies past `scroll_position`.
/// - `end_index` is the first item (at or after `start_index`) starting at or past the viewport
///   end.
///
/// Items straddling either edge are included. A zero-sized viewport yields an empty range
/// positioned at the item under `scroll_position`.
pub fn visible_span<H: HeightIndex + ?Sized>(
    heights: &mut H,
    viewport: &Viewport,
    item_count: usize,
) -> VisibleRange {
    if item_count == 0 {
        return VisibleRange::EMPTY;
    }

    let start = heights.index_ending_after(viewport.scroll_position(), item_count);
    let end = if viewport.visible_size() > 0.0 {
        heights
            .index_starting_at_or_after(viewport.end(), item_count)
            .max(start)
    } else {
        start
    };

    VisibleRange {
        start_index: start,
        end_index: end,
        offset_of_start: heights.offset(start),
    }
}

/// The range of items to render: [`visible_span`] widened by `overscan` items on each side.
///
/// When one side runs into the collection boundary, the unused part of its overscan is given to
/// the other side, so the window keeps `visible + 2 * overscan` items whenever the collection
/// has that many.
pub fn compute_visible_range<H: HeightIndex + ?Sized>(
    heights: &mut H,
    viewport: &Viewport,
    item_count: usize,
    overscan: usize,
) -> VisibleRange {
    let span = visible_span(heights, viewport, item_count);
    if item_count == 0 || viewport.visible_size() <= 0.0 {
        return span;
    }

    let (start, end) = apply_overscan(span.start_index, span.end_index, item_count, overscan);
    wtrace!(
        scroll_position = viewport.scroll_position(),
        visible_size = viewport.visible_size(),
        visible_start = span.start_index,
        visible_end = span.end_index,
        start,
        end,
        "compute_visible_range"
    );
    VisibleRange {
        start_index: start,
        end_index: end,
        offset_of_start: heights.offset(start),
    }
}

/// Widens `start..end` by `overscan` on both sides within `0..=count`, carrying whatever one side
/// cannot use over to the other.
pub(crate) fn apply_overscan(
    start: usize,
    end: usize,
    count: usize,
    overscan: usize,
) -> (usize, usize) {
    debug_assert!(start <= end && end <= count, "range out of order");
    let down = overscan.min(start);
    let up = overscan.min(count - end);
    let carry_up = overscan - down;
    let carry_down = overscan - up;

    let start = start - down;
    let end = end + up;
    (
        start - carry_down.min(start),
        end + carry_up.min(count - end),
    )
}
