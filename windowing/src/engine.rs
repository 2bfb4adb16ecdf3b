use crate::heights::{HeightIndex, HeightStore};
use crate::range::{compute_visible_range, visible_span};
use crate::{Viewport, VisibleRange, Window, WindowError, WindowItem};

/// One-dimensional windowing engine bound to a single collection.
///
/// The engine exclusively owns its height index; nothing is shared between instances, so any
/// number of independent windows can live side by side.
///
/// While active, queries return only the items intersecting the viewport (plus overscan). While
/// inactive (degenerate mode), queries return every item, still positioned with the current
/// heights.
///
/// The engine holds no UI objects: the host supplies items, viewport and measurements.
#[derive(Clone, Debug)]
pub struct WindowEngine<H = HeightStore> {
    heights: H,
    active: bool,
    bound_len: Option<usize>,
}

impl WindowEngine<HeightStore> {
    /// Creates an active engine backed by a lazily cached [`HeightStore`].
    pub fn new(default_item_height: f64) -> Result<Self, WindowError> {
        Ok(Self::with_heights(HeightStore::new(default_item_height)?))
    }
}

impl<H: HeightIndex> WindowEngine<H> {
    pub fn with_heights(heights: H) -> Self {
        wdebug!(
            default_height = heights.default_height(),
            "WindowEngine::new"
        );
        Self {
            heights,
            active: true,
            bound_len: None,
        }
    }

    pub fn heights(&self) -> &H {
        &self.heights
    }

    pub fn heights_mut(&mut self) -> &mut H {
        &mut self.heights
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switches between windowed output and degenerate (render everything) output.
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            wdebug!(active, "WindowEngine::set_active");
        }
        self.active = active;
    }

    /// Length of the collection the engine last served, if any.
    pub fn bound_len(&self) -> Option<usize> {
        self.bound_len
    }

    /// Binds the engine to a collection of `item_count` items.
    ///
    /// A length different from the previously bound one means a different collection: every
    /// cached height and offset is dropped. Returns `true` when that happened. The first bind
    /// keeps measurements reported ahead of it.
    pub fn bind(&mut self, item_count: usize) -> bool {
        match self.bound_len.replace(item_count) {
            Some(prev) if prev != item_count => {
                wdebug!(prev, item_count, "WindowEngine: collection length changed");
                self.heights.reset();
                true
            }
            _ => false,
        }
    }

    /// Drops every cached height and offset. Call this when a different collection is swapped
    /// in, even if it has the same length.
    pub fn reset(&mut self) {
        wdebug!(bound_len = ?self.bound_len, "WindowEngine::reset");
        self.heights.reset();
    }

    /// Records the measured height of `index`. Measurements for items never rendered are
    /// accepted.
    pub fn notify_size_changed(
        &mut self,
        index: usize,
        measured_height: f64,
    ) -> Result<bool, WindowError> {
        wtrace!(index, measured_height, "notify_size_changed");
        self.heights.set_height(index, measured_height)
    }

    /// Applies a batch of measurements in order and returns how many changed a record.
    ///
    /// Stops at the first invalid measurement; the ones before it stay applied.
    pub fn notify_sizes_changed(
        &mut self,
        measurements: impl IntoIterator<Item = (usize, f64)>,
    ) -> Result<usize, WindowError> {
        let mut changed = 0;
        for (index, height) in measurements {
            if self.heights.set_height(index, height)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    pub fn item_height(&self, index: usize) -> f64 {
        self.heights.height(index)
    }

    pub fn item_offset(&mut self, index: usize) -> f64 {
        self.heights.offset(index)
    }

    pub fn total_height(&mut self, item_count: usize) -> f64 {
        self.heights.total_height(item_count)
    }

    /// Index of the item covering `position`, clamped to the last item. `None` for an empty
    /// collection.
    pub fn index_at_offset(&mut self, position: f64, item_count: usize) -> Option<usize> {
        if item_count == 0 {
            return None;
        }
        Some(
            self.heights
                .index_ending_after(position, item_count)
                .min(item_count - 1),
        )
    }

    /// The items intersecting the viewport, without overscan.
    pub fn visible_span(&mut self, item_count: usize, viewport: &Viewport) -> VisibleRange {
        visible_span(&mut self.heights, viewport, item_count)
    }

    /// The range to render: windowed while active, `0..item_count` in degenerate mode.
    pub fn compute_range(
        &mut self,
        item_count: usize,
        viewport: &Viewport,
        overscan: usize,
    ) -> VisibleRange {
        if !self.active {
            return VisibleRange {
                start_index: 0,
                end_index: item_count,
                offset_of_start: 0.0,
            };
        }
        compute_visible_range(&mut self.heights, viewport, item_count, overscan)
    }

    /// Calls `f` for each item to render, in ascending index order, without allocating.
    pub fn for_each_visible_item<'a, T>(
        &mut self,
        items: &'a [T],
        viewport: &Viewport,
        overscan: usize,
        mut f: impl FnMut(WindowItem<'a, T>),
    ) -> VisibleRange {
        self.bind(items.len());
        let range = self.compute_range(items.len(), viewport, overscan);
        let mut offset = range.offset_of_start;
        for (index, item) in items
            .iter()
            .enumerate()
            .take(range.end_index)
            .skip(range.start_index)
        {
            let height = self.heights.height(index);
            f(WindowItem {
                index,
                item,
                offset,
                height,
            });
            offset += height;
        }
        range
    }

    /// Returns the items to render plus the total content height.
    pub fn get_visible_items<'a, T>(
        &mut self,
        items: &'a [T],
        viewport: &Viewport,
        overscan: usize,
    ) -> Window<'a, T> {
        let mut visible = Vec::new();
        let range = self.for_each_visible_item(items, viewport, overscan, |it| visible.push(it));
        Window {
            visible,
            total_height: self.heights.total_height(items.len()),
            range,
            virtualized: self.active,
        }
    }
}
