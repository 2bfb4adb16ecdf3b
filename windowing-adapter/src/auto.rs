use windowing::{
    HeightIndex, HeightStore, PerformancePolicy, ScrollTracker, Viewport, Window, WindowEngine,
    WindowError, WindowOptions,
};

use crate::{ScrollAnchor, apply_anchor, capture_first_visible_anchor};

/// Advisory flags for the host, reported with every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowStatus {
    pub is_scrolling: bool,
    pub is_lagging: bool,
    /// Windowing is on for this session (it never turns back off).
    pub is_active: bool,
    pub estimated_fps: Option<f64>,
}

/// What to render this frame.
#[derive(Clone, Debug)]
pub struct AutoFrame<'a, T> {
    pub window: Window<'a, T>,
    pub status: WindowStatus,
}

/// A framework-neutral controller for one rendering surface.
///
/// Owns a [`WindowEngine`], a [`ScrollTracker`] and a [`PerformancePolicy`]. The surface starts
/// unwindowed and switches windowing on, for good, as soon as the collection outgrows
/// `auto_virtualize_threshold` or the measured frame rate drops under `fps_threshold`.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_resize` / `on_scroll` when UI events occur
/// - `tick(now_ms)` each frame (frame-rate sampling and `is_scrolling` debouncing)
/// - `notify_size_changed` / `resize_item` after measuring rendered items
#[derive(Clone, Debug)]
pub struct AutoWindow<H = HeightStore> {
    engine: WindowEngine<H>,
    tracker: ScrollTracker,
    policy: PerformancePolicy,
    options: WindowOptions,
    viewport: Viewport,
}

impl AutoWindow<HeightStore> {
    pub fn new(options: WindowOptions) -> Result<Self, WindowError> {
        let heights = HeightStore::new(options.default_item_height)?;
        Self::with_heights(options, heights)
    }
}

impl<H: HeightIndex> AutoWindow<H> {
    pub fn with_heights(options: WindowOptions, heights: H) -> Result<Self, WindowError> {
        options.validate()?;
        let mut engine = WindowEngine::with_heights(heights);
        engine.set_active(false);
        Ok(Self {
            engine,
            tracker: ScrollTracker::from_options(&options),
            policy: PerformancePolicy::from_options(&options)?,
            options,
            viewport: Viewport::default(),
        })
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub fn engine(&self) -> &WindowEngine<H> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut WindowEngine<H> {
        &mut self.engine
    }

    pub fn tracker(&self) -> &ScrollTracker {
        &self.tracker
    }

    pub fn policy(&self) -> &PerformancePolicy {
        &self.policy
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_active(&self) -> bool {
        self.policy.is_activated()
    }

    pub fn status(&self) -> WindowStatus {
        WindowStatus {
            is_scrolling: self.tracker.is_scrolling(),
            is_lagging: self.policy.is_lagging(),
            is_active: self.policy.is_activated(),
            estimated_fps: self.policy.estimated_fps(),
        }
    }

    /// Call this when the scroll container changes size.
    pub fn on_resize(&mut self, visible_size: f64) -> Result<(), WindowError> {
        self.viewport = self.viewport.resized_to(visible_size)?;
        Ok(())
    }

    /// Call this when the UI reports a scroll position change (e.g. user wheel/drag).
    pub fn on_scroll(&mut self, position: f64, now_ms: u64) -> Result<(), WindowError> {
        let next = self.viewport.scrolled_to(position)?;
        self.tracker.on_scroll(position, now_ms)?;
        self.viewport = next;
        Ok(())
    }

    /// Advances the surface by one frame: samples the frame rate and runs `is_scrolling`
    /// debouncing.
    pub fn tick(&mut self, now_ms: u64) -> WindowStatus {
        if let Some(_fps) = self.policy.record_frame(now_ms) {
            adebug!(
                fps = _fps,
                lagging = self.policy.is_lagging(),
                "AutoWindow: fps sample"
            );
        }
        self.tracker.update_scrolling(now_ms);
        self.status()
    }

    /// Decides activation for `items`, then returns what to render at the current viewport.
    pub fn frame<'a, T>(&mut self, items: &'a [T]) -> AutoFrame<'a, T> {
        let was_active = self.policy.is_activated();
        let active = self
            .policy
            .should_virtualize(items.len(), self.options.auto_virtualize_threshold);
        if active && !was_active {
            adebug!(items = items.len(), "AutoWindow: windowing activated");
        }
        self.engine.set_active(active);
        let window = self
            .engine
            .get_visible_items(items, &self.viewport, self.options.overscan);
        AutoFrame {
            window,
            status: self.status(),
        }
    }

    /// Forwards a measurement to the engine.
    pub fn notify_size_changed(&mut self, index: usize, height: f64) -> Result<bool, WindowError> {
        self.engine.notify_size_changed(index, height)
    }

    /// Records a measurement and keeps the content under the viewport still.
    ///
    /// When the resized item starts above the current scroll position, the tracked position
    /// moves by the height delta. Returns the applied shift; the host should mirror it onto its
    /// real scroll container.
    pub fn resize_item(&mut self, index: usize, height: f64) -> Result<f64, WindowError> {
        let start = self.engine.item_offset(index);
        let prev = self.engine.item_height(index);
        if !self.engine.notify_size_changed(index, height)? {
            return Ok(0.0);
        }
        let position = self.tracker.position();
        let delta = height - prev;
        if delta == 0.0 || start >= position {
            return Ok(0.0);
        }
        let next = (position + delta).max(0.0);
        self.set_position(next)?;
        Ok(next - position)
    }

    /// Drops every cached height (a different collection is about to be rendered).
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn capture_first_visible_anchor<T, K>(
        &mut self,
        items: &[T],
        key_of: impl FnOnce(&T) -> K,
    ) -> Option<ScrollAnchor<K>> {
        capture_first_visible_anchor(&mut self.engine, items, &self.viewport, key_of)
    }

    /// Moves the tracked position so the anchor item sits where it was captured.
    ///
    /// `item_count` is the length of the new collection. The engine is bound to it first, so a
    /// length change drops the previous collection's heights before the anchor is resolved. A
    /// same-length swap still needs [`AutoWindow::reset`] beforehand.
    ///
    /// Returns the new position for the host to apply, or `None` if the key is gone.
    pub fn apply_anchor<K>(
        &mut self,
        anchor: &ScrollAnchor<K>,
        item_count: usize,
        key_to_index: impl FnMut(&K) -> Option<usize>,
    ) -> Result<Option<f64>, WindowError> {
        self.engine.bind(item_count);
        let Some(position) = apply_anchor(&mut self.engine, anchor, key_to_index) else {
            return Ok(None);
        };
        self.set_position(position)?;
        Ok(Some(position))
    }

    fn set_position(&mut self, position: f64) -> Result<(), WindowError> {
        let next = self.viewport.scrolled_to(position)?;
        self.tracker.set_position(position)?;
        self.viewport = next;
        Ok(())
    }
}
