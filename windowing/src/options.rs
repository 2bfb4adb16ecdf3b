use crate::WindowError;

/// Configuration shared by [`crate::WindowEngine`], [`crate::ScrollTracker`] and
/// [`crate::PerformancePolicy`].
///
/// Plain data: cheap to clone, builder-style setters, checked by [`WindowOptions::validate`]
/// before any engine accepts it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WindowOptions {
    /// Height assumed for an item until it is measured. Must be `> 0`.
    pub default_item_height: f64,

    /// Extra items rendered on each side of the visible range.
    pub overscan: usize,

    /// Collections longer than this are always virtualized.
    pub auto_virtualize_threshold: usize,

    /// Estimated FPS below this marks the surface as lagging. Must be `> 0`.
    pub fps_threshold: f64,

    /// Length of one FPS counting window.
    pub fps_sample_window_ms: u64,

    /// Debounce for resetting `is_scrolling` after the last scroll event.
    pub is_scrolling_reset_delay_ms: u64,

    /// How many recent frame durations are retained for averaging.
    pub recent_frame_capacity: usize,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            default_item_height: 50.0,
            overscan: 3,
            auto_virtualize_threshold: 100,
            fps_threshold: 30.0,
            fps_sample_window_ms: 1000,
            is_scrolling_reset_delay_ms: 150,
            recent_frame_capacity: 60,
        }
    }
}

impl WindowOptions {
    pub fn new(default_item_height: f64) -> Self {
        Self {
            default_item_height,
            ..Self::default()
        }
    }

    pub fn with_default_item_height(mut self, default_item_height: f64) -> Self {
        self.default_item_height = default_item_height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_auto_virtualize_threshold(mut self, threshold: usize) -> Self {
        self.auto_virtualize_threshold = threshold;
        self
    }

    pub fn with_fps_threshold(mut self, fps_threshold: f64) -> Self {
        self.fps_threshold = fps_threshold;
        self
    }

    pub fn with_fps_sample_window_ms(mut self, window_ms: u64) -> Self {
        self.fps_sample_window_ms = window_ms;
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_recent_frame_capacity(mut self, capacity: usize) -> Self {
        self.recent_frame_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), WindowError> {
        validate_default_height(self.default_item_height)?;
        if !(self.fps_threshold.is_finite() && self.fps_threshold > 0.0) {
            wwarn!(fps_threshold = self.fps_threshold, "WindowOptions: rejected");
            return Err(WindowError::InvalidFpsThreshold(self.fps_threshold));
        }
        Ok(())
    }
}

pub(crate) fn validate_default_height(height: f64) -> Result<(), WindowError> {
    if !(height.is_finite() && height > 0.0) {
        wwarn!(height, "rejected default item height");
        return Err(WindowError::InvalidDefaultHeight(height));
    }
    Ok(())
}

/// Configuration for [`crate::GridWindowEngine`].
///
/// Cells have a fixed size; `gap` separates both rows and columns.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridOptions {
    pub columns: usize,
    pub item_width: f64,
    pub item_height: f64,
    pub gap: f64,
    /// Extra rows rendered on each side of the visible rows.
    pub overscan: usize,
}

impl GridOptions {
    pub fn new(columns: usize, item_width: f64, item_height: f64) -> Self {
        Self {
            columns,
            item_width,
            item_height,
            gap: 0.0,
            overscan: 1,
        }
    }

    /// Derives the column count that fits `container_width`.
    ///
    /// `floor((container_width + gap) / (item_width + gap))`, never less than one column.
    pub fn fit_columns(
        container_width: f64,
        item_width: f64,
        gap: f64,
    ) -> Result<usize, WindowError> {
        let geometry_ok = item_width.is_finite()
            && item_width >= 0.0
            && gap.is_finite()
            && gap >= 0.0
            && item_width + gap > 0.0;
        if !geometry_ok {
            return Err(WindowError::InvalidGridGeometry {
                item_width,
                item_height: 0.0,
                gap,
            });
        }
        if !(container_width.is_finite() && container_width >= 0.0) {
            return Err(WindowError::InvalidContainerWidth(container_width));
        }
        let fit = ((container_width + gap) / (item_width + gap)).floor() as usize;
        Ok(fit.max(1))
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    /// Distance from one row's top edge to the next.
    pub fn row_stride(&self) -> f64 {
        self.item_height + self.gap
    }

    /// Distance from one column's left edge to the next.
    pub fn column_stride(&self) -> f64 {
        self.item_width + self.gap
    }

    pub fn validate(&self) -> Result<(), WindowError> {
        if self.columns == 0 {
            wwarn!("GridOptions: zero columns");
            return Err(WindowError::ZeroColumns);
        }
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        let geometry_ok = self.item_height.is_finite()
            && self.item_height > 0.0
            && non_negative(self.item_width)
            && non_negative(self.gap);
        if !geometry_ok {
            wwarn!(
                item_width = self.item_width,
                item_height = self.item_height,
                gap = self.gap,
                "GridOptions: rejected geometry"
            );
            return Err(WindowError::InvalidGridGeometry {
                item_width: self.item_width,
                item_height: self.item_height,
                gap: self.gap,
            });
        }
        Ok(())
    }
}
