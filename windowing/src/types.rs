use crate::WindowError;

/// The scrolled window onto the content: where it starts and how much of it is shown.
///
/// Can only be built through [`Viewport::new`], so every `Viewport` in circulation holds finite,
/// non-negative values. With `feature = "serde"`, deserialization goes through the same check.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ViewportParts"))]
pub struct Viewport {
    scroll_position: f64,
    visible_size: f64,
}

impl Viewport {
    pub fn new(scroll_position: f64, visible_size: f64) -> Result<Self, WindowError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(scroll_position) || !valid(visible_size) {
            wwarn!(scroll_position, visible_size, "Viewport::new: rejected");
            return Err(WindowError::InvalidViewport {
                scroll_position,
                visible_size,
            });
        }
        Ok(Self {
            scroll_position,
            visible_size,
        })
    }

    pub fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    pub fn visible_size(&self) -> f64 {
        self.visible_size
    }

    /// The first position past the visible area.
    pub fn end(&self) -> f64 {
        self.scroll_position + self.visible_size
    }

    /// Same visible size, different scroll position.
    pub fn scrolled_to(self, scroll_position: f64) -> Result<Self, WindowError> {
        Self::new(scroll_position, self.visible_size)
    }

    /// Same scroll position, different visible size (container resize).
    pub fn resized_to(self, visible_size: f64) -> Result<Self, WindowError> {
        Self::new(self.scroll_position, visible_size)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ViewportParts {
    scroll_position: f64,
    visible_size: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<ViewportParts> for Viewport {
    type Error = WindowError;

    fn try_from(parts: ViewportParts) -> Result<Self, Self::Error> {
        Viewport::new(parts.scroll_position, parts.visible_size)
    }
}

/// Index range to render: `start_index..end_index` (end exclusive), both within
/// `[0, item_count]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
    /// Offset of the item at `start_index`.
    pub offset_of_start: f64,
}

impl VisibleRange {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
        offset_of_start: 0.0,
    };

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// One item to render, positioned along the scroll axis.
#[derive(Debug)]
pub struct WindowItem<'a, T> {
    pub index: usize,
    pub item: &'a T,
    /// Absolute offset of the item's leading edge.
    pub offset: f64,
    pub height: f64,
}

impl<T> WindowItem<'_, T> {
    pub fn end(&self) -> f64 {
        self.offset + self.height
    }
}

impl<T> Clone for WindowItem<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WindowItem<'_, T> {}

/// The result of a 1D window query.
#[derive(Clone, Debug)]
pub struct Window<'a, T> {
    /// Contiguous, ascending run of items to render.
    pub visible: Vec<WindowItem<'a, T>>,
    /// Size of the whole content, for sizing the host's scroll container.
    pub total_height: f64,
    pub range: VisibleRange,
    /// `false` when the window was produced in degenerate mode (every item returned).
    pub virtualized: bool,
}

/// One cell of a grid window.
#[derive(Debug)]
pub struct GridItem<'a, T> {
    pub index: usize,
    pub item: &'a T,
    pub row: usize,
    pub column: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl<T> Clone for GridItem<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for GridItem<'_, T> {}

/// Row range of a grid window (end exclusive).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowRange {
    pub start_row: usize,
    pub end_row: usize, // exclusive
}

impl RowRange {
    pub fn is_empty(&self) -> bool {
        self.start_row >= self.end_row
    }
}

/// The result of a grid window query.
#[derive(Clone, Debug)]
pub struct GridWindow<'a, T> {
    pub visible: Vec<GridItem<'a, T>>,
    pub total_height: f64,
    pub row_count: usize,
    pub rows: RowRange,
    pub virtualized: bool,
}
