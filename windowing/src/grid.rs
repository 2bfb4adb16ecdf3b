use crate::range::apply_overscan;
use crate::{GridItem, GridOptions, GridWindow, RowRange, Viewport, WindowError};

/// Two-dimensional windowing over a linear collection laid out in fixed-size cells.
///
/// Rows, not cells, are the unit of virtualization. Item `i` sits at row `i / columns`, column
/// `i % columns`; every row is `item_height + gap` apart, so the visible rows follow in closed
/// form from the scroll position with no search.
#[derive(Clone, Debug)]
pub struct GridWindowEngine {
    options: GridOptions,
    active: bool,
}

impl GridWindowEngine {
    pub fn new(options: GridOptions) -> Result<Self, WindowError> {
        options.validate()?;
        wdebug!(
            columns = options.columns,
            item_height = options.item_height,
            gap = options.gap,
            "GridWindowEngine::new"
        );
        Ok(Self {
            options,
            active: true,
        })
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: GridOptions) -> Result<(), WindowError> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// Re-fits the column count to a container width. Returns the new column count.
    pub fn fit_to_width(&mut self, container_width: f64) -> Result<usize, WindowError> {
        let columns = GridOptions::fit_columns(
            container_width,
            self.options.item_width,
            self.options.gap,
        )?;
        self.options.columns = columns;
        Ok(columns)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn row_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.options.columns)
    }

    /// `rows * (item_height + gap) - gap`: no trailing gap after the last row.
    pub fn total_height(&self, item_count: usize) -> f64 {
        let rows = self.row_count(item_count);
        if rows == 0 {
            return 0.0;
        }
        rows as f64 * self.options.row_stride() - self.options.gap
    }

    /// `(row, column)` of `index`.
    pub fn cell_of(&self, index: usize) -> (usize, usize) {
        let columns = self.options.columns;
        (index / columns, index % columns)
    }

    /// Rows intersecting the viewport, widened by the configured overscan. In degenerate mode,
    /// every row.
    pub fn compute_rows(&self, item_count: usize, viewport: &Viewport) -> RowRange {
        let rows = self.row_count(item_count);
        if !self.active {
            return RowRange {
                start_row: 0,
                end_row: rows,
            };
        }
        if rows == 0 {
            return RowRange::default();
        }

        let stride = self.options.row_stride();
        let start = ((viewport.scroll_position() / stride).floor() as usize).min(rows);
        if viewport.visible_size() <= 0.0 {
            return RowRange {
                start_row: start,
                end_row: start,
            };
        }
        let end = ((viewport.end() / stride).ceil() as usize).clamp(start, rows);

        let (start_row, end_row) = apply_overscan(start, end, rows, self.options.overscan);
        wtrace!(start_row, end_row, rows, "GridWindowEngine::compute_rows");
        RowRange { start_row, end_row }
    }

    /// Calls `f` for each cell to render, row by row, without allocating.
    pub fn for_each_visible_item<'a, T>(
        &self,
        items: &'a [T],
        viewport: &Viewport,
        mut f: impl FnMut(GridItem<'a, T>),
    ) -> RowRange {
        let rows = self.compute_rows(items.len(), viewport);
        let columns = self.options.columns;
        let start = rows.start_row * columns;
        let end = (rows.end_row * columns).min(items.len());
        for (index, item) in items.iter().enumerate().take(end).skip(start) {
            let (row, column) = self.cell_of(index);
            f(GridItem {
                index,
                item,
                row,
                column,
                x: column as f64 * self.options.column_stride(),
                y: row as f64 * self.options.row_stride(),
                width: self.options.item_width,
                height: self.options.item_height,
            });
        }
        rows
    }

    pub fn get_visible_items<'a, T>(
        &self,
        items: &'a [T],
        viewport: &Viewport,
    ) -> GridWindow<'a, T> {
        let mut visible = Vec::new();
        let rows = self.for_each_visible_item(items, viewport, |it| visible.push(it));
        GridWindow {
            visible,
            total_height: self.total_height(items.len()),
            row_count: self.row_count(items.len()),
            rows,
            virtualized: self.active,
        }
    }
}
