use crate::WindowError;
use crate::options::validate_default_height;

/// Per-item heights plus the offsets derived from them.
///
/// This is the seam between the range search and the storage strategy. Offsets are a view over
/// heights, never an independent source of truth: `offset(0) == 0`, offsets never decrease, and
/// `offset(i + 1) == offset(i) + height(i)` for every `i`. [`HeightStore`] keeps the last identity
/// exactly; [`crate::FenwickHeights`] sums in tree order and may differ from it by rounding, but
/// never by more than a fresh summation of the current heights would.
///
/// Queries take `&mut self` because implementations are free to memoize.
pub trait HeightIndex {
    /// Height assumed for items that have not been measured.
    fn default_height(&self) -> f64;

    /// Measured height of `index`, or the default estimate. Never fails.
    fn height(&self, index: usize) -> f64;

    fn is_measured(&self, index: usize) -> bool;

    /// Number of items holding a measurement.
    fn measured_count(&self) -> usize;

    /// Records a measured height.
    ///
    /// Returns `Ok(true)` when the stored record changed and `Ok(false)` when `height` equals the
    /// value already measured for `index` (no invalidation happens in that case).
    fn set_height(&mut self, index: usize, height: f64) -> Result<bool, WindowError>;

    /// Cumulative height of all items before `index`.
    fn offset(&mut self, index: usize) -> f64;

    /// Sum of the first `item_count` heights.
    fn total_height(&mut self, item_count: usize) -> f64 {
        self.offset(item_count)
    }

    /// Smallest `i < item_count` with `offset(i) + height(i) > position`, or `item_count`.
    fn index_ending_after(&mut self, position: f64, item_count: usize) -> usize;

    /// Smallest `i < item_count` with `offset(i) >= position`, or `item_count`.
    fn index_starting_at_or_after(&mut self, position: f64, item_count: usize) -> usize;

    /// Drops every measurement and cached offset.
    fn reset(&mut self);
}

/// Height cache with a lazily extended, invalidating prefix-sum.
///
/// Offsets are computed on demand by walking forward from the last offset known to be valid.
/// A measurement at `index` only discards cached offsets after `index`, so the typical pattern
/// (measure what was just rendered, then query around it) costs amortized `O(1)` per call. A
/// measurement near the top of a long list forces an `O(n)` re-walk on the next deep query; use
/// [`crate::FenwickHeights`] when that pattern dominates.
#[derive(Clone, Debug)]
pub struct HeightStore {
    default_height: f64,
    heights: Vec<Option<f64>>,
    measured: usize,
    // offsets[i] is valid for every i < offsets.len(); offsets[0] is always 0.
    offsets: Vec<f64>,
}

impl HeightStore {
    pub fn new(default_height: f64) -> Result<Self, WindowError> {
        validate_default_height(default_height)?;
        Ok(Self {
            default_height,
            heights: Vec::new(),
            measured: 0,
            offsets: vec![0.0],
        })
    }

    /// Changes the estimate used for unmeasured items. Invalidates every cached offset.
    pub fn set_default_height(&mut self, default_height: f64) -> Result<(), WindowError> {
        validate_default_height(default_height)?;
        if self.default_height == default_height {
            return Ok(());
        }
        self.default_height = default_height;
        self.offsets.truncate(1);
        Ok(())
    }

    /// Number of offsets currently cached (including `offset(0)`).
    pub fn cached_offsets(&self) -> usize {
        self.offsets.len()
    }

    fn extend_offsets_to(&mut self, index: usize) {
        while self.offsets.len() <= index {
            let last = self.offsets.len() - 1;
            let next = self.offsets[last] + self.height(last);
            self.offsets.push(next);
        }
    }
}

impl HeightIndex for HeightStore {
    fn default_height(&self) -> f64 {
        self.default_height
    }

    fn height(&self, index: usize) -> f64 {
        self.heights
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(self.default_height)
    }

    fn is_measured(&self, index: usize) -> bool {
        matches!(self.heights.get(index), Some(Some(_)))
    }

    fn measured_count(&self) -> usize {
        self.measured
    }

    fn set_height(&mut self, index: usize, height: f64) -> Result<bool, WindowError> {
        ensure_non_negative!(height, WindowError::InvalidHeight { index, height });

        if index >= self.heights.len() {
            self.heights.resize(index + 1, None);
        }
        let slot = &mut self.heights[index];
        match *slot {
            Some(prev) if prev == height => return Ok(false),
            Some(_) => {}
            None => self.measured += 1,
        }
        *slot = Some(height);

        // offset(index) does not depend on height(index); everything after it does.
        if self.offsets.len() > index + 1 {
            wtrace!(
                index,
                height,
                dropped = self.offsets.len() - index - 1,
                "HeightStore: invalidated offsets"
            );
            self.offsets.truncate(index + 1);
        }
        Ok(true)
    }

    fn offset(&mut self, index: usize) -> f64 {
        self.extend_offsets_to(index);
        self.offsets[index]
    }

    fn index_ending_after(&mut self, position: f64, item_count: usize) -> usize {
        // Items whose end is already cached: end(i) == offsets[i + 1].
        let known = (self.offsets.len() - 1).min(item_count);
        if known > 0 && self.offsets[known] > position {
            return self.offsets[1..=known].partition_point(|&end| end <= position);
        }
        for i in known..item_count {
            if self.offset(i + 1) > position {
                return i;
            }
        }
        item_count
    }

    fn index_starting_at_or_after(&mut self, position: f64, item_count: usize) -> usize {
        let known = (self.offsets.len() - 1).min(item_count);
        if self.offsets[known] >= position {
            return self.offsets[..=known]
                .partition_point(|&start| start < position)
                .min(item_count);
        }
        for i in (known + 1)..item_count {
            if self.offset(i) >= position {
                return i;
            }
        }
        item_count
    }

    fn reset(&mut self) {
        wdebug!(
            measured = self.measured,
            cached = self.offsets.len(),
            "HeightStore::reset"
        );
        self.heights.clear();
        self.measured = 0;
        self.offsets.truncate(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmeasured_items_use_the_default() {
        let mut s = HeightStore::new(20.0).unwrap();
        assert_eq!(s.height(7), 20.0);
        assert!(!s.is_measured(7));
        assert_eq!(s.offset(3), 60.0);
        assert_eq!(s.total_height(10), 200.0);
    }

    #[test]
    fn measurement_keeps_offsets_up_to_its_own_index() {
        let mut s = HeightStore::new(10.0).unwrap();
        assert_eq!(s.offset(50), 500.0);
        assert_eq!(s.cached_offsets(), 51);

        assert!(s.set_height(20, 30.0).unwrap());
        assert_eq!(s.cached_offsets(), 21);
        assert_eq!(s.offset(20), 200.0);
        assert_eq!(s.offset(21), 230.0);
    }

    #[test]
    fn same_height_twice_does_not_invalidate() {
        let mut s = HeightStore::new(10.0).unwrap();
        assert!(s.set_height(2, 15.0).unwrap());
        assert_eq!(s.offset(40), 405.0);
        let cached = s.cached_offsets();

        assert!(!s.set_height(2, 15.0).unwrap());
        assert_eq!(s.cached_offsets(), cached);
        assert_eq!(s.measured_count(), 1);
    }

    #[test]
    fn measuring_the_default_value_still_counts_as_a_measurement() {
        let mut s = HeightStore::new(10.0).unwrap();
        assert!(s.set_height(0, 10.0).unwrap());
        assert!(s.is_measured(0));
        assert!(!s.set_height(0, 10.0).unwrap());
    }

    #[test]
    fn negative_and_non_finite_heights_are_rejected() {
        let mut s = HeightStore::new(10.0).unwrap();
        assert_eq!(
            s.set_height(4, -1.0),
            Err(WindowError::InvalidHeight {
                index: 4,
                height: -1.0
            })
        );
        assert!(s.set_height(4, f64::INFINITY).is_err());
        assert!(s.set_height(4, f64::NAN).is_err());
        assert_eq!(s.measured_count(), 0);
        assert!(s.set_height(4, 0.0).unwrap());
    }

    #[test]
    fn invalid_default_height_is_rejected() {
        assert_eq!(
            HeightStore::new(0.0).unwrap_err(),
            WindowError::InvalidDefaultHeight(0.0)
        );
        assert!(HeightStore::new(-3.0).is_err());
        assert!(HeightStore::new(f64::NAN).is_err());
    }

    #[test]
    fn searches_agree_inside_and_beyond_the_cached_prefix() {
        let mut s = HeightStore::new(10.0).unwrap();
        // Nothing cached yet: walk path.
        assert_eq!(s.index_ending_after(25.0, 100), 2);
        assert_eq!(s.index_starting_at_or_after(25.0, 100), 3);
        // Now cached: binary search path.
        assert_eq!(s.index_ending_after(25.0, 100), 2);
        assert_eq!(s.index_starting_at_or_after(25.0, 100), 3);
        // Exact boundaries.
        assert_eq!(s.index_ending_after(20.0, 100), 2);
        assert_eq!(s.index_starting_at_or_after(20.0, 100), 2);
        // Past the end.
        assert_eq!(s.index_ending_after(5_000.0, 100), 100);
        assert_eq!(s.index_starting_at_or_after(5_000.0, 100), 100);
    }

    #[test]
    fn reset_forgets_measurements() {
        let mut s = HeightStore::new(10.0).unwrap();
        s.set_height(1, 100.0).unwrap();
        assert_eq!(s.total_height(3), 120.0);
        s.reset();
        assert_eq!(s.measured_count(), 0);
        assert_eq!(s.total_height(3), 30.0);
    }

    #[test]
    fn changing_the_default_moves_unmeasured_items_only() {
        let mut s = HeightStore::new(10.0).unwrap();
        s.set_height(0, 5.0).unwrap();
        assert_eq!(s.total_height(3), 25.0);
        s.set_default_height(20.0).unwrap();
        assert_eq!(s.total_height(3), 45.0);
    }
}
