use crate::WindowError;
use crate::heights::HeightIndex;
use crate::options::validate_default_height;

/// Prefix sums over `f64` values.
///
/// Every node is recomputed from the current values on each write instead of being patched
/// with deltas, so rounding never builds up across re-measurements. Node `i` sums its children
/// in the order `prefix_sum` visits them, which keeps `prefix_sum` non-decreasing for
/// non-negative values.
#[derive(Clone, Debug)]
struct Fenwick {
    values: Vec<f64>,
    tree: Vec<f64>, // 1-indexed
}

impl Fenwick {
    fn from_values(values: &[f64]) -> Self {
        let mut f = Self {
            values: Vec::with_capacity(values.len()),
            tree: Vec::with_capacity(values.len() + 1),
        };
        f.tree.push(0.0);
        for &v in values {
            f.push_value(v);
        }
        f
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Sum covered by node `i`: its children (`i - 1`, `i - 2`, `i - 4`, ...) plus its own value.
    fn node_sum(&self, i: usize) -> f64 {
        let low = i - lsb(i);
        let mut sum = 0.0;
        let mut j = i - 1;
        while j > low {
            sum += self.tree[j];
            j &= j - 1;
        }
        sum + self.values[i - 1]
    }

    /// Appends a value. `O(log n)`.
    fn push_value(&mut self, value: f64) {
        self.values.push(value);
        self.tree.push(0.0);
        let i = self.len();
        self.tree[i] = self.node_sum(i);
    }

    /// Overwrites a value. `O(log^2 n)`: every node on the update path is rebuilt bottom-up.
    fn set(&mut self, index: usize, value: f64) {
        let n = self.len();
        if index >= n {
            return;
        }
        self.values[index] = value;
        let mut i = index + 1;
        while i <= n {
            self.tree[i] = self.node_sum(i);
            i += lsb(i);
        }
    }

    fn prefix_sum(&self, count: usize) -> f64 {
        let mut i = count.min(self.len());
        let mut sum = 0.0;
        while i > 0 {
            sum += self.tree[i];
            i &= i - 1;
        }
        sum
    }

    fn total(&self) -> f64 {
        self.prefix_sum(self.len())
    }

    /// Largest `k` with `prefix_sum(k) <= target`, i.e. the number of items ending at or before
    /// `target`.
    fn count_ending_at_or_before(&self, target: f64) -> usize {
        self.last_prefix_where(|sum| sum <= target)
    }

    /// Largest `k` with `prefix_sum(k) < target`.
    fn count_ending_before(&self, target: f64) -> usize {
        self.last_prefix_where(|sum| sum < target)
    }

    /// Binary search over `prefix_sum`, so results always agree with the offsets it reports.
    /// Returns `0` when no `k >= 1` matches.
    fn last_prefix_where(&self, pred: impl Fn(f64) -> bool) -> usize {
        let mut lo = 0;
        let mut hi = self.len();
        while lo < hi {
            let mid = lo + (hi - lo).div_ceil(2);
            if pred(self.prefix_sum(mid)) {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

/// Height index backed by a Fenwick tree: `O(log n)` measurement, offset and search.
///
/// Covers a contiguous prefix of items (grown on demand when a measurement lands past the end);
/// items beyond that prefix are treated as default-sized without being stored.
#[derive(Clone, Debug)]
pub struct FenwickHeights {
    default_height: f64,
    measured: Vec<bool>,
    measured_count: usize,
    sums: Fenwick,
}

impl FenwickHeights {
    /// Creates an index pre-sized for `item_count` default-height items.
    pub fn new(item_count: usize, default_height: f64) -> Result<Self, WindowError> {
        validate_default_height(default_height)?;
        Ok(Self {
            default_height,
            sums: Fenwick::from_values(&vec![default_height; item_count]),
            measured: vec![false; item_count],
            measured_count: 0,
        })
    }

    /// Number of items physically stored in the tree.
    pub fn stored_len(&self) -> usize {
        self.sums.len()
    }

    fn grow_to(&mut self, len: usize) {
        while self.sums.len() < len {
            self.measured.push(false);
            self.sums.push_value(self.default_height);
        }
    }
}

impl HeightIndex for FenwickHeights {
    fn default_height(&self) -> f64 {
        self.default_height
    }

    fn height(&self, index: usize) -> f64 {
        self.sums.get(index).unwrap_or(self.default_height)
    }

    fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    fn measured_count(&self) -> usize {
        self.measured_count
    }

    fn set_height(&mut self, index: usize, height: f64) -> Result<bool, WindowError> {
        ensure_non_negative!(height, WindowError::InvalidHeight { index, height });
        if index >= self.sums.len() {
            wtrace!(index, stored = self.sums.len(), "FenwickHeights: grow");
            self.grow_to(index + 1);
        }

        let cur = self.height(index);
        if self.measured[index] && cur == height {
            return Ok(false);
        }
        if !self.measured[index] {
            self.measured[index] = true;
            self.measured_count += 1;
        }
        if cur != height {
            self.sums.set(index, height);
        }
        Ok(true)
    }

    fn offset(&mut self, index: usize) -> f64 {
        let stored = self.sums.len();
        if index <= stored {
            return self.sums.prefix_sum(index);
        }
        self.sums.total() + (index - stored) as f64 * self.default_height
    }

    fn index_ending_after(&mut self, position: f64, item_count: usize) -> usize {
        let stored = self.sums.len();
        let consumed = self.sums.count_ending_at_or_before(position);
        let index = if consumed < stored {
            consumed
        } else {
            let past = position - self.sums.total();
            stored.saturating_add((past / self.default_height).floor() as usize)
        };
        index.min(item_count)
    }

    fn index_starting_at_or_after(&mut self, position: f64, item_count: usize) -> usize {
        if position <= 0.0 {
            return 0;
        }
        let stored = self.sums.len();
        let before = self.sums.count_ending_before(position);
        let index = if before < stored {
            before + 1
        } else {
            let past = position - self.sums.total();
            stored.saturating_add((past / self.default_height).ceil() as usize)
        };
        index.min(item_count)
    }

    fn reset(&mut self) {
        wdebug!(
            stored = self.sums.len(),
            measured = self.measured_count,
            "FenwickHeights::reset"
        );
        self.measured.fill(false);
        self.measured_count = 0;
        self.sums = Fenwick::from_values(&vec![self.default_height; self.sums.len()]);
    }
}
