use core::fmt;

use windowing::{HeightIndex, Viewport, WindowEngine};

/// A scroll anchor that can be used to preserve visual position across data changes.
///
/// Typical use cases:
/// - inserting sections above the fold without the page content jumping
/// - swapping in a re-ordered collection while keeping the same item under the viewport top
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor<K> {
    pub key: K,
    /// The distance from the anchor item's start to the viewport's scroll position.
    pub offset_in_viewport: f64,
}

impl<K: fmt::Debug> fmt::Debug for ScrollAnchor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAnchor")
            .field("key", &self.key)
            .field("offset_in_viewport", &self.offset_in_viewport)
            .finish()
    }
}

/// Captures an anchor for the item under the top edge of the viewport.
///
/// Returns `None` when no item lies under the viewport (empty collection, scrolled past the end).
pub fn capture_first_visible_anchor<H: HeightIndex, T, K>(
    engine: &mut WindowEngine<H>,
    items: &[T],
    viewport: &Viewport,
    key_of: impl FnOnce(&T) -> K,
) -> Option<ScrollAnchor<K>> {
    let span = engine.visible_span(items.len(), viewport);
    let item = items.get(span.start_index)?;
    Some(ScrollAnchor {
        key: key_of(item),
        offset_in_viewport: viewport.scroll_position() - span.offset_of_start,
    })
}

/// Resolves a previously captured anchor against the engine's current collection.
///
/// The adapter must provide a `key_to_index` mapping for the *current* dataset. Returns the
/// scroll position that puts the anchor item back where it was, or `None` if the key is gone.
///
/// Offsets come from the heights the engine holds right now: bind or reset it for the new
/// collection before calling this.
pub fn apply_anchor<H: HeightIndex, K>(
    engine: &mut WindowEngine<H>,
    anchor: &ScrollAnchor<K>,
    mut key_to_index: impl FnMut(&K) -> Option<usize>,
) -> Option<f64> {
    let index = key_to_index(&anchor.key)?;
    Some(engine.item_offset(index) + anchor.offset_in_viewport)
}
