use crate::*;

use std::collections::HashMap;

use windowing::{HeightStore, Viewport, WindowEngine, WindowError, WindowOptions};

fn options() -> WindowOptions {
    WindowOptions::new(100.0)
        .with_overscan(2)
        .with_auto_virtualize_threshold(50)
        .with_fps_threshold(30.0)
}

#[test]
fn small_collection_renders_everything_until_it_grows() {
    let mut w = AutoWindow::new(options()).unwrap();
    w.on_resize(300.0).unwrap();

    let small: Vec<u32> = (0..10).collect();
    let frame = w.frame(&small);
    assert!(!frame.status.is_active);
    assert!(!frame.window.virtualized);
    assert_eq!(frame.window.visible.len(), 10);
    assert_eq!(frame.window.total_height, 1_000.0);

    let large: Vec<u32> = (0..500).collect();
    let frame = w.frame(&large);
    assert!(frame.status.is_active);
    assert!(frame.window.virtualized);
    // 3 visible rows plus 2 * overscan, carried below the top edge.
    assert_eq!(frame.window.visible.len(), 7);

    // Activation sticks even if the collection shrinks again.
    let frame = w.frame(&small);
    assert!(frame.window.virtualized);
    assert_eq!(frame.window.visible.len(), 7);
}

#[test]
fn slow_frames_activate_windowing_for_the_rest_of_the_session() {
    let mut w = AutoWindow::new(options()).unwrap();
    w.on_resize(250.0).unwrap();
    let items: Vec<u32> = (0..20).collect();
    assert!(!w.frame(&items).window.virtualized);

    // 10 fps for one second.
    let mut now = 0;
    for _ in 0..=10 {
        w.tick(now);
        now += 100;
    }
    assert!(w.status().is_lagging);
    assert!(w.frame(&items).window.virtualized);

    // Back to ~60 fps.
    for _ in 0..120 {
        w.tick(now);
        now += 16;
    }
    let status = w.status();
    assert!(!status.is_lagging);
    assert!(status.estimated_fps.unwrap() > 55.0);
    assert!(w.frame(&items).window.virtualized);
    assert!(w.is_active());
}

#[test]
fn is_scrolling_is_debounced_by_ticks() {
    let mut w = AutoWindow::new(options().with_is_scrolling_reset_delay_ms(150)).unwrap();
    w.on_resize(300.0).unwrap();
    w.on_scroll(1_000.0, 10).unwrap();
    assert!(w.status().is_scrolling);
    assert_eq!(w.viewport().scroll_position(), 1_000.0);

    assert!(w.tick(100).is_scrolling);
    assert!(!w.tick(160).is_scrolling);
}

#[test]
fn scroll_and_resize_move_the_window() {
    let mut w = AutoWindow::new(options().with_auto_virtualize_threshold(0)).unwrap();
    let items: Vec<u32> = (0..1_000).collect();
    w.on_resize(300.0).unwrap();
    w.on_scroll(5_000.0, 0).unwrap();
    let frame = w.frame(&items);
    assert_eq!(
        (frame.window.range.start_index, frame.window.range.end_index),
        (48, 55)
    );

    w.on_resize(600.0).unwrap();
    let frame = w.frame(&items);
    assert_eq!(
        (frame.window.range.start_index, frame.window.range.end_index),
        (48, 58)
    );
    assert_eq!(frame.window.range.offset_of_start, 4_800.0);
}

#[test]
fn rejected_input_leaves_the_surface_untouched() {
    let mut w = AutoWindow::new(options()).unwrap();
    w.on_resize(300.0).unwrap();
    w.on_scroll(40.0, 0).unwrap();

    assert_eq!(
        w.on_scroll(-5.0, 1),
        Err(WindowError::InvalidViewport {
            scroll_position: -5.0,
            visible_size: 300.0
        })
    );
    assert!(w.on_resize(f64::NAN).is_err());
    assert!(w.notify_size_changed(0, -1.0).is_err());
    assert_eq!(w.viewport(), Viewport::new(40.0, 300.0).unwrap());
    assert_eq!(w.tracker().position(), 40.0);

    assert!(AutoWindow::new(WindowOptions::new(-10.0)).is_err());
}

#[test]
fn resize_above_the_viewport_compensates_scroll_position() {
    let mut w = AutoWindow::new(options().with_auto_virtualize_threshold(0)).unwrap();
    let items: Vec<u32> = (0..100).collect();
    w.on_resize(300.0).unwrap();
    w.on_scroll(2_000.0, 0).unwrap();
    w.frame(&items);

    // Item 3 lies above the viewport: content below it shifts by +50, so does the position.
    assert_eq!(w.resize_item(3, 150.0).unwrap(), 50.0);
    assert_eq!(w.tracker().position(), 2_050.0);

    // Same measurement again: nothing to compensate.
    assert_eq!(w.resize_item(3, 150.0).unwrap(), 0.0);

    // Item 40 is below the viewport top: no compensation.
    assert_eq!(w.resize_item(40, 10.0).unwrap(), 0.0);
    assert_eq!(w.tracker().position(), 2_050.0);

    let range = w.frame(&items).window.range;
    assert_eq!(range.offset_of_start, w.engine_mut().item_offset(range.start_index));
    assert!(range.contains(20));
}

#[test]
fn anchor_can_preserve_scroll_across_prepend() {
    let keys: Vec<u64> = (0..100).map(|i| 1_000 + i).collect();
    let mut e1 = WindowEngine::new(10.0).unwrap();
    let v = Viewport::new(505.0, 100.0).unwrap();

    let anchor = capture_first_visible_anchor(&mut e1, &keys, &v, |k| *k).unwrap();
    assert_eq!(anchor.key, 1_050);
    assert_eq!(anchor.offset_in_viewport, 5.0);

    // Prepend 10 items: old items shift by +10 indexes.
    let prepended: Vec<u64> = (0..10)
        .map(|i| 2_000 + i)
        .chain(keys.iter().copied())
        .collect();
    let map: HashMap<u64, usize> = prepended.iter().enumerate().map(|(i, k)| (*k, i)).collect();

    let mut e2 = WindowEngine::new(10.0).unwrap();
    let position = apply_anchor(&mut e2, &anchor, |k| map.get(k).copied()).unwrap();
    assert_eq!(position, 605.0);

    let gone = ScrollAnchor {
        key: 7u64,
        offset_in_viewport: 0.0,
    };
    assert_eq!(apply_anchor(&mut e2, &gone, |k| map.get(k).copied()), None);
}

#[test]
fn auto_window_anchors_across_collection_swap() {
    let mut w = AutoWindow::new(options().with_auto_virtualize_threshold(0)).unwrap();
    let before: Vec<&str> = vec!["a", "b", "c", "d", "e", "f", "g", "h"];
    w.on_resize(150.0).unwrap();
    w.on_scroll(320.0, 0).unwrap();
    w.frame(&before);

    let anchor = w.capture_first_visible_anchor(&before, |s| s.to_string()).unwrap();
    assert_eq!(anchor.key, "d");
    assert_eq!(anchor.offset_in_viewport, 20.0);

    let after: Vec<&str> = vec!["x", "y", "a", "b", "c", "d", "e", "f", "g", "h"];
    w.reset();
    let applied = w
        .apply_anchor(&anchor, after.len(), |k| after.iter().position(|s| s == k))
        .unwrap();
    assert_eq!(applied, Some(520.0));
    assert_eq!(w.viewport().scroll_position(), 520.0);

    let frame = w.frame(&after);
    assert!(frame.window.range.contains(5));
}

#[test]
fn anchor_resolves_against_the_new_collection_length() {
    let mut w = AutoWindow::new(options().with_auto_virtualize_threshold(0)).unwrap();
    let before: Vec<&str> = vec!["a", "b", "c", "d", "e", "f", "g", "h"];
    w.on_resize(150.0).unwrap();
    w.on_scroll(320.0, 0).unwrap();
    w.frame(&before);
    w.notify_size_changed(0, 300.0).unwrap();

    let anchor = w.capture_first_visible_anchor(&before, |s| s.to_string()).unwrap();
    assert_eq!(anchor.key, "b");
    assert_eq!(anchor.offset_in_viewport, 20.0);

    // No reset: the length change alone drops the old measurements.
    let after: Vec<&str> = vec!["x", "y", "a", "b", "c", "d", "e", "f", "g", "h"];
    let applied = w
        .apply_anchor(&anchor, after.len(), |k| after.iter().position(|s| s == k))
        .unwrap();
    assert_eq!(applied, Some(320.0));

    assert!(w.frame(&after).window.range.contains(3));
    let v = w.viewport();
    let span = w.engine_mut().visible_span(after.len(), &v);
    assert_eq!(span.start_index, 3);
    assert_eq!(span.offset_of_start, 300.0);
}

#[test]
fn empty_collection_has_no_anchor() {
    let mut w = AutoWindow::new(options()).unwrap();
    let empty: Vec<u8> = Vec::new();
    assert!(w.capture_first_visible_anchor(&empty, |b| *b).is_none());
}

#[test]
fn custom_height_index_plugs_in() {
    let heights = HeightStore::new(40.0).unwrap();
    let options = options().with_default_item_height(40.0);
    let mut w = AutoWindow::with_heights(options, heights).unwrap();
    let items = vec![(); 5];
    w.on_resize(100.0).unwrap();
    assert_eq!(w.frame(&items).window.total_height, 200.0);
}
