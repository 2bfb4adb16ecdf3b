use windowing::WindowOptions;
use windowing_adapter::AutoWindow;

fn main() -> Result<(), windowing::WindowError> {
    // Example: keep the viewport on the same message when older messages are prepended
    // (chat/timeline "load more").
    //
    // 1) capture an anchor (key + offset_in_viewport) before the data changes
    // 2) swap in the new collection
    // 3) apply the anchor and mirror the returned position onto the real scroll container
    let mut w = AutoWindow::new(WindowOptions::new(40.0))?;
    let messages: Vec<u64> = (1_000..1_100).collect();
    w.on_resize(400.0)?;
    w.on_scroll(410.0, 0)?;
    w.frame(&messages);

    let Some(anchor) = w.capture_first_visible_anchor(&messages, |id| *id) else {
        return Ok(());
    };
    println!(
        "before prepend: pos={} anchor={anchor:?}",
        w.viewport().scroll_position()
    );

    let older: Vec<u64> = (2_000..2_010).chain(messages.iter().copied()).collect();
    let applied = w.apply_anchor(&anchor, older.len(), |id| older.iter().position(|m| m == id))?;
    println!("after prepend: applied={applied:?}");

    let frame = w.frame(&older);
    println!("range={:?}", frame.window.range);
    Ok(())
}
