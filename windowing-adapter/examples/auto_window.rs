use windowing::WindowOptions;
use windowing_adapter::AutoWindow;

fn main() -> Result<(), windowing::WindowError> {
    // Example: a frame loop driving one surface without holding any UI objects.
    //
    // An adapter would:
    // - forward scroll/resize events
    // - call tick(now_ms) once per frame
    // - render `frame.window.visible`, then report measured heights back
    let options = WindowOptions::new(32.0)
        .with_overscan(2)
        .with_auto_virtualize_threshold(500);
    let mut w = AutoWindow::new(options)?;
    w.on_resize(320.0)?;

    let items: Vec<String> = (0..200).map(|i| format!("item {i}")).collect();

    // Slow frames (every 80ms) push the surface into windowing even below the count threshold.
    let mut now_ms = 0u64;
    for step in 0..20u32 {
        w.on_scroll(f64::from(step) * 48.0, now_ms)?;
        let status = w.tick(now_ms);
        let frame = w.frame(&items);
        for item in &frame.window.visible {
            // Pretend every fifth row wraps onto two lines.
            let measured = if item.index % 5 == 0 { 64.0 } else { 32.0 };
            w.resize_item(item.index, measured)?;
        }
        println!(
            "t={now_ms:>4} rendered={:>3} active={} lagging={} fps={:?}",
            frame.window.visible.len(),
            status.is_active,
            status.is_lagging,
            status.estimated_fps,
        );
        now_ms += 80;
    }
    Ok(())
}
