// Example: estimates, measurements and the O(log n) height index.
use windowing::{FenwickHeights, HeightIndex, Viewport, WindowEngine};

fn main() -> Result<(), windowing::WindowError> {
    let sections = ["hero", "gallery", "testimonials", "pricing", "footer"].repeat(200);
    let viewport = Viewport::new(0.0, 800.0)?;

    // Lazy prefix walk: cheap when measurements arrive near the bottom of what was queried.
    let mut engine = WindowEngine::new(320.0)?;
    let window = engine.get_visible_items(&sections, &viewport, 2);
    println!("before: total={} range={:?}", window.total_height, window.range);

    // The host rendered the window and measured the real sizes.
    let measured: Vec<(usize, f64)> = window
        .visible
        .iter()
        .map(|it| (it.index, 200.0 + 40.0 * (it.index % 3) as f64))
        .collect();
    let changed = engine.notify_sizes_changed(measured)?;
    let window = engine.get_visible_items(&sections, &viewport, 2);
    println!(
        "after {changed} measurements: total={} range={:?}",
        window.total_height, window.range
    );

    // Same queries through a Fenwick tree: re-measuring index 0 no longer forces a linear re-walk.
    let mut engine = WindowEngine::with_heights(FenwickHeights::new(sections.len(), 320.0)?);
    engine.notify_size_changed(0, 900.0)?;
    println!(
        "fenwick: offset(999)={} measured={}",
        engine.item_offset(999),
        engine.heights().measured_count()
    );
    Ok(())
}
