// Example: minimal usage over a large uniform list.
use windowing::{Viewport, WindowEngine};

fn main() -> Result<(), windowing::WindowError> {
    let items: Vec<String> = (0..1_000_000).map(|i| format!("row {i}")).collect();
    let mut engine = WindowEngine::new(24.0)?;

    let viewport = Viewport::new(123_456.0, 480.0)?;
    let window = engine.get_visible_items(&items, &viewport, 3);
    println!("total_height={}", window.total_height);
    println!("range={:?}", window.range);
    if let Some(first) = window.visible.first() {
        println!("first: index={} offset={} item={}", first.index, first.offset, first.item);
    }
    Ok(())
}
