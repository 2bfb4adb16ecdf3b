// Example: a product grid fitted to its container.
use windowing::{GridOptions, GridWindowEngine, Viewport};

fn main() -> Result<(), windowing::WindowError> {
    let products: Vec<u32> = (0..500).collect();
    let mut grid = GridWindowEngine::new(GridOptions::new(1, 220.0, 300.0).with_gap(16.0))?;
    let columns = grid.fit_to_width(1_180.0)?;

    let window = grid.get_visible_items(&products, &Viewport::new(2_000.0, 900.0)?);
    println!(
        "columns={columns} rows={} total_height={} visible_rows={:?} cells={}",
        window.row_count,
        window.total_height,
        window.rows,
        window.visible.len()
    );
    Ok(())
}
