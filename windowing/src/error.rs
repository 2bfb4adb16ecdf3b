use thiserror::Error;

/// Precondition violations reported by the windowing engine.
///
/// These always indicate a caller bug: the engine never clamps or coerces malformed input.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum WindowError {
    #[error("invalid height {height} for item {index}: heights must be finite and non-negative")]
    InvalidHeight { index: usize, height: f64 },

    #[error("invalid default item height {0}: must be finite and greater than zero")]
    InvalidDefaultHeight(f64),

    #[error(
        "invalid viewport (scroll_position={scroll_position}, visible_size={visible_size}): both must be finite and non-negative"
    )]
    InvalidViewport {
        scroll_position: f64,
        visible_size: f64,
    },

    #[error("invalid scroll position {0}: must be finite and non-negative")]
    InvalidScrollPosition(f64),

    #[error("invalid fps threshold {0}: must be finite and greater than zero")]
    InvalidFpsThreshold(f64),

    #[error(
        "invalid grid geometry (item_width={item_width}, item_height={item_height}, gap={gap}): item_height must be > 0, item_width and gap >= 0"
    )]
    InvalidGridGeometry {
        item_width: f64,
        item_height: f64,
        gap: f64,
    },

    #[error("invalid container width {0}: must be finite and non-negative")]
    InvalidContainerWidth(f64),

    #[error("grid needs at least one column")]
    ZeroColumns,
}
