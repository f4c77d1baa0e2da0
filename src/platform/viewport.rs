//! Canvas sizing
//!
//! The canvas fills its container at an 8:5 aspect ratio, is never taller
//! than 70% of the window and never wider than 800 pixels.

use crate::sim::Viewport;

/// Widest the canvas may grow
pub const MAX_CANVAS_WIDTH: f32 = 800.0;

const ASPECT: f32 = 1.6;
const MAX_WINDOW_FRACTION: f32 = 0.7;

/// Size the canvas for a container width and window height
pub fn fit_canvas(container_width: f32, window_height: f32) -> Viewport {
    let mut width = container_width.max(0.0);
    let height = width / ASPECT;

    let max_height = window_height.max(0.0) * MAX_WINDOW_FRACTION;
    if height > max_height {
        width = max_height * ASPECT;
    }

    let width = width.min(MAX_CANVAS_WIDTH);
    Viewport::new(width, width / ASPECT)
}
