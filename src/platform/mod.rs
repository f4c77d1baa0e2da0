//! Platform abstraction layer
//!
//! Browser-independent pieces of input handling and canvas sizing. The DOM
//! wiring lives in the binary; these helpers keep its decisions testable.

pub mod input;
pub mod viewport;

pub use input::{Action, InputSource, action_for_key, action_for_source};
pub use viewport::{MAX_CANVAS_WIDTH, fit_canvas};
