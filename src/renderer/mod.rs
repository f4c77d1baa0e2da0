//! Canvas 2D rendering module
//!
//! `shapes` builds a display list from the game state; on the web the
//! `canvas` backend replays it onto a `CanvasRenderingContext2d`.

pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasRenderer, Sprite};
pub use shapes::{DrawCmd, SpriteId, SpritesReady};
