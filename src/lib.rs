//! Data Runner - A side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Simulation (physics, spawning, collisions, scoring, levels)
//! - `renderer`: Canvas 2D drawing of the game state
//! - `audio`: Procedural Web Audio cues and background loop
//! - `best_score`: Persisted best score
//! - `settings`: Persisted audio preferences
//! - `platform`: Input mapping and canvas geometry

pub mod audio;
pub mod best_score;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use best_score::{BestScoreStore, MemoryStore};
pub use settings::Settings;

/// Game configuration constants
///
/// Sizes and speeds are expressed on the 800x500 reference canvas and
/// scaled linearly to the real canvas.
pub mod consts {
    /// Reference canvas dimensions
    pub const REFERENCE_WIDTH: f32 = 800.0;
    pub const REFERENCE_HEIGHT: f32 = 500.0;

    /// Height of the ground strip below `ground_y` (reference units)
    pub const GROUND_HEIGHT: f32 = 50.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_BASE_SIZE: f32 = 50.0;
    pub const PLAYER_BASE_GRAVITY: f32 = 0.6;
    pub const PLAYER_BASE_JUMP_FORCE: f32 = -15.0;
    /// Gap between the player and the ground at game start
    pub const PLAYER_START_LIFT: f32 = 10.0;

    /// Entity base sizes
    pub const OBSTACLE_BASE_WIDTH: f32 = 30.0;
    pub const FLYING_OBSTACLE_BASE_SIZE: f32 = 35.0;
    pub const DATA_BLOCK_BASE_SIZE: f32 = 25.0;

    /// Flying obstacle band: distance from the top and clearance above ground
    pub const FLYING_TOP_MARGIN: f32 = 50.0;
    pub const FLYING_GROUND_CLEARANCE: f32 = 150.0;

    /// Data block band (unscaled)
    pub const DATA_BLOCK_TOP_MARGIN: f32 = 50.0;
    pub const DATA_BLOCK_GROUND_CLEARANCE: f32 = 100.0;

    /// Points
    pub const OBSTACLE_CLEAR_POINTS: u32 = 1;
    pub const DATA_BLOCK_POINTS: u32 = 2;
    /// Score needed per level
    pub const POINTS_PER_LEVEL: u32 = 10;
}

/// Horizontal scale of a canvas relative to the reference width
#[inline]
pub fn scale_x(canvas_width: f32) -> f32 {
    canvas_width / consts::REFERENCE_WIDTH
}

/// Vertical scale of a canvas relative to the reference height
#[inline]
pub fn scale_y(canvas_height: f32) -> f32 {
    canvas_height / consts::REFERENCE_HEIGHT
}
