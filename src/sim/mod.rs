//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - One step per animation frame
//! - Randomness only through an injected `RandomSource`
//! - Entity collections kept in spawn order

pub mod collision;
pub mod levels;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Bounds, Rect, check_collision, collides};
pub use levels::{LEVELS, LevelConfig, MAX_LEVEL, level_config, level_for_score};
pub use spawn::{
    RandomSource, SpawnTimer, SpawnTimers, seeded_rng, spawn_data_block, spawn_flying_obstacle,
    spawn_obstacle,
};
pub use state::{
    DataBlock, FlyingObstacle, GameEvent, GamePhase, GameState, Obstacle, Player, RunSummary,
    Scrolling, Viewport,
};
pub use tick::{TickInput, tick};
