//! Game state and core simulation types

use glam::Vec2;

use super::collision::{Bounds, Rect};
use super::levels::{LevelConfig, level_config};
use super::spawn::SpawnTimers;
use crate::consts::*;
use crate::{scale_x, scale_y};

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Start screen, nothing simulated yet
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended by a terminal collision
    Over,
}

/// Size of the drawing surface in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(REFERENCE_WIDTH, REFERENCE_HEIGHT)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal scale relative to the 800-wide reference canvas
    pub fn scale_x(&self) -> f32 {
        scale_x(self.width)
    }

    /// Vertical scale relative to the 500-tall reference canvas
    pub fn scale_y(&self) -> f32 {
        scale_y(self.height)
    }

    /// Y coordinate of the ground surface
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_HEIGHT * self.scale_y()
    }
}

/// The runner
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (positive is downward)
    pub velocity_y: f32,
    pub gravity: f32,
    pub jump_force: f32,
    pub jumping: bool,
}

impl Player {
    /// Create a player standing just above the ground
    pub fn new(scale: f32, ground_y: f32) -> Self {
        let mut player = Self {
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            velocity_y: 0.0,
            gravity: 0.0,
            jump_force: 0.0,
            jumping: false,
        };
        player.rescale(scale);
        player.pos = Vec2::new(PLAYER_X, ground_y - player.size.y - PLAYER_START_LIFT);
        player
    }

    /// Recompute size and physics for a canvas scale
    pub fn rescale(&mut self, scale: f32) {
        self.size = Vec2::splat(PLAYER_BASE_SIZE * scale);
        self.gravity = PLAYER_BASE_GRAVITY * scale;
        self.jump_force = PLAYER_BASE_JUMP_FORCE * scale;
    }

    /// Highest allowed y for the top edge
    pub fn rest_y(&self, ground_y: f32) -> f32 {
        ground_y - self.size.y
    }

    /// Apply one step of gravity and clamp to the ground and ceiling
    pub fn integrate(&mut self, ground_y: f32) {
        self.velocity_y += self.gravity;
        self.pos.y += self.velocity_y;

        if self.pos.y + self.size.y >= ground_y {
            self.pos.y = self.rest_y(ground_y);
            self.velocity_y = 0.0;
            self.jumping = false;
        }

        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.velocity_y = 0.0;
        }
    }
}

impl Bounds for Player {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// An entity that scrolls from right to left
pub trait Scrolling: Bounds {
    fn scroll(&mut self, dx: f32);

    /// Trailing (right) edge has left the canvas
    fn is_off_screen(&self) -> bool {
        self.bounds().right() < 0.0
    }
}

/// Obstacle standing on the ground
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
}

/// Obstacle floating in the air
#[derive(Debug, Clone, PartialEq)]
pub struct FlyingObstacle {
    pub pos: Vec2,
    pub size: Vec2,
}

/// Collectible worth points
#[derive(Debug, Clone, PartialEq)]
pub struct DataBlock {
    pub pos: Vec2,
    pub size: Vec2,
    /// Touched by the player; no longer collidable or drawn
    pub collected: bool,
}

impl Bounds for Obstacle {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

impl Bounds for FlyingObstacle {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

impl Bounds for DataBlock {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

impl Scrolling for Obstacle {
    fn scroll(&mut self, dx: f32) {
        self.pos.x -= dx;
    }
}

impl Scrolling for FlyingObstacle {
    fn scroll(&mut self, dx: f32) {
        self.pos.x -= dx;
    }
}

impl Scrolling for DataBlock {
    fn scroll(&mut self, dx: f32) {
        self.pos.x -= dx;
    }
}

/// Final numbers of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub score: u32,
    pub level: u32,
    pub level_name: &'static str,
    /// The run beat the stored best score
    pub new_best: bool,
}

impl RunSummary {
    pub fn final_score_text(&self) -> String {
        format!("Final Score: {}", self.score)
    }

    pub fn level_reached_text(&self) -> String {
        format!("Level Reached: {} - {}", self.level, self.level_name)
    }
}

/// Things that happened during a step, consumed by audio and the HUD
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player left the ground
    Jump,
    /// Data block picked up
    Collect,
    /// Player hit an obstacle
    Crash,
    /// Score crossed into a new level
    LevelUp { level: u32, name: &'static str },
    /// Score changed
    ScoreChanged(u32),
    /// Run finished
    GameOver(RunSummary),
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub viewport: Viewport,
    pub ground_y: f32,
    pub player: Player,
    /// Active entities, in spawn order
    pub obstacles: Vec<Obstacle>,
    pub flying_obstacles: Vec<FlyingObstacle>,
    pub data_blocks: Vec<DataBlock>,
    pub score: u32,
    /// Current level (1..=10)
    pub level: u32,
    /// Best score across runs
    pub best_score: u32,
    /// Simulation steps since the run started
    pub frame_count: u64,
    pub timers: SpawnTimers,
}

impl GameState {
    /// Create an idle state for the start screen
    pub fn new(viewport: Viewport, best_score: u32) -> Self {
        let ground_y = viewport.ground_y();
        Self {
            phase: GamePhase::NotStarted,
            viewport,
            ground_y,
            player: Player::new(viewport.scale_x(), ground_y),
            obstacles: Vec::new(),
            flying_obstacles: Vec::new(),
            data_blocks: Vec::new(),
            score: 0,
            level: 1,
            best_score,
            frame_count: 0,
            timers: SpawnTimers::new(level_config(1)),
        }
    }

    /// Reset everything except the viewport and best score, and start running
    pub fn start(&mut self) {
        *self = Self {
            phase: GamePhase::Running,
            ..Self::new(self.viewport, self.best_score)
        };
        log::info!(
            "Run started on {}x{} canvas (best {})",
            self.viewport.width,
            self.viewport.height,
            self.best_score
        );
    }

    /// Active difficulty tier
    pub fn config(&self) -> &'static LevelConfig {
        level_config(self.level)
    }

    /// A run is in progress
    pub fn is_started(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Horizontal displacement of every entity per step
    pub fn scroll_step(&self) -> f32 {
        self.config().speed * self.viewport.scale_x()
    }

    /// Start a jump if running and grounded. Returns whether it happened.
    pub fn jump(&mut self) -> bool {
        if self.phase != GamePhase::Running || self.player.jumping {
            return false;
        }
        self.player.velocity_y = self.player.jump_force;
        self.player.jumping = true;
        true
    }

    /// Adapt to a new canvas size
    ///
    /// Player size and physics always follow the new scale; the ground only
    /// moves while a run is in progress.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.player.rescale(viewport.scale_x());

        if self.is_started() {
            self.ground_y = viewport.ground_y();
            let rest = self.player.rest_y(self.ground_y);
            if self.player.pos.y > rest {
                self.player.pos.y = rest;
            }
        }
        log::debug!("Resized to {}x{}", viewport.width, viewport.height);
    }
}
