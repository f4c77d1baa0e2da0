//! Entity factories and spawn cadence

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::levels::LevelConfig;
use super::state::{DataBlock, FlyingObstacle, Obstacle, Viewport};
use crate::consts::*;

/// Source of spawn randomness
pub trait RandomSource {
    /// Uniform value in `[min, max)`
    ///
    /// Must tolerate `max < min` (tiny canvases invert the spawn bands).
    fn uniform(&mut self, min: f32, max: f32) -> f32;
}

impl RandomSource for Pcg32 {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        min + self.random::<f32>() * (max - min)
    }
}

/// Generator used by the game
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Countdown to the next spawn of one entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnTimer {
    remaining: u32,
}

impl SpawnTimer {
    pub fn new(period: u32) -> Self {
        Self {
            remaining: period.max(1),
        }
    }

    /// Steps left before the next spawn
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advance one step. Returns true (and rearms with `period`) when due.
    pub fn tick(&mut self, period: u32) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.remaining = period.max(1);
            true
        } else {
            false
        }
    }

    /// Shorten the countdown so it never exceeds `period`
    pub fn clamp_to(&mut self, period: u32) {
        self.remaining = self.remaining.min(period.max(1));
    }
}

/// One timer per entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnTimers {
    pub obstacle: SpawnTimer,
    pub flying_obstacle: SpawnTimer,
    pub data_block: SpawnTimer,
}

impl SpawnTimers {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            obstacle: SpawnTimer::new(config.obstacle_period),
            flying_obstacle: SpawnTimer::new(config.flying_obstacle_period.unwrap_or(1)),
            data_block: SpawnTimer::new(config.data_block_period),
        }
    }

    /// Follow a level change
    pub fn retarget(&mut self, config: &LevelConfig) {
        self.obstacle.clamp_to(config.obstacle_period);
        if let Some(period) = config.flying_obstacle_period {
            self.flying_obstacle.clamp_to(period);
        }
        self.data_block.clamp_to(config.data_block_period);
    }
}

/// Ground obstacle at the right edge, resting on the ground
pub fn spawn_obstacle(viewport: &Viewport, ground_y: f32, config: &LevelConfig) -> Obstacle {
    let height = config.obstacle_height * viewport.scale_y();
    let width = OBSTACLE_BASE_WIDTH * viewport.scale_x();
    Obstacle {
        pos: Vec2::new(viewport.width, ground_y - height),
        size: Vec2::new(width, height),
    }
}

/// Flying obstacle at the right edge, somewhere in the air band
pub fn spawn_flying_obstacle(
    viewport: &Viewport,
    ground_y: f32,
    rng: &mut impl RandomSource,
) -> FlyingObstacle {
    let sy = viewport.scale_y();
    let min_y = FLYING_TOP_MARGIN * sy;
    let max_y = ground_y - FLYING_GROUND_CLEARANCE * sy;
    let size = FLYING_OBSTACLE_BASE_SIZE * viewport.scale_x();
    FlyingObstacle {
        pos: Vec2::new(viewport.width, rng.uniform(min_y, max_y)),
        size: Vec2::splat(size),
    }
}

/// Data block at the right edge
///
/// The vertical band uses fixed margins that do not follow the canvas scale.
pub fn spawn_data_block(
    viewport: &Viewport,
    ground_y: f32,
    rng: &mut impl RandomSource,
) -> DataBlock {
    let min_y = DATA_BLOCK_TOP_MARGIN;
    let max_y = ground_y - DATA_BLOCK_GROUND_CLEARANCE;
    let size = DATA_BLOCK_BASE_SIZE * viewport.scale_x();
    DataBlock {
        pos: Vec2::new(viewport.width, rng.uniform(min_y, max_y)),
        size: Vec2::splat(size),
        collected: false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sim::levels::level_config;

    /// Replays a fixed list of unit fractions
    pub struct SequenceRng {
        values: Vec<f32>,
        next: usize,
    }

    impl SequenceRng {
        pub fn new(values: &[f32]) -> Self {
            Self {
                values: values.to_vec(),
                next: 0,
            }
        }
    }

    impl RandomSource for SequenceRng {
        fn uniform(&mut self, min: f32, max: f32) -> f32 {
            let u = if self.values.is_empty() {
                0.0
            } else {
                self.values[self.next % self.values.len()]
            };
            self.next += 1;
            min + u * (max - min)
        }
    }

    #[test]
    fn test_timer_fires_on_period() {
        let mut timer = SpawnTimer::new(3);
        assert!(!timer.tick(3));
        assert!(!timer.tick(3));
        assert!(timer.tick(3));
        assert_eq!(timer.remaining(), 3);
        assert!(!timer.tick(3));
    }

    #[test]
    fn test_timer_matches_modulo_cadence() {
        let period = 7;
        let mut timer = SpawnTimer::new(period);
        for frame in 1..=100u32 {
            assert_eq!(timer.tick(period), frame % period == 0, "frame {frame}");
        }
    }

    #[test]
    fn test_timer_rearms_with_new_period() {
        let mut timer = SpawnTimer::new(2);
        timer.tick(2);
        assert!(timer.tick(5));
        assert_eq!(timer.remaining(), 5);
    }

    #[test]
    fn test_timer_clamp() {
        let mut timer = SpawnTimer::new(140);
        timer.clamp_to(130);
        assert_eq!(timer.remaining(), 130);
        timer.clamp_to(500);
        assert_eq!(timer.remaining(), 130);
    }

    #[test]
    fn test_zero_period_does_not_stall() {
        let mut timer = SpawnTimer::new(0);
        assert!(timer.tick(0));
        assert!(timer.tick(0));
    }

    #[test]
    fn test_obstacle_on_ground() {
        let vp = Viewport::default();
        let obstacle = spawn_obstacle(&vp, vp.ground_y(), level_config(1));
        assert_eq!(obstacle.pos, Vec2::new(800.0, 400.0));
        assert_eq!(obstacle.size, Vec2::new(30.0, 50.0));
    }

    #[test]
    fn test_obstacle_scales_with_canvas() {
        let vp = Viewport::new(400.0, 250.0);
        let obstacle = spawn_obstacle(&vp, vp.ground_y(), level_config(10));
        assert_eq!(obstacle.size, Vec2::new(15.0, 47.5));
        assert_eq!(obstacle.pos.x, 400.0);
        assert_eq!(obstacle.pos.y + obstacle.size.y, vp.ground_y());
    }

    #[test]
    fn test_flying_obstacle_band() {
        let vp = Viewport::default();
        let mut rng = SequenceRng::new(&[0.0, 0.5]);
        let low = spawn_flying_obstacle(&vp, vp.ground_y(), &mut rng);
        assert_eq!(low.pos.y, 50.0);
        assert_eq!(low.size, Vec2::splat(35.0));
        let mid = spawn_flying_obstacle(&vp, vp.ground_y(), &mut rng);
        // Band is [50, 300]
        assert_eq!(mid.pos.y, 175.0);
    }

    #[test]
    fn test_data_block_band_is_unscaled() {
        let vp = Viewport::new(400.0, 250.0);
        let mut rng = SequenceRng::new(&[0.0, 0.5]);
        let top = spawn_data_block(&vp, vp.ground_y(), &mut rng);
        assert_eq!(top.pos.y, 50.0);
        assert_eq!(top.size, Vec2::splat(12.5));
        assert!(!top.collected);
        let mid = spawn_data_block(&vp, vp.ground_y(), &mut rng);
        // Band is [50, 125]
        assert_eq!(mid.pos.y, 87.5);
    }

    #[test]
    fn test_pcg_uniform_in_range() {
        let mut rng = seeded_rng(42);
        for _ in 0..1000 {
            let v = rng.uniform(50.0, 300.0);
            assert!((50.0..=300.0).contains(&v));
        }
    }

    #[test]
    fn test_pcg_uniform_inverted_band() {
        let mut rng = seeded_rng(7);
        let v = rng.uniform(50.0, 20.0);
        assert!((20.0..=50.0).contains(&v));
    }
}
