//! Difficulty table
//!
//! Ten fixed tiers selected by cumulative score. Periods are in simulation
//! steps (one step per animation frame).

use crate::consts::POINTS_PER_LEVEL;

/// Highest reachable level
pub const MAX_LEVEL: u32 = 10;

/// One difficulty tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    /// Scroll speed on the reference canvas (pixels per step)
    pub speed: f32,
    /// Steps between ground obstacle spawns
    pub obstacle_period: u32,
    /// Steps between data block spawns
    pub data_block_period: u32,
    /// Steps between flying obstacle spawns (`None` disables them)
    pub flying_obstacle_period: Option<u32>,
    /// Ground obstacle height on the reference canvas
    pub obstacle_height: f32,
    /// Display name
    pub name: &'static str,
}

const fn tier(
    speed: f32,
    obstacle_period: u32,
    data_block_period: u32,
    flying_obstacle_period: u32,
    obstacle_height: f32,
    name: &'static str,
) -> LevelConfig {
    LevelConfig {
        speed,
        obstacle_period,
        data_block_period,
        flying_obstacle_period: Some(flying_obstacle_period),
        obstacle_height,
        name,
    }
}

/// Level table, index 0 is level 1
pub static LEVELS: [LevelConfig; MAX_LEVEL as usize] = [
    tier(3.0, 140, 100, 300, 50.0, "Beginner Network"),
    tier(3.5, 130, 95, 270, 55.0, "Data Stream"),
    tier(4.0, 120, 90, 240, 60.0, "Node Path"),
    tier(4.5, 110, 85, 210, 65.0, "Chain Flow"),
    tier(5.0, 100, 80, 180, 70.0, "Network Rush"),
    tier(5.5, 95, 75, 165, 75.0, "Data Highway"),
    tier(6.0, 90, 70, 150, 80.0, "Blockchain Speed"),
    tier(6.5, 85, 65, 140, 85.0, "Decentralized Chaos"),
    tier(7.0, 80, 60, 130, 90.0, "Irys Master"),
    tier(8.0, 75, 55, 120, 95.0, "Ultimate Network"),
];

/// Look up a level by its 1-based number (clamped to 1..=10)
pub fn level_config(level: u32) -> &'static LevelConfig {
    let index = level.clamp(1, MAX_LEVEL) - 1;
    &LEVELS[index as usize]
}

/// Level earned by a score: `min(10, score / 10 + 1)`
pub fn level_for_score(score: u32) -> u32 {
    (score / POINTS_PER_LEVEL + 1).min(MAX_LEVEL)
}
