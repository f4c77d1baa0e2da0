//! Per-frame simulation step
//!
//! Core game loop body: physics, spawning, scrolling, collisions, scoring
//! and level progression. One call per animation frame.

use std::ops::ControlFlow;

use super::collision::collides;
use super::levels::level_for_score;
use super::spawn::{RandomSource, spawn_data_block, spawn_flying_obstacle, spawn_obstacle};
use super::state::{GameEvent, GamePhase, GameState, RunSummary, Scrolling};
use crate::consts::{DATA_BLOCK_POINTS, OBSTACLE_CLEAR_POINTS};

/// Input commands gathered since the previous step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (click/tap/space)
    pub jump: bool,
}

/// Advance the game by one step and report what happened
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    rng: &mut impl RandomSource,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase != GamePhase::Running {
        return events;
    }

    if input.jump && state.jump() {
        events.push(GameEvent::Jump);
    }

    state.frame_count += 1;

    let ground_y = state.ground_y;
    state.player.integrate(ground_y);

    spawn_due(state, rng);

    if advance_obstacles(state, &mut events).is_break() {
        return events;
    }
    if advance_flying_obstacles(state, &mut events).is_break() {
        return events;
    }
    advance_data_blocks(state, &mut events);

    events
}

/// Spawn every entity kind whose countdown elapsed this step
fn spawn_due(state: &mut GameState, rng: &mut impl RandomSource) {
    let config = state.config();

    if state.timers.obstacle.tick(config.obstacle_period) {
        let obstacle = spawn_obstacle(&state.viewport, state.ground_y, config);
        state.obstacles.push(obstacle);
    }

    if let Some(period) = config.flying_obstacle_period
        && state.timers.flying_obstacle.tick(period)
    {
        let flyer = spawn_flying_obstacle(&state.viewport, state.ground_y, rng);
        state.flying_obstacles.push(flyer);
    }

    if state.timers.data_block.tick(config.data_block_period) {
        let block = spawn_data_block(&state.viewport, state.ground_y, rng);
        state.data_blocks.push(block);
    }

    log::trace!(
        "frame {}: {} obstacles, {} flyers, {} blocks",
        state.frame_count,
        state.obstacles.len(),
        state.flying_obstacles.len(),
        state.data_blocks.len()
    );
}

/// Ground obstacles: crash on contact, one point when cleared
fn advance_obstacles(state: &mut GameState, events: &mut Vec<GameEvent>) -> ControlFlow<()> {
    for i in (0..state.obstacles.len()).rev() {
        let dx = state.scroll_step();
        state.obstacles[i].scroll(dx);

        if collides(&state.player, &state.obstacles[i]) {
            end_run(state, events);
            return ControlFlow::Break(());
        }

        if state.obstacles[i].is_off_screen() {
            state.obstacles.remove(i);
            award(state, OBSTACLE_CLEAR_POINTS, events);
        }
    }
    ControlFlow::Continue(())
}

/// Flying obstacles: crash on contact, no points when cleared
fn advance_flying_obstacles(
    state: &mut GameState,
    events: &mut Vec<GameEvent>,
) -> ControlFlow<()> {
    for i in (0..state.flying_obstacles.len()).rev() {
        let dx = state.scroll_step();
        state.flying_obstacles[i].scroll(dx);

        if collides(&state.player, &state.flying_obstacles[i]) {
            end_run(state, events);
            return ControlFlow::Break(());
        }

        if state.flying_obstacles[i].is_off_screen() {
            state.flying_obstacles.remove(i);
        }
    }
    ControlFlow::Continue(())
}

/// Data blocks: collected once on contact, dropped once off-screen
///
/// Collection is tested before removal so a block touched on its last
/// visible frame still scores.
fn advance_data_blocks(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for i in (0..state.data_blocks.len()).rev() {
        let dx = state.scroll_step();
        let hit = {
            let block = &mut state.data_blocks[i];
            block.scroll(dx);
            !block.collected && collides(&state.player, &*block)
        };

        if hit {
            state.data_blocks[i].collected = true;
            events.push(GameEvent::Collect);
            award(state, DATA_BLOCK_POINTS, events);
        }

        if state.data_blocks[i].is_off_screen() {
            state.data_blocks.remove(i);
        }
    }
}

/// Add points and re-evaluate the level
fn award(state: &mut GameState, points: u32, events: &mut Vec<GameEvent>) {
    state.score += points;
    events.push(GameEvent::ScoreChanged(state.score));
    update_level(state, events);
}

/// Recompute the level from the score and switch tiers on change
fn update_level(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let previous = state.level;
    state.level = level_for_score(state.score);

    if state.level != previous {
        let config = state.config();
        state.timers.retarget(config);
        log::info!("Level {} reached: {}", state.level, config.name);
        events.push(GameEvent::LevelUp {
            level: state.level,
            name: config.name,
        });
    }
}

/// Terminal collision: stop the run and settle the best score
fn end_run(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.phase = GamePhase::Over;
    events.push(GameEvent::Crash);

    let new_best = state.score > state.best_score;
    if new_best {
        state.best_score = state.score;
    }

    let summary = RunSummary {
        score: state.score,
        level: state.level,
        level_name: state.config().name,
        new_best,
    };
    log::info!(
        "Game over: score {} at level {} ({}){}",
        summary.score,
        summary.level,
        summary.level_name,
        if new_best { ", new best!" } else { "" }
    );
    events.push(GameEvent::GameOver(summary));
}
