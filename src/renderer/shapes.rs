//! Shape generation for a frame
//!
//! Turns the game state into a flat list of canvas draw commands. Keeping
//! this free of browser types lets the scene be checked natively; the canvas
//! backend only replays the list.

use glam::Vec2;
use std::f32::consts::PI;

use crate::sim::{Bounds, DataBlock, FlyingObstacle, GameState, Obstacle, Player, Rect, Viewport};

/// Fill and stroke styles
pub mod palette {
    pub const GRID: &str = "rgba(102, 126, 234, 0.2)";
    pub const GROUND: &str = "#667eea";
    pub const GROUND_LINE: &str = "#ffffff";
    pub const PLAYER_FALLBACK: &str = "#ffffff";
    pub const PLAYER_FACE: &str = "#000000";
    pub const OBSTACLE: &str = "#ff6b6b";
    pub const OBSTACLE_BORDER: &str = "#c92a2a";
    pub const OBSTACLE_STRIPE: &str = "#fff5f5";
    pub const FLYING_FALLBACK: &str = "#ff922b";
    pub const GLOW_INNER: &str = "rgba(102, 126, 234, 0.8)";
    pub const GLOW_OUTER: &str = "rgba(102, 126, 234, 0)";
    pub const DATA_BLOCK: &str = "#4ecdc4";
    pub const DATA_BLOCK_BORDER: &str = "#ffffff";
    pub const DATA_BLOCK_ICON: &str = "#ffffff";
    pub const LEVEL_LABEL: &str = "rgba(255, 255, 255, 0.7)";
}

/// Grid spacing on the reference canvas
const GRID_SPACING: f32 = 40.0;
const GROUND_LINE_WIDTH: f32 = 3.0;
const BORDER_WIDTH: f32 = 2.0;
/// Warning stripe height on the reference canvas
const STRIPE_HEIGHT: f32 = 5.0;
const ICON_FRACTION: f32 = 0.4;
const LABEL_BASELINE: f32 = 30.0;
const LABEL_MIN_FONT_PX: f32 = 12.0;

/// Image assets the scene may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    Player,
    FlyingObstacle,
}

/// Which sprites finished loading with a non-zero size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpritesReady {
    pub player: bool,
    pub flying_obstacle: bool,
}

/// One canvas operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear { width: f32, height: f32 },
    Line {
        from: Vec2,
        to: Vec2,
        color: &'static str,
        width: f32,
    },
    FillRect { rect: Rect, color: &'static str },
    StrokeRect {
        rect: Rect,
        color: &'static str,
        width: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: &'static str,
    },
    /// Open arc from `start` to `end` radians (clockwise, y down)
    StrokeArc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: &'static str,
        width: f32,
    },
    /// Radial gradient from `center` (radius 0) to `radius`, filling `rect`
    RadialGlow {
        center: Vec2,
        radius: f32,
        inner: &'static str,
        outer: &'static str,
        rect: Rect,
    },
    Sprite { sprite: SpriteId, rect: Rect },
    /// Centered text
    Text {
        text: &'static str,
        pos: Vec2,
        font: String,
        color: &'static str,
    },
}

/// Offsets of grid lines along one axis, spaced `step` apart from 0
pub fn grid_offsets(extent: f32, step: f32) -> Vec<f32> {
    if step <= 0.0 {
        return Vec::new();
    }
    (0..)
        .map(|i| i as f32 * step)
        .take_while(|&offset| offset < extent)
        .collect()
}

/// Background grid
pub fn grid(viewport: &Viewport) -> Vec<DrawCmd> {
    let step = GRID_SPACING * viewport.scale_x();
    let vertical = grid_offsets(viewport.width, step).into_iter().map(|x| DrawCmd::Line {
        from: Vec2::new(x, 0.0),
        to: Vec2::new(x, viewport.height),
        color: palette::GRID,
        width: 1.0,
    });
    let horizontal = grid_offsets(viewport.height, step)
        .into_iter()
        .map(|y| DrawCmd::Line {
            from: Vec2::new(0.0, y),
            to: Vec2::new(viewport.width, y),
            color: palette::GRID,
            width: 1.0,
        });
    vertical.chain(horizontal).collect()
}

/// Ground band and its top edge
pub fn ground(viewport: &Viewport, ground_y: f32) -> Vec<DrawCmd> {
    vec![
        DrawCmd::FillRect {
            rect: Rect::new(0.0, ground_y, viewport.width, viewport.height - ground_y),
            color: palette::GROUND,
        },
        DrawCmd::Line {
            from: Vec2::new(0.0, ground_y),
            to: Vec2::new(viewport.width, ground_y),
            color: palette::GROUND_LINE,
            width: GROUND_LINE_WIDTH,
        },
    ]
}

/// Player sprite, or a smiling circle when the image is unavailable
pub fn player(player: &Player, scale_x: f32, sprite_ready: bool) -> Vec<DrawCmd> {
    let rect = player.bounds();
    if sprite_ready {
        return vec![DrawCmd::Sprite {
            sprite: SpriteId::Player,
            rect,
        }];
    }

    let eye_y = rect.top() + rect.size.y * 0.4;
    let eye_radius = 3.0 * scale_x;
    vec![
        DrawCmd::FillCircle {
            center: rect.center(),
            radius: rect.size.x / 2.0,
            color: palette::PLAYER_FALLBACK,
        },
        DrawCmd::FillCircle {
            center: Vec2::new(rect.left() + rect.size.x * 0.35, eye_y),
            radius: eye_radius,
            color: palette::PLAYER_FACE,
        },
        DrawCmd::FillCircle {
            center: Vec2::new(rect.left() + rect.size.x * 0.65, eye_y),
            radius: eye_radius,
            color: palette::PLAYER_FACE,
        },
        DrawCmd::StrokeArc {
            center: Vec2::new(rect.center().x, rect.top() + rect.size.y * 0.6),
            radius: 8.0 * scale_x,
            start: 0.0,
            end: PI,
            color: palette::PLAYER_FACE,
            width: 2.0 * scale_x,
        },
    ]
}

/// Rows of warning stripes down an obstacle, every other band
pub fn stripe_rows(rect: &Rect, stripe_height: f32) -> Vec<Rect> {
    grid_offsets(rect.size.y, stripe_height * 2.0)
        .into_iter()
        .map(|dy| Rect::new(rect.left(), rect.top() + dy, rect.size.x, stripe_height))
        .collect()
}

/// Ground obstacle: body, border and stripes
pub fn obstacle(obstacle: &Obstacle, scale_y: f32) -> Vec<DrawCmd> {
    let rect = obstacle.bounds();
    let mut cmds = vec![
        DrawCmd::FillRect {
            rect,
            color: palette::OBSTACLE,
        },
        DrawCmd::StrokeRect {
            rect,
            color: palette::OBSTACLE_BORDER,
            width: BORDER_WIDTH,
        },
    ];
    cmds.extend(
        stripe_rows(&rect, STRIPE_HEIGHT * scale_y)
            .into_iter()
            .map(|rect| DrawCmd::FillRect {
                rect,
                color: palette::OBSTACLE_STRIPE,
            }),
    );
    cmds
}

pub fn flying_obstacle(obstacle: &FlyingObstacle, sprite_ready: bool) -> DrawCmd {
    let rect = obstacle.bounds();
    if sprite_ready {
        DrawCmd::Sprite {
            sprite: SpriteId::FlyingObstacle,
            rect,
        }
    } else {
        DrawCmd::FillRect {
            rect,
            color: palette::FLYING_FALLBACK,
        }
    }
}

/// Glowing data block with a centered icon; collected blocks are invisible
pub fn data_block(block: &DataBlock) -> Vec<DrawCmd> {
    if block.collected {
        return Vec::new();
    }
    let rect = block.bounds();
    let icon = rect.size.x * ICON_FRACTION;
    vec![
        DrawCmd::RadialGlow {
            center: rect.center(),
            radius: rect.size.x,
            inner: palette::GLOW_INNER,
            outer: palette::GLOW_OUTER,
            rect: Rect {
                pos: rect.pos - rect.size / 2.0,
                size: rect.size * 2.0,
            },
        },
        DrawCmd::FillRect {
            rect,
            color: palette::DATA_BLOCK,
        },
        DrawCmd::StrokeRect {
            rect,
            color: palette::DATA_BLOCK_BORDER,
            width: BORDER_WIDTH,
        },
        DrawCmd::FillRect {
            rect: Rect::new(
                rect.left() + (rect.size.x - icon) / 2.0,
                rect.top() + (rect.size.y - icon) / 2.0,
                icon,
                icon,
            ),
            color: palette::DATA_BLOCK_ICON,
        },
    ]
}

/// CSS font for the level name, growing with the canvas
pub fn level_label_font(canvas_width: f32) -> String {
    format!(
        "{}px \"Segoe UI\"",
        (canvas_width / 40.0).max(LABEL_MIN_FONT_PX)
    )
}

pub fn level_label(viewport: &Viewport, name: &'static str) -> DrawCmd {
    DrawCmd::Text {
        text: name,
        pos: Vec2::new(viewport.width / 2.0, LABEL_BASELINE),
        font: level_label_font(viewport.width),
        color: palette::LEVEL_LABEL,
    }
}

/// Full frame, back to front
pub fn frame(state: &GameState, sprites: SpritesReady) -> Vec<DrawCmd> {
    let vp = &state.viewport;
    let mut cmds = vec![DrawCmd::Clear {
        width: vp.width,
        height: vp.height,
    }];

    cmds.extend(grid(vp));
    cmds.extend(ground(vp, state.ground_y));
    cmds.extend(player(&state.player, vp.scale_x(), sprites.player));
    for o in &state.obstacles {
        cmds.extend(obstacle(o, vp.scale_y()));
    }
    cmds.extend(
        state
            .flying_obstacles
            .iter()
            .map(|f| flying_obstacle(f, sprites.flying_obstacle)),
    );
    for block in &state.data_blocks {
        cmds.extend(data_block(block));
    }
    cmds.push(level_label(vp, state.config().name));
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_lines(cmds: &[DrawCmd]) -> (usize, usize) {
        let vertical = cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Line { from, to, .. } if from.x == to.x))
            .count();
        let horizontal = cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Line { from, to, .. } if from.y == to.y))
            .count();
        (vertical, horizontal)
    }

    #[test]
    fn test_grid_on_reference_canvas() {
        let cmds = grid(&Viewport::default());
        // x = 0..760, y = 0..480
        assert_eq!(count_lines(&cmds), (20, 13));
    }

    #[test]
    fn test_grid_offsets_degenerate_step() {
        assert!(grid_offsets(100.0, 0.0).is_empty());
        assert_eq!(grid_offsets(100.0, 40.0), vec![0.0, 40.0, 80.0]);
    }

    #[test]
    fn test_ground_band() {
        let vp = Viewport::default();
        let cmds = ground(&vp, 450.0);
        assert_eq!(
            cmds[0],
            DrawCmd::FillRect {
                rect: Rect::new(0.0, 450.0, 800.0, 50.0),
                color: palette::GROUND
            }
        );
    }

    #[test]
    fn test_player_sprite_when_ready() {
        let p = Player::new(1.0, 450.0);
        let cmds = player(&p, 1.0, true);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(
            cmds[0],
            DrawCmd::Sprite {
                sprite: SpriteId::Player,
                ..
            }
        ));
    }

    #[test]
    fn test_player_fallback_face() {
        let p = Player::new(1.0, 450.0);
        let cmds = player(&p, 1.0, false);
        assert_eq!(cmds.len(), 4);
        // Player occupies (100, 390) .. (150, 440)
        assert_eq!(
            cmds[0],
            DrawCmd::FillCircle {
                center: Vec2::new(125.0, 415.0),
                radius: 25.0,
                color: palette::PLAYER_FALLBACK
            }
        );
        match &cmds[1] {
            DrawCmd::FillCircle { center, radius, .. } => {
                assert_eq!(center.y, 410.0);
                assert_eq!(*radius, 3.0);
            }
            other => panic!("expected eye, got {other:?}"),
        }
        assert!(matches!(cmds[3], DrawCmd::StrokeArc { radius, .. } if radius == 8.0));
    }

    #[test]
    fn test_obstacle_stripes() {
        let o = Obstacle {
            pos: Vec2::new(800.0, 400.0),
            size: Vec2::new(30.0, 50.0),
        };
        let cmds = obstacle(&o, 1.0);
        // Body + border + 5 stripes at y = 400, 410, 420, 430, 440
        assert_eq!(cmds.len(), 7);
        let rows = stripe_rows(&o.bounds(), 5.0);
        let ys: Vec<f32> = rows.iter().map(|r| r.top()).collect();
        assert_eq!(ys, vec![400.0, 410.0, 420.0, 430.0, 440.0]);
        assert!(rows.iter().all(|r| r.size.y == 5.0));
    }

    #[test]
    fn test_flying_obstacle_fallback() {
        let f = FlyingObstacle {
            pos: Vec2::new(500.0, 100.0),
            size: Vec2::splat(35.0),
        };
        assert!(matches!(
            flying_obstacle(&f, false),
            DrawCmd::FillRect {
                color: palette::FLYING_FALLBACK,
                ..
            }
        ));
        assert!(matches!(
            flying_obstacle(&f, true),
            DrawCmd::Sprite {
                sprite: SpriteId::FlyingObstacle,
                ..
            }
        ));
    }

    #[test]
    fn test_data_block_art() {
        let block = DataBlock {
            pos: Vec2::new(200.0, 100.0),
            size: Vec2::splat(25.0),
            collected: false,
        };
        let cmds = data_block(&block);
        assert_eq!(cmds.len(), 4);
        assert_eq!(
            cmds[0],
            DrawCmd::RadialGlow {
                center: Vec2::new(212.5, 112.5),
                radius: 25.0,
                inner: palette::GLOW_INNER,
                outer: palette::GLOW_OUTER,
                rect: Rect::new(187.5, 87.5, 50.0, 50.0),
            }
        );
        assert_eq!(
            cmds[3],
            DrawCmd::FillRect {
                rect: Rect::new(207.5, 107.5, 10.0, 10.0),
                color: palette::DATA_BLOCK_ICON
            }
        );
    }

    #[test]
    fn test_collected_block_not_drawn() {
        let block = DataBlock {
            pos: Vec2::new(200.0, 100.0),
            size: Vec2::splat(25.0),
            collected: true,
        };
        assert!(data_block(&block).is_empty());
    }

    #[test]
    fn test_level_label_font() {
        assert_eq!(level_label_font(800.0), "20px \"Segoe UI\"");
        assert_eq!(level_label_font(300.0), "12px \"Segoe UI\"");
    }

    #[test]
    fn test_frame_order() {
        let mut state = GameState::new(Viewport::default(), 0);
        state.start();
        let cmds = frame(&state, SpritesReady::default());
        assert!(matches!(cmds.first(), Some(DrawCmd::Clear { .. })));
        match cmds.last() {
            Some(DrawCmd::Text { text, .. }) => assert_eq!(*text, "Beginner Network"),
            other => panic!("expected level label, got {other:?}"),
        }
    }
}
