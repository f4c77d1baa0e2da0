//! Canvas 2D backend

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::shapes::{self, DrawCmd, SpriteId, SpritesReady};
use crate::sim::{GameState, Rect};

/// Image asset with a load check before every draw
#[derive(Clone)]
pub struct Sprite {
    image: HtmlImageElement,
}

impl Sprite {
    /// Start loading an image from `src`
    pub fn load(src: &str) -> Result<Self, JsValue> {
        let image = HtmlImageElement::new()?;
        image.set_src(src);
        Ok(Self { image })
    }

    /// Wait for the image to decode; failures leave the fallback shape in use
    pub async fn decoded(&self) {
        if JsFuture::from(self.image.decode()).await.is_err() {
            log::warn!("Sprite {} failed to load, using fallback", self.image.src());
        }
    }

    /// Loaded with a real size
    pub fn is_ready(&self) -> bool {
        self.image.complete() && self.image.natural_height() != 0
    }
}

/// Draws frames onto the game canvas
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    player: Sprite,
    flying_obstacle: Sprite,
}

impl CanvasRenderer {
    pub fn new(
        canvas: HtmlCanvasElement,
        player: Sprite,
        flying_obstacle: Sprite,
    ) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            player,
            flying_obstacle,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Set the backing store size
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn sprites_ready(&self) -> SpritesReady {
        SpritesReady {
            player: self.player.is_ready(),
            flying_obstacle: self.flying_obstacle.is_ready(),
        }
    }

    /// Draw the whole frame
    pub fn render(&self, state: &GameState) {
        for cmd in shapes::frame(state, self.sprites_ready()) {
            self.draw(&cmd);
        }
    }

    fn draw(&self, cmd: &DrawCmd) {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Clear { width, height } => {
                ctx.clear_rect(0.0, 0.0, *width as f64, *height as f64);
            }
            DrawCmd::Line {
                from,
                to,
                color,
                width,
            } => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*width as f64);
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            DrawCmd::FillRect { rect, color } => {
                ctx.set_fill_style_str(color);
                let (x, y, w, h) = xywh(rect);
                ctx.fill_rect(x, y, w, h);
            }
            DrawCmd::StrokeRect { rect, color, width } => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*width as f64);
                let (x, y, w, h) = xywh(rect);
                ctx.stroke_rect(x, y, w, h);
            }
            DrawCmd::FillCircle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(color);
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    0.0,
                    std::f64::consts::TAU,
                )
                .ok();
                ctx.fill();
            }
            DrawCmd::StrokeArc {
                center,
                radius,
                start,
                end,
                color,
                width,
            } => {
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*width as f64);
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    *radius as f64,
                    *start as f64,
                    *end as f64,
                )
                .ok();
                ctx.stroke();
            }
            DrawCmd::RadialGlow {
                center,
                radius,
                inner,
                outer,
                rect,
            } => {
                let (cx, cy) = (center.x as f64, center.y as f64);
                let Ok(gradient) = ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, *radius as f64)
                else {
                    return;
                };
                gradient.add_color_stop(0.0, inner).ok();
                gradient.add_color_stop(1.0, outer).ok();
                ctx.set_fill_style_canvas_gradient(&gradient);
                let (x, y, w, h) = xywh(rect);
                ctx.fill_rect(x, y, w, h);
            }
            DrawCmd::Sprite { sprite, rect } => {
                let image = match sprite {
                    SpriteId::Player => &self.player.image,
                    SpriteId::FlyingObstacle => &self.flying_obstacle.image,
                };
                let (x, y, w, h) = xywh(rect);
                ctx.draw_image_with_html_image_element_and_dw_and_dh(image, x, y, w, h)
                    .ok();
            }
            DrawCmd::Text {
                text,
                pos,
                font,
                color,
            } => {
                ctx.set_fill_style_str(color);
                ctx.set_font(font);
                ctx.set_text_align("center");
                ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
            }
        }
    }
}

fn xywh(rect: &Rect) -> (f64, f64, f64, f64) {
    (
        rect.pos.x as f64,
        rect.pos.y as f64,
        rect.size.x as f64,
        rect.size.y as f64,
    )
}
