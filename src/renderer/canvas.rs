//! Canvas 2D drawing of a game snapshot

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::effects::{Distraction, Effects};
use crate::settings::Settings;
use crate::sim::{Background, GamePhase, GameState, obstacle_hitbox, runner_hitbox};

const GROUND_COLOR: &str = "#8d6e63";
const TEXT_COLOR: &str = "#222";

/// Owns the 2D context of the game canvas
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Match the canvas backing store to the field size
    pub fn resize(&self, width: f32, height: f32) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
    }

    /// Draw one frame. The context state is restored even if a draw call
    /// fails, so a bad frame never leaves the shake translation behind.
    pub fn render(&self, state: &GameState, effects: &Effects, settings: &Settings) -> Result<(), JsValue> {
        let field = state.field;
        self.ctx.save();
        self.ctx
            .clear_rect(0.0, 0.0, field.width as f64, field.height as f64);
        let result = self.draw_frame(state, effects, settings);
        self.ctx.restore();
        result
    }

    fn draw_frame(&self, state: &GameState, effects: &Effects, settings: &Settings) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let field = state.field;
        let (w, h) = (field.width as f64, field.height as f64);

        ctx.translate(effects.shake.x as f64, effects.shake.y as f64)?;

        self.draw_background(state, effects, w, h)?;

        // Ground
        ctx.set_fill_style_str(GROUND_COLOR);
        ctx.fill_rect(0.0, field.ground_y() as f64, w, GROUND_HEIGHT as f64);

        ctx.set_text_align("left");
        ctx.set_text_baseline("bottom");

        for obstacle in &state.obstacles {
            ctx.set_font(&format!("{}px sans-serif", obstacle.height.max(OBSTACLE_WIDTH)));
            ctx.fill_text(obstacle.kind.glyph(), obstacle.x as f64, field.ground_y() as f64)?;
        }

        // Runner sprite; the run cycle bobs it by a pixel while grounded
        let bob = if state.runner.airborne { 0.0 } else { effects.run_frame as f64 };
        ctx.set_font(&format!("{}px sans-serif", RUNNER_HEIGHT * 0.75));
        ctx.fill_text(
            effects.face.glyph(),
            RUNNER_X as f64,
            (field.ground_y() - state.runner.y) as f64 - bob,
        )?;

        for d in &effects.distractions {
            ctx.save();
            let drawn = self.draw_distraction(d);
            ctx.restore();
            drawn?;
        }

        if settings.show_hitboxes {
            self.draw_hitboxes(state);
        }

        if effects.is_flashing() {
            ctx.set_global_alpha(0.3);
            ctx.set_fill_style_str("white");
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_global_alpha(1.0);
        }

        self.draw_overlay(state, w, h)
    }

    fn draw_background(&self, state: &GameState, effects: &Effects, w: f64, h: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let gradient = match &state.profile.background {
            Background::Gradient { top, bottom } => {
                let g = ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
                g.add_color_stop(0.0, top)?;
                g.add_color_stop(1.0, bottom)?;
                g
            }
            Background::Cycling => {
                // Gradient line through the centre at the current angle
                let angle = (effects.gradient_angle as f64).to_radians();
                let (cx, cy) = (w / 2.0, h / 2.0);
                let (dx, dy) = (angle.sin() * w / 2.0, -angle.cos() * h / 2.0);
                let g = ctx.create_linear_gradient(cx - dx, cy - dy, cx + dx, cy + dy);
                let [from, to] = effects.gradient_colors();
                g.add_color_stop(0.0, from)?;
                g.add_color_stop(1.0, to)?;
                g
            }
        };
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, w, h);
        Ok(())
    }

    fn draw_distraction(&self, d: &Distraction) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.translate(d.pos.x as f64, d.pos.y as f64)?;
        ctx.rotate((d.rotation as f64).to_radians())?;
        ctx.set_font(&format!("{}px sans-serif", d.size));
        ctx.fill_text(d.glyph, 0.0, 0.0)
    }

    fn draw_hitboxes(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.set_line_width(2.0);

        let hb = runner_hitbox(&state.runner, &state.field);
        ctx.set_stroke_style_str("red");
        ctx.stroke_rect(hb.left() as f64, hb.top() as f64, hb.size().x as f64, hb.size().y as f64);

        ctx.set_stroke_style_str("blue");
        for obstacle in &state.obstacles {
            let hb = obstacle_hitbox(obstacle, &state.field);
            ctx.stroke_rect(hb.left() as f64, hb.top() as f64, hb.size().x as f64, hb.size().y as f64);
        }
    }

    fn draw_overlay(&self, state: &GameState, w: f64, h: f64) -> Result<(), JsValue> {
        let message = match state.session.phase {
            GamePhase::Ready => "Press Space or tap to start",
            GamePhase::GameOver => "Game over! Press Enter or tap to retry",
            GamePhase::Running => return Ok(()),
        };
        let ctx = &self.ctx;
        ctx.set_fill_style_str(TEXT_COLOR);
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_font("bold 24px sans-serif");
        ctx.fill_text(message, w / 2.0, h / 2.0)
    }
}
