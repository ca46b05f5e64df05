//! Canvas 2D renderer
//!
//! Draws the session read-only once per animation frame: the playfield when a
//! run exists, then the HUD or the overlay for the current screen.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::theme::{Theme, crosshair_position, format_score, theme_for_level, wind_label};
use crate::consts::{HIT_RADIUS, MUZZLE_FLASH_TICKS};
use crate::leaderboard::DISPLAYED_ENTRIES;
use crate::session::{MenuItem, Screen, Session};
use crate::sim::{GameState, Weather};

const HUD_HEIGHT: f64 = 80.0;
const HUD_FONT: &str = "16px Courier New";
const RAIN_STREAKS: usize = 150;
const WIND_LINES: usize = 20;
const RING_RADII: [f64; 4] = [45.0, 35.0, 25.0, 15.0];
const RING_COLORS: [&str; 4] = ["#FF0000", "#FFFFFF", "#FF0000", "#FFFFFF"];

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    /// Per-frame noise for weather streaks
    noise: Pcg32,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
            noise: Pcg32::seed_from_u64(0x7a26e7),
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Paint one frame
    pub fn render(&mut self, session: &Session, time_ms: f64) -> Result<(), JsValue> {
        match &session.game {
            Some(game) => self.draw_scene(session, game, time_ms)?,
            None => self.clear(theme_for_level(0)),
        }

        match session.screen {
            Screen::MainMenu => self.draw_main_menu(session)?,
            Screen::NameInput => self.draw_name_input(session, time_ms)?,
            Screen::Playing => {
                if let Some(game) = &session.game {
                    self.draw_hud(game)?;
                    if game.paused {
                        self.draw_pause_overlay()?;
                    }
                }
            }
            Screen::GameOver => self.draw_game_over(session)?,
            Screen::ProfileChoice => self.draw_profile_choice(session)?,
            Screen::Leaderboard => self.draw_leaderboard(session)?,
        }
        Ok(())
    }

    fn clear(&self, theme: &Theme) {
        self.ctx.set_fill_style_str(theme.background);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn circle(&self, x: f64, y: f64, radius: f64) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.arc(x, y, radius, 0.0, TAU)
    }

    fn draw_scene(
        &mut self,
        session: &Session,
        game: &GameState,
        time_ms: f64,
    ) -> Result<(), JsValue> {
        let theme = theme_for_level(game.level);
        self.clear(theme);
        if session.settings.weather_effects {
            self.draw_weather(game, time_ms)?;
        }
        self.draw_targets(game)?;
        self.draw_projectiles(game, theme)?;
        self.draw_cannon(game)?;
        if session.screen == Screen::Playing {
            let aim = crosshair_position(
                game.aim,
                &game.environment,
                time_ms,
                session.settings.crosshair_sway,
            );
            self.draw_crosshair(aim.x as f64, aim.y as f64)?;
        }
        if session.settings.particles {
            self.draw_particles(game)?;
        }
        Ok(())
    }

    fn draw_weather(&mut self, game: &GameState, time_ms: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let wind = game.environment.wind as f64;
        match game.environment.weather {
            Weather::Clear => {}
            Weather::Rain => {
                ctx.set_stroke_style_str("rgba(173, 216, 230, 0.7)");
                ctx.set_line_width(2.0);
                for i in 0..RAIN_STREAKS {
                    let x = (self.noise.random::<f64>() * self.width + time_ms * 0.05) % self.width;
                    let y = (time_ms * 0.02 + i as f64 * 8.0) % (self.height + 20.0);
                    let offset = wind * 2.0;
                    ctx.begin_path();
                    ctx.move_to(x + offset, y);
                    ctx.line_to(x - 3.0 + offset, y + 15.0);
                    ctx.stroke();
                }
            }
            Weather::Fog => {
                let (cx, cy) = (self.width / 2.0, self.height / 2.0);
                let gradient = ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, self.width)?;
                gradient.add_color_stop(0.0, "rgba(255, 255, 255, 0.1)")?;
                gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0.4)")?;
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.fill_rect(0.0, 0.0, self.width, self.height);
            }
            Weather::Wind => {
                ctx.set_stroke_style_str("rgba(255, 255, 255, 0.5)");
                ctx.set_line_width(3.0);
                let length = wind.abs() * 10.0 * wind.signum();
                for _ in 0..WIND_LINES {
                    let x = self.noise.random::<f64>() * self.width;
                    let y = self.noise.random::<f64>() * self.height;
                    ctx.begin_path();
                    ctx.move_to(x, y);
                    ctx.line_to(x + length, y);
                    ctx.stroke();
                }
            }
        }
        Ok(())
    }

    fn draw_targets(&self, game: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for target in game.targets.iter().filter(|t| !t.is_hit()) {
            let (x, y) = (target.pos.x as f64, target.pos.y as f64);
            for (radius, color) in RING_RADII.iter().zip(RING_COLORS) {
                ctx.set_fill_style_str(color);
                self.circle(x, y, *radius)?;
                ctx.fill();
                ctx.set_stroke_style_str("#000000");
                ctx.set_line_width(1.0);
                ctx.stroke();
            }
            ctx.set_fill_style_str("#000000");
            self.circle(x, y, 5.0)?;
            ctx.fill();

            ctx.set_shadow_color("rgba(255, 0, 0, 0.3)");
            ctx.set_shadow_blur(10.0);
            self.circle(x, y, HIT_RADIUS as f64)?;
            ctx.stroke();
            ctx.set_shadow_blur(0.0);
        }
        Ok(())
    }

    fn draw_projectiles(&self, game: &GameState, theme: &Theme) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for projectile in &game.projectiles {
            ctx.set_stroke_style_str(theme.trail);
            ctx.set_line_width(2.0);
            ctx.begin_path();
            for (i, point) in projectile.trail.iter().enumerate() {
                if i == 0 {
                    ctx.move_to(point.x as f64, point.y as f64);
                } else {
                    ctx.line_to(point.x as f64, point.y as f64);
                }
            }
            ctx.stroke();

            let (x, y) = (projectile.pos.x as f64, projectile.pos.y as f64);
            ctx.set_fill_style_str(theme.cannonball);
            self.circle(x, y, 8.0)?;
            ctx.fill();
            // Highlight
            ctx.set_fill_style_str("rgba(255, 255, 255, 0.5)");
            self.circle(x - 2.0, y - 2.0, 3.0)?;
            ctx.fill();
        }
        Ok(())
    }

    fn draw_cannon(&self, game: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let cannon = game.viewport.cannon();
        let (cx, cy) = (cannon.x as f64, cannon.y as f64);
        let angle = game.cannon_angle() as f64;

        ctx.set_fill_style_str("#654321");
        ctx.fill_rect(cx - 50.0, cy - 20.0, 100.0, 40.0);

        ctx.set_fill_style_str("#8B4513");
        self.circle(cx - 35.0, cy + 20.0, 18.0)?;
        ctx.arc(cx + 35.0, cy + 20.0, 18.0, 0.0, TAU)?;
        ctx.fill();

        ctx.save();
        ctx.translate(cx, cy)?;
        ctx.rotate(angle)?;
        ctx.set_fill_style_str("#2F4F4F");
        ctx.fill_rect(0.0, -12.0, 80.0, 24.0);
        ctx.set_fill_style_str("#1C1C1C");
        ctx.fill_rect(0.0, -8.0, 80.0, 6.0);
        ctx.fill_rect(0.0, 2.0, 80.0, 6.0);

        if game.muzzle_flash > 0 {
            let flash = game.muzzle_flash as f64;
            let outer = flash / MUZZLE_FLASH_TICKS as f64;
            ctx.set_fill_style_str(&format!("rgba(255, 255, 0, {})", outer));
            self.circle(80.0, 0.0, flash * 1.5)?;
            ctx.fill();
            ctx.set_fill_style_str(&format!("rgba(255, 165, 0, {})", (flash / 10.0).min(1.0)));
            self.circle(80.0, 0.0, flash)?;
            ctx.fill();
        }
        ctx.restore();
        Ok(())
    }

    fn draw_crosshair(&self, x: f64, y: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str("#FF0000");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(x - 10.0, y);
        ctx.line_to(x + 10.0, y);
        ctx.move_to(x, y - 10.0);
        ctx.line_to(x, y + 10.0);
        ctx.stroke();

        ctx.set_stroke_style_str("#FFFFFF");
        ctx.set_line_width(1.0);
        self.circle(x, y, 15.0)?;
        ctx.stroke();
        Ok(())
    }

    fn draw_particles(&self, game: &GameState) -> Result<(), JsValue> {
        for particle in &game.particles {
            self.ctx
                .set_fill_style_str(&format!("rgba(255, 255, 0, {})", particle.alpha()));
            self.circle(particle.pos.x as f64, particle.pos.y as f64, 2.0)?;
            self.ctx.fill();
        }
        Ok(())
    }

    fn draw_hud(&self, game: &GameState) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
        ctx.fill_rect(0.0, 0.0, self.width, HUD_HEIGHT);

        ctx.set_text_align("left");
        ctx.set_fill_style_str("#FFFFFF");
        ctx.set_font(HUD_FONT);
        ctx.fill_text(&format!("Score: {}", format_score(game.score)), 10.0, 25.0)?;
        ctx.fill_text(&format!("Level: {}", game.level), 10.0, 45.0)?;
        ctx.fill_text(&format!("Accuracy: {}%", game.accuracy()), 10.0, 65.0)?;

        let theme = theme_for_level(game.level);
        ctx.fill_text(&format!("Theme: {}", theme.name), 200.0, 25.0)?;
        ctx.fill_text(
            &format!("Weather: {}", game.environment.weather.as_str()),
            200.0,
            45.0,
        )?;
        if let Some(label) = wind_label(game.environment.wind) {
            ctx.fill_text(&label, 200.0, 65.0)?;
        }

        if game.in_transition() && !game.targets.is_empty() {
            ctx.set_fill_style_str("rgba(0, 255, 0, 0.8)");
            ctx.set_font("24px Courier New");
            ctx.set_text_align("center");
            ctx.fill_text("LEVEL COMPLETE!", self.width / 2.0, self.height / 2.0)?;
            ctx.set_text_align("left");
        }

        ctx.set_fill_style_str("#FF0000");
        ctx.set_font("20px Arial");
        for i in 0..game.lives {
            ctx.fill_text("\u{2665}", self.width - 30.0 - i as f64 * 25.0, 25.0)?;
        }
        Ok(())
    }

    fn overlay(&self) {
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.75)");
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
        self.ctx.set_text_align("center");
    }

    /// Centered lines starting at `top`, `spacing` apart
    fn text_block(&self, lines: &[&str], top: f64, spacing: f64) -> Result<(), JsValue> {
        for (i, line) in lines.iter().enumerate() {
            self.ctx
                .fill_text(line, self.width / 2.0, top + i as f64 * spacing)?;
        }
        Ok(())
    }

    fn title(&self, text: &str, y: f64) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str("#FFD700");
        self.ctx.set_font("bold 40px Courier New");
        self.ctx.fill_text(text, self.width / 2.0, y)
    }

    fn hint(&self, text: &str) -> Result<(), JsValue> {
        self.ctx.set_fill_style_str("#AAAAAA");
        self.ctx.set_font(HUD_FONT);
        self.ctx.fill_text(text, self.width / 2.0, self.height - 60.0)
    }

    fn draw_pause_overlay(&self) -> Result<(), JsValue> {
        self.overlay();
        let mid = self.height / 2.0;
        self.title("PAUSED", mid - 60.0)?;
        self.ctx.set_fill_style_str("#FFFFFF");
        self.ctx.set_font("20px Courier New");
        self.text_block(
            &[
                "Press Escape to resume",
                "R - Restart | M - Toggle Sound",
                "+/- - Volume | ESC - Pause",
            ],
            mid,
            32.0,
        )
    }

    fn draw_main_menu(&self, session: &Session) -> Result<(), JsValue> {
        self.overlay();
        let mid = self.height / 2.0;
        self.title("Target Master", mid - 120.0)?;
        self.ctx.set_font("28px Courier New");
        for (i, item) in MenuItem::ALL.iter().enumerate() {
            let selected = *item == session.selected_item();
            self.ctx
                .set_fill_style_str(if selected { "#FFD700" } else { "#FFFFFF" });
            let label = if selected {
                format!("> {} <", item.label())
            } else {
                item.label().to_string()
            };
            self.ctx
                .fill_text(&label, self.width / 2.0, mid + i as f64 * 50.0)?;
        }
        self.hint("Use Arrow Keys to navigate, Enter to select")
    }

    fn draw_name_input(&self, session: &Session, time_ms: f64) -> Result<(), JsValue> {
        self.overlay();
        let mid = self.height / 2.0;
        self.title("Enter Your Name", mid - 80.0)?;

        let (w, h) = (420.0, 50.0);
        self.ctx.set_fill_style_str("#222222");
        self.ctx.fill_rect(self.width / 2.0 - w / 2.0, mid - h / 2.0, w, h);
        self.ctx.set_stroke_style_str("#FFD700");
        self.ctx.set_line_width(2.0);
        self.ctx
            .stroke_rect(self.width / 2.0 - w / 2.0, mid - h / 2.0, w, h);

        self.ctx.set_font("24px Courier New");
        let caret = if (time_ms / 500.0) as u64 % 2 == 0 { "_" } else { " " };
        if session.player_name.is_empty() {
            self.ctx.set_fill_style_str("#777777");
            self.ctx
                .fill_text("max 20 characters", self.width / 2.0, mid + 8.0)?;
        } else {
            self.ctx.set_fill_style_str("#FFFFFF");
            self.ctx.fill_text(
                &format!("{}{}", session.player_name, caret),
                self.width / 2.0,
                mid + 8.0,
            )?;
        }
        self.hint("Press Enter to continue")
    }

    fn draw_game_over(&self, session: &Session) -> Result<(), JsValue> {
        self.overlay();
        let mid = self.height / 2.0;
        self.title("Game Over!", mid - 140.0)?;
        if let Some(game) = &session.game {
            let lines = [
                format!("Final Score: {}", format_score(game.score)),
                format!("Max Level: {}", session.max_level),
                format!("Accuracy: {}%", game.accuracy()),
                format!("Targets Hit: {}", game.targets_hit),
                format!("Shots Fired: {}", game.shots_fired),
            ];
            let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
            self.ctx.set_fill_style_str("#FFFFFF");
            self.ctx.set_font("22px Courier New");
            self.text_block(&lines, mid - 60.0, 36.0)?;
        }
        self.hint("Press Enter to continue")
    }

    fn draw_profile_choice(&self, session: &Session) -> Result<(), JsValue> {
        self.overlay();
        let mid = self.height / 2.0;
        self.title("Choose Option", mid - 100.0)?;
        let same = format!("1 - Continue with {}", session.player_name);
        self.ctx.set_fill_style_str("#FFFFFF");
        self.ctx.set_font("24px Courier New");
        self.text_block(&[&same, "2 - New Profile", "3 - Main Menu"], mid - 20.0, 44.0)
    }

    fn draw_leaderboard(&self, session: &Session) -> Result<(), JsValue> {
        self.overlay();
        let top = 120.0;
        self.title("Global Leaderboard", top)?;
        self.ctx.set_font("20px Courier New");

        let view = &session.leaderboard;
        if view.loading {
            self.ctx.set_fill_style_str("#AAAAAA");
            self.ctx
                .fill_text("Loading global scores...", self.width / 2.0, top + 80.0)?;
        } else if view.entries.is_empty() {
            self.ctx.set_fill_style_str("#AAAAAA");
            self.ctx
                .fill_text("No scores available yet", self.width / 2.0, top + 80.0)?;
        } else {
            for (i, entry) in view.entries.iter().take(DISPLAYED_ENTRIES).enumerate() {
                self.ctx
                    .set_fill_style_str(if i == 0 { "#FFD700" } else { "#FFFFFF" });
                let row = format!(
                    "#{:<3} {:<20} {:>10}  L{:<3} {:>3}%",
                    i + 1,
                    entry.name,
                    format_score(entry.score),
                    entry.max_level,
                    entry.accuracy
                );
                self.ctx
                    .fill_text(&row, self.width / 2.0, top + 80.0 + i as f64 * 32.0)?;
            }
        }
        self.hint("Press Escape to return")
    }
}
