//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! world.  No game logic is performed; this module only scales canvas
//! pixels to terminal cells and translates the world into terminal commands.
//! Layers are painted back to front: background, bullets and enemies, ship,
//! then HUD and overlays.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_shooter::entities::{Background, Bullet, Enemy, GameStatus, Kind, World};
use space_shooter::error::GameError;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_STARS_SLOW: Color = Color::DarkGrey;
const C_STARS_FAST: Color = Color::Grey;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_WAVE: Color = Color::Cyan;
const C_SHIP: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// Smallest terminal the game will start in.
pub const MIN_COLS: u16 = 40;
pub const MIN_ROWS: u16 = 15;

/// Stars per background layer.
const STARS_PER_LAYER: u16 = 40;

// ── Surface ───────────────────────────────────────────────────────────────────

/// The terminal area the canvas is scaled onto.  Row 0 is the HUD and the
/// last row is the controls hint; everything between is play area.
#[derive(Clone, Copy, Debug)]
pub struct Surface {
    pub cols: u16,
    pub rows: u16,
}

impl Surface {
    /// Query the terminal size, failing if it can't be read or is too small.
    pub fn acquire() -> Result<Self, GameError> {
        let (cols, rows) =
            terminal::size().map_err(|e| GameError::SurfaceUnavailable(e.to_string()))?;
        Self::with_size(cols, rows)
    }

    pub fn with_size(cols: u16, rows: u16) -> Result<Self, GameError> {
        if cols < MIN_COLS || rows < MIN_ROWS {
            return Err(GameError::SurfaceTooSmall {
                cols,
                rows,
                min_cols: MIN_COLS,
                min_rows: MIN_ROWS,
            });
        }
        Ok(Self { cols, rows })
    }

    fn play_rows(&self) -> u16 {
        self.rows.saturating_sub(2)
    }

    /// Map a canvas point to a terminal cell, or `None` if it's off-screen.
    fn to_cell(&self, world: &World, x: f32, y: f32) -> Option<(u16, u16)> {
        let cfg = &world.config;
        if x < 0.0 || y < 0.0 || x >= cfg.canvas_width || y >= cfg.canvas_height {
            return None;
        }
        let col = (x / cfg.canvas_width * self.cols as f32) as u16;
        let row = (y / cfg.canvas_height * self.play_rows() as f32) as u16;
        Some((col.min(self.cols - 1), 1 + row.min(self.play_rows() - 1)))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, surface: &Surface, world: &World) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    // Background layer
    let [slow, fast] = &world.backgrounds;
    draw_stars(out, surface, world, slow, 0, '.', C_STARS_SLOW)?;
    draw_stars(out, surface, world, fast, 1, '·', C_STARS_FAST)?;

    // Main layer
    for enemy in world.enemies.live() {
        draw_enemy(out, surface, world, enemy)?;
    }
    for bullet in world.ship.bullets.live().chain(world.enemy_bullets.live()) {
        draw_bullet(out, surface, world, bullet)?;
    }

    // Ship layer
    if world.ship.body.alive {
        draw_ship(out, surface, world)?;
    }

    draw_hud(out, surface, world)?;
    draw_controls_hint(out, surface)?;

    match world.status {
        GameStatus::Paused => draw_overlay(out, surface, &["PAUSED", "P - Continue  Q - Quit"])?,
        GameStatus::GameOver => {
            let score_line = format!("Final Score: {:>6}", world.score);
            draw_overlay(
                out,
                surface,
                &["GAME  OVER", score_line.as_str(), "R - Play Again  Q - Quit"],
            )?
        }
        GameStatus::Running => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, surface.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Background ────────────────────────────────────────────────────────────────

/// Scatter a fixed star pattern and shift it down by the layer's scroll.
fn draw_stars<W: Write>(
    out: &mut W,
    surface: &Surface,
    world: &World,
    layer: &Background,
    seed: u16,
    glyph: char,
    color: Color,
) -> std::io::Result<()> {
    let play_rows = surface.play_rows();
    let shift = (layer.y / world.config.canvas_height * play_rows as f32) as u16;

    out.queue(style::SetForegroundColor(color))?;
    for i in 0..STARS_PER_LAYER {
        let col = (i.wrapping_mul(97).wrapping_add(seed * 31)) % surface.cols;
        let base = (i.wrapping_mul(53).wrapping_add(seed * 17)) % play_rows;
        let row = 1 + (base + shift) % play_rows;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_ship<W: Write>(out: &mut W, surface: &Surface, world: &World) -> std::io::Result<()> {
    // Sprite (2 rows, 3 cols):
    //   ▲       ← tip
    //  /█\      ← fuselage + wings
    let b = world.ship.body.bounds;
    let Some((col, row)) = surface.to_cell(world, b.x + b.width / 2.0, b.y) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_SHIP))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print("▲"))?;
    if row < surface.play_rows() {
        out.queue(cursor::MoveTo(col.saturating_sub(1), row + 1))?;
        out.queue(Print("/█\\"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(
    out: &mut W,
    surface: &Surface,
    world: &World,
    enemy: &Enemy,
) -> std::io::Result<()> {
    let b = enemy.body.bounds;
    let Some((col, row)) = surface.to_cell(world, b.x + b.width / 2.0, b.y + b.height / 2.0)
    else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_ENEMY))?;
    out.queue(cursor::MoveTo(col.saturating_sub(1), row))?;
    out.queue(Print("«▼»"))?;
    Ok(())
}

fn draw_bullet<W: Write>(
    out: &mut W,
    surface: &Surface,
    world: &World,
    bullet: &Bullet,
) -> std::io::Result<()> {
    let b = bullet.body.bounds;
    let Some((col, row)) = surface.to_cell(world, b.x, b.y) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    match bullet.body.kind {
        Kind::PlayerBullet => {
            out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
            out.queue(Print("║"))?;
        }
        _ => {
            out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?;
            out.queue(Print("↓"))?;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, surface: &Surface, world: &World) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", world.score)))?;

    let wave_str = format!("Wave {}", world.wave);
    let wx = surface
        .cols
        .saturating_sub(wave_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(wx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_WAVE))?;
    out.queue(Print(&wave_str))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, surface: &Surface) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, surface.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Arrows/WASD : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

/// Draw a boxed panel centred on the play area.
fn draw_overlay<W: Write>(out: &mut W, surface: &Surface, lines: &[&str]) -> std::io::Result<()> {
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4;
    let top = format!("╔{}╗", "═".repeat(inner));
    let bottom = format!("╚{}╝", "═".repeat(inner));

    let cx = surface.cols / 2;
    let start_row = (surface.rows / 2).saturating_sub(lines.len() as u16 / 2 + 1);
    let col = cx.saturating_sub(top.chars().count() as u16 / 2);

    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(cursor::MoveTo(col, start_row))?;
    out.queue(Print(&top))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(col, start_row + 1 + i as u16))?;
        out.queue(Print(format!("║{:^width$}║", line, width = inner)))?;
    }
    out.queue(cursor::MoveTo(col, start_row + 1 + lines.len() as u16))?;
    out.queue(Print(&bottom))?;
    Ok(())
}
