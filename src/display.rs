//! Rendering layer: all terminal output lives here.
//!
//! Each function receives a writer, an immutable view of the world and the
//! terminal size.  Nothing here mutates the world; this module only turns
//! logical field coordinates (origin bottom-left) into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::constants::{GRID_COLS, GRID_ROWS, PLAYER_BAND_BOTTOM, PLAYER_BAND_TOP};
use crate::entities::{Bullet, PowerUp, PowerUpKind, WorldState};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_ROUND: Color = Color::White;
const C_HUD_ACCURACY: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_SHIELD: Color = Color::Blue;
const C_ENEMY_ROWS: [Color; GRID_ROWS] = [Color::Red, Color::Magenta, Color::DarkRed, Color::DarkMagenta];
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_HOMING: Color = Color::DarkYellow;
const C_BULLET_ENEMY: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_MODIFIER: Color = Color::Green;

/// Terminal size in character cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Viewport { cols, rows }
    }

    /// Rows 2 ..= rows-3 hold the play area; the rest is HUD and border.
    fn play_rows(&self) -> u16 {
        self.rows.saturating_sub(4).max(1)
    }

    fn play_cols(&self) -> u16 {
        self.cols.saturating_sub(2).max(1)
    }

    /// Map a field position to a terminal cell inside the border.
    pub fn to_cell(&self, state: &WorldState, x: f32, y: f32) -> Option<(u16, u16)> {
        let field = &state.field;
        if !(0.0..=field.width).contains(&x) || !(0.0..=field.height).contains(&y) {
            return None;
        }
        let cols = self.play_cols();
        let rows = self.play_rows();
        let col = ((x / field.width) * cols as f32) as u16;
        let row = (((field.height - y) / field.height) * rows as f32) as u16;
        Some((1 + col.min(cols - 1), 2 + row.min(rows - 1)))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &WorldState, view: Viewport) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, state, view)?;
    draw_grid(out, state, view)?;

    for power_up in &state.power_ups {
        draw_power_up(out, state, view, power_up)?;
    }
    for bullet in &state.player_bullets {
        draw_player_bullet(out, state, view, bullet)?;
    }
    for bullet in &state.enemy_bullets {
        draw_enemy_bullet(out, state, view, bullet)?;
    }

    draw_player(out, state, view)?;
    draw_footer(out, state, view)?;

    if state.game_over {
        draw_game_over(out, state, view)?;
    } else if state.paused {
        draw_paused(out, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &WorldState, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("SCORE: {}", state.score)))?;

    let round_str = format!("ROUND: {}", state.round);
    let rx = (view.cols / 2).saturating_sub(round_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_ROUND))?;
    out.queue(Print(&round_str))?;

    let acc_str = format!("ACCURACY: {:.1}%", state.accuracy());
    let ax = view.cols.saturating_sub(acc_str.len() as u16 + 1);
    out.queue(cursor::MoveTo(ax, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_ACCURACY))?;
    out.queue(Print(&acc_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_grid<W: Write>(out: &mut W, state: &WorldState, view: Viewport) -> std::io::Result<()> {
    for row in 0..GRID_ROWS {
        out.queue(style::SetForegroundColor(C_ENEMY_ROWS[row]))?;
        for col in 0..GRID_COLS {
            if !state.grid.is_alive(row, col) {
                continue;
            }
            let (x, y) = state.grid.cell_center(row, col);
            if let Some((c, r)) = view.to_cell(state, x, y) {
                out.queue(cursor::MoveTo(c.saturating_sub(1).max(1), r))?;
                out.queue(Print("«▼»"))?;
            }
        }
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, state: &WorldState, view: Viewport) -> std::io::Result<()> {
    let band_mid = (PLAYER_BAND_BOTTOM + PLAYER_BAND_TOP) / 2.0;
    let Some((c, r)) = view.to_cell(state, state.player.x, band_mid) else {
        return Ok(());
    };
    if state.modifiers.shield.active {
        out.queue(style::SetForegroundColor(C_SHIELD))?;
        out.queue(cursor::MoveTo(c.saturating_sub(2).max(1), r))?;
        out.queue(Print("(   )"))?;
    }
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(c.saturating_sub(1).max(1), r))?;
    out.queue(Print("/▲\\"))?;
    Ok(())
}

fn draw_player_bullet<W: Write>(
    out: &mut W,
    state: &WorldState,
    view: Viewport,
    bullet: &Bullet,
) -> std::io::Result<()> {
    let Some((c, r)) = view.to_cell(state, bullet.x, bullet.y) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(c, r))?;
    if bullet.homing {
        out.queue(style::SetForegroundColor(C_BULLET_HOMING))?;
        out.queue(Print("✦"))?;
    } else {
        out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
        out.queue(Print("║"))?;
    }
    Ok(())
}

fn draw_enemy_bullet<W: Write>(
    out: &mut W,
    state: &WorldState,
    view: Viewport,
    bullet: &Bullet,
) -> std::io::Result<()> {
    let Some((c, r)) = view.to_cell(state, bullet.x, bullet.y) else {
        return Ok(());
    };
    let glyph = if bullet.dx < 0.0 {
        "↙"
    } else if bullet.dx > 0.0 {
        "↘"
    } else {
        "↓"
    };
    out.queue(cursor::MoveTo(c, r))?;
    out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// Draw a falling power-up.
///
/// Symbols:
///   ≈  (green) : SlowEnemyFire
///   ◎  (red)   : HomingBullets
///   ◈  (blue)  : Shield
fn draw_power_up<W: Write>(
    out: &mut W,
    state: &WorldState,
    view: Viewport,
    power_up: &PowerUp,
) -> std::io::Result<()> {
    let Some((c, r)) = view.to_cell(state, power_up.x, power_up.y) else {
        return Ok(());
    };
    let (glyph, color) = match power_up.kind {
        PowerUpKind::SlowEnemyFire => ("≈", Color::Green),
        PowerUpKind::HomingBullets => ("◎", Color::Red),
        PowerUpKind::Shield => ("◈", Color::Blue),
    };
    out.queue(cursor::MoveTo(c, r))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Footer (last row): controls hint + active modifiers ───────────────────────

/// Seconds remaining, rounded up, assuming 60 ticks per second.
fn seconds_left(ticks: u32) -> u32 {
    ticks.div_ceil(60)
}

fn draw_footer<W: Write>(out: &mut W, state: &WorldState, view: Viewport) -> std::io::Result<()> {
    let row = view.rows.saturating_sub(1);
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   ESC : Pause   Q : Quit"))?;

    let tags: Vec<String> = PowerUpKind::ALL
        .iter()
        .filter_map(|&kind| {
            let m = state.modifiers.get(kind);
            m.active
                .then(|| format!("[{} {}s]", kind.label(), seconds_left(m.remaining_ticks)))
        })
        .collect();
    if !tags.is_empty() {
        let text = tags.join(" ");
        let x = view.cols.saturating_sub(text.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(x, row))?;
        out.queue(style::SetForegroundColor(C_MODIFIER))?;
        out.queue(Print(&text))?;
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    view: Viewport,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_paused<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    draw_centered(
        out,
        view,
        &[
            ("╔══════════════╗".to_string(), Color::White),
            ("║    PAUSED    ║".to_string(), Color::White),
            ("╚══════════════╝".to_string(), Color::White),
            ("ESC - Resume".to_string(), C_HINT),
        ],
    )
}

fn draw_game_over<W: Write>(out: &mut W, state: &WorldState, view: Viewport) -> std::io::Result<()> {
    let (banner, color) = if state.victory {
        ("║     YOU  WIN       ║", Color::Green)
    } else {
        ("║    GAME  OVER      ║", Color::Red)
    };
    draw_centered(
        out,
        view,
        &[
            ("╔════════════════════╗".to_string(), color),
            (banner.to_string(), color),
            ("╚════════════════════╝".to_string(), color),
            (format!("Final Score: {:>6}", state.score), Color::Yellow),
            (format!("Accuracy: {:.1}%", state.accuracy()), C_HUD_ACCURACY),
            ("PRESS ENTER TO RESTART   Q - Quit".to_string(), Color::White),
        ],
    )
}
