/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.  The simulation runs in its own units
/// (800×600 by default); everything here is projected down to cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_station::entities::{GameState, SessionStatus};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ALIEN_TOP: Color = Color::Yellow;
const C_ALIEN_MID: Color = Color::Green;
const C_ALIEN_LOW: Color = Color::Red;
const C_EXTRA: Color = Color::Magenta;
const C_BLOCK: Color = Color::DarkYellow;
const C_LASER_PLAYER: Color = Color::Cyan;
const C_LASER_ALIEN: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

// ── Projection ────────────────────────────────────────────────────────────────

/// Map a simulation point to a terminal cell inside the playfield frame
/// (row 0 is the HUD, the outermost rows/columns are the border).
fn project(state: &GameState, term_w: u16, term_h: u16, x: f32, y: f32) -> (u16, u16) {
    let inner_w = term_w.saturating_sub(2).max(1) as f32;
    let inner_h = term_h.saturating_sub(4).max(1) as f32;
    let col = 1.0 + (x / state.config.width) * (inner_w - 1.0);
    let row = 2.0 + (y / state.config.height) * (inner_h - 1.0);
    (
        (col.max(0.0) as u16).min(term_w.saturating_sub(2)).max(1),
        (row.max(0.0) as u16).min(term_h.saturating_sub(3)).max(2),
    )
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    term_w: u16,
    term_h: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, term_w, term_h)?;
    draw_hud(out, state, term_w)?;

    draw_blocks(out, state, term_w, term_h)?;
    draw_aliens(out, state, term_w, term_h)?;
    draw_extra(out, state, term_w, term_h)?;
    draw_lasers(out, state, term_w, term_h)?;
    draw_player(out, state, term_w, term_h)?;
    draw_controls_hint(out, term_h)?;

    match state.status {
        SessionStatus::Won => draw_overlay(
            out,
            term_w,
            term_h,
            Color::Green,
            "YOU HAVE WON A SPECIAL PRIZE",
            state.score,
        )?,
        SessionStatus::Lost => draw_overlay(
            out,
            term_w,
            term_h,
            Color::Red,
            "GAME  OVER",
            state.score,
        )?,
        SessionStatus::Active => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, term_h.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, term_w: u16, term_h: u16) -> std::io::Result<()> {
    let w = term_w as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, term_h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..term_h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(term_w.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, term_w: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", state.score)))?;

    let hearts: String = "♥".repeat(state.lives as usize);
    let lives_str = format!("Lives:{}", hearts);
    let rx = term_w.saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(
    out: &mut W,
    state: &GameState,
    term_w: u16,
    term_h: u16,
) -> std::io::Result<()> {
    let (cx, cy) = state.player.rect.center();
    let (col, row) = project(state, term_w, term_h, cx, cy);
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    out.queue(Print("◢▲◣"))?;
    Ok(())
}

fn draw_aliens<W: Write>(
    out: &mut W,
    state: &GameState,
    term_w: u16,
    term_h: u16,
) -> std::io::Result<()> {
    for alien in &state.aliens {
        let (cx, cy) = alien.rect.center();
        let (col, row) = project(state, term_w, term_h, cx, cy);
        let (glyph, color) = match alien.value {
            300 => ("◈", C_ALIEN_TOP),
            200 => ("◉", C_ALIEN_MID),
            _ => ("▼", C_ALIEN_LOW),
        };
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn draw_extra<W: Write>(
    out: &mut W,
    state: &GameState,
    term_w: u16,
    term_h: u16,
) -> std::io::Result<()> {
    if let Some(extra) = &state.extra {
        let (cx, cy) = extra.rect.center();
        let (col, row) = project(state, term_w, term_h, cx, cy);
        out.queue(style::SetForegroundColor(C_EXTRA))?;
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
        out.queue(Print("<◆>"))?;
    }
    Ok(())
}

fn draw_blocks<W: Write>(
    out: &mut W,
    state: &GameState,
    term_w: u16,
    term_h: u16,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_BLOCK))?;
    for block in &state.blocks {
        let (cx, cy) = block.rect.center();
        let (col, row) = project(state, term_w, term_h, cx, cy);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("▓"))?;
    }
    Ok(())
}

fn draw_lasers<W: Write>(
    out: &mut W,
    state: &GameState,
    term_w: u16,
    term_h: u16,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_LASER_PLAYER))?;
    for laser in &state.player.lasers {
        let (cx, cy) = laser.rect.center();
        let (col, row) = project(state, term_w, term_h, cx, cy);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("║"))?;
    }
    out.queue(style::SetForegroundColor(C_LASER_ALIEN))?;
    for laser in &state.alien_lasers {
        let (cx, cy) = laser.rect.center();
        let (col, row) = project(state, term_w, term_h, cx, cy);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("↓"))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, term_h: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, term_h.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Terminal-state overlay ────────────────────────────────────────────────────

fn draw_overlay<W: Write>(
    out: &mut W,
    term_w: u16,
    term_h: u16,
    color: Color,
    headline: &str,
    score: u32,
) -> std::io::Result<()> {
    let inner = headline.chars().count() + 4;
    let top = format!("╔{}╗", "═".repeat(inner));
    let mid = format!("║  {}  ║", headline);
    let bottom = format!("╚{}╝", "═".repeat(inner));
    let score_line = format!("Final Score: {:>6}", score);
    let hint = "R - Play Again  Q - Quit";

    let cx = term_w / 2;
    let start_row = (term_h / 2).saturating_sub(3);

    for (i, line) in [&top, &mid, &bottom].iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(line.as_str()))?;
    }

    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, start_row + 3))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, start_row + 4))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
