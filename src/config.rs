/// Gameplay tuning and session configuration.
///
/// Everything the simulation reads as a constant lives here, so tests can
/// shrink the playfield or the formation without touching the logic.  The
/// defaults are the classic arrangement: an 800×600 field, a 6×8 formation,
/// four obstacles.

use anyhow::{ensure, Result};

/// Obstacle silhouette — one string per row, 'x' marks a block cell.
const OBSTACLE_SHAPE: [&str; 7] = [
    "  xxxxxxx",
    " xxxxxxxxx",
    "xxxxxxxxxxx",
    "xxxxxxxxxxx",
    "xxxxxxxxxxx",
    "xxx     xxx",
    "xx       xx",
];

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Playfield size in simulation units.
    pub width: f32,
    pub height: f32,

    /// Lives granted at session start.
    pub lives: u32,

    // ── Player ────────────────────────────────────────────────────────────
    /// Horizontal distance per tick of held input.
    pub player_speed: f32,
    pub player_w: f32,
    pub player_h: f32,
    /// Min wall-clock delay between shots.
    pub cooldown_ms: u64,

    // ── Lasers ────────────────────────────────────────────────────────────
    pub laser_w: f32,
    pub laser_h: f32,
    /// Per-tick velocity of a player laser (negative: upward).
    pub player_laser_vy: f32,
    /// Per-tick velocity of an alien laser.
    pub alien_laser_vy: f32,
    /// A laser this far outside the playfield destroys itself.
    pub laser_margin: f32,

    // ── Formation ─────────────────────────────────────────────────────────
    pub alien_rows: usize,
    pub alien_cols: usize,
    pub alien_w: f32,
    pub alien_h: f32,
    /// Grid pitch (distance between neighbouring alien origins).
    pub alien_x_gap: f32,
    pub alien_y_gap: f32,
    /// Top-left origin of the formation.
    pub alien_x_offset: f32,
    pub alien_y_offset: f32,
    /// Distance the whole formation drops when it meets an edge.
    pub descent: f32,

    // ── Extra (bonus alien) ───────────────────────────────────────────────
    pub extra_w: f32,
    pub extra_h: f32,
    /// Horizontal speed magnitude; sign comes from the spawn side.
    pub extra_speed: f32,
    /// Fixed altitude of the crossing.
    pub extra_y: f32,
    /// How far off-screen the Extra spawns.
    pub extra_spawn_margin: f32,
    /// Countdown range for the first visit of a session.
    pub extra_first_delay: (i32, i32),
    /// Countdown range between subsequent visits.
    pub extra_delay: (i32, i32),
    /// Score awarded for shooting the Extra down.
    pub extra_value: u32,

    // ── Obstacles ─────────────────────────────────────────────────────────
    pub obstacle_shape: Vec<String>,
    pub obstacle_count: usize,
    pub block_size: f32,
    /// y of the top row of every obstacle.
    pub obstacle_y: f32,

    // ── Bobbing ───────────────────────────────────────────────────────────
    pub bob_height: f32,
    pub bob_speed: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 800.0,
            height: 600.0,
            lives: 3,
            player_speed: 5.0,
            player_w: 60.0,
            player_h: 40.0,
            cooldown_ms: 600,
            laser_w: 4.0,
            laser_h: 20.0,
            player_laser_vy: -8.0,
            alien_laser_vy: 6.0,
            laser_margin: 50.0,
            alien_rows: 6,
            alien_cols: 8,
            alien_w: 44.0,
            alien_h: 32.0,
            alien_x_gap: 60.0,
            alien_y_gap: 48.0,
            alien_x_offset: 70.0,
            alien_y_offset: 100.0,
            descent: 2.0,
            extra_w: 56.0,
            extra_h: 28.0,
            extra_speed: 3.0,
            extra_y: 80.0,
            extra_spawn_margin: 50.0,
            extra_first_delay: (40, 80),
            extra_delay: (400, 800),
            extra_value: 500,
            obstacle_shape: OBSTACLE_SHAPE.iter().map(|s| s.to_string()).collect(),
            obstacle_count: 4,
            block_size: 6.0,
            obstacle_y: 480.0,
            bob_height: 1.0,
            bob_speed: 0.1,
        }
    }
}

impl GameConfig {
    /// Reject malformed configuration before a session is built.  The
    /// simulation core assumes these invariants and never re-checks them.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0.0 && self.height > 0.0,
            "playfield must have positive dimensions ({}x{})",
            self.width,
            self.height
        );
        ensure!(self.lives >= 1, "session needs at least one life");
        ensure!(self.player_speed > 0.0, "player speed must be positive");
        ensure!(
            self.alien_rows >= 1 && self.alien_cols >= 1,
            "formation must be at least 1x1 ({} rows, {} cols)",
            self.alien_rows,
            self.alien_cols
        );
        ensure!(!self.obstacle_shape.is_empty(), "obstacle mask is empty");
        ensure!(
            self.obstacle_shape
                .iter()
                .any(|row| row.contains('x')),
            "obstacle mask has no blocks"
        );
        for (i, row) in self.obstacle_shape.iter().enumerate() {
            ensure!(
                row.chars().all(|c| c == 'x' || c == ' '),
                "obstacle mask row {} contains characters other than 'x' and space",
                i
            );
        }
        ensure!(self.obstacle_count >= 1, "need at least one obstacle");
        ensure!(self.block_size > 0.0, "block size must be positive");
        ensure!(self.extra_speed > 0.0, "extra speed must be positive");
        Ok(())
    }
}
