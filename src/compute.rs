/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG and tracing.
///
/// `tick` advances the simulation by exactly one step, in a fixed order:
/// alien-fire event, player, alien lasers, extra, formation, extra spawner,
/// collision resolution, win/loss evaluation.  All randomness comes through
/// `rng` so callers control determinism (tests use a seeded RNG).

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info};

use crate::collision;
use crate::config::GameConfig;
use crate::entities::{
    Alien, Block, Extra, GameEvent, GameState, Laser, LaserOwner, Player, Rect, SessionStatus,
    Side, Steer, TickInput,
};

// ── Session construction ─────────────────────────────────────────────────────

/// Build a fresh session: full formation, intact obstacles, starting lives,
/// zero score, formation moving right.  This is also the reset — nothing
/// survives from a previous session.
///
/// Fails if the configuration is malformed; the simulation itself never
/// re-validates.
pub fn new_session(config: &GameConfig, rng: &mut impl Rng) -> Result<GameState> {
    config.validate()?;

    let player = Player {
        rect: Rect::new(
            config.width / 2.0 - config.player_w / 2.0,
            config.height - config.player_h,
            config.player_w,
            config.player_h,
        ),
        speed: config.player_speed,
        ready: true,
        last_shot_ms: 0,
        bob: 1.0,
        lasers: Vec::new(),
    };

    let state = GameState {
        player,
        aliens: build_formation(config),
        alien_lasers: Vec::new(),
        extra: None,
        blocks: build_obstacles(config),
        alien_direction: 1.0,
        extra_countdown: rng
            .gen_range(config.extra_first_delay.0..=config.extra_first_delay.1),
        lives: config.lives,
        score: 0,
        status: SessionStatus::Active,
        tick: 0,
        events: Vec::new(),
        config: config.clone(),
    };

    debug!(
        aliens = state.aliens.len(),
        blocks = state.blocks.len(),
        "session built"
    );
    Ok(state)
}

/// Point value by formation row — the top row is the most valuable.
fn row_value(row: usize) -> u32 {
    match row {
        0 => 300,
        1 | 2 => 200,
        _ => 100,
    }
}

fn build_formation(config: &GameConfig) -> Vec<Alien> {
    let mut aliens = Vec::with_capacity(config.alien_rows * config.alien_cols);
    for row in 0..config.alien_rows {
        for col in 0..config.alien_cols {
            let x = config.alien_x_offset + col as f32 * config.alien_x_gap;
            let y = config.alien_y_offset + row as f32 * config.alien_y_gap;
            aliens.push(Alien {
                rect: Rect::new(x, y, config.alien_w, config.alien_h),
                value: row_value(row),
                bob: 0.0,
            });
        }
    }
    aliens
}

fn build_obstacles(config: &GameConfig) -> Vec<Block> {
    let mut blocks = Vec::new();
    let x_start = config.width / 15.0;
    for i in 0..config.obstacle_count {
        let offset_x = i as f32 * config.width / config.obstacle_count as f32;
        for (row, mask_row) in config.obstacle_shape.iter().enumerate() {
            for (col, cell) in mask_row.chars().enumerate() {
                if cell == 'x' {
                    blocks.push(Block {
                        rect: Rect::new(
                            x_start + offset_x + col as f32 * config.block_size,
                            config.obstacle_y + row as f32 * config.block_size,
                            config.block_size,
                            config.block_size,
                        ),
                    });
                }
            }
        }
    }
    blocks
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// Advance the simulation by one tick.  Won and Lost are terminal: ticks in
/// those states change nothing (the shell keeps rendering and waits for an
/// external reset).
pub fn tick(state: &GameState, input: &TickInput, rng: &mut impl Rng) -> GameState {
    let mut s = state.clone();
    s.events.clear();
    if s.status != SessionStatus::Active {
        return s;
    }
    s.tick += 1;

    alien_fire(&mut s, input, rng);
    update_player(&mut s, input);
    advance_alien_lasers(&mut s);
    advance_extra(&mut s);
    advance_formation(&mut s);
    run_extra_timer(&mut s, rng);
    collision::resolve(&mut s);

    // Win check is independent of the resolver, once per tick, after all
    // removals for the tick.
    if s.status == SessionStatus::Active && s.aliens.is_empty() {
        info!(score = s.score, "formation cleared — session won");
        s.status = SessionStatus::Won;
    }

    s
}

/// The platform layer's periodic enemy-fire event: a uniformly random living
/// alien fires from its center.
fn alien_fire(s: &mut GameState, input: &TickInput, rng: &mut impl Rng) {
    if !input.alien_fire || s.aliens.is_empty() {
        return;
    }
    let shooter = &s.aliens[rng.gen_range(0..s.aliens.len())];
    let (cx, cy) = shooter.rect.center();
    s.alien_lasers.push(Laser {
        rect: Rect::centered_on(cx, cy, s.config.laser_w, s.config.laser_h),
        vy: s.config.alien_laser_vy,
        owner: LaserOwner::Alien,
    });
    s.events.push(GameEvent::AlienShot);
}

fn update_player(s: &mut GameState, input: &TickInput) {
    // Movement, then clamp to the playfield.
    match input.steer {
        Steer::Left => s.player.rect.x -= s.player.speed,
        Steer::Right => s.player.rect.x += s.player.speed,
        Steer::Idle => {}
    }
    if s.player.rect.left() <= 0.0 {
        s.player.rect.x = 0.0;
    }
    if s.player.rect.right() >= s.config.width {
        s.player.rect.x = s.config.width - s.player.rect.w;
    }

    // Firing — only while ready; the cooldown restores readiness below.
    if input.fire && s.player.ready {
        let (cx, _) = s.player.rect.center();
        s.player.lasers.push(Laser {
            rect: Rect::centered_on(cx, s.player.rect.top(), s.config.laser_w, s.config.laser_h),
            vy: s.config.player_laser_vy,
            owner: LaserOwner::Player,
        });
        s.player.ready = false;
        s.player.last_shot_ms = input.now_ms;
        s.events.push(GameEvent::PlayerShot);
    }

    // Recharge — checked every tick, independent of input.
    if !s.player.ready
        && input.now_ms.saturating_sub(s.player.last_shot_ms) >= s.config.cooldown_ms
    {
        s.player.ready = true;
    }

    // Owned lasers.
    let height = s.config.height;
    let margin = s.config.laser_margin;
    for laser in &mut s.player.lasers {
        laser.rect.y += laser.vy;
    }
    s.player
        .lasers
        .retain(|l| l.rect.y > -margin && l.rect.y < height + margin);

    // Bob — applied after clamping, so it can nudge the rect slightly out of
    // bounds.  Preserved quirk, not corrected.
    s.player.bob += s.config.bob_speed;
    s.player.rect.y += s.player.bob.sin() * s.config.bob_height;
}

fn advance_alien_lasers(s: &mut GameState) {
    let height = s.config.height;
    let margin = s.config.laser_margin;
    for laser in &mut s.alien_lasers {
        laser.rect.y += laser.vy;
    }
    s.alien_lasers
        .retain(|l| l.rect.y > -margin && l.rect.y < height + margin);
}

fn advance_extra(s: &mut GameState) {
    let width = s.config.width;
    let mut gone = false;
    if let Some(extra) = &mut s.extra {
        extra.rect.x += extra.vx;
        // Despawns once it is beyond the far edge by its own width.
        gone = extra.rect.x < -extra.rect.w || extra.rect.x > width + extra.rect.w;
    }
    if gone {
        s.extra = None;
    }
}

/// Move every alien by the shared direction, then let the first offending
/// alien (iteration order, right edge checked before left) decide a flip.
/// On a flip the whole formation steps down exactly once.
fn advance_formation(s: &mut GameState) {
    let direction = s.alien_direction;
    let bob_speed = s.config.bob_speed;
    let bob_height = s.config.bob_height;
    for alien in &mut s.aliens {
        alien.rect.x += direction;
        alien.bob += bob_speed;
        alien.rect.y += alien.bob.sin() * bob_height;
    }

    let width = s.config.width;
    let mut flipped = None;
    for alien in &s.aliens {
        if alien.rect.right() >= width {
            flipped = Some(-1.0);
            break;
        } else if alien.rect.left() <= 0.0 {
            flipped = Some(1.0);
            break;
        }
    }
    if let Some(direction) = flipped {
        s.alien_direction = direction;
        let descent = s.config.descent;
        for alien in &mut s.aliens {
            alien.rect.y += descent;
        }
    }
}

/// Countdown to the next Extra.  Decrements every tick; at zero, spawns from
/// a random side if none is alive and re-arms the countdown.  While one is
/// alive the countdown stays expired, so the next visit follows the current
/// one immediately after it leaves or dies.
fn run_extra_timer(s: &mut GameState, rng: &mut impl Rng) {
    s.extra_countdown -= 1;
    if s.extra_countdown > 0 || s.extra.is_some() {
        return;
    }

    let side = if rng.gen_bool(0.5) {
        Side::Right
    } else {
        Side::Left
    };
    let (x, vx) = match side {
        Side::Right => (
            s.config.width + s.config.extra_spawn_margin,
            -s.config.extra_speed,
        ),
        Side::Left => (-s.config.extra_spawn_margin, s.config.extra_speed),
    };
    s.extra = Some(Extra {
        rect: Rect::new(x, s.config.extra_y, s.config.extra_w, s.config.extra_h),
        vx,
        side,
    });
    s.extra_countdown = rng.gen_range(s.config.extra_delay.0..=s.config.extra_delay.1);
    debug!(?side, "extra alien dispatched");
}
