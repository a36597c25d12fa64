/// All game entity types — pure data, no logic.

use crate::config::GameConfig;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in simulation units (origin top-left, y grows
/// downward).  Every sprite is one of these plus a behavior tag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Build a rect of the given size centered on a point.
    pub fn centered_on(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Rect {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict AABB overlap — rects that merely touch do not collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LaserOwner {
    Player,
    Alien,
}

#[derive(Clone, Debug)]
pub struct Laser {
    pub rect: Rect,
    /// Signed vertical velocity per tick — negative is upward.
    pub vy: f32,
    pub owner: LaserOwner,
}

// ── Formation members & the bonus visitor ─────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Alien {
    pub rect: Rect,
    /// Point value, fixed at formation build time from the alien's row.
    pub value: u32,
    /// Private bob phase — each alien oscillates independently.
    pub bob: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Side {
    Left,
    Right,
}

/// The cross-screen bonus alien.  Not a formation member: it has no bob, no
/// shared direction, and at most one exists at a time.
#[derive(Clone, Debug)]
pub struct Extra {
    pub rect: Rect,
    /// Signed horizontal velocity per tick.
    pub vx: f32,
    /// Edge it entered from.
    pub side: Side,
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// One destructible cell of an obstacle.
#[derive(Clone, Debug)]
pub struct Block {
    pub rect: Rect,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal distance moved per tick of held input.
    pub speed: f32,
    /// Fire permission — cleared on fire, restored by the cooldown check.
    pub ready: bool,
    /// Wall-clock timestamp of the last shot, in ms.
    pub last_shot_ms: u64,
    /// Bob phase accumulator.
    pub bob: f32,
    /// Lasers the player has fired and still owns.
    pub lasers: Vec<Laser>,
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionStatus {
    Active,
    Won,
    Lost,
}

/// Horizontal steering input for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Steer {
    Left,
    Right,
    Idle,
}

/// Everything the simulation consumes in one tick.  `alien_fire` is the
/// platform layer's periodic "an alien may fire now" event; `now_ms` is the
/// wall clock, consumed only by the player's fire cooldown.
#[derive(Clone, Copy, Debug)]
pub struct TickInput {
    pub steer: Steer,
    pub fire: bool,
    pub alien_fire: bool,
    pub now_ms: u64,
}

impl TickInput {
    /// No input, no events — just the clock.
    pub fn idle(now_ms: u64) -> Self {
        TickInput {
            steer: Steer::Idle,
            fire: false,
            alien_fire: false,
            now_ms,
        }
    }
}

/// Observable per-tick side effects.  The shell consumes these for audio /
/// logging; tests consume them to see what the resolver did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    PlayerShot,
    AlienShot,
    Explosion,
    ExtraDestroyed,
}

/// The entire session state.  Cloneable so pure update functions can return
/// a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub aliens: Vec<Alien>,
    pub alien_lasers: Vec<Laser>,
    pub extra: Option<Extra>,
    pub blocks: Vec<Block>,
    /// Shared formation direction, -1.0 or +1.0, applied to every alien
    /// uniformly each tick.
    pub alien_direction: f32,
    /// Ticks until the next Extra may spawn.
    pub extra_countdown: i32,
    pub lives: u32,
    pub score: u32,
    pub status: SessionStatus,
    pub tick: u64,
    /// Events emitted during the most recent tick.
    pub events: Vec<GameEvent>,
    pub config: GameConfig,
}
