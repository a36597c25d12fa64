use space_station::compute::{new_session, tick};
use space_station::config::GameConfig;
use space_station::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Config with bobbing disabled so positions stay exact across ticks.
fn test_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.bob_height = 0.0;
    config
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_state() -> GameState {
    new_session(&test_config(), &mut seeded_rng()).unwrap()
}

fn alien_at(x: f32, y: f32, value: u32) -> Alien {
    Alien {
        rect: Rect::new(x, y, 44.0, 32.0),
        value,
        bob: 0.0,
    }
}

fn fire_input(now_ms: u64) -> TickInput {
    TickInput {
        steer: Steer::Idle,
        fire: true,
        alien_fire: false,
        now_ms,
    }
}

// ── Session construction ──────────────────────────────────────────────────────

#[test]
fn new_session_builds_full_formation() {
    let s = make_state();
    assert_eq!(s.aliens.len(), 6 * 8);
    // Row-major build: row 0 first
    assert_eq!(s.aliens[0].rect.x, 70.0);
    assert_eq!(s.aliens[0].rect.y, 100.0);
    assert_eq!(s.aliens[1].rect.x, 130.0); // next column, 60 apart
    assert_eq!(s.aliens[8].rect.y, 148.0); // next row, 48 down
}

#[test]
fn new_session_assigns_row_values() {
    let s = make_state();
    assert_eq!(s.aliens[0].value, 300); // top row
    assert_eq!(s.aliens[8].value, 200); // row 1
    assert_eq!(s.aliens[16].value, 200); // row 2
    assert_eq!(s.aliens[24].value, 100); // row 3
    assert_eq!(s.aliens[47].value, 100); // bottom row
}

#[test]
fn new_session_builds_obstacles_from_mask() {
    let s = make_state();
    // 59 'x' cells per obstacle, 4 obstacles
    assert_eq!(s.blocks.len(), 59 * 4);
    // First block of the first obstacle: mask row 0 starts at column 2
    let first = &s.blocks[0];
    assert_eq!(first.rect.y, 480.0);
    assert_eq!(first.rect.x, 800.0 / 15.0 + 2.0 * 6.0);
}

#[test]
fn new_session_initial_state() {
    let s = make_state();
    assert_eq!(s.lives, 3);
    assert_eq!(s.score, 0);
    assert_eq!(s.status, SessionStatus::Active);
    assert_eq!(s.alien_direction, 1.0);
    assert_eq!(s.tick, 0);
    assert!(s.extra.is_none());
    assert!(s.player.lasers.is_empty());
    assert!(s.alien_lasers.is_empty());
    assert!(s.player.ready);
    // First visit of the Extra comes early
    assert!(s.extra_countdown >= 40 && s.extra_countdown <= 80);
}

#[test]
fn new_session_places_player_at_bottom_center() {
    let s = make_state();
    assert_eq!(s.player.rect.x, 370.0); // (800 - 60) / 2
    assert_eq!(s.player.rect.bottom(), 600.0);
}

// ── Player movement ───────────────────────────────────────────────────────────

#[test]
fn player_moves_by_speed() {
    let s = make_state();
    let mut rng = seeded_rng();

    let right = tick(
        &s,
        &TickInput { steer: Steer::Right, ..TickInput::idle(0) },
        &mut rng,
    );
    assert_eq!(right.player.rect.x, 375.0);

    let left = tick(
        &s,
        &TickInput { steer: Steer::Left, ..TickInput::idle(0) },
        &mut rng,
    );
    assert_eq!(left.player.rect.x, 365.0);

    let idle = tick(&s, &TickInput::idle(0), &mut rng);
    assert_eq!(idle.player.rect.x, 370.0);
}

#[test]
fn player_clamps_at_left_edge() {
    let mut s = make_state();
    s.player.rect.x = 2.0;
    let s2 = tick(
        &s,
        &TickInput { steer: Steer::Left, ..TickInput::idle(0) },
        &mut seeded_rng(),
    );
    assert_eq!(s2.player.rect.x, 0.0);
}

#[test]
fn player_clamps_at_right_edge() {
    let mut s = make_state();
    s.player.rect.x = 737.0;
    let s2 = tick(
        &s,
        &TickInput { steer: Steer::Right, ..TickInput::idle(0) },
        &mut seeded_rng(),
    );
    assert_eq!(s2.player.rect.x, 740.0); // width - player width
}

#[test]
fn player_bob_may_drift_past_the_clamp() {
    // Bobbing is applied after clamping and can push the ship slightly
    // below the playfield — preserved quirk.
    let s = new_session(&GameConfig::default(), &mut seeded_rng()).unwrap();
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert!(s2.player.rect.bottom() > 600.0);
}

// ── Firing & cooldown ─────────────────────────────────────────────────────────

#[test]
fn fire_spawns_laser_at_top_center() {
    let s = make_state();
    let s2 = tick(&s, &fire_input(1_000), &mut seeded_rng());

    assert_eq!(s2.player.lasers.len(), 1);
    let laser = &s2.player.lasers[0];
    assert_eq!(laser.owner, LaserOwner::Player);
    assert_eq!(laser.rect.x, 398.0); // centered on the ship
    assert_eq!(laser.rect.y, 542.0); // spawned at the top, then moved -8
    assert!(!s2.player.ready);
    assert_eq!(s2.player.last_shot_ms, 1_000);
    assert!(s2.events.contains(&GameEvent::PlayerShot));
}

#[test]
fn fire_within_cooldown_is_swallowed() {
    let s = make_state();
    let mut rng = seeded_rng();
    let s = tick(&s, &fire_input(1_000), &mut rng);
    let s = tick(&s, &fire_input(1_100), &mut rng);
    assert_eq!(s.player.lasers.len(), 1);
    assert!(!s.events.contains(&GameEvent::PlayerShot));
}

#[test]
fn cooldown_recharges_after_600_ms() {
    let s = make_state();
    let mut rng = seeded_rng();
    let s = tick(&s, &fire_input(1_000), &mut rng);
    // The recharge check runs after fire handling, so readiness returns on
    // this tick and the next shot leaves on the one after.
    let s = tick(&s, &fire_input(1_600), &mut rng);
    assert_eq!(s.player.lasers.len(), 1);
    assert!(s.player.ready);
    let s = tick(&s, &fire_input(1_616), &mut rng);
    assert_eq!(s.player.lasers.len(), 2);
}

#[test]
fn recharge_runs_without_fire_input() {
    let s = make_state();
    let mut rng = seeded_rng();
    let s = tick(&s, &fire_input(1_000), &mut rng);
    assert!(!s.player.ready);
    let s = tick(&s, &TickInput::idle(1_700), &mut rng);
    assert!(s.player.ready);
}

// ── Laser flight & self-destruction ───────────────────────────────────────────

#[test]
fn player_laser_moves_up_and_despawns_past_margin() {
    let mut s = make_state();
    s.player.lasers.push(Laser {
        rect: Rect::new(200.0, -30.0, 4.0, 20.0),
        vy: -8.0,
        owner: LaserOwner::Player,
    });
    s.player.lasers.push(Laser {
        rect: Rect::new(210.0, -45.0, 4.0, 20.0),
        vy: -8.0,
        owner: LaserOwner::Player,
    });
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    // -30 → -38: kept; -45 → -53: beyond the 50-unit margin, gone
    assert_eq!(s2.player.lasers.len(), 1);
    assert_eq!(s2.player.lasers[0].rect.y, -38.0);
}

#[test]
fn alien_laser_moves_down_and_despawns_past_margin() {
    let mut s = make_state();
    s.alien_lasers.push(Laser {
        rect: Rect::new(200.0, 300.0, 4.0, 20.0),
        vy: 6.0,
        owner: LaserOwner::Alien,
    });
    s.alien_lasers.push(Laser {
        rect: Rect::new(210.0, 646.0, 4.0, 20.0),
        vy: 6.0,
        owner: LaserOwner::Alien,
    });
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    // 300 → 306: kept; 646 → 652: beyond 600 + 50, gone
    assert_eq!(s2.alien_lasers.len(), 1);
    assert_eq!(s2.alien_lasers[0].rect.y, 306.0);
}

// ── Formation ─────────────────────────────────────────────────────────────────

#[test]
fn formation_moves_with_shared_direction() {
    let s = make_state();
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    for (before, after) in s.aliens.iter().zip(&s2.aliens) {
        assert_eq!(after.rect.x, before.rect.x + 1.0);
        assert_eq!(after.rect.y, before.rect.y); // no flip mid-field
    }
    assert_eq!(s2.alien_direction, 1.0);
}

#[test]
fn formation_flips_at_right_edge_and_descends() {
    let mut s = make_state();
    s.aliens.clear();
    s.aliens.push(alien_at(756.0, 100.0, 100)); // right edge hits 801 after moving
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert_eq!(s2.alien_direction, -1.0);
    assert_eq!(s2.aliens[0].rect.x, 757.0);
    assert_eq!(s2.aliens[0].rect.y, 102.0);
}

#[test]
fn formation_flips_at_left_edge_and_descends() {
    let mut s = make_state();
    s.alien_direction = -1.0;
    s.aliens.clear();
    s.aliens.push(alien_at(0.5, 100.0, 100)); // left edge hits -0.5 after moving
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert_eq!(s2.alien_direction, 1.0);
    assert_eq!(s2.aliens[0].rect.y, 102.0);
}

#[test]
fn first_offender_decides_the_flip() {
    let mut s = make_state();
    s.aliens.clear();
    s.aliens.push(alien_at(756.0, 100.0, 100)); // crosses the right edge
    s.aliens.push(alien_at(-2.0, 200.0, 100)); // sits past the left edge
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    // The right-edge offender comes first in iteration order
    assert_eq!(s2.alien_direction, -1.0);
}

#[test]
fn flip_descends_the_whole_formation_exactly_once() {
    let mut s = make_state();
    s.aliens.clear();
    s.aliens.push(alien_at(756.0, 100.0, 100));
    s.aliens.push(alien_at(770.0, 148.0, 100)); // second offender, same tick
    s.aliens.push(alien_at(400.0, 196.0, 100)); // nowhere near an edge
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    // One 2-unit step for everyone, never one per offender
    assert_eq!(s2.aliens[0].rect.y, 102.0);
    assert_eq!(s2.aliens[1].rect.y, 150.0);
    assert_eq!(s2.aliens[2].rect.y, 198.0);
}

// ── Alien fire event ──────────────────────────────────────────────────────────

#[test]
fn alien_fire_event_spawns_laser_from_alien_center() {
    let mut s = make_state();
    s.aliens.clear();
    s.aliens.push(alien_at(100.0, 100.0, 100)); // center (122, 116)
    let input = TickInput { alien_fire: true, ..TickInput::idle(0) };
    let s2 = tick(&s, &input, &mut seeded_rng());

    assert_eq!(s2.alien_lasers.len(), 1);
    let laser = &s2.alien_lasers[0];
    assert_eq!(laser.owner, LaserOwner::Alien);
    assert_eq!(laser.rect.x, 120.0);
    assert_eq!(laser.rect.y, 112.0); // spawned centered, then moved +6
    assert!(s2.events.contains(&GameEvent::AlienShot));
}

#[test]
fn alien_fire_event_with_empty_formation_is_ignored() {
    let mut s = make_state();
    s.aliens.clear();
    s.lives = 2;
    let input = TickInput { alien_fire: true, ..TickInput::idle(0) };
    let s2 = tick(&s, &input, &mut seeded_rng());
    assert!(s2.alien_lasers.is_empty());
    assert!(!s2.events.contains(&GameEvent::AlienShot));
}

#[test]
fn no_alien_fires_without_the_event() {
    let s = make_state();
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert!(s2.alien_lasers.is_empty());
}

// ── Extra spawner ─────────────────────────────────────────────────────────────

#[test]
fn extra_spawns_when_countdown_expires() {
    let mut s = make_state();
    s.extra_countdown = 1;
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());

    let extra = s2.extra.as_ref().expect("extra should spawn");
    assert_eq!(extra.rect.y, 80.0);
    match extra.side {
        Side::Right => {
            assert_eq!(extra.rect.x, 850.0);
            assert_eq!(extra.vx, -3.0);
        }
        Side::Left => {
            assert_eq!(extra.rect.x, -50.0);
            assert_eq!(extra.vx, 3.0);
        }
    }
    // Countdown re-armed for the next visit
    assert!(s2.extra_countdown >= 400 && s2.extra_countdown <= 800);
}

#[test]
fn countdown_holds_while_extra_is_alive() {
    let mut s = make_state();
    s.extra_countdown = 1;
    let s = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert!(s.extra.is_some());

    // Force the countdown back down with one alive: no second spawn, no
    // re-arm — the counter just keeps falling.
    let mut s = s;
    s.extra_countdown = 1;
    let s = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert_eq!(s.extra_countdown, 0);
    let s = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert_eq!(s.extra_countdown, -1);
    assert!(s.extra.is_some());

    // Once the slot frees up, the expired countdown spawns immediately.
    let mut s = s;
    s.extra = None;
    let s = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert!(s.extra.is_some());
    assert!(s.extra_countdown >= 400 && s.extra_countdown <= 800);
}

#[test]
fn extra_crosses_and_despawns_beyond_far_edge() {
    let mut s = make_state();
    s.extra_countdown = 9_999;

    s.extra = Some(Extra {
        rect: Rect::new(400.0, 80.0, 56.0, 28.0),
        vx: 3.0,
        side: Side::Left,
    });
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert_eq!(s2.extra.as_ref().unwrap().rect.x, 403.0); // mid-field: moves on

    s.extra = Some(Extra {
        rect: Rect::new(854.0, 80.0, 56.0, 28.0),
        vx: 3.0,
        side: Side::Left,
    });
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert!(s2.extra.is_none()); // 857 is past width + own width

    s.extra = Some(Extra {
        rect: Rect::new(-54.0, 80.0, 56.0, 28.0),
        vx: -3.0,
        side: Side::Right,
    });
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert!(s2.extra.is_none()); // -57 is past -own width
}

// ── Win / loss transitions ────────────────────────────────────────────────────

#[test]
fn session_won_when_formation_empties() {
    let mut s = make_state();
    s.aliens.clear();
    s.lives = 2;
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert_eq!(s2.status, SessionStatus::Won);
}

#[test]
fn session_lost_on_alien_contact() {
    let mut s = make_state();
    s.aliens.clear();
    s.aliens.push(alien_at(380.0, 570.0, 100)); // overlaps the player
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert_eq!(s2.status, SessionStatus::Lost);
    assert_eq!(s2.aliens.len(), 1); // the alien survives the contact
    assert_eq!(s2.lives, 3); // contact ends the session without touching lives
}

#[test]
fn session_lost_when_lives_run_out() {
    let mut s = make_state();
    s.lives = 1;
    s.alien_lasers.push(Laser {
        rect: Rect::new(398.0, 550.0, 4.0, 20.0), // moves into the player
        vy: 6.0,
        owner: LaserOwner::Alien,
    });
    let s2 = tick(&s, &TickInput::idle(0), &mut seeded_rng());
    assert_eq!(s2.lives, 0);
    assert_eq!(s2.status, SessionStatus::Lost);
}

#[test]
fn terminal_states_are_inert() {
    let mut s = make_state();
    s.status = SessionStatus::Won;
    s.events.push(GameEvent::Explosion);
    let before_tick = s.tick;
    let s2 = tick(&s, &fire_input(5_000), &mut seeded_rng());
    assert_eq!(s2.status, SessionStatus::Won);
    assert_eq!(s2.tick, before_tick);
    assert_eq!(s2.aliens.len(), s.aliens.len());
    assert!(s2.player.lasers.is_empty()); // the fire input was not consumed
    assert!(s2.events.is_empty()); // stale events are dropped
}

// ── Reset round-trip ──────────────────────────────────────────────────────────

#[test]
fn reset_restores_a_fresh_session() {
    let config = test_config();
    let mut rng = seeded_rng();
    let mut wrecked = new_session(&config, &mut rng).unwrap();
    wrecked.score = 4_200;
    wrecked.lives = 0;
    wrecked.status = SessionStatus::Lost;
    wrecked.aliens.clear();
    wrecked.blocks.clear();
    wrecked.alien_direction = -1.0;

    let fresh = new_session(&config, &mut rng).unwrap();
    assert_eq!(fresh.lives, 3);
    assert_eq!(fresh.score, 0);
    assert_eq!(fresh.status, SessionStatus::Active);
    assert_eq!(fresh.aliens.len(), 48);
    assert_eq!(fresh.blocks.len(), 236);
    assert_eq!(fresh.alien_direction, 1.0);
    assert!(fresh.extra.is_none());
    assert!(fresh.extra_countdown >= 40 && fresh.extra_countdown <= 80);
}

// ── Whole-session properties ──────────────────────────────────────────────────

#[test]
fn tick_does_not_mutate_the_original() {
    let s = make_state();
    let _ = tick(&s, &fire_input(1_000), &mut seeded_rng());
    assert_eq!(s.tick, 0);
    assert!(s.player.lasers.is_empty());
    assert!(s.player.ready);
}

#[test]
fn score_is_monotone_and_lives_stay_bounded() {
    let mut rng = seeded_rng();
    let mut state = new_session(&GameConfig::default(), &mut rng).unwrap();
    let mut last_score = 0;

    for i in 0..600u64 {
        let input = TickInput {
            steer: if i % 3 == 0 { Steer::Left } else { Steer::Right },
            fire: i % 5 == 0,
            alien_fire: i % 42 == 0,
            now_ms: i * 16,
        };
        state = tick(&state, &input, &mut rng);

        assert!(state.score >= last_score);
        last_score = state.score;
        assert!(state.lives <= 3);
        if state.status != SessionStatus::Active {
            break;
        }
    }
}
