/// Collision resolution.
///
/// Runs once per tick, after every entity has moved, as seven passes in a
/// fixed order.  Each pass applies its removals before the next pass runs,
/// so an entity destroyed early in the order can never be matched again
/// within the same tick.

use tracing::info;

use crate::entities::{GameEvent, GameState, SessionStatus};

/// Cross-check all projectile/alien/obstacle/player pairs and apply
/// damage, scoring, and removal.
pub fn resolve(state: &mut GameState) {
    player_lasers_vs_blocks(state);
    player_lasers_vs_aliens(state);
    player_lasers_vs_extra(state);
    alien_lasers_vs_blocks(state);
    alien_lasers_vs_player(state);
    aliens_vs_blocks(state);
    aliens_vs_player(state);
}

// ── Pass 1 ───────────────────────────────────────────────────────────────────

fn player_lasers_vs_blocks(state: &mut GameState) {
    let mut used_lasers: Vec<usize> = Vec::new();
    let mut dead_blocks: Vec<usize> = Vec::new();

    for (li, laser) in state.player.lasers.iter().enumerate() {
        let mut hit = false;
        for (bi, block) in state.blocks.iter().enumerate() {
            if !dead_blocks.contains(&bi) && laser.rect.intersects(&block.rect) {
                dead_blocks.push(bi);
                hit = true;
            }
        }
        if hit {
            used_lasers.push(li);
        }
    }

    remove_marked(&mut state.blocks, &dead_blocks);
    remove_marked(&mut state.player.lasers, &used_lasers);
}

// ── Pass 2 ───────────────────────────────────────────────────────────────────

fn player_lasers_vs_aliens(state: &mut GameState) {
    let mut used_lasers: Vec<usize> = Vec::new();
    let mut dead_aliens: Vec<usize> = Vec::new();

    for (li, laser) in state.player.lasers.iter().enumerate() {
        let mut hit = false;
        for (ai, alien) in state.aliens.iter().enumerate() {
            if !dead_aliens.contains(&ai) && laser.rect.intersects(&alien.rect) {
                dead_aliens.push(ai);
                hit = true;
            }
        }
        if hit {
            used_lasers.push(li);
        }
    }

    for &ai in &dead_aliens {
        state.score += state.aliens[ai].value;
        state.events.push(GameEvent::Explosion);
    }

    remove_marked(&mut state.aliens, &dead_aliens);
    remove_marked(&mut state.player.lasers, &used_lasers);
}

// ── Pass 3 ───────────────────────────────────────────────────────────────────

fn player_lasers_vs_extra(state: &mut GameState) {
    let Some(extra) = &state.extra else {
        return;
    };

    let mut used_lasers: Vec<usize> = Vec::new();
    for (li, laser) in state.player.lasers.iter().enumerate() {
        if laser.rect.intersects(&extra.rect) {
            used_lasers.push(li);
        }
    }

    if !used_lasers.is_empty() {
        state.extra = None;
        state.score += state.config.extra_value;
        state.events.push(GameEvent::ExtraDestroyed);
        remove_marked(&mut state.player.lasers, &used_lasers);
    }
}

// ── Pass 4 ───────────────────────────────────────────────────────────────────

fn alien_lasers_vs_blocks(state: &mut GameState) {
    let mut used_lasers: Vec<usize> = Vec::new();
    let mut dead_blocks: Vec<usize> = Vec::new();

    for (li, laser) in state.alien_lasers.iter().enumerate() {
        let mut hit = false;
        for (bi, block) in state.blocks.iter().enumerate() {
            if !dead_blocks.contains(&bi) && laser.rect.intersects(&block.rect) {
                dead_blocks.push(bi);
                hit = true;
            }
        }
        if hit {
            used_lasers.push(li);
        }
    }

    remove_marked(&mut state.blocks, &dead_blocks);
    remove_marked(&mut state.alien_lasers, &used_lasers);
}

// ── Pass 5 ───────────────────────────────────────────────────────────────────

fn alien_lasers_vs_player(state: &mut GameState) {
    let mut used_lasers: Vec<usize> = Vec::new();
    for (li, laser) in state.alien_lasers.iter().enumerate() {
        if laser.rect.intersects(&state.player.rect) {
            used_lasers.push(li);
            state.lives = state.lives.saturating_sub(1);
        }
    }
    remove_marked(&mut state.alien_lasers, &used_lasers);

    if !used_lasers.is_empty() && state.lives == 0 {
        info!(score = state.score, "out of lives — session lost");
        state.status = SessionStatus::Lost;
    }
}

// ── Pass 6 ───────────────────────────────────────────────────────────────────

/// An alien grinding through an obstacle destroys its blocks; the alien
/// survives this check.
fn aliens_vs_blocks(state: &mut GameState) {
    let mut dead_blocks: Vec<usize> = Vec::new();
    for alien in &state.aliens {
        for (bi, block) in state.blocks.iter().enumerate() {
            if !dead_blocks.contains(&bi) && alien.rect.intersects(&block.rect) {
                dead_blocks.push(bi);
            }
        }
    }
    remove_marked(&mut state.blocks, &dead_blocks);
}

// ── Pass 7 ───────────────────────────────────────────────────────────────────

/// An alien touching the player ends the session outright, regardless of
/// remaining lives.  The alien is not destroyed.
fn aliens_vs_player(state: &mut GameState) {
    if state
        .aliens
        .iter()
        .any(|alien| alien.rect.intersects(&state.player.rect))
    {
        info!(score = state.score, "alien reached the player — session lost");
        state.status = SessionStatus::Lost;
    }
}

// ── Removal ──────────────────────────────────────────────────────────────────

/// Drop the items whose indices were marked during a pass.  Indices refer to
/// positions before any removal in that pass.
fn remove_marked<T>(items: &mut Vec<T>, marked: &[usize]) {
    if marked.is_empty() {
        return;
    }
    let mut index = 0;
    items.retain(|_| {
        let keep = !marked.contains(&index);
        index += 1;
        keep
    });
}
