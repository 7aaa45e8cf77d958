//! Overlap detection and resolution for one tick.
//!
//! Every pass is a plain O(bullets × cells) scan; at 32 cells a spatial index
//! would cost more than it saves.

use log::{debug, info};
use rand::Rng;

use crate::constants::*;
use crate::entities::{Bullet, PowerUp, PowerUpKind, WorldState};

/// Strict axis-aligned box overlap between two centre/half-extent boxes.
pub fn boxes_overlap(a: (f32, f32), a_half: (f32, f32), b: (f32, f32), b_half: (f32, f32)) -> bool {
    a.0 - a_half.0 < b.0 + b_half.0
        && a.0 + a_half.0 > b.0 - b_half.0
        && a.1 - a_half.1 < b.1 + b_half.1
        && a.1 + a_half.1 > b.1 - b_half.1
}

/// Resolve every overlap for the current tick, in a fixed order: player
/// bullets against the grid, enemy bullets against the player, then power-up
/// pickups.
pub fn resolve_collisions(state: &mut WorldState, rng: &mut impl Rng) {
    player_bullets_vs_grid(state, rng);
    enemy_bullets_vs_player(state);
    power_ups_vs_player(state);
}

/// First live cell (row-major) that `bullet` overlaps.
fn struck_cell(state: &WorldState, bullet: &Bullet) -> Option<(usize, usize)> {
    state.grid.alive_cells().find(|&(row, col)| {
        boxes_overlap(
            (bullet.x, bullet.y),
            (BULLET_HALF_WIDTH, BULLET_HALF_HEIGHT),
            state.grid.cell_center(row, col),
            (ENEMY_HALF_EXTENT, ENEMY_HALF_EXTENT),
        )
    })
}

/// Each player bullet kills at most one enemy and is consumed by it.
pub fn player_bullets_vs_grid(state: &mut WorldState, rng: &mut impl Rng) {
    let mut i = 0;
    while i < state.player_bullets.len() {
        let Some((row, col)) = struck_cell(state, &state.player_bullets[i]) else {
            i += 1;
            continue;
        };

        state.grid.kill(row, col);
        state.player_bullets.remove(i);
        state.score += SCORE_PER_KILL;
        state.total_hits += 1;

        let (x, y) = state.grid.cell_center(row, col);
        for kind in PowerUpKind::ALL {
            if rng.gen_ratio(1, kind.drop_odds()) {
                debug!("{:?} dropped at ({:.0}, {:.0})", kind, x, y);
                state.power_ups.push(PowerUp { x, y, kind, age: 0 });
            }
        }
    }
}

fn hits_player(state: &WorldState, bullet: &Bullet) -> bool {
    let px = state.player.x;
    bullet.x > px - PLAYER_HALF_WIDTH
        && bullet.x < px + PLAYER_HALF_WIDTH
        && bullet.y > PLAYER_BAND_BOTTOM
        && bullet.y < PLAYER_BAND_TOP
}

/// A shield absorbs enemy bullets; without one the first hit ends the game.
pub fn enemy_bullets_vs_player(state: &mut WorldState) {
    let mut i = 0;
    while i < state.enemy_bullets.len() {
        if !hits_player(state, &state.enemy_bullets[i]) {
            i += 1;
            continue;
        }
        if state.modifiers.shield.active {
            state.enemy_bullets.remove(i);
            continue;
        }
        state.game_over = true;
        info!(
            "player hit in round {}, final score {}",
            state.round, state.score
        );
        return;
    }
}

/// Picking up a power-up (re)starts its modifier for the full duration.
pub fn power_ups_vs_player(state: &mut WorldState) {
    let px = state.player.x;
    let modifiers = &mut state.modifiers;
    state.power_ups.retain(|p| {
        let collected = (p.x - px).abs() < PICKUP_HALF_WIDTH && p.y < PICKUP_CEILING;
        if collected {
            modifiers.get_mut(p.kind).activate(p.kind.duration_ticks());
            debug!("picked up {:?}", p.kind);
        }
        !collected
    });
}
