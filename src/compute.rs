//! Simulation step and input-driven state transitions.
//!
//! Every function takes the single `WorldState` by mutable reference and
//! advances it in place.  Randomness only enters through the injected `rng`,
//! so a seeded RNG reproduces a run exactly.

use log::{debug, info};
use rand::Rng;

use crate::collision::resolve_collisions;
use crate::constants::*;
use crate::entities::{Bullet, Field, Player, Rules, WorldState};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the starting world for a field and rule set.
pub fn init_state(field: Field, rules: Rules) -> WorldState {
    WorldState::new(field, rules)
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Record which movement keys are held.  Applied on the next tick.
pub fn set_movement(state: &mut WorldState, left: bool, right: bool) {
    state.player.left_held = left;
    state.player.right_held = right;
}

/// Fire one bullet from the ship.  Ignored after game over and while paused.
pub fn fire(state: &mut WorldState) {
    if state.game_over || state.paused {
        return;
    }
    let homing = state.modifiers.homing.active;
    state
        .player_bullets
        .push(Bullet::player_shot(state.player.x, homing));
    state.total_shots_fired += 1;
}

pub fn toggle_pause(state: &mut WorldState) {
    state.paused = !state.paused;
    debug!("paused = {}", state.paused);
}

/// Start over from round 1.  Only honoured once the game has ended; returns
/// whether the reset happened.
pub fn restart(state: &mut WorldState) -> bool {
    if !state.game_over {
        return false;
    }
    info!(
        "restart after round {} with score {} ({:.1}% accuracy)",
        state.round,
        state.score,
        state.accuracy()
    );
    *state = WorldState::new(state.field, state.rules);
    true
}

// ── Per-tick helpers ─────────────────────────────────────────────────────────

fn move_power_ups(state: &mut WorldState) {
    for power_up in &mut state.power_ups {
        power_up.y -= POWER_UP_FALL_SPEED;
        power_up.age += 1;
    }
    state.power_ups.retain(|p| p.y >= 0.0);
}

fn move_player(state: &mut WorldState) {
    let player = &mut state.player;
    if player.left_held {
        player.x -= PLAYER_SPEED;
    }
    if player.right_held {
        player.x += PLAYER_SPEED;
    }
    player.x = player.x.clamp(Player::min_x(), Player::max_x(&state.field));
}

/// Revive and speed up the formation after it was wiped out.  Returns `false`
/// when the cleared round was the last one and the game is won instead.
fn advance_round(state: &mut WorldState) -> bool {
    if state.round >= state.rules.max_rounds {
        state.victory = true;
        state.game_over = true;
        info!(
            "final round {} cleared, score {}",
            state.round, state.score
        );
        return false;
    }

    state.round += 1;
    state.grid.revive_all();
    state.grid.reset_position();
    state.grid.speed *= state.rules.round_speed_multiplier;
    state.player_bullets.clear();
    state.enemy_bullets.clear();
    info!(
        "round {} begins, enemy speed {:.3}",
        state.round, state.grid.speed
    );
    true
}

fn move_grid(state: &mut WorldState) {
    let Some((left_col, right_col)) = state.grid.alive_column_span() else {
        return;
    };
    let grid = &mut state.grid;
    if grid.moving_right {
        grid.origin_x += grid.speed;
        let right_edge = grid.origin_x + right_col as f32 * CELL_SPACING_X + ENEMY_HALF_EXTENT;
        if right_edge > state.field.width - GRID_BOUNCE_MARGIN {
            grid.moving_right = false;
            grid.origin_y -= ENEMY_DROP_STEP;
        }
    } else {
        grid.origin_x -= grid.speed;
        let left_edge = grid.origin_x + left_col as f32 * CELL_SPACING_X - ENEMY_HALF_EXTENT;
        if left_edge < GRID_BOUNCE_MARGIN {
            grid.moving_right = true;
            grid.origin_y -= ENEMY_DROP_STEP;
        }
    }
}

/// Centre of the live enemy closest to `(x, y)`.  Ties go to the first cell
/// in row-major order.
pub fn nearest_enemy(state: &WorldState, x: f32, y: f32) -> Option<(f32, f32)> {
    let mut best: Option<(f32, (f32, f32))> = None;
    for (row, col) in state.grid.alive_cells() {
        let (ex, ey) = state.grid.cell_center(row, col);
        let dist = (ex - x).powi(2) + (ey - y).powi(2);
        if best.map_or(true, |(best_dist, _)| dist < best_dist) {
            best = Some((dist, (ex, ey)));
        }
    }
    best.map(|(_, target)| target)
}

/// Blend a homing bullet's heading toward its target and renormalise.
/// Degenerate geometry leaves the heading untouched.
pub fn steer(bullet: &mut Bullet, target: (f32, f32)) {
    let (vx, vy) = (target.0 - bullet.x, target.1 - bullet.y);
    let len = (vx * vx + vy * vy).sqrt();
    if len <= HOMING_MIN_TARGET_DISTANCE {
        return;
    }
    let keep = 1.0 - HOMING_TARGET_WEIGHT;
    let dx = bullet.dx * keep + vx / len * HOMING_TARGET_WEIGHT;
    let dy = bullet.dy * keep + vy / len * HOMING_TARGET_WEIGHT;
    let blended = (dx * dx + dy * dy).sqrt();
    if blended == 0.0 {
        return;
    }
    bullet.dx = dx / blended;
    bullet.dy = dy / blended;
}

fn move_player_bullets(state: &mut WorldState) {
    // Targets are looked up against the grid before any bullet moves.
    let targets: Vec<Option<(f32, f32)>> = state
        .player_bullets
        .iter()
        .map(|b| {
            if b.homing {
                nearest_enemy(state, b.x, b.y)
            } else {
                None
            }
        })
        .collect();

    for (bullet, target) in state.player_bullets.iter_mut().zip(targets) {
        if bullet.homing {
            if let Some(target) = target {
                steer(bullet, target);
            }
            bullet.x += bullet.dx * bullet.speed;
            bullet.y += bullet.dy * bullet.speed;
        } else {
            bullet.y += bullet.speed;
        }
    }
}

fn move_enemy_bullets(state: &mut WorldState) {
    let diagonal_round = state.round > DIAGONAL_FIRE_ROUND;
    for bullet in &mut state.enemy_bullets {
        if diagonal_round && bullet.has_direction() {
            bullet.x += bullet.dx * bullet.speed;
            bullet.y -= bullet.dy * bullet.speed;
        } else {
            bullet.y -= bullet.speed;
        }
    }
}

fn cull_bullets(state: &mut WorldState) {
    let top = state.field.height;
    state.player_bullets.retain(|b| b.y <= top);
    state.enemy_bullets.retain(|b| b.y >= 0.0);
}

/// Maybe spawn one enemy bullet from a random live enemy.
fn enemy_fire(state: &mut WorldState, rng: &mut impl Rng) {
    if !rng.gen_ratio(1, ENEMY_FIRE_ODDS) {
        return;
    }
    let alive = state.grid.alive_count();
    if alive == 0 {
        return;
    }
    let pick = rng.gen_range(0..alive);
    let Some((row, col)) = state.grid.alive_cells().nth(pick) else {
        return;
    };
    let (x, y) = state.grid.cell_center(row, col);
    let speed = if state.modifiers.slow_fire.active {
        SLOWED_ENEMY_BULLET_SPEED
    } else {
        ENEMY_BULLET_SPEED
    };

    let mut bullet = Bullet::enemy_shot(x, y, speed);
    if state.round > DIAGONAL_FIRE_ROUND {
        let dx = match rng.gen_range(0..3) {
            0 => -DIAGONAL_FIRE_DX,
            1 => 0.0,
            _ => DIAGONAL_FIRE_DX,
        };
        let norm = (dx * dx + 1.0f32).sqrt();
        bullet.dx = dx / norm;
        bullet.dy = 1.0 / norm;
    }
    state.enemy_bullets.push(bullet);
}

fn enemies_reached_player(state: &WorldState) -> bool {
    state.grid.alive_cells().any(|(row, col)| {
        let (_, y) = state.grid.cell_center(row, col);
        y - ENEMY_HALF_EXTENT < INVASION_LINE
    })
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// Advance the world by exactly one fixed tick.
///
/// Paused and finished games are left untouched, so callers keep ticking at
/// a steady cadence and pause/restart input stays responsive.
pub fn tick(state: &mut WorldState, rng: &mut impl Rng) {
    // ── 1. Pause & game over freeze the world ────────────────────────────────
    if state.paused || state.game_over {
        return;
    }
    state.tick_count += 1;

    // ── 2. Age timed modifiers ───────────────────────────────────────────────
    state.modifiers.tick_down_all();

    // ── 3. Falling power-ups ─────────────────────────────────────────────────
    move_power_ups(state);

    // ── 4. Player ────────────────────────────────────────────────────────────
    move_player(state);

    // ── 5. Round transition ──────────────────────────────────────────────────
    if state.grid.all_dead() && !advance_round(state) {
        return;
    }

    // ── 6. Formation sweep ───────────────────────────────────────────────────
    move_grid(state);

    // ── 7–9. Bullets ─────────────────────────────────────────────────────────
    move_player_bullets(state);
    move_enemy_bullets(state);
    cull_bullets(state);

    // ── 10. Enemy fire ───────────────────────────────────────────────────────
    enemy_fire(state, rng);

    // ── 11. Collisions ───────────────────────────────────────────────────────
    resolve_collisions(state, rng);

    // ── 12. Invasion ─────────────────────────────────────────────────────────
    if !state.game_over && enemies_reached_player(state) {
        state.game_over = true;
        info!("enemies reached the player in round {}", state.round);
    }
}
