use space_invaders::collision::*;
use space_invaders::entities::*;

use rand::rngs::mock::StepRng;

fn make_state() -> WorldState {
    WorldState::default()
}

fn quiet_rng() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

fn lucky_rng() -> StepRng {
    StepRng::new(0, 0)
}

fn player_bullet_at(x: f32, y: f32) -> Bullet {
    let mut b = Bullet::player_shot(x, false);
    b.y = y;
    b
}

// ── boxes_overlap ─────────────────────────────────────────────────────────────

#[test]
fn overlapping_boxes_collide() {
    assert!(boxes_overlap((0.0, 0.0), (2.0, 8.0), (10.0, 10.0), (15.0, 15.0)));
}

#[test]
fn touching_boxes_do_not_collide() {
    // Right edge of a at 17, left edge of b at 17.
    assert!(!boxes_overlap((15.0, 0.0), (2.0, 8.0), (32.0, 0.0), (15.0, 15.0)));
    assert!(!boxes_overlap((0.0, 0.0), (2.0, 8.0), (0.0, 23.0), (15.0, 15.0)));
}

#[test]
fn separated_boxes_do_not_collide() {
    assert!(!boxes_overlap((0.0, 0.0), (2.0, 8.0), (100.0, 0.0), (15.0, 15.0)));
}

// ── Player bullets vs grid ────────────────────────────────────────────────────

#[test]
fn bullet_kills_enemy_and_scores() {
    let mut s = make_state();
    s.player_bullets.push(player_bullet_at(170.0, 280.0));
    player_bullets_vs_grid(&mut s, &mut quiet_rng());
    assert!(!s.grid.is_alive(3, 2));
    assert!(s.player_bullets.is_empty());
    assert_eq!(s.score, 100);
    assert_eq!(s.total_hits, 1);
    assert!(s.power_ups.is_empty());
}

#[test]
fn bullet_between_rows_takes_first_row_major_cell() {
    let mut s = make_state();
    // y=380 overlaps both row 0 (y=400) and row 1 (y=360).
    s.player_bullets.push(player_bullet_at(50.0, 380.0));
    player_bullets_vs_grid(&mut s, &mut quiet_rng());
    assert!(!s.grid.is_alive(0, 0));
    assert!(s.grid.is_alive(1, 0));
    assert_eq!(s.grid.alive_count(), 31);
}

#[test]
fn each_bullet_kills_one_enemy() {
    let mut s = make_state();
    s.player_bullets.push(player_bullet_at(50.0, 380.0));
    s.player_bullets.push(player_bullet_at(50.0, 380.0));
    player_bullets_vs_grid(&mut s, &mut quiet_rng());
    assert!(!s.grid.is_alive(0, 0));
    assert!(!s.grid.is_alive(1, 0));
    assert_eq!(s.score, 200);
    assert!(s.player_bullets.is_empty());
}

#[test]
fn bullet_passes_dead_cell() {
    let mut s = make_state();
    s.grid.kill(3, 2);
    s.player_bullets.push(player_bullet_at(170.0, 280.0));
    player_bullets_vs_grid(&mut s, &mut quiet_rng());
    assert_eq!(s.player_bullets.len(), 1);
    assert_eq!(s.score, 0);
}

#[test]
fn missing_bullet_is_kept() {
    let mut s = make_state();
    s.player_bullets.push(player_bullet_at(800.0, 300.0));
    player_bullets_vs_grid(&mut s, &mut quiet_rng());
    assert_eq!(s.player_bullets.len(), 1);
    assert_eq!(s.grid.alive_count(), 32);
}

#[test]
fn kill_can_drop_every_power_up_kind() {
    let mut s = make_state();
    s.player_bullets.push(player_bullet_at(170.0, 280.0));
    player_bullets_vs_grid(&mut s, &mut lucky_rng());
    let kinds: Vec<_> = s.power_ups.iter().map(|p| p.kind).collect();
    assert_eq!(kinds, PowerUpKind::ALL.to_vec());
    for p in &s.power_ups {
        assert_eq!((p.x, p.y), (170.0, 280.0));
        assert_eq!(p.age, 0);
    }
}

// ── Enemy bullets vs player ───────────────────────────────────────────────────

#[test]
fn enemy_bullet_ends_game_without_shield() {
    let mut s = make_state();
    s.enemy_bullets.push(Bullet::enemy_shot(500.0, 35.0, 4.0));
    enemy_bullets_vs_player(&mut s);
    assert!(s.game_over);
    assert!(!s.victory);
}

#[test]
fn shield_absorbs_enemy_bullets() {
    let mut s = make_state();
    s.modifiers.shield.activate(600);
    s.enemy_bullets.push(Bullet::enemy_shot(500.0, 35.0, 4.0));
    s.enemy_bullets.push(Bullet::enemy_shot(510.0, 40.0, 4.0));
    s.enemy_bullets.push(Bullet::enemy_shot(900.0, 40.0, 4.0));
    enemy_bullets_vs_player(&mut s);
    assert!(!s.game_over);
    assert_eq!(s.enemy_bullets.len(), 1);
    assert_eq!(s.enemy_bullets[0].x, 900.0);
}

#[test]
fn first_fatal_hit_stops_the_pass() {
    let mut s = make_state();
    s.enemy_bullets.push(Bullet::enemy_shot(500.0, 35.0, 4.0));
    s.enemy_bullets.push(Bullet::enemy_shot(505.0, 35.0, 4.0));
    enemy_bullets_vs_player(&mut s);
    assert!(s.game_over);
    assert_eq!(s.enemy_bullets.len(), 2);
}

#[test]
fn enemy_bullet_outside_band_misses() {
    let mut s = make_state();
    s.enemy_bullets.push(Bullet::enemy_shot(500.0, 55.0, 4.0));
    s.enemy_bullets.push(Bullet::enemy_shot(500.0, 20.0, 4.0));
    s.enemy_bullets.push(Bullet::enemy_shot(520.0, 35.0, 4.0));
    enemy_bullets_vs_player(&mut s);
    assert!(!s.game_over);
    assert_eq!(s.enemy_bullets.len(), 3);
}

// ── Power-up pickup ───────────────────────────────────────────────────────────

#[test]
fn pickup_activates_modifier() {
    let mut s = make_state();
    s.power_ups.push(PowerUp { x: 510.0, y: 50.0, kind: PowerUpKind::Shield, age: 150 });
    power_ups_vs_player(&mut s);
    assert!(s.power_ups.is_empty());
    assert!(s.modifiers.shield.active);
    assert_eq!(s.modifiers.shield.remaining_ticks, 600);
}

#[test]
fn pickup_restarts_running_modifier() {
    let mut s = make_state();
    s.modifiers.homing.activate(50);
    s.power_ups.push(PowerUp { x: 500.0, y: 10.0, kind: PowerUpKind::HomingBullets, age: 0 });
    power_ups_vs_player(&mut s);
    assert_eq!(s.modifiers.homing.remaining_ticks, 200);
}

#[test]
fn power_up_out_of_reach_stays() {
    let mut s = make_state();
    s.power_ups.push(PowerUp { x: 520.0, y: 50.0, kind: PowerUpKind::Shield, age: 0 });
    s.power_ups.push(PowerUp { x: 500.0, y: 60.0, kind: PowerUpKind::SlowEnemyFire, age: 0 });
    power_ups_vs_player(&mut s);
    assert_eq!(s.power_ups.len(), 2);
    assert_eq!(s.modifiers, Modifiers::default());
}

// ── Full pass ordering ────────────────────────────────────────────────────────

#[test]
fn resolve_collisions_picks_up_after_fatal_hit() {
    let mut s = make_state();
    s.enemy_bullets.push(Bullet::enemy_shot(500.0, 35.0, 4.0));
    s.power_ups.push(PowerUp { x: 500.0, y: 30.0, kind: PowerUpKind::SlowEnemyFire, age: 0 });
    resolve_collisions(&mut s, &mut quiet_rng());
    assert!(s.game_over);
    assert!(s.modifiers.slow_fire.active);
}

#[test]
fn shield_picked_up_this_tick_is_too_late() {
    let mut s = make_state();
    s.enemy_bullets.push(Bullet::enemy_shot(500.0, 35.0, 4.0));
    s.power_ups.push(PowerUp { x: 500.0, y: 30.0, kind: PowerUpKind::Shield, age: 0 });
    resolve_collisions(&mut s, &mut quiet_rng());
    assert!(s.game_over);
    assert!(s.modifiers.shield.active);
}
