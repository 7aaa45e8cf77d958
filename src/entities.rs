//! All world-state types: data plus the accessors that keep its invariants.

use serde::{Deserialize, Serialize};

use crate::constants::*;

// ── Field & rules ─────────────────────────────────────────────────────────────

/// Logical play field.  Origin is bottom-left, y grows upward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Field {
            width: DEFAULT_FIELD_WIDTH,
            height: DEFAULT_FIELD_HEIGHT,
        }
    }
}

/// Progression knobs that differ between game variants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Enemy speed is multiplied by this on every round clear.
    pub round_speed_multiplier: f32,
    /// Clearing this round wins the game.
    pub max_rounds: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            round_speed_multiplier: DEFAULT_ROUND_SPEED_MULTIPLIER,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Horizontal centre.  The vertical band is fixed.
    pub x: f32,
    pub left_held: bool,
    pub right_held: bool,
}

impl Player {
    pub fn new(field: &Field) -> Self {
        Player {
            x: field.width / 2.0,
            left_held: false,
            right_held: false,
        }
    }

    pub fn min_x() -> f32 {
        PLAYER_HALF_WIDTH
    }

    pub fn max_x(field: &Field) -> f32 {
        field.width - PLAYER_HALF_WIDTH
    }
}

// ── Enemy grid ────────────────────────────────────────────────────────────────

/// Fixed 4×8 formation stored as a flat row-major liveness array.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyGrid {
    alive: [bool; GRID_CELLS],
    /// Centre of cell (0, 0).
    pub origin_x: f32,
    pub origin_y: f32,
    pub speed: f32,
    pub moving_right: bool,
}

impl Default for EnemyGrid {
    fn default() -> Self {
        EnemyGrid::new(INITIAL_ENEMY_SPEED)
    }
}

impl EnemyGrid {
    pub fn new(speed: f32) -> Self {
        EnemyGrid {
            alive: [true; GRID_CELLS],
            origin_x: GRID_START_X,
            origin_y: GRID_START_Y,
            speed,
            moving_right: true,
        }
    }

    fn index(row: usize, col: usize) -> usize {
        debug_assert!(row < GRID_ROWS && col < GRID_COLS);
        row * GRID_COLS + col
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.alive[Self::index(row, col)]
    }

    /// Marks a cell dead.  Returns `false` if it was already dead.
    pub fn kill(&mut self, row: usize, col: usize) -> bool {
        let cell = &mut self.alive[Self::index(row, col)];
        std::mem::replace(cell, false)
    }

    pub fn revive_all(&mut self) {
        self.alive = [true; GRID_CELLS];
    }

    /// Puts the formation back at its starting corner, heading right.
    pub fn reset_position(&mut self) {
        self.origin_x = GRID_START_X;
        self.origin_y = GRID_START_Y;
        self.moving_right = true;
    }

    pub fn all_dead(&self) -> bool {
        self.alive.iter().all(|&a| !a)
    }

    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Alive cells in row-major order.
    pub fn alive_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(i, _)| (i / GRID_COLS, i % GRID_COLS))
    }

    /// Leftmost and rightmost columns that still hold a live enemy.
    pub fn alive_column_span(&self) -> Option<(usize, usize)> {
        self.alive_cells().fold(None, |span, (_, col)| match span {
            None => Some((col, col)),
            Some((lo, hi)) => Some((lo.min(col), hi.max(col))),
        })
    }

    pub fn cell_center(&self, row: usize, col: usize) -> (f32, f32) {
        (
            self.origin_x + col as f32 * CELL_SPACING_X,
            self.origin_y - row as f32 * CELL_SPACING_Y,
        )
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    /// Unit travel direction.  Enemy bullets store a downward `dy` as positive.
    pub dx: f32,
    pub dy: f32,
    pub homing: bool,
}

impl Bullet {
    /// A player shot leaving the ship's nose.
    pub fn player_shot(x: f32, homing: bool) -> Self {
        Bullet {
            x,
            y: PLAYER_BULLET_SPAWN_Y,
            speed: PLAYER_BULLET_SPEED,
            dx: 0.0,
            dy: 1.0,
            homing,
        }
    }

    /// An enemy shot falling straight down.
    pub fn enemy_shot(x: f32, y: f32, speed: f32) -> Self {
        Bullet {
            x,
            y,
            speed,
            dx: 0.0,
            dy: 1.0,
            homing: false,
        }
    }

    pub fn has_direction(&self) -> bool {
        self.dx != 0.0 || self.dy != 0.0
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Enemy bullets spawn at reduced speed.
    SlowEnemyFire,
    /// New player bullets steer toward the nearest enemy.
    HomingBullets,
    /// Enemy bullets are absorbed instead of ending the game.
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SlowEnemyFire,
        PowerUpKind::HomingBullets,
        PowerUpKind::Shield,
    ];

    /// Modifier lifetime after pickup, in ticks.
    pub fn duration_ticks(&self) -> u32 {
        match self {
            PowerUpKind::SlowEnemyFire => 200,
            PowerUpKind::HomingBullets => 200,
            PowerUpKind::Shield => 600,
        }
    }

    /// Drop chance per kill is 1 in this many.
    pub fn drop_odds(&self) -> u32 {
        match self {
            PowerUpKind::SlowEnemyFire => 10,
            PowerUpKind::HomingBullets => 10,
            PowerUpKind::Shield => 20,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::SlowEnemyFire => "SLOW",
            PowerUpKind::HomingBullets => "HOMING",
            PowerUpKind::Shield => "SHIELD",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub kind: PowerUpKind,
    /// Ticks since the power-up dropped.
    pub age: u32,
}

// ── Timed modifiers ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifier {
    pub active: bool,
    pub remaining_ticks: u32,
}

impl Modifier {
    /// Starts (or restarts) the countdown.  Durations never stack.
    pub fn activate(&mut self, ticks: u32) {
        self.active = ticks > 0;
        self.remaining_ticks = ticks;
    }

    /// Counts down one tick; deactivates on reaching zero.
    pub fn tick_down(&mut self) {
        if !self.active {
            return;
        }
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.remaining_ticks == 0 {
            self.active = false;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Modifiers {
    pub slow_fire: Modifier,
    pub homing: Modifier,
    pub shield: Modifier,
}

impl Modifiers {
    pub fn get(&self, kind: PowerUpKind) -> &Modifier {
        match kind {
            PowerUpKind::SlowEnemyFire => &self.slow_fire,
            PowerUpKind::HomingBullets => &self.homing,
            PowerUpKind::Shield => &self.shield,
        }
    }

    pub fn get_mut(&mut self, kind: PowerUpKind) -> &mut Modifier {
        match kind {
            PowerUpKind::SlowEnemyFire => &mut self.slow_fire,
            PowerUpKind::HomingBullets => &mut self.homing,
            PowerUpKind::Shield => &mut self.shield,
        }
    }

    pub fn tick_down_all(&mut self) {
        self.slow_fire.tick_down();
        self.homing.tick_down();
        self.shield.tick_down();
    }
}

// ── Master world state ────────────────────────────────────────────────────────

/// The entire game.  One instance is owned by the loop driver and lent out
/// to the simulation (`&mut`) and the renderer (`&`).
#[derive(Clone, Debug, PartialEq)]
pub struct WorldState {
    pub field: Field,
    pub rules: Rules,
    pub player: Player,
    pub grid: EnemyGrid,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub power_ups: Vec<PowerUp>,
    pub modifiers: Modifiers,
    pub total_shots_fired: u32,
    pub total_hits: u32,
    pub round: u32,
    pub score: u32,
    pub paused: bool,
    pub game_over: bool,
    /// Set together with `game_over` when the final round is cleared.
    pub victory: bool,
    /// Ticks simulated since the last reset.
    pub tick_count: u64,
}

impl WorldState {
    pub fn new(field: Field, rules: Rules) -> Self {
        WorldState {
            field,
            rules,
            player: Player::new(&field),
            grid: EnemyGrid::default(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            power_ups: Vec::new(),
            modifiers: Modifiers::default(),
            total_shots_fired: 0,
            total_hits: 0,
            round: 1,
            score: 0,
            paused: false,
            game_over: false,
            victory: false,
            tick_count: 0,
        }
    }

    /// Percentage of shots that destroyed an enemy; 0 before the first shot.
    pub fn accuracy(&self) -> f32 {
        if self.total_shots_fired == 0 {
            0.0
        } else {
            self.total_hits as f32 / self.total_shots_fired as f32 * 100.0
        }
    }
}

impl Default for WorldState {
    fn default() -> Self {
        WorldState::new(Field::default(), Rules::default())
    }
}
