// ── Grid geometry ─────────────────────────────────────────────────────────────
pub const GRID_ROWS: usize = 4;
pub const GRID_COLS: usize = 8;
pub const GRID_CELLS: usize = GRID_ROWS * GRID_COLS;
pub const CELL_SPACING_X: f32 = 60.0;
pub const CELL_SPACING_Y: f32 = 40.0;
pub const GRID_START_X: f32 = 50.0;
pub const GRID_START_Y: f32 = 400.0;
pub const ENEMY_HALF_EXTENT: f32 = 15.0;
pub const INITIAL_ENEMY_SPEED: f32 = 0.5;
pub const ENEMY_DROP_STEP: f32 = 20.0;
/// Distance from the side walls at which the grid bounces.
pub const GRID_BOUNCE_MARGIN: f32 = 10.0;
/// An enemy whose bottom edge sinks below this line ends the game.
pub const INVASION_LINE: f32 = 60.0;

// ── Player ────────────────────────────────────────────────────────────────────
pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_HALF_WIDTH: f32 = 20.0;
pub const PLAYER_BAND_BOTTOM: f32 = 20.0;
pub const PLAYER_BAND_TOP: f32 = 50.0;

// ── Bullets ───────────────────────────────────────────────────────────────────
pub const PLAYER_BULLET_SPAWN_Y: f32 = 50.0;
pub const PLAYER_BULLET_SPEED: f32 = 8.0;
pub const BULLET_HALF_WIDTH: f32 = 2.0;
pub const BULLET_HALF_HEIGHT: f32 = 8.0;
pub const ENEMY_BULLET_SPEED: f32 = 4.0;
pub const SLOWED_ENEMY_BULLET_SPEED: f32 = 1.5;
/// Enemy fire chance per tick is 1 in this many.
pub const ENEMY_FIRE_ODDS: u32 = 25;
/// Rounds above this one fire diagonal shots and move them along their vector.
pub const DIAGONAL_FIRE_ROUND: u32 = 5;
pub const DIAGONAL_FIRE_DX: f32 = 0.7;

// ── Homing ────────────────────────────────────────────────────────────────────
pub const HOMING_TARGET_WEIGHT: f32 = 0.15;
pub const HOMING_MIN_TARGET_DISTANCE: f32 = 0.01;

// ── Power-ups ─────────────────────────────────────────────────────────────────
pub const POWER_UP_FALL_SPEED: f32 = 2.0;
pub const PICKUP_HALF_WIDTH: f32 = 20.0;
pub const PICKUP_CEILING: f32 = 60.0;

// ── Scoring & progression ─────────────────────────────────────────────────────
pub const SCORE_PER_KILL: u32 = 100;
pub const DEFAULT_ROUND_SPEED_MULTIPLIER: f32 = 1.25;
pub const DEFAULT_MAX_ROUNDS: u32 = 15;

// ── Field ─────────────────────────────────────────────────────────────────────
pub const DEFAULT_FIELD_WIDTH: f32 = 1000.0;
pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;
/// Smallest field that still fits the grid sweep and the player band.
pub const MIN_FIELD_WIDTH: f32 = 500.0;
pub const MIN_FIELD_HEIGHT: f32 = 450.0;

// ── Timing ────────────────────────────────────────────────────────────────────
pub const DEFAULT_TICK_RATE_HZ: u32 = 60;
pub const MAX_TICK_RATE_HZ: u32 = 240;
/// Ticks run back to back at most this many times before backlog is dropped.
pub const MAX_CATCH_UP_TICKS: u32 = 5;
