//! Game tunables.
//!
//! Every constant the simulation reads lives here so tests can shrink or
//! stretch the world without touching game logic.

use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    // ── Canvas ────────────────────────────────────────────────────────────────
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Frames per second the binary paces itself at.
    pub frame_rate: u32,

    // ── Player ship ───────────────────────────────────────────────────────────
    pub ship_width: f32,
    pub ship_height: f32,
    pub ship_speed: f32,
    /// Frames between two volleys while fire is held.
    pub ship_fire_rate: u32,
    /// Horizontal offsets of the two guns from the ship's left edge.
    pub ship_gun_left: f32,
    pub ship_gun_right: f32,
    /// Vertical offset of both guns from the ship's top edge.
    pub ship_gun_y: f32,

    // ── Player bullets ────────────────────────────────────────────────────────
    pub player_bullet_pool: usize,
    pub player_bullet_speed: f32,
    pub player_bullet_width: f32,
    pub player_bullet_height: f32,

    // ── Enemies ───────────────────────────────────────────────────────────────
    pub enemy_pool: usize,
    pub enemy_width: f32,
    pub enemy_height: f32,
    /// Flock speed of the first wave.
    pub initial_flock_speed: f32,
    /// Added to the flock speed every time a wave is wiped out.
    pub flock_speed_step: f32,
    /// Vertical speed while a freshly spawned enemy slides into formation.
    pub enemy_entry_speed: f32,
    /// Formation depth: an enemy stops its entry after this many of its own
    /// heights plus `enemy_entry_margin`.
    pub enemy_entry_rows: f32,
    pub enemy_entry_margin: f32,
    /// Distance an enemy backs up when its entry ends.
    pub enemy_entry_bump: f32,
    /// Patrol band relative to the spawn column.
    pub enemy_patrol_left: f32,
    pub enemy_patrol_right: f32,
    /// Distance an enemy drops whenever it turns at a patrol edge.
    pub enemy_drop_step: f32,
    /// Per-frame probability an enemy fires.
    pub enemy_fire_chance: f64,
    pub enemy_score: u32,

    // ── Waves ─────────────────────────────────────────────────────────────────
    pub wave_columns: usize,
    pub wave_rows: usize,
    pub wave_origin_x: f32,
    /// Gap between neighbouring enemies, both horizontally and between rows.
    pub wave_spacing: f32,

    // ── Enemy bullets ─────────────────────────────────────────────────────────
    pub enemy_bullet_pool: usize,
    pub enemy_bullet_speed: f32,
    pub enemy_bullet_width: f32,
    pub enemy_bullet_height: f32,

    // ── Background ────────────────────────────────────────────────────────────
    pub background_slow_speed: f32,
    pub background_fast_speed: f32,

    // ── Quadtree ──────────────────────────────────────────────────────────────
    pub quadtree_max_objects: usize,
    pub quadtree_max_levels: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            frame_rate: 60,

            ship_width: 50.0,
            ship_height: 40.0,
            ship_speed: 5.0,
            ship_fire_rate: 10,
            ship_gun_left: 5.0,
            ship_gun_right: 40.0,
            ship_gun_y: 20.0,

            player_bullet_pool: 30,
            player_bullet_speed: 10.0,
            player_bullet_width: 5.0,
            player_bullet_height: 10.0,

            enemy_pool: 30,
            enemy_width: 35.0,
            enemy_height: 30.0,
            initial_flock_speed: 1.5,
            flock_speed_step: 0.5,
            enemy_entry_speed: 2.0,
            enemy_entry_rows: 5.0,
            enemy_entry_margin: 30.0,
            enemy_entry_bump: 5.0,
            enemy_patrol_left: 200.0,
            enemy_patrol_right: 100.0,
            enemy_drop_step: 5.0,
            enemy_fire_chance: 0.01,
            enemy_score: 10,

            wave_columns: 10,
            wave_rows: 3,
            wave_origin_x: 200.0,
            wave_spacing: 10.0,

            enemy_bullet_pool: 50,
            enemy_bullet_speed: 2.5,
            enemy_bullet_width: 6.0,
            enemy_bullet_height: 10.0,

            background_slow_speed: 1.0,
            background_fast_speed: 10.0,

            quadtree_max_objects: 10,
            quadtree_max_levels: 5,
        }
    }
}

/// Overwrite `target` with the parsed value of env var `name`, if present.
fn env_override<T: FromStr>(name: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(name) {
        match raw.trim().parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!("Invalid {} '{}', using default", name, raw),
        }
    }
}

impl GameConfig {
    /// Load config from `SHOOTER_*` environment variables or use defaults.
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        env_override("SHOOTER_CANVAS_WIDTH", &mut config.canvas_width);
        env_override("SHOOTER_CANVAS_HEIGHT", &mut config.canvas_height);
        env_override("SHOOTER_FRAME_RATE", &mut config.frame_rate);
        env_override("SHOOTER_SHIP_SPEED", &mut config.ship_speed);
        env_override("SHOOTER_FIRE_RATE", &mut config.ship_fire_rate);
        env_override("SHOOTER_PLAYER_BULLETS", &mut config.player_bullet_pool);
        env_override("SHOOTER_ENEMY_BULLETS", &mut config.enemy_bullet_pool);
        env_override("SHOOTER_FLOCK_SPEED", &mut config.initial_flock_speed);
        env_override("SHOOTER_ENEMY_FIRE_CHANCE", &mut config.enemy_fire_chance);

        config
    }

    /// Validate configuration after loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("ship_width", self.ship_width),
            ("ship_height", self.ship_height),
            ("player_bullet_width", self.player_bullet_width),
            ("player_bullet_height", self.player_bullet_height),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("enemy_bullet_width", self.enemy_bullet_width),
            ("enemy_bullet_height", self.enemy_bullet_height),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field });
            }
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::NotPositive { field: "frame_rate" });
        }
        if self.quadtree_max_objects == 0 {
            return Err(ConfigError::NotPositive {
                field: "quadtree_max_objects",
            });
        }
        if self.wave_columns == 0 {
            return Err(ConfigError::NotPositive {
                field: "wave_columns",
            });
        }
        if !(0.0..=1.0).contains(&self.enemy_fire_chance) {
            return Err(ConfigError::OutOfRange {
                field: "enemy_fire_chance",
                min: 0.0,
                max: 1.0,
            });
        }
        // The ship lives in the bottom quarter of the canvas.
        if self.ship_width > self.canvas_width || self.ship_height > self.canvas_height / 4.0 {
            return Err(ConfigError::LargerThanCanvas { field: "ship" });
        }
        if self.enemy_width > self.canvas_width {
            return Err(ConfigError::LargerThanCanvas { field: "enemy" });
        }
        Ok(())
    }

    /// Lowest y the ship may climb to.
    pub fn ship_ceiling(&self) -> f32 {
        self.canvas_height / 4.0 * 3.0
    }
}
