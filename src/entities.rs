//! All game entity types.  State only; movement lives in `compute`.

use crate::collision::Collidable;
use crate::config::GameConfig;
use crate::geometry::Rect;
use crate::pool::{Poolable, Pool};
use crate::quadtree::{Bounded, QuadTree};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Ship,
    PlayerBullet,
    EnemyBullet,
    Enemy,
}

impl Kind {
    /// The kind this kind reacts to on contact.
    pub fn partner(self) -> Kind {
        match self {
            Kind::Ship => Kind::EnemyBullet,
            Kind::EnemyBullet => Kind::Ship,
            Kind::PlayerBullet => Kind::Enemy,
            Kind::Enemy => Kind::PlayerBullet,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    Running,
    Paused,
    GameOver,
}

// ── Shared body ───────────────────────────────────────────────────────────────

/// State every moving entity carries.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub bounds: Rect,
    pub speed: f32,
    pub alive: bool,
    pub is_colliding: bool,
    pub kind: Kind,
    pub collides_with: Kind,
}

impl Body {
    /// A dead body of the given size, parked at the origin.
    pub fn new(kind: Kind, width: f32, height: f32) -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, width, height),
            speed: 0.0,
            alive: false,
            is_colliding: false,
            kind,
            collides_with: kind.partner(),
        }
    }

    pub fn place(&mut self, x: f32, y: f32, speed: f32) {
        self.bounds.x = x;
        self.bounds.y = y;
        self.speed = speed;
        self.alive = true;
    }

    pub fn park(&mut self) {
        self.bounds.x = 0.0;
        self.bounds.y = 0.0;
        self.speed = 0.0;
        self.alive = false;
        self.is_colliding = false;
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub body: Body,
}

impl Bullet {
    pub fn player(config: &GameConfig) -> Self {
        Self {
            body: Body::new(
                Kind::PlayerBullet,
                config.player_bullet_width,
                config.player_bullet_height,
            ),
        }
    }

    pub fn enemy(config: &GameConfig) -> Self {
        Self {
            body: Body::new(
                Kind::EnemyBullet,
                config.enemy_bullet_width,
                config.enemy_bullet_height,
            ),
        }
    }
}

impl Poolable for Bullet {
    fn spawn(&mut self, x: f32, y: f32, speed: f32) {
        self.body.place(x, y, speed);
    }

    fn clear(&mut self) {
        self.body.park();
    }

    fn is_alive(&self) -> bool {
        self.body.alive
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyPhase {
    /// Sliding down into formation.
    Entering,
    /// Sweeping left and right inside the patrol band.
    Patrolling,
}

/// Per-enemy movement constants, copied out of `GameConfig` once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyTuning {
    pub entry_speed: f32,
    pub formation_depth: f32,
    pub entry_bump: f32,
    pub patrol_left: f32,
    pub patrol_right: f32,
    pub drop_step: f32,
}

impl EnemyTuning {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            entry_speed: config.enemy_entry_speed,
            formation_depth: config.enemy_height * config.enemy_entry_rows
                + config.enemy_entry_margin,
            entry_bump: config.enemy_entry_bump,
            patrol_left: config.enemy_patrol_left,
            patrol_right: config.enemy_patrol_right,
            drop_step: config.enemy_drop_step,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub body: Body,
    pub speed_x: f32,
    pub speed_y: f32,
    pub left_edge: f32,
    pub right_edge: f32,
    pub bottom_edge: f32,
    pub phase: EnemyPhase,
    pub tuning: EnemyTuning,
}

impl Enemy {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            body: Body::new(Kind::Enemy, config.enemy_width, config.enemy_height),
            speed_x: 0.0,
            speed_y: 0.0,
            left_edge: 0.0,
            right_edge: 0.0,
            bottom_edge: 0.0,
            phase: EnemyPhase::Entering,
            tuning: EnemyTuning::from_config(config),
        }
    }
}

impl Poolable for Enemy {
    fn spawn(&mut self, x: f32, y: f32, speed: f32) {
        self.body.place(x, y, speed);
        self.speed_x = 0.0;
        self.speed_y = self.tuning.entry_speed;
        self.left_edge = x - self.tuning.patrol_left;
        self.right_edge = x + self.tuning.patrol_right;
        self.bottom_edge = y + self.tuning.formation_depth;
        self.phase = EnemyPhase::Entering;
    }

    fn clear(&mut self) {
        self.body.park();
        self.speed_x = 0.0;
        self.speed_y = 0.0;
        self.phase = EnemyPhase::Entering;
    }

    fn is_alive(&self) -> bool {
        self.body.alive
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub body: Body,
    pub bullets: Pool<Bullet>,
    /// Frames since the last volley.
    pub fire_counter: u32,
    pub fire_rate: u32,
}

impl Ship {
    /// A live ship at its start position with an empty bullet pool.
    pub fn new(config: &GameConfig) -> Self {
        let mut body = Body::new(Kind::Ship, config.ship_width, config.ship_height);
        let (x, y) = Self::start_position(config);
        body.place(x, y, config.ship_speed);
        Self {
            body,
            bullets: Pool::new(config.player_bullet_pool, || Bullet::player(config)),
            fire_counter: 0,
            fire_rate: config.ship_fire_rate,
        }
    }

    /// Horizontally centred, half a ship below the top of its zone.
    pub fn start_position(config: &GameConfig) -> (f32, f32) {
        (
            config.canvas_width / 2.0 - config.ship_width,
            config.ship_ceiling() + config.ship_height / 2.0,
        )
    }
}

// ── Background ────────────────────────────────────────────────────────────────

/// One vertically scrolling background layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    pub y: f32,
    pub speed: f32,
}

impl Background {
    pub fn new(speed: f32) -> Self {
        Self { y: 0.0, speed }
    }
}

// ── Collision handles ─────────────────────────────────────────────────────────

/// Names one entity for the duration of a frame.  Pool slot indexes are only
/// stable until the next `animate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Ship,
    PlayerBullet(usize),
    Enemy(usize),
    EnemyBullet(usize),
}

/// Snapshot of an entity as inserted into the quadtree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    pub entity: EntityRef,
    pub bounds: Rect,
    pub kind: Kind,
    pub collides_with: Kind,
}

impl Collider {
    pub fn of(entity: EntityRef, body: &Body) -> Self {
        Self {
            entity,
            bounds: body.bounds,
            kind: body.kind,
            collides_with: body.collides_with,
        }
    }
}

impl Bounded for Collider {
    fn bounds(&self) -> Rect {
        self.bounds
    }
}

impl Collidable for Collider {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn collides_with(&self) -> Kind {
        self.collides_with
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game: everything one frame reads and writes.
#[derive(Clone, Debug)]
pub struct World {
    pub config: GameConfig,
    pub ship: Ship,
    pub enemies: Pool<Enemy>,
    pub enemy_bullets: Pool<Bullet>,
    /// Slow layer first, fast layer second.
    pub backgrounds: [Background; 2],
    pub quadtree: QuadTree<Collider>,
    pub score: u32,
    /// Speed handed to every enemy of the next wave.
    pub flock_speed: f32,
    /// Waves spawned so far, the current one included.
    pub wave: u32,
    pub frame: u64,
    pub status: GameStatus,
}
