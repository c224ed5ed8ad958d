//! Game logic: world construction, per-entity movement and the frame driver.
//!
//! Every function takes the `World` (or the part of it it needs) by mutable
//! reference and advances it in place.  All randomness comes through an
//! injected RNG so callers control determinism.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::collision::detect_collisions;
use crate::config::GameConfig;
use crate::entities::{
    Background, Body, Bullet, Collider, Enemy, EnemyPhase, EntityRef, GameStatus, Kind, Ship,
    World,
};
use crate::error::GameError;
use crate::geometry::Rect;
use crate::input::InputState;
use crate::pool::Pool;
use crate::quadtree::QuadTree;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Validate `config` and build a fresh world with the first wave spawned.
pub fn init_world(config: GameConfig) -> Result<World, GameError> {
    config.validate()?;
    let world = build_world(config);
    info!(
        "World ready: {}x{} canvas, {} enemies in wave {}",
        world.config.canvas_width,
        world.config.canvas_height,
        world.enemies.live_count(),
        world.wave
    );
    Ok(world)
}

fn build_world(config: GameConfig) -> World {
    let ship = Ship::new(&config);
    let enemies = Pool::new(config.enemy_pool, || Enemy::new(&config));
    let enemy_bullets = Pool::new(config.enemy_bullet_pool, || Bullet::enemy(&config));
    let backgrounds = [
        Background::new(config.background_slow_speed),
        Background::new(config.background_fast_speed),
    ];
    let quadtree = QuadTree::with_limits(
        Rect::new(0.0, 0.0, config.canvas_width, config.canvas_height),
        config.quadtree_max_objects,
        config.quadtree_max_levels,
    );
    let flock_speed = config.initial_flock_speed;

    let mut world = World {
        config,
        ship,
        enemies,
        enemy_bullets,
        backgrounds,
        quadtree,
        score: 0,
        flock_speed,
        wave: 0,
        frame: 0,
        status: GameStatus::Running,
    };
    spawn_wave(&mut world);
    world
}

/// Throw the current game away and start over with the same config.
pub fn restart(world: &mut World) {
    let config = world.config.clone();
    *world = build_world(config);
    info!("Game restarted");
}

/// Spawn a full wave above the top edge of the canvas.  Rows are stacked
/// upward so each slides into formation one after another.
pub fn spawn_wave(world: &mut World) {
    let config = &world.config;
    let step_x = config.enemy_width + config.wave_spacing;
    let mut x = config.wave_origin_x;
    let mut y = -config.enemy_height;
    let row_step = y - config.wave_spacing;

    let total = config.wave_rows * config.wave_columns;
    let mut spawned = 0;
    for i in 1..=total {
        if world.enemies.get(x, y, world.flock_speed) {
            spawned += 1;
        }
        x += step_x;
        if i % config.wave_columns == 0 {
            x = config.wave_origin_x;
            y += row_step;
        }
    }
    world.wave += 1;

    if spawned < total {
        debug!("Enemy pool exhausted: spawned {}/{} for wave {}", spawned, total, world.wave);
    }
    debug!("Wave {} spawned at flock speed {}", world.wave, world.flock_speed);
}

// ── Pause ────────────────────────────────────────────────────────────────────

pub fn pause(world: &mut World) {
    if world.status == GameStatus::Running {
        world.status = GameStatus::Paused;
        info!("Paused at frame {}", world.frame);
    }
}

pub fn resume(world: &mut World) {
    if world.status == GameStatus::Paused {
        world.status = GameStatus::Running;
        info!("Resumed at frame {}", world.frame);
    }
}

pub fn toggle_pause(world: &mut World) {
    match world.status {
        GameStatus::Running => pause(world),
        GameStatus::Paused => resume(world),
        GameStatus::GameOver => {}
    }
}

// ── Collision pass ───────────────────────────────────────────────────────────

/// Clear the quadtree and insert every live entity.
pub fn rebuild_quadtree(world: &mut World) {
    let World {
        quadtree,
        ship,
        enemies,
        enemy_bullets,
        ..
    } = world;

    quadtree.clear();
    if ship.body.alive {
        quadtree.insert(Collider::of(EntityRef::Ship, &ship.body));
    }
    quadtree.insert_all(
        ship.bullets
            .live_slots()
            .map(|(slot, b)| Collider::of(EntityRef::PlayerBullet(slot), &b.body)),
    );
    quadtree.insert_all(
        enemies
            .live_slots()
            .map(|(slot, e)| Collider::of(EntityRef::Enemy(slot), &e.body)),
    );
    quadtree.insert_all(
        enemy_bullets
            .live_slots()
            .map(|(slot, b)| Collider::of(EntityRef::EnemyBullet(slot), &b.body)),
    );
}

fn body_mut(world: &mut World, entity: EntityRef) -> Option<&mut Body> {
    match entity {
        EntityRef::Ship => Some(&mut world.ship.body),
        EntityRef::PlayerBullet(slot) => world.ship.bullets.slot_mut(slot).map(|b| &mut b.body),
        EntityRef::Enemy(slot) => world.enemies.slot_mut(slot).map(|e| &mut e.body),
        EntityRef::EnemyBullet(slot) => world.enemy_bullets.slot_mut(slot).map(|b| &mut b.body),
    }
}

/// Mark `entity` as colliding.  A handle that no longer names a live entity
/// is logged and ignored.
pub fn flag_colliding(world: &mut World, entity: EntityRef) -> bool {
    match body_mut(world, entity) {
        Some(body) if body.alive => {
            body.is_colliding = true;
            true
        }
        _ => {
            warn!("Collision handle {:?} does not name a live entity", entity);
            false
        }
    }
}

/// Run detection over the current quadtree and flag both sides of every hit.
/// Returns the number of hits reported.
pub fn apply_collisions(world: &mut World) -> usize {
    let hits = detect_collisions(&world.quadtree);
    for (a, b) in &hits {
        flag_colliding(world, a.entity);
        flag_colliding(world, b.entity);
    }
    hits.len()
}

// ── Per-entity movement ──────────────────────────────────────────────────────

pub fn scroll_background(background: &mut Background, canvas_height: f32) {
    background.y += background.speed;
    if background.y >= canvas_height {
        background.y = 0.0;
    }
}

/// Advance the ship one frame.  Returns `true` if it was destroyed.
///
/// Only one direction applies per frame: right beats left beats up beats down.
pub fn move_ship(ship: &mut Ship, input: &InputState, config: &GameConfig) -> bool {
    if !ship.body.alive {
        return false;
    }
    ship.fire_counter = ship.fire_counter.saturating_add(1);

    let speed = ship.body.speed;
    let b = &mut ship.body.bounds;
    if input.right {
        b.x = (b.x + speed).min(config.canvas_width - b.width);
    } else if input.left {
        b.x = (b.x - speed).max(0.0);
    } else if input.up {
        b.y = (b.y - speed).max(config.ship_ceiling());
    } else if input.down {
        b.y = (b.y + speed).min(config.canvas_height - b.height);
    }

    if ship.body.is_colliding {
        ship.body.alive = false;
        return true;
    }

    if input.fire && ship.fire_counter >= ship.fire_rate {
        fire_volley(ship, config);
        ship.fire_counter = 0;
    }
    false
}

/// Fire one bullet from each gun, or none if the pool can't supply both.
pub fn fire_volley(ship: &mut Ship, config: &GameConfig) -> bool {
    let Rect { x, y, .. } = ship.body.bounds;
    let gun_y = y + config.ship_gun_y;
    let speed = config.player_bullet_speed;
    let fired = ship.bullets.get_two(
        x + config.ship_gun_left,
        gun_y,
        speed,
        x + config.ship_gun_right,
        gun_y,
        speed,
    );
    if !fired {
        debug!("Player bullet pool exhausted, volley dropped");
    }
    fired
}

/// Advance a bullet.  Returns `true` once it has expired: it hit something
/// or crossed the edge it travels toward.
pub fn update_bullet(bullet: &mut Bullet, canvas_height: f32) -> bool {
    let body = &mut bullet.body;
    body.bounds.y -= body.speed;

    if body.is_colliding {
        return true;
    }
    match body.kind {
        Kind::PlayerBullet => body.bounds.y <= -body.bounds.height,
        Kind::EnemyBullet => body.bounds.y >= canvas_height,
        _ => false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyOutcome {
    Alive,
    /// Shot down; the player scores.
    Destroyed,
    /// Drifted off the bottom of the canvas.
    Escaped,
}

/// Advance an enemy one frame, letting it fire into `enemy_bullets`.
pub fn update_enemy(
    enemy: &mut Enemy,
    enemy_bullets: &mut Pool<Bullet>,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> EnemyOutcome {
    let speed = enemy.body.speed;
    enemy.body.bounds.x += enemy.speed_x;
    enemy.body.bounds.y += enemy.speed_y;

    match enemy.phase {
        EnemyPhase::Entering => {
            if enemy.body.bounds.y >= enemy.bottom_edge {
                enemy.speed_y = 0.0;
                enemy.body.bounds.y -= enemy.tuning.entry_bump;
                enemy.speed_x = -speed;
                enemy.phase = EnemyPhase::Patrolling;
            }
        }
        EnemyPhase::Patrolling => {
            let x = enemy.body.bounds.x;
            if x <= enemy.left_edge && enemy.speed_x < 0.0 {
                enemy.speed_x = speed;
                enemy.body.bounds.y += enemy.tuning.drop_step;
            } else if x >= enemy.right_edge && enemy.speed_x > 0.0 {
                enemy.speed_x = -speed;
                enemy.body.bounds.y += enemy.tuning.drop_step;
            }
        }
    }

    if enemy.body.is_colliding {
        return EnemyOutcome::Destroyed;
    }
    if enemy.body.bounds.y >= config.canvas_height {
        return EnemyOutcome::Escaped;
    }

    if rng.gen_bool(config.enemy_fire_chance) {
        let b = enemy.body.bounds;
        enemy_bullets.get(b.x + b.width / 2.0, b.bottom(), -config.enemy_bullet_speed);
    }
    EnemyOutcome::Alive
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the whole game by one frame and return the resulting status.
///
/// Collision detection runs every frame, paused or not.  Movement only runs
/// while `Running`.  Once the ship is destroyed the status is `GameOver` and
/// further ticks do nothing.
pub fn tick(world: &mut World, input: &InputState, rng: &mut impl Rng) -> GameStatus {
    if world.status == GameStatus::GameOver {
        return world.status;
    }

    rebuild_quadtree(world);
    apply_collisions(world);

    if world.status == GameStatus::Running {
        let canvas_height = world.config.canvas_height;
        for background in world.backgrounds.iter_mut() {
            scroll_background(background, canvas_height);
        }

        if move_ship(&mut world.ship, input, &world.config) {
            world.status = GameStatus::GameOver;
            info!("Ship destroyed at frame {}, final score {}", world.frame, world.score);
        }

        world
            .ship
            .bullets
            .animate(|bullet| update_bullet(bullet, canvas_height));

        let World {
            config,
            enemies,
            enemy_bullets,
            score,
            ..
        } = world;
        enemies.animate(|enemy| match update_enemy(enemy, enemy_bullets, config, &mut *rng) {
            EnemyOutcome::Alive => false,
            EnemyOutcome::Destroyed => {
                *score += config.enemy_score;
                true
            }
            EnemyOutcome::Escaped => true,
        });

        world
            .enemy_bullets
            .animate(|bullet| update_bullet(bullet, canvas_height));

        world.frame += 1;
    }

    if world.enemies.live_count() == 0 {
        world.flock_speed += world.config.flock_speed_step;
        spawn_wave(world);
    }

    world.status
}
