use space_shooter::collision::Collidable;
use space_shooter::config::GameConfig;
use space_shooter::entities::*;
use space_shooter::geometry::Rect;
use space_shooter::pool::Poolable;
use space_shooter::quadtree::Bounded;

#[test]
fn kind_partners_are_symmetric() {
    for kind in [Kind::Ship, Kind::PlayerBullet, Kind::EnemyBullet, Kind::Enemy] {
        assert_ne!(kind.partner(), kind);
        assert_eq!(kind.partner().partner(), kind);
    }
    assert_eq!(Kind::Ship.partner(), Kind::EnemyBullet);
    assert_eq!(Kind::PlayerBullet.partner(), Kind::Enemy);
}

#[test]
fn new_body_is_dead_at_origin() {
    let body = Body::new(Kind::Enemy, 35.0, 30.0);
    assert!(!body.alive);
    assert!(!body.is_colliding);
    assert_eq!(body.bounds, Rect::new(0.0, 0.0, 35.0, 30.0));
    assert_eq!(body.collides_with, Kind::PlayerBullet);
}

#[test]
fn bullet_sizes_follow_config() {
    let config = GameConfig::default();
    let player = Bullet::player(&config);
    assert_eq!(player.body.kind, Kind::PlayerBullet);
    assert_eq!((player.body.bounds.width, player.body.bounds.height), (5.0, 10.0));

    let enemy = Bullet::enemy(&config);
    assert_eq!(enemy.body.kind, Kind::EnemyBullet);
    assert_eq!((enemy.body.bounds.width, enemy.body.bounds.height), (6.0, 10.0));
}

#[test]
fn bullet_clear_resets_every_field() {
    let config = GameConfig::default();
    let mut b = Bullet::player(&config);
    b.spawn(40.0, 50.0, 10.0);
    b.body.is_colliding = true;
    assert!(b.is_alive());

    b.clear();
    assert!(!b.is_alive());
    assert!(!b.body.is_colliding);
    assert_eq!((b.body.bounds.x, b.body.bounds.y, b.body.speed), (0.0, 0.0, 0.0));
    // Size survives recycling
    assert_eq!(b.body.bounds.width, 5.0);
}

#[test]
fn enemy_spawn_sets_patrol_band_and_entry() {
    let config = GameConfig::default();
    let mut e = Enemy::new(&config);
    e.spawn(200.0, -30.0, 1.5);

    assert!(e.is_alive());
    assert_eq!(e.phase, EnemyPhase::Entering);
    assert_eq!(e.speed_x, 0.0);
    assert_eq!(e.speed_y, 2.0);
    assert_eq!(e.left_edge, 0.0);
    assert_eq!(e.right_edge, 300.0);
    assert_eq!(e.bottom_edge, 150.0);
    assert_eq!(e.body.speed, 1.5);
}

#[test]
fn enemy_clear_returns_to_entering() {
    let config = GameConfig::default();
    let mut e = Enemy::new(&config);
    e.spawn(200.0, -30.0, 1.5);
    e.phase = EnemyPhase::Patrolling;
    e.speed_x = -1.5;

    e.clear();
    assert!(!e.is_alive());
    assert_eq!(e.phase, EnemyPhase::Entering);
    assert_eq!((e.speed_x, e.speed_y), (0.0, 0.0));
}

#[test]
fn ship_starts_alive_with_empty_guns() {
    let config = GameConfig::default();
    let ship = Ship::new(&config);
    assert!(ship.body.alive);
    assert_eq!(Ship::start_position(&config), (350.0, 470.0));
    assert_eq!(ship.body.speed, 5.0);
    assert_eq!(ship.bullets.capacity(), 30);
    assert_eq!(ship.bullets.live_count(), 0);
    assert_eq!(ship.fire_counter, 0);
    assert_eq!(ship.fire_rate, 10);
}

#[test]
fn collider_snapshots_body() {
    let config = GameConfig::default();
    let mut e = Enemy::new(&config);
    e.spawn(120.0, 80.0, 1.5);

    let c = Collider::of(EntityRef::Enemy(7), &e.body);
    assert_eq!(c.entity, EntityRef::Enemy(7));
    assert_eq!(c.bounds(), Rect::new(120.0, 80.0, 35.0, 30.0));
    assert_eq!(c.kind(), Kind::Enemy);
    assert_eq!(c.collides_with(), Kind::PlayerBullet);

    // Later movement doesn't touch the snapshot
    e.body.bounds.x = 0.0;
    assert_eq!(c.bounds.x, 120.0);
}

#[test]
fn world_clone_is_independent() {
    let config = GameConfig::default();
    let world = space_shooter::compute::init_world(config).unwrap();
    let mut copy = world.clone();
    copy.score = 99;
    copy.ship.body.bounds.x = 0.0;
    copy.enemies.reset();

    assert_eq!(world.score, 0);
    assert_eq!(world.ship.body.bounds.x, 350.0);
    assert_eq!(world.enemies.live_count(), 30);
}
