use std::collections::HashSet;

use space_shooter::collision::*;
use space_shooter::compute::{apply_collisions, init_world, rebuild_quadtree};
use space_shooter::config::GameConfig;
use space_shooter::entities::*;
use space_shooter::geometry::{overlaps, Rect};
use space_shooter::pool::Poolable;
use space_shooter::quadtree::QuadTree;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn collider(entity: EntityRef, kind: Kind, x: f32, y: f32, w: f32, h: f32) -> Collider {
    Collider {
        entity,
        bounds: Rect::new(x, y, w, h),
        kind,
        collides_with: kind.partner(),
    }
}

fn flagged(hits: &[(Collider, Collider)]) -> HashSet<EntityRef> {
    hits.iter().flat_map(|(a, b)| [a.entity, b.entity]).collect()
}

fn random_rect(rng: &mut StdRng) -> Rect {
    Rect::new(
        rng.gen_range(-20.0..800.0),
        rng.gen_range(-20.0..600.0),
        rng.gen_range(1.0..50.0),
        rng.gen_range(1.0..50.0),
    )
}

// ── AABB overlap ──────────────────────────────────────────────────────────────

#[test]
fn overlap_is_symmetric() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..5_000 {
        let a = random_rect(&mut rng);
        let b = random_rect(&mut rng);
        assert_eq!(overlaps(&a, &b), overlaps(&b, &a), "{:?} vs {:?}", a, b);
    }
}

#[test]
fn overlap_detects_containment_and_partial() {
    let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert!(overlaps(&outer, &Rect::new(10.0, 10.0, 5.0, 5.0)));
    assert!(overlaps(&outer, &Rect::new(90.0, 90.0, 20.0, 20.0)));
    assert!(overlaps(&outer, &outer));
}

#[test]
fn touching_edges_do_not_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(!overlaps(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!overlaps(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
}

#[test]
fn box_outside_extended_bounds_never_overlaps() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..1_000 {
        let a = random_rect(&mut rng);
        // Place b wholly to the right of or below a
        let b = if rng.gen_bool(0.5) {
            Rect::new(a.right() + rng.gen_range(0.0..50.0), a.y, 10.0, 10.0)
        } else {
            Rect::new(a.x, a.bottom() + rng.gen_range(0.0..50.0), 10.0, 10.0)
        };
        assert!(!overlaps(&a, &b));
    }
}

// ── Kind matching ─────────────────────────────────────────────────────────────

#[test]
fn matching_kinds_overlapping_is_hit() {
    let bullet = collider(EntityRef::PlayerBullet(0), Kind::PlayerBullet, 10.0, 10.0, 5.0, 10.0);
    let enemy = collider(EntityRef::Enemy(0), Kind::Enemy, 0.0, 0.0, 35.0, 30.0);
    assert!(is_hit(&bullet, &enemy));
    assert!(is_hit(&enemy, &bullet));
}

#[test]
fn non_matching_kinds_never_hit() {
    let bullet = collider(EntityRef::PlayerBullet(0), Kind::PlayerBullet, 10.0, 10.0, 5.0, 10.0);
    let ship = collider(EntityRef::Ship, Kind::Ship, 0.0, 0.0, 50.0, 40.0);
    let enemy_bullet = collider(EntityRef::EnemyBullet(0), Kind::EnemyBullet, 0.0, 0.0, 50.0, 40.0);
    assert!(!is_hit(&bullet, &ship));
    assert!(!is_hit(&ship, &bullet));
    assert!(!is_hit(&bullet, &enemy_bullet));
    // Nothing collides with its own kind
    assert!(!is_hit(&bullet, &bullet));
}

// ── Detection through the quadtree ────────────────────────────────────────────

#[test]
fn detect_reports_overlapping_enemy_and_bullet() {
    let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 800.0, 600.0));
    tree.insert(collider(EntityRef::Enemy(3), Kind::Enemy, 100.0, 100.0, 35.0, 30.0));
    tree.insert(collider(EntityRef::PlayerBullet(1), Kind::PlayerBullet, 110.0, 105.0, 5.0, 10.0));
    tree.insert(collider(EntityRef::Enemy(4), Kind::Enemy, 600.0, 100.0, 35.0, 30.0));

    let hits = detect_collisions(&tree);
    let set = flagged(&hits);
    assert!(set.contains(&EntityRef::Enemy(3)));
    assert!(set.contains(&EntityRef::PlayerBullet(1)));
    assert!(!set.contains(&EntityRef::Enemy(4)));
}

#[test]
fn detect_on_empty_tree_reports_nothing() {
    let tree: QuadTree<Collider> = QuadTree::new(Rect::new(0.0, 0.0, 800.0, 600.0));
    assert!(detect_collisions(&tree).is_empty());
}

#[test]
fn quadtree_flags_same_entities_as_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);
    let kinds = [Kind::Ship, Kind::PlayerBullet, Kind::Enemy, Kind::EnemyBullet];

    for round in 0..20 {
        let objects: Vec<Collider> = (0..300)
            .map(|i| {
                let r = random_rect(&mut rng);
                let kind = kinds[rng.gen_range(0..kinds.len())];
                collider(EntityRef::Enemy(i), kind, r.x, r.y, r.width, r.height)
            })
            .collect();

        let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        tree.insert_all(objects.iter().copied());

        let via_tree = flagged(&detect_collisions(&tree));
        let via_brute = flagged(&detect_collisions_brute_force(&objects));
        assert_eq!(via_tree, via_brute, "round {}", round);
    }
}

// ── World-level flagging ──────────────────────────────────────────────────────

#[test]
fn enemy_and_player_bullet_flagged_in_same_pass() {
    let config = GameConfig {
        enemy_fire_chance: 0.0,
        ..GameConfig::default()
    };
    let mut world = init_world(config).unwrap();

    // Move the front enemy onto open canvas and fire a bullet into it
    world.enemies.slot_mut(0).unwrap().body.bounds = Rect::new(100.0, 100.0, 35.0, 30.0);
    assert!(world.ship.bullets.get(110.0, 105.0, 10.0));

    rebuild_quadtree(&mut world);
    let hits = apply_collisions(&mut world);

    assert!(hits > 0);
    assert!(world.enemies.slot(0).unwrap().body.is_colliding);
    assert!(world.ship.bullets.slot(0).unwrap().body.is_colliding);
    // Bystanders are untouched
    assert!(world.enemies.iter().skip(1).all(|e| !e.body.is_colliding));
    assert!(!world.ship.body.is_colliding);
}

#[test]
fn dead_entities_are_not_candidates() {
    let config = GameConfig {
        enemy_fire_chance: 0.0,
        ..GameConfig::default()
    };
    let mut world = init_world(config).unwrap();

    // A bullet that died in place over the ship must not hit it
    let ship_bounds = world.ship.body.bounds;
    world.enemy_bullets.get(ship_bounds.x + 5.0, ship_bounds.y + 5.0, 0.0);
    world.enemy_bullets.slot_mut(0).unwrap().clear();

    rebuild_quadtree(&mut world);
    apply_collisions(&mut world);
    assert!(!world.ship.body.is_colliding);
}

#[test]
fn flagging_a_stale_handle_is_ignored() {
    let mut world = init_world(GameConfig::default()).unwrap();
    // No player bullet is alive in slot 0, and slot 999 doesn't exist
    assert!(!space_shooter::compute::flag_colliding(&mut world, EntityRef::PlayerBullet(0)));
    assert!(!space_shooter::compute::flag_colliding(&mut world, EntityRef::EnemyBullet(999)));
}
