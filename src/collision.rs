//! Broad phase through the quadtree, narrow phase by AABB overlap.
//!
//! Detection only reports pairs.  Reacting to a hit (scoring, dying,
//! despawning) is left to each entity's own update, which reads the
//! `is_colliding` flag the frame driver sets from these pairs.

use crate::entities::Kind;
use crate::geometry::overlaps;
use crate::quadtree::{Bounded, QuadTree};

/// A boxed object tagged with what it is and what it reacts to.
pub trait Collidable: Bounded {
    fn kind(&self) -> Kind;
    fn collides_with(&self) -> Kind;

    fn is_collidable_with(&self, other: &impl Collidable) -> bool {
        self.collides_with() == other.kind()
    }
}

/// True when `a` reacts to `b`'s kind and their boxes overlap.
pub fn is_hit(a: &impl Collidable, b: &impl Collidable) -> bool {
    a.is_collidable_with(b) && overlaps(&a.bounds(), &b.bounds())
}

/// Every `(object, candidate)` pair in `tree` that collides.
///
/// A pair can be reported once from each side when both objects are on each
/// other's candidate path; flagging is idempotent so callers need not dedupe.
pub fn detect_collisions<T: Collidable + Clone>(tree: &QuadTree<T>) -> Vec<(T, T)> {
    let mut objects = Vec::new();
    tree.get_all_objects(&mut objects);

    let mut hits = Vec::new();
    let mut candidates = Vec::new();
    for obj in objects {
        candidates.clear();
        tree.find_objects(&obj.bounds(), &mut candidates);
        for candidate in candidates.iter() {
            if is_hit(obj, *candidate) {
                hits.push((obj.clone(), (*candidate).clone()));
            }
        }
    }
    hits
}

/// Quadratic reference check over a flat slice, for comparing against the
/// quadtree path.
pub fn detect_collisions_brute_force<T: Collidable + Clone>(objects: &[T]) -> Vec<(T, T)> {
    let mut hits = Vec::new();
    for a in objects {
        for b in objects {
            if is_hit(a, b) {
                hits.push((a.clone(), b.clone()));
            }
        }
    }
    hits
}
