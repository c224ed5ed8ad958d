//! Fixed-capacity recycling pool.
//!
//! Every entity is allocated once up front.  Live entities always sit in a
//! contiguous run at the front of the sequence, so the tail slot tells us
//! whether the pool still has a free entity and the per-frame walk can stop
//! at the first dead one.

use std::collections::VecDeque;

/// An entity that can be parked in a `Pool` and brought back to life.
pub trait Poolable {
    /// Bring a dead entity to life at `(x, y)` moving at `speed`.
    fn spawn(&mut self, x: f32, y: f32, speed: f32);
    /// Kill the entity and park it at the origin with zeroed motion.
    fn clear(&mut self);
    fn is_alive(&self) -> bool;
}

#[derive(Clone, Debug)]
pub struct Pool<T> {
    slots: VecDeque<T>,
}

impl<T: Poolable> Pool<T> {
    /// Preallocate `size` entities built by `factory`.  All start dead.
    pub fn new(size: usize, mut factory: impl FnMut() -> T) -> Self {
        let mut slots = VecDeque::with_capacity(size);
        for _ in 0..size {
            let mut entity = factory();
            entity.clear();
            slots.push_back(entity);
        }
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Spawn the tail entity and rotate it to the front.
    ///
    /// Returns `false` without doing anything when the tail is alive: the
    /// pool is exhausted and the request is dropped.
    pub fn get(&mut self, x: f32, y: f32, speed: f32) -> bool {
        match self.slots.back() {
            Some(tail) if !tail.is_alive() => {}
            _ => return false,
        }
        if let Some(mut entity) = self.slots.pop_back() {
            entity.spawn(x, y, speed);
            self.slots.push_front(entity);
            return true;
        }
        false
    }

    /// Spawn two entities, or neither if the two tail slots are not both free.
    pub fn get_two(&mut self, x1: f32, y1: f32, speed1: f32, x2: f32, y2: f32, speed2: f32) -> bool {
        let len = self.slots.len();
        if len < 2 || self.slots[len - 1].is_alive() || self.slots[len - 2].is_alive() {
            return false;
        }
        self.get(x1, y1, speed1) && self.get(x2, y2, speed2)
    }

    /// Run `update` over every live entity, front to back.
    ///
    /// When `update` returns `true` the entity has expired: it is cleared and
    /// moved to the back of the pool, and the entity that slides into its
    /// index is visited next.  Returns the number of entities recycled.
    pub fn animate(&mut self, mut update: impl FnMut(&mut T) -> bool) -> usize {
        let mut recycled = 0;
        let mut i = 0;
        // Each recycled entity shrinks the live prefix, so at most `len`
        // visits happen either way.
        let mut remaining = self.slots.len();
        while remaining > 0 && i < self.slots.len() && self.slots[i].is_alive() {
            remaining -= 1;
            if update(&mut self.slots[i]) {
                if let Some(mut entity) = self.slots.remove(i) {
                    entity.clear();
                    self.slots.push_back(entity);
                }
                recycled += 1;
            } else {
                i += 1;
            }
        }
        recycled
    }

    /// Live entities in pool order.
    pub fn live(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().take_while(|e| e.is_alive())
    }

    /// Live entities paired with their slot index.
    pub fn live_slots(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().enumerate().take_while(|(_, e)| e.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Every slot, dead ones included.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn slot(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    /// Kill every entity.  Capacity is unchanged.
    pub fn reset(&mut self) {
        for entity in self.slots.iter_mut() {
            entity.clear();
        }
    }
}
