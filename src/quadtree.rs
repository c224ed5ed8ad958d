//! Quadtree over axis-aligned boxes, rebuilt from scratch every frame.
//!
//! Quadrant indexes:
//!
//! ```text
//!          |
//!      1   |   0
//!   -------+-------
//!      2   |   3
//!          |
//! ```
//!
//! An object is stored at the shallowest node whose single quadrant fully
//! contains it; anything straddling a midpoint stays at the current node.

use crate::geometry::Rect;

pub const DEFAULT_MAX_OBJECTS: usize = 10;
pub const DEFAULT_MAX_LEVELS: usize = 5;

/// Anything with a bounding box can be indexed.
pub trait Bounded {
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    TopRight = 0,
    TopLeft = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug)]
pub struct QuadTree<T> {
    bounds: Rect,
    level: usize,
    max_objects: usize,
    max_levels: usize,
    objects: Vec<T>,
    nodes: Option<Box<[QuadTree<T>; 4]>>,
}

impl<T: Bounded> QuadTree<T> {
    pub fn new(bounds: Rect) -> Self {
        Self::with_limits(bounds, DEFAULT_MAX_OBJECTS, DEFAULT_MAX_LEVELS)
    }

    pub fn with_limits(bounds: Rect, max_objects: usize, max_levels: usize) -> Self {
        Self::node(bounds, 0, max_objects, max_levels)
    }

    fn node(bounds: Rect, level: usize, max_objects: usize, max_levels: usize) -> Self {
        Self {
            bounds,
            level,
            max_objects,
            max_levels,
            objects: Vec::new(),
            nodes: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_split(&self) -> bool {
        self.nodes.is_some()
    }

    /// Children in quadrant order, if this node has split.
    pub fn children(&self) -> Option<&[QuadTree<T>; 4]> {
        self.nodes.as_deref()
    }

    /// Objects stored at this node only.
    pub fn local_objects(&self) -> &[T] {
        &self.objects
    }

    /// Number of nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self
            .nodes
            .as_ref()
            .map_or(0, |nodes| nodes.iter().map(|n| n.node_count()).sum())
    }

    /// Total objects stored in this subtree.
    pub fn len(&self) -> usize {
        self.objects.len()
            + self
                .nodes
                .as_ref()
                .map_or(0, |nodes| nodes.iter().map(|n| n.len()).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every object and every child node.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.nodes = None;
    }

    pub fn insert(&mut self, obj: T) {
        if let Some(nodes) = self.nodes.as_mut() {
            if let Some(quadrant) = Self::quadrant_of(&self.bounds, &obj.bounds()) {
                nodes[quadrant.index()].insert(obj);
                return;
            }
        }

        self.objects.push(obj);

        if self.objects.len() > self.max_objects && self.level < self.max_levels {
            if self.nodes.is_none() {
                self.split();
            }
            let pending = std::mem::take(&mut self.objects);
            for obj in pending {
                match (Self::quadrant_of(&self.bounds, &obj.bounds()), self.nodes.as_mut()) {
                    (Some(quadrant), Some(nodes)) => nodes[quadrant.index()].insert(obj),
                    _ => self.objects.push(obj),
                }
            }
        }
    }

    pub fn insert_all(&mut self, objs: impl IntoIterator<Item = T>) {
        for obj in objs {
            self.insert(obj);
        }
    }

    /// Which quadrant of this node fully contains `rect`, if any.
    pub fn get_index(&self, rect: &Rect) -> Option<Quadrant> {
        Self::quadrant_of(&self.bounds, rect)
    }

    fn quadrant_of(bounds: &Rect, rect: &Rect) -> Option<Quadrant> {
        let vertical_mid = bounds.x + bounds.width / 2.0;
        let horizontal_mid = bounds.y + bounds.height / 2.0;

        let top = rect.y < horizontal_mid && rect.y + rect.height < horizontal_mid;
        let bottom = rect.y > horizontal_mid;

        if rect.x < vertical_mid && rect.x + rect.width < vertical_mid {
            if top {
                Some(Quadrant::TopLeft)
            } else if bottom {
                Some(Quadrant::BottomLeft)
            } else {
                None
            }
        } else if rect.x > vertical_mid {
            if top {
                Some(Quadrant::TopRight)
            } else if bottom {
                Some(Quadrant::BottomRight)
            } else {
                None
            }
        } else {
            None
        }
    }

    /// Child sizes are truncated to whole pixels.  An odd-sized parent leaves
    /// a strip no child box covers; routing still goes by the parent's
    /// midpoints, so objects in that strip land in the nearest child anyway.
    fn split(&mut self) {
        let sub_width = (self.bounds.width / 2.0).trunc();
        let sub_height = (self.bounds.height / 2.0).trunc();
        let (x, y) = (self.bounds.x, self.bounds.y);
        let level = self.level + 1;
        let (max_objects, max_levels) = (self.max_objects, self.max_levels);
        let child = |cx: f32, cy: f32| {
            Self::node(Rect::new(cx, cy, sub_width, sub_height), level, max_objects, max_levels)
        };

        self.nodes = Some(Box::new([
            child(x + sub_width, y),
            child(x, y),
            child(x, y + sub_height),
            child(x + sub_width, y + sub_height),
        ]));
    }

    /// Collect every object stored in the tree.
    pub fn get_all_objects<'a>(&'a self, out: &mut Vec<&'a T>) {
        if let Some(nodes) = self.nodes.as_ref() {
            for node in nodes.iter() {
                node.get_all_objects(out);
            }
        }
        out.extend(self.objects.iter());
    }

    /// Collect the collision candidates for `rect`: the objects stored at
    /// every node on the path from here down to the deepest quadrant that
    /// fully contains it.
    pub fn find_objects<'a>(&'a self, rect: &Rect, out: &mut Vec<&'a T>) {
        if let (Some(quadrant), Some(nodes)) = (self.get_index(rect), self.nodes.as_ref()) {
            nodes[quadrant.index()].find_objects(rect, out);
        }
        out.extend(self.objects.iter());
    }
}
