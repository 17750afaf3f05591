//! Overlap tests for axis-aligned boxes and circles
//!
//! Both predicates are pure and use closed intervals: touching counts as
//! overlapping. Callers must not pass destroyed entities.

use glam::Vec2;

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.half_extents()
    }

    /// Point of the box (boundary or interior) closest to `point`
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let half = self.half_extents();
        let offset = (point - self.center()).clamp(-half, half);
        self.center() + offset
    }
}

/// Box-vs-box overlap, inclusive of touching edges
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    let overlap_x = a_max.x >= b.pos.x && b_max.x >= a.pos.x;
    let overlap_y = a_max.y >= b.pos.y && b_max.y >= a.pos.y;
    overlap_x && overlap_y
}

/// Box-vs-circle overlap using the closest point on the box
///
/// A circle whose center lies inside the box always overlaps (distance 0).
pub fn aabb_circle_overlap(aabb: &Aabb, center: Vec2, radius: f32) -> bool {
    let closest = aabb.closest_point(center);
    (center - closest).length_squared() <= radius * radius
}
