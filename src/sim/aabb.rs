//! Axis-aligned bounding boxes
//!
//! Every collision test in the game is box vs box. Boxes are 3D so the
//! teleport sight ray can be tested against a widened z-range, but all
//! bodies live on the z = 0 plane and use the default unit depth.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Default box depth for entities in the play plane
pub const PLANE_DEPTH: f32 = 1.0;

/// Inclusive axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box centered on `center` with full extents `size`
    pub fn from_center(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box for a 2D entity on the play plane
    pub fn from_center_2d(center: Vec2, size: Vec2) -> Self {
        Self::from_center(center.extend(0.0), size.extend(PLANE_DEPTH))
    }

    /// Overlap test. Touching faces count as overlap.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Move the box in place
    #[inline]
    pub fn translate(&mut self, delta: Vec3) {
        self.min += delta;
        self.max += delta;
    }

    /// Copy of the box moved by `delta`
    #[inline]
    pub fn translated(mut self, delta: Vec3) -> Self {
        self.translate(delta);
        self
    }

    /// Grow (positive) or shrink (negative) by `amount` on every side.
    ///
    /// Shrinking past the half-extent inverts that axis, which leaves a
    /// degenerate box that only overlaps boxes spanning its core.
    pub fn expanded(self, amount: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }

    /// Copy with the z-range replaced
    pub fn with_z_range(mut self, min_z: f32, max_z: f32) -> Self {
        self.min.z = min_z;
        self.max.z = max_z;
        self
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Distance along a ray to the first point inside the box (slab test).
    ///
    /// `dir` must be normalized. A ray starting inside the box hits at 0.
    /// Returns `None` when the ray misses or the box is entirely behind it.
    pub fn ray_distance(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                // Parallel to this slab: must already be inside it
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        if t_exit < 0.0 {
            return None;
        }
        Some(t_enter.max(0.0))
    }
}
