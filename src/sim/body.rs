//! Kinematic bodies (player and crates)
//!
//! Simple platformer integration: gravity along ±Y, exponential horizontal
//! friction, explicit Euler position update. No rotation, no mass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

/// What a grounded body is standing on.
///
/// A relation only: indices into the owning `World`'s collections, which
/// never shrink during a level. Cleared whenever support is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Support {
    /// Index into `World::obstacles`
    Obstacle(usize),
    /// Index into `World::crates`
    Crate(usize),
}

/// Position/velocity state shared by the player and crates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Half width / half height of the collision box
    pub half: Vec2,
    pub on_ground: bool,
    pub support: Option<Support>,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            half: size * 0.5,
            on_ground: false,
            support: None,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_2d(self.pos, self.half * 2.0)
    }

    /// Y of the face that rests on a support for the given gravity sign
    pub fn foot_y(&self, gravity_sign: f32) -> f32 {
        if gravity_sign > 0.0 {
            self.pos.y - self.half.y
        } else {
            self.pos.y + self.half.y
        }
    }

    /// Whether this body currently rests on `support`
    pub fn is_carried_by(&self, support: Support) -> bool {
        self.on_ground && self.support == Some(support)
    }

    /// Drop any support relation (jump, teleport, lost contact)
    pub fn clear_support(&mut self) {
        self.on_ground = false;
        self.support = None;
    }

    /// Apply gravity, friction and horizontal control acceleration to velocity
    pub fn apply_forces(
        &mut self,
        gravity: f32,
        gravity_sign: f32,
        friction: f32,
        control_accel: f32,
        dt: f32,
    ) {
        self.vel.y -= gravity * gravity_sign * dt;
        self.vel.x -= self.vel.x * friction * dt;
        self.vel.x += control_accel * dt;
    }

    #[inline]
    pub fn advance_x(&mut self, dt: f32) {
        self.pos.x += self.vel.x * dt;
    }

    #[inline]
    pub fn advance_y(&mut self, dt: f32) {
        self.pos.y += self.vel.y * dt;
    }

    /// Full integration step for a body without mid-step interaction
    pub fn integrate(&mut self, gravity: f32, gravity_sign: f32, friction: f32, dt: f32) {
        self.apply_forces(gravity, gravity_sign, friction, 0.0, dt);
        self.advance_y(dt);
        self.advance_x(dt);
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_gravity_sign() {
        let mut body = Body::new(Vec2::ZERO, Vec2::ONE);
        body.integrate(GRAVITY, 1.0, CRATE_FRICTION, 0.1);
        assert!((body.vel.y + 5.0).abs() < 1e-5);
        assert!(body.pos.y < 0.0);

        let mut inverted = Body::new(Vec2::ZERO, Vec2::ONE);
        inverted.integrate(GRAVITY, -1.0, CRATE_FRICTION, 0.1);
        assert!((inverted.vel.y - 5.0).abs() < 1e-5);
        assert!(inverted.pos.y > 0.0);
    }

    #[test]
    fn test_friction_decays_horizontal() {
        let mut body = Body::new(Vec2::ZERO, Vec2::ONE);
        body.vel.x = 10.0;
        body.apply_forces(GRAVITY, 1.0, PLAYER_FRICTION, 0.0, 0.05);
        // v -= v * 8 * 0.05
        assert!((body.vel.x - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_zero_dt_is_frozen() {
        let mut body = Body::new(Vec2::new(1.0, 2.0), Vec2::ONE);
        body.vel = Vec2::new(3.0, -4.0);
        body.apply_forces(GRAVITY, 1.0, PLAYER_FRICTION, 50.0, 0.0);
        body.advance_x(0.0);
        body.advance_y(0.0);
        assert_eq!(body.pos, Vec2::new(1.0, 2.0));
        assert_eq!(body.vel, Vec2::new(3.0, -4.0));
    }

    #[test]
    fn test_foot_y() {
        let body = Body::new(Vec2::new(0.0, 2.0), Vec2::ONE);
        assert_eq!(body.foot_y(1.0), 1.5);
        assert_eq!(body.foot_y(-1.0), 2.5);
    }
}
