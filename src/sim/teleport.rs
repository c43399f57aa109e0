//! Blink teleport
//!
//! Toggling aim freezes game time. While aiming, the pointer ray picks a
//! target on the z = 0 plane, clamped to `teleport_range` around the player.
//! Solid lasers between the player and the target block the jump; hollow
//! ones never do. Confirming spends one charge and moves the player.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::hazard::Laser;
use super::obstacle::Obstacle;
use super::state::{GameEvent, World};
use crate::consts::*;

/// Pointer ray in world space, already unprojected by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl PointerRay {
    /// Straight down the view axis onto a world point (orthographic camera)
    pub fn at(point: Vec2) -> Self {
        Self {
            origin: point.extend(50.0),
            direction: Vec3::NEG_Z,
        }
    }

    /// Where the ray meets the z = 0 plane, if in front of the origin
    pub fn ground_point(&self) -> Option<Vec2> {
        if self.direction.z.abs() < f32::EPSILON {
            return None;
        }
        let t = -self.origin.z / self.direction.z;
        if !t.is_finite() || t < 0.0 {
            return None;
        }
        Some((self.origin + self.direction * t).truncate()).filter(|p| p.is_finite())
    }
}

/// Live aiming state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    /// Range-clamped target; `None` until the pointer first hits the plane
    pub target: Option<Vec2>,
    pub blocked: bool,
    /// Wall-clock animation phase for the aim marker
    pub pulse: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum TeleportState {
    #[default]
    Normal,
    Aiming(Aim),
}

impl TeleportState {
    pub fn is_aiming(&self) -> bool {
        matches!(self, TeleportState::Aiming(_))
    }

    pub fn aim(&self) -> Option<&Aim> {
        match self {
            TeleportState::Aiming(aim) => Some(aim),
            TeleportState::Normal => None,
        }
    }
}

/// Pull `raw` back onto the circle of radius `range` around `origin` if needed
pub fn clamp_to_range(origin: Vec2, raw: Vec2, range: f32) -> Vec2 {
    let offset = raw - origin;
    let dist = offset.length();
    if dist <= range {
        return raw;
    }
    let dir = offset / dist;
    let mut reach = range;
    let mut clamped = origin + dir * reach;
    // Rounding can land a hair outside the circle; pull in until it doesn't
    while clamped.distance(origin) > range && reach > 0.0 {
        reach -= range * 1e-6;
        clamped = origin + dir * reach;
    }
    clamped
}

/// Box a laser presents to the sight ray
fn sight_box(laser: &Laser) -> Aabb {
    laser
        .aabb()
        .with_z_range(-SIGHT_Z_EXTENT, SIGHT_Z_EXTENT)
}

/// Whether any solid laser sits on the straight path from `from` to `to`
pub fn sight_blocked(from: Vec2, to: Vec2, lasers: &[Laser]) -> bool {
    let delta = to - from;
    let dist = delta.length();
    if dist < f32::EPSILON {
        return false;
    }
    let origin = from.extend(0.0);
    let dir = (delta / dist).extend(0.0);

    lasers
        .iter()
        .filter(|l| l.is_solid())
        .filter_map(|l| sight_box(l).ray_distance(origin, dir))
        .any(|hit| hit < dist)
}

/// Final resting spot for a teleport to `target`.
///
/// If the probe box overlaps an obstacle, the player is moved onto its
/// support face (top, or bottom when gravity is inverted). First hit wins.
pub fn landing_position(target: Vec2, obstacles: &[Obstacle], gravity_sign: f32) -> Vec2 {
    let probe = Aabb::from_center_2d(target, Vec2::splat(PLAYER_HAZARD_SIZE));
    let hit = obstacles
        .iter()
        .filter_map(|o| o.collider())
        .find(|b| probe.intersects(b));

    match hit {
        Some(b) if gravity_sign > 0.0 => Vec2::new(target.x, b.top() + TELEPORT_LANDING_OFFSET),
        Some(b) => Vec2::new(target.x, b.bottom() - TELEPORT_LANDING_OFFSET),
        None => target,
    }
}

/// Enter or leave aiming. Entering needs a charge; leaving costs nothing.
pub fn toggle(world: &mut World) {
    match world.teleport {
        TeleportState::Aiming(_) => {
            world.teleport = TeleportState::Normal;
            log::debug!("Teleport aim cancelled");
        }
        TeleportState::Normal if world.player.charges > 0 => {
            world.teleport = TeleportState::Aiming(Aim::default());
            log::debug!("Teleport aim started ({} charges)", world.player.charges);
        }
        TeleportState::Normal => {}
    }
}

/// Recompute the target and blocked flag. Runs on wall-clock time.
pub fn update_aim(world: &mut World, pointer: Option<&PointerRay>, wall_dt: f32) {
    let range = world.tuning.teleport_range;
    let player_pos = world.player.body.pos;
    let TeleportState::Aiming(aim) = &mut world.teleport else {
        return;
    };

    aim.pulse += wall_dt;
    if let Some(raw) = pointer.and_then(PointerRay::ground_point) {
        aim.target = Some(clamp_to_range(player_pos, raw, range));
    }
    aim.blocked = aim
        .target
        .is_some_and(|target| sight_blocked(player_pos, target, &world.lasers));
}

/// Execute the aimed teleport if it is allowed. Returns whether it happened.
pub fn confirm(world: &mut World) -> bool {
    let Some(aim) = world.teleport.aim() else {
        return false;
    };
    let Some(target) = aim.target else {
        return false;
    };
    if aim.blocked || world.player.charges == 0 {
        return false;
    }

    let from = world.player.body.pos;
    let to = landing_position(target, &world.obstacles, world.gravity_sign);
    let body = &mut world.player.body;
    body.pos = to;
    body.vel = Vec2::ZERO;
    body.clear_support();

    world.player.charges -= 1;
    world.teleport = TeleportState::Normal;
    log::debug!("Teleported {:?} -> {:?}", from, to);
    world.events.push(GameEvent::Teleported { from, to });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Oscillator;
    use proptest::prelude::*;

    fn laser(x: f32, y: f32, hollow: bool) -> Laser {
        Laser::new(Oscillator::fixed(Vec2::new(x, y)), 4.0, hollow)
    }

    #[test]
    fn test_ground_point() {
        let ray = PointerRay {
            origin: Vec3::new(1.0, 2.0, 10.0),
            direction: Vec3::new(0.0, 0.0, -1.0),
        };
        assert_eq!(ray.ground_point(), Some(Vec2::new(1.0, 2.0)));

        let away = PointerRay {
            origin: Vec3::new(1.0, 2.0, 10.0),
            direction: Vec3::Z,
        };
        assert_eq!(away.ground_point(), None);

        let parallel = PointerRay {
            origin: Vec3::new(1.0, 2.0, 10.0),
            direction: Vec3::X,
        };
        assert_eq!(parallel.ground_point(), None);

        let garbage = PointerRay {
            origin: Vec3::new(f32::NAN, 2.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(garbage.ground_point(), None);
    }

    #[test]
    fn test_clamp_keeps_near_targets() {
        let raw = Vec2::new(3.0, 4.0);
        assert_eq!(clamp_to_range(Vec2::ZERO, raw, 12.0), raw);
        assert_eq!(clamp_to_range(raw, raw, 12.0), raw);
    }

    #[test]
    fn test_clamp_far_target() {
        let t = clamp_to_range(Vec2::ZERO, Vec2::new(20.0, 0.0), 12.0);
        assert!((t.x - 12.0).abs() < 1e-4);
        assert_eq!(t.y, 0.0);
    }

    #[test]
    fn test_solid_laser_blocks_hollow_does_not() {
        let from = Vec2::new(0.0, 2.0);
        let to = Vec2::new(10.0, 2.0);
        assert!(sight_blocked(from, to, &[laser(5.0, 2.0, false)]));
        assert!(!sight_blocked(from, to, &[laser(5.0, 2.0, true)]));
        // Laser past the target is irrelevant
        assert!(!sight_blocked(from, to, &[laser(15.0, 2.0, false)]));
        // Laser behind the player is irrelevant
        assert!(!sight_blocked(from, to, &[laser(-3.0, 2.0, false)]));
    }

    #[test]
    fn test_landing_snaps_out_of_platform() {
        let obstacles = vec![Obstacle::platform(Vec2::new(10.0, 0.0), Vec2::new(4.0, 1.0))];
        let up = landing_position(Vec2::new(10.0, 0.2), &obstacles, 1.0);
        assert!((up.y - 1.1).abs() < 1e-5);
        let down = landing_position(Vec2::new(10.0, 0.2), &obstacles, -1.0);
        assert!((down.y + 1.1).abs() < 1e-5);
        let clear = landing_position(Vec2::new(10.0, 5.0), &obstacles, 1.0);
        assert_eq!(clear, Vec2::new(10.0, 5.0));
    }

    proptest! {
        #[test]
        fn clamped_target_always_in_range(
            px in -100.0f32..100.0, py in -40.0f32..40.0,
            tx in -500.0f32..500.0, ty in -500.0f32..500.0,
        ) {
            let origin = Vec2::new(px, py);
            let target = clamp_to_range(origin, Vec2::new(tx, ty), TELEPORT_RANGE);
            prop_assert!(target.distance(origin) <= TELEPORT_RANGE);
        }

        #[test]
        fn crossing_solid_laser_is_blocked(
            lx in 2.0f32..10.0, ly in -1.0f32..1.0, reach in 11.0f32..12.0,
        ) {
            let from = Vec2::ZERO;
            let to = Vec2::new(reach, 0.0);
            prop_assert!(sight_blocked(from, to, &[laser(lx, ly, false)]));
            prop_assert!(!sight_blocked(from, to, &[laser(lx, ly, true)]));
        }
    }
}
