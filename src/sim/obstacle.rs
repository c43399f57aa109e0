//! Solid obstacles: everything a body can stand on
//!
//! One closed set of kinds sharing a center and a world-space box. Boxes are
//! built once at load and only ever translated afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::hazard::Oscillator;
use crate::consts::*;

/// Kind-specific obstacle state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Platform,
    /// Launches the player on contact
    JumpPad,
    /// Sinks out of the way while its button is pressed
    Gate { id: u32, rest_y: f32, sunk: bool },
    /// Crumbles after supporting the player for `FRAGILE_DECAY_TIME`
    Fragile {
        decay: f32,
        collapsed: bool,
        /// Cosmetic shake offset, never applied to the box
        jitter: f32,
    },
    /// Oscillates about its origin and carries whatever rests on it
    Moving { motion: Oscillator },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    pub aabb: Aabb,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(pos: Vec2, size: Vec2, kind: ObstacleKind) -> Self {
        Self {
            pos,
            size,
            aabb: Aabb::from_center_2d(pos, size),
            kind,
        }
    }

    pub fn platform(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos, size, ObstacleKind::Platform)
    }

    pub fn jump_pad(pos: Vec2, width: f32) -> Self {
        Self::new(pos, Vec2::new(width, JUMP_PAD_HEIGHT), ObstacleKind::JumpPad)
    }

    pub fn gate(pos: Vec2, size: Vec2, id: u32) -> Self {
        Self::new(
            pos,
            size,
            ObstacleKind::Gate {
                id,
                rest_y: pos.y,
                sunk: false,
            },
        )
    }

    pub fn fragile(pos: Vec2, size: Vec2) -> Self {
        Self::new(
            pos,
            size,
            ObstacleKind::Fragile {
                decay: 0.0,
                collapsed: false,
                jitter: 0.0,
            },
        )
    }

    pub fn moving(size: Vec2, motion: Oscillator) -> Self {
        Self::new(motion.origin, size, ObstacleKind::Moving { motion })
    }

    /// Box used for collision, or `None` once the obstacle has crumbled
    pub fn collider(&self) -> Option<&Aabb> {
        match self.kind {
            ObstacleKind::Fragile { collapsed: true, .. } => None,
            _ => Some(&self.aabb),
        }
    }

    pub fn is_jump_pad(&self) -> bool {
        matches!(self.kind, ObstacleKind::JumpPad)
    }

    /// Whether the obstacle should still be drawn
    pub fn is_visible(&self) -> bool {
        self.collider().is_some()
    }

    /// Move center and box together by `delta`
    pub fn shift(&mut self, delta: Vec2) {
        self.pos += delta;
        self.aabb.translate(delta.extend(0.0));
    }

    /// Put a gate into the sunk or rest position; no-op if already there
    pub fn set_gate_open(&mut self, open: bool) -> bool {
        let target = match &mut self.kind {
            ObstacleKind::Gate { rest_y, sunk, .. } => {
                if *sunk == open {
                    return false;
                }
                *sunk = open;
                if open { GATE_SUNK_Y } else { *rest_y }
            }
            _ => return false,
        };
        let dy = target - self.pos.y;
        self.shift(Vec2::new(0.0, dy));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapsed_fragile_has_no_collider() {
        let mut p = Obstacle::fragile(Vec2::ZERO, Vec2::new(3.0, 1.0));
        assert!(p.collider().is_some());
        if let ObstacleKind::Fragile { collapsed, .. } = &mut p.kind {
            *collapsed = true;
        }
        assert!(p.collider().is_none());
        assert!(!p.is_visible());
    }

    #[test]
    fn test_gate_sink_and_restore() {
        let mut gate = Obstacle::gate(Vec2::new(12.0, 3.0), Vec2::new(1.0, 6.0), 99);
        assert!(gate.set_gate_open(true));
        assert_eq!(gate.pos.y, GATE_SUNK_Y);
        assert_eq!(gate.aabb.top(), GATE_SUNK_Y + 3.0);

        // Re-applying the same state does nothing
        assert!(!gate.set_gate_open(true));
        assert_eq!(gate.pos.y, GATE_SUNK_Y);

        assert!(gate.set_gate_open(false));
        assert_eq!(gate.pos.y, 3.0);
        assert_eq!(gate.aabb.top(), 6.0);
    }

    #[test]
    fn test_shift_keeps_box_in_sync() {
        let mut p = Obstacle::platform(Vec2::ZERO, Vec2::new(4.0, 1.0));
        p.shift(Vec2::new(1.5, -0.5));
        assert_eq!(p.aabb.center().truncate(), p.pos);
    }
}
