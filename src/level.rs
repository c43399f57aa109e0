//! Level descriptors
//!
//! A level is static data: a spawn point, an exit zone and a list of entity
//! placements. Loading a descriptor builds a fresh `World` from scratch.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Axis;

/// Problems found while reading or validating level data
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level {level:?}: placement #{index} is invalid: {reason}")]
    InvalidPlacement {
        level: String,
        index: usize,
        reason: &'static str,
    },

    #[error("level {level:?}: {reason}")]
    InvalidLevel { level: String, reason: &'static str },

    #[error("campaign contains no levels")]
    EmptyCampaign,
}

/// Point the player must reach to finish the level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitZone {
    pub pos: Vec2,
    pub radius: f32,
}

impl ExitZone {
    pub fn contains(&self, p: Vec2) -> bool {
        p.distance(self.pos) < self.radius
    }
}

/// One entity placement. Sizes are full extents, positions are centers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Placement {
    Platform { x: f32, y: f32, w: f32, h: f32 },
    Fragile { x: f32, y: f32, w: f32, h: f32 },
    Moving {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        axis: Axis,
        range: f32,
        speed: f32,
        #[serde(default)]
        offset: f32,
    },
    JumpPad { x: f32, y: f32, size: f32 },
    Gate { x: f32, y: f32, w: f32, h: f32, id: u32 },
    Button { x: f32, y: f32, gate: u32 },
    Crate { x: f32, y: f32 },
    Orb { id: u32, x: f32, y: f32 },
    Laser {
        x: f32,
        y: f32,
        height: f32,
        #[serde(default)]
        axis: Axis,
        #[serde(default)]
        range: f32,
        #[serde(default)]
        speed: f32,
        #[serde(default)]
        offset: f32,
        #[serde(default)]
        hollow: bool,
    },
    Enemy {
        x: f32,
        y: f32,
        range: f32,
        speed: f32,
        #[serde(default)]
        offset: f32,
    },
    Inverter { x: f32, y: f32 },
    Shooter {
        x: f32,
        y: f32,
        dir_x: f32,
        dir_y: f32,
        interval: f32,
    },
}

impl Placement {
    fn check(&self) -> Result<(), &'static str> {
        let (values, sizes): (Vec<f32>, Vec<f32>) = match *self {
            Placement::Platform { x, y, w, h }
            | Placement::Fragile { x, y, w, h }
            | Placement::Gate { x, y, w, h, .. } => (vec![x, y], vec![w, h]),
            Placement::Moving {
                x,
                y,
                w,
                h,
                range,
                speed,
                offset,
                ..
            } => (vec![x, y, range, speed, offset], vec![w, h]),
            Placement::JumpPad { x, y, size } => (vec![x, y], vec![size]),
            Placement::Button { x, y, .. }
            | Placement::Crate { x, y }
            | Placement::Orb { x, y, .. }
            | Placement::Inverter { x, y } => (vec![x, y], vec![]),
            Placement::Laser {
                x,
                y,
                height,
                range,
                speed,
                offset,
                ..
            } => (vec![x, y, range, speed, offset], vec![height]),
            Placement::Enemy {
                x,
                y,
                range,
                speed,
                offset,
            } => (vec![x, y, range, speed, offset], vec![]),
            Placement::Shooter {
                x,
                y,
                dir_x,
                dir_y,
                interval,
            } => {
                if dir_x == 0.0 && dir_y == 0.0 {
                    return Err("shooter direction is zero");
                }
                if !(interval > 0.0) {
                    return Err("shooter interval must be positive");
                }
                (vec![x, y, dir_x, dir_y], vec![])
            }
        };

        if values.iter().chain(&sizes).any(|v| !v.is_finite()) {
            return Err("non-finite value");
        }
        if sizes.iter().any(|s| *s <= 0.0) {
            return Err("size must be positive");
        }
        Ok(())
    }
}

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub name: String,
    pub spawn: Vec2,
    pub exit: ExitZone,
    #[serde(default)]
    pub placements: Vec<Placement>,
}

impl LevelDescriptor {
    pub fn new(name: impl Into<String>, spawn: Vec2, exit: Vec2) -> Self {
        Self {
            name: name.into(),
            spawn,
            exit: ExitZone {
                pos: exit,
                radius: 2.0,
            },
            placements: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if !self.spawn.is_finite() || !self.exit.pos.is_finite() {
            return Err(LevelError::InvalidLevel {
                level: self.name.clone(),
                reason: "spawn or exit is not finite",
            });
        }
        if !(self.exit.radius > 0.0) {
            return Err(LevelError::InvalidLevel {
                level: self.name.clone(),
                reason: "exit radius must be positive",
            });
        }
        for (index, placement) in self.placements.iter().enumerate() {
            placement
                .check()
                .map_err(|reason| LevelError::InvalidPlacement {
                    level: self.name.clone(),
                    index,
                    reason,
                })?;
        }
        Ok(())
    }

    /// Gate ids with no button to open them
    pub fn unlinked_gates(&self) -> Vec<u32> {
        self.placements
            .iter()
            .filter_map(|p| match p {
                Placement::Gate { id, .. } => Some(*id),
                _ => None,
            })
            .filter(|id| {
                !self
                    .placements
                    .iter()
                    .any(|p| matches!(p, Placement::Button { gate, .. } if gate == id))
            })
            .collect()
    }

    fn with(mut self, placement: Placement) -> Self {
        self.placements.push(placement);
        self
    }

    // Builder helpers used by the built-in campaign

    pub fn platform(self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.with(Placement::Platform { x, y, w, h })
    }

    pub fn fragile(self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.with(Placement::Fragile { x, y, w, h })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn moving(
        self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        axis: Axis,
        range: f32,
        speed: f32,
        offset: f32,
    ) -> Self {
        self.with(Placement::Moving {
            x,
            y,
            w,
            h,
            axis,
            range,
            speed,
            offset,
        })
    }

    pub fn jump_pad(self, x: f32, y: f32, size: f32) -> Self {
        self.with(Placement::JumpPad { x, y, size })
    }

    pub fn gate(self, x: f32, y: f32, w: f32, h: f32, id: u32) -> Self {
        self.with(Placement::Gate { x, y, w, h, id })
    }

    pub fn button(self, x: f32, y: f32, gate: u32) -> Self {
        self.with(Placement::Button { x, y, gate })
    }

    pub fn crate_box(self, x: f32, y: f32) -> Self {
        self.with(Placement::Crate { x, y })
    }

    pub fn orb(self, id: u32, x: f32, y: f32) -> Self {
        self.with(Placement::Orb { id, x, y })
    }

    /// Fixed solid laser
    pub fn laser(self, x: f32, y: f32, height: f32) -> Self {
        self.with(Placement::Laser {
            x,
            y,
            height,
            axis: Axis::Static,
            range: 0.0,
            speed: 0.0,
            offset: 0.0,
            hollow: false,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn moving_laser(
        self,
        x: f32,
        y: f32,
        height: f32,
        axis: Axis,
        range: f32,
        speed: f32,
        offset: f32,
        hollow: bool,
    ) -> Self {
        self.with(Placement::Laser {
            x,
            y,
            height,
            axis,
            range,
            speed,
            offset,
            hollow,
        })
    }

    pub fn hollow_laser(self, x: f32, y: f32, height: f32) -> Self {
        self.moving_laser(x, y, height, Axis::Static, 0.0, 0.0, 0.0, true)
    }

    pub fn enemy(self, x: f32, y: f32, range: f32, speed: f32) -> Self {
        self.with(Placement::Enemy {
            x,
            y,
            range,
            speed,
            offset: 0.0,
        })
    }

    pub fn inverter(self, x: f32, y: f32) -> Self {
        self.with(Placement::Inverter { x, y })
    }

    pub fn shooter(self, x: f32, y: f32, dir_x: f32, dir_y: f32, interval: f32) -> Self {
        self.with(Placement::Shooter {
            x,
            y,
            dir_x,
            dir_y,
            interval,
        })
    }
}
