//! Level sequence
//!
//! The built-in campaign is ten levels that introduce one mechanic at a
//! time: blink basics, lasers, jump pads, enemies, moving platforms, hollow
//! lasers, crate puzzles, fragile platforms, gravity inverters, and a final
//! level mixing them.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::level::{LevelDescriptor, LevelError};
use crate::sim::Axis;

/// Ordered list of levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    levels: Vec<LevelDescriptor>,
}

const SPAWN: Vec2 = Vec2::new(0.0, 2.0);

impl Campaign {
    /// Build a campaign, rejecting empty or invalid level lists
    pub fn new(levels: Vec<LevelDescriptor>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::EmptyCampaign);
        }
        for level in &levels {
            level.validate()?;
        }
        Ok(Self { levels })
    }

    /// Parse a JSON array of level descriptors
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels: Vec<LevelDescriptor> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDescriptor> {
        self.levels.get(index)
    }

    pub fn levels(&self) -> &[LevelDescriptor] {
        &self.levels
    }

    /// The shipped ten-level campaign
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                first_steps(),
                laser_field(),
                launch(),
                patrol(),
                moving_ground(),
                phase_walls(),
                crate_puzzle(),
                crumbling_path(),
                upside_down(),
                gauntlet(),
            ],
        }
    }
}

impl Default for Campaign {
    fn default() -> Self {
        Self::builtin()
    }
}

fn first_steps() -> LevelDescriptor {
    LevelDescriptor::new("First Steps", SPAWN, Vec2::new(40.0, 1.0))
        .platform(0.0, 0.0, 4.0, 1.0)
        .platform(10.0, 0.0, 4.0, 1.0)
        .orb(1, 4.0, 2.0)
        .platform(12.0, 10.0, 2.0, 10.0)
        .orb(2, 12.0, 5.0)
        .platform(26.0, 10.0, 2.0, 2.0)
        .orb(3, 18.0, 11.0)
        .orb(4, 22.0, 11.0)
        .platform(40.0, 0.0, 6.0, 1.0)
        .orb(5, 34.0, 5.0)
}

fn laser_field() -> LevelDescriptor {
    LevelDescriptor::new("Laser Field", SPAWN, Vec2::new(39.0, 21.0))
        .platform(0.0, 0.0, 6.0, 1.0)
        .orb(1, 4.0, 2.0)
        .laser(10.0, 2.0, 4.0)
        .laser(10.0, 4.0, 4.0)
        .platform(12.0, 0.0, 8.0, 1.0)
        .platform(26.0, 0.0, 10.0, 1.0)
        .orb(2, 18.0, 2.0)
        .moving_laser(18.0, 2.0, 8.0, Axis::X, 4.0, 2.0, 0.0, true)
        .platform(26.0, 20.0, 8.0, 1.0)
        .orb(3, 26.0, 10.0)
        .moving_laser(26.0, 10.0, 4.0, Axis::X, 2.0, 3.0, 0.0, false)
        .platform(39.0, 20.0, 8.0, 1.0)
        .orb(4, 35.0, 20.0)
}

fn launch() -> LevelDescriptor {
    LevelDescriptor::new("Launch", SPAWN, Vec2::new(55.0, 11.0))
        .platform(0.0, 0.0, 6.0, 1.0)
        .orb(5, 0.0, 3.0)
        .jump_pad(6.0, 0.5, 2.0)
        .laser(9.0, 6.0, 4.0)
        .platform(12.0, 11.0, 4.0, 1.0)
        .jump_pad(16.0, 11.5, 2.0)
        .moving_laser(12.0, 8.0, 3.0, Axis::X, 2.0, 1.5, 0.0, false)
        .laser(16.0, 14.0, 3.0)
        .platform(28.0, 18.0, 6.0, 1.0)
        .orb(2, 22.0, 16.0)
        .moving_laser(22.0, 14.0, 6.0, Axis::Y, 3.0, 2.0, 0.0, false)
        .jump_pad(32.0, 18.5, 2.0)
        .orb(3, 38.0, 28.0)
        .laser(36.0, 20.0, 4.0)
        .moving_laser(30.0, 8.0, 8.0, Axis::X, 4.0, 1.0, 0.0, false)
        .platform(55.0, 10.0, 6.0, 1.0)
        .laser(50.0, 12.0, 4.0)
}

fn patrol() -> LevelDescriptor {
    LevelDescriptor::new("Patrol", SPAWN, Vec2::new(55.0, 6.0))
        .platform(0.0, 0.0, 6.0, 1.0)
        .orb(0, 0.0, 3.0)
        .jump_pad(6.0, 0.5, 2.0)
        .platform(20.0, 0.0, 20.0, 1.0)
        .laser(15.0, 2.0, 4.0)
        .laser(25.0, 2.0, 4.0)
        .enemy(15.0, 1.5, 4.0, 2.0)
        .enemy(18.0, 1.5, 2.0, 3.5)
        .orb(1, 15.0, 4.0)
        .enemy(25.0, 1.5, 4.0, 2.5)
        .enemy(28.0, 1.5, 2.0, 4.0)
        .orb(2, 25.0, 4.0)
        .jump_pad(28.0, 0.6, 2.0)
        .platform(40.0, 5.0, 6.0, 1.0)
        .enemy(40.0, 6.5, 2.0, 3.0)
        .orb(3, 40.0, 9.0)
        .moving_laser(48.0, 5.0, 6.0, Axis::Y, 2.0, 3.0, 0.0, false)
        .platform(55.0, 5.0, 6.0, 1.0)
}

fn moving_ground() -> LevelDescriptor {
    LevelDescriptor::new("Moving Ground", SPAWN, Vec2::new(54.0, 11.0))
        .platform(0.0, 0.0, 6.0, 1.0)
        .moving(9.0, 0.0, 4.0, 1.0, Axis::X, 4.0, 1.5, 0.0)
        .orb(1, 9.0, 4.0)
        .moving_laser(14.0, 2.0, 6.0, Axis::Y, 3.0, 2.0, 0.0, false)
        .platform(18.0, 0.0, 4.0, 1.0)
        .enemy(18.0, 1.5, 2.0, 4.0)
        .jump_pad(18.0, 0.6, 2.0)
        .moving(26.0, 5.0, 4.0, 1.0, Axis::Y, 5.0, 1.0, 0.0)
        .orb(2, 26.0, 13.0)
        .platform(34.0, 10.0, 4.0, 1.0)
        .laser(39.0, 10.0, 4.0)
        .moving(44.0, 10.0, 4.0, 1.0, Axis::X, 5.0, 2.0, PI)
        .enemy(54.0, 11.0, 2.0, 2.0)
        .platform(54.0, 10.0, 4.0, 1.0)
}

fn phase_walls() -> LevelDescriptor {
    LevelDescriptor::new("Phase Walls", SPAWN, Vec2::new(35.0, 6.0))
        .platform(0.0, 0.0, 8.0, 1.0)
        .orb(1, 0.0, 3.0)
        .platform(10.0, 0.0, 6.0, 1.0)
        .hollow_laser(7.0, 3.0, 6.0)
        .platform(20.0, 0.0, 8.0, 1.0)
        .hollow_laser(18.0, 3.0, 6.0)
        .orb(2, 20.0, 3.0)
        .hollow_laser(22.0, 3.0, 6.0)
        .platform(35.0, 5.0, 8.0, 1.0)
        .moving_laser(30.0, 5.0, 8.0, Axis::X, 2.0, 1.0, 0.0, true)
}

fn crate_puzzle() -> LevelDescriptor {
    LevelDescriptor::new("Crate Puzzle", SPAWN, Vec2::new(20.0, 1.0))
        .platform(0.0, 0.0, 8.0, 1.0)
        .orb(1, 0.0, 3.0)
        .gate(12.0, 3.0, 1.0, 6.0, 99)
        .platform(5.0, 5.0, 8.0, 1.0)
        .button(6.0, 5.6, 99)
        .platform(-8.0, 6.0, 6.0, 1.0)
        .crate_box(-8.0, 9.0)
        .platform(20.0, 0.0, 6.0, 1.0)
}

fn crumbling_path() -> LevelDescriptor {
    LevelDescriptor::new("Crumbling Path", SPAWN, Vec2::new(34.0, 5.0))
        .platform(0.0, 0.0, 6.0, 1.0)
        .orb(1, 0.0, 3.0)
        .fragile(8.0, 0.0, 3.0, 1.0)
        .fragile(14.0, 2.0, 3.0, 1.0)
        .fragile(20.0, 0.0, 3.0, 1.0)
        .fragile(26.0, 4.0, 3.0, 1.0)
        .platform(34.0, 4.0, 6.0, 1.0)
}

fn upside_down() -> LevelDescriptor {
    LevelDescriptor::new("Upside Down", SPAWN, Vec2::new(30.0, 1.0))
        .platform(0.0, 0.0, 8.0, 1.0)
        .orb(1, 0.0, 3.0)
        .inverter(6.0, 2.0)
        .platform(15.0, 10.0, 10.0, 1.0)
        .orb(2, 15.0, 8.0)
        .inverter(22.0, 8.0)
        .platform(30.0, 0.0, 6.0, 1.0)
}

fn gauntlet() -> LevelDescriptor {
    LevelDescriptor::new("Gauntlet", SPAWN, Vec2::new(80.0, 1.0))
        .platform(0.0, 0.0, 6.0, 1.0)
        .orb(1, 0.0, 3.0)
        .platform(15.0, 0.0, 20.0, 1.0)
        .shooter(25.0, 5.0, -1.0, 0.0, 2.0)
        .shooter(5.0, 2.0, 1.0, 0.0, 2.5)
        .platform(30.0, 10.0, 10.0, 1.0)
        .gate(40.0, 13.0, 1.0, 6.0, 100)
        .crate_box(30.0, 15.0)
        .button(32.0, 10.6, 100)
        .inverter(42.0, 10.0)
        .platform(50.0, 20.0, 6.0, 1.0)
        .fragile(60.0, 20.0, 4.0, 1.0)
        .fragile(68.0, 18.0, 4.0, 1.0)
        .platform(80.0, 0.0, 8.0, 1.0)
        .shooter(85.0, 5.0, -1.0, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Placement;

    #[test]
    fn test_builtin_levels_are_valid() {
        let campaign = Campaign::builtin();
        assert_eq!(campaign.len(), 10);
        for level in campaign.levels() {
            level.validate().unwrap();
            assert_eq!(level.spawn, SPAWN);
            assert!(level.unlinked_gates().is_empty(), "{}", level.name);
        }
    }

    #[test]
    fn test_every_level_starts_on_ground() {
        // Spawn sits above a platform so the player lands on frame one
        for level in Campaign::builtin().levels() {
            let under = level.placements.iter().any(|p| match *p {
                Placement::Platform { x, y, w, h } => {
                    (level.spawn.x - x).abs() <= w / 2.0 && level.spawn.y > y + h / 2.0
                }
                _ => false,
            });
            assert!(under, "{}", level.name);
        }
    }

    #[test]
    fn test_empty_campaign_rejected() {
        assert!(matches!(Campaign::new(Vec::new()), Err(LevelError::EmptyCampaign)));
        assert!(matches!(Campaign::from_json("[]"), Err(LevelError::EmptyCampaign)));
    }

    #[test]
    fn test_json_campaign_roundtrip() {
        let campaign = Campaign::builtin();
        let json = serde_json::to_string(&campaign.levels).unwrap();
        let parsed = Campaign::from_json(&json).unwrap();
        assert_eq!(parsed, campaign);
    }
}
