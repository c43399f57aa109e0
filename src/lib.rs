//! Teleporty - a side-view platformer with a freeze-time blink teleport
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (physics, hazards, puzzles, teleport)
//! - `level`: Level descriptors (static entity placements)
//! - `campaign`: The built-in level sequence
//! - `game`: Frame orchestrator (level lifecycle, fault boundary, events)
//! - `snapshot`: Render snapshot handed to the presentation layer
//! - `settings`: Physics tuning and runtime configuration

pub mod campaign;
pub mod game;
pub mod level;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use campaign::Campaign;
pub use game::Game;
pub use level::{LevelDescriptor, LevelError, Placement};
pub use settings::{PhysicsTuning, Settings};
pub use snapshot::RenderSnapshot;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Downward acceleration (units/s²) before the gravity sign is applied
    pub const GRAVITY: f32 = 50.0;
    /// Horizontal control speed; acceleration is `MOVE_SPEED * MOVE_ACCEL_FACTOR`
    pub const MOVE_SPEED: f32 = 10.0;
    pub const MOVE_ACCEL_FACTOR: f32 = 5.0;
    pub const JUMP_SPEED: f32 = 20.0;
    /// Jump pads launch at this multiple of `JUMP_SPEED`
    pub const JUMP_PAD_MULTIPLIER: f32 = 1.5;
    pub const PLAYER_FRICTION: f32 = 8.0;
    pub const CRATE_FRICTION: f32 = 5.0;
    /// Fixed horizontal speed given to a crate the player walks into
    pub const CRATE_PUSH_SPEED: f32 = 5.0;
    /// Crates only get pushed when roughly level with the player
    pub const CRATE_PUSH_ALIGNMENT: f32 = 0.8;

    /// Maximum blink distance
    pub const TELEPORT_RANGE: f32 = 12.0;
    /// Falling past |y| > this ends the attempt
    pub const FALL_LIMIT: f32 = 40.0;
    /// Frame dt clamp to prevent physics explosions on hiccups
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player collision box (resolver, buttons, crate pushing)
    pub const PLAYER_SIZE: f32 = 1.0;
    /// Smaller player box used for hazard contact and teleport landing
    pub const PLAYER_HAZARD_SIZE: f32 = 0.8;
    pub const CRATE_SIZE: f32 = 1.0;

    /// Landing window below/above a support face
    pub const LAND_TOLERANCE_ABOVE: f32 = 0.2;
    pub const LAND_TOLERANCE_BELOW: f32 = 2.0;
    /// Vertical speed must not exceed this (towards the support) to land
    pub const LAND_MAX_SPEED: f32 = 0.2;

    pub const LASER_WIDTH: f32 = 0.3;
    /// Laser kill box is shrunk by this on every side
    pub const LASER_HIT_MARGIN: f32 = 0.2;
    pub const ENEMY_HIT_SIZE: f32 = 0.5;
    pub const FIREBALL_HIT_SIZE: f32 = 0.5;
    pub const ENEMY_BOB_FREQUENCY: f32 = 5.0;
    pub const ENEMY_BOB_HEIGHT: f32 = 0.5;
    pub const FIREBALL_SPEED: f32 = 8.0;
    pub const FIREBALL_LIFETIME: f32 = 5.0;

    pub const JUMP_PAD_HEIGHT: f32 = 0.5;
    pub const BUTTON_WIDTH: f32 = 1.5;
    pub const BUTTON_HEIGHT: f32 = 0.2;
    /// Y a gate is moved to while its button is held
    pub const GATE_SUNK_Y: f32 = -100.0;

    pub const FRAGILE_DECAY_TIME: f32 = 2.0;
    /// Cosmetic horizontal jitter per tick while a fragile platform decays
    pub const FRAGILE_JITTER: f32 = 0.1;

    pub const INVERTER_RADIUS: f32 = 1.0;
    pub const INVERTER_COOLDOWN: f32 = 1.0;
    pub const INVERTER_SPIN_SPEED: f32 = 2.0;

    pub const ORB_PICKUP_RADIUS: f32 = 1.5;
    pub const ORB_SPIN_SPEED: f32 = 2.0;

    /// Post-teleport correction places the player this far off the face
    pub const TELEPORT_LANDING_OFFSET: f32 = 0.6;
    /// Half-depth of laser boxes for the line-of-sight ray
    pub const SIGHT_Z_EXTENT: f32 = 1.0;
}

/// Angle (radians) of the vector from `from` to `to`, measured from +Y.
///
/// Used for the guide arrow, whose mesh points up at rotation 0.
#[inline]
pub fn guide_angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x) - std::f32::consts::FRAC_PI_2
}
