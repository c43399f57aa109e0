//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform concerns:
//! - One `tick` per displayed frame, with `dt` clamped
//! - Seeded RNG only (cosmetic use)
//! - Stable iteration order (level placement order)

pub mod aabb;
pub mod body;
pub mod hazard;
pub mod inverter;
pub mod obstacle;
pub mod puzzle;
pub mod resolve;
pub mod state;
pub mod teleport;
pub mod tick;

pub use aabb::Aabb;
pub use body::{Body, Support};
pub use hazard::{Axis, Enemy, Fireball, FireballShooter, Laser, Oscillator};
pub use inverter::GravityInverter;
pub use obstacle::{Obstacle, ObstacleKind};
pub use puzzle::Button;
pub use resolve::{Candidate, Contact, resolve};
pub use state::{Crate, DeathCause, GameEvent, Orb, Player, World};
pub use teleport::{Aim, PointerRay, TeleportState};
pub use tick::{SimFault, TickInput, TickOutcome, exit_direction, tick};
