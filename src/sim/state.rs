//! World state and core simulation types
//!
//! A `World` is everything live in one level attempt. It is built from a
//! level descriptor and thrown away wholesale on death, reset or advance.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::hazard::{Axis, Enemy, Fireball, FireballShooter, Laser, Oscillator};
use super::inverter::GravityInverter;
use super::obstacle::Obstacle;
use super::puzzle::Button;
use super::teleport::TeleportState;
use crate::consts::*;
use crate::level::{ExitZone, LevelDescriptor, Placement};
use crate::settings::PhysicsTuning;

/// Why an attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    FellOut,
    Enemy,
    Fireball,
    Laser,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A level was (re)built and is now live
    LevelLoaded { index: usize, name: String },
    /// The last level was finished
    LevelCompleted,
    /// The player died and the level restarted
    GameOverRestart { index: usize, cause: DeathCause },
    OrbCollected { id: u32, charges: u32 },
    Teleported { from: Vec2, to: Vec2 },
    GravityFlipped { sign: f32 },
    /// A frame failed; the previous state was kept
    SimulationFault { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Banked teleports
    pub charges: u32,
    /// Orbs collected this attempt
    pub orbs: u32,
    pub inverter_cooldown: f32,
    /// Drawn upside down (gravity inverted)
    pub flipped: bool,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            body: Body::new(spawn, Vec2::splat(PLAYER_SIZE)),
            charges: 0,
            orbs: 0,
            inverter_cooldown: 0.0,
            flipped: false,
        }
    }

    /// Box used against enemies, fireballs and lasers
    pub fn hazard_box(&self) -> super::Aabb {
        super::Aabb::from_center_2d(self.body.pos, Vec2::splat(PLAYER_HAZARD_SIZE))
    }
}

/// Pushable box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crate {
    pub body: Body,
}

impl Crate {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, Vec2::splat(CRATE_SIZE)),
        }
    }
}

/// Collectible that grants one teleport charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orb {
    pub id: u32,
    pub pos: Vec2,
}

/// Complete state of one level attempt
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: PhysicsTuning,
    /// +1 normal, -1 inverted
    pub gravity_sign: f32,
    /// Game time; stands still while aiming
    pub sim_time: f32,
    pub spawn: Vec2,
    pub player: Player,
    /// Everything standable, in level order (resolution order)
    pub obstacles: Vec<Obstacle>,
    pub crates: Vec<Crate>,
    pub buttons: Vec<Button>,
    pub lasers: Vec<Laser>,
    pub enemies: Vec<Enemy>,
    pub shooters: Vec<FireballShooter>,
    pub fireballs: Vec<Fireball>,
    pub inverters: Vec<GravityInverter>,
    pub orbs: Vec<Orb>,
    pub exit: ExitZone,
    pub teleport: TeleportState,
    pub game_over: bool,
    /// Events raised during the current step
    pub events: Vec<GameEvent>,
    /// Cosmetic randomness only
    pub rng: Pcg32,
}

impl World {
    /// Build a fresh world from level data
    pub fn from_level(level: &LevelDescriptor, tuning: &PhysicsTuning, seed: u64) -> Self {
        let mut world = Self {
            tuning: tuning.clone(),
            gravity_sign: 1.0,
            sim_time: 0.0,
            spawn: level.spawn,
            player: Player::new(level.spawn),
            obstacles: Vec::new(),
            crates: Vec::new(),
            buttons: Vec::new(),
            lasers: Vec::new(),
            enemies: Vec::new(),
            shooters: Vec::new(),
            fireballs: Vec::new(),
            inverters: Vec::new(),
            orbs: Vec::new(),
            exit: level.exit,
            teleport: TeleportState::Normal,
            game_over: false,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };

        for placement in &level.placements {
            world.place(placement);
        }

        for id in level.unlinked_gates() {
            log::warn!("Level {:?}: gate {} has no button and will stay shut", level.name, id);
        }

        world
    }

    fn place(&mut self, placement: &Placement) {
        match *placement {
            Placement::Platform { x, y, w, h } => {
                self.obstacles
                    .push(Obstacle::platform(Vec2::new(x, y), Vec2::new(w, h)));
            }
            Placement::Fragile { x, y, w, h } => {
                self.obstacles
                    .push(Obstacle::fragile(Vec2::new(x, y), Vec2::new(w, h)));
            }
            Placement::Moving {
                x,
                y,
                w,
                h,
                axis,
                range,
                speed,
                offset,
            } => {
                let motion = Oscillator {
                    origin: Vec2::new(x, y),
                    axis,
                    amplitude: range,
                    speed,
                    phase: offset,
                };
                self.obstacles.push(Obstacle::moving(Vec2::new(w, h), motion));
            }
            Placement::JumpPad { x, y, size } => {
                self.obstacles.push(Obstacle::jump_pad(Vec2::new(x, y), size));
            }
            Placement::Gate { x, y, w, h, id } => {
                self.obstacles
                    .push(Obstacle::gate(Vec2::new(x, y), Vec2::new(w, h), id));
            }
            Placement::Button { x, y, gate } => {
                self.buttons.push(Button::new(Vec2::new(x, y), gate));
            }
            Placement::Crate { x, y } => self.crates.push(Crate::new(Vec2::new(x, y))),
            Placement::Orb { id, x, y } => self.orbs.push(Orb {
                id,
                pos: Vec2::new(x, y),
            }),
            Placement::Laser {
                x,
                y,
                height,
                axis,
                range,
                speed,
                offset,
                hollow,
            } => {
                let motion = Oscillator {
                    origin: Vec2::new(x, y),
                    axis,
                    amplitude: if axis == Axis::Static { 0.0 } else { range },
                    speed,
                    phase: offset,
                };
                self.lasers.push(Laser::new(motion, height, hollow));
            }
            Placement::Enemy {
                x,
                y,
                range,
                speed,
                offset,
            } => {
                self.enemies
                    .push(Enemy::new(Vec2::new(x, y), range, speed, offset));
            }
            Placement::Inverter { x, y } => self.inverters.push(GravityInverter {
                pos: Vec2::new(x, y),
            }),
            Placement::Shooter {
                x,
                y,
                dir_x,
                dir_y,
                interval,
            } => {
                self.shooters.push(FireballShooter::new(
                    Vec2::new(x, y),
                    Vec2::new(dir_x, dir_y),
                    interval,
                ));
            }
        }
    }

    /// Game time is stopped while aiming a teleport
    pub fn is_frozen(&self) -> bool {
        self.teleport.is_aiming()
    }

    /// Whether every body holds finite values
    pub fn is_finite(&self) -> bool {
        self.player.body.is_finite()
            && self.crates.iter().all(|c| c.body.is_finite())
            && self.fireballs.iter().all(|f| f.pos.is_finite())
            && self
                .teleport
                .aim()
                .and_then(|aim| aim.target)
                .is_none_or(|target| target.is_finite())
            && self.sim_time.is_finite()
    }
}
