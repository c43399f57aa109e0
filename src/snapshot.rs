//! Render snapshot
//!
//! A flat, serializable view of one frame for the presentation layer. The
//! snapshot owns its data, so a renderer never holds references into a
//! world that may be rebuilt on the next step.

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::game::Game;
use crate::guide_angle;
use crate::sim::{ObstacleKind, World};

const ENEMY_SIZE: f32 = 0.8;
const SHOOTER_SIZE: f32 = 0.8;
const FIREBALL_SIZE: f32 = 0.6;
const ORB_SIZE: f32 = 1.0;
const INVERTER_SIZE: f32 = 1.2;

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SpriteKind {
    Platform,
    Fragile,
    MovingPlatform,
    JumpPad,
    Gate,
    Button { pressed: bool },
    Crate,
    Orb,
    Laser { hollow: bool },
    Enemy,
    Shooter,
    Fireball,
    Inverter,
    ExitFlag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Radians about the view axis
    pub rotation: f32,
    pub visible: bool,
}

impl Sprite {
    fn new(kind: SpriteKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            pos,
            size,
            rotation: 0.0,
            visible: true,
        }
    }

    fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    /// Drawn upside down
    pub flipped: bool,
    pub visible: bool,
}

/// Teleport marker and range ring while aiming
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AimView {
    pub target: Option<Vec2>,
    pub blocked: bool,
    /// Wall-clock phase for the marker pulse
    pub pulse: f32,
    pub range_center: Vec2,
    pub range: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub charges: u32,
    pub orbs: u32,
    pub level_index: usize,
    /// 1-based, for display
    pub level_number: usize,
    pub level_count: usize,
    pub frozen: bool,
    /// The last step ended in a death and the level restarted
    pub game_over: bool,
    /// The last step reached the exit
    pub level_advanced: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub player: PlayerView,
    pub sprites: Vec<Sprite>,
    pub aim: Option<AimView>,
    pub hud: Hud,
    /// Guide arrow rotation towards the exit
    pub guide_angle: Option<f32>,
}

impl RenderSnapshot {
    pub fn capture(game: &Game) -> Self {
        let level_index = game.level_index();
        let world = game.world();
        let hud = Hud {
            charges: world.map_or(0, |w| w.player.charges),
            orbs: world.map_or(0, |w| w.player.orbs),
            level_index,
            level_number: level_index + 1,
            level_count: game.campaign().len(),
            frozen: world.is_some_and(World::is_frozen),
            game_over: game.restarted(),
            level_advanced: game.advanced(),
            completed: game.is_completed(),
        };

        let Some(world) = world else {
            return Self {
                player: PlayerView {
                    pos: Vec2::ZERO,
                    flipped: false,
                    visible: false,
                },
                sprites: Vec::new(),
                aim: None,
                hud,
                guide_angle: None,
            };
        };

        let player = &world.player;
        let aim = world.teleport.aim().map(|aim| AimView {
            target: aim.target,
            blocked: aim.blocked,
            pulse: aim.pulse,
            range_center: player.body.pos,
            range: world.tuning.teleport_range,
        });

        Self {
            player: PlayerView {
                pos: player.body.pos,
                flipped: player.flipped,
                visible: true,
            },
            sprites: sprites(world),
            aim,
            hud,
            guide_angle: Some(guide_angle(player.body.pos, world.exit.pos)),
        }
    }
}

fn sprites(world: &World) -> Vec<Sprite> {
    let t = world.sim_time;
    let mut out = Vec::new();

    for obstacle in &world.obstacles {
        let (kind, pos) = match obstacle.kind {
            ObstacleKind::Platform => (SpriteKind::Platform, obstacle.pos),
            ObstacleKind::JumpPad => (SpriteKind::JumpPad, obstacle.pos),
            ObstacleKind::Gate { .. } => (SpriteKind::Gate, obstacle.pos),
            ObstacleKind::Fragile { jitter, .. } => {
                (SpriteKind::Fragile, obstacle.pos + Vec2::new(jitter, 0.0))
            }
            ObstacleKind::Moving { .. } => (SpriteKind::MovingPlatform, obstacle.pos),
        };
        let mut sprite = Sprite::new(kind, pos, obstacle.size);
        sprite.visible = obstacle.is_visible();
        out.push(sprite);
    }

    out.extend(world.buttons.iter().map(|b| {
        Sprite::new(
            SpriteKind::Button { pressed: b.pressed },
            b.pos,
            Vec2::new(BUTTON_WIDTH, BUTTON_HEIGHT),
        )
    }));
    out.extend(
        world
            .crates
            .iter()
            .map(|c| Sprite::new(SpriteKind::Crate, c.body.pos, Vec2::splat(CRATE_SIZE))),
    );
    out.extend(world.orbs.iter().map(|o| {
        Sprite::new(SpriteKind::Orb, o.pos, Vec2::splat(ORB_SIZE)).rotated(t * ORB_SPIN_SPEED)
    }));
    out.extend(world.lasers.iter().map(|l| {
        Sprite::new(
            SpriteKind::Laser { hollow: l.hollow },
            l.pos,
            Vec2::new(LASER_WIDTH, l.height),
        )
    }));
    out.extend(world.enemies.iter().map(|e| {
        Sprite::new(SpriteKind::Enemy, e.pos, Vec2::splat(ENEMY_SIZE))
            .rotated(std::f32::consts::FRAC_PI_4)
    }));
    out.extend(
        world
            .shooters
            .iter()
            .map(|s| Sprite::new(SpriteKind::Shooter, s.pos, Vec2::splat(SHOOTER_SIZE))),
    );
    out.extend(
        world
            .fireballs
            .iter()
            .map(|f| Sprite::new(SpriteKind::Fireball, f.pos, Vec2::splat(FIREBALL_SIZE))),
    );
    out.extend(world.inverters.iter().map(|i| {
        Sprite::new(SpriteKind::Inverter, i.pos, Vec2::splat(INVERTER_SIZE))
            .rotated(t * INVERTER_SPIN_SPEED)
    }));
    out.push(Sprite::new(
        SpriteKind::ExitFlag,
        world.exit.pos,
        Vec2::splat(world.exit.radius),
    ));

    out
}
