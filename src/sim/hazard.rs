//! Hazards and time-driven actors
//!
//! Lasers, enemies and moving platforms follow
//! `origin + sin(t * speed + phase) * amplitude` along one axis. Shooters
//! emit fireballs on a timer. Fragile platforms decay while stood on.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::body::Support;
use super::obstacle::ObstacleKind;
use super::state::World;
use crate::consts::*;

/// Oscillation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Static,
    X,
    Y,
}

/// Sinusoidal motion about an origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    pub origin: Vec2,
    pub axis: Axis,
    pub amplitude: f32,
    pub speed: f32,
    pub phase: f32,
}

impl Oscillator {
    pub fn fixed(origin: Vec2) -> Self {
        Self {
            origin,
            axis: Axis::Static,
            amplitude: 0.0,
            speed: 0.0,
            phase: 0.0,
        }
    }

    /// Offset from origin at simulation time `t`
    pub fn offset(&self, t: f32) -> f32 {
        (t * self.speed + self.phase).sin() * self.amplitude
    }

    /// Position at simulation time `t`
    pub fn position_at(&self, t: f32) -> Vec2 {
        match self.axis {
            Axis::Static => self.origin,
            Axis::X => self.origin + Vec2::new(self.offset(t), 0.0),
            Axis::Y => self.origin + Vec2::new(0.0, self.offset(t)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laser {
    pub motion: Oscillator,
    pub pos: Vec2,
    pub height: f32,
    /// Hollow lasers are drawn but never kill, block sight or support
    pub hollow: bool,
}

impl Laser {
    pub fn new(motion: Oscillator, height: f32, hollow: bool) -> Self {
        Self {
            pos: motion.origin,
            motion,
            height,
            hollow,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_2d(self.pos, Vec2::new(LASER_WIDTH, self.height))
    }

    pub fn is_solid(&self) -> bool {
        !self.hollow
    }
}

/// Patrolling enemy: sways along X and bobs on a fixed beat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub motion: Oscillator,
    pub pos: Vec2,
}

impl Enemy {
    pub fn new(origin: Vec2, range: f32, speed: f32, phase: f32) -> Self {
        Self {
            motion: Oscillator {
                origin,
                axis: Axis::X,
                amplitude: range,
                speed,
                phase,
            },
            pos: origin,
        }
    }

    pub fn position_at(&self, t: f32) -> Vec2 {
        let bob = (t * ENEMY_BOB_FREQUENCY).cos().abs() * ENEMY_BOB_HEIGHT;
        self.motion.position_at(t) + Vec2::new(0.0, bob)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_2d(self.pos, Vec2::splat(ENEMY_HIT_SIZE))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireballShooter {
    pub pos: Vec2,
    /// Unit firing direction
    pub dir: Vec2,
    pub interval: f32,
    pub timer: f32,
}

impl FireballShooter {
    pub fn new(pos: Vec2, dir: Vec2, interval: f32) -> Self {
        Self {
            pos,
            dir: dir.normalize_or_zero(),
            interval,
            timer: 0.0,
        }
    }

    /// Advance the timer; returns true when a shot is due.
    ///
    /// The overshoot carries into the next cycle so shots stay exactly
    /// `interval` apart under constant stepping.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.timer += dt;
        if dt > 0.0 && self.timer >= self.interval {
            self.timer -= self.interval;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fireball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left before it fizzles
    pub life: f32,
    /// Simulation time it was fired at
    pub spawned_at: f32,
}

impl Fireball {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_2d(self.pos, Vec2::splat(FIREBALL_HIT_SIZE))
    }
}

/// Advance every time-driven entity by game time `dt`.
///
/// `world.sim_time` must already include `dt`. Moving platforms carry their
/// riders here, before the riders integrate.
pub fn update(world: &mut World, dt: f32) {
    let t = world.sim_time;

    for laser in &mut world.lasers {
        laser.pos = laser.motion.position_at(t);
    }

    for enemy in &mut world.enemies {
        enemy.pos = enemy.position_at(t);
    }

    update_moving_platforms(world);

    for shooter in &mut world.shooters {
        if shooter.advance(dt) {
            world.fireballs.push(Fireball {
                pos: shooter.pos,
                vel: shooter.dir * FIREBALL_SPEED,
                life: FIREBALL_LIFETIME,
                spawned_at: t,
            });
        }
    }

    for fireball in &mut world.fireballs {
        fireball.life -= dt;
        fireball.pos += fireball.vel * dt;
    }
    world.fireballs.retain(|f| f.life > 0.0);

    update_fragile_platforms(world, dt);
}

fn update_moving_platforms(world: &mut World) {
    let t = world.sim_time;
    for (idx, obstacle) in world.obstacles.iter_mut().enumerate() {
        let ObstacleKind::Moving { motion } = &obstacle.kind else {
            continue;
        };
        let delta = motion.position_at(t) - obstacle.pos;
        if delta == Vec2::ZERO {
            continue;
        }
        obstacle.shift(delta);

        let support = Support::Obstacle(idx);
        if world.player.body.is_carried_by(support) {
            world.player.body.pos += delta;
        }
        for crate_ in &mut world.crates {
            if crate_.body.is_carried_by(support) {
                crate_.body.pos += delta;
            }
        }
    }
}

fn update_fragile_platforms(world: &mut World, dt: f32) {
    let Some(Support::Obstacle(idx)) = world.player.body.support else {
        return;
    };
    let Some(obstacle) = world.obstacles.get_mut(idx) else {
        return;
    };
    if let ObstacleKind::Fragile {
        decay,
        collapsed,
        jitter,
    } = &mut obstacle.kind
    {
        if *collapsed {
            return;
        }
        *decay += dt;
        if *decay < FRAGILE_DECAY_TIME {
            if dt > 0.0 {
                *jitter += world.rng.random_range(-0.5f32..0.5) * FRAGILE_JITTER;
            }
        } else {
            *collapsed = true;
            log::debug!("Fragile platform {} collapsed", idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_oscillator_axes() {
        let mut osc = Oscillator {
            origin: Vec2::new(10.0, 2.0),
            axis: Axis::X,
            amplitude: 4.0,
            speed: 1.0,
            phase: 0.0,
        };
        let p = osc.position_at(PI / 2.0);
        assert!((p.x - 14.0).abs() < 1e-5);
        assert_eq!(p.y, 2.0);

        osc.axis = Axis::Y;
        let p = osc.position_at(PI / 2.0);
        assert_eq!(p.x, 10.0);
        assert!((p.y - 6.0).abs() < 1e-5);

        osc.axis = Axis::Static;
        assert_eq!(osc.position_at(123.0), osc.origin);
    }

    #[test]
    fn test_enemy_bob_ignores_phase() {
        let a = Enemy::new(Vec2::ZERO, 2.0, 3.0, 0.0);
        let b = Enemy::new(Vec2::ZERO, 2.0, 3.0, 1.3);
        let t = 0.77;
        assert!((a.position_at(t).y - b.position_at(t).y).abs() < 1e-6);
        assert!(a.position_at(t).y >= 0.0 && a.position_at(t).y <= ENEMY_BOB_HEIGHT);
    }

    #[test]
    fn test_shooter_interval() {
        let mut shooter = FireballShooter::new(Vec2::ZERO, Vec2::new(-3.0, 0.0), 1.0);
        assert_eq!(shooter.dir, Vec2::new(-1.0, 0.0));
        let fired: Vec<bool> = (0..8).map(|_| shooter.advance(0.25)).collect();
        assert_eq!(fired, [false, false, false, true, false, false, false, true]);
        // Frozen time never fires
        assert!(!shooter.advance(0.0));
    }
}
