//! Per-frame simulation step
//!
//! Fixed update order:
//! intents -> hazards/actors -> body integration -> support resolution
//! (player, then crates) -> buttons/gates -> gravity inverters -> failure
//! check -> teleport aim -> orb pickup and exit check.
//!
//! While aiming, game `dt` is zero; only the aim itself sees wall-clock time.

use glam::Vec2;
use thiserror::Error;

use super::resolve::{crate_candidates, obstacle_candidates, resolve};
use super::state::{DeathCause, GameEvent, World};
use super::teleport::{self, PointerRay};
use super::{hazard, inverter, puzzle};
use crate::consts::*;

/// Control intent for a single frame. Edge-triggered fields are true only
/// on the frame the key or button went down.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Edge: jump
    pub jump: bool,
    /// Edge: enter/leave teleport aim
    pub toggle_aim: bool,
    /// Edge: teleport to the current aim target
    pub confirm_teleport: bool,
    /// Edge: restart the current level
    pub reset: bool,
    /// Pointer ray for aiming, if the pointer is over the view
    pub pointer: Option<PointerRay>,
}

/// What the step decided the orchestrator has to act on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    pub death: Option<DeathCause>,
    pub reached_exit: bool,
}

/// A frame that must not be committed
#[derive(Debug, Error)]
pub enum SimFault {
    #[error("frame delta {0} is not a finite non-negative number")]
    BadDelta(f32),

    #[error("simulation produced non-finite state at t={0}")]
    NonFinite(f32),

    #[error("simulation panicked: {0}")]
    Panicked(String),
}

/// Advance `world` by one frame of `wall_dt` seconds.
pub fn tick(world: &mut World, input: &TickInput, wall_dt: f32) -> Result<TickOutcome, SimFault> {
    if !wall_dt.is_finite() || wall_dt < 0.0 {
        return Err(SimFault::BadDelta(wall_dt));
    }

    handle_intents(world, input);

    let dt = if world.is_frozen() {
        0.0
    } else {
        wall_dt.min(world.tuning.max_frame_dt)
    };
    world.sim_time += dt;

    hazard::update(world, dt);
    integrate_bodies(world, input, dt);
    resolve_bodies(world);
    puzzle::update(world);
    inverter::update(world, dt);

    if let Some(cause) = check_failure(world) {
        world.game_over = true;
        return Ok(TickOutcome {
            death: Some(cause),
            reached_exit: false,
        });
    }

    if world.is_frozen() {
        teleport::update_aim(world, input.pointer.as_ref(), wall_dt);
    }

    collect_orbs(world);
    let reached_exit = world.exit.contains(world.player.body.pos);

    if !world.is_finite() {
        return Err(SimFault::NonFinite(world.sim_time));
    }

    Ok(TickOutcome {
        death: None,
        reached_exit,
    })
}

fn handle_intents(world: &mut World, input: &TickInput) {
    if input.toggle_aim {
        teleport::toggle(world);
    }
    if input.confirm_teleport && world.is_frozen() {
        // Aim against this frame's pointer before committing
        teleport::update_aim(world, input.pointer.as_ref(), 0.0);
        teleport::confirm(world);
    }
    if input.jump && !world.is_frozen() && world.player.body.on_ground {
        let jump = world.tuning.jump_speed * world.gravity_sign;
        let body = &mut world.player.body;
        body.vel.y = jump;
        body.clear_support();
    }
}

fn integrate_bodies(world: &mut World, input: &TickInput, dt: f32) {
    let tuning = &world.tuning;
    let sign = world.gravity_sign;

    for crate_ in &mut world.crates {
        crate_
            .body
            .integrate(tuning.gravity, sign, tuning.crate_friction, dt);
    }

    let mut control = 0.0;
    if !world.is_frozen() {
        if input.move_left {
            control -= tuning.move_accel();
        }
        if input.move_right {
            control += tuning.move_accel();
        }
    }

    let body = &mut world.player.body;
    body.apply_forces(tuning.gravity, sign, tuning.player_friction, control, dt);
    body.advance_x(dt);

    // Walking into a crate shoves it at a fixed speed
    let player_box = body.aabb();
    for crate_ in &mut world.crates {
        if !player_box.intersects(&crate_.body.aabb()) {
            continue;
        }
        let dx = crate_.body.pos.x - body.pos.x;
        if (crate_.body.pos.y - body.pos.y).abs() >= CRATE_PUSH_ALIGNMENT {
            continue;
        }
        if dx > 0.0 && body.vel.x > 0.0 {
            crate_.body.vel.x = tuning.crate_push_speed;
        } else if dx < 0.0 && body.vel.x < 0.0 {
            crate_.body.vel.x = -tuning.crate_push_speed;
        }
    }

    body.advance_y(dt);
}

fn resolve_bodies(world: &mut World) {
    let sign = world.gravity_sign;
    let bounce = Some(world.tuning.jump_speed * world.tuning.jump_pad_multiplier);

    let candidates = obstacle_candidates(&world.obstacles).chain(crate_candidates(&world.crates));
    resolve(&mut world.player.body, candidates, sign, bounce);

    for crate_ in &mut world.crates {
        resolve(&mut crate_.body, obstacle_candidates(&world.obstacles), sign, None);
    }
}

fn check_failure(world: &World) -> Option<DeathCause> {
    let player = &world.player;
    if player.body.pos.y.abs() > world.tuning.fall_limit {
        return Some(DeathCause::FellOut);
    }

    let hit = player.hazard_box();
    if world.enemies.iter().any(|e| hit.intersects(&e.aabb())) {
        return Some(DeathCause::Enemy);
    }
    if world.fireballs.iter().any(|f| hit.intersects(&f.aabb())) {
        return Some(DeathCause::Fireball);
    }
    let laser_hit = world
        .lasers
        .iter()
        .filter(|l| l.is_solid())
        .any(|l| hit.intersects(&l.aabb().expanded(-LASER_HIT_MARGIN)));
    if laser_hit {
        return Some(DeathCause::Laser);
    }
    None
}

fn collect_orbs(world: &mut World) {
    let pos = world.player.body.pos;
    let player = &mut world.player;
    let events = &mut world.events;
    world.orbs.retain(|orb| {
        if pos.distance(orb.pos) >= ORB_PICKUP_RADIUS {
            return true;
        }
        player.orbs += 1;
        player.charges += 1;
        log::debug!("Orb {} collected ({} charges)", orb.id, player.charges);
        events.push(GameEvent::OrbCollected {
            id: orb.id,
            charges: player.charges,
        });
        false
    });
}

/// Unit direction from the player towards the exit
pub fn exit_direction(world: &World) -> Vec2 {
    (world.exit.pos - world.player.body.pos).normalize_or_zero()
}
