//! Gravity inverters
//!
//! Touching an inverter flips the global gravity sign and the player's
//! vertical orientation. A cooldown keeps a player standing on the trigger
//! from flipping back and forth every frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, World};
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravityInverter {
    pub pos: Vec2,
}

/// Check proximity to every inverter, then decay the cooldown.
pub fn update(world: &mut World, dt: f32) {
    let player = &mut world.player;
    for inverter in &world.inverters {
        if player.body.pos.distance(inverter.pos) >= INVERTER_RADIUS {
            continue;
        }
        if player.inverter_cooldown > 0.0 {
            continue;
        }
        world.gravity_sign = -world.gravity_sign;
        player.flipped = !player.flipped;
        player.inverter_cooldown = INVERTER_COOLDOWN;
        log::debug!("Gravity flipped to {}", world.gravity_sign);
        world.events.push(GameEvent::GravityFlipped {
            sign: world.gravity_sign,
        });
    }

    if player.inverter_cooldown > 0.0 {
        player.inverter_cooldown = (player.inverter_cooldown - dt).max(0.0);
    }
}
