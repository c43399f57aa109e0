//! Buttons and gates
//!
//! A button is held down by the player or any crate overlapping it. While
//! held, the gate with the matching id sinks out of reach; on release it
//! returns to its rest height. A gate nobody links to stays shut.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::obstacle::ObstacleKind;
use super::state::World;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub pos: Vec2,
    pub aabb: Aabb,
    pub gate_id: u32,
    pub pressed: bool,
}

impl Button {
    pub fn new(pos: Vec2, gate_id: u32) -> Self {
        Self {
            pos,
            aabb: Aabb::from_center_2d(pos, Vec2::new(BUTTON_WIDTH, BUTTON_HEIGHT)),
            gate_id,
            pressed: false,
        }
    }
}

/// Refresh button states from current body positions, then open or close gates.
pub fn update(world: &mut World) {
    let player_box = world.player.body.aabb();
    for button in &mut world.buttons {
        button.pressed = player_box.intersects(&button.aabb)
            || world
                .crates
                .iter()
                .any(|c| c.body.aabb().intersects(&button.aabb));
    }

    for obstacle in &mut world.obstacles {
        let ObstacleKind::Gate { id, .. } = obstacle.kind else {
            continue;
        };
        let Some(button) = world.buttons.iter().find(|b| b.gate_id == id) else {
            continue;
        };
        if obstacle.set_gate_open(button.pressed) {
            log::debug!(
                "Gate {} {}",
                id,
                if button.pressed { "opened" } else { "closed" }
            );
        }
    }
}
