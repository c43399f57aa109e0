//! Support resolution against obstacles
//!
//! A single pass decides whether a body is standing on something. Every
//! candidate whose box overlaps the body horizontally is tested against the
//! body's position and velocity from *before* the pass; each match snaps the
//! body, so when several candidates qualify the last one in iteration order
//! wins. Candidate order is obstacles in level order, then crates.
//!
//! The player is resolved before the crates, so crate candidates are the
//! crate boxes after this frame's integration but before their own snap.
//! A player standing on a falling-then-resnapped crate therefore ends the
//! frame up to one step of gravity (about 0.012 at 64 Hz) inside its top
//! face. The next pass lands it again; the order is fixed by the frame
//! pipeline and must stay player first.
//!
//! Only the support face is resolved. There is no side or ceiling response,
//! so fast horizontal entry can tunnel through thin walls.

use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::body::{Body, Support};
use super::obstacle::Obstacle;
use super::state::Crate;
use crate::consts::*;

/// One thing a body might land on
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub support: Support,
    pub aabb: Aabb,
    pub jump_pad: bool,
}

/// Outcome of a resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub on_ground: bool,
    /// What the body rests on, or the pad that launched it when `bounced`
    pub support: Option<Support>,
    /// Launched by a jump pad this pass
    pub bounced: bool,
}

/// Every obstacle that currently has a collider, in level order
pub fn obstacle_candidates(obstacles: &[Obstacle]) -> impl Iterator<Item = Candidate> + '_ {
    obstacles.iter().enumerate().filter_map(|(idx, o)| {
        o.collider().map(|aabb| Candidate {
            support: Support::Obstacle(idx),
            aabb: *aabb,
            jump_pad: o.is_jump_pad(),
        })
    })
}

/// Current crate boxes
pub fn crate_candidates(crates: &[Crate]) -> impl Iterator<Item = Candidate> + '_ {
    crates.iter().enumerate().map(|(idx, c)| Candidate {
        support: Support::Crate(idx),
        aabb: c.body.aabb(),
        jump_pad: false,
    })
}

/// Resolve `body` against `candidates` and store the result on the body.
///
/// `bounce_speed` enables jump pads for this body (player only); a bounce
/// overrides any resting contact found in the same pass.
pub fn resolve(
    body: &mut Body,
    candidates: impl IntoIterator<Item = Candidate>,
    gravity_sign: f32,
    bounce_speed: Option<f32>,
) -> Contact {
    let up = gravity_sign > 0.0;
    let foot = body.foot_y(gravity_sign);
    let vel_y = body.vel.y;
    let mut contact = Contact::default();
    let mut pad = None;

    for candidate in candidates {
        let b = &candidate.aabb;
        let overlaps_x = body.pos.x + body.half.x > b.min.x && body.pos.x - body.half.x < b.max.x;
        if !overlaps_x {
            continue;
        }

        let landing = if up {
            foot <= b.top() + LAND_TOLERANCE_ABOVE
                && foot >= b.top() - LAND_TOLERANCE_BELOW
                && vel_y <= LAND_MAX_SPEED
        } else {
            foot >= b.bottom() - LAND_TOLERANCE_ABOVE
                && foot <= b.bottom() + LAND_TOLERANCE_BELOW
                && vel_y >= -LAND_MAX_SPEED
        };
        if !landing {
            continue;
        }

        body.pos.y = if up {
            b.top() + body.half.y
        } else {
            b.bottom() - body.half.y
        };
        body.vel.y = 0.0;
        contact.on_ground = true;
        contact.support = Some(candidate.support);
        if candidate.jump_pad && bounce_speed.is_some() {
            contact.bounced = true;
            pad = Some(candidate.support);
        }
    }

    if let (true, Some(speed)) = (contact.bounced, bounce_speed) {
        body.vel.y = speed * gravity_sign;
        contact.on_ground = false;
        contact.support = pad;
    }

    body.on_ground = contact.on_ground;
    body.support = contact.support;
    contact
}
