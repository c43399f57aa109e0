//! Frame orchestrator
//!
//! Owns the live `World` and the level lifecycle. Every frame the world is
//! cloned, stepped, and only committed when the step succeeds. Death,
//! manual reset and level advance all rebuild the world from its
//! descriptor; nothing carries over between attempts.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::campaign::Campaign;
use crate::settings::Settings;
use crate::sim::{GameEvent, SimFault, TickInput, World, tick};
use crate::snapshot::RenderSnapshot;

pub struct Game {
    campaign: Campaign,
    settings: Settings,
    level_index: usize,
    /// `None` once the campaign is finished
    world: Option<World>,
    /// Events raised during the last `step`
    events: Vec<GameEvent>,
    /// The last step ended in a death and reload
    restarted: bool,
    /// The last step reached the exit
    advanced: bool,
}

impl Game {
    pub fn new(campaign: Campaign, settings: Settings) -> Self {
        let start = settings.start_level;
        let mut game = Self {
            campaign,
            settings,
            level_index: start,
            world: None,
            events: Vec::new(),
            restarted: false,
            advanced: false,
        };
        game.load_level(start);
        game
    }

    /// Replace the world with a fresh build of level `index`.
    ///
    /// An index past the end puts the game in its completed state.
    pub fn load_level(&mut self, index: usize) {
        self.level_index = index;
        match self.campaign.get(index) {
            Some(level) => {
                let seed = self.settings.seed.wrapping_add(index as u64);
                self.world = Some(World::from_level(level, &self.settings.physics, seed));
                log::info!("Level {} loaded: {}", index + 1, level.name);
                self.events.push(GameEvent::LevelLoaded {
                    index,
                    name: level.name.clone(),
                });
            }
            None => {
                self.world = None;
                log::info!("All {} levels completed", self.campaign.len());
                self.events.push(GameEvent::LevelCompleted);
            }
        }
    }

    /// Advance one displayed frame of `wall_dt` seconds.
    ///
    /// Returns the events raised during this frame.
    pub fn step(&mut self, input: &TickInput, wall_dt: f32) -> &[GameEvent] {
        self.events.clear();
        self.restarted = false;
        self.advanced = false;

        let Some(world) = &self.world else {
            return &self.events;
        };

        if input.reset {
            log::info!("Level {} reset", self.level_index + 1);
            self.load_level(self.level_index);
            return &self.events;
        }

        let mut next = world.clone();
        let result = panic::catch_unwind(AssertUnwindSafe(|| tick(&mut next, input, wall_dt)))
            .unwrap_or_else(|payload| Err(SimFault::Panicked(panic_message(payload.as_ref()))));

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(fault) => {
                log::error!("Frame dropped: {}", fault);
                self.events.push(GameEvent::SimulationFault {
                    message: fault.to_string(),
                });
                return &self.events;
            }
        };

        self.events.append(&mut next.events);

        if let Some(cause) = outcome.death {
            log::info!("Player died ({:?}), restarting level {}", cause, self.level_index + 1);
            self.events.push(GameEvent::GameOverRestart {
                index: self.level_index,
                cause,
            });
            self.restarted = true;
            self.load_level(self.level_index);
        } else if outcome.reached_exit {
            log::info!("Level {} cleared", self.level_index + 1);
            self.advanced = true;
            self.load_level(self.level_index + 1);
        } else {
            self.world = Some(next);
        }

        &self.events
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn is_completed(&self) -> bool {
        self.world.is_none()
    }

    pub fn restarted(&self) -> bool {
        self.restarted
    }

    pub fn advanced(&self) -> bool {
        self.advanced
    }

    /// Everything the presentation layer needs for this frame
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(self)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::level::LevelDescriptor;
    use crate::sim::{DeathCause, ObstacleKind, PointerRay};
    use glam::Vec2;

    const DT: f32 = 1.0 / 64.0;

    fn flat(name: &str) -> LevelDescriptor {
        LevelDescriptor::new(name, Vec2::new(0.0, 1.0), Vec2::new(100.0, 1.0))
            .platform(0.0, 0.0, 60.0, 1.0)
    }

    fn game_with(levels: Vec<LevelDescriptor>) -> Game {
        Game::new(Campaign::new(levels).unwrap(), Settings::default())
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_new_game_loads_first_level() {
        let game = Game::new(Campaign::builtin(), Settings::default());
        assert_eq!(game.level_index(), 0);
        assert!(!game.is_completed());
        assert!(matches!(
            game.events(),
            [GameEvent::LevelLoaded { index: 0, .. }]
        ));
    }

    #[test]
    fn test_spawn_on_platform_is_grounded_after_one_step() {
        let mut game = game_with(vec![flat("spawn")]);
        game.step(&idle(), DT);
        let body = &game.world().unwrap().player.body;
        assert!(body.on_ground);
        assert_eq!(body.pos.y, 1.0);
        assert_eq!(body.foot_y(1.0), 0.5);
    }

    #[test]
    fn test_teleport_far_target_is_clamped() {
        let mut game = game_with(vec![flat("blink").orb(1, 1.0, 1.0)]);
        game.step(&idle(), DT);
        let before = game.world().unwrap().player.body.pos;
        assert_eq!(game.world().unwrap().player.charges, 1);

        game.step(
            &TickInput {
                toggle_aim: true,
                ..idle()
            },
            DT,
        );
        assert!(game.world().unwrap().is_frozen());

        let events = game
            .step(
                &TickInput {
                    confirm_teleport: true,
                    pointer: Some(PointerRay::at(before + Vec2::new(20.0, 0.0))),
                    ..idle()
                },
                DT,
            )
            .to_vec();
        let world = game.world().unwrap();
        let after = world.player.body.pos;
        assert!(after.distance(before) <= TELEPORT_RANGE + 1e-4);
        assert!(after.x > before.x + 11.9);
        assert_eq!(world.player.charges, 0);
        assert!(!world.is_frozen());
        assert!(events.iter().any(|e| matches!(e, GameEvent::Teleported { .. })));
    }

    #[test]
    fn test_falling_out_reloads_level() {
        let level = LevelDescriptor::new("ledge", Vec2::new(0.0, 1.0), Vec2::new(100.0, 1.0))
            .platform(0.0, 0.0, 4.0, 1.0)
            .orb(1, 0.0, 1.0);
        let mut game = game_with(vec![level]);
        let walk = TickInput {
            move_right: true,
            ..idle()
        };

        game.step(&walk, DT);
        assert_eq!(game.world().unwrap().player.charges, 1);

        let mut died = false;
        for _ in 0..600 {
            let events = game.step(&walk, DT).to_vec();
            if game.restarted() {
                assert!(events.contains(&GameEvent::GameOverRestart {
                    index: 0,
                    cause: DeathCause::FellOut,
                }));
                assert!(events.iter().any(|e| matches!(e, GameEvent::LevelLoaded { index: 0, .. })));
                died = true;
                break;
            }
        }
        assert!(died);

        let world = game.world().unwrap();
        assert_eq!(world.player.charges, 0);
        assert_eq!(world.player.orbs, 0);
        assert_eq!(world.player.body.pos, Vec2::new(0.0, 1.0));
        assert_eq!(world.orbs.len(), 1);
        assert!(!world.game_over);
    }

    #[test]
    fn test_fireballs_spawn_one_interval_apart() {
        let level = flat("shooter").shooter(50.0, 10.0, 1.0, 0.0, 0.5);
        let mut game = game_with(vec![level]);
        for _ in 0..100 {
            game.step(&idle(), DT);
        }
        let spawned: Vec<f32> = game
            .world()
            .unwrap()
            .fireballs
            .iter()
            .map(|f| f.spawned_at)
            .collect();
        assert_eq!(spawned.len(), 3);
        for pair in spawned.windows(2) {
            assert_eq!(pair[1] - pair[0], 0.5);
        }
    }

    #[test]
    fn test_gate_tracks_button_every_frame() {
        let level = flat("gate")
            .button(3.0, 0.6, 1)
            .gate(20.0, 3.0, 1.0, 6.0, 1);
        let mut game = game_with(vec![level]);
        let walk = TickInput {
            move_right: true,
            ..idle()
        };

        let (mut seen_pressed, mut seen_released_after) = (false, false);
        for _ in 0..90 {
            game.step(&walk, DT);
            let world = game.world().unwrap();
            let pressed = world.buttons[0].pressed;
            let ObstacleKind::Gate { sunk, .. } = world.obstacles[1].kind else {
                panic!("expected gate");
            };
            assert_eq!(sunk, pressed);
            seen_released_after |= seen_pressed && !pressed;
            seen_pressed |= pressed;
        }
        assert!(seen_pressed);
        assert!(seen_released_after);
    }

    #[test]
    fn test_exit_advances_then_completes() {
        let first = LevelDescriptor::new("one", Vec2::new(0.0, 1.0), Vec2::new(0.0, 1.0))
            .platform(0.0, 0.0, 4.0, 1.0);
        let second = first.clone();
        let mut game = game_with(vec![first, second]);

        let events = game.step(&idle(), DT).to_vec();
        assert!(game.advanced());
        assert_eq!(game.level_index(), 1);
        assert!(matches!(events[..], [GameEvent::LevelLoaded { index: 1, .. }]));

        let events = game.step(&idle(), DT).to_vec();
        assert!(game.is_completed());
        assert_eq!(events, vec![GameEvent::LevelCompleted]);
        assert!(!game.snapshot().player.visible);

        // No further updates once completed
        assert!(game.step(&idle(), DT).is_empty());
        assert!(game.world().is_none());
    }

    #[test]
    fn test_reset_rebuilds_level() {
        let mut game = game_with(vec![flat("reset").orb(1, 1.0, 1.0)]);
        game.step(&idle(), DT);
        assert_eq!(game.world().unwrap().player.charges, 1);

        let events = game
            .step(
                &TickInput {
                    reset: true,
                    ..idle()
                },
                DT,
            )
            .to_vec();
        assert!(matches!(events[..], [GameEvent::LevelLoaded { index: 0, .. }]));
        assert_eq!(game.world().unwrap().player.charges, 0);
        assert_eq!(game.world().unwrap().sim_time, 0.0);
    }

    #[test]
    fn test_fault_keeps_previous_world() {
        let mut game = game_with(vec![flat("fault")]);
        game.step(&idle(), DT);
        let before = game.world().unwrap().clone();

        let events = game.step(&idle(), -1.0).to_vec();
        assert!(matches!(events[..], [GameEvent::SimulationFault { .. }]));
        let after = game.world().unwrap();
        assert_eq!(after.sim_time, before.sim_time);
        assert_eq!(after.player, before.player);

        // A frame that blows up mid-step is dropped too
        if let Some(world) = game.world.as_mut() {
            world.player.body.vel.x = f32::INFINITY;
        }
        let events = game.step(&idle(), DT).to_vec();
        assert!(matches!(events[..], [GameEvent::SimulationFault { .. }]));
        assert_eq!(game.world().unwrap().sim_time, before.sim_time);

        // And the game keeps running after a fault
        if let Some(world) = game.world.as_mut() {
            world.player.body.vel.x = 0.0;
        }
        assert!(game.step(&idle(), DT).is_empty());
        assert!(game.world().unwrap().sim_time > before.sim_time);
    }

    #[test]
    fn test_panic_message() {
        let payload = panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom 1");
        let payload = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static");
    }

    #[test]
    fn test_settings_and_campaign_accessors() {
        let settings = Settings {
            seed: 40,
            ..Settings::default()
        };
        let game = Game::new(Campaign::builtin(), settings);
        assert_eq!(game.settings().seed, 40);
        assert_eq!(game.campaign().len(), 10);
    }
}
