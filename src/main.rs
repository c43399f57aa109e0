//! Teleporty headless runner
//!
//! Plays the built-in campaign with a scripted input for a fixed number of
//! frames and logs what happens. Useful for soak-testing the simulation
//! without a renderer.
//!
//! Usage: `teleporty [settings.json] [frames]`

use teleporty::sim::{GameEvent, TickInput};
use teleporty::{Campaign, Game, Settings};

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 60 * 60;

fn main() {
    env_logger::init();
    log::info!("Teleporty (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_from(path),
        None => Settings::default(),
    };
    let frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let mut game = Game::new(Campaign::builtin(), settings);
    let (mut deaths, mut faults) = (0u32, 0u32);

    for frame in 0..frames {
        let input = scripted_input(frame);
        for event in game.step(&input, FRAME_DT) {
            match event {
                GameEvent::GameOverRestart { cause, .. } => {
                    deaths += 1;
                    log::debug!("Frame {}: died ({:?})", frame, cause);
                }
                GameEvent::SimulationFault { message } => {
                    faults += 1;
                    log::warn!("Frame {}: fault: {}", frame, message);
                }
                other => log::debug!("Frame {}: {:?}", frame, other),
            }
        }
        if game.is_completed() {
            log::info!("Campaign completed after {} frames", frame + 1);
            break;
        }
    }

    let snap = game.snapshot();
    println!(
        "level {}/{}  charges {}  deaths {}  faults {}  completed {}",
        snap.hud.level_number,
        snap.hud.level_count,
        snap.hud.charges,
        deaths,
        faults,
        snap.hud.completed
    );
}

/// Run right and hop every second
fn scripted_input(frame: u32) -> TickInput {
    TickInput {
        move_right: true,
        jump: frame % 60 == 0,
        ..TickInput::default()
    }
}
