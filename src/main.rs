//! Barrel Climb headless runner
//!
//! Loads a level (or the stock one), plays a single run with the seeded
//! demo pilot and prints the final snapshot as JSON.
//!
//! Usage: `barrel-climb [LEVEL_FILE] [SEED]`

use barrel_climb::sim::{GameEvent, GameState, RunPhase, tick};
use barrel_climb::{DemoPilot, LevelConfig};

/// Hard stop in case the run never ends
const MAX_FRAMES: u32 = 100_000;

fn main() {
    env_logger::init();
    log::info!("Barrel Climb (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match LevelConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => {
            log::info!("No level file given, using the stock level");
            LevelConfig::default()
        }
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    log::info!("Demo pilot seed: {seed}");

    let mut state = GameState::new(config);
    let mut pilot = DemoPilot::new(seed);

    for _ in 0..MAX_FRAMES {
        let input = pilot.next_input(&state.snapshot());
        for event in tick(&mut state, &input) {
            match event {
                GameEvent::QuitRequested => {
                    log::info!("Quit requested");
                    return;
                }
                GameEvent::RunEnded { outcome, score } => {
                    log::info!("Outcome: {outcome:?}, final score {score}");
                }
                other => log::debug!("{other:?}"),
            }
        }
        if state.phase == RunPhase::GameOver {
            break;
        }
    }

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode snapshot: {e}"),
    }
}
