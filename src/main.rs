//! Tile Bros headless driver
//!
//! Loads a level (or the built-in one), holds right and jump until the
//! session ends, and prints the final snapshot as JSON.
//!
//! Usage: `tile-bros [level.json] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
use tile_bros::sim::{ControlIntent, GamePhase, Simulation, StepEvent};
#[cfg(not(target_arch = "wasm32"))]
use tile_bros::{Level, Tuning};

/// Give up after this many steps if the session is still running
#[cfg(not(target_arch = "wasm32"))]
const MAX_STEPS: u64 = 10_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Tile Bros (headless) starting...");

    let mut args = std::env::args().skip(1);
    let level = match args.next() {
        Some(path) => Level::load_json_or_default(&std::fs::read_to_string(&path)?),
        None => Level::fallback(),
    };
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(&path)?).unwrap_or_else(|err| {
            log::warn!("Ignoring tuning file {}: {}", path, err);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    let mut sim = Simulation::new(tuning);
    log::info!("{}", sim.load(level).level().message());

    let intent = ControlIntent {
        move_right: true,
        jump: true,
        ..Default::default()
    };
    let mut steps = 0;
    while sim.phase() == GamePhase::Active && steps < MAX_STEPS {
        for event in &sim.advance(&intent) {
            match event {
                StepEvent::LevelWon | StepEvent::PlayerDied { .. } => log::info!("{:?}", event),
                _ => {}
            }
        }
        steps += 1;
    }
    if sim.phase() == GamePhase::Active {
        log::warn!("Still running after {} steps", MAX_STEPS);
    }

    if let Some(session) = sim.session() {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web; there is no driver here
}
