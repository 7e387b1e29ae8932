//! # Headless Skirmish
//!
//! Two fleets and an asteroid belt, stepped at a fixed 60 Hz without a
//! window. Destroyed ships leave drifting wrecks. Prints the frame
//! statistics summary at the end.
//!
//! ```text
//! skirmish_headless [CONFIG.toml] [FRAMES]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::time::Duration;

use skirmish::{Asteroid, GameLoop, GameLoopConfig, Ship, SimError, SimEvent, SimResult, Simulation};
use skirmish_core::{CollisionType, SimConfig, Vec2};
use tracing_subscriber::EnvFilter;

const DEFAULT_FRAMES: u64 = 600;
const FLEET_SIZE: u16 = 64;
const FIXED_STEP: Duration = Duration::from_micros(16_666);
const WRECK_RADIUS: f32 = 12.0;

fn main() -> SimResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| SimError::Logging(e.to_string()))?;

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let frames = args
        .next()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    let loop_config = GameLoopConfig::from(&config);
    let mut simulation = Simulation::new(config)?;
    spawn_fleets(&mut simulation)?;
    let events = simulation.events();

    tracing::info!(frames, "skirmish starting");
    let mut game_loop = GameLoop::new(simulation, loop_config);
    let mut destroyed = 0u64;

    for _ in 0..frames {
        game_loop.tick_with(FIXED_STEP)?;
        for event in events.drain() {
            if let SimEvent::EntityRemoved { id } = event {
                destroyed += 1;
                tracing::debug!(id = id.raw(), "ship destroyed");
            }
        }
    }

    let survivors = game_loop
        .simulation()
        .actors()
        .filter(|(_, actor)| actor.as_ship().is_some())
        .count();
    tracing::info!(destroyed, survivors, "skirmish finished");
    game_loop.stats().print_summary();
    Ok(())
}

fn spawn_fleets(simulation: &mut Simulation) -> SimResult<()> {
    for i in 0..FLEET_SIZE {
        let row = f32::from(i / 8);
        let col = f32::from(i % 8);

        simulation.add_actor(Ship::new(
            CollisionType::TEAM_PLAYER,
            Vec2::new(-1200.0 + col * 60.0, row * 60.0),
            Vec2::new(40.0, 0.0),
        )
        .leaving_wreck(WRECK_RADIUS))?;
        simulation.add_actor(Ship::new(
            CollisionType::TEAM_ENEMY,
            Vec2::new(1200.0 - col * 60.0, row * 60.0),
            Vec2::new(-40.0, 0.0),
        )
        .leaving_wreck(WRECK_RADIUS))?;
    }

    for i in 0..16u16 {
        let y = f32::from(i) * 35.0 - 100.0;
        simulation.add_actor(Asteroid::new(Vec2::new(0.0, y), Vec2::new(0.0, 5.0), 20.0))?;
    }
    Ok(())
}
