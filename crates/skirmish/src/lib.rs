//! # SKIRMISH
//!
//! Fleet skirmish simulation on top of [`skirmish_core`].
//!
//! ## Entity Kinds
//!
//! | Kind       | Storage           | Solid | Notes                              |
//! |------------|-------------------|-------|------------------------------------|
//! | `Ship`     | registry (`Actor`)| yes   | targets nearest opposing ship      |
//! | `Asteroid` | registry (`Actor`)| yes   | neutral, drifts                    |
//! | `Bullet`   | pool (50k)        | yes   | 3 s lifetime, impact burst on hit  |
//! | `Particle` | pool (90k)        | no    | fades out, never collides          |
//!
//! ## Example
//!
//! ```rust,ignore
//! use skirmish::{Simulation, Ship};
//! use skirmish_core::{CollisionType, SimConfig, Vec2};
//!
//! let mut sim = Simulation::new(SimConfig::default())?;
//! sim.add_actor(Ship::new(CollisionType::TEAM_PLAYER, Vec2::new(0.0, 0.0), Vec2::ZERO))?;
//! sim.add_actor(Ship::new(CollisionType::TEAM_ENEMY, Vec2::new(400.0, 0.0), Vec2::ZERO))?;
//!
//! let stats = sim.step(std::time::Duration::from_millis(16))?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod actors;
pub mod commands;
pub mod emitter;
pub mod error;
pub mod events;
pub mod game_loop;
pub mod pooled;
pub mod simulation;

pub use actors::{Actor, Asteroid, Ship};
pub use commands::{Commands, FrameContext, SpawnRequest};
pub use emitter::{ParticleBurst, ParticleEmitter};
pub use error::{SimError, SimResult};
pub use events::{EventBus, EventReceiver, EventSender, SimEvent};
pub use game_loop::{FrameStats, FrameStatsAccumulator, GameLoop, GameLoopConfig};
pub use pooled::{Bullet, BulletInit, Particle, ParticleInit, BULLET_POOL, PARTICLE_POOL};
pub use simulation::Simulation;
