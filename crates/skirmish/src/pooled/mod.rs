//! # Pooled Entities
//!
//! Short-lived, high-churn entities recycled through fixed-size pools.

mod bullet;
mod particle;

pub use bullet::{Bullet, BulletInit, BULLET_LIFETIME, BULLET_RADIUS};
pub use particle::{Particle, ParticleInit};

use skirmish_core::PoolId;

/// Pool holding [`Bullet`]s.
pub const BULLET_POOL: PoolId = PoolId::new(0);

/// Pool holding [`Particle`]s.
pub const PARTICLE_POOL: PoolId = PoolId::new(1);
