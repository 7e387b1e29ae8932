//! # Particle Bursts
//!
//! Turns a [`ParticleBurst`] description into particle spawns. Randomness
//! comes from a seeded ChaCha stream, so the same seed and the same sequence
//! of bursts produce the same particles.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_core::Vec2;

use crate::pooled::ParticleInit;

/// Parameters of one burst. Ranges are sampled uniformly per particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleBurst {
    /// Particles per burst.
    pub count: u32,
    /// Seconds at full opacity.
    pub lifespan: f32,
    /// Seconds spent fading out after the lifespan.
    pub fade: f32,
    /// Smallest draw scale.
    pub min_scale: f32,
    /// Largest draw scale.
    pub max_scale: f32,
    /// Smallest heading, in radians.
    pub min_direction: f32,
    /// Largest heading, in radians.
    pub max_direction: f32,
    /// Slowest speed, in units per second.
    pub min_speed: f32,
    /// Fastest speed, in units per second.
    pub max_speed: f32,
    /// Constant acceleration applied to every particle.
    pub acceleration: Vec2,
}

impl Default for ParticleBurst {
    fn default() -> Self {
        Self {
            count: 15,
            lifespan: 3.0,
            fade: 0.5,
            min_scale: 0.5,
            max_scale: 2.0,
            min_direction: 0.0,
            max_direction: TAU,
            min_speed: 1.0,
            max_speed: 10.0,
            acceleration: Vec2::ZERO,
        }
    }
}

impl ParticleBurst {
    /// Small sparks where a bullet hits.
    #[must_use]
    pub fn impact() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 0.2,
            ..Self::default()
        }
    }

    /// Debris cloud where a ship is destroyed.
    #[must_use]
    pub fn explosion() -> Self {
        Self {
            count: 40,
            lifespan: 1.5,
            min_speed: 10.0,
            max_speed: 60.0,
            ..Self::default()
        }
    }
}

/// Seeded particle generator.
pub struct ParticleEmitter {
    rng: ChaCha8Rng,
}

impl ParticleEmitter {
    /// Creates an emitter with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Samples `burst.count` particles at `origin` and hands each to `spawn`.
    pub fn emit(&mut self, origin: Vec2, burst: &ParticleBurst, mut spawn: impl FnMut(ParticleInit)) {
        for _ in 0..burst.count {
            spawn(self.sample(origin, burst));
        }
    }

    fn sample(&mut self, origin: Vec2, burst: &ParticleBurst) -> ParticleInit {
        let direction = lerp(burst.min_direction, burst.max_direction, self.rng.gen());
        let speed = lerp(burst.min_speed, burst.max_speed, self.rng.gen());
        let scale = lerp(burst.min_scale, burst.max_scale, self.rng.gen());
        let color = [
            200 + self.rng.gen_range(0..55u8),
            40 + self.rng.gen_range(0..180u8),
            40 + self.rng.gen_range(0..80u8),
            255,
        ];

        ParticleInit {
            location: origin,
            velocity: Vec2::from_angle(direction) * speed,
            acceleration: burst.acceleration,
            lifespan: burst.lifespan,
            fade: burst.fade,
            scale,
            color,
        }
    }
}

fn lerp(min: f32, max: f32, t: f32) -> f32 {
    min + (max - min) * t
}
