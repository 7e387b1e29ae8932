//! Visual particle. Never solid, never collides.

use skirmish_core::{Body, CollisionType, Entity, EntityKind, EntityProxy, Poolable, Rect, Vec2};

use crate::commands::FrameContext;

/// Spawn parameters for a [`Particle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleInit {
    /// Spawn point.
    pub location: Vec2,
    /// Initial velocity.
    pub velocity: Vec2,
    /// Constant acceleration.
    pub acceleration: Vec2,
    /// Seconds at full opacity.
    pub lifespan: f32,
    /// Seconds spent fading out once `lifespan` runs out.
    pub fade: f32,
    /// Draw scale.
    pub scale: f32,
    /// RGBA color.
    pub color: [u8; 4],
}

/// A pooled particle.
#[derive(Clone, Debug, Default)]
pub struct Particle {
    location: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    lifespan: f32,
    fade: f32,
    scale: f32,
    color: [u8; 4],
    active: bool,
}

impl Particle {
    /// Current position.
    #[must_use]
    pub fn location(&self) -> Vec2 {
        self.location
    }

    /// Draw scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Current RGBA color. Alpha drops during the fade window.
    #[must_use]
    pub fn color(&self) -> [u8; 4] {
        self.color
    }
}

impl Poolable for Particle {
    type Init = ParticleInit;

    fn is_active(&self) -> bool {
        self.active
    }

    fn reset(&mut self, init: ParticleInit) {
        self.location = init.location;
        self.velocity = init.velocity;
        self.acceleration = init.acceleration;
        self.lifespan = init.lifespan;
        self.fade = init.fade;
        self.scale = init.scale;
        self.color = init.color;
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Body for Particle {
    fn kind(&self) -> EntityKind {
        EntityKind::Particle
    }

    fn bounds(&self) -> Rect {
        Rect::from_center(self.location, self.scale * 0.5, self.scale * 0.5)
    }

    fn collision_type(&self) -> CollisionType {
        CollisionType::NONE
    }

    fn test_collision(&self, _other: &EntityProxy) -> bool {
        false
    }
}

impl<'a> Entity<FrameContext<'a>> for Particle {
    fn update(&mut self, dt: f32, _ctx: &mut FrameContext<'a>) {
        if !self.active {
            return;
        }
        if self.lifespan < -self.fade {
            self.active = false;
            return;
        }

        if self.lifespan < 0.0 {
            let alpha = 255.0 * (self.fade + self.lifespan) / self.fade;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                self.color[3] = alpha.clamp(0.0, 255.0) as u8;
            }
        }

        self.lifespan -= dt;
        self.velocity += self.acceleration * dt;
        self.location += self.velocity * dt;
    }

    fn on_collision(&mut self, _other: &EntityProxy, _ctx: &mut FrameContext<'a>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{NeighborQuery, SpatialIndex};

    use crate::commands::Commands;

    fn spawned() -> Particle {
        let mut particle = Particle::default();
        particle.reset(ParticleInit {
            location: Vec2::ZERO,
            velocity: Vec2::new(4.0, 0.0),
            acceleration: Vec2::new(0.0, 2.0),
            lifespan: 1.0,
            fade: 0.5,
            scale: 1.0,
            color: [255, 100, 50, 255],
        });
        particle
    }

    #[test]
    fn test_fades_then_expires() {
        let index = SpatialIndex::new(200.0).unwrap();
        let mut commands = Commands::default();
        let mut ctx = FrameContext {
            neighbors: NeighborQuery::new(&index, 1),
            commands: &mut commands,
            frame: 0,
        };
        let mut particle = spawned();

        // lifespan: 1.0 -> 0.5 -> 0.0 -> -0.25
        particle.update(0.5, &mut ctx);
        particle.update(0.5, &mut ctx);
        particle.update(0.25, &mut ctx);
        assert_eq!(particle.color()[3], 255);

        // Fade window: alpha = 255 * (0.5 - 0.25) / 0.5
        particle.update(0.25, &mut ctx);
        assert_eq!(particle.color()[3], 127);
        assert!(particle.is_active());

        // lifespan is now -0.5, not yet below -fade.
        particle.update(0.25, &mut ctx);
        assert!(particle.is_active());
        particle.update(0.25, &mut ctx);
        assert!(!particle.is_active());
    }

    #[test]
    fn test_integrates_acceleration() {
        let index = SpatialIndex::new(200.0).unwrap();
        let mut commands = Commands::default();
        let mut ctx = FrameContext {
            neighbors: NeighborQuery::new(&index, 1),
            commands: &mut commands,
            frame: 0,
        };
        let mut particle = spawned();

        particle.update(0.5, &mut ctx);

        assert_eq!(particle.location(), Vec2::new(2.0, 0.5));
    }

    #[test]
    fn test_never_solid() {
        assert!(!spawned().collision_type().is_solid());
    }
}
