//! Projectile fired by ships.

use skirmish_core::{Body, CollisionType, Entity, EntityKind, EntityProxy, Poolable, Rect, Vec2};

use crate::commands::FrameContext;
use crate::emitter::ParticleBurst;

/// Bullet half extent.
pub const BULLET_RADIUS: f32 = 4.0;

/// Seconds a bullet flies before expiring.
pub const BULLET_LIFETIME: f32 = 3.0;

/// Spawn parameters for a [`Bullet`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletInit {
    /// Spawn point.
    pub location: Vec2,
    /// Heading. Normalized on spawn.
    pub direction: Vec2,
    /// Units per second.
    pub speed: f32,
    /// Team of the shooter. Only the team bits are kept.
    pub team: CollisionType,
}

/// A pooled projectile.
#[derive(Clone, Debug, Default)]
pub struct Bullet {
    location: Vec2,
    velocity: Vec2,
    lifetime: f32,
    collision_type: CollisionType,
    active: bool,
}

impl Bullet {
    /// Current center.
    #[must_use]
    pub fn location(&self) -> Vec2 {
        self.location
    }

    /// Seconds left before expiry.
    #[must_use]
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    fn hits(&self, other: &EntityProxy) -> bool {
        other.kind == EntityKind::Actor
            && !other.collision_type.team().intersects(self.collision_type.team())
    }
}

impl Poolable for Bullet {
    type Init = BulletInit;

    fn is_active(&self) -> bool {
        self.active
    }

    fn reset(&mut self, init: BulletInit) {
        self.location = init.location;
        self.velocity = init.direction.normalized() * init.speed;
        self.lifetime = BULLET_LIFETIME;
        self.collision_type = CollisionType::SOLID | init.team.team();
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Body for Bullet {
    fn kind(&self) -> EntityKind {
        EntityKind::Projectile
    }

    fn bounds(&self) -> Rect {
        Rect::from_center(self.location, BULLET_RADIUS, BULLET_RADIUS)
    }

    fn collision_type(&self) -> CollisionType {
        self.collision_type
    }

    fn test_collision(&self, other: &EntityProxy) -> bool {
        self.hits(other)
    }
}

impl<'a> Entity<FrameContext<'a>> for Bullet {
    fn update(&mut self, dt: f32, _ctx: &mut FrameContext<'a>) {
        if !self.active {
            return;
        }

        self.location += self.velocity * dt;
        self.lifetime -= dt;
        if self.lifetime < 0.0 {
            self.active = false;
        }
    }

    fn on_collision(&mut self, other: &EntityProxy, ctx: &mut FrameContext<'a>) {
        if !self.active || !self.hits(other) {
            return;
        }

        self.active = false;
        ctx.commands.emit_burst(self.location, ParticleBurst::impact());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{EntityId, EntityRef, NeighborQuery, SpatialIndex};

    use crate::commands::Commands;

    fn fired(team: CollisionType) -> Bullet {
        let mut bullet = Bullet::default();
        bullet.reset(BulletInit {
            location: Vec2::new(0.0, 0.0),
            direction: Vec2::new(2.0, 0.0),
            speed: 100.0,
            team,
        });
        bullet
    }

    fn ship(team: CollisionType) -> EntityProxy {
        EntityProxy {
            entity: EntityRef::Registry(EntityId::from_raw(1)),
            kind: EntityKind::Actor,
            bounds: Rect::new(-5.0, -5.0, 5.0, 5.0),
            collision_type: CollisionType::SOLID | team,
        }
    }

    #[test]
    fn test_reset_normalizes_direction() {
        let bullet = fired(CollisionType::TEAM_PLAYER);
        assert!(bullet.is_active());
        assert_eq!(bullet.velocity, Vec2::new(100.0, 0.0));
        assert!(bullet.collision_type().is_solid());
        assert_eq!(bullet.bounds().width(), BULLET_RADIUS * 2.0);
    }

    #[test]
    fn test_expires_after_lifetime() {
        let index = SpatialIndex::new(200.0).unwrap();
        let mut commands = Commands::default();
        let mut ctx = FrameContext {
            neighbors: NeighborQuery::new(&index, 1),
            commands: &mut commands,
            frame: 0,
        };
        let mut bullet = fired(CollisionType::TEAM_PLAYER);

        for _ in 0..6 {
            bullet.update(0.5, &mut ctx);
        }
        assert!(bullet.is_active());
        assert_eq!(bullet.lifetime(), 0.0);

        bullet.update(0.5, &mut ctx);
        assert!(!bullet.is_active());
    }

    #[test]
    fn test_hit_on_opposing_ship_bursts_once() {
        let index = SpatialIndex::new(200.0).unwrap();
        let mut commands = Commands::default();
        let mut bullet = fired(CollisionType::TEAM_PLAYER);
        let enemy = ship(CollisionType::TEAM_ENEMY);
        {
            let mut ctx = FrameContext {
                neighbors: NeighborQuery::new(&index, 1),
                commands: &mut commands,
                frame: 0,
            };
            assert!(bullet.test_collision(&enemy));
            bullet.on_collision(&enemy, &mut ctx);
            bullet.on_collision(&enemy, &mut ctx);
        }

        assert!(!bullet.is_active());
        assert_eq!(commands.pending_spawns(), 1);
    }

    #[test]
    fn test_friendly_ship_is_ignored() {
        let bullet = fired(CollisionType::TEAM_PLAYER);
        assert!(!bullet.test_collision(&ship(CollisionType::TEAM_PLAYER)));
    }
}
