//! Team-aligned ship: flies, targets the nearest opposing ship, fires.

use skirmish_core::{
    Body, CollisionType, Entity, EntityId, EntityKind, EntityProxy, EntityRef, Rect, Vec2,
};

use super::Asteroid;
use crate::commands::FrameContext;
use crate::emitter::ParticleBurst;
use crate::pooled::BulletInit;

/// Edge length of a ship's bounding square.
pub const SHIP_SIZE: f32 = 40.0;
/// Bullet hits a ship survives, plus one.
pub const SHIP_HEALTH: u32 = 3;
/// Seconds between shots.
pub const SHIP_FIRE_INTERVAL: f32 = 0.5;
/// Speed of fired bullets, in units per second.
pub const SHIP_BULLET_SPEED: f32 = 600.0;

/// A ship.
#[derive(Clone, Debug)]
pub struct Ship {
    id: EntityId,
    team: CollisionType,
    position: Vec2,
    velocity: Vec2,
    size: f32,
    health: u32,
    fire_interval: f32,
    cooldown: f32,
    bullet_speed: f32,
    wreck_radius: Option<f32>,
    destroyed: bool,
    updates: u64,
    collisions: u32,
    shots_fired: u32,
}

impl Ship {
    /// Creates a ship for `team` (team bits only; other bits are dropped).
    #[must_use]
    pub fn new(team: CollisionType, position: Vec2, velocity: Vec2) -> Self {
        Self {
            id: EntityId::NULL,
            team: team.team(),
            position,
            velocity,
            size: SHIP_SIZE,
            health: SHIP_HEALTH,
            fire_interval: SHIP_FIRE_INTERVAL,
            cooldown: 0.0,
            bullet_speed: SHIP_BULLET_SPEED,
            wreck_radius: None,
            destroyed: false,
            updates: 0,
            collisions: 0,
            shots_fired: 0,
        }
    }

    /// Overrides the starting health.
    #[must_use]
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self
    }

    /// Overrides the bounding square size.
    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Never fires.
    #[must_use]
    pub fn holding_fire(mut self) -> Self {
        self.fire_interval = f32::INFINITY;
        self.cooldown = f32::INFINITY;
        self
    }

    /// On destruction, leaves a drifting [`Asteroid`] of `radius` behind.
    #[must_use]
    pub fn leaving_wreck(mut self, radius: f32) -> Self {
        self.wreck_radius = Some(radius);
        self
    }

    /// Registry id. Null until the ship is live.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Team bits.
    #[must_use]
    pub fn team(&self) -> CollisionType {
        self.team
    }

    /// Center.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Remaining health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    /// True once health reached zero and removal was requested.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Updates received while live.
    #[must_use]
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Collision callbacks received while live.
    #[must_use]
    pub fn collisions(&self) -> u32 {
        self.collisions
    }

    /// Bullets requested so far.
    #[must_use]
    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    fn is_hostile_fire(&self, other: &EntityProxy) -> bool {
        other.kind == EntityKind::Projectile && !other.collision_type.team().intersects(self.team)
    }

    fn try_fire(&mut self, ctx: &mut FrameContext<'_>) {
        let me = self.proxy(EntityRef::Registry(self.id));
        let Some(target) = ctx.neighbors.nearest_opposing(&me) else {
            return;
        };

        let direction = target.center() - self.position;
        if direction.length_squared() <= f32::EPSILON {
            return;
        }

        ctx.commands.fire(BulletInit {
            location: self.position,
            direction,
            speed: self.bullet_speed,
            team: self.team,
        });
        self.cooldown = self.fire_interval;
        self.shots_fired += 1;
    }
}

impl Body for Ship {
    fn kind(&self) -> EntityKind {
        EntityKind::Actor
    }

    fn bounds(&self) -> Rect {
        let half = self.size * 0.5;
        Rect::from_center(self.position, half, half)
    }

    fn collision_type(&self) -> CollisionType {
        CollisionType::SOLID | self.team
    }

    fn test_collision(&self, other: &EntityProxy) -> bool {
        match other.kind {
            EntityKind::Actor => other.collision_type.opposes(self.collision_type()),
            EntityKind::Projectile => self.is_hostile_fire(other),
            EntityKind::Obstacle => true,
            EntityKind::Particle => false,
        }
    }
}

impl<'a> Entity<FrameContext<'a>> for Ship {
    fn update(&mut self, dt: f32, ctx: &mut FrameContext<'a>) {
        self.updates += 1;
        self.position += self.velocity * dt;

        if self.destroyed {
            return;
        }
        self.cooldown = (self.cooldown - dt).max(0.0);
        if self.cooldown <= 0.0 {
            self.try_fire(ctx);
        }
    }

    fn on_collision(&mut self, other: &EntityProxy, ctx: &mut FrameContext<'a>) {
        self.collisions += 1;
        if self.destroyed || !self.is_hostile_fire(other) {
            return;
        }

        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.destroyed = true;
            ctx.commands.remove(self.id);
            ctx.commands.emit_burst(self.position, ParticleBurst::explosion());
            if let Some(radius) = self.wreck_radius {
                let wreck = Asteroid::new(self.position, self.velocity * 0.5, radius);
                ctx.commands.add_actor(wreck.into());
            }
        }
    }

    fn setup(&mut self, id: EntityId) {
        self.id = id;
    }

    fn teardown(&mut self) {
        tracing::trace!(id = self.id.raw(), destroyed = self.destroyed, "ship torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{NeighborQuery, SpatialIndex};

    use crate::actors::Actor;
    use crate::commands::Commands;

    fn live(ship: Ship, raw: u64) -> Ship {
        let mut ship = ship;
        Entity::<FrameContext<'_>>::setup(&mut ship, EntityId::from_raw(raw));
        ship
    }

    fn bullet_from(team: CollisionType) -> EntityProxy {
        EntityProxy {
            entity: EntityRef::Registry(EntityId::from_raw(99)),
            kind: EntityKind::Projectile,
            bounds: Rect::new(0.0, 0.0, 8.0, 8.0),
            collision_type: CollisionType::SOLID | team,
        }
    }

    #[test]
    fn test_fires_at_nearest_opposing_ship() {
        let mut hunter = live(Ship::new(CollisionType::TEAM_PLAYER, Vec2::new(100.0, 100.0), Vec2::ZERO), 1);
        let prey = live(Ship::new(CollisionType::TEAM_ENEMY, Vec2::new(300.0, 100.0), Vec2::ZERO), 2);

        let mut index = SpatialIndex::new(200.0).unwrap();
        index.rebuild([
            hunter.proxy(EntityRef::Registry(hunter.id())),
            prey.proxy(EntityRef::Registry(prey.id())),
        ]);
        let mut commands = Commands::default();
        let mut ctx = FrameContext {
            neighbors: NeighborQuery::new(&index, 20),
            commands: &mut commands,
            frame: 0,
        };

        hunter.update(0.016, &mut ctx);
        // Still cooling down.
        hunter.update(0.016, &mut ctx);

        assert_eq!(hunter.shots_fired(), 1);
        assert_eq!(commands.pending_spawns(), 1);
    }

    #[test]
    fn test_no_target_no_shot() {
        let mut lonely = live(Ship::new(CollisionType::TEAM_PLAYER, Vec2::ZERO, Vec2::ZERO), 1);
        let index = SpatialIndex::new(200.0).unwrap();
        let mut commands = Commands::default();
        let mut ctx = FrameContext {
            neighbors: NeighborQuery::new(&index, 20),
            commands: &mut commands,
            frame: 0,
        };

        lonely.update(0.016, &mut ctx);

        assert_eq!(lonely.shots_fired(), 0);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_destroyed_after_hostile_hits() {
        let mut ship = live(Ship::new(CollisionType::TEAM_PLAYER, Vec2::ZERO, Vec2::ZERO).with_health(2), 7);
        let index = SpatialIndex::new(200.0).unwrap();
        let mut commands = Commands::default();
        {
            let mut ctx = FrameContext {
                neighbors: NeighborQuery::new(&index, 20),
                commands: &mut commands,
                frame: 0,
            };
            let friendly = bullet_from(CollisionType::TEAM_PLAYER);
            let hostile = bullet_from(CollisionType::TEAM_ENEMY);

            ship.on_collision(&friendly, &mut ctx);
            assert_eq!(ship.health(), 2);
            ship.on_collision(&hostile, &mut ctx);
            ship.on_collision(&hostile, &mut ctx);
            ship.on_collision(&hostile, &mut ctx);
        }

        assert!(ship.is_destroyed());
        assert_eq!(ship.health(), 0);
        assert_eq!(ship.collisions(), 4);
        let removes: Vec<EntityId> = commands.drain_removes().collect();
        assert_eq!(removes, vec![EntityId::from_raw(7)]);
        assert_eq!(commands.drain_adds().count(), 0);
    }

    #[test]
    fn test_destroyed_ship_queues_wreck() {
        let mut ship = live(
            Ship::new(CollisionType::TEAM_ENEMY, Vec2::new(40.0, 60.0), Vec2::new(10.0, 0.0))
                .with_health(1)
                .leaving_wreck(15.0),
            3,
        );
        let index = SpatialIndex::new(200.0).unwrap();
        let mut commands = Commands::default();
        let mut ctx = FrameContext {
            neighbors: NeighborQuery::new(&index, 20),
            commands: &mut commands,
            frame: 0,
        };

        ship.on_collision(&bullet_from(CollisionType::TEAM_PLAYER), &mut ctx);

        let adds: Vec<Actor> = commands.drain_adds().collect();
        assert_eq!(adds.len(), 1);
        let wreck = adds[0].as_asteroid().unwrap();
        assert_eq!(wreck.position(), Vec2::new(40.0, 60.0));
        assert_eq!(wreck.bounds(), Rect::new(25.0, 45.0, 55.0, 75.0));
    }

    #[test]
    fn test_collision_rules() {
        let ship = Ship::new(CollisionType::TEAM_PLAYER, Vec2::ZERO, Vec2::ZERO);
        let mut other = bullet_from(CollisionType::TEAM_ENEMY);

        other.kind = EntityKind::Actor;
        assert!(ship.test_collision(&other));
        other.collision_type = CollisionType::SOLID | CollisionType::TEAM_PLAYER;
        assert!(!ship.test_collision(&other));

        other.kind = EntityKind::Obstacle;
        assert!(ship.test_collision(&other));
        other.kind = EntityKind::Particle;
        assert!(!ship.test_collision(&other));
    }
}
