//! Neutral obstacle drifting at constant velocity.

use skirmish_core::{Body, CollisionType, Entity, EntityId, EntityKind, EntityProxy, Rect, Vec2};

use crate::commands::FrameContext;

/// An asteroid.
#[derive(Clone, Debug)]
pub struct Asteroid {
    id: EntityId,
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    updates: u64,
    collisions: u32,
}

impl Asteroid {
    /// Creates an asteroid.
    #[must_use]
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            id: EntityId::NULL,
            position,
            velocity,
            radius,
            updates: 0,
            collisions: 0,
        }
    }

    /// Registry id. Null until the asteroid is live.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Center.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
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
}

impl Body for Asteroid {
    fn kind(&self) -> EntityKind {
        EntityKind::Obstacle
    }

    fn bounds(&self) -> Rect {
        Rect::from_center(self.position, self.radius, self.radius)
    }

    fn collision_type(&self) -> CollisionType {
        CollisionType::SOLID | CollisionType::TEAM_NEUTRAL
    }

    // Bullets pass through: the bullet side only reacts to actors, and the
    // test has to agree whichever side of the pair runs it.
    fn test_collision(&self, other: &EntityProxy) -> bool {
        matches!(other.kind, EntityKind::Actor | EntityKind::Obstacle)
    }
}

impl<'a> Entity<FrameContext<'a>> for Asteroid {
    fn update(&mut self, dt: f32, _ctx: &mut FrameContext<'a>) {
        self.updates += 1;
        self.position += self.velocity * dt;
    }

    fn on_collision(&mut self, _other: &EntityProxy, _ctx: &mut FrameContext<'a>) {
        self.collisions += 1;
    }

    fn setup(&mut self, id: EntityId) {
        self.id = id;
    }
}
