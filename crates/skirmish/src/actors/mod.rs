//! # Actors
//!
//! Registry-owned entities. [`Actor`] is the closed set of kinds the
//! registry stores; it forwards every capability to the concrete type.

mod asteroid;
mod ship;

pub use asteroid::Asteroid;
pub use ship::{Ship, SHIP_BULLET_SPEED, SHIP_FIRE_INTERVAL, SHIP_HEALTH, SHIP_SIZE};

use skirmish_core::{Body, CollisionType, Entity, EntityId, EntityKind, EntityProxy, Rect};

use crate::commands::FrameContext;

/// A registry-owned entity.
#[derive(Clone, Debug)]
pub enum Actor {
    /// Team-aligned ship.
    Ship(Ship),
    /// Neutral drifting obstacle.
    Asteroid(Asteroid),
}

impl Actor {
    /// The ship, if this is one.
    #[must_use]
    pub fn as_ship(&self) -> Option<&Ship> {
        match self {
            Self::Ship(ship) => Some(ship),
            Self::Asteroid(_) => None,
        }
    }

    /// The asteroid, if this is one.
    #[must_use]
    pub fn as_asteroid(&self) -> Option<&Asteroid> {
        match self {
            Self::Asteroid(asteroid) => Some(asteroid),
            Self::Ship(_) => None,
        }
    }
}

impl From<Ship> for Actor {
    fn from(ship: Ship) -> Self {
        Self::Ship(ship)
    }
}

impl From<Asteroid> for Actor {
    fn from(asteroid: Asteroid) -> Self {
        Self::Asteroid(asteroid)
    }
}

impl Body for Actor {
    fn kind(&self) -> EntityKind {
        match self {
            Self::Ship(ship) => ship.kind(),
            Self::Asteroid(asteroid) => asteroid.kind(),
        }
    }

    fn bounds(&self) -> Rect {
        match self {
            Self::Ship(ship) => ship.bounds(),
            Self::Asteroid(asteroid) => asteroid.bounds(),
        }
    }

    fn collision_type(&self) -> CollisionType {
        match self {
            Self::Ship(ship) => ship.collision_type(),
            Self::Asteroid(asteroid) => asteroid.collision_type(),
        }
    }

    fn test_collision(&self, other: &EntityProxy) -> bool {
        match self {
            Self::Ship(ship) => ship.test_collision(other),
            Self::Asteroid(asteroid) => asteroid.test_collision(other),
        }
    }
}

impl<'a> Entity<FrameContext<'a>> for Actor {
    fn update(&mut self, dt: f32, ctx: &mut FrameContext<'a>) {
        match self {
            Self::Ship(ship) => ship.update(dt, ctx),
            Self::Asteroid(asteroid) => asteroid.update(dt, ctx),
        }
    }

    fn on_collision(&mut self, other: &EntityProxy, ctx: &mut FrameContext<'a>) {
        match self {
            Self::Ship(ship) => ship.on_collision(other, ctx),
            Self::Asteroid(asteroid) => asteroid.on_collision(other, ctx),
        }
    }

    fn setup(&mut self, id: EntityId) {
        match self {
            Self::Ship(ship) => Entity::<FrameContext<'a>>::setup(ship, id),
            Self::Asteroid(asteroid) => Entity::<FrameContext<'a>>::setup(asteroid, id),
        }
    }

    fn teardown(&mut self) {
        match self {
            Self::Ship(ship) => Entity::<FrameContext<'a>>::teardown(ship),
            Self::Asteroid(asteroid) => Entity::<FrameContext<'a>>::teardown(asteroid),
        }
    }
}
