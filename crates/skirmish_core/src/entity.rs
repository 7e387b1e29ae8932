//! # Entity Capabilities
//!
//! The kernel never inspects concrete entity types. It sees:
//! - [`Body`]: bounding rectangle, collision mask, kind tag, pair test
//! - [`Entity`]: per-frame update, collision reaction, lifecycle hooks
//!
//! Identities are lightweight:
//! - [`EntityId`] for registry-owned entities (monotonic, never reused)
//! - [`EntityRef`] for anything that can appear in the index in a frame

use crate::collision::CollisionType;
use crate::geometry::{Rect, Vec2};
use crate::memory::PoolHandle;

/// Unique identifier for a registry-owned entity.
///
/// Ids are handed out in increasing order when an entity is queued for
/// addition and are never recycled, so a stale id can never alias a newer
/// entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an entity ID from its raw value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

/// Identifies one object pool inside a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PoolId(u8);

impl PoolId {
    /// Creates a pool ID.
    #[inline]
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Reference to any entity that can take part in a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityRef {
    /// An entity owned by the registry.
    Registry(EntityId),
    /// A slot in one of the object pools.
    Pooled {
        /// Owning pool.
        pool: PoolId,
        /// Slot inside the pool.
        slot: PoolHandle,
    },
}

/// Tagged kind of an entity. Replaces runtime type inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Team-aligned agent (a ship). Targets of the nearest-opposing search.
    Actor,
    /// Unaligned solid obstacle.
    Obstacle,
    /// Pooled projectile.
    Projectile,
    /// Pooled visual particle. Never solid.
    Particle,
}

/// Frame snapshot of an entity as seen by the index and the collider.
///
/// Callbacks receive the snapshot of the other party instead of a borrow,
/// so both members of a pair can be mutated in turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityProxy {
    /// Who this is.
    pub entity: EntityRef,
    /// Kind tag.
    pub kind: EntityKind,
    /// Bounding rectangle at snapshot time.
    pub bounds: Rect,
    /// Collision mask at snapshot time.
    pub collision_type: CollisionType,
}

impl EntityProxy {
    /// Center of the snapshot bounds.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }
}

/// Spatial and collision-facing capabilities of an entity.
pub trait Body {
    /// Kind tag.
    fn kind(&self) -> EntityKind;

    /// Current bounding rectangle.
    fn bounds(&self) -> Rect;

    /// Current collision mask.
    fn collision_type(&self) -> CollisionType;

    /// Entity-defined compatibility check, run after the kernel has already
    /// established that both rectangles intersect. The kernel does not
    /// interpret masks beyond the solid bit.
    fn test_collision(&self, other: &EntityProxy) -> bool;

    /// Takes a snapshot of this entity under the given reference.
    #[inline]
    fn proxy(&self, entity: EntityRef) -> EntityProxy {
        EntityProxy {
            entity,
            kind: self.kind(),
            bounds: self.bounds(),
            collision_type: self.collision_type(),
        }
    }
}

/// Behavioural capabilities of an entity.
///
/// `C` is the per-frame context handed to callbacks. It is where entities
/// queue structural changes and spawn requests; they never touch the
/// registry or the pools directly.
pub trait Entity<C: ?Sized>: Body {
    /// Advances the entity by `dt` seconds.
    fn update(&mut self, dt: f32, ctx: &mut C);

    /// Reacts to a detected collision with `other`.
    fn on_collision(&mut self, other: &EntityProxy, ctx: &mut C);

    /// One-time setup, run right before the entity becomes live.
    fn setup(&mut self, id: EntityId) {
        let _ = id;
    }

    /// One-time teardown, run right before the entity is dropped.
    fn teardown(&mut self) {}
}
