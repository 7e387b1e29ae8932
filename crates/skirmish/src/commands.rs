//! # Frame Commands
//!
//! Entities never touch the registry or the pools while a frame is running.
//! They record what they want in [`Commands`] through the [`FrameContext`]
//! they are handed, and the simulation applies it at fixed points:
//!
//! - pool spawns after the Update phase and after the Collide phase
//! - registry additions and removals after the Collide phase, to be
//!   flushed by ApplyAdds / ApplyRemoves

use skirmish_core::{EntityId, NeighborQuery, Vec2};

use crate::actors::Actor;
use crate::emitter::ParticleBurst;
use crate::pooled::BulletInit;

/// A buffered pool spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnRequest {
    /// One bullet.
    Bullet(BulletInit),
    /// A particle burst.
    Burst {
        /// Where the particles start.
        origin: Vec2,
        /// Burst parameters.
        burst: ParticleBurst,
    },
}

/// Requests recorded during a frame.
///
/// Buffers are reused across frames.
#[derive(Default)]
pub struct Commands {
    spawns: Vec<SpawnRequest>,
    adds: Vec<Actor>,
    removes: Vec<EntityId>,
}

impl Commands {
    /// Creates a command buffer with room for `spawns` spawn requests.
    #[must_use]
    pub fn with_capacity(spawns: usize) -> Self {
        Self {
            spawns: Vec::with_capacity(spawns),
            adds: Vec::new(),
            removes: Vec::new(),
        }
    }

    /// Requests a bullet spawn.
    pub fn fire(&mut self, bullet: BulletInit) {
        self.spawns.push(SpawnRequest::Bullet(bullet));
    }

    /// Requests a particle burst at `origin`.
    pub fn emit_burst(&mut self, origin: Vec2, burst: ParticleBurst) {
        self.spawns.push(SpawnRequest::Burst { origin, burst });
    }

    /// Requests a registry addition. The actor becomes live next frame.
    pub fn add_actor(&mut self, actor: Actor) {
        self.adds.push(actor);
    }

    /// Requests a registry removal. The entity stays live until frame end.
    pub fn remove(&mut self, id: EntityId) {
        self.removes.push(id);
    }

    /// Number of buffered spawn requests.
    #[must_use]
    pub fn pending_spawns(&self) -> usize {
        self.spawns.len()
    }

    /// True when nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty() && self.adds.is_empty() && self.removes.is_empty()
    }

    pub(crate) fn drain_spawns(&mut self) -> std::vec::Drain<'_, SpawnRequest> {
        self.spawns.drain(..)
    }

    pub(crate) fn drain_adds(&mut self) -> std::vec::Drain<'_, Actor> {
        self.adds.drain(..)
    }

    pub(crate) fn drain_removes(&mut self) -> std::vec::Drain<'_, EntityId> {
        self.removes.drain(..)
    }
}

/// Everything an entity may use from inside `update` or `on_collision`.
pub struct FrameContext<'a> {
    /// Queries against this frame's spatial index.
    pub neighbors: NeighborQuery<'a>,
    /// Where structural changes and spawns are recorded.
    pub commands: &'a mut Commands,
    /// Zero-based frame number.
    pub frame: u64,
}
