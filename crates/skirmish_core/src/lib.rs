//! # SKIRMISH Core Kernel
//!
//! Frame-stepped collision kernel for populations of moving 2D entities:
//! - Fixed-capacity object pools with ring-cursor recycling
//! - A grid spatial index rebuilt from scratch every frame
//! - Sweep-and-prune broad phase with deterministic dispatch order
//! - An entity registry whose structural changes are deferred to frame end
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in the frame loop** - pools, grid buckets and
//!    sweep buffers are allocated once and recycled
//! 2. **No mutation during iteration** - adds and removes are queued and
//!    applied at fixed points of the frame
//! 3. **Single writer** - one frame runs to completion on one thread
//!
//! ## Frame Pipeline
//!
//! ```text
//! IndexBuild -> Update -> Collide -> ApplyAdds -> ApplyRemoves -> (next frame)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use skirmish_core::{SpatialIndex, NeighborQuery, BroadPhaseCollider};
//!
//! let mut index = SpatialIndex::new(200.0)?;
//! index.rebuild(proxies.iter().copied());
//! let target = NeighborQuery::new(&index, 20).nearest_opposing(&me);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod memory;
pub mod registry;
pub mod spatial;

pub use collision::{BroadPhaseCollider, CollisionHandler, CollisionType, SweepStats};
pub use config::{SimConfig, DEFAULT_MAX_FRAME_DT};
pub use entity::{Body, Entity, EntityId, EntityKind, EntityProxy, EntityRef, PoolId};
pub use error::{CoreError, CoreResult};
pub use frame::{FrameCycle, FramePhase};
pub use geometry::{Rect, Vec2};
pub use memory::{ObjectPool, PoolHandle, Poolable};
pub use registry::EntityRegistry;
pub use spatial::{CellKey, NeighborQuery, SpatialIndex};
