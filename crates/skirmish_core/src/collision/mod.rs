//! # Collision
//!
//! Masks and the per-frame sweep-and-prune broad phase.

mod broad_phase;
mod mask;

pub use broad_phase::{BroadPhaseCollider, CollisionHandler, SweepStats};
pub use mask::CollisionType;
