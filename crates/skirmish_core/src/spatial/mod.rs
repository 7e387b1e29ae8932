//! # Spatial Partitioning
//!
//! - [`SpatialIndex`]: per-frame uniform grid, rebuilt from scratch
//! - [`NeighborQuery`]: read-only lookups against a built index

mod grid;
mod query;

pub use grid::{CellKey, SpatialIndex};
pub use query::NeighborQuery;
