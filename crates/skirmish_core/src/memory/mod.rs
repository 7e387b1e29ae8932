//! # Memory Management
//!
//! Pre-allocated pools for short-lived, high-churn entities.
//!
//! ## Design Philosophy
//!
//! All slots are allocated once at startup. During gameplay:
//! - No heap allocations
//! - No frees
//! - Exhaustion recycles the oldest slot instead of failing

mod pool;

pub use pool::{ObjectPool, PoolHandle, Poolable};
