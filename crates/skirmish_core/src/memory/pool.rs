//! # Object Pool
//!
//! Fixed-capacity ring of recyclable entities (projectiles, particles).

use crate::error::{CoreError, CoreResult};

/// Contract for an entity kind that lives in an [`ObjectPool`].
pub trait Poolable {
    /// State handed to [`Poolable::reset`] on spawn.
    type Init;

    /// Whether the slot currently holds a live instance.
    /// Inactive instances are invisible to update, indexing and collision.
    fn is_active(&self) -> bool;

    /// Overwrites all state with `init` and marks the instance active.
    fn reset(&mut self, init: Self::Init);

    /// Marks the instance inactive. The slot stays in the pool.
    fn deactivate(&mut self);
}

/// A fixed-capacity pool with ring-cursor recycling.
///
/// Every slot is created up front by a factory. `spawn` always reuses the
/// slot under the cursor and advances it, so when all slots are active the
/// least-recently-spawned one is overwritten ("oldest wins"). That can cut a
/// still-alive instance short; this is the capacity policy, not a failure.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It is owned by a single simulation.
///
/// # Example
///
/// ```rust,ignore
/// let mut bullets = ObjectPool::new(50_000, |_| Bullet::default())?;
///
/// // Spawn - O(1), no heap allocation
/// let handle = bullets.spawn(BulletInit { .. });
/// ```
pub struct ObjectPool<T> {
    /// The slots. Never resized after construction.
    slots: Box<[T]>,
    /// Next slot to hand out.
    cursor: usize,
    /// Spawns that overwrote a still-active slot.
    evictions: u64,
}

/// Handle to a slot in a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolHandle {
    /// Index into the pool.
    index: usize,
}

impl PoolHandle {
    /// Creates a handle for slot `index`.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self { index }
    }

    /// Slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl<T: Poolable> ObjectPool<T> {
    /// Creates a new pool with the specified capacity.
    ///
    /// All slots are built upfront by `factory`, which receives the slot
    /// index.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ZeroCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize, factory: impl FnMut(usize) -> T) -> CoreResult<Self> {
        if capacity == 0 {
            return Err(CoreError::ZeroCapacity { what: "object pool" });
        }

        let slots: Box<[T]> = (0..capacity).map(factory).collect();

        Ok(Self {
            slots,
            cursor: 0,
            evictions: 0,
        })
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the slot the next `spawn` will use.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of spawns that overwrote an active slot since construction.
    #[inline]
    #[must_use]
    pub const fn evictions(&self) -> u64 {
        self.evictions
    }

    /// True when the next `spawn` will overwrite an active instance.
    #[inline]
    #[must_use]
    pub fn will_evict(&self) -> bool {
        self.slots[self.cursor].is_active()
    }

    /// Number of active slots. O(capacity).
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_active()).count()
    }

    /// Resets the slot under the cursor with `init` and advances the cursor.
    ///
    /// This is a **O(1)** operation with **zero heap allocations**. It never
    /// fails: when the slot is still active its occupant is discarded.
    pub fn spawn(&mut self, init: T::Init) -> PoolHandle {
        let index = self.cursor;
        let slot = &mut self.slots[index];

        if slot.is_active() {
            self.evictions += 1;
            tracing::trace!(slot = index, "pool slot recycled while active");
        }

        slot.reset(init);
        self.cursor = (index + 1) % self.slots.len();

        PoolHandle { index }
    }

    /// Gets a reference to the slot behind `handle`, active or not.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots.get(handle.index)
    }

    /// Gets a mutable reference to the slot behind `handle`, active or not.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots.get_mut(handle.index)
    }

    /// Gets the slot behind `handle` only if it is active.
    #[inline]
    #[must_use]
    pub fn get_active(&self, handle: PoolHandle) -> Option<&T> {
        self.get(handle).filter(|slot| slot.is_active())
    }

    /// Gets the slot behind `handle` mutably only if it is active.
    #[inline]
    pub fn get_active_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.get_mut(handle).filter(|slot| slot.is_active())
    }

    /// Visits occupants in slot order.
    pub fn for_each(&self, active_only: bool, mut f: impl FnMut(PoolHandle, &T)) {
        for (index, slot) in self.slots.iter().enumerate() {
            if !active_only || slot.is_active() {
                f(PoolHandle { index }, slot);
            }
        }
    }

    /// Visits occupants mutably in slot order.
    pub fn for_each_mut(&mut self, active_only: bool, mut f: impl FnMut(PoolHandle, &mut T)) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !active_only || slot.is_active() {
                f(PoolHandle { index }, slot);
            }
        }
    }

    /// Iterates over active occupants.
    pub fn iter_active(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_active())
            .map(|(index, slot)| (PoolHandle { index }, slot))
    }

    /// Iterates mutably over active occupants.
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.is_active())
            .map(|(index, slot)| (PoolHandle { index }, slot))
    }

    /// Deactivates every slot and rewinds the cursor.
    ///
    /// This is a **zero-heap-allocation** operation - slots are kept.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.deactivate();
        }
        self.cursor = 0;
    }
}
