//! # Entity Registry
//!
//! Owns the live set of long-lived entities plus the pending add/remove
//! queues. Structural changes requested during a frame are only applied by
//! [`EntityRegistry::apply_adds`] and [`EntityRegistry::apply_removes`], so
//! the live set never changes while it is being iterated.
//!
//! ## Flush Semantics
//!
//! - A queued addition is invisible until `apply_adds`; its setup hook runs
//!   right before it becomes live
//! - A queued removal stays fully live until `apply_removes`; its teardown
//!   hook runs exactly once, however many times the removal was requested
//! - Adds are applied before removes, so an entity queued for both in the
//!   same frame is set up and torn down in the same flush

use rustc_hash::FxHashMap;

use crate::entity::EntityId;

/// Live entities and their deferred structural changes.
pub struct EntityRegistry<E> {
    /// Live entities, in insertion order.
    live: Vec<(EntityId, E)>,
    /// Entity id -> index into `live`.
    slots: FxHashMap<EntityId, usize>,
    /// Entities waiting for the next `apply_adds`.
    pending_add: Vec<(EntityId, E)>,
    /// Ids waiting for the next `apply_removes`.
    pending_remove: Vec<EntityId>,
    /// Next id to hand out.
    next_id: u64,
}

impl<E> Default for EntityRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EntityRegistry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            live: Vec::new(),
            slots: FxHashMap::default(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            next_id: 0,
        }
    }

    /// Queues `entity` for addition and returns the id it will carry.
    pub fn queue_add(&mut self, entity: E) -> EntityId {
        let id = EntityId::from_raw(self.next_id);
        self.next_id += 1;
        self.pending_add.push((id, entity));
        id
    }

    /// Queues `id` for removal at the end of the frame.
    pub fn queue_remove(&mut self, id: EntityId) {
        self.pending_remove.push(id);
    }

    /// Makes every queued addition live, calling `setup` on each first.
    ///
    /// Returns the number of entities added.
    pub fn apply_adds(&mut self, mut setup: impl FnMut(EntityId, &mut E)) -> usize {
        let added = self.pending_add.len();
        if added == 0 {
            return 0;
        }

        for (id, mut entity) in self.pending_add.drain(..) {
            setup(id, &mut entity);
            self.slots.insert(id, self.live.len());
            self.live.push((id, entity));
        }

        tracing::debug!(added, live = self.live.len(), "registry adds applied");
        added
    }

    /// Drops every entity queued for removal, calling `teardown` on each
    /// exactly once.
    ///
    /// Duplicate requests collapse to one teardown. Unknown ids are ignored.
    /// Returns the number of entities removed.
    pub fn apply_removes(&mut self, mut teardown: impl FnMut(EntityId, &mut E)) -> usize {
        if self.pending_remove.is_empty() {
            return 0;
        }

        let mut removed = 0;
        for id in self.pending_remove.drain(..) {
            // Taking the slot out of the map is what dedups repeated ids.
            match self.slots.remove(&id) {
                Some(slot) => {
                    let (_, entity) = &mut self.live[slot];
                    teardown(id, entity);
                    removed += 1;
                }
                None => tracing::debug!(id = id.raw(), "removal of unknown entity ignored"),
            }
        }

        if removed > 0 {
            let slots = &self.slots;
            self.live.retain(|(id, _)| slots.contains_key(id));
            for (index, (id, _)) in self.live.iter().enumerate() {
                self.slots.insert(*id, index);
            }
        }

        tracing::debug!(removed, live = self.live.len(), "registry removes applied");
        removed
    }

    /// Iterates over live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &E)> {
        self.live.iter().map(|(id, entity)| (*id, entity))
    }

    /// Iterates mutably over live entities in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut E)> {
        self.live.iter_mut().map(|(id, entity)| (*id, entity))
    }

    /// Gets a live entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&E> {
        let slot = *self.slots.get(&id)?;
        self.live.get(slot).map(|(_, entity)| entity)
    }

    /// Gets a live entity mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut E> {
        let slot = *self.slots.get(&id)?;
        self.live.get_mut(slot).map(|(_, entity)| entity)
    }

    /// True when `id` is live. Pending additions are not live.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// True when no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of queued additions.
    #[must_use]
    pub fn pending_adds(&self) -> usize {
        self.pending_add.len()
    }

    /// Number of queued removal requests, duplicates included.
    #[must_use]
    pub fn pending_removes(&self) -> usize {
        self.pending_remove.len()
    }
}
