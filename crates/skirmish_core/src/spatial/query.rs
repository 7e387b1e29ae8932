//! # Neighbor Queries
//!
//! Read-only lookups against a [`SpatialIndex`] built for the current frame.

use crate::entity::{EntityKind, EntityProxy};
use crate::spatial::grid::{CellKey, SpatialIndex};

/// Query view over a built index.
///
/// Borrowing the index keeps queries and rebuilds from overlapping: the
/// index cannot change while a query is alive.
#[derive(Clone, Copy)]
pub struct NeighborQuery<'a> {
    index: &'a SpatialIndex,
    ring_bound: u32,
}

impl<'a> NeighborQuery<'a> {
    /// Creates a query view. `ring_bound` limits [`Self::nearest_opposing`]
    /// to radii `0..ring_bound`.
    #[inline]
    #[must_use]
    pub const fn new(index: &'a SpatialIndex, ring_bound: u32) -> Self {
        Self { index, ring_bound }
    }

    /// Configured ring bound.
    #[inline]
    #[must_use]
    pub const fn ring_bound(&self) -> u32 {
        self.ring_bound
    }

    /// The underlying index.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> &'a SpatialIndex {
        self.index
    }

    /// Writes every entity in the 3×3 cells around the center of `entity`
    /// into `out`, one entry per entity.
    ///
    /// `out` is cleared first; its capacity is reused. The result includes
    /// `entity` itself when it is indexed.
    pub fn nearby_into(&self, entity: &EntityProxy, out: &mut Vec<EntityProxy>) {
        out.clear();
        let center = self.index.cell_of(entity.center());

        // Saturating: cell coordinates clamp to the i32 range far from the origin.
        for y in center.y.saturating_sub(1)..=center.y.saturating_add(1) {
            for x in center.x.saturating_sub(1)..=center.x.saturating_add(1) {
                out.extend_from_slice(self.index.bucket(CellKey::new(x, y)));
            }
        }

        // Entities spanning several cells show up once per cell.
        out.sort_unstable_by_key(|p| p.entity);
        out.dedup_by_key(|p| p.entity);
    }

    /// Allocating form of [`Self::nearby_into`].
    #[must_use]
    pub fn nearby(&self, entity: &EntityProxy) -> Vec<EntityProxy> {
        let mut out = Vec::new();
        self.nearby_into(entity, &mut out);
        out
    }

    /// Expanding-ring search for the closest opposing actor.
    ///
    /// Ring 0 is the seeker's center cell; ring `r > 0` is the boundary of
    /// the `(2r+1)×(2r+1)` square around it. The first ring holding any
    /// candidate decides the answer, so a closer actor in the next ring out
    /// can lose to a farther one in this ring. Candidates are actors other
    /// than the seeker whose team bits differ from the seeker's.
    ///
    /// Returns `None` when no candidate lies within `ring_bound` rings.
    #[must_use]
    pub fn nearest_opposing(&self, seeker: &EntityProxy) -> Option<EntityProxy> {
        let center = self.index.cell_of(seeker.center());

        for radius in 0..self.ring_bound {
            let r = i32::try_from(radius).unwrap_or(i32::MAX);
            let (min_x, max_x) = (center.x.saturating_sub(r), center.x.saturating_add(r));
            let (min_y, max_y) = (center.y.saturating_sub(r), center.y.saturating_add(r));
            let mut best: Option<(f32, EntityProxy)> = None;

            for y in min_y..=max_y {
                if y == min_y || y == max_y {
                    for x in min_x..=max_x {
                        self.closest_in(CellKey::new(x, y), seeker, &mut best);
                    }
                } else {
                    // Interior rows only contribute their two end cells.
                    self.closest_in(CellKey::new(min_x, y), seeker, &mut best);
                    if max_x != min_x {
                        self.closest_in(CellKey::new(max_x, y), seeker, &mut best);
                    }
                }
            }

            if let Some((_, found)) = best {
                return Some(found);
            }
        }

        None
    }

    /// Folds the opposing actors of `cell` into `best` by squared distance.
    fn closest_in(&self, cell: CellKey, seeker: &EntityProxy, best: &mut Option<(f32, EntityProxy)>) {
        let origin = seeker.center();
        for candidate in self.index.bucket(cell) {
            if !is_opposing(seeker, candidate) {
                continue;
            }
            let d = origin.distance_squared(candidate.center());
            if best.map_or(true, |(best_d, _)| d < best_d) {
                *best = Some((d, *candidate));
            }
        }
    }
}

fn is_opposing(seeker: &EntityProxy, candidate: &EntityProxy) -> bool {
    candidate.kind == EntityKind::Actor
        && candidate.entity != seeker.entity
        && candidate.collision_type.opposes(seeker.collision_type)
}
