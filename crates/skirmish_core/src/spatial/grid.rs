//! # Spatial Grid
//!
//! Uniform grid hash from integer cell coordinates to the entities whose
//! bounding rectangles overlap that cell. Rebuilt from scratch every frame.

use rustc_hash::FxHashMap;

use crate::entity::EntityProxy;
use crate::error::{CoreError, CoreResult};
use crate::geometry::{Rect, Vec2};

/// Integer grid coordinate: `(floor(x / cell_size), floor(y / cell_size))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl CellKey {
    /// Creates a cell key.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Per-frame grid index.
///
/// An entity spanning k cells is stored in k buckets. Entities without the
/// solid bit are never stored. Bucket vectors are recycled across rebuilds,
/// so once the grid has warmed up a rebuild does not touch the allocator.
pub struct SpatialIndex {
    /// Edge length of a cell in world units.
    cell_size: f32,
    /// Occupied cell -> slot in `buckets`.
    cells: FxHashMap<CellKey, usize>,
    /// Bucket storage. Only `buckets[..used]` belong to the current frame.
    buckets: Vec<Vec<EntityProxy>>,
    /// Buckets handed out since the last clear.
    used: usize,
    /// Total (entity, cell) entries since the last clear.
    entries: usize,
}

impl SpatialIndex {
    /// Creates an empty index.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCellSize`] unless `cell_size` is positive
    /// and finite.
    pub fn new(cell_size: f32) -> CoreResult<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(CoreError::InvalidCellSize(cell_size));
        }

        Ok(Self {
            cell_size,
            cells: FxHashMap::default(),
            buckets: Vec::new(),
            used: 0,
            entries: 0,
        })
    }

    /// Edge length of a cell.
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Grid coordinate of a single world coordinate.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_coord(&self, value: f32) -> i32 {
        (value / self.cell_size).floor() as i32
    }

    /// Cell containing `point`.
    #[inline]
    #[must_use]
    pub fn cell_of(&self, point: Vec2) -> CellKey {
        CellKey::new(self.cell_coord(point.x), self.cell_coord(point.y))
    }

    /// Inclusive `(min, max)` cell range covered by `bounds`.
    #[inline]
    #[must_use]
    pub fn cell_range(&self, bounds: &Rect) -> (CellKey, CellKey) {
        (
            CellKey::new(self.cell_coord(bounds.left), self.cell_coord(bounds.top)),
            CellKey::new(self.cell_coord(bounds.right), self.cell_coord(bounds.bottom)),
        )
    }

    /// Empties every bucket. Keeps all storage.
    pub fn clear(&mut self) {
        self.cells.clear();
        for bucket in &mut self.buckets[..self.used] {
            bucket.clear();
        }
        self.used = 0;
        self.entries = 0;
    }

    /// Inserts `proxy` into every cell its bounds overlap.
    ///
    /// Returns `false` (and stores nothing) when the proxy lacks the solid
    /// bit.
    pub fn insert(&mut self, proxy: EntityProxy) -> bool {
        if !proxy.collision_type.is_solid() {
            return false;
        }

        let (min, max) = self.cell_range(&proxy.bounds);
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                self.bucket_mut(CellKey::new(x, y)).push(proxy);
                self.entries += 1;
            }
        }
        true
    }

    /// Clears the index, then inserts every solid entity from `entities`.
    pub fn rebuild<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = EntityProxy>,
    {
        self.clear();
        for proxy in entities {
            self.insert(proxy);
        }
    }

    /// Contents of one cell. Empty when the cell is unoccupied.
    #[inline]
    #[must_use]
    pub fn bucket(&self, cell: CellKey) -> &[EntityProxy] {
        match self.cells.get(&cell) {
            Some(&slot) => &self.buckets[slot],
            None => &[],
        }
    }

    /// Number of occupied cells.
    #[inline]
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Total (entity, cell) entries.
    #[inline]
    #[must_use]
    pub const fn entry_count(&self) -> usize {
        self.entries
    }

    /// Iterates over occupied cells and their contents, in no fixed order.
    pub fn cells(&self) -> impl Iterator<Item = (CellKey, &[EntityProxy])> {
        self.cells
            .iter()
            .map(|(&key, &slot)| (key, self.buckets[slot].as_slice()))
    }

    /// Bucket for `key`, handing out a recycled vector on first touch.
    fn bucket_mut(&mut self, key: CellKey) -> &mut Vec<EntityProxy> {
        let next = self.used;
        let slot = *self.cells.entry(key).or_insert(next);
        if slot == next {
            if self.buckets.len() == next {
                self.buckets.push(Vec::new());
            }
            self.used += 1;
        }
        &mut self.buckets[slot]
    }
}
