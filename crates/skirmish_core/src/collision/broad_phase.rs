//! # Broad Phase
//!
//! Sort-and-sweep over the X axis. Every solid entity contributes a start
//! endpoint at `bounds.left` and an end endpoint at `bounds.right`; while
//! sweeping, each newly started entity is tested against every entity still
//! open on the X axis.
//!
//! Dispatch order is deterministic for a given input order: endpoints are
//! sorted by `(x, insertion sequence)` and the incoming entity is always
//! notified before the resident one.

use std::cmp::Ordering;

use crate::entity::EntityProxy;

/// Receives candidate pairs from [`BroadPhaseCollider::sweep`].
///
/// `incoming` is the entity whose start endpoint is being processed,
/// `resident` the one already open on the sweep axis.
pub trait CollisionHandler {
    /// Entity-defined compatibility check. Only called when the bounding
    /// rectangles intersect.
    fn test(&self, incoming: &EntityProxy, resident: &EntityProxy) -> bool;

    /// Reacts to a confirmed pair.
    fn dispatch(&mut self, incoming: &EntityProxy, resident: &EntityProxy);
}

/// Counters for one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Endpoints sorted (two per solid entity).
    pub endpoints: usize,
    /// Candidate pairs whose X intervals overlap.
    pub pairs_tested: usize,
    /// Candidate pairs whose rectangles intersect.
    pub pairs_overlapping: usize,
    /// Pairs that passed the entity test and were dispatched.
    pub pairs_dispatched: usize,
}

#[derive(Clone, Copy, Debug)]
struct Endpoint {
    value: f32,
    seq: usize,
    proxy: usize,
    is_start: bool,
}

/// Sweep-and-prune collider. Buffers are reused between frames.
#[derive(Debug, Default)]
pub struct BroadPhaseCollider {
    endpoints: Vec<Endpoint>,
    /// Indices into the proxy slice, in the order they were opened.
    active: Vec<usize>,
}

impl BroadPhaseCollider {
    /// Creates a collider with empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collider sized for `entities` solid entities.
    #[must_use]
    pub fn with_capacity(entities: usize) -> Self {
        Self {
            endpoints: Vec::with_capacity(entities * 2),
            active: Vec::with_capacity(entities),
        }
    }

    /// Runs one sweep over `proxies`, dispatching every confirmed pair once.
    ///
    /// Proxies without the solid bit are skipped.
    pub fn sweep<H>(&mut self, proxies: &[EntityProxy], handler: &mut H) -> SweepStats
    where
        H: CollisionHandler + ?Sized,
    {
        self.endpoints.clear();
        self.active.clear();

        for (proxy, p) in proxies.iter().enumerate() {
            if !p.collision_type.is_solid() {
                continue;
            }
            let seq = self.endpoints.len();
            self.endpoints.push(Endpoint {
                value: p.bounds.left,
                seq,
                proxy,
                is_start: true,
            });
            self.endpoints.push(Endpoint {
                value: p.bounds.right,
                seq: seq + 1,
                proxy,
                is_start: false,
            });
        }

        // The sequence tie-break makes the unstable sort behave like a
        // stable one.
        self.endpoints.sort_unstable_by(|a, b| match a.value.total_cmp(&b.value) {
            Ordering::Equal => a.seq.cmp(&b.seq),
            other => other,
        });

        let mut stats = SweepStats {
            endpoints: self.endpoints.len(),
            ..SweepStats::default()
        };

        for endpoint in &self.endpoints {
            if !endpoint.is_start {
                if let Some(pos) = self.active.iter().position(|&i| i == endpoint.proxy) {
                    self.active.remove(pos);
                }
                continue;
            }

            let incoming = &proxies[endpoint.proxy];
            for &open in &self.active {
                let resident = &proxies[open];
                stats.pairs_tested += 1;

                if !incoming.bounds.intersects(&resident.bounds) {
                    continue;
                }
                stats.pairs_overlapping += 1;

                if handler.test(incoming, resident) {
                    handler.dispatch(incoming, resident);
                    stats.pairs_dispatched += 1;
                }
            }
            self.active.push(endpoint.proxy);
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollisionType;
    use crate::entity::{EntityId, EntityKind, EntityRef};
    use crate::geometry::Rect;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(EntityRef, EntityRef)>,
    }

    impl CollisionHandler for Recorder {
        fn test(&self, incoming: &EntityProxy, resident: &EntityProxy) -> bool {
            incoming.collision_type.opposes(resident.collision_type)
        }

        fn dispatch(&mut self, incoming: &EntityProxy, resident: &EntityProxy) {
            self.calls.push((incoming.entity, resident.entity));
        }
    }

    fn proxy(raw: u64, bounds: Rect, team: CollisionType) -> EntityProxy {
        EntityProxy {
            entity: EntityRef::Registry(EntityId::from_raw(raw)),
            kind: EntityKind::Actor,
            bounds,
            collision_type: CollisionType::SOLID | team,
        }
    }

    fn id(raw: u64) -> EntityRef {
        EntityRef::Registry(EntityId::from_raw(raw))
    }

    #[test]
    fn test_overlapping_pair_dispatched_once_incoming_first() {
        let a = proxy(1, Rect::new(0.0, 0.0, 20.0, 20.0), CollisionType::TEAM_PLAYER);
        let b = proxy(2, Rect::new(10.0, 10.0, 30.0, 30.0), CollisionType::TEAM_ENEMY);
        let mut collider = BroadPhaseCollider::new();
        let mut recorder = Recorder::default();

        let stats = collider.sweep(&[b, a], &mut recorder);

        // `a` starts first on X, so `b` is the incoming side.
        assert_eq!(recorder.calls, vec![(id(2), id(1))]);
        assert_eq!(stats.endpoints, 4);
        assert_eq!(stats.pairs_dispatched, 1);
    }

    #[test]
    fn test_x_overlap_without_y_overlap_is_not_a_pair() {
        let a = proxy(1, Rect::new(0.0, 0.0, 20.0, 20.0), CollisionType::TEAM_PLAYER);
        let b = proxy(2, Rect::new(10.0, 100.0, 30.0, 120.0), CollisionType::TEAM_ENEMY);
        let mut recorder = Recorder::default();

        let stats = BroadPhaseCollider::new().sweep(&[a, b], &mut recorder);

        assert!(recorder.calls.is_empty());
        assert_eq!(stats.pairs_tested, 1);
        assert_eq!(stats.pairs_overlapping, 0);
    }

    #[test]
    fn test_incompatible_pair_is_not_dispatched() {
        let a = proxy(1, Rect::new(0.0, 0.0, 20.0, 20.0), CollisionType::TEAM_PLAYER);
        let b = proxy(2, Rect::new(10.0, 10.0, 30.0, 30.0), CollisionType::TEAM_PLAYER);
        let mut recorder = Recorder::default();

        let stats = BroadPhaseCollider::new().sweep(&[a, b], &mut recorder);

        assert!(recorder.calls.is_empty());
        assert_eq!(stats.pairs_overlapping, 1);
        assert_eq!(stats.pairs_dispatched, 0);
    }

    #[test]
    fn test_non_solid_proxies_are_skipped() {
        let a = proxy(1, Rect::new(0.0, 0.0, 20.0, 20.0), CollisionType::TEAM_PLAYER);
        let mut ghost = proxy(2, Rect::new(10.0, 10.0, 30.0, 30.0), CollisionType::TEAM_ENEMY);
        ghost.collision_type = ghost.collision_type.without(CollisionType::SOLID);
        let mut recorder = Recorder::default();

        let stats = BroadPhaseCollider::new().sweep(&[a, ghost], &mut recorder);

        assert_eq!(stats.endpoints, 2);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_touching_edges_on_x_never_meet() {
        let a = proxy(1, Rect::new(0.0, 0.0, 10.0, 10.0), CollisionType::TEAM_PLAYER);
        let b = proxy(2, Rect::new(10.0, 0.0, 20.0, 10.0), CollisionType::TEAM_ENEMY);
        let mut recorder = Recorder::default();

        let stats = BroadPhaseCollider::new().sweep(&[a, b], &mut recorder);

        assert_eq!(stats.pairs_tested, 0);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_each_pair_once_in_a_cluster() {
        let teams = [CollisionType::TEAM_PLAYER, CollisionType::TEAM_ENEMY];
        let proxies: Vec<EntityProxy> = (0..6)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let offset = i as f32;
                proxy(i, Rect::new(offset, offset, 50.0 + offset, 50.0 + offset), teams[(i % 2) as usize])
            })
            .collect();
        let mut recorder = Recorder::default();

        BroadPhaseCollider::new().sweep(&proxies, &mut recorder);

        // 3 player x 3 enemy.
        assert_eq!(recorder.calls.len(), 9);
        let mut unique = recorder.calls.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 9);
    }
}
