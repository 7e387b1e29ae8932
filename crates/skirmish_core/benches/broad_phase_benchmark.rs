//! # Broad Phase Benchmark
//!
//! Per-frame kernel costs at realistic population sizes:
//! 1. Spatial index rebuild (warm buckets)
//! 2. Sweep-and-prune pass with a team-mask test
//! 3. Pool spawn throughput under constant eviction
//!
//! Target: 10k solid entities indexed and swept well inside a 16.6ms frame.

#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use skirmish_core::{
    BroadPhaseCollider, CollisionHandler, CollisionType, EntityId, EntityKind, EntityProxy,
    EntityRef, NeighborQuery, ObjectPool, Poolable, Rect, SpatialIndex, Vec2,
};

/// Deterministic scatter over a 10k x 10k world.
#[allow(clippy::cast_precision_loss)]
fn scatter(count: usize, seed: u64) -> Vec<EntityProxy> {
    let mut state = seed;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 10_000) as f32
    };

    (0..count as u64)
        .map(|i| {
            let team = if i % 2 == 0 {
                CollisionType::TEAM_PLAYER
            } else {
                CollisionType::TEAM_ENEMY
            };
            EntityProxy {
                entity: EntityRef::Registry(EntityId::from_raw(i)),
                kind: EntityKind::Actor,
                bounds: Rect::from_center(Vec2::new(next(), next()), 20.0, 20.0),
                collision_type: CollisionType::SOLID | team,
            }
        })
        .collect()
}

struct Counter(usize);

impl CollisionHandler for Counter {
    fn test(&self, incoming: &EntityProxy, resident: &EntityProxy) -> bool {
        incoming.collision_type.opposes(resident.collision_type)
    }

    fn dispatch(&mut self, _incoming: &EntityProxy, _resident: &EntityProxy) {
        self.0 += 1;
    }
}

#[derive(Default)]
struct Spark {
    ttl: f32,
    active: bool,
}

impl Poolable for Spark {
    type Init = f32;

    fn is_active(&self) -> bool {
        self.active
    }

    fn reset(&mut self, init: f32) {
        self.ttl = init;
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

fn bench_index_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_index_rebuild");

    for count in [1_000, 10_000, 50_000] {
        let proxies = scatter(count, 0x9E37_79B9);
        let mut index = SpatialIndex::new(200.0).unwrap();
        index.rebuild(proxies.iter().copied());

        group.bench_with_input(BenchmarkId::from_parameter(count), &proxies, |b, proxies| {
            b.iter(|| {
                index.rebuild(proxies.iter().copied());
                black_box(index.entry_count())
            });
        });
    }

    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("broad_phase_sweep");

    for count in [1_000, 10_000, 50_000] {
        let proxies = scatter(count, 0xDEAD_BEEF);
        let mut collider = BroadPhaseCollider::with_capacity(count);

        group.bench_with_input(BenchmarkId::from_parameter(count), &proxies, |b, proxies| {
            b.iter(|| {
                let mut counter = Counter(0);
                let stats = collider.sweep(proxies, &mut counter);
                black_box((stats, counter.0))
            });
        });
    }

    group.finish();
}

fn bench_nearest_opposing(c: &mut Criterion) {
    let proxies = scatter(10_000, 0x0BAD_F00D);
    let mut index = SpatialIndex::new(200.0).unwrap();
    index.rebuild(proxies.iter().copied());
    let query = NeighborQuery::new(&index, 20);

    c.bench_function("nearest_opposing_10k", |b| {
        b.iter(|| {
            let mut found = 0;
            for seeker in proxies.iter().take(1_000) {
                if query.nearest_opposing(seeker).is_some() {
                    found += 1;
                }
            }
            black_box(found)
        });
    });
}

fn bench_pool_spawn(c: &mut Criterion) {
    let mut pool = ObjectPool::new(50_000, |_| Spark::default()).unwrap();

    c.bench_function("pool_spawn_50k_with_eviction", |b| {
        b.iter(|| {
            for _ in 0..50_000 {
                black_box(pool.spawn(3.0));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_index_rebuild,
    bench_sweep,
    bench_nearest_opposing,
    bench_pool_spawn
);
criterion_main!(benches);
