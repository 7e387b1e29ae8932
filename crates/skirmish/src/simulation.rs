//! # Simulation
//!
//! Owns every piece of frame state and runs the five-phase pipeline:
//!
//! ```text
//! ┌────────────┐   ┌────────┐   ┌─────────┐   ┌───────────┐   ┌──────────────┐
//! │ IndexBuild │──>│ Update │──>│ Collide │──>│ ApplyAdds │──>│ ApplyRemoves │
//! └────────────┘   └────────┘   └─────────┘   └───────────┘   └──────────────┘
//!                       │             │
//!                       └─ spawns ────┴─ spawns, queued adds/removes
//! ```
//!
//! Registry actors, bullets and particles are separate fields so a frame
//! can hand out disjoint borrows: the index to queries, the registry and
//! bullet pool to the collision resolver, the command buffer to callbacks.

use std::time::{Duration, Instant};

use skirmish_core::{
    Body, BroadPhaseCollider, CollisionHandler, Entity, EntityId, EntityProxy, EntityRef,
    EntityRegistry, FrameCycle, FramePhase, NeighborQuery, ObjectPool, PoolHandle, PoolId,
    Poolable, SimConfig, SpatialIndex, Vec2,
};

use crate::actors::Actor;
use crate::commands::{Commands, FrameContext, SpawnRequest};
use crate::emitter::{ParticleBurst, ParticleEmitter};
use crate::error::{SimError, SimResult};
use crate::events::{EventBus, EventReceiver, EventSender, SimEvent};
use crate::game_loop::{micros_between, FrameStats};
use crate::pooled::{Bullet, BulletInit, Particle, BULLET_POOL, PARTICLE_POOL};

/// Spawn requests a typical frame produces before the buffer has to grow.
const COMMAND_CAPACITY: usize = 1024;

/// A running skirmish.
pub struct Simulation {
    config: SimConfig,
    registry: EntityRegistry<Actor>,
    bullets: ObjectPool<Bullet>,
    particles: ObjectPool<Particle>,
    index: SpatialIndex,
    collider: BroadPhaseCollider,
    cycle: FrameCycle,
    commands: Commands,
    emitter: ParticleEmitter,
    /// Per-frame snapshots of every solid entity. Reused.
    proxies: Vec<EntityProxy>,
    bus: EventBus,
    events: EventSender,
    frames_completed: u64,
}

impl Simulation {
    /// Builds a simulation. Pools are fully allocated here.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Core`] when `config` fails validation.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;

        let bus = EventBus::new(config.event_capacity);
        let events = bus.sender();
        let simulation = Self {
            registry: EntityRegistry::new(),
            bullets: ObjectPool::new(config.bullet_capacity, |_| Bullet::default())?,
            particles: ObjectPool::new(config.particle_capacity, |_| Particle::default())?,
            index: SpatialIndex::new(config.cell_size)?,
            collider: BroadPhaseCollider::with_capacity(config.bullet_capacity),
            cycle: FrameCycle::new(),
            commands: Commands::with_capacity(COMMAND_CAPACITY),
            emitter: ParticleEmitter::new(config.seed),
            proxies: Vec::with_capacity(config.bullet_capacity),
            bus,
            events,
            frames_completed: 0,
            config,
        };

        tracing::debug!(
            cell_size = simulation.config.cell_size,
            bullets = simulation.config.bullet_capacity,
            particles = simulation.config.particle_capacity,
            "simulation created"
        );
        Ok(simulation)
    }

    /// Queues `actor` for addition. It becomes live at the end of the next
    /// step and is first updated the step after that.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NonFiniteBounds`] when the actor's bounds contain
    /// NaN or infinity.
    pub fn add_actor(&mut self, actor: impl Into<Actor>) -> SimResult<EntityId> {
        let actor = actor.into();
        if !actor.bounds().is_finite() {
            return Err(SimError::NonFiniteBounds { kind: actor.kind() });
        }
        Ok(self.registry.queue_add(actor))
    }

    /// Queues `id` for removal at the end of the next step.
    pub fn remove_actor(&mut self, id: EntityId) {
        self.registry.queue_remove(id);
    }

    /// Spawns a bullet immediately, recycling the oldest slot if needed.
    pub fn fire_bullet(&mut self, bullet: BulletInit) -> PoolHandle {
        let mut scratch = FrameStats::default();
        spawn_tracked(&mut self.bullets, BULLET_POOL, bullet, &self.events, &mut scratch)
    }

    /// Emits a particle burst immediately.
    pub fn emit_burst(&mut self, origin: Vec2, burst: &ParticleBurst) {
        let mut scratch = FrameStats::default();
        let Self {
            emitter,
            particles,
            events,
            ..
        } = self;
        emitter.emit(origin, burst, |init| {
            spawn_tracked(particles, PARTICLE_POOL, init, events, &mut scratch);
        });
    }

    /// Runs one frame.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Core`] if the frame phases are entered out of
    /// order, which indicates a bug in this driver.
    pub fn step(&mut self, elapsed: Duration) -> SimResult<FrameStats> {
        let dt = elapsed.as_secs_f32();
        let frame_start = Instant::now();

        // 1. IndexBuild
        self.cycle.enter(FramePhase::IndexBuild)?;
        let mut stats = FrameStats {
            frame: self.cycle.frame(),
            dt,
            ..FrameStats::default()
        };
        self.snapshot();
        self.index.rebuild(self.proxies.iter().copied());
        stats.indexed_cells = self.index.occupied_cells();
        stats.index_entries = self.index.entry_count();
        let indexed = Instant::now();
        stats.index_us = micros_between(frame_start, indexed);

        // 2. Update
        self.cycle.enter(FramePhase::Update)?;
        {
            let mut ctx = FrameContext {
                neighbors: NeighborQuery::new(&self.index, self.config.nearest_ring_bound),
                commands: &mut self.commands,
                frame: stats.frame,
            };
            for (_, actor) in self.registry.iter_mut() {
                actor.update(dt, &mut ctx);
            }
            for (_, bullet) in self.bullets.iter_active_mut() {
                bullet.update(dt, &mut ctx);
            }
            for (_, particle) in self.particles.iter_active_mut() {
                particle.update(dt, &mut ctx);
            }
        }
        self.apply_spawns(&mut stats);
        let updated = Instant::now();
        stats.update_us = micros_between(indexed, updated);

        // 3. Collide
        self.cycle.enter(FramePhase::Collide)?;
        self.snapshot();
        {
            let mut resolver = PairResolver {
                registry: &mut self.registry,
                bullets: &mut self.bullets,
                ctx: FrameContext {
                    neighbors: NeighborQuery::new(&self.index, self.config.nearest_ring_bound),
                    commands: &mut self.commands,
                    frame: stats.frame,
                },
                events: &self.events,
                events_dropped: 0,
            };
            stats.sweep = self.collider.sweep(&self.proxies, &mut resolver);
            stats.events_dropped += resolver.events_dropped;
        }
        self.apply_spawns(&mut stats);
        for actor in self.commands.drain_adds() {
            if actor.bounds().is_finite() {
                self.registry.queue_add(actor);
            } else {
                tracing::warn!(kind = ?actor.kind(), "dropped queued actor with non-finite bounds");
            }
        }
        for id in self.commands.drain_removes() {
            self.registry.queue_remove(id);
        }
        let collided = Instant::now();
        stats.collide_us = micros_between(updated, collided);

        // 4. ApplyAdds
        self.cycle.enter(FramePhase::ApplyAdds)?;
        let events = &self.events;
        let mut dropped = 0;
        stats.added = self.registry.apply_adds(|id, actor| {
            Entity::<FrameContext<'_>>::setup(actor, id);
            if !events.send(SimEvent::EntityAdded { id }) {
                dropped += 1;
            }
        });

        // 5. ApplyRemoves
        self.cycle.enter(FramePhase::ApplyRemoves)?;
        stats.removed = self.registry.apply_removes(|id, actor| {
            Entity::<FrameContext<'_>>::teardown(actor);
            if !events.send(SimEvent::EntityRemoved { id }) {
                dropped += 1;
            }
        });
        stats.events_dropped += dropped;

        let finished = Instant::now();
        stats.flush_us = micros_between(collided, finished);
        stats.total_us = micros_between(frame_start, finished);
        stats.live_actors = self.registry.len();
        self.frames_completed += 1;

        tracing::trace!(
            frame = stats.frame,
            live = stats.live_actors,
            cells = stats.indexed_cells,
            pairs = stats.sweep.pairs_dispatched,
            bullets = stats.bullets_spawned,
            particles = stats.particles_spawned,
            evictions = stats.evictions,
            "frame complete"
        );
        Ok(stats)
    }

    /// Rebuilds `proxies` from live actors and active bullets.
    /// Particles are never solid and are left out.
    fn snapshot(&mut self) {
        self.proxies.clear();
        for (id, actor) in self.registry.iter() {
            push_finite(&mut self.proxies, actor.proxy(EntityRef::Registry(id)));
        }
        for (slot, bullet) in self.bullets.iter_active() {
            let entity = EntityRef::Pooled {
                pool: BULLET_POOL,
                slot,
            };
            push_finite(&mut self.proxies, bullet.proxy(entity));
        }
    }

    fn apply_spawns(&mut self, stats: &mut FrameStats) {
        let Self {
            commands,
            bullets,
            particles,
            emitter,
            events,
            ..
        } = self;

        for request in commands.drain_spawns() {
            match request {
                SpawnRequest::Bullet(init) => {
                    spawn_tracked(bullets, BULLET_POOL, init, events, stats);
                    stats.bullets_spawned += 1;
                }
                SpawnRequest::Burst { origin, burst } => {
                    emitter.emit(origin, &burst, |init| {
                        spawn_tracked(particles, PARTICLE_POOL, init, events, stats);
                        stats.particles_spawned += 1;
                    });
                }
            }
        }
    }

    /// The configuration this simulation was built with.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Live actor.
    #[must_use]
    pub fn actor(&self, id: EntityId) -> Option<&Actor> {
        self.registry.get(id)
    }

    /// Live actors in insertion order.
    pub fn actors(&self) -> impl Iterator<Item = (EntityId, &Actor)> {
        self.registry.iter()
    }

    /// The actor registry.
    #[must_use]
    pub fn registry(&self) -> &EntityRegistry<Actor> {
        &self.registry
    }

    /// The bullet pool.
    #[must_use]
    pub fn bullets(&self) -> &ObjectPool<Bullet> {
        &self.bullets
    }

    /// The particle pool.
    #[must_use]
    pub fn particles(&self) -> &ObjectPool<Particle> {
        &self.particles
    }

    /// Queries against the index built by the last step.
    #[must_use]
    pub fn neighbors(&self) -> NeighborQuery<'_> {
        NeighborQuery::new(&self.index, self.config.nearest_ring_bound)
    }

    /// A new receiver for simulation events.
    #[must_use]
    pub fn events(&self) -> EventReceiver {
        self.bus.receiver()
    }

    /// Steps run so far.
    #[must_use]
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }
}

fn push_finite(proxies: &mut Vec<EntityProxy>, proxy: EntityProxy) {
    if proxy.bounds.is_finite() {
        proxies.push(proxy);
    } else {
        tracing::warn!(entity = ?proxy.entity, "entity with non-finite bounds left out of frame");
    }
}

fn spawn_tracked<T: Poolable>(
    pool: &mut ObjectPool<T>,
    pool_id: PoolId,
    init: T::Init,
    events: &EventSender,
    stats: &mut FrameStats,
) -> PoolHandle {
    let evicting = pool.will_evict();
    let slot = pool.spawn(init);
    if evicting {
        stats.evictions += 1;
        if !events.send(SimEvent::PoolEviction { pool: pool_id, slot }) {
            stats.events_dropped += 1;
        }
    }
    slot
}

/// Connects the broad phase to the concrete entity storage.
struct PairResolver<'a> {
    registry: &'a mut EntityRegistry<Actor>,
    bullets: &'a mut ObjectPool<Bullet>,
    ctx: FrameContext<'a>,
    events: &'a EventSender,
    events_dropped: u32,
}

impl PairResolver<'_> {
    /// The entity behind `entity`, if it can still collide this frame.
    /// A bullet that already hit something earlier in the sweep cannot.
    fn body(&self, entity: EntityRef) -> Option<&dyn Body> {
        match entity {
            EntityRef::Registry(id) => self.registry.get(id).map(|actor| actor as &dyn Body),
            EntityRef::Pooled { pool, slot } if pool == BULLET_POOL => {
                self.bullets.get_active(slot).map(|bullet| bullet as &dyn Body)
            }
            EntityRef::Pooled { .. } => None,
        }
    }

    fn notify(&mut self, target: EntityRef, other: &EntityProxy) {
        match target {
            EntityRef::Registry(id) => {
                if let Some(actor) = self.registry.get_mut(id) {
                    actor.on_collision(other, &mut self.ctx);
                }
            }
            EntityRef::Pooled { pool, slot } if pool == BULLET_POOL => {
                if let Some(bullet) = self.bullets.get_active_mut(slot) {
                    bullet.on_collision(other, &mut self.ctx);
                }
            }
            EntityRef::Pooled { .. } => {}
        }
    }
}

impl CollisionHandler for PairResolver<'_> {
    fn test(&self, incoming: &EntityProxy, resident: &EntityProxy) -> bool {
        match (self.body(incoming.entity), self.body(resident.entity)) {
            (Some(body), Some(_)) => body.test_collision(resident),
            _ => false,
        }
    }

    fn dispatch(&mut self, incoming: &EntityProxy, resident: &EntityProxy) {
        self.notify(incoming.entity, resident);
        self.notify(resident.entity, incoming);

        let event = SimEvent::Collision {
            incoming: incoming.entity,
            resident: resident.entity,
        };
        if !self.events.send(event) {
            self.events_dropped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{CollisionType, CoreError};

    use crate::actors::{Asteroid, Ship};

    fn config() -> SimConfig {
        SimConfig {
            bullet_capacity: 32,
            particle_capacity: 256,
            ..SimConfig::default()
        }
    }

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_invalid_config_rejected() {
        let result = Simulation::new(SimConfig {
            cell_size: -1.0,
            ..config()
        });
        assert!(matches!(result, Err(SimError::Core(CoreError::InvalidCellSize(_)))));
    }

    #[test]
    fn test_non_finite_actor_rejected() {
        let mut sim = Simulation::new(config()).unwrap();
        let result = sim.add_actor(Asteroid::new(Vec2::new(f32::NAN, 0.0), Vec2::ZERO, 10.0));
        assert!(matches!(result, Err(SimError::NonFiniteBounds { .. })));
    }

    #[test]
    fn test_bullet_hit_spawns_impact_burst() {
        let mut sim = Simulation::new(config()).unwrap();
        let target = sim
            .add_actor(Ship::new(CollisionType::TEAM_ENEMY, Vec2::new(100.0, 100.0), Vec2::ZERO).holding_fire())
            .unwrap();
        sim.step(FRAME).unwrap();

        sim.fire_bullet(BulletInit {
            location: Vec2::new(100.0, 100.0),
            direction: Vec2::new(1.0, 0.0),
            speed: 1.0,
            team: CollisionType::TEAM_PLAYER,
        });
        let stats = sim.step(FRAME).unwrap();

        assert_eq!(stats.sweep.pairs_dispatched, 1);
        assert_eq!(stats.particles_spawned, ParticleBurst::impact().count);
        assert_eq!(sim.bullets().active_count(), 0);
        let ship = sim.actor(target).and_then(Actor::as_ship).unwrap();
        assert_eq!(ship.health(), crate::actors::SHIP_HEALTH - 1);
    }

    #[test]
    fn test_spent_bullet_cannot_hit_twice() {
        let mut sim = Simulation::new(config()).unwrap();
        let a = sim
            .add_actor(Ship::new(CollisionType::TEAM_ENEMY, Vec2::new(100.0, 100.0), Vec2::ZERO).holding_fire())
            .unwrap();
        let b = sim
            .add_actor(Ship::new(CollisionType::TEAM_ENEMY, Vec2::new(105.0, 100.0), Vec2::ZERO).holding_fire())
            .unwrap();
        sim.step(FRAME).unwrap();

        sim.fire_bullet(BulletInit {
            location: Vec2::new(102.0, 100.0),
            direction: Vec2::new(0.0, 1.0),
            speed: 0.0,
            team: CollisionType::TEAM_PLAYER,
        });
        sim.step(FRAME).unwrap();

        let health = |id| sim.actor(id).and_then(Actor::as_ship).map(Ship::health).unwrap();
        let hits = (crate::actors::SHIP_HEALTH - health(a)) + (crate::actors::SHIP_HEALTH - health(b));
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_queued_non_finite_actor_dropped() {
        let mut sim = Simulation::new(config()).unwrap();
        sim.commands
            .add_actor(Asteroid::new(Vec2::new(f32::INFINITY, 0.0), Vec2::ZERO, 10.0).into());
        sim.commands
            .add_actor(Asteroid::new(Vec2::new(50.0, 0.0), Vec2::ZERO, 10.0).into());

        let stats = sim.step(FRAME).unwrap();

        assert_eq!(stats.added, 1);
        assert_eq!(sim.registry().len(), 1);
        assert!(sim.commands.is_empty());
    }

    #[test]
    fn test_emit_burst_fills_particle_pool() {
        let mut sim = Simulation::new(config()).unwrap();
        sim.emit_burst(Vec2::ZERO, &ParticleBurst::default());
        assert_eq!(sim.particles().active_count(), 15);

        let stats = sim.step(FRAME).unwrap();
        // Particles are never indexed.
        assert_eq!(stats.index_entries, 0);
    }
}
