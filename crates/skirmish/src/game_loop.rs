//! # SKIRMISH Game Loop
//!
//! Host-side driver around [`Simulation::step`]:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. MEASURE DELTA                                                    │
//! │    └─ Wall clock since last tick, clamped to max_frame_dt          │
//! │                                                                     │
//! │ 2. STEP SIMULATION                                                  │
//! │    ├─ IndexBuild  - grid rebuilt from live + active pooled         │
//! │    ├─ Update      - actors, bullets, particles                     │
//! │    ├─ Collide     - sweep and prune, dispatch pairs                │
//! │    ├─ ApplyAdds   - queued actors become live                      │
//! │    └─ ApplyRemoves- queued actors torn down                        │
//! │                                                                     │
//! │ 3. RECORD STATS                                                     │
//! │    └─ Accumulate timings, warn when over budget                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use skirmish_core::{SimConfig, SweepStats, DEFAULT_MAX_FRAME_DT};

use crate::error::SimResult;
use crate::simulation::Simulation;

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Maximum allowed frame time before warning.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(33);

/// Configuration for the game loop.
#[derive(Clone, Debug)]
pub struct GameLoopConfig {
    /// Upper clamp for the simulated delta, in seconds.
    pub max_frame_dt: f32,
    /// Log frames that exceed [`MAX_FRAME_TIME`].
    pub enable_timing_logs: bool,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
            enable_timing_logs: true,
        }
    }
}

impl From<&SimConfig> for GameLoopConfig {
    fn from(config: &SimConfig) -> Self {
        Self {
            max_frame_dt: config.max_frame_dt,
            ..Self::default()
        }
    }
}

impl GameLoopConfig {
    /// The delta clamp as a [`Duration`]. A zero, negative, NaN or overflowing
    /// `max_frame_dt` falls back to the default clamp.
    #[must_use]
    pub fn max_delta(&self) -> Duration {
        match Duration::try_from_secs_f32(self.max_frame_dt) {
            Ok(max) if !max.is_zero() => max,
            _ => Duration::from_secs_f32(DEFAULT_MAX_FRAME_DT),
        }
    }
}

/// Statistics for one simulated frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Simulated seconds.
    pub dt: f32,
    /// Total frame time in microseconds.
    pub total_us: u64,
    /// Index rebuild time in microseconds.
    pub index_us: u64,
    /// Update phase time (including spawn application) in microseconds.
    pub update_us: u64,
    /// Collide phase time (including spawn application) in microseconds.
    pub collide_us: u64,
    /// Registry flush time in microseconds.
    pub flush_us: u64,
    /// Occupied grid cells.
    pub indexed_cells: usize,
    /// (entity, cell) entries in the grid.
    pub index_entries: usize,
    /// Broad phase counters.
    pub sweep: SweepStats,
    /// Bullets spawned this frame.
    pub bullets_spawned: u32,
    /// Particles spawned this frame.
    pub particles_spawned: u32,
    /// Spawns that overwrote an active pool slot.
    pub evictions: u32,
    /// Actors that became live.
    pub added: usize,
    /// Actors that were torn down.
    pub removed: usize,
    /// Live actors after the flush.
    pub live_actors: usize,
    /// Events dropped because the channel was full.
    pub events_dropped: u32,
}

/// The host game loop.
///
/// Owns the simulation and measures wall-clock time between ticks.
pub struct GameLoop {
    /// The simulation being driven.
    simulation: Simulation,
    /// Configuration.
    config: GameLoopConfig,
    /// Last tick start time.
    last_frame_time: Instant,
    /// Accumulated frame statistics.
    stats_accumulator: FrameStatsAccumulator,
}

impl GameLoop {
    /// Creates a new game loop around `simulation`.
    ///
    /// # Arguments
    ///
    /// * `simulation` - The simulation to drive
    /// * `config` - Configuration for the game loop
    #[must_use]
    pub fn new(simulation: Simulation, config: GameLoopConfig) -> Self {
        Self {
            simulation,
            config,
            last_frame_time: Instant::now(),
            stats_accumulator: FrameStatsAccumulator::new(),
        }
    }

    /// Steps the simulation by the wall-clock time since the previous tick.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Simulation::step`].
    pub fn tick(&mut self) -> SimResult<FrameStats> {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.tick_with(delta)
    }

    /// Steps the simulation by a host-chosen delta. Used for fixed-step and
    /// headless runs.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Simulation::step`].
    pub fn tick_with(&mut self, delta: Duration) -> SimResult<FrameStats> {
        // Clamp delta time to prevent tunnelling after a pause
        let delta = delta.min(self.config.max_delta());

        let stats = self.simulation.step(delta)?;
        self.end_frame(stats);
        Ok(stats)
    }

    fn end_frame(&mut self, stats: FrameStats) {
        self.stats_accumulator.record(stats);

        if self.config.enable_timing_logs && stats.total_us > duration_us(MAX_FRAME_TIME) {
            tracing::warn!(
                frame = stats.frame,
                frame_ms = micros_to_ms(stats.total_us),
                target_ms = micros_to_ms(duration_us(TARGET_FRAME_TIME)),
                "frame exceeded budget"
            );
        }
    }

    /// Returns the simulation.
    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Returns the simulation mutably (to add actors between ticks).
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }

    /// Consumes the loop and hands back the simulation.
    #[must_use]
    pub fn into_simulation(self) -> Simulation {
        self.simulation
    }
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of index rebuild times.
    pub index_us_sum: u64,
    /// Sum of update phase times.
    pub update_us_sum: u64,
    /// Sum of collide phase times.
    pub collide_us_sum: u64,
    /// Sum of flush times.
    pub flush_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    /// Collision pairs dispatched.
    pub collisions: u64,
    /// Pool evictions.
    pub evictions: u64,
    /// Actors removed.
    pub removed: u64,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            index_us_sum: 0,
            update_us_sum: 0,
            collide_us_sum: 0,
            flush_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            collisions: 0,
            evictions: 0,
            removed: 0,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.index_us_sum += stats.index_us;
        self.update_us_sum += stats.update_us;
        self.collide_us_sum += stats.collide_us;
        self.flush_us_sum += stats.flush_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        self.collisions += stats.sweep.pairs_dispatched as u64;
        self.evictions += u64::from(stats.evictions);
        self.removed += stats.removed as u64;

        if stats.total_us > duration_us(TARGET_FRAME_TIME) {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    pub fn avg_frame_ms(&self) -> f64 {
        self.average_ms(self.total_us_sum)
    }

    /// Returns average FPS.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    #[allow(clippy::cast_precision_loss)]
    fn average_ms(&self, sum_us: u64) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (sum_us as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Prints a summary of the statistics.
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                    FRAME STATISTICS SUMMARY                      ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();
        println!("┌─ TIMING ─────────────────────────────────────────────────────────┐");
        println!("│ Frames Recorded:    {}", self.frames_recorded);
        println!("│ Average Frame:      {:.3} ms ({:.1} FPS)", self.avg_frame_ms(), self.avg_fps());
        if self.frames_recorded > 0 {
            println!("│ Min Frame:          {:.3} ms", micros_to_ms(self.min_frame_us));
            println!("│ Max Frame:          {:.3} ms", micros_to_ms(self.max_frame_us));
        }
        println!("└──────────────────────────────────────────────────────────────────┘");
        println!();
        println!("┌─ BUDGET ─────────────────────────────────────────────────────────┐");
        println!("│ Target:             {:.3} ms (60 FPS)", micros_to_ms(duration_us(TARGET_FRAME_TIME)));
        println!(
            "│ Over Budget:        {} frames ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        );
        println!("└──────────────────────────────────────────────────────────────────┘");

        if self.frames_recorded > 0 {
            println!();
            println!("┌─ BREAKDOWN ──────────────────────────────────────────────────────┐");
            println!("│ Index:              {:.3} ms", self.average_ms(self.index_us_sum));
            println!("│ Update:             {:.3} ms", self.average_ms(self.update_us_sum));
            println!("│ Collide:            {:.3} ms", self.average_ms(self.collide_us_sum));
            println!("│ Flush:              {:.3} ms", self.average_ms(self.flush_us_sum));
            println!("└──────────────────────────────────────────────────────────────────┘");
            println!();
            println!("┌─ SIMULATION ─────────────────────────────────────────────────────┐");
            println!("│ Collisions:         {}", self.collisions);
            println!("│ Pool Evictions:     {}", self.evictions);
            println!("│ Actors Removed:     {}", self.removed);
            println!("└──────────────────────────────────────────────────────────────────┘");
        }
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Microseconds elapsed between two instants.
pub(crate) fn micros_between(start: Instant, end: Instant) -> u64 {
    duration_us(end.saturating_duration_since(start))
}

fn duration_us(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

#[allow(clippy::cast_precision_loss)]
fn micros_to_ms(us: u64) -> f64 {
    us as f64 / 1000.0
}
