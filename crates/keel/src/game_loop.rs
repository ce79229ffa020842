//! # Game Loop
//!
//! ```text
//! Iteration N:
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. HOOK        caller input, pause/resume, spawning          │
//! │ 2. UPDATE      World::update (skipped while paused)          │
//! │ 3. STATS       record update time, flag frames over budget   │
//! │ 4. PACE        sleep out the rest of the frame budget        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The world permits `update` while paused; holding it still is this loop's
//! job.

use std::time::{Duration, Instant};

use keel_core::{World, WorldState};

use crate::config::LoopConfig;
use crate::error::EngineResult;

/// Timing for one loop iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Loop iteration number.
    pub iteration: u64,
    /// World frame after the iteration.
    pub frame: u64,
    /// Time spent in `World::update`, in microseconds.
    pub update_us: u64,
    /// Whether the update ran; `false` while paused.
    pub updated: bool,
}

/// Running totals over [`FrameStats`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameStatsAccumulator {
    /// Iterations recorded.
    pub frames_recorded: u64,
    /// Iterations skipped because the world was paused.
    pub frames_skipped: u64,
    /// Sum of update times.
    pub update_us_sum: u64,
    /// Shortest update.
    pub min_update_us: u64,
    /// Longest update.
    pub max_update_us: u64,
    /// Updates that took longer than the frame budget.
    pub frames_over_budget: u64,
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStatsAccumulator {
    /// Empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames_recorded: 0,
            frames_skipped: 0,
            update_us_sum: 0,
            min_update_us: u64::MAX,
            max_update_us: 0,
            frames_over_budget: 0,
        }
    }

    /// Records one iteration against `budget`.
    pub fn record(&mut self, stats: FrameStats, budget: Duration) {
        self.frames_recorded += 1;
        if !stats.updated {
            self.frames_skipped += 1;
            return;
        }
        self.update_us_sum += stats.update_us;
        self.min_update_us = self.min_update_us.min(stats.update_us);
        self.max_update_us = self.max_update_us.max(stats.update_us);
        if u128::from(stats.update_us) > budget.as_micros() {
            self.frames_over_budget += 1;
        }
    }

    /// Average update time in milliseconds over iterations that updated.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_update_ms(&self) -> f64 {
        let updated = self.frames_recorded - self.frames_skipped;
        if updated == 0 {
            return 0.0;
        }
        (self.update_us_sum as f64 / updated as f64) / 1000.0
    }
}

/// What the per-iteration hook wants the loop to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    /// Keep going.
    Continue,
    /// Stop before updating this iteration.
    Stop,
}

/// Frame-paced driver around a [`World`].
#[derive(Debug)]
pub struct GameLoop {
    world: World,
    config: LoopConfig,
    budget: Duration,
    iteration: u64,
    stats: FrameStatsAccumulator,
}

impl GameLoop {
    /// Wraps an already initialized world.
    #[must_use]
    pub fn new(world: World, config: LoopConfig) -> Self {
        let budget = Duration::from_secs(1) / config.target_fps.max(1);
        Self {
            world,
            config,
            budget,
            iteration: 0,
            stats: FrameStatsAccumulator::new(),
        }
    }

    /// Runs one iteration without pacing.
    ///
    /// # Errors
    ///
    /// Whatever `World::update` reports.
    pub fn tick(&mut self) -> EngineResult<FrameStats> {
        let updated = self.world.state() != WorldState::Paused;
        let mut update_us = 0;
        if updated {
            let started = Instant::now();
            self.world.update()?;
            update_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        }

        let stats = FrameStats {
            iteration: self.iteration,
            frame: self.world.frame(),
            update_us,
            updated,
        };
        self.stats.record(stats, self.budget);
        if updated && u128::from(update_us) > self.budget.as_micros() {
            tracing::warn!(
                frame = stats.frame,
                update_us,
                budget = ?self.budget,
                "Frame exceeded budget"
            );
        }
        tracing::trace!(iteration = self.iteration, updated, "Loop iteration");
        self.iteration += 1;
        Ok(stats)
    }

    /// Runs until the hook says stop or `max_frames` iterations have run.
    /// Returns the number of iterations run.
    ///
    /// # Errors
    ///
    /// The first error from the hook or the world; the loop stops there.
    pub fn run<F>(&mut self, mut hook: F) -> EngineResult<u64>
    where
        F: FnMut(&mut World, u64) -> EngineResult<LoopControl>,
    {
        let first = self.iteration;
        tracing::info!(
            target_fps = self.config.target_fps,
            max_frames = ?self.config.max_frames,
            "Game loop started"
        );

        loop {
            let run = self.iteration - first;
            if self.config.max_frames.is_some_and(|max| run >= max) {
                break;
            }
            let started = Instant::now();
            if hook(&mut self.world, self.iteration)? == LoopControl::Stop {
                break;
            }
            self.tick()?;
            if let Some(rest) = self.budget.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }

        let run = self.iteration - first;
        tracing::info!(
            iterations = run,
            frame = self.world.frame(),
            avg_update_ms = self.stats.avg_update_ms(),
            over_budget = self.stats.frames_over_budget,
            "Game loop stopped"
        );
        Ok(run)
    }

    /// The driven world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// The driven world, mutably.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Gives the world back.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }

    /// Per-frame time budget derived from `target_fps`.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Accumulated statistics.
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }
}
