//! Round driver: runs the engine at a fixed tick rate and renders each tick.
//!
//! Every tick is one update pass (clock read, scheduler, matcher, progress)
//! followed by one render pass over the same state.

pub mod audio;
pub mod audio_thread;
pub mod clock;

use crate::input::InputSource;
use crate::models::stats::HitStats;
use crate::render::{LayeredRenderCache, RedrawCounts, Surface};
use crate::state::game::GameEngine;
use serde::Serialize;
use std::thread;
use std::time::{Duration, Instant};

/// Maximum catch-up ticks per loop iteration in realtime mode.
const MAX_CATCH_UP_TICKS: u32 = 10;
/// Extra seconds allowed past the expected end before the driver gives up.
const OVERRUN_GRACE_SECS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub ticks_per_second: u32,
    /// Pace ticks against the wall clock instead of running flat out.
    pub realtime: bool,
}

impl RunOptions {
    pub fn new(ticks_per_second: u32, realtime: bool) -> Self {
        Self {
            ticks_per_second: ticks_per_second.max(1),
            realtime,
        }
    }

    fn target_dt(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ticks_per_second as f64)
    }
}

/// Result of a completed round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub title: String,
    pub score: u32,
    pub max_streak: u32,
    pub health: u32,
    pub health_max: u32,
    pub stats: HitStats,
    pub accuracy: f64,
    pub ticks: u64,
    /// False when the driver stopped at its tick limit.
    pub finished: bool,
    #[serde(skip)]
    pub redraws: RedrawCounts,
}

/// Renders the current state of `engine` into `frame`.
pub fn render_frame(engine: &mut GameEngine, cache: &mut LayeredRenderCache, frame: &mut Surface) {
    let snapshot = engine.snapshot();
    cache.render(frame, &snapshot, engine.dirty_flags_mut());
}

/// One update pass followed by one render pass.
fn step(
    engine: &mut GameEngine,
    input: &mut dyn InputSource,
    cache: &mut LayeredRenderCache,
    frame: &mut Surface,
) {
    engine.tick(input);
    render_frame(engine, cache, frame);
}

/// Drives `engine` until the round finishes.
///
/// Returns the summary and the last composed frame.
pub fn run_round(
    engine: &mut GameEngine,
    input: &mut dyn InputSource,
    cache: &mut LayeredRenderCache,
    options: &RunOptions,
) -> (RoundSummary, Surface) {
    let mut frame = cache.new_frame();
    let max_ticks =
        ((engine.end_seconds() + OVERRUN_GRACE_SECS) * options.ticks_per_second as f64) as u64;
    let mut ticks: u64 = 0;

    log::info!(
        "LOGIC: Round loop started ({} TPS, {})",
        options.ticks_per_second,
        if options.realtime { "realtime" } else { "simulated" }
    );

    if options.realtime {
        let target_dt = options.target_dt();
        let mut accumulator = Duration::ZERO;
        let mut last_time = Instant::now();

        while !engine.is_finished() && ticks < max_ticks {
            let now = Instant::now();
            accumulator += now - last_time;
            last_time = now;

            let mut loops = 0;
            while accumulator >= target_dt && loops < MAX_CATCH_UP_TICKS {
                step(engine, input, cache, &mut frame);
                ticks += 1;
                accumulator -= target_dt;
                loops += 1;
            }

            if loops == 0 {
                thread::sleep(Duration::from_millis(1));
            }
        }
    } else {
        while !engine.is_finished() && ticks < max_ticks {
            step(engine, input, cache, &mut frame);
            ticks += 1;
        }
    }

    let finished = engine.is_finished();
    if !finished {
        log::warn!("LOGIC: Tick limit {} reached before playback ended", max_ticks);
    }

    let progress = engine.progress();
    let summary = RoundSummary {
        title: engine.chart().title().to_string(),
        score: progress.score(),
        max_streak: progress.max_streak(),
        health: progress.health(),
        health_max: progress.health_max(),
        stats: progress.stats().clone(),
        accuracy: progress.stats().calculate_accuracy(),
        ticks,
        finished,
        redraws: cache.counts(),
    };
    log::info!("LOGIC: Round loop stopped after {} ticks", ticks);
    (summary, frame)
}
