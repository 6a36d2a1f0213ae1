//! The per-frame loop: drain finished texture loads, apply pointer input to
//! the orbit camera, draw once, then ask the platform for the next frame.
//!
//! Frames are paced by the surface's present mode. The loop itself never
//! skips, coalesces, or pauses a tick.

use std::time::Instant;

use tracing::info;

/// Lifecycle of the loop. `Idle` until the first tick, `Rendering` forever after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Rendering,
}

/// The four steps of one tick, in the order [`RenderLoop::tick`] runs them.
pub trait FrameSteps {
    type Error;

    /// Hand any completed background loads to the renderer.
    fn drain_loads(&mut self);

    /// Apply this tick's input to the camera.
    fn update_input(&mut self);

    /// Submit one frame.
    fn draw(&mut self) -> Result<(), Self::Error>;

    /// Schedule the next tick.
    fn request_next(&mut self);
}

/// Drives [`FrameSteps`] and counts ticks.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    tick_count: u64,
    started_at: Option<Instant>,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            tick_count: 0,
            started_at: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Seconds since the first tick, zero while idle.
    pub fn elapsed_secs(&self) -> f64 {
        self.started_at
            .map_or(0.0, |start| start.elapsed().as_secs_f64())
    }

    /// Move from `Idle` to `Rendering`. Returns `true` only on the transition.
    pub fn begin(&mut self) -> bool {
        if self.state == LoopState::Rendering {
            return false;
        }
        self.state = LoopState::Rendering;
        self.started_at = Some(Instant::now());
        info!("Render loop started");
        true
    }

    /// Run one tick. The next tick is requested even when the draw fails so
    /// the caller can recover (e.g. reconfigure a lost surface) and carry on.
    pub fn tick<S: FrameSteps>(&mut self, steps: &mut S) -> Result<(), S::Error> {
        self.begin();
        steps.drain_loads();
        steps.update_input();
        let drawn = steps.draw();
        steps.request_next();
        self.tick_count += 1;
        drawn
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}
