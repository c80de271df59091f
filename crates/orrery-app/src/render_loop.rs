//! Variable-step render loop.
//!
//! The scene animates in wall-clock seconds, so each redraw advances it by
//! the time elapsed since the previous one. Long stalls (a dragged window,
//! a debugger pause) are clamped so the camera does not jump to the end of
//! a transition in a single frame.

use std::time::Instant;
use tracing::{info, warn};

/// Maximum frame time clamp: 250ms, i.e. a 4 FPS floor.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Frame pacing state for the redraw-driven render loop.
///
/// Call [`tick`](Self::tick) once per redraw; it returns the seconds to
/// advance the scene by, or `None` once the loop is stopped.
#[derive(Debug)]
pub struct RenderLoop {
    previous_time: Option<Instant>,
    running: bool,
    total_time: f64,
    frame_count: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            previous_time: None,
            running: false,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Start measuring from `now`. Restarting a running loop only resets
    /// the reference instant.
    pub fn start(&mut self, now: Instant) {
        if !self.running {
            info!("Render loop started");
        }
        self.previous_time = Some(now);
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            info!(frames = self.frame_count, "Render loop stopped");
        }
        self.running = false;
        self.previous_time = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Measure the time since the previous tick and return it, clamped to
    /// [`MAX_FRAME_TIME`].
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        if !self.running {
            return None;
        }
        let previous = self.previous_time.replace(now).unwrap_or(now);
        let mut frame_time = now.saturating_duration_since(previous).as_secs_f64();

        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.total_time += frame_time;
        self.frame_count += 1;
        Some(frame_time as f32)
    }

    /// Total number of ticks that produced a frame.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Sum of all (clamped) frame times in seconds.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}
