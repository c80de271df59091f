/// Timing for the frame being rendered, passed to before-render observers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInfo {
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Seconds since the scene started rendering.
    pub elapsed: f32,
    /// Index of this frame, starting at 1.
    pub frame: u64,
}

/// Accumulates frame deltas into scene time.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    elapsed: f64,
    frame: u64,
    last_delta: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds. Negative or non-finite deltas count as zero.
    pub fn tick(&mut self, dt: f32) -> FrameInfo {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt as f64;
        self.frame += 1;
        self.last_delta = dt;
        self.info()
    }

    pub fn info(&self) -> FrameInfo {
        FrameInfo {
            delta: self.last_delta,
            elapsed: self.elapsed as f32,
            frame: self.frame,
        }
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed as f32
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_accumulates() {
        let mut clock = FrameClock::new();
        clock.tick(0.5);
        let info = clock.tick(0.25);
        assert_eq!(info.frame, 2);
        assert!((info.elapsed - 0.75).abs() < 1e-6);
        assert_eq!(info.delta, 0.25);
    }

    #[test]
    fn test_bad_deltas_count_as_zero() {
        let mut clock = FrameClock::new();
        clock.tick(-1.0);
        clock.tick(f32::NAN);
        assert_eq!(clock.elapsed_secs(), 0.0);
        assert_eq!(clock.frame_count(), 2);
    }
}
