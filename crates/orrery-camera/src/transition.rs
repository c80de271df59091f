//! Animated moves of the orbit camera's target and radius.

use glam::Vec3;

use crate::EasingFunction;

/// The part of an orbit camera that navigation animates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitPose {
    /// Look-at point.
    pub target: Vec3,
    /// Distance from the target.
    pub radius: f32,
}

impl OrbitPose {
    pub fn new(target: Vec3, radius: f32) -> Self {
        Self { target, radius }
    }
}

/// When attached to an [`OrbitCamera`](crate::OrbitCamera), moves its target
/// and radius in lock-step from one pose to another. The camera drops the
/// transition once it completes; starting a new one replaces it.
#[derive(Clone, Debug)]
pub struct CameraTransition {
    /// Pose at the start of the transition.
    pub from: OrbitPose,
    /// Pose at the end of the transition.
    pub to: OrbitPose,
    /// Total length in animation frames (at least 1).
    pub duration_frames: u32,
    /// Animation frames per second of wall time.
    pub frame_rate: f32,
    /// Animation frames played so far, fractional.
    pub elapsed_frames: f32,
    /// Easing curve shared by target and radius.
    pub easing: EasingFunction,
}

impl CameraTransition {
    pub fn new(
        from: OrbitPose,
        to: OrbitPose,
        duration_frames: u32,
        frame_rate: f32,
        easing: EasingFunction,
    ) -> Self {
        Self {
            from,
            to,
            duration_frames: duration_frames.max(1),
            frame_rate: if frame_rate > 0.0 { frame_rate } else { 60.0 },
            elapsed_frames: 0.0,
            easing,
        }
    }

    /// Pose at an arbitrary animation frame. Frame 0 (or earlier) is exactly
    /// `from`; the last frame (or later) is exactly `to`.
    pub fn sample_at(&self, frame: f32) -> OrbitPose {
        if frame <= 0.0 {
            return self.from;
        }
        if frame >= self.duration_frames as f32 {
            return self.to;
        }
        let t = self.easing.apply(frame / self.duration_frames as f32);
        OrbitPose {
            target: self.from.target.lerp(self.to.target, t),
            radius: self.from.radius + (self.to.radius - self.from.radius) * t,
        }
    }

    /// Pose at the current playback position.
    pub fn current(&self) -> OrbitPose {
        self.sample_at(self.elapsed_frames)
    }

    /// Play `dt` seconds of the animation and return the resulting pose.
    pub fn advance(&mut self, dt: f32) -> OrbitPose {
        self.elapsed_frames += dt.max(0.0) * self.frame_rate;
        self.current()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_frames >= self.duration_frames as f32
    }

    /// Wall-clock length of the whole transition.
    pub fn duration_secs(&self) -> f32 {
        self.duration_frames as f32 / self.frame_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose_a() -> OrbitPose {
        OrbitPose::new(Vec3::ZERO, 40.0)
    }

    fn pose_b() -> OrbitPose {
        OrbitPose::new(Vec3::new(100.0, -20.0, 50.0), 8.0)
    }

    fn transition() -> CameraTransition {
        CameraTransition::new(pose_a(), pose_b(), 100, 60.0, EasingFunction::CubicInOut)
    }

    #[test]
    fn test_frame_zero_is_exactly_from() {
        assert_eq!(transition().sample_at(0.0), pose_a());
    }

    #[test]
    fn test_last_frame_is_exactly_to() {
        let t = transition();
        assert_eq!(t.sample_at(100.0), pose_b());
        assert_eq!(t.sample_at(250.0), pose_b());
    }

    #[test]
    fn test_midpoint_is_strictly_between() {
        let mid = transition().sample_at(50.0);
        assert!(mid.radius < 40.0 && mid.radius > 8.0);
        assert!(mid.target.x > 0.0 && mid.target.x < 100.0);
        // Cubic in-out is symmetric, so the midpoint is the average.
        assert!((mid.radius - 24.0).abs() < 1e-4);
        assert!((mid.target - Vec3::new(50.0, -10.0, 25.0)).length() < 1e-4);
    }

    #[test]
    fn test_target_and_radius_move_in_lock_step() {
        let t = transition();
        for frame in [10.0, 33.0, 71.0] {
            let pose = t.sample_at(frame);
            let radius_progress = (40.0 - pose.radius) / 32.0;
            let target_progress = pose.target.x / 100.0;
            assert!((radius_progress - target_progress).abs() < 1e-4);
        }
    }

    #[test]
    fn test_advance_is_time_based() {
        let mut t = transition();
        // 100 frames at 60 fps take 1.666.. seconds.
        t.advance(1.0);
        assert!((t.elapsed_frames - 60.0).abs() < 1e-4);
        assert!(!t.is_finished());
        let pose = t.advance(1.0);
        assert!(t.is_finished());
        assert_eq!(pose, pose_b());
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut t = transition();
        t.advance(0.5);
        let before = t.elapsed_frames;
        t.advance(-1.0);
        assert_eq!(t.elapsed_frames, before);
    }

    #[test]
    fn test_zero_duration_is_clamped() {
        let t = CameraTransition::new(pose_a(), pose_b(), 0, 60.0, EasingFunction::Linear);
        assert_eq!(t.duration_frames, 1);
        assert!((t.duration_secs() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_frame_rate_falls_back() {
        let t = CameraTransition::new(pose_a(), pose_b(), 100, 0.0, EasingFunction::Linear);
        assert_eq!(t.frame_rate, 60.0);
    }
}
