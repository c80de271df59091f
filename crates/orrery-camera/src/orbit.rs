//! Arc-rotate camera orbiting a target point.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};

use crate::{CameraInput, CameraTransition, EasingFunction, OrbitPose};

const BETA_EPSILON: f32 = 0.01;

/// Zoom and elevation limits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLimits {
    pub min_radius: f32,
    pub max_radius: f32,
    /// Smallest polar angle from +Y.
    pub min_beta: f32,
    /// Largest polar angle from +Y.
    pub max_beta: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_radius: 1.0,
            max_radius: 400.0,
            min_beta: BETA_EPSILON,
            max_beta: PI - BETA_EPSILON,
        }
    }
}

impl OrbitLimits {
    /// Returns limits with each `min <= max`. Inverted pairs are swapped and
    /// pairs containing NaN fall back to the defaults.
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        let (min_radius, max_radius) = ordered(
            "radius",
            self.min_radius,
            self.max_radius,
            (defaults.min_radius, defaults.max_radius),
        );
        let (min_beta, max_beta) = ordered(
            "beta",
            self.min_beta,
            self.max_beta,
            (defaults.min_beta, defaults.max_beta),
        );
        Self {
            min_radius,
            max_radius,
            min_beta,
            max_beta,
        }
    }

    pub fn clamp_radius(&self, radius: f32) -> f32 {
        let limits = self.normalized();
        radius.clamp(limits.min_radius, limits.max_radius)
    }

    pub fn clamp_beta(&self, beta: f32) -> f32 {
        let limits = self.normalized();
        beta.clamp(limits.min_beta, limits.max_beta)
    }
}

fn ordered(name: &str, min: f32, max: f32, fallback: (f32, f32)) -> (f32, f32) {
    if min.is_nan() || max.is_nan() {
        tracing::warn!(name, min, max, "NaN camera limit, using defaults");
        fallback
    } else if min > max {
        tracing::warn!(name, min, max, "Inverted camera limits, swapping");
        (max, min)
    } else {
        (min, max)
    }
}

/// Camera positioned on a sphere around `target`.
///
/// `alpha` is the azimuth around +Y and `beta` the polar angle from +Y, so
/// the eye sits at `target + radius * (cos α sin β, cos β, sin α sin β)`.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub target: Vec3,
    pub limits: OrbitLimits,
    /// Fraction of the current radius applied per wheel notch.
    pub wheel_delta_percentage: f32,
    /// Radians per pixel of drag.
    pub angular_sensitivity: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    transition: Option<CameraTransition>,
}

impl OrbitCamera {
    pub fn new(alpha: f32, beta: f32, radius: f32, target: Vec3) -> Self {
        Self {
            alpha,
            beta,
            radius,
            target,
            limits: OrbitLimits::default(),
            wheel_delta_percentage: 0.01,
            angular_sensitivity: 0.005,
            fov_y: 0.8,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 2000.0,
            transition: None,
        }
    }

    pub fn with_limits(mut self, limits: OrbitLimits) -> Self {
        self.limits = limits.normalized();
        self
    }

    pub fn with_wheel_delta_percentage(mut self, percentage: f32) -> Self {
        self.wheel_delta_percentage = percentage;
        self
    }

    pub fn with_angular_sensitivity(mut self, sensitivity: f32) -> Self {
        self.angular_sensitivity = sensitivity;
        self
    }

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.target + self.radius * Vec3::new(cos_a * sin_b, cos_b, sin_a * sin_b)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio after a surface resize. Zero sizes are ignored.
    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Live target and radius, including mid-transition values.
    pub fn pose(&self) -> OrbitPose {
        OrbitPose::new(self.target, self.radius)
    }

    pub fn set_pose(&mut self, pose: OrbitPose) {
        self.target = pose.target;
        self.radius = pose.radius;
    }

    /// Begin animating toward `to` from the current live pose, replacing
    /// any transition already running.
    pub fn start_transition(
        &mut self,
        to: OrbitPose,
        duration_frames: u32,
        frame_rate: f32,
        easing: EasingFunction,
    ) {
        if self.transition.is_some() {
            tracing::debug!("Superseding running camera transition");
        }
        self.transition = Some(CameraTransition::new(
            self.pose(),
            to,
            duration_frames,
            frame_rate,
            easing,
        ));
    }

    pub fn transition(&self) -> Option<&CameraTransition> {
        self.transition.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn cancel_transition(&mut self) {
        self.transition = None;
    }

    /// Play `dt` seconds of the running transition and write its pose into
    /// the camera. The transition is dropped once it reaches its end pose.
    pub fn advance_transition(&mut self, dt: f32) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        let pose = transition.advance(dt);
        let finished = transition.is_finished();
        self.set_pose(pose);
        if finished {
            self.transition = None;
            tracing::debug!(radius = pose.radius, "Camera transition complete");
        }
    }

    /// Apply accumulated pointer input: drag rotates, wheel zooms.
    pub fn apply_input(&mut self, input: &CameraInput) {
        if input.drag != glam::Vec2::ZERO {
            self.alpha -= input.drag.x * self.angular_sensitivity;
            self.beta = self
                .limits
                .clamp_beta(self.beta - input.drag.y * self.angular_sensitivity);
        }
        if input.wheel != 0.0 {
            self.radius -= self.radius * self.wheel_delta_percentage * input.wheel;
            self.radius = self.limits.clamp_radius(self.radius);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::f32::consts::FRAC_PI_2;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(FRAC_PI_2, PI / 2.5, 40.0, Vec3::ZERO)
    }

    #[test]
    fn test_position_is_radius_from_target() {
        let mut cam = camera();
        cam.target = Vec3::new(5.0, 1.0, -3.0);
        assert!(((cam.position() - cam.target).length() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_alpha_half_pi_puts_eye_on_positive_z() {
        let cam = OrbitCamera::new(FRAC_PI_2, FRAC_PI_2, 10.0, Vec3::ZERO);
        let pos = cam.position();
        assert!(pos.x.abs() < 1e-5);
        assert!(pos.y.abs() < 1e-5);
        assert!((pos.z - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_view_matrix_maps_target_in_front() {
        let cam = camera();
        let target_view = cam.view_matrix().transform_point3(cam.target);
        assert!(target_view.z < 0.0);
        assert!((target_view.z + 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_transition_runs_to_completion_and_is_removed() {
        let mut cam = camera();
        let to = OrbitPose::new(Vec3::new(10.0, 0.0, 0.0), 8.0);
        cam.start_transition(to, 100, 60.0, EasingFunction::CubicInOut);
        assert!(cam.is_transitioning());

        for _ in 0..99 {
            cam.advance_transition(1.0 / 60.0);
        }
        assert!(cam.is_transitioning());
        cam.advance_transition(1.0 / 60.0);
        cam.advance_transition(1.0 / 60.0);

        assert!(!cam.is_transitioning());
        assert_eq!(cam.pose(), to);
    }

    #[test]
    fn test_new_transition_starts_from_mid_flight_pose() {
        let mut cam = camera();
        cam.start_transition(
            OrbitPose::new(Vec3::X * 100.0, 10.0),
            100,
            60.0,
            EasingFunction::CubicInOut,
        );
        cam.advance_transition(50.0 / 60.0);
        let mid = cam.pose();
        assert!(mid.target.x > 0.0 && mid.target.x < 100.0);

        cam.start_transition(
            OrbitPose::new(Vec3::ZERO, 40.0),
            100,
            60.0,
            EasingFunction::CubicInOut,
        );
        let transition = cam.transition().unwrap();
        assert_eq!(transition.from, mid);
        assert_eq!(transition.elapsed_frames, 0.0);
    }

    #[test]
    fn test_wheel_zoom_uses_percentage_and_limits() {
        let mut cam = camera();
        cam.apply_input(&CameraInput {
            drag: Vec2::ZERO,
            wheel: 10.0,
        });
        assert!((cam.radius - 36.0).abs() < 1e-4);

        cam.apply_input(&CameraInput {
            drag: Vec2::ZERO,
            wheel: 1000.0,
        });
        assert_eq!(cam.radius, cam.limits.min_radius);
    }

    #[test]
    fn test_drag_rotates_and_clamps_beta() {
        let mut cam = camera();
        let alpha = cam.alpha;
        cam.apply_input(&CameraInput {
            drag: Vec2::new(100.0, 0.0),
            wheel: 0.0,
        });
        assert!((cam.alpha - (alpha - 0.5)).abs() < 1e-5);

        cam.apply_input(&CameraInput {
            drag: Vec2::new(0.0, 100_000.0),
            wheel: 0.0,
        });
        assert_eq!(cam.beta, cam.limits.min_beta);
    }

    #[test]
    fn test_inverted_limits_are_swapped() {
        let limits = OrbitLimits {
            min_radius: 50.0,
            max_radius: 10.0,
            min_beta: 2.0,
            max_beta: 0.5,
        };
        let mut cam = camera().with_limits(limits);
        assert_eq!(cam.limits.min_radius, 10.0);
        assert_eq!(cam.limits.max_radius, 50.0);
        assert_eq!(cam.limits.min_beta, 0.5);

        cam.apply_input(&CameraInput {
            drag: Vec2::new(0.0, 10.0),
            wheel: 1.0,
        });
        assert!((cam.radius - 39.6).abs() < 1e-4);
        assert!(cam.beta >= 0.5 && cam.beta <= 2.0);
    }

    #[test]
    fn test_inverted_limits_set_directly_do_not_panic() {
        let mut cam = camera();
        cam.limits.min_radius = 50.0;
        cam.limits.max_radius = 10.0;
        cam.apply_input(&CameraInput {
            drag: Vec2::ZERO,
            wheel: 1.0,
        });
        assert!((cam.radius - 39.6).abs() < 1e-4);

        cam.limits.max_radius = f32::NAN;
        cam.apply_input(&CameraInput {
            drag: Vec2::ZERO,
            wheel: 1.0,
        });
        assert!(cam.radius.is_finite());
    }

    #[test]
    fn test_zero_size_resize_keeps_aspect() {
        let mut cam = camera();
        cam.set_aspect_ratio(800, 400);
        assert_eq!(cam.aspect_ratio, 2.0);
        cam.set_aspect_ratio(0, 400);
        assert_eq!(cam.aspect_ratio, 2.0);
    }
}
