//! Camera navigation: zooming to named bodies, following them, and
//! returning to the home view.
//!
//! The navigator holds at most one follow binding, a before-render
//! observer that copies the followed body's position into the camera
//! target every frame. Observers run after the camera transition has been
//! applied, so a follow binding overrides the transition's target while the
//! radius keeps animating.

use glam::Vec3;
use orrery_camera::{EasingFunction, OrbitPose};
use orrery_config::{CameraConfig, ResetTarget};
use orrery_render::{MeshId, ObserverHandle, Scene};
use orrery_space::SUN_MESH;
use tracing::{debug, info, warn};

/// What the camera is doing right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationState {
    Idle,
    Transitioning,
    /// Tracking a body; a framing transition may still be running.
    Following { entity: String },
}

/// The single live follow observer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowBinding {
    pub entity: String,
    pub observer: ObserverHandle,
}

/// Timing and framing parameters for navigation transitions.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationSettings {
    pub default_target: Vec3,
    pub default_radius: f32,
    pub reset_target: ResetTarget,
    pub transition_frames: u32,
    pub frame_rate: f32,
    /// Framing distance as a multiple of the body's bounding radius.
    pub framing_radius_factor: f32,
    pub easing: EasingFunction,
}

impl NavigationSettings {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            default_target: Vec3::from_array(config.default_target),
            default_radius: config.default_radius,
            reset_target: config.reset_target,
            transition_frames: config.transition_frames,
            frame_rate: config.transition_frame_rate,
            framing_radius_factor: config.framing_radius_factor,
            easing: EasingFunction::CubicInOut,
        }
    }
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

#[derive(Debug, Default)]
pub struct CameraNavigator {
    settings: NavigationSettings,
    follow: Option<FollowBinding>,
}

impl CameraNavigator {
    pub fn new(settings: NavigationSettings) -> Self {
        Self {
            settings,
            follow: None,
        }
    }

    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    pub fn follow_binding(&self) -> Option<&FollowBinding> {
        self.follow.as_ref()
    }

    pub fn state(&self, scene: &Scene) -> NavigationState {
        if let Some(binding) = &self.follow {
            NavigationState::Following {
                entity: binding.entity.clone(),
            }
        } else if scene.camera.is_transitioning() {
            NavigationState::Transitioning
        } else {
            NavigationState::Idle
        }
    }

    /// Animate the camera to frame the named body. Unknown names are
    /// logged and ignored. An active follow binding is left in place.
    pub fn zoom_to(&mut self, scene: &mut Scene, name: &str) -> bool {
        let Some((_, pose)) = self.resolve(scene, name, "zoom to") else {
            return false;
        };
        info!(entity = name, radius = pose.radius, "Zooming camera");
        self.animate(scene, pose);
        true
    }

    /// Keep the camera target on the named body every frame, replacing any
    /// previous follow binding, and animate in to frame it.
    pub fn follow_planet(&mut self, scene: &mut Scene, name: &str) -> bool {
        let Some((mesh, pose)) = self.resolve(scene, name, "follow") else {
            return false;
        };
        self.stop_following(scene);

        let observer = scene.on_before_render(move |scene, _| {
            if let Some(position) = scene.world_position(mesh) {
                scene.camera.target = position;
            }
        });
        self.follow = Some(FollowBinding {
            entity: name.to_string(),
            observer,
        });
        info!(entity = name, "Following body");
        self.animate(scene, pose);
        true
    }

    /// Drop any follow binding and animate back to the home view.
    pub fn reset_camera(&mut self, scene: &mut Scene) {
        self.stop_following(scene);
        let pose = self.default_pose(scene);
        info!(home = ?pose.target, radius = pose.radius, "Resetting camera");
        self.animate(scene, pose);
    }

    /// Remove the follow observer, if any. Returns whether one was active.
    pub fn stop_following(&mut self, scene: &mut Scene) -> bool {
        let Some(binding) = self.follow.take() else {
            return false;
        };
        if !scene.remove_before_render(binding.observer) {
            debug!(entity = %binding.entity, "Follow observer was already gone");
        }
        true
    }

    /// The home pose. A sun-centric home resolves the sun's position now
    /// and falls back to the fixed target when there is no sun.
    pub fn default_pose(&self, scene: &Scene) -> OrbitPose {
        let target = match self.settings.reset_target {
            ResetTarget::Fixed => self.settings.default_target,
            ResetTarget::SunCentric => scene
                .mesh_by_name(SUN_MESH)
                .and_then(|sun| scene.world_position(sun))
                .unwrap_or(self.settings.default_target),
        };
        OrbitPose::new(target, self.settings.default_radius)
    }

    fn resolve(&self, scene: &Scene, name: &str, action: &str) -> Option<(MeshId, OrbitPose)> {
        let Some(mesh) = scene.mesh_by_name(name) else {
            warn!("Cannot {action} \"{name}\": no mesh with that name");
            return None;
        };
        let target = scene.world_position(mesh)?;
        let radius = scene
            .mesh(mesh)
            .map(|m| m.bounding_radius())
            .unwrap_or_default()
            * self.settings.framing_radius_factor;
        Some((mesh, OrbitPose::new(target, radius)))
    }

    /// The goal radius is held inside the camera's zoom limits so a body
    /// without geometry never puts the eye on the target.
    fn animate(&self, scene: &mut Scene, mut to: OrbitPose) {
        to.radius = scene.camera.limits.clamp_radius(to.radius);
        scene.camera.start_transition(
            to,
            self.settings.transition_frames,
            self.settings.frame_rate,
            self.settings.easing,
        );
    }
}
