//! Orbit camera for the solar-system view: spherical-coordinate rig,
//! user input, easing curves and animated target/radius transitions.

mod easing;
mod input;
mod orbit;
mod transition;

pub use easing::EasingFunction;
pub use input::CameraInput;
pub use orbit::{OrbitCamera, OrbitLimits};
pub use transition::{CameraTransition, OrbitPose};
