//! Orrery application layer.
//!
//! Ties the scene model, procedural bodies and lighting together behind
//! [`SceneManager`], drives frames through [`RendererSurface`], and hosts
//! the whole thing in a winit window.

pub mod manager;
pub mod navigation;
pub mod ready;
pub mod render_loop;
pub mod surface;
pub mod window;

pub use manager::{SceneError, SceneManager};
pub use navigation::{CameraNavigator, FollowBinding, NavigationSettings, NavigationState};
pub use ready::{ReadyFuture, ReadySignal};
pub use render_loop::RenderLoop;
pub use surface::RendererSurface;
