//! Scene model and rendering boundary for the orrery.
//!
//! [`Scene`] owns everything drawn in a frame: meshes, materials, particle
//! systems, trails, lights, glow layers and the orbit camera. A
//! [`RenderBackend`] consumes the scene once per frame; the headless backend
//! records frames for tests and tools, the wgpu backend presents to a window.

mod backend;
mod error;
mod frame;
mod glow;
mod gpu;
mod light;
mod material;
mod mesh;
mod observer;
mod particles;
mod scene;
mod surface;
mod trail;

pub use backend::{FrameRecord, HeadlessBackend, RenderBackend, WgpuBackend};
pub use error::RenderError;
pub use frame::{FrameClock, FrameInfo};
pub use glow::{BloomConfig, GlowLayer, GlowLayerId};
pub use gpu::{RenderContext, init_render_context_blocking};
pub use light::{HemisphericLight, Light, LightId, PointLight};
pub use material::{
    BlendMode, Material, MaterialId, ShaderMaterial, ShaderMaterialOptions, StandardMaterial,
};
pub use mesh::{Mesh, MeshId, MeshShape, SideOrientation};
pub use observer::{Observable, ObserverHandle};
pub use particles::{
    ColorGradientStop, Emitter, EmitterAnchor, Particle, ParticleSystem, ParticleSystemId,
};
pub use scene::{BeforeRenderCallback, Scene};
pub use surface::{MIN_SURFACE_DIMENSION, PhysicalSize, Surface, SurfaceResizeEvent, SurfaceWrapper};
pub use trail::{TrailId, TrailMesh};
