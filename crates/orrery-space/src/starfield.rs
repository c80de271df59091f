//! Starfield backdrop: an inverted sphere shaded by an external sky program.

use orrery_config::StarfieldConfig;
use orrery_render::{
    MaterialId, Mesh, MeshId, ObserverHandle, Scene, ShaderMaterial, ShaderMaterialOptions,
    SideOrientation,
};

pub const STARFIELD_MESH: &str = "starfield";

#[derive(Clone, Copy, Debug)]
pub struct StarfieldHandle {
    pub mesh: MeshId,
    pub material: MaterialId,
    /// Observer pushing scene time into the shader.
    pub observer: ObserverHandle,
}

/// Add the sky sphere. It stays centred on the camera, is drawn first and
/// cannot be picked.
pub fn create_starfield(scene: &mut Scene, config: &StarfieldConfig) -> StarfieldHandle {
    let mut material = ShaderMaterial::new(
        "starfieldMaterial",
        config.shader.clone(),
        ShaderMaterialOptions::new(&["position", "uv"], &["worldViewProjection", "time"]),
    );
    material.back_face_culling = false;
    material.set_float("time", 0.0);
    let material = scene.add_material(material);

    let mut mesh = Mesh::sphere(STARFIELD_MESH, config.diameter, config.segments)
        .with_material(material);
    mesh.infinite_distance = true;
    mesh.pickable = false;
    mesh.rendering_group = 0;
    mesh.side_orientation = SideOrientation::Back;
    let mesh = scene.add_mesh(mesh);

    let observer = scene.on_before_render(move |scene, frame| {
        if let Some(shader) = scene.material_mut(material).and_then(|m| m.as_shader_mut()) {
            shader.set_float("time", frame.elapsed);
        }
    });

    log::debug!(
        "Created starfield (diameter {}, {} segments)",
        config.diameter,
        config.segments
    );
    StarfieldHandle {
        mesh,
        material,
        observer,
    }
}
