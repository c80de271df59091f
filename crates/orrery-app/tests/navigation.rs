//! End-to-end camera navigation against a headless scene.

use glam::Vec3;
use orrery_app::{NavigationState, SceneManager};
use orrery_camera::{CameraTransition, EasingFunction, OrbitPose};
use orrery_config::{Config, ResetTarget};
use orrery_render::{Mesh, Surface};
use orrery_space::COMET_CORE;

const DT: f32 = 1.0 / 60.0;
const EARTH: Vec3 = Vec3::new(12.0, 0.0, 0.0);
const MARS: Vec3 = Vec3::new(0.0, 0.0, -18.0);

fn manager_with(config: Config) -> SceneManager {
    let mut manager = SceneManager::new(config).with_seed(11);
    manager.init(Some(Surface::headless(800, 600))).unwrap();
    let scene = manager.scene_mut().unwrap();
    scene.add_mesh(Mesh::sphere("Earth", 2.0, 16).with_position(EARTH));
    scene.add_mesh(Mesh::sphere("Mars", 1.0, 16).with_position(MARS));
    manager
}

fn manager() -> SceneManager {
    manager_with(Config::default())
}

fn run_frames(manager: &mut SceneManager, frames: usize) {
    for _ in 0..frames {
        manager.frame(DT).unwrap();
    }
}

fn pose(manager: &SceneManager) -> OrbitPose {
    manager.scene().unwrap().camera.pose()
}

#[test]
fn zoom_reaches_framing_pose() {
    let mut manager = manager();
    manager.zoom_to("Earth");
    assert_eq!(
        manager.navigation_state(),
        Some(NavigationState::Transitioning)
    );

    run_frames(&mut manager, 110);
    let pose = pose(&manager);
    assert!(pose.target.abs_diff_eq(EARTH, 1e-5));
    assert!((pose.radius - 4.0).abs() < 1e-5);
    assert_eq!(manager.navigation_state(), Some(NavigationState::Idle));
}

#[test]
fn zoom_to_unknown_changes_nothing() {
    let mut manager = manager();
    let before = pose(&manager);
    manager.zoom_to("Vulcan");

    let scene = manager.scene().unwrap();
    assert!(!scene.camera.is_transitioning());
    assert_eq!(scene.camera.pose(), before);
    assert_eq!(manager.navigation_state(), Some(NavigationState::Idle));
}

#[test]
fn new_zoom_starts_from_mid_flight_pose() {
    let mut manager = manager();
    manager.zoom_to("Earth");
    run_frames(&mut manager, 30);
    let mid_flight = pose(&manager);

    manager.zoom_to("Mars");
    let transition = manager.scene().unwrap().camera.transition().unwrap();
    assert_eq!(transition.from, mid_flight);
    assert!(transition.to.target.abs_diff_eq(MARS, 1e-6));
    assert_eq!(transition.elapsed_frames, 0.0);
}

#[test]
fn follow_tracks_only_the_latest_body() {
    let mut manager = manager();
    manager.follow_planet("Earth");
    let earth_binding = manager.navigator().unwrap().follow_binding().unwrap().clone();
    manager.follow_planet("Mars");

    let scene = manager.scene().unwrap();
    assert!(!scene.has_before_render(earth_binding.observer));
    assert_eq!(
        manager.navigation_state(),
        Some(NavigationState::Following {
            entity: "Mars".into()
        })
    );

    run_frames(&mut manager, 5);
    assert_eq!(pose(&manager).target, MARS);

    let mars = manager.scene().unwrap().mesh_by_name("Mars").unwrap();
    manager
        .scene_mut()
        .unwrap()
        .mesh_mut(mars)
        .unwrap()
        .position = Vec3::new(3.0, 1.0, 2.0);
    run_frames(&mut manager, 1);
    assert_eq!(pose(&manager).target, Vec3::new(3.0, 1.0, 2.0));
}

#[test]
fn follow_unknown_keeps_current_binding() {
    let mut manager = manager();
    manager.follow_planet("Earth");
    manager.follow_planet("Vulcan");
    assert_eq!(
        manager.navigation_state(),
        Some(NavigationState::Following {
            entity: "Earth".into()
        })
    );
}

#[test]
fn zoom_to_unknown_while_following_keeps_binding() {
    let mut manager = manager();
    manager.follow_planet("Earth");
    let binding = manager.navigator().unwrap().follow_binding().unwrap().clone();

    manager.zoom_to("Vulcan");
    assert_eq!(
        manager.navigator().unwrap().follow_binding(),
        Some(&binding)
    );
    assert!(manager.scene().unwrap().has_before_render(binding.observer));

    run_frames(&mut manager, 3);
    assert_eq!(pose(&manager).target, EARTH);
}

#[test]
fn zoom_to_node_without_geometry_keeps_view_finite() {
    let mut manager = manager();
    manager.zoom_to("cometRoot");
    run_frames(&mut manager, 120);

    let camera = &manager.scene().unwrap().camera;
    assert_eq!(camera.radius, camera.limits.min_radius);
    assert!(camera.view_matrix().is_finite());
}

#[test]
fn zoom_while_following_keeps_binding() {
    let mut manager = manager();
    manager.follow_planet("Earth");
    manager.zoom_to("Mars");
    run_frames(&mut manager, 3);

    assert_eq!(
        manager.navigation_state(),
        Some(NavigationState::Following {
            entity: "Earth".into()
        })
    );
    assert_eq!(pose(&manager).target, EARTH);
}

#[test]
fn reset_ends_following_and_returns_home() {
    let mut manager = manager();
    manager.follow_planet("Earth");
    run_frames(&mut manager, 20);
    let observers = manager.scene().unwrap().before_render_count();

    manager.reset_camera();
    assert_eq!(
        manager.navigation_state(),
        Some(NavigationState::Transitioning)
    );
    assert_eq!(
        manager.scene().unwrap().before_render_count(),
        observers - 1
    );

    run_frames(&mut manager, 110);
    let pose = pose(&manager);
    assert!(pose.target.abs_diff_eq(Vec3::ZERO, 1e-5));
    assert!((pose.radius - 40.0).abs() < 1e-4);
    assert_eq!(manager.navigation_state(), Some(NavigationState::Idle));
}

#[test]
fn sun_centric_reset_targets_the_sun() {
    let mut config = Config::default();
    config.camera.reset_target = ResetTarget::SunCentric;
    config.sun.position = [2.0, 0.0, 1.0];
    let mut manager = manager_with(config);

    manager.zoom_to("Earth");
    run_frames(&mut manager, 110);
    manager.reset_camera();
    run_frames(&mut manager, 110);
    assert!(pose(&manager).target.abs_diff_eq(Vec3::new(2.0, 0.0, 1.0), 1e-5));
}

#[test]
fn ensure_light_keeps_first_entry() {
    let mut manager = manager();
    assert!(manager.ensure_light("Earth", EARTH));
    let first = manager.light_transform("Earth").unwrap();
    let first_map = manager.shadow_map("Earth").unwrap();

    assert!(!manager.ensure_light("Earth", MARS));
    assert_eq!(manager.light_transform("Earth").unwrap(), first);
    assert_eq!(manager.shadow_map("Earth").unwrap(), first_map);
    assert_eq!(manager.lighting().unwrap().len(), 1);

    let entry = manager.lighting().unwrap().entry("Earth").unwrap();
    assert!(entry.light.direction.abs_diff_eq(Vec3::X, 1e-6));
    assert_eq!(entry.shadow.light, "EarthLight");
}

#[test]
fn comet_advances_one_step_per_frame() {
    let mut manager = manager();
    let steps = 250;
    run_frames(&mut manager, steps);

    let comet = manager.bodies().unwrap().comet.as_ref().unwrap();
    let orbit = comet.orbit();
    let expected_angle = steps as f32 * 0.001;
    assert!((orbit.angle - expected_angle).abs() < 1e-5);

    let expected = Vec3::new(expected_angle.cos() * 40.0, 0.0, expected_angle.sin() * 20.0);
    assert!(orbit.position().abs_diff_eq(expected, 1e-4));

    let scene = manager.scene().unwrap();
    let core = scene.mesh_by_name(COMET_CORE).unwrap();
    assert!(scene.world_position(core).unwrap().abs_diff_eq(expected, 1e-4));
}

#[test]
fn cubic_transition_endpoints_and_midpoint() {
    let from = OrbitPose::new(Vec3::ZERO, 40.0);
    let to = OrbitPose::new(Vec3::new(10.0, 0.0, 0.0), 4.0);
    let transition = CameraTransition::new(from, to, 100, 60.0, EasingFunction::CubicInOut);

    assert_eq!(transition.sample_at(0.0), from);
    assert_eq!(transition.sample_at(100.0), to);

    let mid = transition.sample_at(50.0);
    assert!(mid.radius < 40.0 && mid.radius > 4.0);
    assert!(mid.target.x > 0.0 && mid.target.x < 10.0);
}

#[test]
fn dispose_twice_is_harmless() {
    let mut manager = manager();
    manager.follow_planet("Earth");
    manager.register_before_render(|_, _| {});

    manager.dispose();
    manager.dispose();
    assert!(!manager.is_initialized());
    manager.zoom_to("Earth");
    assert!(manager.frame(DT).is_none());
}
