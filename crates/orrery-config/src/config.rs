//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "orrery";

/// Top-level scene configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Orbit camera and navigation settings.
    pub camera: CameraConfig,
    /// Sun appearance and animation.
    pub sun: SunConfig,
    /// Comet orbit and tail.
    pub comet: CometConfig,
    /// Starfield backdrop.
    pub starfield: StarfieldConfig,
    /// Per-planet directional lights and shadows.
    pub lighting: LightingConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Where `reset_camera` sends the camera target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ResetTarget {
    /// The fixed `default_target` point.
    #[default]
    Fixed,
    /// The sun's position at the moment of the reset.
    SunCentric,
}

/// Orbit camera and navigation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Default look-at target.
    pub default_target: [f32; 3],
    /// Default distance from the target.
    pub default_radius: f32,
    /// Initial azimuth in radians.
    pub alpha: f32,
    /// Initial elevation (polar angle from +Y) in radians.
    pub beta: f32,
    /// Fraction of the radius applied per wheel notch.
    pub wheel_delta_percentage: f32,
    /// Radians of rotation per pixel of drag.
    pub angular_sensitivity: f32,
    /// Closest allowed zoom.
    pub min_radius: f32,
    /// Farthest allowed zoom.
    pub max_radius: f32,
    /// Length of a navigation transition in animation frames.
    pub transition_frames: u32,
    /// Animation frames per second used to play transitions.
    pub transition_frame_rate: f32,
    /// Framing distance as a multiple of the entity's bounding radius.
    pub framing_radius_factor: f32,
    /// Default-target convention used by `reset_camera`.
    pub reset_target: ResetTarget,
}

/// Sun configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SunConfig {
    /// World position of the sun.
    pub position: [f32; 3],
    /// Core sphere diameter.
    pub diameter: f32,
    /// HDR emissive colour of the core.
    pub emissive_color: [f32; 3],
    /// Emissive intensity at the centre of the pulse.
    pub pulse_base: f32,
    /// Peak deviation of the pulse from `pulse_base`.
    pub pulse_amplitude: f32,
    /// Pulse angular speed in radians per second.
    pub pulse_speed: f32,
    /// Intensity of the sun point light.
    pub light_intensity: f32,
    /// Emit the inner surface particle layer.
    pub surface_particles: bool,
    /// Emit the outer flare particle layer.
    pub flares: bool,
    /// Layer a glow/bloom pass over the core.
    pub glow: bool,
    /// Glow layer intensity.
    pub glow_intensity: f32,
    /// Shader reference for the plasma shell.
    pub plasma_shader: String,
}

/// Comet configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CometConfig {
    /// Spawn the comet at init.
    pub enabled: bool,
    /// Semi-axis along X.
    pub radius_x: f32,
    /// Semi-axis along Z.
    pub radius_z: f32,
    /// Orbit angle added every rendered frame, in radians.
    pub angular_step: f32,
    /// Maximum live tail particles.
    pub tail_capacity: usize,
    /// Tail particles spawned per second.
    pub tail_emit_rate: f32,
    /// Number of positions sampled by the trail mesh.
    pub trail_length: usize,
    /// Trail strip width.
    pub trail_diameter: f32,
}

/// Starfield configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Backdrop sphere diameter.
    pub diameter: f32,
    /// Sphere tessellation.
    pub segments: u32,
    /// Shader reference for the procedural sky.
    pub shader: String,
}

/// Directional light and shadow configuration for per-planet lighting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// Directional light intensity.
    pub intensity: f32,
    /// Shadow map resolution (width = height).
    pub shadow_resolution: u32,
    /// Constant depth bias.
    pub bias: f32,
    /// Normal offset bias.
    pub normal_bias: f32,
    /// Blur kernel size for soft shadows.
    pub blur_kernel: u32,
    /// Half-size of the orthographic shadow frustum around the entity.
    pub shadow_half_extent: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log frame statistics periodically.
    pub show_fps: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            vsync: true,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_target: [0.0, 0.0, 0.0],
            default_radius: 40.0,
            alpha: std::f32::consts::FRAC_PI_2,
            beta: std::f32::consts::PI / 2.5,
            wheel_delta_percentage: 0.01,
            angular_sensitivity: 0.005,
            min_radius: 1.0,
            max_radius: 400.0,
            transition_frames: 100,
            transition_frame_rate: 60.0,
            framing_radius_factor: 4.0,
            reset_target: ResetTarget::Fixed,
        }
    }
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            diameter: 4.0,
            emissive_color: [100.0, 7.0, 2.0],
            pulse_base: 1.0,
            pulse_amplitude: 0.15,
            pulse_speed: 1.5,
            light_intensity: 200.0,
            surface_particles: true,
            flares: true,
            glow: true,
            glow_intensity: 1.5,
            plasma_shader: "/Shaders/solarPlasma".to_string(),
        }
    }
}

impl Default for CometConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius_x: 40.0,
            radius_z: 20.0,
            angular_step: 0.001,
            tail_capacity: 2000,
            tail_emit_rate: 300.0,
            trail_length: 60,
            trail_diameter: 0.4,
        }
    }
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            diameter: 400.0,
            segments: 32,
            shader: "/Shaders/starfield".to_string(),
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            shadow_resolution: 1024,
            bias: 0.0005,
            normal_bias: 0.01,
            blur_kernel: 16,
            shadow_half_extent: 10.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_fps: false,
            log_level: "info".to_string(),
        }
    }
}

/// Platform configuration directory for the orrery, if the OS exposes one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(ConfigError::read(&config_path))?;
            let config: Config =
                ron::from_str(&contents).map_err(ConfigError::parse(&config_path))?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::write(config_dir))?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::write(&config_path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("default_radius: 40.0"));
        assert!(ron_str.contains("/Shaders/starfield"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.camera.reset_target = ResetTarget::SunCentric;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), camera: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.comet, CometConfig::default());
        assert_eq!(config.lighting, LightingConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_fields() {
        let ron_str = "(comet: (radius_x: 60.0))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.comet.radius_x, 60.0);
        assert_eq!(config.comet.radius_z, 20.0);
        assert_eq!(config.comet.trail_length, 60);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_camera_defaults_match_scene_conventions() {
        let camera = CameraConfig::default();
        assert_eq!(camera.transition_frames, 100);
        assert_eq!(camera.transition_frame_rate, 60.0);
        assert_eq!(camera.framing_radius_factor, 4.0);
        assert_eq!(camera.reset_target, ResetTarget::Fixed);
        assert!(camera.min_radius < camera.default_radius);
        assert!(camera.default_radius < camera.max_radius);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.sun.flares = false;
        config.lighting.shadow_resolution = 2048;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
