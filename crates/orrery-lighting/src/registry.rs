//! Lazily created lighting entries keyed by entity name.

use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;

use crate::{DirectionalLight, ShadowCaster, ShadowConfig, ShadowMapHandle, light_space_matrix};

/// Light and shadow caster for one entity.
#[derive(Clone, Debug)]
pub struct LightingEntry {
    pub entity: String,
    /// Entity position when the entry was created.
    pub entity_position: Vec3,
    pub light: DirectionalLight,
    pub shadow: ShadowCaster,
}

/// Creates at most one [`LightingEntry`] per entity, all lit from the
/// same primary source. Entries live until the registry is cleared.
#[derive(Debug)]
pub struct LightingRegistry {
    primary_source: Vec3,
    intensity: f32,
    shadow_config: ShadowConfig,
    entries: FxHashMap<String, LightingEntry>,
    next_map_index: u32,
}

impl LightingRegistry {
    pub fn new(primary_source: Vec3, intensity: f32, shadow_config: ShadowConfig) -> Self {
        Self {
            primary_source,
            intensity,
            shadow_config,
            entries: FxHashMap::default(),
            next_map_index: 0,
        }
    }

    pub fn primary_source(&self) -> Vec3 {
        self.primary_source
    }

    pub fn shadow_config(&self) -> &ShadowConfig {
        &self.shadow_config
    }

    /// Create the light and shadow caster for `entity` if it has none yet.
    /// Returns `true` when a new entry was created.
    pub fn ensure_light(&mut self, entity: &str, position: Vec3) -> bool {
        if self.entries.contains_key(entity) {
            return false;
        }

        let light_name = format!("{entity}Light");
        let light = match DirectionalLight::aimed(
            light_name.clone(),
            self.primary_source,
            position,
            self.intensity,
        ) {
            Some(light) => light,
            None => {
                tracing::warn!(entity, "Entity sits on the light source; lighting it from above");
                DirectionalLight::aimed_or_down(
                    light_name,
                    self.primary_source,
                    position,
                    self.intensity,
                )
            }
        };

        let map = ShadowMapHandle {
            index: self.next_map_index,
            resolution: self.shadow_config.resolution,
        };
        self.next_map_index += 1;

        let matrix = light_space_matrix(
            light.position,
            light.direction,
            position,
            self.shadow_config.half_extent,
        );
        let shadow = ShadowCaster::new(light.name.clone(), map, &self.shadow_config, matrix);

        tracing::debug!(entity, shadow_map = map.index, "Created directional light");
        self.entries.insert(
            entity.to_string(),
            LightingEntry {
                entity: entity.to_string(),
                entity_position: position,
                light,
                shadow,
            },
        );
        true
    }

    pub fn entry(&self, entity: &str) -> Option<&LightingEntry> {
        self.entries.get(entity)
    }

    pub fn shadow_caster(&self, entity: &str) -> Option<&ShadowCaster> {
        self.entries.get(entity).map(|e| &e.shadow)
    }

    /// Light view × orthographic projection for the entity's shadow pass.
    pub fn light_transform(&self, entity: &str) -> Option<Mat4> {
        self.entries.get(entity).map(|e| e.shadow.light_matrix)
    }

    pub fn shadow_map(&self, entity: &str) -> Option<ShadowMapHandle> {
        self.entries.get(entity).map(|e| e.shadow.map)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry; used on teardown.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(count = self.entries.len(), "Releasing lighting entries");
        }
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LightingRegistry {
        LightingRegistry::new(Vec3::ZERO, 1.0, ShadowConfig::default())
    }

    #[test]
    fn test_ensure_light_creates_once() {
        let mut reg = registry();
        assert!(reg.ensure_light("Earth", Vec3::new(20.0, 0.0, 0.0)));
        let first = reg.entry("Earth").unwrap().clone();

        assert!(!reg.ensure_light("Earth", Vec3::new(0.0, 0.0, 50.0)));
        let second = reg.entry("Earth").unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(second.light, first.light);
        assert_eq!(second.shadow, first.shadow);
        assert_eq!(second.entity_position, Vec3::new(20.0, 0.0, 0.0));
    }

    #[test]
    fn test_light_points_away_from_source() {
        let mut reg = LightingRegistry::new(Vec3::new(1.0, 0.0, 0.0), 2.0, ShadowConfig::default());
        reg.ensure_light("Mars", Vec3::new(1.0, 0.0, 10.0));
        let light = &reg.entry("Mars").unwrap().light;
        assert_eq!(light.direction, Vec3::Z);
        assert_eq!(light.position, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(light.intensity, 2.0);
        assert_eq!(light.name, "MarsLight");
    }

    #[test]
    fn test_entity_at_source_falls_back_to_down() {
        let mut reg = registry();
        assert!(reg.ensure_light("Core", Vec3::ZERO));
        assert_eq!(reg.entry("Core").unwrap().light.direction, Vec3::NEG_Y);
        assert!(reg.light_transform("Core").unwrap().is_finite());
    }

    #[test]
    fn test_unknown_entity_lookups_are_none() {
        let reg = registry();
        assert!(reg.shadow_caster("Vulcan").is_none());
        assert!(reg.light_transform("Vulcan").is_none());
        assert!(reg.shadow_map("Vulcan").is_none());
    }

    #[test]
    fn test_each_entity_gets_its_own_shadow_map() {
        let mut reg = registry();
        reg.ensure_light("Earth", Vec3::X * 20.0);
        reg.ensure_light("Mars", Vec3::Z * 30.0);
        let earth = reg.shadow_map("Earth").unwrap();
        let mars = reg.shadow_map("Mars").unwrap();
        assert_ne!(earth.index, mars.index);
        assert_eq!(earth.resolution, 1024);
    }

    #[test]
    fn test_light_transform_frames_entity() {
        let mut reg = registry();
        reg.ensure_light("Earth", Vec3::new(20.0, 0.0, 0.0));
        let m = reg.light_transform("Earth").unwrap();
        let p = m.project_point3(Vec3::new(20.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-4 && p.y.abs() < 1e-4);
    }

    #[test]
    fn test_shadow_settings_come_from_config() {
        let config = ShadowConfig {
            resolution: 2048,
            bias: 0.001,
            normal_bias: 0.05,
            blur_kernel: 8,
            half_extent: 4.0,
        };
        let mut reg = LightingRegistry::new(Vec3::ZERO, 1.0, config);
        reg.ensure_light("Venus", Vec3::X * 12.0);
        let caster = reg.shadow_caster("Venus").unwrap();
        assert_eq!(caster.bias, 0.001);
        assert_eq!(caster.normal_bias, 0.05);
        assert_eq!(caster.blur_kernel, 8);
        assert_eq!(caster.map.resolution, 2048);
        assert_eq!(caster.light, "VenusLight");
    }

    #[test]
    fn test_clear_releases_entries() {
        let mut reg = registry();
        reg.ensure_light("Earth", Vec3::X * 20.0);
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.shadow_caster("Earth").is_none());
    }
}
