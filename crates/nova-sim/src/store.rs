//! Parameter store: the single source of truth for tunable quantities.

use crate::params::{Param, SimulationParams};

/// Owns [`SimulationParams`] and tracks particle-field invalidation.
///
/// Changing `particle_count` or `explosion_speed` invalidates the
/// current field and must force wholesale regeneration; those setters
/// bump `field_generation`, which the render loop compares against the
/// generation it last built buffers for. Cosmetic setters (color, size,
/// bloom, thickness) leave the generation alone.
#[derive(Debug, Clone, Default)]
pub struct ParamStore {
    params: SimulationParams,
    field_generation: u64,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Generation of the most recent field invalidation.
    pub fn field_generation(&self) -> u64 {
        self.field_generation
    }

    pub fn set_particle_count(&mut self, count: u32) {
        if self.params.particle_count != count {
            self.params.particle_count = count;
            self.invalidate_field();
        }
    }

    pub fn set_explosion_speed(&mut self, speed: f32) {
        if self.params.explosion_speed != speed {
            self.params.explosion_speed = speed;
            self.invalidate_field();
        }
    }

    pub fn set_particle_size(&mut self, size: f32) {
        self.params.particle_size = size;
    }

    pub fn set_particle_color(&mut self, color: [f32; 3]) {
        self.params.particle_color = color;
    }

    pub fn set_bloom_intensity(&mut self, intensity: f32) {
        self.params.bloom_intensity = intensity;
    }

    pub fn set_bloom_luminance_threshold(&mut self, threshold: f32) {
        self.params.bloom_luminance_threshold = threshold;
    }

    pub fn set_bloom_luminance_smoothing(&mut self, smoothing: f32) {
        self.params.bloom_luminance_smoothing = smoothing;
    }

    pub fn set_shockwave_thickness(&mut self, thickness: f32) {
        self.params.shockwave_thickness = thickness;
    }

    /// Generic read access for control surfaces.
    pub fn value(&self, param: Param) -> f32 {
        match param {
            Param::ParticleCount => self.params.particle_count as f32,
            Param::ExplosionSpeed => self.params.explosion_speed,
            Param::ParticleSize => self.params.particle_size,
            Param::BloomIntensity => self.params.bloom_intensity,
            Param::BloomLuminanceThreshold => self.params.bloom_luminance_threshold,
            Param::BloomLuminanceSmoothing => self.params.bloom_luminance_smoothing,
            Param::ShockwaveThickness => self.params.shockwave_thickness,
        }
    }

    /// Generic write access for control surfaces. Values arrive already
    /// range-clamped by the panel; no validation happens here.
    pub fn set(&mut self, param: Param, value: f32) {
        match param {
            Param::ParticleCount => self.set_particle_count(value.round() as u32),
            Param::ExplosionSpeed => self.set_explosion_speed(value),
            Param::ParticleSize => self.set_particle_size(value),
            Param::BloomIntensity => self.set_bloom_intensity(value),
            Param::BloomLuminanceThreshold => self.set_bloom_luminance_threshold(value),
            Param::BloomLuminanceSmoothing => self.set_bloom_luminance_smoothing(value),
            Param::ShockwaveThickness => self.set_shockwave_thickness(value),
        }
    }

    fn invalidate_field(&mut self) {
        self.field_generation += 1;
        log::debug!(
            "particle field invalidated (generation {})",
            self.field_generation
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_and_speed_setters_invalidate_the_field() {
        let mut store = ParamStore::new();
        let start = store.field_generation();

        store.set_particle_count(20_000);
        assert_eq!(store.field_generation(), start + 1);

        store.set_explosion_speed(80.0);
        assert_eq!(store.field_generation(), start + 2);
    }

    #[test]
    fn setting_the_same_value_does_not_invalidate() {
        let mut store = ParamStore::new();
        let count = store.params().particle_count;
        let start = store.field_generation();

        store.set_particle_count(count);
        assert_eq!(store.field_generation(), start);
    }

    #[test]
    fn cosmetic_setters_leave_the_field_alone() {
        let mut store = ParamStore::new();
        let start = store.field_generation();

        store.set_particle_size(0.5);
        store.set_particle_color([0.2, 0.4, 0.8]);
        store.set_bloom_intensity(3.0);
        store.set_bloom_luminance_threshold(0.5);
        store.set_bloom_luminance_smoothing(0.7);
        store.set_shockwave_thickness(10.0);

        assert_eq!(store.field_generation(), start);
        assert_eq!(store.params().particle_size, 0.5);
    }

    #[test]
    fn generic_accessors_round_trip() {
        let mut store = ParamStore::new();
        store.set(Param::ExplosionSpeed, 125.0);
        assert_eq!(store.value(Param::ExplosionSpeed), 125.0);

        store.set(Param::ParticleCount, 3_000.4);
        assert_eq!(store.params().particle_count, 3_000);
    }
}
