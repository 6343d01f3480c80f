//! Tunable simulation and visual parameters.

/// All user-adjustable quantities, owned by [`crate::ParamStore`] and
/// mutated only through its setters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// Number of simulated particles.
    pub particle_count: u32,
    /// Base radial speed scale for particles, world units per second.
    pub explosion_speed: f32,
    /// Base point-sprite size.
    pub particle_size: f32,
    /// Linear RGB tint for the point cloud.
    pub particle_color: [f32; 3],
    /// Seconds over which a particle fades to nothing.
    pub max_life: f32,
    pub bloom_intensity: f32,
    pub bloom_luminance_threshold: f32,
    pub bloom_luminance_smoothing: f32,
    pub shockwave_thickness: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            particle_count: 10_000,
            explosion_speed: 50.0,
            particle_size: 0.15,
            // Orange, #FFA500, converted to linear space (the render
            // targets are linear; only the surface applies gamma).
            particle_color: [1.0, 0.3763, 0.0],
            max_life: 3.0,
            bloom_intensity: 1.5,
            bloom_luminance_threshold: 0.1,
            bloom_luminance_smoothing: 0.3,
            shockwave_thickness: 5.0,
        }
    }
}

/// Identity of a scalar parameter, for generic control surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    ParticleCount,
    ExplosionSpeed,
    ParticleSize,
    BloomIntensity,
    BloomLuminanceThreshold,
    BloomLuminanceSmoothing,
    ShockwaveThickness,
}

/// Declarative slider description for one scalar parameter.
///
/// Any configuration surface (the egui panel, a CLI flag, a config
/// file) can bind controls from this table without knowing anything
/// about the store's internals.
#[derive(Debug, Clone, Copy)]
pub struct Control {
    pub param: Param,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

/// The full control table, one entry per sliderable parameter.
pub const CONTROLS: &[Control] = &[
    Control {
        param: Param::ParticleCount,
        label: "Particle Count",
        min: 1_000.0,
        max: 50_000.0,
        step: 1_000.0,
    },
    Control {
        param: Param::ExplosionSpeed,
        label: "Explosion Speed",
        min: 10.0,
        max: 200.0,
        step: 5.0,
    },
    Control {
        param: Param::ParticleSize,
        label: "Particle Size",
        min: 0.01,
        max: 1.0,
        step: 0.01,
    },
    Control {
        param: Param::ShockwaveThickness,
        label: "Shockwave Thickness",
        min: 1.0,
        max: 20.0,
        step: 0.5,
    },
    Control {
        param: Param::BloomIntensity,
        label: "Bloom Intensity",
        min: 0.0,
        max: 5.0,
        step: 0.1,
    },
    Control {
        param: Param::BloomLuminanceThreshold,
        label: "Bloom Threshold",
        min: 0.0,
        max: 1.0,
        step: 0.01,
    },
    Control {
        param: Param::BloomLuminanceSmoothing,
        label: "Bloom Smoothing",
        min: 0.0,
        max: 1.0,
        step: 0.01,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn srgb_to_linear(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    #[test]
    fn default_particle_color_is_linearized_srgb() {
        let params = SimulationParams::default();
        let srgb = [1.0, 0.6471, 0.0]; // #FFA500
        for (value, s) in params.particle_color.iter().zip(srgb) {
            assert!((value - srgb_to_linear(s)).abs() < 1e-3);
        }
    }

    #[test]
    fn control_table_covers_each_param_once() {
        for (i, a) in CONTROLS.iter().enumerate() {
            for b in &CONTROLS[i + 1..] {
                assert_ne!(a.param, b.param, "duplicate control for {:?}", a.param);
            }
        }
        assert_eq!(CONTROLS.len(), 7);
    }

    #[test]
    fn defaults_sit_inside_control_ranges() {
        let params = SimulationParams::default();
        for control in CONTROLS {
            let value = match control.param {
                Param::ParticleCount => params.particle_count as f32,
                Param::ExplosionSpeed => params.explosion_speed,
                Param::ParticleSize => params.particle_size,
                Param::BloomIntensity => params.bloom_intensity,
                Param::BloomLuminanceThreshold => params.bloom_luminance_threshold,
                Param::BloomLuminanceSmoothing => params.bloom_luminance_smoothing,
                Param::ShockwaveThickness => params.shockwave_thickness,
            };
            assert!(
                value >= control.min && value <= control.max,
                "{} default {} outside [{}, {}]",
                control.label,
                value,
                control.min,
                control.max
            );
        }
    }
}
