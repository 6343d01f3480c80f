//! Particle field: per-particle initial conditions and ballistic drift.
//!
//! The field holds only static samples drawn once at generation time;
//! a particle's position at any clock time is a pure function of those
//! samples, never stepped and stored. Regeneration (count or speed
//! change, or a reset) discards every sample and redraws independently,
//! so no particle identity survives a rebuild.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

/// Static initial condition for one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSeed {
    /// Direction and speed of the ballistic drift, world units/second.
    pub velocity: Vec3,
    /// Per-particle size multiplier in [0.5, 1.0).
    pub scale: f32,
    /// Clock time at which this particle's motion begins.
    ///
    /// Every particle in a freshly generated field shares the pinned
    /// value 0; the per-particle slot exists so the shading stage could
    /// stagger starts without a data-model change.
    pub start_time: f32,
}

/// GPU mirror of [`ParticleSeed`], padded to WGSL storage layout
/// (vec3 aligns to 16 bytes, struct size rounds to 32).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuSeed {
    pub velocity: [f32; 3],
    pub scale: f32,
    pub start_time: f32,
    pub _padding: [f32; 3],
}

/// The complete set of per-particle sampled initial conditions.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    seeds: Vec<ParticleSeed>,
}

impl ParticleField {
    /// Draw a fresh field of `count` particles.
    ///
    /// Each direction is a uniformly random point on the unit sphere
    /// (three independent uniforms in [-0.5, 0.5], normalized), scaled
    /// by `explosion_speed * (0.5 + 0.5 * U)` so individual speeds span
    /// `[0.5, 1.0] * explosion_speed`. Scales are drawn the same way.
    pub fn generate(count: u32, explosion_speed: f32, rng: &mut impl Rng) -> Self {
        let mut seeds = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let raw = Vec3::new(
                rng.random::<f32>() - 0.5,
                rng.random::<f32>() - 0.5,
                rng.random::<f32>() - 0.5,
            );
            // The all-zero draw is measure-zero; fall back to +X rather
            // than normalize into a NaN.
            let direction = if raw.length_squared() > 0.0 {
                raw.normalize()
            } else {
                Vec3::X
            };
            let speed = explosion_speed * (0.5 + 0.5 * rng.random::<f32>());

            seeds.push(ParticleSeed {
                velocity: direction * speed,
                scale: 0.5 + 0.5 * rng.random::<f32>(),
                start_time: 0.0,
            });
        }

        log::debug!("generated particle field of {count} seeds");
        Self { seeds }
    }

    /// Build a field from explicit seeds (deterministic replays, tests).
    pub fn from_seeds(seeds: Vec<ParticleSeed>) -> Self {
        Self { seeds }
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn seeds(&self) -> &[ParticleSeed] {
        &self.seeds
    }

    /// World position of particle `i` at clock time `t`: pure ballistic
    /// drift from the origin, no gravity, no drag.
    pub fn position_at(&self, i: usize, t: f32) -> Vec3 {
        let seed = &self.seeds[i];
        seed.velocity * (t - seed.start_time)
    }

    /// Age of particle `i` at clock time `t`. The shading stage fades
    /// particles out over a bounded lifetime as a function of this.
    pub fn age_at(&self, i: usize, t: f32) -> f32 {
        t - self.seeds[i].start_time
    }

    /// Storage-buffer payload for the point-cloud renderer.
    pub fn gpu_seeds(&self) -> Vec<GpuSeed> {
        self.seeds
            .iter()
            .map(|seed| GpuSeed {
                velocity: seed.velocity.to_array(),
                scale: seed.scale,
                start_time: seed.start_time,
                _padding: [0.0; 3],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn speeds_and_scales_stay_inside_the_sampling_ranges() {
        let speed = 50.0;
        let field = ParticleField::generate(2_000, speed, &mut rng());

        for seed in field.seeds() {
            let magnitude = seed.velocity.length();
            assert!(
                (0.5 * speed..=1.0 * speed + 1e-3).contains(&magnitude),
                "speed {magnitude} outside [{}, {}]",
                0.5 * speed,
                speed
            );
            assert!((0.5..1.0).contains(&seed.scale));
            assert_eq!(seed.start_time, 0.0);
        }
    }

    #[test]
    fn regeneration_discards_all_prior_samples() {
        let mut r = rng();
        let first = ParticleField::generate(1_000, 50.0, &mut r);
        let second = ParticleField::generate(500, 50.0, &mut r);

        assert_eq!(first.len(), 1_000);
        assert_eq!(second.len(), 500);
        // Independent redraw: no velocity carries over into the new field.
        let carried = second
            .seeds()
            .iter()
            .filter(|s| first.seeds().contains(s))
            .count();
        assert_eq!(carried, 0);
    }

    #[test]
    fn position_is_linear_in_accumulated_clock_time() {
        let field = ParticleField::generate(64, 80.0, &mut rng());
        let mut clock = Clock::new();

        // Many small frames; total simulated time stays exact because
        // each step is well under the clamp.
        for _ in 0..100 {
            clock.advance(0.01);
        }
        let t = clock.time();

        for (i, seed) in field.seeds().iter().enumerate() {
            let expected = seed.velocity * t;
            let actual = field.position_at(i, t);
            assert!(
                (actual - expected).length() < 1e-3,
                "particle {i} drifted: {actual} vs {expected}"
            );
        }
    }

    #[test]
    fn single_seeded_particle_scenario() {
        // explosion_speed = 50, velocity pinned to (1,0,0) * 50.
        let field = ParticleField::from_seeds(vec![ParticleSeed {
            velocity: Vec3::new(50.0, 0.0, 0.0),
            scale: 1.0,
            start_time: 0.0,
        }]);

        let mut clock = Clock::new();
        for _ in 0..20 {
            clock.advance(0.05);
        }
        assert!((clock.time() - 1.0).abs() < 1e-5);

        let position = field.position_at(0, clock.time());
        assert!((position - Vec3::new(50.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn age_tracks_clock_time_for_pinned_start() {
        let field = ParticleField::generate(8, 50.0, &mut rng());
        assert_eq!(field.age_at(3, 2.5), 2.5);
    }

    #[test]
    fn gpu_seeds_mirror_the_field() {
        let field = ParticleField::generate(16, 50.0, &mut rng());
        let gpu = field.gpu_seeds();

        assert_eq!(gpu.len(), field.len());
        for (seed, mirror) in field.seeds().iter().zip(&gpu) {
            assert_eq!(mirror.velocity, seed.velocity.to_array());
            assert_eq!(mirror.scale, seed.scale);
            assert_eq!(mirror.start_time, seed.start_time);
        }
        assert_eq!(std::mem::size_of::<GpuSeed>(), 32);
    }
}
