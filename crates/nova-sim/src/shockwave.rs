//! Shockwave: an expanding thin spherical shell keyed to the clock.

use crate::clock::{Clock, ResetListener};

/// Recognized shockwave options.
#[derive(Debug, Clone, Copy)]
pub struct ShockwaveConfig {
    /// Expansion rate, world units per second.
    pub initial_speed: f32,
    /// Shell tint, linear RGB.
    pub color: [f32; 3],
    /// Distance at which the shell is fully faded and hidden.
    pub max_radius: f32,
    /// Shell visual thickness, passed to the shading stage and used as
    /// the visibility cushion past `max_radius`.
    pub thickness: f32,
}

impl Default for ShockwaveConfig {
    fn default() -> Self {
        Self {
            initial_speed: 70.0,
            // Pale yellow, #FFFFAA, converted to linear space.
            color: [1.0, 1.0, 0.4019],
            max_radius: 120.0,
            thickness: 2.0,
        }
    }
}

/// One evaluated frame of the shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShockwaveFrame {
    pub radius: f32,
    /// Quadratic fade: drops faster than linear as the shell nears
    /// `max_radius`, exactly 0 once it arrives.
    pub opacity: f32,
    pub visible: bool,
}

/// Radial shell expansion, a pure function of elapsed clock time since
/// the last start (mount or reset).
#[derive(Debug, Clone)]
pub struct Shockwave {
    config: ShockwaveConfig,
    start_time_offset: f32,
    reset: ResetListener,
}

impl Shockwave {
    /// The expansion begins at the clock's current time.
    pub fn new(config: ShockwaveConfig, clock: &Clock) -> Self {
        Self {
            config,
            start_time_offset: clock.time(),
            reset: ResetListener::attached(clock),
        }
    }

    pub fn config(&self) -> &ShockwaveConfig {
        &self.config
    }

    /// The thickness control on the panel drives the shell directly.
    pub fn set_thickness(&mut self, thickness: f32) {
        self.config.thickness = thickness;
    }

    /// Re-sync with the clock; call once per frame before sampling.
    ///
    /// When a reset generation is observed the expansion restarts at
    /// the clock's post-reset time (0 right after a user reset), and
    /// the next sample reports full opacity immediately rather than
    /// waiting a frame to clear a previous near-zero value.
    pub fn update(&mut self, clock: &Clock) {
        if self.reset.take(clock) {
            self.restart(clock);
        }
    }

    /// Restart the expansion at the clock's current time.
    ///
    /// A field-dirtying parameter change (count or speed) re-fires the
    /// explosion without rewinding the clock; the shell re-fires with
    /// it, so the next sample reports full opacity and visibility.
    pub fn restart(&mut self, clock: &Clock) {
        self.start_time_offset = clock.time();
        log::debug!("shockwave restarted at t={}", self.start_time_offset);
    }

    /// Evaluate the shell at clock time `t`.
    ///
    /// Returns `None` while `t` precedes the start offset — the
    /// evaluator is inert under any ordering anomaly where the offset
    /// lands ahead of the current clock reading.
    pub fn sample(&self, t: f32) -> Option<ShockwaveFrame> {
        let elapsed = t - self.start_time_offset;
        if elapsed < 0.0 {
            return None;
        }

        let radius = elapsed * self.config.initial_speed;
        let fade = 1.0 - (radius / self.config.max_radius).min(1.0);
        Some(ShockwaveFrame {
            radius,
            opacity: fade * fade,
            visible: radius <= self.config.max_radius + self.config.thickness,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ShockwaveConfig {
        ShockwaveConfig {
            initial_speed: 70.0,
            max_radius: 120.0,
            thickness: 2.0,
            ..ShockwaveConfig::default()
        }
    }

    #[test]
    fn default_shell_tint_is_linearized_srgb() {
        let srgb_to_linear = |c: f32| {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        let srgb = [1.0, 1.0, 0.6667]; // #FFFFAA
        for (value, s) in ShockwaveConfig::default().color.iter().zip(srgb) {
            assert!((value - srgb_to_linear(s)).abs() < 1e-3);
        }
    }

    #[test]
    fn radius_is_monotone_while_elapsed_is_nonnegative() {
        let clock = Clock::new();
        let wave = Shockwave::new(config(), &clock);

        let mut last = 0.0;
        for step in 0..200 {
            let t = step as f32 * 0.05;
            let frame = wave.sample(t).expect("elapsed >= 0");
            assert!(frame.radius >= last);
            last = frame.radius;
        }
    }

    #[test]
    fn opacity_is_exactly_zero_at_max_radius() {
        let clock = Clock::new();
        let wave = Shockwave::new(
            ShockwaveConfig {
                initial_speed: 60.0,
                max_radius: 120.0,
                ..config()
            },
            &clock,
        );

        // elapsed 2.0 * speed 60 lands exactly on max_radius.
        let frame = wave.sample(2.0).unwrap();
        assert_eq!(frame.radius, 120.0);
        assert_eq!(frame.opacity, 0.0);
    }

    #[test]
    fn shell_stays_visible_through_the_thickness_cushion() {
        let clock = Clock::new();
        let wave = Shockwave::new(config(), &clock);

        // radius == max_radius: faded out but still visible (120 <= 122).
        let at_max = wave.sample(120.0 / 70.0).unwrap();
        assert!((at_max.radius - 120.0).abs() < 1e-3);
        assert!(at_max.opacity < 1e-9);
        assert!(at_max.visible);

        // radius ~122.0: past the cushion, hidden.
        let past = wave.sample(1.743).unwrap();
        assert!((past.radius - 122.0).abs() < 0.05);
        assert!(!past.visible);
    }

    #[test]
    fn inert_before_the_start_offset() {
        let mut clock = Clock::new();
        for _ in 0..50 {
            clock.advance(0.1);
        }
        let wave = Shockwave::new(config(), &clock);

        assert!(wave.sample(clock.time() - 1.0).is_none());
        assert!(wave.sample(clock.time()).is_some());
    }

    #[test]
    fn reset_restarts_the_expansion_at_full_opacity() {
        let mut clock = Clock::new();
        let mut wave = Shockwave::new(config(), &clock);

        for _ in 0..40 {
            clock.advance(0.1);
        }
        let faded = wave.sample(clock.time()).unwrap();
        assert!(faded.opacity < 0.1);

        clock.trigger_reset();
        wave.update(&clock);

        let fresh = wave.sample(clock.time()).unwrap();
        assert_eq!(fresh.radius, 0.0);
        assert_eq!(fresh.opacity, 1.0);
        assert!(fresh.visible);
    }

    #[test]
    fn field_dirtying_parameter_change_restarts_the_expansion() {
        use crate::store::ParamStore;

        let mut clock = Clock::new();
        let mut store = ParamStore::new();
        let mut wave = Shockwave::new(config(), &clock);
        let built = store.field_generation();

        for _ in 0..40 {
            clock.advance(0.1);
        }
        assert!(wave.sample(clock.time()).unwrap().opacity < 0.1);

        // The render loop restarts the shell whenever the field
        // generation moves, exactly like it rebuilds the seed buffer.
        store.set_particle_count(20_000);
        assert_ne!(store.field_generation(), built);
        wave.restart(&clock);

        let fresh = wave.sample(clock.time()).unwrap();
        assert_eq!(fresh.radius, 0.0);
        assert_eq!(fresh.opacity, 1.0);
        assert!(fresh.visible);
    }

    #[test]
    fn update_without_reset_keeps_the_offset() {
        let mut clock = Clock::new();
        let mut wave = Shockwave::new(config(), &clock);

        clock.advance(0.1);
        wave.update(&clock);

        let frame = wave.sample(clock.time()).unwrap();
        assert!((frame.radius - 7.0).abs() < 1e-3);
    }
}
