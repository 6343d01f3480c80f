//! Simulation clock: the single controllable time base.
//!
//! Every evaluator reads time from here instead of wall clock, so the
//! whole scene pauses, resumes and replays together.

/// Largest simulated step a single frame may contribute, in seconds.
///
/// A host that was suspended (minimized window, backgrounded process)
/// resumes with an inflated elapsed-time reading; clamping each step to
/// the equivalent of a 10 Hz frame keeps the explosion from teleporting.
pub const MAX_FRAME_STEP: f32 = 0.1;

/// Owner of simulation time, play state, and the reset event.
///
/// Resets are published as a monotonically incrementing generation
/// counter rather than a shared boolean flag. Consumers remember the
/// last generation they handled (see [`ResetListener`]) and re-sync when
/// the observed generation differs, so there is no shared "clear" step
/// and no ordering dependency between consumers.
#[derive(Debug, Clone)]
pub struct Clock {
    time: f32,
    playing: bool,
    reset_generation: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// A clock at time zero, playing.
    pub fn new() -> Self {
        Self {
            time: 0.0,
            playing: true,
            reset_generation: 0,
        }
    }

    /// Current simulation time in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Generation of the most recent reset event.
    pub fn reset_generation(&self) -> u64 {
        self.reset_generation
    }

    /// Advance simulation time by `dt` seconds, capped at
    /// [`MAX_FRAME_STEP`]. No-op while paused.
    ///
    /// Callers must not pass a negative `dt`; only the upper bound is
    /// enforced.
    pub fn advance(&mut self, dt: f32) {
        if self.playing {
            self.time += dt.min(MAX_FRAME_STEP);
        }
    }

    /// Flip the play/pause state. Time is untouched.
    pub fn toggle_playing(&mut self) {
        self.playing = !self.playing;
    }

    /// Rewind to time zero and publish a new reset generation.
    ///
    /// A reset always resumes playback.
    pub fn trigger_reset(&mut self) {
        self.time = 0.0;
        self.playing = true;
        self.reset_generation += 1;
        log::debug!("clock reset (generation {})", self.reset_generation);
    }
}

/// Per-consumer view of the clock's reset event.
///
/// Each interested consumer holds its own listener and calls
/// [`ResetListener::take`] once per frame; the call returns `true`
/// exactly once per reset generation per listener, however many
/// listeners exist (fan-out, not hand-off).
#[derive(Debug, Clone)]
pub struct ResetListener {
    seen: u64,
}

impl ResetListener {
    /// A listener synchronized to the clock's current generation.
    /// It will not fire for resets that happened before attachment.
    pub fn attached(clock: &Clock) -> Self {
        Self {
            seen: clock.reset_generation(),
        }
    }

    /// True when a reset happened since the last call; the listener
    /// catches up to the current generation as a side effect.
    pub fn take(&mut self, clock: &Clock) -> bool {
        let current = clock.reset_generation();
        if current != self.seen {
            self.seen = current;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_clock_ignores_advance() {
        let mut clock = Clock::new();
        clock.toggle_playing();
        assert!(!clock.is_playing());

        clock.advance(0.016);
        clock.advance(5.0);
        assert_eq!(clock.time(), 0.0);
    }

    #[test]
    fn large_steps_clamp_to_max_frame_step() {
        let mut clock = Clock::new();
        clock.advance(3.7);
        assert_eq!(clock.time(), MAX_FRAME_STEP);
    }

    #[test]
    fn small_steps_accumulate_unclamped() {
        let mut clock = Clock::new();
        clock.advance(0.05);
        clock.advance(0.05);
        assert!((clock.time() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn reset_rewinds_resumes_and_bumps_generation() {
        let mut clock = Clock::new();
        clock.advance(0.08);
        clock.toggle_playing();
        let before = clock.reset_generation();

        clock.trigger_reset();

        assert_eq!(clock.time(), 0.0);
        assert!(clock.is_playing());
        assert_eq!(clock.reset_generation(), before + 1);
    }

    #[test]
    fn listener_fires_once_per_generation() {
        let mut clock = Clock::new();
        let mut listener = ResetListener::attached(&clock);

        assert!(!listener.take(&clock));

        clock.trigger_reset();
        assert!(listener.take(&clock));
        assert!(!listener.take(&clock));

        clock.trigger_reset();
        clock.trigger_reset();
        // Two resets collapse into one observation, which is all a
        // consumer needs to fully re-sync.
        assert!(listener.take(&clock));
        assert!(!listener.take(&clock));
    }

    #[test]
    fn independent_listeners_each_observe_the_same_reset() {
        let mut clock = Clock::new();
        let mut a = ResetListener::attached(&clock);
        let mut b = ResetListener::attached(&clock);

        clock.trigger_reset();

        assert!(a.take(&clock));
        assert!(b.take(&clock));
        assert!(!a.take(&clock));
        assert!(!b.take(&clock));
    }

    #[test]
    fn fresh_listener_does_not_fire_retroactively() {
        let mut clock = Clock::new();
        clock.trigger_reset();

        let mut late = ResetListener::attached(&clock);
        assert!(!late.take(&clock));
    }
}
