//! Frame clock for driving the simulation.
//!
//! The effect core itself is time-agnostic: [`Simulation::step`] takes a
//! plain `dt`. This clock is for hosts that want wall-clock frame deltas,
//! with an optional fixed delta for deterministic runs.
//!
//! [`Simulation::step`]: crate::Simulation::step
//!
//! # Example
//!
//! ```ignore
//! use vbpe::Time;
//!
//! let mut clock = Time::new();
//! loop {
//!     let dt = clock.update();
//!     sim.step(dt);
//! }
//! ```

use std::time::{Duration, Instant};

/// Wall-clock frame timer with optional fixed delta.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    fixed_delta: Option<f32>,
}

impl Time {
    /// Start the clock now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fixed_delta: None,
        }
    }

    /// Advance one frame and return the delta to simulate with.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw);
        self.last_frame = now;
        self.frame_count += 1;

        let since_fps = now.duration_since(self.fps_update_time);
        if since_fps >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / since_fps.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Seconds since the clock started.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Delta returned by the last [`update`](Self::update).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames since the clock started.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed twice a second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Force every update to report this delta instead of wall time.
    /// Pass `None` to go back to real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Restart the clock from now.
    pub fn reset(&mut self) {
        let fixed = self.fixed_delta;
        *self = Self::new();
        self.fixed_delta = fixed;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_starts_at_frame_zero() {
        let clock = Time::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.delta(), 0.0);
    }

    #[test]
    fn test_update_advances() {
        let mut clock = Time::new();
        thread::sleep(Duration::from_millis(10));
        let dt = clock.update();
        assert!(dt > 0.0);
        assert_eq!(clock.frame(), 1);
        assert!(clock.elapsed() > 0.0);
    }

    #[test]
    fn test_fixed_delta_overrides_wall_time() {
        let mut clock = Time::new();
        clock.set_fixed_delta(Some(1.0 / 60.0));
        thread::sleep(Duration::from_millis(50));
        let dt = clock.update();
        assert!((dt - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset_keeps_fixed_delta() {
        let mut clock = Time::new();
        clock.set_fixed_delta(Some(0.5));
        clock.update();
        clock.reset();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.update(), 0.5);
    }
}
