//! Spawn policy: when new beams appear and how they are initialized.
//!
//! A countdown timer decides *when*: it ages by `dt` each frame and, on
//! elapsing, one allocation is attempted and the timer reseeds to a
//! random delay, whether or not the pool had a free slot. [`BeamConfig`]
//! decides *what*: the ranges every new beam's speed, width, length,
//! delay, and color are drawn from.
//!
//! New beams do not pop into existence inside the volume. The two
//! non-movement axes are snapped onto the voxel lattice and the movement
//! axis starts just outside the entry face, offset by the glowing part of
//! the beam's half-length, so the beam slides in through the wall already
//! partially visible.

use crate::color::Rgba;
use crate::direction::{set_axis_component, Direction};
use crate::field::GridConfig;
use crate::pool::BeamPool;
use crate::rng::XorShift32;
use glam::Vec3;
use std::ops::Range;

/// Ranges every newly spawned beam draws from.
///
/// # Example
///
/// ```
/// use vbpe::BeamConfig;
///
/// let cfg = BeamConfig::new()
///     .with_speed(5.0..20.0)
///     .with_length(3.0..7.0)
///     .with_width(1.0..3.0);
/// ```
#[derive(Clone, Debug)]
pub struct BeamConfig {
    /// Travel speed range (world units per second).
    pub speed: Range<f32>,
    /// Half-extent range for the two non-movement axes.
    pub width: Range<f32>,
    /// Half-extent range for the movement axis.
    pub length: Range<f32>,
    /// Delay range between spawn attempts (seconds).
    pub spawn_delay: Range<f32>,
    /// First endpoint of the spawn color lerp.
    pub color_from: Rgba,
    /// Second endpoint of the spawn color lerp.
    pub color_to: Rgba,
}

impl BeamConfig {
    /// Create a config with the stock beam look.
    ///
    /// Default values:
    /// - `speed`: 2.0..10.0
    /// - `width`: 0.5..1.5
    /// - `length`: 2.0..5.0
    /// - `spawn_delay`: 0.1..0.5 s
    /// - colors: burnt orange to violet
    pub fn new() -> Self {
        Self {
            speed: 2.0..10.0,
            width: 0.5..1.5,
            length: 2.0..5.0,
            spawn_delay: 0.1..0.5,
            color_from: Rgba::from_rgb(0xC75108),
            color_to: Rgba::from_rgb(0x610CCF),
        }
    }

    /// Set the speed range.
    pub fn with_speed(mut self, speed: Range<f32>) -> Self {
        assert!(speed.start > 0.0 && speed.start <= speed.end, "Bad speed range");
        self.speed = speed;
        self
    }

    /// Set the half-width range. Must stay strictly positive: the splat
    /// divides by scale.
    pub fn with_width(mut self, width: Range<f32>) -> Self {
        assert!(width.start > 0.0 && width.start <= width.end, "Bad width range");
        self.width = width;
        self
    }

    /// Set the half-length range. Must stay strictly positive.
    pub fn with_length(mut self, length: Range<f32>) -> Self {
        assert!(length.start > 0.0 && length.start <= length.end, "Bad length range");
        self.length = length;
        self
    }

    /// Set the spawn delay range in seconds.
    pub fn with_spawn_delay(mut self, delay: Range<f32>) -> Self {
        assert!(delay.start >= 0.0 && delay.start <= delay.end, "Bad delay range");
        self.spawn_delay = delay;
        self
    }

    /// Set the two colors new beams lerp between.
    pub fn with_colors(mut self, from: Rgba, to: Rgba) -> Self {
        self.color_from = from;
        self.color_to = to;
        self
    }
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Countdown spawn timer.
#[derive(Clone, Debug)]
pub struct SpawnTimer {
    remaining: f32,
}

impl SpawnTimer {
    /// Start a timer with an initial delay drawn from the config range.
    pub fn new(cfg: &BeamConfig, rng: &mut XorShift32) -> Self {
        Self {
            remaining: rng.next_f32(cfg.spawn_delay.start, cfg.spawn_delay.end),
        }
    }

    /// Age the timer by `dt`. Returns `true` when it has elapsed; the
    /// caller is then expected to [`reseed`](Self::reseed).
    #[inline]
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    /// Draw a fresh delay. Called after every elapse, spawn or no spawn.
    pub fn reseed(&mut self, cfg: &BeamConfig, rng: &mut XorShift32) {
        self.remaining = rng.next_f32(cfg.spawn_delay.start, cfg.spawn_delay.end);
    }

    /// Seconds left until the next spawn attempt.
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

/// Initialize a freshly allocated pool slot as a new beam.
///
/// The slot must have just come out of [`BeamPool::allocate`]; every beam
/// field is written here before the slot is next simulated or rendered.
///
/// `reach` is the glow reach the splat will run with. The spawn offset
/// scales with it so the new beam's glow already overlaps the volume;
/// with a reach below 1 a full half-length offset would put the beam
/// entirely outside its own visible extent and it would be culled before
/// ever lighting a voxel.
pub fn init_beam(
    pool: &mut BeamPool,
    idx: usize,
    cfg: &BeamConfig,
    grid: &GridConfig,
    reach: f32,
    rng: &mut XorShift32,
) {
    pool.set_color(
        idx,
        cfg.color_from.lerp(cfg.color_to, rng.next_unit_f32()),
    );
    pool.set_speed(idx, rng.next_f32(cfg.speed.start, cfg.speed.end));

    let dir = Direction::ALL[rng.next_index(Direction::ALL.len() as u32) as usize];
    pool.set_direction(idx, dir);
    let axis = dir.axis();

    // Uniform width on all axes, then the movement axis gets its length.
    let width = rng.next_f32(cfg.width.start, cfg.width.end);
    let length = rng.next_f32(cfg.length.start, cfg.length.end);
    let mut scale = Vec3::splat(width);
    set_axis_component(&mut scale, axis, length);
    *pool.scale_mut(idx) = scale;

    let (min, max) = (grid.min(), grid.max());
    let mut position = Vec3::new(
        grid.snap(rng.next_f32(min.x, max.x), 0),
        grid.snap(rng.next_f32(min.y, max.y), 1),
        grid.snap(rng.next_f32(min.z, max.z), 2),
    );
    // Start just outside the entry face, offset by the glowing part of
    // the half-length so it emerges through the wall instead of popping
    // in. Capped at the half-length itself for reaches above 1.
    let start = dir.entry_face(min, max) - dir.sign() * length * reach.min(1.0);
    set_axis_component(&mut position, axis, start);
    *pool.position_mut(idx) = position;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::axis_component;

    fn grid() -> GridConfig {
        GridConfig::new(21, 21, 21).with_padding(0.0)
    }

    fn spawn_one_with_reach(seed: u32, reach: f32) -> (BeamPool, usize, XorShift32) {
        let mut pool = BeamPool::new(4);
        let mut rng = XorShift32::new(seed);
        let cfg = BeamConfig::new();
        let idx = pool.allocate().unwrap();
        init_beam(&mut pool, idx, &cfg, &grid(), reach, &mut rng);
        (pool, idx, rng)
    }

    fn spawn_one(seed: u32) -> (BeamPool, usize, XorShift32) {
        spawn_one_with_reach(seed, 1.0)
    }

    #[test]
    fn test_spawn_timer_elapses_and_reseeds() {
        let cfg = BeamConfig::new();
        let mut rng = XorShift32::new(7);
        let mut timer = SpawnTimer::new(&cfg, &mut rng);
        assert!(timer.remaining() >= cfg.spawn_delay.start);
        assert!(timer.remaining() <= cfg.spawn_delay.end);

        // A long enough frame always elapses the timer.
        assert!(timer.tick(1.0));
        timer.reseed(&cfg, &mut rng);
        assert!(timer.remaining() > 0.0);
    }

    #[test]
    fn test_spawn_timer_accumulates_small_frames() {
        let cfg = BeamConfig::new().with_spawn_delay(0.3..0.3);
        let mut rng = XorShift32::new(7);
        let mut timer = SpawnTimer::new(&cfg, &mut rng);
        assert!(!timer.tick(0.1));
        assert!(!timer.tick(0.1));
        assert!(timer.tick(0.2));
    }

    #[test]
    fn test_new_beam_scale_axes() {
        let (pool, idx, _) = spawn_one(123);
        let dir = pool.direction(idx);
        let scale = pool.scale(idx);
        let cfg = BeamConfig::new();
        for axis in 0..3 {
            let extent = axis_component(scale, axis);
            // Draws are closed-interval, so compare inclusively.
            if axis == dir.axis() {
                assert!(extent >= cfg.length.start && extent <= cfg.length.end);
            } else {
                assert!(extent >= cfg.width.start && extent <= cfg.width.end);
            }
            assert!(extent > 0.0);
        }
    }

    #[test]
    fn test_new_beam_starts_outside_entry_face() {
        for seed in 1..50 {
            let (pool, idx, _) = spawn_one(seed);
            let dir = pool.direction(idx);
            let g = grid();
            let pos = axis_component(pool.position(idx), dir.axis());
            let face = dir.entry_face(g.min(), g.max());
            let length = axis_component(pool.scale(idx), dir.axis());
            assert!((pos - (face - dir.sign() * length)).abs() < 1e-4);
            // Outside the volume on the travel axis, by its half-length.
            if dir.sign() > 0.0 {
                assert!(pos < face);
            } else {
                assert!(pos > face);
            }
        }
    }

    #[test]
    fn test_short_reach_shrinks_spawn_offset() {
        // With reach 0.5 only half the length glows, so the beam spawns
        // half a length outside the face instead of a full length. The
        // glow then still overlaps the volume from frame one.
        for seed in 1..50 {
            let (pool, idx, _) = spawn_one_with_reach(seed, 0.5);
            let dir = pool.direction(idx);
            let g = grid();
            let pos = axis_component(pool.position(idx), dir.axis());
            let face = dir.entry_face(g.min(), g.max());
            let length = axis_component(pool.scale(idx), dir.axis());
            assert!((pos - (face - dir.sign() * length * 0.5)).abs() < 1e-4);
            let glow_edge = pos + dir.sign() * length * 0.5;
            assert!((glow_edge - face).abs() < 1e-4);
        }
    }

    #[test]
    fn test_new_beam_cross_axes_snapped_in_bounds() {
        for seed in 1..50 {
            let (pool, idx, _) = spawn_one(seed);
            let dir = pool.direction(idx);
            let g = grid();
            for axis in 0..3 {
                if axis == dir.axis() {
                    continue;
                }
                let w = axis_component(pool.position(idx), axis);
                assert_eq!(g.snap(w, axis), w, "axis {axis} not on lattice");
                assert!(w >= axis_component(g.min(), axis));
                assert!(w <= axis_component(g.max(), axis));
            }
        }
    }

    #[test]
    fn test_new_beam_color_between_endpoints() {
        let cfg = BeamConfig::new();
        let (lo_r, hi_r) = (
            cfg.color_from.r.min(cfg.color_to.r),
            cfg.color_from.r.max(cfg.color_to.r),
        );
        for seed in 1..50 {
            let (pool, idx, _) = spawn_one(seed);
            let c = pool.color(idx);
            assert!(c.r >= lo_r && c.r <= hi_r);
            assert_eq!(c.a, 0xFF);
        }
    }

    #[test]
    fn test_all_directions_reachable() {
        let mut seen = [false; 6];
        let mut pool = BeamPool::new(1);
        let mut rng = XorShift32::new(5);
        let cfg = BeamConfig::new();
        let g = grid();
        for _ in 0..200 {
            let idx = pool.allocate().unwrap();
            init_beam(&mut pool, idx, &cfg, &g, 1.0, &mut rng);
            seen[Direction::ALL
                .iter()
                .position(|&d| d == pool.direction(idx))
                .unwrap()] = true;
            pool.release(idx);
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    #[should_panic(expected = "Bad width range")]
    fn test_zero_width_rejected() {
        let _ = BeamConfig::new().with_width(0.0..1.0);
    }
}
