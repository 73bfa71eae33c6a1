//! Simulation builder and per-frame step.
//!
//! [`Simulation`] owns the beam pool, the voxel field, the RNG, and the
//! spawn timer, and advances them all in one synchronous pass per frame.
//! The rendering collaborator calls [`step`](Simulation::step) with the
//! frame delta and draws whatever comes back; nothing in here touches a
//! GPU or a window.
//!
//! # Example
//!
//! ```
//! use vbpe::prelude::*;
//!
//! let mut sim = Simulation::new()
//!     .with_capacity(20)
//!     .with_seed(12345)
//!     .with_grid(GridConfig::new(21, 21, 21))
//!     .with_beams(BeamConfig::new().with_speed(5.0..15.0))
//!     .with_splat(SplatConfig::new(0.5));
//!
//! for _ in 0..60 {
//!     let commands = sim.step(1.0 / 60.0);
//!     // hand `commands` to the renderer
//!     let _ = commands.len();
//! }
//! ```
//!
//! # Frame order
//!
//! 1. Age the spawn timer; on elapse, attempt one allocation and reseed.
//! 2. Advance every live beam along its movement axis by `speed * dt`.
//! 3. Release beams whose padded extent has fully left the volume.
//! 4. Splat the survivors into the frame accumulator.
//! 5. Emit the touched voxels as [`DrawCommand`]s.

use crate::color::Rgba;
use crate::direction::{axis_component, set_axis_component, Direction};
use crate::field::{DrawCommand, FrameSplat, GridConfig, SplatConfig, VoxelField};
use crate::pool::BeamPool;
use crate::rng::XorShift32;
use crate::spawn::{init_beam, BeamConfig, SpawnTimer};

/// Snapshot of one live beam, for collaborators that render markers or
/// spheres instead of (or on top of) the voxel output.
#[derive(Clone, Copy, Debug)]
pub struct Beam {
    /// Pool slot holding the beam. Stable while the beam lives.
    pub index: usize,
    /// World-space center.
    pub position: glam::Vec3,
    /// Per-axis half-extent.
    pub scale: glam::Vec3,
    /// Travel direction.
    pub direction: Direction,
    /// Travel speed.
    pub speed: f32,
    /// Spawn color.
    pub color: Rgba,
}

/// The frame-stepped beam/voxel simulation.
///
/// Configure with the `with_*` builder methods, then call
/// [`step`](Simulation::step) once per frame.
pub struct Simulation {
    pool: BeamPool,
    field: VoxelField,
    beam_cfg: BeamConfig,
    splat_cfg: SplatConfig,
    rng: XorShift32,
    timer: SpawnTimer,
    frame: FrameSplat,
    commands: Vec<DrawCommand>,
    frame_count: u64,
}

impl Simulation {
    /// Create a simulation with default settings: a 21³ grid, a pool of
    /// 20 beams, and the stock beam look.
    pub fn new() -> Self {
        let beam_cfg = BeamConfig::default();
        let field = VoxelField::new(GridConfig::default());
        let mut rng = XorShift32::default();
        let timer = SpawnTimer::new(&beam_cfg, &mut rng);
        let frame = FrameSplat::new(field.config().total_cells());
        Self {
            pool: BeamPool::new(20),
            field,
            beam_cfg,
            splat_cfg: SplatConfig::default(),
            rng,
            timer,
            frame,
            commands: Vec::new(),
            frame_count: 0,
        }
    }

    /// Set the pool capacity (maximum simultaneously live beams).
    ///
    /// Rebuilds the pool, so call before stepping.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.pool = BeamPool::new(capacity);
        self
    }

    /// Set the RNG seed. Two simulations with identical configuration,
    /// seed, and deltas produce identical frames.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = XorShift32::new(seed);
        self.timer = SpawnTimer::new(&self.beam_cfg, &mut self.rng);
        self
    }

    /// Set the voxel grid geometry.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.field = VoxelField::new(grid);
        self.frame = FrameSplat::new(self.field.config().total_cells());
        self
    }

    /// Set the beam spawn ranges.
    pub fn with_beams(mut self, beams: BeamConfig) -> Self {
        self.beam_cfg = beams;
        self.timer = SpawnTimer::new(&self.beam_cfg, &mut self.rng);
        self
    }

    /// Set the splat tunables.
    pub fn with_splat(mut self, splat: SplatConfig) -> Self {
        self.splat_cfg = splat;
        self
    }

    /// Advance one frame and return the voxels to draw.
    ///
    /// The returned slice is valid until the next call; the collaborator
    /// reads it after the step completes (single writer, then single
    /// reader, nothing to guard).
    pub fn step(&mut self, dt: f32) -> &[DrawCommand] {
        self.frame_count += 1;

        if self.timer.tick(dt) {
            // Reseed whether or not a slot was free; a full pool just
            // skips this spawn.
            self.spawn();
            self.timer.reseed(&self.beam_cfg, &mut self.rng);
        }

        self.frame.begin_frame();
        let (min, max) = (self.field.config().min(), self.field.config().max());
        for idx in 0..self.pool.capacity() {
            if !self.pool.is_live(idx) {
                continue;
            }
            let dir = self.pool.direction(idx);
            let axis = dir.axis();
            let travel = dir.sign() * self.pool.speed(idx) * dt;
            {
                let pos = self.pool.position_mut(idx);
                set_axis_component(pos, axis, axis_component(*pos, axis) + travel);
            }

            let pos = self.pool.position(idx);
            let scale = self.pool.scale(idx);
            // Same padded extent the splat uses: release exactly when no
            // voxel can light up anymore.
            let (lo, hi) = self.field.beam_box(pos, scale, self.splat_cfg.reach);
            if hi.x < min.x
                || lo.x > max.x
                || hi.y < min.y
                || lo.y > max.y
                || hi.z < min.z
                || lo.z > max.z
            {
                self.pool.release(idx);
                continue;
            }

            self.field
                .splat(pos, scale, self.pool.color(idx), &self.splat_cfg, &mut self.frame);
        }

        self.commands.clear();
        self.frame.emit(&self.field, &mut self.commands);
        &self.commands
    }

    /// Attempt to spawn one beam immediately, outside the timer.
    ///
    /// Returns the slot index, or `None` if the pool is exhausted.
    pub fn spawn(&mut self) -> Option<usize> {
        let idx = self.pool.allocate()?;
        init_beam(
            &mut self.pool,
            idx,
            &self.beam_cfg,
            self.field.config(),
            self.splat_cfg.reach,
            &mut self.rng,
        );
        Some(idx)
    }

    /// Draw commands produced by the most recent [`step`](Self::step).
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Snapshots of all live beams.
    pub fn beams(&self) -> impl Iterator<Item = Beam> + '_ {
        self.pool.live_indices().map(|idx| Beam {
            index: idx,
            position: self.pool.position(idx),
            scale: self.pool.scale(idx),
            direction: self.pool.direction(idx),
            speed: self.pool.speed(idx),
            color: self.pool.color(idx),
        })
    }

    /// Number of live beams.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.pool.live_count()
    }

    /// Frames stepped so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The beam pool.
    #[inline]
    pub fn pool(&self) -> &BeamPool {
        &self.pool
    }

    /// The voxel field.
    #[inline]
    pub fn field(&self) -> &VoxelField {
        &self.field
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
