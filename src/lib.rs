//! # vbpe - Voxel Beam Particle Engine
//!
//! A renderer-agnostic core for a beam-through-voxels effect: axis-aligned
//! beam particles fly through a static voxel grid, and every frame each
//! beam writes a distance-falloff size into the voxels around it. The
//! output is a flat list of `position + half_size + color` draw commands
//! ready for instanced rendering.
//!
//! Two pieces do the work:
//!
//! - [`BeamPool`]: a fixed-capacity particle pool with O(1) allocate and
//!   release over an intrusive freelist. Slot indices stay stable while a
//!   beam lives.
//! - [`VoxelField`]: the grid geometry plus a bounded splat pass that
//!   visits only the voxels inside a beam's padded extent.
//!
//! [`Simulation`] wires them together with spawn timing and bounds
//! culling into a single `step(dt)` call.
//!
//! ## Quick start
//!
//! ```
//! use vbpe::prelude::*;
//!
//! let mut sim = Simulation::new()
//!     .with_seed(12345)
//!     .with_grid(GridConfig::new(21, 21, 21))
//!     .with_splat(SplatConfig::new(0.5));
//!
//! let commands = sim.step(1.0 / 60.0);
//! for cmd in commands {
//!     // draw a cube of half-size cmd.half_size at cmd.position
//!     let _ = (cmd.position, cmd.half_size, cmd.color);
//! }
//! ```
//!
//! Everything is deterministic given a seed, and nothing here depends on
//! a GPU, a window, or wall-clock time.

pub mod color;
pub mod direction;
pub mod field;
pub mod pool;
pub mod rng;
pub mod simulation;
pub mod spawn;
pub mod time;

pub use color::Rgba;
pub use direction::Direction;
pub use field::{DrawCommand, Falloff, FrameSplat, GridConfig, Metric, SplatConfig, VoxelField};
pub use pool::{BeamPool, SlotState, PARKED};
pub use rng::{XorShift32, DEFAULT_SEED};
pub use simulation::{Beam, Simulation};
pub use spawn::{init_beam, BeamConfig, SpawnTimer};
pub use time::Time;

pub use glam::Vec3;

/// Convenience imports for typical use.
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::direction::Direction;
    pub use crate::field::{
        DrawCommand, Falloff, FrameSplat, GridConfig, Metric, SplatConfig, VoxelField,
    };
    pub use crate::pool::BeamPool;
    pub use crate::simulation::{Beam, Simulation};
    pub use crate::spawn::BeamConfig;
    pub use crate::time::Time;
    pub use glam::Vec3;
}
