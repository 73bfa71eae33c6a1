//! Voxel grid geometry and the bounded splat pass.
//!
//! The field is a static 3D lattice of cubes over a world-space box. Per
//! frame, each live beam writes a falloff-shaped size into the voxels it
//! can reach; everything else is untouched. The splat is bounded: a beam
//! first computes the axis-aligned voxel index range its padded extent
//! covers and iterates only that range, so per-frame cost scales with
//! beam volume rather than grid volume.
//!
//! # Coordinate mapping
//!
//! Cells along an axis sit at `min + i * pitch` where
//! `pitch = cell_size + padding`. World to index is
//! `floor((w - min) / pitch)` clamped to `[0, dim - 1]`; index to world is
//! the affine inverse. One rounding rule (floor) is used for both corners
//! of every range, which is what keeps the range arithmetic off-by-one
//! free.
//!
//! # Example
//!
//! ```
//! use vbpe::{GridConfig, VoxelField};
//!
//! let field = VoxelField::new(GridConfig::new(21, 21, 21));
//! assert_eq!(field.config().total_cells(), 21 * 21 * 21);
//! ```

use crate::color::Rgba;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Static geometry of the voxel grid.
///
/// Dimensions need not be equal; the grid covers a (not necessarily
/// cubic) box centered on `center`.
#[derive(Clone, Copy, Debug)]
pub struct GridConfig {
    /// Cell counts per axis.
    pub dims: [usize; 3],
    /// Edge length of each cube cell in world units.
    pub cell_size: f32,
    /// Gap between adjacent cells in world units.
    pub padding: f32,
    /// World-space center of the whole grid.
    pub center: Vec3,
}

impl GridConfig {
    /// Create a grid with the given per-axis cell counts.
    ///
    /// Default values:
    /// - `cell_size`: 1.0
    /// - `padding`: cell_size / 100
    /// - `center`: origin
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        assert!(
            nx >= 2 && ny >= 2 && nz >= 2,
            "Grid needs at least 2 cells per axis"
        );
        assert!(
            nx * ny * nz <= 1 << 24,
            "Grid of {}x{}x{} cells is too large",
            nx,
            ny,
            nz
        );
        Self {
            dims: [nx, ny, nz],
            cell_size: 1.0,
            padding: 0.01,
            center: Vec3::ZERO,
        }
    }

    /// Set the cell edge length. Padding is rescaled to cell_size / 100.
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "Cell size must be positive");
        self.cell_size = cell_size;
        self.padding = cell_size / 100.0;
        self
    }

    /// Set the inter-cell gap explicitly.
    pub fn with_padding(mut self, padding: f32) -> Self {
        assert!(padding >= 0.0, "Padding cannot be negative");
        self.padding = padding;
        self
    }

    /// Set the world-space center of the grid.
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Center-to-center distance between adjacent cells.
    #[inline]
    pub fn pitch(&self) -> f32 {
        self.cell_size + self.padding
    }

    /// World-space extent of the grid per axis.
    pub fn size(&self) -> Vec3 {
        let pitch = self.pitch();
        Vec3::new(
            pitch * self.dims[0] as f32 - self.padding,
            pitch * self.dims[1] as f32 - self.padding,
            pitch * self.dims[2] as f32 - self.padding,
        )
    }

    /// Minimum corner of the world-space box.
    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.size() / 2.0
    }

    /// Maximum corner of the world-space box.
    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.size() / 2.0
    }

    /// Total number of cells.
    #[inline]
    pub fn total_cells(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    /// Linear index for cell `(x, y, z)`.
    #[inline]
    pub fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.dims[0] && y < self.dims[1] && z < self.dims[2]);
        (z * self.dims[1] + y) * self.dims[0] + x
    }

    /// World position of cell `(x, y, z)`.
    #[inline]
    pub fn cell_position(&self, x: usize, y: usize, z: usize) -> Vec3 {
        self.min() + Vec3::new(x as f32, y as f32, z as f32) * self.pitch()
    }

    /// Cell index along one axis for a world coordinate, clamped into the
    /// grid. Floor rounding, always.
    #[inline]
    pub fn cell_of(&self, world: f32, axis: usize) -> usize {
        let min = crate::direction::axis_component(self.min(), axis);
        let raw = ((world - min) / self.pitch()).floor();
        let max_idx = self.dims[axis] - 1;
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(max_idx)
        }
    }

    /// Snap a world coordinate onto the cell lattice along one axis.
    pub fn snap(&self, world: f32, axis: usize) -> f32 {
        let idx = self.cell_of(world, axis);
        crate::direction::axis_component(self.min(), axis) + idx as f32 * self.pitch()
    }

    /// Inclusive index ranges covering the world-space box `[lo, hi]`.
    pub fn cell_range(&self, lo: Vec3, hi: Vec3) -> [(usize, usize); 3] {
        let lo = [lo.x, lo.y, lo.z];
        let hi = [hi.x, hi.y, hi.z];
        let mut out = [(0usize, 0usize); 3];
        for axis in 0..3 {
            out[axis] = (self.cell_of(lo[axis], axis), self.cell_of(hi[axis], axis));
        }
        out
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(21, 21, 21)
    }
}

/// Distance metric used for the falloff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Metric {
    /// L1 distance in beam-scaled space. Produces the octahedral beam
    /// silhouette the effect is built around.
    #[default]
    Manhattan,
    /// Euclidean distance in beam-scaled space. Rounder blobs.
    Euclidean,
}

impl Metric {
    /// Distance of a scaled offset from the beam center.
    #[inline]
    pub fn distance(&self, scaled_offset: Vec3) -> f32 {
        match self {
            Metric::Manhattan => {
                scaled_offset.x.abs() + scaled_offset.y.abs() + scaled_offset.z.abs()
            }
            Metric::Euclidean => scaled_offset.length(),
        }
    }
}

/// Shape of the size falloff between beam center and reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Falloff {
    /// Size drops linearly with distance.
    #[default]
    Linear,
    /// Smoothstep: flat near the center, steeper at the fringe.
    Smooth,
}

impl Falloff {
    /// Map normalized closeness (1 at center, 0 at reach) to a size
    /// multiplier in `[0, 1]`.
    #[inline]
    pub fn shape(&self, closeness: f32) -> f32 {
        let t = closeness.clamp(0.0, 1.0);
        match self {
            Falloff::Linear => t,
            Falloff::Smooth => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Tunables for the splat pass.
#[derive(Clone, Copy, Debug)]
pub struct SplatConfig {
    /// Half-size a voxel gets when a beam sits exactly on its center.
    pub base_cube_size: f32,
    /// Voxels whose computed half-size falls below this are skipped, so
    /// the renderer is not flooded with visually empty cubes.
    pub epsilon: f32,
    /// Scaled-space distance at which the falloff hits zero. 1.0 means
    /// the glow ends exactly at the beam's own half-extent; larger values
    /// widen the halo.
    pub reach: f32,
    /// Falloff shape.
    pub falloff: Falloff,
    /// Distance metric.
    pub metric: Metric,
}

impl SplatConfig {
    /// Create a splat config with the given peak half-size.
    ///
    /// Default values:
    /// - `epsilon`: base_cube_size / 20
    /// - `reach`: 1.0
    /// - `falloff`: [`Falloff::Linear`]
    /// - `metric`: [`Metric::Manhattan`]
    pub fn new(base_cube_size: f32) -> Self {
        assert!(base_cube_size > 0.0, "Base cube size must be positive");
        Self {
            base_cube_size,
            epsilon: base_cube_size / 20.0,
            reach: 1.0,
            falloff: Falloff::Linear,
            metric: Metric::Manhattan,
        }
    }

    /// Set the skip threshold.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        assert!(epsilon > 0.0, "Epsilon must be positive");
        self.epsilon = epsilon;
        self
    }

    /// Set the falloff reach in scaled-space units.
    pub fn with_reach(mut self, reach: f32) -> Self {
        assert!(reach > 0.0, "Reach must be positive");
        self.reach = reach;
        self
    }

    /// Set the falloff shape.
    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }
}

impl Default for SplatConfig {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// One voxel to draw this frame.
///
/// Plain data, `#[repr(C)]` and `Pod`, so a rendering collaborator can
/// memcpy a frame's worth straight into an instance buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawCommand {
    /// Static world position of the voxel.
    pub position: Vec3,
    /// Rendered half-size.
    pub half_size: f32,
    /// Color of the beam that contributed this voxel.
    pub color: Rgba,
}

/// Per-frame splat accumulator.
///
/// Holds a size and color per voxel, but only the voxels touched this
/// frame are ever written or cleared; `begin_frame` resets in time
/// proportional to last frame's output, not grid volume. When two beams
/// touch the same voxel in one frame, the later write wins.
#[derive(Clone, Debug)]
pub struct FrameSplat {
    sizes: Vec<f32>,
    colors: Vec<Rgba>,
    touched: Vec<u32>,
}

impl FrameSplat {
    /// Create an accumulator for a grid with `total_cells` cells.
    pub fn new(total_cells: usize) -> Self {
        Self {
            sizes: vec![0.0; total_cells],
            colors: vec![Rgba::WHITE; total_cells],
            touched: Vec::new(),
        }
    }

    /// Clear last frame's contributions.
    pub fn begin_frame(&mut self) {
        for idx in self.touched.drain(..) {
            self.sizes[idx as usize] = 0.0;
        }
    }

    /// Record a contribution for one voxel. Later writes overwrite.
    #[inline]
    fn write(&mut self, cell: usize, half_size: f32, color: Rgba) {
        if self.sizes[cell] == 0.0 {
            self.touched.push(cell as u32);
        }
        self.sizes[cell] = half_size;
        self.colors[cell] = color;
    }

    /// Number of voxels touched this frame.
    #[inline]
    pub fn touched_count(&self) -> usize {
        self.touched.len()
    }

    /// Append this frame's contributions to `out` as draw commands.
    pub fn emit(&self, field: &VoxelField, out: &mut Vec<DrawCommand>) {
        for &cell in &self.touched {
            let cell = cell as usize;
            out.push(DrawCommand {
                position: field.centers[cell],
                half_size: self.sizes[cell],
                color: self.colors[cell],
            });
        }
    }
}

/// The voxel grid itself: configuration plus precomputed cell positions.
///
/// Cell positions are static for the life of the field; all per-frame
/// state lives in [`FrameSplat`].
#[derive(Clone, Debug)]
pub struct VoxelField {
    config: GridConfig,
    centers: Vec<Vec3>,
}

impl VoxelField {
    /// Build the field and precompute every cell's world position.
    pub fn new(config: GridConfig) -> Self {
        let [nx, ny, nz] = config.dims;
        let mut centers = Vec::with_capacity(config.total_cells());
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    centers.push(config.cell_position(x, y, z));
                }
            }
        }
        Self { config, centers }
    }

    /// Grid geometry.
    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Precomputed world position of every cell, in linear-index order.
    #[inline]
    pub fn centers(&self) -> &[Vec3] {
        &self.centers
    }

    /// The padded world-space box a beam can affect.
    ///
    /// Extends `reach` half-extents out from the center plus one cell of
    /// margin, so boundary cells that only partially overlap the beam are
    /// still included.
    pub fn beam_box(&self, position: Vec3, scale: Vec3, reach: f32) -> (Vec3, Vec3) {
        let pad = scale * reach + Vec3::splat(self.config.cell_size);
        (position - pad, position + pad)
    }

    /// Splat one beam into the frame accumulator.
    ///
    /// Degenerate (non-positive) scales would divide the metric by zero;
    /// spawn ranges are validated to keep them strictly positive.
    pub fn splat(
        &self,
        position: Vec3,
        scale: Vec3,
        color: Rgba,
        splat: &SplatConfig,
        frame: &mut FrameSplat,
    ) {
        debug_assert!(scale.x > 0.0 && scale.y > 0.0 && scale.z > 0.0);
        let (lo, hi) = self.beam_box(position, scale, splat.reach);
        let [(x0, x1), (y0, y1), (z0, z1)] = self.config.cell_range(lo, hi);
        for z in z0..=z1 {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let cell = self.config.linear_index(x, y, z);
                    let offset = (self.centers[cell] - position) / scale;
                    let d = splat.metric.distance(offset);
                    if d >= splat.reach {
                        continue;
                    }
                    let closeness = 1.0 - d / splat.reach;
                    let half_size = (splat.base_cube_size * splat.falloff.shape(closeness))
                        .min(splat.base_cube_size);
                    if half_size < splat.epsilon {
                        continue;
                    }
                    frame.write(cell, half_size, color);
                }
            }
        }
    }
}
