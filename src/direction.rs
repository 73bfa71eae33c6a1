//! Beam travel directions.
//!
//! A beam moves along exactly one axis, toward one face of the bounding
//! volume. [`Direction`] names the six possibilities and exposes the
//! movement axis and sign through accessors, so vector components are
//! always addressed by name rather than by reinterpreting memory layout.

use glam::Vec3;

/// One of the six axis-aligned travel directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward +X.
    XPos,
    /// Toward -X.
    XNeg,
    /// Toward +Y.
    YPos,
    /// Toward -Y.
    YNeg,
    /// Toward +Z.
    ZPos,
    /// Toward -Z.
    ZNeg,
}

impl Direction {
    /// All six directions, in spawn-pick order.
    pub const ALL: [Direction; 6] = [
        Direction::XPos,
        Direction::XNeg,
        Direction::YPos,
        Direction::YNeg,
        Direction::ZPos,
        Direction::ZNeg,
    ];

    /// The movement axis: 0 = X, 1 = Y, 2 = Z.
    #[inline]
    pub fn axis(self) -> usize {
        match self {
            Direction::XPos | Direction::XNeg => 0,
            Direction::YPos | Direction::YNeg => 1,
            Direction::ZPos | Direction::ZNeg => 2,
        }
    }

    /// Sign of travel along the movement axis: `+1.0` or `-1.0`.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::XPos | Direction::YPos | Direction::ZPos => 1.0,
            Direction::XNeg | Direction::YNeg | Direction::ZNeg => -1.0,
        }
    }

    /// World coordinate of the face a new beam enters through.
    ///
    /// A beam heading toward +X enters at the min-X face; one heading
    /// toward -X enters at the max-X face, and so on.
    #[inline]
    pub fn entry_face(self, min: Vec3, max: Vec3) -> f32 {
        let axis = self.axis();
        if self.sign() > 0.0 {
            axis_component(min, axis)
        } else {
            axis_component(max, axis)
        }
    }
}

/// Read a vector component by axis index, through the named fields.
#[inline]
pub fn axis_component(v: Vec3, axis: usize) -> f32 {
    match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}

/// Write a vector component by axis index, through the named fields.
#[inline]
pub fn set_axis_component(v: &mut Vec3, axis: usize, value: f32) {
    match axis {
        0 => v.x = value,
        1 => v.y = value,
        _ => v.z = value,
    }
}
