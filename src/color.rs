//! 8-bit RGBA colors for beam tinting.
//!
//! Beam colors are picked once at spawn by lerping between two endpoint
//! colors, so the only operations needed here are construction and
//! per-channel linear interpolation.

use bytemuck::{Pod, Zeroable};

/// An 8-bit-per-channel RGBA color.
///
/// `Pod` so it can sit inside [`DrawCommand`](crate::DrawCommand) and be
/// uploaded to a GPU instance buffer untouched.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(0xFF, 0xFF, 0xFF, 0xFF);

    /// Create a color from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from a `0xRRGGBB` integer.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self::new(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
            0xFF,
        )
    }

    /// Per-channel linear interpolation from `self` to `other`.
    ///
    /// `t` is clamped to `[0, 1]`; `t = 0` returns `self`, `t = 1`
    /// returns `other`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}
