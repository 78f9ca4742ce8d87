// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture coordinate matrices.
//!
//! A [`TextureMatrix`] maps screen-space pixel positions into a texture's
//! coordinate space. For the common case (an unrotated window whose texture
//! matches its on-screen size) the matrix is a pure scale-and-offset, and
//! the tessellator uses a two-multiply fast path per corner. Shear and
//! rotation terms are honored by the general path.

use kurbo::{Affine, Point};

/// Maps screen pixels to texture coordinates.
///
/// Wraps a 2-D affine so texture lookup stays expressible as six
/// coefficients: with coefficients `[a, b, c, d, e, f]`, a screen point
/// `(x, y)` samples `(a·x + c·y + e, b·x + d·y + f)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureMatrix {
    affine: Affine,
}

impl TextureMatrix {
    /// Maps screen coordinates straight through as texture coordinates.
    pub const IDENTITY: Self = Self {
        affine: Affine::IDENTITY,
    };

    /// Wraps an arbitrary affine map.
    #[inline]
    #[must_use]
    pub const fn from_affine(affine: Affine) -> Self {
        Self { affine }
    }

    /// A matrix that scales by `(sx, sy)` and then offsets by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn scale_translate(sx: f64, sy: f64, dx: f64, dy: f64) -> Self {
        Self {
            affine: Affine::new([sx, 0.0, 0.0, sy, dx, dy]),
        }
    }

    /// The wrapped affine.
    #[inline]
    #[must_use]
    pub const fn affine(&self) -> Affine {
        self.affine
    }

    /// This matrix with a screen-space pre-translation folded in: the
    /// result maps `(x, y)` wherever `self` maps `(x + dx, y + dy)`.
    #[inline]
    #[must_use]
    pub fn pre_translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            affine: self.affine * Affine::translate((dx, dy)),
        }
    }

    /// Whether the matrix has no shear or rotation terms.
    ///
    /// Axis-aligned matrices let the tessellator compute `u` from `x` alone
    /// and `v` from `y` alone.
    #[inline]
    #[must_use]
    pub fn is_axis_aligned(&self) -> bool {
        let [_, b, c, _, _, _] = self.affine.as_coeffs();
        b == 0.0 && c == 0.0
    }

    /// Maps a screen point to texture coordinates through the full affine.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "texture coordinates are consumed at f32 precision"
    )]
    pub fn map(&self, x: f64, y: f64) -> [f32; 2] {
        let p = self.affine * Point::new(x, y);
        [p.x as f32, p.y as f32]
    }

    /// Axis-aligned fast path: `u` from `x` only, `v` from `y` only.
    ///
    /// Callers must have checked [`is_axis_aligned`](Self::is_axis_aligned);
    /// shear terms are silently ignored here.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "texture coordinates are consumed at f32 precision"
    )]
    pub fn map_axis_aligned(&self, x: f64, y: f64) -> [f32; 2] {
        debug_assert!(self.is_axis_aligned(), "matrix has shear terms");
        let [a, _, _, d, e, f] = self.affine.as_coeffs();
        [(a * x + e) as f32, (d * y + f) as f32]
    }
}

impl Default for TextureMatrix {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_maps_through() {
        let m = TextureMatrix::IDENTITY;
        assert!(m.is_axis_aligned());
        assert_eq!(m.map(3.0, 4.0), [3.0, 4.0]);
        assert_eq!(m.map_axis_aligned(3.0, 4.0), [3.0, 4.0]);
    }

    #[test]
    fn scale_translate_is_axis_aligned() {
        let m = TextureMatrix::scale_translate(0.5, 0.25, 1.0, 2.0);
        assert!(m.is_axis_aligned());
        assert_eq!(m.map(4.0, 8.0), [3.0, 4.0]);
        assert_eq!(m.map(4.0, 8.0), m.map_axis_aligned(4.0, 8.0));
    }

    #[test]
    fn pre_translation_shifts_the_anchor() {
        let m = TextureMatrix::scale_translate(0.5, 0.5, 0.0, 0.0);
        let shifted = m.pre_translated(-4.0, -8.0);
        assert!(shifted.is_axis_aligned());
        // The shifted matrix samples at (4, 8) what the original sampled
        // at the origin.
        assert_eq!(shifted.map(4.0, 8.0), m.map(0.0, 0.0));
        assert_eq!(shifted.map(6.0, 10.0), m.map(2.0, 2.0));
    }

    #[test]
    fn skew_detected_and_mapped() {
        let m = TextureMatrix::from_affine(Affine::skew(0.5, 0.0));
        assert!(!m.is_axis_aligned());
        // u picks up half of y.
        assert_eq!(m.map(2.0, 4.0), [4.0, 4.0]);
    }

    #[test]
    fn rotation_detected() {
        let m = TextureMatrix::from_affine(Affine::rotate(core::f64::consts::FRAC_PI_4));
        assert!(!m.is_axis_aligned());
    }
}
