// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture handles and surface plate planning.
//!
//! A window's pixels live in one or more GPU textures. When the device
//! restricts texture dimensions (maximum size, power-of-two only), a large
//! surface is split into *plates*: sub-rects of the window frame, each
//! backed by its own texture with a matrix mapping screen pixels into that
//! texture. [`plan_plates`] computes the split for a given capability
//! profile; the windowing layer uploads pixels per plate and registers the
//! result on the window.

use alloc::vec::Vec;
use core::fmt;

use crate::caps::GpuCaps;
use crate::matrix::TextureMatrix;
use crate::rect::Rect;
use crate::region::Region;

/// An opaque reference to a device texture.
///
/// Devices assign these when a texture is created; everything above the
/// device treats them as tokens.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

impl fmt::Debug for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureId({})", self.0)
    }
}

/// Dimensions of a texture to be created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// One textured piece of a window's surface.
#[derive(Clone, Debug, PartialEq)]
pub struct TexturePlate {
    /// The backing texture.
    pub texture: TextureId,
    /// Screen-to-texture coordinate map.
    pub matrix: TextureMatrix,
    /// The screen pixels this plate covers, in absolute coordinates.
    pub coverage: Region,
}

/// A planned plate before its texture exists: where it sits on screen and
/// how large its backing texture must be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlateSpec {
    /// Screen sub-rect of the window frame this plate covers.
    pub rect: Rect,
    /// Required texture width, already rounded for the device.
    pub tex_width: u32,
    /// Required texture height, already rounded for the device.
    pub tex_height: u32,
}

impl PlateSpec {
    /// The matrix mapping absolute screen pixels into this plate's
    /// normalized texture coordinates.
    ///
    /// The plate's top-left screen corner lands on `(0, 0)`; its
    /// bottom-right corner lands on `(w/tex_width, h/tex_height)`, which is
    /// `(1, 1)` exactly when no power-of-two padding was added.
    #[must_use]
    pub fn matrix(&self) -> TextureMatrix {
        let sx = 1.0 / f64::from(self.tex_width);
        let sy = 1.0 / f64::from(self.tex_height);
        TextureMatrix::scale_translate(
            sx,
            sy,
            -f64::from(self.rect.x1) * sx,
            -f64::from(self.rect.y1) * sy,
        )
    }

    /// Texture dimensions as a descriptor.
    #[inline]
    #[must_use]
    pub const fn desc(&self) -> TextureDesc {
        TextureDesc {
            width: self.tex_width,
            height: self.tex_height,
        }
    }
}

/// Splits a window frame into plates the device can actually back.
///
/// Each plate edge is at most `caps.max_texture_size` pixels. When the
/// device lacks non-power-of-two support, texture dimensions are rounded up
/// to the next power of two (the plate still samples only its actual
/// extent). Returns an empty plan for a degenerate frame.
#[must_use]
pub fn plan_plates(frame: Rect, caps: &GpuCaps) -> Vec<PlateSpec> {
    let mut plates = Vec::new();
    if frame.is_empty() {
        return plates;
    }
    debug_assert!(
        caps.max_texture_size.is_power_of_two(),
        "capability reports a non-power-of-two size limit"
    );
    let max = caps.max_texture_size as i32;

    let mut y = frame.y1;
    while y < frame.y2 {
        let h = (frame.y2 - y).min(max);
        let mut x = frame.x1;
        while x < frame.x2 {
            let w = (frame.x2 - x).min(max);
            plates.push(PlateSpec {
                rect: Rect::new(x, y, x + w, y + h),
                tex_width: tex_dim(w as u32, caps),
                tex_height: tex_dim(h as u32, caps),
            });
            x += w;
        }
        y += h;
    }
    plates
}

fn tex_dim(extent: u32, caps: &GpuCaps) -> u32 {
    if caps.npot_textures {
        extent
    } else {
        extent.next_power_of_two().min(caps.max_texture_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_frame_is_one_plate() {
        let plates = plan_plates(Rect::new(10, 20, 110, 70), &GpuCaps::modern());
        assert_eq!(
            plates,
            [PlateSpec {
                rect: Rect::new(10, 20, 110, 70),
                tex_width: 100,
                tex_height: 50,
            }]
        );
    }

    #[test]
    fn pow2_rounding_when_npot_missing() {
        let plates = plan_plates(Rect::new(0, 0, 100, 50), &GpuCaps::legacy());
        assert_eq!(plates[0].tex_width, 128);
        assert_eq!(plates[0].tex_height, 64);
    }

    #[test]
    fn oversize_frame_splits() {
        let caps = GpuCaps::minimal(); // max size 1024
        let plates = plan_plates(Rect::new(0, 0, 2100, 900), &caps);
        // Three columns, one row.
        assert_eq!(plates.len(), 3);
        assert_eq!(plates[0].rect, Rect::new(0, 0, 1024, 900));
        assert_eq!(plates[1].rect, Rect::new(1024, 0, 2048, 900));
        assert_eq!(plates[2].rect, Rect::new(2048, 0, 2100, 900));
        // Plates tile the frame exactly.
        let total: u64 = plates.iter().map(|p| p.rect.area()).sum();
        assert_eq!(total, Rect::new(0, 0, 2100, 900).area());
    }

    #[test]
    fn empty_frame_plans_nothing() {
        assert!(plan_plates(Rect::new(5, 5, 5, 50), &GpuCaps::modern()).is_empty());
    }

    #[test]
    fn plate_matrix_maps_corners() {
        let spec = PlateSpec {
            rect: Rect::new(100, 200, 300, 250),
            tex_width: 200,
            tex_height: 50,
        };
        let m = spec.matrix();
        assert!(m.is_axis_aligned());
        assert_eq!(m.map(100.0, 200.0), [0.0, 0.0]);
        assert_eq!(m.map(300.0, 250.0), [1.0, 1.0]);
        assert_eq!(m.map(200.0, 225.0), [0.5, 0.5]);
    }

    #[test]
    fn padded_plate_matrix_stops_short_of_one() {
        let spec = PlateSpec {
            rect: Rect::new(0, 0, 100, 50),
            tex_width: 128,
            tex_height: 64,
        };
        let m = spec.matrix();
        let [u, v] = m.map(100.0, 50.0);
        assert_eq!(u, 100.0 / 128.0);
        assert_eq!(v, 50.0 / 64.0);
    }
}
