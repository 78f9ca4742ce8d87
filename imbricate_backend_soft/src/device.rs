// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The software device.
//!
//! [`SoftDevice`] implements the full [`Device`] contract against an
//! in-memory framebuffer: premultiplied rgba color, an 8-bit stencil
//! plane, clip-plane discard, and both shading profiles. It exists to
//! make the pipeline observable: unit tests assert on its pixels, the
//! two clip strategies and the two shading paths can be run side by side
//! and compared, and the demo renders with it.

use core::fmt;

use imbricate_compose::{ClipPlanes, Device, DeviceError, StencilMode};
use imbricate_core::texture::{TextureDesc, TextureId};
use imbricate_render::{BlendMode, DrawCall};

use crate::raster::{Triangle, interpolate, interpolate_uv};
use crate::shade::{SoftTexture, shade};

/// Largest texture edge backed by default, in pixels.
const TEXTURE_LIMIT: u32 = 4096;

const OPAQUE_BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// A software implementation of the rendering device.
///
/// The framebuffer starts opaque black with the stencil plane zeroed.
/// Pixel `(0, 0)` is the top-left corner; rows run downward.
pub struct SoftDevice {
    width: u32,
    height: u32,
    color: Vec<[f32; 4]>,
    stencil: Vec<u8>,
    textures: Vec<SoftTexture>,
    stencil_mode: StencilMode,
    planes: Option<ClipPlanes>,
    color_writes: bool,
    texture_limit: u32,
}

impl fmt::Debug for SoftDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftDevice")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("textures", &self.textures.len())
            .field("stencil_mode", &self.stencil_mode)
            .field("color_writes", &self.color_writes)
            .finish_non_exhaustive()
    }
}

impl SoftDevice {
    /// Creates a device with a `width` by `height` framebuffer.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "a framebuffer needs a non-zero extent"
        );
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![OPAQUE_BLACK; len],
            stencil: vec![0; len],
            textures: Vec::new(),
            stencil_mode: StencilMode::Off,
            planes: None,
            color_writes: true,
            texture_limit: TEXTURE_LIMIT,
        }
    }

    /// Framebuffer width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Framebuffer height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fills every pixel with `color`, bypassing blend and clip state.
    pub fn clear(&mut self, color: [f32; 4]) {
        self.color.fill(color);
    }

    /// The premultiplied color at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates lie outside the framebuffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside the {}x{} framebuffer",
            self.width,
            self.height
        );
        self.color[y as usize * self.width as usize + x as usize]
    }

    /// The framebuffer as tightly packed rgba bytes, row major, channels
    /// clamped to `0..=255`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "channels are clamped to the byte range before the cast"
    )]
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.color.len() * 4);
        for px in &self.color {
            for channel in px {
                bytes.push((channel.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        bytes
    }

    /// Caps the largest texture edge accepted by
    /// [`create_texture`](Device::create_texture). Requests beyond the
    /// limit fail with [`DeviceError::TextureAllocation`].
    pub fn set_texture_limit(&mut self, limit: u32) {
        self.texture_limit = limit;
    }
}

impl Device for SoftDevice {
    fn set_color_mask(&mut self, write_color: bool) {
        self.color_writes = write_color;
    }

    fn clear_stencil(&mut self, value: u8) {
        self.stencil.fill(value);
    }

    fn set_stencil(&mut self, mode: StencilMode) {
        self.stencil_mode = mode;
    }

    fn set_clip_planes(&mut self, planes: Option<&ClipPlanes>) {
        self.planes = planes.copied();
    }

    fn draw(&mut self, call: &DrawCall<'_>) -> Result<(), DeviceError> {
        if !call.is_consistent() {
            return Err(DeviceError::UnsupportedDraw);
        }
        let units = call.batch.units();
        let mut bound = Vec::with_capacity(call.textures.len());
        for &id in call.textures {
            bound.push(bound_texture(&self.textures, id));
        }
        let positions = call.batch.positions();
        let mut samples = vec![[0.0_f32; 4]; units];
        let mut corner_uvs = vec![[[0.0_f32; 2]; 3]; units];

        for triangle in 0..call.batch.triangle_count() {
            let base = triangle * 3;
            let corners = [positions[base], positions[base + 1], positions[base + 2]];
            let Some(tri) = Triangle::project(&call.transform, corners) else {
                continue;
            };
            let Some((cols, rows)) = tri.bounds(self.width, self.height) else {
                continue;
            };
            for (unit, uvs) in corner_uvs.iter_mut().enumerate() {
                let tc = call.batch.texcoords(unit);
                *uvs = [tc[base], tc[base + 1], tc[base + 2]];
            }
            // Plane clipping follows the untransformed geometry: evaluate
            // at the corners, interpolate per pixel.
            let plane_values = self.planes.map(|p| corner_plane_values(&p, corners));

            for y in rows {
                for x in cols.clone() {
                    let Some(weights) = tri.coverage(f64::from(x) + 0.5, f64::from(y) + 0.5)
                    else {
                        continue;
                    };
                    if let Some(values) = &plane_values {
                        if values.iter().any(|v| interpolate(weights, *v) < 0.0) {
                            continue;
                        }
                    }
                    let idx = y as usize * self.width as usize + x as usize;
                    match self.stencil_mode {
                        StencilMode::Test { reference } => {
                            if self.stencil[idx] != reference {
                                continue;
                            }
                        }
                        StencilMode::Fill { reference } => self.stencil[idx] = reference,
                        StencilMode::Off => {}
                    }
                    if !self.color_writes {
                        continue;
                    }
                    for ((sample, texture), uvs) in
                        samples.iter_mut().zip(&bound).zip(&corner_uvs)
                    {
                        *sample = texture.sample(interpolate_uv(weights, *uvs));
                    }
                    let src = shade(&call.shading, &samples);
                    blend(&mut self.color[idx], src, call.blend);
                }
            }
        }
        Ok(())
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "the texture count stays far below u32::MAX"
    )]
    fn create_texture(
        &mut self,
        desc: &TextureDesc,
        pixels: &[u8],
    ) -> Result<TextureId, DeviceError> {
        if desc.width == 0
            || desc.height == 0
            || desc.width > self.texture_limit
            || desc.height > self.texture_limit
        {
            return Err(DeviceError::TextureAllocation(*desc));
        }
        assert!(
            pixels.len() == desc.width as usize * desc.height as usize * 4,
            "texture payload does not match {}x{}",
            desc.width,
            desc.height
        );
        self.textures.push(SoftTexture::from_rgba8(desc, pixels));
        Ok(TextureId(self.textures.len() as u32))
    }
}

/// Slot lookup for a texture handle. Handles are issued sequentially from
/// one; anything else is a caller bug.
fn bound_texture(textures: &[SoftTexture], id: TextureId) -> &SoftTexture {
    let slot = id.0 as usize;
    assert!(slot >= 1 && slot <= textures.len(), "unknown texture {id:?}");
    &textures[slot - 1]
}

fn blend(dst: &mut [f32; 4], src: [f32; 4], mode: BlendMode) {
    match mode {
        BlendMode::Opaque => *dst = src,
        BlendMode::SourceOver => {
            let keep = 1.0 - src[3];
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s + *d * keep;
            }
        }
    }
}

/// Each plane's value at each corner, ready for barycentric interpolation.
fn corner_plane_values(planes: &ClipPlanes, corners: [[f32; 2]; 3]) -> [[f64; 3]; 4] {
    let mut values = [[0.0; 3]; 4];
    for (row, plane) in values.iter_mut().zip(planes.coefficients()) {
        for (v, corner) in row.iter_mut().zip(&corners) {
            *v = plane[0] * f64::from(corner[0]) + plane[1] * f64::from(corner[1]) + plane[2];
        }
    }
    values
}
