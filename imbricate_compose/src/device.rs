// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering device contract.
//!
//! Everything the paint pipeline needs from a GPU (or a software stand-in)
//! fits in the [`Device`] trait: pipeline state for clipping, draw-call
//! execution, and texture creation. The pipeline drives a `&mut dyn Device`
//! so backends stay swappable at runtime; the capability profile that
//! decides *which* calls are made lives separately in
//! [`GpuCaps`](imbricate_core::caps::GpuCaps) and is queried once at
//! startup.
//!
//! Errors follow a strict split: `Err` values here mean resource trouble
//! the pipeline can degrade around (a texture that would not fit, a draw
//! the device cannot express). Contract violations, like drawing with a
//! texture count that disagrees with the batch, are the caller's bug and
//! are asserted upstream, not reported here.

use core::fmt;

use imbricate_core::texture::{TextureDesc, TextureId};
use imbricate_render::DrawCall;

use crate::clip::ClipPlanes;

/// Stencil pipeline state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StencilMode {
    /// Stencil buffer ignored.
    #[default]
    Off,
    /// Every rasterized pixel writes `reference` into the stencil buffer
    /// and passes.
    Fill {
        /// Value written for rasterized pixels.
        reference: u8,
    },
    /// Only pixels whose stencil value equals `reference` are rasterized.
    Test {
        /// Value a pixel's stencil entry must match.
        reference: u8,
    },
}

/// Why a device call failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceError {
    /// The device could not back a texture of the requested size.
    TextureAllocation(TextureDesc),
    /// The device cannot execute this draw call.
    UnsupportedDraw,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextureAllocation(desc) => {
                write!(f, "cannot allocate a {}x{} texture", desc.width, desc.height)
            }
            Self::UnsupportedDraw => write!(f, "draw call not expressible on this device"),
        }
    }
}

impl core::error::Error for DeviceError {}

/// A rendering backend.
///
/// Calls are synchronous from the pipeline's point of view. State set
/// through [`set_color_mask`](Self::set_color_mask),
/// [`set_stencil`](Self::set_stencil), and
/// [`set_clip_planes`](Self::set_clip_planes) stays in effect until
/// changed; the clip scope owns restoring it.
pub trait Device {
    /// Enables or disables writes to the color channels. Stencil writes are
    /// unaffected.
    fn set_color_mask(&mut self, write_color: bool);

    /// Fills the whole stencil buffer with `value`.
    fn clear_stencil(&mut self, value: u8);

    /// Sets the stencil pipeline state.
    fn set_stencil(&mut self, mode: StencilMode);

    /// Installs clip planes, or clears them with `None`.
    ///
    /// Planes are evaluated against *untransformed* vertex coordinates,
    /// interpolated across each triangle: clipping follows the geometry
    /// through whatever transform the draw call carries. Pixels on the
    /// negative side of any plane are discarded.
    fn set_clip_planes(&mut self, planes: Option<&ClipPlanes>);

    /// Executes one draw call against the current pipeline state.
    fn draw(&mut self, call: &DrawCall<'_>) -> Result<(), DeviceError>;

    /// Creates a texture from tightly packed premultiplied rgba bytes, row
    /// major, four bytes per pixel.
    fn create_texture(&mut self, desc: &TextureDesc, pixels: &[u8])
    -> Result<TextureId, DeviceError>;
}
