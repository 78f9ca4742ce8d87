// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device capability snapshot.
//!
//! Capabilities are queried from the device once at startup and never change
//! for the life of the session. Everything downstream (shading path choice,
//! clip strategy choice, plate sizing) branches on this struct instead of
//! re-asking the device, so a capability decision made on frame one holds on
//! every later frame.

/// What the rendering device can do. Immutable after startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GpuCaps {
    /// Programmable fragment shading is available. When set, paint
    /// attributes are applied as shader uniforms in a single pass.
    pub fragment_programs: bool,
    /// A stencil buffer is available for exact region clipping.
    pub stencil_buffer: bool,
    /// Textures may have non-power-of-two dimensions.
    pub npot_textures: bool,
    /// Number of simultaneously bound texture units.
    pub max_texture_units: u32,
    /// Maximum texture dimension in pixels. Always a power of two.
    pub max_texture_size: u32,
}

impl GpuCaps {
    /// A current desktop GPU: shaders, stencil, unrestricted texture sizes.
    #[must_use]
    pub const fn modern() -> Self {
        Self {
            fragment_programs: true,
            stencil_buffer: true,
            npot_textures: true,
            max_texture_units: 8,
            max_texture_size: 4096,
        }
    }

    /// A fixed-function era GPU: no fragment programs, power-of-two
    /// textures, four texture units.
    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            fragment_programs: false,
            stencil_buffer: true,
            npot_textures: false,
            max_texture_units: 4,
            max_texture_size: 2048,
        }
    }

    /// The weakest profile still worth compositing on: two texture units,
    /// no stencil.
    #[must_use]
    pub const fn minimal() -> Self {
        Self {
            fragment_programs: false,
            stencil_buffer: false,
            npot_textures: false,
            max_texture_units: 2,
            max_texture_size: 1024,
        }
    }
}

impl Default for GpuCaps {
    #[inline]
    fn default() -> Self {
        Self::modern()
    }
}
