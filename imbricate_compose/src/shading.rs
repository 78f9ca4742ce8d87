// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint-attribute shading: how a window's attributes reach its pixels.
//!
//! Two strategies, fixed once per session. Shader-capable devices get
//! [`Shading::Uniform`] and apply attributes in a single pass.
//! Fixed-function devices get a combine-stage program built here: opacity
//! and brightness fold into one fragment color, desaturation needs extra
//! stages mixing a luminance gray back into the color. One texture unit is
//! consumed per stage, so a device short on units rounds the saturation
//! program down rather than failing the draw.

use alloc::vec;

use imbricate_core::attrib::PaintAttrib;
use imbricate_core::caps::GpuCaps;
use imbricate_render::{
    BlendMode, CombineOp, CombineProgram, CombineSource, CombineStage, LUMA_BLUE, LUMA_GREEN,
    LUMA_RED, Shading,
};

/// Texture units the two-stage desaturation program needs.
const GRAY_UNITS: u32 = 2;
/// Texture units the four-stage partial-saturation program needs.
const PARTIAL_UNITS: u32 = 4;

/// Which shading strategy the session runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShadingPath {
    /// Attributes ride as uniforms into a fragment program.
    Uniform,
    /// Attributes are compiled into fixed-function combine stages.
    Legacy,
}

impl ShadingPath {
    /// The strategy this device profile supports.
    #[must_use]
    pub fn select(caps: &GpuCaps) -> Self {
        if caps.fragment_programs {
            Self::Uniform
        } else {
            Self::Legacy
        }
    }
}

/// Shading for one window draw, with a note when capability limits forced
/// a downgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowShading {
    /// What the device executes.
    pub shading: Shading,
    /// The device had too few texture units for the requested saturation.
    pub degraded: bool,
}

/// Blend mode for a window draw. Translucency forces blending on; an
/// opaque window without an alpha channel overwrites the destination.
#[must_use]
pub fn blend_for(attrib: &PaintAttrib, has_alpha: bool) -> BlendMode {
    if attrib.opacity < 1.0 || has_alpha {
        BlendMode::SourceOver
    } else {
        BlendMode::Opaque
    }
}

/// Builds the shading for a window painted with `attrib`.
#[must_use]
pub fn window_shading(path: ShadingPath, caps: &GpuCaps, attrib: &PaintAttrib) -> WindowShading {
    match path {
        ShadingPath::Uniform => WindowShading {
            shading: Shading::Uniform(*attrib),
            degraded: false,
        },
        ShadingPath::Legacy => legacy_shading(caps, attrib),
    }
}

fn legacy_shading(caps: &GpuCaps, attrib: &PaintAttrib) -> WindowShading {
    let saturated = attrib.saturation >= 1.0;
    let units = caps.max_texture_units;

    if saturated || units < GRAY_UNITS {
        return WindowShading {
            shading: Shading::Combine(full_saturation_program(attrib)),
            degraded: !saturated,
        };
    }
    if attrib.saturation <= 0.0 || units < PARTIAL_UNITS {
        // A 2-3 unit device rounds partial saturation down to gray.
        return WindowShading {
            shading: Shading::Combine(gray_program(attrib)),
            degraded: attrib.saturation > 0.0,
        };
    }
    WindowShading {
        shading: Shading::Combine(partial_saturation_program(attrib)),
        degraded: false,
    }
}

/// Premultiplied fragment color carrying opacity and brightness.
fn fragment_color(attrib: &PaintAttrib) -> [f32; 4] {
    let c = attrib.opacity * attrib.brightness;
    [c, c, c, attrib.opacity]
}

const LUMA_CONSTANT: [f32; 4] = [LUMA_RED, LUMA_GREEN, LUMA_BLUE, 0.0];

fn replace_texture() -> CombineStage {
    CombineStage {
        rgb: CombineOp::Replace(CombineSource::Texture),
        alpha: CombineOp::Replace(CombineSource::Texture),
        constant: [0.0; 4],
    }
}

fn modulate_fragment() -> CombineStage {
    CombineStage {
        rgb: CombineOp::Modulate(CombineSource::Previous, CombineSource::Fragment),
        alpha: CombineOp::Modulate(CombineSource::Previous, CombineSource::Fragment),
        constant: [0.0; 4],
    }
}

fn full_saturation_program(attrib: &PaintAttrib) -> CombineProgram {
    if attrib.opacity >= 1.0 && attrib.brightness >= 1.0 {
        CombineProgram {
            stages: vec![replace_texture()],
            fragment: [1.0; 4],
        }
    } else {
        CombineProgram {
            stages: vec![CombineStage {
                rgb: CombineOp::Modulate(CombineSource::Texture, CombineSource::Fragment),
                alpha: CombineOp::Modulate(CombineSource::Texture, CombineSource::Fragment),
                constant: [0.0; 4],
            }],
            fragment: fragment_color(attrib),
        }
    }
}

fn gray_program(attrib: &PaintAttrib) -> CombineProgram {
    CombineProgram {
        stages: vec![
            CombineStage {
                rgb: CombineOp::WeightedSum(CombineSource::Texture),
                alpha: CombineOp::Replace(CombineSource::Texture),
                constant: LUMA_CONSTANT,
            },
            modulate_fragment(),
        ],
        fragment: fragment_color(attrib),
    }
}

fn partial_saturation_program(attrib: &PaintAttrib) -> CombineProgram {
    CombineProgram {
        stages: vec![
            replace_texture(),
            CombineStage {
                rgb: CombineOp::WeightedSum(CombineSource::Previous),
                alpha: CombineOp::Replace(CombineSource::Previous),
                constant: LUMA_CONSTANT,
            },
            CombineStage {
                rgb: CombineOp::Interpolate(CombineSource::Texture, CombineSource::Previous),
                alpha: CombineOp::Replace(CombineSource::Previous),
                constant: [0.0, 0.0, 0.0, attrib.saturation],
            },
            modulate_fragment(),
        ],
        fragment: fragment_color(attrib),
    }
}
