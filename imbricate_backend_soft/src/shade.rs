// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fragment shading: texture sampling and shading-program execution.
//!
//! The device hands each covered pixel's interpolated texture coordinates
//! to [`SoftTexture::sample`], then folds the samples through the draw
//! call's [`Shading`]: the uniform attribute formula for shader-profile
//! calls, a stage cascade for fixed-function combine programs, or a flat
//! color. All colors are premultiplied rgba in f32.

use imbricate_core::attrib::PaintAttrib;
use imbricate_core::texture::TextureDesc;
use imbricate_render::{
    CombineOp, CombineProgram, CombineSource, LUMA_BLUE, LUMA_GREEN, LUMA_RED, Shading,
};

/// A texture held by the soft device: premultiplied rgba in f32.
#[derive(Clone)]
pub(crate) struct SoftTexture {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl SoftTexture {
    /// Converts tightly packed premultiplied rgba bytes, row major.
    pub(crate) fn from_rgba8(desc: &TextureDesc, bytes: &[u8]) -> Self {
        let mut pixels = Vec::with_capacity(bytes.len() / 4);
        for px in bytes.chunks_exact(4) {
            pixels.push([
                f32::from(px[0]) / 255.0,
                f32::from(px[1]) / 255.0,
                f32::from(px[2]) / 255.0,
                f32::from(px[3]) / 255.0,
            ]);
        }
        Self {
            width: desc.width,
            height: desc.height,
            pixels,
        }
    }

    /// Nearest-neighbor sample at normalized coordinates, clamped to the
    /// edge texels.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "texel indices are clamped to the texture extent before the cast"
    )]
    pub(crate) fn sample(&self, uv: [f32; 2]) -> [f32; 4] {
        let tx = (f64::from(uv[0]) * f64::from(self.width))
            .floor()
            .clamp(0.0, f64::from(self.width - 1)) as usize;
        let ty = (f64::from(uv[1]) * f64::from(self.height))
            .floor()
            .clamp(0.0, f64::from(self.height - 1)) as usize;
        self.pixels[ty * self.width as usize + tx]
    }
}

/// Runs `shading` for one fragment, given the per-unit texture samples.
pub(crate) fn shade(shading: &Shading, samples: &[[f32; 4]]) -> [f32; 4] {
    match shading {
        Shading::Flat(color) => *color,
        Shading::Uniform(attrib) => shade_uniform(attrib, samples[0]),
        Shading::Combine(program) => run_stages(program, samples),
    }
}

/// The shader-profile attribute formula: mix toward the luminance gray,
/// then scale by brightness and opacity, premultiplied.
fn shade_uniform(attrib: &PaintAttrib, texel: [f32; 4]) -> [f32; 4] {
    let gray = texel[0] * LUMA_RED + texel[1] * LUMA_GREEN + texel[2] * LUMA_BLUE;
    let s = attrib.saturation;
    let scale = attrib.brightness * attrib.opacity;
    [
        (texel[0] * s + gray * (1.0 - s)) * scale,
        (texel[1] * s + gray * (1.0 - s)) * scale,
        (texel[2] * s + gray * (1.0 - s)) * scale,
        texel[3] * attrib.opacity,
    ]
}

/// Executes a combine cascade. Stage `i` consumes the sample from texture
/// unit `i`; the fragment color stands in as "previous" ahead of the
/// first stage.
fn run_stages(program: &CombineProgram, samples: &[[f32; 4]]) -> [f32; 4] {
    let mut prev = program.fragment;
    for (stage, &texel) in program.stages.iter().zip(samples) {
        let rgb = eval(stage.rgb, stage.constant, texel, prev, program.fragment);
        let alpha = eval(stage.alpha, stage.constant, texel, prev, program.fragment);
        prev = [rgb[0], rgb[1], rgb[2], alpha[3]];
    }
    prev
}

fn eval(
    op: CombineOp,
    constant: [f32; 4],
    texel: [f32; 4],
    prev: [f32; 4],
    fragment: [f32; 4],
) -> [f32; 4] {
    let pick = |s: CombineSource| match s {
        CombineSource::Texture => texel,
        CombineSource::Previous => prev,
        CombineSource::Constant => constant,
        CombineSource::Fragment => fragment,
    };
    match op {
        CombineOp::Replace(a) => pick(a),
        CombineOp::Modulate(a, b) => {
            let (a, b) = (pick(a), pick(b));
            [a[0] * b[0], a[1] * b[1], a[2] * b[2], a[3] * b[3]]
        }
        CombineOp::Interpolate(a, b) => {
            let t = constant[3];
            let (a, b) = (pick(a), pick(b));
            [
                a[0] * t + b[0] * (1.0 - t),
                a[1] * t + b[1] * (1.0 - t),
                a[2] * t + b[2] * (1.0 - t),
                a[3] * t + b[3] * (1.0 - t),
            ]
        }
        CombineOp::WeightedSum(a) => {
            let a = pick(a);
            let dot = a[0] * constant[0] + a[1] * constant[1] + a[2] * constant[2];
            [dot, dot, dot, dot]
        }
    }
}
