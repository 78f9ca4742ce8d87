// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw calls: the handoff between the paint pipeline and a device.
//!
//! A [`DrawCall`] bundles tessellated geometry with everything a device
//! needs to put pixels on screen: bound textures, the screen transform, a
//! blend mode, and a [`Shading`] program. Shading comes in two flavors
//! matching the two hardware generations the pipeline serves: a single
//! uniform-driven pass for programmable devices, and an explicit
//! [`CombineStage`] sequence for fixed-function devices. Devices execute
//! whichever they are handed; choosing between them is the pipeline's job.

use alloc::vec::Vec;

use imbricate_core::attrib::PaintAttrib;
use imbricate_core::texture::TextureId;
use imbricate_core::transform::Transform;

use crate::batch::GeometryBatch;

/// Perceptual weight of red in luminance.
pub const LUMA_RED: f32 = 0.30;
/// Perceptual weight of green in luminance.
pub const LUMA_GREEN: f32 = 0.59;
/// Perceptual weight of blue in luminance.
pub const LUMA_BLUE: f32 = 0.11;

/// Blend mode for compositing a draw call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Standard source-over alpha compositing (premultiplied).
    #[default]
    SourceOver,
    /// Replace destination pixels outright. Used when every painted pixel
    /// is known opaque.
    Opaque,
}

/// One value feeding a combine stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CombineSource {
    /// The texture sample for this fragment.
    Texture,
    /// The output of the previous stage.
    Previous,
    /// The stage's constant color.
    Constant,
    /// The fragment color (brightness and opacity ride here on the legacy
    /// path).
    Fragment,
}

/// How a combine stage folds its sources, separately for rgb and alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CombineOp {
    /// Pass one source through.
    Replace(CombineSource),
    /// Component-wise product of two sources.
    Modulate(CombineSource, CombineSource),
    /// `a·t + b·(1−t)` with `t` read from the constant's alpha.
    Interpolate(CombineSource, CombineSource),
    /// Dot of the source's rgb against the constant's rgb, splatted across
    /// rgb. With luminance weights in the constant this is "make it gray".
    WeightedSum(CombineSource),
}

/// One fixed-function combine stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombineStage {
    /// Color operation.
    pub rgb: CombineOp,
    /// Alpha operation.
    pub alpha: CombineOp,
    /// Stage constant, rgb plus the interpolation factor in alpha.
    pub constant: [f32; 4],
}

/// A complete fixed-function program: ordered stages plus the fragment
/// color stages may reference.
#[derive(Clone, Debug, PartialEq)]
pub struct CombineProgram {
    /// Stages executed in order; the last stage's output is the pixel.
    pub stages: Vec<CombineStage>,
    /// Premultiplied color available to every stage as
    /// [`CombineSource::Fragment`].
    pub fragment: [f32; 4],
}

/// How fragments get their color.
#[derive(Clone, Debug, PartialEq)]
pub enum Shading {
    /// Programmable path: the device applies opacity, brightness, and
    /// saturation from uniforms in one pass.
    Uniform(PaintAttrib),
    /// Fixed-function path: an explicit combine-stage program.
    Combine(CombineProgram),
    /// No texture at all: fill with a premultiplied rgba color.
    Flat([f32; 4]),
}

impl Shading {
    /// Texture units the geometry must carry for this shading. Combine
    /// programs bind one unit per stage.
    #[must_use]
    pub fn units_required(&self) -> usize {
        match self {
            Self::Uniform(_) => 1,
            Self::Combine(program) => program.stages.len(),
            Self::Flat(_) => 0,
        }
    }
}

/// A single device submission.
#[derive(Debug)]
pub struct DrawCall<'a> {
    /// Geometry to draw.
    pub batch: &'a GeometryBatch,
    /// Bound textures, one per batch texture unit.
    pub textures: &'a [TextureId],
    /// Whole-screen transform applied to vertex positions.
    pub transform: Transform,
    /// How the result lands in the framebuffer.
    pub blend: BlendMode,
    /// How fragments get their color.
    pub shading: Shading,
}

impl DrawCall<'_> {
    /// Whether geometry, textures, and shading agree on texture use.
    ///
    /// Flat shading takes no textures; textured shading takes exactly one
    /// texture per batch unit.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        match self.shading {
            Shading::Flat(_) => self.textures.is_empty(),
            Shading::Uniform(_) | Shading::Combine(_) => {
                !self.textures.is_empty() && self.textures.len() == self.batch.units()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use imbricate_core::matrix::TextureMatrix;
    use imbricate_core::rect::Rect;
    use imbricate_core::region::Region;

    use crate::tessellate::{TileLimits, add_region};

    use super::*;

    #[test]
    fn luminance_weights_sum_to_one() {
        let sum = LUMA_RED + LUMA_GREEN + LUMA_BLUE;
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn default_blend_is_source_over() {
        assert_eq!(BlendMode::default(), BlendMode::SourceOver);
    }

    #[test]
    fn units_follow_the_shading() {
        assert_eq!(Shading::Flat([0.0; 4]).units_required(), 0);
        assert_eq!(Shading::Uniform(PaintAttrib::OPAQUE).units_required(), 1);
        let program = CombineProgram {
            stages: vec![
                CombineStage {
                    rgb: CombineOp::Replace(CombineSource::Texture),
                    alpha: CombineOp::Replace(CombineSource::Texture),
                    constant: [0.0; 4],
                };
                3
            ],
            fragment: [1.0; 4],
        };
        assert_eq!(Shading::Combine(program).units_required(), 3);
    }

    #[test]
    fn consistency_checks() {
        let region = Region::from_rect(Rect::new(0, 0, 4, 4));
        let mut batch = GeometryBatch::new();
        add_region(
            &mut batch,
            &[TextureMatrix::IDENTITY],
            &region,
            &region.clone(),
            TileLimits::UNBOUNDED,
        );

        let tex = [TextureId(1)];
        let textured = DrawCall {
            batch: &batch,
            textures: &tex,
            transform: Transform::IDENTITY,
            blend: BlendMode::SourceOver,
            shading: Shading::Uniform(PaintAttrib::OPAQUE),
        };
        assert!(textured.is_consistent());

        let flat_with_texture = DrawCall {
            batch: &batch,
            textures: &tex,
            transform: Transform::IDENTITY,
            blend: BlendMode::Opaque,
            shading: Shading::Flat([0.0, 0.0, 0.0, 1.0]),
        };
        assert!(!flat_with_texture.is_consistent());

        let missing_texture = DrawCall {
            batch: &batch,
            textures: &[],
            transform: Transform::IDENTITY,
            blend: BlendMode::SourceOver,
            shading: Shading::Combine(CombineProgram {
                stages: vec![],
                fragment: [1.0; 4],
            }),
        };
        assert!(!missing_texture.is_consistent());
    }
}
