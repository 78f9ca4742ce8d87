// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region tessellation.
//!
//! [`add_region`] turns "this part of the window is visible" into textured
//! triangles: every rect of the covered region is clipped against the clip
//! region, optionally subdivided into tiles, and emitted as two triangles
//! per box with texture coordinates computed per active unit.
//!
//! The clip region's structure picks the clipping strategy. A single-rect
//! clip (the overwhelmingly common case) is handled by clamping alone; a
//! multi-rect clip intersects every covered rect against every clip rect so
//! concave visible areas come out exact.

use imbricate_core::matrix::TextureMatrix;
use imbricate_core::rect::Rect;
use imbricate_core::region::Region;

use alloc::vec::Vec;

use crate::batch::GeometryBatch;

/// Upper bounds on emitted box size, in pixels.
///
/// Unbounded by default. Whole-screen deformation effects tessellate with
/// small tiles so each box can be displaced independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileLimits {
    /// Maximum box width, if any.
    pub max_width: Option<u32>,
    /// Maximum box height, if any.
    pub max_height: Option<u32>,
}

impl TileLimits {
    /// No subdivision: one box per visible rect.
    pub const UNBOUNDED: Self = Self {
        max_width: None,
        max_height: None,
    };

    /// Square tiles of at most `size` pixels.
    #[must_use]
    pub const fn splat(size: u32) -> Self {
        Self {
            max_width: Some(size),
            max_height: Some(size),
        }
    }
}

/// Tessellates `covered ∩ clip` into `batch`, appending.
///
/// One texture-coordinate pair per matrix in `matrices` is computed for
/// every vertex. An empty batch adopts the unit count of `matrices`; a
/// non-empty batch must already match it.
///
/// # Panics
///
/// Panics if the batch already holds geometry for a different number of
/// texture units.
pub fn add_region(
    batch: &mut GeometryBatch,
    matrices: &[TextureMatrix],
    covered: &Region,
    clip: &Region,
    limits: TileLimits,
) {
    if batch.is_empty() {
        batch.reset(matrices.len());
    } else {
        assert!(
            batch.units() == matrices.len(),
            "batch has {} texture units but {} matrices were given",
            batch.units(),
            matrices.len()
        );
    }

    // Everything emitted lies inside the bounding box of what the clip can
    // let through.
    let clip_bounds = clip.bounding_rect();
    let mut clamp = Rect::EMPTY;
    for &r in covered.rects() {
        clamp = clamp.union_bounds(r.intersection(clip_bounds));
    }
    if clamp.is_empty() {
        return;
    }

    let axis_aligned: Vec<bool> = matrices.iter().map(TextureMatrix::is_axis_aligned).collect();
    let mut uv_scratch: Vec<[f32; 2]> = Vec::with_capacity(matrices.len());
    let single_clip = clip.rect_count() == 1;

    for &r in covered.rects() {
        let clamped = r.intersection(clamp);
        if clamped.is_empty() {
            continue;
        }
        if single_clip {
            // The clamp box already lies inside the one clip rect.
            emit_tiled(batch, matrices, &axis_aligned, &mut uv_scratch, clamped, limits);
        } else {
            for &c in clip.rects() {
                let piece = clamped.intersection(c);
                if !piece.is_empty() {
                    emit_tiled(batch, matrices, &axis_aligned, &mut uv_scratch, piece, limits);
                }
            }
        }
    }
}

fn emit_tiled(
    batch: &mut GeometryBatch,
    matrices: &[TextureMatrix],
    axis_aligned: &[bool],
    uv_scratch: &mut Vec<[f32; 2]>,
    rect: Rect,
    limits: TileLimits,
) {
    let tile_w = tile_step(limits.max_width, rect.width());
    let tile_h = tile_step(limits.max_height, rect.height());

    let mut y = rect.y1;
    while y < rect.y2 {
        let y_end = y.saturating_add(tile_h).min(rect.y2);
        let mut x = rect.x1;
        while x < rect.x2 {
            let x_end = x.saturating_add(tile_w).min(rect.x2);
            push_box(
                batch,
                matrices,
                axis_aligned,
                uv_scratch,
                Rect::new(x, y, x_end, y_end),
            );
            x = x_end;
        }
        y = y_end;
    }
}

fn tile_step(limit: Option<u32>, full: i32) -> i32 {
    match limit {
        Some(max) => i32::try_from(max).unwrap_or(i32::MAX).max(1).min(full),
        None => full,
    }
}

/// Emits one box as two triangles, texture coordinates per unit.
fn push_box(
    batch: &mut GeometryBatch,
    matrices: &[TextureMatrix],
    axis_aligned: &[bool],
    uv_scratch: &mut Vec<[f32; 2]>,
    rect: Rect,
) {
    let corners = [
        (rect.x1, rect.y1),
        (rect.x2, rect.y1),
        (rect.x2, rect.y2),
        (rect.x1, rect.y2),
    ];
    // Two triangles: 0-1-2, 0-2-3.
    for corner in [0_usize, 1, 2, 0, 2, 3] {
        let (cx, cy) = corners[corner];
        let (fx, fy) = (f64::from(cx), f64::from(cy));
        uv_scratch.clear();
        for (m, &aligned) in matrices.iter().zip(axis_aligned) {
            uv_scratch.push(if aligned {
                m.map_axis_aligned(fx, fy)
            } else {
                m.map(fx, fy)
            });
        }
        batch.push_vertex([cx as f32, cy as f32], uv_scratch);
    }
}

#[cfg(test)]
mod tests {
    use imbricate_core::matrix::TextureMatrix;

    use super::*;

    /// Rebuilds the emitted boxes from the vertex stream. Relies on the
    /// fixed corner order of `push_box`.
    fn boxes_of(batch: &GeometryBatch) -> Vec<Rect> {
        let mut boxes = Vec::new();
        let pos = batch.positions();
        let mut i = 0;
        while i + 6 <= pos.len() {
            let p0 = pos[i];
            let p2 = pos[i + 2];
            #[expect(
                clippy::cast_possible_truncation,
                reason = "test fixtures use whole-pixel coordinates"
            )]
            boxes.push(Rect::new(p0[0] as i32, p0[1] as i32, p2[0] as i32, p2[1] as i32));
            i += 6;
        }
        boxes
    }

    fn covered_region(batch: &GeometryBatch) -> Region {
        Region::from_rects(&boxes_of(batch))
    }

    #[test]
    fn covers_region_intersect_clip_exactly() {
        let covered = Region::from_rects(&[Rect::new(0, 0, 50, 50), Rect::new(50, 25, 100, 75)]);
        let clip = Region::from_rect(Rect::new(10, 10, 90, 70));
        let mut batch = GeometryBatch::new();
        add_region(
            &mut batch,
            &[TextureMatrix::IDENTITY],
            &covered,
            &clip,
            TileLimits::UNBOUNDED,
        );
        assert_eq!(covered_region(&batch), covered.intersect(&clip));
    }

    #[test]
    fn multi_rect_clip_is_exact() {
        let covered = Region::from_rect(Rect::new(0, 0, 100, 100));
        // Concave clip: frame with a hole.
        let clip = Region::from_rect(Rect::new(0, 0, 100, 100))
            .subtract_rect(Rect::new(25, 25, 75, 75));
        let mut batch = GeometryBatch::new();
        add_region(
            &mut batch,
            &[TextureMatrix::IDENTITY],
            &covered,
            &clip,
            TileLimits::UNBOUNDED,
        );
        let result = covered_region(&batch);
        assert_eq!(result, clip);
        assert!(!result.contains(50, 50));
    }

    #[test]
    fn single_clip_rect_emits_one_box_per_rect() {
        let covered = Region::from_rects(&[Rect::new(0, 0, 10, 10), Rect::new(20, 0, 30, 10)]);
        let clip = Region::from_rect(Rect::new(0, 0, 100, 100));
        let mut batch = GeometryBatch::new();
        add_region(
            &mut batch,
            &[TextureMatrix::IDENTITY],
            &covered,
            &clip,
            TileLimits::UNBOUNDED,
        );
        assert_eq!(batch.triangle_count(), 4);
        assert_eq!(boxes_of(&batch).len(), 2);
    }

    #[test]
    fn tiling_respects_limits() {
        let covered = Region::from_rect(Rect::new(0, 0, 100, 50));
        let clip = covered.clone();
        let mut batch = GeometryBatch::new();
        add_region(
            &mut batch,
            &[TextureMatrix::IDENTITY],
            &covered,
            &clip,
            TileLimits::splat(32),
        );
        let boxes = boxes_of(&batch);
        // ceil(100/32) * ceil(50/32) = 4 * 2.
        assert_eq!(boxes.len(), 8);
        for b in &boxes {
            assert!(b.width() <= 32 && b.height() <= 32, "tile too large: {b:?}");
        }
        assert_eq!(covered_region(&batch), covered);
    }

    #[test]
    fn tile_height_only() {
        let covered = Region::from_rect(Rect::new(0, 0, 40, 90));
        let mut batch = GeometryBatch::new();
        add_region(
            &mut batch,
            &[TextureMatrix::IDENTITY],
            &covered,
            &covered.clone(),
            TileLimits {
                max_width: None,
                max_height: Some(30),
            },
        );
        assert_eq!(boxes_of(&batch).len(), 3);
    }

    #[test]
    fn empty_inputs_emit_nothing() {
        let covered = Region::from_rect(Rect::new(0, 0, 10, 10));
        let mut batch = GeometryBatch::new();
        add_region(
            &mut batch,
            &[TextureMatrix::IDENTITY],
            &covered,
            &Region::new(),
            TileLimits::UNBOUNDED,
        );
        assert!(batch.is_empty());
        add_region(
            &mut batch,
            &[TextureMatrix::IDENTITY],
            &Region::new(),
            &covered,
            TileLimits::UNBOUNDED,
        );
        assert!(batch.is_empty());
    }

    #[test]
    fn disjoint_covered_and_clip_emit_nothing() {
        let covered = Region::from_rect(Rect::new(0, 0, 10, 10));
        let clip = Region::from_rect(Rect::new(50, 50, 60, 60));
        let mut batch = GeometryBatch::new();
        add_region(
            &mut batch,
            &[TextureMatrix::IDENTITY],
            &covered,
            &clip,
            TileLimits::UNBOUNDED,
        );
        assert!(batch.is_empty());
    }

    #[test]
    fn axis_aligned_texcoords() {
        // Texture of a 100x50 window at (10, 20), normalized coordinates.
        let m = TextureMatrix::scale_translate(0.01, 0.02, -0.1, -0.4);
        let covered = Region::from_rect(Rect::new(10, 20, 110, 70));
        let mut batch = GeometryBatch::new();
        add_region(&mut batch, &[m], &covered, &covered.clone(), TileLimits::UNBOUNDED);

        let uv = batch.texcoords(0);
        // First vertex is the top-left corner.
        assert_eq!(uv[0], [0.0, 0.0]);
        // Third vertex is the bottom-right corner.
        let [u, v] = uv[2];
        assert!((u - 1.0).abs() < 1e-5 && (v - 1.0).abs() < 1e-5);
    }

    #[test]
    fn sheared_matrix_uses_general_path() {
        let m = TextureMatrix::from_affine(kurbo::Affine::skew(0.5, 0.0));
        assert!(!m.is_axis_aligned());
        let covered = Region::from_rect(Rect::new(0, 0, 10, 10));
        let mut batch = GeometryBatch::new();
        add_region(&mut batch, &[m], &covered, &covered.clone(), TileLimits::UNBOUNDED);

        // Bottom-right corner (10, 10): u = x + 0.5y = 15.
        assert_eq!(batch.texcoords(0)[2], [15.0, 10.0]);
    }

    #[test]
    fn multi_unit_coordinates_are_parallel() {
        let m0 = TextureMatrix::IDENTITY;
        let m1 = TextureMatrix::scale_translate(0.5, 0.5, 0.0, 0.0);
        let covered = Region::from_rect(Rect::new(0, 0, 8, 8));
        let mut batch = GeometryBatch::new();
        add_region(&mut batch, &[m0, m1], &covered, &covered.clone(), TileLimits::UNBOUNDED);

        assert_eq!(batch.units(), 2);
        assert_eq!(batch.texcoords(0).len(), batch.vertex_count());
        assert_eq!(batch.texcoords(1).len(), batch.vertex_count());
        assert_eq!(batch.texcoords(0)[2], [8.0, 8.0]);
        assert_eq!(batch.texcoords(1)[2], [4.0, 4.0]);
    }

    #[test]
    fn append_accumulates_geometry() {
        let a = Region::from_rect(Rect::new(0, 0, 10, 10));
        let b = Region::from_rect(Rect::new(20, 20, 30, 30));
        let clip = Region::from_rect(Rect::new(0, 0, 100, 100));
        let mut batch = GeometryBatch::new();
        add_region(&mut batch, &[TextureMatrix::IDENTITY], &a, &clip, TileLimits::UNBOUNDED);
        let after_first = batch.vertex_count();
        add_region(&mut batch, &[TextureMatrix::IDENTITY], &b, &clip, TileLimits::UNBOUNDED);
        assert_eq!(batch.vertex_count(), after_first * 2);
        assert_eq!(covered_region(&batch), a.union(&b));
    }

    #[test]
    #[should_panic(expected = "texture units")]
    fn unit_count_change_mid_batch_panics() {
        let covered = Region::from_rect(Rect::new(0, 0, 10, 10));
        let mut batch = GeometryBatch::new();
        add_region(
            &mut batch,
            &[TextureMatrix::IDENTITY],
            &covered,
            &covered.clone(),
            TileLimits::UNBOUNDED,
        );
        add_region(
            &mut batch,
            &[TextureMatrix::IDENTITY, TextureMatrix::IDENTITY],
            &covered,
            &covered.clone(),
            TileLimits::UNBOUNDED,
        );
    }

    #[test]
    fn flat_geometry_without_units() {
        let covered = Region::from_rect(Rect::new(0, 0, 10, 10));
        let mut batch = GeometryBatch::new();
        add_region(&mut batch, &[], &covered, &covered.clone(), TileLimits::UNBOUNDED);
        assert_eq!(batch.units(), 0);
        assert_eq!(batch.triangle_count(), 2);
    }
}
