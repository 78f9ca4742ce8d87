// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Triangle setup and pixel coverage.
//!
//! Draw-call geometry arrives as screen-space triangles which the device
//! walks pixel by pixel. [`Triangle::project`] runs the three corners
//! through the draw transform; [`coverage`](Triangle::coverage) answers
//! whether a pixel center falls inside and with what barycentric weights,
//! accepting either winding. The weights interpolate anything attached to
//! the corners: texture coordinates and clip-plane values.

use core::ops::Range;

use imbricate_core::transform::Transform;

/// One projected triangle, ready for per-pixel queries.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Triangle {
    x: [f64; 3],
    y: [f64; 3],
    area: f64,
}

/// Twice the signed area of `(a, b, p)`; positive when `p` lies left of
/// the directed edge `a` to `b` in a y-down coordinate system.
fn edge(ax: f64, ay: f64, bx: f64, by: f64, px: f64, py: f64) -> f64 {
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}

impl Triangle {
    /// Projects three corners through `transform`.
    ///
    /// Returns `None` for degenerate or non-finite results, which
    /// rasterize to nothing.
    pub(crate) fn project(transform: &Transform, corners: [[f32; 2]; 3]) -> Option<Self> {
        let mut x = [0.0; 3];
        let mut y = [0.0; 3];
        for (i, corner) in corners.iter().enumerate() {
            let (px, py) = transform.apply(f64::from(corner[0]), f64::from(corner[1]));
            if !px.is_finite() || !py.is_finite() {
                return None;
            }
            x[i] = px;
            y[i] = py;
        }
        let area = edge(x[0], y[0], x[1], y[1], x[2], y[2]);
        (area != 0.0).then_some(Self { x, y, area })
    }

    /// The pixel columns and rows whose centers can fall inside, clamped
    /// to a `width` by `height` buffer. `None` when the triangle misses
    /// the buffer entirely.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "bounds are clamped to the buffer extent before the cast"
    )]
    pub(crate) fn bounds(&self, width: u32, height: u32) -> Option<(Range<u32>, Range<u32>)> {
        let (min_x, max_x) = min_max(self.x);
        let (min_y, max_y) = min_max(self.y);
        // First and last pixels whose center coordinate lands in range.
        let x0 = (min_x - 0.5).ceil().max(0.0);
        let x1 = (max_x - 0.5).floor().min(f64::from(width) - 1.0);
        let y0 = (min_y - 0.5).ceil().max(0.0);
        let y1 = (max_y - 0.5).floor().min(f64::from(height) - 1.0);
        if x1 < x0 || y1 < y0 {
            return None;
        }
        Some((x0 as u32..x1 as u32 + 1, y0 as u32..y1 as u32 + 1))
    }

    /// Barycentric weights of the point `(px, py)`, or `None` when it
    /// lies outside. Points exactly on an edge count as inside.
    pub(crate) fn coverage(&self, px: f64, py: f64) -> Option<[f64; 3]> {
        let e0 = edge(self.x[1], self.y[1], self.x[2], self.y[2], px, py);
        let e1 = edge(self.x[2], self.y[2], self.x[0], self.y[0], px, py);
        let e2 = edge(self.x[0], self.y[0], self.x[1], self.y[1], px, py);
        let inside = if self.area > 0.0 {
            e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0
        } else {
            e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0
        };
        inside.then(|| [e0 / self.area, e1 / self.area, e2 / self.area])
    }
}

fn min_max(v: [f64; 3]) -> (f64, f64) {
    (v[0].min(v[1]).min(v[2]), v[0].max(v[1]).max(v[2]))
}

/// Weighted sum of three corner values.
pub(crate) fn interpolate(weights: [f64; 3], values: [f64; 3]) -> f64 {
    weights[0] * values[0] + weights[1] * values[1] + weights[2] * values[2]
}

/// Weighted sum of three corner texture coordinates.
#[expect(
    clippy::cast_possible_truncation,
    reason = "texture coordinates are produced and consumed as f32"
)]
pub(crate) fn interpolate_uv(weights: [f64; 3], corners: [[f32; 2]; 3]) -> [f32; 2] {
    let u = interpolate(
        weights,
        [
            f64::from(corners[0][0]),
            f64::from(corners[1][0]),
            f64::from(corners[2][0]),
        ],
    );
    let v = interpolate(
        weights,
        [
            f64::from(corners[0][1]),
            f64::from(corners[1][1]),
            f64::from(corners[2][1]),
        ],
    );
    [u as f32, v as f32]
}
