// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertex batches produced by tessellation.
//!
//! A [`GeometryBatch`] holds triangle-list vertex positions plus one
//! parallel texture-coordinate array per active texture unit. Every third
//! vertex closes a triangle; tessellation emits two triangles per box. The
//! batch is plain data: it does not know about textures, attributes, or
//! devices, only positions and coordinates.

use alloc::vec::Vec;

/// Triangle-list geometry with per-unit texture coordinates.
///
/// All texture-coordinate arrays stay the same length as the position
/// array; [`push_vertex`](Self::push_vertex) enforces this by taking one
/// coordinate pair per unit.
#[derive(Clone, Debug, Default)]
pub struct GeometryBatch {
    positions: Vec<[f32; 2]>,
    texcoords: Vec<Vec<[f32; 2]>>,
}

impl GeometryBatch {
    /// Creates an empty batch with no texture units.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active texture units.
    #[inline]
    #[must_use]
    pub fn units(&self) -> usize {
        self.texcoords.len()
    }

    /// Number of vertices. Always a multiple of three.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of complete triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Whether the batch holds no geometry.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex positions in screen pixels.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[[f32; 2]] {
        &self.positions
    }

    /// Texture coordinates for `unit`, parallel to
    /// [`positions`](Self::positions).
    ///
    /// # Panics
    ///
    /// Panics if `unit >= self.units()`.
    #[must_use]
    pub fn texcoords(&self, unit: usize) -> &[[f32; 2]] {
        assert!(
            unit < self.texcoords.len(),
            "texture unit {unit} out of range ({} active)",
            self.texcoords.len()
        );
        &self.texcoords[unit]
    }

    /// Drops all geometry and re-targets the batch at `units` texture
    /// units, keeping allocations where possible.
    pub fn reset(&mut self, units: usize) {
        self.positions.clear();
        self.texcoords.truncate(units);
        for tc in &mut self.texcoords {
            tc.clear();
        }
        while self.texcoords.len() < units {
            self.texcoords.push(Vec::new());
        }
    }

    /// Appends one vertex with one texture coordinate pair per unit.
    ///
    /// # Panics
    ///
    /// Panics if `uvs.len()` differs from the number of active units.
    pub fn push_vertex(&mut self, position: [f32; 2], uvs: &[[f32; 2]]) {
        assert!(
            uvs.len() == self.texcoords.len(),
            "got {} texture coordinates for {} active units",
            uvs.len(),
            self.texcoords.len()
        );
        self.positions.push(position);
        for (tc, &uv) in self.texcoords.iter_mut().zip(uvs) {
            tc.push(uv);
        }
    }
}
