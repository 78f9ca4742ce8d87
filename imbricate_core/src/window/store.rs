// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays window storage with stacking and property management.

use alloc::vec::Vec;

use crate::attrib::PaintAttrib;
use crate::rect::Rect;
use crate::region::Region;
use crate::texture::TexturePlate;

use super::id::{INVALID, WindowId};

/// Decoration extents around a window's frame, in pixels per side.
///
/// Damage reported for a window covers the frame *plus* these extents, so
/// shadows and decorations repaint together with the client area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Border {
    /// Pixels extending past the left frame edge.
    pub left: i32,
    /// Pixels extending past the right frame edge.
    pub right: i32,
    /// Pixels extending past the top frame edge.
    pub top: i32,
    /// Pixels extending past the bottom frame edge.
    pub bottom: i32,
}

/// Per-window lifecycle flags.
///
/// A window contributes pixels to a frame only while it is *paintable*:
/// mapped, already drawn to at least once, and not marked destroyed. The
/// flags are orthogonal; the windowing layer flips them as protocol events
/// arrive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WindowFlags {
    /// The window is mapped (visible as far as the protocol is concerned).
    pub mapped: bool,
    /// The window's surface has received at least one frame of content.
    pub damaged: bool,
    /// The window's pixel format carries an alpha channel.
    pub alpha: bool,
    /// The window is going away; it stays bookkept while effects finish but
    /// no longer paints.
    pub destroyed: bool,
    /// The window currently bypasses compositing and scans out directly.
    pub unredirected: bool,
}

/// Struct-of-arrays storage for all windows.
///
/// Windows are addressed by [`WindowId`] handles. Internally, each window
/// occupies a slot in parallel arrays. Destroyed windows are recycled via a
/// free list, and generation counters prevent stale handle access. Stacking
/// is a flat bottom-to-top list of raw slot indices.
#[derive(Debug, Default)]
pub struct WindowStore {
    // -- Geometry --
    pub(crate) frame: Vec<Rect>,
    pub(crate) border: Vec<Border>,
    pub(crate) shape: Vec<Region>,

    // -- Paint inputs --
    pub(crate) plates: Vec<Vec<TexturePlate>>,
    pub(crate) attrib: Vec<PaintAttrib>,
    pub(crate) flags: Vec<WindowFlags>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Stacking --
    pub(crate) paint_order: Vec<u32>,
}

impl WindowStore {
    /// Creates an empty window store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Allocation API --

    /// Creates a new window at `frame` and returns its handle.
    ///
    /// The window starts unshaped, unmapped, fully opaque, with no plates,
    /// stacked on top of everything else.
    pub fn create_window(&mut self, frame: Rect) -> WindowId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.frame[idx as usize] = frame;
            self.border[idx as usize] = Border::default();
            self.shape[idx as usize] = Region::new();
            self.plates[idx as usize] = Vec::new();
            self.attrib[idx as usize] = PaintAttrib::OPAQUE;
            self.flags[idx as usize] = WindowFlags::default();
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.frame.push(frame);
            self.border.push(Border::default());
            self.shape.push(Region::new());
            self.plates.push(Vec::new());
            self.attrib.push(PaintAttrib::OPAQUE);
            self.flags.push(WindowFlags::default());
            self.generation.push(0);
            idx
        };

        self.paint_order.push(idx);

        WindowId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a window, freeing its slot for reuse and removing it from
    /// the stacking order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_window(&mut self, id: WindowId) {
        self.validate(id);
        let idx = id.idx;

        self.paint_order.retain(|&slot| slot != idx);
        self.plates[idx as usize] = Vec::new();
        self.shape[idx as usize] = Region::new();

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
    }

    /// Returns whether the given handle refers to a live window.
    #[must_use]
    pub fn is_alive(&self, id: WindowId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Number of live windows.
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.paint_order.len()
    }

    /// Number of allocated slots, live or free. Raw slot indices are always
    /// below this bound.
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> u32 {
        self.len
    }

    // -- Stacking API --

    /// Raw slot indices of live windows, bottom-to-top.
    ///
    /// Paint passes iterate this directly; occlusion walks it in reverse.
    #[inline]
    #[must_use]
    pub fn paint_order(&self) -> &[u32] {
        &self.paint_order
    }

    /// Rebuilds a full handle for the window at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> WindowId {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        WindowId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Moves a window to the top of the stacking order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn raise_to_top(&mut self, id: WindowId) {
        self.validate(id);
        self.paint_order.retain(|&slot| slot != id.idx);
        self.paint_order.push(id.idx);
    }

    /// Moves a window to the bottom of the stacking order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn lower_to_bottom(&mut self, id: WindowId) {
        self.validate(id);
        self.paint_order.retain(|&slot| slot != id.idx);
        self.paint_order.insert(0, id.idx);
    }

    /// Places `id` directly above `below` in the stacking order.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale or if `id == below`.
    pub fn stack_above(&mut self, id: WindowId, below: WindowId) {
        self.validate(id);
        self.validate(below);
        assert!(id.idx != below.idx, "cannot stack a window above itself");
        self.paint_order.retain(|&slot| slot != id.idx);
        if let Some(pos) = self.paint_order.iter().position(|&slot| slot == below.idx) {
            self.paint_order.insert(pos + 1, id.idx);
        } else {
            self.paint_order.push(id.idx);
        }
    }

    // -- Property getters --

    /// Returns the frame rect of a window.
    #[must_use]
    pub fn frame(&self, id: WindowId) -> Rect {
        self.validate(id);
        self.frame[id.idx as usize]
    }

    /// Returns the decoration border of a window.
    #[must_use]
    pub fn border(&self, id: WindowId) -> Border {
        self.validate(id);
        self.border[id.idx as usize]
    }

    /// Returns the stored shape of a window. Empty means "unshaped": the
    /// window covers exactly its frame.
    #[must_use]
    pub fn shape(&self, id: WindowId) -> &Region {
        self.validate(id);
        &self.shape[id.idx as usize]
    }

    /// Returns the pixels the window actually covers: its shape when one is
    /// set, otherwise its frame.
    #[must_use]
    pub fn effective_shape(&self, id: WindowId) -> Region {
        self.validate(id);
        self.effective_shape_at(id.idx)
    }

    /// The rect that must repaint when this window changes: frame plus
    /// decoration border.
    #[must_use]
    pub fn damage_rect(&self, id: WindowId) -> Rect {
        self.validate(id);
        self.damage_rect_at(id.idx)
    }

    /// Returns the texture plates of a window.
    #[must_use]
    pub fn plates(&self, id: WindowId) -> &[TexturePlate] {
        self.validate(id);
        &self.plates[id.idx as usize]
    }

    /// Returns the steady-state paint attributes of a window.
    #[must_use]
    pub fn attrib(&self, id: WindowId) -> PaintAttrib {
        self.validate(id);
        self.attrib[id.idx as usize]
    }

    /// Returns the lifecycle flags of a window.
    #[must_use]
    pub fn flags(&self, id: WindowId) -> WindowFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    // -- Property setters --

    /// Sets the frame rect, leaving any explicit shape untouched.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_frame(&mut self, id: WindowId, frame: Rect) {
        self.validate(id);
        self.frame[id.idx as usize] = frame;
    }

    /// Moves the window by `(dx, dy)`, translating frame, shape, and
    /// plates together. Plate matrices are re-anchored so the moved
    /// window keeps sampling the same texels.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn move_window(&mut self, id: WindowId, dx: i32, dy: i32) {
        self.validate(id);
        let i = id.idx as usize;
        self.frame[i] = self.frame[i].translated(dx, dy);
        self.shape[i].translate(dx, dy);
        for plate in &mut self.plates[i] {
            plate.coverage.translate(dx, dy);
            plate.matrix = plate.matrix.pre_translated(-f64::from(dx), -f64::from(dy));
        }
    }

    /// Sets the decoration border.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_border(&mut self, id: WindowId, border: Border) {
        self.validate(id);
        self.border[id.idx as usize] = border;
    }

    /// Sets an explicit shape. Pass an empty region to return the window to
    /// unshaped (frame-covering) behavior.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_shape(&mut self, id: WindowId, shape: Region) {
        self.validate(id);
        self.shape[id.idx as usize] = shape;
    }

    /// Replaces the window's texture plates.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_plates(&mut self, id: WindowId, plates: Vec<TexturePlate>) {
        self.validate(id);
        self.plates[id.idx as usize] = plates;
    }

    /// Sets the steady-state paint attributes.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_attrib(&mut self, id: WindowId, attrib: PaintAttrib) {
        self.validate(id);
        self.attrib[id.idx as usize] = attrib;
    }

    /// Sets the lifecycle flags.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_flags(&mut self, id: WindowId, flags: WindowFlags) {
        self.validate(id);
        self.flags[id.idx as usize] = flags;
    }

    // -- Raw-index accessors for paint passes --
    //
    // These accept raw slot indices (as found in `paint_order()`) rather
    // than `WindowId` handles, skipping generation validation. Only use
    // with indices that came from `paint_order()`.

    /// Returns the frame rect at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn frame_at(&self, idx: u32) -> Rect {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.frame[idx as usize]
    }

    /// Returns the covered pixels at raw slot `idx` (shape, or frame when
    /// unshaped).
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn effective_shape_at(&self, idx: u32) -> Region {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        let shape = &self.shape[idx as usize];
        if shape.is_empty() {
            Region::from_rect(self.frame[idx as usize])
        } else {
            shape.clone()
        }
    }

    /// Returns the damage rect (frame plus border) at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn damage_rect_at(&self, idx: u32) -> Rect {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        let b = self.border[idx as usize];
        self.frame[idx as usize].expanded(b.left, b.top, b.right, b.bottom)
    }

    /// Returns the texture plates at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn plates_at(&self, idx: u32) -> &[TexturePlate] {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        &self.plates[idx as usize]
    }

    /// Returns the paint attributes at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn attrib_at(&self, idx: u32) -> PaintAttrib {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.attrib[idx as usize]
    }

    /// Returns the lifecycle flags at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn flags_at(&self, idx: u32) -> WindowFlags {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.flags[idx as usize]
    }

    /// Whether the window at raw slot `idx` contributes pixels to a frame.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn paintable_at(&self, idx: u32) -> bool {
        let f = self.flags_at(idx);
        f.mapped && f.damaged && !f.destroyed
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    fn validate(&self, id: WindowId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale WindowId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}
