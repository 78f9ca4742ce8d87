// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occlusion tracking.
//!
//! Before anything is drawn, the paint pass walks the stacking order
//! topmost-first and asks each window whether it would cover its clip with
//! opaque pixels. The [`OcclusionTracker`] folds those answers into a
//! shrinking *remaining* region: each opaque window's shape is subtracted,
//! and what is left when a window is reached is exactly the set of pixels
//! where that window can still be seen. What survives the whole walk is
//! where the background shows through.
//!
//! Per-window results land in a [`FrameClips`] side table indexed by raw
//! window slot. The table is frame-local: it is rebuilt from scratch every
//! pass and never consulted across frames.
//!
//! The walk also notices the one situation where compositing itself is
//! pointless: the very first (topmost) window processed covers an entire
//! output by itself. Such a window is reported as an unredirect candidate
//! so the caller can hand the output back to direct scanout.

use alloc::vec::Vec;

use crate::output::Output;
use crate::rect::Rect;
use crate::region::Region;
use crate::window::WindowId;

/// Frame-local clip regions, indexed by raw window slot.
///
/// A missing entry means the window was never reached (the walk stopped
/// early because everything was already covered); callers treat that the
/// same as an empty clip.
#[derive(Debug, Default)]
pub struct FrameClips {
    clips: Vec<Option<Region>>,
}

impl FrameClips {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the table for a new frame over `slot_count` window slots.
    ///
    /// All previous entries are dropped; allocations are kept.
    pub fn begin_frame(&mut self, slot_count: u32) {
        self.clips.clear();
        self.clips.resize(slot_count as usize, None);
    }

    /// Records the visible clip for the window at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is outside the slot range of the current frame.
    pub fn set(&mut self, idx: u32, clip: Region) {
        assert!(
            (idx as usize) < self.clips.len(),
            "slot index {idx} out of range for this frame"
        );
        self.clips[idx as usize] = Some(clip);
    }

    /// The recorded clip for raw slot `idx`, if the walk reached it.
    #[must_use]
    pub fn get(&self, idx: u32) -> Option<&Region> {
        self.clips.get(idx as usize).and_then(|c| c.as_ref())
    }

    /// Number of slots covered by the current frame.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.clips.len()
    }
}

/// Result of a completed occlusion walk.
#[derive(Debug)]
pub struct OcclusionOutcome {
    /// Pixels of the repaint region no window covers opaquely; the
    /// background paints here.
    pub background: Region,
    /// A topmost window that covers an entire output on its own, eligible
    /// to bypass compositing.
    pub unredirect_candidate: Option<WindowId>,
}

/// Folds topmost-first opacity verdicts into per-window visible regions.
#[derive(Debug)]
pub struct OcclusionTracker {
    remaining: Region,
    cover_rects: Vec<Rect>,
    processed: u32,
    candidate: Option<WindowId>,
}

impl OcclusionTracker {
    /// Starts a walk over `repaint` for `output`.
    ///
    /// `all_outputs` supplies the full output layout; a topmost window
    /// exactly tiling any single output (not just the one being painted)
    /// still qualifies for unredirection.
    #[must_use]
    pub fn new(repaint: Region, output: &Output, all_outputs: &[Output]) -> Self {
        let mut cover_rects = Vec::with_capacity(all_outputs.len() + 1);
        cover_rects.push(output.rect);
        for o in all_outputs {
            if !cover_rects.contains(&o.rect) {
                cover_rects.push(o.rect);
            }
        }
        Self {
            remaining: repaint,
            cover_rects,
            processed: 0,
            candidate: None,
        }
    }

    /// Pixels of the repaint region not yet covered by an opaque window.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> &Region {
        &self.remaining
    }

    /// Whether every repaint pixel is already covered; the walk may stop.
    #[inline]
    #[must_use]
    pub fn fully_covered(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Feeds one window, topmost-first, into the walk.
    ///
    /// `covers_opaquely` is the window's probe verdict: true when every
    /// pixel of `shape` would be painted without blending. Returns the
    /// window's visible clip: the remaining region *before* this window's
    /// own subtraction, so a window is never clipped by itself.
    pub fn observe(&mut self, id: WindowId, shape: &Region, covers_opaquely: bool) -> Region {
        let clip = self.remaining.clone();
        if covers_opaquely {
            let first = self.processed == 0;
            self.remaining = self.remaining.subtract(shape);
            if first
                && self.remaining.is_empty()
                && shape
                    .as_single_rect()
                    .is_some_and(|r| self.cover_rects.contains(&r))
            {
                self.candidate = Some(id);
            }
        }
        self.processed += 1;
        clip
    }

    /// Ends the walk, yielding the background region and any unredirect
    /// candidate.
    #[must_use]
    pub fn finish(self) -> OcclusionOutcome {
        OcclusionOutcome {
            background: self.remaining,
            unredirect_candidate: self.candidate,
        }
    }
}
