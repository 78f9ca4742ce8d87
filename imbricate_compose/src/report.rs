// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a composited frame actually did.
//!
//! The engine fills one [`OutputReport`] per output as it paints. Reports
//! are the pipeline's observable outcome besides the pixels themselves:
//! tests assert on them, debug tooling renders them, and the windowing
//! layer reads the unredirect verdict back out of them.

use alloc::vec::Vec;

use imbricate_core::mask::PaintMask;
use imbricate_core::output::OutputId;
use imbricate_core::region::Region;
use imbricate_core::window::WindowId;

use crate::clip::ClipStrategy;

/// One window that painted, with the clip it was given.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowPaint {
    /// The painted window.
    pub window: WindowId,
    /// Pixels the window was allowed to touch.
    pub clip: Region,
    /// Window-level flags the paint ran with (solid, translucent, offset).
    pub mask: PaintMask,
}

/// One output's slice of a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputReport {
    /// Which output this describes.
    pub output: OutputId,
    /// Nothing was damaged; the pass never ran.
    pub skipped: bool,
    /// The whole output repainted, either on request or as the fallback
    /// after a failed region pass.
    pub full: bool,
    /// Pixels repainted this frame.
    pub repaint: Region,
    /// Pixels where the background showed through.
    pub background: Region,
    /// The clip mechanism wrapping the pass, when one was needed.
    pub clip_strategy: Option<ClipStrategy>,
    /// Windows painted bottom-to-top.
    pub painted: Vec<WindowPaint>,
    /// Window granted direct scanout this frame, if any.
    pub unredirected: Option<WindowId>,
    /// Draw calls submitted to the device.
    pub draw_calls: u32,
    /// Draw calls the device refused; the frame carried on without them.
    pub draw_failures: u32,
}

impl OutputReport {
    /// A report for an output whose pass was skipped outright.
    #[must_use]
    pub fn skipped(output: OutputId) -> Self {
        Self {
            output,
            skipped: true,
            full: false,
            repaint: Region::new(),
            background: Region::new(),
            clip_strategy: None,
            painted: Vec::new(),
            unredirected: None,
            draw_calls: 0,
            draw_failures: 0,
        }
    }

    /// Whether the given window painted on this output.
    #[must_use]
    pub fn painted_window(&self, window: WindowId) -> bool {
        self.painted.iter().any(|p| p.window == window)
    }
}

/// Everything one [`composite_frame`](crate::Compositor::composite_frame)
/// call did, per output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Reports in output order.
    pub outputs: Vec<OutputReport>,
}

impl FrameReport {
    /// The report for `output`, if that output exists.
    #[must_use]
    pub fn output(&self, output: OutputId) -> Option<&OutputReport> {
        self.outputs.iter().find(|o| o.output == output)
    }

    /// Total draw calls across all outputs.
    #[must_use]
    pub fn draw_calls(&self) -> u32 {
        self.outputs.iter().map(|o| o.draw_calls).sum()
    }
}
