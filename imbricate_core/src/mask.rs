// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint pass mode flags.
//!
//! One bitmask rides through every layer of a paint pass, from the
//! per-output entry point down to individual texture draws. Effects set
//! screen-level bits when they ask for a repaint mode; the pipeline sets
//! window-level bits as it learns things about the window being painted
//! (solid, translucent, offset). Probe bits turn a paint call into a
//! question with no drawing.

use bitflags::bitflags;

bitflags! {
    /// Flags describing the current paint pass.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PaintMask: u32 {
        // -- Screen-level requests --

        /// The whole output must be repainted regardless of damage.
        const FULL = 1 << 0;
        /// The output is painted under a whole-screen transform.
        const TRANSFORMED = 1 << 1;
        /// Windows may carry their own transforms this pass, so opaque
        /// coverage can no longer be trusted for occlusion.
        const WITH_TRANSFORMED_WINDOWS = 1 << 2;
        /// Skip painting the background. Something else covers it.
        const NO_BACKGROUND = 1 << 3;
        /// Skip the occlusion pass; every window paints with the full
        /// repaint region as its clip.
        const NO_OCCLUSION_DETECTION = 1 << 4;

        // -- Probe bits --

        /// The paint call must not draw. Its boolean result answers "would
        /// this window cover its clip region with opaque pixels?".
        const OCCLUSION_PROBE = 1 << 5;

        // -- Window-level state --

        /// The window's own transform differs from the screen transform.
        const WINDOW_TRANSFORMED = 1 << 6;
        /// The window is painted at a viewport offset from its home
        /// position.
        const WITH_OFFSET = 1 << 7;
        /// Every pixel the window paints is opaque.
        const SOLID = 1 << 8;
        /// At least one painted pixel blends with what is behind it.
        const TRANSLUCENT = 1 << 9;
        /// The window is being painted onto a transformed screen.
        const ON_TRANSFORMED_SCREEN = 1 << 10;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert_eq!(PaintMask::default(), PaintMask::empty());
    }

    #[test]
    fn solid_and_translucent_are_distinct() {
        let m = PaintMask::SOLID | PaintMask::ON_TRANSFORMED_SCREEN;
        assert!(m.contains(PaintMask::SOLID));
        assert!(!m.contains(PaintMask::TRANSLUCENT));
    }

    #[test]
    fn probe_bit_composes_with_screen_bits() {
        let m = PaintMask::TRANSFORMED | PaintMask::OCCLUSION_PROBE;
        assert!(m.intersects(PaintMask::OCCLUSION_PROBE));
        let cleared = m - PaintMask::OCCLUSION_PROBE;
        assert_eq!(cleared, PaintMask::TRANSFORMED);
    }
}
