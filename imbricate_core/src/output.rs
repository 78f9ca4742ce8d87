// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display outputs.
//!
//! The screen area is tiled by one or more outputs (monitors in a
//! multi-head setup, or a single rect covering everything). Each output is
//! composited separately: occlusion, background, and window painting all
//! happen per output against that output's rect.

use core::fmt;

use crate::rect::Rect;
use crate::region::Region;

/// Identifies a specific display output.
///
/// The windowing layer assigns output IDs; the pipeline passes them through
/// without interpreting the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OutputId(pub u32);

impl fmt::Debug for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutputId({})", self.0)
    }
}

/// One display output: an ID plus the screen-space rect it scans out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Output {
    /// Stable identifier for this output.
    pub id: OutputId,
    /// The screen area this output covers.
    pub rect: Rect,
}

impl Output {
    /// Creates an output covering `rect`.
    #[inline]
    #[must_use]
    pub const fn new(id: OutputId, rect: Rect) -> Self {
        Self { id, rect }
    }

    /// The output's area as a region.
    #[must_use]
    pub fn region(&self) -> Region {
        Region::from_rect(self.rect)
    }

    /// Center of the output in pixels.
    #[inline]
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.rect.x1) + f64::from(self.rect.width()) / 2.0,
            f64::from(self.rect.y1) + f64::from(self.rect.height()) / 2.0,
        )
    }

    /// Half the output's width and height in pixels.
    #[inline]
    #[must_use]
    pub fn half_extent(&self) -> (f64, f64) {
        (
            f64::from(self.rect.width()) / 2.0,
            f64::from(self.rect.height()) / 2.0,
        )
    }
}
