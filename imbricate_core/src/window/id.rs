// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window identity.

use core::fmt;

/// Sentinel value indicating "no window" in raw index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a window in a [`WindowStore`](super::WindowStore).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a window is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId {
    /// Slot index into the store's arrays.
    pub(crate) idx: u32,
    /// Generation counter matching the store's generation for this slot.
    pub(crate) generation: u32,
}

impl WindowId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowId({}@gen{})", self.idx, self.generation)
    }
}
