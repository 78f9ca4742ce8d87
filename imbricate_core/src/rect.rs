// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel rectangles.
//!
//! All screen-space bookkeeping in `imbricate_core` happens on integer pixel
//! boundaries, so rectangles are stored as four `i32` edges with half-open
//! extent: a pixel `(x, y)` is inside when `x1 <= x < x2` and `y1 <= y < y2`.
//! A rect with `x2 <= x1` or `y2 <= y1` covers nothing.

use core::fmt;

/// An axis-aligned rectangle on the integer pixel grid, half-open on both axes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x1: i32,
    /// Top edge (inclusive).
    pub y1: i32,
    /// Right edge (exclusive).
    pub x2: i32,
    /// Bottom edge (exclusive).
    pub y2: i32,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const EMPTY: Self = Self {
        x1: 0,
        y1: 0,
        x2: 0,
        y2: 0,
    };

    /// A rect large enough to contain any on-screen geometry. Stand-in for
    /// "no clipping" when a region argument is required.
    pub const EVERYTHING: Self = Self {
        x1: -(1 << 24),
        y1: -(1 << 24),
        x2: 1 << 24,
        y2: 1 << 24,
    };

    /// Creates a rectangle from its four edges.
    #[inline]
    #[must_use]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Creates a rectangle from an origin and a size.
    #[inline]
    #[must_use]
    pub const fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Width in pixels, zero for degenerate rects.
    #[inline]
    #[must_use]
    pub const fn width(self) -> i32 {
        if self.x2 > self.x1 { self.x2 - self.x1 } else { 0 }
    }

    /// Height in pixels, zero for degenerate rects.
    #[inline]
    #[must_use]
    pub const fn height(self) -> i32 {
        if self.y2 > self.y1 { self.y2 - self.y1 } else { 0 }
    }

    /// Number of pixels covered.
    #[inline]
    #[must_use]
    pub const fn area(self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    /// Whether the pixel `(x, y)` is inside.
    #[inline]
    #[must_use]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }

    /// Whether `other` is entirely inside `self`. Empty rects are contained
    /// everywhere.
    #[inline]
    #[must_use]
    pub const fn contains_rect(self, other: Self) -> bool {
        other.is_empty()
            || (other.x1 >= self.x1
                && other.x2 <= self.x2
                && other.y1 >= self.y1
                && other.y2 <= self.y2)
    }

    /// Whether the two rects share at least one pixel.
    #[inline]
    #[must_use]
    pub const fn overlaps(self, other: Self) -> bool {
        self.x1 < other.x2 && other.x1 < self.x2 && self.y1 < other.y2 && other.y1 < self.y2
    }

    /// The overlapping area of two rects. Degenerate (empty) when they are
    /// disjoint.
    #[inline]
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            x1: if self.x1 > other.x1 { self.x1 } else { other.x1 },
            y1: if self.y1 > other.y1 { self.y1 } else { other.y1 },
            x2: if self.x2 < other.x2 { self.x2 } else { other.x2 },
            y2: if self.y2 < other.y2 { self.y2 } else { other.y2 },
        }
    }

    /// The smallest rect covering both inputs. Empty inputs contribute
    /// nothing.
    #[must_use]
    pub const fn union_bounds(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self {
            x1: if self.x1 < other.x1 { self.x1 } else { other.x1 },
            y1: if self.y1 < other.y1 { self.y1 } else { other.y1 },
            x2: if self.x2 > other.x2 { self.x2 } else { other.x2 },
            y2: if self.y2 > other.y2 { self.y2 } else { other.y2 },
        }
    }

    /// The rect shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// The rect grown by the given margins on each side.
    #[inline]
    #[must_use]
    pub const fn expanded(self, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x1: self.x1 - left,
            y1: self.y1 - top,
            x2: self.x2 + right,
            y2: self.y2 + bottom,
        }
    }

    /// Converts to a float rect for geometry math.
    #[inline]
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x1),
            f64::from(self.y1),
            f64::from(self.x2),
            f64::from(self.y2),
        )
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect({}..{}, {}..{})",
            self.x1, self.x2, self.y1, self.y2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_detection() {
        assert!(Rect::EMPTY.is_empty());
        assert!(Rect::new(5, 5, 5, 10).is_empty());
        assert!(Rect::new(5, 5, 3, 10).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn half_open_containment() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(0, 0));
        assert!(r.contains(9, 9));
        assert!(!r.contains(10, 0));
        assert!(!r.contains(0, 10));
    }

    #[test]
    fn intersection_of_overlapping() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 15, 15);
        assert_eq!(a.intersection(b), Rect::new(5, 5, 10, 10));
        assert!(a.overlaps(b));
    }

    #[test]
    fn intersection_of_disjoint_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 20, 10);
        // Touching edges share no pixels.
        assert!(a.intersection(b).is_empty());
        assert!(!a.overlaps(b));
    }

    #[test]
    fn union_bounds_skips_empty() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.union_bounds(Rect::EMPTY), a);
        assert_eq!(Rect::EMPTY.union_bounds(a), a);
        let b = Rect::new(20, 20, 30, 30);
        assert_eq!(a.union_bounds(b), Rect::new(0, 0, 30, 30));
    }

    #[test]
    fn translate_and_expand() {
        let r = Rect::new(1, 2, 3, 4);
        assert_eq!(r.translated(10, 20), Rect::new(11, 22, 13, 24));
        assert_eq!(r.expanded(1, 2, 3, 4), Rect::new(0, 0, 6, 8));
    }

    #[test]
    fn area_of_degenerate_is_zero() {
        assert_eq!(Rect::new(5, 5, 0, 0).area(), 0);
        assert_eq!(Rect::new(0, 0, 4, 3).area(), 12);
    }

    #[test]
    fn everything_contains_screen_coordinates() {
        assert!(Rect::EVERYTHING.contains_rect(Rect::new(-10_000, -10_000, 100_000, 100_000)));
        assert!(Rect::EVERYTHING.area() > 0);
    }
}
