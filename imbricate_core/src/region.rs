// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel-exact screen regions as sets of non-overlapping rectangles.
//!
//! A [`Region`] is kept in *band form*: its rectangles are organized into
//! horizontal bands sharing the same `y1..y2` extent, sorted top-to-bottom
//! and left-to-right within a band, with no two rects overlapping and
//! horizontally touching rects merged. Two bands that are vertically
//! adjacent never hold identical span layouts (they would have been merged
//! into one taller band).
//!
//! Because that form is canonical, two regions cover the same pixel set if
//! and only if their rect vectors compare equal, which is what makes
//! visibility bookkeeping (`visible == shape minus everything above`)
//! testable by plain `==`.
//!
//! The binary operators all run the same sweep: the y axis is cut at every
//! band edge of either operand, the per-slice x spans of both operands are
//! combined, and emitted bands are re-merged with their predecessor when the
//! span layout repeats.

use alloc::vec::Vec;

use crate::rect::Rect;

/// A set of pixels, stored as non-overlapping rects in canonical band form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Region {
    rects: Vec<Rect>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Op {
    Union,
    Intersect,
    Subtract,
}

impl Region {
    /// Creates an empty region.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Creates a region covering a single rect. Degenerate rects produce the
    /// empty region.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        let mut rects = Vec::new();
        if !rect.is_empty() {
            rects.push(rect);
        }
        Self { rects }
    }

    /// Creates a region covering the union of the given rects.
    #[must_use]
    pub fn from_rects(rects: &[Rect]) -> Self {
        let mut region = Self::new();
        for &r in rects {
            region = region.union_rect(r);
        }
        region
    }

    /// Whether the region covers no pixels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Number of rects in the canonical decomposition.
    #[inline]
    #[must_use]
    pub fn rect_count(&self) -> usize {
        self.rects.len()
    }

    /// The rects in canonical scan order (top-to-bottom, left-to-right).
    #[inline]
    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// The smallest rect enclosing the region, [`Rect::EMPTY`] when empty.
    #[must_use]
    pub fn bounding_rect(&self) -> Rect {
        let Some(first) = self.rects.first() else {
            return Rect::EMPTY;
        };
        let last = self.rects[self.rects.len() - 1];
        let mut x1 = i32::MAX;
        let mut x2 = i32::MIN;
        for r in &self.rects {
            x1 = x1.min(r.x1);
            x2 = x2.max(r.x2);
        }
        Rect::new(x1, first.y1, x2, last.y2)
    }

    /// Returns the single rect when the region is exactly one rect.
    #[inline]
    #[must_use]
    pub fn as_single_rect(&self) -> Option<Rect> {
        match self.rects.as_slice() {
            [r] => Some(*r),
            _ => None,
        }
    }

    /// Total number of pixels covered.
    #[must_use]
    pub fn area(&self) -> u64 {
        self.rects.iter().map(|r| r.area()).sum()
    }

    /// Whether the pixel `(x, y)` is covered.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|r| r.contains(x, y))
    }

    /// Whether the region and `rect` share at least one pixel.
    #[must_use]
    pub fn overlaps_rect(&self, rect: Rect) -> bool {
        !rect.is_empty() && self.rects.iter().any(|r| r.overlaps(rect))
    }

    /// Set union.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        combine(self, other, Op::Union)
    }

    /// Set intersection.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        combine(self, other, Op::Intersect)
    }

    /// Set difference: pixels of `self` not covered by `other`.
    #[must_use]
    pub fn subtract(&self, other: &Self) -> Self {
        combine(self, other, Op::Subtract)
    }

    /// Union with a single rect.
    #[must_use]
    pub fn union_rect(&self, rect: Rect) -> Self {
        self.union(&Self::from_rect(rect))
    }

    /// Intersection with a single rect.
    #[must_use]
    pub fn intersect_rect(&self, rect: Rect) -> Self {
        self.intersect(&Self::from_rect(rect))
    }

    /// Difference with a single rect.
    #[must_use]
    pub fn subtract_rect(&self, rect: Rect) -> Self {
        self.subtract(&Self::from_rect(rect))
    }

    /// Shifts every rect by `(dx, dy)` in place. Band form is translation
    /// invariant, so no renormalization happens.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for r in &mut self.rects {
            *r = r.translated(dx, dy);
        }
    }

    /// The region shifted by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        let mut out = self.clone();
        out.translate(dx, dy);
        out
    }

    /// Empties the region, keeping its allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.rects.clear();
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

fn combine(a: &Region, b: &Region, op: Op) -> Region {
    // Cheap outcomes that need no sweep.
    match op {
        Op::Union => {
            if a.is_empty() {
                return b.clone();
            }
            if b.is_empty() {
                return a.clone();
            }
        }
        Op::Intersect => {
            if a.is_empty()
                || b.is_empty()
                || !a.bounding_rect().overlaps(b.bounding_rect())
            {
                return Region::new();
            }
        }
        Op::Subtract => {
            if a.is_empty() {
                return Region::new();
            }
            if b.is_empty() || !a.bounding_rect().overlaps(b.bounding_rect()) {
                return a.clone();
            }
        }
    }

    // Cut the y axis at every band edge of either operand. Each resulting
    // slice lies entirely inside or entirely outside any given band.
    let mut edges: Vec<i32> = Vec::with_capacity((a.rects.len() + b.rects.len()) * 2);
    for r in &a.rects {
        edges.push(r.y1);
        edges.push(r.y2);
    }
    for r in &b.rects {
        edges.push(r.y1);
        edges.push(r.y2);
    }
    edges.sort_unstable();
    edges.dedup();

    let mut out: Vec<Rect> = Vec::new();
    let mut band_start = 0_usize;
    let mut cursor_a = 0_usize;
    let mut cursor_b = 0_usize;
    let mut spans: Vec<(i32, i32)> = Vec::new();

    for pair in edges.windows(2) {
        let (top, bottom) = (pair[0], pair[1]);
        let in_a = band_slice(&a.rects, &mut cursor_a, top);
        let in_b = band_slice(&b.rects, &mut cursor_b, top);
        spans.clear();
        match op {
            Op::Union => union_spans(in_a, in_b, &mut spans),
            Op::Intersect => intersect_spans(in_a, in_b, &mut spans),
            Op::Subtract => subtract_spans(in_a, in_b, &mut spans),
        }
        push_band(&mut out, &mut band_start, top, bottom, &spans);
    }

    Region { rects: out }
}

/// Returns the rects of the band covering the slice starting at `top`, or an
/// empty slice when no band covers it. `cursor` only moves forward; callers
/// must present non-decreasing `top` values.
fn band_slice<'r>(rects: &'r [Rect], cursor: &mut usize, top: i32) -> &'r [Rect] {
    while *cursor < rects.len() && rects[*cursor].y2 <= top {
        *cursor += 1;
    }
    let start = *cursor;
    if start >= rects.len() || rects[start].y1 > top {
        return &[];
    }
    let band_y = rects[start].y1;
    let mut end = start;
    while end < rects.len() && rects[end].y1 == band_y {
        end += 1;
    }
    &rects[start..end]
}

/// Merges the x spans of two bands, combining overlapping and touching spans.
fn union_spans(a: &[Rect], b: &[Rect], out: &mut Vec<(i32, i32)>) {
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        let take_a = j >= b.len() || (i < a.len() && a[i].x1 <= b[j].x1);
        let (x1, x2) = if take_a {
            let r = a[i];
            i += 1;
            (r.x1, r.x2)
        } else {
            let r = b[j];
            j += 1;
            (r.x1, r.x2)
        };
        match out.last_mut() {
            Some(last) if x1 <= last.1 => {
                if x2 > last.1 {
                    last.1 = x2;
                }
            }
            _ => out.push((x1, x2)),
        }
    }
}

fn intersect_spans(a: &[Rect], b: &[Rect], out: &mut Vec<(i32, i32)>) {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let lo = a[i].x1.max(b[j].x1);
        let hi = a[i].x2.min(b[j].x2);
        if lo < hi {
            out.push((lo, hi));
        }
        if a[i].x2 < b[j].x2 {
            i += 1;
        } else {
            j += 1;
        }
    }
}

fn subtract_spans(a: &[Rect], b: &[Rect], out: &mut Vec<(i32, i32)>) {
    let mut j = 0;
    for r in a {
        let mut cur = r.x1;
        // Spans ending at or before `cur` cannot carve this or any later span.
        while j < b.len() && b[j].x2 <= cur {
            j += 1;
        }
        let mut k = j;
        while cur < r.x2 && k < b.len() && b[k].x1 < r.x2 {
            if b[k].x1 > cur {
                out.push((cur, b[k].x1));
            }
            cur = cur.max(b[k].x2);
            k += 1;
        }
        if cur < r.x2 {
            out.push((cur, r.x2));
        }
    }
}

/// Appends one band of spans, merging into the previous band when its span
/// layout matches and the bands are vertically adjacent.
fn push_band(out: &mut Vec<Rect>, band_start: &mut usize, top: i32, bottom: i32, spans: &[(i32, i32)]) {
    if spans.is_empty() {
        return;
    }
    let prev_len = out.len() - *band_start;
    if prev_len == spans.len()
        && out[*band_start].y2 == top
        && out[*band_start..]
            .iter()
            .zip(spans)
            .all(|(r, &(x1, x2))| r.x1 == x1 && r.x2 == x2)
    {
        for r in &mut out[*band_start..] {
            r.y2 = bottom;
        }
        return;
    }
    *band_start = out.len();
    for &(x1, x2) in spans {
        out.push(Rect::new(x1, top, x2, bottom));
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn empty_region_basics() {
        let r = Region::new();
        assert!(r.is_empty());
        assert_eq!(r.rect_count(), 0);
        assert_eq!(r.bounding_rect(), Rect::EMPTY);
        assert_eq!(r.area(), 0);
        assert_eq!(Region::from_rect(Rect::new(3, 3, 3, 9)), Region::new());
    }

    #[test]
    fn single_rect_round_trip() {
        let rect = Rect::new(1, 2, 7, 9);
        let r = Region::from_rect(rect);
        assert_eq!(r.rects(), &[rect]);
        assert_eq!(r.as_single_rect(), Some(rect));
        assert_eq!(r.bounding_rect(), rect);
        assert_eq!(r.area(), rect.area());
    }

    #[test]
    fn union_of_disjoint_keeps_scan_order() {
        let low = Rect::new(0, 20, 10, 30);
        let high = Rect::new(5, 0, 15, 10);
        let r = Region::from_rect(low).union_rect(high);
        // Top-to-bottom regardless of build order.
        assert_eq!(r.rects(), &[high, low]);
    }

    #[test]
    fn union_merges_touching_spans() {
        let a = Rect::new(0, 0, 5, 10);
        let b = Rect::new(5, 0, 10, 10);
        let r = Region::from_rect(a).union_rect(b);
        assert_eq!(r.rects(), &[Rect::new(0, 0, 10, 10)]);
    }

    #[test]
    fn union_coalesces_stacked_bands() {
        let top = Rect::new(0, 0, 10, 5);
        let bottom = Rect::new(0, 5, 10, 12);
        let r = Region::from_rect(top).union_rect(bottom);
        assert_eq!(r.rects(), &[Rect::new(0, 0, 10, 12)]);
    }

    #[test]
    fn union_of_offset_overlap_forms_bands() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 15, 15);
        let r = Region::from_rect(a).union_rect(b);
        assert_eq!(
            r.rects(),
            &[
                Rect::new(0, 0, 10, 5),
                Rect::new(0, 5, 15, 10),
                Rect::new(5, 10, 15, 15),
            ]
        );
        assert_eq!(r.area(), a.area() + b.area() - a.intersection(b).area());
    }

    #[test]
    fn intersect_of_overlapping() {
        let a = Region::from_rect(Rect::new(0, 0, 10, 10));
        let b = Region::from_rect(Rect::new(5, 5, 15, 15));
        assert_eq!(a.intersect(&b).rects(), &[Rect::new(5, 5, 10, 10)]);
    }

    #[test]
    fn intersect_of_disjoint_is_empty() {
        let a = Region::from_rect(Rect::new(0, 0, 10, 10));
        let b = Region::from_rect(Rect::new(30, 30, 40, 40));
        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn subtract_punches_hole() {
        let outer = Region::from_rect(Rect::new(0, 0, 10, 10));
        let hole = Region::from_rect(Rect::new(2, 2, 8, 8));
        let frame = outer.subtract(&hole);
        assert_eq!(
            frame.rects(),
            &[
                Rect::new(0, 0, 10, 2),
                Rect::new(0, 2, 2, 8),
                Rect::new(8, 2, 10, 8),
                Rect::new(0, 8, 10, 10),
            ]
        );
        assert_eq!(frame.area(), outer.area() - hole.area());
    }

    #[test]
    fn subtract_everything_empties() {
        let a = Region::from_rect(Rect::new(3, 3, 7, 7));
        let cover = Region::from_rect(Rect::new(0, 0, 10, 10));
        assert!(a.subtract(&cover).is_empty());
    }

    #[test]
    fn subtract_of_disjoint_is_identity() {
        let a = Region::from_rects(&[Rect::new(0, 0, 5, 5), Rect::new(10, 0, 15, 5)]);
        let far = Region::from_rect(Rect::new(0, 100, 5, 105));
        assert_eq!(a.subtract(&far), a);
    }

    #[test]
    fn subtract_span_straddling_two_rects() {
        // One subtrahend span overlaps both spans of the band.
        let a = Region::from_rects(&[Rect::new(0, 0, 4, 2), Rect::new(6, 0, 10, 2)]);
        let b = Region::from_rect(Rect::new(3, 0, 7, 2));
        assert_eq!(
            a.subtract(&b).rects(),
            &[Rect::new(0, 0, 3, 2), Rect::new(7, 0, 10, 2)]
        );
    }

    #[test]
    fn set_algebra_laws() {
        let a = Region::from_rects(&[Rect::new(0, 0, 10, 10), Rect::new(20, 5, 30, 9)]);
        let b = Region::from_rect(Rect::new(5, 5, 25, 7));
        assert!(a.subtract(&a).is_empty());
        assert_eq!(a.union(&b).intersect(&a), a);
        assert_eq!(a.subtract(&Region::new()), a);
    }

    #[test]
    fn canonical_form_ignores_build_order() {
        let pieces = [
            Rect::new(5, 5, 15, 15),
            Rect::new(0, 0, 10, 10),
            Rect::new(20, 0, 25, 25),
        ];
        let forward = Region::from_rects(&pieces);
        let reversed = {
            let mut rev = pieces;
            rev.reverse();
            Region::from_rects(&rev)
        };
        assert_eq!(forward, reversed);
    }

    #[test]
    fn set_identity_a_equals_diff_plus_intersection() {
        let a = Region::from_rects(&[Rect::new(0, 0, 10, 10), Rect::new(5, 10, 15, 20)]);
        let b = Region::from_rects(&[Rect::new(4, 4, 12, 12)]);
        let rebuilt = a.subtract(&b).union(&a.intersect(&b));
        assert_eq!(rebuilt, a);
    }

    #[test]
    fn union_absorbs_subset() {
        let a = Region::from_rect(Rect::new(0, 0, 20, 20));
        let inner = Region::from_rect(Rect::new(5, 5, 10, 10));
        assert_eq!(a.union(&inner), a);
        assert_eq!(a.intersect(&inner), inner);
    }

    #[test]
    fn translate_shifts_all_rects() {
        let mut r = Region::from_rects(&[Rect::new(0, 0, 5, 5), Rect::new(10, 10, 15, 15)]);
        r.translate(-3, 7);
        assert_eq!(
            r.rects(),
            &[Rect::new(-3, 7, 2, 12), Rect::new(7, 17, 12, 22)]
        );
    }

    #[test]
    fn bounding_rect_spans_all_bands() {
        let r = Region::from_rects(&[Rect::new(2, 0, 5, 5), Rect::new(-4, 10, 1, 12)]);
        assert_eq!(r.bounding_rect(), Rect::new(-4, 0, 5, 12));
    }

    #[test]
    fn contains_point_across_bands() {
        let r = Region::from_rect(Rect::new(0, 0, 10, 10))
            .subtract_rect(Rect::new(2, 2, 8, 8));
        assert!(r.contains(0, 0));
        assert!(r.contains(9, 5));
        assert!(!r.contains(5, 5));
        assert!(!r.contains(10, 0));
    }

    #[test]
    fn intersect_rect_clips() {
        let r = Region::from_rects(&[Rect::new(0, 0, 10, 10), Rect::new(20, 0, 30, 10)]);
        let clipped = r.intersect_rect(Rect::new(5, 2, 25, 8));
        assert_eq!(
            clipped.rects(),
            &[Rect::new(5, 2, 10, 8), Rect::new(20, 2, 25, 8)]
        );
    }

    #[test]
    fn overlaps_rect_checks_actual_coverage() {
        let frame = Region::from_rect(Rect::new(0, 0, 10, 10))
            .subtract_rect(Rect::new(2, 2, 8, 8));
        // Fully inside the hole.
        assert!(!frame.overlaps_rect(Rect::new(4, 4, 6, 6)));
        assert!(frame.overlaps_rect(Rect::new(4, 0, 6, 3)));
        assert!(!frame.overlaps_rect(Rect::EMPTY));
    }

    #[test]
    fn from_rects_merges_overlaps() {
        let r = Region::from_rects(&[
            Rect::new(0, 0, 10, 10),
            Rect::new(0, 0, 10, 10),
            Rect::new(0, 5, 10, 15),
        ]);
        assert_eq!(r.rects(), &[Rect::new(0, 0, 10, 15)]);
    }

    #[test]
    fn three_way_band_interaction() {
        let a = Region::from_rects(&[
            Rect::new(0, 0, 3, 9),
            Rect::new(6, 0, 9, 9),
        ]);
        let b = Region::from_rect(Rect::new(0, 3, 9, 6));
        let joined = a.union(&b);
        assert_eq!(
            joined.rects(),
            &[
                Rect::new(0, 0, 3, 3),
                Rect::new(6, 0, 9, 3),
                Rect::new(0, 3, 9, 6),
                Rect::new(0, 6, 3, 9),
                Rect::new(6, 6, 9, 9),
            ]
        );
        let vec_check: Vec<Rect> = joined.rects().to_vec();
        assert_eq!(vec_check.len(), 5);
        assert_eq!(joined.area(), a.area() + b.area() - a.intersect(&b).area());
        assert_eq!(joined.subtract(&b), a.subtract(&b));
    }

    #[test]
    fn clear_keeps_region_usable() {
        let mut r = Region::from_rect(Rect::new(0, 0, 4, 4));
        r.clear();
        assert!(r.is_empty());
        let again = r.union_rect(Rect::new(1, 1, 2, 2));
        assert_eq!(again.as_single_rect(), Some(Rect::new(1, 1, 2, 2)));
    }

    #[test]
    fn vec_of_regions_compare() {
        let rs = vec![Region::new(), Region::from_rect(Rect::new(0, 0, 1, 1))];
        assert_ne!(rs[0], rs[1]);
    }
}
