// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accumulated damage between frames.

use imbricate_core::output::Output;
use imbricate_core::rect::Rect;
use imbricate_core::region::Region;

/// Screen area that needs repainting.
///
/// Damage accumulates between frames and is resolved against an output at
/// the start of a paint. A fresh ledger is [`Full`](Self::Full) so the
/// first frame always paints everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Damage {
    /// The entire screen needs repainting.
    #[default]
    Full,
    /// Only the contained region needs repainting.
    Region(Region),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl Damage {
    /// Returns `true` if nothing needs repainting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Adds one damaged rectangle to the ledger.
    pub fn add_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        match self {
            Self::Full => {}
            Self::Region(region) => *region = region.union(&Region::from_rect(rect)),
            Self::None => *self = Self::Region(Region::from_rect(rect)),
        }
    }

    /// Merges another damage ledger into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Region(a), Self::Region(b)) => *self = Self::Region(a.union(b)),
        }
    }

    /// Clamps the ledger to one output.
    ///
    /// Returns the region of `output` to repaint, or `None` when the
    /// output is untouched and its previous frame can stand.
    #[must_use]
    pub fn resolve(&self, output: &Output) -> Option<Region> {
        match self {
            Self::Full => Some(output.region()),
            Self::Region(region) => {
                let clamped = region.intersect_rect(output.rect);
                if clamped.is_empty() { None } else { Some(clamped) }
            }
            Self::None => None,
        }
    }

    /// Consumes the accumulated damage, leaving the ledger empty.
    pub fn take(&mut self) -> Self {
        core::mem::replace(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use imbricate_core::output::OutputId;

    use super::*;

    fn output() -> Output {
        Output { id: OutputId(0), rect: Rect::new(0, 0, 100, 80) }
    }

    #[test]
    fn fresh_ledger_is_full() {
        let damage = Damage::default();
        assert_eq!(damage.resolve(&output()), Some(Region::from_rect(Rect::new(0, 0, 100, 80))));
    }

    #[test]
    fn add_rect_accumulates() {
        let mut damage = Damage::None;
        damage.add_rect(Rect::new(0, 0, 10, 10));
        damage.add_rect(Rect::new(10, 0, 20, 10));
        assert_eq!(
            damage.resolve(&output()),
            Some(Region::from_rect(Rect::new(0, 0, 20, 10))),
        );
    }

    #[test]
    fn add_rect_on_full_stays_full() {
        let mut damage = Damage::Full;
        damage.add_rect(Rect::new(0, 0, 1, 1));
        assert_eq!(damage, Damage::Full);
    }

    #[test]
    fn empty_rect_is_ignored() {
        let mut damage = Damage::None;
        damage.add_rect(Rect::new(5, 5, 5, 9));
        assert!(damage.is_empty());
    }

    #[test]
    fn merge_table() {
        let region = Damage::Region(Region::from_rect(Rect::new(0, 0, 10, 10)));

        let mut d = Damage::None;
        d.merge(&region);
        assert_eq!(d, region);

        d.merge(&Damage::None);
        assert_eq!(d, region);

        d.merge(&Damage::Full);
        assert_eq!(d, Damage::Full);

        let mut a = Damage::Region(Region::from_rect(Rect::new(0, 0, 10, 10)));
        let b = Damage::Region(Region::from_rect(Rect::new(10, 0, 20, 10)));
        a.merge(&b);
        assert_eq!(a, Damage::Region(Region::from_rect(Rect::new(0, 0, 20, 10))));
    }

    #[test]
    fn resolve_clamps_to_output() {
        let mut damage = Damage::None;
        damage.add_rect(Rect::new(90, 70, 200, 200));
        assert_eq!(
            damage.resolve(&output()),
            Some(Region::from_rect(Rect::new(90, 70, 100, 80))),
        );
    }

    #[test]
    fn damage_outside_output_resolves_to_none() {
        let mut damage = Damage::None;
        damage.add_rect(Rect::new(200, 0, 300, 50));
        assert_eq!(damage.resolve(&output()), None);
    }

    #[test]
    fn take_drains_the_ledger() {
        let mut damage = Damage::Full;
        assert_eq!(damage.take(), Damage::Full);
        assert!(damage.is_empty());
    }
}
