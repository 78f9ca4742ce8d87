// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-window painting attributes.

/// How a window's pixels are modulated when painted.
///
/// The three intensities are normalized to `0.0..=1.0` where `1.0` means
/// "leave the pixel alone". The scale and translate pair positions the
/// window for offset or transformed painting and leaves colors untouched.
/// Effects tweak a *copy* of the stored attributes on the way into a paint
/// pass; the stored values describe the window's steady state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintAttrib {
    /// Blend weight of the window over what is behind it.
    pub opacity: f32,
    /// Multiplier on color intensity. `0.0` paints black.
    pub brightness: f32,
    /// Color retention. `0.0` paints grayscale.
    pub saturation: f32,
    /// Horizontal scale applied when the window itself is transformed.
    pub x_scale: f32,
    /// Vertical scale applied when the window itself is transformed.
    pub y_scale: f32,
    /// Horizontal displacement for offset or transformed painting.
    pub x_translate: f32,
    /// Vertical displacement for offset or transformed painting.
    pub y_translate: f32,
}

impl PaintAttrib {
    /// Fully opaque, full brightness, full color, untransformed.
    pub const OPAQUE: Self = Self {
        opacity: 1.0,
        brightness: 1.0,
        saturation: 1.0,
        x_scale: 1.0,
        y_scale: 1.0,
        x_translate: 0.0,
        y_translate: 0.0,
    };

    /// Whether painting with these attributes hides everything behind the
    /// painted pixels.
    #[inline]
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.opacity >= 1.0
    }

    /// Whether the scale or translate components displace the window from
    /// its stacking-order position.
    #[inline]
    #[must_use]
    pub fn is_displaced(&self) -> bool {
        self.x_scale != 1.0
            || self.y_scale != 1.0
            || self.x_translate != 0.0
            || self.y_translate != 0.0
    }

    /// The attributes with opacity scaled by `factor`, for fade effects.
    #[inline]
    #[must_use]
    pub fn faded(mut self, factor: f32) -> Self {
        self.opacity *= factor;
        self
    }

    /// The attributes with the given displacement, for offset painting.
    #[inline]
    #[must_use]
    pub fn displaced(mut self, dx: f32, dy: f32) -> Self {
        self.x_translate = dx;
        self.y_translate = dy;
        self
    }
}

impl Default for PaintAttrib {
    #[inline]
    fn default() -> Self {
        Self::OPAQUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_opaque() {
        assert_eq!(PaintAttrib::default(), PaintAttrib::OPAQUE);
        assert!(PaintAttrib::OPAQUE.is_opaque());
        assert!(!PaintAttrib::OPAQUE.is_displaced());
    }

    #[test]
    fn faded_scales_only_opacity() {
        let a = PaintAttrib::OPAQUE.faded(0.25);
        assert_eq!(a.opacity, 0.25);
        assert_eq!(a.brightness, 1.0);
        assert_eq!(a.saturation, 1.0);
        assert!(!a.is_opaque());
    }

    #[test]
    fn displaced_sets_translation() {
        let a = PaintAttrib::OPAQUE.displaced(100.0, 0.0);
        assert!(a.is_displaced());
        assert_eq!(a.x_translate, 100.0);
        assert_eq!(a.opacity, 1.0);

        let scaled = PaintAttrib {
            x_scale: 0.5,
            ..PaintAttrib::OPAQUE
        };
        assert!(scaled.is_displaced());
    }
}
