// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scoped clipping of a paint pass to a target region.
//!
//! When a transformed output pass must stay inside a damage region, drawing
//! is bracketed by a [`ClipScope`]. The scope picks one of two mechanisms:
//!
//! - **Stencil**: rasterize the target region into the stencil buffer with
//!   color writes off, then restrict every following draw to pixels whose
//!   stencil value matches. Exact to the region's rects.
//! - **Planes**: bound drawing by four clip planes derived from the
//!   region's bounding rect, expressed relative to the output's center and
//!   half-extent. Cheaper, but concave regions are clipped only to their
//!   bounds.
//!
//! The scope restores the device state it touched when dropped, so every
//! exit path out of the enclosing pass, early returns included, tears the
//! clip down. Stencil and plane state never leak across output passes.

use core::fmt;

use imbricate_core::caps::GpuCaps;
use imbricate_core::output::Output;
use imbricate_core::rect::Rect;
use imbricate_core::region::Region;
use imbricate_core::transform::Transform;
use imbricate_render::{
    BlendMode, DrawCall, GeometryBatch, Shading, TileLimits, add_region,
};

use crate::device::{Device, DeviceError, StencilMode};

/// Stencil value marking pixels inside the scope's target region.
const CLIP_REF: u8 = 1;

/// Which clipping mechanism a scope uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClipStrategy {
    /// Per-pixel stencil mask covering the exact region.
    Stencil,
    /// Four clip planes around the region's bounding rect.
    Planes,
}

impl ClipStrategy {
    /// The mechanism this device profile supports.
    #[must_use]
    pub fn select(caps: &GpuCaps) -> Self {
        if caps.stencil_buffer {
            Self::Stencil
        } else {
            Self::Planes
        }
    }
}

/// Four half-planes in untransformed pixel space; the positive side of
/// every plane is kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipPlanes {
    planes: [[f64; 3]; 4],
}

impl ClipPlanes {
    /// Builds the four planes bounding `rect`, normalized by `output`'s
    /// center and half-extent.
    ///
    /// Plane order is left, right, top, bottom. Each plane evaluates to
    /// zero on its edge and to positive values inside the rect.
    #[must_use]
    pub fn around(rect: Rect, output: &Output) -> Self {
        let (cx, cy) = output.center();
        let (hw, hh) = output.half_extent();
        debug_assert!(hw > 0.0 && hh > 0.0, "clipping against a degenerate output");

        // Edge positions of the target in centered output coordinates.
        let u1 = (f64::from(rect.x1) - cx) / hw;
        let u2 = (f64::from(rect.x2) - cx) / hw;
        let v1 = (f64::from(rect.y1) - cy) / hh;
        let v2 = (f64::from(rect.y2) - cy) / hh;

        Self {
            planes: [
                [1.0 / hw, 0.0, -cx / hw - u1],
                [-1.0 / hw, 0.0, cx / hw + u2],
                [0.0, 1.0 / hh, -cy / hh - v1],
                [0.0, -1.0 / hh, cy / hh + v2],
            ],
        }
    }

    /// The plane coefficients, as `[a, b, c]` rows with the pixel kept when
    /// `a*x + b*y + c >= 0`.
    #[inline]
    #[must_use]
    pub fn coefficients(&self) -> &[[f64; 3]; 4] {
        &self.planes
    }

    /// Whether the point is on the kept side of all four planes.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.planes.iter().all(|p| p[0] * x + p[1] * y + p[2] >= 0.0)
    }
}

/// An active clip, bounding every draw issued through it.
///
/// Created by [`ClipScope::enable`]; drawing inside the scope goes through
/// [`device`](Self::device). Dropping the scope restores the device state.
pub struct ClipScope<'d> {
    device: &'d mut dyn Device,
    strategy: ClipStrategy,
}

impl fmt::Debug for ClipScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipScope")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl<'d> ClipScope<'d> {
    /// Establishes clipping of subsequent draws to `target`.
    ///
    /// The stencil strategy rasterizes `target` through `transform`, so the
    /// mask lands exactly where clipped geometry will. The plane strategy
    /// needs no transform: planes apply to untransformed coordinates.
    ///
    /// On error the device is left unclipped with color writes on.
    pub fn enable(
        device: &'d mut dyn Device,
        caps: &GpuCaps,
        target: &Region,
        output: &Output,
        transform: &Transform,
    ) -> Result<Self, DeviceError> {
        let strategy = ClipStrategy::select(caps);
        match strategy {
            ClipStrategy::Stencil => {
                device.clear_stencil(0);
                device.set_color_mask(false);
                device.set_stencil(StencilMode::Fill { reference: CLIP_REF });

                let mut mask = GeometryBatch::new();
                add_region(&mut mask, &[], target, target, TileLimits::UNBOUNDED);
                if !mask.is_empty() {
                    let fill = DrawCall {
                        batch: &mask,
                        textures: &[],
                        transform: *transform,
                        blend: BlendMode::Opaque,
                        shading: Shading::Flat([0.0; 4]),
                    };
                    if let Err(err) = device.draw(&fill) {
                        device.set_stencil(StencilMode::Off);
                        device.set_color_mask(true);
                        return Err(err);
                    }
                }

                device.set_color_mask(true);
                device.set_stencil(StencilMode::Test { reference: CLIP_REF });
            }
            ClipStrategy::Planes => {
                let planes = ClipPlanes::around(target.bounding_rect(), output);
                device.set_clip_planes(Some(&planes));
            }
        }
        Ok(Self { device, strategy })
    }

    /// The mechanism in effect.
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> ClipStrategy {
        self.strategy
    }

    /// The device, for draws bounded by this scope.
    #[inline]
    pub fn device(&mut self) -> &mut dyn Device {
        &mut *self.device
    }
}

impl Drop for ClipScope<'_> {
    fn drop(&mut self) {
        match self.strategy {
            ClipStrategy::Stencil => self.device.set_stencil(StencilMode::Off),
            ClipStrategy::Planes => self.device.set_clip_planes(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use imbricate_core::output::OutputId;

    use crate::testdev::{DeviceEvent, RecordingDevice};

    use super::*;

    fn output() -> Output {
        Output::new(OutputId(0), Rect::new(0, 0, 200, 100))
    }

    #[test]
    fn planes_match_rect_membership_at_pixel_centers() {
        let rect = Rect::new(30, 10, 90, 60);
        let planes = ClipPlanes::around(rect, &output());
        for y in 0..100 {
            for x in 0..200 {
                let center = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                assert_eq!(
                    planes.contains(center.0, center.1),
                    rect.contains(x, y),
                    "disagreement at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn planes_for_offset_output() {
        // Output not at the origin; the normalization must not skew edges.
        let out = Output::new(OutputId(1), Rect::new(200, 0, 400, 100));
        let rect = Rect::new(250, 20, 350, 80);
        let planes = ClipPlanes::around(rect, &out);
        assert!(planes.contains(250.5, 20.5));
        assert!(planes.contains(349.5, 79.5));
        assert!(!planes.contains(249.5, 50.0));
        assert!(!planes.contains(350.5, 50.0));
        assert!(!planes.contains(300.0, 19.5));
        assert!(!planes.contains(300.0, 80.5));
    }

    #[test]
    fn stencil_scope_sequences_device_state() {
        let mut dev = RecordingDevice::new();
        let target = Region::from_rect(Rect::new(0, 0, 50, 50));
        {
            let mut scope = ClipScope::enable(
                &mut dev,
                &GpuCaps::legacy(),
                &target,
                &output(),
                &Transform::IDENTITY,
            )
            .unwrap();
            assert_eq!(scope.strategy(), ClipStrategy::Stencil);
            // One draw inside the scope.
            let mut batch = GeometryBatch::new();
            add_region(&mut batch, &[], &target, &target, TileLimits::UNBOUNDED);
            scope
                .device()
                .draw(&DrawCall {
                    batch: &batch,
                    textures: &[],
                    transform: Transform::IDENTITY,
                    blend: BlendMode::Opaque,
                    shading: Shading::Flat([1.0, 0.0, 0.0, 1.0]),
                })
                .unwrap();
        }
        assert_eq!(
            dev.events,
            [
                DeviceEvent::ClearStencil(0),
                DeviceEvent::ColorMask(false),
                DeviceEvent::Stencil(StencilMode::Fill { reference: 1 }),
                DeviceEvent::Draw,
                DeviceEvent::ColorMask(true),
                DeviceEvent::Stencil(StencilMode::Test { reference: 1 }),
                DeviceEvent::Draw,
                DeviceEvent::Stencil(StencilMode::Off),
            ]
        );
    }

    #[test]
    fn plane_scope_installs_and_clears_planes() {
        let mut dev = RecordingDevice::new();
        let target = Region::from_rect(Rect::new(10, 10, 40, 40));
        {
            let scope = ClipScope::enable(
                &mut dev,
                &GpuCaps::minimal(),
                &target,
                &output(),
                &Transform::IDENTITY,
            )
            .unwrap();
            assert_eq!(scope.strategy(), ClipStrategy::Planes);
        }
        assert_eq!(
            dev.events,
            [DeviceEvent::Planes(true), DeviceEvent::Planes(false)]
        );
    }

    #[test]
    fn scope_tears_down_on_early_return() {
        fn bail_early(dev: &mut RecordingDevice) -> Option<()> {
            let target = Region::from_rect(Rect::new(0, 0, 10, 10));
            let _scope = ClipScope::enable(
                dev,
                &GpuCaps::legacy(),
                &target,
                &output(),
                &Transform::IDENTITY,
            )
            .ok()?;
            None?;
            Some(())
        }
        let mut dev = RecordingDevice::new();
        assert!(bail_early(&mut dev).is_none());
        assert_eq!(dev.events.last(), Some(&DeviceEvent::Stencil(StencilMode::Off)));
        assert_eq!(dev.stencil, StencilMode::Off);
        assert!(dev.color_mask);
    }

    #[test]
    fn failed_fill_restores_state_and_reports() {
        let mut dev = RecordingDevice::new();
        dev.fail_draws = true;
        let target = Region::from_rect(Rect::new(0, 0, 10, 10));
        let err = ClipScope::enable(
            &mut dev,
            &GpuCaps::legacy(),
            &target,
            &output(),
            &Transform::IDENTITY,
        )
        .err();
        assert_eq!(err, Some(DeviceError::UnsupportedDraw));
        assert_eq!(dev.stencil, StencilMode::Off);
        assert!(dev.color_mask);
    }
}
