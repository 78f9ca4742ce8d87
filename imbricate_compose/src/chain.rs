// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The painting override chain.
//!
//! Effects intercept painting by registering a [`PaintHook`]. Every entry
//! point (output pass, window pass, window draw, texture draw, geometry
//! accumulation) dispatches through the chain: the most recently registered
//! hook runs first, each hook forwards through the [`Link`] it is handed
//! (or doesn't, replacing the behavior outright), and the chain bottoms out
//! in the engine's own implementation.
//!
//! When the engine re-enters an entry point from inside another one
//! (painting each window from inside an output pass, say), the nested call
//! starts the chain over from the top. A hook therefore sees every window
//! pass, including those triggered by another hook calling onward.

use alloc::boxed::Box;

use imbricate_core::attrib::PaintAttrib;
use imbricate_core::mask::PaintMask;
use imbricate_core::matrix::TextureMatrix;
use imbricate_core::output::Output;
use imbricate_core::region::Region;
use imbricate_core::texture::TexturePlate;
use imbricate_core::transform::Transform;
use imbricate_core::window::WindowId;
use imbricate_render::TileLimits;

use crate::device::Device;
use crate::engine::CorePaint;

/// An interceptor for painting entry points.
///
/// Every method defaults to forwarding down the chain unchanged; a hook
/// overrides only the entry points it cares about. Hooks are held behind
/// shared references for the duration of a frame, so any per-hook state
/// lives behind interior mutability.
pub trait PaintHook {
    /// One output's paint pass. Returning `false` reports that the pass
    /// could not honor the requested region; the frame retries it as a
    /// full repaint.
    fn paint_output(
        &self,
        core: &mut CorePaint<'_>,
        device: &mut dyn Device,
        chain: Link<'_>,
        transform: &Transform,
        region: &Region,
        output: &Output,
        mask: PaintMask,
    ) -> bool {
        chain.paint_output(core, device, transform, region, output, mask)
    }

    /// One window's paint pass. Under an occlusion probe the return value
    /// answers "would this window cover `region` opaquely?"; otherwise it
    /// reports whether the window painted.
    fn paint_window(
        &self,
        core: &mut CorePaint<'_>,
        device: &mut dyn Device,
        chain: Link<'_>,
        window: WindowId,
        attrib: &PaintAttrib,
        transform: &Transform,
        region: &Region,
        mask: PaintMask,
    ) -> bool {
        chain.paint_window(core, device, window, attrib, transform, region, mask)
    }

    /// Geometry and texture submission for one window.
    fn draw_window(
        &self,
        core: &mut CorePaint<'_>,
        device: &mut dyn Device,
        chain: Link<'_>,
        window: WindowId,
        transform: &Transform,
        attrib: &PaintAttrib,
        region: &Region,
        mask: PaintMask,
    ) -> bool {
        chain.draw_window(core, device, window, transform, attrib, region, mask)
    }

    /// One textured draw of the accumulated geometry.
    fn draw_texture(
        &self,
        core: &mut CorePaint<'_>,
        device: &mut dyn Device,
        chain: Link<'_>,
        window: WindowId,
        plate: &TexturePlate,
        transform: &Transform,
        attrib: &PaintAttrib,
        mask: PaintMask,
    ) {
        chain.draw_texture(core, device, window, plate, transform, attrib, mask);
    }

    /// Tessellation of a window region into the frame's vertex batch.
    fn add_geometry(
        &self,
        core: &mut CorePaint<'_>,
        chain: Link<'_>,
        window: WindowId,
        matrices: &[TextureMatrix],
        region: &Region,
        clip: &Region,
        limits: TileLimits,
    ) {
        chain.add_geometry(core, window, matrices, region, clip, limits);
    }
}

/// A cursor into the hook chain.
///
/// Calling an entry point on a link runs the next hook, or the engine's
/// implementation once every hook has had its turn. Links are cheap copies;
/// a hook may call onward any number of times.
#[derive(Clone, Copy)]
pub struct Link<'c> {
    hooks: &'c [Box<dyn PaintHook>],
    depth: usize,
}

impl core::fmt::Debug for Link<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Link({}/{})", self.depth, self.hooks.len())
    }
}

impl<'c> Link<'c> {
    pub(crate) fn new(hooks: &'c [Box<dyn PaintHook>]) -> Self {
        Self { hooks, depth: 0 }
    }

    /// The hook this link dispatches to, newest registration first, plus
    /// the link it should forward through. `None` once the chain is spent.
    fn next(self) -> Option<(&'c dyn PaintHook, Self)> {
        let index = self.hooks.len().checked_sub(self.depth + 1)?;
        Some((
            self.hooks[index].as_ref(),
            Self {
                hooks: self.hooks,
                depth: self.depth + 1,
            },
        ))
    }

    /// The same chain rewound to the top, for nested entry points.
    fn restart(self) -> Self {
        Self {
            hooks: self.hooks,
            depth: 0,
        }
    }

    /// See [`PaintHook::paint_output`].
    pub fn paint_output(
        self,
        core: &mut CorePaint<'_>,
        device: &mut dyn Device,
        transform: &Transform,
        region: &Region,
        output: &Output,
        mask: PaintMask,
    ) -> bool {
        match self.next() {
            Some((hook, rest)) => {
                hook.paint_output(core, device, rest, transform, region, output, mask)
            }
            None => core.paint_output(device, self.restart(), transform, region, output, mask),
        }
    }

    /// See [`PaintHook::paint_window`].
    pub fn paint_window(
        self,
        core: &mut CorePaint<'_>,
        device: &mut dyn Device,
        window: WindowId,
        attrib: &PaintAttrib,
        transform: &Transform,
        region: &Region,
        mask: PaintMask,
    ) -> bool {
        match self.next() {
            Some((hook, rest)) => {
                hook.paint_window(core, device, rest, window, attrib, transform, region, mask)
            }
            None => {
                core.paint_window(device, self.restart(), window, attrib, transform, region, mask)
            }
        }
    }

    /// See [`PaintHook::draw_window`].
    pub fn draw_window(
        self,
        core: &mut CorePaint<'_>,
        device: &mut dyn Device,
        window: WindowId,
        transform: &Transform,
        attrib: &PaintAttrib,
        region: &Region,
        mask: PaintMask,
    ) -> bool {
        match self.next() {
            Some((hook, rest)) => {
                hook.draw_window(core, device, rest, window, transform, attrib, region, mask)
            }
            None => {
                core.draw_window(device, self.restart(), window, transform, attrib, region, mask)
            }
        }
    }

    /// See [`PaintHook::draw_texture`].
    pub fn draw_texture(
        self,
        core: &mut CorePaint<'_>,
        device: &mut dyn Device,
        window: WindowId,
        plate: &TexturePlate,
        transform: &Transform,
        attrib: &PaintAttrib,
        mask: PaintMask,
    ) {
        match self.next() {
            Some((hook, rest)) => {
                hook.draw_texture(core, device, rest, window, plate, transform, attrib, mask);
            }
            None => core.draw_texture(device, window, plate, transform, attrib, mask),
        }
    }

    /// See [`PaintHook::add_geometry`].
    pub fn add_geometry(
        self,
        core: &mut CorePaint<'_>,
        window: WindowId,
        matrices: &[TextureMatrix],
        region: &Region,
        clip: &Region,
        limits: TileLimits,
    ) {
        match self.next() {
            Some((hook, rest)) => {
                hook.add_geometry(core, rest, window, matrices, region, clip, limits);
            }
            None => core.add_geometry(window, matrices, region, clip, limits),
        }
    }
}
