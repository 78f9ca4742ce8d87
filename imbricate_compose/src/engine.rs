// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame compositing engine.
//!
//! [`Compositor`] owns the window store, the damage ledger, and the hook
//! chain, and drives one paint pass per touched output each frame. A pass
//! runs in three phases:
//!
//! 1. resolve accumulated damage into a repaint region, or skip the output
//!    when nothing on it changed;
//! 2. walk the stack topmost-first, asking each window through the hook
//!    chain whether it covers its clip opaquely, and record per-window
//!    visible regions;
//! 3. paint the background under whatever stayed uncovered, then each
//!    window bottom-to-top inside its recorded region.
//!
//! A topmost window covering a whole output on its own is flagged for
//! direct scanout and not composited; the flag is withdrawn, with damage,
//! on the first frame the window stops qualifying. The terminal
//! implementation of each painting entry point lives on [`CorePaint`];
//! hooks wrap these through [`Link`].

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use imbricate_core::attrib::PaintAttrib;
use imbricate_core::caps::GpuCaps;
use imbricate_core::mask::PaintMask;
use imbricate_core::matrix::TextureMatrix;
use imbricate_core::occlusion::{FrameClips, OcclusionTracker};
use imbricate_core::output::Output;
use imbricate_core::rect::Rect;
use imbricate_core::region::Region;
use imbricate_core::texture::{TextureDesc, TextureId, TexturePlate};
use imbricate_core::transform::Transform;
use imbricate_core::window::{WindowId, WindowStore};
use imbricate_render::{
    BlendMode, Damage, DrawCall, GeometryBatch, Shading, TileLimits, add_region,
};

use crate::chain::{Link, PaintHook};
use crate::clip::ClipScope;
use crate::device::Device;
use crate::report::{FrameReport, OutputReport, WindowPaint};
use crate::shading::{ShadingPath, blend_for, window_shading};

/// Modes under which per-window opaque coverage cannot be trusted, so the
/// occlusion walk is skipped and every window paints against the full
/// repaint region.
fn occlusion_disabled(mask: PaintMask) -> bool {
    mask.intersects(
        PaintMask::NO_OCCLUSION_DETECTION
            | PaintMask::TRANSFORMED
            | PaintMask::WITH_TRANSFORMED_WINDOWS,
    )
}

/// Rounds a fractional paint offset to whole pixels for region math.
#[expect(
    clippy::cast_possible_truncation,
    reason = "offsets are whole screen pixels, well inside i32 range"
)]
fn round_px(v: f32) -> i32 {
    (v + if v >= 0.0 { 0.5 } else { -0.5 }) as i32
}

/// The screen transform with a window's own scale and translation folded
/// in. Scaling is anchored at the window's frame origin, so an unscaled
/// untranslated window lands exactly where it would without this step.
fn window_transform(transform: &Transform, frame: Rect, attrib: &PaintAttrib) -> Transform {
    let (sx, sy) = (f64::from(attrib.x_scale), f64::from(attrib.y_scale));
    debug_assert!(sx != 0.0 && sy != 0.0, "window scaled to zero");
    let (fx, fy) = (f64::from(frame.x1), f64::from(frame.y1));
    let (tx, ty) = (f64::from(attrib.x_translate), f64::from(attrib.y_translate));
    *transform
        * Transform::from_translation(fx, fy, 0.0)
        * Transform::from_scale(sx, sy, 1.0)
        * Transform::from_translation(tx / sx - fx, ty / sy - fy, 0.0)
}

/// Union of all output rects.
fn screen_bounds(outputs: &[Output]) -> Rect {
    let mut bounds = Rect::EMPTY;
    for o in outputs {
        bounds = bounds.union_bounds(o.rect);
    }
    bounds
}

/// Sends one draw call, folding a device refusal into the report instead
/// of abandoning the frame.
fn submit(report: &mut OutputReport, device: &mut dyn Device, call: &DrawCall<'_>) {
    report.draw_calls += 1;
    if let Err(err) = device.draw(call) {
        report.draw_failures += 1;
        log::error!("draw call rejected: {err}");
    }
}

/// Capability shortfalls already reported this session. Each is logged
/// once; the corresponding fallback then applies silently.
#[derive(Debug, Default)]
struct WarnLatches {
    saturation: bool,
    region_clip: bool,
}

/// Device-side lifecycle of the configured background.
#[derive(Debug)]
enum BackgroundState {
    /// No image configured; the solid color paints.
    Color,
    /// An image is configured but not yet uploaded.
    Pending {
        desc: TextureDesc,
        pixels: Vec<u8>,
        matrix: TextureMatrix,
    },
    /// The image is resident on the device.
    Ready {
        texture: TextureId,
        matrix: TextureMatrix,
    },
    /// Upload failed; the solid color stands in for the session.
    Failed,
}

/// A windowed screen and the machinery to paint it.
///
/// The compositor owns everything that persists across frames: the
/// [`WindowStore`], accumulated [`Damage`], registered [`PaintHook`]s, and
/// the background. Painting one frame is a single call:
///
/// ```
/// # use imbricate_compose::{Compositor, Device};
/// # use imbricate_core::caps::GpuCaps;
/// # use imbricate_core::mask::PaintMask;
/// # use imbricate_core::output::{Output, OutputId};
/// # use imbricate_core::rect::Rect;
/// # use imbricate_core::transform::Transform;
/// # fn paint(device: &mut dyn Device) {
/// let mut compositor = Compositor::new(
///     GpuCaps::modern(),
///     vec![Output::new(OutputId(0), Rect::new(0, 0, 1920, 1080))],
/// );
/// let report = compositor.composite_frame(device, &Transform::IDENTITY, PaintMask::empty());
/// # let _ = report;
/// # }
/// ```
///
/// Windows are created and mutated through [`windows_mut`](Self::windows_mut)
/// between frames; window geometry must not change while a frame is being
/// painted, which the exclusive borrow enforces.
pub struct Compositor {
    caps: GpuCaps,
    path: ShadingPath,
    outputs: Vec<Output>,
    store: WindowStore,
    damage: Damage,
    clips: FrameClips,
    scratch: GeometryBatch,
    hooks: Vec<Box<dyn PaintHook>>,
    background: BackgroundState,
    background_color: [f32; 4],
    latches: WarnLatches,
    offset: (i32, i32),
}

impl fmt::Debug for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compositor")
            .field("caps", &self.caps)
            .field("path", &self.path)
            .field("outputs", &self.outputs)
            .field("windows", &self.store.window_count())
            .field("hooks", &self.hooks.len())
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Creates a compositor for the given device profile and outputs.
    ///
    /// The shading path is fixed from `caps` for the compositor's
    /// lifetime. A fresh compositor carries full damage, so the first
    /// frame paints everything.
    ///
    /// # Panics
    ///
    /// Panics if `outputs` is empty.
    #[must_use]
    pub fn new(caps: GpuCaps, outputs: Vec<Output>) -> Self {
        assert!(!outputs.is_empty(), "a compositor needs at least one output");
        Self {
            path: ShadingPath::select(&caps),
            caps,
            outputs,
            store: WindowStore::new(),
            damage: Damage::Full,
            clips: FrameClips::new(),
            scratch: GeometryBatch::new(),
            hooks: Vec::new(),
            background: BackgroundState::Color,
            background_color: [0.0, 0.0, 0.0, 1.0],
            latches: WarnLatches::default(),
            offset: (0, 0),
        }
    }

    /// The device profile this compositor paints for.
    #[must_use]
    pub fn caps(&self) -> &GpuCaps {
        &self.caps
    }

    /// How window paint attributes reach the device.
    #[must_use]
    pub fn shading_path(&self) -> ShadingPath {
        self.path
    }

    /// The outputs tiling the screen.
    #[must_use]
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Registers a paint hook. Hooks wrap every painting entry point,
    /// newest registration outermost.
    pub fn add_hook(&mut self, hook: Box<dyn PaintHook>) {
        self.hooks.push(hook);
    }

    // -- Windows and damage --

    /// Read access to the window store.
    #[must_use]
    pub fn windows(&self) -> &WindowStore {
        &self.store
    }

    /// Mutable access to the window store, for changes between frames.
    /// Whoever moves or restacks windows is responsible for damaging the
    /// affected area.
    pub fn windows_mut(&mut self) -> &mut WindowStore {
        &mut self.store
    }

    /// Marks one screen rectangle as needing repaint.
    pub fn damage_rect(&mut self, rect: Rect) {
        self.damage.add_rect(rect);
    }

    /// Marks a window's current frame and border as needing repaint.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn damage_window(&mut self, id: WindowId) {
        self.damage.add_rect(self.store.damage_rect(id));
    }

    /// Marks the whole screen as needing repaint.
    pub fn damage_all(&mut self) {
        self.damage = Damage::Full;
    }

    /// Damage accumulated since the last frame. A paint loop can skip
    /// frames entirely while this is empty.
    #[must_use]
    pub fn pending_damage(&self) -> &Damage {
        &self.damage
    }

    /// Shifts every window's painted position by a whole-screen offset,
    /// for viewport switching. Window home geometry is untouched.
    pub fn set_viewport_offset(&mut self, dx: i32, dy: i32) {
        if self.offset != (dx, dy) {
            self.offset = (dx, dy);
            self.damage_all();
        }
    }

    /// The current viewport offset.
    #[must_use]
    pub fn viewport_offset(&self) -> (i32, i32) {
        self.offset
    }

    // -- Background --

    /// Sets the solid background color (premultiplied RGBA).
    pub fn set_background_color(&mut self, color: [f32; 4]) {
        self.background_color = color;
        self.damage_all();
    }

    /// Sets a background image, stretched over the combined bounds of all
    /// outputs. The pixels are tightly packed RGBA and are uploaded to the
    /// device on first use; if the device refuses them, the solid color is
    /// painted instead for the rest of the session.
    ///
    /// # Panics
    ///
    /// Panics if `pixels` is not `width * height * 4` bytes.
    pub fn set_background_image(&mut self, width: u32, height: u32, pixels: Vec<u8>) {
        assert!(
            pixels.len() == width as usize * height as usize * 4,
            "background payload does not match {width}x{height}"
        );
        let bounds = screen_bounds(&self.outputs);
        let sx = 1.0 / f64::from(bounds.width());
        let sy = 1.0 / f64::from(bounds.height());
        let matrix = TextureMatrix::scale_translate(
            sx,
            sy,
            -f64::from(bounds.x1) * sx,
            -f64::from(bounds.y1) * sy,
        );
        self.background = BackgroundState::Pending {
            desc: TextureDesc { width, height },
            pixels,
            matrix,
        };
        self.damage_all();
    }

    // -- Painting --

    /// Paints one frame and drains the damage ledger.
    ///
    /// `transform` is the whole-screen transform for this frame; pass
    /// [`Transform::IDENTITY`] with an empty mask for plain compositing.
    /// `mask` carries screen-level mode bits only; window-level bits are
    /// derived per window during the pass.
    ///
    /// Outputs with no resolved damage are skipped and reported as such.
    /// If a hook rejects an output's region paint, that output is repainted
    /// in full. Direct-scanout eligibility is re-evaluated each frame that
    /// runs occlusion; a frame that cannot run it (transformed, or occlusion
    /// explicitly disabled) first pulls every window back into compositing.
    pub fn composite_frame(
        &mut self,
        device: &mut dyn Device,
        transform: &Transform,
        mask: PaintMask,
    ) -> FrameReport {
        debug_assert!(
            !mask.intersects(
                PaintMask::OCCLUSION_PROBE
                    | PaintMask::WINDOW_TRANSFORMED
                    | PaintMask::WITH_OFFSET
                    | PaintMask::SOLID
                    | PaintMask::TRANSLUCENT
                    | PaintMask::ON_TRANSFORMED_SCREEN
            ),
            "window-level bits in a frame mask"
        );
        // A pass that composites every window cannot leave anything on
        // direct scanout. The lapse damage folds into this frame's
        // repaint, so formerly scanned-out content composites right away.
        if occlusion_disabled(mask) {
            self.apply_unredirect(&[], &[Rect::EVERYTHING]);
        }
        let damage = self.damage.take();

        let mut frame = FrameReport::default();
        let mut candidates: Vec<WindowId> = Vec::new();
        let mut evaluated: Vec<Rect> = Vec::new();

        for i in 0..self.outputs.len() {
            let output = self.outputs[i];
            let repaint = if mask.contains(PaintMask::FULL) {
                Some(output.region())
            } else {
                damage.resolve(&output)
            };
            let Some(repaint) = repaint else {
                frame.outputs.push(OutputReport::skipped(output.id));
                continue;
            };

            let (ok, mut report) = self.run_output(device, transform, &repaint, &output, mask);
            if !ok && !mask.contains(PaintMask::FULL) {
                // The region paint was refused; repeat the output in full.
                let full = output.region();
                let retry =
                    self.run_output(device, transform, &full, &output, mask | PaintMask::FULL);
                report = retry.1;
            }
            if let Some(candidate) = report.unredirected {
                candidates.push(candidate);
            }
            evaluated.push(output.rect);
            frame.outputs.push(report);
        }

        if !occlusion_disabled(mask) {
            self.apply_unredirect(&candidates, &evaluated);
        }
        frame
    }

    /// Runs the hook chain's output pass once over one repaint region.
    fn run_output(
        &mut self,
        device: &mut dyn Device,
        transform: &Transform,
        repaint: &Region,
        output: &Output,
        mask: PaintMask,
    ) -> (bool, OutputReport) {
        let mut core = CorePaint {
            caps: &self.caps,
            path: self.path,
            outputs: &self.outputs,
            store: &self.store,
            clips: &mut self.clips,
            scratch: &mut self.scratch,
            background: &mut self.background,
            background_color: self.background_color,
            latches: &mut self.latches,
            offset: self.offset,
            report: OutputReport {
                output: output.id,
                skipped: false,
                full: mask.contains(PaintMask::FULL),
                repaint: repaint.clone(),
                background: Region::new(),
                clip_strategy: None,
                painted: Vec::new(),
                unredirected: None,
                draw_calls: 0,
                draw_failures: 0,
            },
            skip_slot: None,
        };
        let ok =
            Link::new(&self.hooks).paint_output(&mut core, device, transform, repaint, output, mask);
        (ok, core.report)
    }

    /// Aligns per-window scanout flags with this frame's candidates.
    ///
    /// Only windows touching an output whose pass actually ran are
    /// re-evaluated; skipped outputs keep their scanout windows. A window
    /// losing the flag damages its area so the next frame composites over
    /// the stale scanout content.
    fn apply_unredirect(&mut self, candidates: &[WindowId], evaluated: &[Rect]) {
        let mut lapsed: Vec<WindowId> = Vec::new();
        for &idx in self.store.paint_order() {
            let id = self.store.id_at(idx);
            if !self.store.flags_at(idx).unredirected || candidates.contains(&id) {
                continue;
            }
            let shape = self.store.effective_shape_at(idx);
            if evaluated.iter().any(|&r| shape.overlaps_rect(r)) {
                lapsed.push(id);
            }
        }
        for id in lapsed {
            let mut flags = self.store.flags(id);
            flags.unredirected = false;
            self.store.set_flags(id, flags);
            self.damage.add_rect(self.store.damage_rect(id));
        }
        for &id in candidates {
            let mut flags = self.store.flags(id);
            if !flags.unredirected {
                flags.unredirected = true;
                self.store.set_flags(id, flags);
            }
        }
    }
}

/// The engine's terminal implementation of the painting entry points,
/// plus the per-pass state hooks may inspect.
///
/// A `CorePaint` lives for one output pass. Window data is reachable
/// read-only through [`windows`](Self::windows); the store cannot change
/// while a pass runs.
pub struct CorePaint<'a> {
    caps: &'a GpuCaps,
    path: ShadingPath,
    outputs: &'a [Output],
    store: &'a WindowStore,
    clips: &'a mut FrameClips,
    scratch: &'a mut GeometryBatch,
    background: &'a mut BackgroundState,
    background_color: [f32; 4],
    latches: &'a mut WarnLatches,
    offset: (i32, i32),
    report: OutputReport,
    skip_slot: Option<u32>,
}

impl fmt::Debug for CorePaint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorePaint")
            .field("path", &self.path)
            .field("offset", &self.offset)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl CorePaint<'_> {
    // -- State visible to hooks --

    /// The windows being painted.
    #[must_use]
    pub fn windows(&self) -> &WindowStore {
        self.store
    }

    /// The device profile of this pass.
    #[must_use]
    pub fn caps(&self) -> &GpuCaps {
        self.caps
    }

    /// How paint attributes reach the device.
    #[must_use]
    pub fn shading_path(&self) -> ShadingPath {
        self.path
    }

    /// The outputs tiling the screen.
    #[must_use]
    pub fn outputs(&self) -> &[Output] {
        self.outputs
    }

    /// The visible region the occlusion walk recorded for a window this
    /// pass, if the walk reached it.
    #[must_use]
    pub fn clip_of(&self, id: WindowId) -> Option<&Region> {
        self.clips.get(id.index())
    }

    /// Geometry accumulated for the draw in flight.
    #[must_use]
    pub fn batch(&self) -> &GeometryBatch {
        self.scratch
    }

    /// The report being assembled for this output.
    #[must_use]
    pub fn report(&self) -> &OutputReport {
        &self.report
    }

    // -- Terminal paint entry points --

    /// Terminal output pass: occlusion walk, background, then windows
    /// bottom-to-top.
    ///
    /// Returns `false` when a transformed pass cannot be clipped to
    /// `region`, asking the caller to repeat the output in full.
    pub fn paint_output(
        &mut self,
        device: &mut dyn Device,
        chain: Link<'_>,
        transform: &Transform,
        region: &Region,
        output: &Output,
        mask: PaintMask,
    ) -> bool {
        let use_occlusion = !occlusion_disabled(mask);
        let mut background = region.clone();

        if use_occlusion {
            let store = self.store;
            self.clips.begin_frame(store.slot_count());
            let mut tracker = OcclusionTracker::new(region.clone(), output, self.outputs);
            for &idx in store.paint_order().iter().rev() {
                if tracker.fully_covered() {
                    break;
                }
                let id = store.id_at(idx);
                let (attrib, wmask) = self.window_state(idx, mask);
                let mut shape = store.effective_shape_at(idx);
                if !wmask.contains(PaintMask::WINDOW_TRANSFORMED) {
                    shape.translate(round_px(attrib.x_translate), round_px(attrib.y_translate));
                }
                let covers = store.paintable_at(idx) && {
                    let remaining = tracker.remaining().clone();
                    chain.paint_window(
                        self,
                        device,
                        id,
                        &attrib,
                        transform,
                        &remaining,
                        wmask | PaintMask::OCCLUSION_PROBE,
                    )
                };
                let clip = tracker.observe(id, &shape, covers);
                self.clips.set(idx, clip);
            }
            let outcome = tracker.finish();
            background = outcome.background;
            if let Some(candidate) = outcome.unredirect_candidate {
                self.report.unredirected = Some(candidate);
                self.skip_slot = Some(candidate.index());
            }
        }

        // A transformed pass cannot rely on scissoring to the repaint
        // region; draws must be clipped on the device.
        if mask.contains(PaintMask::TRANSFORMED) && !mask.contains(PaintMask::FULL) {
            if self.latches.region_clip {
                return false;
            }
            match ClipScope::enable(device, self.caps, region, output, transform) {
                Ok(mut scope) => {
                    self.report.clip_strategy = Some(scope.strategy());
                    self.paint_contents(
                        scope.device(),
                        chain,
                        transform,
                        region,
                        &background,
                        mask,
                        use_occlusion,
                    );
                }
                Err(err) => {
                    log::error!("cannot clip a transformed pass, repainting in full: {err}");
                    self.latches.region_clip = true;
                    return false;
                }
            }
        } else {
            self.paint_contents(device, chain, transform, region, &background, mask, use_occlusion);
        }
        true
    }

    /// Terminal window pass: answer occlusion probes, derive translucency
    /// and the per-window transform, then descend into drawing.
    pub fn paint_window(
        &mut self,
        device: &mut dyn Device,
        chain: Link<'_>,
        window: WindowId,
        attrib: &PaintAttrib,
        transform: &Transform,
        region: &Region,
        mask: PaintMask,
    ) -> bool {
        let flags = self.store.flags(window);

        if mask.contains(PaintMask::OCCLUSION_PROBE) {
            // Would every pixel this window paints hide what is behind it?
            return attrib.is_opaque()
                && !flags.alpha
                && !mask.contains(PaintMask::WINDOW_TRANSFORMED);
        }

        let mut mask = mask;
        if attrib.opacity < 1.0 || flags.alpha {
            mask |= PaintMask::TRANSLUCENT;
        } else {
            mask |= PaintMask::SOLID;
        }

        let w_transform;
        let clip;
        if mask.contains(PaintMask::WINDOW_TRANSFORMED) {
            w_transform = window_transform(transform, self.store.frame(window), attrib);
            // The screen footprint of a scaled window is not tracked;
            // draw it unclipped under the pass-level clip.
            clip = Region::from_rect(Rect::EVERYTHING);
        } else if mask.contains(PaintMask::WITH_OFFSET) {
            w_transform = transform
                .pre_translated(f64::from(attrib.x_translate), f64::from(attrib.y_translate));
            clip = region.clone();
        } else {
            w_transform = *transform;
            clip = region.clone();
        }
        if clip.is_empty() {
            return true;
        }

        let status = chain.draw_window(self, device, window, &w_transform, attrib, &clip, mask);
        if status {
            self.report.painted.push(WindowPaint { window, clip, mask });
        }
        status
    }

    /// Terminal window draw: tessellate the visible part of each texture
    /// plate and hand it onward. Returns `false` when the window has no
    /// plates to draw.
    pub fn draw_window(
        &mut self,
        device: &mut dyn Device,
        chain: Link<'_>,
        window: WindowId,
        transform: &Transform,
        attrib: &PaintAttrib,
        region: &Region,
        mask: PaintMask,
    ) -> bool {
        let store = self.store;
        let plates = store.plates(window);
        if plates.is_empty() {
            return false;
        }

        // Offset painting keeps geometry in home coordinates; the clip
        // comes back into home space instead.
        let clip = if mask.contains(PaintMask::WITH_OFFSET) {
            region.translated(-round_px(attrib.x_translate), -round_px(attrib.y_translate))
        } else {
            region.clone()
        };

        let shape = store.effective_shape(window);
        let units = window_shading(self.path, self.caps, attrib).shading.units_required();

        for plate in plates {
            let covered = shape.intersect(&plate.coverage);
            if covered.is_empty() {
                continue;
            }
            let matrices = vec![plate.matrix; units];
            self.scratch.reset(units);
            chain.add_geometry(self, window, &matrices, &covered, &clip, TileLimits::UNBOUNDED);
            if !self.scratch.is_empty() {
                chain.draw_texture(self, device, window, plate, transform, attrib, mask);
            }
        }
        true
    }

    /// Terminal texture draw: submit the accumulated geometry with this
    /// plate's texture bound to every unit the shading needs.
    pub fn draw_texture(
        &mut self,
        device: &mut dyn Device,
        window: WindowId,
        plate: &TexturePlate,
        transform: &Transform,
        attrib: &PaintAttrib,
        mask: PaintMask,
    ) {
        let shaded = window_shading(self.path, self.caps, attrib);
        if shaded.degraded && !self.latches.saturation {
            self.latches.saturation = true;
            log::warn!(
                "{} texture units cannot express saturation {}; rounding down",
                self.caps.max_texture_units,
                attrib.saturation
            );
        }
        let blend = if mask.contains(PaintMask::TRANSLUCENT) {
            BlendMode::SourceOver
        } else {
            blend_for(attrib, self.store.flags(window).alpha)
        };
        let textures = vec![plate.texture; shaded.shading.units_required()];
        let call = DrawCall {
            batch: self.scratch,
            textures: &textures,
            transform: *transform,
            blend,
            shading: shaded.shading,
        };
        submit(&mut self.report, device, &call);
    }

    /// Terminal geometry accumulation into the pass's batch.
    pub fn add_geometry(
        &mut self,
        window: WindowId,
        matrices: &[TextureMatrix],
        region: &Region,
        clip: &Region,
        limits: TileLimits,
    ) {
        debug_assert!(self.store.is_alive(window), "geometry for a dead window");
        add_region(self.scratch, matrices, region, clip, limits);
    }

    // -- Internals --

    /// Effective paint attributes and window-level mask bits for the
    /// window at raw slot `idx`. The viewport offset folds into the
    /// attribute translation.
    fn window_state(&self, idx: u32, screen_mask: PaintMask) -> (PaintAttrib, PaintMask) {
        let mut attrib = self.store.attrib_at(idx);
        let mut mask = screen_mask;
        if self.offset != (0, 0) {
            attrib.x_translate += self.offset.0 as f32;
            attrib.y_translate += self.offset.1 as f32;
        }
        if attrib.x_scale != 1.0 || attrib.y_scale != 1.0 {
            mask |= PaintMask::WINDOW_TRANSFORMED;
        } else if attrib.x_translate != 0.0 || attrib.y_translate != 0.0 {
            mask |= PaintMask::WITH_OFFSET;
        }
        if screen_mask.contains(PaintMask::TRANSFORMED) {
            mask |= PaintMask::ON_TRANSFORMED_SCREEN;
        }
        (attrib, mask)
    }

    /// Background and ordered window painting, inside whatever clip the
    /// caller established.
    fn paint_contents(
        &mut self,
        device: &mut dyn Device,
        chain: Link<'_>,
        transform: &Transform,
        region: &Region,
        background: &Region,
        mask: PaintMask,
        use_clips: bool,
    ) {
        if !mask.contains(PaintMask::NO_BACKGROUND) {
            self.paint_background(device, transform, background);
        }
        let store = self.store;
        for &idx in store.paint_order() {
            if !store.paintable_at(idx)
                || store.flags_at(idx).unredirected
                || self.skip_slot == Some(idx)
            {
                continue;
            }
            let clip = if use_clips {
                match self.clips.get(idx) {
                    Some(clip) if !clip.is_empty() => clip.clone(),
                    // Never reached by the walk means fully hidden.
                    _ => continue,
                }
            } else {
                region.clone()
            };
            let id = store.id_at(idx);
            let (attrib, wmask) = self.window_state(idx, mask);
            chain.paint_window(self, device, id, &attrib, transform, &clip, wmask);
        }
    }

    /// Fills `region` with the configured background: the image when one
    /// is resident (uploading it on first use), the solid color otherwise.
    fn paint_background(&mut self, device: &mut dyn Device, transform: &Transform, region: &Region) {
        if region.is_empty() {
            return;
        }

        if matches!(*self.background, BackgroundState::Pending { .. }) {
            let state = core::mem::replace(self.background, BackgroundState::Failed);
            if let BackgroundState::Pending { desc, pixels, matrix } = state {
                match device.create_texture(&desc, &pixels) {
                    Ok(texture) => {
                        *self.background = BackgroundState::Ready { texture, matrix };
                    }
                    Err(err) => {
                        log::error!("background image rejected, using solid color: {err}");
                    }
                }
            }
        }

        match *self.background {
            BackgroundState::Ready { texture, matrix } => {
                let shaded = window_shading(self.path, self.caps, &PaintAttrib::OPAQUE);
                let units = shaded.shading.units_required();
                let matrices = vec![matrix; units];
                self.scratch.reset(units);
                add_region(self.scratch, &matrices, region, region, TileLimits::UNBOUNDED);
                let textures = vec![texture; units];
                let call = DrawCall {
                    batch: self.scratch,
                    textures: &textures,
                    transform: *transform,
                    blend: BlendMode::Opaque,
                    shading: shaded.shading,
                };
                submit(&mut self.report, device, &call);
            }
            _ => {
                self.scratch.reset(0);
                add_region(self.scratch, &[], region, region, TileLimits::UNBOUNDED);
                let call = DrawCall {
                    batch: self.scratch,
                    textures: &[],
                    transform: *transform,
                    blend: BlendMode::Opaque,
                    shading: Shading::Flat(self.background_color),
                };
                submit(&mut self.report, device, &call);
            }
        }
        self.report.background = region.clone();
    }
}
