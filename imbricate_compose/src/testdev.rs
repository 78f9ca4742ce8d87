// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A device that records instead of rendering, for pipeline tests.

use alloc::vec::Vec;

use imbricate_core::texture::{TextureDesc, TextureId};
use imbricate_core::transform::Transform;
use imbricate_render::{BlendMode, DrawCall, Shading};

use crate::clip::ClipPlanes;
use crate::device::{Device, DeviceError, StencilMode};

/// One state change or submission, in call order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeviceEvent {
    ClearStencil(u8),
    ColorMask(bool),
    Stencil(StencilMode),
    /// Planes installed (`true`) or cleared (`false`).
    Planes(bool),
    Draw,
    CreateTexture(TextureDesc),
}

/// A draw call snapshot with the device state it ran under.
#[derive(Clone, Debug)]
pub struct DrawRecord {
    pub positions: Vec<[f32; 2]>,
    pub textures: Vec<TextureId>,
    pub transform: Transform,
    pub blend: BlendMode,
    pub shading: Shading,
    pub stencil: StencilMode,
    pub planes: Option<ClipPlanes>,
    pub color_writes: bool,
}

/// Captures every call made against it; state fields mirror what a real
/// device would currently hold.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub events: Vec<DeviceEvent>,
    pub draws: Vec<DrawRecord>,
    pub stencil: StencilMode,
    pub planes: Option<ClipPlanes>,
    pub fail_draws: bool,
    pub fail_textures: bool,
    pub color_mask: bool,
    next_texture: u32,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            color_mask: true,
            ..Self::default()
        }
    }

    /// Draw records that actually wrote color, skipping stencil fills.
    pub fn visible_draws(&self) -> impl Iterator<Item = &DrawRecord> {
        self.draws.iter().filter(|d| d.color_writes)
    }
}

impl Device for RecordingDevice {
    fn set_color_mask(&mut self, write_color: bool) {
        self.color_mask = write_color;
        self.events.push(DeviceEvent::ColorMask(write_color));
    }

    fn clear_stencil(&mut self, value: u8) {
        self.events.push(DeviceEvent::ClearStencil(value));
    }

    fn set_stencil(&mut self, mode: StencilMode) {
        self.stencil = mode;
        self.events.push(DeviceEvent::Stencil(mode));
    }

    fn set_clip_planes(&mut self, planes: Option<&ClipPlanes>) {
        self.planes = planes.copied();
        self.events.push(DeviceEvent::Planes(planes.is_some()));
    }

    fn draw(&mut self, call: &DrawCall<'_>) -> Result<(), DeviceError> {
        if self.fail_draws {
            return Err(DeviceError::UnsupportedDraw);
        }
        assert!(call.is_consistent(), "inconsistent draw call submitted");
        self.events.push(DeviceEvent::Draw);
        self.draws.push(DrawRecord {
            positions: call.batch.positions().to_vec(),
            textures: call.textures.to_vec(),
            transform: call.transform,
            blend: call.blend,
            shading: call.shading.clone(),
            stencil: self.stencil,
            planes: self.planes,
            color_writes: self.color_mask,
        });
        Ok(())
    }

    fn create_texture(
        &mut self,
        desc: &TextureDesc,
        pixels: &[u8],
    ) -> Result<TextureId, DeviceError> {
        if self.fail_textures {
            return Err(DeviceError::TextureAllocation(*desc));
        }
        assert!(
            pixels.len() == desc.width as usize * desc.height as usize * 4,
            "pixel payload does not match {}x{}",
            desc.width,
            desc.height
        );
        self.events.push(DeviceEvent::CreateTexture(*desc));
        self.next_texture += 1;
        Ok(TextureId(self.next_texture))
    }
}
