// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The imbricate compositing engine.
//!
//! This crate turns the data model of [`imbricate_core`] and the geometry
//! pipeline of [`imbricate_render`] into frames: it owns the per-frame
//! paint pass, the hook chain that lets effects wrap any stage of it, and
//! the [`Device`] boundary a backend implements.
//!
//! ```text
//!   Compositor::composite_frame
//!        │  per output with damage
//!        ▼
//!   paint_output ──► occlusion walk (probes via paint_window)
//!        │           background paint
//!        ▼
//!   paint_window ──► draw_window ──► add_geometry
//!        │                │
//!        ▼                ▼
//!   FrameReport      draw_texture ──► Device::draw
//! ```
//!
//! Every stage from `paint_output` down is a chain entry point: registered
//! [`PaintHook`]s see the call first (newest registration outermost) and
//! decide whether to forward, replace, or suppress it. The terminal
//! implementations live on [`CorePaint`].
//!
//! Capability differences are absorbed here: devices without fragment
//! programs get fixed-function combine shading, devices without a stencil
//! buffer clip transformed passes with planes, and shortfalls degrade with
//! a single logged warning instead of failing the frame.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod chain;
mod clip;
mod device;
mod engine;
mod report;
mod shading;
#[cfg(test)]
mod testdev;

pub use chain::{Link, PaintHook};
pub use clip::{ClipPlanes, ClipScope, ClipStrategy};
pub use device::{Device, DeviceError, StencilMode};
pub use engine::{Compositor, CorePaint};
pub use report::{FrameReport, OutputReport, WindowPaint};
pub use shading::{ShadingPath, WindowShading, blend_for, window_shading};
