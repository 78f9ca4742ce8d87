// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry batching, tessellation, and draw-call definitions for
//! imbricate.
//!
//! This crate sits between [`imbricate_core`]'s occlusion bookkeeping and
//! a device backend. It defines:
//!
//! - [`GeometryBatch`] — accumulated vertices with per-unit texture
//!   coordinates
//! - [`add_region`] — region tessellation into screen-aligned quads
//! - [`DrawCall`] — a single device submission with blend and shading
//!   state
//! - [`Damage`] — accumulated screen damage between frames

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod batch;
mod damage;
mod draw;
mod tessellate;

pub use batch::GeometryBatch;
pub use damage::Damage;
pub use draw::{
    BlendMode, CombineOp, CombineProgram, CombineSource, CombineStage, DrawCall, LUMA_BLUE,
    LUMA_GREEN, LUMA_RED, Shading,
};
pub use tessellate::{TileLimits, add_region};
