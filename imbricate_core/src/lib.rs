// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region algebra, window store, and occlusion model for compositing.
//!
//! `imbricate_core` provides the data structures a compositing paint pass
//! computes with: pixel-exact regions, stacked windows, texture coordinate
//! matrices, and the occlusion walk that turns a stacking order into
//! per-window visible areas. It is `no_std` compatible (with `alloc`) and
//! uses array-based struct-of-arrays storage with index handles for
//! cache-friendly per-frame walks.
//!
//! # Architecture
//!
//! The crate is organized around the per-output paint pass that turns
//! accumulated damage into draw-ready visibility data:
//!
//! ```text
//!   damage Region ──► OcclusionTracker (topmost-first)
//!                          │
//!            ┌─────────────┴──────────────┐
//!            ▼                            ▼
//!   FrameClips (per-window         background Region
//!   visible regions)               + unredirect candidate
//!            │
//!            ▼
//!   tessellation / draw (imbricate_render, imbricate_compose)
//! ```
//!
//! **[`region`]** — Sets of non-overlapping rects in canonical band form.
//! Union, intersection, and difference run a shared band sweep; canonical
//! form makes region equality structural.
//!
//! **[`window`]** — Struct-of-arrays window storage with generational
//! handles and a flat bottom-to-top stacking order. Geometry, shapes,
//! texture plates, paint attributes, and lifecycle flags live here.
//!
//! **[`occlusion`]** — The topmost-first walk computing what part of each
//! window is actually visible, plus the frame-local
//! [`FrameClips`](occlusion::FrameClips) side table and unredirect
//! candidacy.
//!
//! **[`matrix`]** / **[`texture`]** — Screen-to-texture coordinate maps and
//! the plate planning that splits oversized surfaces for constrained
//! devices.
//!
//! **[`transform`]** — Column-major 4×4 whole-screen transform.
//!
//! **[`mask`]** — The paint-pass bitmask threaded through every painting
//! entry point.
//!
//! **[`caps`]** — Immutable device capability snapshot; all capability
//! branching in the pipeline keys off this.
//!
//! **[`output`]** — Display outputs tiling the screen.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod attrib;
pub mod caps;
pub mod mask;
pub mod matrix;
pub mod occlusion;
pub mod output;
pub mod rect;
pub mod region;
pub mod texture;
pub mod transform;
pub mod window;
