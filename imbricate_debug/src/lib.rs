// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON export for imbricate frame reports.
//!
//! A [`FrameReport`](imbricate_compose::FrameReport) records what a frame
//! did; this crate turns one into something a human or a tool can read:
//!
//! - [`pretty`] — indented text, one block per output, plus an ascii
//!   rendition of a software framebuffer.
//! - [`json`] — stable JSON export for snapshot diffing and external
//!   tooling.

pub mod json;
pub mod pretty;
