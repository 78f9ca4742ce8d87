// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window bookkeeping.
//!
//! A *window* is one stacked, paintable surface on the screen. Each window
//! has:
//!
//! - An identity ([`WindowId`]) — a generational handle that becomes stale
//!   when the window is destroyed, preventing use-after-free bugs at the
//!   API level.
//! - A place in the stacking order — windows form a flat bottom-to-top
//!   list, not a tree; restacking moves a window within that list.
//! - **Geometry** set by the windowing layer: the
//!   [`frame`](WindowStore::set_frame) rect, a decoration
//!   [`border`](WindowStore::set_border), and an optional non-rectangular
//!   [`shape`](WindowStore::set_shape).
//! - **Paint inputs**: texture [`plates`](WindowStore::set_plates), steady
//!   state [`attributes`](WindowStore::set_attrib), and lifecycle
//!   [`flags`](WindowStore::set_flags).
//!
//! Windows are stored in struct-of-arrays layout with index-based handles;
//! per-frame passes walk the raw slot indices in
//! [`paint_order`](WindowStore::paint_order).

mod id;
mod store;

pub use id::{INVALID, WindowId};
pub use store::{Border, WindowFlags, WindowStore};
