// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Software rasterizing device for imbricate.
//!
//! [`SoftDevice`] renders draw calls into an in-memory framebuffer with
//! plain per-pixel loops. It is a reference implementation of the
//! [`Device`](imbricate_compose::Device) contract rather than a fast one:
//! every capability a real backend may or may not have (stencil plane,
//! clip planes, combine stages, multiple texture units) is present here,
//! so the engine's fallback paths can be tested against the full-featured
//! rendition they approximate.
//!
//! What the rasterizer guarantees:
//!
//! - Pixel centers sit at half-integer coordinates. A rect whose edges lie
//!   on integer screen coordinates covers exactly the pixels inside it,
//!   with no seams or double blends along shared triangle edges.
//! - Colors are premultiplied rgba throughout, matching the blend modes
//!   the engine picks.
//! - Clip planes evaluate against untransformed vertex positions, the way
//!   the plane-clipping scope feeds them.
//!
//! ```
//! use imbricate_backend_soft::SoftDevice;
//! use imbricate_compose::Device;
//! use imbricate_core::texture::TextureDesc;
//!
//! let mut device = SoftDevice::new(640, 480);
//! let texture = device.create_texture(
//!     &TextureDesc { width: 2, height: 2 },
//!     &[255u8; 16],
//! )?;
//! assert_eq!(device.pixel(0, 0), [0.0, 0.0, 0.0, 1.0]);
//! # let _ = texture;
//! # Ok::<(), imbricate_compose::DeviceError>(())
//! ```

mod device;
mod raster;
mod shade;

pub use device::SoftDevice;
