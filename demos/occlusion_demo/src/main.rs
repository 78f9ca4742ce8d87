// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated compositing loop over a small window stack.
//!
//! Runs a handful of frames through the [`Compositor`] on the software
//! device: an opaque editor window, a translucent terminal above it, and a
//! fullscreen video window that comes and goes to exercise direct scanout.
//! Each frame's report prints as text; the final frame also prints an
//! ascii rendition of the framebuffer and the report as JSON.
//!
//! Set `RUST_LOG=imbricate_compose=debug` to interleave the engine's own
//! account of each pass.

use std::io::stdout;

use imbricate_backend_soft::SoftDevice;
use imbricate_compose::{Compositor, Device};
use imbricate_core::attrib::PaintAttrib;
use imbricate_core::caps::GpuCaps;
use imbricate_core::mask::PaintMask;
use imbricate_core::matrix::TextureMatrix;
use imbricate_core::output::{Output, OutputId};
use imbricate_core::rect::Rect;
use imbricate_core::region::Region;
use imbricate_core::texture::{TextureDesc, TextureId, TexturePlate};
use imbricate_core::transform::Transform;
use imbricate_core::window::{WindowFlags, WindowId};

const WIDTH: u32 = 96;
const HEIGHT: u32 = 54;
/// Simulated frames, enough to cover paint, skip, move, and unredirect.
const FRAME_COUNT: u32 = 7;

fn main() {
    env_logger::init();

    // -- device and engine -------------------------------------------------
    let screen = Rect::new(0, 0, WIDTH as i32, HEIGHT as i32);
    let mut device = SoftDevice::new(WIDTH, HEIGHT);
    let mut compositor =
        Compositor::new(GpuCaps::modern(), vec![Output::new(OutputId(0), screen)]);
    compositor.set_background_color([0.05, 0.05, 0.12, 1.0]);

    // -- window stack ------------------------------------------------------
    let editor_rect = Rect::new(8, 6, 64, 44);
    let editor_tex = checker_texture(&mut device, 56, 7, [64, 128, 64, 255], [44, 88, 44, 255]);
    let _editor = open_window(&mut compositor, editor_rect, editor_tex);

    let term_rect = Rect::new(40, 20, 88, 48);
    let term_tex = solid_texture(&mut device, 8, 8, [20, 20, 28, 255]);
    let terminal = open_window(&mut compositor, term_rect, term_tex);
    compositor.windows_mut().set_attrib(
        terminal,
        PaintAttrib {
            opacity: 0.85,
            ..PaintAttrib::OPAQUE
        },
    );

    let video_tex = solid_texture(&mut device, 16, 16, [200, 170, 40, 255]);
    let mut video: Option<WindowId> = None;

    // -- simulated loop ----------------------------------------------------
    let mut out = stdout();
    for frame in 0..FRAME_COUNT {
        match frame {
            2 => {
                // The terminal slides toward the corner.
                compositor.damage_window(terminal);
                compositor.windows_mut().move_window(terminal, 6, 4);
                compositor.damage_window(terminal);
            }
            3 => {
                // A fullscreen opaque video window maps on top; it
                // qualifies for direct scanout.
                video = Some(open_window(&mut compositor, screen, video_tex));
            }
            5 => {
                // The video window unmaps; everything composites again.
                let id = video.take().expect("video window is mapped");
                let mut flags = compositor.windows_mut().flags(id);
                flags.mapped = false;
                compositor.windows_mut().set_flags(id, flags);
                compositor.damage_window(id);
            }
            _ => {}
        }

        let report =
            compositor.composite_frame(&mut device, &Transform::IDENTITY, PaintMask::empty());
        println!("frame {frame}");
        imbricate_debug::pretty::write_report(&report, &mut out).expect("stdout write failed");

        if frame == FRAME_COUNT - 1 {
            println!();
            imbricate_debug::pretty::write_ascii_frame(
                &device.to_rgba8(),
                device.width(),
                device.height(),
                &mut out,
            )
            .expect("stdout write failed");

            let mut json = Vec::new();
            imbricate_debug::json::export(&report, &mut json).expect("json export failed");
            println!("\n{}", String::from_utf8(json).expect("json is utf-8"));
        }
    }
}

/// Opens a mapped window at `rect` filled by one texture plate.
fn open_window(compositor: &mut Compositor, rect: Rect, texture: TextureId) -> WindowId {
    let id = compositor.windows_mut().create_window(rect);
    compositor
        .windows_mut()
        .set_plates(id, vec![plate_over(rect, texture)]);
    compositor.windows_mut().set_flags(
        id,
        WindowFlags {
            mapped: true,
            damaged: true,
            ..WindowFlags::default()
        },
    );
    compositor.damage_window(id);
    id
}

/// A plate whose matrix stretches the texture exactly over `rect`.
fn plate_over(rect: Rect, texture: TextureId) -> TexturePlate {
    let sx = 1.0 / f64::from(rect.width());
    let sy = 1.0 / f64::from(rect.height());
    TexturePlate {
        texture,
        matrix: TextureMatrix::scale_translate(
            sx,
            sy,
            -f64::from(rect.x1) * sx,
            -f64::from(rect.y1) * sy,
        ),
        coverage: Region::from_rect(rect),
    }
}

fn solid_texture(device: &mut SoftDevice, width: u32, height: u32, rgba: [u8; 4]) -> TextureId {
    let mut bytes = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        bytes.extend_from_slice(&rgba);
    }
    device
        .create_texture(&TextureDesc { width, height }, &bytes)
        .expect("texture allocation failed")
}

/// An even checkerboard with `cell`-sized squares.
fn checker_texture(
    device: &mut SoftDevice,
    size: u32,
    cell: u32,
    a: [u8; 4],
    b: [u8; 4],
) -> TextureId {
    let mut bytes = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let even = ((x / cell) + (y / cell)) % 2 == 0;
            bytes.extend_from_slice(if even { &a } else { &b });
        }
    }
    device
        .create_texture(
            &TextureDesc {
                width: size,
                height: size,
            },
            &bytes,
        )
        .expect("texture allocation failed")
}
