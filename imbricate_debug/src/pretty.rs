// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable frame report and framebuffer rendering.
//!
//! [`write_report`] prints one indented block per output pass;
//! [`write_region`] prints a region on a single line. Both write to any
//! [`Write`] so they can target stderr, a log file, or a test buffer.
//! [`write_ascii_frame`] turns software framebuffer bytes into an ascii
//! luminance picture, which is often all the image inspection a failing
//! test needs.

use std::io::{self, Write};

use imbricate_compose::{FrameReport, OutputReport};
use imbricate_core::mask::PaintMask;
use imbricate_core::rect::Rect;
use imbricate_core::region::Region;

/// Darkest to brightest.
const RAMP: &[u8] = b" .:-=+*#%@";

fn rect_label(rect: Rect) -> String {
    format!(
        "{},{} {}x{}",
        rect.x1,
        rect.y1,
        rect.width(),
        rect.height()
    )
}

fn mask_suffix(mask: PaintMask) -> String {
    let mut parts = Vec::new();
    if mask.contains(PaintMask::SOLID) {
        parts.push("solid");
    }
    if mask.contains(PaintMask::TRANSLUCENT) {
        parts.push("translucent");
    }
    if mask.contains(PaintMask::WITH_OFFSET) {
        parts.push("offset");
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

/// Prints `region` on one line: rect count, area, then each rect.
pub fn write_region(region: &Region, writer: &mut dyn Write) -> io::Result<()> {
    if region.is_empty() {
        return writeln!(writer, "empty");
    }
    write!(
        writer,
        "{} rects, area {}:",
        region.rect_count(),
        region.area()
    )?;
    for rect in region.rects() {
        write!(writer, " [{}]", rect_label(*rect))?;
    }
    writeln!(writer)
}

/// Prints a whole frame report, one block per output.
pub fn write_report(report: &FrameReport, writer: &mut dyn Write) -> io::Result<()> {
    for output in &report.outputs {
        write_output(output, writer)?;
    }
    Ok(())
}

fn write_output(output: &OutputReport, writer: &mut dyn Write) -> io::Result<()> {
    if output.skipped {
        return writeln!(writer, "output {}: skipped", output.output.0);
    }
    let scope = if output.full { "full" } else { "region" };
    write!(
        writer,
        "output {}: {} pass, {} draw calls",
        output.output.0, scope, output.draw_calls
    )?;
    if output.draw_failures > 0 {
        write!(writer, " ({} refused)", output.draw_failures)?;
    }
    writeln!(writer)?;

    write!(writer, "  repaint: ")?;
    write_region(&output.repaint, writer)?;
    write!(writer, "  background: ")?;
    write_region(&output.background, writer)?;
    if let Some(strategy) = output.clip_strategy {
        writeln!(writer, "  clip: {strategy:?}")?;
    }
    for paint in &output.painted {
        write!(
            writer,
            "  window {}{}: clip ",
            paint.window.index(),
            mask_suffix(paint.mask)
        )?;
        write_region(&paint.clip, writer)?;
    }
    if let Some(window) = output.unredirected {
        writeln!(writer, "  unredirected: window {}", window.index())?;
    }
    Ok(())
}

/// Renders tightly packed rgba bytes as one ascii character per pixel,
/// darkest to brightest.
///
/// # Panics
///
/// Panics if `rgba` does not hold exactly `width * height` pixels.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the ramp index is bounded by the ramp length"
)]
pub fn write_ascii_frame(
    rgba: &[u8],
    width: u32,
    height: u32,
    writer: &mut dyn Write,
) -> io::Result<()> {
    assert!(
        rgba.len() == width as usize * height as usize * 4,
        "framebuffer bytes do not match {width}x{height}"
    );
    let mut line = String::with_capacity(width as usize);
    for row in rgba.chunks_exact(width as usize * 4) {
        line.clear();
        for px in row.chunks_exact(4) {
            let luma = 0.2126 * f32::from(px[0])
                + 0.7152 * f32::from(px[1])
                + 0.0722 * f32::from(px[2]);
            let idx = (luma / 255.0 * (RAMP.len() - 1) as f32).round() as usize;
            line.push(char::from(RAMP[idx]));
        }
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
