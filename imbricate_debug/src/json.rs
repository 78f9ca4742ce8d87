// Copyright 2026 the Imbricate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON frame report export.
//!
//! [`export`] writes a [`FrameReport`] as a pretty-printed JSON array, one
//! object per output pass. Field names and ordering are stable, so the
//! output diffs cleanly across runs and can feed external tooling.

use std::io::{self, Write};

use serde_json::{Value, json};

use imbricate_compose::{FrameReport, OutputReport};
use imbricate_core::mask::PaintMask;
use imbricate_core::rect::Rect;
use imbricate_core::region::Region;
use imbricate_core::window::WindowId;

/// Writes `report` as pretty-printed JSON.
pub fn export(report: &FrameReport, writer: &mut dyn Write) -> io::Result<()> {
    let outputs: Vec<Value> = report.outputs.iter().map(output_value).collect();
    serde_json::to_writer_pretty(writer, &outputs)?;
    Ok(())
}

fn output_value(output: &OutputReport) -> Value {
    json!({
        "output": output.output.0,
        "skipped": output.skipped,
        "full": output.full,
        "repaint": region_value(&output.repaint),
        "background": region_value(&output.background),
        "clip_strategy": output.clip_strategy.map(|s| format!("{s:?}")),
        "painted": output
            .painted
            .iter()
            .map(|p| {
                json!({
                    "window": window_value(p.window),
                    "clip": region_value(&p.clip),
                    "solid": p.mask.contains(PaintMask::SOLID),
                    "translucent": p.mask.contains(PaintMask::TRANSLUCENT),
                    "offset": p.mask.contains(PaintMask::WITH_OFFSET),
                })
            })
            .collect::<Vec<_>>(),
        "unredirected": output.unredirected.map(window_value),
        "draw_calls": output.draw_calls,
        "draw_failures": output.draw_failures,
    })
}

fn window_value(id: WindowId) -> Value {
    json!({
        "index": id.index(),
        "generation": id.generation(),
    })
}

fn region_value(region: &Region) -> Value {
    region.rects().iter().map(|r| rect_value(*r)).collect()
}

fn rect_value(rect: Rect) -> Value {
    json!({
        "x": rect.x1,
        "y": rect.y1,
        "w": rect.width(),
        "h": rect.height(),
    })
}

#[cfg(test)]
mod tests {
    use imbricate_compose::{ClipStrategy, WindowPaint};
    use imbricate_core::output::OutputId;
    use imbricate_core::window::WindowStore;

    use super::*;

    #[test]
    fn export_produces_stable_json() {
        let mut store = WindowStore::new();
        let id = store.create_window(Rect::new(2, 3, 10, 9));
        let clip = Region::from_rect(Rect::new(2, 3, 10, 9));
        let report = FrameReport {
            outputs: vec![OutputReport {
                output: OutputId(1),
                skipped: false,
                full: false,
                repaint: clip.clone(),
                background: Region::new(),
                clip_strategy: Some(ClipStrategy::Planes),
                painted: vec![WindowPaint {
                    window: id,
                    clip,
                    mask: PaintMask::TRANSLUCENT,
                }],
                unredirected: None,
                draw_calls: 2,
                draw_failures: 0,
            }],
        };

        let mut out = Vec::new();
        export(&report, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 1);

        let output = &parsed[0];
        assert_eq!(output["output"], 1);
        assert_eq!(output["skipped"], false);
        assert_eq!(output["clip_strategy"], "Planes");
        assert_eq!(output["draw_calls"], 2);
        assert_eq!(output["unredirected"], Value::Null);

        let painted = output["painted"].as_array().unwrap();
        assert_eq!(painted.len(), 1);
        assert_eq!(painted[0]["window"]["index"], 0);
        assert_eq!(painted[0]["solid"], false);
        assert_eq!(painted[0]["translucent"], true);

        let repaint = output["repaint"].as_array().unwrap();
        assert_eq!(repaint[0]["x"], 2);
        assert_eq!(repaint[0]["w"], 8);
    }

    #[test]
    fn skipped_outputs_keep_their_flag() {
        let report = FrameReport {
            outputs: vec![OutputReport::skipped(OutputId(4))],
        };
        let mut out = Vec::new();
        export(&report, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["output"], 4);
        assert_eq!(parsed[0]["skipped"], true);
        assert_eq!(parsed[0]["repaint"], json!([]));
    }
}
