// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Register-log exporter.
//!
//! [`export`] writes the calls captured by a
//! [`RecordingHw`](lamina_core::record::RecordingHw) as a JSON array. Each
//! element is an object with the call name under `"op"`, the screen index
//! under `"screen"` and the call's arguments under `"args"`.

use std::io::{self, Write};

use serde_json::{Value, json};

use lamina_core::geom::{Rect, Size};
use lamina_core::record::HwWrite;
use lamina_core::scaler::ScalerParams;

/// Exports recorded hardware calls as JSON.
pub fn export(writes: &[HwWrite], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = writes.iter().map(to_json).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

/// Converts one recorded call.
#[must_use]
pub fn to_json(write: &HwWrite) -> Value {
    let (op, args) = match write {
        HwWrite::OverlaySize { channel, size, .. } => (
            "overlay_size",
            json!({ "channel": channel, "size": size_json(*size) }),
        ),
        HwWrite::Layer {
            channel,
            slot,
            record,
            ..
        } => (
            "layer",
            json!({
                "channel": channel,
                "slot": slot,
                "enable": record.enable,
                "alpha_mode": format!("{:?}", record.alpha_mode),
                "alpha": record.alpha,
                "format": record.format.raw(),
                "premultiply": record.premultiply,
                "pitch": record.pitch,
                "placement": rect_json(record.placement),
                "low_addr": record.low_addr,
            }),
        ),
        HwWrite::LayerFillColor {
            channel,
            slot,
            enable,
            color,
            ..
        } => (
            "layer_fill_color",
            json!({ "channel": channel, "slot": slot, "enable": enable, "color": color }),
        ),
        HwWrite::LayerHighAddr {
            channel,
            slot,
            high,
            ..
        } => (
            "layer_high_addr",
            json!({ "channel": channel, "slot": slot, "high": high }),
        ),
        HwWrite::PipeEnable { enabled, .. } => ("pipe_enable", json!({ "enabled": enabled })),
        HwWrite::Pipe { pipe, config, .. } => (
            "pipe",
            json!({
                "pipe": pipe,
                "channel": config.channel,
                "rect": rect_json(config.rect),
                "fill_color": config.fill_color,
                "premultiply": config.premultiply,
            }),
        ),
        HwWrite::BlendMode { pipe, mode, .. } => (
            "blend_mode",
            json!({ "pipe": pipe, "mode": format!("{mode:?}") }),
        ),
        HwWrite::VideoScaler {
            channel, config, ..
        } => (
            "video_scaler",
            json!({
                "channel": channel,
                "enable": config.enable,
                "format": config.format.raw(),
                "in": size_json(config.in_size),
                "in_chroma": size_json(config.in_chroma_size),
                "out": size_json(config.out_size),
                "luma": params_json(config.luma),
                "chroma": params_json(config.chroma),
                "coarse": [config.h_coarse, config.v_coarse],
                "fir": { "luma": config.luma_fir, "chroma": config.chroma_fir },
            }),
        ),
        HwWrite::GraphicsScaler {
            channel, config, ..
        } => (
            "graphics_scaler",
            json!({
                "channel": channel,
                "enable": config.enable,
                "in": size_json(config.in_size),
                "out": size_json(config.out_size),
                "params": params_json(config.params),
                "fir": config.fir,
            }),
        ),
        HwWrite::Csc {
            channel, config, ..
        } => (
            "csc",
            json!({
                "channel": channel,
                "in": [
                    format!("{:?}", config.in_class),
                    format!("{:?}", config.in_matrix),
                    format!("{:?}", config.in_range),
                ],
                "out": [
                    format!("{:?}", config.out_class),
                    format!("{:?}", config.out_matrix),
                    format!("{:?}", config.out_range),
                ],
            }),
        ),
        HwWrite::EnhanceInfo { info, .. } => (
            "enhance_info",
            json!({
                "layers": info.layers.iter().map(|l| json!({
                    "enable": l.enable,
                    "fb_size": size_json(l.fb_size),
                    "crop": [l.crop_x, l.crop_y],
                    "format": l.format.raw(),
                })).collect::<Vec<_>>(),
                "overlay": size_json(info.overlay_size),
                "blend": size_json(info.blend_size),
            }),
        ),
        HwWrite::BackgroundColor { color, .. } => {
            ("background_color", json!({ "color": color }))
        }
        HwWrite::BlendSize { size, .. } => ("blend_size", json!({ "size": size_json(*size) })),
        HwWrite::DisplaySize { size, .. } => {
            ("display_size", json!({ "size": size_json(*size) }))
        }
        HwWrite::Enable { enable, .. } => ("enable", json!({ "enable": enable })),
        HwWrite::OutputMux { device, .. } => ("output_mux", json!({ "device": device })),
        HwWrite::Interlace { interlace, .. } => ("interlace", json!({ "interlace": interlace })),
        HwWrite::BlendColorSpace { space, .. } => (
            "blend_color_space",
            json!({ "space": format!("{space:?}") }),
        ),
        HwWrite::DoubleBufferReady { .. } => ("double_buffer_ready", json!({})),
        HwWrite::UpdateRegs { .. } => ("update_regs", json!({})),
        HwWrite::EnableIrq { enable, .. } => ("enable_irq", json!({ "enable": enable })),
        HwWrite::Init { .. } => ("init", json!({})),
    };
    json!({
        "op": op,
        "screen": write.screen().0,
        "args": args,
    })
}

fn size_json(s: Size) -> Value {
    json!([s.width, s.height])
}

fn rect_json(r: Rect) -> Value {
    json!({ "x": r.x, "y": r.y, "w": r.w, "h": r.h })
}

fn params_json(p: ScalerParams) -> Value {
    json!({
        "hstep": p.hstep,
        "vstep": p.vstep,
        "hphase": p.hphase,
        "vphase": p.vphase,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_core::backend::PipeConfig;
    use lamina_core::scaler::graphics::GraphicsScalerConfig;
    use lamina_core::screen::ScreenId;

    #[test]
    fn export_produces_valid_json() {
        let writes = [
            HwWrite::PipeEnable {
                screen: ScreenId(0),
                enabled: vec![true, false],
            },
            HwWrite::Pipe {
                screen: ScreenId(0),
                pipe: 0,
                config: PipeConfig {
                    channel: Some(2),
                    rect: Rect::new(0, 0, 1280, 720),
                    fill_color: 0xff00_0000,
                    premultiply: false,
                },
            },
            HwWrite::DoubleBufferReady {
                screen: ScreenId(1),
            },
        ];

        let mut out = Vec::new();
        export(&writes, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["op"], "pipe_enable");
        assert_eq!(parsed[0]["args"]["enabled"], json!([true, false]));

        assert_eq!(parsed[1]["op"], "pipe");
        assert_eq!(parsed[1]["args"]["channel"], 2);
        assert_eq!(parsed[1]["args"]["rect"]["w"], 1280);
        assert_eq!(parsed[1]["args"]["fill_color"], 0xff00_0000_u32);

        assert_eq!(parsed[2]["op"], "double_buffer_ready");
        assert_eq!(parsed[2]["screen"], 1);
    }

    #[test]
    fn scaler_exports_fir_tables() {
        let v = to_json(&HwWrite::GraphicsScaler {
            screen: ScreenId(0),
            channel: 1,
            config: GraphicsScalerConfig::new(
                true,
                Size::new(1920, 1080),
                Size::new(960, 1080),
                ScalerParams {
                    hstep: 2 << 20,
                    vstep: 1 << 20,
                    hphase: 0,
                    vphase: 0,
                },
            ),
        });
        assert_eq!(v["op"], "graphics_scaler");
        assert_eq!(v["args"]["fir"], json!([9, 1]));
    }

    #[test]
    fn unrouted_pipe_exports_null_channel() {
        let v = to_json(&HwWrite::Pipe {
            screen: ScreenId(0),
            pipe: 3,
            config: PipeConfig::default(),
        });
        assert!(v["args"]["channel"].is_null());
    }

    #[test]
    fn export_empty_log() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
