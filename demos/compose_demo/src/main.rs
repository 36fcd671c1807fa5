// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composes a sample scene against recording hardware.
//!
//! The scene is a 1080p video layer scaled into a 720p window on the video
//! channel, a UI plane on a graphics channel stacked below it by z-order, and
//! a solid cursor layer. The pass trace goes to stderr and the recorded
//! register programming is printed to stdout as JSON.

use std::io::Write;

use lamina_core::caps::Capabilities;
use lamina_core::color::CscTarget;
use lamina_core::compose::{Compositor, CompositorConfig};
use lamina_core::error::ComposeError;
use lamina_core::format::PixelFormat;
use lamina_core::geom::{Rect, Rect64, Size};
use lamina_core::layer::{LayerData, LayerDirty, LayerInfo, LayerMode};
use lamina_core::manager::{Argb, ManagerConfig, ManagerData, ManagerDirty};
use lamina_core::record::RecordingHw;
use lamina_core::screen::ScreenId;
use lamina_core::trace::Tracer;
use lamina_debug::pretty::PrettyPrintSink;

const DISPLAY: Size = Size::new(1920, 1080);

fn video_layer() -> LayerData {
    let mut info = LayerInfo {
        zorder: 2,
        screen_win: Rect::new(320, 180, 1280, 720),
        ..LayerInfo::default()
    };
    info.fb.format = PixelFormat::Yuv420SemiPlanarUvuv;
    info.fb.addr = [0x4800_0000, 0x4820_0000, 0];
    info.fb.size = [Size::new(1920, 1080), Size::new(960, 540), Size::ZERO];
    info.fb.crop = Rect64::from_pixels(0, 0, 1920, 1080);
    LayerData {
        enable: true,
        channel: 0,
        slot: 0,
        info,
        dirty: LayerDirty::ALL,
    }
}

fn ui_layer() -> LayerData {
    let mut info = LayerInfo {
        zorder: 1,
        screen_win: Rect::from_size(DISPLAY),
        ..LayerInfo::default()
    };
    info.fb.addr[0] = 0x5000_0000;
    info.fb.size[0] = DISPLAY;
    info.fb.crop = Rect64::from_pixels(0, 0, DISPLAY.width, DISPLAY.height);
    info.fb.pre_multiply = true;
    LayerData {
        enable: true,
        channel: 1,
        slot: 0,
        info,
        dirty: LayerDirty::ALL,
    }
}

fn cursor_layer() -> LayerData {
    let mut info = LayerInfo {
        mode: LayerMode::FillColor,
        fill_color: 0xffff_ffff,
        zorder: 3,
        screen_win: Rect::new(960, 540, 16, 16),
        ..LayerInfo::default()
    };
    info.fb.size[0] = Size::new(16, 16);
    info.fb.crop = Rect64::from_pixels(0, 0, 16, 16);
    LayerData {
        enable: true,
        channel: 2,
        slot: 0,
        info,
        dirty: LayerDirty::ALL,
    }
}

fn main() -> Result<(), ComposeError> {
    let config = CompositorConfig::new().with_engine_clock(432_000_000);
    let mut compositor = Compositor::new(
        ScreenId(0),
        &Capabilities::sun50iw1(),
        config,
        RecordingHw::new(),
    )?;

    // -- sinks -------------------------------------------------------------
    let mut sink = PrettyPrintSink::stderr();
    let mut tracer = Tracer::new(&mut sink);

    // -- screen ------------------------------------------------------------
    compositor.init();
    compositor.apply_manager(
        &ManagerData {
            config: ManagerConfig {
                back_color: Argb::BLACK,
                size: DISPLAY,
                enable: true,
                ..ManagerConfig::default()
            },
            dirty: ManagerDirty::ALL,
        },
        &mut tracer,
    );

    // -- layers ------------------------------------------------------------
    let layers = [video_layer(), ui_layer(), cursor_layer()];
    let report = compositor.apply_layers(&layers, CscTarget::default(), &mut tracer)?;
    compositor.sync(&mut tracer);

    for pipe in 0..report.route.pipes() {
        if let Some(channel) = report.route.channel_of(pipe) {
            eprintln!("pipe {pipe} <- channel {channel}");
        }
    }
    if !report.degraded.is_empty() {
        eprintln!("degraded channels: {:?}", report.degraded);
    }

    // -- export ------------------------------------------------------------
    let writes = compositor.into_hw().take_writes();
    let mut stdout = std::io::stdout().lock();
    if let Err(err) = lamina_debug::export::export(&writes, &mut stdout) {
        eprintln!("export failed: {err}");
        return Ok(());
    }
    let _ = writeln!(stdout);
    Ok(())
}
