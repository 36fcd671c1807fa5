// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`DisplayHw`] that records every call.
//!
//! [`RecordingHw`] appends one [`HwWrite`] per call, in call order. Tests
//! assert on the sequence; host tools replay or export it.

use alloc::vec::Vec;

use crate::backend::{DisplayHw, EnhanceInfo, PipeConfig};
use crate::color::{ColorClass, CscConfig};
use crate::config::{LayerRecord, PLANES};
use crate::geom::Size;
use crate::scaler::graphics::GraphicsScalerConfig;
use crate::scaler::video::VideoScalerConfig;
use crate::screen::ScreenId;
use crate::zorder::BlendMode;

/// One recorded [`DisplayHw`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[expect(missing_docs, reason = "fields mirror the DisplayHw method arguments")]
pub enum HwWrite {
    /// [`DisplayHw::set_overlay_size`].
    OverlaySize {
        screen: ScreenId,
        channel: usize,
        size: Size,
    },
    /// [`DisplayHw::set_layer`].
    Layer {
        screen: ScreenId,
        channel: usize,
        slot: usize,
        record: LayerRecord,
    },
    /// [`DisplayHw::set_layer_fill_color`].
    LayerFillColor {
        screen: ScreenId,
        channel: usize,
        slot: usize,
        enable: bool,
        color: u32,
    },
    /// [`DisplayHw::set_layer_high_addr`].
    LayerHighAddr {
        screen: ScreenId,
        channel: usize,
        slot: usize,
        high: [u8; PLANES],
    },
    /// [`DisplayHw::set_pipe_enable`].
    PipeEnable { screen: ScreenId, enabled: Vec<bool> },
    /// [`DisplayHw::set_pipe`].
    Pipe {
        screen: ScreenId,
        pipe: usize,
        config: PipeConfig,
    },
    /// [`DisplayHw::set_blend_mode`].
    BlendMode {
        screen: ScreenId,
        pipe: usize,
        mode: BlendMode,
    },
    /// [`DisplayHw::set_video_scaler`].
    VideoScaler {
        screen: ScreenId,
        channel: usize,
        config: VideoScalerConfig,
    },
    /// [`DisplayHw::set_graphics_scaler`].
    GraphicsScaler {
        screen: ScreenId,
        channel: usize,
        config: GraphicsScalerConfig,
    },
    /// [`DisplayHw::set_csc`].
    Csc {
        screen: ScreenId,
        channel: usize,
        config: CscConfig,
    },
    /// [`DisplayHw::set_enhance_info`].
    EnhanceInfo { screen: ScreenId, info: EnhanceInfo },
    /// [`DisplayHw::set_background_color`].
    BackgroundColor { screen: ScreenId, color: u32 },
    /// [`DisplayHw::set_blend_size`].
    BlendSize { screen: ScreenId, size: Size },
    /// [`DisplayHw::set_display_size`].
    DisplaySize { screen: ScreenId, size: Size },
    /// [`DisplayHw::set_enable`].
    Enable { screen: ScreenId, enable: bool },
    /// [`DisplayHw::set_output_mux`].
    OutputMux { screen: ScreenId, device: u32 },
    /// [`DisplayHw::set_interlace`].
    Interlace { screen: ScreenId, interlace: bool },
    /// [`DisplayHw::set_blend_color_space`].
    BlendColorSpace { screen: ScreenId, space: ColorClass },
    /// [`DisplayHw::set_double_buffer_ready`].
    DoubleBufferReady { screen: ScreenId },
    /// [`DisplayHw::update_regs`].
    UpdateRegs { screen: ScreenId },
    /// [`DisplayHw::enable_irq`].
    EnableIrq { screen: ScreenId, enable: bool },
    /// [`DisplayHw::init`].
    Init { screen: ScreenId },
}

impl HwWrite {
    /// Screen the call addressed.
    #[must_use]
    pub fn screen(&self) -> ScreenId {
        match self {
            Self::OverlaySize { screen, .. }
            | Self::Layer { screen, .. }
            | Self::LayerFillColor { screen, .. }
            | Self::LayerHighAddr { screen, .. }
            | Self::PipeEnable { screen, .. }
            | Self::Pipe { screen, .. }
            | Self::BlendMode { screen, .. }
            | Self::VideoScaler { screen, .. }
            | Self::GraphicsScaler { screen, .. }
            | Self::Csc { screen, .. }
            | Self::EnhanceInfo { screen, .. }
            | Self::BackgroundColor { screen, .. }
            | Self::BlendSize { screen, .. }
            | Self::DisplaySize { screen, .. }
            | Self::Enable { screen, .. }
            | Self::OutputMux { screen, .. }
            | Self::Interlace { screen, .. }
            | Self::BlendColorSpace { screen, .. }
            | Self::DoubleBufferReady { screen }
            | Self::UpdateRegs { screen }
            | Self::EnableIrq { screen, .. }
            | Self::Init { screen } => *screen,
        }
    }
}

/// Logs every [`DisplayHw`] call.
#[derive(Clone, Debug, Default)]
pub struct RecordingHw {
    writes: Vec<HwWrite>,
    /// Answer of the next [`DisplayHw::query_irq`]; cleared by the query.
    pub irq_pending: bool,
}

impl RecordingHw {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    #[must_use]
    pub fn writes(&self) -> &[HwWrite] {
        &self.writes
    }

    /// Removes and returns the recorded calls.
    pub fn take_writes(&mut self) -> Vec<HwWrite> {
        core::mem::take(&mut self.writes)
    }

    fn push(&mut self, write: HwWrite) {
        self.writes.push(write);
    }
}

impl DisplayHw for RecordingHw {
    fn set_overlay_size(&mut self, screen: ScreenId, channel: usize, size: Size) {
        self.push(HwWrite::OverlaySize {
            screen,
            channel,
            size,
        });
    }

    fn set_layer(&mut self, screen: ScreenId, channel: usize, slot: usize, record: &LayerRecord) {
        self.push(HwWrite::Layer {
            screen,
            channel,
            slot,
            record: *record,
        });
    }

    fn set_layer_fill_color(
        &mut self,
        screen: ScreenId,
        channel: usize,
        slot: usize,
        enable: bool,
        color: u32,
    ) {
        self.push(HwWrite::LayerFillColor {
            screen,
            channel,
            slot,
            enable,
            color,
        });
    }

    fn set_layer_high_addr(
        &mut self,
        screen: ScreenId,
        channel: usize,
        slot: usize,
        high: [u8; PLANES],
    ) {
        self.push(HwWrite::LayerHighAddr {
            screen,
            channel,
            slot,
            high,
        });
    }

    fn set_pipe_enable(&mut self, screen: ScreenId, enabled: &[bool]) {
        self.push(HwWrite::PipeEnable {
            screen,
            enabled: enabled.to_vec(),
        });
    }

    fn set_pipe(&mut self, screen: ScreenId, pipe: usize, config: &PipeConfig) {
        self.push(HwWrite::Pipe {
            screen,
            pipe,
            config: *config,
        });
    }

    fn set_blend_mode(&mut self, screen: ScreenId, pipe: usize, mode: BlendMode) {
        self.push(HwWrite::BlendMode { screen, pipe, mode });
    }

    fn set_video_scaler(&mut self, screen: ScreenId, channel: usize, config: &VideoScalerConfig) {
        self.push(HwWrite::VideoScaler {
            screen,
            channel,
            config: *config,
        });
    }

    fn set_graphics_scaler(
        &mut self,
        screen: ScreenId,
        channel: usize,
        config: &GraphicsScalerConfig,
    ) {
        self.push(HwWrite::GraphicsScaler {
            screen,
            channel,
            config: *config,
        });
    }

    fn set_csc(&mut self, screen: ScreenId, channel: usize, config: &CscConfig) {
        self.push(HwWrite::Csc {
            screen,
            channel,
            config: *config,
        });
    }

    fn set_enhance_info(&mut self, screen: ScreenId, info: &EnhanceInfo) {
        self.push(HwWrite::EnhanceInfo {
            screen,
            info: *info,
        });
    }

    fn set_background_color(&mut self, screen: ScreenId, color: u32) {
        self.push(HwWrite::BackgroundColor { screen, color });
    }

    fn set_blend_size(&mut self, screen: ScreenId, size: Size) {
        self.push(HwWrite::BlendSize { screen, size });
    }

    fn set_display_size(&mut self, screen: ScreenId, size: Size) {
        self.push(HwWrite::DisplaySize { screen, size });
    }

    fn set_enable(&mut self, screen: ScreenId, enable: bool) {
        self.push(HwWrite::Enable { screen, enable });
    }

    fn set_output_mux(&mut self, screen: ScreenId, device: u32) {
        self.push(HwWrite::OutputMux { screen, device });
    }

    fn set_interlace(&mut self, screen: ScreenId, interlace: bool) {
        self.push(HwWrite::Interlace { screen, interlace });
    }

    fn set_blend_color_space(&mut self, screen: ScreenId, space: ColorClass) {
        self.push(HwWrite::BlendColorSpace { screen, space });
    }

    fn set_double_buffer_ready(&mut self, screen: ScreenId) {
        self.push(HwWrite::DoubleBufferReady { screen });
    }

    fn update_regs(&mut self, screen: ScreenId) {
        self.push(HwWrite::UpdateRegs { screen });
    }

    fn query_irq(&mut self, screen: ScreenId) -> bool {
        _ = screen;
        core::mem::take(&mut self.irq_pending)
    }

    fn enable_irq(&mut self, screen: ScreenId, enable: bool) {
        self.push(HwWrite::EnableIrq { screen, enable });
    }

    fn init(&mut self, screen: ScreenId) {
        self.push(HwWrite::Init { screen });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calls_are_logged_in_order() {
        let mut hw = RecordingHw::new();
        let s = ScreenId(1);
        hw.set_background_color(s, 0xff00_0000);
        hw.set_double_buffer_ready(s);
        assert_eq!(
            hw.writes(),
            [
                HwWrite::BackgroundColor {
                    screen: s,
                    color: 0xff00_0000
                },
                HwWrite::DoubleBufferReady { screen: s },
            ]
        );
        assert!(hw.writes().iter().all(|w| w.screen() == s));
        assert_eq!(hw.take_writes().len(), 2);
        assert!(hw.writes().is_empty());
    }

    #[test]
    fn query_irq_acknowledges() {
        let mut hw = RecordingHw::new();
        hw.irq_pending = true;
        assert!(hw.query_irq(ScreenId(0)));
        assert!(!hw.query_irq(ScreenId(0)));
        assert!(hw.writes().is_empty());
    }
}
