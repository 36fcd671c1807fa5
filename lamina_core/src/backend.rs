// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hardware-access contract.
//!
//! The composition core never touches registers itself. Everything it
//! decides is handed to a [`DisplayHw`] implementation, one call per register
//! group:
//!
//! - **Layer registers**: overlay size, per-slot attribute record and low
//!   addresses, fill color, high address bytes.
//! - **Blender**: pipe enables, per-pipe rectangle, fill, route and
//!   pre-multiply, blend mode between adjacent pipes.
//! - **Scalers**: video and graphics scaler parameters.
//! - **Color-space converters**: one per channel.
//! - **Manager**: background color, blend/display size, output enable, device
//!   routing, interlace, blend color space.
//! - **Control**: double-buffer flip, shadow-register flush, vsync interrupt.
//! - **Enhancement**: metadata for a downstream image-enhancement block.
//!
//! All methods are infallible: the core validates a pass completely before
//! its first call, and register writes cannot fail.
//!
//! # Crate boundaries
//!
//! `lamina_core` owns the data model, every planning stage and this contract.
//! A platform crate implements [`DisplayHw`] over its memory-mapped register
//! banks; [`RecordingHw`](crate::record::RecordingHw) implements it by logging,
//! for tests and host-side simulation.

use crate::caps::MAX_LAYERS_PER_CHANNEL;
use crate::color::{ColorClass, CscConfig};
use crate::config::{LayerRecord, PLANES};
use crate::format::PixelFormat;
use crate::geom::{Rect, Size};
use crate::scaler::graphics::GraphicsScalerConfig;
use crate::scaler::video::VideoScalerConfig;
use crate::screen::ScreenId;
use crate::zorder::BlendMode;

/// Register image of one blender input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PipeConfig {
    /// Channel routed into the pipe.
    pub channel: Option<usize>,
    /// Rectangle the pipe covers on screen.
    pub rect: Rect,
    /// Fill color outside the channel's layers, ARGB8888.
    pub fill_color: u32,
    /// Input carries pre-multiplied alpha.
    pub premultiply: bool,
}

/// Per-layer metadata of the first video channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EnhanceLayer {
    /// Layer shown.
    pub enable: bool,
    /// Luma plane size of the framebuffer.
    pub fb_size: Size,
    /// Integer crop origin.
    pub crop_x: i32,
    /// Integer crop origin.
    pub crop_y: i32,
    /// Pixel format.
    pub format: PixelFormat,
}

/// Metadata for the image-enhancement block, refreshed every pass on screens
/// that have one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EnhanceInfo {
    /// Layers of the first video channel, by slot.
    pub layers: [EnhanceLayer; MAX_LAYERS_PER_CHANNEL],
    /// Overlay size of the first video channel.
    pub overlay_size: Size,
    /// Blend size of the first video channel.
    pub blend_size: Size,
}

/// Register access for one display engine.
pub trait DisplayHw {
    /// Sets the pre-scale overlay size of `channel`.
    fn set_overlay_size(&mut self, screen: ScreenId, channel: usize, size: Size);

    /// Writes the attribute record and low plane addresses of a slot.
    fn set_layer(&mut self, screen: ScreenId, channel: usize, slot: usize, record: &LayerRecord);

    /// Writes the fill-color state of a slot.
    fn set_layer_fill_color(
        &mut self,
        screen: ScreenId,
        channel: usize,
        slot: usize,
        enable: bool,
        color: u32,
    );

    /// Writes the high address bytes of a slot.
    fn set_layer_high_addr(
        &mut self,
        screen: ScreenId,
        channel: usize,
        slot: usize,
        high: [u8; PLANES],
    );

    /// Enables or disables every pipe at once, indexed by pipe.
    fn set_pipe_enable(&mut self, screen: ScreenId, enabled: &[bool]);

    /// Configures one pipe.
    fn set_pipe(&mut self, screen: ScreenId, pipe: usize, config: &PipeConfig);

    /// Sets how `pipe + 1` is combined with the result of pipes `0..=pipe`.
    fn set_blend_mode(&mut self, screen: ScreenId, pipe: usize, mode: BlendMode);

    /// Programs the video scaler of `channel`.
    fn set_video_scaler(&mut self, screen: ScreenId, channel: usize, config: &VideoScalerConfig);

    /// Programs the graphics scaler of `channel`.
    fn set_graphics_scaler(
        &mut self,
        screen: ScreenId,
        channel: usize,
        config: &GraphicsScalerConfig,
    );

    /// Programs the color-space converter of `channel`.
    fn set_csc(&mut self, screen: ScreenId, channel: usize, config: &CscConfig);

    /// Publishes enhancement metadata.
    fn set_enhance_info(&mut self, screen: ScreenId, info: &EnhanceInfo);

    /// Sets the background color, ARGB8888.
    fn set_background_color(&mut self, screen: ScreenId, color: u32);

    /// Sets the blender output size.
    fn set_blend_size(&mut self, screen: ScreenId, size: Size);

    /// Sets the mixer output size.
    fn set_display_size(&mut self, screen: ScreenId, size: Size);

    /// Enables or disables the mixer output.
    fn set_enable(&mut self, screen: ScreenId, enable: bool);

    /// Selects the timing controller the mixer drives.
    fn set_output_mux(&mut self, screen: ScreenId, device: u32);

    /// Selects interlaced or progressive output.
    fn set_interlace(&mut self, screen: ScreenId, interlace: bool);

    /// Selects the color space the blender works in.
    fn set_blend_color_space(&mut self, screen: ScreenId, space: ColorClass);

    /// Marks the shadow registers ready; they take effect at the next
    /// vertical blank.
    fn set_double_buffer_ready(&mut self, screen: ScreenId);

    /// Flushes cached register images to the hardware.
    fn update_regs(&mut self, screen: ScreenId);

    /// Returns `true` and acknowledges if a vsync interrupt is pending.
    fn query_irq(&mut self, screen: ScreenId) -> bool;

    /// Enables or disables the vsync interrupt.
    fn enable_irq(&mut self, screen: ScreenId, enable: bool);

    /// Resets the mixer and its scalers.
    fn init(&mut self, screen: ScreenId);
}
