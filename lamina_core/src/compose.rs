// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composition orchestrator.
//!
//! A [`Compositor`] owns one screen: its capabilities, its hardware handle and
//! the state that persists between passes (refresh rate, blank flag, display
//! size, last overlay scaler parameters). It has three main entry points:
//!
//! - [`apply_layers`](Compositor::apply_layers) turns a layer set into
//!   register writes;
//! - [`apply_manager`](Compositor::apply_manager) writes screen-level
//!   settings;
//! - [`sync`](Compositor::sync) flips the double buffer, so everything
//!   written since the previous flip takes effect at the next vertical blank.
//!
//! A layer pass is split into planning and committing. Planning runs every
//! stage and may fail:
//!
//! ```text
//!   LayerTable::build ──► LayerChangeSet
//!          │
//!          ▼
//!   per channel: stereo expansion ──► fine scaling ──► geometry
//!          │
//!          ▼
//!   zorder::resolve ──► coarse decimation ──► color space ──► layer records
//! ```
//!
//! Committing only issues [`DisplayHw`] calls, so a rejected layer set never
//! leaves a half-written register bank.

use alloc::vec::Vec;

use crate::backend::{DisplayHw, EnhanceInfo, EnhanceLayer, PipeConfig};
use crate::caps::{Capabilities, MAX_CHANNELS, MAX_LAYERS_PER_CHANNEL, ScreenCaps};
use crate::color::{ChannelColor, CscConfig, CscTarget};
use crate::config::{LayerChangeSet, LayerRecord, SlotInput};
use crate::error::ComposeError;
use crate::format::PixelFormat;
use crate::geom::{Rect, Size};
use crate::geometry::{self, ChannelGeometry};
use crate::layer::{LayerData, LayerDirty, LayerTable};
use crate::manager::{ManagerData, ManagerDirty};
use crate::scaler::coarse::{self, CoarseInput};
use crate::scaler::graphics::{self, GraphicsScalerConfig};
use crate::scaler::video::{self, VideoScalerConfig};
use crate::scaler::{self, LayerScale, ScalerParams};
use crate::screen::ScreenId;
use crate::trace::{
    ApplyBeginEvent, ApplyEndEvent, ChannelGeometryEvent, CoarseEvent, CscEvent,
    ManagerApplyEvent, PipeRouteEvent, ScalerEvent, ScalerKind, SyncEvent, Tracer,
};
use crate::zorder::{self, BlendMode, PipeRoute};

/// Fill color of every pipe outside its channel's layers.
pub const PIPE_FILL_COLOR: u32 = 0xff00_0000;

/// Start-up settings of a [`Compositor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositorConfig {
    /// Engine clock in Hz; 0 when unknown, which disables the clock budget
    /// of coarse decimation.
    pub engine_clock_hz: u32,
    /// Refresh rate assumed until [`Compositor::set_device_fps`] is called.
    pub default_fps: u32,
    /// Display size assumed until the manager sets one.
    pub default_display_size: Size,
}

impl CompositorConfig {
    /// 60 Hz, 1280×720, unknown engine clock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            engine_clock_hz: 0,
            default_fps: 60,
            default_display_size: Size::new(1280, 720),
        }
    }

    /// Returns a copy with the engine clock set.
    #[must_use]
    pub const fn with_engine_clock(mut self, hz: u32) -> Self {
        self.engine_clock_hz = hz;
        self
    }
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Scaler parameters a channel was last programmed with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelScale {
    /// Scaler active.
    pub enable: bool,
    /// Luma (or only) plane parameters.
    pub luma: ScalerParams,
    /// Chroma plane parameters (video channels).
    pub chroma: ScalerParams,
}

/// State of a screen that outlives a single pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenState {
    /// Refresh rate of the attached device.
    pub fps: u32,
    /// Output blanked by the manager.
    pub blank: bool,
    /// Display size last written by the manager.
    pub display_size: Size,
    /// Overlay scaler parameters of the last layer pass, by channel.
    pub overlay: [ChannelScale; MAX_CHANNELS],
}

/// Outcome of a successful layer pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Channel ↔ pipe assignment in effect.
    pub route: PipeRoute,
    /// Channels whose scaling could not meet every constraint and was
    /// decimated as far as possible instead.
    pub degraded: Vec<usize>,
}

struct SlotRecord {
    slot: usize,
    dirty: LayerDirty,
    record: LayerRecord,
}

struct ChannelPlan {
    geometry: ChannelGeometry,
    video_format: Option<PixelFormat>,
    zorder: Option<u8>,
    records: Vec<SlotRecord>,
}

enum ScalerPlan {
    Video(VideoScalerConfig),
    Graphics(GraphicsScalerConfig),
}

struct LayerPlan {
    changes: LayerChangeSet,
    channels: Vec<ChannelPlan>,
    route: PipeRoute,
    scalers: Vec<(usize, ScalerPlan)>,
    csc: Vec<(usize, CscConfig)>,
    pipes: Vec<PipeConfig>,
    enhance: Option<EnhanceInfo>,
    degraded: Vec<usize>,
}

/// Composition engine of one screen.
///
/// Only [`apply_layers`](Self::apply_layers) can fail, and it fails before
/// any register is touched. [`apply_manager`](Self::apply_manager) and
/// [`sync`](Self::sync) have nothing to validate and [`DisplayHw`] writes
/// cannot fail, so they return nothing.
#[derive(Debug)]
pub struct Compositor<H> {
    screen: ScreenId,
    caps: ScreenCaps,
    hw: H,
    state: ScreenState,
    de_freq_mhz: u32,
    enhance: EnhanceInfo,
}

impl<H: DisplayHw> Compositor<H> {
    /// Creates the compositor of `screen`.
    ///
    /// # Errors
    ///
    /// Fails if `caps` has no such screen or describes more channels or slots
    /// than the static tables hold.
    pub fn new(
        screen: ScreenId,
        caps: &Capabilities,
        config: CompositorConfig,
        hw: H,
    ) -> Result<Self, ComposeError> {
        let Some(screen_caps) = caps.screen(screen.index()) else {
            return Err(ComposeError::ScreenOutOfRange {
                screen: screen.index(),
                screens: caps.num_screens,
            });
        };
        if screen_caps.channels > MAX_CHANNELS
            || screen_caps.layers_per_channel > MAX_LAYERS_PER_CHANNEL
        {
            return Err(ComposeError::CapabilitiesExceeded {
                channels: screen_caps.channels,
                layers_per_channel: screen_caps.layers_per_channel,
            });
        }
        Ok(Self {
            screen,
            caps: *screen_caps,
            hw,
            state: ScreenState {
                fps: config.default_fps,
                blank: false,
                display_size: config.default_display_size,
                overlay: [ChannelScale::default(); MAX_CHANNELS],
            },
            de_freq_mhz: config.engine_clock_hz / 1_000_000,
            enhance: EnhanceInfo::default(),
        })
    }

    /// Screen this compositor drives.
    #[must_use]
    pub fn screen(&self) -> ScreenId {
        self.screen
    }

    /// Capabilities of the screen.
    #[must_use]
    pub fn caps(&self) -> &ScreenCaps {
        &self.caps
    }

    /// Persistent screen state.
    #[must_use]
    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Enhancement metadata of the last layer pass; stays at its default on
    /// screens without an enhancement processor.
    #[must_use]
    pub fn enhance_info(&self) -> &EnhanceInfo {
        &self.enhance
    }

    /// Hardware handle.
    #[must_use]
    pub fn hw(&self) -> &H {
        &self.hw
    }

    /// Mutable hardware handle.
    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Consumes the compositor and returns its hardware handle.
    #[must_use]
    pub fn into_hw(self) -> H {
        self.hw
    }

    /// Resets the mixer and its scalers.
    pub fn init(&mut self) {
        self.hw.init(self.screen);
    }

    /// Records the refresh rate of the attached device.
    pub fn set_device_fps(&mut self, fps: u32) {
        self.state.fps = fps;
    }

    /// Records the engine clock in Hz (kept at MHz resolution).
    pub fn set_engine_clock(&mut self, hz: u32) {
        self.de_freq_mhz = hz / 1_000_000;
    }

    /// Engine clock in Hz, at MHz resolution.
    #[must_use]
    pub fn engine_clock(&self) -> u32 {
        self.de_freq_mhz * 1_000_000
    }

    /// Composes `layers` onto the screen.
    ///
    /// `manager_csc` is the output side of every channel's color-space
    /// converter. Only registers whose dirty bits are set (after channel-wide
    /// promotion) are rewritten; routing, blending, scalers and converters
    /// are always rewritten.
    ///
    /// # Errors
    ///
    /// Fails without writing anything if the layer set does not fit the
    /// screen's capabilities.
    pub fn apply_layers(
        &mut self,
        layers: &[LayerData],
        manager_csc: CscTarget,
        tracer: &mut Tracer<'_>,
    ) -> Result<ApplyReport, ComposeError> {
        tracer.apply_begin(&ApplyBeginEvent {
            screen: self.screen,
            layers: layers.len(),
        });
        let plan = self.plan(layers, manager_csc, tracer)?;
        self.commit(&plan);

        let report = ApplyReport {
            route: plan.route,
            degraded: plan.degraded,
        };
        tracer.apply_end(&ApplyEndEvent {
            screen: self.screen,
            pipes_enabled: report.route.enabled().iter().filter(|e| **e).count(),
            degraded: report.degraded.len(),
        });
        Ok(report)
    }

    fn plan(
        &self,
        layers: &[LayerData],
        manager_csc: CscTarget,
        tracer: &mut Tracer<'_>,
    ) -> Result<LayerPlan, ComposeError> {
        let caps = &self.caps;
        let screen = self.screen;
        let display = self.state.display_size;

        let table = LayerTable::build(layers, caps.channels, caps.layers_per_channel)?;
        let changes = LayerChangeSet::new(&table);

        let mut channels = Vec::with_capacity(caps.channels);
        for ch in 0..caps.channels {
            let plan = Self::plan_channel(caps, &table, &changes, ch, display);
            let g = &plan.geometry;
            tracer.channel_geometry(&ChannelGeometryEvent {
                screen,
                channel: ch,
                used: g.used,
                blend: g.blend,
                overlay: g.overlay,
                premultiply: g.premultiply,
            });
            channels.push(plan);
        }

        let zorders: Vec<Option<u8>> = channels.iter().map(|c| c.zorder).collect();
        let route = zorder::resolve(&zorders, self.state.blank)?;
        for pipe in 0..route.pipes() {
            tracer.pipe_route(&PipeRouteEvent {
                screen,
                pipe,
                channel: route.channel_of(pipe),
                enabled: route.is_enabled(pipe),
            });
        }

        let mut scalers = Vec::new();
        let mut degraded = Vec::new();
        for (ch, c) in channels.iter().enumerate() {
            if !caps.has_scaler(ch) {
                continue;
            }
            let g = &c.geometry;
            let out = g.blend.size();
            if caps.is_video(ch) {
                let format = c.video_format.unwrap_or_default();
                let decision = coarse::estimate(&CoarseInput {
                    format,
                    lcd_fps: self.state.fps,
                    lcd_height: display.height,
                    de_freq_mhz: self.de_freq_mhz,
                    line_buffer: caps.scale_line_buffer,
                    overlay: g.overlay,
                    out,
                });
                let mut luma = g.scale.luma;
                let mut chroma = g.scale.chroma.unwrap_or(luma);
                coarse::recalc(&decision, out, video::FRAC_BITS, &mut luma, &mut chroma);
                if decision.is_active() {
                    tracer.coarse(&CoarseEvent {
                        screen,
                        channel: ch,
                        decision,
                    });
                }
                if decision.degraded {
                    degraded.push(ch);
                }
                let enable = g.used
                    && (decision.is_active()
                        || !scaler::is_bypass(g.overlay, out, c.video_format));
                let config =
                    VideoScalerConfig::new(enable, format, &decision, out, luma, chroma);
                tracer.scaler(&ScalerEvent {
                    screen,
                    channel: ch,
                    kind: ScalerKind::Video,
                    enable,
                    in_size: config.in_size,
                    out_size: out,
                    params: luma,
                });
                scalers.push((ch, ScalerPlan::Video(config)));
            } else {
                let config = GraphicsScalerConfig::new(
                    g.used && !scaler::is_bypass(g.overlay, out, None),
                    g.overlay,
                    out,
                    g.scale.luma,
                );
                tracer.scaler(&ScalerEvent {
                    screen,
                    channel: ch,
                    kind: ScalerKind::Graphics,
                    enable: config.enable,
                    in_size: config.in_size,
                    out_size: out,
                    params: config.params,
                });
                scalers.push((ch, ScalerPlan::Graphics(config)));
            }
        }

        let mut csc = Vec::new();
        for (ch, c) in channels.iter().enumerate() {
            if !c.geometry.used {
                continue;
            }
            let color = ChannelColor::fold(
                table
                    .enabled(ch)
                    .map(|l| (l.info.fb.format, l.info.fb.color_space, l.info.fb.size[0])),
            );
            let config = color.csc(manager_csc);
            tracer.csc(&CscEvent {
                screen,
                channel: ch,
                config,
            });
            csc.push((ch, config));
        }

        let pipes = (0..route.pipes())
            .map(|pipe| {
                let channel = route.channel_of(pipe);
                let geometry = channel.and_then(|c| channels.get(c)).map(|c| &c.geometry);
                PipeConfig {
                    channel,
                    rect: geometry.map_or(Rect::ZERO, |g| g.blend),
                    fill_color: PIPE_FILL_COLOR,
                    premultiply: geometry.is_some_and(|g| g.premultiply),
                }
            })
            .collect();

        let enhance = (caps.enhance && caps.video_channels > 0).then(|| {
            let mut enhance = EnhanceInfo::default();
            for l in table.enabled(0) {
                if let Some(e) = enhance.layers.get_mut(usize::from(l.slot)) {
                    *e = EnhanceLayer {
                        enable: true,
                        fb_size: l.info.fb.size[0],
                        crop_x: l.info.fb.crop.x_pixels(),
                        crop_y: l.info.fb.crop.y_pixels(),
                        format: l.info.fb.format,
                    };
                }
            }
            if let Some(c) = channels.first() {
                enhance.overlay_size = c.geometry.overlay;
                enhance.blend_size = c.geometry.blend.size();
            }
            enhance
        });

        Ok(LayerPlan {
            changes,
            channels,
            route,
            scalers,
            csc,
            pipes,
            enhance,
            degraded,
        })
    }

    fn plan_channel(
        caps: &ScreenCaps,
        table: &LayerTable<'_>,
        changes: &LayerChangeSet,
        ch: usize,
        display: Size,
    ) -> ChannelPlan {
        let video = caps.is_video(ch);
        let video_format = if video {
            table
                .enabled(ch)
                .map(|l| l.info.fb.format)
                .filter(|f| f.is_video_yuv())
                .last()
        } else {
            None
        };

        let slots: Vec<_> = table
            .physical(ch, display)
            .map(|l| {
                let scale = if !l.enabled {
                    LayerScale::default()
                } else if video {
                    video::layer_params(video_format.unwrap_or_default(), l.crop, l.frame)
                } else {
                    graphics::layer_params(l.crop, l.frame)
                };
                (l, scale)
            })
            .collect();

        let frac = if video {
            video::FRAC_BITS
        } else {
            graphics::FRAC_BITS
        };
        let geometry = geometry::resolve(&slots, frac, display);
        // A channel takes a pipe as soon as it has an enabled layer, even one
        // clipped away entirely; its pipe then blends an empty rectangle.
        let zorder = table.enabled(ch).last().map(|l| l.info.zorder);

        let mut records: Vec<SlotRecord> = slots
            .iter()
            .map(|(l, scale)| SlotRecord {
                slot: l.slot,
                dirty: changes.get(ch, l.slot),
                record: LayerRecord::build(&SlotInput {
                    data: l.data,
                    eye: l.eye,
                    enabled: l.enabled,
                    crop: scale.crop,
                    placement: geometry.placements.get(l.slot).copied().unwrap_or_default(),
                    premultiply: geometry.premultiply,
                }),
            })
            .collect();

        // Slots without a descriptor are switched off whenever the channel is
        // rewritten.
        if !changes.channel(ch).is_empty() {
            for slot in 0..caps.layers_per_channel {
                if records.iter().all(|r| r.slot != slot) {
                    records.push(SlotRecord {
                        slot,
                        dirty: LayerDirty::ATTR,
                        record: LayerRecord::default(),
                    });
                }
            }
            records.sort_by_key(|r| r.slot);
        }

        ChannelPlan {
            geometry,
            video_format,
            zorder,
            records,
        }
    }

    fn commit(&mut self, plan: &LayerPlan) {
        let screen = self.screen;
        let hw = &mut self.hw;

        for (ch, scaler) in &plan.scalers {
            match scaler {
                ScalerPlan::Video(config) => {
                    hw.set_video_scaler(screen, *ch, config);
                    self.state.overlay[*ch] = ChannelScale {
                        enable: config.enable,
                        luma: config.luma,
                        chroma: config.chroma,
                    };
                }
                ScalerPlan::Graphics(config) => {
                    hw.set_graphics_scaler(screen, *ch, config);
                    self.state.overlay[*ch] = ChannelScale {
                        enable: config.enable,
                        luma: config.params,
                        chroma: ScalerParams::default(),
                    };
                }
            }
        }

        for (ch, config) in &plan.csc {
            hw.set_csc(screen, *ch, config);
        }

        for (ch, c) in plan.channels.iter().enumerate() {
            if plan.changes.channel(ch).contains(LayerDirty::SIZE) {
                hw.set_overlay_size(screen, ch, c.geometry.overlay);
            }
            for r in &c.records {
                if r.dirty.contains(LayerDirty::ATTR) {
                    hw.set_layer(screen, ch, r.slot, &r.record);
                }
                if r.dirty.contains(LayerDirty::FILL_COLOR) {
                    hw.set_layer_fill_color(
                        screen,
                        ch,
                        r.slot,
                        r.record.fill_color_enable,
                        r.record.fill_color,
                    );
                }
                if r.dirty.contains(LayerDirty::HIGH_ADDR) {
                    hw.set_layer_high_addr(screen, ch, r.slot, r.record.high_addr);
                }
            }
        }

        hw.set_pipe_enable(screen, plan.route.enabled());
        for (pipe, config) in plan.pipes.iter().enumerate() {
            hw.set_pipe(screen, pipe, config);
        }
        for pipe in 0..plan.pipes.len().saturating_sub(1) {
            hw.set_blend_mode(screen, pipe, BlendMode::SourceOver);
        }

        if let Some(enhance) = &plan.enhance {
            hw.set_enhance_info(screen, enhance);
            self.enhance = *enhance;
        }
    }

    /// Applies screen-level settings whose dirty bits are set.
    ///
    /// The blank flag is always taken over; it disables every pipe from the
    /// next layer pass on.
    pub fn apply_manager(&mut self, data: &ManagerData, tracer: &mut Tracer<'_>) {
        let screen = self.screen;
        let config = &data.config;
        let dirty = data.dirty;

        self.state.blank = config.blank;

        if dirty.contains(ManagerDirty::BACK_COLOR) {
            self.hw
                .set_background_color(screen, config.back_color.to_u32());
        }
        if dirty.contains(ManagerDirty::SIZE) {
            self.hw.set_blend_size(screen, config.size);
            self.hw.set_display_size(screen, config.size);
            self.state.display_size = config.size;
        }
        if dirty.contains(ManagerDirty::ENABLE) {
            self.hw.set_enable(screen, config.enable);
            if self.caps.output_mux {
                self.hw.set_output_mux(screen, config.hwdev_index);
            }
            self.hw.set_interlace(screen, config.interlace);
        }
        if dirty.contains(ManagerDirty::COLOR_SPACE) {
            self.hw.set_blend_color_space(screen, config.blend_space);
        }

        tracer.manager_apply(&ManagerApplyEvent {
            screen,
            dirty,
            blank: config.blank,
        });
    }

    /// Flips the double buffer.
    pub fn sync(&mut self, tracer: &mut Tracer<'_>) {
        self.hw.set_double_buffer_ready(self.screen);
        tracer.sync(&SyncEvent {
            screen: self.screen,
        });
    }

    /// Flushes cached register images of the mixer, scalers and converters.
    pub fn update_regs(&mut self) {
        self.hw.update_regs(self.screen);
    }

    /// Returns `true` and acknowledges if a vsync interrupt is pending.
    pub fn query_irq(&mut self) -> bool {
        self.hw.query_irq(self.screen)
    }

    /// Enables or disables the vsync interrupt.
    pub fn enable_irq(&mut self, enable: bool) {
        self.hw.enable_irq(self.screen, enable);
    }
}
