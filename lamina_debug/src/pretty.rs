// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use lamina_core::geom::{Rect, Size};
use lamina_core::trace::{
    ApplyBeginEvent, ApplyEndEvent, ChannelGeometryEvent, CoarseEvent, CscEvent,
    ManagerApplyEvent, PipeRouteEvent, ScalerEvent, ScalerKind, SyncEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its destination.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

struct R(Rect);

impl std::fmt::Display for R {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.0;
        write!(f, "{}x{}@{},{}", r.w, r.h, r.x, r.y)
    }
}

struct S(Size);

impl std::fmt::Display for S {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.0.width, self.0.height)
    }
}

fn kind_name(kind: ScalerKind) -> &'static str {
    match kind {
        ScalerKind::Video => "vsu",
        ScalerKind::Graphics => "gsu",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_apply_begin(&mut self, e: &ApplyBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[apply:begin] screen={} layers={}",
            e.screen.0, e.layers,
        );
    }

    fn on_channel_geometry(&mut self, e: &ChannelGeometryEvent) {
        if !e.used {
            let _ = writeln!(
                self.writer,
                "[channel] screen={} ch={} unused",
                e.screen.0, e.channel,
            );
            return;
        }
        let _ = writeln!(
            self.writer,
            "[channel] screen={} ch={} blend={} overlay={} premul={}",
            e.screen.0,
            e.channel,
            R(e.blend),
            S(e.overlay),
            e.premultiply,
        );
    }

    fn on_pipe_route(&mut self, e: &PipeRouteEvent) {
        let channel = e
            .channel
            .map_or_else(|| "-".to_owned(), |c| c.to_string());
        let state = if e.enabled { "on" } else { "off" };
        let _ = writeln!(
            self.writer,
            "[pipe] screen={} pipe={} ch={channel} {state}",
            e.screen.0, e.pipe,
        );
    }

    fn on_scaler(&mut self, e: &ScalerEvent) {
        let _ = writeln!(
            self.writer,
            "[{}] screen={} ch={} enable={} in={} out={} hstep={:#x} vstep={:#x}",
            kind_name(e.kind),
            e.screen.0,
            e.channel,
            e.enable,
            S(e.in_size),
            S(e.out_size),
            e.params.hstep,
            e.params.vstep,
        );
    }

    fn on_coarse(&mut self, e: &CoarseEvent) {
        let d = &e.decision;
        let degraded = if d.degraded { " DEGRADED" } else { "" };
        let _ = writeln!(
            self.writer,
            "[coarse] screen={} ch={} factor={}x{} mid={}{degraded}",
            e.screen.0,
            e.channel,
            d.h_factor,
            d.v_factor,
            S(d.mid),
        );
    }

    fn on_csc(&mut self, e: &CscEvent) {
        let c = &e.config;
        let _ = writeln!(
            self.writer,
            "[csc] screen={} ch={} {:?}/{:?}/{:?} -> {:?}/{:?}/{:?}",
            e.screen.0,
            e.channel,
            c.in_class,
            c.in_matrix,
            c.in_range,
            c.out_class,
            c.out_matrix,
            c.out_range,
        );
    }

    fn on_apply_end(&mut self, e: &ApplyEndEvent) {
        let _ = writeln!(
            self.writer,
            "[apply:end] screen={} pipes={} degraded={}",
            e.screen.0, e.pipes_enabled, e.degraded,
        );
    }

    fn on_manager_apply(&mut self, e: &ManagerApplyEvent) {
        let _ = writeln!(
            self.writer,
            "[manager] screen={} dirty={:#x} blank={}",
            e.screen.0,
            e.dirty.bits(),
            e.blank,
        );
    }

    fn on_sync(&mut self, e: &SyncEvent) {
        let _ = writeln!(self.writer, "[sync] screen={}", e.screen.0);
    }
}
