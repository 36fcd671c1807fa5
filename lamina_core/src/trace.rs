// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for composition passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Compositor`](crate::compose::Compositor) calls at each planning stage.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::color::CscConfig;
use crate::geom::{Rect, Size};
use crate::manager::ManagerDirty;
use crate::scaler::ScalerParams;
use crate::scaler::coarse::CoarseDecision;
use crate::screen::ScreenId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which scaler a [`ScalerEvent`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalerKind {
    /// Video scaler (luma and chroma).
    Video,
    /// Graphics scaler.
    Graphics,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a layer pass starts planning.
#[derive(Clone, Copy, Debug)]
pub struct ApplyBeginEvent {
    /// Target screen.
    pub screen: ScreenId,
    /// Descriptors submitted.
    pub layers: usize,
}

/// Emitted once per channel after geometry resolution.
#[derive(Clone, Copy, Debug)]
pub struct ChannelGeometryEvent {
    /// Target screen.
    pub screen: ScreenId,
    /// Channel index.
    pub channel: usize,
    /// Channel has visible layers.
    pub used: bool,
    /// Post-scale rectangle on screen.
    pub blend: Rect,
    /// Pre-scale overlay size.
    pub overlay: Size,
    /// Channel pre-multiplies.
    pub premultiply: bool,
}

/// Emitted once per pipe after z-order resolution.
#[derive(Clone, Copy, Debug)]
pub struct PipeRouteEvent {
    /// Target screen.
    pub screen: ScreenId,
    /// Pipe index.
    pub pipe: usize,
    /// Channel routed into the pipe.
    pub channel: Option<usize>,
    /// Pipe takes part in blending.
    pub enabled: bool,
}

/// Emitted once per scaler-equipped channel.
#[derive(Clone, Copy, Debug)]
pub struct ScalerEvent {
    /// Target screen.
    pub screen: ScreenId,
    /// Channel index.
    pub channel: usize,
    /// Scaler type.
    pub kind: ScalerKind,
    /// Scaler active (not bypassed).
    pub enable: bool,
    /// Size entering the scaler.
    pub in_size: Size,
    /// Size leaving the scaler.
    pub out_size: Size,
    /// Luma (or only) plane parameters.
    pub params: ScalerParams,
}

/// Emitted when a video channel is coarsely decimated.
#[derive(Clone, Copy, Debug)]
pub struct CoarseEvent {
    /// Target screen.
    pub screen: ScreenId,
    /// Channel index.
    pub channel: usize,
    /// Chosen decimation.
    pub decision: CoarseDecision,
}

/// Emitted once per used channel with its converter setup.
#[derive(Clone, Copy, Debug)]
pub struct CscEvent {
    /// Target screen.
    pub screen: ScreenId,
    /// Channel index.
    pub channel: usize,
    /// Converter configuration.
    pub config: CscConfig,
}

/// Emitted when a layer pass has committed its writes.
#[derive(Clone, Copy, Debug)]
pub struct ApplyEndEvent {
    /// Target screen.
    pub screen: ScreenId,
    /// Pipes enabled.
    pub pipes_enabled: usize,
    /// Channels whose scaling was degraded.
    pub degraded: usize,
}

/// Emitted after manager settings are applied.
#[derive(Clone, Copy, Debug)]
pub struct ManagerApplyEvent {
    /// Target screen.
    pub screen: ScreenId,
    /// Fields written.
    pub dirty: ManagerDirty,
    /// Blank flag now in effect.
    pub blank: bool,
}

/// Emitted when the double buffer is flipped.
#[derive(Clone, Copy, Debug)]
pub struct SyncEvent {
    /// Target screen.
    pub screen: ScreenId,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from composition passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a layer pass starts.
    fn on_apply_begin(&mut self, e: &ApplyBeginEvent) {
        _ = e;
    }

    /// Called per channel after geometry resolution.
    fn on_channel_geometry(&mut self, e: &ChannelGeometryEvent) {
        _ = e;
    }

    /// Called per pipe after routing.
    fn on_pipe_route(&mut self, e: &PipeRouteEvent) {
        _ = e;
    }

    /// Called per scaler.
    fn on_scaler(&mut self, e: &ScalerEvent) {
        _ = e;
    }

    /// Called when coarse decimation is active.
    fn on_coarse(&mut self, e: &CoarseEvent) {
        _ = e;
    }

    /// Called per used channel with its converter setup.
    fn on_csc(&mut self, e: &CscEvent) {
        _ = e;
    }

    /// Called when a layer pass ends.
    fn on_apply_end(&mut self, e: &ApplyEndEvent) {
        _ = e;
    }

    /// Called after manager settings are applied.
    fn on_manager_apply(&mut self, e: &ManagerApplyEvent) {
        _ = e;
    }

    /// Called on a double-buffer flip.
    fn on_sync(&mut self, e: &SyncEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($(#[$doc:meta] $name:ident => $hook:ident($event:ty);)*) => {
        $(
            #[$doc]
            #[inline]
            pub fn $name(&mut self, e: &$event) {
                #[cfg(feature = "trace")]
                if let Some(s) = &mut self.sink {
                    s.$hook(e);
                }
                #[cfg(not(feature = "trace"))]
                {
                    _ = e;
                }
            }
        )*
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    dispatch! {
        /// Emits an [`ApplyBeginEvent`].
        apply_begin => on_apply_begin(ApplyBeginEvent);
        /// Emits a [`ChannelGeometryEvent`].
        channel_geometry => on_channel_geometry(ChannelGeometryEvent);
        /// Emits a [`PipeRouteEvent`].
        pipe_route => on_pipe_route(PipeRouteEvent);
        /// Emits a [`ScalerEvent`].
        scaler => on_scaler(ScalerEvent);
        /// Emits a [`CoarseEvent`].
        coarse => on_coarse(CoarseEvent);
        /// Emits a [`CscEvent`].
        csc => on_csc(CscEvent);
        /// Emits an [`ApplyEndEvent`].
        apply_end => on_apply_end(ApplyEndEvent);
        /// Emits a [`ManagerApplyEvent`].
        manager_apply => on_manager_apply(ManagerApplyEvent);
        /// Emits a [`SyncEvent`].
        sync => on_sync(SyncEvent);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
