// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer composition for two-stage display engines.
//!
//! `lamina_core` turns a set of layer descriptors into the register state of a
//! display engine whose mixers have a handful of hardware channels, each
//! holding a few layer slots behind one shared scaler and color-space
//! converter, feeding a blender that stacks channels through ordered pipes.
//! It is `no_std` compatible (with `alloc`) and never touches registers
//! itself: every decision is handed to a [`DisplayHw`](backend::DisplayHw)
//! implementation.
//!
//! # Architecture
//!
//! ```text
//!   &[LayerData] ──► LayerTable ──► StereoExpand (per channel)
//!                                        │
//!                                        ▼
//!              fine scaling ──► ChannelGeometry ──► zorder::resolve
//!                                                        │
//!                 ┌──────────────────────────────────────┘
//!                 ▼
//!   coarse decimation ──► color space ──► LayerRecord ──► DisplayHw
//! ```
//!
//! **[`compose`]**: One [`Compositor`](compose::Compositor) per screen
//! orchestrates each pass and owns the state that outlives it.
//!
//! **[`layer`]**: Layer descriptors, the channel × slot table and 3D
//! expansion into physical slots.
//!
//! **[`scaler`]**: Fixed-point step and phase math, coarse decimation, video
//! and graphics scaler configuration.
//!
//! **[`geometry`]**: Per-channel blend rectangle, overlay size and
//! overlay-local placements.
//!
//! **[`zorder`]**: Channel-to-pipe routing.
//!
//! **[`color`]**: Color-space resolution and converter configuration.
//!
//! **[`config`]**: Per-slot register records and effective dirty bits.
//!
//! **[`manager`]**: Screen-level settings.
//!
//! **[`caps`]**: Per-SoC capability tables.
//!
//! **[`backend`]**: The hardware-access contract; **[`record`]** implements
//! it by logging.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! pass instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod caps;
pub mod color;
pub mod compose;
pub mod config;
pub mod error;
pub mod format;
pub mod geom;
pub mod geometry;
pub mod layer;
pub mod manager;
pub mod record;
pub mod scaler;
pub mod screen;
pub mod trace;
pub mod zorder;
