// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and register-log export for lamina diagnostics.
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output of
//!   composition passes.
//! - [`export::export`]: writes the calls captured by a
//!   [`RecordingHw`](lamina_core::record::RecordingHw) as a JSON array, for
//!   diffing register programming between builds or feeding a simulator.

pub mod export;
pub mod pretty;
