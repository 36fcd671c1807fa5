// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen identification.
//!
//! [`ScreenId`] names one display-engine mixer: an independent composition
//! pipeline with its own register bank. Core code uses it to index the
//! capability table and passes it through to the hardware.

use core::fmt;

/// Identifies one display-engine mixer (a "screen").
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScreenId(pub u32);

impl ScreenId {
    /// Returns the id as an index into per-screen tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScreenId({})", self.0)
    }
}
