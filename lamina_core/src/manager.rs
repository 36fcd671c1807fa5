// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-level (manager) configuration.

use bitflags::bitflags;

use crate::color::ColorClass;
use crate::geom::Size;

bitflags! {
    /// Manager fields that changed since the last commit.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ManagerDirty: u32 {
        /// Output enable, device routing and interlace.
        const ENABLE = 0x0001;
        /// Color key.
        const COLOR_KEY = 0x0002;
        /// Background color.
        const BACK_COLOR = 0x0004;
        /// Blend and display size.
        const SIZE = 0x0008;
        /// Output color range.
        const COLOR_RANGE = 0x0010;
        /// Blend color space.
        const COLOR_SPACE = 0x0100;
        /// Blank flag.
        const BLANK = 0x0200;
        /// Everything.
        const ALL = 0xffff;
    }
}

/// An 8-bit-per-channel color with alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Argb {
    /// Alpha.
    pub alpha: u8,
    /// Red.
    pub red: u8,
    /// Green.
    pub green: u8,
    /// Blue.
    pub blue: u8,
}

impl Argb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0xff, 0, 0, 0);

    /// Creates a color.
    #[must_use]
    pub const fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            alpha,
            red,
            green,
            blue,
        }
    }

    /// Packs the color as `0xAARRGGBB`.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        (self.alpha as u32) << 24
            | (self.red as u32) << 16
            | (self.green as u32) << 8
            | self.blue as u32
    }
}

/// Screen-level settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ManagerConfig {
    /// Color behind every pipe.
    pub back_color: Argb,
    /// Blend and display size.
    pub size: Size,
    /// Output enabled.
    pub enable: bool,
    /// Timing controller the mixer drives.
    pub hwdev_index: u32,
    /// Interlaced output.
    pub interlace: bool,
    /// Color space the blender works in.
    pub blend_space: ColorClass,
    /// Output blanked: layers stay configured but no pipe is shown.
    pub blank: bool,
}

/// Manager settings plus the fields that changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ManagerData {
    /// Settings.
    pub config: ManagerConfig,
    /// Changed fields.
    pub dirty: ManagerDirty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packs_alpha_high() {
        assert_eq!(Argb::new(0x80, 0x11, 0x22, 0x33).to_u32(), 0x8011_2233);
        assert_eq!(Argb::BLACK.to_u32(), 0xff00_0000);
    }

    #[test]
    fn all_covers_every_field() {
        for flag in [
            ManagerDirty::ENABLE,
            ManagerDirty::COLOR_KEY,
            ManagerDirty::BACK_COLOR,
            ManagerDirty::SIZE,
            ManagerDirty::COLOR_RANGE,
            ManagerDirty::COLOR_SPACE,
            ManagerDirty::BLANK,
        ] {
            assert!(ManagerDirty::ALL.contains(flag));
        }
    }
}
