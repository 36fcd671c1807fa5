// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static capabilities of a display engine.
//!
//! A display engine has up to [`MAX_SCREENS`] mixers. Each mixer exposes a
//! fixed number of channels (the first [`ScreenCaps::video_channels`] of which
//! are video channels), each holding up to [`ScreenCaps::layers_per_channel`]
//! layer slots. Scalers are present on the first
//! [`ScreenCaps::scaler_channels`] channels.
//!
//! Presets for known SoC families are `const fn`s, so a platform can pick one
//! at compile time:
//!
//! ```
//! use lamina_core::caps::Capabilities;
//!
//! const CAPS: Capabilities = Capabilities::sun50iw1();
//! assert_eq!(CAPS.screen(0).map(|s| s.channels), Some(4));
//! ```

use bitflags::bitflags;

/// Mixers per display engine.
pub const MAX_SCREENS: usize = 2;

/// Channels per mixer, upper bound over all presets.
pub const MAX_CHANNELS: usize = 4;

/// Layer slots per channel, upper bound over all presets.
pub const MAX_LAYERS_PER_CHANNEL: usize = 4;

bitflags! {
    /// Output device classes a mixer can drive.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OutputTypes: u32 {
        /// LCD panel through a timing controller.
        const LCD = 1;
        /// Analog TV encoder.
        const TV = 2;
        /// HDMI transmitter.
        const HDMI = 4;
        /// VGA DAC.
        const VGA = 8;
    }
}

/// Capabilities of one mixer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScreenCaps {
    /// Total channels.
    pub channels: usize,
    /// Leading channels that are video channels.
    pub video_channels: usize,
    /// Layer slots per channel.
    pub layers_per_channel: usize,
    /// Leading channels that carry a scaler.
    pub scaler_channels: usize,
    /// Widest line the scaler buffers without coarse decimation.
    pub scale_line_buffer: u32,
    /// Video enhancement processor present.
    pub enhance: bool,
    /// Smart backlight present.
    pub smbl: bool,
    /// Write-back present.
    pub write_back: bool,
    /// Edge-directed scaler present.
    pub ed_scale: bool,
    /// Noise reduction present.
    pub de_noise: bool,
    /// Drivable output classes.
    pub output_types: OutputTypes,
    /// The mixer selects its timing controller itself; engines with a
    /// separate device-routing block leave this clear.
    pub output_mux: bool,
}

impl ScreenCaps {
    const PRIMARY: Self = Self {
        channels: 4,
        video_channels: 1,
        layers_per_channel: 4,
        scaler_channels: 4,
        scale_line_buffer: 2048,
        enhance: true,
        smbl: true,
        write_back: true,
        ed_scale: false,
        de_noise: false,
        output_types: OutputTypes::LCD.union(OutputTypes::TV).union(OutputTypes::HDMI),
        output_mux: true,
    };

    const SECONDARY: Self = Self {
        channels: 2,
        video_channels: 1,
        layers_per_channel: 4,
        scaler_channels: 2,
        scale_line_buffer: 1024,
        enhance: false,
        smbl: false,
        write_back: false,
        ed_scale: false,
        de_noise: false,
        output_types: OutputTypes::LCD.union(OutputTypes::TV).union(OutputTypes::HDMI),
        output_mux: true,
    };

    /// Graphics channels (channels that are not video channels).
    #[must_use]
    pub const fn graphics_channels(&self) -> usize {
        self.channels - self.video_channels
    }

    /// Returns `true` if `channel` is a video channel.
    #[must_use]
    pub const fn is_video(&self, channel: usize) -> bool {
        channel < self.video_channels
    }

    /// Returns `true` if `channel` has a scaler.
    #[must_use]
    pub const fn has_scaler(&self, channel: usize) -> bool {
        channel < self.scaler_channels
    }

    /// Total layer slots on this mixer.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.channels * self.layers_per_channel
    }

    /// Returns `true` if the mixer can drive `output`.
    #[must_use]
    pub const fn supports_output(&self, output: OutputTypes) -> bool {
        self.output_types.contains(output)
    }

    const fn with_outputs(mut self, output_types: OutputTypes) -> Self {
        self.output_types = output_types;
        self
    }

    const fn routed(mut self) -> Self {
        self.output_mux = false;
        self
    }
}

/// Capabilities of a whole display engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// Mixers in use.
    pub num_screens: usize,
    /// Timing controllers.
    pub num_devices: usize,
    /// Per-mixer capabilities; only the first `num_screens` are meaningful.
    pub screens: [ScreenCaps; MAX_SCREENS],
}

impl Capabilities {
    /// Generic two-mixer engine.
    #[must_use]
    pub const fn generic() -> Self {
        Self {
            num_screens: 2,
            num_devices: 2,
            screens: [ScreenCaps::PRIMARY, ScreenCaps::SECONDARY],
        }
    }

    /// sun50iw1 family: four timing controllers, VGA output.
    #[must_use]
    pub const fn sun50iw1() -> Self {
        let outputs = OutputTypes::all();
        Self {
            num_screens: 2,
            num_devices: 4,
            screens: [
                ScreenCaps::PRIMARY.with_outputs(outputs).routed(),
                ScreenCaps::SECONDARY.with_outputs(outputs).routed(),
            ],
        }
    }

    /// sun50iw2 family: no smart backlight.
    #[must_use]
    pub const fn sun50iw2() -> Self {
        let mut caps = Self::generic();
        caps.screens[0].smbl = false;
        caps
    }

    /// sun50iw3 family: LCD outputs only.
    #[must_use]
    pub const fn sun50iw3() -> Self {
        Self {
            num_screens: 2,
            num_devices: 2,
            screens: [
                ScreenCaps::PRIMARY.with_outputs(OutputTypes::LCD).routed(),
                ScreenCaps::SECONDARY.with_outputs(OutputTypes::LCD).routed(),
            ],
        }
    }

    /// sun50iw6 family: LCD and TV outputs.
    #[must_use]
    pub const fn sun50iw6() -> Self {
        let outputs = OutputTypes::LCD.union(OutputTypes::TV);
        Self {
            num_screens: 2,
            num_devices: 2,
            screens: [
                ScreenCaps::PRIMARY.with_outputs(outputs).routed(),
                ScreenCaps::SECONDARY.with_outputs(outputs).routed(),
            ],
        }
    }

    /// sun8iw11 family: four timing controllers, noise reduction on the
    /// primary mixer.
    #[must_use]
    pub const fn sun8iw11() -> Self {
        let mut caps = Self::sun50iw1();
        caps.screens[0].de_noise = true;
        caps
    }

    /// Capabilities of mixer `screen`, if it exists.
    #[must_use]
    pub const fn screen(&self, screen: usize) -> Option<&ScreenCaps> {
        if screen < self.num_screens && screen < MAX_SCREENS {
            Some(&self.screens[screen])
        } else {
            None
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::generic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_stay_within_static_bounds() {
        for caps in [
            Capabilities::generic(),
            Capabilities::sun50iw1(),
            Capabilities::sun50iw2(),
            Capabilities::sun50iw3(),
            Capabilities::sun50iw6(),
            Capabilities::sun8iw11(),
        ] {
            for id in 0..caps.num_screens {
                let s = caps.screen(id).unwrap();
                assert!(s.channels <= MAX_CHANNELS);
                assert!(s.layers_per_channel <= MAX_LAYERS_PER_CHANNEL);
                assert!(s.video_channels <= s.channels);
                assert!(s.scaler_channels <= s.channels);
            }
        }
    }

    #[test]
    fn channel_classes() {
        let caps = Capabilities::generic();
        let s = caps.screen(0).unwrap();
        assert!(s.is_video(0));
        assert!(!s.is_video(1));
        assert_eq!(s.graphics_channels(), 3);
        assert_eq!(s.capacity(), 16);
        assert!(s.has_scaler(3));
        assert!(!caps.screen(1).unwrap().has_scaler(2));
    }

    #[test]
    fn output_support_differs_by_family() {
        let w1 = Capabilities::sun50iw1();
        let w3 = Capabilities::sun50iw3();
        assert!(w1.screen(0).unwrap().supports_output(OutputTypes::VGA));
        assert!(!w3.screen(0).unwrap().supports_output(OutputTypes::HDMI));
        assert!(w3.screen(0).unwrap().supports_output(OutputTypes::LCD));
        assert!(Capabilities::sun8iw11().screen(0).unwrap().de_noise);
    }

    #[test]
    fn device_routing_block_replaces_mixer_mux() {
        assert!(Capabilities::generic().screen(0).unwrap().output_mux);
        assert!(Capabilities::sun50iw2().screen(1).unwrap().output_mux);
        assert!(!Capabilities::sun50iw1().screen(0).unwrap().output_mux);
        assert!(!Capabilities::sun8iw11().screen(1).unwrap().output_mux);
    }

    #[test]
    fn missing_screen_is_none() {
        assert!(Capabilities::generic().screen(2).is_none());
    }
}
