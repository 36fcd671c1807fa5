// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by a composition pass.
//!
//! Every variant is detected while planning, before any register is written,
//! so a failed pass leaves the hardware bank untouched.

/// A layer set the display engine cannot compose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    /// The capability table has no such screen.
    #[error("screen {screen} out of range (engine has {screens})")]
    ScreenOutOfRange {
        /// Requested screen.
        screen: usize,
        /// Screens in the capability table.
        screens: usize,
    },
    /// A screen's capabilities exceed the statically sized tables.
    #[error("{channels} channels × {layers_per_channel} slots exceed the supported maximum")]
    CapabilitiesExceeded {
        /// Channels reported.
        channels: usize,
        /// Slots per channel reported.
        layers_per_channel: usize,
    },
    /// A descriptor names a channel the screen does not have.
    #[error("channel {channel} out of range (screen has {channels})")]
    ChannelOutOfRange {
        /// Requested channel.
        channel: usize,
        /// Channels on the screen.
        channels: usize,
    },
    /// A descriptor names a slot beyond the channel's layer count.
    #[error("slot {slot} of channel {channel} out of range (channel has {slots})")]
    SlotOutOfRange {
        /// Owning channel.
        channel: usize,
        /// Requested slot.
        slot: usize,
        /// Slots per channel.
        slots: usize,
    },
    /// More descriptors than the screen has slots.
    #[error("{given} layers submitted, screen holds {capacity}")]
    TooManyLayers {
        /// Descriptors submitted.
        given: usize,
        /// Channels × slots.
        capacity: usize,
    },
    /// Two descriptors address the same slot.
    #[error("slot {slot} of channel {channel} given twice")]
    DuplicateSlot {
        /// Owning channel.
        channel: usize,
        /// Slot claimed twice.
        slot: usize,
    },
    /// A 3D layer occupies the last slot, leaving no slot for its right eye.
    #[error("3D layer in slot {slot} of channel {channel} has no room for its right eye")]
    StereoPairOverflow {
        /// Owning channel.
        channel: usize,
        /// Slot of the left eye.
        slot: usize,
    },
    /// More enabled channels than pipes; the capability table is inconsistent.
    #[error("no free pipe for channel {channel}")]
    PipeExhausted {
        /// Channel left without a pipe.
        channel: usize,
    },
}
