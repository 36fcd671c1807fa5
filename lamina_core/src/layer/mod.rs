// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer descriptors.
//!
//! A *layer* is one surface assigned to a slot of a hardware channel. Each
//! layer has:
//!
//! - A position ([`LayerData::channel`], [`LayerData::slot`]).
//! - A source description ([`FrameBuffer`]): plane addresses, plane sizes,
//!   format, color space, a sub-pixel crop and an optional 3D input mode.
//! - A placement ([`LayerInfo::screen_win`]) in screen pixels, alpha and
//!   z-order.
//! - A [`LayerDirty`] set naming which register groups changed since the last
//!   commit.
//!
//! Descriptors are indexed into a [`LayerTable`] per pass. A 3D layer in slot
//! `i` also drives slot `i + 1` (the right eye); [`StereoExpand`] turns a
//! channel's slots into the physical layers the hardware sees.

mod stereo;

pub use stereo::{Eye, PhysicalLayer, Stereo3dIn, Stereo3dOut, StereoExpand, frame_packing_gap};

use alloc::vec;
use alloc::vec::Vec;

use bitflags::bitflags;

use crate::color::ColorSpace;
use crate::error::ComposeError;
use crate::format::PixelFormat;
use crate::geom::{Rect, Rect64, Size};

bitflags! {
    /// Register groups of a layer that changed since the last commit.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayerDirty: u32 {
        /// Attribute record and low source addresses.
        const ATTR = 0x01;
        /// Fill color.
        const FILL_COLOR = 0x02;
        /// High source address bits.
        const HIGH_ADDR = 0x04;
        /// Overlay size of the owning channel.
        const SIZE = 0x08;
        /// Blender input enable.
        const BLEND_ENABLE = 0x10;
        /// Blender input attributes.
        const BLEND_ATTR = 0x20;
        /// Blender control.
        const BLEND_CTL = 0x40;
        /// Blender output.
        const BLEND_OUT = 0x80;
        /// Everything.
        const ALL = 0xff;
    }
}

/// How the layer's alpha combines with per-pixel alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlphaMode {
    /// Use per-pixel alpha.
    #[default]
    PerPixel = 0,
    /// Use [`LayerInfo::alpha_value`] for every pixel.
    Global = 1,
    /// Multiply per-pixel alpha by [`LayerInfo::alpha_value`].
    Mixed = 2,
}

/// What the layer scans out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayerMode {
    /// Pixels from the framebuffer.
    #[default]
    Buffer,
    /// A solid [`LayerInfo::fill_color`].
    FillColor,
}

/// Source buffer of a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameBuffer {
    /// Physical base address of each plane.
    pub addr: [u64; 3],
    /// Size of each plane in pixels of that plane.
    pub size: [Size; 3],
    /// Line alignment of each plane in bytes (0 or 1 = unaligned).
    pub align: [u32; 3],
    /// Pixel format.
    pub format: PixelFormat,
    /// Declared color space.
    pub color_space: ColorSpace,
    /// Plane addresses of the right-eye buffer, for frame-packed 3D input.
    pub right_addr: [u64; 3],
    /// Whether color components are pre-multiplied by alpha.
    pub pre_multiply: bool,
    /// Source crop in 32.32 fixed point.
    pub crop: Rect64,
    /// 3D input layout, if the buffer carries a stereo pair.
    pub stereo: Option<Stereo3dIn>,
}

/// Per-layer display attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerInfo {
    /// Framebuffer or solid fill.
    pub mode: LayerMode,
    /// Fill color as ARGB8888, used in [`LayerMode::FillColor`].
    pub fill_color: u32,
    /// Alpha mode.
    pub alpha_mode: AlphaMode,
    /// Global alpha.
    pub alpha_value: u8,
    /// Requested stacking priority of the owning channel (lower is further back).
    pub zorder: u8,
    /// Destination rectangle on screen.
    pub screen_win: Rect,
    /// Source buffer.
    pub fb: FrameBuffer,
    /// Whether a stereo pair is displayed as 3D (both eyes) rather than left eye only.
    pub stereo_out: bool,
    /// 3D output layout used when [`stereo_out`](Self::stereo_out) is set.
    pub out_3d: Stereo3dOut,
}

/// One layer descriptor as submitted by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerData {
    /// Whether the layer is shown.
    pub enable: bool,
    /// Owning channel.
    pub channel: u8,
    /// Slot within the channel.
    pub slot: u8,
    /// Display attributes.
    pub info: LayerInfo,
    /// Changed register groups.
    pub dirty: LayerDirty,
}

/// Channel × slot index over one pass's layer descriptors.
#[derive(Clone, Debug)]
pub struct LayerTable<'a> {
    slots: usize,
    cells: Vec<Option<&'a LayerData>>,
}

impl<'a> LayerTable<'a> {
    /// Indexes `layers` into `channels` × `slots` cells.
    ///
    /// # Errors
    ///
    /// Fails if a descriptor addresses a channel or slot outside the table,
    /// if two descriptors claim the same cell, or if a 3D layer sits in the
    /// last slot where its right eye has no room.
    pub fn build(
        layers: &'a [LayerData],
        channels: usize,
        slots: usize,
    ) -> Result<Self, ComposeError> {
        if layers.len() > channels * slots {
            return Err(ComposeError::TooManyLayers {
                given: layers.len(),
                capacity: channels * slots,
            });
        }
        let mut cells = vec![None; channels * slots];
        for layer in layers {
            let channel = usize::from(layer.channel);
            let slot = usize::from(layer.slot);
            if channel >= channels {
                return Err(ComposeError::ChannelOutOfRange { channel, channels });
            }
            if slot >= slots {
                return Err(ComposeError::SlotOutOfRange {
                    channel,
                    slot,
                    slots,
                });
            }
            if layer.info.fb.stereo.is_some() && slot + 1 >= slots {
                return Err(ComposeError::StereoPairOverflow { channel, slot });
            }
            let cell = &mut cells[channel * slots + slot];
            if cell.is_some() {
                return Err(ComposeError::DuplicateSlot { channel, slot });
            }
            *cell = Some(layer);
        }
        Ok(Self { slots, cells })
    }

    /// Number of channels.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.cells.len().checked_div(self.slots).unwrap_or(0)
    }

    /// Number of slots per channel.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Returns the slot cells of `channel`.
    #[must_use]
    pub fn channel(&self, channel: usize) -> &[Option<&'a LayerData>] {
        &self.cells[channel * self.slots..(channel + 1) * self.slots]
    }

    /// Iterates the enabled descriptors of `channel` in slot order.
    pub fn enabled(&self, channel: usize) -> impl Iterator<Item = &'a LayerData> + '_ {
        self.channel(channel)
            .iter()
            .filter_map(|cell| *cell)
            .filter(|layer| layer.enable)
    }

    /// Expands `channel` into physical slots; `screen` sizes 3D output.
    #[must_use]
    pub fn physical(&self, channel: usize, screen: Size) -> StereoExpand<'a, '_> {
        StereoExpand::new(self.channel(channel), screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(channel: u8, slot: u8) -> LayerData {
        LayerData {
            enable: true,
            channel,
            slot,
            ..LayerData::default()
        }
    }

    #[test]
    fn table_indexes_by_channel_and_slot() {
        let layers = [layer(0, 0), layer(1, 2), layer(1, 0)];
        let table = LayerTable::build(&layers, 2, 4).unwrap();
        assert_eq!(table.channels(), 2);
        assert_eq!(table.slots(), 4);
        assert!(table.channel(0)[0].is_some());
        assert!(table.channel(0)[1].is_none());
        let slots: Vec<u8> = table.enabled(1).map(|l| l.slot).collect();
        assert_eq!(slots, [0, 2]);
    }

    #[test]
    fn channel_beyond_capability_is_rejected() {
        let layers = [layer(4, 0)];
        assert_eq!(
            LayerTable::build(&layers, 4, 4).unwrap_err(),
            ComposeError::ChannelOutOfRange {
                channel: 4,
                channels: 4
            }
        );
    }

    #[test]
    fn slot_beyond_capability_is_rejected() {
        let layers = [layer(0, 4)];
        assert!(matches!(
            LayerTable::build(&layers, 4, 4),
            Err(ComposeError::SlotOutOfRange { slot: 4, .. })
        ));
    }

    #[test]
    fn duplicate_cell_is_rejected() {
        let layers = [layer(0, 1), layer(0, 1)];
        assert_eq!(
            LayerTable::build(&layers, 4, 4).unwrap_err(),
            ComposeError::DuplicateSlot {
                channel: 0,
                slot: 1
            }
        );
    }

    #[test]
    fn stereo_layer_needs_room_for_right_eye() {
        let mut l = layer(0, 3);
        l.info.fb.stereo = Some(Stereo3dIn::SideBySideHalf);
        assert_eq!(
            LayerTable::build(&[l], 4, 4).unwrap_err(),
            ComposeError::StereoPairOverflow {
                channel: 0,
                slot: 3
            }
        );
    }

    #[test]
    fn too_many_descriptors_are_rejected() {
        let layers = [layer(0, 0); 9];
        assert!(matches!(
            LayerTable::build(&layers, 2, 4),
            Err(ComposeError::TooManyLayers {
                given: 9,
                capacity: 8
            })
        ));
    }
}
