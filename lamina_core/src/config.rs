// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat per-slot layer records.
//!
//! The layer registers take 32-bit plane addresses plus one high byte per
//! plane. [`LayerRecord::build`] computes the address of the first sampled
//! pixel of each plane:
//!
//! ```text
//! addr_p  = base_p + y_p * pitch_p + x_p * bytes_per_pixel_p
//! pitch_p = align_up(width_p * bytes_per_pixel_p, align_p)
//! ```
//!
//! where `x_p`/`y_p` are the crop origin in plane `p`'s resolution. The low
//! word goes to the address register; any carry out of it is added to the
//! descriptor's high byte.
//!
//! Which registers are actually written is decided per slot by a
//! [`LayerChangeSet`].

use crate::caps::{MAX_CHANNELS, MAX_LAYERS_PER_CHANNEL};
use crate::format::PixelFormat;
use crate::geom::Rect;
use crate::layer::{AlphaMode, Eye, LayerData, LayerDirty, LayerMode, LayerTable, Stereo3dIn};

/// Number of address planes in a layer record.
pub const PLANES: usize = 3;

/// Register image of one hardware layer slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerRecord {
    /// Slot shown.
    pub enable: bool,
    /// Alpha mode.
    pub alpha_mode: AlphaMode,
    /// Global alpha.
    pub alpha: u8,
    /// Slot scans out a solid color.
    pub fill_color_enable: bool,
    /// Fill color, ARGB8888.
    pub fill_color: u32,
    /// Pixel format.
    pub format: PixelFormat,
    /// Channel pre-multiply control.
    pub premultiply: bool,
    /// Line pitch of each plane in bytes.
    pub pitch: [u32; PLANES],
    /// Placement inside the channel overlay.
    pub placement: Rect,
    /// Low 32 bits of each plane's first-pixel address.
    pub low_addr: [u32; PLANES],
    /// High address byte of each plane, including the carry.
    pub high_addr: [u8; PLANES],
}

/// Byte pitch of `width` samples of `bpp` bytes, rounded up to `align`.
#[must_use]
pub const fn pitch(width: u32, bpp: u32, align: u32) -> u32 {
    let bytes = width * bpp;
    if align <= 1 {
        bytes
    } else {
        bytes.div_ceil(align) * align
    }
}

/// Address of a plane sample, split into low word and high byte.
///
/// The high byte is the descriptor's bits 32..40 plus the carry out of the
/// low word.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "splitting a bus address into its register fields"
)]
pub const fn split_addr(base: u64, offset: u64) -> (u32, u8) {
    let low = (base & 0xFFFF_FFFF) + offset;
    let carry = (low >> 32) as u8;
    let high = ((base >> 32) & 0xFF) as u8;
    (low as u32, high.wrapping_add(carry))
}

/// Inputs of [`LayerRecord::build`] for one physical slot.
#[derive(Clone, Copy, Debug)]
pub struct SlotInput<'a> {
    /// Descriptor driving the slot.
    pub data: &'a LayerData,
    /// View shown by the slot.
    pub eye: Eye,
    /// Slot shown.
    pub enabled: bool,
    /// Integer source crop of this view.
    pub crop: Rect,
    /// Placement inside the overlay.
    pub placement: Rect,
    /// Channel pre-multiply control.
    pub premultiply: bool,
}

impl LayerRecord {
    /// Builds the record for one slot.
    #[must_use]
    pub fn build(input: &SlotInput<'_>) -> Self {
        let info = &input.data.info;
        let fb = &info.fb;
        let format = fb.format;
        let line_interleaved = fb.stereo == Some(Stereo3dIn::LineInterleave);

        let mut record = Self {
            enable: input.enabled,
            alpha_mode: info.alpha_mode,
            alpha: info.alpha_value,
            fill_color_enable: info.mode == LayerMode::FillColor,
            fill_color: info.fill_color,
            format,
            premultiply: input.premultiply,
            placement: input.placement,
            ..Self::default()
        };

        for p in 0..format.plane_count().min(PLANES) {
            let bpp = format.bytes_per_pixel(p);
            let sub = format.plane_subsampling(p);
            let line = pitch(fb.size[p].width, bpp, fb.align[p]);

            let (mut base, mut stride) = (fb.addr[p], line);
            match (fb.stereo, input.eye) {
                (Some(Stereo3dIn::FramePacking), Eye::Right) => base = fb.right_addr[p],
                (Some(Stereo3dIn::LineInterleave), Eye::Right) => base += u64::from(line),
                _ => {}
            }
            if line_interleaved {
                stride = line * 2;
            }

            let x = u64::from(input.crop.x.max(0).unsigned_abs() >> sub.w_shift);
            let y = u64::from(input.crop.y.max(0).unsigned_abs() >> sub.h_shift);
            let offset = y * u64::from(stride) + x * u64::from(bpp);
            let (low, high) = split_addr(base, offset);

            record.pitch[p] = stride;
            record.low_addr[p] = low;
            record.high_addr[p] = high;
        }
        record
    }
}

/// Effective dirty bits of every slot for one pass.
///
/// Built from the submitted descriptors without modifying them:
///
/// - if any enabled layer of a channel is dirty, every enabled layer of that
///   channel is treated as [`LayerDirty::ALL`], since the channel's overlay
///   and scaler are shared;
/// - the right eye of a 3D layer inherits the left eye's bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerChangeSet {
    dirty: [[LayerDirty; MAX_LAYERS_PER_CHANNEL]; MAX_CHANNELS],
}

impl LayerChangeSet {
    /// Computes the change set of `table`.
    #[must_use]
    pub fn new(table: &LayerTable<'_>) -> Self {
        let mut set = Self::default();
        let channels = table.channels().min(MAX_CHANNELS);
        for channel in 0..channels {
            let promote = table.enabled(channel).any(|l| !l.dirty.is_empty());
            let row = &mut set.dirty[channel];
            let cells = table.channel(channel).iter().take(MAX_LAYERS_PER_CHANNEL);
            for (slot, cell) in cells.enumerate() {
                let Some(layer) = cell else { continue };
                row[slot] = if promote && layer.enable {
                    LayerDirty::ALL
                } else {
                    layer.dirty
                };
            }
            // Right eyes follow their left eye.
            let cells = table.channel(channel);
            let mut slot = 0;
            while slot + 1 < cells.len().min(MAX_LAYERS_PER_CHANNEL) {
                if cells[slot].is_some_and(|l| l.info.fb.stereo.is_some()) {
                    row[slot + 1] = row[slot];
                    slot += 2;
                } else {
                    slot += 1;
                }
            }
        }
        set
    }

    /// Dirty bits of one slot.
    #[must_use]
    pub fn get(&self, channel: usize, slot: usize) -> LayerDirty {
        self.dirty
            .get(channel)
            .and_then(|row| row.get(slot))
            .copied()
            .unwrap_or_default()
    }

    /// Union of the dirty bits of a channel's slots.
    #[must_use]
    pub fn channel(&self, channel: usize) -> LayerDirty {
        self.dirty
            .get(channel)
            .map(|row| row.iter().fold(LayerDirty::empty(), |acc, d| acc | *d))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Rect64, Size};
    use crate::layer::LayerInfo;

    fn nv12_layer() -> LayerData {
        let mut info = LayerInfo::default();
        info.fb.format = PixelFormat::Yuv420SemiPlanarUvuv;
        info.fb.addr = [0x4000_0000, 0x4020_0000, 0];
        info.fb.size = [Size::new(1920, 1080), Size::new(960, 540), Size::ZERO];
        info.fb.crop = Rect64::from_pixels(0, 0, 1920, 1080);
        LayerData {
            enable: true,
            info,
            ..LayerData::default()
        }
    }

    fn slot(data: &LayerData, eye: Eye, crop: Rect) -> SlotInput<'_> {
        SlotInput {
            data,
            eye,
            enabled: true,
            crop,
            placement: Rect::ZERO,
            premultiply: false,
        }
    }

    #[test]
    fn pitch_rounds_up_to_alignment() {
        assert_eq!(pitch(1918, 1, 16), 1920);
        assert_eq!(pitch(1920, 4, 0), 7680);
        assert_eq!(pitch(100, 3, 1), 300);
    }

    #[test]
    fn carry_out_of_low_word_bumps_high_byte() {
        assert_eq!(split_addr(0x1_FFFF_FF00, 0x100), (0, 2));
        assert_eq!(split_addr(0x1_0000_0000, 0x10), (0x10, 1));
        assert_eq!(split_addr(0xFF_FFFF_FFFF, 1), (0, 0));
    }

    #[test]
    fn crop_origin_offsets_each_plane() {
        let l = nv12_layer();
        let r = LayerRecord::build(&slot(&l, Eye::Mono, Rect::new(16, 8, 640, 480)));
        assert_eq!(r.pitch, [1920, 1920, 0]);
        assert_eq!(r.low_addr[0], 0x4000_0000 + 8 * 1920 + 16);
        assert_eq!(r.low_addr[1], 0x4020_0000 + 4 * 1920 + 8 * 2);
        assert_eq!(r.high_addr, [0, 0, 0]);
    }

    #[test]
    fn frame_packed_right_eye_reads_right_buffer() {
        let mut l = nv12_layer();
        l.info.fb.stereo = Some(Stereo3dIn::FramePacking);
        l.info.fb.right_addr = [0x5000_0000, 0x5020_0000, 0];
        let r = LayerRecord::build(&slot(&l, Eye::Right, Rect::new(0, 0, 1920, 1080)));
        assert_eq!(r.low_addr[0], 0x5000_0000);
        assert_eq!(r.low_addr[1], 0x5020_0000);
    }

    #[test]
    fn line_interleaved_eyes_double_pitch() {
        let mut l = nv12_layer();
        l.info.fb.stereo = Some(Stereo3dIn::LineInterleave);
        let left = LayerRecord::build(&slot(&l, Eye::Left, Rect::new(0, 0, 1920, 540)));
        let right = LayerRecord::build(&slot(&l, Eye::Right, Rect::new(0, 0, 1920, 540)));
        assert_eq!(left.pitch[0], 3840);
        assert_eq!(right.pitch[0], 3840);
        assert_eq!(right.low_addr[0] - left.low_addr[0], 1920);
    }

    #[test]
    fn high_address_byte_comes_from_descriptor() {
        let mut l = nv12_layer();
        l.info.fb.addr[0] = 0x2_FFFF_F000;
        let r = LayerRecord::build(&slot(&l, Eye::Mono, Rect::new(0, 4, 16, 16)));
        // 0xFFFF_F000 + 4 * 1920 wraps past the low word.
        assert_eq!(r.low_addr[0], 0x0E00);
        assert_eq!(r.high_addr[0], 3);
    }

    #[test]
    fn dirty_layer_promotes_whole_channel() {
        let mut a = nv12_layer();
        a.dirty = LayerDirty::HIGH_ADDR;
        let mut b = nv12_layer();
        b.slot = 1;
        let mut c = nv12_layer();
        c.slot = 2;
        c.enable = false;
        let mut d = nv12_layer();
        d.channel = 1;
        let layers = [a, b, c, d];
        let table = LayerTable::build(&layers, 2, 4).unwrap();
        let set = LayerChangeSet::new(&table);
        assert_eq!(set.get(0, 0), LayerDirty::ALL);
        assert_eq!(set.get(0, 1), LayerDirty::ALL);
        assert_eq!(set.get(0, 2), LayerDirty::empty());
        assert_eq!(set.get(1, 0), LayerDirty::empty());
        assert_eq!(set.channel(1), LayerDirty::empty());
        // The input descriptors are untouched.
        assert_eq!(layers[0].dirty, LayerDirty::HIGH_ADDR);
    }

    #[test]
    fn right_eye_inherits_left_eye_bits() {
        let mut a = nv12_layer();
        a.info.fb.stereo = Some(Stereo3dIn::SideBySideHalf);
        a.dirty = LayerDirty::ATTR;
        let layers = [a];
        let table = LayerTable::build(&layers, 1, 4).unwrap();
        let set = LayerChangeSet::new(&table);
        assert_eq!(set.get(0, 1), LayerDirty::ALL);
    }
}
