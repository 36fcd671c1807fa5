// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stereo expansion of logical layers into physical slots.

use crate::geom::{Rect, Rect64, Size};

use super::LayerData;

/// How a stereo pair is packed into one framebuffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stereo3dIn {
    /// Left eye on top, right eye below.
    TopBottom,
    /// Separate buffers; the right eye lives at [`FrameBuffer::right_addr`](super::FrameBuffer::right_addr).
    FramePacking,
    /// Full-resolution eyes side by side.
    SideBySideFull,
    /// Half-resolution eyes side by side.
    SideBySideHalf,
    /// Eyes on alternating lines.
    LineInterleave,
}

/// How a stereo pair is placed on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Stereo3dOut {
    /// Destination split into left and right halves.
    #[default]
    SideBySide,
    /// Destination split into top and bottom halves.
    TopBottom,
    /// Right eye below the left eye, separated by the frame-packing gap.
    FramePacking,
}

/// Which view a physical slot shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Eye {
    /// An ordinary 2D layer.
    Mono,
    /// Left view of a stereo pair.
    Left,
    /// Right view of a stereo pair.
    Right,
}

/// Blanking lines between the eyes of a frame-packed output of total
/// height `screen_height`.
#[must_use]
pub const fn frame_packing_gap(screen_height: u32) -> u32 {
    if screen_height > 1470 { 45 } else { 30 }
}

impl Stereo3dIn {
    /// Crop of `eye` within the packed source crop.
    ///
    /// Line-interleaved crops are expressed in lines of one eye.
    #[must_use]
    pub const fn eye_crop(self, crop: Rect64, eye: Eye) -> Rect64 {
        let right = matches!(eye, Eye::Right);
        match self {
            Self::SideBySideFull | Self::SideBySideHalf => {
                let w = crop.w / 2;
                Rect64::new(if right { crop.x + w } else { crop.x }, crop.y, w, crop.h)
            }
            Self::TopBottom => {
                let h = crop.h / 2;
                Rect64::new(crop.x, if right { crop.y + h } else { crop.y }, crop.w, h)
            }
            Self::LineInterleave => Rect64::new(crop.x, crop.y / 2, crop.w, crop.h / 2),
            Self::FramePacking => crop,
        }
    }
}

impl Stereo3dOut {
    /// Splits `frame` into the left and right eye destinations.
    #[must_use]
    pub fn eye_frames(self, frame: Rect, screen: Size) -> (Rect, Rect) {
        match self {
            Self::SideBySide => {
                let lw = frame.w / 2;
                let left = Rect::new(frame.x, frame.y, lw, frame.h);
                let right = Rect::new(frame.x.saturating_add_unsigned(lw), frame.y, frame.w - lw, frame.h);
                (left, right)
            }
            Self::TopBottom => {
                let lh = frame.h / 2;
                let left = Rect::new(frame.x, frame.y, frame.w, lh);
                let right = Rect::new(frame.x, frame.y.saturating_add_unsigned(lh), frame.w, frame.h - lh);
                (left, right)
            }
            Self::FramePacking => {
                let offset = frame.h + frame_packing_gap(screen.height);
                let right = Rect::new(frame.x, frame.y.saturating_add_unsigned(offset), frame.w, frame.h);
                (frame, right)
            }
        }
    }
}

/// One hardware layer slot after stereo expansion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalLayer<'a> {
    /// Hardware slot within the channel.
    pub slot: usize,
    /// Descriptor driving this slot (the left eye's for a right eye).
    pub data: &'a LayerData,
    /// Which view this slot shows.
    pub eye: Eye,
    /// Whether the slot is shown.
    pub enabled: bool,
    /// Source crop of this view, 32.32 fixed point.
    pub crop: Rect64,
    /// Destination on screen.
    pub frame: Rect,
}

/// Iterator over the physical slots of one channel.
///
/// A 2D descriptor yields one [`Eye::Mono`] slot. A 3D descriptor in slot `i`
/// yields [`Eye::Left`] in `i` and [`Eye::Right`] in `i + 1`; whatever was
/// submitted for slot `i + 1` is ignored. The right eye is enabled only when
/// the descriptor requests stereo output, otherwise the left eye alone covers
/// the full destination.
#[derive(Clone, Debug)]
pub struct StereoExpand<'a, 't> {
    cells: &'t [Option<&'a LayerData>],
    screen: Size,
    next: usize,
    pending: Option<PhysicalLayer<'a>>,
}

impl<'a, 't> StereoExpand<'a, 't> {
    /// Expands `cells`, the slots of one channel, for a screen of `screen`.
    #[must_use]
    pub fn new(cells: &'t [Option<&'a LayerData>], screen: Size) -> Self {
        Self {
            cells,
            screen,
            next: 0,
            pending: None,
        }
    }
}

impl<'a> Iterator for StereoExpand<'a, '_> {
    type Item = PhysicalLayer<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(right) = self.pending.take() {
            return Some(right);
        }
        while self.next < self.cells.len() {
            let slot = self.next;
            self.next += 1;
            let Some(data) = self.cells[slot] else {
                continue;
            };
            let info = &data.info;
            let Some(mode) = info.fb.stereo else {
                return Some(PhysicalLayer {
                    slot,
                    data,
                    eye: Eye::Mono,
                    enabled: data.enable,
                    crop: info.fb.crop,
                    frame: info.screen_win,
                });
            };
            // The right eye takes over the following cell.
            self.next += 1;
            let (left_frame, right_frame) = if info.stereo_out {
                info.out_3d.eye_frames(info.screen_win, self.screen)
            } else {
                (info.screen_win, info.screen_win)
            };
            self.pending = Some(PhysicalLayer {
                slot: slot + 1,
                data,
                eye: Eye::Right,
                enabled: data.enable && info.stereo_out,
                crop: mode.eye_crop(info.fb.crop, Eye::Right),
                frame: right_frame,
            });
            return Some(PhysicalLayer {
                slot,
                data,
                eye: Eye::Left,
                enabled: data.enable,
                crop: mode.eye_crop(info.fb.crop, Eye::Left),
                frame: left_frame,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::layer::{LayerInfo, LayerTable};

    const SCREEN: Size = Size::new(1920, 1080);

    fn stereo_layer(mode: Stereo3dIn, out: Option<Stereo3dOut>) -> LayerData {
        let mut info = LayerInfo {
            screen_win: Rect::new(0, 0, 1920, 1080),
            ..LayerInfo::default()
        };
        info.fb.crop = Rect64::from_pixels(0, 0, 3840, 1080);
        info.fb.stereo = Some(mode);
        if let Some(out) = out {
            info.stereo_out = true;
            info.out_3d = out;
        }
        LayerData {
            enable: true,
            info,
            ..LayerData::default()
        }
    }

    #[test]
    fn side_by_side_output_halves_destination_width() {
        let layers = [stereo_layer(
            Stereo3dIn::SideBySideFull,
            Some(Stereo3dOut::SideBySide),
        )];
        let table = LayerTable::build(&layers, 1, 4).unwrap();
        let slots: Vec<_> = table.physical(0, SCREEN).collect();
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.enabled));
        assert_eq!(slots[0].eye, Eye::Left);
        assert_eq!(slots[1].eye, Eye::Right);
        assert_eq!(slots[1].slot, 1);
        assert_eq!(slots[0].frame, Rect::new(0, 0, 960, 1080));
        assert_eq!(slots[1].frame, Rect::new(960, 0, 960, 1080));
        assert_eq!(slots[0].crop, Rect64::from_pixels(0, 0, 1920, 1080));
        assert_eq!(slots[1].crop, Rect64::from_pixels(1920, 0, 1920, 1080));
    }

    #[test]
    fn without_stereo_output_right_eye_is_disabled() {
        let layers = [stereo_layer(Stereo3dIn::SideBySideHalf, None)];
        let table = LayerTable::build(&layers, 1, 4).unwrap();
        let slots: Vec<_> = table.physical(0, SCREEN).collect();
        assert_eq!(slots.len(), 2);
        assert!(slots[0].enabled);
        assert!(!slots[1].enabled);
        assert_eq!(slots[0].frame, Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn right_eye_cell_is_skipped() {
        let mut layers = [
            stereo_layer(Stereo3dIn::TopBottom, Some(Stereo3dOut::TopBottom)),
            LayerData {
                enable: true,
                slot: 1,
                ..LayerData::default()
            },
            LayerData {
                enable: true,
                slot: 2,
                ..LayerData::default()
            },
        ];
        layers[0].info.fb.crop = Rect64::from_pixels(0, 0, 1920, 2160);
        let table = LayerTable::build(&layers, 1, 4).unwrap();
        let slots: Vec<_> = table.physical(0, SCREEN).collect();
        let ids: Vec<_> = slots.iter().map(|s| (s.slot, s.eye)).collect();
        assert_eq!(ids, [(0, Eye::Left), (1, Eye::Right), (2, Eye::Mono)]);
        assert_eq!(slots[1].crop, Rect64::from_pixels(0, 1080, 1920, 1080));
        assert_eq!(slots[1].frame, Rect::new(0, 540, 1920, 540));
    }

    #[test]
    fn frame_packing_places_right_eye_below_gap() {
        let layers = [stereo_layer(
            Stereo3dIn::FramePacking,
            Some(Stereo3dOut::FramePacking),
        )];
        let table = LayerTable::build(&layers, 1, 4).unwrap();
        let slots: Vec<_> = table.physical(0, Size::new(1920, 2205)).collect();
        assert_eq!(slots[0].frame, Rect::new(0, 0, 1920, 1080));
        assert_eq!(slots[1].frame, Rect::new(0, 1125, 1920, 1080));
        assert_eq!(frame_packing_gap(1470), 30);
        assert_eq!(frame_packing_gap(2205), 45);
    }

    #[test]
    fn line_interleave_crop_counts_eye_lines() {
        let crop = Rect64::from_pixels(0, 8, 1280, 1440);
        let left = Stereo3dIn::LineInterleave.eye_crop(crop, Eye::Left);
        assert_eq!(left, Rect64::from_pixels(0, 4, 1280, 720));
        assert_eq!(Stereo3dIn::LineInterleave.eye_crop(crop, Eye::Right), left);
    }
}
