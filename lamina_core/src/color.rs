// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color-space resolution.
//!
//! Layers may leave their color space undefined. Before the per-channel
//! color-space converter (CSC) can be programmed, each enabled channel's input
//! color space is inferred:
//!
//! - YUV content declared [`ColorSpace::Undefined`] or [`ColorSpace::Reserved`]
//!   resolves to BT.601 when the luma plane is standard-definition sized (at
//!   most [`SD_MAX_WIDTH`] × [`SD_MAX_HEIGHT`]) and BT.709 otherwise, keeping
//!   limited range.
//! - The `*Full` sentinels resolve the same way to the full-range variants.
//! - RGB content is always full-range GBR, whatever it declares.
//!
//! The resolved input is then paired with the manager's output target to form
//! a [`CscConfig`].

use crate::format::PixelFormat;
use crate::geom::Size;

/// Widest luma plane still treated as standard definition.
///
/// Slightly above 720 so that 16-pixel aligned SD buffers qualify.
pub const SD_MAX_WIDTH: u32 = 736;

/// Tallest luma plane still treated as standard definition.
pub const SD_MAX_HEIGHT: u32 = 576;

/// Color matrix (primaries and transfer coefficients).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColorMatrix {
    /// Identity matrix, RGB content.
    #[default]
    Gbr = 0,
    /// ITU-R BT.709 (HD).
    Bt709 = 1,
    /// FCC Title 47.
    Fcc = 2,
    /// ITU-R BT.470 System B/G.
    Bt470bg = 3,
    /// ITU-R BT.601 (SD).
    Bt601 = 4,
    /// SMPTE 240M.
    Smpte240m = 5,
    /// YCgCo.
    Ycgco = 6,
    /// ITU-R BT.2020 non-constant luminance.
    Bt2020nc = 7,
    /// ITU-R BT.2020 constant luminance.
    Bt2020c = 8,
}

impl ColorMatrix {
    const fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => Self::Gbr,
            1 => Self::Bt709,
            2 => Self::Fcc,
            3 => Self::Bt470bg,
            4 => Self::Bt601,
            5 => Self::Smpte240m,
            6 => Self::Ycgco,
            7 => Self::Bt2020nc,
            8 => Self::Bt2020c,
            _ => return None,
        })
    }
}

/// Quantization range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorRange {
    /// Studio swing, 16–235.
    Limited,
    /// Full swing, 0–255.
    #[default]
    Full,
}

/// Whether a color is carried as RGB or YUV.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorClass {
    /// RGB components.
    #[default]
    Rgb,
    /// YUV components.
    Yuv,
}

/// A color space as declared by a layer descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Not specified; limited range implied.
    #[default]
    Undefined,
    /// Not specified; full range implied.
    UndefinedFull,
    /// Reserved encoding; treated like [`Undefined`](Self::Undefined).
    Reserved,
    /// Reserved encoding; treated like [`UndefinedFull`](Self::UndefinedFull).
    ReservedFull,
    /// A concrete color space.
    Defined(ResolvedColorSpace),
}

impl ColorSpace {
    /// BT.601, limited range.
    pub const BT601: Self = Self::Defined(ResolvedColorSpace::BT601);
    /// BT.709, limited range.
    pub const BT709: Self = Self::Defined(ResolvedColorSpace::BT709);

    /// Decodes the driver's packed encoding: `0x000`/`0x001` undefined,
    /// `0x1mm` limited range, `0x2mm` full range, `0x300`/`0x301` reserved.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0x000 => Some(Self::Undefined),
            0x001 => Some(Self::UndefinedFull),
            0x300 => Some(Self::Reserved),
            0x301 => Some(Self::ReservedFull),
            _ => {
                let range = match raw & 0xF00 {
                    0x100 => ColorRange::Limited,
                    0x200 => ColorRange::Full,
                    _ => return None,
                };
                match ColorMatrix::from_raw(raw & 0xFF) {
                    Some(matrix) => Some(Self::Defined(ResolvedColorSpace { matrix, range })),
                    None => None,
                }
            }
        }
    }

    /// Returns the packed encoding.
    #[must_use]
    pub const fn raw(self) -> u32 {
        match self {
            Self::Undefined => 0x000,
            Self::UndefinedFull => 0x001,
            Self::Reserved => 0x300,
            Self::ReservedFull => 0x301,
            Self::Defined(cs) => {
                let range = match cs.range {
                    ColorRange::Limited => 0x100,
                    ColorRange::Full => 0x200,
                };
                range | cs.matrix as u32
            }
        }
    }
}

/// A fully specified color space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResolvedColorSpace {
    /// Color matrix.
    pub matrix: ColorMatrix,
    /// Quantization range.
    pub range: ColorRange,
}

impl ResolvedColorSpace {
    /// BT.601, limited range.
    pub const BT601: Self = Self::new(ColorMatrix::Bt601, ColorRange::Limited);
    /// BT.601, full range.
    pub const BT601_FULL: Self = Self::new(ColorMatrix::Bt601, ColorRange::Full);
    /// BT.709, limited range.
    pub const BT709: Self = Self::new(ColorMatrix::Bt709, ColorRange::Limited);
    /// BT.709, full range.
    pub const BT709_FULL: Self = Self::new(ColorMatrix::Bt709, ColorRange::Full);
    /// Full-range RGB.
    pub const GBR_FULL: Self = Self::new(ColorMatrix::Gbr, ColorRange::Full);

    /// Creates a color space.
    #[must_use]
    pub const fn new(matrix: ColorMatrix, range: ColorRange) -> Self {
        Self { matrix, range }
    }
}

/// Output side of the color-space conversion, owned by the manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CscTarget {
    /// Output component class.
    pub class: ColorClass,
    /// Output matrix.
    pub matrix: ColorMatrix,
    /// Output range.
    pub range: ColorRange,
}

impl Default for CscTarget {
    fn default() -> Self {
        Self {
            class: ColorClass::Rgb,
            matrix: ColorMatrix::Gbr,
            range: ColorRange::Full,
        }
    }
}

/// Per-channel color-space converter configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CscConfig {
    /// Input component class.
    pub in_class: ColorClass,
    /// Input matrix.
    pub in_matrix: ColorMatrix,
    /// Input range.
    pub in_range: ColorRange,
    /// Output component class.
    pub out_class: ColorClass,
    /// Output matrix.
    pub out_matrix: ColorMatrix,
    /// Output range.
    pub out_range: ColorRange,
}

impl CscConfig {
    /// Pairs a channel's resolved input with the manager target.
    #[must_use]
    pub const fn new(is_yuv: bool, input: ResolvedColorSpace, target: CscTarget) -> Self {
        Self {
            in_class: if is_yuv {
                ColorClass::Yuv
            } else {
                ColorClass::Rgb
            },
            in_matrix: input.matrix,
            in_range: input.range,
            out_class: target.class,
            out_matrix: target.matrix,
            out_range: target.range,
        }
    }
}

/// Resolves the effective color space of one layer.
///
/// `fb_size` is the luma plane size of the framebuffer (not the crop).
#[must_use]
pub fn resolve(format: PixelFormat, declared: ColorSpace, fb_size: Size) -> ResolvedColorSpace {
    if !format.is_yuv() {
        return ResolvedColorSpace::GBR_FULL;
    }
    let sd = fb_size.width <= SD_MAX_WIDTH && fb_size.height <= SD_MAX_HEIGHT;
    match declared {
        ColorSpace::Undefined | ColorSpace::Reserved => {
            if sd {
                ResolvedColorSpace::BT601
            } else {
                ResolvedColorSpace::BT709
            }
        }
        ColorSpace::UndefinedFull | ColorSpace::ReservedFull => {
            if sd {
                ResolvedColorSpace::BT601_FULL
            } else {
                ResolvedColorSpace::BT709_FULL
            }
        }
        ColorSpace::Defined(cs) => cs,
    }
}

/// Color state of one channel after folding its enabled layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelColor {
    /// Whether any enabled layer carries YUV content.
    pub is_yuv: bool,
    /// Resolved input color space.
    pub space: ResolvedColorSpace,
}

impl ChannelColor {
    /// Folds `(format, declared, fb_size)` of a channel's enabled layers.
    ///
    /// The first YUV layer decides the channel's color space; a channel with
    /// only RGB layers is full-range GBR.
    ///
    /// Later YUV layers never override the first one. This departs from a
    /// last-writer fold, where the top-most slot would win.
    #[must_use]
    pub fn fold(layers: impl IntoIterator<Item = (PixelFormat, ColorSpace, Size)>) -> Self {
        for (format, declared, fb_size) in layers {
            if format.is_yuv() {
                return Self {
                    is_yuv: true,
                    space: resolve(format, declared, fb_size),
                };
            }
        }
        Self {
            is_yuv: false,
            space: ResolvedColorSpace::GBR_FULL,
        }
    }

    /// Builds the converter configuration for this channel.
    #[must_use]
    pub const fn csc(self, target: CscTarget) -> CscConfig {
        CscConfig::new(self.is_yuv, self.space, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NV12: PixelFormat = PixelFormat::Yuv420SemiPlanarUvuv;

    #[test]
    fn sd_undefined_resolves_to_bt601_limited() {
        let cs = resolve(NV12, ColorSpace::Undefined, Size::new(720, 480));
        assert_eq!(cs, ResolvedColorSpace::BT601);
        assert_eq!(cs.range, ColorRange::Limited);
    }

    #[test]
    fn sd_full_sentinel_resolves_to_bt601_full() {
        let cs = resolve(NV12, ColorSpace::UndefinedFull, Size::new(720, 480));
        assert_eq!(cs, ResolvedColorSpace::BT601_FULL);
        let cs = resolve(NV12, ColorSpace::ReservedFull, Size::new(720, 576));
        assert_eq!(cs, ResolvedColorSpace::BT601_FULL);
    }

    #[test]
    fn hd_undefined_resolves_to_bt709() {
        let cs = resolve(NV12, ColorSpace::Undefined, Size::new(1920, 1080));
        assert_eq!(cs, ResolvedColorSpace::BT709);
        let cs = resolve(NV12, ColorSpace::Reserved, Size::new(1280, 720));
        assert_eq!(cs, ResolvedColorSpace::BT709);
        let cs = resolve(NV12, ColorSpace::UndefinedFull, Size::new(1920, 1080));
        assert_eq!(cs, ResolvedColorSpace::BT709_FULL);
    }

    #[test]
    fn sd_threshold_allows_aligned_buffers() {
        let cs = resolve(NV12, ColorSpace::Undefined, Size::new(736, 576));
        assert_eq!(cs, ResolvedColorSpace::BT601);
        let cs = resolve(NV12, ColorSpace::Undefined, Size::new(737, 576));
        assert_eq!(cs, ResolvedColorSpace::BT709);
    }

    #[test]
    fn declared_space_is_kept() {
        let declared = ColorSpace::Defined(ResolvedColorSpace::new(
            ColorMatrix::Bt2020nc,
            ColorRange::Limited,
        ));
        let cs = resolve(NV12, declared, Size::new(3840, 2160));
        assert_eq!(cs.matrix, ColorMatrix::Bt2020nc);
    }

    #[test]
    fn rgb_is_always_full_range_gbr() {
        for size in [Size::new(640, 480), Size::new(1920, 1080)] {
            let cs = resolve(PixelFormat::Argb8888, ColorSpace::BT601, size);
            assert_eq!(cs, ResolvedColorSpace::GBR_FULL);
        }
    }

    #[test]
    fn raw_encoding_round_trips() {
        assert_eq!(ColorSpace::from_raw(0x104), Some(ColorSpace::BT601));
        assert_eq!(ColorSpace::BT709.raw(), 0x101);
        assert_eq!(
            ColorSpace::from_raw(0x204),
            Some(ColorSpace::Defined(ResolvedColorSpace::BT601_FULL))
        );
        assert_eq!(ColorSpace::from_raw(0x301), Some(ColorSpace::ReservedFull));
        assert_eq!(ColorSpace::from_raw(0x109), None);
        assert_eq!(ColorSpace::from_raw(0x400), None);
    }

    #[test]
    fn channel_takes_first_yuv_layer() {
        let ch = ChannelColor::fold([
            (PixelFormat::Argb8888, ColorSpace::Undefined, Size::new(64, 64)),
            (NV12, ColorSpace::Undefined, Size::new(1920, 1080)),
            (NV12, ColorSpace::Undefined, Size::new(720, 480)),
        ]);
        assert!(ch.is_yuv);
        assert_eq!(ch.space, ResolvedColorSpace::BT709);

        // A later declared space does not override the first layer either.
        let ch = ChannelColor::fold([
            (NV12, ColorSpace::Undefined, Size::new(720, 480)),
            (NV12, ColorSpace::Defined(ResolvedColorSpace::BT709_FULL), Size::new(1920, 1080)),
        ]);
        assert_eq!(ch.space, ResolvedColorSpace::BT601);
    }

    #[test]
    fn csc_combines_input_with_target() {
        let ch = ChannelColor {
            is_yuv: true,
            space: ResolvedColorSpace::BT601,
        };
        let target = CscTarget {
            class: ColorClass::Yuv,
            matrix: ColorMatrix::Bt709,
            range: ColorRange::Limited,
        };
        let csc = ch.csc(target);
        assert_eq!(csc.in_class, ColorClass::Yuv);
        assert_eq!(csc.in_matrix, ColorMatrix::Bt601);
        assert_eq!(csc.in_range, ColorRange::Limited);
        assert_eq!(csc.out_class, ColorClass::Yuv);
        assert_eq!(csc.out_matrix, ColorMatrix::Bt709);
        assert_eq!(csc.out_range, ColorRange::Limited);
    }
}
