// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scaler parameter calculation.
//!
//! Every channel with a scaler maps its pre-scale *overlay* onto a
//! post-scale *blend* rectangle. The mapping is described per axis by a fixed
//! point `step` (source pixels advanced per destination pixel) and `phase`
//! (sub-pixel offset of the first sample):
//!
//! ```text
//! step  = (crop_len << frac) / dst_len
//! phase = fractional part of the crop origin, at frac bits
//! ```
//!
//! The fractional width differs per scaler: [`video::FRAC_BITS`] for the
//! video scaler, [`graphics::FRAC_BITS`] for the graphics scaler.
//!
//! All layers of a channel share one scaler, so the channel is programmed with
//! the parameters of its first enabled layer ([`select_overlay`]). Large
//! downscales on video channels are first decimated by an integer factor
//! ([`coarse`]) so the fine scaler stays within its range and the engine clock
//! budget.

pub mod coarse;
pub mod graphics;
pub mod video;

use crate::format::PixelFormat;
use crate::geom::{FIXED_FRAC_BITS, FIXED_FRAC_MASK, Rect, Rect64, Size};

/// Step and phase of one plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScalerParams {
    /// Horizontal step.
    pub hstep: u32,
    /// Vertical step.
    pub vstep: u32,
    /// Horizontal phase.
    pub hphase: u32,
    /// Vertical phase.
    pub vphase: u32,
}

/// Scaling of one physical layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerScale {
    /// Integer source crop after rounding.
    pub crop: Rect,
    /// Luma (or only) plane parameters.
    pub luma: ScalerParams,
    /// Chroma plane parameters; `None` on graphics channels.
    pub chroma: Option<ScalerParams>,
}

/// Fixed-point step for mapping `crop_len` (32.32) onto `dst_len` pixels.
///
/// An empty destination yields 0.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "steps of valid crops fit the hardware's 32-bit step registers"
)]
pub fn step(crop_len: i64, dst_len: u32, frac: u32) -> u32 {
    if dst_len == 0 || crop_len <= 0 {
        return 0;
    }
    let src = (crop_len as u64) >> (FIXED_FRAC_BITS - frac);
    (src / u64::from(dst_len)) as u32
}

/// Phase of a crop origin (32.32) at `frac` bits.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "the result has at most `frac` significant bits"
)]
pub fn phase(origin: i64, frac: u32) -> u32 {
    ((origin & FIXED_FRAC_MASK) >> (FIXED_FRAC_BITS - frac)) as u32
}

/// Rounds a 32.32 crop to whole pixels.
///
/// The origin is truncated; the extent grows by one pixel when the
/// fractional parts of origin and extent together reach a whole pixel, so the
/// integer crop still covers the last partially sampled pixel.
#[must_use]
pub fn integer_crop(crop: Rect64) -> Rect {
    let grow = |origin: i64, len: i64| {
        let carry = ((origin & FIXED_FRAC_MASK) + (len & FIXED_FRAC_MASK)) >> FIXED_FRAC_BITS;
        u32::from(carry != 0)
    };
    let size = crop.size_pixels();
    Rect::new(
        crop.x_pixels(),
        crop.y_pixels(),
        size.width + grow(crop.x, crop.w),
        size.height + grow(crop.y, crop.h),
    )
}

/// Fine parameters of one plane mapping `crop` onto `frame`.
#[must_use]
pub fn fine_params(crop: Rect64, frame: Rect, frac: u32) -> ScalerParams {
    ScalerParams {
        hstep: step(crop.w, frame.w, frac),
        vstep: step(crop.h, frame.h, frac),
        hphase: phase(crop.x, frac),
        vphase: phase(crop.y, frac),
    }
}

/// Picks the parameters the channel's shared scaler runs with: those of the
/// first enabled layer.
pub fn select_overlay<'a>(
    layers: impl IntoIterator<Item = (bool, &'a LayerScale)>,
) -> Option<&'a LayerScale> {
    layers
        .into_iter()
        .find_map(|(enabled, scale)| enabled.then_some(scale))
}

/// Returns `true` if the scaler can be bypassed: the overlay already has the
/// blend size and no plane needs chroma upsampling.
#[must_use]
pub fn is_bypass(overlay: Size, blend: Size, format: Option<PixelFormat>) -> bool {
    overlay == blend && format.is_none_or(|f| f.subsampling().is_none())
}

/// Index of the FIR coefficient table for a step at `frac` bits.
///
/// Ratios are bucketed in eighths between 1× and 2×, quarters between 2× and
/// 3×, then one table each for 3×, 4× and anything coarser. Upscaling uses
/// table 0.
#[must_use]
pub const fn fir_index(step: u32, frac: u32) -> u32 {
    let ratio = step >> (frac - 3);
    let int_part = ratio >> 3;
    let eighths = ratio & 0x7;
    match int_part {
        0 => 0,
        1 => 1 + eighths,
        2 => 9 + (eighths >> 1),
        3 => 13,
        4 => 14,
        _ => 15,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: i64 = 1 << 31;

    #[test]
    fn identity_step_is_one() {
        let crop = Rect64::from_pixels(0, 0, 1280, 720);
        let p = fine_params(crop, Rect::new(0, 0, 1280, 720), 20);
        assert_eq!(p.hstep, 1 << 20);
        assert_eq!(p.vstep, 1 << 20);
        assert_eq!(p.hphase, 0);
    }

    #[test]
    fn downscale_by_two() {
        assert_eq!(step(1920 << 32, 960, 19), 2 << 19);
    }

    #[test]
    fn empty_destination_gives_zero_step() {
        assert_eq!(step(1920 << 32, 0, 19), 0);
    }

    #[test]
    fn phase_is_fraction_of_origin() {
        assert_eq!(phase((10 << 32) + HALF, 20), 1 << 19);
        assert_eq!(phase(10 << 32, 20), 0);
    }

    #[test]
    fn integer_crop_grows_on_carry() {
        let crop = Rect64::new((5 << 32) + HALF, 0, (100 << 32) + HALF, 50 << 32);
        assert_eq!(integer_crop(crop), Rect::new(5, 0, 101, 50));
        let crop = Rect64::new((5 << 32) + HALF, 0, 100 << 32, 50 << 32);
        assert_eq!(integer_crop(crop), Rect::new(5, 0, 100, 50));
    }

    #[test]
    fn bypass_requires_equal_sizes_and_no_subsampling() {
        let s = Size::new(1280, 720);
        assert!(is_bypass(s, s, None));
        assert!(is_bypass(s, s, Some(PixelFormat::Argb8888)));
        assert!(!is_bypass(s, s, Some(PixelFormat::Yuv420SemiPlanarUvuv)));
        assert!(!is_bypass(s, Size::new(1920, 1080), None));
    }

    #[test]
    fn overlay_comes_from_first_enabled_layer() {
        let a = LayerScale {
            crop: Rect::new(0, 0, 1, 1),
            ..LayerScale::default()
        };
        let b = LayerScale {
            crop: Rect::new(0, 0, 2, 2),
            ..LayerScale::default()
        };
        let picked = select_overlay([(false, &a), (true, &b), (true, &a)]);
        assert_eq!(picked, Some(&b));
        assert_eq!(select_overlay([(false, &a)]), None);
    }

    #[test]
    fn fir_buckets() {
        let frac = 19;
        assert_eq!(fir_index(1 << frac, frac), 1);
        assert_eq!(fir_index((1 << frac) / 2, frac), 0);
        assert_eq!(fir_index((1 << frac) + (1 << (frac - 1)), frac), 5);
        assert_eq!(fir_index(2 << frac, frac), 9);
        assert_eq!(fir_index(3 << frac, frac), 13);
        assert_eq!(fir_index(4 << frac, frac), 14);
        assert_eq!(fir_index(9 << frac, frac), 15);
    }
}
