// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coarse decimation ahead of the video scaler.
//!
//! The fine scaler reads at most one line buffer per output line and shrinks
//! by at most [`MAX_FINE_DOWNSCALE`]. Larger overlays are first decimated by
//! integer factors; the engine clock must also be able to fetch the
//! decimated overlay within a frame. When no factor up to
//! [`MAX_COARSE_FACTOR`] satisfies every constraint the largest factor is used
//! and the decision is marked [`degraded`](CoarseDecision::degraded).

use crate::format::PixelFormat;
use crate::geom::Size;

use super::ScalerParams;

/// Strongest downscale the fine scaler performs on its own.
pub const MAX_FINE_DOWNSCALE: u32 = 4;

/// Strongest decimation the coarse stage performs.
pub const MAX_COARSE_FACTOR: u32 = 8;

/// Inputs to the coarse estimate of one channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoarseInput {
    /// Channel format, selects chroma subsampling.
    pub format: PixelFormat,
    /// Refresh rate of the attached device.
    pub lcd_fps: u32,
    /// Active height of the attached device.
    pub lcd_height: u32,
    /// Engine clock in MHz; 0 when unknown.
    pub de_freq_mhz: u32,
    /// Scaler line buffer width in pixels.
    pub line_buffer: u32,
    /// Pre-scale overlay size.
    pub overlay: Size,
    /// Post-scale blend size.
    pub out: Size,
}

/// Outcome of the coarse estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoarseDecision {
    /// Horizontal decimation factor (1 = none).
    pub h_factor: u32,
    /// Vertical decimation factor (1 = none).
    pub v_factor: u32,
    /// Luma size entering the fine scaler.
    pub mid: Size,
    /// Chroma size entering the fine scaler.
    pub mid_chroma: Size,
    /// No factor satisfied every constraint.
    pub degraded: bool,
}

impl CoarseDecision {
    /// Returns `true` if either axis is decimated.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.h_factor > 1 || self.v_factor > 1
    }
}

/// Chooses the smallest decimation factors that fit the scaler and clock.
#[must_use]
pub fn estimate(input: &CoarseInput) -> CoarseDecision {
    let ovl = input.overlay;
    let out = input.out;

    let h_fits = |k: u32| {
        let mid = ovl.width.div_ceil(k);
        mid <= input.line_buffer
            && u64::from(mid) <= u64::from(out.width) * u64::from(MAX_FINE_DOWNSCALE)
    };
    let (h_factor, h_ok) = smallest_factor(h_fits);
    let mid_w = ovl.width.div_ceil(h_factor);

    let v_fits = |k: u32| {
        let mid = ovl.height.div_ceil(k);
        if u64::from(mid) > u64::from(out.height) * u64::from(MAX_FINE_DOWNSCALE) {
            return false;
        }
        input.de_freq_mhz == 0 || within_clock_budget(input, mid_w, mid)
    };
    let (v_factor, v_ok) = smallest_factor(v_fits);
    let mid = Size::new(mid_w, ovl.height.div_ceil(v_factor));

    let sub = input.format.subsampling();
    CoarseDecision {
        h_factor,
        v_factor,
        mid,
        mid_chroma: Size::new(mid.width >> sub.w_shift, mid.height >> sub.h_shift),
        degraded: !(h_ok && v_ok),
    }
}

fn smallest_factor(fits: impl Fn(u32) -> bool) -> (u32, bool) {
    (1..=MAX_COARSE_FACTOR)
        .find(|&k| fits(k))
        .map_or((MAX_COARSE_FACTOR, false), |k| (k, true))
}

fn within_clock_budget(input: &CoarseInput, mid_w: u32, mid_h: u32) -> bool {
    let width = u64::from(mid_w.max(input.out.width));
    let needed = width
        * u64::from(mid_h)
        * u64::from(input.lcd_fps)
        * u64::from(input.lcd_height);
    let available = u64::from(input.de_freq_mhz) * 1_000_000 * u64::from(input.out.height);
    needed <= available
}

/// Recomputes fine parameters against the decimated input.
///
/// On a decimated axis the step maps the mid size onto the output and the
/// phase restarts at zero; untouched axes keep their parameters.
pub fn recalc(
    decision: &CoarseDecision,
    out: Size,
    frac: u32,
    luma: &mut ScalerParams,
    chroma: &mut ScalerParams,
) {
    let step = |mid: u32, out: u32| {
        if out == 0 {
            0
        } else {
            narrow((u64::from(mid) << frac) / u64::from(out))
        }
    };
    if decision.h_factor > 1 {
        luma.hstep = step(decision.mid.width, out.width);
        luma.hphase = 0;
        chroma.hstep = step(decision.mid_chroma.width, out.width);
        chroma.hphase = 0;
    }
    if decision.v_factor > 1 {
        luma.vstep = step(decision.mid.height, out.height);
        luma.vphase = 0;
        chroma.vstep = step(decision.mid_chroma.height, out.height);
        chroma.vphase = 0;
    }
}

fn narrow(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(overlay: Size, out: Size) -> CoarseInput {
        CoarseInput {
            format: PixelFormat::Yuv420SemiPlanarUvuv,
            lcd_fps: 60,
            lcd_height: 1080,
            de_freq_mhz: 0,
            line_buffer: 2048,
            overlay,
            out,
        }
    }

    #[test]
    fn no_decimation_when_everything_fits() {
        let d = estimate(&input(Size::new(1920, 1080), Size::new(1280, 720)));
        assert_eq!((d.h_factor, d.v_factor), (1, 1));
        assert!(!d.is_active());
        assert!(!d.degraded);
        assert_eq!(d.mid, Size::new(1920, 1080));
        assert_eq!(d.mid_chroma, Size::new(960, 540));
    }

    #[test]
    fn line_buffer_forces_horizontal_decimation() {
        let d = estimate(&input(Size::new(3840, 2160), Size::new(1920, 1080)));
        assert_eq!(d.h_factor, 2);
        assert_eq!(d.v_factor, 1);
        assert_eq!(d.mid, Size::new(1920, 2160));
        assert!(!d.degraded);
    }

    #[test]
    fn fine_limit_forces_vertical_decimation() {
        let d = estimate(&input(Size::new(1280, 2000), Size::new(1280, 100)));
        assert_eq!(d.v_factor, 5);
        assert_eq!(d.mid.height, 400);
    }

    #[test]
    fn clock_budget_decimates_further() {
        let mut i = input(Size::new(1920, 1080), Size::new(1920, 1080));
        i.de_freq_mhz = 100;
        let d = estimate(&i);
        // 1920 * 1080 * 60 * 1080 exceeds 100 MHz * 1080, half height fits.
        assert_eq!(d.v_factor, 2);
        assert!(!d.degraded);
    }

    #[test]
    fn impossible_budget_degrades_instead_of_failing() {
        let mut i = input(Size::new(1920, 1080), Size::new(1920, 1080));
        i.de_freq_mhz = 1;
        let d = estimate(&i);
        assert_eq!(d.v_factor, MAX_COARSE_FACTOR);
        assert!(d.degraded);
    }

    #[test]
    fn recalc_resets_phase_on_decimated_axis() {
        let d = CoarseDecision {
            h_factor: 2,
            v_factor: 1,
            mid: Size::new(1920, 2160),
            mid_chroma: Size::new(960, 1080),
            degraded: false,
        };
        let mut luma = ScalerParams {
            hstep: 123,
            vstep: 2 << 19,
            hphase: 7,
            vphase: 9,
        };
        let mut chroma = luma;
        recalc(&d, Size::new(1920, 1080), 19, &mut luma, &mut chroma);
        assert_eq!(luma.hstep, 1 << 19);
        assert_eq!(luma.hphase, 0);
        assert_eq!(luma.vstep, 2 << 19);
        assert_eq!(luma.vphase, 9);
        assert_eq!(chroma.hstep, 1 << 18);
    }
}
