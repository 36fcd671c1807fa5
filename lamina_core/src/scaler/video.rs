// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Video scaler (luma and chroma planes).

use crate::format::{PixelFormat, Subsampling};
use crate::geom::{Rect, Rect64, Size};

use super::coarse::CoarseDecision;
use super::{LayerScale, ScalerParams, fine_params, fir_index, integer_crop};

/// Fractional bits of video scaler steps and phases.
pub const FRAC_BITS: u32 = 19;

/// Quarter-pixel chroma siting offset at [`FRAC_BITS`].
const CHROMA_SITING: u32 = (1 << FRAC_BITS) >> 2;

/// Derives chroma parameters from luma parameters for a subsampled format.
///
/// Steps shrink with the subsampling; phases shrink the same way and move
/// back by a quarter pixel for the co-sited chroma samples.
#[must_use]
pub const fn chroma_params(luma: ScalerParams, sub: Subsampling) -> ScalerParams {
    let hphase = if sub.w_shift > 0 {
        (luma.hphase >> sub.w_shift).saturating_sub(CHROMA_SITING)
    } else {
        luma.hphase
    };
    let vphase = if sub.h_shift > 0 {
        (luma.vphase >> sub.h_shift).saturating_sub(CHROMA_SITING)
    } else {
        luma.vphase
    };
    ScalerParams {
        hstep: luma.hstep >> sub.w_shift,
        vstep: luma.vstep >> sub.h_shift,
        hphase,
        vphase,
    }
}

/// Scaling of one layer on a video channel.
///
/// `crop` is the per-eye crop (after stereo splitting), `frame` its screen
/// destination.
#[must_use]
pub fn layer_params(format: PixelFormat, crop: Rect64, frame: Rect) -> LayerScale {
    let luma = fine_params(crop, frame, FRAC_BITS);
    LayerScale {
        crop: integer_crop(crop),
        luma,
        chroma: Some(chroma_params(luma, format.subsampling())),
    }
}

/// Register state of one video scaler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VideoScalerConfig {
    /// Scaler active; when clear the overlay passes through unscaled.
    pub enable: bool,
    /// Format of the channel's video content.
    pub format: PixelFormat,
    /// Luma size entering the scaler (after coarse decimation).
    pub in_size: Size,
    /// Chroma size entering the scaler.
    pub in_chroma_size: Size,
    /// Size leaving the scaler.
    pub out_size: Size,
    /// Luma parameters.
    pub luma: ScalerParams,
    /// Chroma parameters.
    pub chroma: ScalerParams,
    /// Horizontal coarse decimation factor.
    pub h_coarse: u32,
    /// Vertical coarse decimation factor.
    pub v_coarse: u32,
    /// Horizontal and vertical FIR table index of the luma plane.
    pub luma_fir: [u32; 2],
    /// Horizontal and vertical FIR table index of the chroma plane.
    pub chroma_fir: [u32; 2],
}

impl VideoScalerConfig {
    /// Builds the register state from the overlay parameters and coarse
    /// decision. FIR tables follow the final (post-decimation) steps.
    #[must_use]
    pub const fn new(
        enable: bool,
        format: PixelFormat,
        coarse: &CoarseDecision,
        out_size: Size,
        luma: ScalerParams,
        chroma: ScalerParams,
    ) -> Self {
        Self {
            enable,
            format,
            in_size: coarse.mid,
            in_chroma_size: coarse.mid_chroma,
            out_size,
            luma,
            chroma,
            h_coarse: coarse.h_factor,
            v_coarse: coarse.v_factor,
            luma_fir: [
                fir_index(luma.hstep, FRAC_BITS),
                fir_index(luma.vstep, FRAC_BITS),
            ],
            chroma_fir: [
                fir_index(chroma.hstep, FRAC_BITS),
                fir_index(chroma.vstep, FRAC_BITS),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u32 = 1 << FRAC_BITS;

    fn luma(hstep: u32, vstep: u32, hphase: u32, vphase: u32) -> ScalerParams {
        ScalerParams {
            hstep,
            vstep,
            hphase,
            vphase,
        }
    }

    #[test]
    fn yuv422_halves_horizontal_step() {
        let c = chroma_params(
            luma(2 * ONE, 2 * ONE, 0, 0),
            PixelFormat::Yuv422InterleavedYuyv.subsampling(),
        );
        assert_eq!(c.hstep, ONE);
        assert_eq!(c.vstep, 2 * ONE);
    }

    #[test]
    fn yuv420_halves_both_steps() {
        let c = chroma_params(
            luma(2 * ONE, 2 * ONE, 0, 0),
            PixelFormat::Yuv420Planar.subsampling(),
        );
        assert_eq!(c.hstep, ONE);
        assert_eq!(c.vstep, ONE);
    }

    #[test]
    fn yuv411_quarters_horizontal_step() {
        let c = chroma_params(
            luma(4 * ONE, ONE, 0, 0),
            PixelFormat::Yuv411SemiPlanarUvuv.subsampling(),
        );
        assert_eq!(c.hstep, ONE);
        assert_eq!(c.vstep, ONE);
    }

    #[test]
    fn chroma_phase_is_sited_and_saturates() {
        let sub = PixelFormat::Yuv420SemiPlanarUvuv.subsampling();
        let c = chroma_params(luma(ONE, ONE, ONE, 0), sub);
        assert_eq!(c.hphase, ONE / 2 - ONE / 4);
        assert_eq!(c.vphase, 0);
    }

    #[test]
    fn rgb_on_video_channel_keeps_luma_params() {
        let l = luma(3 * ONE / 2, ONE, 5, 6);
        assert_eq!(chroma_params(l, Subsampling::NONE), l);
    }

    #[test]
    fn layer_params_downscale_1080p_to_720p() {
        let s = layer_params(
            PixelFormat::Yuv420SemiPlanarUvuv,
            Rect64::from_pixels(0, 0, 1920, 1080),
            Rect::new(0, 0, 1280, 720),
        );
        assert_eq!(s.crop, Rect::new(0, 0, 1920, 1080));
        assert_eq!(s.luma.hstep, 3 * ONE / 2);
        assert_eq!(s.chroma.map(|c| c.hstep), Some(3 * ONE / 4));
    }

    #[test]
    fn config_picks_fir_tables_from_final_steps() {
        let coarse = CoarseDecision {
            h_factor: 1,
            v_factor: 1,
            mid: Size::new(1920, 1080),
            mid_chroma: Size::new(960, 540),
            degraded: false,
        };
        let l = luma(3 * ONE / 2, 2 * ONE, 0, 0);
        let c = chroma_params(l, PixelFormat::Yuv420SemiPlanarUvuv.subsampling());
        let config = VideoScalerConfig::new(
            true,
            PixelFormat::Yuv420SemiPlanarUvuv,
            &coarse,
            Size::new(1280, 540),
            l,
            c,
        );
        // 1.5x sits four eighths into the 1x-2x bucket; 2x opens the next one.
        assert_eq!(config.luma_fir, [5, 9]);
        // Chroma upsamples horizontally and runs 1:1 vertically.
        assert_eq!(config.chroma_fir, [0, 1]);
    }
}
