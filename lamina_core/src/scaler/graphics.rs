// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graphics scaler (single RGB plane).

use crate::geom::{Rect, Rect64, Size};

use super::{LayerScale, ScalerParams, fine_params, fir_index, integer_crop};

/// Fractional bits of graphics scaler steps and phases.
pub const FRAC_BITS: u32 = 20;

/// Scaling of one layer on a graphics channel.
#[must_use]
pub fn layer_params(crop: Rect64, frame: Rect) -> LayerScale {
    LayerScale {
        crop: integer_crop(crop),
        luma: fine_params(crop, frame, FRAC_BITS),
        chroma: None,
    }
}

/// Register state of one graphics scaler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GraphicsScalerConfig {
    /// Scaler active.
    pub enable: bool,
    /// Size entering the scaler.
    pub in_size: Size,
    /// Size leaving the scaler.
    pub out_size: Size,
    /// Step and phase.
    pub params: ScalerParams,
    /// Horizontal and vertical FIR table index.
    pub fir: [u32; 2],
}

impl GraphicsScalerConfig {
    /// Builds the register state for `params` scaling `in_size` to
    /// `out_size`.
    #[must_use]
    pub const fn new(enable: bool, in_size: Size, out_size: Size, params: ScalerParams) -> Self {
        Self {
            enable,
            in_size,
            out_size,
            params,
            fir: [
                fir_index(params.hstep, FRAC_BITS),
                fir_index(params.vstep, FRAC_BITS),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upscale_step_below_one() {
        let s = layer_params(
            Rect64::from_pixels(0, 0, 640, 360),
            Rect::new(0, 0, 1280, 720),
        );
        assert_eq!(s.luma.hstep, 1 << 19);
        assert_eq!(s.luma.vstep, 1 << 19);
        assert!(s.chroma.is_none());
    }

    #[test]
    fn fractional_origin_sets_phase() {
        let crop = Rect64::new((8 << 32) + (1 << 30), 0, 100 << 32, 100 << 32);
        let s = layer_params(crop, Rect::new(0, 0, 100, 100));
        assert_eq!(s.luma.hphase, 1 << 18);
        assert_eq!(s.crop, Rect::new(8, 0, 100, 100));
    }

    #[test]
    fn downscale_selects_coarser_fir_table() {
        let s = layer_params(
            Rect64::from_pixels(0, 0, 1920, 1080),
            Rect::new(0, 0, 480, 1080),
        );
        let config = GraphicsScalerConfig::new(
            true,
            Size::new(1920, 1080),
            Size::new(480, 1080),
            s.luma,
        );
        assert_eq!(config.fir, [14, 1]);
    }
}
