// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-channel layer geometry.
//!
//! A channel presents its layers to the blender as one surface. This module
//! folds a channel's physical layers into:
//!
//! - the *blend rectangle*: union of the layers' screen destinations, clipped
//!   to the screen;
//! - the *overlay size*: the blend rectangle mapped back through the
//!   channel's scaler into source pixels;
//! - a per-slot *placement* of each layer inside the overlay, in source
//!   pixels relative to the overlay origin;
//! - the channel's pre-multiply control.

use crate::caps::MAX_LAYERS_PER_CHANNEL;
use crate::geom::{Rect, Size};
use crate::layer::PhysicalLayer;
use crate::scaler::{LayerScale, select_overlay};

/// Resolved geometry of one channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelGeometry {
    /// At least one enabled layer survives clipping.
    pub used: bool,
    /// Post-scale rectangle on screen.
    pub blend: Rect,
    /// Pre-scale overlay size.
    pub overlay: Size,
    /// Layer placements inside the overlay, indexed by slot.
    pub placements: [Rect; MAX_LAYERS_PER_CHANNEL],
    /// Any enabled layer carries pre-multiplied alpha.
    pub premultiply: bool,
    /// Scaling the channel's shared scaler runs with.
    pub scale: LayerScale,
}

fn to_source(len: i64, step: u32, frac: u32) -> i64 {
    (len * i64::from(step)) >> frac
}

fn to_source_u32(len: u32, step: u32, frac: u32) -> u32 {
    let v = (u64::from(len) * u64::from(step)) >> frac;
    u32::try_from(v).unwrap_or(u32::MAX)
}

fn narrow_i32(v: i64) -> i32 {
    i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX })
}

/// Resolves the geometry of one channel.
///
/// `layers` pairs each physical slot with its scaling; `frac` is the
/// fractional width of the channel's scaler and `screen` the display size
/// the blend rectangle is clipped to.
#[must_use]
pub fn resolve(layers: &[(PhysicalLayer<'_>, LayerScale)], frac: u32, screen: Size) -> ChannelGeometry {
    let Some(scale) = select_overlay(layers.iter().map(|(l, s)| (l.enabled, s))).copied() else {
        return ChannelGeometry::default();
    };
    let step = scale.luma;
    let enabled = || layers.iter().filter(|(l, _)| l.enabled);

    let blend = enabled().fold(Rect::ZERO, |acc, (l, _)| acc.union(l.frame));
    let premultiply = enabled().any(|(l, _)| l.data.info.fb.pre_multiply);

    let mut placements = [Rect::ZERO; MAX_LAYERS_PER_CHANNEL];
    for (l, s) in enabled() {
        let Some(slot) = placements.get_mut(l.slot) else {
            continue;
        };
        *slot = Rect::new(
            narrow_i32(to_source(i64::from(l.frame.x) - i64::from(blend.x), step.hstep, frac)),
            narrow_i32(to_source(i64::from(l.frame.y) - i64::from(blend.y), step.vstep, frac)),
            s.crop.w,
            s.crop.h,
        );
    }

    let clipped = blend.intersect(Rect::from_size(screen));
    if clipped.is_empty() {
        return ChannelGeometry::default();
    }
    if clipped != blend {
        // Content left of or above the screen is skipped in source space.
        let dx = to_source(i64::from(clipped.x) - i64::from(blend.x), step.hstep, frac);
        let dy = to_source(i64::from(clipped.y) - i64::from(blend.y), step.vstep, frac);
        for p in placements.iter_mut().filter(|p| !p.is_empty()) {
            p.x = narrow_i32(i64::from(p.x) - dx);
            p.y = narrow_i32(i64::from(p.y) - dy);
        }
    }

    ChannelGeometry {
        used: true,
        blend: clipped,
        overlay: Size::new(
            to_source_u32(clipped.w, step.hstep, frac),
            to_source_u32(clipped.h, step.vstep, frac),
        ),
        placements,
        premultiply,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::geom::Rect64;
    use crate::layer::{LayerData, LayerInfo, LayerTable};
    use crate::scaler::graphics;

    const SCREEN: Size = Size::new(1920, 1080);

    fn layer(slot: u8, crop: Rect64, win: Rect) -> LayerData {
        let mut info = LayerInfo {
            screen_win: win,
            ..LayerInfo::default()
        };
        info.fb.crop = crop;
        LayerData {
            enable: true,
            slot,
            info,
            ..LayerData::default()
        }
    }

    fn channel(layers: &[LayerData]) -> ChannelGeometry {
        let table = LayerTable::build(layers, 1, 4).unwrap();
        let slots: Vec<_> = table
            .physical(0, SCREEN)
            .map(|l| (l, graphics::layer_params(l.crop, l.frame)))
            .collect();
        resolve(&slots, graphics::FRAC_BITS, SCREEN)
    }

    #[test]
    fn empty_channel_is_unused() {
        let mut l = layer(0, Rect64::from_pixels(0, 0, 64, 64), Rect::new(0, 0, 64, 64));
        l.enable = false;
        let g = channel(&[l]);
        assert!(!g.used);
        assert_eq!(g.blend, Rect::ZERO);
        assert_eq!(g.overlay, Size::ZERO);
    }

    #[test]
    fn blend_is_union_and_placements_are_overlay_local() {
        let g = channel(&[
            layer(0, Rect64::from_pixels(0, 0, 100, 100), Rect::new(100, 100, 100, 100)),
            layer(1, Rect64::from_pixels(0, 0, 50, 50), Rect::new(300, 150, 50, 50)),
        ]);
        assert!(g.used);
        assert_eq!(g.blend, Rect::new(100, 100, 250, 100));
        assert_eq!(g.overlay, Size::new(250, 100));
        assert_eq!(g.placements[0], Rect::new(0, 0, 100, 100));
        assert_eq!(g.placements[1], Rect::new(200, 50, 50, 50));
    }

    #[test]
    fn overlay_maps_blend_back_through_scaler() {
        let g = channel(&[layer(
            0,
            Rect64::from_pixels(0, 0, 1280, 720),
            Rect::new(0, 0, 1920, 1080),
        )]);
        assert_eq!(g.blend.size(), Size::new(1920, 1080));
        // The 2/3 step truncates, so the overlay may lose up to one pixel.
        assert!(1280 - g.overlay.width <= 1);
        assert!(720 - g.overlay.height <= 1);
    }

    #[test]
    fn premultiply_is_any_enabled_layer() {
        let mut a = layer(0, Rect64::from_pixels(0, 0, 10, 10), Rect::new(0, 0, 10, 10));
        let mut b = layer(1, Rect64::from_pixels(0, 0, 10, 10), Rect::new(10, 0, 10, 10));
        assert!(!channel(&[a, b]).premultiply);
        b.info.fb.pre_multiply = true;
        assert!(channel(&[a, b]).premultiply);
        b.enable = false;
        a.info.fb.pre_multiply = false;
        assert!(!channel(&[a, b]).premultiply);
    }

    #[test]
    fn blend_is_clipped_to_screen() {
        let g = channel(&[layer(
            0,
            Rect64::from_pixels(0, 0, 200, 100),
            Rect::new(-50, 1000, 200, 100),
        )]);
        assert_eq!(g.blend, Rect::new(0, 1000, 150, 80));
        assert_eq!(g.overlay, Size::new(150, 80));
        assert_eq!(g.placements[0], Rect::new(-50, 0, 200, 100));
    }

    #[test]
    fn offscreen_channel_blends_nothing() {
        let g = channel(&[layer(
            0,
            Rect64::from_pixels(0, 0, 100, 100),
            Rect::new(4000, 0, 100, 100),
        )]);
        assert!(!g.used);
        assert_eq!(g.blend, Rect::ZERO);
        assert_eq!(g.overlay, Size::ZERO);
    }
}
