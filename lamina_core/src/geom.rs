// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer and fixed-point rectangles.
//!
//! Screen-space rectangles ([`Rect`]) are integer pixels. Source crops
//! ([`Rect64`]) are sub-pixel: every field carries [`FIXED_FRAC_BITS`]
//! fractional bits, so the integer pixel is `value >> 32`.
//!
//! Bounding-box and clipping arithmetic goes through [`kurbo::Rect`]; all
//! coordinates are whole pixels, so the conversion is exact.

/// Number of fractional bits in a [`Rect64`] field.
pub const FIXED_FRAC_BITS: u32 = 32;

/// Mask selecting the fractional bits of a [`Rect64`] field.
pub const FIXED_FRAC_MASK: i64 = (1 << FIXED_FRAC_BITS) - 1;

/// A width and height in whole pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An axis-aligned rectangle in whole screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a rectangle at the origin covering `size`.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Returns the size of the rectangle.
    #[must_use]
    pub const fn size(self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(self) -> i64 {
        self.x as i64 + self.w as i64
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(self) -> i64 {
        self.y as i64 + self.h as i64
    }

    /// Converts to a [`kurbo::Rect`].
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.w),
            f64::from(self.y) + f64::from(self.h),
        )
    }

    /// Converts from a [`kurbo::Rect`] whose edges lie on whole pixels.
    ///
    /// Negative extents collapse to an empty rectangle at `(x0, y0)`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "edges are whole pixels that originated from i32/u32 values"
    )]
    pub fn from_kurbo(r: kurbo::Rect) -> Self {
        let w = (r.x1 - r.x0).max(0.0);
        let h = (r.y1 - r.y0).max(0.0);
        Self::new(r.x0 as i32, r.y0 as i32, w as u32, h as u32)
    }

    /// Smallest rectangle containing both `self` and `other`.
    ///
    /// An empty operand does not contribute.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self::from_kurbo(self.to_kurbo().union(other.to_kurbo()))
    }

    /// Overlap of `self` and `other`; empty if they are disjoint.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        let r = self.to_kurbo().intersect(other.to_kurbo());
        if r.width() <= 0.0 || r.height() <= 0.0 {
            return Self::ZERO;
        }
        Self::from_kurbo(r)
    }
}

/// A sub-pixel source crop rectangle in 32.32 fixed point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect64 {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width.
    pub w: i64,
    /// Height.
    pub h: i64,
}

impl Rect64 {
    /// Creates a fixed-point rectangle from raw 32.32 fields.
    #[must_use]
    pub const fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { x, y, w, h }
    }

    /// Creates a fixed-point rectangle from whole pixels.
    #[must_use]
    pub const fn from_pixels(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            x: (x as i64) << FIXED_FRAC_BITS,
            y: (y as i64) << FIXED_FRAC_BITS,
            w: (w as i64) << FIXED_FRAC_BITS,
            h: (h as i64) << FIXED_FRAC_BITS,
        }
    }

    /// Integer part of the left edge.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "integer part of a 32.32 value fits in 32 bits"
    )]
    pub const fn x_pixels(self) -> i32 {
        (self.x >> FIXED_FRAC_BITS) as i32
    }

    /// Integer part of the top edge.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "integer part of a 32.32 value fits in 32 bits"
    )]
    pub const fn y_pixels(self) -> i32 {
        (self.y >> FIXED_FRAC_BITS) as i32
    }

    /// Integer part of the size.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "crop sizes are non-negative and fit in 32 bits"
    )]
    pub const fn size_pixels(self) -> Size {
        Size::new(
            (self.w >> FIXED_FRAC_BITS) as u32,
            (self.h >> FIXED_FRAC_BITS) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_skips_empty_operands() {
        let a = Rect::new(10, 20, 100, 50);
        assert_eq!(a.union(Rect::ZERO), a);
        assert_eq!(Rect::ZERO.union(a), a);
    }

    #[test]
    fn union_is_bounding_box() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(200, 50, 40, 100);
        assert_eq!(a.union(b), Rect::new(0, 0, 240, 150));
    }

    #[test]
    fn intersect_clips_to_screen() {
        let screen = Rect::new(0, 0, 1280, 720);
        let r = Rect::new(-10, 700, 100, 100);
        assert_eq!(r.intersect(screen), Rect::new(0, 700, 90, 20));
    }

    #[test]
    fn disjoint_intersection_is_zero() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 10, 10);
        assert_eq!(a.intersect(b), Rect::ZERO);
    }

    #[test]
    fn fixed_point_integer_parts() {
        let r = Rect64::new((3 << 32) | 0x8000_0000, 7 << 32, 640 << 32, 480 << 32);
        assert_eq!(r.x_pixels(), 3);
        assert_eq!(r.y_pixels(), 7);
        assert_eq!(r.size_pixels(), Size::new(640, 480));
        assert_eq!(Rect64::from_pixels(3, 7, 640, 480).size_pixels(), Size::new(640, 480));
    }
}
