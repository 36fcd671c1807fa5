// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel formats and their memory layout.
//!
//! Discriminants match the display engine's format register encoding. RGB
//! formats occupy `0x00..0x40`; YUV formats start at
//! [`PixelFormat::Yuv444InterleavedAyuv`]. Suffixes: `Interleaved` packs all
//! components in one plane, `SemiPlanar` stores luma and an interleaved
//! chroma plane, `Planar` stores three planes.

/// A framebuffer pixel format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
#[expect(missing_docs, reason = "variant names spell out the component order")]
pub enum PixelFormat {
    #[default]
    Argb8888 = 0x00,
    Abgr8888 = 0x01,
    Rgba8888 = 0x02,
    Bgra8888 = 0x03,
    Xrgb8888 = 0x04,
    Xbgr8888 = 0x05,
    Rgbx8888 = 0x06,
    Bgrx8888 = 0x07,
    Rgb888 = 0x08,
    Bgr888 = 0x09,
    Rgb565 = 0x0a,
    Bgr565 = 0x0b,
    Argb4444 = 0x0c,
    Abgr4444 = 0x0d,
    Rgba4444 = 0x0e,
    Bgra4444 = 0x0f,
    Argb1555 = 0x10,
    Abgr1555 = 0x11,
    Rgba5551 = 0x12,
    Bgra5551 = 0x13,

    Yuv444InterleavedAyuv = 0x40,
    Yuv444InterleavedVuya = 0x41,
    Yuv422InterleavedYvyu = 0x42,
    Yuv422InterleavedYuyv = 0x43,
    Yuv422InterleavedUyvy = 0x44,
    Yuv422InterleavedVyuy = 0x45,
    Yuv444Planar = 0x46,
    Yuv422Planar = 0x47,
    Yuv420Planar = 0x48,
    Yuv411Planar = 0x49,
    Yuv422SemiPlanarUvuv = 0x4a,
    Yuv422SemiPlanarVuvu = 0x4b,
    Yuv420SemiPlanarUvuv = 0x4c,
    Yuv420SemiPlanarVuvu = 0x4d,
    Yuv411SemiPlanarUvuv = 0x4e,
    Yuv411SemiPlanarVuvu = 0x4f,
}

/// Chroma subsampling of a format, as right-shifts applied to the luma size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Subsampling {
    /// Horizontal shift (1 = half width, 2 = quarter width).
    pub w_shift: u32,
    /// Vertical shift (1 = half height).
    pub h_shift: u32,
}

impl Subsampling {
    /// No subsampling (RGB, 4:4:4).
    pub const NONE: Self = Self {
        w_shift: 0,
        h_shift: 0,
    };

    /// Returns `true` if chroma has the same resolution as luma.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.w_shift == 0 && self.h_shift == 0
    }
}

/// How the components of a format are distributed over memory planes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaneLayout {
    /// One plane holding all components.
    Interleaved,
    /// Luma plane plus one interleaved chroma plane.
    SemiPlanar,
    /// Separate luma, U and V planes.
    Planar,
}

impl PixelFormat {
    /// Decodes a raw format register value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        use PixelFormat::*;
        Some(match raw {
            0x00 => Argb8888,
            0x01 => Abgr8888,
            0x02 => Rgba8888,
            0x03 => Bgra8888,
            0x04 => Xrgb8888,
            0x05 => Xbgr8888,
            0x06 => Rgbx8888,
            0x07 => Bgrx8888,
            0x08 => Rgb888,
            0x09 => Bgr888,
            0x0a => Rgb565,
            0x0b => Bgr565,
            0x0c => Argb4444,
            0x0d => Abgr4444,
            0x0e => Rgba4444,
            0x0f => Bgra4444,
            0x10 => Argb1555,
            0x11 => Abgr1555,
            0x12 => Rgba5551,
            0x13 => Bgra5551,
            0x40 => Yuv444InterleavedAyuv,
            0x41 => Yuv444InterleavedVuya,
            0x42 => Yuv422InterleavedYvyu,
            0x43 => Yuv422InterleavedYuyv,
            0x44 => Yuv422InterleavedUyvy,
            0x45 => Yuv422InterleavedVyuy,
            0x46 => Yuv444Planar,
            0x47 => Yuv422Planar,
            0x48 => Yuv420Planar,
            0x49 => Yuv411Planar,
            0x4a => Yuv422SemiPlanarUvuv,
            0x4b => Yuv422SemiPlanarVuvu,
            0x4c => Yuv420SemiPlanarUvuv,
            0x4d => Yuv420SemiPlanarVuvu,
            0x4e => Yuv411SemiPlanarUvuv,
            0x4f => Yuv411SemiPlanarVuvu,
            _ => return None,
        })
    }

    /// Returns the register encoding.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Returns `true` for any YUV format.
    #[must_use]
    pub const fn is_yuv(self) -> bool {
        self.raw() >= Self::Yuv444InterleavedAyuv.raw()
    }

    /// Returns `true` for formats the video scaler must treat as YUV.
    ///
    /// The packed 4:4:4 formats with alpha go through the video channel the
    /// same way RGB does, so they are excluded.
    #[must_use]
    pub const fn is_video_yuv(self) -> bool {
        self.raw() >= Self::Yuv422InterleavedYvyu.raw()
    }

    /// Returns the chroma subsampling of the format.
    #[must_use]
    pub const fn subsampling(self) -> Subsampling {
        use PixelFormat::*;
        match self {
            Yuv422InterleavedYvyu
            | Yuv422InterleavedYuyv
            | Yuv422InterleavedUyvy
            | Yuv422InterleavedVyuy
            | Yuv422Planar
            | Yuv422SemiPlanarUvuv
            | Yuv422SemiPlanarVuvu => Subsampling {
                w_shift: 1,
                h_shift: 0,
            },
            Yuv420Planar | Yuv420SemiPlanarUvuv | Yuv420SemiPlanarVuvu => Subsampling {
                w_shift: 1,
                h_shift: 1,
            },
            Yuv411Planar | Yuv411SemiPlanarUvuv | Yuv411SemiPlanarVuvu => Subsampling {
                w_shift: 2,
                h_shift: 0,
            },
            _ => Subsampling::NONE,
        }
    }

    /// Returns how components are laid out in memory.
    #[must_use]
    pub const fn layout(self) -> PlaneLayout {
        use PixelFormat::*;
        match self {
            Yuv444Planar | Yuv422Planar | Yuv420Planar | Yuv411Planar => PlaneLayout::Planar,
            Yuv422SemiPlanarUvuv
            | Yuv422SemiPlanarVuvu
            | Yuv420SemiPlanarUvuv
            | Yuv420SemiPlanarVuvu
            | Yuv411SemiPlanarUvuv
            | Yuv411SemiPlanarVuvu => PlaneLayout::SemiPlanar,
            _ => PlaneLayout::Interleaved,
        }
    }

    /// Number of memory planes.
    #[must_use]
    pub const fn plane_count(self) -> usize {
        match self.layout() {
            PlaneLayout::Interleaved => 1,
            PlaneLayout::SemiPlanar => 2,
            PlaneLayout::Planar => 3,
        }
    }

    /// Bytes occupied by one sample of `plane`; 0 for planes the format lacks.
    #[must_use]
    pub const fn bytes_per_pixel(self, plane: usize) -> u32 {
        use PixelFormat::*;
        if plane >= self.plane_count() {
            return 0;
        }
        match self.layout() {
            PlaneLayout::Planar => 1,
            PlaneLayout::SemiPlanar => {
                if plane == 0 {
                    1
                } else {
                    2
                }
            }
            PlaneLayout::Interleaved => match self {
                Rgb888 | Bgr888 => 3,
                Rgb565 | Bgr565 | Argb4444 | Abgr4444 | Rgba4444 | Bgra4444 | Argb1555
                | Abgr1555 | Rgba5551 | Bgra5551 => 2,
                Yuv422InterleavedYvyu
                | Yuv422InterleavedYuyv
                | Yuv422InterleavedUyvy
                | Yuv422InterleavedVyuy => 2,
                _ => 4,
            },
        }
    }

    /// Resolution shifts of `plane` relative to the luma plane.
    #[must_use]
    pub const fn plane_subsampling(self, plane: usize) -> Subsampling {
        if plane == 0 || matches!(self.layout(), PlaneLayout::Interleaved) {
            Subsampling::NONE
        } else {
            self.subsampling()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trips_for_every_encoding() {
        for raw in (0x00..0x14).chain(0x40..0x50) {
            let fmt = PixelFormat::from_raw(raw).expect("valid encoding");
            assert_eq!(fmt.raw(), raw, "format {fmt:?}");
        }
        assert_eq!(PixelFormat::from_raw(0x14), None);
        assert_eq!(PixelFormat::from_raw(0x50), None);
    }

    #[test]
    fn yuv_classification() {
        assert!(!PixelFormat::Argb8888.is_yuv());
        assert!(PixelFormat::Yuv444InterleavedAyuv.is_yuv());
        assert!(!PixelFormat::Yuv444InterleavedAyuv.is_video_yuv());
        assert!(PixelFormat::Yuv420SemiPlanarUvuv.is_video_yuv());
    }

    #[test]
    fn nv12_layout() {
        let f = PixelFormat::Yuv420SemiPlanarUvuv;
        assert_eq!(f.plane_count(), 2);
        assert_eq!(f.bytes_per_pixel(0), 1);
        assert_eq!(f.bytes_per_pixel(1), 2);
        assert_eq!(f.bytes_per_pixel(2), 0);
        assert_eq!(
            f.plane_subsampling(1),
            Subsampling {
                w_shift: 1,
                h_shift: 1
            }
        );
        assert!(f.plane_subsampling(0).is_none());
    }

    #[test]
    fn packed_yuv422_is_single_plane() {
        let f = PixelFormat::Yuv422InterleavedYuyv;
        assert_eq!(f.plane_count(), 1);
        assert_eq!(f.bytes_per_pixel(0), 2);
        assert_eq!(f.subsampling().w_shift, 1);
        assert!(f.plane_subsampling(0).is_none());
    }
}
