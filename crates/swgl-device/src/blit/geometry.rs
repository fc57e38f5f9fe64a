//! Rectangle resolution for region copies: flip detection, normalization and proportional
//! clamping of the source and destination rectangles against their surfaces.

use crate::error::DeviceError;
use crate::rect::{Rect, RectF, SliceRect, SliceRectF};

/// Per-axis mirror of a copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flip {
    pub x: bool,
    pub y: bool,
}

impl Flip {
    pub const NONE: Flip = Flip { x: false, y: false };

    pub fn is_none(&self) -> bool {
        !self.x && !self.y
    }

    /// Orientation implied by the caller's rectangles.
    ///
    /// With both rectangles, an axis is flipped when exactly one of them runs backwards. With a
    /// single rectangle, its own inverted axes are flipped.
    pub fn from_rects(source: Option<&Rect>, dest: Option<&Rect>) -> Flip {
        match (source, dest) {
            (Some(s), Some(d)) => Flip {
                x: (s.x0 < s.x1) ^ (d.x0 < d.x1),
                y: (s.y0 < s.y1) ^ (d.y0 < d.y1),
            },
            (Some(r), None) | (None, Some(r)) => Flip {
                x: r.x0 > r.x1,
                y: r.y0 > r.y1,
            },
            (None, None) => Flip::NONE,
        }
    }
}

/// Extent of a surface as seen by the rectangle math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Clamped, validated rectangles for one copy. Both are normalized; the flip is kept apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlitGeometry {
    pub source: SliceRectF,
    pub dest: SliceRect,
    pub flip: Flip,
}

impl BlitGeometry {
    pub fn resolve(
        source_rect: Option<SliceRect>,
        source: Extent,
        dest_rect: Option<SliceRect>,
        dest: Extent,
    ) -> Result<Self, DeviceError> {
        check_span("source", source_rect.as_ref(), source)?;
        check_span("destination", dest_rect.as_ref(), dest)?;

        let flip = Flip::from_rects(
            source_rect.as_ref().map(|r| &r.rect),
            dest_rect.as_ref().map(|r| &r.rect),
        );

        let mut s = match source_rect {
            Some(r) => SliceRectF {
                rect: RectF::from(r.rect).normalized(),
                slice: r.slice,
            },
            None => SliceRectF::from(SliceRect::from(Rect::from_extent(
                source.width,
                source.height,
            ))),
        };
        let mut d = match dest_rect {
            Some(r) => SliceRect {
                rect: r.rect.normalized(),
                slice: r.slice,
            },
            None => SliceRect::from(Rect::from_extent(dest.width, dest.height)),
        };

        clamp_source(&mut s.rect, &mut d.rect, source, flip);
        clamp_dest(&mut s.rect, &mut d.rect, dest, flip);

        if !s.rect.fits_within(source.width, source.height) {
            return Err(DeviceError::InvalidRectangle {
                side: "source",
                rect: s.rect.to_string(),
                width: source.width,
                height: source.height,
            });
        }
        if !d.rect.fits_within(dest.width, dest.height) {
            return Err(DeviceError::InvalidRectangle {
                side: "destination",
                rect: d.rect.to_string(),
                width: dest.width,
                height: dest.height,
            });
        }

        Ok(Self {
            source: s,
            dest: d,
            flip,
        })
    }

    /// Source and destination extents differ on some axis.
    pub fn is_scaling(&self) -> bool {
        self.source.rect.width() != self.dest.rect.width() as f32
            || self.source.rect.height() != self.dest.rect.height() as f32
    }

    /// Both rectangles cover their whole surface.
    pub fn is_full_copy(&self, source: Extent, dest: Extent) -> bool {
        let s = &self.source.rect;
        s.x0 == 0.0
            && s.y0 == 0.0
            && s.x1 == source.width as f32
            && s.y1 == source.height as f32
            && self.dest.rect == Rect::from_extent(dest.width, dest.height)
    }

    /// Destination rectangle with the edges of flipped axes swapped, as expected by the generic
    /// blitter.
    pub fn oriented_dest(&self) -> SliceRect {
        let mut d = self.dest;
        if self.flip.x {
            std::mem::swap(&mut d.rect.x0, &mut d.rect.x1);
        }
        if self.flip.y {
            std::mem::swap(&mut d.rect.y0, &mut d.rect.y1);
        }
        d
    }
}

/// Reject a rectangle whose width or height does not fit in `i32`.
fn check_span(
    side: &'static str,
    rect: Option<&SliceRect>,
    extent: Extent,
) -> Result<(), DeviceError> {
    let Some(r) = rect.map(|r| &r.rect) else {
        return Ok(());
    };
    let fits = |a: i32, b: i32| i32::try_from(i64::from(b) - i64::from(a)).is_ok();
    if fits(r.x0, r.x1) && fits(r.y0, r.y1) {
        return Ok(());
    }
    Err(DeviceError::InvalidRectangle {
        side,
        rect: r.to_string(),
        width: extent.width,
        height: extent.height,
    })
}

/// Trim the parts of `s` that fall outside the source surface, removing the matching
/// destination pixels in proportion.
///
/// The destination trim is rounded half away from zero; the source edge then moves by the
/// rounded amount mapped back through the ratio, so both sides stay aligned.
fn clamp_source(s: &mut RectF, d: &mut Rect, extent: Extent, flip: Flip) {
    let (width, height) = (extent.width as f32, extent.height as f32);

    if s.x0 < 0.0 {
        let ratio = d.width() as f32 / s.width();
        let offsetf = (-s.x0 * ratio).round();
        let offset = offsetf as i32;
        if flip.x {
            d.x1 = d.x1.saturating_sub(offset);
        } else {
            d.x0 = d.x0.saturating_add(offset);
        }
        s.x0 += offsetf / ratio;
    }
    if s.x1 > width {
        let ratio = d.width() as f32 / s.width();
        let offsetf = ((s.x1 - width) * ratio).round();
        let offset = offsetf as i32;
        if flip.x {
            d.x0 = d.x0.saturating_add(offset);
        } else {
            d.x1 = d.x1.saturating_sub(offset);
        }
        s.x1 -= offsetf / ratio;
    }
    if s.y0 < 0.0 {
        let ratio = d.height() as f32 / s.height();
        let offsetf = (-s.y0 * ratio).round();
        let offset = offsetf as i32;
        if flip.y {
            d.y1 = d.y1.saturating_sub(offset);
        } else {
            d.y0 = d.y0.saturating_add(offset);
        }
        s.y0 += offsetf / ratio;
    }
    if s.y1 > height {
        let ratio = d.height() as f32 / s.height();
        let offsetf = ((s.y1 - height) * ratio).round();
        let offset = offsetf as i32;
        if flip.y {
            d.y0 = d.y0.saturating_add(offset);
        } else {
            d.y1 = d.y1.saturating_sub(offset);
        }
        s.y1 -= offsetf / ratio;
    }
}

/// Snap `d` to the destination surface, trimming the source in proportion. Unlike the source
/// clamp, the source trim is not rounded.
fn clamp_dest(s: &mut RectF, d: &mut Rect, extent: Extent, flip: Flip) {
    let (width, height) = (extent.width as i32, extent.height as i32);

    if d.x0 < 0 {
        let offset = (-(d.x0 as f32) / d.width() as f32) * s.width();
        if flip.x {
            s.x1 -= offset;
        } else {
            s.x0 += offset;
        }
        d.x0 = 0;
    }
    if d.x1 > width {
        let offset = ((d.x1 - width) as f32 / d.width() as f32) * s.width();
        if flip.x {
            s.x0 += offset;
        } else {
            s.x1 -= offset;
        }
        d.x1 = width;
    }
    if d.y0 < 0 {
        let offset = (-(d.y0 as f32) / d.height() as f32) * s.height();
        if flip.y {
            s.y1 -= offset;
        } else {
            s.y0 += offset;
        }
        d.y0 = 0;
    }
    if d.y1 > height {
        let offset = ((d.y1 - height) as f32 / d.height() as f32) * s.height();
        if flip.y {
            s.y0 += offset;
        } else {
            s.y1 -= offset;
        }
        d.y1 = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> SliceRect {
        SliceRect::new(x0, y0, x1, y1, 0)
    }

    #[test]
    fn flip_from_rect_orientation() {
        let fwd = Rect::new(0, 0, 4, 4);
        let back_x = Rect::new(4, 0, 0, 4);
        assert_eq!(Flip::from_rects(Some(&fwd), Some(&fwd)), Flip::NONE);
        assert_eq!(
            Flip::from_rects(Some(&back_x), Some(&fwd)),
            Flip { x: true, y: false }
        );
        // Both backwards cancel out.
        assert_eq!(Flip::from_rects(Some(&back_x), Some(&back_x)), Flip::NONE);
        assert_eq!(
            Flip::from_rects(None, Some(&back_x)),
            Flip { x: true, y: false }
        );
        assert_eq!(Flip::from_rects(None, None), Flip::NONE);
    }

    #[test]
    fn dest_overflow_trims_source_proportionally() {
        let g = BlitGeometry::resolve(
            Some(rect(0, 0, 100, 100)),
            Extent::new(100, 100),
            Some(rect(-10, 0, 40, 50)),
            Extent::new(50, 50),
        )
        .unwrap();
        assert_eq!(g.dest.rect, Rect::new(0, 0, 40, 50));
        assert_eq!(g.source.rect, RectF::new(20.0, 0.0, 100.0, 100.0));
        assert!(g.flip.is_none());
    }

    #[test]
    fn flipped_dest_overflow_trims_opposite_source_edge() {
        let g = BlitGeometry::resolve(
            Some(rect(0, 0, 100, 100)),
            Extent::new(100, 100),
            Some(rect(40, 0, -10, 50)),
            Extent::new(50, 50),
        )
        .unwrap();
        assert!(g.flip.x);
        assert_eq!(g.dest.rect, Rect::new(0, 0, 40, 50));
        assert_eq!(g.source.rect, RectF::new(0.0, 0.0, 80.0, 100.0));
        assert_eq!(g.oriented_dest().rect, Rect::new(40, 0, 0, 50));
    }

    #[test]
    fn source_overflow_trims_dest_with_rounding() {
        // Source runs 3 texels past the left edge at a 2x magnification: 6 dest pixels go.
        let g = BlitGeometry::resolve(
            Some(rect(-3, 0, 7, 10)),
            Extent::new(10, 10),
            Some(rect(0, 0, 20, 20)),
            Extent::new(20, 20),
        )
        .unwrap();
        assert_eq!(g.dest.rect, Rect::new(6, 0, 20, 20));
        assert_eq!(g.source.rect, RectF::new(0.0, 0.0, 7.0, 10.0));
    }

    #[test]
    fn in_bounds_downscale_is_untouched() {
        let g = BlitGeometry::resolve(
            None,
            Extent::new(10, 10),
            Some(rect(0, 0, 5, 5)),
            Extent::new(5, 5),
        )
        .unwrap();
        assert_eq!(g.source.rect, RectF::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(g.dest.rect, Rect::new(0, 0, 5, 5));
        assert!(g.is_scaling());
        assert!(g.is_full_copy(Extent::new(10, 10), Extent::new(5, 5)));
    }

    #[test]
    fn fully_outside_is_rejected() {
        let err = BlitGeometry::resolve(
            Some(rect(0, 0, 4, 4)),
            Extent::new(4, 4),
            Some(rect(10, 10, 14, 14)),
            Extent::new(8, 8),
        )
        .unwrap_err();
        // The destination snap pushes the source past its origin, so either side may report.
        assert!(matches!(err, DeviceError::InvalidRectangle { .. }));
    }

    #[test]
    fn flipped_source_overflow_trims_opposite_dest_edge() {
        let g = BlitGeometry::resolve(
            Some(rect(90, 0, -10, 100)),
            Extent::new(100, 100),
            Some(rect(0, 0, 50, 50)),
            Extent::new(50, 50),
        )
        .unwrap();
        assert!(g.flip.x);
        assert_eq!(g.dest.rect, Rect::new(0, 0, 45, 50));
        assert_eq!(g.source.rect, RectF::new(0.0, 0.0, 90.0, 100.0));
        assert_eq!(g.oriented_dest().rect, Rect::new(45, 0, 0, 50));
    }

    #[test]
    fn flipped_source_overflow_on_y() {
        let g = BlitGeometry::resolve(
            Some(rect(0, 110, 100, 10)),
            Extent::new(100, 100),
            Some(rect(0, 0, 50, 50)),
            Extent::new(50, 50),
        )
        .unwrap();
        assert!(g.flip.y);
        assert!(!g.flip.x);
        // Source bottom runs 10 rows past the surface: the top 5 dest rows go.
        assert_eq!(g.dest.rect, Rect::new(0, 5, 50, 50));
        assert_eq!(g.source.rect, RectF::new(0.0, 10.0, 100.0, 100.0));
    }

    #[test]
    fn extreme_coordinates_are_rejected() {
        let err = BlitGeometry::resolve(
            Some(rect(0, 0, 4, 4)),
            Extent::new(4, 4),
            Some(rect(i32::MIN, 0, 4, 4)),
            Extent::new(4, 4),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DeviceError::InvalidRectangle { side: "destination", .. }
        ));

        let err = BlitGeometry::resolve(
            Some(rect(0, i32::MAX, 4, -4)),
            Extent::new(4, 4),
            None,
            Extent::new(4, 4),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DeviceError::InvalidRectangle { side: "source", .. }
        ));
    }

    #[test]
    fn degenerate_source_is_rejected() {
        let err = BlitGeometry::resolve(
            Some(rect(2, 0, 2, 4)),
            Extent::new(4, 4),
            None,
            Extent::new(4, 4),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DeviceError::InvalidRectangle { side: "source", .. }
        ));
    }
}
