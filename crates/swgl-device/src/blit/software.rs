//! Reference implementation of the converting blits a [`Pipeline`](crate::pipeline::Pipeline)
//! provides by default.
//!
//! Texels are decoded to RGBA `f32`, optionally filtered, and re-encoded in the destination
//! format. Padding channels (`X8`) decode as opaque, so copies between the `A8`/`X8` variants
//! of a format always produce an opaque destination alpha.

use tracing::{debug, warn};

use crate::format::Format;
use crate::rect::{Rect, SliceRect, SliceRectF};
use crate::state::ColorWriteMask;
use crate::surface::{LockMode, Plane, Surface, SurfacePlane};

use super::copy::with_planes;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftwareBlitter;

impl SoftwareBlitter {
    /// Copy `source_rect` of `source` into `dest_rect` of `dest`.
    ///
    /// Swapped `dest_rect` edges mirror that axis. `filter` selects bilinear sampling; otherwise
    /// the nearest texel is used. With `stencil` set, the stencil planes are copied (always
    /// nearest) instead of the internal planes.
    pub fn blit(
        &self,
        source: &Surface,
        source_rect: SliceRectF,
        dest: &Surface,
        dest_rect: SliceRect,
        filter: bool,
        stencil: bool,
    ) {
        let plane = if stencil { Plane::Stencil } else { Plane::Internal };
        let (Some(src_plane), Some(dst_plane)) = (source.plane(plane), dest.plane(plane)) else {
            warn!(?plane, "blit between surfaces without a matching plane");
            return;
        };
        if source_rect.slice >= source.depth() || dest_rect.slice >= dest.depth() {
            warn!(
                source_slice = source_rect.slice,
                dest_slice = dest_rect.slice,
                "blit slice out of range"
            );
            return;
        }

        let mapping = Mapping::new(source, source_rect, dest_rect);
        let clipped = dest_rect.rect.normalized().intersect(&dest.rect());
        if clipped.is_empty() {
            return;
        }
        debug!(%clipped, filter, stencil, "software blit");

        let src_slice = source_rect.slice;
        let dst_slice = dest_rect.slice;
        with_planes(src_plane, dst_plane, LockMode::WriteOnly, |src, dst| {
            for y in clipped.y0..clipped.y1 {
                for x in clipped.x0..clipped.x1 {
                    let (u, v) = mapping.source_coords(x, y);
                    let d = dst_plane.texel_offset(x as u32, y as u32, dst_slice);

                    if stencil {
                        let (sx, sy) = mapping.nearest(u, v);
                        dst[d] = src[src_plane.texel_offset(sx, sy, src_slice)];
                        continue;
                    }

                    let rgba = if filter {
                        mapping.bilinear(u, v, |sx, sy| {
                            fetch(src, src_plane, source.format(), sx, sy, src_slice)
                        })
                    } else {
                        let (sx, sy) = mapping.nearest(u, v);
                        fetch(src, src_plane, source.format(), sx, sy, src_slice)
                    };
                    let bpp = dst_plane.bytes_per_texel();
                    dest.format().write_texel(rgba, &mut dst[d..d + bpp]);
                }
            }
        });
    }

    /// Resample the whole of `source` into the whole of `dest`, slice by slice, nearest texel.
    pub fn blit_3d(&self, source: &Surface, dest: &Surface) {
        let (src_plane, dst_plane) = (source.internal(), dest.internal());
        let scale = |d: u32, s: u32, i: u32| -> u32 {
            let c = ((i as f32 + 0.5) * s as f32 / d as f32) as u32;
            c.min(s - 1)
        };
        debug!(
            source_format = ?source.format(),
            dest_format = ?dest.format(),
            "software volume blit"
        );

        with_planes(src_plane, dst_plane, LockMode::Discard, |src, dst| {
            let bpp = dst_plane.bytes_per_texel();
            for z in 0..dest.depth() {
                let sz = scale(dest.depth(), source.depth(), z);
                for y in 0..dest.height() {
                    let sy = scale(dest.height(), source.height(), y);
                    for x in 0..dest.width() {
                        let sx = scale(dest.width(), source.width(), x);
                        let rgba = fetch(src, src_plane, source.format(), sx, sy, sz);
                        let d = dst_plane.texel_offset(x, y, z);
                        dest.format().write_texel(rgba, &mut dst[d..d + bpp]);
                    }
                }
            }
        });
    }

    /// Fill `rect` (clipped to the surface) of slice 0 with `rgba`, writing only the channels in
    /// `mask`.
    pub fn clear(&self, rgba: [f32; 4], dest: &Surface, rect: Rect, mask: ColorWriteMask) {
        let rect = rect.intersect(&dest.rect());
        if rect.is_empty() || mask.is_empty() {
            return;
        }

        let format = dest.format();
        let plane = dest.internal();
        let bpp = plane.bytes_per_texel();
        let mut encoded = vec![0u8; bpp];
        format.write_texel(rgba, &mut encoded);

        let full = mask.contains(ColorWriteMask::ALL);
        let mode = if full {
            LockMode::WriteOnly
        } else {
            LockMode::ReadWrite
        };
        plane.write(mode, |bytes| {
            for y in rect.y0..rect.y1 {
                for x in rect.x0..rect.x1 {
                    let d = plane.texel_offset(x as u32, y as u32, 0);
                    let texel = &mut bytes[d..d + bpp];
                    if full {
                        texel.copy_from_slice(&encoded);
                    } else {
                        let mut value = format.read_texel(texel);
                        for (channel, bit) in [
                            ColorWriteMask::RED,
                            ColorWriteMask::GREEN,
                            ColorWriteMask::BLUE,
                            ColorWriteMask::ALPHA,
                        ]
                        .into_iter()
                        .enumerate()
                        {
                            if mask.contains(bit) {
                                value[channel] = rgba[channel];
                            }
                        }
                        format.write_texel(value, texel);
                    }
                }
            }
        });
    }
}

fn fetch(src: &[u8], plane: &SurfacePlane, format: Format, x: u32, y: u32, slice: u32) -> [f32; 4] {
    let s = plane.texel_offset(x, y, slice);
    format.read_texel(&src[s..s + plane.bytes_per_texel()])
}

/// Maps destination pixel centers into source texel space.
#[derive(Debug, Clone, Copy)]
struct Mapping {
    /// Source rectangle, normalized.
    sx0: f32,
    sy0: f32,
    sw: f32,
    sh: f32,
    /// Destination origin and signed extent; a negative extent mirrors the axis.
    dx0: f32,
    dy0: f32,
    dw: f32,
    dh: f32,
    /// Inclusive texel bounds sampling may touch.
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl Mapping {
    fn new(source: &Surface, source_rect: SliceRectF, dest_rect: SliceRect) -> Self {
        let s = source_rect.rect.normalized();
        let d = dest_rect.rect;
        let last_x = source.width().saturating_sub(1);
        let last_y = source.height().saturating_sub(1);
        let clamp = |v: f32, last: u32| (v.max(0.0) as u32).min(last);

        Self {
            sx0: s.x0,
            sy0: s.y0,
            sw: s.width(),
            sh: s.height(),
            dx0: d.x0 as f32,
            dy0: d.y0 as f32,
            dw: (d.x1 - d.x0) as f32,
            dh: (d.y1 - d.y0) as f32,
            min_x: clamp(s.x0.floor(), last_x),
            min_y: clamp(s.y0.floor(), last_y),
            max_x: clamp(s.x1.ceil() - 1.0, last_x),
            max_y: clamp(s.y1.ceil() - 1.0, last_y),
        }
    }

    /// Continuous source coordinates for the center of destination pixel `(x, y)`.
    fn source_coords(&self, x: i32, y: i32) -> (f32, f32) {
        let fx = ((x as f32 + 0.5 - self.dx0) / self.dw).abs();
        let fy = ((y as f32 + 0.5 - self.dy0) / self.dh).abs();
        (self.sx0 + fx * self.sw, self.sy0 + fy * self.sh)
    }

    fn clamp_x(&self, x: f32) -> u32 {
        (x.max(0.0) as u32).clamp(self.min_x, self.max_x.max(self.min_x))
    }

    fn clamp_y(&self, y: f32) -> u32 {
        (y.max(0.0) as u32).clamp(self.min_y, self.max_y.max(self.min_y))
    }

    fn nearest(&self, u: f32, v: f32) -> (u32, u32) {
        (self.clamp_x(u.floor()), self.clamp_y(v.floor()))
    }

    fn bilinear(&self, u: f32, v: f32, mut fetch: impl FnMut(u32, u32) -> [f32; 4]) -> [f32; 4] {
        let (u, v) = (u - 0.5, v - 0.5);
        let (fu, fv) = (u.floor(), v.floor());
        let (wx, wy) = (u - fu, v - fv);
        let (x0, y0) = (self.clamp_x(fu), self.clamp_y(fv));
        let (x1, y1) = (self.clamp_x(fu + 1.0), self.clamp_y(fv + 1.0));

        let t00 = fetch(x0, y0);
        let t10 = fetch(x1, y0);
        let t01 = fetch(x0, y1);
        let t11 = fetch(x1, y1);

        let mut out = [0.0; 4];
        for c in 0..4 {
            let top = t00[c] + (t10[c] - t00[c]) * wx;
            let bottom = t01[c] + (t11[c] - t01[c]) * wx;
            out[c] = top + (bottom - top) * wy;
        }
        out
    }
}
