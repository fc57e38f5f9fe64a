//! Raw byte movers used by the fast paths.

use crate::surface::{LockMode, SurfacePlane};

use super::geometry::Flip;

/// Run `f` with the source plane read-locked and the destination plane write-locked.
///
/// When both are the same plane the source is snapshotted first; the write lock is then the
/// only lock held.
pub(crate) fn with_planes<R>(
    source: &SurfacePlane,
    dest: &SurfacePlane,
    mode: LockMode,
    f: impl FnOnce(&[u8], &mut [u8]) -> R,
) -> R {
    if std::ptr::eq(source, dest) {
        let snapshot = source.snapshot();
        dest.write(mode, |d| f(&snapshot, d))
    } else {
        source.read(|s| dest.write(mode, |d| f(s, d)))
    }
}

/// Copy one whole slice.
pub(crate) fn copy_slice(
    src: &[u8],
    src_plane: &SurfacePlane,
    src_slice: u32,
    dst: &mut [u8],
    dst_plane: &SurfacePlane,
    dst_slice: u32,
) {
    let len = src_plane.slice_bytes().min(dst_plane.slice_bytes());
    let s = src_slice as usize * src_plane.slice_bytes();
    let d = dst_slice as usize * dst_plane.slice_bytes();
    dst[d..d + len].copy_from_slice(&src[s..s + len]);
}

/// A `width × height` block moved between two linear planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowCopy {
    pub src_x: u32,
    pub src_y: u32,
    pub src_slice: u32,
    pub dst_x: u32,
    pub dst_y: u32,
    pub dst_slice: u32,
    pub width: u32,
    pub height: u32,
    pub flip: Flip,
}

/// Copy `region` row by row. Destination rows are written top to bottom; the flip selects
/// which source row and column feed them.
pub(crate) fn copy_rows(
    src: &[u8],
    src_plane: &SurfacePlane,
    dst: &mut [u8],
    dst_plane: &SurfacePlane,
    region: &RowCopy,
) {
    let bpp = src_plane.bytes_per_texel();
    let row_bytes = region.width as usize * bpp;

    for row in 0..region.height {
        let sy = if region.flip.y {
            region.src_y + region.height - 1 - row
        } else {
            region.src_y + row
        };
        let s = src_plane.texel_offset(region.src_x, sy, region.src_slice);
        let d = dst_plane.texel_offset(region.dst_x, region.dst_y + row, region.dst_slice);

        if region.flip.x {
            let src_row = &src[s..s + row_bytes];
            let dst_row = &mut dst[d..d + row_bytes];
            for (dst_texel, src_texel) in dst_row
                .chunks_exact_mut(bpp)
                .zip(src_row.chunks_exact(bpp).rev())
            {
                dst_texel.copy_from_slice(src_texel);
            }
        } else {
            dst[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);
        }
    }
}

/// Set the top byte of every 32-bit texel in the block to `0xFF`.
pub(crate) fn force_opaque_alpha(
    dst: &mut [u8],
    plane: &SurfacePlane,
    x: u32,
    y: u32,
    slice: u32,
    width: u32,
    height: u32,
) {
    for row in 0..height {
        let d = plane.texel_offset(x, y + row, slice);
        for texel in dst[d..d + width as usize * 4].chunks_exact_mut(4) {
            texel[3] = 0xFF;
        }
    }
}
