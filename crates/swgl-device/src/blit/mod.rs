//! Region and volume copies between surfaces.
//!
//! A region copy resolves its rectangles ([`geometry`]), picks the planes selected by its
//! [`CopyFlags`], and classifies each plane into a [`CopyStrategy`]. Raw strategies move bytes
//! directly; everything else goes through [`Pipeline::blit`].

use bitflags::bitflags;
use tracing::{debug, warn};

use crate::config::DeviceConfig;
use crate::error::DeviceError;
use crate::format::Format;
use crate::pipeline::Pipeline;
use crate::rect::SliceRect;
use crate::stats::BlitStats;
use crate::surface::{LockMode, Plane, Surface};

pub(crate) mod copy;
pub mod geometry;
pub mod software;
pub mod strategy;

pub use geometry::{BlitGeometry, Extent, Flip};
pub use software::SoftwareBlitter;
pub use strategy::{classify, CopyStrategy, CopyTraits};

use copy::{copy_rows, copy_slice, force_opaque_alpha, with_planes, RowCopy};

bitflags! {
    /// Planes and channels a region copy touches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CopyFlags: u8 {
        const COLOR_RED = 0x01;
        const COLOR_GREEN = 0x02;
        const COLOR_BLUE = 0x04;
        const COLOR_ALPHA = 0x08;
        const COLOR_BUFFER = 0x0F;
        const DEPTH_BUFFER = 0x10;
        const STENCIL_BUFFER = 0x20;
        const ALL_BUFFERS = 0x3F;
        /// Bilinear filtering when the copy scales.
        const USE_FILTER = 0x40;
    }
}

/// Planes selected for one copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selection {
    color: bool,
    depth: bool,
    stencil: bool,
}

impl Selection {
    fn new(flags: CopyFlags, source: Format) -> Self {
        Self {
            color: flags.contains(CopyFlags::COLOR_BUFFER),
            depth: flags.contains(CopyFlags::DEPTH_BUFFER) && source.is_depth(),
            stencil: flags.contains(CopyFlags::STENCIL_BUFFER) && source.is_stencil(),
        }
    }

    fn is_empty(&self) -> bool {
        !self.color && !self.depth && !self.stencil
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn copy_region<P: Pipeline + ?Sized>(
    pipeline: &mut P,
    config: &DeviceConfig,
    stats: &BlitStats,
    source: Option<&Surface>,
    source_rect: Option<SliceRect>,
    dest: Option<&Surface>,
    dest_rect: Option<SliceRect>,
    flags: CopyFlags,
) -> Result<(), DeviceError> {
    let result = match (source, dest) {
        (Some(source), Some(dest)) => copy_surfaces(
            pipeline,
            config,
            stats,
            source,
            source_rect,
            dest,
            dest_rect,
            flags,
        ),
        (None, _) => Err(DeviceError::MissingSurface("source")),
        (_, None) => Err(DeviceError::MissingSurface("destination")),
    };

    if let Err(err) = &result {
        stats.inc_rejected();
        warn!(%err, ?flags, "region copy rejected");
    }
    result
}

#[allow(clippy::too_many_arguments)]
fn copy_surfaces<P: Pipeline + ?Sized>(
    pipeline: &mut P,
    config: &DeviceConfig,
    stats: &BlitStats,
    source: &Surface,
    source_rect: Option<SliceRect>,
    dest: &Surface,
    dest_rect: Option<SliceRect>,
    flags: CopyFlags,
) -> Result<(), DeviceError> {
    let source_extent = Extent::new(source.width(), source.height());
    let dest_extent = Extent::new(dest.width(), dest.height());
    let geometry = BlitGeometry::resolve(source_rect, source_extent, dest_rect, dest_extent)?;
    check_slice("source", geometry.source.slice, source)?;
    check_slice("destination", geometry.dest.slice, dest)?;

    let selection = Selection::new(flags, source.format());
    if selection.is_empty() {
        debug!(?flags, "region copy selects no plane");
        return Ok(());
    }
    if selection.stencil && dest.stencil().is_none() {
        return Err(DeviceError::NoStencilPlane(dest.format()));
    }

    if selection.color || selection.depth {
        copy_plane(
            pipeline,
            config,
            stats,
            source,
            dest,
            &geometry,
            Plane::Internal,
            selection,
            flags,
        )?;
    }
    if selection.stencil {
        copy_plane(
            pipeline,
            config,
            stats,
            source,
            dest,
            &geometry,
            Plane::Stencil,
            selection,
            flags,
        )?;
    }
    Ok(())
}

fn check_slice(side: &'static str, slice: u32, surface: &Surface) -> Result<(), DeviceError> {
    if slice < surface.depth() {
        return Ok(());
    }
    Err(DeviceError::InvalidRectangle {
        side,
        rect: format!("slice {slice}"),
        width: surface.width(),
        height: surface.height(),
    })
}

#[allow(clippy::too_many_arguments)]
fn copy_plane<P: Pipeline + ?Sized>(
    pipeline: &mut P,
    config: &DeviceConfig,
    stats: &BlitStats,
    source: &Surface,
    dest: &Surface,
    geometry: &BlitGeometry,
    plane: Plane,
    selection: Selection,
    flags: CopyFlags,
) -> Result<(), DeviceError> {
    let (Some(src_plane), Some(dst_plane)) = (source.plane(plane), dest.plane(plane)) else {
        return Err(DeviceError::NoStencilPlane(dest.format()));
    };

    let traits = CopyTraits {
        full_copy: geometry.is_full_copy(
            Extent::new(source.width(), source.height()),
            Extent::new(dest.width(), dest.height()),
        ),
        scaling: geometry.is_scaling(),
        flip: geometry.flip,
        same_format: source.format() == dest.format(),
        alpha_pair: Format::is_alpha_pair(source.format(), dest.format()),
        equal_slice: src_plane.slice_bytes() == dst_plane.slice_bytes(),
        tight_pitch: src_plane.pitch()
            <= source.width() as usize * src_plane.bytes_per_texel() + 16,
        depth: match plane {
            Plane::Internal => selection.depth,
            Plane::Stencil => true,
        },
        color: plane == Plane::Internal && selection.color,
        quad_layout: src_plane.has_quad_layout() || dst_plane.has_quad_layout(),
        fast_paths: config.fast_paths,
    };
    let strategy = classify(&traits);
    debug!(
        ?plane,
        %strategy,
        source = %geometry.source.rect,
        dest = %geometry.dest.rect,
        flip_x = geometry.flip.x,
        flip_y = geometry.flip.y,
        "region copy"
    );
    stats.record(strategy);

    let mode = if traits.full_copy {
        LockMode::Discard
    } else {
        LockMode::WriteOnly
    };
    let src_slice = geometry.source.slice;
    let dst_slice = geometry.dest.slice;

    match strategy {
        CopyStrategy::WholeSurface => {
            with_planes(src_plane, dst_plane, mode, |s, d| {
                copy_slice(s, src_plane, src_slice, d, dst_plane, dst_slice)
            });
        }
        CopyStrategy::DepthRows | CopyStrategy::ColorRows => {
            let region = RowCopy {
                src_x: geometry.source.rect.x0 as u32,
                src_y: geometry.source.rect.y0 as u32,
                src_slice,
                dst_x: geometry.dest.rect.x0 as u32,
                dst_y: geometry.dest.rect.y0 as u32,
                dst_slice,
                width: geometry.dest.rect.width() as u32,
                height: geometry.dest.rect.height() as u32,
                flip: geometry.flip,
            };
            let opaque = strategy == CopyStrategy::ColorRows && traits.alpha_pair;
            with_planes(src_plane, dst_plane, mode, |s, d| {
                copy_rows(s, src_plane, d, dst_plane, &region);
                if opaque {
                    force_opaque_alpha(
                        d,
                        dst_plane,
                        region.dst_x,
                        region.dst_y,
                        dst_slice,
                        region.width,
                        region.height,
                    );
                }
            });
        }
        CopyStrategy::Generic => {
            let filter = traits.scaling && flags.contains(CopyFlags::USE_FILTER);
            pipeline.blit(
                source,
                geometry.source,
                dest,
                geometry.oriented_dest(),
                filter,
                plane == Plane::Stencil,
            );
        }
    }
    Ok(())
}

pub(crate) fn copy_volume<P: Pipeline + ?Sized>(
    pipeline: &mut P,
    config: &DeviceConfig,
    stats: &BlitStats,
    source: Option<&Surface>,
    dest: Option<&Surface>,
) -> Result<(), DeviceError> {
    let (source, dest) = match volume_surfaces(source, dest) {
        Ok(surfaces) => surfaces,
        Err(err) => {
            stats.inc_rejected();
            warn!(%err, "volume copy rejected");
            return Err(err);
        }
    };

    let scaling = source.width() != dest.width()
        || source.height() != dest.height()
        || source.depth() != dest.depth();
    let alpha_pair = Format::is_alpha_pair(source.format(), dest.format());
    let same_format = source.format() == dest.format() || alpha_pair;
    let (src_plane, dst_plane) = (source.internal(), dest.internal());
    let quad_layout = src_plane.has_quad_layout() || dst_plane.has_quad_layout();

    if !config.fast_paths || scaling || !same_format || quad_layout {
        debug!(scaling, same_format, "volume copy through generic blitter");
        stats.inc_volume_generic();
        pipeline.blit_3d(source, dest);
        return Ok(());
    }

    debug!(slices = dest.depth(), alpha_pair, "volume copy by rows");
    stats.inc_volume_rows();
    with_planes(src_plane, dst_plane, LockMode::ReadWrite, |s, d| {
        for slice in 0..dest.depth() {
            let region = RowCopy {
                src_x: 0,
                src_y: 0,
                src_slice: slice,
                dst_x: 0,
                dst_y: 0,
                dst_slice: slice,
                width: dest.width(),
                height: dest.height(),
                flip: Flip::NONE,
            };
            copy_rows(s, src_plane, d, dst_plane, &region);
            if alpha_pair {
                force_opaque_alpha(d, dst_plane, 0, 0, slice, dest.width(), dest.height());
            }
        }
    });
    Ok(())
}

fn volume_surfaces<'a>(
    source: Option<&'a Surface>,
    dest: Option<&'a Surface>,
) -> Result<(&'a Surface, &'a Surface), DeviceError> {
    let source = source.ok_or(DeviceError::MissingSurface("source"))?;
    let dest = dest.ok_or(DeviceError::MissingSurface("destination"))?;
    let format = source.format();
    if format.is_depth() || format.is_stencil() {
        return Err(DeviceError::DepthStencilVolumeCopy(format));
    }
    Ok((source, dest))
}
