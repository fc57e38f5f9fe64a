//! In-memory pixel store bound to the device as a render, depth or stencil target.
//!
//! A [`Surface`] owns up to two planes:
//! - the internal plane, holding color or depth texels in the surface [`Format`];
//! - the stencil plane (one byte per texel), present only for stencil-capable formats.
//!
//! Planes are guarded by an `RwLock` and accessed through closure-scoped locks, so a surface can
//! be shared (`Arc<Surface>`) between the device and a pipeline running elsewhere.

use std::sync::{PoisonError, RwLock};

use tracing::trace;

use crate::error::DeviceError;
use crate::format::Format;
use crate::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    Internal,
    Stencil,
}

/// Access intent for a plane lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    ReadOnly,
    WriteOnly,
    /// Previous contents of the locked region may be discarded.
    Discard,
    ReadWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceDesc {
    pub width: u32,
    pub height: u32,
    /// Number of slices; `1` for 2-D surfaces.
    pub depth: u32,
    pub format: Format,
    pub samples: u32,
    pub lockable: bool,
    /// Extra bytes appended to every row of the internal plane.
    pub row_padding: usize,
}

impl SurfaceDesc {
    pub fn new(width: u32, height: u32, format: Format) -> Self {
        Self {
            width,
            height,
            depth: 1,
            format,
            samples: 1,
            lockable: true,
            row_padding: 0,
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_lockable(mut self, lockable: bool) -> Self {
        self.lockable = lockable;
        self
    }

    pub fn with_row_padding(mut self, bytes: usize) -> Self {
        self.row_padding = bytes;
        self
    }
}

/// One plane of a surface: a linear (or quad-tiled) byte store with a fixed pitch.
#[derive(Debug)]
pub struct SurfacePlane {
    bytes_per_texel: usize,
    pitch: usize,
    slice: usize,
    quad_layout: bool,
    data: RwLock<Vec<u8>>,
}

impl SurfacePlane {
    fn allocate(
        width: u32,
        height: u32,
        depth: u32,
        bytes_per_texel: usize,
        row_padding: usize,
        quad_layout: bool,
    ) -> Result<Self, DeviceError> {
        // Quad-tiled planes cover whole 2×2 quads.
        let (w, h) = if quad_layout {
            (align_up(width as usize, 2), align_up(height as usize, 2))
        } else {
            (width as usize, height as usize)
        };

        let too_big = || DeviceError::OutOfMemory { bytes: usize::MAX };
        let pitch = w
            .checked_mul(bytes_per_texel)
            .and_then(|p| p.checked_add(row_padding))
            .ok_or_else(too_big)?;
        let slice = pitch.checked_mul(h).ok_or_else(too_big)?;
        let len = slice.checked_mul(depth as usize).ok_or_else(too_big)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| DeviceError::OutOfMemory { bytes: len })?;
        data.resize(len, 0);

        Ok(Self {
            bytes_per_texel,
            pitch,
            slice,
            quad_layout,
            data: RwLock::new(data),
        })
    }

    pub fn bytes_per_texel(&self) -> usize {
        self.bytes_per_texel
    }

    /// Row pitch in bytes.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Slice size in bytes.
    pub fn slice_bytes(&self) -> usize {
        self.slice
    }

    pub fn has_quad_layout(&self) -> bool {
        self.quad_layout
    }

    /// Byte offset of texel `(x, y)` in `slice`.
    pub fn texel_offset(&self, x: u32, y: u32, slice: u32) -> usize {
        let base = slice as usize * self.slice;
        let (x, y) = (x as usize, y as usize);
        if self.quad_layout {
            let pitch_texels = self.pitch / self.bytes_per_texel;
            let index = (x & !1) * 2 + (x & 1) + (y & !1) * pitch_texels + (y & 1) * 2;
            base + index * self.bytes_per_texel
        } else {
            base + y * self.pitch + x * self.bytes_per_texel
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write<R>(&self, mode: LockMode, f: impl FnOnce(&mut [u8]) -> R) -> R {
        trace!(?mode, bytes = self.slice, "surface plane write lock");
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Copy of the whole plane. Used when a copy reads and writes the same surface.
    pub fn snapshot(&self) -> Vec<u8> {
        self.read(|bytes| bytes.to_vec())
    }
}

#[derive(Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    depth: u32,
    format: Format,
    samples: u32,
    lockable: bool,
    internal: SurfacePlane,
    stencil: Option<SurfacePlane>,
}

impl Surface {
    pub fn new(desc: SurfaceDesc) -> Result<Self, DeviceError> {
        if desc.width == 0 || desc.height == 0 || desc.depth == 0 {
            return Err(DeviceError::EmptySurface {
                width: desc.width,
                height: desc.height,
                depth: desc.depth,
            });
        }

        let internal = SurfacePlane::allocate(
            desc.width,
            desc.height,
            desc.depth,
            desc.format.bytes(),
            desc.row_padding,
            desc.format.has_quad_layout(),
        )?;
        let stencil = if desc.format.is_stencil() {
            Some(SurfacePlane::allocate(
                desc.width,
                desc.height,
                desc.depth,
                1,
                0,
                false,
            )?)
        } else {
            None
        };

        Ok(Self {
            width: desc.width,
            height: desc.height,
            depth: desc.depth,
            format: desc.format,
            samples: desc.samples.max(1),
            lockable: desc.lockable,
            internal,
            stencil,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn sample_count(&self) -> u32 {
        self.samples
    }

    pub fn is_lockable(&self) -> bool {
        self.lockable
    }

    /// `[0, width) × [0, height)`.
    pub fn rect(&self) -> Rect {
        Rect::from_extent(self.width, self.height)
    }

    pub fn internal(&self) -> &SurfacePlane {
        &self.internal
    }

    pub fn stencil(&self) -> Option<&SurfacePlane> {
        self.stencil.as_ref()
    }

    pub fn plane(&self, plane: Plane) -> Option<&SurfacePlane> {
        match plane {
            Plane::Internal => Some(&self.internal),
            Plane::Stencil => self.stencil.as_ref(),
        }
    }

    /// Run `f` with a read lock on `plane`. Returns `None` when the surface lacks that plane.
    pub fn read_plane<R>(&self, plane: Plane, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
        self.plane(plane).map(|p| p.read(f))
    }

    pub fn write_plane<R>(
        &self,
        plane: Plane,
        mode: LockMode,
        f: impl FnOnce(&mut [u8]) -> R,
    ) -> Option<R> {
        self.plane(plane).map(|p| p.write(mode, f))
    }

    /// Decode the internal-plane texel at `(x, y, slice)`.
    pub fn texel(&self, x: u32, y: u32, slice: u32) -> [f32; 4] {
        let offset = self.internal.texel_offset(x, y, slice);
        let bpp = self.internal.bytes_per_texel;
        self.internal
            .read(|bytes| self.format.read_texel(&bytes[offset..offset + bpp]))
    }

    /// Encode `rgba` into the internal-plane texel at `(x, y, slice)`.
    pub fn set_texel(&self, x: u32, y: u32, slice: u32, rgba: [f32; 4]) {
        let offset = self.internal.texel_offset(x, y, slice);
        let bpp = self.internal.bytes_per_texel;
        self.internal.write(LockMode::WriteOnly, |bytes| {
            self.format.write_texel(rgba, &mut bytes[offset..offset + bpp])
        });
    }

    pub fn stencil_value(&self, x: u32, y: u32, slice: u32) -> Option<u8> {
        let plane = self.stencil.as_ref()?;
        let offset = plane.texel_offset(x, y, slice);
        Some(plane.read(|bytes| bytes[offset]))
    }

    /// Fill `rect` (clipped to the surface) of slice 0 with depth `z`.
    pub fn clear_depth(&self, z: f32, rect: Rect) {
        if !self.format.is_depth() {
            return;
        }
        let rect = rect.intersect(&self.rect());
        if rect.is_empty() {
            return;
        }

        let mut texel = vec![0u8; self.format.bytes()];
        self.format.write_depth(z, &mut texel);
        let bpp = texel.len();

        self.internal.write(LockMode::WriteOnly, |bytes| {
            for y in rect.y0..rect.y1 {
                for x in rect.x0..rect.x1 {
                    let offset = self.internal.texel_offset(x as u32, y as u32, 0);
                    bytes[offset..offset + bpp].copy_from_slice(&texel);
                }
            }
        });
    }

    /// Replace the bits selected by `mask` with `value` inside `rect` (clipped) of slice 0.
    pub fn clear_stencil(&self, value: u8, mask: u8, rect: Rect) {
        let Some(plane) = self.stencil.as_ref() else {
            return;
        };
        let rect = rect.intersect(&self.rect());
        if rect.is_empty() || mask == 0 {
            return;
        }

        let mode = if mask == 0xFF {
            LockMode::WriteOnly
        } else {
            LockMode::ReadWrite
        };
        plane.write(mode, |bytes| {
            for y in rect.y0..rect.y1 {
                let row = plane.texel_offset(rect.x0 as u32, y as u32, 0);
                let len = rect.width() as usize;
                for b in &mut bytes[row..row + len] {
                    *b = (*b & !mask) | (value & mask);
                }
            }
        });
    }
}

fn align_up(v: usize, align: usize) -> usize {
    (v + align - 1) / align * align
}
