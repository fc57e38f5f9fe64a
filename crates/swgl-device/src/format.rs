//! Pixel formats understood by the device layer.
//!
//! Multi-byte texels are stored little-endian. The `A8R8G8B8` family follows the D3D naming
//! convention (most significant channel first), so an `A8R8G8B8` texel is laid out in memory as
//! `[B, G, R, A]` and an `A8B8G8R8` texel as `[R, G, B, A]`.

use half::f16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    A8,
    L8,
    R5G6B5,
    A8R8G8B8,
    X8R8G8B8,
    A8B8G8R8,
    X8B8G8R8,
    R32F,
    A16B16G16R16F,
    A32B32G32R32F,

    S8,
    D16,
    D24S8,
    D24X8,
    D24FS8,
    D32,
    D32F,
    /// Stores `1 - z` as f32.
    D32FComplementary,
    D32FLockable,
    DF24S8,
    DF16S8,
    D32FS8Texture,
    D32FS8Shadow,
}

impl Format {
    /// Bytes per texel of the internal (color or depth) plane.
    pub fn bytes(self) -> usize {
        match self {
            Format::A8 | Format::L8 | Format::S8 => 1,
            Format::R5G6B5 | Format::D16 | Format::DF16S8 => 2,
            Format::A8R8G8B8
            | Format::X8R8G8B8
            | Format::A8B8G8R8
            | Format::X8B8G8R8
            | Format::R32F
            | Format::D24S8
            | Format::D24X8
            | Format::D24FS8
            | Format::D32
            | Format::D32F
            | Format::D32FComplementary
            | Format::D32FLockable
            | Format::DF24S8
            | Format::D32FS8Texture
            | Format::D32FS8Shadow => 4,
            Format::A16B16G16R16F => 8,
            Format::A32B32G32R32F => 16,
        }
    }

    pub fn is_depth(self) -> bool {
        matches!(
            self,
            Format::D16
                | Format::D24S8
                | Format::D24X8
                | Format::D24FS8
                | Format::D32
                | Format::D32F
                | Format::D32FComplementary
                | Format::D32FLockable
                | Format::DF24S8
                | Format::DF16S8
                | Format::D32FS8Texture
                | Format::D32FS8Shadow
        )
    }

    pub fn is_stencil(self) -> bool {
        matches!(
            self,
            Format::S8
                | Format::D24S8
                | Format::D24FS8
                | Format::DF24S8
                | Format::DF16S8
                | Format::D32FS8Texture
                | Format::D32FS8Shadow
        )
    }

    pub fn is_color(self) -> bool {
        !self.is_depth() && !self.is_stencil()
    }

    /// Whether the internal plane is stored in 2×2 quads rather than linear rows.
    ///
    /// Rasterizer-private depth buffers use the quad layout; the lockable variants are linear so
    /// they can be mapped by the application.
    pub fn has_quad_layout(self) -> bool {
        matches!(
            self,
            Format::D16
                | Format::D24S8
                | Format::D24X8
                | Format::D24FS8
                | Format::D32
                | Format::D32F
                | Format::D32FComplementary
        )
    }

    pub fn has_alpha(self) -> bool {
        matches!(
            self,
            Format::A8
                | Format::A8R8G8B8
                | Format::A8B8G8R8
                | Format::A16B16G16R16F
                | Format::A32B32G32R32F
        )
    }

    /// Two 32-bit formats that differ only in whether the top byte is alpha or padding.
    ///
    /// Copies between such a pair are raw-copy compatible but must write an opaque alpha byte.
    pub fn is_alpha_pair(a: Format, b: Format) -> bool {
        matches!(
            (a, b),
            (Format::A8R8G8B8, Format::X8R8G8B8)
                | (Format::X8R8G8B8, Format::A8R8G8B8)
                | (Format::A8B8G8R8, Format::X8B8G8R8)
                | (Format::X8B8G8R8, Format::A8B8G8R8)
        )
    }

    /// Whether a depth/stencil surface of this format can be mapped by the application.
    ///
    /// # Panics
    ///
    /// Panics for formats that are neither depth nor stencil. Callers validate the format first;
    /// reaching the panic means a color format slipped through.
    pub(crate) fn depth_stencil_lockable(self) -> bool {
        match self {
            Format::S8
            | Format::D24S8
            | Format::D24X8
            | Format::D24FS8
            | Format::D32
            | Format::D16
            | Format::D32F
            | Format::D32FComplementary => false,
            Format::D32FLockable
            | Format::DF24S8
            | Format::DF16S8
            | Format::D32FS8Texture
            | Format::D32FS8Shadow => true,
            other => unreachable!("format {other:?} reached the depth-stencil lockability switch"),
        }
    }

    /// Decode one texel of the internal plane to RGBA float.
    ///
    /// Depth formats decode to `(z, z, z, 1)`.
    pub fn read_texel(self, texel: &[u8]) -> [f32; 4] {
        match self {
            Format::A8 => [0.0, 0.0, 0.0, unorm8(texel[0])],
            Format::L8 | Format::S8 => {
                let l = unorm8(texel[0]);
                [l, l, l, 1.0]
            }
            Format::R5G6B5 => {
                let v = u16::from_le_bytes([texel[0], texel[1]]);
                [
                    ((v >> 11) & 0x1F) as f32 / 31.0,
                    ((v >> 5) & 0x3F) as f32 / 63.0,
                    (v & 0x1F) as f32 / 31.0,
                    1.0,
                ]
            }
            Format::A8R8G8B8 => [
                unorm8(texel[2]),
                unorm8(texel[1]),
                unorm8(texel[0]),
                unorm8(texel[3]),
            ],
            Format::X8R8G8B8 => [unorm8(texel[2]), unorm8(texel[1]), unorm8(texel[0]), 1.0],
            Format::A8B8G8R8 => [
                unorm8(texel[0]),
                unorm8(texel[1]),
                unorm8(texel[2]),
                unorm8(texel[3]),
            ],
            Format::X8B8G8R8 => [unorm8(texel[0]), unorm8(texel[1]), unorm8(texel[2]), 1.0],
            Format::R32F => [read_f32(texel), 0.0, 0.0, 1.0],
            Format::A16B16G16R16F => {
                let mut out = [0.0; 4];
                for (c, chunk) in out.iter_mut().zip(texel.chunks_exact(2)) {
                    *c = f16::from_le_bytes([chunk[0], chunk[1]]).to_f32();
                }
                out
            }
            Format::A32B32G32R32F => {
                let mut out = [0.0; 4];
                for (c, chunk) in out.iter_mut().zip(texel.chunks_exact(4)) {
                    *c = read_f32(chunk);
                }
                out
            }
            _ => {
                let z = self.read_depth(texel);
                [z, z, z, 1.0]
            }
        }
    }

    /// Encode an RGBA float value into one texel of the internal plane.
    ///
    /// Padding bytes (`X8`) are written as `0xFF`. Depth formats take their value from the red
    /// channel.
    pub fn write_texel(self, rgba: [f32; 4], texel: &mut [u8]) {
        let [r, g, b, a] = rgba;
        match self {
            Format::A8 => texel[0] = to_unorm8(a),
            Format::L8 | Format::S8 => texel[0] = to_unorm8(r),
            Format::R5G6B5 => {
                let v = (to_unorm(r, 31) << 11) | (to_unorm(g, 63) << 5) | to_unorm(b, 31);
                texel[..2].copy_from_slice(&(v as u16).to_le_bytes());
            }
            Format::A8R8G8B8 => {
                texel[..4].copy_from_slice(&[to_unorm8(b), to_unorm8(g), to_unorm8(r), to_unorm8(a)])
            }
            Format::X8R8G8B8 => {
                texel[..4].copy_from_slice(&[to_unorm8(b), to_unorm8(g), to_unorm8(r), 0xFF])
            }
            Format::A8B8G8R8 => {
                texel[..4].copy_from_slice(&[to_unorm8(r), to_unorm8(g), to_unorm8(b), to_unorm8(a)])
            }
            Format::X8B8G8R8 => {
                texel[..4].copy_from_slice(&[to_unorm8(r), to_unorm8(g), to_unorm8(b), 0xFF])
            }
            Format::R32F => texel[..4].copy_from_slice(&r.to_le_bytes()),
            Format::A16B16G16R16F => {
                for (c, chunk) in rgba.iter().zip(texel.chunks_exact_mut(2)) {
                    chunk.copy_from_slice(&f16::from_f32(*c).to_le_bytes());
                }
            }
            Format::A32B32G32R32F => {
                texel[..16].copy_from_slice(bytemuck::bytes_of(&rgba));
            }
            _ => self.write_depth(r, texel),
        }
    }

    /// Decode the depth value of one texel. Non-depth formats decode their first channel.
    pub fn read_depth(self, texel: &[u8]) -> f32 {
        match self {
            Format::D16 | Format::DF16S8 => {
                u16::from_le_bytes([texel[0], texel[1]]) as f32 / u16::MAX as f32
            }
            Format::D24S8 | Format::D24X8 => {
                let v = u32::from_le_bytes([texel[0], texel[1], texel[2], texel[3]]);
                (v >> 8) as f32 / 0x00FF_FFFF as f32
            }
            Format::D32 => {
                let v = u32::from_le_bytes([texel[0], texel[1], texel[2], texel[3]]);
                (v as f64 / u32::MAX as f64) as f32
            }
            Format::D32FComplementary => 1.0 - read_f32(texel),
            Format::D24FS8
            | Format::D32F
            | Format::D32FLockable
            | Format::DF24S8
            | Format::D32FS8Texture
            | Format::D32FS8Shadow => read_f32(texel),
            other => other.read_texel(texel)[0],
        }
    }

    /// Encode a depth value into one texel. Non-depth formats receive it in every color channel.
    pub fn write_depth(self, z: f32, texel: &mut [u8]) {
        match self {
            Format::D16 | Format::DF16S8 => {
                let v = (z.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16;
                texel[..2].copy_from_slice(&v.to_le_bytes());
            }
            Format::D24S8 | Format::D24X8 => {
                let v = (z.clamp(0.0, 1.0) * 0x00FF_FFFF as f32).round() as u32;
                texel[..4].copy_from_slice(&(v << 8).to_le_bytes());
            }
            Format::D32 => {
                let v = (z.clamp(0.0, 1.0) as f64 * u32::MAX as f64).round() as u32;
                texel[..4].copy_from_slice(&v.to_le_bytes());
            }
            Format::D32FComplementary => texel[..4].copy_from_slice(&(1.0 - z).to_le_bytes()),
            Format::D24FS8
            | Format::D32F
            | Format::D32FLockable
            | Format::DF24S8
            | Format::D32FS8Texture
            | Format::D32FS8Shadow => texel[..4].copy_from_slice(&z.to_le_bytes()),
            other => other.write_texel([z, z, z, 1.0], texel),
        }
    }
}

fn read_f32(bytes: &[u8]) -> f32 {
    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn unorm8(v: u8) -> f32 {
    v as f32 / 255.0
}

fn to_unorm8(v: f32) -> u8 {
    to_unorm(v, 255) as u8
}

fn to_unorm(v: f32, max: u32) -> u32 {
    // NaN clamps to 0.
    let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
    (v * max as f32).round() as u32
}
