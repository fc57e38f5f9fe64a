/// Number of pixel-shader sampler stages.
pub const PIXEL_SAMPLERS: usize = 16;
/// Number of vertex-shader sampler stages.
pub const VERTEX_SAMPLERS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SamplerType {
    Pixel,
    Vertex,
}

impl SamplerType {
    pub fn count(self) -> usize {
        match self {
            SamplerType::Pixel => PIXEL_SAMPLERS,
            SamplerType::Vertex => VERTEX_SAMPLERS,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            SamplerType::Pixel => "pixel",
            SamplerType::Vertex => "vertex",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressAxis {
    U,
    V,
    W,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Wrap,
    Clamp,
    Mirror,
    MirrorOnce,
    Border,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterType {
    Point,
    Linear,
    Anisotropic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MipmapFilter {
    None,
    Point,
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplerState {
    pub address_u: AddressMode,
    pub address_v: AddressMode,
    pub address_w: AddressMode,
    /// Packed `0xAARRGGBB`.
    pub border_color: u32,
    pub filter: FilterType,
    pub mipmap_filter: MipmapFilter,
    pub mipmap_lod: f32,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            address_u: AddressMode::Wrap,
            address_v: AddressMode::Wrap,
            address_w: AddressMode::Wrap,
            border_color: 0x0000_0000,
            filter: FilterType::Point,
            mipmap_filter: MipmapFilter::None,
            mipmap_lod: 0.0,
        }
    }
}

impl SamplerState {
    pub fn set_address_mode(&mut self, axis: AddressAxis, mode: AddressMode) {
        match axis {
            AddressAxis::U => self.address_u = mode,
            AddressAxis::V => self.address_v = mode,
            AddressAxis::W => self.address_w = mode,
        }
    }
}
