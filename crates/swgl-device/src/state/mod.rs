//! Pipeline state owned by the device: fixed-function render state, sampler stages, clip planes,
//! viewport and scissor.

pub mod render;
pub mod sampler;
pub mod topology;

pub use render::{
    BlendFactor, BlendOp, BlendState, ClipFlags, ColorWriteMask, CompareFunc, CullMode,
    FillMode, FogMode, FogState, LogicalOp, PointState, RenderState, ShadingMode, StencilFace,
    StencilOp, StencilState, Viewport, MAX_CLIP_PLANES,
};
pub use sampler::{
    AddressAxis, AddressMode, FilterType, MipmapFilter, SamplerState, SamplerType,
    PIXEL_SAMPLERS, VERTEX_SAMPLERS,
};
pub use topology::{DrawType, IndexFormat, PrimitiveType};
