use bitflags::bitflags;

use crate::rect::Rect;

use super::sampler::{SamplerState, SamplerType, PIXEL_SAMPLERS, VERTEX_SAMPLERS};

/// Number of user clip planes.
pub const MAX_CLIP_PLANES: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FillMode {
    Solid,
    Wireframe,
    Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShadingMode {
    Flat,
    Gouraud,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CullMode {
    None,
    Clockwise,
    CounterClockwise,
}

/// Comparison used by the depth, alpha and stencil tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SourceColor,
    InvSourceColor,
    SourceAlpha,
    InvSourceAlpha,
    DestAlpha,
    InvDestAlpha,
    DestColor,
    InvDestColor,
    SourceAlphaSat,
    ConstantColor,
    InvConstantColor,
    ConstantAlpha,
    InvConstantAlpha,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendOp {
    Add,
    Subtract,
    InvSubtract,
    Min,
    Max,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    IncrSat,
    DecrSat,
    Invert,
    Incr,
    Decr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FogMode {
    None,
    Linear,
    Exp,
    Exp2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    Clear,
    Set,
    Copy,
    CopyInverted,
    Noop,
    Invert,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Equiv,
    AndReverse,
    AndInverted,
    OrReverse,
    OrInverted,
}

bitflags! {
    /// User clip planes enabled for clipping.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClipFlags: u32 {
        const PLANE0 = 1 << 0;
        const PLANE1 = 1 << 1;
        const PLANE2 = 1 << 2;
        const PLANE3 = 1 << 3;
        const PLANE4 = 1 << 4;
        const PLANE5 = 1 << 5;
    }
}

bitflags! {
    /// Color channels written by a clear.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColorWriteMask: u32 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
        const ALL = 0xF;
    }
}

/// Integer viewport plus depth range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x0: i32,
    pub y0: i32,
    pub width: i32,
    pub height: i32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x0: 0,
            y0: 0,
            width: 0,
            height: 0,
            min_z: 0.0,
            max_z: 1.0,
        }
    }
}

impl Viewport {
    /// Pixel bounds; the far edges saturate at `i32::MAX`.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x0,
            self.y0,
            self.x0.saturating_add(self.width),
            self.y0.saturating_add(self.height),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StencilFace {
    pub fail_op: StencilOp,
    pub depth_fail_op: StencilOp,
    pub pass_op: StencilOp,
    pub compare: CompareFunc,
}

impl Default for StencilFace {
    fn default() -> Self {
        Self {
            fail_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            pass_op: StencilOp::Keep,
            compare: CompareFunc::Always,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StencilState {
    pub enable: bool,
    pub front: StencilFace,
    /// Used for counter-clockwise faces when `two_sided` is set.
    pub back: StencilFace,
    pub two_sided: bool,
    pub reference: u32,
    pub mask: u32,
    pub write_mask: u32,
}

impl Default for StencilState {
    fn default() -> Self {
        Self {
            enable: false,
            front: StencilFace::default(),
            back: StencilFace::default(),
            two_sided: false,
            reference: 0,
            mask: 0xFFFF_FFFF,
            write_mask: 0xFFFF_FFFF,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlendState {
    pub enable: bool,
    pub source: BlendFactor,
    pub dest: BlendFactor,
    pub op: BlendOp,
    pub separate_alpha: bool,
    pub source_alpha: BlendFactor,
    pub dest_alpha: BlendFactor,
    pub op_alpha: BlendOp,
    /// Packed `0xAARRGGBB`.
    pub constant: u32,
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            enable: false,
            source: BlendFactor::One,
            dest: BlendFactor::Zero,
            op: BlendOp::Add,
            separate_alpha: false,
            source_alpha: BlendFactor::One,
            dest_alpha: BlendFactor::Zero,
            op_alpha: BlendOp::Add,
            constant: 0xFFFF_FFFF,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogState {
    pub enable: bool,
    pub color: u32,
    pub pixel_mode: FogMode,
    pub vertex_mode: FogMode,
    pub start: f32,
    pub end: f32,
    pub density: f32,
    pub range_enable: bool,
}

impl Default for FogState {
    fn default() -> Self {
        Self {
            enable: false,
            color: 0,
            pixel_mode: FogMode::None,
            vertex_mode: FogMode::None,
            start: 0.0,
            end: 1.0,
            density: 1.0,
            range_enable: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointState {
    pub size: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub sprite_enable: bool,
}

impl Default for PointState {
    fn default() -> Self {
        Self {
            size: 1.0,
            size_min: 0.125,
            size_max: 8192.0,
            sprite_enable: true,
        }
    }
}

/// Every fixed-function knob of the pipeline, as consumed by a draw.
///
/// All fields are plain values; a setter is a single-field assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub fill_mode: FillMode,
    pub shading_mode: ShadingMode,
    pub cull_mode: CullMode,

    pub depth_test_enable: bool,
    pub depth_write_enable: bool,
    pub depth_compare: CompareFunc,
    pub depth_bias: f32,
    pub slope_depth_bias: f32,

    pub alpha_test_enable: bool,
    pub alpha_compare: CompareFunc,
    pub alpha_reference: f32,

    pub blend: BlendState,
    pub stencil: StencilState,
    pub fog: FogState,
    pub point: PointState,

    pub specular_enable: bool,
    pub write_srgb: bool,
    pub color_logic_op_enable: bool,
    pub logical_op: LogicalOp,

    pub clip_flags: ClipFlags,
    pub clip_planes: [[f32; 4]; MAX_CLIP_PLANES],

    pub viewport: Viewport,
    pub scissor_enable: bool,
    pub scissor_rect: Rect,

    pub pixel_samplers: [SamplerState; PIXEL_SAMPLERS],
    pub vertex_samplers: [SamplerState; VERTEX_SAMPLERS],
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Solid,
            shading_mode: ShadingMode::Gouraud,
            cull_mode: CullMode::CounterClockwise,

            depth_test_enable: true,
            depth_write_enable: true,
            depth_compare: CompareFunc::LessEqual,
            depth_bias: 0.0,
            slope_depth_bias: 0.0,

            alpha_test_enable: false,
            alpha_compare: CompareFunc::Always,
            alpha_reference: 127.5,

            blend: BlendState::default(),
            stencil: StencilState::default(),
            fog: FogState::default(),
            point: PointState::default(),

            specular_enable: false,
            write_srgb: false,
            color_logic_op_enable: false,
            logical_op: LogicalOp::Copy,

            clip_flags: ClipFlags::empty(),
            clip_planes: [[0.0; 4]; MAX_CLIP_PLANES],

            viewport: Viewport::default(),
            scissor_enable: false,
            scissor_rect: Rect::default(),

            pixel_samplers: [SamplerState::default(); PIXEL_SAMPLERS],
            vertex_samplers: [SamplerState::default(); VERTEX_SAMPLERS],
        }
    }
}

impl RenderState {
    pub fn samplers(&self, kind: SamplerType) -> &[SamplerState] {
        match kind {
            SamplerType::Pixel => &self.pixel_samplers,
            SamplerType::Vertex => &self.vertex_samplers,
        }
    }

    pub fn samplers_mut(&mut self, kind: SamplerType) -> &mut [SamplerState] {
        match kind {
            SamplerType::Pixel => &mut self.pixel_samplers,
            SamplerType::Vertex => &mut self.vertex_samplers,
        }
    }
}
