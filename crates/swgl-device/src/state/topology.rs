use std::fmt;

/// Primitive assembly modes accepted by the draw entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    PointList,
    LineList,
    LineStrip,
    LineLoop,
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimitiveType::PointList => "point_list",
            PrimitiveType::LineList => "line_list",
            PrimitiveType::LineStrip => "line_strip",
            PrimitiveType::LineLoop => "line_loop",
            PrimitiveType::TriangleList => "triangle_list",
            PrimitiveType::TriangleStrip => "triangle_strip",
            PrimitiveType::TriangleFan => "triangle_fan",
        };
        f.write_str(s)
    }
}

impl PrimitiveType {
    /// Number of vertices (or indices) consumed by `primitive_count` primitives.
    pub fn vertex_count(self, primitive_count: u32) -> u32 {
        if primitive_count == 0 {
            return 0;
        }
        match self {
            PrimitiveType::PointList | PrimitiveType::LineLoop => primitive_count,
            PrimitiveType::LineList => primitive_count * 2,
            PrimitiveType::LineStrip => primitive_count + 1,
            PrimitiveType::TriangleList => primitive_count * 3,
            PrimitiveType::TriangleStrip | PrimitiveType::TriangleFan => primitive_count + 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    U8,
    U16,
    U32,
}

impl IndexFormat {
    pub fn bytes(self) -> u32 {
        match self {
            IndexFormat::U8 => 1,
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// Primitive type plus the index width of an indexed draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawType {
    pub primitive: PrimitiveType,
    pub indices: Option<IndexFormat>,
}

impl DrawType {
    pub fn non_indexed(primitive: PrimitiveType) -> Self {
        Self {
            primitive,
            indices: None,
        }
    }

    pub fn indexed(primitive: PrimitiveType, format: IndexFormat) -> Self {
        Self {
            primitive,
            indices: Some(format),
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }
}

impl fmt::Display for DrawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.indices {
            None => write!(f, "{}", self.primitive),
            Some(format) => write!(f, "{}_indexed{}", self.primitive, format.bytes() * 8),
        }
    }
}
