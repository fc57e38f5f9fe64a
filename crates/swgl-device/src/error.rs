use thiserror::Error;

use crate::format::Format;

/// Coarse classification of [`DeviceError`]s.
///
/// Degenerate draw geometry has no category: a zero-area viewport or scissor skips the draw
/// instead of failing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InvalidParameters,
    ResourceExhaustion,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeviceError {
    #[error("invalid parameters: {0} surface is missing")]
    MissingSurface(&'static str),
    #[error("invalid parameters: {side} rectangle {rect} is outside the {width}x{height} surface or empty")]
    InvalidRectangle {
        side: &'static str,
        rect: String,
        width: u32,
        height: u32,
    },
    #[error("invalid parameters: surface {width}x{height} exceeds the maximum height {max_height}")]
    SurfaceTooLarge {
        width: u32,
        height: u32,
        max_height: u32,
    },
    #[error("invalid parameters: surface dimensions {width}x{height}x{depth} must be non-zero")]
    EmptySurface { width: u32, height: u32, depth: u32 },
    #[error("invalid parameters: render target index {index} out of range (max {max})")]
    RenderTargetIndexOutOfRange { index: usize, max: usize },
    #[error("invalid parameters: {kind} sampler index {index} out of range (max {max})")]
    SamplerIndexOutOfRange {
        kind: &'static str,
        index: usize,
        max: usize,
    },
    #[error("invalid parameters: clip plane index {index} out of range (max {max})")]
    ClipPlaneIndexOutOfRange { index: usize, max: usize },
    #[error("invalid parameters: format {0:?} cannot be used for a volume copy")]
    DepthStencilVolumeCopy(Format),
    #[error("invalid parameters: format {0:?} is not a depth or stencil format")]
    NotDepthStencil(Format),
    #[error("invalid parameters: destination format {0:?} has no stencil plane")]
    NoStencilPlane(Format),
    #[error("out of memory allocating {bytes} bytes of surface storage")]
    OutOfMemory { bytes: usize },
}

impl DeviceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeviceError::OutOfMemory { .. } => ErrorCategory::ResourceExhaustion,
            _ => ErrorCategory::InvalidParameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_memory_is_resource_exhaustion() {
        let err = DeviceError::OutOfMemory { bytes: 64 };
        assert_eq!(err.category(), ErrorCategory::ResourceExhaustion);
        assert!(err.to_string().contains("64 bytes"));
    }

    #[test]
    fn rectangle_errors_are_invalid_parameters() {
        let err = DeviceError::InvalidRectangle {
            side: "source",
            rect: "[0,0,4,4)".into(),
            width: 2,
            height: 2,
        };
        assert_eq!(err.category(), ErrorCategory::InvalidParameters);
        assert!(err.to_string().contains("2x2"));
    }
}
