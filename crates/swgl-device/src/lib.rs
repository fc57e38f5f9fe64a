//! `swgl-device` is the device/context layer of a software rasterizer.
//!
//! It owns the mutable pipeline state that sits in front of the rasterizer core:
//! - fixed-function render state, samplers, clip planes, viewport and scissor (see [`state`]);
//! - reference-counted color, depth and stencil target slots (see [`TargetBindings`]);
//! - lazily uploaded per-stage shader constants (see [`ShaderConstants`]);
//! - region and volume copies with clamping, flips, scaling and format conversion
//!   (see [`blit`]).
//!
//! The rasterizer itself is reached through the [`Pipeline`] trait. [`Device`] ties it all
//! together.

mod binder;
mod config;
mod constants;
mod device;
mod error;
mod format;
mod pipeline;
mod rect;

pub mod blit;
pub mod state;
pub mod stats;
pub mod surface;

pub use binder::{TargetBindings, RENDER_TARGETS};
pub use blit::{CopyFlags, CopyStrategy, Flip, SoftwareBlitter};
pub use config::{DeviceConfig, OUTLINE_RESOLUTION};
pub use constants::{
    ShaderConstants, StageConstants, StageSync, FRAGMENT_UNIFORM_VECTORS, VERTEX_UNIFORM_VECTORS,
};
pub use device::Device;
pub use error::{DeviceError, ErrorCategory};
pub use format::Format;
pub use pipeline::{Pipeline, PipelineViewport, ShaderProgram, ShaderStage};
pub use rect::{Rect, RectF, SliceRect, SliceRectF};
pub use stats::{BlitStats, BlitStatsSnapshot};
pub use surface::{LockMode, Plane, Surface, SurfaceDesc, SurfacePlane};
